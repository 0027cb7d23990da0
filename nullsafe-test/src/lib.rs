use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

use nullsafe::{
    DatabaseError, DiagnosticRecord, DiagnosticSink, Error, Executor, NamedArgs, QueryResult,
    Result, SafeSetter, SqlType, Statement, Value,
};

pub fn setup_if_needed() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The error a strict driver raises when handed a `NULL` it cannot type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockDatabaseError {
    pub message: String,
    pub code: Option<String>,
}

impl MockDatabaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn invalid_column_type() -> Self {
        Self::new("invalid column type").with_code("ORA-17004")
    }
}

impl Display for MockDatabaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for MockDatabaseError {}

impl DatabaseError for MockDatabaseError {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        self.code.as_deref().map(Cow::Borrowed)
    }
}

/// One bound parameter, as seen by the mock driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Null(SqlType),
    Value(SqlType, Value),
}

/// A prepared statement with a fixed number of parameters, behaving like a strict driver.
#[derive(Debug, Default)]
pub struct MockStatement {
    params: Vec<Option<Bound>>,
}

impl MockStatement {
    pub fn new(len: usize) -> Self {
        Self {
            params: vec![None; len],
        }
    }

    fn slot(&mut self, position: usize) -> Result<&mut Option<Bound>> {
        let len = self.params.len();

        position
            .checked_sub(1)
            .and_then(|index| self.params.get_mut(index))
            .ok_or(Error::ParameterIndexOutOfBounds {
                index: position,
                len,
            })
    }

    /// Bound parameters in position order; unbound positions are `None`.
    pub fn into_bound(self) -> Vec<Option<Bound>> {
        self.params
    }
}

impl Statement for MockStatement {
    fn bind_null(&mut self, position: usize, sql_type: SqlType) -> Result<()> {
        if sql_type.is_unknown() {
            return Err(MockDatabaseError::invalid_column_type().into());
        }

        *self.slot(position)? = Some(Bound::Null(sql_type));
        Ok(())
    }

    fn bind_value(&mut self, position: usize, sql_type: SqlType, value: &Value) -> Result<()> {
        let bound = match value {
            value if value.is_untyped_null() => {
                return Err(MockDatabaseError::invalid_column_type().into())
            }
            Value::TypedNull(ty) => Bound::Null(*ty),
            value => Bound::Value(sql_type, value.clone()),
        };

        *self.slot(position)? = Some(bound);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Execute,
    Batch,
    Named,
    NamedSource,
}

/// A call as it reached the mock driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub sql: String,

    /// One entry per execution: a single row for `execute`, one per batch row otherwise.
    pub args: Vec<Vec<Value>>,

    /// Names of the named parameters, in the order they were bound.
    pub names: Vec<String>,

    pub declared_types: Option<Vec<SqlType>>,

    /// What each execution actually bound.
    pub bound: Vec<Vec<Option<Bound>>>,
}

/// An [`Executor`] that records every call it receives.
///
/// Arguments are bound through a [`SafeSetter`] when one is given, and straight through the
/// native bind calls otherwise, the way a driver with no null handling would.
#[derive(Debug, Default)]
pub struct MockExecutor {
    setter: Option<SafeSetter>,
    calls: Vec<RecordedCall>,
    fail_next: Option<MockDatabaseError>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_setter(setter: SafeSetter) -> Self {
        Self {
            setter: Some(setter),
            ..Self::default()
        }
    }

    /// Makes the next call fail with `error` after it has been recorded.
    pub fn fail_next(&mut self, error: MockDatabaseError) {
        self.fail_next = Some(error);
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn last_call(&self) -> Option<&RecordedCall> {
        self.calls.last()
    }

    fn bind_row(&self, values: &[Value], declared: &[SqlType]) -> Result<Vec<Option<Bound>>> {
        let mut stmt = MockStatement::new(values.len());

        match &self.setter {
            Some(setter) => setter.bind_all(&mut stmt, values, Some(declared))?,

            None => {
                for (index, value) in values.iter().enumerate() {
                    let sql_type = declared.get(index).copied().unwrap_or(SqlType::Unknown);

                    stmt.bind_value(index + 1, sql_type, value)?;
                }
            }
        }

        Ok(stmt.into_bound())
    }

    fn finish(
        &mut self,
        mut call: RecordedCall,
        rows: &[Vec<Value>],
        declared: &[SqlType],
    ) -> Result<usize> {
        call.args = rows.to_vec();

        let bound = rows
            .iter()
            .map(|row| self.bind_row(row, declared))
            .collect::<Result<Vec<_>>>();

        match bound {
            Ok(bound) => call.bound = bound,
            Err(e) => {
                self.calls.push(call);
                return Err(e);
            }
        }

        self.calls.push(call);

        if let Some(error) = self.fail_next.take() {
            return Err(error.into());
        }

        Ok(rows.len())
    }
}

impl Executor for MockExecutor {
    fn execute(
        &mut self,
        sql: &str,
        args: &mut [Value],
        declared_types: Option<&[SqlType]>,
    ) -> Result<QueryResult> {
        let call = RecordedCall::new(CallKind::Execute, sql, declared_types);

        self.finish(call, &[args.to_vec()], declared_types.unwrap_or_default())?;

        Ok(QueryResult::new(1))
    }

    fn execute_batch(
        &mut self,
        sql: &str,
        rows: &mut [Vec<Value>],
        declared_types: Option<&[SqlType]>,
    ) -> Result<Vec<QueryResult>> {
        let call = RecordedCall::new(CallKind::Batch, sql, declared_types);

        let executed = self.finish(call, rows, declared_types.unwrap_or_default())?;

        Ok(vec![QueryResult::new(1); executed])
    }

    fn execute_named(&mut self, sql: &str, params: NamedArgs<'_>) -> Result<QueryResult> {
        let (kind, names, values, declared): (_, Vec<String>, Vec<Value>, Vec<SqlType>) =
            match params {
                NamedArgs::Map(map) => (
                    CallKind::Named,
                    map.keys().cloned().collect(),
                    map.values().cloned().collect(),
                    Vec::new(),
                ),

                NamedArgs::Source(source) => {
                    let names = source.parameter_names();

                    (
                        CallKind::NamedSource,
                        names.iter().map(|name| name.to_string()).collect(),
                        names
                            .iter()
                            .map(|name| source.value(name).cloned().unwrap_or(Value::Null))
                            .collect(),
                        names.iter().map(|name| source.sql_type(name)).collect(),
                    )
                }
            };

        let mut call = RecordedCall::new(kind, sql, None);
        call.names = names;

        self.finish(call, &[values], &declared)?;

        Ok(QueryResult::new(1))
    }
}

impl RecordedCall {
    fn new(kind: CallKind, sql: &str, declared_types: Option<&[SqlType]>) -> Self {
        Self {
            kind,
            sql: sql.to_owned(),
            args: Vec::new(),
            names: Vec::new(),
            declared_types: declared_types.map(<[SqlType]>::to_vec),
            bound: Vec::new(),
        }
    }
}

/// A [`DiagnosticSink`] that keeps every record it is given.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<DiagnosticRecord>>>,
    values: bool,
}

impl RecordingSink {
    /// Records nulls only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records nulls and values.
    pub fn with_values() -> Self {
        Self {
            values: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> MutexGuard<'_, Vec<DiagnosticRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn take(&self) -> Vec<DiagnosticRecord> {
        std::mem::take(&mut *self.records())
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, record: &DiagnosticRecord) {
        self.records().push(record.clone());
    }

    fn wants_values(&self) -> bool {
        self.values
    }
}
