use std::collections::HashMap;

use crate::error::Result;
use crate::type_info::SqlType;
use crate::value::{ParamMap, Value};

/// The outcome of one executed statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub rows_affected: u64,
}

impl QueryResult {
    pub fn new(rows_affected: u64) -> Self {
        Self { rows_affected }
    }
}

/// A type that can execute parameterized statements against a database.
///
/// This is the surface [`NullSafe`](crate::NullSafe) wraps. Argument collections are passed by
/// `&mut` so a wrapper can rewrite values in place before handing them on; callers must expect
/// their collection to have been modified once the call returns.
pub trait Executor {
    /// Executes `sql` once with positional arguments.
    ///
    /// `declared_types`, when present, gives the SQL type of each position and is the caller's
    /// full contract for the call.
    fn execute(
        &mut self,
        sql: &str,
        args: &mut [Value],
        declared_types: Option<&[SqlType]>,
    ) -> Result<QueryResult>;

    /// Executes `sql` once per row of positional arguments.
    fn execute_batch(
        &mut self,
        sql: &str,
        rows: &mut [Vec<Value>],
        declared_types: Option<&[SqlType]>,
    ) -> Result<Vec<QueryResult>>;

    /// Executes `sql` with named (`:name`) arguments.
    fn execute_named(&mut self, sql: &str, params: NamedArgs<'_>) -> Result<QueryResult>;
}

impl<E: Executor + ?Sized> Executor for &'_ mut E {
    #[inline]
    fn execute(
        &mut self,
        sql: &str,
        args: &mut [Value],
        declared_types: Option<&[SqlType]>,
    ) -> Result<QueryResult> {
        (**self).execute(sql, args, declared_types)
    }

    #[inline]
    fn execute_batch(
        &mut self,
        sql: &str,
        rows: &mut [Vec<Value>],
        declared_types: Option<&[SqlType]>,
    ) -> Result<Vec<QueryResult>> {
        (**self).execute_batch(sql, rows, declared_types)
    }

    #[inline]
    fn execute_named(&mut self, sql: &str, params: NamedArgs<'_>) -> Result<QueryResult> {
        (**self).execute_named(sql, params)
    }
}

/// Arguments for [`Executor::execute_named`].
pub enum NamedArgs<'a> {
    /// A plain name-to-value map.
    Map(&'a mut ParamMap),

    /// A richer source that may carry its own type information.
    Source(&'a dyn ParameterSource),
}

impl<'a> From<&'a mut ParamMap> for NamedArgs<'a> {
    #[inline]
    fn from(map: &'a mut ParamMap) -> Self {
        NamedArgs::Map(map)
    }
}

impl std::fmt::Debug for NamedArgs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamedArgs::Map(map) => f.debug_tuple("Map").field(map).finish(),
            NamedArgs::Source(source) => f
                .debug_tuple("Source")
                .field(&source.parameter_names())
                .finish(),
        }
    }
}

/// A structured source of named parameter values.
///
/// The null policy does not look inside these; a call made with one is forwarded as-is.
pub trait ParameterSource {
    fn parameter_names(&self) -> Vec<&str>;

    /// Returns `None` if the source has no parameter called `name`.
    fn value(&self, name: &str) -> Option<&Value>;

    /// The declared SQL type of `name`, or [`SqlType::Unknown`].
    fn sql_type(&self, _name: &str) -> SqlType {
        SqlType::Unknown
    }
}

/// A [`ParameterSource`] backed by a map, with optional per-name declared types.
#[derive(Debug, Clone, Default)]
pub struct MapParameterSource {
    values: ParamMap,
    types: HashMap<String, SqlType>,
}

impl MapParameterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn add_typed_value(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        sql_type: SqlType,
    ) -> Self {
        let name = name.into();
        self.types.insert(name.clone(), sql_type);
        self.values.insert(name, value.into());
        self
    }
}

impl From<ParamMap> for MapParameterSource {
    fn from(values: ParamMap) -> Self {
        Self {
            values,
            types: HashMap::new(),
        }
    }
}

impl ParameterSource for MapParameterSource {
    fn parameter_names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn sql_type(&self, name: &str) -> SqlType {
        self.types.get(name).copied().unwrap_or(SqlType::Unknown)
    }
}
