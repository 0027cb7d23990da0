use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::diagnostic::{DiagnosticRecord, DiagnosticSink, ParamTarget};
use crate::error::Result;
use crate::logger::TracingSink;
use crate::options::NullSafeOptions;
use crate::policy::{self, TypeSource};
use crate::statement::Statement;
use crate::type_info::SqlType;
use crate::value::Value;

/// Binds single parameters without ever handing an untyped `NULL` to the driver.
///
/// Cheap to clone; clones share the same sink.
#[derive(Clone)]
pub struct SafeSetter {
    options: NullSafeOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl SafeSetter {
    /// Creates a setter that logs through a [`TracingSink`] configured from `options`.
    pub fn new(options: NullSafeOptions) -> Self {
        let sink = TracingSink::from_options(&options);
        Self::with_sink(options, Arc::new(sink))
    }

    pub fn with_sink(options: NullSafeOptions, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { options, sink }
    }

    pub fn options(&self) -> &NullSafeOptions {
        &self.options
    }

    /// Binds `value` at the 1-based `position` of `stmt`.
    ///
    /// A `NULL` goes through [`Statement::bind_null`] with `sql_type`, or `VARCHAR` when
    /// `sql_type` is [`SqlType::Unknown`]; a [`Value::TypedNull`] keeps its own type unless that
    /// is unknown as well. Anything else goes through [`Statement::bind_value`] unchanged.
    ///
    /// Errors from the statement are returned as-is and nothing is reported for a failed bind.
    pub fn bind<S>(
        &self,
        stmt: &mut S,
        position: usize,
        sql_type: SqlType,
        value: &Value,
    ) -> Result<()>
    where
        S: Statement + ?Sized,
    {
        if value.is_null() {
            let declared = match value.null_type() {
                Some(ty) if !ty.is_unknown() => ty,
                _ => sql_type,
            };

            let (resolved, source) = policy::resolve_type(Some(declared));

            stmt.bind_null(position, resolved)?;

            self.report(|| {
                DiagnosticRecord::null(ParamTarget::Position(position), resolved, source)
            });

            return Ok(());
        }

        stmt.bind_value(position, sql_type, value)?;

        if self.options.logging_enabled && self.sink.wants_values() {
            let source = if sql_type.is_unknown() {
                TypeSource::Fallback
            } else {
                TypeSource::Declared
            };

            self.sink.emit(&DiagnosticRecord::value(
                ParamTarget::Position(position),
                sql_type,
                source,
                value.preview(self.options.preview_len),
            ));
        }

        Ok(())
    }

    /// Binds a whole row of positional values, starting at position 1.
    ///
    /// `declared_types[i]` is used for position `i + 1`; positions past its end are bound as
    /// [`SqlType::Unknown`]. Stops at the first failed bind.
    pub fn bind_all<S>(
        &self,
        stmt: &mut S,
        values: &[Value],
        declared_types: Option<&[SqlType]>,
    ) -> Result<()>
    where
        S: Statement + ?Sized,
    {
        for (index, value) in values.iter().enumerate() {
            let sql_type = declared_types
                .and_then(|types| types.get(index))
                .copied()
                .unwrap_or(SqlType::Unknown);

            self.bind(stmt, index + 1, sql_type, value)?;
        }

        Ok(())
    }

    pub(crate) fn report(&self, record: impl FnOnce() -> DiagnosticRecord) {
        if self.options.logging_enabled {
            self.sink.emit(&record());
        }
    }
}

impl Default for SafeSetter {
    fn default() -> Self {
        Self::new(NullSafeOptions::default())
    }
}

impl Debug for SafeSetter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeSetter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
