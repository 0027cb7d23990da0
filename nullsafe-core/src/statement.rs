use crate::error::Result;
use crate::type_info::SqlType;
use crate::value::Value;

/// The native bind operations of a prepared statement.
///
/// Positions are 1-based. Implementations are free to reject a [`Value::Null`] passed to
/// [`bind_value`](Statement::bind_value); drivers that need a type for every `NULL` do exactly
/// that, which is what [`SafeSetter`](crate::SafeSetter) exists to avoid.
pub trait Statement {
    /// Binds SQL `NULL` of exactly `sql_type` at `position`.
    fn bind_null(&mut self, position: usize, sql_type: SqlType) -> Result<()>;

    /// Binds `value` at `position`, converting it according to `sql_type`.
    fn bind_value(&mut self, position: usize, sql_type: SqlType, value: &Value) -> Result<()>;
}

impl<S: Statement + ?Sized> Statement for &'_ mut S {
    #[inline]
    fn bind_null(&mut self, position: usize, sql_type: SqlType) -> Result<()> {
        (**self).bind_null(position, sql_type)
    }

    #[inline]
    fn bind_value(&mut self, position: usize, sql_type: SqlType, value: &Value) -> Result<()> {
        (**self).bind_value(position, sql_type, value)
    }
}
