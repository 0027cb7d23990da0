//! The null normalization policy.
//!
//! This is the only place that decides what type an unannotated `NULL` is bound as. Both the
//! [interceptor](crate::interceptor) and the [safe setter](crate::setter) go through it.

use crate::type_info::SqlType;
use crate::value::Value;

/// The type assumed for a `NULL` when the caller declared nothing usable.
pub const FALLBACK_TYPE: SqlType = SqlType::Varchar;

/// Where a resolved type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSource {
    /// The caller declared it for this position or column.
    Declared,

    /// Nothing (or [`SqlType::Unknown`]) was declared.
    ///
    /// A `NULL` is bound as [`FALLBACK_TYPE`]; a value is handed to the driver as-is.
    Fallback,
}

/// The policy's decision for one parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// `true` iff the value is an untyped `NULL` and must be replaced before binding.
    pub needs_rewrite: bool,
    pub sql_type: SqlType,
    pub source: TypeSource,
}

/// Decides whether `value` must be rewritten and what type it resolves to.
///
/// [`Value::Null`] and a [`Value::TypedNull`] of [`SqlType::Unknown`] need a rewrite. Any other
/// typed null already says what it is and is left alone, so normalizing twice never wraps a
/// marker in another marker.
pub fn resolve(value: &Value, declared: Option<SqlType>) -> Resolution {
    let (sql_type, source) = resolve_type(declared);

    Resolution {
        needs_rewrite: value.is_untyped_null(),
        sql_type,
        source,
    }
}

/// Resolves a possibly-missing declared type against the fallback.
pub fn resolve_type(declared: Option<SqlType>) -> (SqlType, TypeSource) {
    match declared {
        Some(ty) if !ty.is_unknown() => (ty, TypeSource::Declared),
        _ => (FALLBACK_TYPE, TypeSource::Fallback),
    }
}
