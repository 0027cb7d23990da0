#![doc = include_str!("../README.md")]

// Modules
pub use nullsafe_core::{
    diagnostic, error, executor, interceptor, options, policy, setter, shape, statement,
    type_info, value,
};

// Types
pub use nullsafe_core::{
    CallShape, DatabaseError, DiagnosticRecord, DiagnosticSink, Error, Executor,
    MapParameterSource, NamedArgs, NullSafe, NullSafeOptions, ParamMap, ParamTarget,
    ParameterSource, QueryResult, Resolution, Result, SafeSetter, SqlType, Statement,
    TracingSink, TypeSource, Value, FALLBACK_TYPE,
};

/// Convenience re-export of common traits and the interceptor.
pub mod prelude {
    pub use super::{Executor, NullSafe, NullSafeOptions, SafeSetter, SqlType, Statement, Value};
}
