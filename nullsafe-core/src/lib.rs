//! Core of nullsafe. Not intended to be used directly.
#![deny(unsafe_code)]
#![warn(future_incompatible, rust_2018_idioms)]

#[macro_use]
pub mod logger;

pub mod diagnostic;
pub mod error;
pub mod executor;
pub mod interceptor;
pub mod options;
pub mod policy;
pub mod setter;
pub mod shape;
pub mod statement;
pub mod type_info;
pub mod value;

#[doc(inline)]
pub use self::{
    diagnostic::{DiagnosticRecord, DiagnosticSink, ParamTarget},
    error::{BoxDynError, DatabaseError, Error, Result},
    executor::{Executor, MapParameterSource, NamedArgs, ParameterSource, QueryResult},
    interceptor::NullSafe,
    logger::TracingSink,
    options::NullSafeOptions,
    policy::{Resolution, TypeSource, FALLBACK_TYPE},
    setter::SafeSetter,
    shape::CallShape,
    statement::Statement,
    type_info::SqlType,
    value::{ParamMap, Value},
};

// there are a few consistently named lifetimes used
// throughout this project:

// 'a = Arguments
// 'c = Call
