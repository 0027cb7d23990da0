//! The interceptor: an [`Executor`] that types every `NULL` before the real one sees it.

use std::sync::Arc;

use crate::diagnostic::DiagnosticSink;
use crate::error::Result;
use crate::executor::{Executor, NamedArgs, QueryResult};
use crate::options::NullSafeOptions;
use crate::setter::SafeSetter;
use crate::shape::CallShape;
use crate::type_info::SqlType;
use crate::value::Value;

/// Wraps an [`Executor`] so that untyped `NULL` arguments are rewritten into
/// [`Value::TypedNull`] before the call is forwarded.
///
/// | call | rewritten when | type used |
/// |---|---|---|
/// | [`execute`](Executor::execute) | no declared types | `VARCHAR` |
/// | [`execute_batch`](Executor::execute_batch) | declared types present | declared type for the column, else `VARCHAR` |
/// | [`execute_named`](Executor::execute_named) | [`NamedArgs::Map`] | `VARCHAR` |
///
/// Every other call is forwarded untouched. The inner executor is called exactly once per
/// call and whatever it returns, success or error, is returned unchanged.
///
/// Rewriting happens in place: the caller's slice, rows or map holds the typed nulls after
/// the call returns.
#[derive(Debug)]
pub struct NullSafe<E> {
    inner: E,
    setter: SafeSetter,
}

impl<E: Executor> NullSafe<E> {
    /// Wraps `inner`, logging through a [`TracingSink`](crate::TracingSink).
    pub fn new(inner: E, options: NullSafeOptions) -> Self {
        Self::with_setter(inner, SafeSetter::new(options))
    }

    /// Wraps `inner`, sending every diagnostic record to `sink`.
    pub fn with_sink(inner: E, options: NullSafeOptions, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_setter(inner, SafeSetter::with_sink(options, sink))
    }

    /// Wraps `inner`, sharing options and sink with `setter`.
    ///
    /// Use this when the inner executor binds through a clone of the same [`SafeSetter`].
    pub fn with_setter(inner: E, setter: SafeSetter) -> Self {
        Self { inner, setter }
    }

    pub fn options(&self) -> &NullSafeOptions {
        self.setter.options()
    }

    /// The safe setter sharing this interceptor's options and sink.
    pub fn setter(&self) -> &SafeSetter {
        &self.setter
    }

    pub fn get_ref(&self) -> &E {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn normalize(&self, shape: Option<CallShape<'_>>) {
        let Some(shape) = shape else {
            return;
        };

        let rewritten = shape.normalize(|record| self.setter.report(|| record));

        if rewritten > 0 {
            tracing::trace!(
                target: "nullsafe::interceptor",
                rewritten,
                "rewrote untyped NULL arguments"
            );
        }
    }
}

impl<E: Executor> Executor for NullSafe<E> {
    fn execute(
        &mut self,
        sql: &str,
        args: &mut [Value],
        declared_types: Option<&[SqlType]>,
    ) -> Result<QueryResult> {
        self.normalize(CallShape::single(args, declared_types));

        self.inner.execute(sql, args, declared_types)
    }

    fn execute_batch(
        &mut self,
        sql: &str,
        rows: &mut [Vec<Value>],
        declared_types: Option<&[SqlType]>,
    ) -> Result<Vec<QueryResult>> {
        self.normalize(CallShape::batch(rows, declared_types));

        self.inner.execute_batch(sql, rows, declared_types)
    }

    fn execute_named(&mut self, sql: &str, mut params: NamedArgs<'_>) -> Result<QueryResult> {
        self.normalize(CallShape::named(&mut params));

        self.inner.execute_named(sql, params)
    }
}
