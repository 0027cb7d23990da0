use crate::diagnostic::{DiagnosticRecord, ParamTarget};
use crate::executor::NamedArgs;
use crate::policy;
use crate::type_info::SqlType;
use crate::value::{ParamMap, Value};

/// An argument collection the null policy knows how to rewrite.
///
/// Built by one of the classification constructors, which return `None` for any call the
/// policy must leave alone. Nothing downstream looks at the raw arguments again.
#[derive(Debug)]
pub enum CallShape<'c> {
    /// Positional arguments with no declared types.
    SingleExec(&'c mut [Value]),

    /// Rows of positional arguments, with a declared type per column.
    BatchExec {
        rows: &'c mut [Vec<Value>],
        declared_types: &'c [SqlType],
    },

    /// A plain map of named arguments.
    NamedExec(&'c mut ParamMap),
}

impl<'c> CallShape<'c> {
    /// Classifies a single execution.
    ///
    /// Declared types are the caller's explicit contract, so a call that has them is not
    /// rewritten at all.
    pub fn single(args: &'c mut [Value], declared_types: Option<&[SqlType]>) -> Option<Self> {
        match declared_types {
            Some(_) => None,
            None => Some(CallShape::SingleExec(args)),
        }
    }

    /// Classifies a batch execution. Batches without declared types are left alone.
    pub fn batch(
        rows: &'c mut [Vec<Value>],
        declared_types: Option<&'c [SqlType]>,
    ) -> Option<Self> {
        declared_types.map(|declared_types| CallShape::BatchExec {
            rows,
            declared_types,
        })
    }

    /// Classifies a named execution. Only a plain map is rewritten.
    pub fn named(params: &'c mut NamedArgs<'_>) -> Option<Self> {
        match params {
            NamedArgs::Map(map) => Some(CallShape::NamedExec(&mut **map)),
            NamedArgs::Source(_) => None,
        }
    }

    /// Replaces every untyped `NULL` with a typed one, in place.
    ///
    /// `report` is called once per replaced value, in parameter order. Returns the number of
    /// values replaced. The number and order of arguments never change.
    pub fn normalize(self, mut report: impl FnMut(DiagnosticRecord)) -> usize {
        let mut rewritten = 0;

        let mut slot = |value: &mut Value, declared: Option<SqlType>, target: ParamTarget| {
            let resolution = policy::resolve(value, declared);

            if resolution.needs_rewrite {
                *value = Value::TypedNull(resolution.sql_type);
                rewritten += 1;
                report(DiagnosticRecord::null(
                    target,
                    resolution.sql_type,
                    resolution.source,
                ));
            }
        };

        match self {
            CallShape::SingleExec(args) => {
                for (index, value) in args.iter_mut().enumerate() {
                    slot(value, None, ParamTarget::Position(index + 1));
                }
            }

            CallShape::BatchExec {
                rows,
                declared_types,
            } => {
                for (row, values) in rows.iter_mut().enumerate() {
                    for (index, value) in values.iter_mut().enumerate() {
                        // a row longer than `declared_types` falls back for the extra columns
                        let declared = declared_types.get(index).copied();

                        slot(
                            value,
                            declared,
                            ParamTarget::Batch {
                                row,
                                position: index + 1,
                            },
                        );
                    }
                }
            }

            CallShape::NamedExec(map) => {
                for (name, value) in map.iter_mut() {
                    slot(value, None, ParamTarget::Name(name.clone()));
                }
            }
        }

        rewritten
    }
}
