use std::fmt::{self, Display, Formatter};

use crate::policy::TypeSource;
use crate::type_info::SqlType;

/// Which parameter a [`DiagnosticRecord`] is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamTarget {
    /// A positional parameter. 1-based, as in `?` placeholders.
    Position(usize),

    /// A positional parameter within one row of a batch.
    ///
    /// `row` is the 0-based index into the batch; `position` is 1-based.
    Batch { row: usize, position: usize },

    /// A named parameter.
    Name(String),
}

impl Display for ParamTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParamTarget::Position(position) => write!(f, "Param #{position}"),
            ParamTarget::Batch { row, position } => write!(f, "Row {row} param #{position}"),
            ParamTarget::Name(name) => write!(f, "Named param '{name}'"),
        }
    }
}

/// What happened to one parameter.
///
/// Records are produced in parameter order and handed straight to a [`DiagnosticSink`]; they
/// are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub target: ParamTarget,
    pub sql_type: SqlType,
    pub source: TypeSource,
    pub is_null: bool,

    /// An abbreviated rendering of a non-null value. Always `None` for nulls.
    pub preview: Option<String>,
}

impl DiagnosticRecord {
    pub fn null(target: ParamTarget, sql_type: SqlType, source: TypeSource) -> Self {
        Self {
            target,
            sql_type,
            source,
            is_null: true,
            preview: None,
        }
    }

    pub fn value(
        target: ParamTarget,
        sql_type: SqlType,
        source: TypeSource,
        preview: String,
    ) -> Self {
        Self {
            target,
            sql_type,
            source,
            is_null: false,
            preview: Some(preview),
        }
    }
}

/// Receives a [`DiagnosticRecord`] for every parameter the null policy touches.
///
/// The sink decides where records go and how they look; [`TracingSink`](crate::TracingSink)
/// is the default.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, record: &DiagnosticRecord);

    /// Returns `false` if records for non-null values would be thrown away.
    ///
    /// Checked before a value preview is rendered.
    fn wants_values(&self) -> bool {
        true
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&DiagnosticRecord) + Send + Sync,
{
    #[inline]
    fn emit(&self, record: &DiagnosticRecord) {
        self(record)
    }
}
