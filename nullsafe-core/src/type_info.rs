use std::fmt::{self, Display, Formatter};

/// The SQL type a parameter is bound as.
///
/// The named variants are the types the null policy knows how to talk about. Any other type
/// code a caller declares is carried through untouched as [`SqlType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SqlType {
    Varchar,
    NVarchar,
    Numeric,
    Integer,
    Timestamp,
    Clob,

    /// A declared type code outside of the named vocabulary.
    Other(i32),

    /// The caller did not say. Never bound as-is; resolved to the fallback type first.
    Unknown,
}

impl SqlType {
    /// The `java.sql.Types` code used by JDBC-style drivers for an unknown type.
    pub const UNKNOWN_CODE: i32 = i32::MIN;

    /// Maps a JDBC-style type code onto a `SqlType`.
    pub const fn from_code(code: i32) -> Self {
        match code {
            12 => SqlType::Varchar,
            -9 => SqlType::NVarchar,
            2 => SqlType::Numeric,
            4 => SqlType::Integer,
            93 => SqlType::Timestamp,
            2005 => SqlType::Clob,
            Self::UNKNOWN_CODE => SqlType::Unknown,
            other => SqlType::Other(other),
        }
    }

    /// The JDBC-style type code for this type.
    pub const fn code(&self) -> i32 {
        match self {
            SqlType::Varchar => 12,
            SqlType::NVarchar => -9,
            SqlType::Numeric => 2,
            SqlType::Integer => 4,
            SqlType::Timestamp => 93,
            SqlType::Clob => 2005,
            SqlType::Other(code) => *code,
            SqlType::Unknown => Self::UNKNOWN_CODE,
        }
    }

    #[inline]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, SqlType::Unknown)
    }

    /// Returns the name of this SQL type, as it would be written in SQL.
    ///
    /// Types outside of the named vocabulary have no name; see the `Display` impl.
    pub const fn name(&self) -> Option<&'static str> {
        Some(match self {
            SqlType::Varchar => "VARCHAR",
            SqlType::NVarchar => "NVARCHAR",
            SqlType::Numeric => "NUMERIC",
            SqlType::Integer => "INTEGER",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Clob => "CLOB",
            SqlType::Unknown => "UNKNOWN",
            SqlType::Other(_) => return None,
        })
    }
}

impl From<i32> for SqlType {
    #[inline]
    fn from(code: i32) -> Self {
        SqlType::from_code(code)
    }
}

impl Display for SqlType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.pad(name),
            None => f.pad(&self.code().to_string()),
        }
    }
}
