use std::borrow::Cow;
use std::error::Error as StdError;
use std::result::Result as StdResult;

/// A specialized `Result` type for nullsafe.
pub type Result<T> = StdResult<T, Error>;

// Convenience type alias for usage within nullsafe.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// Represents all the ways a wrapped call can fail.
///
/// The interceptor and the safe setter never produce an error of their own while binding:
/// anything returned from a wrapped [`Executor`](crate::executor::Executor) or
/// [`Statement`](crate::statement::Statement) is handed back to the caller as-is.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error occurred while loading or parsing [`NullSafeOptions`](crate::NullSafeOptions).
    #[error("error with configuration: {0}")]
    Configuration(#[source] BoxDynError),

    /// Error returned from the database driver.
    #[error("error returned from database: {0}")]
    Database(Box<dyn DatabaseError>),

    /// A bind position was outside of the statement's parameters.
    ///
    /// Positions are 1-based, so `0` is always out of bounds.
    #[error("parameter index out of bounds: the len is {len}, but the index is {index}")]
    ParameterIndexOutOfBounds { index: usize, len: usize },
}

impl Error {
    #[inline]
    pub fn config(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Configuration(err.into())
    }

    /// Returns a reference to the database error, if this is one.
    pub fn as_database_error(&self) -> Option<&(dyn DatabaseError + 'static)> {
        match self {
            Error::Database(e) => Some(&**e),
            _ => None,
        }
    }
}

/// An error that was returned from the database.
pub trait DatabaseError: 'static + Send + Sync + StdError {
    /// The primary, human-readable error message.
    fn message(&self) -> &str;

    /// The vendor error code, e.g. `ORA-17004`.
    fn code(&self) -> Option<Cow<'_, str>> {
        None
    }
}

impl<E> From<E> for Error
where
    E: DatabaseError,
{
    #[inline]
    fn from(error: E) -> Self {
        Error::Database(Box::new(error))
    }
}
