use super::ids::FourCC;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to open {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("source is not a readable RIFF stream: {0}")]
    Unreadable(#[source] io::Error),

    #[error("no RIFF form of type {form_type} at the top level")]
    FormNotFound { form_type: FourCC },

    #[error("chunk {id} not found in the current scope")]
    NotFound { id: FourCC },

    #[error("no further chunk in the current scope (offset {offset:#x})")]
    Exhausted { offset: u64 },

    #[error("malformed chunk at offset {offset:#x}: {reason}")]
    Malformed { offset: u64, reason: &'static str },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("navigator is closed")]
    Closed,

    #[error("no chunk is currently open")]
    NoChunk,

    #[error("read requested with an empty buffer")]
    ZeroLengthRead,
}

impl Error {
    /// True for failures of a search that left the navigator untouched and
    /// can be retried with another code.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::FormNotFound { .. }
                | Error::Exhausted { .. }
        )
    }
}

impl Error {
    /// True for the failures that keep a reader from being constructed.
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            Error::Open { .. } | Error::Unreadable(_) | Error::FormNotFound { .. }
        )
    }

    // Takes back an error that went through the `io::Read` impl.
    pub(crate) fn from_io(e: io::Error) -> Error {
        if !e.get_ref().map_or(false, |inner| inner.is::<Error>()) {
            return Error::Io(e);
        }
        match e.into_inner().map(|inner| inner.downcast::<Error>()) {
            Some(Ok(e)) => *e,
            Some(Err(inner)) => {
                Error::Io(io::Error::new(io::ErrorKind::Other, inner))
            }
            None => Error::Io(io::ErrorKind::Other.into()),
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        match e {
            Error::Io(e) => e,
            e => io::Error::new(io::ErrorKind::Other, e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
