use std::fmt;

/// The kind of failure that occurred. See spec.md §7 for the exact policy
/// attached to each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Disk read failed while loading an index file.
    Io,
    /// `document_count` in the primary key file exceeded the 55M ceiling.
    TooManyDocuments,
    /// A requested `top_k` or `accumulator_width` exceeded its configured limit.
    TooLarge,
    /// The caller passed a version other than 1 or 2 to the loader.
    BadIndexVersion,
    /// An operation was attempted before an index was successfully loaded.
    NoIndex,
    /// The postings file's codec identifier byte did not match a known codec.
    UnknownCodec,
    /// A file's binary layout did not match what its version implies.
    Malformed,
    /// A byte sequence could not be decoded by the addressed codec.
    Parse,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error {
            kind,
            context: context.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
