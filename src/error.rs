/// Errors raised while decoding the packed cell pool
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("truncated cell record: {len} bytes is not a multiple of 12")]
    TruncatedRecord { len: usize },

    #[error("unexpected end of data: need {need} bytes, have {have}")]
    UnexpectedEof { need: usize, have: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("parse error at line {line}, column {column}: {message}")]
    Parse { line: usize, column: usize, message: String },

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("sub-resource not found: {0}")]
    SubResourceNotFound(String),

    #[error("{owner} has no property {property:?}")]
    MissingProperty { owner: String, property: String },

    #[error("property {property:?} is not {expected}")]
    InvalidProperty { property: String, expected: &'static str },

    #[error("tile data value out of 32-bit range: {0}")]
    TileDataOutOfRange(i64),

    #[error("invalid source id in property key {0:?}")]
    InvalidSourceId(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
