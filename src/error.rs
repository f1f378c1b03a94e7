use thiserror::Error;

/// Errors from building a Region or calling a clipping operation.
///
/// These mean the caller passed something nonsensical. Odd *data* (lines that
/// graze the boundary, slivers, zero-length pieces) never errors: the
/// degenerate piece is dropped instead.
#[derive(Debug, Error, PartialEq)]
pub enum ClipError {
    #[error("Cannot clip a {0}; pass a LineString or Polygon instead")]
    UnsupportedGeometry(&'static str),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type ClipResult<T> = Result<T, ClipError>;
