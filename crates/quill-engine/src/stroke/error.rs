use thiserror::Error;

/// Errors raised by stroke lifecycle calls.
///
/// These are caller errors: the engine guards against them, logs and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StrokeError {
    /// An ingest, commit or cancel arrived while no stroke was active.
    #[error("no active stroke for {op}")]
    NoActiveStroke { op: &'static str },
}
