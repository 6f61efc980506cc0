use thiserror::Error;

#[derive(Debug, Error)]
pub enum BarError {
    /// An optional backend method was called without checking `supports` first.
    #[error("backend \"{backend}\" does not provide {capability}")]
    Unsupported {
        backend: String,
        capability: &'static str,
    },

    #[error("backend output malformed: {0}")]
    Backend(String),

    #[error("unknown input sequence: {0}")]
    UnknownInput(String),
}
