use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown label set `{0}` (expected `en` or `pt`)")]
    UnknownLabelSet(String),

    #[error("failed to compile probe for label `{label}`")]
    InvalidPattern {
        label: &'static str,
        #[source]
        source: regex::Error,
    },
}
