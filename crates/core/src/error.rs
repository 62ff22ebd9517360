use crate::types::FrameIndex;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to decode frames: {0}")]
    Decode(String),

    #[error("Frame index {index} out of range for sequence of {len} frames")]
    IndexOutOfRange { index: FrameIndex, len: usize },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Decode(err.to_string())
    }
}
