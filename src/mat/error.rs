/// Errors that can occur while reading or writing MAT-files
#[derive(Debug, thiserror::Error)]
pub enum MatError {
    /// I/O error during file operations (including zlib streams)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Structurally invalid data, on either side of the codec
    #[error("Invalid MAT data: {0}")]
    InvalidData(String),

    /// Valid MAT-file feature that this codec does not handle
    #[error("Unsupported MAT feature: {0}")]
    Unsupported(String),
}

impl MatError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }
}
