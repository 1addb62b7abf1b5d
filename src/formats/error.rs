/// Errors that can occur while reading a localisation file
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// I/O error reading the input file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error tokenising the tab-separated header line
    #[error("Header parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error parsing the XML header of a rapidSTORM file
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// Header line is absent or structurally invalid
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// Required column missing from a tab-separated header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Required field identifier missing from a rapidSTORM header
    #[error("Missing required rapidSTORM field: {0}")]
    MissingRequiredField(String),

    /// A body row could not be turned into a localisation
    #[error("Conversion failure at line {line}: {message}")]
    ConversionFailure {
        /// 1-based line number in the input file
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Unknown format discriminator
    #[error("Unknown localisation format '{0}' (expected 0/xyt, 1/rapidSTORM or 2/thunderstorm)")]
    UnknownFormat(String),
}

impl FormatError {
    pub(crate) fn conversion(line: usize, message: impl Into<String>) -> Self {
        Self::ConversionFailure {
            line,
            message: message.into(),
        }
    }
}
