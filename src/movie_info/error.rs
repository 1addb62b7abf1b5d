/// Errors that can occur while assembling the movieInfo structure
#[derive(Debug, thiserror::Error)]
pub enum MovieInfoError {
    /// No localisations at all, so there is no frame range to allocate
    #[error("No localisations to convert: input is empty")]
    EmptyInput,

    /// A localisation could not be turned into an output tuple
    #[error("Conversion failure in frame {frame}: {message}")]
    ConversionFailure {
        /// Frame of the offending localisation
        frame: u32,
        /// What went wrong
        message: String,
    },
}
