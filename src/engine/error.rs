use thiserror::Error;

/// Everything that can go wrong between "child taps a module" and "content
/// on screen". Each failure class is a variant so callers never have to
/// sniff message text to tell them apart.
#[derive(Debug, Clone, Error)]
pub enum ContentError {
    #[error("no API key is configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response envelope from the API")]
    Envelope,

    #[error("response was not valid JSON: {0}")]
    Parse(String),

    #[error("response failed validation: {0}")]
    Validation(String),

    #[error("module is not offered for this age")]
    ModuleUnavailable,
}

impl ContentError {
    /// The message shown to the child. Specifics go to the log instead.
    pub fn child_message(&self) -> &'static str {
        match self {
            ContentError::MissingApiKey => {
                "Ask a grown-up to add the magic key in Settings first!"
            }
            _ => "Oops! Something went wrong. Could not load the module content. Please try again.",
        }
    }
}
