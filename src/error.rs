use std::{error::Error, fmt};

/// The iris server's result type.
pub type Result<T> = std::result::Result<T, ServiceErr>;

/// Failures along the feature adapter -> inference -> label pipeline.
#[derive(Debug)]
pub enum ServiceErr {
    /// The request payload is malformed or incomplete.
    InvalidInput(String),
    /// Inference was requested before a model was loaded.
    Uninitialized,
    /// The runtime failed while running the forward pass.
    InferenceFailure(String),
    /// The model artifact could not be obtained or turned into a session.
    InitializationFailure { stage: &'static str, reason: String },
}

impl ServiceErr {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn init(stage: &'static str, reason: impl fmt::Display) -> Self {
        Self::InitializationFailure {
            stage,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn inference(reason: impl fmt::Display) -> Self {
        Self::InferenceFailure(reason.to_string())
    }
}

impl fmt::Display for ServiceErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Uninitialized => {
                write!(f, "model not initialized, initialize the predictor first")
            }
            Self::InferenceFailure(reason) => write!(f, "inference failed: {reason}"),
            Self::InitializationFailure { stage, reason } => {
                write!(f, "model initialization failed at {stage}: {reason}")
            }
        }
    }
}

impl Error for ServiceErr {}
