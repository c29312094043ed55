pub mod config;
pub mod error;
pub mod features;
pub mod http;
pub mod inference;
pub mod labels;
pub mod service;

pub use config::{ModelConfig, ServiceConfig};
pub use error::ServiceErr;
pub use features::FeatureVector;
pub use inference::{Classifier, ModelSource, OnnxClassifier, Predictor};
pub use service::{Prediction, PredictionService, REFERENCE_SAMPLES};
