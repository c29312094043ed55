mod onnx;
mod source;

use std::sync::OnceLock;

pub use onnx::OnnxClassifier;
#[cfg(feature = "embedded-model")]
pub use source::EMBEDDED_MODEL;
pub use source::ModelSource;

use crate::{
    config::ModelConfig,
    error::{Result, ServiceErr},
    features::FeatureVector,
};

/// Runs one forward pass for one sample.
///
/// Implementations must be callable from many request handlers at once.
pub trait Classifier: Send + Sync {
    /// Predicts the class index of `features`.
    ///
    /// # Arguments
    /// * `features` - The sample to classify.
    ///
    /// # Returns
    /// The class index emitted by the model or an `InferenceFailure`.
    fn classify(&self, features: &FeatureVector) -> Result<i64>;
}

/// Holds the process-wide model handle.
///
/// The handle is installed exactly once and only read afterwards; predicting before
/// that yields `ServiceErr::Uninitialized`.
#[derive(Default)]
pub struct Predictor {
    model: OnceLock<Box<dyn Classifier>>,
}

impl Predictor {
    /// Creates a new, uninitialized `Predictor`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the onnx model described by `cfg` and installs it.
    ///
    /// # Arguments
    /// * `cfg` - The model configuration.
    ///
    /// # Returns
    /// An `InitializationFailure` if the model can't be loaded or a model was already installed.
    pub fn initialize(&self, cfg: &ModelConfig) -> Result<()> {
        let classifier = OnnxClassifier::load(cfg)?;
        self.install(classifier)
    }

    /// Installs an already built classifier as the model handle.
    ///
    /// # Arguments
    /// * `classifier` - The classifier to serve predictions with.
    ///
    /// # Returns
    /// An `InitializationFailure` if a model was already installed.
    pub fn install<C: Classifier + 'static>(&self, classifier: C) -> Result<()> {
        self.model
            .set(Box::new(classifier))
            .map_err(|_| ServiceErr::init("install", "predictor is already initialized"))
    }

    /// Returns whether a model handle is installed.
    pub fn is_initialized(&self) -> bool {
        self.model.get().is_some()
    }

    /// Predicts the class index for one sample.
    ///
    /// # Arguments
    /// * `features` - The sample to classify.
    ///
    /// # Returns
    /// The class index, `Uninitialized` if no model is installed, or the
    /// classifier's `InferenceFailure`.
    pub fn predict(&self, features: &FeatureVector) -> Result<i64> {
        let model = self.model.get().ok_or(ServiceErr::Uninitialized)?;
        model.classify(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(i64);

    impl Classifier for Constant {
        fn classify(&self, _features: &FeatureVector) -> Result<i64> {
            Ok(self.0)
        }
    }

    const SAMPLE: FeatureVector = FeatureVector::new(5.1, 3.5, 1.4, 0.2);

    #[test]
    fn predict_before_initialization_is_uninitialized() {
        let predictor = Predictor::new();

        assert!(!predictor.is_initialized());
        assert!(matches!(
            predictor.predict(&SAMPLE),
            Err(ServiceErr::Uninitialized)
        ));
    }

    #[test]
    fn failed_initialization_leaves_predictor_unset() {
        let predictor = Predictor::new();
        let cfg = ModelConfig {
            source: ModelSource::File("/nonexistent/model.onnx".into()),
            ..ModelConfig::default()
        };

        assert!(predictor.initialize(&cfg).is_err());
        assert!(matches!(
            predictor.predict(&SAMPLE),
            Err(ServiceErr::Uninitialized)
        ));
    }

    #[test]
    fn installs_once() {
        let predictor = Predictor::new();

        predictor.install(Constant(2)).unwrap();
        assert_eq!(predictor.predict(&SAMPLE).unwrap(), 2);

        let err = predictor.install(Constant(0)).unwrap_err();
        assert!(matches!(err, ServiceErr::InitializationFailure { .. }));
        assert_eq!(predictor.predict(&SAMPLE).unwrap(), 2);
    }
}
