use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use log::info;
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::ModelConfig,
    error::{Result, ServiceErr},
    features::{FeatureVector, NUM_FEATURES},
    inference::Predictor,
    labels,
};

/// One sample per class, with the species the model must predict for it.
pub const REFERENCE_SAMPLES: [(FeatureVector, &str); 3] = [
    (FeatureVector::new(5.1, 3.5, 1.4, 0.2), "Iris-setosa"),
    (FeatureVector::new(6.7, 3.0, 5.0, 1.7), "Iris-versicolor"),
    (FeatureVector::new(6.3, 2.9, 5.6, 1.8), "Iris-virginica"),
];

/// The outcome of classifying one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub features: FeatureVector,
    pub class: i64,
    pub species: &'static str,
    pub latency: Duration,
}

impl Prediction {
    /// Returns the inference latency in milliseconds, with three decimals.
    pub fn latency_ms(&self) -> String {
        format!("{:.3}", self.latency.as_secs_f64() * 1000.0)
    }
}

/// The result of running one reference sample.
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestCase {
    pub input: [f32; NUM_FEATURES],
    pub expected: &'static str,
    pub predicted: &'static str,
    pub status: &'static str,
}

impl SelfTestCase {
    pub fn passed(&self) -> bool {
        self.expected == self.predicted
    }
}

/// The results of running every reference sample through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestReport {
    pub overall_status: &'static str,
    pub tests: BTreeMap<String, SelfTestCase>,
}

impl SelfTestReport {
    pub fn all_passed(&self) -> bool {
        self.tests.values().all(SelfTestCase::passed)
    }
}

/// The request -> feature vector -> class index -> species pipeline.
///
/// It owns the model handle for the whole life of the process and is shared
/// read-only between request handlers.
pub struct PredictionService {
    predictor: Predictor,
    model_description: String,
}

impl PredictionService {
    /// Creates a new `PredictionService` over an initialized predictor.
    ///
    /// # Arguments
    /// * `predictor` - A predictor holding the model handle.
    /// * `model_description` - A human readable description of the model.
    ///
    /// # Returns
    /// The service, or `Uninitialized` if the predictor holds no model.
    pub fn new(predictor: Predictor, model_description: impl Into<String>) -> Result<Self> {
        if !predictor.is_initialized() {
            return Err(ServiceErr::Uninitialized);
        }

        Ok(Self {
            predictor,
            model_description: model_description.into(),
        })
    }

    /// Loads the configured model and builds the service on top of it.
    ///
    /// # Arguments
    /// * `cfg` - The model configuration.
    ///
    /// # Returns
    /// The service or the `InitializationFailure` that prevented the model from loading.
    pub fn from_config(cfg: &ModelConfig) -> Result<Self> {
        let predictor = Predictor::new();
        predictor.initialize(cfg)?;
        Self::new(predictor, cfg.description.clone())
    }

    pub fn model_description(&self) -> &str {
        &self.model_description
    }

    /// Classifies one sample.
    ///
    /// # Arguments
    /// * `features` - The sample to classify.
    ///
    /// # Returns
    /// The prediction or the error raised while running the model.
    pub fn predict(&self, features: FeatureVector) -> Result<Prediction> {
        let start = Instant::now();
        let class = self.predictor.predict(&features)?;
        let latency = start.elapsed();

        let prediction = Prediction {
            features,
            class,
            species: labels::resolve(class),
            latency,
        };

        let [sl, sw, pl, pw] = features.to_array();
        info!(
            class = class;
            "prediction: [{sl:.1}, {sw:.1}, {pl:.1}, {pw:.1}] -> {} ({} ms)",
            prediction.species,
            prediction.latency_ms()
        );

        Ok(prediction)
    }

    /// Validates an untyped request payload and classifies it.
    ///
    /// # Arguments
    /// * `payload` - The parsed request body.
    ///
    /// # Returns
    /// The prediction, an `InvalidInput` error if the payload is malformed, or the
    /// error raised while running the model.
    pub fn predict_json(&self, payload: &Value) -> Result<Prediction> {
        let features = FeatureVector::from_json(payload)?;
        self.predict(features)
    }

    /// Runs every reference sample and compares the predicted species with the expected one.
    ///
    /// # Returns
    /// The report, or the first error raised while running the model.
    pub fn self_test(&self) -> Result<SelfTestReport> {
        let mut tests = BTreeMap::new();

        for (i, (features, expected)) in REFERENCE_SAMPLES.into_iter().enumerate() {
            let class = self.predictor.predict(&features)?;
            let predicted = labels::resolve(class);
            let status = if predicted == expected { "PASS" } else { "FAIL" };

            tests.insert(
                format!("test_{}", i + 1),
                SelfTestCase {
                    input: features.to_array(),
                    expected,
                    predicted,
                    status,
                },
            );
        }

        let mut report = SelfTestReport {
            overall_status: "ALL TESTS PASSED",
            tests,
        };
        if !report.all_passed() {
            report.overall_status = "SOME TESTS FAILED";
        }

        info!("self test: {}", report.overall_status);
        Ok(report)
    }
}

impl Drop for PredictionService {
    fn drop(&mut self) {
        info!("service closed");
    }
}
