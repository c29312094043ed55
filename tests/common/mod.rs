#![allow(dead_code)]

use std::{thread, time::Duration};

use iris_server::{Classifier, FeatureVector, PredictionService, Predictor, ServiceErr};
use parking_lot::Mutex;

/// Splits the reference samples by petal length, like a well trained model would.
pub struct PetalRule;

impl Classifier for PetalRule {
    fn classify(&self, features: &FeatureVector) -> Result<i64, ServiceErr> {
        Ok(match features.petal_length {
            l if l < 2.5 => 0,
            l if l < 5.3 => 1,
            _ => 2,
        })
    }
}

/// Always fails the forward pass.
pub struct Broken;

impl Classifier for Broken {
    fn classify(&self, _features: &FeatureVector) -> Result<i64, ServiceErr> {
        Err(ServiceErr::InferenceFailure("tensor shape mismatch".to_string()))
    }
}

/// Mimics a runtime session that needs exclusive access: the input is staged in a
/// shared buffer, and read back after a pause to produce the output.
pub struct StagedEcho {
    staging: Mutex<[f32; 4]>,
}

impl StagedEcho {
    pub fn new() -> Self {
        Self {
            staging: Mutex::new([0.0; 4]),
        }
    }
}

impl Classifier for StagedEcho {
    fn classify(&self, features: &FeatureVector) -> Result<i64, ServiceErr> {
        let mut staging = self.staging.lock();
        *staging = features.to_array();
        thread::sleep(Duration::from_micros(200));
        Ok(staging[0] as i64)
    }
}

pub fn service_with<C: Classifier + 'static>(classifier: C) -> PredictionService {
    let predictor = Predictor::new();
    predictor.install(classifier).unwrap();
    PredictionService::new(predictor, "RandomForest with StandardScaler").unwrap()
}
