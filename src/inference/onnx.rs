use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
};

use log::{debug, info};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use parking_lot::Mutex;

use super::Classifier;
use crate::{
    config::ModelConfig,
    error::{Result, ServiceErr},
    features::{FeatureVector, NUM_FEATURES},
};

/// A classifier backed by ONNX Runtime.
///
/// Running a session needs exclusive access to it, so every session lives behind its own
/// lock and calls are spread round-robin across the pool.
pub struct OnnxClassifier {
    sessions: Vec<Mutex<Session>>,
    next_idx: AtomicUsize,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    /// Loads the model described by `cfg` and builds its session pool.
    ///
    /// # Arguments
    /// * `cfg` - The model configuration.
    ///
    /// # Returns
    /// A ready classifier or an `InitializationFailure` if the artifact can't be read,
    /// isn't a valid model or doesn't expose the configured input and output.
    pub fn load(cfg: &ModelConfig) -> Result<Self> {
        let model = cfg.source.load()?;
        info!(
            bytes = model.len(),
            sessions = cfg.sessions.get();
            "loading onnx model from {}", cfg.source
        );

        let sessions = (0..cfg.sessions.get())
            .map(|_| -> Result<Mutex<Session>> {
                let session = Self::build_session(&model, cfg.intra_threads)?;
                Self::check_signature(&session, cfg)?;
                Ok(Mutex::new(session))
            })
            .collect::<Result<Vec<_>>>()?;

        info!("model loaded & ready for predictions");

        Ok(Self {
            sessions,
            next_idx: AtomicUsize::new(0),
            input_name: cfg.input_name.clone(),
            output_name: cfg.output_name.clone(),
        })
    }

    /// Returns the amount of sessions in the pool.
    pub fn sessions(&self) -> usize {
        self.sessions.len()
    }

    fn build_session(model: &[u8], intra_threads: Option<NonZeroUsize>) -> Result<Session> {
        let mut builder = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .map_err(|e| ServiceErr::init("session_builder", e))?;

        if let Some(threads) = intra_threads {
            builder = builder
                .with_intra_threads(threads.get())
                .map_err(|e| ServiceErr::init("session_builder", e))?;
        }

        builder
            .commit_from_memory(model)
            .map_err(|e| ServiceErr::init("load_model", e))
    }

    fn check_signature(session: &Session, cfg: &ModelConfig) -> Result<()> {
        if !session.inputs.iter().any(|i| i.name == cfg.input_name) {
            return Err(ServiceErr::init(
                "check_signature",
                format!("model has no input named `{}`", cfg.input_name),
            ));
        }

        if !session.outputs.iter().any(|o| o.name == cfg.output_name) {
            return Err(ServiceErr::init(
                "check_signature",
                format!("model has no output named `{}`", cfg.output_name),
            ));
        }

        Ok(())
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<i64> {
        let row = features.to_array();
        let input = TensorRef::from_array_view((vec![1_i64, NUM_FEATURES as i64], &row[..]))
            .map_err(ServiceErr::inference)?;

        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        debug!(session = idx; "running forward pass");

        let mut session = self.sessions[idx].lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(ServiceErr::inference)?;

        let labels = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            ServiceErr::inference(format!("missing output `{}`", self.output_name))
        })?;
        let (_, labels) = labels
            .try_extract_tensor::<i64>()
            .map_err(ServiceErr::inference)?;

        labels
            .first()
            .copied()
            .ok_or_else(|| ServiceErr::inference("model returned an empty label tensor"))
    }
}
