use std::{env, num::NonZeroUsize, path::PathBuf, str::FromStr};

use crate::inference::ModelSource;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 7070;
const DEFAULT_INPUT_NAME: &str = "float_input";
const DEFAULT_OUTPUT_NAME: &str = "output_label";
const DEFAULT_MODEL_DESCRIPTION: &str = "RandomForest with StandardScaler";

/// Where and how the classifier model is loaded.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub source: ModelSource,
    pub input_name: String,
    pub output_name: String,
    pub description: String,
    pub sessions: NonZeroUsize,
    pub intra_threads: Option<NonZeroUsize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            source: ModelSource::default(),
            input_name: DEFAULT_INPUT_NAME.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            description: DEFAULT_MODEL_DESCRIPTION.to_string(),
            sessions: NonZeroUsize::MIN,
            intra_threads: None,
        }
    }
}

/// Immutable settings of a running iris server.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub http_workers: Option<NonZeroUsize>,
    pub model: ModelConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            http_workers: None,
            model: ModelConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Returns
    /// The configuration, or a message naming the variable holding an invalid value.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration out of an arbitrary variable lookup.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, if set.
    ///
    /// # Returns
    /// The configuration, or a message naming the variable holding an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let model = ModelConfig {
            source: lookup("MODEL_PATH")
                .map(|path| ModelSource::File(PathBuf::from(path)))
                .unwrap_or(defaults.model.source),
            input_name: lookup("MODEL_INPUT").unwrap_or(defaults.model.input_name),
            output_name: lookup("MODEL_OUTPUT").unwrap_or(defaults.model.output_name),
            description: lookup("MODEL_DESCRIPTION").unwrap_or(defaults.model.description),
            sessions: parse_var(&lookup, "MODEL_SESSIONS")?.unwrap_or(defaults.model.sessions),
            intra_threads: parse_var(&lookup, "MODEL_THREADS")?,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            http_workers: parse_var(&lookup, "HTTP_WORKERS")?,
            model,
        })
    }

    /// Returns the `host:port` the server binds to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| format!("invalid value {raw:?} for {key}: {e}"))
        })
        .transpose()
}
