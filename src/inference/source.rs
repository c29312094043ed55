use std::{borrow::Cow, fmt, fs, path::PathBuf};

use crate::error::{Result, ServiceErr};

#[cfg(not(feature = "embedded-model"))]
const DEFAULT_MODEL_PATH: &str = "model.onnx";

/// The model artifact compiled into the binary.
#[cfg(feature = "embedded-model")]
pub const EMBEDDED_MODEL: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/model.onnx"));

/// Where the bytes of the model artifact come from.
#[derive(Clone)]
pub enum ModelSource {
    File(PathBuf),
    Embedded(&'static [u8]),
}

impl ModelSource {
    /// Reads the whole model artifact.
    ///
    /// # Returns
    /// The model bytes or an `InitializationFailure` if they can't be obtained.
    pub fn load(&self) -> Result<Cow<'static, [u8]>> {
        let bytes = match self {
            Self::File(path) => fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| ServiceErr::init("read_model", format!("{}: {e}", path.display())))?,
            Self::Embedded(bytes) => Cow::Borrowed(*bytes),
        };

        if bytes.is_empty() {
            return Err(ServiceErr::init("read_model", format!("{self} is empty")));
        }

        Ok(bytes)
    }
}

#[cfg(not(feature = "embedded-model"))]
impl Default for ModelSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_MODEL_PATH))
    }
}

#[cfg(feature = "embedded-model")]
impl Default for ModelSource {
    fn default() -> Self {
        Self::Embedded(EMBEDDED_MODEL)
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Embedded(bytes) => write!(f, "embedded model ({} bytes)", bytes.len()),
        }
    }
}

impl fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Embedded(bytes) => f.debug_tuple("Embedded").field(&bytes.len()).finish(),
        }
    }
}
