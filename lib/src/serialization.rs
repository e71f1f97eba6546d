//! Persistence of fitted parameters and model artifacts.
//!
//! Parameters are plain numerical data encoded with `bincode`. Model artifacts
//! add a gzip frame on top (`*.pkl.gz` files), written and read with `flate2`.

use crate::pipeline::PipelineParams;
use crate::preprocessing::PreprocessingError;
use crate::search::GridSearchCvParams;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain numerical data (e.g., `Vec<f32>`, scalars),
/// not backend-specific tensors or handles.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Reads and gunzips a whole file.
pub fn read_gz<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, PreprocessingError> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Gzips `bytes` into `path`, replacing any existing file.
pub fn write_gz<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), PreprocessingError> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()?.flush()?;
    Ok(())
}

/// Typed manifest of a trained model as stored in `model.pkl.gz`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ModelArtifact {
    /// A hyperparameter search wrapper around a pipeline.
    GridSearchCv(GridSearchCvParams),
    /// A bare fitted pipeline.
    Pipeline(PipelineParams),
}

impl ModelArtifact {
    /// Qualified runtime type name of the stored object.
    pub fn type_name(&self) -> &'static str {
        match self {
            ModelArtifact::GridSearchCv(_) => GridSearchCvParams::TYPE_NAME,
            ModelArtifact::Pipeline(_) => PipelineParams::TYPE_NAME,
        }
    }

    /// Stage descriptions of the underlying estimator sequence.
    ///
    /// For a search wrapper these come from the unfitted template, for a bare
    /// pipeline from the fitted stages.
    pub fn stage_descriptions(&self) -> Vec<String> {
        match self {
            ModelArtifact::GridSearchCv(search) => search.estimator.describe_steps(),
            ModelArtifact::Pipeline(pipeline) => pipeline.describe_steps(),
        }
    }

    /// Component names found in each stage, in stage order.
    pub fn stage_components(&self) -> Vec<Vec<&'static str>> {
        match self {
            ModelArtifact::GridSearchCv(search) => search.estimator.step_components(),
            ModelArtifact::Pipeline(pipeline) => pipeline.step_components(),
        }
    }

    /// Load an artifact from a gzip-compressed bincode file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let bytes = read_gz(path)?;
        let artifact = Self::from_bytes(&bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Save the artifact as a gzip-compressed bincode file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        write_gz(path, &self.to_bytes()?)
    }

    fn validate(&self) -> Result<(), PreprocessingError> {
        match self {
            ModelArtifact::GridSearchCv(search) => search.validate(),
            ModelArtifact::Pipeline(pipeline) => pipeline.validate(),
        }
    }
}
