use fabricator_common::{Precision, ShapeHint, ShapeRecord};
use sketch::SketchPipeline;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum FabricatorCliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    SketchError(#[from] sketch::SketchError),
    #[error("Batch worker failed: {0}")]
    BatchWorker(String),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
    #[error("Image '{path}' is {size} bytes, over the {limit} byte limit")]
    ImageTooLarge { path: String, size: u64, limit: u64 },
    #[error("Image '{path}' has type '{extension}'; allowed types are {allowed}")]
    DisallowedImageType {
        path: String,
        extension: String,
        allowed: String,
    },
}

/// Runtime settings for the command-line front end
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct FabricatorConfig {
    /// Precision used when a command does not pass `--precision`
    pub default_precision: Precision,
    /// Records below this confidence are reported with a warning
    pub confidence_threshold: f64,
    pub max_image_bytes: u64,
    /// Lower-case file extensions accepted for sketches
    pub allowed_image_types: Vec<String>,
    pub samples_dir: PathBuf,
}

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 70.0;
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

impl Default for FabricatorConfig {
    fn default() -> Self {
        Self {
            default_precision: Precision::default(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            allowed_image_types: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
            samples_dir: PathBuf::from("sample_data"),
        }
    }
}

impl FabricatorConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, FabricatorCliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, FabricatorCliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, FabricatorCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, FabricatorCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FabricatorCliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(FabricatorCliError::UnsupportedFileFormat),
        }
    }

    /// Configuration from `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, FabricatorCliError> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Convert configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, FabricatorCliError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Convert configuration to a JSON string
    pub fn to_json(&self) -> Result<String, FabricatorCliError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_allowed_image_type(&self, path: &Path) -> bool {
        image_extension(path).is_some_and(|ext| self.allowed_image_types.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext)))
    }

    /// Check an image path against the allowed types and the size limit,
    /// then read it
    pub fn read_image(&self, path: &Path) -> Result<Vec<u8>, FabricatorCliError> {
        if !self.is_allowed_image_type(path) {
            return Err(FabricatorCliError::DisallowedImageType {
                path: path.display().to_string(),
                extension: image_extension(path).unwrap_or_default(),
                allowed: self.allowed_image_types.join(", "),
            });
        }

        let size = fs::metadata(path)?.len();
        if size > self.max_image_bytes {
            return Err(FabricatorCliError::ImageTooLarge {
                path: path.display().to_string(),
                size,
                limit: self.max_image_bytes,
            });
        }

        Ok(fs::read(path)?)
    }

    pub fn is_low_confidence(&self, record: &ShapeRecord) -> bool {
        record.confidence() < self.confidence_threshold
    }
}

/// One slot of the batch output, in input order
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub path: String,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Record(ShapeRecord),
    Error(String),
}

/// Process several sketches on the blocking pool with one shared pipeline.
///
/// Entries come back in input order; a failing image only fills its own slot.
pub async fn run_batch(
    config: &FabricatorConfig,
    images: Vec<PathBuf>,
    hint: ShapeHint,
    precision: Precision,
) -> Vec<BatchEntry> {
    let pipeline = Arc::new(SketchPipeline::new(precision, hint));
    info!("Processing {} sketches with {}", images.len(), pipeline.info());

    let handles: Vec<_> = images
        .iter()
        .cloned()
        .map(|path| {
            let pipeline = Arc::clone(&pipeline);
            let config = config.clone();
            tokio::task::spawn_blocking(move || -> Result<ShapeRecord, FabricatorCliError> {
                let bytes = config.read_image(&path)?;
                Ok(pipeline.process_bytes(&bytes)?)
            })
        })
        .collect();

    let mut entries = Vec::with_capacity(images.len());
    for (path, handle) in images.iter().zip(handles) {
        let result = handle
            .await
            .map_err(|err| FabricatorCliError::BatchWorker(err.to_string()))
            .and_then(|result| result);
        let outcome = match result {
            Ok(record) => {
                report(config, &record);
                BatchOutcome::Record(record)
            }
            Err(err) => {
                error!("Failed to process {:?}: {}", path, err);
                BatchOutcome::Error(err.to_string())
            }
        };
        entries.push(BatchEntry {
            path: path.display().to_string(),
            outcome,
        });
    }
    entries
}

/// Log the detected shape, warning when it falls below the confidence threshold
pub fn report(config: &FabricatorConfig, record: &ShapeRecord) {
    info!(
        "Detected {} with {:.1}% confidence",
        record.kind(),
        record.confidence()
    );
    if config.is_low_confidence(record) {
        warn!(
            "Confidence {:.1}% is below the {:.1}% threshold",
            record.confidence(),
            config.confidence_threshold
        );
    }
}

fn image_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
