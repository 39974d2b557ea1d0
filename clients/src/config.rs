//! `carcino.toml` settings.
//!
//! Every section is optional; missing keys take their defaults. Command-line
//! flags are applied on top by the binaries.

use std::fs;
use std::path::{Path, PathBuf};

use carcino_classify::{RouterConfig, TreeParams};
use carcino_features::{CountPolicy, PropertySelection};
use carcino_ontology::Vocabulary;
use serde::{Deserialize, Serialize};
use tracing::info;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "carcino.toml";

/// Failure while reading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`Settings`].
    #[error("invalid settings in {path}: {source}")]
    Parse {
        /// Settings file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// A value is out of range.
    #[error("{field}: {reason}")]
    Invalid {
        /// Dotted key of the offending value.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Input files and the artifact cache.
    pub data: DataSettings,
    /// Compound feature options.
    pub features: FeatureSettings,
    /// Decision-tree hyperparameters.
    pub tree: TreeParams,
    /// Cross-validation options.
    pub evaluation: EvaluationSettings,
    /// Output files.
    pub output: OutputSettings,
}

/// Input files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Ontology document (RDF/XML, Turtle or N-Triples).
    pub ontology: PathBuf,
    /// Learning problems (Turtle).
    pub problems: PathBuf,
    /// Directory for `<artifact>.json` files; in-memory only when absent.
    pub cache_dir: Option<PathBuf>,
    /// Namespace and object-property names of the ontology.
    pub vocabulary: Vocabulary,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            ontology: PathBuf::from("data/carcinogenesis/carcinogenesis.owl"),
            problems: PathBuf::from("data/kg-mini-project-train.ttl"),
            cache_dir: None,
            vocabulary: Vocabulary::default(),
        }
    }
}

/// Compound feature options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// Count related entities or only flag their presence.
    pub policy: CountPolicy,
    /// Boolean data properties used as compound columns.
    pub properties: PropertySelection,
}

/// Which estimator cross-validation scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    /// The type-partitioned decision-tree router.
    #[default]
    Router,
    /// Majority label per entity type.
    Naive,
}

/// Cross-validation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Number of stratified folds.
    pub folds: usize,
    /// Estimator to score.
    pub estimator: EstimatorKind,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            folds: 5,
            estimator: EstimatorKind::Router,
        }
    }
}

/// Output files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Turtle predictions.
    pub predictions: PathBuf,
    /// JSON evaluation report.
    pub evaluation: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            predictions: PathBuf::from("predictions.ttl"),
            evaluation: PathBuf::from("evaluation.json"),
        }
    }
}

impl Settings {
    /// Reads `path`, or [`DEFAULT_CONFIG_FILE`] if it exists, or falls back
    /// to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    info!("no settings file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads and validates a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or
    /// validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for fewer than two folds or an empty
    /// path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.evaluation.folds < 2 {
            return Err(ConfigError::Invalid {
                field: "evaluation.folds",
                reason: format!("must be at least 2, got {}", self.evaluation.folds),
            });
        }
        let paths = [
            ("data.ontology", &self.data.ontology),
            ("data.problems", &self.data.problems),
            ("output.predictions", &self.output.predictions),
            ("output.evaluation", &self.output.evaluation),
        ];
        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "path is empty".to_string(),
                });
            }
        }
        if self.data.vocabulary.namespace.is_empty() {
            return Err(ConfigError::Invalid {
                field: "data.vocabulary.namespace",
                reason: "namespace is empty".to_string(),
            });
        }
        Ok(())
    }

    /// Router settings derived from the feature and tree sections.
    #[must_use]
    pub fn router(&self) -> RouterConfig {
        RouterConfig {
            policy: self.features.policy,
            properties: self.features.properties.clone(),
            tree: self.tree,
        }
    }
}
