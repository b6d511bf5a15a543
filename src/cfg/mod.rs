use std::{fs::read_to_string, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    prelude::{ReferencePosition, Vector3},
};

fn default_data_key() -> String {
    "sd".to_string()
}

fn default_scale() -> f64 {
    1.0
}

/// Analysis run [Config]uration: where to find the inputs,
/// where to store the report, and the ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Epoch source (observation table) file path.
    /// `.gz` files are decompressed on the fly.
    pub data_path: PathBuf,

    /// Dataset to select within the epoch source file.
    #[serde(default = "default_data_key")]
    pub data_key: String,

    /// YUMA almanac file path
    pub almanac_path: PathBuf,

    /// Report file path. The extension selects the format (`.csv` or JSON).
    pub output_path: PathBuf,

    /// Base antenna [ReferencePosition]
    pub reference: ReferencePosition,

    /// True baseline (base to rover antenna) in ECEF, meters.
    pub baseline: [f64; 3],

    /// Confidence / scaling parameter forwarded at estimator initialization.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl Config {
    /// Builds a new [Config] with default data key and scale.
    pub fn new(
        data_path: impl Into<PathBuf>,
        almanac_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        reference: ReferencePosition,
        baseline: [f64; 3],
    ) -> Self {
        Self {
            reference,
            baseline,
            scale: default_scale(),
            data_key: default_data_key(),
            data_path: data_path.into(),
            almanac_path: almanac_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Loads [Config] from JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = read_to_string(path)?;
        let cfg = serde_json::from_str(&content)?;
        Ok(cfg)
    }

    /// Copies and returns [Config] with updated data key.
    pub fn with_data_key(&self, key: &str) -> Self {
        let mut s = self.clone();
        s.data_key = key.to_string();
        s
    }

    /// Copies and returns [Config] with updated scale parameter.
    pub fn with_scale(&self, scale: f64) -> Self {
        let mut s = self.clone();
        s.scale = scale;
        s
    }

    /// True baseline vector
    pub fn baseline(&self) -> Vector3<f64> {
        Vector3::new(self.baseline[0], self.baseline[1], self.baseline[2])
    }
}
