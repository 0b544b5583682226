use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use crate::error::Result;
use crate::utils::assets::asset_file_path;

pub const DEFAULT_LABELS: [&str; 2] = ["Ants", "Bees"];

fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|label| label.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    /// Directory the model is copied into before loading.
    #[serde(default)]
    pub asset_dir: Option<PathBuf>,
}

impl ClassifierConfig {
    /// Reads a JSON config. Relative paths resolve against the file's directory.
    pub fn from_file(p: &Path) -> Result<Self> {
        let file = File::open(p)?;
        let json: ClassifierConfig = serde_json::from_reader(file)?;
        let base = p.parent().unwrap_or_else(|| Path::new(""));

        Ok(ClassifierConfig {
            model_path: base.join(json.model_path),
            labels: json.labels,
            image_path: json.image_path.map(|path| base.join(path)),
            asset_dir: json.asset_dir.map(|path| base.join(path)),
        })
    }

    /// Path the model is loaded from, copied into `asset_dir` first when set.
    pub fn resolve_model_path(&self) -> Result<PathBuf> {
        match &self.asset_dir {
            Some(dir) => asset_file_path(&self.model_path, dir),
            None => Ok(self.model_path.clone()),
        }
    }
}
