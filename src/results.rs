use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{LatencyGateError, RunResult};

pub const DEFAULT_RESULTS_FILE: &str = "latencygate_results.json";
const FORMAT_VERSION: u32 = 1;

/// On-disk layout: results keyed by label, so a label can appear only once.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ResultFile {
    version: u32,
    results: BTreeMap<String, RunResult>,
}

/// JSON file holding the latest result per benchmark label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces whatever was stored under `result.label`.
    pub fn record(&self, result: &RunResult) -> Result<(), LatencyGateError> {
        let mut file = self.read_file()?;
        file.version = FORMAT_VERSION;
        file.results.insert(result.label.clone(), result.clone());
        let data = serde_json::to_vec_pretty(&file)
            .map_err(|e| LatencyGateError::invalid_input(self.context(e)))?;
        fs::write(&self.path, data).map_err(|e| LatencyGateError::io(self.context(e)))
    }

    /// All stored results in label order.
    pub fn load(&self) -> Result<Vec<RunResult>, LatencyGateError> {
        Ok(self.read_file()?.results.into_values().collect())
    }

    pub fn latest(&self, label: &str) -> Result<RunResult, LatencyGateError> {
        self.read_file()?.results.remove(label).ok_or_else(|| {
            LatencyGateError::not_found(format!(
                "recorded result {label} in {}",
                self.path.display()
            ))
        })
    }

    fn read_file(&self) -> Result<ResultFile, LatencyGateError> {
        if !self.path.exists() {
            return Ok(ResultFile::default());
        }
        let data = fs::read(&self.path).map_err(|e| LatencyGateError::io(self.context(e)))?;
        if data.is_empty() {
            return Ok(ResultFile::default());
        }
        let file: ResultFile = serde_json::from_slice(&data)
            .map_err(|e| LatencyGateError::invalid_input(self.context(e)))?;
        if file.version != FORMAT_VERSION {
            return Err(LatencyGateError::invalid_input(self.context(format!(
                "unsupported format version {}",
                file.version
            ))));
        }
        if let Some((key, result)) = file.results.iter().find(|(key, r)| **key != r.label) {
            return Err(LatencyGateError::invalid_input(self.context(format!(
                "entry {key} holds result for {}",
                result.label
            ))));
        }
        Ok(file)
    }

    fn context(&self, err: impl std::fmt::Display) -> String {
        format!("{}: {err}", self.path.display())
    }
}
