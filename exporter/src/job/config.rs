use anyhow::Context;
use nsvcore::pipeline::{ExportColumn, FilterCriteria};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A filtered-export job described in YAML: which rows, which columns,
/// how many, and where the CSV lands.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportJob {
    #[serde(default)]
    pub filters: FilterCriteria,
    pub columns: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    pub output: PathBuf,
}

impl ExportJob {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading export job {}", path_ref.display()))?;
        let job: ExportJob = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing export job {}", path_ref.display()))?;
        Ok(job)
    }

    /// Column names resolved against the known export columns.
    pub fn parsed_columns(&self) -> anyhow::Result<Vec<ExportColumn>> {
        self.columns
            .iter()
            .map(|name| {
                name.parse::<ExportColumn>()
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("in export job columns: {}", name))
            })
            .collect()
    }
}
