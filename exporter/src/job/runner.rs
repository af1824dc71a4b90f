use crate::job::config::ExportJob;
use anyhow::Context;
use nsvcore::model::MeasurementPoint;
use nsvcore::pipeline::{apply_local, build_csv};
use nsvcore::DashboardError;
use std::fs;
use std::path::PathBuf;

/// What an export run produced.
#[derive(Debug)]
pub struct ExportSummary {
    pub matched: usize,
    pub exported: usize,
    pub columns: usize,
    pub output: PathBuf,
}

pub struct Runner {
    job: ExportJob,
}

impl Runner {
    pub fn new(job: ExportJob) -> Self {
        Self { job }
    }

    /// Filters the batch, projects the configured columns and writes the
    /// CSV. Zero columns or zero matching rows abort without a file.
    pub fn execute(&self, points: &[MeasurementPoint]) -> anyhow::Result<ExportSummary> {
        let columns = self.job.parsed_columns()?;
        if columns.is_empty() {
            return Err(DashboardError::Validation("no export columns selected".into()).into());
        }

        let filtered = apply_local(points, &self.job.filters);
        if filtered.is_empty() {
            return Err(
                DashboardError::Validation("no data matches the selected filters".into()).into(),
            );
        }

        let csv = build_csv(&filtered, &columns, self.job.limit);
        fs::write(&self.job.output, &csv)
            .with_context(|| format!("writing export to {}", self.job.output.display()))?;

        let exported = self.job.limit.map_or(filtered.len(), |n| n.min(filtered.len()));
        log::info!(
            "exported {} of {} matching rows to {}",
            exported,
            filtered.len(),
            self.job.output.display()
        );

        Ok(ExportSummary {
            matched: filtered.len(),
            exported,
            columns: columns.len(),
            output: self.job.output.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::sample::{build_sample_batch, SampleConfig};
    use nsvcore::model::Severity;
    use nsvcore::pipeline::FilterCriteria;
    use tempfile::tempdir;

    fn job_for(dir: &std::path::Path, severity: Option<Severity>) -> ExportJob {
        ExportJob {
            filters: FilterCriteria {
                severity,
                measurement_type: None,
                highway: None,
            },
            columns: vec!["highway".into(), "severity".into(), "googleMapsLink".into()],
            limit: Some(10),
            output: dir.join("out.csv"),
        }
    }

    #[test]
    fn runner_writes_a_filtered_csv() {
        let dir = tempdir().unwrap();
        let points = build_sample_batch(&SampleConfig::default());
        let runner = Runner::new(job_for(dir.path(), Some(Severity::High)));
        let summary = runner.execute(&points).unwrap();

        assert!(summary.matched > 0);
        assert!(summary.exported <= 10);
        let csv = fs::read_to_string(summary.output).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("highway,severity,googleMapsLink"));
        for line in lines {
            assert!(line.contains("High"));
        }
    }

    #[test]
    fn empty_match_aborts_without_a_file() {
        let dir = tempdir().unwrap();
        let mut job = job_for(dir.path(), None);
        job.filters.highway = Some("NH-does-not-exist".into());
        let points = build_sample_batch(&SampleConfig::default());
        let err = Runner::new(job).execute(&points).unwrap_err();
        assert!(err.to_string().contains("no data matches"));
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn empty_column_list_is_a_validation_error() {
        let dir = tempdir().unwrap();
        let mut job = job_for(dir.path(), None);
        job.columns.clear();
        let points = build_sample_batch(&SampleConfig::default());
        let err = Runner::new(job).execute(&points).unwrap_err();
        assert!(err.to_string().contains("no export columns"));
    }
}
