use anyhow::Context;
use nsvcore::model::MeasurementPoint;
use std::fs;
use std::path::Path;

/// Reads a measurement batch from a JSON array file, the same shape the
/// backend's `data` field carries.
pub fn load_batch<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<MeasurementPoint>> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading batch file {}", path_ref.display()))?;
    let points: Vec<MeasurementPoint> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing batch file {}", path_ref.display()))?;
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_batch_reads_a_json_array() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            br#"[{"lat": 28.6, "lng": 77.2, "highway": "NH-44", "severity": "High"}]"#,
        )
        .unwrap();
        let path = temp.into_temp_path();
        let points = load_batch(&path).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].highway.as_deref(), Some("NH-44"));
    }

    #[test]
    fn load_batch_reports_the_failing_path() {
        let err = load_batch("does-not-exist.json").unwrap_err();
        assert!(err.to_string().contains("does-not-exist.json"));
    }
}
