use crate::batch::sample::{build_sample_batch, SampleConfig};
use nsvcore::model::{DataEnvelope, ExportPayload, MeasurementPoint, Statistics};
use nsvcore::pipeline::{build_csv, ExportColumn};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn backend_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

type SharedPoints = Arc<RwLock<Vec<MeasurementPoint>>>;

/// Columns the server-side export carries: every point field, no
/// synthesized link column.
const EXPORT_COLUMNS: [ExportColumn; 13] = [
    ExportColumn::Lat,
    ExportColumn::Lng,
    ExportColumn::Highway,
    ExportColumn::Lane,
    ExportColumn::StartChainage,
    ExportColumn::EndChainage,
    ExportColumn::Structure,
    ExportColumn::MeasurementType,
    ExportColumn::Value,
    ExportColumn::Unit,
    ExportColumn::Limit,
    ExportColumn::Severity,
    ExportColumn::Datetime,
];

/// Filtering semantics of the live ingest service: severity and type match
/// exactly (blank or "all" values are ignored), highway matches as a
/// case-insensitive substring.
fn filter_points(
    points: &[MeasurementPoint],
    query: &HashMap<String, String>,
) -> Vec<MeasurementPoint> {
    let mut filtered = points.to_vec();
    if let Some(severity) = meaningful(query.get("severity")) {
        filtered.retain(|p| p.severity.as_str() == severity);
    }
    if let Some(kind) = meaningful(query.get("measurement_type")) {
        filtered.retain(|p| p.measurement_type.as_deref() == Some(kind));
    }
    if let Some(highway) = query.get("highway").filter(|v| !v.is_empty()) {
        let needle = highway.to_lowercase();
        filtered.retain(|p| {
            p.highway
                .as_deref()
                .map(|h| h.to_lowercase().contains(&needle))
                .unwrap_or(false)
        });
    }
    filtered
}

fn meaningful(value: Option<&String>) -> Option<&str> {
    value
        .map(|v| v.as_str())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn envelope_for(points: &[MeasurementPoint]) -> DataEnvelope {
    DataEnvelope::new(points.to_vec(), Statistics::from_points(points))
}

fn export_filename() -> String {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("nsv_pavement_data_{}.csv", epoch)
}

/// Development stand-in for the ingest backend: hosts the dashboard's REST
/// surface over an in-memory working set so the client runs self-contained.
pub struct StubBackend {
    state: SharedPoints,
}

impl StubBackend {
    pub fn new(initial: Vec<MeasurementPoint>) -> Self {
        let state: SharedPoints = Arc::new(RwLock::new(initial));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());

        let data_route = warp::path("data")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedPoints| {
                let points = state.read().unwrap();
                warp::reply::json(&envelope_for(&points))
            });

        let filter_route = warp::path!("data" / "filter")
            .and(warp::get())
            .and(warp::query::<HashMap<String, String>>())
            .and(state_filter.clone())
            .map(|query: HashMap<String, String>, state: SharedPoints| {
                let points = state.read().unwrap();
                let filtered = filter_points(&points, &query);
                warp::reply::json(&envelope_for(&filtered))
            });

        let clear_route = warp::path("data")
            .and(warp::path::end())
            .and(warp::delete())
            .and(state_filter.clone())
            .map(|state: SharedPoints| {
                state.write().unwrap().clear();
                warp::reply::json(&json!({
                    "success": true,
                    "message": "All data cleared successfully"
                }))
            });

        let sample_route = warp::path("sample-data")
            .and(warp::post())
            .and(state_filter.clone())
            .map(|state: SharedPoints| {
                let batch = build_sample_batch(&SampleConfig::default());
                let reply = warp::reply::json(&envelope_for(&batch));
                *state.write().unwrap() = batch;
                reply
            });

        let export_route = warp::path("export")
            .and(warp::get())
            .and(state_filter)
            .map(|state: SharedPoints| {
                let points = state.read().unwrap();
                if points.is_empty() {
                    return warp::reply::with_status(
                        warp::reply::json(&json!({"detail": "No data to export"})),
                        StatusCode::BAD_REQUEST,
                    );
                }
                let payload = ExportPayload {
                    csv_content: build_csv(&points, &EXPORT_COLUMNS, None),
                    filename: export_filename(),
                };
                warp::reply::with_status(warp::reply::json(&payload), StatusCode::OK)
            });

        thread::spawn(move || {
            let routes = filter_route
                .or(data_route)
                .or(clear_route)
                .or(sample_route)
                .or(export_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(backend_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish_status(&self, message: &str) {
        println!("[BRIDGE] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<MeasurementPoint> {
        self.state.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsvcore::model::Severity;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn filter_matches_the_ingest_service_semantics() {
        let points = build_sample_batch(&SampleConfig::default());

        let by_severity = filter_points(&points, &query(&[("severity", "High")]));
        assert!(by_severity.iter().all(|p| p.severity == Severity::High));

        let ignored = filter_points(&points, &query(&[("severity", "all")]));
        assert_eq!(ignored.len(), points.len());

        let by_highway = filter_points(&points, &query(&[("highway", "nh-4")]));
        assert!(by_highway
            .iter()
            .all(|p| p.highway.as_deref().unwrap().to_lowercase().contains("nh-4")));
    }

    #[test]
    fn envelope_carries_recomputed_statistics() {
        let points = build_sample_batch(&SampleConfig {
            count: 30,
            seed: 3,
            description: None,
        });
        let envelope = envelope_for(&points);
        assert_eq!(envelope.total_points, 30);
        assert_eq!(
            envelope.statistics.high + envelope.statistics.medium + envelope.statistics.low,
            30
        );
    }

    #[test]
    fn stub_backend_serves_the_initial_working_set() {
        let points = build_sample_batch(&SampleConfig {
            count: 5,
            seed: 11,
            description: None,
        });
        let backend = StubBackend::new(points.clone());
        assert_eq!(backend.snapshot(), points);
    }
}
