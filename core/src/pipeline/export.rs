use crate::model::{or_na, MeasurementPoint};
use std::fmt;
use std::str::FromStr;

/// Columns available to the filtered-export panel. Header names are the
/// camelCase wire names; `GoogleMapsLink` is synthesized from the
/// coordinates rather than read from the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportColumn {
    Lat,
    Lng,
    Highway,
    Lane,
    StartChainage,
    EndChainage,
    Structure,
    MeasurementType,
    Value,
    Unit,
    Limit,
    Severity,
    Datetime,
    GoogleMapsLink,
}

impl ExportColumn {
    pub const ALL: [ExportColumn; 14] = [
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
        ExportColumn::GoogleMapsLink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportColumn::Lat => "lat",
            ExportColumn::Lng => "lng",
            ExportColumn::Highway => "highway",
            ExportColumn::Lane => "lane",
            ExportColumn::StartChainage => "startChainage",
            ExportColumn::EndChainage => "endChainage",
            ExportColumn::Structure => "structure",
            ExportColumn::MeasurementType => "type",
            ExportColumn::Value => "value",
            ExportColumn::Unit => "unit",
            ExportColumn::Limit => "limit",
            ExportColumn::Severity => "severity",
            ExportColumn::Datetime => "datetime",
            ExportColumn::GoogleMapsLink => "googleMapsLink",
        }
    }

    /// Cell value for one point, with `N/A` for anything absent.
    pub fn project(&self, point: &MeasurementPoint) -> String {
        match self {
            ExportColumn::Lat => format!("{}", point.lat),
            ExportColumn::Lng => format!("{}", point.lng),
            ExportColumn::Highway => or_na(&point.highway),
            ExportColumn::Lane => or_na(&point.lane),
            ExportColumn::StartChainage => or_na(&point.start_chainage),
            ExportColumn::EndChainage => or_na(&point.end_chainage),
            ExportColumn::Structure => or_na(&point.structure),
            ExportColumn::MeasurementType => or_na(&point.measurement_type),
            ExportColumn::Value => or_na(&point.value),
            ExportColumn::Unit => or_na(&point.unit),
            ExportColumn::Limit => or_na(&point.limit),
            ExportColumn::Severity => point.severity.as_str().to_string(),
            ExportColumn::Datetime => or_na(&point.datetime),
            ExportColumn::GoogleMapsLink => point.maps_link(),
        }
    }
}

impl fmt::Display for ExportColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportColumn {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ExportColumn::ALL
            .iter()
            .copied()
            .find(|column| column.as_str() == value)
            .ok_or_else(|| format!("unknown export column: {}", value))
    }
}

/// Builds a CSV document from a filtered, column-projected view of the
/// working set. Internal quotes are doubled and a field is quote-wrapped
/// only when it contains a comma. Pure; triggering the actual download or
/// file write is the caller's concern. Zero rows yield an empty string.
pub fn build_csv(
    points: &[MeasurementPoint],
    columns: &[ExportColumn],
    limit: Option<usize>,
) -> String {
    if points.is_empty() || columns.is_empty() {
        return String::new();
    }

    let row_count = limit.unwrap_or(points.len());
    let mut rows = Vec::with_capacity(row_count + 1);
    rows.push(
        columns
            .iter()
            .map(|column| column.as_str().to_string())
            .collect::<Vec<_>>()
            .join(","),
    );
    for point in points.iter().take(row_count) {
        let cells = columns
            .iter()
            .map(|column| escape_field(&column.project(point)))
            .collect::<Vec<_>>();
        rows.push(cells.join(","));
    }
    rows.join("\n")
}

fn escape_field(value: &str) -> String {
    let escaped = value.replace('"', "\"\"");
    if escaped.contains(',') {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}
