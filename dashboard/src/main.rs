use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        checkbox, column, pick_list, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use nsvcore::map::{LatLngBounds, MapPresenter, MapSurface, Marker, Rgb};
use nsvcore::model::{or_na, DataEnvelope, ExportPayload, Severity, SeverityCounts, Statistics};
use nsvcore::pipeline::{
    apply_local, build_csv, DataStore, ExportColumn, FilterCriteria, FilterOutcome,
    PaginationController,
};
use nsvcore::DashboardError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const API_BASE: &str = "http://localhost:8000";
// India center, matching the survey coverage
const MAP_CENTER: (f64, f64) = (20.5937, 78.9629);
const MAP_ZOOM: f32 = 5.0;
const PULSE_TICK: Duration = Duration::from_millis(300);

fn main() -> iced::Result {
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "NSV Pavement Dashboard".into()
}

fn application_subscription(state: &Dashboard) -> Subscription<Message> {
    // the highlight pulse is the only thing that needs a clock
    if state.presenter.highlight_active() {
        time::every(PULSE_TICK).map(|_| Message::HighlightTick)
    } else {
        Subscription::none()
    }
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

struct Dashboard {
    store: DataStore,
    pagination: PaginationController,
    presenter: MapPresenter,
    viewport: Viewport,
    severity_filter: String,
    type_filter: String,
    highway_filter: String,
    list_filter: String,
    export: ExportPanel,
    upload_path: String,
    status: String,
    history: Vec<String>,
    filter_seq: u64,
}

#[derive(Debug, Clone)]
enum Message {
    Loaded(Result<DataEnvelope, String>),
    UploadPathChanged(String),
    UploadPressed,
    Uploaded(Result<DataEnvelope, String>),
    SamplePressed,
    SampleLoaded(Result<DataEnvelope, String>),
    RefreshPressed,
    Refreshed(Result<DataEnvelope, String>),
    ClearPressed,
    Cleared(Result<String, String>),
    MapFilterChanged(MapFilterField, String),
    Filtered(u64, Result<DataEnvelope, String>),
    ListFilterChanged(String),
    LoadMorePressed,
    RowClicked(f64, f64),
    HighlightTick,
    ServerExportPressed,
    ServerExported(Result<ExportPayload, String>),
    ExportToggled,
    ExportColumnToggled(usize, bool),
    ExportFieldChanged(ExportField, String),
    ConfirmExportPressed,
    CsvSaved(Result<String, String>),
}

#[derive(Debug, Clone, Copy)]
enum MapFilterField {
    Severity,
    MeasurementType,
    Highway,
}

#[derive(Debug, Clone, Copy)]
enum ExportField {
    Severity,
    MeasurementType,
    Highway,
    Limit,
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        (
            Dashboard {
                store: DataStore::new(),
                pagination: PaginationController::new(),
                presenter: MapPresenter::new(),
                viewport: Viewport::home(),
                severity_filter: "All".into(),
                type_filter: "All".into(),
                highway_filter: "All".into(),
                list_filter: "All".into(),
                export: ExportPanel::new(),
                upload_path: String::new(),
                status: "Connecting to survey backend...".into(),
                history: Vec::new(),
                filter_seq: 0,
            },
            Task::perform(fetch_data(), Message::Loaded),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(Ok(envelope)) => {
                if envelope.data.is_empty() {
                    state.status = "No data on the backend yet".into();
                } else {
                    state.apply_batch(envelope, "Data loaded");
                }
                Task::none()
            }
            Message::Loaded(Err(err)) => {
                state.status = format!("No initial data available: {err}");
                Task::none()
            }
            Message::UploadPathChanged(path) => {
                state.upload_path = path;
                Task::none()
            }
            Message::UploadPressed => {
                let path = state.upload_path.trim().to_string();
                if path.is_empty() {
                    state.status = "Enter a survey file path to upload".into();
                    Task::none()
                } else {
                    Task::perform(upload_file(path), Message::Uploaded)
                }
            }
            Message::Uploaded(Ok(envelope)) => {
                state.apply_batch(envelope, "Upload processed");
                Task::none()
            }
            Message::Uploaded(Err(err)) => state.fail("Upload failed", err),
            Message::SamplePressed => Task::perform(load_sample_data(), Message::SampleLoaded),
            Message::SampleLoaded(Ok(envelope)) => {
                state.apply_batch(envelope, "Sample data loaded");
                Task::none()
            }
            Message::SampleLoaded(Err(err)) => state.fail("Failed to load sample data", err),
            Message::RefreshPressed => Task::perform(fetch_data(), Message::Refreshed),
            Message::Refreshed(Ok(envelope)) => {
                // unlike the boot fetch, a refresh replaces state wholesale,
                // including an empty batch
                state.apply_batch(envelope, "Data refreshed");
                Task::none()
            }
            Message::Refreshed(Err(err)) => state.fail("Refresh failed", err),
            Message::ClearPressed => Task::perform(clear_data(), Message::Cleared),
            Message::Cleared(Ok(message)) => {
                state.store.clear();
                state.pagination.load(Vec::new());
                state.presenter.render(&[], &mut state.viewport);
                state.viewport = Viewport::home();
                // outstanding filter responses are now stale
                state.filter_seq += 1;
                state.status = message.clone();
                state.push_history(message);
                Task::none()
            }
            Message::Cleared(Err(err)) => state.fail("Failed to clear data", err),
            Message::MapFilterChanged(field, value) => {
                match field {
                    MapFilterField::Severity => state.severity_filter = value,
                    MapFilterField::MeasurementType => state.type_filter = value,
                    MapFilterField::Highway => state.highway_filter = value,
                }
                state.filter_seq += 1;
                let seq = state.filter_seq;
                let criteria = state.map_criteria();
                Task::perform(filter_data(criteria), move |result| {
                    Message::Filtered(seq, result)
                })
            }
            Message::Filtered(seq, Ok(envelope)) => {
                if seq != state.filter_seq {
                    state.push_history("Discarded stale filter response".into());
                    return Task::none();
                }
                let outcome = FilterOutcome::of(envelope.data.len());
                state.store.set_detailed(envelope.statistics);
                state.presenter.render(&envelope.data, &mut state.viewport);
                state.viewport.popup = None;
                state.pagination.load(envelope.data);
                state.pagination.reveal();
                state.list_filter = "All".into();
                state.status = match outcome {
                    FilterOutcome::Empty => "Filter applied: no matching points".into(),
                    FilterOutcome::Matched(count) => {
                        format!("Filter applied: {} points shown", count)
                    }
                };
                state.push_history(state.status.clone());
                Task::none()
            }
            Message::Filtered(_, Err(err)) => state.fail("Filter failed", err),
            Message::ListFilterChanged(value) => {
                state.pagination.set_filter(value.parse::<Severity>().ok());
                state.list_filter = value;
                state.pagination.reveal();
                Task::none()
            }
            Message::LoadMorePressed => {
                state.pagination.reveal();
                Task::none()
            }
            Message::RowClicked(lat, lng) => {
                state.presenter.highlight(lat, lng, &mut state.viewport);
                Task::none()
            }
            Message::HighlightTick => {
                state.presenter.tick(&mut state.viewport);
                Task::none()
            }
            Message::ServerExportPressed => Task::perform(export_server(), Message::ServerExported),
            Message::ServerExported(Ok(payload)) => Task::perform(
                save_csv(payload.filename, payload.csv_content),
                Message::CsvSaved,
            ),
            Message::ServerExported(Err(err)) => state.fail("Export failed", err),
            Message::ExportToggled => {
                if state.store.is_empty() {
                    state.status = "No data available to export".into();
                } else {
                    state.export.open = !state.export.open;
                }
                Task::none()
            }
            Message::ExportColumnToggled(index, checked) => {
                if let Some(entry) = state.export.columns.get_mut(index) {
                    entry.1 = checked;
                }
                Task::none()
            }
            Message::ExportFieldChanged(field, value) => {
                match field {
                    ExportField::Severity => state.export.severity = value,
                    ExportField::MeasurementType => state.export.kind = value,
                    ExportField::Highway => state.export.highway = value,
                    ExportField::Limit => state.export.limit = value,
                }
                Task::none()
            }
            Message::ConfirmExportPressed => {
                let columns = state.export.selected_columns();
                if columns.is_empty() {
                    state.status = "Select at least one column to export".into();
                    return Task::none();
                }
                let criteria = state.export.criteria();
                let filtered = apply_local(state.store.points(), &criteria);
                let limit = state.export.limit_value();
                // a limit of 0 would write a header-only file
                if filtered.is_empty() || limit == Some(0) {
                    state.status = "No data matches the selected filters".into();
                    return Task::none();
                }
                let csv = build_csv(&filtered, &columns, limit);
                let exported = limit.map_or(filtered.len(), |n| n.min(filtered.len()));
                let filename = export_filename(criteria.severity);
                state.export.open = false;
                state.push_history(format!("Exporting {} records", exported));
                Task::perform(save_csv(filename, csv), Message::CsvSaved)
            }
            Message::CsvSaved(Ok(filename)) => {
                state.status = format!("Exported to {}", filename);
                state.push_history(state.status.clone());
                Task::none()
            }
            Message::CsvSaved(Err(err)) => state.fail("Export failed", err),
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let severity_options =
            filter_options(vec!["High".into(), "Medium".into(), "Low".into()]);
        let type_options = filter_options(state.store.measurement_types());
        let highway_options = filter_options(state.store.highways());

        let mut controls = column![
            text("NSV Pavement Dashboard").size(26),
            text_input("Survey file to upload (.csv/.xlsx)", &state.upload_path)
                .on_input(Message::UploadPathChanged)
                .padding(6),
            row![
                button("Upload").on_press(Message::UploadPressed).padding(8),
                button("Sample Data")
                    .on_press(Message::SamplePressed)
                    .padding(8),
                button("Refresh")
                    .on_press(Message::RefreshPressed)
                    .padding(8),
            ]
            .spacing(8),
            row![
                button("Clear All").on_press(Message::ClearPressed).padding(8),
                button("Server Export")
                    .on_press(Message::ServerExportPressed)
                    .padding(8),
                button("Filtered Export...")
                    .on_press(Message::ExportToggled)
                    .padding(8),
            ]
            .spacing(8),
            text("Filters").size(18),
            pick_list(severity_options, Some(state.severity_filter.clone()), |v| {
                Message::MapFilterChanged(MapFilterField::Severity, v)
            }),
            pick_list(type_options, Some(state.type_filter.clone()), |v| {
                Message::MapFilterChanged(MapFilterField::MeasurementType, v)
            }),
            pick_list(highway_options, Some(state.highway_filter.clone()), |v| {
                Message::MapFilterChanged(MapFilterField::Highway, v)
            }),
            text(&state.status).size(14),
            stats_cards(state.store.original_statistics()),
            detailed_statistics(state.store.detailed_statistics()),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(380.0));

        if state.export.open {
            controls = controls.push(export_panel(state));
        }
        controls = controls.push(text("Activity log").size(16)).push(
            Container::new(scrollable(history_list(&state.history)).height(Length::Fixed(90.0)))
                .padding(6),
        );

        let map_canvas = Canvas::new(MapView::new(state.presenter.markers(), &state.viewport))
            .width(Length::Fill)
            .height(Length::Fixed(420.0));

        let mut map_column = column![text("Survey Map").size(26), map_canvas].spacing(10);

        if let Some(index) = state.viewport.popup {
            if let Some(marker) = state.presenter.markers().get(index) {
                map_column = map_column.push(Container::new(popup_details(marker)).padding(6));
            }
        }

        let chips = ["All", "High", "Medium", "Low"]
            .iter()
            .fold(iced::widget::Row::new().spacing(6), |chip_row, label| {
                chip_row.push(
                    button(text(label.to_string()).size(12))
                        .on_press(Message::ListFilterChanged(label.to_string()))
                        .padding(6),
                )
            });

        map_column = map_column
            .push(text("Severity Issues").size(18))
            .push(chips)
            .push(
                Container::new(scrollable(severity_list(state)).height(Length::Fixed(260.0)))
                    .padding(6),
            );

        if state.pagination.remaining() > 0 {
            map_column = map_column.push(
                row![
                    button(
                        text(format!("Load More ({})", state.pagination.next_page_len())).size(13)
                    )
                    .on_press(Message::LoadMorePressed)
                    .padding(8),
                    text(format!("{} items remaining", state.pagination.remaining())).size(12),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            );
        }
        if state.pagination.filtered_len() > 0 {
            map_column = map_column.push(
                text(format!(
                    "Showing {} of {}",
                    state.pagination.displayed(),
                    state.pagination.filtered_len()
                ))
                .size(12),
            );
        }

        let layout = row![controls, map_column.width(Length::Fill)]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// A full batch from upload/sample/refresh replaces everything: both
    /// statistics copies, the marker set and the paginated list.
    fn apply_batch(&mut self, envelope: DataEnvelope, note: &str) {
        let points = envelope.data.clone();
        self.presenter.render(&points, &mut self.viewport);
        self.viewport.popup = None;
        self.pagination.load(points);
        self.pagination.reveal();
        self.store.replace(envelope.data, envelope.statistics);
        self.severity_filter = "All".into();
        self.type_filter = "All".into();
        self.highway_filter = "All".into();
        self.list_filter = "All".into();
        self.status = format!("{} ({} points)", note, self.store.points().len());
        self.push_history(self.status.clone());
    }

    /// Transport failures surface as a notification; prior state survives.
    fn fail(&mut self, context: &str, err: String) -> Task<Message> {
        self.status = format!("{}: {}", context, err);
        self.push_history(self.status.clone());
        Task::none()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }

    fn map_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            severity: option_from(&self.severity_filter).and_then(|s| s.parse().ok()),
            measurement_type: option_from(&self.type_filter),
            highway: option_from(&self.highway_filter),
        }
    }
}

struct ExportPanel {
    open: bool,
    columns: Vec<(ExportColumn, bool)>,
    severity: String,
    kind: String,
    highway: String,
    limit: String,
}

impl ExportPanel {
    fn new() -> Self {
        Self {
            open: false,
            columns: ExportColumn::ALL.iter().map(|c| (*c, true)).collect(),
            severity: "All".into(),
            kind: "All".into(),
            highway: "All".into(),
            limit: String::new(),
        }
    }

    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            severity: option_from(&self.severity).and_then(|s| s.parse().ok()),
            measurement_type: option_from(&self.kind),
            highway: option_from(&self.highway),
        }
    }

    fn selected_columns(&self) -> Vec<ExportColumn> {
        self.columns
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(column_id, _)| *column_id)
            .collect()
    }

    fn limit_value(&self) -> Option<usize> {
        self.limit.trim().parse().ok()
    }
}

fn option_from(value: &str) -> Option<String> {
    if value.is_empty() || value == "All" {
        None
    } else {
        Some(value.to_string())
    }
}

fn filter_options(values: Vec<String>) -> Vec<String> {
    let mut options = vec!["All".to_string()];
    options.extend(values);
    options
}

fn stats_cards(stats: &Statistics) -> Column<'static, Message> {
    column![
        text("Summary").size(18),
        row![
            text(format!("Total {}", stats.total)).size(14),
            text(format!("High {}", stats.high)).size(14),
            text(format!("Medium {}", stats.medium)).size(14),
            text(format!("Low {}", stats.low)).size(14),
        ]
        .spacing(12),
    ]
    .spacing(4)
}

fn detailed_statistics(stats: &Statistics) -> Column<'static, Message> {
    if stats.total == 0 {
        return column![
            text("No statistics available").size(14),
            text("Upload data to see detailed statistics").size(12),
        ]
        .spacing(2);
    }
    column![
        category_table("By Measurement Type", &stats.by_type),
        category_table("By Highway", &stats.by_highway),
    ]
    .spacing(8)
}

fn category_table(
    title: &str,
    entries: &BTreeMap<String, SeverityCounts>,
) -> Column<'static, Message> {
    entries.iter().fold(
        Column::new().push(text(title.to_string()).size(16)).spacing(2),
        |col, (name, counts)| {
            col.push(
                text(format!(
                    "{}: {} total | {} high | {} medium | {} low",
                    name, counts.total, counts.high, counts.medium, counts.low
                ))
                .size(12),
            )
        },
    )
}

fn history_list(history: &[String]) -> Column<'static, Message> {
    if history.is_empty() {
        Column::new().push(text("No activity yet").size(12))
    } else {
        history
            .iter()
            .rev()
            .fold(Column::new().spacing(4), |col, entry| {
                col.push(text(entry.clone()).size(12))
            })
    }
}

fn severity_list(state: &Dashboard) -> Column<'_, Message> {
    if state.pagination.filtered_len() == 0 {
        return column![
            text("No data loaded yet").size(14),
            text("Upload data files to see severity issues").size(12),
        ]
        .spacing(2);
    }

    state
        .pagination
        .visible_sections()
        .iter()
        .fold(Column::new().spacing(8), |col, section| {
            let header = text(format!("{} ({})", section.severity, section.points.len())).size(16);
            let rows = section
                .points
                .iter()
                .fold(Column::new().spacing(2), |inner, point| {
                    inner.push(
                        button(
                            column![
                                text(format!(
                                    "{} - {}",
                                    or_na(&point.highway),
                                    or_na(&point.lane)
                                ))
                                .size(13),
                                text(format!(
                                    "{}: {} {}",
                                    or_na(&point.measurement_type),
                                    or_na(&point.value),
                                    point.unit.clone().unwrap_or_default()
                                ))
                                .size(11),
                                text(format!(
                                    "Chainage: {} - {}",
                                    or_na(&point.start_chainage),
                                    or_na(&point.end_chainage)
                                ))
                                .size(11),
                            ]
                            .spacing(1),
                        )
                        .on_press(Message::RowClicked(point.lat, point.lng))
                        .padding(6)
                        .width(Length::Fill),
                    )
                });
            col.push(header).push(rows)
        })
}

fn export_panel(state: &Dashboard) -> Column<'static, Message> {
    let criteria = state.export.criteria();
    let filtered = apply_local(state.store.points(), &criteria);
    let limit = state.export.limit_value();
    let to_export = limit.map_or(filtered.len(), |n| n.min(filtered.len()));
    let selected = state.export.selected_columns();

    let checkboxes = state.export.columns.iter().enumerate().fold(
        Column::new().spacing(2),
        |col, (index, (column_id, checked))| {
            col.push(
                checkbox(*checked)
                    .label(column_id.as_str())
                    .on_toggle(move |value| Message::ExportColumnToggled(index, value)),
            )
        },
    );

    let preview = build_csv(&filtered, &selected, Some(3));
    let preview_lines = preview.lines().fold(Column::new().spacing(1), |col, line| {
        col.push(text(line.to_string()).size(10))
    });

    column![
        text("Filtered Export").size(18),
        pick_list(
            filter_options(vec!["High".into(), "Medium".into(), "Low".into()]),
            Some(state.export.severity.clone()),
            |v| Message::ExportFieldChanged(ExportField::Severity, v)
        ),
        pick_list(
            filter_options(state.store.measurement_types()),
            Some(state.export.kind.clone()),
            |v| Message::ExportFieldChanged(ExportField::MeasurementType, v)
        ),
        pick_list(
            filter_options(state.store.highways()),
            Some(state.export.highway.clone()),
            |v| Message::ExportFieldChanged(ExportField::Highway, v)
        ),
        text_input("Row limit (optional)", &state.export.limit)
            .on_input(|v| Message::ExportFieldChanged(ExportField::Limit, v))
            .padding(6),
        text("Columns").size(14),
        checkboxes,
        text(format!("Matching records: {}", filtered.len())).size(12),
        text(format!("Records to export: {}", to_export)).size(12),
        text(format!("Selected columns: {}", selected.len())).size(12),
        text("Preview").size(12),
        preview_lines,
        button("Export CSV")
            .on_press(Message::ConfirmExportPressed)
            .padding(8),
    ]
    .spacing(6)
}

fn popup_details(marker: &Marker) -> Column<'static, Message> {
    let point = &marker.point;
    let unit = point.unit.clone().unwrap_or_default();
    column![
        text(or_na(&point.highway)).size(16),
        text(format!("Lane: {}", or_na(&point.lane))).size(12),
        text(format!(
            "Chainage: {} - {}",
            or_na(&point.start_chainage),
            or_na(&point.end_chainage)
        ))
        .size(12),
        text(format!("Structure: {}", or_na(&point.structure))).size(12),
        text(format!("Measurement: {}", or_na(&point.measurement_type))).size(12),
        text(format!("Value: {} {}", or_na(&point.value), unit)).size(12),
        text(format!("Limit: {} {}", or_na(&point.limit), unit)).size(12),
        text(format!("Severity: {}", point.severity)).size(12),
        text(format!("Date: {}", or_na(&point.datetime))).size(12),
    ]
    .spacing(2)
}

/// Equirectangular stand-in for the tile map. Zoom follows the usual
/// 256 * 2^z world width so the highlight zoom bands stay meaningful;
/// actual tile rendering is out of scope.
#[derive(Debug, Clone)]
struct Viewport {
    center_lat: f64,
    center_lng: f64,
    zoom: f32,
    popup: Option<usize>,
}

impl Viewport {
    fn home() -> Self {
        Self {
            center_lat: MAP_CENTER.0,
            center_lng: MAP_CENTER.1,
            zoom: MAP_ZOOM,
            popup: None,
        }
    }
}

impl MapSurface for Viewport {
    fn current_zoom(&self) -> f32 {
        self.zoom
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, padding: f32) {
        let (lat, lng) = bounds.center();
        self.center_lat = lat;
        self.center_lng = lng;
        let (lat_span, lng_span) = bounds.span();
        let span = lat_span.max(lng_span).max(0.001);
        // nominal viewport edge minus the fit margin on both sides
        let view_px = (480.0 - 2.0 * padding) as f64;
        let zoom = (view_px * 360.0 / (256.0 * span)).log2();
        self.zoom = zoom.clamp(3.0, 18.0) as f32;
    }

    fn fly_to(&mut self, lat: f64, lng: f64, zoom: f32) {
        self.center_lat = lat;
        self.center_lng = lng;
        self.zoom = zoom;
    }

    fn open_popup(&mut self, index: usize) {
        self.popup = Some(index);
    }
}

#[derive(Clone)]
struct MapView {
    markers: Vec<Marker>,
    center: (f64, f64),
    zoom: f32,
}

impl MapView {
    fn new(markers: &[Marker], viewport: &Viewport) -> Self {
        Self {
            markers: markers.to_vec(),
            center: (viewport.center_lat, viewport.center_lng),
            zoom: viewport.zoom,
        }
    }

    fn project(&self, width: f32, height: f32, lat: f64, lng: f64) -> Point {
        let px_per_deg = 256.0 * 2f64.powf(self.zoom as f64) / 360.0;
        let x = width as f64 / 2.0 + (lng - self.center.1) * px_per_deg;
        let y = height as f64 / 2.0 - (lat - self.center.0) * px_per_deg;
        Point::new(x as f32, y as f32)
    }
}

impl canvas::Program<Message> for MapView {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.04, 0.05, 0.07),
        );

        // 5-degree graticule around the center
        let px_per_deg = (256.0 * 2f64.powf(self.zoom as f64) / 360.0) as f32;
        let step = 5.0 * px_per_deg;
        if step > 8.0 {
            let graticule = Path::new(|builder| {
                let mut x = (bounds.width / 2.0) % step;
                while x < bounds.width {
                    builder.move_to(Point::new(x, 0.0));
                    builder.line_to(Point::new(x, bounds.height));
                    x += step;
                }
                let mut y = (bounds.height / 2.0) % step;
                while y < bounds.height {
                    builder.move_to(Point::new(0.0, y));
                    builder.line_to(Point::new(bounds.width, y));
                    y += step;
                }
            });
            frame.stroke(
                &graticule,
                Stroke::default()
                    .with_width(1.0)
                    .with_color(Color::from_rgb(0.12, 0.13, 0.17)),
            );
        }

        for marker in &self.markers {
            let position = self.project(
                bounds.width,
                bounds.height,
                marker.point.lat,
                marker.point.lng,
            );
            let style = marker.style;
            let circle = Path::new(|builder| builder.circle(position, style.radius));
            frame.fill(&circle, color_with_alpha(style.fill, style.fill_opacity));
            frame.stroke(
                &circle,
                Stroke::default()
                    .with_width(style.weight)
                    .with_color(color_from(style.stroke)),
            );
        }

        vec![frame.into_geometry()]
    }
}

fn color_from(rgb: Rgb) -> Color {
    Color::from_rgb8(rgb.r, rgb.g, rgb.b)
}

fn color_with_alpha(rgb: Rgb, alpha: f32) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, alpha)
}

fn export_filename(severity: Option<Severity>) -> String {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    match severity {
        Some(severity) => format!("nsv_pavement_data_filtered_{}_{}.csv", severity, epoch),
        None => format!("nsv_pavement_data_filtered_{}.csv", epoch),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Acknowledgement {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
}

async fn fetch_data() -> Result<DataEnvelope, String> {
    let response = reqwest::get(format!("{}/data", API_BASE))
        .await
        .map_err(transport)?;
    parse_envelope(response).await
}

async fn filter_data(criteria: FilterCriteria) -> Result<DataEnvelope, String> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/data/filter", API_BASE))
        .query(&criteria.query_pairs())
        .send()
        .await
        .map_err(transport)?;
    parse_envelope(response).await
}

async fn upload_file(path: String) -> Result<DataEnvelope, String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("reading {}: {}", path, e))?;
    let file_name = std::path::Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());
    let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
    let form = reqwest::multipart::Form::new().part("files", part);
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/upload", API_BASE))
        .multipart(form)
        .send()
        .await
        .map_err(transport)?;
    parse_envelope(response).await
}

async fn load_sample_data() -> Result<DataEnvelope, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/sample-data", API_BASE))
        .send()
        .await
        .map_err(transport)?;
    parse_envelope(response).await
}

async fn clear_data() -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .delete(format!("{}/data", API_BASE))
        .send()
        .await
        .map_err(transport)?;
    if !response.status().is_success() {
        return Err(http_error(response).await);
    }
    let ack = response.json::<Acknowledgement>().await.map_err(transport)?;
    if ack.success && !ack.message.is_empty() {
        Ok(ack.message)
    } else {
        Ok("All data cleared".to_string())
    }
}

async fn export_server() -> Result<ExportPayload, String> {
    let response = reqwest::get(format!("{}/export", API_BASE))
        .await
        .map_err(transport)?;
    if !response.status().is_success() {
        return Err(http_error(response).await);
    }
    response.json::<ExportPayload>().await.map_err(transport)
}

async fn save_csv(filename: String, contents: String) -> Result<String, String> {
    tokio::fs::write(&filename, contents)
        .await
        .map_err(|e| format!("writing {}: {}", filename, e))?;
    Ok(filename)
}

async fn parse_envelope(response: reqwest::Response) -> Result<DataEnvelope, String> {
    if !response.status().is_success() {
        return Err(http_error(response).await);
    }
    response.json::<DataEnvelope>().await.map_err(transport)
}

fn transport(err: reqwest::Error) -> String {
    DashboardError::Transport(err.to_string()).to_string()
}

async fn http_error(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or(body);
    DashboardError::Transport(format!("{}: {}", status, detail)).to_string()
}
