pub mod highlight;
pub mod marker;
pub mod presenter;

pub use highlight::HighlightSequence;
pub use marker::{severity_color, Marker, MarkerStyle, Rgb};
pub use presenter::{
    target_zoom, LatLngBounds, MapPresenter, MapSurface, FIT_PADDING, HIGHLIGHT_EPSILON,
};
