pub mod controller;
pub mod popup;

pub use controller::{
    persist_viewport, restore_viewport, MapViewController, MapViewState, RenderReport,
    VIEWPORT_LAT_KEY, VIEWPORT_LNG_KEY, VIEWPORT_ZOOM_KEY,
};
pub use popup::{escape_html, marker_for, marker_icon, popup_html, stars_html};
