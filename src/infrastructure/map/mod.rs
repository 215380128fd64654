pub mod scene_widget;

pub use scene_widget::{MapScene, PlacedMarker, SceneMapWidget, TileLayer};
