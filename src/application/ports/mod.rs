pub mod geocoder;
pub mod key_value_store;
pub mod map_widget;

pub use geocoder::{GeocodeError, Geocoder};
pub use key_value_store::{KeyValueStore, StorageResult};
pub use map_widget::{ClusterLayerId, MapWidget, MarkerIcon, MarkerSpec, SettleHandler};
