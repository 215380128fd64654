pub mod entry;
pub mod viewport;

pub use entry::{Entry, EntryCollection, MalformedEntry, Product, Review};
pub use viewport::{ViewportState, MAX_ZOOM};
