pub mod constants;
pub mod entities;
pub mod seed;
pub mod value_objects;

pub use constants::{CUSTOM_PRODUCT_ID, CUSTOM_PRODUCT_PRICE};
pub use entities::{Entry, EntryCollection, MalformedEntry, Product, Review, ViewportState};
pub use seed::seed_collection;
pub use value_objects::{Coordinates, EntryId, Rating, StarKind};
