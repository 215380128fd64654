pub mod coordinates;
pub mod entry_id;
pub mod rating;

pub use coordinates::Coordinates;
pub use entry_id::EntryId;
pub use rating::{Rating, StarKind, MAX_STARS};
