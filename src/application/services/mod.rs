pub mod admin_panel;
pub mod entry_composer;
pub mod entry_store;
pub mod map_view;

pub use admin_panel::{AdminForm, AdminPanel, SubmitStart, SubmitTicket};
pub use entry_composer::{compose_entry, EntryComposer, SubmitError, SubmitOutcome};
pub use entry_store::{EntryStore, ENTRIES_STORAGE_KEY};
pub use map_view::{MapViewController, MapViewState, RenderReport};
