pub mod entry_dto;
pub mod upload_dto;

pub use entry_dto::EntryView;
pub use upload_dto::ImageUpload;
