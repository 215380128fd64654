pub mod admin_access;
pub mod dto;

pub use admin_access::{AdminAccess, KeyChord};
