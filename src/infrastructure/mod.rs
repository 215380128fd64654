pub mod geocoding;
pub mod map;
pub mod storage;
