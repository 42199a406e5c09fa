pub mod json_file;
pub mod review;

pub use json_file::{JsonFileStorage, StorageError};
pub use review::{Review, now_iso};
