//! Storage module
//!
//! Flat on-disk storage for uploaded files. The directory listing of the
//! storage root is the only record of what has been stored.

pub mod local;
pub mod naming;
pub mod types;

pub use local::FileStore;
pub use naming::generate_stored_name;
pub use types::StoredFile;
