//! Storage types

use std::path::PathBuf;

/// A file that has been fully written to the storage root
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Generated on-disk name, unique within the storage root
    pub stored_name: String,

    /// Client-supplied file name (untrusted)
    pub original_name: String,

    /// Storage root joined with `stored_name`
    pub path: PathBuf,

    /// Number of bytes written
    pub size: u64,
}

impl StoredFile {
    /// Public retrieval path served by the static `/uploads` route
    pub fn public_path(&self) -> String {
        format!("/uploads/{}", urlencoding::encode(&self.stored_name))
    }
}
