//! Content blob storage.
//!
//! Path resolution for hash-addressed blobs and cleanup of local files no
//! available content references.

mod cleanup;
mod paths;

pub use cleanup::{delete_orphan_file_objects, delete_unused_files};
pub use paths::{content_file_name, download_filename, download_url, ContentStorage};
