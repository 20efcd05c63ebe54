//! Database entities

pub mod assessment_metadata;
pub mod channel_language;
pub mod channel_metadata;
pub mod content_node;
pub mod content_tag;
pub mod file;
pub mod language;
pub mod local_file;
pub mod node_prerequisite;
pub mod node_related;
pub mod node_tag;
