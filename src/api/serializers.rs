//! Response shapes for the REST surface.

use sea_orm::{ConnectionTrait, LoaderTrait};
use serde::Serialize;

use crate::db::entities::{channel_language, channel_metadata, content_node, file, local_file};
use crate::error::Result;
use crate::presets::preset_label;
use crate::storage::{content_file_name, download_filename, download_url, ContentStorage};

#[derive(Debug, Serialize)]
pub struct ChannelResponse {
    #[serde(flatten)]
    pub channel: channel_metadata::Model,
    pub included_languages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FileResponse {
    #[serde(flatten)]
    pub file: file::Model,
    pub checksum: String,
    pub extension: String,
    pub available: bool,
    pub file_size: Option<i64>,
    pub preset_label: String,
    pub storage_url: Option<String>,
    pub download_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContentNodeResponse {
    #[serde(flatten)]
    pub node: content_node::Model,
    pub files: Vec<FileResponse>,
}

/// Build a file response from its backing local file and owning node title.
/// A missing or invalidly named local file drops the URLs, not the record.
pub fn file_response(
    file: file::Model,
    local: Option<local_file::Model>,
    node_title: &str,
    storage: &ContentStorage,
) -> FileResponse {
    let label = preset_label(&file.preset);
    let (checksum, extension, available, file_size, storage_url, download) = match local {
        Some(local) => {
            let stored = content_file_name(&local);
            let storage_url = match storage.storage_url(&stored) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("no storage url for file {}: {}", file.id, e);
                    None
                }
            };
            let download = storage_url.as_ref().map(|_| {
                download_url(&stored, &download_filename(node_title, label, &local.extension))
            });
            (
                local.id,
                local.extension,
                local.available,
                local.file_size,
                storage_url,
                download,
            )
        }
        None => (String::new(), String::new(), false, None, None, None),
    };
    FileResponse {
        file,
        checksum,
        extension,
        available,
        file_size,
        preset_label: label.to_string(),
        storage_url,
        download_url: download,
    }
}

/// Attach files (with their local-file state) to a batch of nodes without
/// per-node queries.
pub async fn content_node_responses<C: ConnectionTrait>(
    db: &C,
    storage: &ContentStorage,
    nodes: Vec<content_node::Model>,
) -> Result<Vec<ContentNodeResponse>> {
    let mut files_per_node = nodes.load_many(file::Entity, db).await?;
    for files in &mut files_per_node {
        files.sort_by_key(|f| (f.priority.unwrap_or(i32::MAX), f.id.clone()));
    }

    // Local files are loaded over the flattened file list; consume them in
    // the same order below.
    let flat: Vec<file::Model> = files_per_node.iter().flatten().cloned().collect();
    let locals = flat.load_one(local_file::Entity, db).await?;
    let mut locals = locals.into_iter();

    let mut responses = Vec::with_capacity(nodes.len());
    for (node, files) in nodes.into_iter().zip(files_per_node) {
        let mut file_responses = Vec::with_capacity(files.len());
        for file in files {
            let local = locals.next().flatten();
            file_responses.push(file_response(file, local, &node.title, storage));
        }
        responses.push(ContentNodeResponse {
            node,
            files: file_responses,
        });
    }
    Ok(responses)
}

/// Attach included-language ids to a batch of channels.
pub async fn channel_responses<C: ConnectionTrait>(
    db: &C,
    channels: Vec<channel_metadata::Model>,
) -> Result<Vec<ChannelResponse>> {
    let languages = channels.load_many(channel_language::Entity, db).await?;
    Ok(channels
        .into_iter()
        .zip(languages)
        .map(|(channel, links)| ChannelResponse {
            channel,
            included_languages: links.into_iter().map(|l| l.language_id).collect(),
        })
        .collect())
}
