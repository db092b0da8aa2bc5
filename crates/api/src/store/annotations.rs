//! Annotation file reads and writes.
//!
//! The file is a JSON array of records. Records are kept as raw JSON values
//! on rewrite so fields this server does not know about survive a save.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use framemark_core::contract::{AnnotateRequest, Annotation};
use framemark_core::types::AbsoluteFrame;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;

use super::DataStore;

/// One saved annotation as written to `{video}_annotations.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub video: String,
    pub folder: String,
    pub image_file: String,
    pub absolute_frame: AbsoluteFrame,
    pub name: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_index: Option<i64>,
}

impl AnnotationRecord {
    pub fn from_request(request: &AnnotateRequest) -> Self {
        Self {
            video: request.video.clone(),
            folder: request.folder.clone(),
            image_file: request.image_file.clone(),
            absolute_frame: request.absolute_frame,
            name: request.name.clone(),
            timestamp: chrono::Local::now().to_rfc3339(),
            task_index: request.task_index.and_then(|i| i64::try_from(i).ok()),
        }
    }
}

/// The fields needed to rebuild the task map from a stored record.
#[derive(Deserialize)]
struct StoredAnnotation {
    task_index: Option<i64>,
    absolute_frame: AbsoluteFrame,
    name: String,
}

impl DataStore {
    /// Raw records for `video`. A missing or corrupt file yields none.
    async fn read_records(&self, video: &str) -> Vec<Value> {
        let path = self.annotation_path(video);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read annotation file");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Value>>(&bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt annotation file");
                Vec::new()
            }
        }
    }

    /// Confirmed annotations keyed by task index rendered as a string.
    ///
    /// Records without a task index are skipped. When several records share
    /// an index the last one in the file wins.
    pub async fn existing_annotations(&self, video: &str) -> BTreeMap<String, Annotation> {
        self.read_records(video)
            .await
            .into_iter()
            .filter_map(|record| serde_json::from_value::<StoredAnnotation>(record).ok())
            .filter_map(|stored| {
                stored.task_index.map(|index| {
                    (
                        index.to_string(),
                        Annotation {
                            frame: stored.absolute_frame,
                            name: stored.name,
                        },
                    )
                })
            })
            .collect()
    }

    /// Append a record for `request`, replacing any earlier record for the
    /// same task index. Returns the path written.
    pub async fn save_annotation(&self, request: &AnnotateRequest) -> io::Result<PathBuf> {
        let _guard = self.write_lock.lock().await;

        let path = self.annotation_path(&request.video);
        let record = AnnotationRecord::from_request(request);

        let mut records = self.read_records(&request.video).await;
        if let Some(index) = record.task_index {
            let before = records.len();
            records.retain(|r| r.get("task_index").and_then(Value::as_i64) != Some(index));
            let replaced = before - records.len();
            if replaced > 0 {
                tracing::debug!(video = %request.video, task = index, replaced, "Replacing earlier annotation");
            }
        }
        records.push(serde_json::to_value(&record)?);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&records)?).await?;
        fs::rename(&tmp, &path).await?;

        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
