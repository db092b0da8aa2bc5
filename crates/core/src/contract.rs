//! Request and response bodies shared by the HTTP server and the client.
//!
//! ```text
//! GET  /api/videos               -> ["video", ...]
//! GET  /api/video_data/{video}   -> VideoData
//! POST /api/annotate             AnnotateRequest -> AnnotateResponse
//! ```
//!
//! Every field of [`VideoData`] may be absent (or `null`) on the wire and is
//! then treated as empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{AbsoluteFrame, TaskIndex};

/// Deserialize `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a possibly negative or `null` task index. Negative values
/// mean "no task".
fn signed_task_index<'de, D>(deserializer: D) -> Result<Option<TaskIndex>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|index| TaskIndex::try_from(index).ok()))
}

/// An item of required work: label the frame near `frame`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub frame: AbsoluteFrame,
}

/// A server-confirmed label for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub frame: AbsoluteFrame,
    pub name: String,
}

/// Everything the client needs to open a video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub folders: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub names: Vec<String>,
    /// Keyed by the task index rendered as a string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub existing_annotations: BTreeMap<String, Annotation>,
}

impl VideoData {
    /// Existing annotations keyed by numeric task index.
    ///
    /// Keys that are not non-negative integers (e.g. `"-1"` for records saved
    /// without a task) are skipped.
    pub fn annotations_by_task(&self) -> BTreeMap<TaskIndex, Annotation> {
        self.existing_annotations
            .iter()
            .filter_map(|(key, annotation)| match key.parse::<TaskIndex>() {
                Ok(index) => Some((index, annotation.clone())),
                Err(_) => {
                    tracing::debug!(key = %key, "Ignoring annotation without a task index");
                    None
                }
            })
            .collect()
    }
}

/// Body of `POST /api/annotate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateRequest {
    pub video: String,
    pub folder: String,
    pub image_file: String,
    pub absolute_frame: AbsoluteFrame,
    pub name: String,
    /// Negative or `null` on the wire means no task is selected.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "signed_task_index"
    )]
    pub task_index: Option<TaskIndex>,
}

/// Success body of `POST /api/annotate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Failure body returned by the server for any non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_default_to_empty() {
        let data: VideoData = serde_json::from_value(json!({})).unwrap();
        assert_eq!(data, VideoData::default());
    }

    #[test]
    fn null_fields_default_to_empty() {
        let data: VideoData = serde_json::from_value(json!({
            "folders": null,
            "tasks": [{"name": null, "frame": 12, "extra_column": "x"}],
            "names": null,
            "existing_annotations": null
        }))
        .unwrap();
        assert!(data.folders.is_empty());
        assert_eq!(data.tasks, vec![Task { name: String::new(), frame: 12 }]);
    }

    #[test]
    fn annotations_keyed_by_task_index() {
        let data: VideoData = serde_json::from_value(json!({
            "existing_annotations": {
                "0": {"frame": 50, "name": "Bob"},
                "-1": {"frame": 70, "name": "Ann"},
                "3": {"frame": 5025, "name": "Alice"}
            }
        }))
        .unwrap();
        let by_task = data.annotations_by_task();
        assert_eq!(by_task.len(), 2);
        assert_eq!(by_task[&3], Annotation { frame: 5025, name: "Alice".into() });
    }

    #[test]
    fn annotate_request_uses_camel_case() {
        let request = AnnotateRequest {
            video: "v".into(),
            folder: "0_999".into(),
            image_file: "000050.jpg".into(),
            absolute_frame: 50,
            name: "Bob".into(),
            task_index: Some(0),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["imageFile"], "000050.jpg");
        assert_eq!(value["absoluteFrame"], 50);
        assert_eq!(value["taskIndex"], 0);
    }

    #[test]
    fn annotate_request_without_task_omits_index() {
        let request = AnnotateRequest {
            video: "v".into(),
            folder: "0_999".into(),
            image_file: "000050.jpg".into(),
            absolute_frame: 50,
            name: "Bob".into(),
            task_index: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("taskIndex").is_none());
    }

    #[test]
    fn negative_or_null_task_index_means_no_task() {
        let body = |task_index: serde_json::Value| {
            json!({
                "video": "v",
                "folder": "0_999",
                "imageFile": "000050.jpg",
                "absoluteFrame": 50,
                "name": "Bob",
                "taskIndex": task_index
            })
        };
        let request: AnnotateRequest = serde_json::from_value(body(json!(-1))).unwrap();
        assert_eq!(request.task_index, None);
        let request: AnnotateRequest = serde_json::from_value(body(json!(null))).unwrap();
        assert_eq!(request.task_index, None);
        let request: AnnotateRequest = serde_json::from_value(body(json!(2))).unwrap();
        assert_eq!(request.task_index, Some(2));
    }
}
