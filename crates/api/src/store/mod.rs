//! On-disk data store.
//!
//! ```text
//! {static_dir}/frames/{video}/{start}_{end}/{offset:06}.jpg   extracted frames
//! {label_dir}/{video minus "_VIDEO"}_label_combined.csv        task sheet
//! {annotations_dir}/{video}_annotations.json                  saved records
//! ```
//!
//! Reads are lenient: a missing or unreadable label sheet or annotation file
//! is logged and treated as empty. Annotation writes are serialized through
//! a single lock so concurrent saves cannot interleave their
//! read-modify-write cycles.

mod annotations;

use std::io;
use std::path::{Path, PathBuf};

use framemark_core::error::CoreError;
use framemark_core::folder::parse_folder_names;
use framemark_core::labels::{parse_label_csv, LabelSheet};
use tokio::fs;
use tokio::sync::Mutex;

pub use annotations::AnnotationRecord;

/// Suffix stripped from a video name to find its label sheet.
const VIDEO_SUFFIX: &str = "_VIDEO";

pub struct DataStore {
    frames_dir: PathBuf,
    label_dir: PathBuf,
    annotations_dir: PathBuf,
    write_lock: Mutex<()>,
}

/// Reject video names that could escape the data directories.
pub fn validate_video_name(video: &str) -> Result<(), CoreError> {
    if video.is_empty() || video.contains("..") || video.contains(['/', '\\']) {
        return Err(CoreError::Validation("Invalid video directory name.".into()));
    }
    Ok(())
}

impl DataStore {
    pub fn new(frames_dir: PathBuf, label_dir: PathBuf, annotations_dir: PathBuf) -> Self {
        Self {
            frames_dir,
            label_dir,
            annotations_dir,
            write_lock: Mutex::new(()),
        }
    }

    /// Create the frames, label, and annotation directories if missing.
    pub async fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [&self.frames_dir, &self.label_dir, &self.annotations_dir] {
            if fs::metadata(dir).await.is_err() {
                fs::create_dir_all(dir).await?;
                tracing::info!(dir = %dir.display(), "Created data directory");
            }
        }
        Ok(())
    }

    pub async fn frames_readable(&self) -> bool {
        fs::read_dir(&self.frames_dir).await.is_ok()
    }

    /// Sorted names of the video directories.
    ///
    /// A missing frames directory is created and yields an empty list.
    pub async fn list_videos(&self) -> io::Result<Vec<String>> {
        if fs::metadata(&self.frames_dir).await.is_err() {
            fs::create_dir_all(&self.frames_dir).await?;
            tracing::info!(
                dir = %self.frames_dir.display(),
                "Created frames directory, place video frame folders here"
            );
            return Ok(Vec::new());
        }

        let mut videos = sub_directories(&self.frames_dir).await?;
        videos.sort();
        Ok(videos)
    }

    pub async fn video_exists(&self, video: &str) -> io::Result<bool> {
        Ok(self.list_videos().await?.iter().any(|v| v == video))
    }

    /// Frame folder names of `video`, ordered by start frame.
    ///
    /// Directories whose names are not `"<start>_<end>"` are skipped.
    pub async fn list_folders(&self, video: &str) -> io::Result<Vec<String>> {
        let video_dir = self.frames_dir.join(video);
        if !is_dir(&video_dir).await {
            return Ok(Vec::new());
        }

        let names = sub_directories(&video_dir).await?;
        let folders = parse_folder_names(video, &names);
        Ok(folders.into_iter().map(|f| f.name).collect())
    }

    pub fn label_path(&self, video: &str) -> PathBuf {
        let base = video.replace(VIDEO_SUFFIX, "");
        self.label_dir.join(format!("{base}_label_combined.csv"))
    }

    /// Tasks and names for `video`. Empty when the sheet is missing or bad.
    pub async fn read_labels(&self, video: &str) -> LabelSheet {
        let path = self.label_path(video);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No label sheet for video");
                return LabelSheet::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read label sheet");
                return LabelSheet::default();
            }
        };

        match parse_label_csv(&text) {
            Ok(sheet) => {
                tracing::debug!(
                    path = %path.display(),
                    tasks = sheet.tasks.len(),
                    names = sheet.names.len(),
                    "Label sheet loaded"
                );
                sheet
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse label sheet");
                LabelSheet::default()
            }
        }
    }

    pub fn annotation_path(&self, video: &str) -> PathBuf {
        self.annotations_dir.join(format!("{video}_annotations.json"))
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

/// Names of the directories directly under `dir`, following symlinks.
async fn sub_directories(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !is_dir(&entry.path()).await {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => tracing::warn!(name = ?raw, "Skipping non UTF-8 directory name"),
        }
    }
    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn store_in(root: &Path) -> DataStore {
        DataStore::new(
            root.join("static/frames"),
            root.join("label"),
            root.join("annotations"),
        )
    }

    #[test]
    fn video_name_validation() {
        assert!(validate_video_name("match_VIDEO").is_ok());
        for bad in ["", "..", "a..b", "/etc", "a/b", "a\\b"] {
            assert_matches!(validate_video_name(bad), Err(CoreError::Validation(_)), "{bad}");
        }
    }

    #[test]
    fn label_path_strips_video_suffix() {
        let store = store_in(Path::new("/data"));
        assert_eq!(
            store.label_path("match_VIDEO"),
            PathBuf::from("/data/label/match_label_combined.csv")
        );
    }

    #[tokio::test]
    async fn missing_frames_dir_is_created_empty() {
        let root = tempfile::tempdir().unwrap();
        let store = store_in(root.path());

        assert!(store.list_videos().await.unwrap().is_empty());
        assert!(root.path().join("static/frames").is_dir());
    }

    #[tokio::test]
    async fn videos_are_sorted_directories() {
        let root = tempfile::tempdir().unwrap();
        let frames = root.path().join("static/frames");
        std::fs::create_dir_all(frames.join("b_VIDEO")).unwrap();
        std::fs::create_dir_all(frames.join("a_VIDEO")).unwrap();
        std::fs::write(frames.join("notes.txt"), "x").unwrap();

        let store = store_in(root.path());
        assert_eq!(store.list_videos().await.unwrap(), vec!["a_VIDEO", "b_VIDEO"]);
        assert!(store.video_exists("a_VIDEO").await.unwrap());
        assert!(!store.video_exists("c_VIDEO").await.unwrap());
    }

    #[tokio::test]
    async fn folders_sorted_numerically_and_invalid_skipped() {
        let root = tempfile::tempdir().unwrap();
        let video = root.path().join("static/frames/v");
        for name in ["10000_10999", "2000_2999", "thumbs"] {
            std::fs::create_dir_all(video.join(name)).unwrap();
        }

        let store = store_in(root.path());
        assert_eq!(
            store.list_folders("v").await.unwrap(),
            vec!["2000_2999", "10000_10999"]
        );
        assert!(store.list_folders("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_label_sheet_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let store = store_in(root.path());
        assert_eq!(store.read_labels("v_VIDEO").await, LabelSheet::default());
    }

    #[tokio::test]
    async fn label_sheet_is_read() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("label")).unwrap();
        std::fs::write(
            root.path().join("label/v_label_combined.csv"),
            "name,frame\nBob,50\n",
        )
        .unwrap();

        let store = store_in(root.path());
        let sheet = store.read_labels("v_VIDEO").await;
        assert_eq!(sheet.tasks.len(), 1);
        assert_eq!(sheet.names, vec!["Bob".to_string()]);
    }
}
