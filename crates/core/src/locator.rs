//! Frame Locator: maps between absolute frames and `(folder, offset)` pairs.
//!
//! Folder ranges are not assumed to be contiguous. Gaps between one folder's
//! end and the next folder's start are legal, and frames that fall in a gap
//! (or outside every folder) simply do not resolve.

use crate::folder::{image_file, parse_folder_names, FolderRange, MAX_FRAME_OFFSET};
use crate::types::{AbsoluteFrame, Position};

/// URL prefix under which the server exposes extracted frames.
pub const FRAMES_URL_PREFIX: &str = "/static/frames";

/// Address translator for a single video's folder layout.
#[derive(Debug, Clone)]
pub struct FrameLocator {
    video: String,
    folders: Vec<FolderRange>,
}

impl FrameLocator {
    /// Build a locator from already-parsed folder ranges.
    ///
    /// Ranges are re-ordered by start frame.
    pub fn new(video: impl Into<String>, mut folders: Vec<FolderRange>) -> Self {
        folders.sort_by_key(|f| f.start_frame);
        Self {
            video: video.into(),
            folders,
        }
    }

    /// Build a locator from raw folder names, skipping names that do not
    /// parse as `"<start>_<end>"`.
    pub fn from_names<S: AsRef<str>>(video: impl Into<String>, names: &[S]) -> Self {
        let video = video.into();
        let folders = parse_folder_names(&video, names);
        Self::new(video, folders)
    }

    pub fn video(&self) -> &str {
        &self.video
    }

    pub fn folders(&self) -> &[FolderRange] {
        &self.folders
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn folder(&self, index: usize) -> Option<&FolderRange> {
        self.folders.get(index)
    }

    /// Resolve an absolute frame to the first folder containing it.
    ///
    /// Returns `None` when the frame lies outside every known range.
    pub fn locate(&self, frame: AbsoluteFrame) -> Option<Position> {
        self.folders
            .iter()
            .enumerate()
            .find(|(_, folder)| folder.contains(frame))
            .map(|(index, folder)| {
                let offset = (frame - folder.start_frame).min(u64::from(u32::MAX));
                Position::new(index, offset as u32)
            })
    }

    /// Absolute frame for a position.
    ///
    /// The offset is not checked against the folder's end frame: every folder
    /// is treated as holding a full set of offsets.
    pub fn absolute_frame(&self, position: Position) -> Option<AbsoluteFrame> {
        if position.frame_offset > MAX_FRAME_OFFSET {
            return None;
        }
        let folder = self.folder(position.folder_index)?;
        folder
            .start_frame
            .checked_add(AbsoluteFrame::from(position.frame_offset))
    }

    /// Canonical image path `"{video}/{folder}/{offset:06}.jpg"`.
    pub fn image_path(&self, position: Position) -> Option<String> {
        if position.frame_offset > MAX_FRAME_OFFSET {
            return None;
        }
        self.folder(position.folder_index).map(|folder| {
            format!(
                "{}/{}/{}",
                self.video,
                folder.name,
                image_file(position.frame_offset)
            )
        })
    }

    /// Server URL of the image at `position`.
    pub fn image_url(&self, position: Position) -> Option<String> {
        self.image_path(position)
            .map(|path| format!("{FRAMES_URL_PREFIX}/{path}"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(names: &[&str]) -> FrameLocator {
        FrameLocator::from_names("match_VIDEO", names)
    }

    #[test]
    fn locate_inside_range_round_trips() {
        let loc = locator(&["0_999", "1000_1999", "5000_5999"]);
        for frame in [0, 1, 999, 1000, 1500, 1999, 5000, 5025, 5999] {
            let position = loc.locate(frame).expect("frame should resolve");
            let folder = loc.folder(position.folder_index).unwrap();
            assert_eq!(u64::from(position.frame_offset), frame - folder.start_frame);
            assert_eq!(loc.absolute_frame(position), Some(frame));
        }
    }

    #[test]
    fn locate_outside_every_range_is_none() {
        let loc = locator(&["0_999", "5000_5999"]);
        assert_eq!(loc.locate(2000), None);
        assert_eq!(loc.locate(6000), None);
        assert_eq!(loc.locate(u64::MAX), None);
    }

    #[test]
    fn locate_on_empty_layout_is_none() {
        let loc = locator(&[]);
        assert!(loc.is_empty());
        assert_eq!(loc.locate(0), None);
    }

    #[test]
    fn jump_to_1500_lands_in_second_folder() {
        let loc = locator(&["0_999", "1000_1999"]);
        assert_eq!(loc.locate(1500), Some(Position::new(1, 500)));
    }

    #[test]
    fn unparsable_names_are_skipped() {
        let loc = locator(&["0_999", "thumbs", "1000_1999"]);
        assert_eq!(loc.folder_count(), 2);
        assert_eq!(loc.folder(1).unwrap().name, "1000_1999");
    }

    #[test]
    fn folders_are_ordered_by_start() {
        let loc = locator(&["1000_1999", "0_999"]);
        assert_eq!(loc.folder(0).unwrap().name, "0_999");
    }

    #[test]
    fn offset_beyond_short_folder_still_addresses() {
        // Folder only holds 500 frames but offsets are fixed at 1000 slots.
        let loc = locator(&["0_499", "500_999"]);
        assert_eq!(loc.absolute_frame(Position::new(0, 700)), Some(700));
    }

    #[test]
    fn image_path_and_url() {
        let loc = locator(&["000000_000999", "001000_001999"]);
        let position = Position::new(1, 42);
        assert_eq!(
            loc.image_path(position).as_deref(),
            Some("match_VIDEO/001000_001999/000042.jpg")
        );
        assert_eq!(
            loc.image_url(position).as_deref(),
            Some("/static/frames/match_VIDEO/001000_001999/000042.jpg")
        );
    }

    #[test]
    fn frames_near_the_top_of_the_range_do_not_overflow() {
        let start = u64::MAX - 500;
        let loc = FrameLocator::new(
            "v",
            vec![FolderRange {
                name: format!("{start}_{}", u64::MAX),
                start_frame: start,
                end_frame: u64::MAX,
            }],
        );
        assert_eq!(loc.absolute_frame(Position::new(0, 500)), Some(u64::MAX));
        assert_eq!(loc.absolute_frame(Position::new(0, 999)), None);
    }

    #[test]
    fn invalid_positions_do_not_resolve() {
        let loc = locator(&["0_999"]);
        assert_eq!(loc.absolute_frame(Position::new(1, 0)), None);
        assert_eq!(loc.image_path(Position::new(0, 1000)), None);
    }
}
