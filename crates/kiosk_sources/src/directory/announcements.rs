use std::path::{Path, PathBuf};

use kiosk_core::{Announcement, Result};

use super::{list_files, read_trimmed_text, DirectoryScan, FileClass, ListedFile};
use crate::logging::Logger;

/// Longest announcement shown on the ticker, in characters.
pub const MAX_ANNOUNCEMENT_CHARS: usize = 100;

/// Every short `.txt` file in a directory becomes one announcement.
#[derive(Debug, Clone)]
pub struct AnnouncementGrouper {
    root: PathBuf,
}

impl AnnouncementGrouper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DirectoryScan for AnnouncementGrouper {
    type Item = Announcement;

    fn feed(&self) -> &str {
        "announcements"
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn try_scan(&self) -> Result<Vec<Announcement>> {
        let logger = Logger::for_feed(self.feed());
        let mut announcements = Vec::new();
        for file in text_files(list_files(&self.root, &logger)?) {
            let content = read_trimmed_text(&file.path)?;
            let chars = content.chars().count();
            if (1..=MAX_ANNOUNCEMENT_CHARS).contains(&chars) {
                announcements.push(Announcement { content });
            } else {
                logger.debug(&format!("skipping {} ({} chars)", file.file_name(), chars));
            }
        }
        Ok(announcements)
    }
}

/// `.txt` files in listing order.
fn text_files(files: Vec<ListedFile>) -> Vec<ListedFile> {
    files
        .into_iter()
        .filter(|file| file.class() == Some(FileClass::Text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_text_files_keep_listing_order() {
        let listed = |stem: &str, extension: &str| ListedFile {
            path: PathBuf::from(format!("/srv/board/{}.{}", stem, extension)),
            stem: stem.to_string(),
            extension: extension.to_string(),
        };
        let files = vec![
            listed("zebra", "txt"),
            listed("agenda", "md"),
            listed("menu", "txt"),
            listed("logo", "png"),
            listed("alpha", "txt"),
        ];

        let stems: Vec<String> = text_files(files).into_iter().map(|f| f.stem).collect();
        assert_eq!(stems, vec!["zebra", "menu", "alpha"]);
    }

    #[test]
    fn test_length_is_counted_in_characters() {
        let temp = tempdir().unwrap();
        // 100 two-byte characters
        fs::write(temp.path().join("accents.txt"), "é".repeat(100)).unwrap();

        let announcements = AnnouncementGrouper::new(temp.path()).try_scan().unwrap();
        assert_eq!(announcements.len(), 1);
        assert_eq!(announcements[0].content.chars().count(), 100);
    }

    #[test]
    fn test_non_text_files_are_ignored() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("banner.png"), b"png").unwrap();
        fs::write(temp.path().join("notes.md"), "not shown").unwrap();
        fs::write(temp.path().join("lunch.TXT"), " Pizza at noon ").unwrap();

        let announcements = AnnouncementGrouper::new(temp.path()).try_scan().unwrap();
        assert_eq!(
            announcements,
            vec![Announcement {
                content: "Pizza at noon".to_string()
            }]
        );
    }

    #[test]
    fn test_missing_directory_scans_empty() {
        let temp = tempdir().unwrap();
        let grouper = AnnouncementGrouper::new(temp.path().join("offline-share"));
        assert!(grouper.try_scan().is_err());
        assert!(grouper.scan().is_empty());
    }
}
