//! Flat-directory scanners that turn a shared folder into display records.
//!
//! Every scan re-reads the directory from scratch. A failure anywhere in a
//! scan (listing, or reading any recognized file) fails the whole scan; the
//! infallible [`DirectoryScan::scan`] turns that into an empty result and an
//! error log so callers never see the error.

use std::fs;
use std::path::{Path, PathBuf};

use kiosk_core::{Error, Result};

use crate::logging::Logger;

pub mod announcements;
pub mod articles;

pub use announcements::AnnouncementGrouper;
pub use articles::{data_uri, mime_for_extension, DirectoryArticleGrouper};

pub const TEXT_EXTENSIONS: &[&str] = &["txt"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

pub trait DirectoryScan {
    type Item;

    /// Feed name used as the log prefix
    fn feed(&self) -> &str;

    fn root(&self) -> &Path;

    /// Scan the directory, surfacing the first failure.
    fn try_scan(&self) -> Result<Vec<Self::Item>>;

    /// Scan the directory; any failure yields an empty sequence.
    fn scan(&self) -> Vec<Self::Item> {
        let logger = Logger::for_feed(self.feed());
        match self.try_scan() {
            Ok(items) => {
                logger.debug(&format!(
                    "scanned {}: {} records",
                    self.root().display(),
                    items.len()
                ));
                items
            }
            Err(e) => {
                logger.error(&format!("scan of {} failed: {}", self.root().display(), e));
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Text,
    Image,
}

impl FileClass {
    /// Classify a lowercased extension; `None` means the file is ignored.
    pub fn from_extension(extension: &str) -> Option<Self> {
        if TEXT_EXTENSIONS.contains(&extension) {
            Some(FileClass::Text)
        } else if IMAGE_EXTENSIONS.contains(&extension) {
            Some(FileClass::Image)
        } else {
            None
        }
    }
}

/// One regular file from a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub path: PathBuf,
    pub stem: String,
    /// Lowercased; empty when the name has no extension.
    pub extension: String,
}

impl ListedFile {
    pub fn class(&self) -> Option<FileClass> {
        FileClass::from_extension(&self.extension)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Regular files directly under `root`, in listing order.
pub fn list_files(root: &Path, logger: &Logger) -> Result<Vec<ListedFile>> {
    let unavailable = |e: std::io::Error| Error::SourceUnavailable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(root).map_err(unavailable)? {
        let path = entry.map_err(unavailable)?.path();
        if !path.is_file() {
            logger.debug(&format!("skipping non-file entry {}", path.display()));
            continue;
        }
        let (Some(stem), Some(name)) = (path.file_stem(), path.file_name()) else {
            continue;
        };
        let (Some(stem), Some(_)) = (stem.to_str(), name.to_str()) else {
            logger.warn(&format!("skipping non UTF-8 file name {}", path.display()));
            continue;
        };
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        files.push(ListedFile {
            stem: stem.to_string(),
            extension,
            path,
        });
    }
    Ok(files)
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::MalformedEntry {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub(crate) fn read_trimmed_text(path: &Path) -> Result<String> {
    let bytes = read_bytes(path)?;
    let text = String::from_utf8(bytes).map_err(|e| Error::MalformedEntry {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(text.trim().to_string())
}
