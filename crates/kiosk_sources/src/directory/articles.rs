use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kiosk_core::{Article, Result};

use super::{list_files, read_bytes, read_trimmed_text, DirectoryScan, FileClass, ListedFile};
use crate::logging::Logger;

/// MIME type for an image extension (case-insensitive).
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Files sharing one stem. Later files of the same class replace earlier ones.
#[derive(Debug, Default)]
struct ArticleGroup {
    text: Option<ListedFile>,
    image: Option<ListedFile>,
}

/// Pairs `<stem>.txt` with `<stem>.<image>` in a flat directory.
#[derive(Debug, Clone)]
pub struct DirectoryArticleGrouper {
    root: PathBuf,
}

impl DirectoryArticleGrouper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn build_article(stem: String, group: ArticleGroup) -> Result<Article> {
        let image_path = match &group.image {
            Some(image) => {
                let bytes = read_bytes(&image.path)?;
                Some(data_uri(mime_for_extension(&image.extension), &bytes))
            }
            None => None,
        };
        let description = match &group.text {
            Some(text) => read_trimmed_text(&text.path)?,
            None => String::new(),
        };
        Ok(Article {
            title: stem,
            description,
            image_path,
        })
    }
}

impl DirectoryScan for DirectoryArticleGrouper {
    type Item = Article;

    fn feed(&self) -> &str {
        "articles"
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn try_scan(&self) -> Result<Vec<Article>> {
        let logger = Logger::for_feed(self.feed());
        let files = list_files(&self.root, &logger)?;
        group_by_stem(files, &logger)
            .into_iter()
            .map(|(stem, group)| Self::build_article(stem, group))
            .collect()
    }
}

/// Group recognized files by stem, in the order each stem is first listed.
fn group_by_stem(files: Vec<ListedFile>, logger: &Logger) -> Vec<(String, ArticleGroup)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, ArticleGroup> = HashMap::new();
    for file in files {
        let Some(class) = file.class() else {
            continue;
        };
        let group = groups.entry(file.stem.clone()).or_insert_with(|| {
            order.push(file.stem.clone());
            ArticleGroup::default()
        });
        let slot = match class {
            FileClass::Text => &mut group.text,
            FileClass::Image => &mut group.image,
        };
        let name = file.file_name();
        if let Some(previous) = slot.replace(file) {
            logger.warn(&format!(
                "{} replaces {} for article '{}'",
                name,
                previous.file_name(),
                previous.stem
            ));
        }
    }

    order
        .into_iter()
        .filter_map(|stem| groups.remove(&stem).map(|group| (stem, group)))
        .collect()
}
