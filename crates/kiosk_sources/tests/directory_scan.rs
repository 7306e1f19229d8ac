use std::fs;
use std::path::Path;

use kiosk_core::{Announcement, Article};
use kiosk_sources::directory::data_uri;
use kiosk_sources::{AnnouncementGrouper, DirectoryArticleGrouper, DirectoryScan};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, contents: impl AsRef<[u8]>) {
    fs::write(dir.join(name), contents).unwrap();
}

fn sorted_by_title(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by(|a, b| a.title.cmp(&b.title));
    articles
}

#[test]
fn text_and_image_with_same_stem_form_one_article() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.txt", "\n\tNew cafeteria menu\n");
    write(temp.path(), "a.jpg", b"\xff\xd8\xff");

    let articles = DirectoryArticleGrouper::new(temp.path()).scan();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "a");
    assert_eq!(articles[0].description, "New cafeteria menu");
    assert_eq!(
        articles[0].image_path.as_deref(),
        Some(data_uri("image/jpeg", b"\xff\xd8\xff").as_str())
    );
}

#[test]
fn image_only_article_has_empty_description() {
    let temp = tempdir().unwrap();
    write(temp.path(), "b.png", b"\x89PNG");

    let articles = DirectoryArticleGrouper::new(temp.path()).scan();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "b");
    assert_eq!(articles[0].description, "");
    let image = articles[0].image_path.as_deref().unwrap();
    assert!(image.starts_with("data:image/png;base64,"));
}

#[test]
fn text_only_article_has_no_image() {
    let temp = tempdir().unwrap();
    write(temp.path(), "c.txt", "  hello  ");

    let articles = DirectoryArticleGrouper::new(temp.path()).scan();

    assert_eq!(
        articles,
        vec![Article {
            title: "c".to_string(),
            description: "hello".to_string(),
            image_path: None,
        }]
    );
}

#[test]
fn unrecognized_files_and_directories_are_ignored() {
    let temp = tempdir().unwrap();
    write(temp.path(), "deck.pdf", b"%PDF");
    write(temp.path(), "notes", "no extension");
    write(temp.path(), "photo.webp", b"RIFF");
    fs::create_dir(temp.path().join("archive.jpg")).unwrap();
    write(temp.path(), "d.txt", "kept");

    let articles = DirectoryArticleGrouper::new(temp.path()).scan();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "d");
}

#[test]
fn extension_match_is_case_insensitive() {
    let temp = tempdir().unwrap();
    write(temp.path(), "Town Hall.TXT", "Friday 3pm");
    write(temp.path(), "Town Hall.JpEg", b"img");

    let articles = DirectoryArticleGrouper::new(temp.path()).scan();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "Town Hall");
    assert_eq!(articles[0].description, "Friday 3pm");
    assert!(articles[0]
        .image_path
        .as_deref()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
}

#[test]
fn same_stem_same_class_keeps_one_file() {
    let temp = tempdir().unwrap();
    write(temp.path(), "e.jpg", b"jpg");
    write(temp.path(), "e.png", b"png");

    let articles = DirectoryArticleGrouper::new(temp.path()).scan();

    // Which file wins depends on listing order; exactly one image survives.
    assert_eq!(articles.len(), 1);
    let image = articles[0].image_path.clone().unwrap();
    assert!(
        image == data_uri("image/jpeg", b"jpg") || image == data_uri("image/png", b"png"),
        "unexpected image {}",
        image
    );
}

#[test]
fn every_stem_produces_exactly_one_article() {
    let temp = tempdir().unwrap();
    write(temp.path(), "alpha.txt", "A");
    write(temp.path(), "alpha.gif", b"gif");
    write(temp.path(), "bravo.bmp", b"bmp");
    write(temp.path(), "charlie.txt", "C");

    let articles = sorted_by_title(DirectoryArticleGrouper::new(temp.path()).scan());

    let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["alpha", "bravo", "charlie"]);
    assert!(articles[0].image_path.is_some());
    assert_eq!(articles[1].description, "");
    assert!(articles[2].image_path.is_none());
}

#[test]
fn missing_directory_yields_empty_sequences() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("not-mounted");

    assert!(DirectoryArticleGrouper::new(&missing).scan().is_empty());
    assert!(AnnouncementGrouper::new(&missing).scan().is_empty());
}

#[test]
fn announcements_respect_length_bounds() {
    let temp = tempdir().unwrap();
    write(temp.path(), "empty.txt", "   \n ");
    write(temp.path(), "long.txt", "x".repeat(101));
    write(temp.path(), "exact.txt", format!("  {}  ", "y".repeat(100)));
    write(temp.path(), "short.txt", "Fire drill at 10am");
    write(temp.path(), "poster.jpg", b"jpg");

    let mut announcements = AnnouncementGrouper::new(temp.path()).scan();
    announcements.sort_by(|a, b| a.content.len().cmp(&b.content.len()));

    assert_eq!(
        announcements,
        vec![
            Announcement {
                content: "Fire drill at 10am".to_string()
            },
            Announcement {
                content: "y".repeat(100)
            },
        ]
    );
}

#[test]
fn each_scan_reads_the_directory_again() {
    let temp = tempdir().unwrap();
    let grouper = DirectoryArticleGrouper::new(temp.path());
    assert!(grouper.scan().is_empty());

    write(temp.path(), "late.txt", "arrived");
    assert_eq!(grouper.scan().len(), 1);

    fs::remove_file(temp.path().join("late.txt")).unwrap();
    assert!(grouper.scan().is_empty());
}
