use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use rust_slideshow::Error;
use rust_slideshow::navigator::{Direction, Navigator};
use rust_slideshow::render::ImageCrateDecoder;
use rust_slideshow::scan::{ImageSet, ScanOptions};
use tempfile::tempdir;

fn png(path: &Path) {
    RgbaImage::new(4, 3)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

#[test]
fn scan_keeps_decodable_images_in_name_order() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    png(&root.join("c.png"));
    png(&root.join("a.png"));
    // Misleading extension but real PNG bytes: the probe sniffs content.
    png(&root.join("b.dat"));
    fs::write(root.join("notes.txt"), b"hello").unwrap();
    fs::write(root.join("broken.jpg"), b"x").unwrap();
    fs::create_dir_all(root.join("sub")).unwrap();
    png(&root.join("sub").join("deep.png"));

    let set = ImageSet::scan(root, &ScanOptions::default(), &ImageCrateDecoder::default()).unwrap();
    let names: Vec<String> = set
        .as_slice()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.png", "b.dat", "c.png"]);
    assert_eq!(set.directory(), root);
}

#[test]
fn recursive_scan_skips_hidden_directories() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    png(&root.join("top.png"));
    fs::create_dir_all(root.join("nested")).unwrap();
    png(&root.join("nested").join("inner.png"));
    fs::create_dir_all(root.join(".cache")).unwrap();
    png(&root.join(".cache").join("hidden.png"));

    let opts = ScanOptions {
        recursive: true,
        max_depth: None,
    };
    let set = ImageSet::scan(root, &opts, &ImageCrateDecoder::default()).unwrap();
    let mut found: Vec<PathBuf> = set
        .as_slice()
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
        .collect();
    found.sort();
    assert_eq!(
        found,
        vec![PathBuf::from("nested/inner.png"), PathBuf::from("top.png")]
    );
}

#[test]
fn missing_directory_is_unavailable() {
    let tmp = tempdir().unwrap();
    let gone = tmp.path().join("gone");
    let err = ImageSet::scan(&gone, &ScanOptions::default(), &ImageCrateDecoder::default())
        .unwrap_err();
    assert!(matches!(err, Error::DirectoryUnavailable(ref p) if *p == gone));
    assert!(err.is_recoverable());
}

#[test]
fn file_path_is_not_a_directory() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("a.png");
    png(&file);
    let err = ImageSet::scan(&file, &ScanOptions::default(), &ImageCrateDecoder::default())
        .unwrap_err();
    assert!(matches!(err, Error::DirectoryUnavailable(_)));
}

#[test]
fn directory_without_images_gives_empty_set() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("readme.md"), b"# nothing").unwrap();
    let set = ImageSet::scan(tmp.path(), &ScanOptions::default(), &ImageCrateDecoder::default())
        .unwrap();
    assert!(set.is_empty());

    let mut nav = Navigator::new(set);
    assert!(matches!(
        nav.advance(Direction::Forward),
        Err(Error::EmptyImageSet)
    ));
}

#[test]
fn scan_and_navigator_cooperate() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    for name in ["x.png", "y.png"] {
        png(&root.join(name));
    }

    let set = ImageSet::scan(root, &ScanOptions::default(), &ImageCrateDecoder::default()).unwrap();
    let mut nav = Navigator::new(set);
    let mut seen = Vec::new();
    for _ in 0..3 {
        nav.advance(Direction::Forward).unwrap();
        seen.push(nav.current_path().unwrap().to_path_buf());
    }
    assert_eq!(
        seen,
        vec![root.join("x.png"), root.join("y.png"), root.join("x.png")]
    );
}

#[cfg(unix)]
#[test]
fn symlinked_images_are_kept() {
    let tmp = tempdir().unwrap();
    let store = tmp.path().join("store");
    let shown = tmp.path().join("shown");
    fs::create_dir_all(&store).unwrap();
    fs::create_dir_all(&shown).unwrap();
    png(&store.join("real.png"));
    png(&shown.join("b.png"));
    std::os::unix::fs::symlink(store.join("real.png"), shown.join("a.png")).unwrap();

    let set = ImageSet::scan(&shown, &ScanOptions::default(), &ImageCrateDecoder::default())
        .unwrap();
    assert_eq!(set.as_slice(), &[shown.join("a.png"), shown.join("b.png")]);
}

#[test]
fn recursive_scan_honours_max_depth() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    png(&root.join("top.png"));
    fs::create_dir_all(root.join("a").join("b")).unwrap();
    png(&root.join("a").join("inner.png"));
    png(&root.join("a").join("b").join("deep.png"));

    let scan = |max_depth| {
        let opts = ScanOptions {
            recursive: true,
            max_depth,
        };
        ImageSet::scan(root, &opts, &ImageCrateDecoder::default())
            .unwrap()
            .len()
    };
    assert_eq!(scan(Some(1)), 1);
    assert_eq!(scan(Some(2)), 2);
    assert_eq!(scan(Some(0)), 3);
    assert_eq!(scan(None), 3);
}
