//! Library-level tests for weaving patterns end to end
//!
//! These tests drive `build` and `make` against temporary directories and
//! check the written documents and images.

use plainweave::color::Palette;
use plainweave::document::WeaveDocument;
use plainweave::shed::{Shed, ShedResolver};
use plainweave::{build, make, render_image, serialize_document, Options, Pattern, WeaveError};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn pattern(s: &str) -> Pattern {
    s.parse().expect("valid pattern")
}

fn digest(path: &Path) -> Vec<u8> {
    Sha256::digest(fs::read(path).expect("readable output")).to_vec()
}

fn section_values(doc: &WeaveDocument, name: &str) -> Vec<String> {
    doc.section(name).expect("section present").values().cloned().collect()
}

#[test]
fn test_make_writes_document_and_image() {
    let dir = tempdir().unwrap();
    let options = Options::default().with_dir(dir.path());

    let outputs = make(&pattern("1-2"), &options).unwrap();

    assert_eq!(outputs.wif, dir.path().join("1-2.wif"));
    assert_eq!(outputs.png.as_deref(), Some(dir.path().join("1-2.png").as_path()));

    let text = fs::read_to_string(&outputs.wif).unwrap();
    assert!(text.contains("[WARP]\nThreads=48\n"));
    assert!(text.contains("[WEFT]\nThreads=48\n"));

    let img = image::open(dir.path().join("1-2.png")).unwrap();
    assert_eq!((img.width(), img.height()), (432, 432));
}

#[test]
fn test_outputs_are_byte_reproducible() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let p = pattern("3-1-2");

    make(&p, &Options::default().with_dir(first.path())).unwrap();
    make(&p, &Options::default().with_dir(second.path())).unwrap();

    for name in ["3-1-2.wif", "3-1-2.png"] {
        assert_eq!(digest(&first.path().join(name)), digest(&second.path().join(name)), "{}", name);
    }
}

#[test]
fn test_written_document_matches_serializer() {
    let dir = tempdir().unwrap();
    let options = Options::default().with_dir(dir.path()).with_nickname("harbor");
    let p = pattern("2-2-1");

    let outputs = make(&p, &options).unwrap();
    let woven = build(&p, &options).unwrap();

    assert_eq!(outputs.wif, dir.path().join("2-2-1-harbor.wif"));
    assert_eq!(fs::read(&outputs.wif).unwrap(), serialize_document(&woven.document));
    assert_eq!(
        fs::read(outputs.png.unwrap()).unwrap(),
        render_image(&woven.document, &options).unwrap()
    );
}

#[test]
fn test_reverse_only_changes_weft_colors() {
    let p = pattern("1-2");
    let plain = build(&p, &Options::default()).unwrap().document;
    let reversed = build(&p, &Options::default().with_reverse(true)).unwrap().document;

    assert_eq!(section_values(&plain, "WARP COLORS"), section_values(&reversed, "WARP COLORS"));
    assert_eq!(section_values(&plain, "THREADING"), section_values(&reversed, "THREADING"));
    assert_eq!(section_values(&plain, "TREADLING"), section_values(&reversed, "TREADLING"));

    // With two colors, reversing the key order swaps them shot for shot
    let swapped: Vec<String> = section_values(&plain, "WEFT COLORS")
        .iter()
        .map(|key| if key == "1" { "2".to_string() } else { "1".to_string() })
        .collect();
    assert_eq!(section_values(&reversed, "WEFT COLORS"), swapped);
    assert_ne!(section_values(&plain, "WEFT COLORS"), section_values(&reversed, "WEFT COLORS"));
}

#[test]
fn test_reversed_outputs_are_named_apart() {
    let dir = tempdir().unwrap();
    let p = pattern("1-2");

    make(&p, &Options::default().with_dir(dir.path())).unwrap();
    make(&p, &Options::default().with_dir(dir.path()).with_reverse(true)).unwrap();

    for name in ["1-2.wif", "1-2.png", "1-2-reversed.wif", "1-2-reversed.png"] {
        assert!(dir.path().join(name).is_file(), "{} missing", name);
    }
    assert_ne!(digest(&dir.path().join("1-2.wif")), digest(&dir.path().join("1-2-reversed.wif")));
}

#[test]
fn test_plain_weave_checkerboard() {
    let woven = build(&pattern("1"), &Options::default().with_size(Some(6))).unwrap();
    let resolver = ShedResolver::new(&woven.document).unwrap();

    for shot in 1..=6 {
        for thread in 1..=6 {
            let expected = if (thread + shot) % 2 == 0 { Shed::Raised } else { Shed::Lowered };
            let got = resolver.shed(&thread.to_string(), &shot.to_string()).unwrap();
            assert_eq!(got, expected, "thread {} shot {}", thread, shot);
        }
    }
}

#[test]
fn test_invalid_pattern_writes_nothing() {
    assert!(matches!(Pattern::new(vec![]), Err(WeaveError::Configuration(_))));
    assert!("".parse::<Pattern>().is_err());
    assert!("1-0-2".parse::<Pattern>().is_err());

    let dir = tempdir().unwrap();
    let options = Options::default().with_dir(dir.path()).with_colors(Palette::new());
    assert!(matches!(make(&pattern("1-2"), &options), Err(WeaveError::Configuration(_))));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_malformed_color_keeps_document() {
    let dir = tempdir().unwrap();
    let options = Options::default()
        .with_dir(dir.path())
        .with_colors(Palette::from_colors(["0,0,128", "0,0,300"]));

    let err = make(&pattern("1-2"), &options).unwrap_err();

    assert!(matches!(err, WeaveError::MalformedColor { ref key, .. } if key == "2"));
    assert!(dir.path().join("1-2.wif").is_file());
    assert!(!dir.path().join("1-2.png").exists());
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = tempdir().unwrap();
    let options = Options::default().with_dir(dir.path().join("absent"));
    let err = make(&pattern("1-2"), &options).unwrap_err();
    assert!(matches!(err, WeaveError::Io { .. }));
}

#[test]
fn test_tartan_pattern_weaves() {
    let dir = tempdir().unwrap();
    let p = pattern("1-2-3").tartan(plainweave::TartanStyle::Balanced);
    let outputs = make(&p, &Options::default().with_dir(dir.path())).unwrap();
    assert_eq!(outputs.wif, dir.path().join("1-2-3-2.wif"));
}

/// Complete WIF text for pattern `1-2` at three threads with default options.
fn expected_wif(weft_colors: [&str; 3], weft_line: &str, title: &str) -> String {
    format!(
        "[WIF]
Version=1.1
Date=April 20, 1997
Developers=
Source Program=plainweave
Source Version={version}
[CONTENTS]
COLOR PALETTE=yes
WEAVING=yes
WARP=yes
WEFT=yes
TIEUP=yes
COLOR TABLE=yes
THREADING=yes
WARP COLORS=yes
TREADLING=yes
WEFT COLORS=yes
NOTES=yes
TEXT=yes
[COLOR PALETTE]
Entries=2
Range=0,255
[WEAVING]
Shafts=2
Treadles=2
Rising Shed=no
[WARP]
Threads=3
Units=Inches
Spacing=0.08333333
Thickness=0.08333334
[WEFT]
Threads=3
Units=Inches
Spacing=0.08333333
Thickness=0.08333334
[TIEUP]
1=1
2=2
[COLOR TABLE]
1=0,0,128
2=0,0,0
[THREADING]
1=2
2=1
3=2
[WARP COLORS]
1=1
2=2
3=2
[TREADLING]
1=2
2=1
3=2
[WEFT COLORS]
1={w1}
2={w2}
3={w3}
[NOTES]
1=This plainweave pattern is formed from a repeating pattern of colored threads.
2=The pattern is formed as follows:
3=  1st is the 1st color.
4=  2nd is the 2nd color.
5=  3rd is the 2nd color.
6=
7=This pattern repeats in the warp.
8={weft_line}
9=
10=
11=
12=Pattern 1-2 was created by plainweave {version}.
[TEXT]
Title={title}
Author=
EMail=
",
        version = env!("CARGO_PKG_VERSION"),
        w1 = weft_colors[0],
        w2 = weft_colors[1],
        w3 = weft_colors[2],
        weft_line = weft_line,
        title = title,
    )
}

#[test]
fn test_document_bytes_exact() {
    let woven = build(&pattern("1-2"), &Options::default().with_size(Some(3))).unwrap();
    let text = String::from_utf8(serialize_document(&woven.document)).unwrap();
    assert_eq!(
        text,
        expected_wif(["1", "2", "2"], "This pattern repeats in the weft.", "Plainweave 1-2")
    );
}

#[test]
fn test_reversed_document_bytes_exact() {
    let options = Options::default().with_size(Some(3)).with_reverse(true);
    let woven = build(&pattern("1-2"), &options).unwrap();
    let text = String::from_utf8(serialize_document(&woven.document)).unwrap();
    assert_eq!(
        text,
        expected_wif(
            ["2", "1", "1"],
            "This pattern is reversed in the weft.",
            "Plainweave 1-2 Reversed"
        )
    );
}

#[test]
fn test_written_file_is_exact_document() {
    let dir = tempdir().unwrap();
    let options = Options::default().with_dir(dir.path()).with_size(Some(3));
    make(&pattern("1-2"), &options).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("1-2.wif")).unwrap(),
        expected_wif(["1", "2", "2"], "This pattern repeats in the weft.", "Plainweave 1-2")
    );
}
