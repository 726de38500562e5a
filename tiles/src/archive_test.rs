use std::io::Read;

use super::*;

fn tile(name: &str, png: &[u8]) -> Tile {
    Tile {
        name: name.to_owned(),
        row: 0,
        col: 0,
        width: 1,
        height: 1,
        png: png.to_vec(),
    }
}

#[test]
fn bundle_empty_is_an_error() {
    let err = bundle(&[]).expect_err("empty");
    assert!(matches!(err, TilesError::NothingToBundle));
}

#[test]
fn bundle_keeps_names_and_order() {
    let tiles = vec![tile("image_1-1.png", b"a"), tile("image_1-2.png", b"b"), tile("image_2-1.png", b"c")];
    let bytes = bundle(&tiles).expect("bundle");
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
    assert_eq!(archive.len(), 3);
    for (i, expected) in ["image_1-1.png", "image_1-2.png", "image_2-1.png"].iter().enumerate() {
        let entry = archive.by_index(i).expect("entry");
        assert_eq!(entry.name(), *expected);
    }
}

#[test]
fn bundle_stores_exact_bytes() {
    let payload = b"\x89PNG\r\n\x1a\nnot really a png";
    let bytes = bundle(&[tile("image_1-1.png", payload)]).expect("bundle");
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
    let mut entry = archive.by_name("image_1-1.png").expect("entry");
    assert_eq!(entry.compression(), CompressionMethod::Stored);
    let mut read_back = Vec::new();
    entry.read_to_end(&mut read_back).expect("read entry");
    assert_eq!(read_back, payload);
}
