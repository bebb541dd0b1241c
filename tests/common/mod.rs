#![allow(dead_code)]

use song_metadata_copier::models::Field;
use lofty::tag::ItemKey;
use song_metadata_copier::tags::load_tags;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, stereo, no padding: 417 byte frames.
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
const MP3_FRAME_LEN: usize = 417;

/// Write a tagless mp3 made of a few silent frames.
pub fn write_mp3(path: &Path) {
    let mut f = File::create(path).unwrap();
    for _ in 0..8 {
        let mut frame = vec![0u8; MP3_FRAME_LEN];
        frame[..4].copy_from_slice(&MP3_FRAME_HEADER);
        f.write_all(&frame).unwrap();
    }
}

/// Write a tagless flac: STREAMINFO (1s, 44.1 kHz, stereo, 16 bit), a final
/// PADDING block and some filler standing in for audio frames.
pub fn write_flac(path: &Path) {
    let mut f = File::create(path).unwrap();
    f.write_all(b"fLaC").unwrap();
    // STREAMINFO, not last, 34 byte body
    f.write_all(&[0x00, 0x00, 0x00, 34]).unwrap();
    f.write_all(&streaminfo()).unwrap();
    // last-block flag + PADDING type, 16 byte body
    f.write_all(&[0x81, 0x00, 0x00, 16]).unwrap();
    f.write_all(&[0u8; 16]).unwrap();
    f.write_all(&[0u8; 2048]).unwrap();
}

/// Write a flac whose only metadata block is STREAMINFO, flagged as last.
pub fn write_streaminfo_only_flac(path: &Path) {
    let mut f = File::create(path).unwrap();
    f.write_all(b"fLaC").unwrap();
    f.write_all(&[0x80, 0x00, 0x00, 34]).unwrap();
    f.write_all(&streaminfo()).unwrap();
    f.write_all(&[0u8; 2048]).unwrap();
}

fn streaminfo() -> Vec<u8> {
    let mut info = Vec::with_capacity(34);
    info.extend_from_slice(&4096u16.to_be_bytes()); // min block size
    info.extend_from_slice(&4096u16.to_be_bytes()); // max block size
    info.extend_from_slice(&[0, 0, 0]); // min frame size
    info.extend_from_slice(&[0, 0, 0]); // max frame size
    let packed: u64 = (44_100u64 << 44) | (1u64 << 41) | (15u64 << 36) | 44_100u64;
    info.extend_from_slice(&packed.to_be_bytes());
    info.extend_from_slice(&[0u8; 16]); // md5
    assert_eq!(info.len(), 34);
    info
}

/// Create an audio file of the right kind for `path`'s extension and tag it.
pub fn tagged_file(path: &Path, fields: &[(Field, &str)]) {
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("mp3") => write_mp3(path),
        Some("flac") => write_flac(path),
        other => panic!("no fixture for extension {:?}", other),
    }
    if fields.is_empty() {
        return;
    }
    let mut tags = load_tags(path).unwrap().expect("supported fixture");
    for (field, value) in fields {
        tags.set(*field, [*value]);
    }
    tags.save().unwrap();
}

/// First value of `field` as stored on disk.
pub fn read_field(path: &Path, field: Field) -> Option<String> {
    let tags = load_tags(path).unwrap().expect("supported file");
    tags.get_first(field).map(|s| s.to_string())
}

/// Every value stored under a raw lofty key.
pub fn read_key(path: &Path, key: &ItemKey) -> Vec<String> {
    load_tags(path).unwrap().expect("supported file").values(key)
}

/// Set raw lofty keys on an existing fixture.
pub fn set_keys(path: &Path, items: &[(ItemKey, &str)]) {
    let mut tags = load_tags(path).unwrap().expect("supported file");
    for (key, value) in items {
        tags.set_values(key.clone(), [*value]);
    }
    tags.save().unwrap();
}
