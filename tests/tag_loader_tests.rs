mod common;

use song_metadata_copier::models::{AudioFormat, Field};
use song_metadata_copier::tags::load_tags;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn unsupported_extension_is_not_an_error() {
    // extension decides, the file does not even need to exist
    let got = load_tags(Path::new("/nowhere/song.wav")).expect("no error for wav");
    assert!(got.is_none());

    let td = tempdir().unwrap();
    let disguised = td.path().join("really_an_mp3.ogg");
    common::write_mp3(&disguised);
    assert!(load_tags(&disguised).unwrap().is_none());
}

#[test]
fn extension_check_is_case_insensitive() {
    let td = tempdir().unwrap();
    let mp3 = td.path().join("LOUD.MP3");
    let flac = td.path().join("Quiet.FlAc");
    common::write_mp3(&mp3);
    common::write_flac(&flac);

    assert_eq!(load_tags(&mp3).unwrap().unwrap().format(), AudioFormat::Mp3);
    assert_eq!(load_tags(&flac).unwrap().unwrap().format(), AudioFormat::Flac);
}

#[test]
fn tagless_file_loads_empty_set_that_can_be_saved() {
    let td = tempdir().unwrap();
    for name in ["blank.mp3", "blank.flac"] {
        let p = td.path().join(name);
        common::tagged_file(&p, &[]);

        let mut tags = load_tags(&p).unwrap().unwrap();
        assert!(Field::ALL.iter().all(|f| !tags.contains(*f)), "{} should start empty", name);

        tags.set(Field::Title, ["Hello"]);
        tags.set(Field::Composer, ["Someone"]);
        tags.save().unwrap();

        let reloaded = load_tags(&p).unwrap().unwrap();
        assert_eq!(reloaded.get(Field::Title), vec!["Hello".to_string()]);
        assert_eq!(reloaded.get_first(Field::Composer), Some("Someone"));
        assert!(!reloaded.contains(Field::Genre));
    }
}

#[test]
fn set_replaces_previous_values() {
    let td = tempdir().unwrap();
    let p = td.path().join("song.flac");
    common::tagged_file(&p, &[(Field::Artist, "First")]);

    let mut tags = load_tags(&p).unwrap().unwrap();
    tags.set(Field::Artist, ["Second"]);
    tags.save().unwrap();

    assert_eq!(load_tags(&p).unwrap().unwrap().get(Field::Artist), vec!["Second".to_string()]);
}

#[test]
fn save_reports_tag_that_cannot_be_read_back() {
    let td = tempdir().unwrap();
    let p = td.path().join("bare.flac");
    common::write_streaminfo_only_flac(&p);

    let mut tags = load_tags(&p).unwrap().unwrap();
    tags.set(Field::Title, ["Lost"]);
    let err = tags.save().unwrap_err();
    assert!(err.to_string().contains("cannot be read back"), "{:#}", err);
}

#[test]
fn flac_fixture_keeps_written_tags() {
    let td = tempdir().unwrap();
    let p = td.path().join("padded.flac");
    common::write_flac(&p);

    let mut tags = load_tags(&p).unwrap().unwrap();
    tags.set(Field::Date, ["1999"]);
    tags.save().unwrap();

    assert_eq!(load_tags(&p).unwrap().unwrap().get_first(Field::Date), Some("1999"));
}

#[test]
fn debug_output_names_the_file() {
    let td = tempdir().unwrap();
    let p = td.path().join("shown.mp3");
    common::write_mp3(&p);

    let shown = format!("{:?}", load_tags(&p).unwrap().unwrap());
    assert!(shown.starts_with("TagSet"), "{}", shown);
    assert!(shown.contains("shown.mp3"));
    assert!(shown.contains("Mp3"));
}
