//! Integration tests for the built-in adapters

use songport::adapter::json_store::{JsonStoreReader, JsonStoreWriter};
use songport::adapter::xml_library::XmlLibraryReader;
use songport::adapter::{ReadError, SongReader, SongWriter};
use songport::song::Song;

mod common;

use common::*;

#[test]
fn test_xml_reader_normalizes_foreign_keys() {
    let (_temp_dir, path) = write_xml_library(&[vec![
        ("Name", "Blue Train"),
        ("Artist", "John Coltrane"),
        ("Location", "file:///music/blue_train.mp3"),
        ("Play Count", "12"),
        ("Rating", "80"),
        ("Year", "1958"),
        ("Date Added", "2020-03-01T10:30:00Z"),
    ]]);

    let mut reader = XmlLibraryReader::open(&path, 0).unwrap();
    let songs: Vec<Song> = reader
        .songs()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(songs.len(), 1);
    let song = &songs[0];
    assert_eq!(song.name, "Blue Train");
    assert_eq!(song.played_count, Some(12));
    assert_eq!(song.rating, Some(80));
    assert_eq!(song.year, Some(1958));
    assert!(song.date_added.is_some());
}

#[test]
fn test_xml_reader_limit_and_record_count() {
    let tracks = generate_tracks(20);
    let (_temp_dir, path) = write_xml_library(&tracks);

    let reader = XmlLibraryReader::open(&path, 5).unwrap();
    assert_eq!(reader.record_count(), 5);

    // 0 means unlimited
    let reader = XmlLibraryReader::open(&path, 0).unwrap();
    assert_eq!(reader.record_count(), 20);
}

#[test]
fn test_xml_reader_is_one_shot() {
    let (_temp_dir, path) = write_xml_library(&[vec![
        ("Name", "A"),
        ("Artist", "X"),
        ("Location", "/a.mp3"),
    ]]);
    let mut reader = XmlLibraryReader::open(&path, 0).unwrap();
    assert_eq!(reader.songs().unwrap().count(), 1);
    assert_eq!(reader.songs().unwrap().count(), 0);
}

#[test]
fn test_xml_record_missing_location_surfaces_normalization_error() {
    let (_temp_dir, path) = write_xml_library(&[
        vec![("Name", "A"), ("Artist", "X"), ("Location", "/a.mp3")],
        vec![("Name", "B"), ("Artist", "Y")],
    ]);
    let mut reader = XmlLibraryReader::open(&path, 0).unwrap();
    let outcomes: Vec<Result<Song, ReadError>> = reader.songs().unwrap().collect();
    assert!(outcomes[0].is_ok());
    assert!(matches!(outcomes[1], Err(ReadError::Song(_))));
}

#[test]
fn test_reader_contains_uses_same_track_equality() {
    let (_temp_dir, path) = write_xml_library(&[vec![
        ("Name", "Blue Train"),
        ("Artist", "John Coltrane"),
        ("Location", "/a.mp3"),
    ]]);
    let mut reader = XmlLibraryReader::open(&path, 0).unwrap();

    let probe = song("BLUE TRAIN", "john  coltrane", None, None);
    assert!(reader.contains(&probe).unwrap());

    // The membership scan consumed the one-shot pass
    let mut reader = XmlLibraryReader::open(&path, 0).unwrap();
    let miss = song("So What", "Miles Davis", None, None);
    assert!(!reader.contains(&miss).unwrap());
}

#[test]
fn test_json_round_trip_preserves_songs() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("music.json");

    let original = {
        let mut subject = song("Blue Train", "John Coltrane", Some(1958), Some(80));
        subject.genre = Some("Jazz".to_string());
        subject.played_count = Some(12);
        subject
    };

    let mut writer = JsonStoreWriter::open(path.clone()).unwrap();
    writer.write(&original).unwrap();
    writer.finish().unwrap();
    drop(writer);

    let mut reader = JsonStoreReader::open(&path).unwrap();
    let songs: Vec<Song> = reader
        .songs()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(songs.len(), 1);
    let restored = &songs[0];
    assert!(restored.same_track(&original));
    assert_eq!(restored.genre, original.genre);
    assert_eq!(restored.rating, original.rating);
    assert_eq!(restored.year, original.year);
    assert_eq!(restored.played_count, original.played_count);
}

#[test]
fn test_json_date_survives_round_trip() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("music.json");

    let mut original = song("A", "X", None, None);
    original.date_added = Some(
        chrono::NaiveDateTime::parse_from_str("2021-06-15T08:30:00", "%Y-%m-%dT%H:%M:%S")
            .unwrap()
            .and_utc(),
    );

    let mut writer = JsonStoreWriter::open(path.clone()).unwrap();
    writer.write(&original).unwrap();
    writer.finish().unwrap();
    drop(writer);

    let mut reader = JsonStoreReader::open(&path).unwrap();
    let songs: Vec<Song> = reader
        .songs()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(songs[0].date_added, original.date_added);
}

#[test]
fn test_json_writer_appends_to_existing_store() {
    let (_temp_dir, path) = write_json_store(
        r#"[{"name": "A", "artist": "X", "location": "/a.mp3"}]"#,
    );

    let mut writer = JsonStoreWriter::open(path.clone()).unwrap();
    writer.write(&song("B", "Y", None, None)).unwrap();
    writer.finish().unwrap();
    drop(writer);

    let mut reader = JsonStoreReader::open(&path).unwrap();
    let names: Vec<String> = reader
        .songs()
        .unwrap()
        .map(|item| item.unwrap().name)
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_json_writer_persists_on_drop_without_finish() {
    // Records accepted before an aborted run stay durable.
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("music.json");

    {
        let mut writer = JsonStoreWriter::open(path.clone()).unwrap();
        writer.write(&song("A", "X", None, None)).unwrap();
        // dropped without finish()
    }

    let mut reader = JsonStoreReader::open(&path).unwrap();
    assert_eq!(reader.songs().unwrap().count(), 1);
}

#[test]
fn test_json_reader_rejects_non_array_store() {
    let (_temp_dir, path) = write_json_store(r#"{"name": "not an array"}"#);
    assert!(JsonStoreReader::open(&path).is_err());
}

#[test]
fn test_text_report_writer_renders_song_lines() {
    use songport::adapter::registry::AdapterRegistry;
    use songport::adapter::{ParamValue, ResolvedParams};

    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("report.txt");

    let mut params = ResolvedParams::default();
    params.insert("file", ParamValue::Path(path.clone()));

    let registry = AdapterRegistry::builtin().unwrap();
    let entry = registry.get("text-report").unwrap();
    let mut writer = match &entry.factory {
        songport::adapter::registry::AdapterFactory::Writer(build) => build(&params).unwrap(),
        _ => panic!("text-report must register as a writer"),
    };

    let mut subject = song("So What", "Miles Davis", Some(1959), Some(100));
    subject.rating = Some(100);
    writer.write(&subject).unwrap();
    writer.finish().unwrap();
    drop(writer);

    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.contains("Miles Davis - So What"));
    assert!(body.contains("1959"));
    assert!(body.trim_end().ends_with("⭐⭐⭐⭐⭐"));
}
