//! Shared test utilities and fixture generators

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use tempfile::TempDir;

use songport::adapter::{AdapterError, ReadError, SongIter, SongReader, SongWriter};
use songport::song::{Field, Song, SongError};

/// Build a canonical song with the fields the end-to-end tests care about.
pub fn song(name: &str, artist: &str, year: Option<i32>, rating: Option<u8>) -> Song {
    Song {
        name: name.to_string(),
        artist: artist.to_string(),
        location: format!("file:///music/{}.mp3", name.to_lowercase().replace(' ', "_")),
        genre: None,
        bpm: None,
        rating,
        played_count: None,
        year,
        date_added: None,
        date_added_raw: None,
    }
}

/// Build a foreign record from key/value pairs.
pub fn foreign(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A per-record normalization failure, as a reader would surface it.
pub fn normalization_failure() -> ReadError {
    ReadError::Song(SongError::MissingField {
        field: Field::Location,
    })
}

/// An unrecoverable adapter failure.
pub fn adapter_failure(message: &str) -> ReadError {
    ReadError::Adapter(AdapterError::Message(message.to_string()))
}

/// Reader yielding a scripted sequence of per-record outcomes. One-shot,
/// like every reader.
pub struct ScriptedReader {
    items: Vec<Result<Song, ReadError>>,
}

impl ScriptedReader {
    pub fn new(items: Vec<Result<Song, ReadError>>) -> Self {
        Self { items }
    }

    pub fn of_songs(songs: Vec<Song>) -> Self {
        Self::new(songs.into_iter().map(Ok).collect())
    }
}

impl SongReader for ScriptedReader {
    fn songs(&mut self) -> Result<SongIter<'_>, AdapterError> {
        let items = std::mem::take(&mut self.items);
        Ok(Box::new(items.into_iter()))
    }
}

/// Writer recording every accepted song into a shared buffer, so tests can
/// inspect writes after the migration consumed the writer.
#[derive(Clone, Default)]
pub struct RecordingWriter {
    pub written: Rc<RefCell<Vec<Song>>>,
    pub finished: Rc<RefCell<bool>>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SongWriter for RecordingWriter {
    fn write(&mut self, song: &Song) -> Result<(), AdapterError> {
        self.written.borrow_mut().push(song.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AdapterError> {
        *self.finished.borrow_mut() = true;
        Ok(())
    }
}

/// Writer failing on its nth write (zero-based).
pub struct FailingWriter {
    pub fail_at: usize,
    pub count: usize,
}

impl FailingWriter {
    pub fn new(fail_at: usize) -> Self {
        Self { fail_at, count: 0 }
    }
}

impl SongWriter for FailingWriter {
    fn write(&mut self, _song: &Song) -> Result<(), AdapterError> {
        if self.count == self.fail_at {
            return Err(AdapterError::Message("destination rejected record".into()));
        }
        self.count += 1;
        Ok(())
    }
}

/// Write a property-list style XML library export with the given tracks.
pub fn write_xml_library<K, V>(tracks: &[Vec<(K, V)>]) -> (TempDir, PathBuf)
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<plist version=\"1.0\">\n<dict>\n    <key>Tracks</key>\n    <dict>\n",
    );
    for (id, track) in tracks.iter().enumerate() {
        body.push_str(&format!("        <key>{}</key>\n        <dict>\n", 1000 + id));
        body.push_str(&format!(
            "            <key>Track ID</key><integer>{}</integer>\n",
            1000 + id
        ));
        for (key, value) in track {
            body.push_str(&format!(
                "            <key>{}</key><string>{}</string>\n",
                key.as_ref(),
                value.as_ref()
            ));
        }
        body.push_str("        </dict>\n");
    }
    body.push_str("    </dict>\n</dict>\n</plist>\n");

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Library.xml");
    std::fs::write(&path, body).unwrap();
    (temp_dir, path)
}

/// Write a JSON store file with the given raw body.
pub fn write_json_store(body: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("music.json");
    std::fs::write(&path, body).unwrap();
    (temp_dir, path)
}

/// Generate `count` tracks with distinct names for limit/stress tests.
pub fn generate_tracks(count: usize) -> Vec<Vec<(String, String)>> {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|i| {
            vec![
                ("Name".to_string(), format!("Track {}", i)),
                ("Artist".to_string(), format!("Artist {}", i % 7)),
                (
                    "Location".to_string(),
                    format!("file:///music/track_{}.mp3", i),
                ),
                ("Rating".to_string(), rng.gen_range(0..=100).to_string()),
                ("Year".to_string(), rng.gen_range(1960..=2024).to_string()),
            ]
        })
        .collect()
}
