use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context;
use checkers_engine::ScoreStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contents of the score file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFile {
    /// Time of the last recorded win (ISO 8601 format)
    pub updated_at: Option<DateTime<Utc>>,
    /// Win counters keyed by player name
    pub scores: BTreeMap<String, u32>,
}

/// Win counters persisted as a JSON file.
///
/// Every update rewrites the file. Write failures are logged and the counters
/// stay available in memory.
#[derive(Debug)]
pub struct JsonScoreStore {
    path: PathBuf,
    file: ScoreFile,
}

impl JsonScoreStore {
    /// Opens the score file at `path`; a missing file reads as empty.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let file = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file)).with_context(|| {
                format!("Failed to parse score JSON file: {}", path.display())
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => ScoreFile::default(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to open score file: {}", path.display()));
            }
        };
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &ScoreFile {
        &self.file
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create file: {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.file)
            .with_context(|| format!("Failed to write JSON to {}", self.path.display()))?;
        writeln!(writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to flush output to {}", self.path.display()))?;
        Ok(())
    }
}

impl ScoreStore for JsonScoreStore {
    fn get(&self, key: &str) -> u32 {
        self.file.scores.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u32) {
        self.file.scores.insert(key.to_owned(), value);
        self.file.updated_at = Some(Utc::now());
        if let Err(err) = self.save() {
            tracing::warn!(path = %self.path.display(), "failed to save scores: {err:#}");
        }
    }
}

/// Handle to one score store, shared by the menu and the game it starts.
#[derive(Debug, Clone)]
pub struct SharedScoreStore(Rc<RefCell<dyn ScoreStore>>);

impl SharedScoreStore {
    pub fn new(store: impl ScoreStore + 'static) -> Self {
        Self(Rc::new(RefCell::new(store)))
    }
}

impl ScoreStore for SharedScoreStore {
    fn get(&self, key: &str) -> u32 {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: u32) {
        self.0.borrow_mut().set(key, value);
    }
}

#[cfg(test)]
mod tests {
    use checkers_engine::{Side, record_win, wins};

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("checkers-cli-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = JsonScoreStore::open(scratch_path("missing.json")).unwrap();
        assert_eq!(store.get("player0"), 0);
        assert!(store.file().updated_at.is_none());
    }

    #[test]
    fn test_wins_survive_reopen() {
        let path = scratch_path("scores.json");
        let _ = fs::remove_file(&path);

        let mut store = JsonScoreStore::open(&path).unwrap();
        record_win(&mut store, Side::Player1);
        record_win(&mut store, Side::Player1);
        assert!(store.file().updated_at.is_some());

        let reopened = JsonScoreStore::open(&path).unwrap();
        assert_eq!(wins(&reopened, Side::Player1), 2);
        assert_eq!(wins(&reopened, Side::Player0), 0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_shared_handles_see_each_other() {
        let first = SharedScoreStore::new(checkers_engine::MemoryScoreStore::new());
        let mut second = first.clone();
        record_win(&mut second, Side::Player0);
        assert_eq!(wins(&first, Side::Player0), 1);
    }

    #[test]
    fn test_rejects_malformed_file() {
        let path = scratch_path("broken.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(JsonScoreStore::open(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
