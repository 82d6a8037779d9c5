use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use daybook_shared::TaskRepository;
use daybook_shared::repository::{TaskMap, decode_task_map, encode_task_map};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Task map kept as one JSON document on disk.
#[derive(Debug)]
pub struct JsonFileRepository {
    pub data_dir: PathBuf,
    pub path: PathBuf,
}

impl JsonFileRepository {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path, file_name: &str) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let path = data_dir.join(file_name);
        info!(
            data_dir = %data_dir.display(),
            tasks = %path.display(),
            "opened task file"
        );

        Ok(Self { data_dir, path })
    }
}

impl TaskRepository for JsonFileRepository {
    #[tracing::instrument(skip(self), fields(file = %self.path.display()))]
    fn load(&self) -> anyhow::Result<TaskMap> {
        if !self.path.exists() {
            debug!("task file absent");
            return Ok(TaskMap::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed reading {}", self.path.display()))?;
        let tasks = decode_task_map(&raw)
            .with_context(|| format!("failed parsing {}", self.path.display()))?;

        debug!(dates = tasks.len(), "loaded task file");
        Ok(tasks)
    }

    /// Writes through a temp file in the same directory so a crash never
    /// leaves a truncated document behind.
    #[tracing::instrument(skip(self, tasks), fields(file = %self.path.display()))]
    fn save(&mut self, tasks: &TaskMap) -> anyhow::Result<()> {
        let encoded = encode_task_map(tasks)?;

        let mut temp = NamedTempFile::new_in(&self.data_dir)?;
        temp.write_all(encoded.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|err| anyhow!("failed to persist {}: {}", self.path.display(), err))?;

        debug!(dates = tasks.len(), "saved task file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use daybook_shared::DateKey;
    use tempfile::tempdir;

    use super::*;

    fn sample() -> TaskMap {
        let mut tasks = TaskMap::new();
        tasks.insert(
            DateKey::parse("2024-05-10").expect("valid key"),
            vec!["Buy milk".to_string(), "Call Bob".to_string()],
        );
        tasks
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp = tempdir().expect("tempdir");
        let repo = JsonFileRepository::open(temp.path(), "tasks.json").expect("open");
        assert!(repo.load().expect("load").is_empty());
        assert!(!repo.path.exists());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempdir().expect("tempdir");
        let mut repo = JsonFileRepository::open(temp.path(), "tasks.json").expect("open");
        repo.save(&sample()).expect("save");

        assert_eq!(
            fs::read_to_string(&repo.path).expect("read"),
            r#"{"2024-05-10":["Buy milk","Call Bob"]}"#
        );
        assert_eq!(repo.load().expect("load"), sample());
    }

    #[test]
    fn save_overwrites_the_whole_document() {
        let temp = tempdir().expect("tempdir");
        let mut repo = JsonFileRepository::open(temp.path(), "tasks.json").expect("open");
        repo.save(&sample()).expect("save");
        repo.save(&TaskMap::new()).expect("save empty");

        assert_eq!(fs::read_to_string(&repo.path).expect("read"), "{}");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let repo = JsonFileRepository::open(temp.path(), "tasks.json").expect("open");
        fs::write(&repo.path, "{\"2024-05-10\": [").expect("write");

        let err = repo.load().expect_err("truncated json");
        assert!(format!("{err:#}").contains("failed parsing"));
    }
}
