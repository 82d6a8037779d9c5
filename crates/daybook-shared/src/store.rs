use std::collections::BTreeMap;
use std::fmt;

use anyhow::Context;
use thiserror::Error;
use tracing::{
  debug,
  info,
  warn
};
use uuid::Uuid;

use crate::date_key::DateKey;
use crate::repository::{
  TaskMap,
  TaskRepository
};

/// Session-local handle for one task.
/// Not persisted; reassigned on every
/// load.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct TaskId(Uuid);

impl TaskId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl Default for TaskId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    self.0.fmt(f)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
  pub id:   TaskId,
  pub text: String
}

impl TaskEntry {
  fn new(text: String) -> Self {
    Self {
      id: TaskId::new(),
      text
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
pub enum StoreError {
  #[error(
    "no task at index {index} for \
     {key} ({len} tasks)"
  )]
  IndexOutOfRange {
    key:   DateKey,
    index: usize,
    len:   usize
  },
  #[error(
    "task being edited on {key} no \
     longer exists"
  )]
  StaleTask { key: DateKey },
  /// The change is applied in memory
  /// but the repository refused it.
  #[error(
    "task change kept in memory but \
     not saved"
  )]
  Unsaved
}

impl StoreError {
  /// True when `error` came from a
  /// failed save after the mutation was
  /// already applied.
  pub fn is_unsaved(
    error: &anyhow::Error
  ) -> bool {
    matches!(
      error.downcast_ref::<StoreError>(),
      Some(StoreError::Unsaved)
    )
  }
}

/// In-memory task map mirrored to a
/// repository.
///
/// Every successful mutation rewrites
/// the repository in full before
/// returning. A date key is present
/// only while it holds at least one
/// task.
#[derive(Debug)]
pub struct TaskStore<R> {
  repo:  R,
  tasks: BTreeMap<DateKey, Vec<TaskEntry>>
}

impl<R: TaskRepository> TaskStore<R> {
  /// Never fails: unreadable storage
  /// starts an empty store.
  #[tracing::instrument(skip(repo))]
  pub fn load(repo: R) -> Self {
    let persisted = match repo.load() {
      | Ok(map) => map,
      | Err(error) => {
        warn!(
          error = %format!("{error:#}"),
          "failed loading persisted \
           tasks; starting empty"
        );
        TaskMap::new()
      }
    };

    let tasks: BTreeMap<_, _> = persisted
      .into_iter()
      .filter(|(_, texts)| {
        !texts.is_empty()
      })
      .map(|(key, texts)| {
        let entries = texts
          .into_iter()
          .map(TaskEntry::new)
          .collect::<Vec<_>>();
        (key, entries)
      })
      .collect();

    info!(
      dates = tasks.len(),
      "loaded task store"
    );

    Self { repo, tasks }
  }

  /// Returns `None` when `text` is blank
  /// after trimming.
  #[tracing::instrument(skip_all, fields(key = %key))]
  pub fn add_task(
    &mut self,
    key: DateKey,
    text: &str
  ) -> anyhow::Result<Option<TaskId>> {
    let text = text.trim();
    if text.is_empty() {
      debug!("ignoring blank task");
      return Ok(None);
    }

    let entry =
      TaskEntry::new(text.to_string());
    let id = entry.id;
    let list =
      self.tasks.entry(key).or_default();
    list.push(entry);
    debug!(
      count = list.len(),
      "appended task"
    );

    self.persist()?;
    Ok(Some(id))
  }

  /// Returns `false` when `text` is
  /// blank after trimming.
  #[tracing::instrument(skip_all, fields(key = %key, index = index))]
  pub fn update_task(
    &mut self,
    key: DateKey,
    index: usize,
    text: &str
  ) -> anyhow::Result<bool> {
    let text = text.trim();
    let entry = self.entry_mut(key, index)?;
    if text.is_empty() {
      debug!("ignoring blank update");
      return Ok(false);
    }
    entry.text = text.to_string();

    self.persist()?;
    Ok(true)
  }

  /// Returns the removed text.
  #[tracing::instrument(skip_all, fields(key = %key, index = index))]
  pub fn delete_task(
    &mut self,
    key: DateKey,
    index: usize
  ) -> anyhow::Result<String> {
    let len = self.tasks(key).len();
    let Some(list) =
      self.tasks.get_mut(&key)
    else {
      return Err(
        StoreError::IndexOutOfRange {
          key,
          index,
          len
        }
        .into()
      );
    };
    if index >= list.len() {
      return Err(
        StoreError::IndexOutOfRange {
          key,
          index,
          len
        }
        .into()
      );
    }

    let removed = list.remove(index);
    if list.is_empty() {
      self.tasks.remove(&key);
      debug!("removed empty date");
    }

    self.persist()?;
    Ok(removed.text)
  }

  #[tracing::instrument(skip(self))]
  pub fn persist(
    &mut self
  ) -> anyhow::Result<()> {
    let snapshot = self.snapshot();
    self
      .repo
      .save(&snapshot)
      .context(StoreError::Unsaved)?;
    debug!(
      dates = snapshot.len(),
      "persisted task map"
    );
    Ok(())
  }

  pub fn tasks(
    &self,
    key: DateKey
  ) -> &[TaskEntry] {
    self
      .tasks
      .get(&key)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  pub fn has_tasks(
    &self,
    key: DateKey
  ) -> bool {
    self.tasks.contains_key(&key)
  }

  pub fn position(
    &self,
    key: DateKey,
    id: TaskId
  ) -> Option<usize> {
    self
      .tasks(key)
      .iter()
      .position(|entry| entry.id == id)
  }

  pub fn snapshot(&self) -> TaskMap {
    self
      .tasks
      .iter()
      .map(|(key, entries)| {
        let texts = entries
          .iter()
          .map(|entry| entry.text.clone())
          .collect();
        (*key, texts)
      })
      .collect()
  }

  /// Number of dates holding tasks.
  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  pub fn repository(&self) -> &R {
    &self.repo
  }

  fn entry_mut(
    &mut self,
    key: DateKey,
    index: usize
  ) -> anyhow::Result<&mut TaskEntry> {
    let len = self.tasks(key).len();
    self
      .tasks
      .get_mut(&key)
      .and_then(|list| list.get_mut(index))
      .ok_or_else(|| {
        StoreError::IndexOutOfRange {
          key,
          index,
          len
        }
        .into()
      })
  }
}
