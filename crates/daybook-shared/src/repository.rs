use std::collections::BTreeMap;

use anyhow::{
  Context,
  bail
};

use crate::date_key::DateKey;

/// Persisted form of the task store:
/// date key to task texts in display
/// order.
pub type TaskMap =
  BTreeMap<DateKey, Vec<String>>;

/// Durable slot holding the whole task
/// map.
///
/// `load` returns an empty map when the
/// slot has never been written and an
/// error when its content cannot be
/// read or decoded. `save` overwrites
/// the slot in full.
pub trait TaskRepository {
  fn load(&self) -> anyhow::Result<TaskMap>;

  fn save(
    &mut self,
    tasks: &TaskMap
  ) -> anyhow::Result<()>;
}

pub fn encode_task_map(
  tasks: &TaskMap
) -> anyhow::Result<String> {
  serde_json::to_string(tasks)
    .context("failed to encode task map")
}

pub fn decode_task_map(
  raw: &str
) -> anyhow::Result<TaskMap> {
  if raw.trim().is_empty() {
    return Ok(TaskMap::new());
  }
  serde_json::from_str(raw)
    .context("failed to decode task map")
}

/// Single in-memory JSON slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
  slot:      Option<String>,
  saves:     usize,
  read_only: bool
}

impl MemoryRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_raw(
    raw: impl Into<String>
  ) -> Self {
    Self {
      slot: Some(raw.into()),
      ..Self::default()
    }
  }

  /// Every later `save` fails and
  /// leaves the slot untouched.
  pub fn read_only(mut self) -> Self {
    self.read_only = true;
    self
  }

  pub fn raw(&self) -> Option<&str> {
    self.slot.as_deref()
  }

  pub fn save_count(&self) -> usize {
    self.saves
  }
}

impl TaskRepository for MemoryRepository {
  fn load(&self) -> anyhow::Result<TaskMap> {
    match self.slot.as_deref() {
      | Some(raw) => decode_task_map(raw),
      | None => Ok(TaskMap::new())
    }
  }

  fn save(
    &mut self,
    tasks: &TaskMap
  ) -> anyhow::Result<()> {
    if self.read_only {
      bail!("task slot is read-only");
    }
    self.slot =
      Some(encode_task_map(tasks)?);
    self.saves += 1;
    Ok(())
  }
}
