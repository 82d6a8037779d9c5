use anyhow::anyhow;
use daybook_shared::TaskRepository;
use daybook_shared::repository::{
  TaskMap,
  decode_task_map,
  encode_task_map
};
use web_sys::Storage;

pub const TASKS_STORAGE_KEY: &str =
  "tasks";

/// Task map stored under one
/// `localStorage` key.
#[derive(Debug, Clone)]
pub struct LocalStorageRepository {
  key: String
}

impl LocalStorageRepository {
  pub fn new(
    key: impl Into<String>
  ) -> Self {
    Self { key: key.into() }
  }
}

impl TaskRepository
  for LocalStorageRepository
{
  fn load(&self) -> anyhow::Result<TaskMap> {
    let stored = local_storage()?
      .get_item(&self.key)
      .map_err(|error| {
        anyhow!(
          "failed reading local \
           storage key {}: {error:?}",
          self.key
        )
      })?;

    match stored {
      | Some(raw) => decode_task_map(&raw),
      | None => {
        tracing::debug!(
          key = %self.key,
          "no stored tasks"
        );
        Ok(TaskMap::new())
      }
    }
  }

  fn save(
    &mut self,
    tasks: &TaskMap
  ) -> anyhow::Result<()> {
    let json = encode_task_map(tasks)?;
    local_storage()?
      .set_item(&self.key, &json)
      .map_err(|error| {
        anyhow!(
          "failed writing local \
           storage key {}: {error:?}",
          self.key
        )
      })?;
    tracing::debug!(
      key = %self.key,
      dates = tasks.len(),
      "persisted tasks to local \
       storage"
    );
    Ok(())
  }
}

fn local_storage()
-> anyhow::Result<Storage> {
  web_sys::window()
    .ok_or_else(|| {
      anyhow!("no browser window")
    })?
    .local_storage()
    .map_err(|error| {
      anyhow!(
        "local storage unavailable: \
         {error:?}"
      )
    })?
    .ok_or_else(|| {
      anyhow!(
        "local storage disabled"
      )
    })
}
