use chrono::NaiveDate;
use tracing::{
  debug,
  info,
  warn
};

use crate::date_key::DateKey;
use crate::grid::{
  GridCell,
  MonthGrid,
  build_month_grid
};
use crate::repository::TaskRepository;
use crate::store::{
  StoreError,
  TaskEntry,
  TaskId,
  TaskStore
};

pub const ADD_LABEL: &str = "Add Task";
pub const UPDATE_LABEL: &str =
  "Update Task";

/// Task currently loaded into the
/// draft for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
  pub key:   DateKey,
  pub index: usize,
  pub id:    TaskId
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct SelectionState {
  pub selected: Option<DateKey>,
  pub draft:    String,
  pub editing:  Option<EditTarget>
}

impl SelectionState {
  fn reset_form(&mut self) {
    self.draft.clear();
    self.editing = None;
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum SubmitOutcome {
  Added(TaskId),
  Updated { index: usize },
  Ignored
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct DayView {
  pub cell:        GridCell,
  pub highlighted: bool,
  pub selected:    bool
}

/// One calendar widget: the month
/// grid, the task store and the
/// selection driving it.
#[derive(Debug)]
pub struct Session<R> {
  grid:      MonthGrid,
  store:     TaskStore<R>,
  selection: SelectionState
}

impl<R: TaskRepository> Session<R> {
  #[tracing::instrument(skip(repo))]
  pub fn open(
    repo: R,
    today: NaiveDate
  ) -> Self {
    Self {
      grid:      build_month_grid(today),
      store:     TaskStore::load(repo),
      selection: SelectionState::default()
    }
  }

  pub fn grid(&self) -> &MonthGrid {
    &self.grid
  }

  pub fn store(&self) -> &TaskStore<R> {
    &self.store
  }

  /// Direct store access for mutations
  /// that bypass the selection, such as
  /// a second view of the same store.
  pub fn store_mut(
    &mut self
  ) -> &mut TaskStore<R> {
    &mut self.store
  }

  pub fn selection(
    &self
  ) -> &SelectionState {
    &self.selection
  }

  pub fn selected(
    &self
  ) -> Option<DateKey> {
    self.selection.selected
  }

  pub fn draft(&self) -> &str {
    &self.selection.draft
  }

  pub fn is_editing(&self) -> bool {
    self.selection.editing.is_some()
  }

  /// Selects a day of the displayed
  /// month. Days outside it are
  /// ignored.
  pub fn click_day(
    &mut self,
    day: u32
  ) -> Option<DateKey> {
    let key = self.grid.day(day)?;
    self.select(key).then_some(key)
  }

  #[tracing::instrument(skip_all, fields(key = %key))]
  pub fn select(
    &mut self,
    key: DateKey
  ) -> bool {
    if !self.grid.contains(key) {
      debug!(
        "date outside displayed month"
      );
      return false;
    }
    self.selection.selected = Some(key);
    self.selection.reset_form();
    debug!("selected date");
    true
  }

  pub fn set_draft(
    &mut self,
    text: impl Into<String>
  ) {
    self.selection.draft = text.into();
  }

  /// Loads the task at `index` of the
  /// selected date into the draft.
  #[tracing::instrument(skip(self))]
  pub fn begin_edit(
    &mut self,
    index: usize
  ) -> anyhow::Result<bool> {
    let Some(key) = self.selection.selected
    else {
      return Ok(false);
    };
    let tasks = self.store.tasks(key);
    let entry =
      tasks.get(index).ok_or_else(|| {
        StoreError::IndexOutOfRange {
          key,
          index,
          len: tasks.len()
        }
      })?;

    self.selection.draft =
      entry.text.clone();
    self.selection.editing =
      Some(EditTarget {
        key,
        index,
        id: entry.id
      });
    debug!(%key, "editing task");
    Ok(true)
  }

  #[tracing::instrument(skip(self))]
  pub fn submit(
    &mut self
  ) -> anyhow::Result<SubmitOutcome> {
    let Some(key) = self.selection.selected
    else {
      return Ok(SubmitOutcome::Ignored);
    };
    if self.selection.draft.trim().is_empty()
    {
      debug!("ignoring blank draft");
      return Ok(SubmitOutcome::Ignored);
    }

    let result = match self
      .selection
      .editing
      .clone()
    {
      | Some(target)
        if target.key == key =>
      {
        self.submit_edit(target)
      }
      | _ => self.submit_add(key)
    };
    self.settle(result)
  }

  fn submit_add(
    &mut self,
    key: DateKey
  ) -> anyhow::Result<SubmitOutcome> {
    match self
      .store
      .add_task(key, &self.selection.draft)?
    {
      | Some(id) => {
        info!(%key, %id, "added task");
        Ok(SubmitOutcome::Added(id))
      }
      | None => Ok(SubmitOutcome::Ignored)
    }
  }

  /// Clears the form once the store has
  /// applied the change, saved or not.
  fn settle<T>(
    &mut self,
    result: anyhow::Result<T>
  ) -> anyhow::Result<T> {
    match &result {
      | Ok(_) => self.selection.reset_form(),
      | Err(error)
        if StoreError::is_unsaved(error) =>
      {
        warn!(
          error = %format!("{error:#}"),
          "change applied but not saved"
        );
        self.selection.reset_form();
      }
      | Err(_) => {}
    }
    result
  }

  fn submit_edit(
    &mut self,
    target: EditTarget
  ) -> anyhow::Result<SubmitOutcome> {
    // Resolve by id so an intervening
    // delete cannot redirect the edit.
    let Some(index) = self
      .store
      .position(target.key, target.id)
    else {
      warn!(
        key = %target.key,
        index = target.index,
        "edit target is stale"
      );
      self.selection.editing = None;
      return Err(
        StoreError::StaleTask {
          key: target.key
        }
        .into()
      );
    };

    if index != target.index {
      debug!(
        from = target.index,
        to = index,
        "edit target moved"
      );
    }

    self.store.update_task(
      target.key,
      index,
      &self.selection.draft
    )?;
    info!(key = %target.key, index, "updated task");
    Ok(SubmitOutcome::Updated { index })
  }

  /// Removes the task at `index` of the
  /// selected date.
  #[tracing::instrument(skip(self))]
  pub fn delete(
    &mut self,
    index: usize
  ) -> anyhow::Result<Option<String>> {
    let Some(key) = self.selection.selected
    else {
      return Ok(None);
    };
    let result =
      self.store.delete_task(key, index);
    let removed = self.settle(result)?;
    info!(%key, index, "deleted task");
    Ok(Some(removed))
  }

  pub fn selected_tasks(
    &self
  ) -> &[TaskEntry] {
    match self.selection.selected {
      | Some(key) => self.store.tasks(key),
      | None => &[]
    }
  }

  pub fn submit_label(
    &self
  ) -> &'static str {
    if self.is_editing() {
      UPDATE_LABEL
    } else {
      ADD_LABEL
    }
  }

  pub fn heading(&self) -> Option<String> {
    self
      .selection
      .selected
      .map(|key| format!("Tasks for {key}"))
  }

  pub fn day_view(&self) -> Vec<DayView> {
    self
      .grid
      .cells()
      .iter()
      .map(|cell| {
        let key = cell.key();
        DayView {
          cell:        *cell,
          highlighted: key.is_some_and(
            |key| self.store.has_tasks(key)
          ),
          selected:    key.is_some()
            && key == self.selection.selected
        }
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::repository::MemoryRepository;

  fn may_session() -> Session<MemoryRepository>
  {
    Session::open(
      MemoryRepository::new(),
      NaiveDate::from_ymd_opt(2024, 5, 15)
        .expect("valid date")
    )
  }

  #[test]
  fn clicking_a_day_resets_the_form() {
    let mut session = may_session();
    session.click_day(10);
    session.set_draft("half typed");

    let key = session
      .click_day(11)
      .expect("day in month");
    assert_eq!(key.to_string(), "2024-05-11");
    assert_eq!(session.draft(), "");
    assert!(!session.is_editing());
    assert_eq!(
      session.heading().as_deref(),
      Some("Tasks for 2024-05-11")
    );
  }

  #[test]
  fn days_outside_the_month_are_ignored() {
    let mut session = may_session();
    assert_eq!(session.click_day(0), None);
    assert_eq!(session.click_day(32), None);
    assert_eq!(session.selected(), None);
  }

  #[test]
  fn submit_while_idle_does_nothing() {
    let mut session = may_session();
    session.set_draft("orphan");
    assert_eq!(
      session.submit().expect("submit"),
      SubmitOutcome::Ignored
    );
    assert!(session.store().is_empty());
  }

  #[test]
  fn edit_and_delete_while_idle_do_nothing() {
    let mut session = Session::open(
      MemoryRepository::with_raw(
        r#"{"2024-05-10":["Buy milk"]}"#
      ),
      NaiveDate::from_ymd_opt(2024, 5, 15)
        .expect("valid date")
    );

    assert!(
      !session.begin_edit(0).expect("edit")
    );
    assert!(!session.is_editing());
    assert_eq!(session.draft(), "");

    assert_eq!(
      session.delete(0).expect("delete"),
      None
    );
    assert_eq!(session.store().len(), 1);
    assert_eq!(
      session.store().repository().save_count(),
      0
    );
  }

  #[test]
  fn blank_draft_keeps_the_form() {
    let mut session = may_session();
    session.click_day(10);
    session.set_draft("   ");
    assert_eq!(
      session.submit().expect("submit"),
      SubmitOutcome::Ignored
    );
    assert_eq!(session.draft(), "   ");
    assert!(session.store().is_empty());
  }

  #[test]
  fn edit_toggles_the_submit_label() {
    let mut session = may_session();
    session.click_day(10);
    session.set_draft("Buy milk");
    session.submit().expect("add");
    assert_eq!(session.submit_label(), ADD_LABEL);

    assert!(
      session.begin_edit(0).expect("edit")
    );
    assert_eq!(session.draft(), "Buy milk");
    assert_eq!(
      session.submit_label(),
      UPDATE_LABEL
    );

    session.set_draft("Buy oat milk");
    assert_eq!(
      session.submit().expect("update"),
      SubmitOutcome::Updated { index: 0 }
    );
    assert_eq!(session.submit_label(), ADD_LABEL);
    assert_eq!(
      session.selected_tasks()[0].text,
      "Buy oat milk"
    );
  }

  #[test]
  fn highlight_follows_task_presence() {
    let mut session = may_session();
    let key =
      session.click_day(10).expect("day");
    session.set_draft("Buy milk");
    session.submit().expect("add");

    let lit = |session: &Session<MemoryRepository>| {
      session
        .day_view()
        .into_iter()
        .find(|view| view.cell.key() == Some(key))
        .map(|view| view.highlighted)
    };
    assert_eq!(lit(&session), Some(true));

    session.delete(0).expect("delete");
    assert_eq!(lit(&session), Some(false));
  }

  #[test]
  fn begin_edit_rejects_bad_index() {
    let mut session = may_session();
    session.click_day(10);
    let err = session
      .begin_edit(0)
      .expect_err("no tasks yet");
    assert!(matches!(
      err.downcast_ref::<StoreError>(),
      Some(StoreError::IndexOutOfRange { .. })
    ));
    assert!(!session.is_editing());
  }
}
