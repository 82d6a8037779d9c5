//! Storage-agnostic model for the daybook month calendar.
//!
//! Everything here compiles for both the native CLI and the wasm frontend,
//! so nothing in this crate touches the filesystem or the browser directly.
//! Backends plug in through [`TaskRepository`].

pub mod date_key;
pub mod grid;
pub mod interaction;
pub mod repository;
pub mod store;

pub use date_key::{
  DateKey,
  DateKeyError
};
pub use grid::{
  GridCell,
  MonthGrid,
  WEEKDAY_LABELS,
  build_month_grid
};
pub use interaction::{
  DayView,
  EditTarget,
  SelectionState,
  Session,
  SubmitOutcome
};
pub use repository::{
  MemoryRepository,
  TaskMap,
  TaskRepository
};
pub use store::{
  StoreError,
  TaskEntry,
  TaskId,
  TaskStore
};
