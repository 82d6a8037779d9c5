mod calendar_grid;
mod task_panel;

pub use calendar_grid::CalendarGrid;
pub use task_panel::TaskPanel;
