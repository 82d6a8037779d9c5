use std::io::{self, Write};

use daybook_shared::{DayView, GridCell, Session, TaskRepository, WEEKDAY_LABELS};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

const CELL_WIDTH: usize = 4;
const GRID_WIDTH: usize = CELL_WIDTH * 7;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color = cfg.get_bool("color")?.unwrap_or(true);
        Ok(Self { color })
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip_all)]
    pub fn print_month<R: TaskRepository>(&self, session: &Session<R>) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_month(&mut out, session)
    }

    #[tracing::instrument(skip_all)]
    pub fn print_tasks<R: TaskRepository>(&self, session: &Session<R>) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_tasks(&mut out, session)
    }

    pub fn write_month<R: TaskRepository, W: Write>(
        &self,
        out: &mut W,
        session: &Session<R>,
    ) -> anyhow::Result<()> {
        let title = session.grid().title();
        let pad = GRID_WIDTH.saturating_sub(title.width()) / 2;
        writeln!(out, "{}{}", " ".repeat(pad), self.paint(&title, "1;34"))?;

        let header = WEEKDAY_LABELS
            .iter()
            .map(|label| format!("{label:>width$}", width = CELL_WIDTH))
            .collect::<String>();
        writeln!(out, "{header}")?;

        let days = session.day_view();
        for week in days.chunks(7) {
            let line = week.iter().map(|view| self.cell(view)).collect::<String>();
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }

    pub fn write_tasks<R: TaskRepository, W: Write>(
        &self,
        out: &mut W,
        session: &Session<R>,
    ) -> anyhow::Result<()> {
        let Some(heading) = session.heading() else {
            return Ok(());
        };
        writeln!(out, "{}", self.paint(&heading, "1"))?;

        let tasks = session.selected_tasks();
        if tasks.is_empty() {
            writeln!(out, "No tasks")?;
            return Ok(());
        }
        for (index, task) in tasks.iter().enumerate() {
            let index = self.paint(&format!("{index:>3}"), "33");
            writeln!(out, "{index}  {}", task.text)?;
        }
        Ok(())
    }

    fn cell(&self, view: &DayView) -> String {
        let GridCell::Day { day, .. } = view.cell else {
            return " ".repeat(CELL_WIDTH);
        };

        let number = format!("{day:>3}");
        match (self.color, view.highlighted) {
            (true, true) => format!("{} ", self.paint(&number, "30;43")),
            (true, false) if view.selected => format!("{} ", self.paint(&number, "4")),
            (true, false) => format!("{number} "),
            (false, true) => format!("{number}*"),
            (false, false) => format!("{number} "),
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}
