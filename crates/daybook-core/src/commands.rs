use std::io::{self, Write};

use anyhow::{Context, anyhow};
use daybook_shared::{DateKey, MonthGrid, Session, SubmitOutcome, TaskRepository};
use tracing::{debug, info, instrument, warn};

use crate::cli::Command;
use crate::render::Renderer;

#[instrument(skip(session, renderer))]
pub fn dispatch<R: TaskRepository>(
    session: &mut Session<R>,
    renderer: &Renderer,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Month => renderer.print_month(session),
        Command::List { day } => {
            select_day(session, &day)?;
            renderer.print_tasks(session)
        }
        Command::Add { day, text } => cmd_add(session, renderer, &day, &text),
        Command::Edit { day, index, text } => cmd_edit(session, renderer, &day, index, &text),
        Command::Delete { day, index } => cmd_delete(session, renderer, &day, index),
        Command::Export => cmd_export(session),
    }
}

/// Accepts a day number of the displayed month or a full date key inside it.
pub fn resolve_day(grid: &MonthGrid, raw: &str) -> anyhow::Result<DateKey> {
    let raw = raw.trim();
    if let Ok(day) = raw.parse::<u32>() {
        return grid.day(day).ok_or_else(|| {
            anyhow!(
                "{} has no day {day} (1-{})",
                grid.title(),
                grid.days_in_month()
            )
        });
    }

    let key: DateKey = raw.parse()?;
    if !grid.contains(key) {
        return Err(anyhow!("{key} is outside {}", grid.title()));
    }
    Ok(key)
}

fn select_day<R: TaskRepository>(session: &mut Session<R>, raw: &str) -> anyhow::Result<DateKey> {
    let key = resolve_day(session.grid(), raw)?;
    session.select(key);
    debug!(%key, "selected day");
    Ok(key)
}

#[instrument(skip(session, renderer, words))]
fn cmd_add<R: TaskRepository>(
    session: &mut Session<R>,
    renderer: &Renderer,
    day: &str,
    words: &[String],
) -> anyhow::Result<()> {
    let key = select_day(session, day)?;
    session.set_draft(words.join(" "));

    match session.submit().with_context(|| format!("failed to add task on {key}"))? {
        SubmitOutcome::Added(id) => info!(%key, %id, "command add"),
        SubmitOutcome::Ignored => warn!(%key, "task text is blank; nothing added"),
        SubmitOutcome::Updated { index } => debug!(index, "unexpected update on add"),
    }
    renderer.print_tasks(session)
}

#[instrument(skip(session, renderer, words))]
fn cmd_edit<R: TaskRepository>(
    session: &mut Session<R>,
    renderer: &Renderer,
    day: &str,
    index: usize,
    words: &[String],
) -> anyhow::Result<()> {
    let key = select_day(session, day)?;
    session.begin_edit(index)?;
    session.set_draft(words.join(" "));

    match session.submit().with_context(|| format!("failed to edit task {index} on {key}"))? {
        SubmitOutcome::Updated { index } => info!(%key, index, "command edit"),
        SubmitOutcome::Ignored => warn!(%key, index, "task text is blank; nothing changed"),
        SubmitOutcome::Added(id) => debug!(%id, "unexpected add on edit"),
    }
    renderer.print_tasks(session)
}

#[instrument(skip(session, renderer))]
fn cmd_delete<R: TaskRepository>(
    session: &mut Session<R>,
    renderer: &Renderer,
    day: &str,
    index: usize,
) -> anyhow::Result<()> {
    let key = select_day(session, day)?;
    let removed = session
        .delete(index)
        .with_context(|| format!("failed to delete task {index} on {key}"))?;
    info!(%key, index, removed = ?removed, "command delete");
    renderer.print_tasks(session)
}

fn cmd_export<R: TaskRepository>(session: &Session<R>) -> anyhow::Result<()> {
    let snapshot = session.store().snapshot();
    let json = serde_json::to_string_pretty(&snapshot)?;
    let mut out = io::stdout().lock();
    writeln!(out, "{json}")?;
    Ok(())
}
