pub mod cli;
pub mod commands;
pub mod config;
pub mod datastore;
pub mod render;

use std::ffi::OsString;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use daybook_shared::Session;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting daybook CLI"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .rc_overrides
      .into_iter()
      .map(|kv| (kv.key, kv.value))
  );

  let data_dir =
    config::resolve_data_dir(
      &cfg,
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data \
       directory"
    )?;
  let file_name = cfg.data_file();

  let repo =
    datastore::JsonFileRepository::open(
      &data_dir, &file_name
    )
    .with_context(|| {
      format!(
        "failed to open task file in \
         {}",
        data_dir.display()
      )
    })?;

  let today = cli
    .today
    .unwrap_or_else(|| {
      Local::now().date_naive()
    });
  debug!(%today, "resolved today");

  let mut session =
    Session::open(repo, today);
  let renderer =
    render::Renderer::new(&cfg)?;

  commands::dispatch(
    &mut session,
    &renderer,
    cli.command.unwrap_or_default()
  )?;

  info!("done");
  Ok(())
}
