pub mod board;
pub mod cli;
pub mod config;
pub mod drag;
pub mod input;
pub mod item;
pub mod list;
pub mod render;
pub mod session;

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

use anyhow::Context;
use clap::Parser;
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
    "starting jotter"
  );

  let mut cfg = config::Config::load(
    cli.jotterrc.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .rc_overrides
      .into_iter()
      .map(|kv| (kv.key, kv.value))
  )?;
  debug!(source = ?cfg.source, "configuration ready");

  let renderer =
    render::Renderer::new(&cfg);
  let list = if cfg.seed {
    list::TodoList::with_samples()
  } else {
    list::TodoList::new()
  };
  let mut board = board::Board::new(list);

  let stdout = io::stdout();
  match cli.script {
    | Some(path) => {
      let file = File::open(&path)
        .with_context(|| {
          format!(
            "failed to open script {}",
            path.display()
          )
        })?;
      session::run_session(
        &mut board,
        &renderer,
        BufReader::new(file),
        stdout.lock(),
        false
      )?;
    }
    | None => {
      let stdin = io::stdin();
      let interactive =
        stdin.is_terminal();
      session::run_session(
        &mut board,
        &renderer,
        stdin.lock(),
        stdout.lock(),
        interactive
      )?;
    }
  }

  info!("done");
  Ok(())
}
