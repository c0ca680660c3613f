use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::board::{Board, Intent};
use crate::cli::{HELP, SessionCommand, parse_line};
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Reads commands line by line, applying each to the board and redrawing
/// whenever the list changed. A bad line is reported and skipped.
#[tracing::instrument(skip_all, fields(interactive = interactive))]
pub fn run_session<R: BufRead, W: Write>(
    board: &mut Board,
    renderer: &Renderer,
    input: R,
    mut out: W,
    interactive: bool,
) -> anyhow::Result<()> {
    renderer.print_board(&mut out, board.list().items())?;

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            debug!("input exhausted");
            break;
        };
        let line = line?;

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                warn!(line = %line, error = %err, "rejected session line");
                writeln!(out, "error: {err:#}")?;
                continue;
            }
        };

        if execute(board, renderer, command, &mut out)? == Flow::Quit {
            break;
        }
    }

    info!(items = board.list().len(), "session finished");
    Ok(())
}

fn execute<W: Write>(
    board: &mut Board,
    renderer: &Renderer,
    command: SessionCommand,
    out: &mut W,
) -> anyhow::Result<Flow> {
    let intents = match command {
        SessionCommand::Add { text, deadline } => {
            let mut intents = vec![Intent::EditText(text)];
            // A deadline typed earlier with `due` survives a plain `add`.
            if deadline.is_some() {
                intents.push(Intent::EditDeadline(deadline));
            }
            intents.push(Intent::SubmitAdd);
            intents
        }
        SessionCommand::Text(text) => vec![Intent::EditText(text)],
        SessionCommand::Due(deadline) => vec![Intent::EditDeadline(deadline)],
        SessionCommand::Submit => vec![Intent::SubmitAdd],
        SessionCommand::Toggle(id) => vec![Intent::Toggle(id)],
        SessionCommand::Delete(id) => vec![Intent::Delete(id)],
        SessionCommand::DragStart(index) => vec![Intent::DragStart(index)],
        SessionCommand::DragEnter(index) => vec![Intent::DragEnter(index)],
        SessionCommand::DragEnd => vec![Intent::DragEnd],
        SessionCommand::Move { from, to } => vec![
            Intent::DragStart(from),
            Intent::DragEnter(to),
            Intent::DragEnd,
        ],
        SessionCommand::Fields => {
            renderer.print_fields(&mut *out, board.input())?;
            return Ok(Flow::Continue);
        }
        SessionCommand::List => {
            renderer.print_board(&mut *out, board.list().items())?;
            return Ok(Flow::Continue);
        }
        SessionCommand::Export => {
            renderer.print_json(&mut *out, board.list().items())?;
            return Ok(Flow::Continue);
        }
        SessionCommand::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(Flow::Continue);
        }
        SessionCommand::Quit => return Ok(Flow::Quit),
    };

    let mut changed = false;
    for intent in intents {
        changed |= board.dispatch(intent);
    }

    if changed {
        renderer.print_board(&mut *out, board.list().items())?;
    }
    Ok(Flow::Continue)
}
