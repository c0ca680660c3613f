use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::input::parse_deadline;
use crate::item::ItemId;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "jotter",
    version,
    about = "Jotter: a to-do list you drive one line at a time",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "jotterrc")]
    pub jotterrc: Option<PathBuf>,

    /// Read session commands from a file instead of stdin.
    #[arg(long = "script")]
    pub script: Option<PathBuf>,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// One parsed session line. Positions are already converted to 0-based
/// indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add {
        text: String,
        deadline: Option<NaiveDate>,
    },
    Text(String),
    Due(Option<NaiveDate>),
    Submit,
    Fields,
    Toggle(ItemId),
    Delete(ItemId),
    DragStart(usize),
    DragEnter(usize),
    DragEnd,
    Move {
        from: usize,
        to: usize,
    },
    List,
    Export,
    Help,
    Quit,
}

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add", "text", "due", "submit", "fields", "toggle", "done", "delete", "drag", "move",
        "list", "export", "help", "quit",
    ]
}

const DRAG_STEPS: [&str; 3] = ["start", "enter", "end"];

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

pub const HELP: &str = "\
commands:
  add <text...> [due:YYYY-MM-DD]   add an item at the top
  text <text...>                   set the text field
  due [YYYY-MM-DD]                 set or clear the deadline field
  submit                           add using the current fields
  fields                           show the current fields
  toggle <id> | done <id>          flip completion
  delete <id>                      remove an item
  drag start|enter <pos>, drag end drag gesture over row positions
  move <from> <to>                 drag in one step
  list                             show the list
  export                           print the list as JSON
  help, quit";

/// Parses one session line. Blank lines and `#` comments yield `None`.
#[tracing::instrument]
pub fn parse_line(line: &str) -> anyhow::Result<Option<SessionCommand>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let (head, args) = tokens
        .split_first()
        .ok_or_else(|| anyhow!("empty command"))?;

    let known = known_command_names();
    let command = expand_command_abbrev(head, &known)
        .ok_or_else(|| anyhow!("unknown or ambiguous command: {head}"))?;
    debug!(token = %head, command, "resolved command token");

    let parsed = match command {
        "add" => parse_add(args)?,
        "text" => SessionCommand::Text(args.join(" ")),
        "due" => SessionCommand::Due(parse_deadline(&args.join(" "))?),
        "submit" => SessionCommand::Submit,
        "fields" => SessionCommand::Fields,
        "toggle" | "done" => SessionCommand::Toggle(single_id(command, args)?),
        "delete" => SessionCommand::Delete(single_id(command, args)?),
        "drag" => parse_drag(args)?,
        "move" => match args {
            [from, to] => SessionCommand::Move {
                from: parse_position(from)?,
                to: parse_position(to)?,
            },
            _ => return Err(anyhow!("move requires <from> <to> positions")),
        },
        "list" => SessionCommand::List,
        "export" => SessionCommand::Export,
        "help" => SessionCommand::Help,
        "quit" => SessionCommand::Quit,
        other => return Err(anyhow!("unhandled command: {other}")),
    };

    Ok(Some(parsed))
}

fn parse_add(args: &[&str]) -> anyhow::Result<SessionCommand> {
    let mut words = Vec::with_capacity(args.len());
    let mut deadline = None;

    for arg in args {
        if let Some(raw) = arg.strip_prefix("due:") {
            deadline = parse_deadline(raw)?;
        } else {
            words.push(*arg);
        }
    }

    Ok(SessionCommand::Add {
        text: words.join(" "),
        deadline,
    })
}

fn parse_drag(args: &[&str]) -> anyhow::Result<SessionCommand> {
    let (step, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("drag requires start, enter or end"))?;
    let step = expand_command_abbrev(step, &DRAG_STEPS)
        .ok_or_else(|| anyhow!("unknown drag step: {step}"))?;

    match (step, rest) {
        ("start", [pos]) => Ok(SessionCommand::DragStart(parse_position(pos)?)),
        ("enter", [pos]) => Ok(SessionCommand::DragEnter(parse_position(pos)?)),
        ("end", []) => Ok(SessionCommand::DragEnd),
        ("end", _) => Err(anyhow!("drag end takes no arguments")),
        (step, _) => Err(anyhow!("drag {step} requires one position")),
    }
}

fn single_id(command: &str, args: &[&str]) -> anyhow::Result<ItemId> {
    match args {
        [raw] => raw.parse(),
        _ => Err(anyhow!("{command} requires one item id")),
    }
}

/// Converts a 1-based row position to a list index.
fn parse_position(raw: &str) -> anyhow::Result<usize> {
    let position = raw
        .parse::<usize>()
        .with_context(|| format!("invalid position: {raw}"))?;
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("positions start at 1"))
}
