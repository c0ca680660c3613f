use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::input::{DEADLINE_FORMAT, InputCapture};
use crate::item::TodoItem;

const DONE_MARK: &str = "[x]";
const OPEN_MARK: &str = "[ ]";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    title: String,
    empty_message: String,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.color && io::stdout().is_terminal(),
            title: cfg.title.clone(),
            empty_message: cfg.empty_message.clone(),
        }
    }

    pub fn plain(cfg: &Config) -> Self {
        Self {
            color: false,
            ..Self::new(cfg)
        }
    }

    /// Draws the list, numbering rows by their current position.
    #[tracing::instrument(skip_all, fields(count = items.len()))]
    pub fn print_board<W: Write>(&self, mut out: W, items: &[TodoItem]) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(&self.title, "1"))?;

        if items.is_empty() {
            writeln!(out, "  {}", self.paint(&self.empty_message, "3"))?;
            return Ok(());
        }

        let headers = vec![
            "#".to_string(),
            "ID".to_string(),
            "Done".to_string(),
            "Task".to_string(),
            "Due".to_string(),
        ];

        let mut rows = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let position = self.paint(&(idx + 1).to_string(), "33");
            let mark = if item.completed { DONE_MARK } else { OPEN_MARK };
            let text = if item.completed {
                self.paint(&item.text, "2;9")
            } else {
                item.text.clone()
            };
            let due = item
                .deadline
                .map(|date| date.format(DEADLINE_FORMAT).to_string())
                .unwrap_or_default();

            rows.push(vec![
                position,
                item.id.to_string(),
                mark.to_string(),
                text,
                due,
            ]);
        }

        write_table(&mut out, headers, rows)?;

        let done = items.iter().filter(|item| item.completed).count();
        writeln!(out, "{} open, {} done", items.len() - done, done)?;
        Ok(())
    }

    pub fn print_fields<W: Write>(&self, mut out: W, input: &InputCapture) -> anyhow::Result<()> {
        if input.is_blank() {
            writeln!(out, "(fields empty)")?;
            return Ok(());
        }

        let due = input
            .deadline()
            .map(|date| date.format(DEADLINE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "text      {}", input.text())?;
        writeln!(out, "due       {due}")?;
        Ok(())
    }

    pub fn print_json<W: Write>(&self, mut out: W, items: &[TodoItem]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        writeln!(out, "{json}")?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    write_row(&mut writer, &headers, &widths)?;

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    write_row(&mut writer, &rule, &widths)?;

    for row in &rows {
        write_row(&mut writer, row, &widths)?;
    }

    Ok(())
}

// Trailing padding on the last column is dropped.
fn write_row<W: Write>(mut writer: W, cells: &[String], widths: &[usize]) -> anyhow::Result<()> {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            line.push(' ');
        }
        let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
        let padding = widths[idx].saturating_sub(visible_width);
        line.push_str(cell);
        line.push_str(&" ".repeat(padding));
    }
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
