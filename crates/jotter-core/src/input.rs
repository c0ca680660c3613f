use anyhow::Context;
use chrono::NaiveDate;
use tracing::debug;

use crate::item::ItemId;
use crate::list::TodoList;

pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// The two form fields feeding `add`. They only clear after a successful
/// submit, so a rejected entry can be corrected in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputCapture {
    text: String,
    deadline: Option<NaiveDate>,
}

impl InputCapture {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_deadline(&mut self, deadline: Option<NaiveDate>) {
        self.deadline = deadline;
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.deadline.is_none()
    }

    #[tracing::instrument(skip_all)]
    pub fn submit(&mut self, list: &mut TodoList) -> Option<ItemId> {
        let id = list.add(&self.text, self.deadline)?;
        debug!(id = %id, "clearing input fields after add");
        *self = Self::default();
        Some(id)
    }
}

/// Parses a date field value. Blank input means "no deadline".
pub fn parse_deadline(raw: &str) -> anyhow::Result<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(trimmed, DEADLINE_FORMAT)
        .with_context(|| format!("invalid deadline '{trimmed}', expected YYYY-MM-DD"))?;
    Ok(Some(date))
}
