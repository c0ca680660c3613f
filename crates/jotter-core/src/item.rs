use std::fmt;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("item id cannot be empty"));
        }
        let raw = trimmed
            .parse::<u64>()
            .with_context(|| format!("invalid item id: {trimmed}"))?;
        Ok(Self(raw))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: ItemId,

    pub text: String,

    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub completed: bool,
}

impl TodoItem {
    pub fn new(id: ItemId, text: String, deadline: Option<NaiveDate>) -> Self {
        Self {
            id,
            text,
            deadline,
            completed: false,
        }
    }
}

/// Hands out strictly increasing ids. Never reuses a value, even after the
/// item that held it is deleted.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }

    pub fn next_id(&mut self) -> ItemId {
        self.last += 1;
        ItemId(self.last)
    }
}
