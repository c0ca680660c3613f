use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::item::{IdGenerator, ItemId, TodoItem};

/// Ordered to-do items, newest first, with completed items sinking to the
/// bottom whenever a toggle happens.
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Vec<TodoItem>,
    ids: IdGenerator,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from existing items, keeping their order. Items whose
    /// id was already seen are dropped.
    pub fn from_items(items: Vec<TodoItem>) -> Self {
        let mut seen = BTreeSet::new();
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if seen.insert(item.id) {
                kept.push(item);
            } else {
                warn!(id = %item.id, "dropping item with duplicate id");
            }
        }

        let last = kept.iter().map(|item| item.id.0).max().unwrap_or(0);
        Self {
            items: kept,
            ids: IdGenerator::starting_after(last),
        }
    }

    pub fn with_samples() -> Self {
        let mut ids = IdGenerator::default();
        let records = TodoItem::new(
            ids.next_id(),
            "Go buy vinyl records".to_string(),
            NaiveDate::from_ymd_opt(2024, 10, 25),
        );
        let mut repaired = TodoItem::new(
            ids.next_id(),
            "Repair the old radio".to_string(),
            NaiveDate::from_ymd_opt(2024, 10, 26),
        );
        repaired.completed = true;
        let party = TodoItem::new(
            ids.next_id(),
            "Jazz dance party".to_string(),
            NaiveDate::from_ymd_opt(2024, 10, 31),
        );

        Self::from_items(vec![records, party, repaired])
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// Prepends a new open item. Returns `None` without touching the list
    /// when `text` is blank.
    #[tracing::instrument(skip(self, text), fields(len = self.items.len()))]
    pub fn add(&mut self, text: &str, deadline: Option<NaiveDate>) -> Option<ItemId> {
        if text.trim().is_empty() {
            debug!("declining to add blank item");
            return None;
        }

        let id = self.ids.next_id();
        self.items
            .insert(0, TodoItem::new(id, text.to_string(), deadline));
        info!(id = %id, ?deadline, "item added");
        Some(id)
    }

    /// Flips `completed` on the matching item and then sinks every
    /// completed item below the open ones. Returns `false` if no item has
    /// that id, in which case nothing moves.
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub fn toggle_complete(&mut self, id: ItemId) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            debug!("toggle for unknown id ignored");
            return false;
        };

        item.completed = !item.completed;
        let completed = item.completed;
        self.sink_completed();
        info!(completed, "item toggled");
        true
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    pub fn delete(&mut self, id: ItemId) -> Option<TodoItem> {
        let Some(idx) = self.position(id) else {
            debug!("delete for unknown id ignored");
            return None;
        };

        let removed = self.items.remove(idx);
        info!(position = idx, remaining = self.items.len(), "item deleted");
        Some(removed)
    }

    /// Splice move: takes the item at `from` out and reinserts it at `to`
    /// in the shortened list. Out-of-range indices leave the list alone.
    #[tracing::instrument(skip(self), fields(len = self.items.len()))]
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len {
            warn!(from, to, len, "reorder indices out of range; ignoring");
            return false;
        }

        let moved = self.items.remove(from);
        debug!(id = %moved.id, "item moved");
        self.items.insert(to, moved);
        true
    }

    // Stable on the boolean key, so order within each partition survives.
    fn sink_completed(&mut self) {
        self.items.sort_by_key(|item| item.completed);
    }
}
