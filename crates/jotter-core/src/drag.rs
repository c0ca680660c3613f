use tracing::{debug, info};

use crate::list::TodoList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Armed {
        source: usize,
    },
    Targeting {
        source: usize,
        target: usize,
    },
}

/// State of one drag gesture over the list rows. Owned by the interaction
/// layer, never by the list.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    phase: DragPhase,
}

impl DragSession {
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    /// Arms a new gesture. Any earlier target is forgotten.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self, index: usize) {
        if self.is_active() {
            debug!(previous = ?self.phase, "restarting drag");
        }
        self.phase = DragPhase::Armed { source: index };
    }

    /// Records the row currently under the pointer. Returns `false` when no
    /// drag is in progress.
    #[tracing::instrument(skip(self))]
    pub fn enter(&mut self, index: usize) -> bool {
        match self.phase {
            DragPhase::Idle => {
                debug!("drag-enter without drag-start ignored");
                false
            }
            DragPhase::Armed { source } | DragPhase::Targeting { source, .. } => {
                self.phase = DragPhase::Targeting {
                    source,
                    target: index,
                };
                true
            }
        }
    }

    /// Ends the gesture, committing a reorder when both indices were set.
    /// The session is back to `Idle` afterwards whatever happened.
    #[tracing::instrument(skip_all)]
    pub fn end(&mut self, list: &mut TodoList) -> Option<(usize, usize)> {
        let phase = std::mem::take(&mut self.phase);
        let DragPhase::Targeting { source, target } = phase else {
            debug!(?phase, "drag ended without a target; discarded");
            return None;
        };

        if !list.reorder(source, target) {
            return None;
        }
        info!(source, target, "drag committed");
        Some((source, target))
    }
}

#[cfg(test)]
mod tests {
    use super::{DragPhase, DragSession};
    use crate::item::{ItemId, TodoItem};
    use crate::list::TodoList;

    fn abcd() -> TodoList {
        TodoList::from_items(
            ["A", "B", "C", "D"]
                .iter()
                .enumerate()
                .map(|(idx, text)| TodoItem::new(ItemId(idx as u64 + 1), text.to_string(), None))
                .collect(),
        )
    }

    fn texts(list: &TodoList) -> String {
        list.items().iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn full_gesture_reorders_and_resets() {
        let mut list = abcd();
        let mut drag = DragSession::default();

        drag.start(0);
        assert_eq!(drag.phase(), DragPhase::Armed { source: 0 });
        assert!(drag.enter(1));
        assert!(drag.enter(2));
        assert_eq!(drag.phase(), DragPhase::Targeting { source: 0, target: 2 });

        assert_eq!(drag.end(&mut list), Some((0, 2)));
        assert_eq!(texts(&list), "BCAD");
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn release_without_target_is_a_no_op() {
        let mut list = abcd();
        let mut drag = DragSession::default();

        drag.start(3);
        assert_eq!(drag.end(&mut list), None);
        assert_eq!(texts(&list), "ABCD");
        assert!(!drag.is_active());
    }

    #[test]
    fn enter_while_idle_is_ignored() {
        let mut list = abcd();
        let mut drag = DragSession::default();

        assert!(!drag.enter(2));
        assert_eq!(drag.phase(), DragPhase::Idle);
        assert_eq!(drag.end(&mut list), None);
        assert_eq!(texts(&list), "ABCD");
    }

    #[test]
    fn restart_forgets_previous_target() {
        let mut list = abcd();
        let mut drag = DragSession::default();

        drag.start(0);
        drag.enter(3);
        drag.start(1);
        assert_eq!(drag.phase(), DragPhase::Armed { source: 1 });
        drag.enter(0);

        assert_eq!(drag.end(&mut list), Some((1, 0)));
        assert_eq!(texts(&list), "BACD");
    }

    #[test]
    fn out_of_range_target_resets_without_touching_list() {
        let mut list = abcd();
        let mut drag = DragSession::default();

        drag.start(1);
        drag.enter(9);
        assert_eq!(drag.end(&mut list), None);
        assert_eq!(texts(&list), "ABCD");
        assert!(!drag.is_active());
    }
}
