use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::drag::DragSession;
use crate::input::InputCapture;
use crate::item::ItemId;
use crate::list::TodoList;

/// User intents surfaced by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    EditText(String),
    EditDeadline(Option<NaiveDate>),
    SubmitAdd,
    Toggle(ItemId),
    Delete(ItemId),
    DragStart(usize),
    DragEnter(usize),
    DragEnd,
}

/// The whole component: list, form fields and drag state, all driven from
/// one event loop.
#[derive(Debug, Clone, Default)]
pub struct Board {
    list: TodoList,
    input: InputCapture,
    drag: DragSession,
}

impl Board {
    pub fn new(list: TodoList) -> Self {
        Self {
            list,
            input: InputCapture::default(),
            drag: DragSession::default(),
        }
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    pub fn input(&self) -> &InputCapture {
        &self.input
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    /// Applies one intent. Returns `true` when the list changed and the view
    /// should re-render.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let changed = match intent {
            Intent::EditText(text) => {
                self.input.set_text(text);
                false
            }
            Intent::EditDeadline(deadline) => {
                self.input.set_deadline(deadline);
                false
            }
            Intent::SubmitAdd => self.input.submit(&mut self.list).is_some(),
            Intent::Toggle(id) => self.list.toggle_complete(id),
            Intent::Delete(id) => self.list.delete(id).is_some(),
            Intent::DragStart(index) => {
                self.drag.start(index);
                false
            }
            Intent::DragEnter(index) => {
                self.drag.enter(index);
                false
            }
            Intent::DragEnd => self.drag.end(&mut self.list).is_some(),
        };

        debug!(changed, len = self.list.len(), "intent applied");
        changed
    }
}
