//! Traversal cursor with per-frame mailboxes.
//!
//! A [`Cursor`] is the stack of nodes between the root of a traversal and the
//! node currently being visited. Every frame owns a small mailbox, which lets
//! a node visited deep in a subtree leave a message for an ancestor that runs
//! its post-order code later in the same pass:
//!
//! ```rust
//! use rewrite_dsl::tree::{Cursor, Kind, J, Identifier};
//! # use rewrite_dsl::tree::{Block, NodeId, Space};
//! # use std::sync::Arc;
//! # let block = || J::Block(Arc::new(Block {
//! #     id: NodeId::next(), prefix: Space::EMPTY, statements: Vec::new(), end: Space::EMPTY,
//! # }));
//! let mut cursor = Cursor::new();
//! cursor.push(block());
//! cursor.push(J::Identifier(Identifier::new("x", None)));
//!
//! assert!(cursor.put_message_on_first_enclosing(Kind::Block, "found", 42u32));
//! cursor.pop();
//!
//! assert_eq!(cursor.poll_message::<u32>("found"), Some(42));
//! assert_eq!(cursor.poll_message::<u32>("found"), None);
//! ```
//!
//! A mailbox holds at most one value per key. Posting twice under the same
//! key before it is polled keeps the last value only.

use super::{J, Kind};
use std::any::Any;
use std::collections::HashMap;
use tracing::trace;

type Message = Box<dyn Any + Send>;

struct Frame {
    value: J,
    messages: HashMap<String, Message>,
}

/// The chain of frames for one traversal.
#[derive(Default)]
pub struct Cursor {
    frames: Vec<Frame>,
}

impl Cursor {
    /// Creates an empty cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a node.
    pub fn push(&mut self, value: J) {
        self.frames.push(Frame {
            value,
            messages: HashMap::new(),
        });
    }

    /// Leaves the current node, dropping any messages nobody polled.
    pub fn pop(&mut self) -> Option<J> {
        self.frames.pop().map(|frame| frame.value)
    }

    /// Runs `f` with `value` attached as a child of the current frame.
    pub fn attach<R>(&mut self, value: J, f: impl FnOnce(&mut Cursor) -> R) -> R {
        self.push(value);
        let result = f(self);
        self.pop();
        result
    }

    /// Replaces the node of the current frame, keeping its mailbox.
    pub fn set_value(&mut self, value: J) {
        if let Some(frame) = self.frames.last_mut() {
            frame.value = value;
        }
    }

    /// The node of the current frame.
    pub fn value(&self) -> Option<&J> {
        self.frames.last().map(|frame| &frame.value)
    }

    /// The node of the parent frame.
    pub fn parent_value(&self) -> Option<&J> {
        self.frames
            .len()
            .checked_sub(2)
            .and_then(|idx| self.frames.get(idx))
            .map(|frame| &frame.value)
    }

    /// Nodes from the current frame up to the root.
    pub fn path(&self) -> impl Iterator<Item = &J> {
        self.frames.iter().rev().map(|frame| &frame.value)
    }

    /// Stores a message on the nearest frame whose node is of `kind`,
    /// starting at the current frame.
    ///
    /// Returns false when no such frame exists; the message is dropped.
    pub fn put_message_on_first_enclosing<T: Any + Send>(
        &mut self,
        kind: Kind,
        key: impl Into<String>,
        value: T,
    ) -> bool {
        let key = key.into();
        match self.frames.iter_mut().rev().find(|f| f.value.kind() == kind) {
            Some(frame) => {
                trace!(%kind, key = %key, "posting message");
                frame.messages.insert(key, Box::new(value));
                true
            }
            None => {
                trace!(%kind, key = %key, "no enclosing frame for message");
                false
            }
        }
    }

    /// Removes and returns a message from the current frame.
    ///
    /// Returns `None` when the key is absent or holds a value of another type.
    pub fn poll_message<T: Any>(&mut self, key: &str) -> Option<T> {
        let frame = self.frames.last_mut()?;
        let message = frame.messages.remove(key)?;
        message.downcast::<T>().ok().map(|boxed| *boxed)
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.frames.iter().map(|frame| frame.value.kind()))
            .finish()
    }
}
