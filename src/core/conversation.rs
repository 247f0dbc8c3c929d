//! # Message Collection
//!
//! Ordered, id-unique list of messages owned by the app shell. Insertion
//! order is display order (oldest first). The only mutations are `push`
//! and `remove`; messages themselves never change.

use std::collections::HashSet;

use crate::core::message::{Message, MessageError, MessageId};

#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    ids: HashSet<MessageId>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. Fails without mutating if its id is already present.
    pub fn push(&mut self, message: Message) -> Result<(), MessageError> {
        if !self.ids.insert(message.id()) {
            return Err(MessageError::DuplicateId(message.id()));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Remove the message with `id`, keeping the relative order of the rest.
    /// Returns `None` (and changes nothing) if no such message exists.
    pub fn remove(&mut self, id: MessageId) -> Option<Message> {
        if !self.ids.remove(&id) {
            return None;
        }
        let index = self.messages.iter().position(|m| m.id() == id)?;
        Some(self.messages.remove(index))
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn position(&self, id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id() == id)
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
