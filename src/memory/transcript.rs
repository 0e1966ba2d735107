//! Bounded, ordered conversation transcript.

use crate::types::Message;

/// Default retained message count.
pub const DEFAULT_MAX_MESSAGES: usize = 200;

/// Messages in conversation order, oldest first.
///
/// Never holds more than `max_messages` entries. When a push overflows the
/// bound the oldest entries are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
    max_messages: usize,
}

impl Transcript {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages: max_messages.max(1),
        }
    }

    /// Keep the last `max_messages` of `messages`.
    pub fn from_tail(messages: impl IntoIterator<Item = Message>, max_messages: usize) -> Self {
        let mut transcript = Self::new(max_messages);
        transcript.extend(messages);
        transcript
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.evict();
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
        self.evict();
    }

    fn evict(&mut self) {
        let excess = self.messages.len().saturating_sub(self.max_messages);
        if excess > 0 {
            self.messages.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

impl IntoIterator for Transcript {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<Message> {
        (0..n).map(|i| Message::human(format!("msg {i}"))).collect()
    }

    #[test]
    fn push_drops_oldest_first() {
        let mut transcript = Transcript::new(3);
        for message in numbered(5) {
            transcript.push(message);
        }
        let texts: Vec<_> = transcript.iter().filter_map(Message::text).collect();
        assert_eq!(texts, vec!["msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn from_tail_keeps_most_recent() {
        let transcript = Transcript::from_tail(numbered(205), 200);
        assert_eq!(transcript.len(), 200);
        assert_eq!(transcript.messages()[0].text().as_deref(), Some("msg 5"));
        assert_eq!(transcript.last().and_then(Message::text).as_deref(), Some("msg 204"));
    }

    #[test]
    fn under_bound_keeps_everything() {
        let transcript = Transcript::from_tail(numbered(3), 200);
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn zero_bound_is_clamped_to_one() {
        let transcript = Transcript::from_tail(numbered(2), 0);
        assert_eq!(transcript.max_messages(), 1);
        assert_eq!(transcript.len(), 1);
    }
}
