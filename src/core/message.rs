use chrono::{DateTime, Utc};

use crate::api::SourceRef;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_bot(self) -> bool {
        self == Sender::Bot
    }
}

impl AsRef<str> for Sender {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Sender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            _ => Err(format!("invalid sender: {value}")),
        }
    }
}

/// One entry in the transcript. Entries are immutable once appended.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub sources: Vec<SourceRef>,
    pub is_error: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            sources: Vec::new(),
            is_error: false,
            timestamp: Utc::now(),
        }
    }

    pub fn bot(id: u64, text: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Bot,
            sources,
            is_error: false,
            timestamp: Utc::now(),
        }
    }

    pub fn bot_error(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Bot,
            sources: Vec::new(),
            is_error: true,
            timestamp: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn is_bot(&self) -> bool {
        self.sender.is_bot()
    }
}

/// Hands out message ids derived from the wall clock. Ids are bumped past
/// the previous one when two messages land in the same millisecond, so they
/// stay strictly increasing for the lifetime of the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageIdAllocator {
    last: u64,
}

impl MessageIdAllocator {
    pub fn next(&mut self, now_ms: u64) -> u64 {
        let id = now_ms.max(self.last + 1);
        self.last = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sender_strings_are_rejected() {
        assert!(Sender::try_from("assistant").is_err());
        assert_eq!(Sender::try_from("bot"), Ok(Sender::Bot));
    }

    #[test]
    fn constructors_set_roles_and_flags() {
        let user = Message::user(1, "hello");
        let bot = Message::bot(2, "hi", Vec::new());
        let error = Message::bot_error(3, "nope");
        assert!(user.is_user());
        assert!(bot.is_bot() && !bot.is_error);
        assert!(error.is_bot() && error.is_error);
    }

    #[test]
    fn ids_stay_strictly_increasing_within_one_millisecond() {
        let mut ids = MessageIdAllocator::default();
        let first = ids.next(1_700_000_000_000);
        let second = ids.next(1_700_000_000_000);
        let third = ids.next(1_700_000_000_000);
        assert_eq!(first, 1_700_000_000_000);
        assert_eq!(second, first + 1);
        assert_eq!(third, second + 1);
    }

    #[test]
    fn ids_follow_the_clock_when_it_advances() {
        let mut ids = MessageIdAllocator::default();
        let first = ids.next(1_000);
        let second = ids.next(5_000);
        assert_eq!(first, 1_000);
        assert_eq!(second, 5_000);
    }
}
