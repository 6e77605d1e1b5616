//! Notification log — what the dashboard tells its user, newest first.
//!
//! Unbounded unless a capacity is configured; when capped, the oldest entry
//! is evicted to make room. A separate slot keeps only the most recent
//! confirmation message for toast-style display.

use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct NotificationLog {
    /// Newest at the front.
    entries: VecDeque<String>,
    capacity: Option<usize>,
    latest_confirmation: Option<String>,
}

impl NotificationLog {
    /// An unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A log keeping at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.capacity == Some(0) {
            return;
        }
        if let Some(capacity) = self.capacity {
            while self.entries.len() >= capacity {
                self.entries.pop_back();
            }
        }
        self.entries.push_front(message);
    }

    /// Push a confirmation message and make it the latest toast.
    pub fn push_confirmation(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.latest_confirmation = Some(message.clone());
        self.push(message);
    }

    pub fn latest_confirmation(&self) -> Option<&str> {
        self.latest_confirmation.as_deref()
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn newest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
