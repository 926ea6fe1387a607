use alloc::collections::VecDeque;

use super::{InputEvent, InputProvider};

/// Provider error raised by [`MockInput::fail_next`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MockInputError;

/// Queue-backed input for headless playback and tests. Events come out in
/// the order they were pushed; an empty queue polls as `None`.
#[derive(Default, Debug, Clone)]
pub struct MockInput {
    queue: VecDeque<InputEvent>,
    fail_next: bool,
}

impl MockInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: &[InputEvent]) -> Self {
        Self {
            queue: events.iter().copied().collect(),
            fail_next: false,
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    /// Makes the next poll report an error instead of an event.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl InputProvider for MockInput {
    type Error = MockInputError;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        if core::mem::take(&mut self.fail_next) {
            return Err(MockInputError);
        }
        Ok(self.queue.pop_front())
    }
}
