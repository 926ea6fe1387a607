//! Host input abstraction layer.

pub mod mock;

/// Logical reader controls, independent of how the host captures them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    TogglePlay,
    Stop,
    PreviousSentence,
    /// Skips a special block on screen, otherwise moves to the next sentence.
    NextSentence,
    PreviousWord,
    NextWord,
    Faster,
    Slower,
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}
