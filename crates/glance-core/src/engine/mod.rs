//! Timed RSVP playback over a [`Sequence`].
//!
//! The engine never reads a clock. Every host call carries the current
//! monotonic time in milliseconds and [`PlaybackEngine::tick`] fires whatever
//! deadline has come due. There is at most one word deadline and one
//! countdown deadline at any time; arming a deadline always replaces the
//! previous one, so superseded timers can never fire.

use log::{debug, info, warn};

use crate::{
    content::{ContentItem, Sequence, SpecialContent},
    input::{InputEvent, InputProvider},
    settings::PersistedSettings,
};

use alloc::vec::Vec;

/// Ease-in rate multipliers in per-mille, indexed by words shown since `play`.
pub const EASE_IN_FACTORS_PERMILLE: [u32; 5] = [500, 600, 700, 850, 1000];
pub const EASE_IN_WORDS: u8 = EASE_IN_FACTORS_PERMILLE.len() as u8;
/// Largest window [`PlaybackEngine::context`] can return.
pub const MAX_CONTEXT_ITEMS: usize = 33;
/// Items on each side of the current one that fit in a context window.
pub const MAX_CONTEXT_RADIUS: usize = (MAX_CONTEXT_ITEMS - 1) / 2;

const COUNTDOWN_STEP_MS: u64 = 1_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    Idle,
    Fired,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    pub wpm: u16,
    pub min_wpm: u16,
    pub max_wpm: u16,
    pub wpm_step: u16,
    pub special_dwell_secs: u8,
    pub paragraph_pause_ms: u16,
    pub rapid_back_window_ms: u16,
    /// Displayable items on each side of the current one in word-change
    /// notifications. Clamped to [`MAX_CONTEXT_RADIUS`].
    pub context_radius: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wpm: 300,
            min_wpm: 100,
            max_wpm: 1_000,
            wpm_step: 10,
            special_dwell_secs: 5,
            paragraph_pause_ms: 500,
            rapid_back_window_ms: 800,
            context_radius: 4,
        }
    }
}

/// Play/pause state, including the two special-content sub-states.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaybackState {
    Paused,
    Playing,
    /// Playing, with a special block on screen and its countdown running.
    ShowingSpecial { remaining: u8 },
    /// Paused while a special block was on screen. The block stays visible,
    /// the countdown is hidden, and resuming ends the block.
    SpecialHeld { remaining: u8 },
}

impl PlaybackState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing | Self::ShowingSpecial { .. })
    }

    pub const fn shows_special(self) -> bool {
        matches!(self, Self::ShowingSpecial { .. } | Self::SpecialHeld { .. })
    }
}

/// Countdown value reported while a special block is displayed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CountdownDisplay {
    Remaining(u8),
    Hidden,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Progress {
    /// Displayable items at or before the current position.
    pub current: usize,
    pub total: usize,
    /// 0..=100
    pub percent: u8,
    pub special_count: usize,
    /// Specials strictly after the current position.
    pub remaining_special_count: usize,
}

impl Progress {
    /// Rough time left at `wpm`, counting each remaining special block at
    /// its full dwell time.
    pub fn estimate_remaining_ms(&self, wpm: u16, dwell_secs: u8) -> u64 {
        let remaining = self.total.saturating_sub(self.current);
        let words = remaining.saturating_sub(self.remaining_special_count) as u64;
        let word_ms = words * 60_000 / wpm.max(1) as u64;
        let special_ms = self.remaining_special_count as u64 * dwell_secs as u64 * 1_000;
        word_ms + special_ms
    }
}

/// One displayable item around the current position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContextEntry<'a> {
    /// Signed distance in displayable items, `0` for the current one.
    pub offset: isize,
    pub item: &'a ContentItem,
}

#[derive(Clone, Debug, Default)]
pub struct ContextWindow<'a> {
    entries: heapless::Vec<ContextEntry<'a>, MAX_CONTEXT_ITEMS>,
    current: usize,
}

impl<'a> ContextWindow<'a> {
    pub fn entries(&self) -> &[ContextEntry<'a>] {
        &self.entries
    }

    /// Position of the current item inside [`Self::entries`].
    pub fn current_position(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&ContextEntry<'a>> {
        self.entries.get(self.current)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Presentation-side receiver of engine notifications.
///
/// Callbacks run synchronously inside engine calls and only get access to
/// the listener itself, so they cannot re-enter the engine.
pub trait PlaybackListener {
    fn on_word_change(&mut self, _word: &str, _context: &ContextWindow<'_>) {}
    fn on_state_change(&mut self, _playing: bool) {}
    fn on_progress(&mut self, _progress: Progress) {}
    fn on_paragraph_break(&mut self) {}
    fn on_special_shown(&mut self, _special: &SpecialContent, _seconds: u8) {}
    fn on_special_tick(&mut self, _countdown: CountdownDisplay) {}
    fn on_special_end(&mut self) {}
}

impl PlaybackListener for () {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum WordTimerAction {
    Advance,
    CrossBreak,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct WordTimer {
    due_ms: u64,
    action: WordTimerAction,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
    Backward,
    Forward,
}

pub struct PlaybackEngine<L>
where
    L: PlaybackListener,
{
    listener: L,
    config: EngineConfig,
    sequence: Sequence,
    current_index: usize,
    state: PlaybackState,
    ease_in_count: u8,
    word_timer: Option<WordTimer>,
    countdown_timer: Option<u64>,
    last_back_press_ms: Option<u64>,
    last_back_sentence: Option<usize>,
    words_since_drain: u32,
}

include!("view.rs");
include!("runtime.rs");
include!("navigation.rs");
include!("input.rs");

#[cfg(test)]
mod tests;
