use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use glance_core::input::{InputEvent, InputProvider};
use log::{debug, warn};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Command {
    Event(InputEvent),
    Quit,
}

/// Line-oriented keyboard input. A reader thread forwards parsed commands
/// so the main loop can poll without blocking.
pub(super) struct StdinInput {
    rx: Receiver<Command>,
    quit_requested: bool,
    closed: bool,
}

impl StdinInput {
    pub(super) fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("stdin-input".into())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    let Ok(line) = line else {
                        break;
                    };
                    for command in parse_line(&line) {
                        if tx.send(command).is_err() {
                            return;
                        }
                    }
                }
                debug!("input: stdin closed");
            });

        if let Err(err) = spawned {
            warn!("input: could not start stdin reader: {err}");
        }

        Self {
            rx,
            quit_requested: false,
            closed: false,
        }
    }

    pub(super) fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub(super) fn closed(&self) -> bool {
        self.closed
    }
}

impl InputProvider for StdinInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        loop {
            match self.rx.try_recv() {
                Ok(Command::Event(event)) => return Ok(Some(event)),
                Ok(Command::Quit) => self.quit_requested = true,
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    return Ok(None);
                }
            }
        }
    }
}

/// An empty line toggles playback; otherwise every character is a key.
fn parse_line(line: &str) -> Vec<Command> {
    if line.trim().is_empty() {
        return vec![Command::Event(InputEvent::TogglePlay)];
    }

    line.chars()
        .filter(|ch| !ch.is_whitespace())
        .filter_map(parse_key)
        .collect()
}

fn parse_key(key: char) -> Option<Command> {
    let event = match key {
        'p' => InputEvent::TogglePlay,
        's' => InputEvent::Stop,
        'k' => InputEvent::PreviousSentence,
        'j' => InputEvent::NextSentence,
        'h' => InputEvent::PreviousWord,
        'l' => InputEvent::NextWord,
        '+' | '=' => InputEvent::Faster,
        '-' | '_' => InputEvent::Slower,
        'q' => return Some(Command::Quit),
        _ => return None,
    };
    Some(Command::Event(event))
}
