use std::io::{self, Write};

use glance_core::{
    content::{ContentItem, SpecialContent, SpecialKind},
    engine::{ContextWindow, CountdownDisplay, PlaybackListener, Progress},
    orp::split_at_orp,
    text_policy::{label_preview, progress_label},
};
use log::debug;

use super::ORP_ANCHOR_COLUMN;

const LABEL_BYTES: usize = 96;
const PROGRESS_BYTES: usize = 32;

const CLEAR_LINE: &str = "\r\x1b[2K";
const ORP_STYLE: &str = "\x1b[1;31m";
const DIM_STYLE: &str = "\x1b[2m";
const RESET_STYLE: &str = "\x1b[0m";

#[derive(Clone, Debug)]
struct SpecialView {
    kind: SpecialKind,
    label: String,
    countdown: CountdownDisplay,
}

/// Single-line RSVP renderer: the ORP letter stays in one column and the
/// line is redrawn in place on every notification.
pub(super) struct TerminalPresenter {
    word: String,
    upcoming: String,
    progress: Option<Progress>,
    playing: bool,
    wpm: u16,
    special: Option<SpecialView>,
}

impl TerminalPresenter {
    pub(super) fn new(wpm: u16) -> Self {
        Self {
            word: String::new(),
            upcoming: String::new(),
            progress: None,
            playing: false,
            wpm,
            special: None,
        }
    }

    pub(super) fn set_wpm(&mut self, wpm: u16) {
        if self.wpm != wpm {
            self.wpm = wpm;
            self.redraw();
        }
    }

    pub(super) fn finish(&mut self) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out);
        let _ = out.flush();
    }

    fn redraw(&self) {
        let mut line = String::with_capacity(128);
        line.push_str(CLEAR_LINE);

        match &self.special {
            Some(special) => {
                line.push_str(&format!("[{}] {}", kind_label(special.kind), special.label));
                match special.countdown {
                    CountdownDisplay::Remaining(seconds) => {
                        line.push_str(&format!("  {seconds}s"));
                    }
                    CountdownDisplay::Hidden => line.push_str("  (held)"),
                }
            }
            None => {
                let split = split_at_orp(&self.word);
                let pad = ORP_ANCHOR_COLUMN.saturating_sub(split.before.chars().count());
                line.extend(std::iter::repeat_n(' ', pad));
                line.push_str(split.before);
                line.push_str(ORP_STYLE);
                line.push_str(split.orp);
                line.push_str(RESET_STYLE);
                line.push_str(split.after);
                if !self.upcoming.is_empty() {
                    line.push_str(DIM_STYLE);
                    line.push(' ');
                    line.push_str(&self.upcoming);
                    line.push_str(RESET_STYLE);
                }
            }
        }

        let mut progress_buf = [0u8; PROGRESS_BYTES];
        let progress = match self.progress {
            Some(progress) => progress_label(progress, &mut progress_buf),
            None => "",
        };
        let marker = if self.playing { '>' } else { '|' };
        line.push_str(&format!(
            "{DIM_STYLE}   {marker} {progress} {}wpm{RESET_STYLE}",
            self.wpm
        ));

        let mut out = io::stdout().lock();
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }

    fn newline(&self) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out);
    }
}

impl PlaybackListener for TerminalPresenter {
    fn on_word_change(&mut self, word: &str, context: &ContextWindow<'_>) {
        self.word.clear();
        self.word.push_str(word);
        self.upcoming.clear();
        if let Some(entry) = context.entries().iter().find(|entry| entry.offset == 1)
            && let ContentItem::Word(next) = entry.item
        {
            self.upcoming.push_str(next);
        }
        self.redraw();
    }

    fn on_state_change(&mut self, playing: bool) {
        self.playing = playing;
        self.redraw();
    }

    fn on_progress(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    fn on_paragraph_break(&mut self) {
        self.newline();
        let pad = ORP_ANCHOR_COLUMN;
        let mut out = io::stdout().lock();
        let _ = write!(out, "{CLEAR_LINE}{:pad$}{DIM_STYLE}¶{RESET_STYLE}", "");
        let _ = out.flush();
    }

    fn on_special_shown(&mut self, special: &SpecialContent, seconds: u8) {
        let mut label_buf = [0u8; LABEL_BYTES];
        let label = label_preview(&special.label, &mut label_buf);
        debug!(
            "terminal: special kind={:?} payload_bytes={}",
            special.kind,
            special.payload.len()
        );
        self.newline();
        self.special = Some(SpecialView {
            kind: special.kind,
            label: label.to_string(),
            countdown: CountdownDisplay::Remaining(seconds),
        });
        self.redraw();
    }

    fn on_special_tick(&mut self, countdown: CountdownDisplay) {
        if let Some(special) = self.special.as_mut() {
            special.countdown = countdown;
        }
        self.redraw();
    }

    fn on_special_end(&mut self) {
        if self.special.take().is_some() {
            self.newline();
        }
    }
}

fn kind_label(kind: SpecialKind) -> &'static str {
    match kind {
        SpecialKind::Image => "image",
        SpecialKind::Code => "code",
        SpecialKind::Table => "table",
    }
}
