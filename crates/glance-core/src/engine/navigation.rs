impl<L> PlaybackEngine<L>
where
    L: PlaybackListener,
{
    /// Moves to `index`. Out-of-range requests are ignored without any
    /// notification.
    pub fn jump_to_index(&mut self, index: usize, now_ms: u64) {
        if index >= self.sequence.len() {
            debug!(
                "playback: jump ignored index={} len={}",
                index,
                self.sequence.len()
            );
            return;
        }

        let was_playing = self.state.is_playing();
        self.end_special_display();
        self.current_index = index;
        self.ease_in_count = 0;
        self.land(was_playing, now_ms);
    }

    pub fn previous_sentence(&mut self, now_ms: u64) {
        self.jump_sentence(Direction::Backward, now_ms);
    }

    pub fn next_sentence(&mut self, now_ms: u64) {
        self.jump_sentence(Direction::Forward, now_ms);
    }

    pub fn previous_word(&mut self, now_ms: u64) {
        self.step_word(Direction::Backward, now_ms);
    }

    pub fn next_word(&mut self, now_ms: u64) {
        self.step_word(Direction::Forward, now_ms);
    }

    /// Ends a visible special block early. Returns `false`, doing nothing,
    /// when no special block is on screen.
    pub fn skip_special_content(&mut self, now_ms: u64) -> bool {
        match self.state {
            PlaybackState::ShowingSpecial { remaining } => {
                debug!(
                    "playback: skip special index={} remaining={}",
                    self.current_index, remaining
                );
                self.finish_special(now_ms);
                true
            }
            PlaybackState::SpecialHeld { .. } => {
                self.end_special_display();
                self.notify_progress();
                if let Some(next) = self.neighbour_item(Direction::Forward) {
                    self.current_index = next;
                    self.notify_position();
                }
                true
            }
            PlaybackState::Playing | PlaybackState::Paused => false,
        }
    }

    fn jump_sentence(&mut self, direction: Direction, now_ms: u64) {
        let was_playing = self.state.is_playing();
        self.end_special_display();

        let from = self.current_index;
        let current_word = self.sequence.words_before(from);
        let starts = self.sequence.sentence_starts();

        let mut target = match direction {
            Direction::Forward => starts
                .iter()
                .find(|&&start| start > current_word)
                .and_then(|&start| self.sequence.item_index_of_word(start))
                .unwrap_or(self.sequence.last_index()),
            Direction::Backward => {
                let mut slot = starts
                    .iter()
                    .rposition(|&start| start < current_word)
                    .unwrap_or(0);

                if was_playing {
                    let rapid = self.last_back_press_ms.is_some_and(|last| {
                        now_ms.saturating_sub(last) <= self.config.rapid_back_window_ms as u64
                    });
                    if rapid && self.last_back_sentence == Some(slot) && slot > 0 {
                        slot -= 1;
                        debug!("playback: rapid back press, extra sentence to slot={}", slot);
                    }
                    self.last_back_press_ms = Some(now_ms);
                    self.last_back_sentence = Some(slot);
                } else {
                    self.last_back_press_ms = None;
                    self.last_back_sentence = None;
                }

                starts
                    .get(slot)
                    .and_then(|&start| self.sequence.item_index_of_word(start))
                    .unwrap_or(0)
            }
        };

        let waypoint = match direction {
            Direction::Forward => self.sequence.first_special_in(from, target),
            Direction::Backward => self.sequence.last_special_in(target, from),
        };
        if let Some(special_index) = waypoint {
            debug!(
                "playback: sentence jump stops at special index={} instead of {}",
                special_index, target
            );
            target = special_index;
            self.reset_back_press();
        }

        debug!(
            "playback: sentence {:?} from={} to={} playing={}",
            direction, from, target, was_playing
        );
        self.current_index = target;
        self.ease_in_count = 0;
        self.land(was_playing, now_ms);
    }

    fn step_word(&mut self, direction: Direction, now_ms: u64) {
        let was_playing = self.state.is_playing();
        self.end_special_display();

        if let Some(next) = self.neighbour_item(direction) {
            self.current_index = next;
        }

        self.land(was_playing, now_ms);
    }

    /// Nearest non-break item in `direction`, or `None` at the boundary.
    fn neighbour_item(&self, direction: Direction) -> Option<usize> {
        let items = self.sequence.items();
        match direction {
            Direction::Forward => items
                .iter()
                .enumerate()
                .skip(self.current_index + 1)
                .find(|(_, item)| !matches!(item, ContentItem::ParagraphBreak))
                .map(|(index, _)| index),
            Direction::Backward => items[..self.current_index]
                .iter()
                .rposition(|item| !matches!(item, ContentItem::ParagraphBreak)),
        }
    }

    /// Settles on `current_index` after a jump: shows a special block with a
    /// countdown when playing, otherwise announces the position and re-arms
    /// the word timer if playback is running.
    fn land(&mut self, was_playing: bool, now_ms: u64) {
        if !was_playing {
            self.notify_position();
            return;
        }

        match self.sequence.get(self.current_index) {
            Some(ContentItem::Special(_)) => self.show_special(now_ms),
            Some(ContentItem::Word(_) | ContentItem::ParagraphBreak) | None => {
                self.notify_position();
                self.disarm_word_timer();
                let interval = self.interval_ms();
                self.arm_word_timer(now_ms, interval, WordTimerAction::Advance);
            }
        }
    }

    fn reset_back_press(&mut self) {
        self.last_back_press_ms = None;
        self.last_back_sentence = None;
    }
}
