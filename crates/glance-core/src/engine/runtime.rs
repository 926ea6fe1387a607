impl<L> PlaybackEngine<L>
where
    L: PlaybackListener,
{
    /// Fires whichever deadlines are due at `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        let mut result = TickResult::Idle;

        if let Some(due_ms) = self.countdown_timer
            && now_ms >= due_ms
        {
            self.countdown_timer = None;
            self.step_countdown(due_ms, now_ms);
            result = TickResult::Fired;
        }

        if let Some(timer) = self.word_timer
            && now_ms >= timer.due_ms
        {
            self.word_timer = None;
            match timer.action {
                WordTimerAction::Advance => self.advance(now_ms),
                WordTimerAction::CrossBreak => self.cross_break(now_ms),
            }
            result = TickResult::Fired;
        }

        result
    }

    pub fn play(&mut self, now_ms: u64) {
        match self.state {
            PlaybackState::Playing | PlaybackState::ShowingSpecial { .. } => {}
            PlaybackState::SpecialHeld { remaining } => {
                debug!(
                    "playback: resume from held special index={} remaining={}",
                    self.current_index, remaining
                );
                self.ease_in_count = 0;
                self.state = PlaybackState::Playing;
                self.listener.on_state_change(true);
                self.finish_special(now_ms);
            }
            PlaybackState::Paused => {
                if self.current_index >= self.sequence.last_index() {
                    self.current_index = 0;
                    self.notify_position();
                }

                self.ease_in_count = 0;
                self.state = PlaybackState::Playing;
                self.listener.on_state_change(true);
                debug!(
                    "playback: play index={} wpm={} interval_ms={}",
                    self.current_index,
                    self.config.wpm,
                    self.interval_ms()
                );
                self.resume_at_current(now_ms);
            }
        }
    }

    pub fn pause(&mut self) {
        match self.state {
            PlaybackState::Paused | PlaybackState::SpecialHeld { .. } => {}
            PlaybackState::Playing => {
                self.disarm_word_timer();
                self.state = PlaybackState::Paused;
                self.listener.on_state_change(false);
            }
            PlaybackState::ShowingSpecial { remaining } => {
                self.disarm_all_timers();
                self.state = PlaybackState::SpecialHeld { remaining };
                self.listener.on_special_tick(CountdownDisplay::Hidden);
                self.listener.on_state_change(false);
            }
        }
    }

    /// Pauses, tears down any special block and rewinds to the first item.
    pub fn stop(&mut self) {
        self.pause();
        self.disarm_all_timers();
        if self.state.shows_special() {
            self.listener.on_special_end();
        }

        self.state = PlaybackState::Paused;
        self.current_index = 0;
        self.ease_in_count = 0;
        self.reset_back_press();
        self.notify_position();
    }

    pub fn toggle(&mut self, now_ms: u64) {
        if self.state.is_playing() {
            self.pause();
        } else {
            self.play(now_ms);
        }
    }

    /// Interval for the next word at the current rate and ease-in step,
    /// rounded to the nearest millisecond.
    pub fn interval_ms(&self) -> u32 {
        let step = self.ease_in_count as usize;
        let factor = EASE_IN_FACTORS_PERMILLE
            .get(step)
            .copied()
            .unwrap_or(1_000) as u64;
        let numerator = 60_000u64 * 1_000;
        let denominator = self.config.wpm.max(1) as u64 * factor;
        ((numerator + denominator / 2) / denominator) as u32
    }

    /// Clamps into the configured range. The position is left alone and the
    /// pending word keeps its deadline.
    pub fn set_wpm(&mut self, wpm: u16) -> bool {
        let next = wpm.clamp(self.config.min_wpm, self.config.max_wpm);
        if next == self.config.wpm {
            return false;
        }
        debug!("playback: wpm {} -> {}", self.config.wpm, next);
        self.config.wpm = next;
        true
    }

    pub fn adjust_wpm(&mut self, increase: bool) -> bool {
        let next = if increase {
            self.config.wpm.saturating_add(self.config.wpm_step)
        } else {
            self.config.wpm.saturating_sub(self.config.wpm_step)
        };
        self.set_wpm(next)
    }

    fn advance(&mut self, now_ms: u64) {
        if self.current_index >= self.sequence.last_index() {
            info!("playback: reached end index={}", self.current_index);
            self.pause();
            return;
        }

        let leaving_paragraph = self.sequence.is_paragraph_end(self.current_index);
        self.current_index += 1;
        if leaving_paragraph {
            debug!(
                "playback: leaving paragraph at index={}",
                self.current_index - 1
            );
        }
        self.enter_current(now_ms);
    }

    fn cross_break(&mut self, now_ms: u64) {
        if self.current_index >= self.sequence.last_index() {
            self.pause();
            return;
        }
        self.current_index += 1;
        self.enter_current(now_ms);
    }

    /// Handles the item playback just moved onto.
    fn enter_current(&mut self, now_ms: u64) {
        match self.sequence.get(self.current_index) {
            Some(ContentItem::ParagraphBreak) => {
                self.listener.on_paragraph_break();
                let pause_ms = self.config.paragraph_pause_ms as u32;
                self.arm_word_timer(now_ms, pause_ms, WordTimerAction::CrossBreak);
            }
            Some(ContentItem::Word(_)) => {
                self.ease_in_count = (self.ease_in_count + 1).min(EASE_IN_WORDS);
                self.words_since_drain = self.words_since_drain.saturating_add(1);
                self.notify_position();
                let interval = self.interval_ms();
                self.arm_word_timer(now_ms, interval, WordTimerAction::Advance);
            }
            Some(ContentItem::Special(_)) => self.show_special(now_ms),
            None => {
                warn!(
                    "playback: index {} outside sequence of {}",
                    self.current_index,
                    self.sequence.len()
                );
                self.current_index = self.sequence.last_index();
                self.pause();
            }
        }
    }

    /// Restarts timing for the current item while playing, after a jump or
    /// a fresh `play`.
    fn resume_at_current(&mut self, now_ms: u64) {
        match self.sequence.get(self.current_index) {
            Some(ContentItem::Special(_)) => self.show_special(now_ms),
            Some(ContentItem::Word(_) | ContentItem::ParagraphBreak) | None => {
                let interval = self.interval_ms();
                self.arm_word_timer(now_ms, interval, WordTimerAction::Advance);
            }
        }
    }

    fn show_special(&mut self, now_ms: u64) {
        self.disarm_word_timer();
        let seconds = self.config.special_dwell_secs;
        self.state = PlaybackState::ShowingSpecial { remaining: seconds };
        self.notify_position();

        if let Some(ContentItem::Special(special)) = self.sequence.get(self.current_index) {
            debug!(
                "playback: special index={} kind={:?} dwell_secs={}",
                self.current_index, special.kind, seconds
            );
            self.listener.on_special_shown(special, seconds);
        }
        self.arm_countdown(now_ms + COUNTDOWN_STEP_MS);
    }

    fn step_countdown(&mut self, due_ms: u64, now_ms: u64) {
        let PlaybackState::ShowingSpecial { remaining } = self.state else {
            return;
        };

        let remaining = remaining.saturating_sub(1);
        self.state = PlaybackState::ShowingSpecial { remaining };
        self.listener.on_special_tick(CountdownDisplay::Remaining(remaining));

        if remaining == 0 {
            self.finish_special(now_ms);
        } else {
            self.arm_countdown(due_ms + COUNTDOWN_STEP_MS);
        }
    }

    /// Closes the special block and moves on to the next item.
    fn finish_special(&mut self, now_ms: u64) {
        self.disarm_countdown();
        self.state = PlaybackState::Playing;
        self.listener.on_special_end();
        self.notify_progress();
        self.advance(now_ms);
    }

    /// Tears down a visible special block without moving. Playing stays
    /// playing, held becomes paused.
    fn end_special_display(&mut self) -> bool {
        let next = match self.state {
            PlaybackState::ShowingSpecial { .. } => PlaybackState::Playing,
            PlaybackState::SpecialHeld { .. } => PlaybackState::Paused,
            PlaybackState::Playing | PlaybackState::Paused => return false,
        };

        self.disarm_countdown();
        self.state = next;
        self.listener.on_special_end();
        true
    }

    fn arm_word_timer(&mut self, now_ms: u64, delay_ms: u32, action: WordTimerAction) {
        let timer = WordTimer {
            due_ms: now_ms + delay_ms as u64,
            action,
        };
        if let Some(previous) = self.word_timer.replace(timer) {
            debug!(
                "playback: word timer superseded due_ms={} action={:?}",
                previous.due_ms, previous.action
            );
        }
    }

    fn disarm_word_timer(&mut self) {
        self.word_timer = None;
    }

    fn arm_countdown(&mut self, due_ms: u64) {
        self.countdown_timer = Some(due_ms);
    }

    fn disarm_countdown(&mut self) {
        self.countdown_timer = None;
    }

    fn disarm_all_timers(&mut self) {
        self.disarm_word_timer();
        self.disarm_countdown();
    }
}
