impl<L> PlaybackEngine<L>
where
    L: PlaybackListener,
{
    /// Drains every pending event from `input`. Returns how many were applied.
    pub fn process_inputs<IN>(&mut self, input: &mut IN, now_ms: u64) -> usize
    where
        IN: InputProvider,
    {
        let mut applied = 0usize;
        loop {
            match input.poll_event() {
                Ok(Some(event)) => {
                    self.apply_input_event(event, now_ms);
                    applied += 1;
                }
                Ok(None) => break,
                Err(_) => {
                    warn!("input: provider error, dropping remaining events");
                    break;
                }
            }
        }
        applied
    }

    pub fn apply_input_event(&mut self, event: InputEvent, now_ms: u64) {
        debug!(
            "input: event={:?} index={} state={:?}",
            event, self.current_index, self.state
        );

        match event {
            InputEvent::TogglePlay => self.toggle(now_ms),
            InputEvent::Stop => self.stop(),
            InputEvent::PreviousSentence => self.previous_sentence(now_ms),
            InputEvent::NextSentence => {
                if !self.skip_special_content(now_ms) {
                    self.next_sentence(now_ms);
                }
            }
            InputEvent::PreviousWord => self.previous_word(now_ms),
            InputEvent::NextWord => self.next_word(now_ms),
            InputEvent::Faster => {
                let _ = self.adjust_wpm(true);
            }
            InputEvent::Slower => {
                let _ = self.adjust_wpm(false);
            }
        }
    }
}
