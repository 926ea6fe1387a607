impl<L> PlaybackEngine<L>
where
    L: PlaybackListener,
{
    /// Builds a paused engine over the default text. Nothing is emitted until
    /// content is loaded or [`Self::emit_snapshot`] is called.
    pub fn new(listener: L, mut config: EngineConfig) -> Self {
        if config.max_wpm < config.min_wpm {
            core::mem::swap(&mut config.max_wpm, &mut config.min_wpm);
        }
        config.wpm = config.wpm.clamp(config.min_wpm, config.max_wpm);
        config.special_dwell_secs = config.special_dwell_secs.max(1);
        config.context_radius = config.context_radius.min(MAX_CONTEXT_RADIUS as u8);

        Self {
            listener,
            config,
            sequence: Sequence::default(),
            current_index: 0,
            state: PlaybackState::Paused,
            ease_in_count: 0,
            word_timer: None,
            countdown_timer: None,
            last_back_press_ms: None,
            last_back_sentence: None,
            words_since_drain: 0,
        }
    }

    /// Replaces the sequence with tokenized prose and rewinds to the start.
    pub fn set_text(&mut self, text: &str) {
        self.load(Sequence::from_text(text));
    }

    /// Replaces the sequence with pre-built items and rewinds to the start.
    pub fn set_content(&mut self, items: Vec<ContentItem>) {
        self.load(Sequence::from_items(items));
    }

    /// Loads items, then moves to an anchor index resolved by the caller.
    /// An out-of-range anchor leaves playback at the start.
    pub fn set_content_at(&mut self, items: Vec<ContentItem>, index: usize, now_ms: u64) {
        self.set_content(items);
        self.jump_to_index(index, now_ms);
    }

    fn load(&mut self, sequence: Sequence) {
        self.disarm_all_timers();
        if self.state.shows_special() {
            self.listener.on_special_end();
        }
        if self.state.is_playing() {
            self.listener.on_state_change(false);
        }

        self.state = PlaybackState::Paused;
        self.sequence = sequence;
        self.current_index = 0;
        self.ease_in_count = 0;
        self.reset_back_press();

        info!(
            "playback: content loaded items={} words={} specials={} sentences={} paragraphs={}",
            self.sequence.len(),
            self.sequence.word_count(),
            self.sequence.special_count(),
            self.sequence.sentence_starts().len(),
            self.sequence.paragraph_ends().len() + 1
        );
        self.notify_position();
    }

    /// Re-emits the current word, progress and play state.
    pub fn emit_snapshot(&mut self) {
        self.notify_position();
        let playing = self.state.is_playing();
        self.listener.on_state_change(playing);
    }

    pub fn current_word(&self) -> &str {
        word_at(&self.sequence, self.current_index)
    }

    pub fn current_item(&self) -> Option<&ContentItem> {
        self.sequence.get(self.current_index)
    }

    /// Up to `2 * count + 1` displayable items centred on the current one.
    /// `count` is capped at [`MAX_CONTEXT_RADIUS`].
    pub fn context(&self, count: usize) -> ContextWindow<'_> {
        build_context(&self.sequence, self.current_index, count)
    }

    pub fn progress(&self) -> Progress {
        progress_at(&self.sequence, self.current_index)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn ease_in_count(&self) -> u8 {
        self.ease_in_count
    }

    pub fn wpm(&self) -> u16 {
        self.config.wpm
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Time at which the pending word step fires, if any.
    pub fn word_deadline_ms(&self) -> Option<u64> {
        self.word_timer.map(|timer| timer.due_ms)
    }

    /// Time of the next countdown decrement, if a countdown is running.
    pub fn countdown_deadline_ms(&self) -> Option<u64> {
        self.countdown_timer
    }

    /// Words shown by playback since the last call.
    pub fn drain_word_updates(&mut self) -> u32 {
        let count = self.words_since_drain;
        self.words_since_drain = 0;
        count
    }

    pub fn persisted_settings(&self) -> PersistedSettings {
        PersistedSettings::new(self.config.wpm)
    }

    pub fn apply_persisted_settings(&mut self, settings: PersistedSettings) {
        let settings = settings.clamped(self.config.min_wpm, self.config.max_wpm);
        self.set_wpm(settings.wpm);
    }

    fn notify_position(&mut self) {
        let radius = self.config.context_radius as usize;
        let context = build_context(&self.sequence, self.current_index, radius);
        let word = word_at(&self.sequence, self.current_index);
        self.listener.on_word_change(word, &context);

        let progress = progress_at(&self.sequence, self.current_index);
        self.listener.on_progress(progress);
    }

    fn notify_progress(&mut self) {
        let progress = progress_at(&self.sequence, self.current_index);
        self.listener.on_progress(progress);
    }
}

fn word_at(sequence: &Sequence, index: usize) -> &str {
    match sequence.get(index) {
        Some(ContentItem::Word(word)) => word.as_str(),
        Some(ContentItem::ParagraphBreak | ContentItem::Special(_)) | None => "",
    }
}

fn build_context(sequence: &Sequence, index: usize, count: usize) -> ContextWindow<'_> {
    let mut window = ContextWindow::default();
    let displayable = sequence.displayable_indices();
    if displayable.is_empty() {
        return window;
    }

    let radius = count.min(MAX_CONTEXT_RADIUS);
    let center = sequence
        .displayables_before(index)
        .min(displayable.len() - 1);
    let start = center.saturating_sub(radius);
    let end = (center + radius + 1).min(displayable.len());

    for (pos, &item_index) in displayable.iter().enumerate().take(end).skip(start) {
        let Some(item) = sequence.get(item_index) else {
            continue;
        };
        let _ = window.entries.push(ContextEntry {
            offset: pos as isize - center as isize,
            item,
        });
    }
    window.current = center - start;
    window
}

fn progress_at(sequence: &Sequence, index: usize) -> Progress {
    let total = sequence.displayable_count();
    let current = sequence.displayables_before(index.saturating_add(1));
    let percent = if total == 0 {
        0
    } else {
        ((current * 100) / total).min(100) as u8
    };

    Progress {
        current,
        total,
        percent,
        special_count: sequence.special_count(),
        remaining_special_count: sequence.specials_after(index),
    }
}
