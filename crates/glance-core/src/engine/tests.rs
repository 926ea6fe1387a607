use super::*;
use crate::{content::SpecialKind, input::mock::MockInput};

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Word(String),
    State(bool),
    Progress(Progress),
    ParagraphBreak,
    SpecialShown(String, u8),
    Tick(CountdownDisplay),
    SpecialEnd,
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    fn take(&mut self) -> Vec<Event> {
        core::mem::take(&mut self.events)
    }
}

impl PlaybackListener for Recorder {
    fn on_word_change(&mut self, word: &str, _context: &ContextWindow<'_>) {
        self.events.push(Event::Word(word.to_string()));
    }

    fn on_state_change(&mut self, playing: bool) {
        self.events.push(Event::State(playing));
    }

    fn on_progress(&mut self, progress: Progress) {
        self.events.push(Event::Progress(progress));
    }

    fn on_paragraph_break(&mut self) {
        self.events.push(Event::ParagraphBreak);
    }

    fn on_special_shown(&mut self, special: &SpecialContent, seconds: u8) {
        self.events
            .push(Event::SpecialShown(special.label.clone(), seconds));
    }

    fn on_special_tick(&mut self, countdown: CountdownDisplay) {
        self.events.push(Event::Tick(countdown));
    }

    fn on_special_end(&mut self) {
        self.events.push(Event::SpecialEnd);
    }
}

fn config_250() -> EngineConfig {
    EngineConfig {
        wpm: 250,
        ..EngineConfig::default()
    }
}

fn engine_with_text(text: &str) -> PlaybackEngine<Recorder> {
    let mut engine = PlaybackEngine::new(Recorder::default(), config_250());
    engine.set_text(text);
    engine.listener_mut().take();
    engine
}

fn engine_with_items(items: Vec<ContentItem>) -> PlaybackEngine<Recorder> {
    let mut engine = PlaybackEngine::new(Recorder::default(), config_250());
    engine.set_content(items);
    engine.listener_mut().take();
    engine
}

fn special(label: &str) -> ContentItem {
    ContentItem::Special(SpecialContent::new(SpecialKind::Code, "<pre>x</pre>", label))
}

fn words(values: &[&str]) -> Vec<ContentItem> {
    values.iter().map(|value| ContentItem::word(*value)).collect()
}

fn fire_next(engine: &mut PlaybackEngine<Recorder>) -> u64 {
    let due = engine
        .word_deadline_ms()
        .into_iter()
        .chain(engine.countdown_deadline_ms())
        .min()
        .expect("a pending deadline");
    assert_eq!(engine.tick(due), TickResult::Fired);
    due
}

fn countdown_ticks(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Tick(CountdownDisplay::Remaining(n)) => Some(*n),
            _ => None,
        })
        .collect()
}

#[test]
fn ease_in_ramps_to_base_interval() {
    let mut engine = engine_with_text("a b c d e f g h i j");
    engine.play(0);

    let mut intervals = Vec::new();
    let mut last = 0u64;
    for _ in 0..7 {
        let due = engine.word_deadline_ms().unwrap();
        intervals.push(due - last);
        engine.tick(due);
        last = due;
    }

    assert_eq!(intervals, [480, 400, 343, 282, 240, 240, 240]);
    assert_eq!(engine.ease_in_count(), EASE_IN_WORDS);
}

#[test]
fn play_emits_state_and_keeps_current_word() {
    let mut engine = engine_with_text("first second");
    engine.play(0);

    assert_eq!(engine.listener_mut().take(), [Event::State(true)]);
    assert_eq!(engine.current_word(), "first");

    engine.tick(480);
    assert_eq!(engine.current_word(), "second");
}

#[test]
fn paragraph_break_adds_fixed_pause() {
    let mut engine = engine_with_text("one two\n\nthree");
    engine.play(0);
    engine.tick(480);
    engine.listener_mut().take();

    engine.tick(880);
    assert_eq!(engine.listener_mut().take(), [Event::ParagraphBreak]);
    assert_eq!(engine.current_word(), "");
    assert_eq!(engine.word_deadline_ms(), Some(1_380));

    assert_eq!(engine.tick(1_379), TickResult::Idle);
    engine.tick(1_380);
    assert_eq!(engine.current_word(), "three");
    assert_eq!(engine.current_index(), 3);
}

#[test]
fn playback_pauses_at_the_end() {
    let mut engine = engine_with_text("just two");
    engine.play(0);
    engine.tick(480);
    engine.listener_mut().take();

    engine.tick(880);
    assert!(!engine.is_playing());
    assert_eq!(engine.listener_mut().take(), [Event::State(false)]);
    assert_eq!(engine.word_deadline_ms(), None);
}

#[test]
fn play_at_end_wraps_to_start() {
    let mut engine = engine_with_text("alpha beta gamma");
    engine.jump_to_index(2, 0);
    engine.play(10);

    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.current_word(), "alpha");
    assert!(engine.is_playing());
}

#[test]
fn special_content_counts_down_then_continues() {
    let mut items = words(&["before"]);
    items.push(special("listing"));
    items.extend(words(&["after"]));
    let mut engine = engine_with_items(items);

    engine.play(0);
    engine.tick(480);
    assert_eq!(
        engine.state(),
        PlaybackState::ShowingSpecial { remaining: 5 }
    );
    assert!(
        engine
            .listener_mut()
            .take()
            .contains(&Event::SpecialShown("listing".into(), 5))
    );
    assert_eq!(engine.word_deadline_ms(), None);

    for due in [1_480, 2_480, 3_480, 4_480] {
        engine.tick(due);
    }
    assert_eq!(engine.current_index(), 1);
    engine.tick(5_480);

    let events = engine.listener_mut().take();
    assert_eq!(countdown_ticks(&events), [4, 3, 2, 1, 0]);
    assert!(events.contains(&Event::SpecialEnd));
    assert_eq!(engine.current_word(), "after");
    assert_eq!(engine.state(), PlaybackState::Playing);
    assert_eq!(engine.countdown_deadline_ms(), None);
}

#[test]
fn pausing_special_hides_countdown_and_resume_skips_rest() {
    let mut items = words(&["before"]);
    items.push(special("chart"));
    items.extend(words(&["after"]));
    let mut engine = engine_with_items(items);

    engine.play(0);
    engine.tick(480);
    engine.tick(1_480);
    engine.tick(2_480);
    engine.listener_mut().take();

    engine.pause();
    assert_eq!(engine.state(), PlaybackState::SpecialHeld { remaining: 3 });
    assert_eq!(
        engine.listener_mut().take(),
        [Event::Tick(CountdownDisplay::Hidden), Event::State(false)]
    );
    assert_eq!(engine.countdown_deadline_ms(), None);
    assert_eq!(engine.tick(60_000), TickResult::Idle);

    engine.play(60_000);
    let events = engine.listener_mut().take();
    assert_eq!(events[0], Event::State(true));
    assert_eq!(events[1], Event::SpecialEnd);
    assert!(countdown_ticks(&events).is_empty());
    assert_eq!(engine.current_word(), "after");
    assert!(engine.is_playing());
}

#[test]
fn rapid_double_back_press_skips_an_extra_sentence() {
    let mut engine = engine_with_text("One a. Two b. Three c. Four d e f.");
    engine.jump_to_index(8, 0);
    engine.play(0);

    engine.previous_sentence(0);
    assert_eq!(engine.current_index(), 6);

    engine.tick(480);
    assert_eq!(engine.current_index(), 7);

    engine.previous_sentence(500);
    assert_eq!(engine.current_index(), 4);
}

#[test]
fn slow_second_back_press_lands_on_same_sentence() {
    let mut engine = engine_with_text("One a. Two b. Three c. Four d e f.");
    engine.jump_to_index(8, 0);
    engine.play(0);

    engine.previous_sentence(0);
    engine.tick(480);
    engine.tick(880);
    assert_eq!(engine.current_index(), 8);

    engine.previous_sentence(900);
    assert_eq!(engine.current_index(), 6);
}

#[test]
fn back_press_while_paused_never_doubles() {
    let mut engine = engine_with_text("One a. Two b. Three c. Four d e f.");
    engine.jump_to_index(7, 0);

    engine.previous_sentence(0);
    assert_eq!(engine.current_index(), 6);
    engine.next_word(10);
    engine.previous_sentence(20);
    assert_eq!(engine.current_index(), 6);
}

#[test]
fn next_sentence_moves_to_following_start() {
    let mut engine = engine_with_text("Alpha beta. Gamma delta. Epsilon.");
    engine.next_sentence(0);
    assert_eq!(engine.current_word(), "Gamma");
    engine.next_sentence(0);
    assert_eq!(engine.current_word(), "Epsilon.");
    engine.next_sentence(0);
    assert_eq!(engine.current_word(), "Epsilon.");
}

#[test]
fn sentence_jumps_stop_at_special_waypoints() {
    let mut items = words(&["One.", "Two"]);
    items.push(special("figure"));
    items.extend(words(&["Three.", "Four."]));
    let mut engine = engine_with_items(items);

    engine.next_sentence(0);
    assert_eq!(engine.current_index(), 1);

    engine.next_sentence(0);
    assert_eq!(engine.current_index(), 2);
    assert_eq!(engine.state(), PlaybackState::Paused);
    assert!(
        !engine
            .listener_mut()
            .take()
            .iter()
            .any(|event| matches!(event, Event::SpecialShown(..)))
    );

    engine.next_sentence(0);
    assert_eq!(engine.current_index(), 4);

    engine.previous_sentence(0);
    assert_eq!(engine.current_index(), 2);
}

#[test]
fn sentence_jump_onto_special_while_playing_starts_countdown() {
    let mut items = words(&["One.", "Two"]);
    items.push(special("figure"));
    items.extend(words(&["Three.", "Four."]));
    let mut engine = engine_with_items(items);

    engine.jump_to_index(1, 0);
    engine.play(0);
    engine.next_sentence(10);

    assert_eq!(engine.current_index(), 2);
    assert_eq!(
        engine.state(),
        PlaybackState::ShowingSpecial { remaining: 5 }
    );
    assert_eq!(engine.countdown_deadline_ms(), Some(1_010));
    assert_eq!(engine.word_deadline_ms(), None);
}

#[test]
fn skip_special_only_acts_on_visible_special() {
    let mut items = words(&["lead"]);
    items.push(special("table"));
    items.extend(words(&["tail", "end."]));
    let mut engine = engine_with_items(items);

    assert!(!engine.skip_special_content(0));

    engine.play(0);
    engine.tick(480);
    assert!(engine.skip_special_content(700));
    assert_eq!(engine.current_word(), "tail");
    assert_eq!(engine.countdown_deadline_ms(), None);
    assert!(engine.word_deadline_ms().is_some());
}

#[test]
fn next_sentence_input_skips_special_first() {
    let mut items = words(&["Lead."]);
    items.push(special("table"));
    items.extend(words(&["tail", "words.", "Next", "one."]));
    let mut engine = engine_with_items(items);

    engine.play(0);
    engine.tick(480);
    engine.apply_input_event(InputEvent::NextSentence, 600);
    assert_eq!(engine.current_word(), "tail");

    engine.apply_input_event(InputEvent::NextSentence, 700);
    assert_eq!(engine.current_word(), "Next");
}

#[test]
fn single_steps_skip_breaks_and_clamp() {
    let mut engine = engine_with_text("a b\n\nc d");

    engine.previous_word(0);
    assert_eq!(engine.current_index(), 0);

    engine.jump_to_index(1, 0);
    engine.next_word(0);
    assert_eq!(engine.current_index(), 3);
    engine.previous_word(0);
    assert_eq!(engine.current_index(), 1);

    engine.jump_to_index(4, 0);
    engine.next_word(0);
    assert_eq!(engine.current_index(), 4);
}

#[test]
fn single_steps_keep_ease_in() {
    let mut engine = engine_with_text("a b c d e");
    engine.play(0);
    engine.tick(480);
    assert_eq!(engine.ease_in_count(), 1);

    engine.next_word(500);
    assert_eq!(engine.ease_in_count(), 1);
    assert_eq!(engine.word_deadline_ms(), Some(900));
}

#[test]
fn jumps_while_playing_void_the_old_timer() {
    let mut engine = engine_with_text("a b c d e f");
    engine.play(0);
    engine.jump_to_index(3, 100);

    assert_eq!(engine.word_deadline_ms(), Some(580));
    assert_eq!(engine.tick(480), TickResult::Idle);
    assert_eq!(engine.current_index(), 3);

    fire_next(&mut engine);
    assert_eq!(engine.current_index(), 4);
}

#[test]
fn out_of_range_jump_is_silent() {
    let mut engine = engine_with_text("one two three");
    engine.jump_to_index(1, 0);
    engine.listener_mut().take();

    engine.jump_to_index(3, 0);
    engine.jump_to_index(usize::MAX, 0);

    assert_eq!(engine.current_index(), 1);
    assert!(engine.listener_mut().take().is_empty());
}

#[test]
fn progress_counts_displayable_items() {
    let mut items = words(&["w0", "w1"]);
    items.push(special("s0"));
    items.extend(words(&["w2", "w3", "w4"]));
    items.push(special("s1"));
    items.extend(words(&["w5", "w6", "w7", "w8", "w9"]));
    let mut engine = engine_with_items(items);

    engine.jump_to_index(4, 0);
    let progress = engine.progress();
    assert_eq!(progress.current, 5);
    assert_eq!(progress.total, 12);
    assert_eq!(progress.percent, 41);
    assert_eq!(progress.special_count, 2);
    assert_eq!(progress.remaining_special_count, 1);
}

#[test]
fn remaining_time_estimate_counts_specials_at_dwell() {
    let progress = Progress {
        current: 2,
        total: 12,
        percent: 16,
        special_count: 2,
        remaining_special_count: 1,
    };
    assert_eq!(progress.estimate_remaining_ms(300, 5), 6_800);
}

#[test]
fn context_window_excludes_breaks() {
    let mut engine = engine_with_text("a b\n\nc d e");
    engine.jump_to_index(1, 0);

    let context = engine.context(2);
    let offsets: Vec<isize> = context.entries().iter().map(|entry| entry.offset).collect();
    assert_eq!(offsets, [-1, 0, 1, 2]);
    assert_eq!(context.current_position(), 1);
    assert_eq!(
        context.current().map(|entry| entry.item),
        Some(&ContentItem::word("b"))
    );
    assert_eq!(context.entries()[2].item, &ContentItem::word("c"));
}

#[test]
fn stop_rewinds_and_cancels_everything() {
    let mut items = words(&["a"]);
    items.push(special("img"));
    items.extend(words(&["b"]));
    let mut engine = engine_with_items(items);

    engine.play(0);
    engine.tick(480);
    engine.listener_mut().take();

    engine.stop();
    let events = engine.listener_mut().take();
    assert!(events.contains(&Event::State(false)));
    assert!(events.contains(&Event::SpecialEnd));
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.ease_in_count(), 0);
    assert_eq!(engine.state(), PlaybackState::Paused);
    assert_eq!(engine.word_deadline_ms(), None);
    assert_eq!(engine.countdown_deadline_ms(), None);
}

#[test]
fn loading_text_stops_playback() {
    let mut engine = engine_with_text("some words here");
    engine.play(0);
    engine.tick(480);
    engine.listener_mut().take();

    engine.set_text("fresh content");
    assert!(!engine.is_playing());
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.word_deadline_ms(), None);
    let events = engine.listener_mut().take();
    assert_eq!(events[0], Event::State(false));
    assert_eq!(events[1], Event::Word("fresh".into()));
}

#[test]
fn empty_text_falls_back_to_default() {
    let mut engine = engine_with_text("   ");
    assert_eq!(engine.sequence(), &Sequence::default());
    engine.set_content(Vec::new());
    assert_eq!(engine.current_word(), "Welcome");
}

#[test]
fn set_content_at_jumps_to_anchor() {
    let mut engine = PlaybackEngine::new((), config_250());
    engine.set_content_at(words(&["a", "b", "c"]), 2, 0);
    assert_eq!(engine.current_word(), "c");

    engine.set_content_at(words(&["x", "y"]), 9, 0);
    assert_eq!(engine.current_word(), "x");
}

#[test]
fn wpm_is_clamped_and_leaves_position() {
    let mut engine = engine_with_text("a b c");
    engine.jump_to_index(2, 0);

    assert!(engine.set_wpm(50));
    assert_eq!(engine.wpm(), 100);
    assert!(engine.set_wpm(5_000));
    assert_eq!(engine.wpm(), 1_000);
    assert!(!engine.adjust_wpm(true));
    assert_eq!(engine.current_index(), 2);
}

#[test]
fn persisted_wpm_is_clamped_on_restore() {
    let mut engine = engine_with_text("a b c");
    engine.apply_persisted_settings(PersistedSettings::new(20));
    assert_eq!(engine.wpm(), 100);
    assert_eq!(engine.persisted_settings(), PersistedSettings::new(100));
}

#[test]
fn scripted_input_drives_engine() {
    let mut engine = engine_with_text("a b c d");
    let mut input = MockInput::with_events(&[InputEvent::TogglePlay, InputEvent::Faster]);
    input.push(InputEvent::Faster);

    assert_eq!(engine.process_inputs(&mut input, 0), 3);
    assert_eq!(input.pending(), 0);
    assert!(engine.is_playing());
    assert_eq!(engine.wpm(), 270);

    engine.apply_input_event(InputEvent::TogglePlay, 10);
    assert!(!engine.is_playing());
}

#[test]
fn words_shown_are_counted_for_reporting() {
    let mut engine = engine_with_text("a b c d");
    engine.play(0);
    fire_next(&mut engine);
    fire_next(&mut engine);

    assert_eq!(engine.drain_word_updates(), 2);
    assert_eq!(engine.drain_word_updates(), 0);
}

#[test]
fn idle_input_and_silent_listener_still_play() {
    let mut engine = PlaybackEngine::new((), config_250());
    engine.set_text("one two");
    let mut input = MockInput::new();

    assert_eq!(engine.process_inputs(&mut input, 0), 0);
    engine.play(0);
    assert_eq!(engine.word_deadline_ms(), Some(480));
    assert_eq!(engine.tick(479), TickResult::Idle);
    assert_eq!(engine.tick(480), TickResult::Fired);
    assert_eq!(engine.current_word(), "two");
}

#[test]
fn provider_error_stops_the_drain() {
    let mut engine = engine_with_text("a b c d");
    let mut input = MockInput::with_events(&[InputEvent::TogglePlay, InputEvent::Faster]);
    input.fail_next();

    assert_eq!(engine.process_inputs(&mut input, 0), 0);
    assert_eq!(input.pending(), 2);
    assert!(!engine.is_playing());

    assert_eq!(engine.process_inputs(&mut input, 10), 2);
    assert!(engine.is_playing());
}

#[test]
fn resume_from_held_special_crosses_following_break() {
    let mut items = words(&["a"]);
    items.push(special("fig"));
    items.push(ContentItem::ParagraphBreak);
    items.extend(words(&["b"]));
    let mut engine = engine_with_items(items);

    engine.play(0);
    engine.tick(480);
    engine.tick(1_480);
    engine.pause();
    assert_eq!(engine.state(), PlaybackState::SpecialHeld { remaining: 4 });
    engine.listener_mut().take();

    engine.play(2_000);
    let events = engine.listener_mut().take();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], Event::State(true));
    assert_eq!(events[1], Event::SpecialEnd);
    assert!(matches!(events[2], Event::Progress(progress) if progress.current == 2));
    assert_eq!(events[3], Event::ParagraphBreak);
    assert_eq!(engine.current_index(), 2);
    assert_eq!(engine.word_deadline_ms(), Some(2_500));

    assert_eq!(engine.tick(2_499), TickResult::Idle);
    engine.tick(2_500);
    assert_eq!(engine.current_word(), "b");
    assert!(engine.is_playing());
}

#[test]
fn skip_while_special_held_steps_forward_paused() {
    let mut items = words(&["a"]);
    items.push(special("table"));
    items.extend(words(&["b", "c"]));
    let mut engine = engine_with_items(items);

    engine.play(0);
    engine.tick(480);
    engine.pause();
    engine.listener_mut().take();

    assert!(engine.skip_special_content(600));
    let events = engine.listener_mut().take();
    assert_eq!(events[0], Event::SpecialEnd);
    assert!(events.contains(&Event::Word("b".into())));
    assert!(!events.iter().any(|event| matches!(event, Event::State(_))));

    assert_eq!(engine.current_index(), 2);
    assert_eq!(engine.state(), PlaybackState::Paused);
    assert_eq!(engine.word_deadline_ms(), None);
    assert_eq!(engine.countdown_deadline_ms(), None);
    assert!(!engine.skip_special_content(700));
}

#[test]
fn sentence_jumps_while_playing_restart_ease_in() {
    let mut engine = engine_with_text("One a. Two b. Three c.");
    engine.play(0);
    engine.tick(480);
    engine.tick(880);
    assert_eq!(engine.ease_in_count(), 2);

    engine.next_sentence(1_000);
    assert_eq!(engine.current_index(), 4);
    assert_eq!(engine.ease_in_count(), 0);
    assert_eq!(engine.word_deadline_ms(), Some(1_480));

    engine.tick(1_480);
    assert_eq!(engine.ease_in_count(), 1);

    engine.previous_sentence(1_500);
    assert_eq!(engine.current_index(), 4);
    assert_eq!(engine.ease_in_count(), 0);
    assert_eq!(engine.word_deadline_ms(), Some(1_980));
}

#[test]
fn special_waypoint_clears_rapid_back_tracking() {
    let mut items = words(&["One", "a.", "Two", "b."]);
    items.push(special("fig"));
    items.extend(words(&["Three", "c.", "Four", "d."]));
    let mut engine = engine_with_items(items);
    engine.jump_to_index(5, 0);
    engine.play(0);

    engine.previous_sentence(0);
    assert_eq!(engine.current_index(), 4);
    assert!(engine.state().shows_special());
    assert_eq!(engine.last_back_press_ms, None);
    assert_eq!(engine.last_back_sentence, None);

    engine.previous_sentence(100);
    assert_eq!(engine.current_index(), 2);
    assert_eq!(engine.state(), PlaybackState::Playing);
}

#[test]
fn context_radius_is_capped_by_window_capacity() {
    let text = "w ".repeat(60);
    let mut engine = PlaybackEngine::new(
        Recorder::default(),
        EngineConfig {
            context_radius: 40,
            ..config_250()
        },
    );
    engine.set_text(&text);
    engine.jump_to_index(30, 0);

    assert_eq!(engine.config().context_radius as usize, MAX_CONTEXT_RADIUS);
    let context = engine.context(20);
    assert_eq!(context.len(), MAX_CONTEXT_ITEMS);
    assert_eq!(context.current_position(), MAX_CONTEXT_RADIUS);
}
