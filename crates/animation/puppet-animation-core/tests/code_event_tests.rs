use std::sync::Arc;

use puppet_animation_core::{
    Animation, AnimationCfg, AvatarId, LoopMode, ManualClock, ScriptHost, SharedClock,
};

/// Script host that records every firing, with switchable availability and an
/// optional self-poisoning mode (the first run flips the error state, like a
/// script that crashes its own runtime).
struct RecordingHost {
    runs: Vec<(String, String)>,
    has_runtime: bool,
    errored: bool,
    poison_on_run: bool,
}

impl RecordingHost {
    fn new() -> Self {
        Self {
            runs: Vec::new(),
            has_runtime: true,
            errored: false,
            poison_on_run: false,
        }
    }

    fn sources(&self) -> Vec<&str> {
        self.runs.iter().map(|(source, _)| source.as_str()).collect()
    }
}

impl ScriptHost for RecordingHost {
    fn has_runtime(&self) -> bool {
        self.has_runtime
    }

    fn errored(&self) -> bool {
        self.errored
    }

    fn run_script(&mut self, source: &str, context: &str) {
        self.runs.push((source.to_string(), context.to_string()));
        if self.poison_on_run {
            self.errored = true;
        }
    }
}

fn mk_looping(length: f32, clock: &Arc<ManualClock>) -> Animation {
    let clock: SharedClock = clock.clone();
    Animation::new(
        AvatarId::random(),
        "player",
        "anim",
        AnimationCfg {
            loop_mode: LoopMode::Loop,
            length,
            ..Default::default()
        },
        clock,
    )
}

/// it should fire a crossed event exactly once per loop traversal even when
/// the step size never lands on the event timestamp
#[test]
fn exactly_once_per_traversal_with_misaligned_steps() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = mk_looping(1.0, &clock);
    anim.add_code(0.33, "beat");

    anim.play();
    // 10 ticks of 0.4s = 4.0s = exactly four traversals of the 1s loop.
    for _ in 0..10 {
        clock.advance(0.4);
        anim.tick(&mut host);
    }

    assert_eq!(host.runs.len(), 4);
}

/// it should fire the event inside a wrapped window in the same tick that
/// completes the wrap
#[test]
fn wrapped_window_fires_in_the_wrapping_tick() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = mk_looping(10.0, &clock);
    anim.add_code(0.2, "wrapped");

    anim.play();
    // Scrub forward: the traversed window [0, 9.5) crosses 0.2 once.
    anim.set_time(9.5, &mut host);
    assert_eq!(host.sources(), vec!["wrapped"]);
    host.runs.clear();

    // 9.5 -> 10.5 in one tick: wraps to 0.5 and must fire 0.2 immediately.
    clock.advance(1.0);
    anim.tick(&mut host);
    assert_eq!(host.sources(), vec!["wrapped"]);
    assert!((anim.time() - 0.5).abs() < 1e-5);
}

/// it should fire an event placed exactly at the length before the wrap
#[test]
fn event_at_length_fires_via_the_seam_epsilon() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = mk_looping(1.0, &clock);

    anim.play();
    anim.set_time(0.9, &mut host);
    anim.add_code(1.0, "seam");

    clock.advance(0.2);
    anim.tick(&mut host);
    assert_eq!(host.sources(), vec!["seam"]);
}

/// it should visit the same timestamps in decreasing order under inverted
/// playback
#[test]
fn inverted_playback_fires_in_decreasing_order() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = Animation::new(
        AvatarId::random(),
        "player",
        "anim",
        AnimationCfg {
            loop_mode: LoopMode::Loop,
            length: 4.0,
            speed: -1.0,
            ..Default::default()
        },
        Arc::<ManualClock>::clone(&clock),
    );
    anim.add_code(1.0, "a");
    anim.add_code(3.0, "b");

    anim.play();
    assert!((anim.time() - 4.0).abs() < 1e-6);

    for _ in 0..5 {
        clock.advance(1.0);
        anim.tick(&mut host);
    }

    // 4 -> 3 crosses b; 2 -> 1 crosses a; the backward wrap 0 -> 4 -> 3
    // crosses b again. Same set per cycle as forward playback, reversed.
    assert_eq!(host.sources(), vec!["b", "a", "b"]);
}

/// it should match the literal five-tick trace: the event at 1.5 fires on
/// tick 2 only, and the wrapping tick 5 does not reach it
#[test]
fn five_tick_wrap_scenario_fires_on_tick_two_only() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = mk_looping(4.0, &clock);
    anim.add_code(1.5, "mark");

    anim.play();
    let mut fires_per_tick = Vec::new();
    for _ in 0..5 {
        let before = host.runs.len();
        clock.advance(1.0);
        anim.tick(&mut host);
        fires_per_tick.push(host.runs.len() - before);
    }

    assert_eq!(fires_per_tick, vec![0, 1, 0, 0, 0]);
    // Tick 5 wrapped 4 -> 1.
    assert!((anim.time() - 1.0).abs() < 1e-5);
}

/// it should honor the loop delay before wrapping
#[test]
fn loop_delay_postpones_the_wrap() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = Animation::new(
        AvatarId::random(),
        "player",
        "anim",
        AnimationCfg {
            loop_mode: LoopMode::Loop,
            length: 1.0,
            loop_delay: 0.5,
            ..Default::default()
        },
        Arc::<ManualClock>::clone(&clock),
    );

    anim.play();
    clock.advance(1.2);
    anim.tick(&mut host);
    // Inside the delay window: no wrap yet.
    assert!((anim.time() - 1.2).abs() < 1e-5);

    clock.advance(0.5);
    anim.tick(&mut host);
    // 1.7 > length + loop_delay, so time -= (length + loop_delay - offset).
    assert!((anim.time() - 0.2).abs() < 1e-5);
}

/// it should skip firing while the avatar has no script runtime
#[test]
fn missing_runtime_suppresses_firing() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    host.has_runtime = false;

    let mut anim = mk_looping(4.0, &clock);
    anim.add_code(0.5, "never");
    anim.play();
    clock.advance(1.0);
    anim.tick(&mut host);

    assert!(host.runs.is_empty());
}

/// it should skip firing while the runtime is in a persistent error state
#[test]
fn errored_runtime_suppresses_firing() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    host.errored = true;

    let mut anim = mk_looping(4.0, &clock);
    anim.add_code(0.5, "never");
    anim.play();
    clock.advance(1.0);
    anim.tick(&mut host);

    assert!(host.runs.is_empty());
}

/// it should stop firing mid-tick once a script poisons the runtime
#[test]
fn poisoned_runtime_suppresses_the_rest_of_the_tick() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    host.poison_on_run = true;

    let mut anim = mk_looping(4.0, &clock);
    anim.add_code(0.2, "first");
    anim.add_code(0.4, "second");
    anim.play();
    clock.advance(1.0);
    anim.tick(&mut host);

    assert_eq!(host.sources(), vec!["first"]);
}

/// it should overwrite the payload on a repeated timestamp (last write wins)
#[test]
fn repeated_timestamp_keeps_the_last_payload() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = mk_looping(4.0, &clock);
    anim.add_code(1.0, "first");
    anim.add_code(1.0, "second");
    assert_eq!(anim.code_events().len(), 1);

    anim.play();
    clock.advance(2.0);
    anim.tick(&mut host);
    assert_eq!(host.sources(), vec!["second"]);
}

/// it should clamp negative timestamps to zero at insertion
#[test]
fn negative_timestamps_clamp_to_zero() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = mk_looping(4.0, &clock);
    anim.add_code(-2.0, "origin");

    anim.play();
    clock.advance(0.5);
    // The first window is [0, 0.5), which contains the clamped timestamp.
    anim.tick(&mut host);
    assert_eq!(host.sources(), vec!["origin"]);
}

/// it should fire crossings for a direct scrub exactly like a tick
#[test]
fn set_time_scrub_fires_crossed_events() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = Animation::new(
        AvatarId::random(),
        "player",
        "anim",
        AnimationCfg {
            loop_mode: LoopMode::Hold,
            length: 10.0,
            ..Default::default()
        },
        Arc::<ManualClock>::clone(&clock),
    );
    anim.add_code(1.5, "scrubbed");

    // Never played: scrubbing still crosses [0, 2).
    anim.set_time(2.0, &mut host);
    assert_eq!(host.sources(), vec!["scrubbed"]);
}

/// it should label firings with the animation context
#[test]
fn firings_carry_the_animation_context_label() {
    let clock = Arc::new(ManualClock::new());
    let mut host = RecordingHost::new();
    let mut anim = Animation::new(
        AvatarId::random(),
        "player",
        "walk",
        AnimationCfg {
            loop_mode: LoopMode::Loop,
            length: 4.0,
            ..Default::default()
        },
        Arc::<ManualClock>::clone(&clock),
    );
    anim.add_code(0.5, "step");

    anim.play();
    clock.advance(1.0);
    anim.tick(&mut host);

    assert_eq!(host.runs[0].1, "animation (walk)");
}
