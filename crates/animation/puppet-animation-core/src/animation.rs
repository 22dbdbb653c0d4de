//! Animation playback state machine.
//!
//! Per-tick time advancement, loop-mode correction, frame-time clamping and
//! wrap-aware code-event dispatch. One `Animation` is the unit the rest of
//! the system schedules, starts, stops and queries; the registry owns them
//! per avatar and drives `tick()` once per simulation step.

use std::str::FromStr;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::data::AnimationChannel;
use crate::error::AnimationError;
use crate::events::CodeEventTable;
use crate::ids::{AvatarId, PartId};
use crate::script::ScriptHost;
use crate::time::{SharedClock, TimeController};

/// Epsilon added past `length` when the scan window straddles the loop seam,
/// so an event placed exactly at `length` still fires before the wrap.
const SEAM_EPSILON: f32 = 0.001;

/// Playback state of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    Stopped,
    Paused,
    Playing,
}

impl PlayState {
    /// Get the name of this play state.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Paused => "paused",
            Self::Playing => "playing",
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

/// Policy applied when the play head reaches an end of `[offset, length]`:
/// repeat, stop, or freeze past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    Loop,
    Once,
    Hold,
}

impl LoopMode {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loop => "loop",
            Self::Once => "once",
            Self::Hold => "hold",
        }
    }
}

impl FromStr for LoopMode {
    type Err = AnimationError;

    /// Case-insensitive parse; unknown names are rejected without side
    /// effects.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("loop") {
            Ok(Self::Loop)
        } else if s.eq_ignore_ascii_case("once") {
            Ok(Self::Once)
        } else if s.eq_ignore_ascii_case("hold") {
            Ok(Self::Hold)
        } else {
            Err(AnimationError::InvalidLoopMode {
                name: s.to_string(),
            })
        }
    }
}

/// Construction-time configuration for an [`Animation`].
///
/// Every field stays mutable after construction through the builder-style
/// setters; this only bundles the load-time values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnimationCfg {
    pub loop_mode: LoopMode,
    pub overrides: bool,
    pub length: f32,
    pub offset: f32,
    pub blend: f32,
    pub start_delay: f32,
    pub loop_delay: f32,
    pub speed: f32,
    pub priority: i32,
}

impl Default for AnimationCfg {
    fn default() -> Self {
        Self {
            loop_mode: LoopMode::Once,
            overrides: false,
            length: 1.0,
            offset: 0.0,
            blend: 1.0,
            start_delay: 0.0,
            loop_delay: 0.0,
            speed: 1.0,
            priority: 0,
        }
    }
}

/// One named timeline of one avatar model.
///
/// Owns the pausable time controller, the keyframe channels keyed by model
/// part, the code-event table and the play-state machine. The transform
/// applier reads `frame_time`/`blend`/`overrides`/`priority` plus the
/// channels; the script host is handed in by the driver on every `tick()`.
#[derive(Debug)]
pub struct Animation {
    avatar: AvatarId,
    model_name: String,
    name: String,
    context: String,

    channels: HashMap<PartId, Vec<AnimationChannel>>,
    code_events: CodeEventTable,

    controller: TimeController,
    play_state: PlayState,
    game_paused: bool,
    time: f32,
    inverted: bool,
    last_frame_time: f32,
    frame_time: f32,

    length: f32,
    offset: f32,
    blend: f32,
    start_delay: f32,
    loop_delay: f32,
    speed: f32,
    priority: i32,
    overrides: bool,
    loop_mode: LoopMode,
}

impl Animation {
    pub fn new(
        avatar: AvatarId,
        model_name: impl Into<String>,
        name: impl Into<String>,
        cfg: AnimationCfg,
        clock: SharedClock,
    ) -> Self {
        let name = name.into();
        let context = format!("animation ({name})");
        Self {
            avatar,
            model_name: model_name.into(),
            name,
            context,
            channels: HashMap::new(),
            code_events: CodeEventTable::new(),
            controller: TimeController::new(clock),
            play_state: PlayState::Stopped,
            game_paused: false,
            time: 0.0,
            inverted: cfg.speed < 0.0,
            last_frame_time: 0.0,
            frame_time: 0.0,
            length: cfg.length,
            offset: cfg.offset,
            blend: cfg.blend,
            start_delay: cfg.start_delay,
            loop_delay: cfg.loop_delay,
            speed: cfg.speed,
            priority: cfg.priority,
            overrides: cfg.overrides,
            loop_mode: cfg.loop_mode,
        }
    }

    // -- registration -- //

    /// Append a channel to `part`'s list. Multiple channels per part are
    /// allowed and all retained; there is no dedup or replace-by-type.
    pub fn add_channel(&mut self, part: PartId, channel: AnimationChannel) -> &mut Self {
        self.channels.entry(part).or_default().push(channel);
        self
    }

    /// Bind `source` to `max(time, 0)` on the timeline. A second call at the
    /// same resolved timestamp overwrites the previous source.
    pub fn add_code(&mut self, time: f32, source: impl Into<String>) -> &mut Self {
        self.code_events.insert(time, source);
        self
    }

    // -- per-step advancement -- //

    /// Advance this animation by one simulation step.
    ///
    /// Called for every animation regardless of play state; a non-running
    /// controller reports a zero delta. Updates `time` and `frame_time`,
    /// applies loop-mode correction, and fires every code event whose
    /// timestamp the play head crossed, wrap-aware.
    pub fn tick(&mut self, host: &mut dyn ScriptHost) {
        let diff = self.controller.tick();
        self.time += diff * self.speed;

        match self.loop_mode {
            LoopMode::Once => {
                if (!self.inverted && self.time >= self.length)
                    || (self.inverted && self.time <= 0.0)
                {
                    self.stop();
                }
            }
            LoopMode::Loop => {
                // Single-step correction: assumes at most one full-length
                // overshoot per tick.
                let span = self.length + self.loop_delay - self.offset;
                if !self.inverted && self.time > self.length + self.loop_delay {
                    self.time -= span;
                } else if self.inverted && self.time < self.offset - self.loop_delay {
                    self.time += span;
                }
            }
            LoopMode::Hold => {}
        }

        self.last_frame_time = self.frame_time;
        self.frame_time = self.time.max(self.offset);

        if self.inverted {
            self.run_code_events(self.frame_time, self.last_frame_time, host);
        } else {
            self.run_code_events(self.last_frame_time, self.frame_time, host);
        }
    }

    /// Scrub the play head to `time` and re-run the full tick logic, so code
    /// events between the previous frame time and the arrival point still
    /// fire. Scrubbing is not exempt from event semantics.
    pub fn set_time(&mut self, time: f32, host: &mut dyn ScriptHost) {
        self.time = time;
        self.tick(host);
    }

    /// Fire code events over `[min_time, max_time)`. A window whose upper
    /// bound sits below its lower bound straddles the loop seam and is split:
    /// the tail of the old cycle first (epsilon-extended so an event at
    /// exactly `length` fires), then the head of the new one.
    fn run_code_events(&self, mut min_time: f32, max_time: f32, host: &mut dyn ScriptHost) {
        if self.code_events.is_empty() {
            return;
        }

        if max_time < min_time {
            let seam = self.length + SEAM_EPSILON;
            self.fire_between(min_time.min(seam), seam, host);
            min_time = self.offset;
        }

        self.fire_between(min_time, max_time, host);
    }

    fn fire_between(&self, min_time: f32, max_time: f32, host: &mut dyn ScriptHost) {
        for (at, source) in self.code_events.iter() {
            // Availability is re-checked per event: a script that poisons the
            // runtime suppresses the remaining events of this tick.
            if at >= min_time && at < max_time && host.has_runtime() && !host.errored() {
                host.run_script(source, &self.context);
            }
        }
    }

    // -- state machine -- //

    /// Start or resume playback. A no-op while already playing; from stopped,
    /// the play head is reinitialized from `offset`/`start_delay` (or
    /// `length`/`start_delay` when inverted) and no code events are
    /// attributed to the transition.
    pub fn play(&mut self) {
        match self.play_state {
            PlayState::Paused => self.controller.resume(),
            PlayState::Stopped => {
                self.controller.init();
                self.time = if self.inverted {
                    self.length + self.start_delay
                } else {
                    self.offset - self.start_delay
                };
                self.last_frame_time = self.time;
                self.frame_time = self.time;
            }
            PlayState::Playing => return,
        }

        self.play_state = PlayState::Playing;
    }

    /// Pause playback. Only meaningful while playing; otherwise a no-op.
    pub fn pause(&mut self) {
        if self.play_state.is_playing() {
            self.controller.pause();
            self.play_state = PlayState::Paused;
        }
    }

    /// Halt playback and reset the time controller. `time` and `frame_time`
    /// keep their values until the next `play()`. Always safe to call.
    pub fn stop(&mut self) {
        self.controller.reset();
        self.play_state = PlayState::Stopped;
    }

    /// Stop, then start from the beginning.
    pub fn restart(&mut self) {
        self.stop();
        self.play();
    }

    /// External game-pause event. Only latches when currently playing, so a
    /// host pause cannot resurrect an animation the user stopped.
    pub fn game_pause(&mut self) {
        if self.play_state.is_playing() {
            self.game_paused = true;
            self.pause();
        }
    }

    /// Counterpart of [`game_pause`](Self::game_pause): resumes only if the
    /// pause was game-driven, and always clears the latch.
    pub fn game_resume(&mut self) {
        let was_game_paused = self.game_paused;
        self.game_paused = false;
        if was_game_paused {
            self.play();
        }
    }

    // -- accessors -- //

    #[inline]
    pub fn avatar(&self) -> AvatarId {
        self.avatar
    }

    #[inline]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw, unbounded play head.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Clamped sampling position: `max(time, offset)`.
    #[inline]
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    #[inline]
    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    #[inline]
    pub fn blend(&self) -> f32 {
        self.blend
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    pub fn start_delay(&self) -> f32 {
        self.start_delay
    }

    #[inline]
    pub fn loop_delay(&self) -> f32 {
        self.loop_delay
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Playback direction, derived once in [`set_speed`](Self::set_speed).
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    #[inline]
    pub fn overrides(&self) -> bool {
        self.overrides
    }

    #[inline]
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    #[inline]
    pub fn channels(&self) -> &HashMap<PartId, Vec<AnimationChannel>> {
        &self.channels
    }

    pub fn channels_for(&self, part: PartId) -> Option<&[AnimationChannel]> {
        self.channels.get(&part).map(Vec::as_slice)
    }

    #[inline]
    pub fn code_events(&self) -> &CodeEventTable {
        &self.code_events
    }

    // -- builder-style configuration (scripting surface) -- //

    pub fn set_blend(&mut self, blend: f32) -> &mut Self {
        self.blend = blend;
        self
    }

    pub fn set_offset(&mut self, offset: f32) -> &mut Self {
        self.offset = offset;
        self
    }

    pub fn set_start_delay(&mut self, delay: f32) -> &mut Self {
        self.start_delay = delay;
        self
    }

    pub fn set_loop_delay(&mut self, delay: f32) -> &mut Self {
        self.loop_delay = delay;
        self
    }

    pub fn set_length(&mut self, length: f32) -> &mut Self {
        self.length = length;
        self
    }

    pub fn set_overrides(&mut self, overrides: bool) -> &mut Self {
        self.overrides = overrides;
        self
    }

    pub fn set_priority(&mut self, priority: i32) -> &mut Self {
        self.priority = priority;
        self
    }

    /// Set playback speed. The sign also derives the playback direction;
    /// nothing else re-derives it.
    pub fn set_speed(&mut self, speed: f32) -> &mut Self {
        self.speed = speed;
        self.inverted = speed < 0.0;
        self
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    /// Set the loop mode from a name, case-insensitive over
    /// {loop, once, hold}. On failure the prior mode is unchanged.
    pub fn set_loop_mode_str(&mut self, name: &str) -> Result<&mut Self, AnimationError> {
        self.loop_mode = name.parse()?;
        Ok(self)
    }
}
