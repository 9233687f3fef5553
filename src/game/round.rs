//! Round controller - countdown, capture, resolve, cooldown
//!
//! A state-transition function: each `RoundEvent` goes in, a list of
//! `Effect`s comes out. The controller owns no real timers; it asks its
//! caller to schedule or cancel them and receives `TimerFired` back.
//! Timer ids carry the round number so a late timer from an earlier round
//! can never advance the current one.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::ai::{choose_ai_gesture, AiMode};
use super::config::{ConfigError, GameConfig};
use super::score::{determine_outcome, Outcome, ScoreTally};
use crate::classifier::{
    classify_frame, ClassifierConfig, FingerExtensionState, Gesture, Handedness, LandmarkFrame,
};

/// Countdown interval (one tick per second)
pub const TICK_INTERVAL_MS: u32 = 1000;

// ============================================================================
// STATE / EVENTS / EFFECTS
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    #[default]
    Idle,
    CountingDown,
    Resolving,
    Cooldown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Repeating, once per `TICK_INTERVAL_MS`
    Countdown,
    /// One-shot after "go"
    Settle,
    /// One-shot after the outcome
    Cooldown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TimerId {
    pub round: u64,
    pub kind: TimerKind,
}

/// A tracked hand for one video frame
#[derive(Clone, Debug, PartialEq)]
pub struct HandInput {
    pub frame: LandmarkFrame,
    pub handedness: Handedness,
}

/// Inputs to the controller
#[derive(Clone, Debug, PartialEq)]
pub enum RoundEvent {
    /// One processed video frame; `hand` is `None` when nothing was tracked
    Frame { at_ms: f64, hand: Option<HandInput> },
    StartRound { mode: AiMode, at_ms: f64 },
    TimerFired { timer: TimerId },
    ResetScores,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// A round is already counting down, resolving or cooling down
    Busy,
    /// No hand seen within the presence timeout
    NoHand,
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::Busy => "Round already in progress",
            RejectReason::NoHand => "Show your hand to start",
        }
    }
}

/// Everything the UI needs to show a finished round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub round: u64,
    pub mode: AiMode,
    pub player_gesture: Gesture,
    pub ai_gesture: Gesture,
    pub outcome: Outcome,
    pub scores: ScoreTally,
}

/// Notifications for the rendering layer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum UiEvent {
    GestureUpdated {
        gesture: Gesture,
        fingers: Option<FingerExtensionState>,
        handedness: Option<Handedness>,
    },
    HandPresence { present: bool },
    CountdownTick { seconds_remaining: u32 },
    Go,
    RoundOutcome(RoundResult),
    StartRejected { reason: RejectReason },
    StateChanged { state: RoundState },
    ScoresReset { scores: ScoreTally },
}

/// Output of one transition
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Emit(UiEvent),
    ScheduleInterval { timer: TimerId, period_ms: u32 },
    ScheduleOnce { timer: TimerId, delay_ms: u32 },
    Cancel { timer: TimerId },
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct RoundController<R = ChaCha8Rng> {
    config: GameConfig,
    classifier: ClassifierConfig,
    state: RoundState,
    round: u64,
    mode: AiMode,
    countdown: u32,
    /// Overwritten by every frame, read once at resolution
    last_gesture: Gesture,
    last_hand_at_ms: Option<f64>,
    hand_present: bool,
    /// Set once a missing hand has been announced, cleared by the next hand
    hand_loss_reported: bool,
    scores: ScoreTally,
    last_result: Option<RoundResult>,
    rng: R,
}

impl RoundController<ChaCha8Rng> {
    /// Controller with a reproducible AI
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> RoundController<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            classifier: config.classifier(),
            config,
            state: RoundState::Idle,
            round: 0,
            mode: AiMode::Normal,
            countdown: 0,
            last_gesture: Gesture::Unknown,
            last_hand_at_ms: None,
            hand_present: false,
            hand_loss_reported: false,
            scores: ScoreTally::default(),
            last_result: None,
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn scores(&self) -> ScoreTally {
        self.scores
    }

    pub fn last_gesture(&self) -> Gesture {
        self.last_gesture
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.countdown
    }

    pub fn is_hand_present(&self) -> bool {
        self.hand_present
    }

    pub fn current_round(&self) -> u64 {
        self.round
    }

    pub fn last_result(&self) -> Option<RoundResult> {
        self.last_result
    }

    /// Apply one event and return what the caller must do next
    pub fn handle(&mut self, event: RoundEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            RoundEvent::Frame { at_ms, hand } => self.on_frame(at_ms, hand, &mut effects),
            RoundEvent::StartRound { mode, at_ms } => self.on_start(mode, at_ms, &mut effects),
            RoundEvent::TimerFired { timer } => self.on_timer(timer, &mut effects),
            RoundEvent::ResetScores => {
                self.scores.reset();
                effects.push(Effect::Emit(UiEvent::ScoresReset {
                    scores: self.scores,
                }));
            }
        }
        effects
    }

    pub fn start_round(&mut self, mode: AiMode, at_ms: f64) -> Vec<Effect> {
        self.handle(RoundEvent::StartRound { mode, at_ms })
    }

    fn on_frame(&mut self, at_ms: f64, hand: Option<HandInput>, effects: &mut Vec<Effect>) {
        match hand {
            Some(HandInput { frame, handedness }) => {
                self.last_hand_at_ms = Some(at_ms);
                self.hand_loss_reported = false;
                let (gesture, fingers) = classify_frame(&frame, handedness, &self.classifier);
                self.last_gesture = gesture;
                effects.push(Effect::Emit(UiEvent::GestureUpdated {
                    gesture,
                    fingers: Some(fingers),
                    handedness: Some(handedness),
                }));
                self.set_presence(true, effects);
            }
            None => {
                // Brief tracking dropouts keep the last reading
                if !self.hand_loss_reported && self.hand_timed_out(at_ms) {
                    self.hand_loss_reported = true;
                    self.last_gesture = Gesture::Unknown;
                    effects.push(Effect::Emit(UiEvent::GestureUpdated {
                        gesture: Gesture::Unknown,
                        fingers: None,
                        handedness: None,
                    }));
                    self.set_presence(false, effects);
                }
            }
        }
    }

    fn on_start(&mut self, mode: AiMode, at_ms: f64, effects: &mut Vec<Effect>) {
        let rejection = if self.state != RoundState::Idle {
            Some(RejectReason::Busy)
        } else if self.hand_timed_out(at_ms) {
            Some(RejectReason::NoHand)
        } else {
            None
        };

        if let Some(reason) = rejection {
            debug!("start_round({}) rejected: {:?} in {:?}", mode, reason, self.state);
            effects.push(Effect::Emit(UiEvent::StartRejected { reason }));
            return;
        }

        self.round += 1;
        self.mode = mode;
        self.countdown = self.config.countdown_seconds;
        info!("Round {} started in {} mode", self.round, mode);

        self.transition(RoundState::CountingDown, effects);
        effects.push(Effect::Emit(UiEvent::CountdownTick {
            seconds_remaining: self.countdown,
        }));
        effects.push(Effect::ScheduleInterval {
            timer: self.timer(TimerKind::Countdown),
            period_ms: TICK_INTERVAL_MS,
        });
    }

    fn on_timer(&mut self, timer: TimerId, effects: &mut Vec<Effect>) {
        if timer.round != self.round {
            debug!("Ignoring stale {:?} timer from round {}", timer.kind, timer.round);
            return;
        }

        match (timer.kind, self.state) {
            (TimerKind::Countdown, RoundState::CountingDown) if self.countdown > 0 => {
                self.tick(effects);
            }
            (TimerKind::Settle, RoundState::CountingDown) if self.countdown == 0 => {
                self.resolve(effects);
            }
            (TimerKind::Cooldown, RoundState::Cooldown) => {
                self.transition(RoundState::Idle, effects);
            }
            (kind, state) => {
                debug!("Ignoring {:?} timer in {:?}", kind, state);
            }
        }
    }

    fn tick(&mut self, effects: &mut Vec<Effect>) {
        self.countdown -= 1;
        if self.countdown > 0 {
            effects.push(Effect::Emit(UiEvent::CountdownTick {
                seconds_remaining: self.countdown,
            }));
            return;
        }

        // Stop the interval before anything else can fire twice
        effects.push(Effect::Cancel {
            timer: self.timer(TimerKind::Countdown),
        });
        effects.push(Effect::Emit(UiEvent::Go));
        effects.push(Effect::ScheduleOnce {
            timer: self.timer(TimerKind::Settle),
            delay_ms: self.config.settle_delay_ms,
        });
    }

    fn resolve(&mut self, effects: &mut Vec<Effect>) {
        self.transition(RoundState::Resolving, effects);

        let player_gesture = self.last_gesture;
        let ai_gesture = choose_ai_gesture(self.mode, player_gesture, &mut self.rng);
        let outcome = determine_outcome(player_gesture, ai_gesture);
        self.scores.record(outcome);

        let result = RoundResult {
            round: self.round,
            mode: self.mode,
            player_gesture,
            ai_gesture,
            outcome,
            scores: self.scores,
        };
        info!(
            "Round {}: player {} vs AI {} -> {:?}",
            self.round, player_gesture, ai_gesture, outcome
        );
        self.last_result = Some(result);
        effects.push(Effect::Emit(UiEvent::RoundOutcome(result)));

        self.transition(RoundState::Cooldown, effects);
        effects.push(Effect::ScheduleOnce {
            timer: self.timer(TimerKind::Cooldown),
            delay_ms: self.config.cooldown_delay_ms,
        });
    }

    fn transition(&mut self, next: RoundState, effects: &mut Vec<Effect>) {
        if self.state == next {
            return;
        }
        debug!("Round state {:?} -> {:?}", self.state, next);
        self.state = next;
        effects.push(Effect::Emit(UiEvent::StateChanged { state: next }));
    }

    fn set_presence(&mut self, present: bool, effects: &mut Vec<Effect>) {
        if self.hand_present != present {
            self.hand_present = present;
            effects.push(Effect::Emit(UiEvent::HandPresence { present }));
        }
    }

    /// A clock that ran backwards past the last sighting counts as stale
    fn hand_timed_out(&self, now_ms: f64) -> bool {
        match self.last_hand_at_ms {
            Some(seen) => {
                let elapsed = now_ms - seen;
                elapsed < 0.0 || elapsed > f64::from(self.config.hand_presence_timeout_ms)
            }
            None => true,
        }
    }

    fn timer(&self, kind: TimerKind) -> TimerId {
        TimerId {
            round: self.round,
            kind,
        }
    }
}
