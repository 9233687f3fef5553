//! End-to-end rounds driven through a fake clock.
//!
//! The harness plays the role of the browser scheduler: it keeps the
//! timers the controller asks for and fires them in due order.

use gesture_rps::classifier::{
    Gesture, Handedness, LandmarkFrame, LandmarkPoint, INDEX_PIP, INDEX_TIP, LANDMARK_COUNT,
    MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP,
};
use gesture_rps::game::{
    random_move, AiMode, Effect, GameConfig, HandInput, Outcome, RejectReason, RoundController,
    RoundEvent, RoundState, ScoreTally, TimerId, UiEvent,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Upright right hand; flags are thumb, index, middle, ring, pinky
fn right_hand(flags: [bool; 5]) -> HandInput {
    let mut points = [LandmarkPoint::new(0.5, 0.8, 0.0); LANDMARK_COUNT];
    points[THUMB_IP] = LandmarkPoint::new(0.5, 0.6, 0.0);
    points[THUMB_TIP] = LandmarkPoint::new(if flags[0] { 0.3 } else { 0.5 }, 0.6, 0.0);
    let fingers = [
        (INDEX_TIP, INDEX_PIP),
        (MIDDLE_TIP, MIDDLE_PIP),
        (RING_TIP, RING_PIP),
        (PINKY_TIP, PINKY_PIP),
    ];
    for (i, (tip, pip)) in fingers.into_iter().enumerate() {
        points[pip] = LandmarkPoint::new(0.5, 0.5, 0.0);
        points[tip] = LandmarkPoint::new(0.5, if flags[i + 1] { 0.3 } else { 0.6 }, 0.0);
    }
    HandInput {
        frame: LandmarkFrame::from_points(points).unwrap(),
        handedness: Handedness::Right,
    }
}

const ROCK: [bool; 5] = [false; 5];
const PAPER: [bool; 5] = [true; 5];
const SCISSORS: [bool; 5] = [false, true, true, false, false];

struct PendingTimer {
    due_ms: f64,
    timer: TimerId,
    repeat_ms: Option<u32>,
}

struct Harness {
    controller: RoundController,
    now_ms: f64,
    timers: Vec<PendingTimer>,
    events: Vec<(f64, UiEvent)>,
}

impl Harness {
    fn new(seed: u64) -> Self {
        Self::with_config(GameConfig::default(), seed)
    }

    fn with_config(config: GameConfig, seed: u64) -> Self {
        Self {
            controller: RoundController::new(config, seed).unwrap(),
            now_ms: 0.0,
            timers: Vec::new(),
            events: Vec::new(),
        }
    }

    fn send(&mut self, event: RoundEvent) {
        for effect in self.controller.handle(event) {
            match effect {
                Effect::Emit(ev) => self.events.push((self.now_ms, ev)),
                Effect::ScheduleInterval { timer, period_ms } => self.timers.push(PendingTimer {
                    due_ms: self.now_ms + f64::from(period_ms),
                    timer,
                    repeat_ms: Some(period_ms),
                }),
                Effect::ScheduleOnce { timer, delay_ms } => self.timers.push(PendingTimer {
                    due_ms: self.now_ms + f64::from(delay_ms),
                    timer,
                    repeat_ms: None,
                }),
                Effect::Cancel { timer } => self.timers.retain(|t| t.timer != timer),
            }
        }
    }

    fn show(&mut self, flags: [bool; 5]) {
        let at_ms = self.now_ms;
        self.send(RoundEvent::Frame {
            at_ms,
            hand: Some(right_hand(flags)),
        });
    }

    fn start(&mut self, mode: AiMode) {
        let at_ms = self.now_ms;
        self.send(RoundEvent::StartRound { mode, at_ms });
    }

    /// Move the clock forward, firing every timer that falls due on the way
    fn advance(&mut self, ms: f64) {
        let target = self.now_ms + ms;
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due_ms <= target)
                .min_by(|a, b| a.1.due_ms.total_cmp(&b.1.due_ms))
                .map(|(i, _)| i);
            let Some(index) = next else { break };

            let fired = self.timers.remove(index);
            self.now_ms = fired.due_ms;
            if let Some(period) = fired.repeat_ms {
                self.timers.push(PendingTimer {
                    due_ms: fired.due_ms + f64::from(period),
                    ..fired
                });
            }
            self.send(RoundEvent::TimerFired { timer: fired.timer });
        }
        self.now_ms = target;
    }

    fn outcomes(&self) -> Vec<UiEvent> {
        self.events
            .iter()
            .filter(|(_, e)| matches!(e, UiEvent::RoundOutcome(_)))
            .map(|(_, e)| e.clone())
            .collect()
    }
}

/// Smallest seed whose first random move is `wanted`
fn seed_for_first_move(wanted: Gesture) -> u64 {
    (0u64..)
        .find(|&seed| random_move(&mut ChaCha8Rng::seed_from_u64(seed)) == wanted)
        .unwrap()
}

#[test]
fn test_normal_round_rock_vs_random_paper() {
    let mut h = Harness::new(seed_for_first_move(Gesture::Paper));
    h.show(ROCK);
    h.start(AiMode::Normal);
    h.advance(3000.0);
    assert_eq!(h.controller.state(), RoundState::CountingDown);
    h.advance(200.0);

    let result = h.controller.last_result().expect("round resolved");
    assert_eq!(result.player_gesture, Gesture::Rock);
    assert_eq!(result.ai_gesture, Gesture::Paper);
    assert_eq!(result.outcome, Outcome::AiWin);
    assert_eq!(h.controller.scores(), ScoreTally { player: 0, ai: 1, draw: 0 });
    assert_eq!(h.outcomes().len(), 1);
}

#[test]
fn test_evil_round_paper_loses_to_scissors() {
    for seed in 0..5 {
        let mut h = Harness::new(seed);
        h.show(PAPER);
        h.start(AiMode::Evil);
        h.advance(3200.0);

        let result = h.controller.last_result().unwrap();
        assert_eq!(result.ai_gesture, Gesture::Scissors);
        assert_eq!(result.outcome, Outcome::AiWin);
        assert_eq!(h.controller.scores().ai, 1);
    }
}

#[test]
fn test_countdown_ticks_once_per_second_then_go() {
    let config = GameConfig {
        countdown_seconds: 5,
        ..GameConfig::default()
    };
    let mut h = Harness::with_config(config, 3);
    h.show(SCISSORS);
    h.start(AiMode::Normal);
    h.advance(6000.0);

    let mut ticks = Vec::new();
    let mut go_at = None;
    for (at, ev) in &h.events {
        match ev {
            UiEvent::CountdownTick { seconds_remaining } => {
                assert!(go_at.is_none(), "tick after go");
                ticks.push((*at, *seconds_remaining));
            }
            UiEvent::Go => go_at = Some(*at),
            _ => {}
        }
    }
    assert_eq!(
        ticks,
        vec![(0.0, 5), (1000.0, 4), (2000.0, 3), (3000.0, 2), (4000.0, 1)]
    );
    assert_eq!(go_at, Some(5000.0));
    assert_eq!(h.outcomes().len(), 1);
}

#[test]
fn test_gesture_frozen_at_resolution() {
    let mut h = Harness::new(9);
    h.show(ROCK);
    h.start(AiMode::Evil);

    // Changing hands during the countdown and settle still counts
    h.advance(2500.0);
    h.show(SCISSORS);
    h.advance(600.0);
    h.show(PAPER);
    h.advance(100.0);

    let result = h.controller.last_result().unwrap();
    assert_eq!(result.player_gesture, Gesture::Paper);
    assert_eq!(result.ai_gesture, Gesture::Scissors);

    // Frames after resolution don't rewrite the result
    h.show(ROCK);
    h.advance(500.0);
    assert_eq!(h.controller.last_result().unwrap().player_gesture, Gesture::Paper);
    assert_eq!(h.controller.last_gesture(), Gesture::Rock);
    assert_eq!(h.outcomes().len(), 1);
}

#[test]
fn test_second_start_during_round_is_ignored() {
    let mut h = Harness::new(1);
    h.show(PAPER);
    h.start(AiMode::Normal);
    h.advance(500.0);
    h.show(PAPER);
    h.start(AiMode::Evil);

    assert!(h
        .events
        .iter()
        .any(|(_, e)| *e == UiEvent::StartRejected { reason: RejectReason::Busy }));

    h.advance(10_000.0);
    assert_eq!(h.outcomes().len(), 1);
    assert_eq!(h.controller.current_round(), 1);
}

#[test]
fn test_no_restart_until_cooldown_elapses() {
    let mut h = Harness::new(2);
    h.show(ROCK);
    h.start(AiMode::Normal);
    h.advance(3200.0);
    assert_eq!(h.controller.state(), RoundState::Cooldown);

    h.advance(1400.0);
    h.show(ROCK);
    h.start(AiMode::Normal);
    assert_eq!(h.controller.state(), RoundState::Cooldown);
    assert_eq!(h.controller.current_round(), 1);

    h.advance(100.0);
    assert_eq!(h.controller.state(), RoundState::Idle);
    h.start(AiMode::Normal);
    assert_eq!(h.controller.state(), RoundState::CountingDown);
    assert_eq!(h.controller.current_round(), 2);
}

#[test]
fn test_start_rejected_when_hand_left_long_ago() {
    let mut h = Harness::new(4);
    h.show(ROCK);
    h.advance(1500.0);
    h.send(RoundEvent::Frame {
        at_ms: 1500.0,
        hand: None,
    });
    assert_eq!(h.controller.last_gesture(), Gesture::Unknown);

    h.start(AiMode::Evil);
    assert_eq!(h.controller.state(), RoundState::Idle);
    assert!(h
        .events
        .iter()
        .any(|(_, e)| *e == UiEvent::StartRejected { reason: RejectReason::NoHand }));
    assert!(h.timers.is_empty());
}

#[test]
fn test_state_changes_walk_the_full_cycle() {
    let mut h = Harness::new(6);
    h.show(SCISSORS);
    h.start(AiMode::Normal);
    h.advance(5000.0);

    let states: Vec<RoundState> = h
        .events
        .iter()
        .filter_map(|(_, e)| match e {
            UiEvent::StateChanged { state } => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![
            RoundState::CountingDown,
            RoundState::Resolving,
            RoundState::Cooldown,
            RoundState::Idle,
        ]
    );
    assert!(h.timers.is_empty());
}

#[test]
fn test_many_rounds_keep_consistent_tally() {
    let mut h = Harness::new(1234);
    let hands = [ROCK, PAPER, SCISSORS, [true, false, false, false, false]];
    for i in 0..40 {
        h.show(hands[i % hands.len()]);
        h.start(AiMode::Normal);
        h.advance(4800.0);
    }

    let outcomes: Vec<Outcome> = h
        .outcomes()
        .into_iter()
        .map(|e| match e {
            UiEvent::RoundOutcome(r) => r.outcome,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(outcomes.len(), 40);

    let scores = h.controller.scores();
    let count = |o: Outcome| outcomes.iter().filter(|&&x| x == o).count() as u32;
    assert_eq!(scores.player, count(Outcome::PlayerWin));
    assert_eq!(scores.ai, count(Outcome::AiWin));
    assert_eq!(scores.draw, count(Outcome::Draw));
    assert_eq!(count(Outcome::Inconclusive), 10);
}
