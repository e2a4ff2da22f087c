mod config;
mod decision;
mod heuristic;

pub use config::BotConfig;
pub use decision::PlayPlanner;
pub use heuristic::FastPath;

use montehearts_core::belief::{Belief, SamplingError};
use montehearts_core::model::card::Card;
use montehearts_core::model::hand::Hand;
use montehearts_core::model::round::PlayError;
use montehearts_core::model::seat::Seat;
use montehearts_core::model::trick::Trick;
use montehearts_core::rules;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::fmt;
use tracing::{Level, event};

/// The observable slice of the round handed to [`Bot::play_card`].
#[derive(Debug, Clone)]
pub struct TableView {
    pub own_hand: Hand,
    pub trick: Trick,
    pub hearts_broken: bool,
    pub is_first_trick: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BotError {
    NoLegalMoves,
    HandMismatch { expected: Hand, observed: Hand },
    BeliefCorrupt(SamplingError),
    Rollout(PlayError),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::NoLegalMoves => write!(f, "no legal plays for the current position"),
            BotError::HandMismatch { expected, observed } => write!(
                f,
                "hand disagrees with the observation history (tracked [{expected}], given [{observed}])"
            ),
            BotError::BeliefCorrupt(err) => {
                write!(f, "belief state is inconsistent: {err}")
            }
            BotError::Rollout(err) => write!(f, "rollout aborted: {err}"),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BotError::BeliefCorrupt(err) => Some(err),
            BotError::Rollout(err) => Some(err),
            _ => None,
        }
    }
}

/// A single-seat Hearts player: owns its RNG, belief tracker and
/// simulation scratch space. Observations must not be interleaved with
/// an in-flight decision on the same instance.
pub struct Bot {
    seat: Seat,
    config: BotConfig,
    rng: SmallRng,
    belief: Belief,
    planner: PlayPlanner,
    points: [u8; 4],
    current_trick: Trick,
    tricks_completed: u8,
    hearts_broken: bool,
}

impl Bot {
    pub fn new(seat: Seat, config: BotConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            seat,
            config,
            rng,
            belief: Belief::new(seat, Hand::EMPTY, &[]),
            planner: PlayPlanner::new(&config),
            points: [0; 4],
            current_trick: Trick::new(seat),
            tricks_completed: 0,
            hearts_broken: false,
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn belief(&self) -> &Belief {
        &self.belief
    }

    /// Starts a round: `own_hand` is the dealt thirteen, `passed_to`
    /// lists cards this seat knows it handed to specific opponents.
    pub fn init_beliefs(&mut self, own_hand: Hand, passed_to: &[(Seat, Hand)]) {
        self.belief = Belief::new(self.seat, own_hand, passed_to);
        self.points = [0; 4];
        self.tricks_completed = 0;
        self.hearts_broken = false;
        self.current_trick.reset(self.seat);
    }

    /// Feeds one observed play, own plays included.
    pub fn observe_play(&mut self, seat: Seat, card: Card) {
        if self.current_trick.is_empty() {
            self.current_trick.reset(seat);
        }

        let lead = self.current_trick.lead_suit();
        let outcome = self.belief.on_play(seat, card, lead);
        if let Some((void_seat, suit)) = outcome.recovered_void {
            event!(
                target: "montehearts::belief",
                Level::WARN,
                seat = %void_seat,
                suit = %suit,
                card = %card,
                "observed a play from a voided suit; void unset"
            );
        }
        if outcome.own_hand_conflict {
            event!(
                target: "montehearts::belief",
                Level::WARN,
                seat = %seat,
                card = %card,
                "observed a card recorded in own hand; record corrected"
            );
        }

        if self.current_trick.play(seat, card).is_err() {
            event!(
                target: "montehearts::belief",
                Level::WARN,
                seat = %seat,
                card = %card,
                "observation out of turn; restarting the trick mirror"
            );
            self.current_trick.reset(seat);
            let _ = self.current_trick.play(seat, card);
        }

        self.hearts_broken =
            rules::hearts_broken_after(self.hearts_broken, card, self.config.queen_breaks_hearts);

        if self.current_trick.is_complete() {
            if let Some(winner) = rules::trick_winner(&self.current_trick) {
                self.points[winner.index()] += self.current_trick.point_total();
                self.tricks_completed += 1;
                self.current_trick.reset(winner);
            }
        }
    }

    /// Stable hook for drivers; per-play observations already settled
    /// the trick.
    pub fn observe_trick_complete(&mut self, _trick: &Trick) {
        self.belief.on_trick_complete();
    }

    pub fn points(&self) -> [u8; 4] {
        self.points
    }

    /// Chooses a card for the position in `view`.
    pub fn play_card(&mut self, view: &TableView) -> Result<Card, BotError> {
        if view.own_hand != self.belief.own_hand() {
            return Err(BotError::HandMismatch {
                expected: self.belief.own_hand(),
                observed: view.own_hand,
            });
        }

        let legal = rules::legal_plays(
            view.own_hand,
            &view.trick,
            view.hearts_broken,
            view.is_first_trick,
        );
        if legal.is_empty() {
            return Err(BotError::NoLegalMoves);
        }

        let opponents_hold_points = Seat::LOOP
            .iter()
            .any(|seat| *seat != self.seat && self.points[seat.index()] > 0);

        if let Some(card) =
            FastPath::choose(legal, view, opponents_hold_points, self.config.aggressive_moon)
        {
            self.log_decision(legal, card, "fast_path");
            return Ok(card);
        }

        if FastPath::queen_dump_advised(legal, &view.trick) {
            event!(
                target: "montehearts::play",
                Level::DEBUG,
                seat = %self.seat,
                "queen could ride under a higher spade; deferring to evaluation"
            );
        }

        let candidates: Vec<Card> = legal.iter().collect();
        let chosen = self.planner.choose(
            &mut self.rng,
            &mut self.belief,
            view,
            &candidates,
            self.points,
            self.tricks_completed,
        )?;
        self.log_decision(legal, chosen, "monte_carlo");
        Ok(chosen)
    }

    fn log_decision(&self, legal: Hand, chosen: Card, reason: &str) {
        if !tracing::enabled!(Level::DEBUG) {
            return;
        }
        event!(
            target: "montehearts::play",
            Level::DEBUG,
            seat = %self.seat,
            legal_count = legal.len(),
            legal = %legal,
            chosen = %chosen,
            hearts_broken = self.hearts_broken,
            tricks_completed = self.tricks_completed,
            reason,
        );
    }
}
