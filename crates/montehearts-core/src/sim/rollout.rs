use super::RolloutPolicy;
use crate::belief::SampledWorld;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::round::{PlayError, RoundState};
use crate::model::seat::Seat;
use crate::model::trick::Trick;
use crate::rules;

/// The mid-round position a rollout resumes from.
#[derive(Debug, Clone, Copy)]
pub struct RolloutStart<'a> {
    pub world: &'a SampledWorld,
    pub trick: &'a Trick,
    pub tricks_completed: u8,
    pub points: [u8; 4],
    pub hearts_broken: bool,
}

/// Plays determinized worlds to completion. Owns a scratch round state
/// that is reloaded between samples, so the inner loop allocates nothing.
#[derive(Debug)]
pub struct Simulator {
    scratch: RoundState,
}

impl Simulator {
    pub fn new(queen_breaks_hearts: bool) -> Self {
        Self {
            scratch: RoundState::new([Hand::EMPTY; 4], Seat::North, queen_breaks_hearts),
        }
    }

    /// Plays `candidate` for `seat`, hands every later turn to the
    /// rollout policy, and returns moon-adjusted per-seat round points.
    pub fn run(
        &mut self,
        start: &RolloutStart<'_>,
        seat: Seat,
        candidate: Card,
    ) -> Result<[u8; 4], PlayError> {
        self.scratch.reload(
            start.world.hands(),
            start.trick,
            start.tricks_completed,
            start.points,
            start.hearts_broken,
        );

        self.scratch.play_card(seat, candidate)?;

        while !self.scratch.is_over() {
            let turn = self.scratch.next_to_play();
            let card = RolloutPolicy::choose(&self.scratch, turn)
                .ok_or(PlayError::NoLegalPlays(turn))?;
            self.scratch.play_card(turn, card)?;
        }

        Ok(rules::moon_adjusted(self.scratch.points()))
    }
}
