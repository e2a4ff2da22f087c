use super::{BotConfig, BotError, TableView};
use montehearts_core::belief::{Belief, SampledWorld, WorldSampler};
use montehearts_core::model::card::Card;
use montehearts_core::sim::{RolloutStart, Simulator};
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{Level, event};

/// Expected-point minimization over sampled worlds.
pub struct PlayPlanner {
    n_samples: u32,
    deadline: Option<Duration>,
    sampler: WorldSampler,
    simulator: Simulator,
}

impl PlayPlanner {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            n_samples: config.n_samples.max(1),
            deadline: config.deadline_ms.map(Duration::from_millis),
            sampler: WorldSampler::new(config.max_retries),
            simulator: Simulator::new(config.queen_breaks_hearts),
        }
    }

    /// Averages the bot's moon-adjusted round points over sampled worlds
    /// for every candidate and returns the minimizer. Sampling rounds are
    /// interleaved across candidates so that a deadline expiry still
    /// leaves each candidate with at least one completed rollout.
    pub fn choose<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        belief: &mut Belief,
        view: &TableView,
        candidates: &[Card],
        points: [u8; 4],
        tricks_completed: u8,
    ) -> Result<Card, BotError> {
        let seat = belief.perspective();
        let per_candidate = (self.n_samples / candidates.len() as u32).max(1);
        let mut totals = vec![0u32; candidates.len()];
        let mut samples = vec![0u32; candidates.len()];
        let started = Instant::now();

        'sampling: for pass in 0..per_candidate {
            for (slot, &candidate) in candidates.iter().enumerate() {
                if pass > 0
                    && self
                        .deadline
                        .is_some_and(|budget| started.elapsed() >= budget)
                {
                    event!(
                        target: "montehearts::play",
                        Level::DEBUG,
                        completed_passes = pass,
                        budgeted_passes = per_candidate,
                        "deadline reached; returning the best move so far"
                    );
                    break 'sampling;
                }

                let world = self.sample_world(rng, belief)?;
                let start = RolloutStart {
                    world: &world,
                    trick: &view.trick,
                    tricks_completed,
                    points,
                    hearts_broken: view.hearts_broken,
                };
                let outcome = self
                    .simulator
                    .run(&start, seat, candidate)
                    .map_err(BotError::Rollout)?;
                totals[slot] += outcome[seat.index()] as u32;
                samples[slot] += 1;
            }
        }

        let mut best: Option<(Card, f64)> = None;
        for (slot, &candidate) in candidates.iter().enumerate() {
            if samples[slot] == 0 {
                continue;
            }
            let mean = totals[slot] as f64 / samples[slot] as f64;
            let better = match best {
                None => true,
                Some((incumbent, score)) => {
                    mean < score || (mean == score && rank_order(candidate) < rank_order(incumbent))
                }
            };
            if better {
                best = Some((candidate, mean));
            }
        }

        best.map(|(candidate, _)| candidate)
            .ok_or(BotError::NoLegalMoves)
    }

    /// One retry ladder per draw: the sampler's own restarts and
    /// constructive fallback, then a relaxation to hard constraints. A
    /// failure after relaxation means the belief state is corrupt.
    fn sample_world<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        belief: &mut Belief,
    ) -> Result<SampledWorld, BotError> {
        match self.sampler.sample(belief, rng) {
            Ok(world) => Ok(world),
            Err(first) => {
                event!(
                    target: "montehearts::belief",
                    Level::WARN,
                    error = %first,
                    "world sampling failed; relaxing to hard constraints"
                );
                belief.relax_to_hard_constraints();
                self.sampler
                    .sample(belief, rng)
                    .map_err(|_| BotError::BeliefCorrupt(first))
            }
        }
    }
}

/// Tie-break ordering: lower rank first, then Clubs < Diamonds < Spades
/// < Hearts.
fn rank_order(card: Card) -> (u8, u8) {
    (card.rank.value(), card.suit as u8)
}
