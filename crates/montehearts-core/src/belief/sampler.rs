//! World sampling: determinizes the belief into concrete opponent hands.

use super::Belief;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use rand::Rng;
use std::fmt;

/// A fully determinized deal: the perspective's actual hand plus one
/// consistent assignment of every unseen card to a hidden seat.
#[derive(Debug, Clone)]
pub struct SampledWorld {
    hands: [Hand; 4],
}

impl SampledWorld {
    pub fn hand(&self, seat: Seat) -> Hand {
        self.hands[seat.index()]
    }

    pub fn hands(&self) -> [Hand; 4] {
        self.hands
    }

    /// Builds a world from explicit hands (test positions only).
    #[cfg(test)]
    pub(crate) fn from_hands_for_tests(hands: [Hand; 4]) -> Self {
        Self { hands }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
    RetriesExhausted { attempts: u32 },
    NoFeasibleSeat { card: Card },
    PoolMismatch { unseen: usize, capacity: usize },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::RetriesExhausted { attempts } => {
                write!(f, "no consistent world after {attempts} attempts")
            }
            SamplingError::NoFeasibleSeat { card } => {
                write!(f, "no seat can hold {card}")
            }
            SamplingError::PoolMismatch { unseen, capacity } => {
                write!(f, "{unseen} unseen cards but {capacity} open hand slots")
            }
        }
    }
}

impl std::error::Error for SamplingError {}

/// Draws worlds by weighted assignment without replacement, most
/// constrained cards first. Dead ends restart the draw; once the retry
/// budget is spent a constructive pass assigns forced cards eagerly.
#[derive(Debug, Clone, Copy)]
pub struct WorldSampler {
    max_retries: u32,
}

impl Default for WorldSampler {
    fn default() -> Self {
        Self { max_retries: 32 }
    }
}

impl WorldSampler {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
        }
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        belief: &Belief,
        rng: &mut R,
    ) -> Result<SampledWorld, SamplingError> {
        let order = constrained_order(belief);
        let capacity: usize = hidden_seats(belief)
            .iter()
            .map(|seat| belief.remaining(*seat) as usize)
            .sum();
        if order.len() != capacity {
            return Err(SamplingError::PoolMismatch {
                unseen: order.len(),
                capacity,
            });
        }

        let mut last = SamplingError::RetriesExhausted {
            attempts: self.max_retries,
        };
        for _ in 0..self.max_retries {
            match draw_once(belief, &order, rng) {
                Ok(world) => return Ok(world),
                Err(err) => last = err,
            }
        }

        constructive_draw(belief, rng).map_err(|err| match err {
            SamplingError::NoFeasibleSeat { .. } => err,
            _ => last,
        })
    }
}

fn hidden_seats(belief: &Belief) -> Vec<Seat> {
    Seat::LOOP
        .iter()
        .copied()
        .filter(|seat| *seat != belief.perspective())
        .collect()
}

/// Unseen cards ordered by ascending count of feasible seats, ties broken
/// by card index.
fn constrained_order(belief: &Belief) -> Vec<Card> {
    let mut cards: Vec<Card> = belief.unseen().iter().collect();
    cards.sort_by_key(|card| {
        let feasible = hidden_seats(belief)
            .iter()
            .filter(|seat| belief.prob(*card, **seat) > 0.0)
            .count();
        (feasible, card.to_index())
    });
    cards
}

fn draw_once<R: Rng + ?Sized>(
    belief: &Belief,
    order: &[Card],
    rng: &mut R,
) -> Result<SampledWorld, SamplingError> {
    let mut hands = [Hand::EMPTY; 4];
    let mut counts = [0u8; 4];
    hands[belief.perspective().index()] = belief.own_hand();

    for &card in order {
        let seat = pick_seat(belief, card, &counts, rng)
            .ok_or(SamplingError::NoFeasibleSeat { card })?;
        hands[seat.index()].insert(card);
        counts[seat.index()] += 1;
    }

    Ok(SampledWorld { hands })
}

/// Rejection-free fallback: assign forced cards first, then always the
/// card with the smallest feasible seat set.
fn constructive_draw<R: Rng + ?Sized>(
    belief: &Belief,
    rng: &mut R,
) -> Result<SampledWorld, SamplingError> {
    let mut hands = [Hand::EMPTY; 4];
    let mut counts = [0u8; 4];
    hands[belief.perspective().index()] = belief.own_hand();

    let mut pending: Vec<Card> = belief.unseen().iter().collect();
    while !pending.is_empty() {
        let mut chosen = 0usize;
        let mut fewest = usize::MAX;
        for (position, card) in pending.iter().enumerate() {
            let feasible = hidden_seats(belief)
                .iter()
                .filter(|seat| {
                    belief.prob(*card, **seat) > 0.0
                        && counts[seat.index()] < belief.remaining(**seat)
                })
                .count();
            if feasible == 0 {
                return Err(SamplingError::NoFeasibleSeat { card: *card });
            }
            if feasible < fewest {
                fewest = feasible;
                chosen = position;
                if feasible == 1 {
                    break;
                }
            }
        }

        let card = pending.swap_remove(chosen);
        let seat = pick_seat(belief, card, &counts, rng)
            .ok_or(SamplingError::NoFeasibleSeat { card })?;
        hands[seat.index()].insert(card);
        counts[seat.index()] += 1;
    }

    Ok(SampledWorld { hands })
}

fn pick_seat<R: Rng + ?Sized>(
    belief: &Belief,
    card: Card,
    counts: &[u8; 4],
    rng: &mut R,
) -> Option<Seat> {
    let mut feasible = [None; 3];
    let mut weights = [0.0_f64; 3];
    let mut total = 0.0_f64;
    let mut len = 0usize;

    for seat in Seat::LOOP {
        if seat == belief.perspective() {
            continue;
        }
        let weight = belief.prob(card, seat);
        if weight > 0.0 && counts[seat.index()] < belief.remaining(seat) {
            feasible[len] = Some(seat);
            weights[len] = weight;
            total += weight;
            len += 1;
        }
    }

    if len == 0 || total <= 0.0 {
        return None;
    }

    let mut choice = rng.gen_range(0.0..total);
    for slot in 0..len {
        if choice <= weights[slot] {
            return feasible[slot];
        }
        choice -= weights[slot];
    }
    feasible[len - 1]
}

#[cfg(test)]
mod tests {
    use super::{SamplingError, WorldSampler};
    use crate::belief::Belief;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn own_hand() -> Hand {
        Hand::FULL_DECK.in_suit(Suit::Clubs)
    }

    fn hidden_seats() -> [Seat; 3] {
        [Seat::East, Seat::South, Seat::West]
    }

    #[test]
    fn sampled_world_partitions_the_unseen_cards() {
        let belief = Belief::new(Seat::North, own_hand(), &[]);
        let sampler = WorldSampler::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let world = sampler.sample(&belief, &mut rng).unwrap();

        assert_eq!(world.hand(Seat::North), own_hand());
        let mut union = world.hand(Seat::North);
        for seat in hidden_seats() {
            assert_eq!(world.hand(seat).len(), belief.remaining(seat) as usize);
            assert!(union.is_disjoint(world.hand(seat)));
            union = union.union(world.hand(seat));
        }
        assert_eq!(union, Hand::FULL_DECK);
    }

    #[test]
    fn voids_are_respected_in_every_draw() {
        let mut belief = Belief::new(Seat::North, own_hand(), &[]);
        // East proves void in hearts.
        belief.on_play(Seat::East, Card::new(Rank::Nine, Suit::Diamonds), Some(Suit::Hearts));
        let sampler = WorldSampler::default();
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..32 {
            let world = sampler.sample(&belief, &mut rng).unwrap();
            assert!(world.hand(Seat::East).in_suit(Suit::Hearts).is_empty());
        }
    }

    #[test]
    fn known_passes_always_land_on_their_seat() {
        let queen = Card::new(Rank::Queen, Suit::Spades);
        let belief = Belief::new(
            Seat::North,
            own_hand(),
            &[(Seat::South, Hand::from_cards(&[queen]))],
        );
        let sampler = WorldSampler::default();
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..16 {
            let world = sampler.sample(&belief, &mut rng).unwrap();
            assert!(world.hand(Seat::South).contains(queen));
        }
    }

    #[test]
    fn draws_are_deterministic_under_a_seed() {
        let belief = Belief::new(Seat::North, own_hand(), &[]);
        let sampler = WorldSampler::default();

        let mut rng_a = SmallRng::seed_from_u64(99);
        let mut rng_b = SmallRng::seed_from_u64(99);
        let world_a = sampler.sample(&belief, &mut rng_a).unwrap();
        let world_b = sampler.sample(&belief, &mut rng_b).unwrap();
        for seat in Seat::LOOP {
            assert_eq!(world_a.hand(seat), world_b.hand(seat));
        }
    }

    #[test]
    fn doubly_voided_suit_is_forced_onto_the_last_seat() {
        let mut belief = Belief::new(Seat::North, own_hand(), &[]);
        belief.on_play(Seat::East, Card::new(Rank::Two, Suit::Diamonds), Some(Suit::Spades));
        belief.on_play(Seat::West, Card::new(Rank::Three, Suit::Diamonds), Some(Suit::Spades));
        let sampler = WorldSampler::default();
        let mut rng = SmallRng::seed_from_u64(21);

        for _ in 0..16 {
            let world = sampler.sample(&belief, &mut rng).unwrap();
            let spades = belief.unseen().in_suit(Suit::Spades);
            assert_eq!(world.hand(Seat::South).in_suit(Suit::Spades), spades);
        }
    }

    #[test]
    fn inconsistent_pool_is_reported() {
        // An empty own hand leaves 52 unseen cards against 39 slots.
        let belief = Belief::new(Seat::North, Hand::EMPTY, &[]);
        let sampler = WorldSampler::default();
        let mut rng = SmallRng::seed_from_u64(5);
        assert!(matches!(
            sampler.sample(&belief, &mut rng),
            Err(SamplingError::PoolMismatch { .. })
        ));
    }
}
