//! Ownership distribution over unseen cards and its observation updates.

use super::reconcile;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::suit::Suit;

/// Bit-mask describing which suits are proven void for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SuitMask(u8);

impl SuitMask {
    pub const EMPTY: Self = Self(0);

    pub const fn contains(self, suit: Suit) -> bool {
        self.0 & (1 << suit as u8) != 0
    }

    pub const fn with(self, suit: Suit) -> Self {
        Self(self.0 | (1 << suit as u8))
    }

    pub const fn without(self, suit: Suit) -> Self {
        Self(self.0 & !(1 << suit as u8))
    }
}

/// What an observation update had to do beyond the ordinary bookkeeping.
/// A non-clean outcome means the observation contradicted the model and
/// the model was corrected in the observation's favour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObservationOutcome {
    pub recovered_void: Option<(Seat, Suit)>,
    pub own_hand_conflict: bool,
}

impl ObservationOutcome {
    pub fn is_clean(&self) -> bool {
        self.recovered_void.is_none() && !self.own_hand_conflict
    }
}

/// Per-card ownership probabilities over the three hidden seats.
///
/// Invariants, re-established after every mutation:
/// - each unseen card's mass sums to 1 across the hidden seats;
/// - each hidden seat's total mass equals its remaining hand size;
/// - cells for `(seat, suit)` pairs with a proven void are zero.
#[derive(Debug, Clone)]
pub struct Belief {
    perspective: Seat,
    probs: [[f64; 52]; 4],
    voids: [SuitMask; 4],
    remaining: [u8; 4],
    own: Hand,
    seen: Hand,
    pinned: [Hand; 4],
}

impl Belief {
    /// Builds the round-start belief from the bot's dealt hand and any
    /// cards it knows it passed to specific opponents.
    pub fn new(perspective: Seat, own: Hand, passed_to: &[(Seat, Hand)]) -> Self {
        let mut pinned = [Hand::EMPTY; 4];
        for &(seat, cards) in passed_to {
            if seat != perspective {
                pinned[seat.index()] = pinned[seat.index()].union(cards);
            }
        }

        let mut belief = Self {
            perspective,
            probs: [[0.0; 52]; 4],
            voids: [SuitMask::EMPTY; 4],
            remaining: [13; 4],
            own: Hand::EMPTY,
            seen: Hand::EMPTY,
            pinned,
        };
        belief.remaining[perspective.index()] = own.len() as u8;
        belief.own = own;
        belief.reset_distribution();
        belief
    }

    pub fn perspective(&self) -> Seat {
        self.perspective
    }

    pub fn own_hand(&self) -> Hand {
        self.own
    }

    /// Cards whose location is hidden from the perspective seat.
    pub fn unseen(&self) -> Hand {
        self.seen.union(self.own).complement()
    }

    pub fn prob(&self, card: Card, seat: Seat) -> f64 {
        self.probs[seat.index()][card.to_index() as usize]
    }

    pub fn remaining(&self, seat: Seat) -> u8 {
        self.remaining[seat.index()]
    }

    pub fn is_void(&self, seat: Seat, suit: Suit) -> bool {
        self.voids[seat.index()].contains(suit)
    }

    pub fn void_mask(&self, seat: Seat) -> SuitMask {
        self.voids[seat.index()]
    }

    /// Applies an observed play. `lead_suit` is the suit led in the trick
    /// the play belongs to, or `None` when `seat` itself led.
    pub fn on_play(&mut self, seat: Seat, card: Card, lead_suit: Option<Suit>) -> ObservationOutcome {
        let mut outcome = ObservationOutcome::default();

        if seat == self.perspective {
            if self.own.remove(card) {
                self.remaining[seat.index()] -= 1;
            }
            self.seen.insert(card);
            self.zero_card(card);
            return outcome;
        }

        if self.voids[seat.index()].contains(card.suit) {
            // The observation wins over the inferred void.
            self.voids[seat.index()] = self.voids[seat.index()].without(card.suit);
            self.restore_suit_feasibility(seat, card.suit);
            outcome.recovered_void = Some((seat, card.suit));
        }

        // When the card was (wrongly) recorded in our own hand it never sat
        // in the unseen pool, so the playing seat's pool quota is unchanged.
        let mut spent_from_pool = true;
        if self.own.contains(card) {
            self.own.remove(card);
            self.remaining[self.perspective.index()] =
                self.remaining[self.perspective.index()].saturating_sub(1);
            outcome.own_hand_conflict = true;
            spent_from_pool = false;
        }

        self.seen.insert(card);
        self.pinned[seat.index()].remove(card);
        self.zero_card(card);
        if spent_from_pool {
            self.remaining[seat.index()] = self.remaining[seat.index()].saturating_sub(1);
        }

        if let Some(lead) = lead_suit {
            if lead != card.suit {
                self.mark_void(seat, lead);
            }
        }

        self.reconcile();
        outcome
    }

    /// Stable hook for drivers; the per-play updates already did the work.
    pub fn on_trick_complete(&mut self) {}

    /// Drops every inferred constraint, keeping only what has been seen,
    /// what the perspective holds, and the known passes. Last-resort
    /// recovery when sampling reports an infeasible state.
    pub fn relax_to_hard_constraints(&mut self) {
        self.voids = [SuitMask::EMPTY; 4];
        self.reset_distribution();
    }

    fn reset_distribution(&mut self) {
        self.probs = [[0.0; 52]; 4];

        for card in self.own.iter() {
            self.probs[self.perspective.index()][card.to_index() as usize] = 1.0;
        }

        let hidden_total: u8 = Seat::LOOP
            .iter()
            .filter(|seat| **seat != self.perspective)
            .map(|seat| self.remaining[seat.index()])
            .sum();

        for card in self.unseen().iter() {
            let index = card.to_index() as usize;
            if let Some(owner) = self.pin_owner(card) {
                self.probs[owner.index()][index] = 1.0;
                continue;
            }
            for seat in Seat::LOOP {
                if seat == self.perspective {
                    continue;
                }
                if self.voids[seat.index()].contains(card.suit) {
                    continue;
                }
                if hidden_total > 0 {
                    self.probs[seat.index()][index] =
                        self.remaining[seat.index()] as f64 / hidden_total as f64;
                }
            }
            reconcile::normalize_card(&mut self.probs, self.perspective, card);
        }

        self.reconcile();
    }

    fn pin_owner(&self, card: Card) -> Option<Seat> {
        Seat::LOOP
            .iter()
            .copied()
            .find(|seat| self.pinned[seat.index()].contains(card))
    }

    fn zero_card(&mut self, card: Card) {
        let index = card.to_index() as usize;
        for seat in Seat::LOOP {
            self.probs[seat.index()][index] = 0.0;
        }
    }

    fn mark_void(&mut self, seat: Seat, suit: Suit) {
        if self.voids[seat.index()].contains(suit) {
            return;
        }
        self.voids[seat.index()] = self.voids[seat.index()].with(suit);
        for card in self.unseen().in_suit(suit).iter() {
            if self.pinned[seat.index()].contains(card) {
                // A known pass outweighs the inference; leave it pinned.
                continue;
            }
            self.probs[seat.index()][card.to_index() as usize] = 0.0;
        }
    }

    fn restore_suit_feasibility(&mut self, seat: Seat, suit: Suit) {
        for card in self.unseen().in_suit(suit).iter() {
            let index = card.to_index() as usize;
            if self.pin_owner(card).is_some() {
                continue;
            }
            if self.probs[seat.index()][index] == 0.0 {
                self.probs[seat.index()][index] = 1.0 / 3.0;
                reconcile::normalize_card(&mut self.probs, self.perspective, card);
            }
        }
    }

    fn reconcile(&mut self) {
        let unseen = self.unseen();
        reconcile::fit(&mut self.probs, self.perspective, unseen, &self.remaining);
    }
}
