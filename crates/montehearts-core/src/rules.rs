//! Pure rules of standard four-player Hearts.

use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::{Play, Trick};

pub const TWO_OF_CLUBS: Card = Card::new(Rank::Two, Suit::Clubs);
pub const QUEEN_OF_SPADES: Card = Card::new(Rank::Queen, Suit::Spades);

/// Total penalty points in a round: thirteen hearts plus the queen.
pub const ROUND_POINTS: u8 = 26;

/// Cards of `hand` that carry points.
pub fn point_cards(hand: Hand) -> Hand {
    let mut points = hand.in_suit(Suit::Hearts);
    if hand.contains(QUEEN_OF_SPADES) {
        points.insert(QUEEN_OF_SPADES);
    }
    points
}

/// The set of cards `hand` may legally play into `trick`.
pub fn legal_plays(hand: Hand, trick: &Trick, hearts_broken: bool, is_first_trick: bool) -> Hand {
    if hand.is_empty() {
        return Hand::EMPTY;
    }

    let Some(lead) = trick.lead_suit() else {
        return legal_leads(hand, hearts_broken, is_first_trick);
    };

    let follow = hand.in_suit(lead);
    if !follow.is_empty() {
        return follow;
    }

    if is_first_trick {
        // No points may be sloughed on the opening trick unless the hand
        // holds nothing else.
        let safe = hand.without(point_cards(hand));
        if !safe.is_empty() {
            return safe;
        }
    }

    hand
}

fn legal_leads(hand: Hand, hearts_broken: bool, is_first_trick: bool) -> Hand {
    if is_first_trick && hand.contains(TWO_OF_CLUBS) {
        return Hand::from_cards(&[TWO_OF_CLUBS]);
    }
    if hearts_broken {
        return hand;
    }
    let non_hearts = hand.without(hand.in_suit(Suit::Hearts));
    if non_hearts.is_empty() { hand } else { non_hearts }
}

/// The play currently winning the trick: highest rank in the lead suit.
pub fn current_winner(trick: &Trick) -> Option<Play> {
    let lead = trick.lead_suit()?;
    trick
        .plays()
        .iter()
        .filter(|play| play.card.suit == lead)
        .max_by_key(|play| play.card.rank)
        .copied()
}

/// Winner of a completed trick.
pub fn trick_winner(trick: &Trick) -> Option<Seat> {
    if !trick.is_complete() {
        return None;
    }
    current_winner(trick).map(|play| play.seat)
}

pub fn hearts_broken_after(prev: bool, card: Card, queen_breaks_hearts: bool) -> bool {
    prev || card.suit == Suit::Hearts || (queen_breaks_hearts && card.is_queen_of_spades())
}

/// Applies the shoot-the-moon transform to final round points.
pub fn moon_adjusted(points: [u8; 4]) -> [u8; 4] {
    match points.iter().position(|&p| p == ROUND_POINTS) {
        Some(shooter) => {
            let mut adjusted = [ROUND_POINTS; 4];
            adjusted[shooter] = 0;
            adjusted
        }
        None => points,
    }
}
