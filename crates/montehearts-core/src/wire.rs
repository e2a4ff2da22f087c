//! Boundary encoding for cards and plays: `(rank, suit)` with ranks
//! 2..=14 and suits 0=Clubs, 1=Diamonds, 2=Spades, 3=Hearts.

use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCard {
    pub rank: u8,
    pub suit: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePlay {
    pub seat: u8,
    pub card: WireCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    BadRank(u8),
    BadSuit(u8),
    BadSeat(u8),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::BadRank(value) => write!(f, "rank {value} is outside 2..=14"),
            WireError::BadSuit(value) => write!(f, "suit {value} is outside 0..=3"),
            WireError::BadSeat(value) => write!(f, "seat {value} is outside 0..=3"),
        }
    }
}

impl std::error::Error for WireError {}

impl From<Card> for WireCard {
    fn from(card: Card) -> Self {
        Self {
            rank: card.rank.value(),
            suit: card.suit as u8,
        }
    }
}

impl TryFrom<WireCard> for Card {
    type Error = WireError;

    fn try_from(wire: WireCard) -> Result<Self, WireError> {
        let rank = Rank::from_value(wire.rank).ok_or(WireError::BadRank(wire.rank))?;
        let suit =
            Suit::from_index(wire.suit as usize).ok_or(WireError::BadSuit(wire.suit))?;
        Ok(Card::new(rank, suit))
    }
}

impl WirePlay {
    pub fn new(seat: Seat, card: Card) -> Self {
        Self {
            seat: seat.index() as u8,
            card: card.into(),
        }
    }

    pub fn decode(self) -> Result<(Seat, Card), WireError> {
        let seat =
            Seat::from_index(self.seat as usize).ok_or(WireError::BadSeat(self.seat))?;
        let card = Card::try_from(self.card)?;
        Ok((seat, card))
    }
}

#[cfg(test)]
mod tests {
    use super::{WireCard, WireError, WirePlay};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;

    #[test]
    fn every_card_round_trips() {
        for index in 0..52 {
            let card = Card::from_index(index).unwrap();
            let wire = WireCard::from(card);
            assert_eq!(Card::try_from(wire), Ok(card));
        }
    }

    #[test]
    fn queen_of_spades_encodes_as_twelve_two() {
        let wire = WireCard::from(Card::new(Rank::Queen, Suit::Spades));
        assert_eq!(wire, WireCard { rank: 12, suit: 2 });
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            Card::try_from(WireCard { rank: 1, suit: 0 }),
            Err(WireError::BadRank(1))
        );
        assert_eq!(
            Card::try_from(WireCard { rank: 10, suit: 4 }),
            Err(WireError::BadSuit(4))
        );
        let play = WirePlay {
            seat: 7,
            card: WireCard { rank: 10, suit: 0 },
        };
        assert_eq!(play.decode(), Err(WireError::BadSeat(7)));
    }

    #[test]
    fn plays_survive_json() {
        let play = WirePlay::new(Seat::East, Card::new(Rank::Ace, Suit::Hearts));
        let json = serde_json::to_string(&play).unwrap();
        let parsed: WirePlay = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.decode(), Ok((Seat::East, Card::new(Rank::Ace, Suit::Hearts))));
    }
}
