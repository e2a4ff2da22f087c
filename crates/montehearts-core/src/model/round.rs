use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use crate::rules;
use std::fmt;

/// A round in progress: four disjoint hands, the trick on the table,
/// completed-trick bookkeeping, and per-seat running points.
#[derive(Debug, Clone)]
pub struct RoundState {
    hands: [Hand; 4],
    current_trick: Trick,
    history: Vec<Trick>,
    tricks_completed: u8,
    points: [u8; 4],
    hearts_broken: bool,
    queen_breaks_hearts: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    TrickCompleted { winner: Seat, points: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    CardNotInHand(Card),
    OutOfTurn { expected: Seat, actual: Seat },
    MustLeadTwoOfClubs,
    MustFollowSuit(Suit),
    HeartsNotBroken,
    NoPointsOnFirstTrick,
    NoLegalPlays(Seat),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::CardNotInHand(card) => write!(f, "{card} is not in hand"),
            PlayError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play but got {actual}")
            }
            PlayError::MustLeadTwoOfClubs => write!(f, "first trick must be led with the 2C"),
            PlayError::MustFollowSuit(suit) => write!(f, "must follow {suit}"),
            PlayError::HeartsNotBroken => write!(f, "hearts have not been broken"),
            PlayError::NoPointsOnFirstTrick => {
                write!(f, "point cards may not be played on the first trick")
            }
            PlayError::NoLegalPlays(seat) => write!(f, "{seat} has no legal play"),
        }
    }
}

impl std::error::Error for PlayError {}

impl RoundState {
    pub fn new(hands: [Hand; 4], leader: Seat, queen_breaks_hearts: bool) -> Self {
        Self {
            hands,
            current_trick: Trick::new(leader),
            history: Vec::new(),
            tricks_completed: 0,
            points: [0; 4],
            hearts_broken: false,
            queen_breaks_hearts,
        }
    }

    /// Rebuilds this state in place for a mid-round position. The trick
    /// history is dropped; the allocation is retained for reuse.
    pub fn reload(
        &mut self,
        hands: [Hand; 4],
        trick: &Trick,
        tricks_completed: u8,
        points: [u8; 4],
        hearts_broken: bool,
    ) {
        self.hands = hands;
        self.current_trick = trick.clone();
        self.history.clear();
        self.tricks_completed = tricks_completed;
        self.points = points;
        self.hearts_broken = hearts_broken;
    }

    pub fn hand(&self, seat: Seat) -> Hand {
        self.hands[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn history(&self) -> &[Trick] {
        &self.history
    }

    pub fn tricks_completed(&self) -> u8 {
        self.tricks_completed
    }

    pub fn points(&self) -> [u8; 4] {
        self.points
    }

    pub fn hearts_broken(&self) -> bool {
        self.hearts_broken
    }

    pub fn queen_breaks_hearts(&self) -> bool {
        self.queen_breaks_hearts
    }

    pub fn is_first_trick(&self) -> bool {
        self.tricks_completed == 0
    }

    /// The round ends once every hand is exhausted.
    pub fn is_over(&self) -> bool {
        self.hands.iter().all(|hand| hand.is_empty())
    }

    pub fn next_to_play(&self) -> Seat {
        self.current_trick.next_seat().unwrap_or(self.current_trick.leader())
    }

    pub fn legal_plays_for(&self, seat: Seat) -> Hand {
        rules::legal_plays(
            self.hands[seat.index()],
            &self.current_trick,
            self.hearts_broken,
            self.is_first_trick(),
        )
    }

    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayOutcome, PlayError> {
        let expected = self.next_to_play();
        if expected != seat {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        let hand = self.hands[seat.index()];
        if !hand.contains(card) {
            return Err(PlayError::CardNotInHand(card));
        }

        let legal = self.legal_plays_for(seat);
        if !legal.contains(card) {
            return Err(self.classify_illegal(hand, card));
        }

        self.hands[seat.index()].remove(card);
        self.hearts_broken =
            rules::hearts_broken_after(self.hearts_broken, card, self.queen_breaks_hearts);
        self.current_trick
            .play(seat, card)
            .expect("turn order already validated");

        if !self.current_trick.is_complete() {
            return Ok(PlayOutcome::Played);
        }

        let winner = rules::trick_winner(&self.current_trick).expect("complete trick has a winner");
        let points = self.current_trick.point_total();
        self.points[winner.index()] += points;
        self.tricks_completed += 1;
        let finished = std::mem::replace(&mut self.current_trick, Trick::new(winner));
        self.history.push(finished);
        Ok(PlayOutcome::TrickCompleted { winner, points })
    }

    fn classify_illegal(&self, hand: Hand, card: Card) -> PlayError {
        match self.current_trick.lead_suit() {
            Some(lead) => {
                if card.suit != lead && !hand.in_suit(lead).is_empty() {
                    PlayError::MustFollowSuit(lead)
                } else {
                    PlayError::NoPointsOnFirstTrick
                }
            }
            None => {
                if self.is_first_trick() && hand.contains(rules::TWO_OF_CLUBS) {
                    PlayError::MustLeadTwoOfClubs
                } else {
                    PlayError::HeartsNotBroken
                }
            }
        }
    }
}
