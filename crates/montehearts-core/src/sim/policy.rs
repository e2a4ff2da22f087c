use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::round::RoundState;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::rules;

/// The fixed opponent policy used inside rollouts. It is part of the
/// simulator's contract: rollouts must be reproducible move-for-move,
/// so every choice below is deterministic.
pub struct RolloutPolicy;

impl RolloutPolicy {
    pub fn choose(round: &RoundState, seat: Seat) -> Option<Card> {
        let legal = round.legal_plays_for(seat);
        let lead = round.current_trick().lead_suit();
        match lead {
            None => Self::choose_lead(legal),
            Some(lead) => {
                let follow = legal.in_suit(lead);
                if follow.is_empty() {
                    Self::choose_discard(legal)
                } else {
                    Self::choose_follow(follow, round)
                }
            }
        }
    }

    /// Leads the lowest non-point card of the longest suit; a hand of
    /// nothing but point cards leads its lowest card.
    fn choose_lead(legal: Hand) -> Option<Card> {
        let harmless = legal.without(rules::point_cards(legal));
        let mut longest: Option<(usize, Suit)> = None;
        for suit in Suit::ALL {
            let held = harmless.in_suit(suit);
            if held.is_empty() {
                continue;
            }
            let better = match longest {
                Some((len, _)) => held.len() > len,
                None => true,
            };
            if better {
                longest = Some((held.len(), suit));
            }
        }
        match longest {
            Some((_, suit)) => harmless.in_suit(suit).lowest(),
            None => legal.lowest_by_rank(),
        }
    }

    /// Following suit: duck under the winner when the trick carries
    /// points; otherwise win cheaply as the last player, or stay low.
    fn choose_follow(follow: Hand, round: &RoundState) -> Option<Card> {
        let trick = round.current_trick();
        let winning = rules::current_winner(trick)?;
        let suit = winning.card.suit;

        if trick.point_total() > 0 {
            let under = follow.below(suit, winning.card.rank);
            return under.highest().or_else(|| follow.lowest());
        }

        let is_last = trick.plays().len() == 3;
        if is_last {
            let over = follow.above(suit, winning.card.rank);
            return over.lowest().or_else(|| follow.lowest());
        }
        follow.lowest()
    }

    /// Off-suit: shed the highest heart, else the queen, else the
    /// highest card held.
    fn choose_discard(legal: Hand) -> Option<Card> {
        let hearts = legal.in_suit(Suit::Hearts);
        if let Some(card) = hearts.highest() {
            return Some(card);
        }
        if legal.contains(rules::QUEEN_OF_SPADES) {
            return Some(rules::QUEEN_OF_SPADES);
        }
        legal.highest_by_rank()
    }
}
