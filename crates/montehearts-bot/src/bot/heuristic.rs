use super::TableView;
use montehearts_core::model::card::Card;
use montehearts_core::model::hand::Hand;
use montehearts_core::model::rank::Rank;
use montehearts_core::model::suit::Suit;
use montehearts_core::model::trick::Trick;
use montehearts_core::rules;

/// Zero-sample shortcuts consulted before Monte Carlo. Anything not
/// obviously forced or obviously right is left to the sampler.
pub struct FastPath;

impl FastPath {
    pub fn choose(
        legal: Hand,
        view: &TableView,
        opponents_hold_points: bool,
        aggressive_moon: bool,
    ) -> Option<Card> {
        if legal.len() == 1 {
            return legal.lowest();
        }

        if view.trick.is_empty() && view.is_first_trick && legal.contains(rules::TWO_OF_CLUBS) {
            return Some(rules::TWO_OF_CLUBS);
        }

        // Off-suit with the moon already out of reach: shed the most
        // expensive point card now.
        if let Some(lead) = view.trick.lead_suit() {
            if legal.in_suit(lead).is_empty() && opponents_hold_points && !aggressive_moon {
                let points = rules::point_cards(legal);
                if points.contains(rules::QUEEN_OF_SPADES) {
                    return Some(rules::QUEEN_OF_SPADES);
                }
                if let Some(heart) = points.in_suit(Suit::Hearts).highest() {
                    return Some(heart);
                }
            }
        }

        None
    }

    /// Advisory flag: a higher spade already won the trick, so the queen
    /// could ride under it. Reported for logging; evaluation decides.
    pub fn queen_dump_advised(legal: Hand, trick: &Trick) -> bool {
        if !legal.contains(rules::QUEEN_OF_SPADES) {
            return false;
        }
        if trick.lead_suit() != Some(Suit::Spades) || trick.plays().len() >= 3 {
            return false;
        }
        trick
            .plays()
            .iter()
            .any(|play| play.card.suit == Suit::Spades && play.card.rank > Rank::Queen)
    }
}

#[cfg(test)]
mod tests {
    use super::FastPath;
    use crate::bot::TableView;
    use montehearts_core::model::card::Card;
    use montehearts_core::model::hand::Hand;
    use montehearts_core::model::rank::Rank;
    use montehearts_core::model::seat::Seat;
    use montehearts_core::model::suit::Suit;
    use montehearts_core::model::trick::Trick;
    use montehearts_core::rules;

    fn view(trick: Trick, is_first_trick: bool) -> TableView {
        TableView {
            own_hand: Hand::EMPTY,
            trick,
            hearts_broken: false,
            is_first_trick,
        }
    }

    #[test]
    fn a_single_legal_card_is_forced() {
        let legal = Hand::from_cards(&[rules::QUEEN_OF_SPADES]);
        let chosen = FastPath::choose(legal, &view(Trick::new(Seat::North), false), false, false);
        assert_eq!(chosen, Some(rules::QUEEN_OF_SPADES));
    }

    #[test]
    fn first_lead_is_the_two_of_clubs() {
        let legal = Hand::from_cards(&[rules::TWO_OF_CLUBS]);
        let chosen = FastPath::choose(legal, &view(Trick::new(Seat::North), true), false, false);
        assert_eq!(chosen, Some(rules::TWO_OF_CLUBS));
    }

    #[test]
    fn offsuit_dump_sheds_the_queen_first() {
        let trick = Trick::from_plays(
            Seat::East,
            &[(Seat::East, Card::new(Rank::Five, Suit::Clubs))],
        )
        .unwrap();
        let legal = Hand::from_cards(&[
            rules::QUEEN_OF_SPADES,
            Card::new(Rank::Ten, Suit::Hearts),
            Card::new(Rank::Four, Suit::Diamonds),
        ]);
        let chosen = FastPath::choose(legal, &view(trick, false), true, false);
        assert_eq!(chosen, Some(rules::QUEEN_OF_SPADES));
    }

    #[test]
    fn offsuit_dump_falls_back_to_the_highest_heart() {
        let trick = Trick::from_plays(
            Seat::East,
            &[(Seat::East, Card::new(Rank::Five, Suit::Clubs))],
        )
        .unwrap();
        let legal = Hand::from_cards(&[
            Card::new(Rank::Ten, Suit::Hearts),
            Card::new(Rank::Three, Suit::Hearts),
            Card::new(Rank::Four, Suit::Diamonds),
        ]);
        let chosen = FastPath::choose(legal, &view(trick, false), true, false);
        assert_eq!(chosen, Some(Card::new(Rank::Ten, Suit::Hearts)));
    }

    #[test]
    fn dump_is_suppressed_while_a_sweep_is_live() {
        let trick = Trick::from_plays(
            Seat::East,
            &[(Seat::East, Card::new(Rank::Five, Suit::Clubs))],
        )
        .unwrap();
        let legal = Hand::from_cards(&[
            rules::QUEEN_OF_SPADES,
            Card::new(Rank::Four, Suit::Diamonds),
        ]);
        assert_eq!(
            FastPath::choose(legal, &view(trick.clone(), false), false, false),
            None
        );
        assert_eq!(
            FastPath::choose(legal, &view(trick, false), true, true),
            None
        );
    }

    #[test]
    fn queen_dump_flag_needs_a_higher_spade_and_a_later_seat() {
        let legal = Hand::from_cards(&[
            rules::QUEEN_OF_SPADES,
            Card::new(Rank::Two, Suit::Spades),
        ]);
        let under_ace = Trick::from_plays(
            Seat::East,
            &[
                (Seat::East, Card::new(Rank::Ace, Suit::Spades)),
                (Seat::South, Card::new(Rank::Two, Suit::Clubs)),
            ],
        )
        .unwrap();
        assert!(FastPath::queen_dump_advised(legal, &under_ace));

        let low_lead = Trick::from_plays(
            Seat::East,
            &[(Seat::East, Card::new(Rank::Three, Suit::Spades))],
        )
        .unwrap();
        assert!(!FastPath::queen_dump_advised(legal, &low_lead));

        let as_last = Trick::from_plays(
            Seat::East,
            &[
                (Seat::East, Card::new(Rank::Ace, Suit::Spades)),
                (Seat::South, Card::new(Rank::Two, Suit::Clubs)),
                (Seat::West, Card::new(Rank::Three, Suit::Clubs)),
            ],
        )
        .unwrap();
        assert!(!FastPath::queen_dump_advised(legal, &as_last));
    }
}
