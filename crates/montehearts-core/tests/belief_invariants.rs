//! Full-round sweeps: the belief marginals must survive any legal
//! observation sequence, and sampled worlds must stay consistent with
//! everything observed so far.

use montehearts_core::belief::{Belief, WorldSampler};
use montehearts_core::model::card::Card;
use montehearts_core::model::hand::Hand;
use montehearts_core::model::round::RoundState;
use montehearts_core::model::seat::Seat;
use montehearts_core::rules;
use montehearts_core::sim::RolloutPolicy;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

fn deal(seed: u64) -> [Hand; 4] {
    let mut cards: Vec<Card> = Hand::FULL_DECK.iter().collect();
    cards.shuffle(&mut SmallRng::seed_from_u64(seed));
    let mut hands = [Hand::EMPTY; 4];
    for (position, card) in cards.into_iter().enumerate() {
        hands[position % 4].insert(card);
    }
    hands
}

fn first_leader(hands: &[Hand; 4]) -> Seat {
    Seat::LOOP
        .iter()
        .copied()
        .find(|seat| hands[seat.index()].contains(rules::TWO_OF_CLUBS))
        .expect("someone holds the two of clubs")
}

fn hidden_seats(observer: Seat) -> Vec<Seat> {
    Seat::LOOP
        .iter()
        .copied()
        .filter(|seat| *seat != observer)
        .collect()
}

fn assert_belief_consistent(belief: &Belief, observer: Seat) {
    let unseen = belief.unseen();
    for card in unseen.iter() {
        let total: f64 = hidden_seats(observer)
            .iter()
            .map(|seat| belief.prob(card, *seat))
            .sum();
        assert!((total - 1.0).abs() < 1e-6, "{card} mass sums to {total}");
    }
    // The fit is iteration-capped, so heavily constrained endgames may
    // sit a little off the exact counts.
    for seat in hidden_seats(observer) {
        let total: f64 = unseen.iter().map(|card| belief.prob(card, seat)).sum();
        let target = belief.remaining(seat) as f64;
        assert!(
            (total - target).abs() < 1e-4,
            "{seat} mass {total}, expected {target}"
        );
    }
    for seat in hidden_seats(observer) {
        for suit in montehearts_core::model::suit::Suit::ALL {
            if belief.is_void(seat, suit) {
                for card in unseen.in_suit(suit).iter() {
                    assert_eq!(belief.prob(card, seat), 0.0, "void cell {seat}/{card}");
                }
            }
        }
    }
}

#[test]
fn marginals_hold_through_complete_rounds() {
    let observer = Seat::South;
    for seed in 0..8 {
        let hands = deal(seed);
        let mut round = RoundState::new(hands, first_leader(&hands), true);
        let mut belief = Belief::new(observer, hands[observer.index()], &[]);
        assert_belief_consistent(&belief, observer);

        while !round.is_over() {
            let seat = round.next_to_play();
            let lead = round.current_trick().lead_suit();
            let card = RolloutPolicy::choose(&round, seat).expect("a legal play exists");
            round.play_card(seat, card).expect("policy plays legally");
            belief.on_play(seat, card, lead);
            assert_belief_consistent(&belief, observer);
        }

        let total: u16 = round.points().iter().map(|&p| p as u16).sum();
        assert_eq!(total, rules::ROUND_POINTS as u16, "seed {seed}");
    }
}

#[test]
fn sampled_worlds_stay_consistent_with_observations() {
    let observer = Seat::South;
    let sampler = WorldSampler::default();
    for seed in 0..4 {
        let hands = deal(100 + seed);
        let mut round = RoundState::new(hands, first_leader(&hands), true);
        let mut belief = Belief::new(observer, hands[observer.index()], &[]);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut played = Hand::EMPTY;

        // Walk half the round, sampling as we go.
        for _ in 0..26 {
            let seat = round.next_to_play();
            let lead = round.current_trick().lead_suit();
            let card = RolloutPolicy::choose(&round, seat).expect("a legal play exists");
            round.play_card(seat, card).expect("policy plays legally");
            belief.on_play(seat, card, lead);
            played.insert(card);

            let world = sampler.sample(&belief, &mut rng).expect("world exists");
            let mut union = Hand::EMPTY;
            for seat in Seat::LOOP {
                let hand = world.hand(seat);
                assert!(union.is_disjoint(hand));
                union = union.union(hand);
                if seat != observer {
                    assert_eq!(hand.len(), belief.remaining(seat) as usize);
                    for suit in montehearts_core::model::suit::Suit::ALL {
                        if belief.is_void(seat, suit) {
                            assert!(hand.in_suit(suit).is_empty());
                        }
                    }
                }
            }
            assert_eq!(union, played.complement());
        }
    }
}
