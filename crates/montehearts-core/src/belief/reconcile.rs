//! Marginal reconciliation via iterative proportional fitting.

use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;

/// Convergence tolerance on the per-seat marginal sums.
const EPSILON: f64 = 1e-9;
const MAX_ITERATIONS: usize = 64;

/// Alternates per-seat scaling (each opponent's mass sums to its remaining
/// hand size) with per-card normalization (each unseen card's mass sums to
/// one) until both marginals hold within tolerance. Zero cells stay zero,
/// so voids survive the fit. Ends on a normalization pass, which makes the
/// per-card sums exact at exit.
pub(super) fn fit(
    probs: &mut [[f64; 52]; 4],
    perspective: Seat,
    unseen: Hand,
    remaining: &[u8; 4],
) {
    if unseen.is_empty() {
        return;
    }

    for _ in 0..MAX_ITERATIONS {
        let mut worst = 0.0_f64;

        for seat in Seat::LOOP {
            if seat == perspective {
                continue;
            }
            let row = &mut probs[seat.index()];
            let total: f64 = unseen.iter().map(|card| row[card.to_index() as usize]).sum();
            let target = remaining[seat.index()] as f64;
            if total > 0.0 {
                let deviation = (total - target).abs();
                if deviation > worst {
                    worst = deviation;
                }
                let factor = target / total;
                for card in unseen.iter() {
                    row[card.to_index() as usize] *= factor;
                }
            } else if target > 0.0 {
                // No feasible mass for a seat that still holds cards; the
                // sampler reports this as an inconsistency.
                worst = f64::MAX;
            }
        }

        for card in unseen.iter() {
            normalize_card(probs, perspective, card);
        }

        if worst < EPSILON {
            break;
        }
    }
}

pub(super) fn normalize_card(probs: &mut [[f64; 52]; 4], perspective: Seat, card: Card) {
    let index = card.to_index() as usize;
    let mut total = 0.0_f64;
    for seat in Seat::LOOP {
        if seat != perspective {
            total += probs[seat.index()][index];
        }
    }
    if total == 0.0 {
        return;
    }
    for seat in Seat::LOOP {
        if seat != perspective {
            probs[seat.index()][index] /= total;
        }
    }
}
