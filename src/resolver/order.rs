//! Probing-order policies.
//!
//! # Design Decisions
//! - One strategy seam with two selectable policies, chosen in config
//! - Random mode reshuffles every cycle and keeps no index, so load is
//!   spread across mirrors and the probing order is not predictable to
//!   an external blocker
//! - Sticky mode never reshuffles; it derives its starting point from the
//!   last committed endpoint instead of a stored index

use rand::seq::SliceRandom;

use crate::resolver::candidate::Candidate;

/// Produces the order in which candidates are probed within one cycle.
pub trait OrderPolicy: Send {
    fn order(&mut self, candidates: &[Candidate], last_good: Option<&Candidate>) -> Vec<Candidate>;

    fn name(&self) -> &'static str;
}

/// Uniform random permutation (Fisher–Yates) per cycle.
#[derive(Debug, Default)]
pub struct RandomShuffle;

impl OrderPolicy for RandomShuffle {
    fn order(&mut self, candidates: &[Candidate], _last_good: Option<&Candidate>) -> Vec<Candidate> {
        let mut order = candidates.to_vec();
        order.shuffle(&mut rand::thread_rng());
        order
    }

    fn name(&self) -> &'static str {
        "shuffle"
    }
}

/// Configured order, rotated so the last known good endpoint is probed
/// first. Falls back to the configured order when nothing has resolved yet
/// or the previous winner left the list.
#[derive(Debug, Default)]
pub struct StickyRotation;

impl OrderPolicy for StickyRotation {
    fn order(&mut self, candidates: &[Candidate], last_good: Option<&Candidate>) -> Vec<Candidate> {
        let start = last_good
            .and_then(|good| candidates.iter().position(|c| c == good))
            .unwrap_or(0);

        let mut order = Vec::with_capacity(candidates.len());
        for i in 0..candidates.len() {
            order.push(candidates[(start + i) % candidates.len()].clone());
        }
        order
    }

    fn name(&self) -> &'static str {
        "sticky"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn candidates(urls: &[&str]) -> Vec<Candidate> {
        urls.iter().map(|u| Candidate::parse(u).unwrap()).collect()
    }

    #[test]
    fn shuffle_returns_a_permutation() {
        let input = candidates(&[
            "https://a.example.com",
            "https://b.example.com",
            "https://c.example.com",
            "https://d.example.com",
        ]);
        let mut policy = RandomShuffle;
        let order = policy.order(&input, None);

        assert_eq!(order.len(), input.len());
        let expected: HashSet<_> = input.iter().collect();
        let got: HashSet<_> = order.iter().collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn shuffle_handles_empty_and_singleton() {
        let mut policy = RandomShuffle;
        assert!(policy.order(&[], None).is_empty());

        let one = candidates(&["https://a.example.com"]);
        assert_eq!(policy.order(&one, None), one);
    }

    #[test]
    fn sticky_starts_from_last_known_good() {
        let input = candidates(&[
            "https://a.example.com",
            "https://b.example.com",
            "https://c.example.com",
        ]);
        let mut policy = StickyRotation;
        let order = policy.order(&input, Some(&input[1]));
        assert_eq!(order, candidates(&[
            "https://b.example.com",
            "https://c.example.com",
            "https://a.example.com",
        ]));
    }

    #[test]
    fn sticky_without_history_keeps_configured_order() {
        let input = candidates(&["https://a.example.com", "https://b.example.com"]);
        let mut policy = StickyRotation;
        assert_eq!(policy.order(&input, None), input);
    }

    #[test]
    fn sticky_ignores_winner_that_left_the_list() {
        let input = candidates(&["https://a.example.com", "https://b.example.com"]);
        let gone = Candidate::parse("https://z.example.com").unwrap();
        let mut policy = StickyRotation;
        assert_eq!(policy.order(&input, Some(&gone)), input);
    }
}
