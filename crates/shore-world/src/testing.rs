//! Deterministic random sources for tests.

use crate::random::RandomSource;
use std::collections::VecDeque;

/// Replays fixed draws and panics when a draw was not scripted
#[derive(Debug, Default)]
pub struct Scripted {
    rolls: VecDeque<i32>,
    picks: VecDeque<usize>,
    drifts: VecDeque<i32>,
}

impl Scripted {
    pub fn new(rolls: &[i32], picks: &[usize], drifts: &[i32]) -> Self {
        Self {
            rolls: rolls.iter().copied().collect(),
            picks: picks.iter().copied().collect(),
            drifts: drifts.iter().copied().collect(),
        }
    }

    pub fn exhausted(&self) -> bool {
        self.rolls.is_empty() && self.picks.is_empty() && self.drifts.is_empty()
    }
}

impl RandomSource for Scripted {
    fn roll(&mut self, _max_gene: i32) -> i32 {
        self.rolls.pop_front().expect("unscripted roll")
    }

    fn pick(&mut self, len: usize) -> usize {
        let idx = self.picks.pop_front().expect("unscripted pick");
        assert!(idx < len, "scripted pick {} out of {}", idx, len);
        idx
    }

    fn drift(&mut self) -> i32 {
        self.drifts.pop_front().expect("unscripted drift")
    }

    fn chance(&mut self, _probability: f64) -> bool {
        panic!("unscripted chance")
    }
}
