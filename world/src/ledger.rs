//! Economy and progression counters owned by the world.

use path_defence_core::LedgerSnapshot;

/// Gold, lives, score and wave number for the running session.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ledger {
    gold: u32,
    lives: i32,
    score: u32,
    wave: u32,
}

impl Ledger {
    /// Creates a ledger for wave one with the provided economy.
    pub(crate) fn new(gold: u32, lives: i32) -> Self {
        Self {
            gold,
            lives,
            score: 0,
            wave: 1,
        }
    }

    pub(crate) fn gold(&self) -> u32 {
        self.gold
    }

    pub(crate) fn lives(&self) -> i32 {
        self.lives
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn wave(&self) -> u32 {
        self.wave
    }

    /// Deducts `cost` when affordable, otherwise reports the available gold.
    pub(crate) fn spend(&mut self, cost: u32) -> Result<(), u32> {
        if self.gold < cost {
            return Err(self.gold);
        }
        self.gold -= cost;
        Ok(())
    }

    pub(crate) fn credit(&mut self, gold: u32) {
        self.gold = self.gold.saturating_add(gold);
    }

    /// Pays out a kill.
    pub(crate) fn reward(&mut self, gold: u32, score: u32) {
        self.credit(gold);
        self.score = self.score.saturating_add(score);
    }

    /// Removes one life and reports whether the ledger ran out.
    pub(crate) fn lose_life(&mut self) -> bool {
        self.lives -= 1;
        self.lives <= 0
    }

    pub(crate) fn advance_wave(&mut self) -> u32 {
        self.wave = self.wave.saturating_add(1);
        self.wave
    }

    pub(crate) fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            gold: self.gold,
            lives: self.lives,
            score: self.score,
            wave: self.wave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_rejects_without_mutation() {
        let mut ledger = Ledger::new(20, 10);
        assert_eq!(ledger.spend(25), Err(20));
        assert_eq!(ledger.gold(), 20);
        assert_eq!(ledger.spend(20), Ok(()));
        assert_eq!(ledger.gold(), 0);
    }

    #[test]
    fn losing_the_last_life_exhausts_the_ledger() {
        let mut ledger = Ledger::new(0, 2);
        assert!(!ledger.lose_life());
        assert!(ledger.lose_life());
        assert_eq!(ledger.lives(), 0);
    }

    #[test]
    fn rewards_accumulate_gold_and_score() {
        let mut ledger = Ledger::new(75, 20);
        ledger.reward(5, 10);
        ledger.reward(8, 15);
        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.gold, 88);
        assert_eq!(snapshot.score, 25);
        assert_eq!(snapshot.wave, 1);
    }
}
