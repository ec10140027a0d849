//! Session statistics
//!
//! An external reducer over simulation events. Nothing here feeds back into
//! the simulation; storage is up to the host.

use serde::{Deserialize, Serialize};

use crate::sim::SimEvent;

/// Totals and bests folded from a stream of events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_placed: u64,
    pub total_perfects: u64,
    pub best_perfect_streak: u32,
    pub best_score: u32,
    pub runs_played: u32,
    /// Placements in the run currently in progress
    #[serde(skip)]
    current_run_placed: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event
    pub fn apply(&mut self, event: &SimEvent) {
        match *event {
            SimEvent::RunStart => self.current_run_placed = 0,
            SimEvent::PlacedBlock => {
                self.total_placed += 1;
                self.current_run_placed += 1;
                self.best_score = self.best_score.max(self.current_run_placed);
            }
            SimEvent::Perfect { streak } => {
                self.total_perfects += 1;
                self.best_perfect_streak = self.best_perfect_streak.max(streak);
            }
            SimEvent::RunEnd { score } => {
                self.runs_played += 1;
                self.best_score = self.best_score.max(score);
                self.current_run_placed = 0;
                log::info!(
                    "Run {} ended with {} (best {})",
                    self.runs_played,
                    score,
                    self.best_score
                );
            }
        }
    }

    /// Fold a batch, e.g. `stats.extend(state.drain_events())`
    pub fn extend<I: IntoIterator<Item = SimEvent>>(&mut self, events: I) {
        for event in events {
            self.apply(&event);
        }
    }

    /// Check if a finished score would match or beat the current best
    pub fn is_new_best(&self, score: u32) -> bool {
        score > 0 && score >= self.best_score
    }
}
