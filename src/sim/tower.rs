//! Tower state: the block stack, axis alternation, score and streak

use serde::{Deserialize, Serialize};

use super::drop::DropOutcome;
use super::state::{Axis, Block};
use crate::tuning::Tuning;

/// What a commit did to the tower
#[derive(Debug, Clone)]
pub struct Placement {
    /// Stack index of the committed block
    pub index: usize,
    /// Committed geometry (after any growth)
    pub block: Block,
    /// Whether the perfect streak triggered growth
    pub grew: bool,
}

/// The ordered stack plus the active block on top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    /// Bottom to top; the last block is the active one while a run is live
    pub blocks: Vec<Block>,
    pub axis: Axis,
    /// Successful placements this run
    pub score: u32,
    /// Consecutive perfect placements
    pub perfect_streak: u32,
    /// Hue of the most recently spawned block
    pub hue: f32,
}

impl Tower {
    pub fn new(tuning: &Tuning) -> Self {
        let mut tower = Self {
            blocks: Vec::new(),
            axis: Axis::X,
            score: 0,
            perfect_streak: 0,
            hue: tuning.initial_hue,
        };
        tower.reset(tuning);
        tower
    }

    /// Back to one base block at the origin plus the first active block
    pub fn reset(&mut self, tuning: &Tuning) {
        self.blocks.clear();
        self.axis = Axis::X;
        self.score = 0;
        self.perfect_streak = 0;
        self.hue = tuning.initial_hue;
        self.blocks.push(Block {
            size_x: tuning.initial_size_x,
            size_z: tuning.initial_size_z,
            center_x: 0.0,
            center_z: 0.0,
            y: 0.0,
            is_moving: false,
            direction: 1.0,
            pulse: 0.0,
            hue: self.hue,
        });
        self.spawn_next(tuning);
    }

    /// The moving block, if one is on top
    pub fn active(&self) -> Option<&Block> {
        self.blocks.last().filter(|b| b.is_moving)
    }

    pub fn active_mut(&mut self) -> Option<&mut Block> {
        self.blocks.last_mut().filter(|b| b.is_moving)
    }

    /// The block directly beneath the top one
    pub fn support(&self) -> Option<&Block> {
        self.blocks.len().checked_sub(2).map(|i| &self.blocks[i])
    }

    /// Active and support together, for oscillation
    pub fn active_and_support_mut(&mut self) -> Option<(&mut Block, &Block)> {
        let (top, rest) = self.blocks.split_last_mut()?;
        let support = rest.last()?;
        top.is_moving.then_some((top, support))
    }

    /// Spawn a moving block on top, one spawn offset behind the current top
    /// along the current axis, inheriting its footprint.
    pub fn spawn_next(&mut self, tuning: &Tuning) {
        let Some(top) = self.blocks.last() else {
            return;
        };
        self.hue = (self.hue + tuning.hue_step).rem_euclid(1.0);

        let mut block = Block {
            y: top.y + tuning.block_height,
            is_moving: true,
            direction: 1.0,
            pulse: 0.0,
            hue: self.hue,
            ..top.clone()
        };
        block.set_center(self.axis, top.center(self.axis) - tuning.spawn_offset);
        self.blocks.push(block);
    }

    /// Apply a resolved drop to the active block and spawn the next one.
    ///
    /// Returns `None` for misses (and when nothing is moving); the tower is
    /// left untouched in that case.
    pub fn commit(&mut self, outcome: &DropOutcome, tuning: &Tuning) -> Option<Placement> {
        let kept = outcome.kept()?;
        let axis = self.axis;
        let index = self.blocks.len().checked_sub(1)?;
        let block = self.blocks.get_mut(index).filter(|b| b.is_moving)?;

        if outcome.is_perfect() {
            self.perfect_streak += 1;
        } else {
            self.perfect_streak = 0;
        }
        let grow = outcome.is_perfect()
            && self.perfect_streak > 0
            && self.perfect_streak.is_multiple_of(tuning.perfect_grow_every);

        block.set_span(axis, kept);
        block.is_moving = false;
        block.pulse = tuning.pulse_duration;

        if grow {
            // Never panics, even when min_block_size exceeds the initial size
            block.size_x = (block.size_x + tuning.grow_amount)
                .min(tuning.initial_size_x)
                .max(tuning.min_block_size);
            block.size_z = (block.size_z + tuning.grow_amount)
                .min(tuning.initial_size_z)
                .max(tuning.min_block_size);
            log::debug!(
                "Perfect x{}: grew to {:.2} x {:.2}",
                self.perfect_streak,
                block.size_x,
                block.size_z
            );
        }
        let placed = block.clone();

        self.score += 1;
        self.axis = axis.flip();
        self.spawn_next(tuning);

        Some(Placement {
            index,
            block: placed,
            grew: grow,
        })
    }

    /// Count down settle pulses on every block
    pub fn decay_pulses(&mut self, dt: f32) {
        for block in &mut self.blocks {
            block.decay_pulse(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;
    use proptest::prelude::*;

    fn perfect(tower: &Tower) -> DropOutcome {
        let axis = tower.axis;
        let active = tower.active().unwrap();
        DropOutcome::Perfect {
            kept: Span::new(tower.support().unwrap().center(axis), active.size(axis)),
        }
    }

    #[test]
    fn test_reset_layout() {
        let tuning = Tuning::default();
        let tower = Tower::new(&tuning);
        assert_eq!(tower.blocks.len(), 2);

        let base = &tower.blocks[0];
        assert_eq!((base.center_x, base.center_z, base.y), (0.0, 0.0, 0.0));
        assert_eq!((base.size_x, base.size_z), (3.2, 3.2));
        assert!(!base.is_moving);

        let active = tower.active().unwrap();
        assert_eq!(active.center_x, -5.2);
        assert_eq!(active.center_z, 0.0);
        assert_eq!(active.y, tuning.block_height);
        assert_eq!(active.direction, 1.0);
    }

    #[test]
    fn test_commit_flips_axis_and_stacks() {
        let tuning = Tuning::default();
        let mut tower = Tower::new(&tuning);
        let outcome = perfect(&tower);
        let placement = tower.commit(&outcome, &tuning).unwrap();

        assert_eq!(placement.index, 1);
        assert!(!placement.grew);
        assert_eq!(tower.score, 1);
        assert_eq!(tower.axis, Axis::Z);
        assert_eq!(tower.blocks.len(), 3);
        assert_eq!(tower.blocks[1].pulse, tuning.pulse_duration);
        assert!(!tower.blocks[1].is_moving);

        // New active block is offset on Z and one level higher
        let active = tower.active().unwrap();
        assert_eq!(active.center_z, -5.2);
        assert_eq!(active.y, 2.0 * tuning.block_height);
        for pair in tower.blocks.windows(2) {
            assert_eq!(pair[1].y - pair[0].y, tuning.block_height);
        }
    }

    #[test]
    fn test_partial_resets_streak_and_inherits_size() {
        let tuning = Tuning::default();
        let mut tower = Tower::new(&tuning);
        tower.commit(&perfect(&tower), &tuning);
        assert_eq!(tower.perfect_streak, 1);

        let partial = DropOutcome::Partial {
            kept: Span::new(0.4, 2.4),
            remainder: Span::new(2.0, 0.8),
        };
        tower.commit(&partial, &tuning);
        assert_eq!(tower.perfect_streak, 0);
        assert_eq!(tower.blocks[2].size_z, 2.4);
        assert_eq!(tower.blocks[2].center_z, 0.4);
        assert_eq!(tower.active().unwrap().size_z, 2.4);
    }

    #[test]
    fn test_miss_leaves_tower_untouched() {
        let tuning = Tuning::default();
        let mut tower = Tower::new(&tuning);
        let before = tower.clone();
        assert!(tower.commit(&DropOutcome::Miss, &tuning).is_none());
        assert_eq!(tower, before);
    }

    #[test]
    fn test_growth_with_inverted_bounds_does_not_panic() {
        let tuning = Tuning {
            min_block_size: 5.0,
            ..Default::default()
        };
        let mut tower = Tower::new(&tuning);
        for _ in 0..3 {
            let outcome = perfect(&tower);
            tower.commit(&outcome, &tuning).unwrap();
        }
        let grown = &tower.blocks[tower.blocks.len() - 2];
        assert_eq!((grown.size_x, grown.size_z), (5.0, 5.0));
    }

    #[test]
    fn test_hue_advances_per_spawn() {
        let tuning = Tuning::default();
        let mut tower = Tower::new(&tuning);
        let base_hue = tower.blocks[0].hue;
        let first = tower.blocks[1].hue;
        assert!((first - (base_hue + tuning.hue_step)).abs() < 1e-6);
        tower.commit(&perfect(&tower), &tuning);
        let second = tower.active().unwrap().hue;
        assert!((second - (first + tuning.hue_step).rem_euclid(1.0)).abs() < 1e-6);
        assert!((0.0..1.0).contains(&second));
    }

    proptest! {
        #[test]
        fn prop_growth_bounded_and_periodic(
            moves in proptest::collection::vec(proptest::option::of(0.3f32..1.2), 1..40),
        ) {
            let tuning = Tuning::default();
            let mut tower = Tower::new(&tuning);
            for shave in moves {
                let axis = tower.axis;
                let support = tower.support().unwrap().span(axis);
                let active = tower.active().unwrap().span(axis);
                let outcome = match shave {
                    None => perfect(&tower),
                    Some(shave) if active.size - shave > tuning.min_block_size => {
                        DropOutcome::Partial {
                            kept: Span::new(support.center + shave / 2.0, active.size - shave),
                            remainder: Span::new(support.max() + shave / 2.0, shave),
                        }
                    }
                    Some(_) => perfect(&tower),
                };
                let before = tower.active().unwrap().clone();
                let placement = tower.commit(&outcome, &tuning).unwrap();

                prop_assert!(placement.block.size_x <= tuning.initial_size_x);
                prop_assert!(placement.block.size_z <= tuning.initial_size_z);
                prop_assert!(placement.block.size_x > 0.0 && placement.block.size_z > 0.0);
                if placement.grew {
                    prop_assert!(outcome.is_perfect());
                    prop_assert!(tower.perfect_streak > 0);
                    prop_assert_eq!(tower.perfect_streak % tuning.perfect_grow_every, 0);
                    let floor = before.size_x.min(tuning.initial_size_x);
                    prop_assert!(placement.block.size_x >= floor);
                } else if outcome.is_perfect() {
                    prop_assert_ne!(tower.perfect_streak % tuning.perfect_grow_every, 0);
                }
            }
        }
    }
}
