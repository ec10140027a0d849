//! Drop resolution
//!
//! Pure interval geometry on the active axis: decides whether a drop is
//! perfect, partial or a miss, and where the kept footprint and the severed
//! remainder end up.

use serde::{Deserialize, Serialize};

use crate::Span;

/// Result of resolving one drop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DropOutcome {
    /// Within tolerance: snapped onto the support, nothing cut
    Perfect { kept: Span },
    /// Overhang severed; `remainder` becomes debris
    Partial { kept: Span, remainder: Span },
    /// No usable overlap; ends the run
    Miss,
}

impl DropOutcome {
    /// Footprint that stays on the tower
    pub fn kept(&self) -> Option<Span> {
        match self {
            DropOutcome::Perfect { kept } | DropOutcome::Partial { kept, .. } => Some(*kept),
            DropOutcome::Miss => None,
        }
    }

    pub fn is_perfect(&self) -> bool {
        matches!(self, DropOutcome::Perfect { .. })
    }
}

/// Resolve a drop of `active` onto `support` along the current axis.
///
/// The tolerance check is inclusive and runs first, so an exactly centered
/// drop never reaches the overlap arithmetic. Overlaps at or below `epsilon`
/// are misses.
pub fn resolve_drop(active: Span, support: Span, tolerance: f32, epsilon: f32) -> DropOutcome {
    let delta = active.center - support.center;
    if delta.abs() <= tolerance {
        return DropOutcome::Perfect {
            kept: Span::new(support.center, active.size),
        };
    }

    let overlap_min = active.min().max(support.min());
    let overlap_max = active.max().min(support.max());
    let overlap = overlap_max - overlap_min;
    if overlap <= epsilon {
        return DropOutcome::Miss;
    }

    let kept = Span::from_edges(overlap_min, overlap_max);
    // Remainder hangs off the side the active block overshot toward
    let remainder_center = if active.center < support.center {
        (active.min() + overlap_min) / 2.0
    } else {
        (overlap_max + active.max()) / 2.0
    };
    DropOutcome::Partial {
        kept,
        remainder: Span::new(remainder_center, active.size - overlap),
    }
}
