//! The fixed registry of requestable statistics.
use serde::{Deserialize, Serialize};

use crate::numbers::round_to_tenth;
use crate::record::Counter;

/// Losses floor used when forming a kill ratio.
///
/// Keeps division finite while still rewarding a loss-free unit with a large
/// ratio; a true zero-check would erase that distinction.
const LOSSES_FLOOR: f64 = 0.5;

/// A statistic the presentation layer can request.
///
/// The three primitive kinds read one record counter directly. `KillRatio` is
/// derived: it is never stored or aggregated itself, every query computes
/// kills and losses independently and combines them element-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Experience,
    Kills,
    Losses,
    KillRatio,
}

impl Statistic {
    /// Every requestable statistic, in display order.
    pub const ALL: [Self; 4] = [Self::Experience, Self::Kills, Self::Losses, Self::KillRatio];

    /// The record counter behind a primitive statistic; `None` for the
    /// derived kill ratio.
    #[must_use]
    pub const fn counter(self) -> Option<Counter> {
        match self {
            Self::Experience => Some(Counter::Experience),
            Self::Kills => Some(Counter::Kills),
            Self::Losses => Some(Counter::Losses),
            Self::KillRatio => None,
        }
    }

    /// True for the derived kills-over-losses statistic.
    #[must_use]
    pub const fn is_ratio(self) -> bool {
        matches!(self, Self::KillRatio)
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Experience => write!(f, "experience"),
            Self::Kills => write!(f, "kills"),
            Self::Losses => write!(f, "losses"),
            Self::KillRatio => write!(f, "kill_ratio"),
        }
    }
}

/// Combine kills and losses figures into the ratio statistic:
/// `round(kills / max(losses, 0.5), 1)`.
#[must_use]
pub fn kill_ratio(kills: f64, losses: f64) -> f64 {
    round_to_tenth(kills / losses.max(LOSSES_FLOOR))
}
