//! Feature aggregation
//!
//! Reduces the sliding history to the likelihood profile the scorer
//! consumes: the share of buffered traffic falling in each window.

use super::frame::Label;
use super::window::Window;

/// Aggregate feature representation of one buffer snapshot, plus the
/// ground-truth label summarizing the windows it was built from.
#[derive(Debug, Clone)]
pub struct TrafficAggregate {
    /// Per-window traffic likelihood, oldest window first. Sums to 1.0
    /// for non-empty traffic, all zeros otherwise.
    pub likelihoods: Vec<f32>,
    pub label: Label,
}

/// Build the aggregate for the given windows (oldest first).
///
/// Any attack-labeled frame anywhere in the set marks the whole aggregate
/// as attack-derived.
pub fn aggregate<'a, I>(windows: I) -> TrafficAggregate
where
    I: Iterator<Item = &'a Window>,
{
    let mut counts = Vec::new();
    let mut label = Label::Normal;

    for window in windows {
        counts.push(window.frame_count() as f32);
        if window.has_attack() {
            label = Label::Attack;
        }
    }

    let total: f32 = counts.iter().sum();
    let likelihoods = if total > 0.0 {
        counts.iter().map(|c| c / total).collect()
    } else {
        counts
    };

    TrafficAggregate { likelihoods, label }
}
