//! Tick-driven camera animation: transitions to a target view and the
//! autonomous rotate/rock/loop motions.

mod view_animator;

use serde::{Deserialize, Serialize};
pub use view_animator::ViewAnimator;

/// Autonomous camera motion when no transition is in flight.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnimateState {
    /// Hold still.
    #[default]
    None,
    /// Cycle through the saved views, lingering on each.
    Loop,
    /// Constant yaw about the up axis.
    Rotate,
    /// Yaw back and forth.
    Rock,
}

/// Outcome of a single animation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// Nothing moved.
    Idle,
    /// The camera moved toward its target or along an autonomous path.
    Moved,
    /// The camera snapped onto its target; view content should be applied.
    Arrived,
    /// Loop mode finished lingering; the next view should become the target.
    AdvanceLoop,
}
