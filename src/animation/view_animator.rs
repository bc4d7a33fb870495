use super::{AnimateState, AnimationEvent};
use crate::camera::{interpolate, CameraParams};
use crate::options::CameraOptions;

/// Drives the camera one tick at a time.
///
/// A target set with [`ViewAnimator::set_target`] pre-empts autonomous
/// motion: the step counter resets to the transition length and each tick
/// moves `1 / remaining` of the way, snapping exactly onto the target on
/// the last step. With no target the counter keeps falling below zero and
/// the autonomous state takes over.
#[derive(Debug, Clone)]
pub struct ViewAnimator {
    state: AnimateState,
    target: Option<CameraParams>,
    n_update_step: i64,
    rock_step: u64,
    options: CameraOptions,
}

impl ViewAnimator {
    /// Idle animator with the given pacing.
    #[must_use]
    pub fn new(options: CameraOptions) -> Self {
        Self {
            state: AnimateState::None,
            target: None,
            n_update_step: 0,
            rock_step: 0,
            options,
        }
    }

    /// Current autonomous state.
    #[must_use]
    pub fn state(&self) -> AnimateState {
        self.state
    }

    /// Switch autonomous state, restarting the rock phase.
    pub fn set_state(&mut self, state: AnimateState) {
        if state != self.state {
            log::debug!("animate state {:?} -> {state:?}", self.state);
        }
        self.state = state;
        self.rock_step = 0;
    }

    /// Pacing options.
    #[must_use]
    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    /// Camera being flown to, if a transition is in flight.
    #[must_use]
    pub fn target(&self) -> Option<&CameraParams> {
        self.target.as_ref()
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.target.is_some()
    }

    /// Remaining-step counter (negative while idling past a target).
    #[must_use]
    pub fn n_update_step(&self) -> i64 {
        self.n_update_step
    }

    /// Start flying toward `target`.
    pub fn set_target(&mut self, target: CameraParams) {
        self.target = Some(target);
        self.n_update_step = i64::from(self.options.transition_steps.max(1));
    }

    /// Drop any in-flight transition without moving.
    pub fn cancel(&mut self) {
        self.target = None;
        self.n_update_step = 0;
    }

    /// Advance one tick, moving `camera` in place.
    pub fn step(&mut self, camera: &mut CameraParams) -> AnimationEvent {
        if let Some(target) = self.target {
            let event = if self.n_update_step <= 1 {
                *camera = target;
                self.target = None;
                AnimationEvent::Arrived
            } else {
                let t = 1.0 / self.n_update_step as f32;
                *camera = interpolate(camera, &target, t);
                AnimationEvent::Moved
            };
            self.n_update_step -= 1;
            return event;
        }

        self.n_update_step -= 1;
        if self.n_update_step > 0 {
            return AnimationEvent::Idle;
        }
        let yaw = self.options.rotate_step_degrees.to_radians();
        match self.state {
            AnimateState::None => AnimationEvent::Idle,
            AnimateState::Rotate => {
                *camera = camera.yawed(yaw);
                AnimationEvent::Moved
            }
            AnimateState::Rock => {
                let band_steps =
                    u64::from(self.options.rock_band_steps.max(1));
                let band = (self.rock_step / band_steps) % 4;
                self.rock_step += 1;
                let sign = if matches!(band, 0 | 3) { 1.0 } else { -1.0 };
                *camera = camera.yawed(sign * yaw);
                AnimationEvent::Moved
            }
            AnimateState::Loop => {
                if self.n_update_step < -i64::from(self.options.loop_wait_steps)
                {
                    AnimationEvent::AdvanceLoop
                } else {
                    AnimationEvent::Idle
                }
            }
        }
    }
}

impl Default for ViewAnimator {
    fn default() -> Self {
        Self::new(CameraOptions::default())
    }
}
