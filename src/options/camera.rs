use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera transition and autonomous-motion parameters.
pub struct CameraOptions {
    /// Ticks taken to fly to a new target view.
    #[schemars(title = "Transition Steps", range(min = 1, max = 200))]
    pub transition_steps: u32,
    /// Extra ticks to linger on a view before looping to the next one.
    #[schemars(title = "Loop Wait Steps", range(min = 0, max = 600))]
    pub loop_wait_steps: u32,
    /// Milliseconds of elapsed time per animation tick.
    #[schemars(title = "Step Duration (ms)", range(min = 1.0, max = 200.0), extend("step" = 1.0))]
    pub ms_per_step: f64,
    /// Yaw applied per tick while rotating or rocking, in degrees.
    #[schemars(title = "Rotate Speed", range(min = 0.05, max = 5.0), extend("step" = 0.05))]
    pub rotate_step_degrees: f32,
    /// Ticks per rock phase band (a full rock cycle is four bands).
    #[schemars(title = "Rock Band Steps", range(min = 1, max = 400))]
    pub rock_band_steps: u32,
    /// Camera distance as a multiple of the fitted atom extent.
    #[schemars(title = "Zoom Padding", range(min = 0.5, max = 5.0), extend("step" = 0.1))]
    pub zoom_padding: f32,
    /// Smallest allowed focus-to-eye distance.
    #[schemars(skip)]
    pub min_zoom: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            transition_steps: 20,
            loop_wait_steps: 30,
            ms_per_step: 17.0,
            rotate_step_degrees: 0.5,
            rock_band_steps: 40,
            zoom_padding: 2.0,
            min_zoom: 1.0,
        }
    }
}
