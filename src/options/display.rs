use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::view::ShowOptions;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Representation toggles installed in a freshly built default view.
pub struct DisplayOptions {
    /// Show flags of the default view.
    #[schemars(title = "Default Representations")]
    pub default_show: ShowOptions,
}
