//! `[base]` section configuration.
//!
//! Text shown on the generated page.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in vizindex.toml - page text.
///
/// # Example
/// ```toml
/// [base]
/// title = "Group Dance 3D Plot"
/// subtitle = "Experiment Records - Organized by Group Size"
/// link_text = "Open plot"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Page heading and `<title>`.
    #[serde(default = "defaults::base::title")]
    #[educe(Default = defaults::base::title())]
    pub title: String,

    /// Line shown under the heading.
    #[serde(default = "defaults::base::subtitle")]
    #[educe(Default = defaults::base::subtitle())]
    pub subtitle: String,

    /// Text of the link to each visualization.
    #[serde(default = "defaults::base::link_text")]
    #[educe(Default = defaults::base::link_text())]
    pub link_text: String,
}
