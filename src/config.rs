//! Simulator configuration
//!
//! Read once at startup from a JSON block embedded in the page:
//! `<script id="sim-config" type="application/json">{ ... }</script>`.
//! Every field is optional.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_LOAD_MS;
use crate::error::ConfigError;

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimConfig {
    /// Minimum time the loading screen stays visible (ms)
    pub min_load_ms: u32,
    /// Pause after each completed asset so the progress bar animates (ms).
    /// Zero disables the animation.
    pub step_delay_ms: u32,
    /// Assets always preloaded, before any image sets
    pub base_assets: Vec<String>,
    /// Offer fullscreen once loading finishes
    pub show_fullscreen_prompt: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            min_load_ms: MIN_LOAD_MS,
            step_delay_ms: 0,
            base_assets: Vec::new(),
            show_fullscreen_prompt: true,
        }
    }
}

impl SimConfig {
    /// Id of the page element carrying the JSON config
    pub const ELEMENT_ID: &'static str = "sim-config";

    /// Parse config JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the progress bar should step visibly between assets
    pub fn animate_progress(&self) -> bool {
        self.step_delay_ms > 0
    }

    /// Load config from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(json) = json else {
            log::info!("No page config, using defaults");
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from page");
                config
            }
            Err(e) => {
                log::error!("{}", e);
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
