//! Probe Trainer - screen flow for a browser ultrasound probe simulator
//!
//! Core modules:
//! - `flow`: Screen state machine, session state, effect application
//! - `preload`: Concurrent asset preloading with progress reporting
//! - `config`: Page-provided configuration
//! - `platform`: Browser adapters (DOM, image loading, timers)

pub mod config;
pub mod error;
pub mod flow;
pub mod platform;
pub mod preload;

pub use config::SimConfig;
pub use error::{AssetError, ConfigError, ManifestError};
pub use flow::{Effect, FlowController, FlowEvent, FlowState, Screen};
pub use preload::{LoadProgress, PreloadReport, Preloader};

/// Simulator configuration constants
pub mod consts {
    use glam::Vec2;

    /// Probe sweep angle after init/restart (degrees)
    pub const DEFAULT_SWEEP_DEG: f32 = 0.0;
    /// Probe head position after init/restart (normalized canvas coords)
    pub const DEFAULT_PROBE_POSITION: Vec2 = Vec2::new(0.5, 0.35);
    /// Probe cable tail position after init/restart (normalized canvas coords)
    pub const DEFAULT_TAIL_POSITION: Vec2 = Vec2::new(0.5, 0.9);
    /// Image view shown first
    pub const DEFAULT_VIEW_INDEX: usize = 0;

    /// Minimum time the loading screen stays up (ms)
    pub const MIN_LOAD_MS: u32 = 1500;

    /// Degrees covered by one clock hour
    pub const CLOCK_SECTOR_DEG: f64 = 30.0;
}

/// Clock-face labels, indexed by sector starting at the top
const CLOCK_LABELS: [&str; 12] = [
    "12 o'clock",
    "1 o'clock",
    "2 o'clock",
    "3 o'clock",
    "4 o'clock",
    "5 o'clock",
    "6 o'clock",
    "7 o'clock",
    "8 o'clock",
    "9 o'clock",
    "10 o'clock",
    "11 o'clock",
];

/// Normalized angle to [0, 360)
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert a probe sweep angle to the nearest clock-face label.
///
/// Half-sector ties round toward the later hour, so 15° reads "1 o'clock"
/// and 345° wraps to "12 o'clock".
pub fn degrees_to_clock(deg: f64) -> &'static str {
    let norm = normalize_degrees(deg);
    let sector = (norm / consts::CLOCK_SECTOR_DEG).round() as usize % CLOCK_LABELS.len();
    CLOCK_LABELS[sector]
}
