//! Session state reset on start, restart and exit

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which simulator, if any, is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimMode {
    #[default]
    Idle,
    /// Quiz mode
    Simulator,
    /// Free play
    Sandbox,
}

/// Probe pose in the simulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeState {
    /// Sweep angle in degrees, [0, 360)
    pub sweep_deg: f32,
    /// Probe head position
    pub position: Vec2,
    /// Cable tail position
    pub tail_position: Vec2,
    /// Index into the image set for the current pose
    pub current_view_index: usize,
}

impl Default for ProbeState {
    fn default() -> Self {
        Self {
            sweep_deg: DEFAULT_SWEEP_DEG,
            position: DEFAULT_PROBE_POSITION,
            tail_position: DEFAULT_TAIL_POSITION,
            current_view_index: DEFAULT_VIEW_INDEX,
        }
    }
}

/// Everything a run mutates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub current_question_index: usize,
    pub probe: ProbeState,
    /// Last grid cell the probe touched
    pub last_cell_pos: Option<Vec2>,
    pub game_started: bool,
    pub mode: SimMode,
}

impl SessionState {
    /// Back to the page-load state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Begin a quiz run
    pub fn start_quiz(&mut self) {
        self.game_started = true;
        self.score = 0;
        self.current_question_index = 0;
    }

    pub fn is_simulator_active(&self) -> bool {
        self.mode == SimMode::Simulator
    }

    pub fn is_sandbox_active(&self) -> bool {
        self.mode == SimMode::Sandbox
    }
}
