//! Screens and the page elements that back them

use serde::{Deserialize, Serialize};

/// A screen the user can see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// Asset preloading with progress bar
    Loading,
    /// "Go fullscreen?" overlay
    FullscreenPrompt,
    /// Main menu
    Title,
    /// Quiz introduction before the first question
    QuestionIntro,
    /// Quiz mode simulator
    Simulator,
    /// Free-play simulator without questions
    Sandbox,
    /// "Leave the simulator?" overlay
    ExitPrompt,
    /// Final score
    EndScreen,
}

impl Screen {
    /// Overlays are shown on top of the main screen, independently of it
    pub fn is_overlay(&self) -> bool {
        matches!(self, Screen::FullscreenPrompt | Screen::ExitPrompt)
    }

    /// Page element that is shown/hidden for this screen.
    ///
    /// Simulator and sandbox share the simulator container; the sandbox
    /// additionally hides the question area.
    pub fn element(&self) -> ElementId {
        match self {
            Screen::Loading => ElementId::LoadingScreen,
            Screen::FullscreenPrompt => ElementId::FullscreenPrompt,
            Screen::Title => ElementId::TitleScreen,
            Screen::QuestionIntro => ElementId::QuestionIntro,
            Screen::Simulator | Screen::Sandbox => ElementId::SimulatorContainer,
            Screen::ExitPrompt => ElementId::ExitPrompt,
            Screen::EndScreen => ElementId::EndScreen,
        }
    }
}

/// Page element ids the controller touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    LoadingScreen,
    ProgressBar,
    ProgressText,
    FullscreenPrompt,
    TitleScreen,
    QuestionIntro,
    SimulatorContainer,
    QuestionArea,
    FeedbackBox,
    ExitPrompt,
    EndScreen,
    FinalScore,
    ClockLabel,
    // Buttons
    StartButton,
    SandboxButton,
    ContinueButton,
    ExitButton,
    ExitConfirmButton,
    ExitCancelButton,
    RestartButton,
    FullscreenButton,
    FullscreenSkipButton,
}

impl ElementId {
    /// Every id the page is expected to provide
    pub const ALL: [ElementId; 22] = [
        ElementId::LoadingScreen,
        ElementId::ProgressBar,
        ElementId::ProgressText,
        ElementId::FullscreenPrompt,
        ElementId::TitleScreen,
        ElementId::QuestionIntro,
        ElementId::SimulatorContainer,
        ElementId::QuestionArea,
        ElementId::FeedbackBox,
        ElementId::ExitPrompt,
        ElementId::EndScreen,
        ElementId::FinalScore,
        ElementId::ClockLabel,
        ElementId::StartButton,
        ElementId::SandboxButton,
        ElementId::ContinueButton,
        ElementId::ExitButton,
        ElementId::ExitConfirmButton,
        ElementId::ExitCancelButton,
        ElementId::RestartButton,
        ElementId::FullscreenButton,
        ElementId::FullscreenSkipButton,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::LoadingScreen => "loading-screen",
            ElementId::ProgressBar => "progress-bar",
            ElementId::ProgressText => "progress-text",
            ElementId::FullscreenPrompt => "fullscreen-prompt",
            ElementId::TitleScreen => "title-screen",
            ElementId::QuestionIntro => "question-intro",
            ElementId::SimulatorContainer => "simulator-container",
            ElementId::QuestionArea => "question-area",
            ElementId::FeedbackBox => "feedback-box",
            ElementId::ExitPrompt => "exit-prompt",
            ElementId::EndScreen => "end-screen",
            ElementId::FinalScore => "final-score",
            ElementId::ClockLabel => "clock-label",
            ElementId::StartButton => "start-btn",
            ElementId::SandboxButton => "sandbox-btn",
            ElementId::ContinueButton => "continue-btn",
            ElementId::ExitButton => "exit-btn",
            ElementId::ExitConfirmButton => "exit-confirm-btn",
            ElementId::ExitCancelButton => "exit-cancel-btn",
            ElementId::RestartButton => "restart-btn",
            ElementId::FullscreenButton => "fullscreen-btn",
            ElementId::FullscreenSkipButton => "fullscreen-skip-btn",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == s)
    }
}
