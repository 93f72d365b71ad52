//! Screen transitions
//!
//! `step` is pure: it takes the current state and an event and returns the
//! next state plus the effects to apply. Nothing here touches the page.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::screen::{ElementId, Screen};
use super::session::{SessionState, SimMode};
use crate::{degrees_to_clock, normalize_degrees};

/// Discrete user or page action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowEvent {
    /// Preloading finished and the minimum loading time elapsed
    AssetsReady,
    StartClicked,
    SandboxClicked,
    ContinueClicked,
    ExitClicked,
    ExitConfirmed,
    ExitCancelled,
    RestartClicked,
    /// User chose to go fullscreen from the prompt
    FullscreenAccepted,
    /// User dismissed the fullscreen prompt
    FullscreenDeclined,
    /// Browser fullscreen state changed
    FullscreenChanged { active: bool },
    /// Quiz engine ran out of questions
    QuizCompleted { score: u32 },
    /// Probe sweep angle changed (degrees, any range)
    ProbeRotated { deg: f64 },
    /// Probe touched a grid cell
    CellVisited { pos: Vec2 },
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Show(ElementId),
    Hide(ElementId),
    SetText(ElementId, String),
    /// Remove transient markers left in the simulator
    ClearDecorations,
    RequestFullscreen,
    LoadQuestion,
    RefreshRope,
    UpdateRope,
    UpdateImagePreview,
}

/// Complete flow state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    /// Main screen (never an overlay variant)
    pub screen: Screen,
    /// Fullscreen prompt overlay visible
    pub fullscreen_prompt: bool,
    /// Exit prompt overlay visible
    pub exit_prompt: bool,
    /// Whether the fullscreen prompt is offered at all
    pub offer_fullscreen: bool,
    pub session: SessionState,
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FlowState {
    pub fn new(offer_fullscreen: bool) -> Self {
        Self {
            screen: Screen::Loading,
            fullscreen_prompt: false,
            exit_prompt: false,
            offer_fullscreen,
            session: SessionState::default(),
        }
    }

    /// Main screen followed by any visible overlays
    pub fn visible(&self) -> Vec<Screen> {
        let mut screens = vec![self.screen];
        if self.fullscreen_prompt {
            screens.push(Screen::FullscreenPrompt);
        }
        if self.exit_prompt {
            screens.push(Screen::ExitPrompt);
        }
        screens
    }

    fn in_simulator(&self) -> bool {
        matches!(self.screen, Screen::Simulator | Screen::Sandbox)
    }
}

/// Result of one transition
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: FlowState,
    pub effects: Vec<Effect>,
    /// False when the event does not apply to the current state
    pub handled: bool,
}

impl Step {
    fn ignored(state: &FlowState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
            handled: false,
        }
    }
}

/// Effects that bring the simulator view in line with the probe state
fn init_ui(session: &SessionState) -> [Effect; 3] {
    [
        Effect::SetText(
            ElementId::ClockLabel,
            degrees_to_clock(session.probe.sweep_deg as f64).to_string(),
        ),
        Effect::RefreshRope,
        Effect::UpdateImagePreview,
    ]
}

/// Advance the flow by one event
pub fn step(state: &FlowState, event: FlowEvent) -> Step {
    use FlowEvent::*;

    // The exit prompt is modal for everything except its own buttons
    // and fullscreen changes.
    if state.exit_prompt
        && !matches!(
            event,
            ExitConfirmed
                | ExitCancelled
                | FullscreenAccepted
                | FullscreenDeclined
                | FullscreenChanged { .. }
        )
    {
        return Step::ignored(state);
    }

    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        AssetsReady if state.screen == Screen::Loading => {
            next.screen = Screen::Title;
            effects.push(Effect::Hide(ElementId::LoadingScreen));
            effects.push(Effect::Show(ElementId::TitleScreen));
            if state.offer_fullscreen {
                next.fullscreen_prompt = true;
                effects.push(Effect::Show(ElementId::FullscreenPrompt));
            }
        }

        StartClicked if state.screen == Screen::Title => {
            next.session.start_quiz();
            next.screen = Screen::QuestionIntro;
            effects.push(Effect::Hide(ElementId::TitleScreen));
            effects.push(Effect::Show(ElementId::QuestionIntro));
            effects.push(Effect::LoadQuestion);
        }

        SandboxClicked if state.screen == Screen::Title => {
            next.session.mode = SimMode::Sandbox;
            next.screen = Screen::Sandbox;
            effects.push(Effect::Hide(ElementId::TitleScreen));
            effects.push(Effect::Show(ElementId::SimulatorContainer));
            effects.push(Effect::Hide(ElementId::QuestionArea));
            effects.extend(init_ui(&next.session));
        }

        ContinueClicked if state.screen == Screen::QuestionIntro => {
            next.session.mode = SimMode::Simulator;
            next.screen = Screen::Simulator;
            effects.push(Effect::Hide(ElementId::QuestionIntro));
            effects.push(Effect::Hide(ElementId::FeedbackBox));
            effects.push(Effect::Show(ElementId::SimulatorContainer));
            effects.push(Effect::Show(ElementId::QuestionArea));
            effects.extend(init_ui(&next.session));
        }

        ExitClicked if state.in_simulator() => {
            next.exit_prompt = true;
            effects.push(Effect::Show(ElementId::ExitPrompt));
        }

        ExitConfirmed if state.exit_prompt => {
            next.session.reset();
            next.exit_prompt = false;
            next.screen = Screen::Title;
            effects.push(Effect::Hide(ElementId::ExitPrompt));
            effects.push(Effect::Hide(ElementId::SimulatorContainer));
            effects.push(Effect::Show(ElementId::QuestionArea));
            effects.push(Effect::Show(ElementId::TitleScreen));
            effects.push(Effect::UpdateRope);
        }

        ExitCancelled if state.exit_prompt => {
            next.exit_prompt = false;
            effects.push(Effect::Hide(ElementId::ExitPrompt));
        }

        QuizCompleted { score } if state.screen == Screen::Simulator => {
            next.session.score = score;
            next.session.mode = SimMode::Idle;
            next.screen = Screen::EndScreen;
            effects.push(Effect::Hide(ElementId::SimulatorContainer));
            effects.push(Effect::Show(ElementId::EndScreen));
            effects.push(Effect::SetText(ElementId::FinalScore, score.to_string()));
        }

        RestartClicked if state.screen == Screen::EndScreen => {
            next.session.reset();
            next.screen = Screen::Title;
            effects.push(Effect::Hide(ElementId::EndScreen));
            effects.push(Effect::Show(ElementId::TitleScreen));
            effects.push(Effect::UpdateRope);
            effects.push(Effect::ClearDecorations);
        }

        ProbeRotated { deg } if state.in_simulator() => {
            let norm = normalize_degrees(deg);
            next.session.probe.sweep_deg = norm as f32;
            effects.push(Effect::SetText(
                ElementId::ClockLabel,
                degrees_to_clock(norm).to_string(),
            ));
            effects.push(Effect::UpdateRope);
            effects.push(Effect::UpdateImagePreview);
        }

        CellVisited { pos } if state.in_simulator() => {
            next.session.last_cell_pos = Some(pos);
        }

        FullscreenAccepted if state.fullscreen_prompt => {
            next.fullscreen_prompt = false;
            effects.push(Effect::Hide(ElementId::FullscreenPrompt));
            effects.push(Effect::RequestFullscreen);
        }

        FullscreenDeclined if state.fullscreen_prompt => {
            next.fullscreen_prompt = false;
            effects.push(Effect::Hide(ElementId::FullscreenPrompt));
        }

        FullscreenChanged { active: false }
            if state.offer_fullscreen && !state.fullscreen_prompt =>
        {
            next.fullscreen_prompt = true;
            effects.push(Effect::Show(ElementId::FullscreenPrompt));
        }

        FullscreenChanged { active: true } if state.fullscreen_prompt => {
            next.fullscreen_prompt = false;
            effects.push(Effect::Hide(ElementId::FullscreenPrompt));
        }

        _ => return Step::ignored(state),
    }

    Step {
        state: next,
        effects,
        handled: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: &[FlowEvent]) -> FlowState {
        events
            .iter()
            .fold(FlowState::default(), |state, &event| step(&state, event).state)
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = FlowState::default();
        assert_eq!(state.screen, Screen::Loading);
        assert_eq!(state.visible(), vec![Screen::Loading]);
    }

    #[test]
    fn test_assets_ready_shows_title_and_prompt() {
        let step = step(&FlowState::default(), FlowEvent::AssetsReady);
        assert!(step.handled);
        assert_eq!(step.state.screen, Screen::Title);
        assert_eq!(
            step.state.visible(),
            vec![Screen::Title, Screen::FullscreenPrompt]
        );
        assert_eq!(step.effects[0], Effect::Hide(ElementId::LoadingScreen));
    }

    #[test]
    fn test_assets_ready_without_fullscreen_offer() {
        let step = step(&FlowState::new(false), FlowEvent::AssetsReady);
        assert!(!step.state.fullscreen_prompt);
        assert!(!step.effects.contains(&Effect::Show(ElementId::FullscreenPrompt)));
    }

    #[test]
    fn test_start_resets_quiz_and_loads_question() {
        let mut state = run(&[FlowEvent::AssetsReady]);
        state.session.score = 9;
        state.session.current_question_index = 3;
        let step = step(&state, FlowEvent::StartClicked);
        assert_eq!(step.state.screen, Screen::QuestionIntro);
        assert!(step.state.session.game_started);
        assert_eq!(step.state.session.score, 0);
        assert_eq!(step.state.session.current_question_index, 0);
        assert!(step.effects.contains(&Effect::LoadQuestion));
    }

    #[test]
    fn test_continue_enters_simulator() {
        let state = run(&[
            FlowEvent::AssetsReady,
            FlowEvent::StartClicked,
            FlowEvent::ContinueClicked,
        ]);
        assert_eq!(state.screen, Screen::Simulator);
        assert!(state.session.is_simulator_active());
        assert!(!state.session.is_sandbox_active());
    }

    #[test]
    fn test_sandbox_hides_question_area() {
        let state = run(&[FlowEvent::AssetsReady]);
        let step = step(&state, FlowEvent::SandboxClicked);
        assert_eq!(step.state.screen, Screen::Sandbox);
        assert!(step.state.session.is_sandbox_active());
        assert!(step.effects.contains(&Effect::Hide(ElementId::QuestionArea)));
        assert!(step.effects.contains(&Effect::SetText(
            ElementId::ClockLabel,
            "12 o'clock".to_string()
        )));
    }

    #[test]
    fn test_exit_cancel_keeps_previous_screen() {
        let state = run(&[
            FlowEvent::AssetsReady,
            FlowEvent::SandboxClicked,
            FlowEvent::ProbeRotated { deg: 90.0 },
            FlowEvent::ExitClicked,
        ]);
        assert_eq!(state.visible().last(), Some(&Screen::ExitPrompt));

        let step = step(&state, FlowEvent::ExitCancelled);
        assert_eq!(step.state.screen, Screen::Sandbox);
        assert!(!step.state.exit_prompt);
        assert_eq!(step.effects, vec![Effect::Hide(ElementId::ExitPrompt)]);
        assert_eq!(step.state.session.probe.sweep_deg, 90.0);
    }

    #[test]
    fn test_exit_confirm_resets_session() {
        let state = run(&[
            FlowEvent::AssetsReady,
            FlowEvent::StartClicked,
            FlowEvent::ContinueClicked,
            FlowEvent::CellVisited { pos: Vec2::new(3.0, 4.0) },
            FlowEvent::ProbeRotated { deg: -45.0 },
            FlowEvent::ExitClicked,
            FlowEvent::ExitConfirmed,
        ]);
        assert_eq!(state.screen, Screen::Title);
        assert!(!state.exit_prompt);
        assert_eq!(state.session, SessionState::default());
    }

    #[test]
    fn test_exit_confirm_is_idempotent() {
        let state = run(&[
            FlowEvent::AssetsReady,
            FlowEvent::SandboxClicked,
            FlowEvent::ExitClicked,
        ]);
        let first = step(&state, FlowEvent::ExitConfirmed);
        let second = step(&first.state, FlowEvent::ExitConfirmed);
        assert!(!second.handled);
        assert!(second.effects.is_empty());
        assert_eq!(second.state, first.state);
    }

    #[test]
    fn test_exit_prompt_blocks_simulator_input() {
        let state = run(&[
            FlowEvent::AssetsReady,
            FlowEvent::SandboxClicked,
            FlowEvent::ExitClicked,
        ]);
        let step = step(&state, FlowEvent::ProbeRotated { deg: 180.0 });
        assert!(!step.handled);
        assert_eq!(step.state.session.probe.sweep_deg, 0.0);
    }

    #[test]
    fn test_exit_ignored_outside_simulator() {
        let state = run(&[FlowEvent::AssetsReady]);
        assert!(!step(&state, FlowEvent::ExitClicked).handled);
    }

    #[test]
    fn test_quiz_completion_then_restart() {
        let state = run(&[
            FlowEvent::AssetsReady,
            FlowEvent::StartClicked,
            FlowEvent::ContinueClicked,
            FlowEvent::CellVisited { pos: Vec2::ONE },
            FlowEvent::QuizCompleted { score: 8 },
        ]);
        assert_eq!(state.screen, Screen::EndScreen);
        assert_eq!(state.session.score, 8);
        assert_eq!(state.session.mode, SimMode::Idle);

        let step = step(&state, FlowEvent::RestartClicked);
        assert_eq!(step.state.screen, Screen::Title);
        assert_eq!(step.state.session.score, 0);
        assert_eq!(step.state.session.current_question_index, 0);
        assert!(step.state.session.last_cell_pos.is_none());
        assert!(step.effects.contains(&Effect::ClearDecorations));
        assert!(step.effects.contains(&Effect::UpdateRope));
    }

    #[test]
    fn test_probe_rotation_normalizes() {
        let state = run(&[FlowEvent::AssetsReady, FlowEvent::SandboxClicked]);
        let step = step(&state, FlowEvent::ProbeRotated { deg: -90.0 });
        assert_eq!(step.state.session.probe.sweep_deg, 270.0);
        assert_eq!(
            step.effects[0],
            Effect::SetText(ElementId::ClockLabel, "9 o'clock".to_string())
        );
    }

    #[test]
    fn test_fullscreen_prompt_cycle() {
        let state = run(&[FlowEvent::AssetsReady]);
        let accepted = step(&state, FlowEvent::FullscreenAccepted);
        assert!(!accepted.state.fullscreen_prompt);
        assert!(accepted.effects.contains(&Effect::RequestFullscreen));

        let entered = step(&accepted.state, FlowEvent::FullscreenChanged { active: true });
        assert!(!entered.handled);

        let left = step(&entered.state, FlowEvent::FullscreenChanged { active: false });
        assert!(left.state.fullscreen_prompt);
        assert_eq!(left.effects, vec![Effect::Show(ElementId::FullscreenPrompt)]);
    }

    #[test]
    fn test_fullscreen_exit_reprompts_over_exit_prompt() {
        let state = run(&[
            FlowEvent::AssetsReady,
            FlowEvent::FullscreenDeclined,
            FlowEvent::SandboxClicked,
            FlowEvent::ExitClicked,
        ]);
        let step = step(&state, FlowEvent::FullscreenChanged { active: false });
        assert!(step.handled);
        assert_eq!(
            step.state.visible(),
            vec![Screen::Sandbox, Screen::FullscreenPrompt, Screen::ExitPrompt]
        );
    }
}
