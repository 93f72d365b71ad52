//! Flow controller and the page boundary
//!
//! The controller owns the flow state. Everything that touches the page goes
//! through `View` (element visibility, text) or `Collaborators` (quiz engine,
//! rope renderer, image preview), so the whole flow runs in tests without a
//! browser.

use std::cell::RefCell;

use super::screen::ElementId;
use super::session::{ProbeState, SessionState};
use super::transition::{Effect, FlowEvent, FlowState, step};
use crate::config::SimConfig;
use crate::preload::{LoadProgress, PreloadReport};

/// Page elements as seen by the controller
pub trait View {
    fn set_visible(&mut self, id: ElementId, visible: bool);
    fn set_text(&mut self, id: ElementId, text: &str);
    /// Update the loading bar (0-100)
    fn set_progress(&mut self, percent: u8);
    /// Remove transient simulator markers
    fn clear_decorations(&mut self);
    /// Returns false when the browser has no fullscreen API
    fn request_fullscreen(&mut self) -> bool;
}

/// Features implemented outside this crate
pub trait Collaborators {
    fn load_question(&mut self, session: &SessionState);
    fn refresh_rope(&mut self, probe: &ProbeState);
    fn update_rope(&mut self, probe: &ProbeState);
    fn update_image_preview(&mut self, probe: &ProbeState);
}

/// Apply transition effects in order
pub fn apply_effects<V: View, C: Collaborators>(
    effects: &[Effect],
    session: &SessionState,
    view: &mut V,
    collaborators: &mut C,
) {
    for effect in effects {
        match effect {
            Effect::Show(id) => view.set_visible(*id, true),
            Effect::Hide(id) => view.set_visible(*id, false),
            Effect::SetText(id, text) => view.set_text(*id, text),
            Effect::ClearDecorations => view.clear_decorations(),
            Effect::RequestFullscreen => {
                if !view.request_fullscreen() {
                    log::debug!("Fullscreen API unavailable");
                }
            }
            Effect::LoadQuestion => collaborators.load_question(session),
            Effect::RefreshRope => collaborators.refresh_rope(&session.probe),
            Effect::UpdateRope => collaborators.update_rope(&session.probe),
            Effect::UpdateImagePreview => collaborators.update_image_preview(&session.probe),
        }
    }
}

/// Show preload progress on the loading screen
pub fn show_progress<V: View>(view: &mut V, progress: LoadProgress) {
    let percent = progress.percent();
    view.set_progress(percent);
    view.set_text(ElementId::ProgressText, &format!("{}%", percent));
}

/// Owns the flow state and applies transitions
#[derive(Debug, Clone, Default)]
pub struct FlowController {
    state: FlowState,
}

impl FlowController {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            state: FlowState::new(config.show_fullscreen_prompt),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn session(&self) -> &SessionState {
        &self.state.session
    }

    /// Mutable session access for collaborators (quiz scoring, question advance)
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.state.session
    }

    /// Handle one event. Returns false if the event did not apply.
    pub fn dispatch<V: View, C: Collaborators>(
        &mut self,
        event: FlowEvent,
        view: &mut V,
        collaborators: &mut C,
    ) -> bool {
        let step = step(&self.state, event);
        if !step.handled {
            log::debug!("Ignored {:?} on {:?}", event, self.state.screen);
            return false;
        }

        if step.state.screen != self.state.screen {
            log::info!("Screen {:?} -> {:?}", self.state.screen, step.state.screen);
        }
        self.state = step.state;
        apply_effects(&step.effects, &self.state.session, view, collaborators);
        true
    }
}

/// Controller bundled with the page it drives
pub struct FlowApp<V, C> {
    pub flow: FlowController,
    pub view: V,
    pub hooks: C,
}

impl<V: View, C: Collaborators> FlowApp<V, C> {
    pub fn new(config: &SimConfig, view: V, hooks: C) -> Self {
        Self {
            flow: FlowController::new(config),
            view,
            hooks,
        }
    }

    pub fn dispatch(&mut self, event: FlowEvent) -> bool {
        self.flow.dispatch(event, &mut self.view, &mut self.hooks)
    }

    /// Leave the loading screen once preloading is done
    pub fn finish_preload(&mut self, report: &PreloadReport) -> bool {
        if report.total == 0 {
            show_progress(&mut self.view, LoadProgress::new(0));
        }
        if !report.all_succeeded() {
            log::warn!("Missing assets: {}", report.failed.join(", "));
        }
        self.dispatch(FlowEvent::AssetsReady)
    }
}

/// Run `f` on a shared app unless it is already borrowed.
///
/// Page hooks run while the app is mutably borrowed; a hook that clicks a
/// button lands back here and is dropped instead of panicking.
pub fn try_with_app<V, C, R>(
    app: &RefCell<FlowApp<V, C>>,
    f: impl FnOnce(&mut FlowApp<V, C>) -> R,
) -> Option<R> {
    match app.try_borrow_mut() {
        Ok(mut app) => Some(f(&mut app)),
        Err(_) => None,
    }
}

/// Dispatch on a shared app, dropping re-entrant events
pub fn try_dispatch<V: View, C: Collaborators>(
    app: &RefCell<FlowApp<V, C>>,
    event: FlowEvent,
) -> bool {
    try_with_app(app, |app| app.dispatch(event)).unwrap_or_else(|| {
        log::warn!("Dropped re-entrant {:?}", event);
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Screen;
    use std::rc::{Rc, Weak};

    #[derive(Default)]
    struct Calls {
        view: Vec<String>,
        hooks: Vec<String>,
    }

    impl View for Calls {
        fn set_visible(&mut self, id: ElementId, visible: bool) {
            self.view.push(format!("{}={}", id.as_str(), visible));
        }
        fn set_text(&mut self, id: ElementId, text: &str) {
            self.view.push(format!("{}:{}", id.as_str(), text));
        }
        fn set_progress(&mut self, percent: u8) {
            self.view.push(format!("progress {}", percent));
        }
        fn clear_decorations(&mut self) {
            self.view.push("clear".into());
        }
        fn request_fullscreen(&mut self) -> bool {
            self.view.push("fullscreen".into());
            false
        }
    }

    impl Collaborators for Calls {
        fn load_question(&mut self, session: &SessionState) {
            self.hooks.push(format!("question {}", session.current_question_index));
        }
        fn refresh_rope(&mut self, _probe: &ProbeState) {
            self.hooks.push("refresh".into());
        }
        fn update_rope(&mut self, probe: &ProbeState) {
            self.hooks.push(format!("rope {}", probe.sweep_deg));
        }
        fn update_image_preview(&mut self, probe: &ProbeState) {
            self.hooks.push(format!("preview {}", probe.current_view_index));
        }
    }

    #[test]
    fn test_apply_effects_in_order() {
        let mut view = Calls::default();
        let mut hooks = Calls::default();
        apply_effects(
            &[
                Effect::Hide(ElementId::TitleScreen),
                Effect::Show(ElementId::QuestionIntro),
                Effect::LoadQuestion,
            ],
            &SessionState::default(),
            &mut view,
            &mut hooks,
        );
        assert_eq!(view.view, vec!["title-screen=false", "question-intro=true"]);
        assert_eq!(hooks.hooks, vec!["question 0"]);
    }

    #[test]
    fn test_missing_fullscreen_api_is_silent() {
        let mut view = Calls::default();
        let mut hooks = Calls::default();
        apply_effects(
            &[Effect::RequestFullscreen],
            &SessionState::default(),
            &mut view,
            &mut hooks,
        );
        assert_eq!(view.view, vec!["fullscreen"]);
    }

    #[test]
    fn test_dispatch_ignored_event_has_no_effects() {
        let mut controller = FlowController::default();
        let mut view = Calls::default();
        let mut hooks = Calls::default();
        assert!(!controller.dispatch(FlowEvent::StartClicked, &mut view, &mut hooks));
        assert!(view.view.is_empty());
        assert_eq!(controller.state().screen, Screen::Loading);
    }

    #[test]
    fn test_dispatch_rotation_updates_rope_with_new_pose() {
        let mut controller = FlowController::default();
        let mut view = Calls::default();
        let mut hooks = Calls::default();
        controller.dispatch(FlowEvent::AssetsReady, &mut view, &mut hooks);
        controller.dispatch(FlowEvent::SandboxClicked, &mut view, &mut hooks);
        controller.dispatch(FlowEvent::ProbeRotated { deg: 450.0 }, &mut view, &mut hooks);
        assert_eq!(hooks.hooks.last().map(String::as_str), Some("preview 0"));
        assert!(hooks.hooks.contains(&"rope 90".to_string()));
        assert_eq!(view.view.last().map(String::as_str), Some("clock-label:3 o'clock"));
    }

    /// Hooks that click another button from inside `load_question`
    struct ClickingHooks {
        app: Weak<RefCell<FlowApp<Calls, ClickingHooks>>>,
        nested: Vec<bool>,
    }

    impl Collaborators for ClickingHooks {
        fn load_question(&mut self, _session: &SessionState) {
            if let Some(app) = self.app.upgrade() {
                self.nested.push(try_dispatch(&app, FlowEvent::ContinueClicked));
            }
        }
        fn refresh_rope(&mut self, _probe: &ProbeState) {}
        fn update_rope(&mut self, _probe: &ProbeState) {}
        fn update_image_preview(&mut self, _probe: &ProbeState) {}
    }

    #[test]
    fn test_reentrant_dispatch_from_hook_is_dropped() {
        let app = Rc::new(RefCell::new(FlowApp::new(
            &SimConfig::default(),
            Calls::default(),
            ClickingHooks {
                app: Weak::new(),
                nested: Vec::new(),
            },
        )));
        app.borrow_mut().hooks.app = Rc::downgrade(&app);

        assert!(try_dispatch(&app, FlowEvent::AssetsReady));
        assert!(try_dispatch(&app, FlowEvent::StartClicked));

        let app = app.borrow();
        assert_eq!(app.hooks.nested, vec![false]);
        assert_eq!(app.flow.state().screen, Screen::QuestionIntro);
    }

    #[test]
    fn test_try_with_app_while_borrowed() {
        let app = RefCell::new(FlowApp::new(
            &SimConfig::default(),
            Calls::default(),
            Calls::default(),
        ));
        let _held = app.borrow();
        assert_eq!(try_with_app(&app, |_| ()), None);
        assert!(!try_dispatch(&app, FlowEvent::AssetsReady));
    }

    #[test]
    fn test_finish_preload_with_empty_list_fills_bar() {
        let mut app = FlowApp::new(&SimConfig::default(), Calls::default(), Calls::default());
        assert!(app.finish_preload(&PreloadReport::default()));
        assert_eq!(app.view.view[..2], ["progress 100", "progress-text:100%"]);
        assert_eq!(app.flow.state().screen, Screen::Title);
    }

    #[test]
    fn test_finish_preload_keeps_bar_after_real_batch() {
        let mut app = FlowApp::new(&SimConfig::default(), Calls::default(), Calls::default());
        let report = PreloadReport {
            total: 2,
            loaded: 2,
            failed: vec!["img/a.png".into()],
        };
        assert!(app.finish_preload(&report));
        assert!(!app.view.view.iter().any(|c| c.starts_with("progress")));
        assert_eq!(app.flow.state().screen, Screen::Title);
    }

    #[test]
    fn test_show_progress_sets_bar_and_text() {
        let mut view = Calls::default();
        show_progress(&mut view, LoadProgress { loaded: 1, total: 3 });
        assert_eq!(view.view, vec!["progress 33", "progress-text:33%"]);
    }
}
