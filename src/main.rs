//! Probe Trainer entry point
//!
//! Handles platform-specific initialization, wires page buttons to flow
//! events and runs the asset preload.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::Document;

    use probe_trainer::SimConfig;
    use probe_trainer::flow::{
        ElementId, FlowApp, FlowEvent, show_progress, try_dispatch, try_with_app,
    };
    use probe_trainer::platform::web::{
        DomView, ImageLoader, PageHooks, WebTimer, fullscreen_active, page_image_sets,
    };
    use probe_trainer::preload::{PreloadOptions, Preloader, asset_list};

    /// Flow state plus the page it drives
    type App = FlowApp<DomView, PageHooks>;

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    /// Dispatch from outside a click handler (page scripts).
    /// Re-entrant calls from inside a page hook are dropped.
    pub fn dispatch_external(event: FlowEvent) -> bool {
        let app = APP.with(|cell| cell.borrow().clone());
        let Some(app) = app else {
            log::warn!("{:?} before startup", event);
            return false;
        };
        try_dispatch(&app, event)
    }

    /// Current session as JSON, for page scripts
    pub fn session_json() -> String {
        APP.with(|cell| {
            cell.borrow()
                .as_ref()
                .and_then(|app| {
                    let app = app.try_borrow().ok()?;
                    serde_json::to_string(app.flow.session()).ok()
                })
                .unwrap_or_default()
        })
    }

    /// Record a quiz answer from the quiz engine
    pub fn record_answer(correct: bool) {
        let app = APP.with(|cell| cell.borrow().clone());
        let Some(app) = app else {
            return;
        };
        let recorded = try_with_app(&app, |app| {
            let session = app.flow.session_mut();
            if correct {
                session.score += 1;
            }
            session.current_question_index += 1;
        });
        if recorded.is_none() {
            log::warn!("Dropped re-entrant answer");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Probe Trainer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let config = SimConfig::load();
        let view = DomView::new(document.clone());
        let missing = view.missing_elements();
        if !missing.is_empty() {
            log::warn!("Page is missing elements: {}", missing.join(", "));
        }

        let app = Rc::new(RefCell::new(App::new(&config, view, PageHooks)));
        APP.with(|cell| *cell.borrow_mut() = Some(app.clone()));

        setup_buttons(&document, app.clone());
        setup_fullscreen_listener(&document, app.clone());

        // Preload, then leave the loading screen regardless of failures
        let sets = page_image_sets();
        let assets = asset_list(&config.base_assets, sets.as_ref());
        let preloader = Preloader::new(ImageLoader, WebTimer, PreloadOptions::from(&config));
        let report = {
            let app = app.clone();
            preloader
                .run(&assets, move |progress| {
                    try_with_app(&app, |app| show_progress(&mut app.view, progress));
                })
                .await
        };

        if try_with_app(&app, |app| app.finish_preload(&report)).is_none() {
            log::error!("App busy when preloading finished");
        }

        log::info!("Probe Trainer running!");
    }

    fn bind_button(document: &Document, id: ElementId, app: Rc<RefCell<App>>, event: FlowEvent) {
        let Some(btn) = document.get_element_by_id(id.as_str()) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            try_dispatch(&app, event);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        let bindings = [
            (ElementId::StartButton, FlowEvent::StartClicked),
            (ElementId::SandboxButton, FlowEvent::SandboxClicked),
            (ElementId::ContinueButton, FlowEvent::ContinueClicked),
            (ElementId::ExitButton, FlowEvent::ExitClicked),
            (ElementId::ExitConfirmButton, FlowEvent::ExitConfirmed),
            (ElementId::ExitCancelButton, FlowEvent::ExitCancelled),
            (ElementId::RestartButton, FlowEvent::RestartClicked),
            (ElementId::FullscreenButton, FlowEvent::FullscreenAccepted),
            (ElementId::FullscreenSkipButton, FlowEvent::FullscreenDeclined),
        ];
        for (id, event) in bindings {
            bind_button(document, id, app.clone(), event);
        }
    }

    fn setup_fullscreen_listener(document: &Document, app: Rc<RefCell<App>>) {
        // Safari still fires only the prefixed event
        for name in ["fullscreenchange", "webkitfullscreenchange"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let active = fullscreen_active();
                if !active {
                    log::info!("Fullscreen exited");
                }
                try_dispatch(&app, FlowEvent::FullscreenChanged { active });
            });
            let _ =
                document.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

/// Called by the quiz engine after each answer
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = recordAnswer)]
pub fn record_answer(correct: bool) {
    wasm_app::record_answer(correct);
}

/// Called by the quiz engine when the last question is answered
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = quizCompleted)]
pub fn quiz_completed(score: u32) -> bool {
    wasm_app::dispatch_external(probe_trainer::FlowEvent::QuizCompleted { score })
}

/// Called by the rope renderer when the probe turns
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = probeRotated)]
pub fn probe_rotated(deg: f64) -> bool {
    wasm_app::dispatch_external(probe_trainer::FlowEvent::ProbeRotated { deg })
}

/// Called by the rope renderer when the probe enters a grid cell
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = cellVisited)]
pub fn cell_visited(x: f32, y: f32) -> bool {
    wasm_app::dispatch_external(probe_trainer::FlowEvent::CellVisited {
        pos: glam::Vec2::new(x, y),
    })
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = degreesToClock)]
pub fn degrees_to_clock(deg: f64) -> String {
    probe_trainer::degrees_to_clock(deg).to_string()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = sessionState)]
pub fn session_state() -> String {
    wasm_app::session_json()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Probe Trainer (native) starting...");
    log::info!("The simulator runs in the browser - run with `trunk serve` for the web version");

    println!("\nClock labels:");
    for deg in (0..360).step_by(30) {
        println!("  {:>3}° -> {}", deg, probe_trainer::degrees_to_clock(deg as f64));
    }

    println!("\nScripted session:");
    scripted_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk the flow through a full quiz run, printing every effect
#[cfg(not(target_arch = "wasm32"))]
fn scripted_session() {
    use probe_trainer::flow::{
        Collaborators, ElementId, FlowController, FlowEvent, ProbeState, SessionState, View,
    };

    struct PrintView;

    impl View for PrintView {
        fn set_visible(&mut self, id: ElementId, visible: bool) {
            println!("  {} #{}", if visible { "show" } else { "hide" }, id.as_str());
        }
        fn set_text(&mut self, id: ElementId, text: &str) {
            println!("  text #{} = {:?}", id.as_str(), text);
        }
        fn set_progress(&mut self, percent: u8) {
            println!("  progress {}%", percent);
        }
        fn clear_decorations(&mut self) {
            println!("  clear decorations");
        }
        fn request_fullscreen(&mut self) -> bool {
            false
        }
    }

    impl Collaborators for PrintView {
        fn load_question(&mut self, session: &SessionState) {
            println!("  load question {}", session.current_question_index);
        }
        fn refresh_rope(&mut self, _probe: &ProbeState) {
            println!("  refresh rope");
        }
        fn update_rope(&mut self, probe: &ProbeState) {
            println!("  update rope at {}°", probe.sweep_deg);
        }
        fn update_image_preview(&mut self, probe: &ProbeState) {
            println!("  image preview view {}", probe.current_view_index);
        }
    }

    let mut flow = FlowController::default();
    let mut view = PrintView;
    let mut hooks = PrintView;
    let script = [
        FlowEvent::AssetsReady,
        FlowEvent::FullscreenDeclined,
        FlowEvent::StartClicked,
        FlowEvent::ContinueClicked,
        FlowEvent::ProbeRotated { deg: 95.0 },
        FlowEvent::QuizCompleted { score: 4 },
        FlowEvent::RestartClicked,
    ];
    for event in script {
        println!("{:?}", event);
        flow.dispatch(event, &mut view, &mut hooks);
    }
    println!("Final screen: {:?}", flow.state().screen);
}
