//! Browser adapters
//!
//! DOM view, page hooks, image loading and timers for the wasm build.

use std::future::Future;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlImageElement};

use crate::error::AssetError;
use crate::flow::{Collaborators, ElementId, ProbeState, SessionState, View};
use crate::platform::PageHook;
use crate::preload::{AssetLoader, IMAGE_SETS_GLOBAL, ImageSets, Timer};

#[wasm_bindgen(module = "/src/platform/page.js")]
extern "C" {
    fn request_fullscreen() -> bool;
    pub fn fullscreen_active() -> bool;
    fn call_page_hook(name: &str, state: &str) -> bool;
    fn page_image_sets_value() -> JsValue;
}

/// Class that hides an element
const HIDDEN_CLASS: &str = "hidden";
/// Class carried by transient simulator markers
const DECORATION_SELECTOR: &str = ".sim-decoration";

/// View backed by the live document
pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.document.get_element_by_id(id.as_str())
    }

    /// Ids the page is missing, for a startup warning
    pub fn missing_elements(&self) -> Vec<&'static str> {
        ElementId::ALL
            .iter()
            .filter(|id| self.element(**id).is_none())
            .map(|id| id.as_str())
            .collect()
    }
}

impl View for DomView {
    fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(el) = self.element(id) {
            let _ = el.class_list().toggle_with_force(HIDDEN_CLASS, !visible);
        }
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_progress(&mut self, percent: u8) {
        if let Some(el) = self.element(ElementId::ProgressBar) {
            let _ = el.set_attribute("style", &format!("width: {}%", percent));
        }
    }

    fn clear_decorations(&mut self) {
        let Ok(nodes) = self.document.query_selector_all(DECORATION_SELECTOR) else {
            return;
        };
        let mut removed = 0;
        for i in 0..nodes.length() {
            if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                el.remove();
                removed += 1;
            }
        }
        log::debug!("Removed {} decorations", removed);
    }

    fn request_fullscreen(&mut self) -> bool {
        request_fullscreen()
    }
}

/// Forwards collaborator calls to functions the page defines on `window`.
/// Missing functions are skipped.
#[derive(Default)]
pub struct PageHooks;

impl PageHooks {
    fn call<T: serde::Serialize>(&self, hook: PageHook, state: &T) {
        let name = hook.name();
        match serde_json::to_string(state) {
            Ok(json) => {
                if !call_page_hook(name, &json) {
                    log::debug!("Page hook {} not defined", name);
                }
            }
            Err(e) => log::error!("Failed to serialize state for {}: {}", name, e),
        }
    }
}

impl Collaborators for PageHooks {
    fn load_question(&mut self, session: &SessionState) {
        self.call(PageHook::LoadQuestion, session);
    }

    fn refresh_rope(&mut self, probe: &ProbeState) {
        self.call(PageHook::RefreshRope, probe);
    }

    fn update_rope(&mut self, probe: &ProbeState) {
        self.call(PageHook::UpdateRope, probe);
    }

    fn update_image_preview(&mut self, probe: &ProbeState) {
        self.call(PageHook::UpdateImagePreview, probe);
    }
}

/// Loads images through `HtmlImageElement`
#[derive(Default)]
pub struct ImageLoader;

/// Reason reported when an image fires `onerror`
const IMAGE_ERROR: &str = "missing file or network error";

impl AssetLoader for ImageLoader {
    fn load(&self, path: &str) -> impl Future<Output = Result<(), AssetError>> {
        let path = path.to_string();
        async move {
            let img = HtmlImageElement::new().map_err(|e| AssetError::Load {
                path: path.clone(),
                reason: format!("{:?}", e),
            })?;

            // Handlers stay owned here and are freed once the image settles
            let mut handlers = None;
            let promise = js_sys::Promise::new(&mut |resolve, reject| {
                let on_load = Closure::<dyn FnMut(_)>::once(move |_ev: web_sys::Event| {
                    let _ = resolve.call0(&JsValue::UNDEFINED);
                });
                let on_error = Closure::<dyn FnMut(_)>::once(move |_ev: web_sys::Event| {
                    let reason = JsValue::from_str(IMAGE_ERROR);
                    let _ = reject.call1(&JsValue::UNDEFINED, &reason);
                });
                img.set_onload(Some(on_load.as_ref().unchecked_ref()));
                img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
                handlers = Some((on_load, on_error));
            });
            img.set_src(&path);

            let result = JsFuture::from(promise).await;
            img.set_onload(None);
            img.set_onerror(None);
            drop(handlers);

            result.map(|_| ()).map_err(|e| AssetError::Load {
                reason: e.as_string().unwrap_or_else(|| format!("{:?}", e)),
                path,
            })
        }
    }
}

/// `setTimeout` based timer
#[derive(Default)]
pub struct WebTimer;

impl Timer for WebTimer {
    fn sleep(&self, ms: u32) -> impl Future<Output = ()> {
        gloo_timers::future::TimeoutFuture::new(ms)
    }
}

/// Read `imageSetsByAngleAndTail` from the page, if defined
pub fn page_image_sets() -> Option<ImageSets> {
    let value = page_image_sets_value();
    if value.is_undefined() || value.is_null() {
        log::info!("No {} on page", IMAGE_SETS_GLOBAL);
        return None;
    }
    let json = js_sys::JSON::stringify(&value).ok()?.as_string()?;
    match ImageSets::from_json(&json) {
        Ok(sets) => {
            log::info!("Found {} pose images", sets.image_count());
            Some(sets)
        }
        Err(e) => {
            log::error!("{}", e);
            None
        }
    }
}
