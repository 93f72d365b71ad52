//! Platform abstraction layer
//!
//! Browser implementations of the flow `View`/`Collaborators` boundary and
//! the preloader's `AssetLoader`/`Timer`. Native builds have none; tests
//! supply their own fakes.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Page functions the collaborators forward to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageHook {
    LoadQuestion,
    RefreshRope,
    UpdateRope,
    UpdateImagePreview,
}

impl PageHook {
    pub const ALL: [PageHook; 4] = [
        PageHook::LoadQuestion,
        PageHook::RefreshRope,
        PageHook::UpdateRope,
        PageHook::UpdateImagePreview,
    ];

    /// Global function name on the page
    pub fn name(&self) -> &'static str {
        match self {
            PageHook::LoadQuestion => "loadQuestion",
            PageHook::RefreshRope => "refreshRope",
            PageHook::UpdateRope => "updateRope",
            PageHook::UpdateImagePreview => "updateImagePreview",
        }
    }
}
