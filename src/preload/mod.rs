//! Asset preloading
//!
//! Every asset is requested at once; completions are counted as they arrive
//! and reported through a progress callback. A failed asset counts as
//! completed: one missing image must never keep the app on the loading
//! screen. The batch finishes when every attempt is done *and* a minimum
//! display time has passed, whichever comes last.

pub mod manifest;
pub mod progress;

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};

pub use manifest::{IMAGE_SETS_GLOBAL, ImageSets, asset_list};
pub use progress::LoadProgress;

use crate::config::SimConfig;
use crate::error::AssetError;

/// Fetches a single asset
pub trait AssetLoader {
    fn load(&self, path: &str) -> impl Future<Output = Result<(), AssetError>>;
}

/// Async delay source
pub trait Timer {
    fn sleep(&self, ms: u32) -> impl Future<Output = ()>;
}

/// Preload timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadOptions {
    /// Floor on total preload time (ms)
    pub min_duration_ms: u32,
    /// Pause after each completion so the progress bar animates (ms)
    pub step_delay_ms: u32,
}

impl From<&SimConfig> for PreloadOptions {
    fn from(config: &SimConfig) -> Self {
        Self {
            min_duration_ms: config.min_load_ms,
            step_delay_ms: config.step_delay_ms,
        }
    }
}

/// Outcome of a preload batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadReport {
    pub total: usize,
    /// Finished attempts; equals `total` once the batch resolves
    pub loaded: usize,
    /// Paths that failed to load
    pub failed: Vec<String>,
}

impl PreloadReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs preload batches against a loader and a timer
pub struct Preloader<L, T> {
    loader: L,
    timer: T,
    options: PreloadOptions,
}

impl<L: AssetLoader, T: Timer> Preloader<L, T> {
    pub fn new(loader: L, timer: T, options: PreloadOptions) -> Self {
        Self {
            loader,
            timer,
            options,
        }
    }

    pub fn options(&self) -> PreloadOptions {
        self.options
    }

    /// Load every asset, calling `on_progress` after each completion.
    ///
    /// An empty list resolves immediately without waiting for the floor.
    pub async fn run<F>(&self, assets: &[String], mut on_progress: F) -> PreloadReport
    where
        F: FnMut(LoadProgress),
    {
        if assets.is_empty() {
            log::info!("No assets to preload");
            return PreloadReport::default();
        }

        let total = assets.len();
        log::info!("Preloading {} assets", total);

        let loads = async {
            let mut progress = LoadProgress::new(total);
            let mut failed = Vec::new();
            let mut pending: FuturesUnordered<_> =
                assets.iter().map(|path| self.loader.load(path)).collect();

            while let Some(result) = pending.next().await {
                if let Err(e) = result {
                    log::warn!("{}", e);
                    failed.push(e.path().to_string());
                }
                progress.record();
                on_progress(progress);

                if self.options.step_delay_ms > 0 {
                    self.timer.sleep(self.options.step_delay_ms).await;
                }
            }
            (progress, failed)
        };

        let ((progress, failed), ()) =
            futures::join!(loads, self.timer.sleep(self.options.min_duration_ms));

        if failed.is_empty() {
            log::info!("Preloaded {} assets", progress.loaded);
        } else {
            log::warn!(
                "Preloaded {} assets, {} failed",
                progress.loaded,
                failed.len()
            );
        }

        PreloadReport {
            total,
            loaded: progress.loaded,
            failed,
        }
    }
}
