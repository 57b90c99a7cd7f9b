//! Scroll, navigation and reveal behavior for a single-page portfolio.
//!
//! Everything outside `frontend` is host-independent state and logic; the
//! `frontend` module binds it to the browser document on `wasm32`.

pub mod behavior;
pub mod chrome;
pub mod config;
pub mod drawer;
pub mod effects;
pub mod error;
pub mod externals;
pub mod logging;
pub mod navigation;
pub mod reveal;
pub mod throttle;
pub mod timers;
pub mod viewport;
pub mod visibility;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub use behavior::{PortfolioBehavior, Task};
pub use config::BehaviorConfig;
pub use error::BehaviorError;

/// Runs when the page loads the wasm module.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    frontend::run();
}
