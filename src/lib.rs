//! QuickDraw Duel front-end crate.
//!
//! Browser drawing game client: the player gets a prompt (an object name plus
//! emoji), sketches it on a canvas before the clock runs out, and a remote
//! classifier guesses the drawing through a small JSON HTTP contract. All
//! recognition happens server-side; this crate is canvas capture, screen
//! state, timers, and the wire client. Pure logic (stroke model, clocks,
//! phase machine, verdict text) is kept off `web-sys` so it runs under native
//! `cargo test`.

use wasm_bindgen::prelude::*;

pub mod api;
pub mod game;
pub mod sketch;
pub mod verdict;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Entry point called from `index.html` once the module has loaded. Wires the
/// screens, canvas, and buttons, and starts the frame loop.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start()
}
