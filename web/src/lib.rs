//! Browser front end for the Instagram grid splitter.
//!
//! This crate is compiled to WebAssembly. It owns the DOM: it reads the
//! uploaded file, draws the crop and pad previews, and forwards every user
//! gesture to [`tiles::wizard::WizardCore`]. All image work happens in the
//! `tiles` crate; this layer only applies the [`tiles::wizard::Action`]s the
//! core returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | Element lookup, event wiring and the action dispatcher |
//! | [`dom`] | Small DOM helpers (classes, blobs, downloads) |
//! | [`render`] | Crop and pad preview drawing |
//! | [`view`] | Screen/image coordinate mapping |
//! | [`inapp`] | KakaoTalk in-app browser escape |
//! | [`consts`] | Colours, element ids and timing constants |

pub mod app;
pub mod consts;
pub mod dom;
pub mod inapp;
pub mod render;
pub mod view;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|e| JsValue::from_str(&format!("Failed to init logger: {e}")))?;
    app::run()
}
