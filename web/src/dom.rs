#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, Document, Element, HtmlAnchorElement, HtmlButtonElement, HtmlElement,
    Url, Window,
};

use tiles::color::PadColor;
use tiles::options::GridOption;

use crate::consts::ACTIVE_CLASS;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn set_active(element: &Element, active: bool) -> Result<(), JsValue> {
    if active {
        element.class_list().add_1(ACTIVE_CLASS)
    } else {
        element.class_list().remove_1(ACTIVE_CLASS)
    }
}

pub fn set_visible(element: &HtmlElement, visible: bool, display: &str) -> Result<(), JsValue> {
    element
        .style()
        .set_property("display", if visible { display } else { "none" })
}

/// Button state while a job runs.
pub fn set_loading(button: &HtmlButtonElement, label: &str, loading: bool) {
    button.set_disabled(loading);
    button.set_text_content(Some(label));
}

/// Expose 1% of the window height as `--app-height`; mobile browsers lie
/// about `vh` while their toolbars animate.
pub fn set_app_height(window: &Window, document: &Document) -> Result<(), JsValue> {
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    let Some(root) = document.document_element() else {
        return Ok(());
    };
    let root: HtmlElement = root.dyn_into()?;
    root.style().set_property("--app-height", &format!("{}px", height * 0.01))
}

/// Wrap `bytes` in a blob and return an object URL for it. The caller owns
/// the URL and must revoke it.
pub fn object_url(bytes: &[u8], mime: &str) -> Result<String, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    Url::create_object_url_with_blob(&blob)
}

/// Save `bytes` as `name` through a temporary anchor.
pub fn download(document: &Document, name: &str, mime: &str, bytes: &[u8]) -> Result<(), JsValue> {
    let url = object_url(bytes, mime)?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(name);
    anchor.click();
    Url::revoke_object_url(&url)
}

/// Markup for one card on the "change grid" screen.
#[must_use]
pub fn option_card_html(option: &GridOption, active: bool) -> String {
    let cells = "<div class=\"grid-cell\"></div>".repeat(option.tile_count() as usize);
    let pano = if option.is_panorama() { " pano" } else { "" };
    let active = if active { " active" } else { "" };
    format!(
        "<button class=\"option-card{active}\" data-grid=\"{id}\">\
           <div class=\"grid-preview{pano}\" style=\"grid-template-columns: repeat({cols}, 1fr)\">{cells}</div>\
           <strong>{label}</strong>\
         </button>",
        id = option.id,
        cols = option.cols,
        label = option.label,
    )
}

/// Markup for one pad colour swatch. `data-color` parses back into `color`.
#[must_use]
pub fn color_dot_html(color: PadColor) -> String {
    let value = color.to_string();
    match color {
        PadColor::Rgb(_) => format!(
            "<button class=\"color-dot\" data-color=\"{value}\" title=\"{value}\" style=\"background: {value}\"></button>"
        ),
        PadColor::Auto => format!(
            "<button class=\"color-dot auto\" data-color=\"{value}\" title=\"Match the photo's edges\">A</button>"
        ),
    }
}

/// Walk up from an event target to the nearest ancestor matching `selector`.
pub fn closest(target: Option<web_sys::EventTarget>, selector: &str) -> Option<Element> {
    let target = target?;
    let element = target.dyn_ref::<Element>()?;
    match element.closest(selector) {
        Ok(found) => found,
        Err(_) => None,
    }
}
