#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, FileReader,
    HtmlAnchorElement, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlImageElement,
    HtmlInputElement, PointerEvent, Url, WheelEvent, Window,
};

use tiles::color::{PRESET_PAD_COLORS, PadColor};
use tiles::consts::{CROP_ZOOM_STEP, TILE_MIME};
use tiles::geometry::{self, Rect};
use tiles::wizard::{Action, FitMode, Job, Step, WizardCore};

use crate::consts::{
    ESCAPE_CLOSE_DELAY_MS, STEP_CROP_ID, STEP_OPTIONS_ID, STEP_RESULT_ID, STEP_UPLOAD_ID,
    WHEEL_NOTCH_PX,
};
use crate::dom::{self, get_element};
use crate::inapp;
use crate::render::{self, Surface};
use crate::view::{Point, Viewport, wheel_zoom_factor};

type Shared = Rc<RefCell<Host>>;

/// Every element the wizard touches, looked up once at start.
struct Elements {
    window: Window,
    document: Document,
    steps: [(Step, HtmlElement); 4],
    upload_button: HtmlButtonElement,
    image_loader: HtmlInputElement,
    source_preview: HtmlImageElement,
    crop_heading: Element,
    crop_canvas: HtmlCanvasElement,
    fit_toggle: HtmlButtonElement,
    color_picker: HtmlElement,
    change_grid_button: HtmlButtonElement,
    split_button: HtmlButtonElement,
    option_group: HtmlElement,
    back_button: HtmlButtonElement,
    grid_result: HtmlElement,
    zip_button: HtmlButtonElement,
    restart_button: HtmlButtonElement,
    status: HtmlElement,
}

impl Elements {
    fn find(window: Window, document: Document) -> Result<Self, JsValue> {
        let steps = [
            (Step::Upload, get_element(&document, STEP_UPLOAD_ID)?),
            (Step::Crop, get_element(&document, STEP_CROP_ID)?),
            (Step::Options, get_element(&document, STEP_OPTIONS_ID)?),
            (Step::Result, get_element(&document, STEP_RESULT_ID)?),
        ];
        Ok(Self {
            steps,
            upload_button: get_element(&document, "uploadButton")?,
            image_loader: get_element(&document, "imageLoader")?,
            source_preview: get_element(&document, "sourcePreview")?,
            crop_heading: get_element(&document, "cropHeadingText")?,
            crop_canvas: get_element(&document, "cropCanvas")?,
            fit_toggle: get_element(&document, "fitFillToggleButton")?,
            color_picker: get_element(&document, "colorPickerGroup")?,
            change_grid_button: get_element(&document, "changeGridButton")?,
            split_button: get_element(&document, "cropAndSplitButton")?,
            option_group: get_element(&document, "optionGroup")?,
            back_button: get_element(&document, "backToCropButton")?,
            grid_result: get_element(&document, "gridResultContainer")?,
            zip_button: get_element(&document, "zipDownloadButton")?,
            restart_button: get_element(&document, "restartButton")?,
            status: get_element(&document, "statusText")?,
            window,
            document,
        })
    }

    fn job_button(&self, job: Job) -> &HtmlButtonElement {
        match job {
            Job::Split => &self.split_button,
            Job::DownloadAll => &self.zip_button,
        }
    }
}

/// An in-progress crop box drag.
#[derive(Debug, Clone, Copy)]
struct Drag {
    start: Point,
    crop: Rect,
}

/// Browser-side state wrapped around the wizard core.
struct Host {
    core: WizardCore,
    el: Elements,
    ctx: CanvasRenderingContext2d,
    /// Decoded copy of the upload for drawing previews.
    preview: Option<HtmlImageElement>,
    source_url: Option<String>,
    tile_urls: Vec<String>,
    viewport: Viewport,
    drag: Option<Drag>,
}

impl Host {
    fn apply(&mut self, action: Action) -> Result<(), JsValue> {
        if let Some(text) = status_for(&action) {
            self.el.status.set_text_content(Some(text));
        }
        match action {
            Action::GoTo(step) => {
                for (id, element) in &self.el.steps {
                    dom::set_active(element, *id == step)?;
                }
                self.redraw()
            }
            Action::ImageLoaded(size) => {
                log::info!("image loaded: {}x{}", size.width, size.height);
                Ok(())
            }
            Action::GridSelected(option) => {
                self.el.crop_heading.set_text_content(Some(&format!("\"{}\"", option.label)));
                self.redraw()
            }
            Action::ShowOptions { options, active } => {
                let html: String = options
                    .iter()
                    .map(|option| dom::option_card_html(option, option.id == active))
                    .collect();
                self.el.option_group.set_inner_html(&html);
                Ok(())
            }
            Action::CropChanged(_) => self.redraw(),
            Action::FitModeChanged(mode) => {
                let crop = mode == FitMode::Crop;
                self.el
                    .fit_toggle
                    .set_text_content(Some(if crop { "✂️ Crop" } else { "⬜️ Pad with color" }));
                dom::set_active(&self.el.fit_toggle, crop)?;
                dom::set_visible(&self.el.color_picker, !crop, "flex")?;
                self.redraw()
            }
            Action::PadColorChanged(color) => {
                self.mark_swatch(color)?;
                self.redraw()
            }
            Action::TilesReady { cols, count } => self.show_tiles(cols, count),
            Action::Busy(job) => {
                dom::set_loading(self.el.job_button(job), job.busy_label(), true);
                Ok(())
            }
            Action::Idle(job) => {
                dom::set_loading(self.el.job_button(job), job.idle_label(), false);
                Ok(())
            }
            Action::Download { name, mime, bytes } => {
                dom::download(&self.el.document, &name, mime, &bytes)
            }
            Action::Failed(message) => {
                log::error!("{message}");
                Ok(())
            }
            Action::Reset => self.reset(),
            Action::Schedule(job) => {
                log::warn!("unscheduled job {job:?}");
                Ok(())
            }
        }
    }

    fn mark_swatch(&self, color: PadColor) -> Result<(), JsValue> {
        let dots = self.el.color_picker.query_selector_all(".color-dot")?;
        for i in 0..dots.length() {
            let Some(node) = dots.item(i) else {
                continue;
            };
            let Some(dot) = node.dyn_ref::<Element>() else {
                continue;
            };
            let matches = dot
                .get_attribute("data-color")
                .is_some_and(|c| c.parse::<PadColor>().is_ok_and(|c| c == color));
            dom::set_active(dot, matches)?;
        }
        Ok(())
    }

    fn revoke_tile_urls(&mut self) -> Result<(), JsValue> {
        for url in self.tile_urls.drain(..) {
            Url::revoke_object_url(&url)?;
        }
        Ok(())
    }

    fn show_tiles(&mut self, cols: u32, count: usize) -> Result<(), JsValue> {
        self.revoke_tile_urls()?;
        let grid = &self.el.grid_result;
        grid.set_inner_html("");
        grid.style()
            .set_property("grid-template-columns", &format!("repeat({cols}, 1fr)"))?;

        let mut urls = Vec::with_capacity(count);
        for tile in self.core.tiles() {
            let url = dom::object_url(&tile.png, TILE_MIME)?;
            let link: HtmlAnchorElement = self.el.document.create_element("a")?.dyn_into()?;
            link.set_href(&url);
            link.set_download(&tile.name);
            link.set_target("_blank");
            link.set_title(&format!("Click to save {}", tile.name));
            let img: HtmlImageElement = self.el.document.create_element("img")?.dyn_into()?;
            img.set_src(&url);
            img.set_alt(&tile.name);
            link.append_child(&img)?;
            grid.append_child(&link)?;
            urls.push(url);
        }
        self.tile_urls = urls;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), JsValue> {
        self.revoke_tile_urls()?;
        if let Some(url) = self.source_url.take() {
            Url::revoke_object_url(&url)?;
        }
        self.preview = None;
        self.drag = None;
        self.el.image_loader.set_value("");
        self.el.source_preview.set_src("");
        self.el.grid_result.set_inner_html("");
        render::clear(&self.ctx, self.el.crop_canvas.width(), self.el.crop_canvas.height());
        Ok(())
    }

    /// Match the canvas backing store to its CSS box.
    fn fit_canvas(&self) -> Surface {
        let canvas = &self.el.crop_canvas;
        let rect = canvas.get_bounding_client_rect();
        let dpr = self.el.window.device_pixel_ratio();
        let width = (rect.width() * dpr).round().max(0.0) as u32;
        let height = (rect.height() * dpr).round().max(0.0) as u32;
        if canvas.width() != width {
            canvas.set_width(width);
        }
        if canvas.height() != height {
            canvas.set_height(height);
        }
        Surface { width: rect.width(), height: rect.height(), dpr }
    }

    fn redraw(&mut self) -> Result<(), JsValue> {
        if self.core.step() != Step::Crop {
            return Ok(());
        }
        let (Some(img), Some(image), Some(option)) =
            (self.preview.as_ref(), self.core.image(), self.core.option().copied())
        else {
            return Ok(());
        };
        if !img.complete() || img.natural_width() == 0 {
            return Ok(());
        }
        let size = tiles::raster::size_of(image);
        let surface = self.fit_canvas();

        match self.core.fit_mode() {
            FitMode::Crop => {
                if let Some(crop) = self.core.crop() {
                    self.viewport = render::draw_crop(&self.ctx, img, size, crop, &option, surface)?;
                }
            }
            FitMode::Pad => {
                let placement = geometry::pad_placement(size, option.target_ratio)
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                let fill = PadColor::Rgb(self.core.pad_color().resolve(image).0).to_string();
                render::draw_pad(&self.ctx, img, size, placement, &fill, &option, surface)?;
            }
        }
        Ok(())
    }

    fn canvas_point(&self, event: &PointerEvent) -> Point {
        let rect = self.el.crop_canvas.get_bounding_client_rect();
        Point::new(
            f64::from(event.client_x()) - rect.left(),
            f64::from(event.client_y()) - rect.top(),
        )
    }
}

// =============================================================
// Action dispatch
// =============================================================

/// New text for the status line after `action`, if it changes. Failures stay
/// up until the user moves on or starts another job.
fn status_for(action: &Action) -> Option<&str> {
    match action {
        Action::Failed(message) => Some(message.as_str()),
        Action::GoTo(_) | Action::Busy(_) | Action::Reset => Some(""),
        _ => None,
    }
}

/// Apply `actions` in order. Jobs are deferred to the next task so the busy
/// label paints before the work blocks the thread.
fn dispatch(shared: &Shared, actions: Vec<Action>) {
    for action in actions {
        if let Action::Schedule(job) = action {
            schedule(shared, job);
            continue;
        }
        if let Err(e) = shared.borrow_mut().apply(action) {
            log::error!("failed to update view: {e:?}");
        }
    }
}

fn schedule(shared: &Shared, job: Job) {
    let window = shared.borrow().el.window.clone();
    let shared_cb = shared.clone();
    let callback = Closure::once_into_js(move || {
        let actions = shared_cb.borrow_mut().core.run(job);
        dispatch(&shared_cb, actions);
    });
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
    {
        log::error!("failed to schedule {job:?}: {e:?}");
        let actions = shared.borrow_mut().core.run(job);
        dispatch(shared, actions);
    }
}

/// Run a wizard operation and apply what it returns.
fn with_core(shared: &Shared, op: impl FnOnce(&mut WizardCore) -> Vec<Action>) {
    let actions = op(&mut shared.borrow_mut().core);
    dispatch(shared, actions);
}

// =============================================================
// Event handlers
// =============================================================

fn listen(
    target: &EventTarget,
    event: &str,
    shared: &Shared,
    handler: fn(&Shared, Event),
) -> Result<(), JsValue> {
    let shared = shared.clone();
    let closure = Closure::<dyn FnMut(Event)>::new(move |e: Event| handler(&shared, e));
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_upload_click(shared: &Shared, _: Event) {
    shared.borrow().el.image_loader.click();
}

fn on_image_change(shared: &Shared, _: Event) {
    if shared.borrow().core.is_busy() {
        return;
    }
    let input = shared.borrow().el.image_loader.clone();
    let Some(file) = input.files().and_then(|list| list.get(0)) else {
        return;
    };
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            log::error!("FileReader unavailable: {e:?}");
            return;
        }
    };

    let mime = file.type_();
    let reader_cb = reader.clone();
    let shared_cb = shared.clone();
    let onload = Closure::once_into_js(move |_: Event| {
        match reader_cb.result() {
            Ok(buffer) => {
                let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                load_bytes(&shared_cb, &bytes, &mime);
            }
            Err(e) => log::error!("failed to read file: {e:?}"),
        }
    });
    reader.set_onload(Some(onload.unchecked_ref()));
    if let Err(e) = reader.read_as_array_buffer(&file) {
        log::error!("failed to start reading file: {e:?}");
    }
}

/// Hand an uploaded file to the core and, if it decodes, to the preview.
fn load_bytes(shared: &Shared, bytes: &[u8], mime: &str) {
    let actions = shared.borrow_mut().core.load_image(bytes);
    if actions.iter().any(|a| matches!(a, Action::Failed(_))) {
        dispatch(shared, actions);
        return;
    }

    if let Err(e) = attach_preview(shared, bytes, mime) {
        log::error!("failed to build preview: {e:?}");
    }
    dispatch(shared, actions);
}

fn attach_preview(shared: &Shared, bytes: &[u8], mime: &str) -> Result<(), JsValue> {
    let url = dom::object_url(bytes, mime)?;
    let img = HtmlImageElement::new()?;

    let shared_cb = shared.clone();
    let onload = Closure::once_into_js(move |_: Event| {
        if let Err(e) = shared_cb.borrow_mut().redraw() {
            log::error!("failed to draw preview: {e:?}");
        }
    });
    img.set_onload(Some(onload.unchecked_ref()));
    img.set_src(&url);

    let mut host = shared.borrow_mut();
    host.el.source_preview.set_src(&url);
    if let Some(old) = host.source_url.replace(url) {
        Url::revoke_object_url(&old)?;
    }
    host.preview = Some(img);
    Ok(())
}

fn on_change_grid(shared: &Shared, _: Event) {
    with_core(shared, WizardCore::open_options);
}

fn on_option_select(shared: &Shared, event: Event) {
    let Some(card) = dom::closest(event.target(), ".option-card") else {
        return;
    };
    let Some(id) = card.get_attribute("data-grid") else {
        return;
    };
    with_core(shared, |core| core.choose_option(&id));
}

fn on_back_to_crop(shared: &Shared, _: Event) {
    with_core(shared, WizardCore::back_to_crop);
}

fn on_fit_toggle(shared: &Shared, _: Event) {
    with_core(shared, WizardCore::toggle_fit_mode);
}

fn on_color_select(shared: &Shared, event: Event) {
    let Some(dot) = dom::closest(event.target(), ".color-dot") else {
        return;
    };
    let Some(raw) = dot.get_attribute("data-color") else {
        return;
    };
    match raw.parse::<PadColor>() {
        Ok(color) => with_core(shared, |core| core.set_pad_color(color)),
        Err(e) => log::warn!("{e}"),
    }
}

fn on_split(shared: &Shared, _: Event) {
    with_core(shared, |core| core.request(Job::Split));
}

fn on_download_all(shared: &Shared, _: Event) {
    with_core(shared, |core| core.request(Job::DownloadAll));
}

fn on_restart(shared: &Shared, _: Event) {
    // A scheduled job still expects the current image.
    if shared.borrow().core.is_busy() {
        return;
    }
    with_core(shared, WizardCore::restart);
}

fn on_pointer_down(shared: &Shared, event: Event) {
    let Some(event) = event.dyn_ref::<PointerEvent>() else {
        return;
    };
    let mut host = shared.borrow_mut();
    if host.core.fit_mode() != FitMode::Crop {
        return;
    }
    let Some(crop) = host.core.crop() else {
        return;
    };
    let start = host.canvas_point(event);
    host.drag = Some(Drag { start, crop });
    if let Err(e) = host.el.crop_canvas.set_pointer_capture(event.pointer_id()) {
        log::warn!("pointer capture failed: {e:?}");
    }
}

fn on_pointer_move(shared: &Shared, event: Event) {
    let Some(event) = event.dyn_ref::<PointerEvent>() else {
        return;
    };
    let actions = {
        let mut host = shared.borrow_mut();
        let (Some(drag), Some(current)) = (host.drag, host.core.crop()) else {
            return;
        };
        let p = host.canvas_point(event);
        let dx = host.viewport.screen_dist_to_image(p.x - drag.start.x);
        let dy = host.viewport.screen_dist_to_image(p.y - drag.start.y);
        let want_x = f64::from(drag.crop.x) + dx;
        let want_y = f64::from(drag.crop.y) + dy;
        host.core
            .pan_crop(want_x - f64::from(current.x), want_y - f64::from(current.y))
    };
    dispatch(shared, actions);
}

fn on_pointer_up(shared: &Shared, _: Event) {
    shared.borrow_mut().drag = None;
}

fn on_wheel(shared: &Shared, event: Event) {
    let Some(event) = event.dyn_ref::<WheelEvent>() else {
        return;
    };
    event.prevent_default();
    let factor = wheel_zoom_factor(event.delta_y(), WHEEL_NOTCH_PX, CROP_ZOOM_STEP);
    with_core(shared, |core| core.scale_crop(factor));
}

fn on_resize(shared: &Shared, _: Event) {
    let mut host = shared.borrow_mut();
    if let Err(e) = dom::set_app_height(&host.el.window, &host.el.document) {
        log::warn!("failed to set app height: {e:?}");
    }
    if let Err(e) = host.redraw() {
        log::error!("failed to redraw: {e:?}");
    }
}

fn bind_events(shared: &Shared) -> Result<(), JsValue> {
    let (el_window, canvas, buttons) = {
        let host = shared.borrow();
        let el = &host.el;
        let buttons: Vec<(EventTarget, &'static str, fn(&Shared, Event))> = vec![
            (el.upload_button.clone().into(), "click", on_upload_click),
            (el.image_loader.clone().into(), "change", on_image_change),
            (el.change_grid_button.clone().into(), "click", on_change_grid),
            (el.option_group.clone().into(), "click", on_option_select),
            (el.back_button.clone().into(), "click", on_back_to_crop),
            (el.fit_toggle.clone().into(), "click", on_fit_toggle),
            (el.color_picker.clone().into(), "click", on_color_select),
            (el.split_button.clone().into(), "click", on_split),
            (el.zip_button.clone().into(), "click", on_download_all),
            (el.restart_button.clone().into(), "click", on_restart),
        ];
        (el.window.clone(), el.crop_canvas.clone(), buttons)
    };

    for (target, event, handler) in &buttons {
        listen(target, event, shared, *handler)?;
    }
    listen(&canvas, "pointerdown", shared, on_pointer_down)?;
    listen(&canvas, "pointermove", shared, on_pointer_move)?;
    listen(&canvas, "pointerup", shared, on_pointer_up)?;
    listen(&canvas, "pointercancel", shared, on_pointer_up)?;
    listen(&canvas, "wheel", shared, on_wheel)?;
    listen(&el_window, "resize", shared, on_resize)?;
    Ok(())
}

// =============================================================
// Startup
// =============================================================

/// Leave the KakaoTalk webview if we are inside one. Returns whether the app
/// should stop here.
fn escape_in_app_browser(window: &Window) -> Result<bool, JsValue> {
    let user_agent = window.navigator().user_agent()?;
    let Some(plan) = inapp::escape_plan(&user_agent) else {
        return Ok(false);
    };
    let location = window.location();
    let encoded = String::from(js_sys::encode_uri_component(&location.href()?));
    log::info!("leaving in-app browser");
    location.set_href(&plan.open_external_url(&encoded))?;

    let close_location = location.clone();
    let close = Closure::once_into_js(move || {
        if let Err(e) = close_location.set_href(plan.close_url()) {
            log::warn!("failed to close in-app browser: {e:?}");
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        close.unchecked_ref(),
        ESCAPE_CLOSE_DELAY_MS,
    )?;
    Ok(true)
}

pub fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    if escape_in_app_browser(&window)? {
        return Ok(());
    }
    dom::set_app_height(&window, &document)?;

    let el = Elements::find(window, document)?;
    let swatches: String = PRESET_PAD_COLORS.iter().map(|c| dom::color_dot_html(*c)).collect();
    el.color_picker.set_inner_html(&swatches);
    let ctx: CanvasRenderingContext2d = el
        .crop_canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing 2d context"))?
        .dyn_into()?;

    let shared: Shared = Rc::new(RefCell::new(Host {
        core: WizardCore::new(),
        el,
        ctx,
        preview: None,
        source_url: None,
        tile_urls: Vec::new(),
        viewport: Viewport::default(),
        drag: None,
    }));
    bind_events(&shared)?;

    let initial = shared.borrow_mut().core.set_pad_color(PadColor::default());
    dispatch(&shared, initial);
    log::info!("tilegrid ready");
    Ok(())
}
