//! Browser backend: DOM spans animated through the Web Animations API.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use log::{debug, error, Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Animation, AnimationPlayState, Document, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, KeyboardEvent,
};

use crate::config::NumberInput;
use crate::{
    is_run_shortcut, AnimationConfig, AnimationId, AnimationPoll, AnimationSettings, Animator,
    Keyframe, KeyframeEffect, Layout, LayoutItem, Surface, SurfaceError, Trigger,
};

/// `log` sink writing to the browser console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Route `log` records to the console. Later calls are no-ops.
pub fn init_console_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn backend(context: &str) -> SurfaceError {
    SurfaceError::Backend(context.to_string())
}

fn set_style(element: &HtmlElement, property: &str, value: &str) -> Result<(), SurfaceError> {
    element
        .style()
        .set_property(property, value)
        .map_err(|_| backend("Failed to set style property"))
}

// Control styling is cosmetic; a failed write is logged and skipped.
fn set_control_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = set_style(element, property, value) {
        debug!("{} not applied: {}", property, err);
    }
}

fn keyframe_object(frame: &Keyframe) -> Result<Object, JsValue> {
    let object = Object::new();
    if let Some(opacity) = frame.opacity {
        Reflect::set(&object, &"opacity".into(), &opacity.into())?;
    }
    Reflect::set(&object, &"transform".into(), &frame.transform.to_css().into())?;
    Ok(object)
}

fn effect_arguments(effect: &KeyframeEffect) -> Result<(Array, Object), JsValue> {
    let keyframes = Array::new();
    keyframes.push(&keyframe_object(&effect.from)?.into());
    keyframes.push(&keyframe_object(&effect.to)?.into());

    let options = Object::new();
    Reflect::set(&options, &"duration".into(), &effect.duration_ms.into())?;
    Reflect::set(&options, &"delay".into(), &effect.delay_ms.into())?;
    Reflect::set(&options, &"easing".into(), &effect.easing.to_css().into())?;
    Reflect::set(&options, &"fill".into(), &"both".into())?;
    Ok((keyframes, options))
}

/// Render surface backed by a container element.
///
/// Every unit is an inline-block `span.char`; source line breaks become
/// `<br>` elements.
pub struct DomSurface {
    document: Document,
    container: HtmlElement,
    spans: Vec<HtmlElement>,
    animations: HashMap<AnimationId, Animation>,
    next_id: u64,
    animate_supported: bool,
}

impl DomSurface {
    /// Use the element with `id` as the container.
    pub fn from_element_id(id: &str) -> Result<Self, SurfaceError> {
        let window = web_sys::window().ok_or_else(|| backend("No window available"))?;
        let document = window.document().ok_or_else(|| backend("No document available"))?;
        let container = document
            .get_element_by_id(id)
            .ok_or_else(|| SurfaceError::Backend(format!("Element #{id} not found")))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| backend("Container is not an HTML element"))?;
        Ok(Self::new(document, container))
    }

    /// Render into `container`, probing it for `Element.animate` support.
    pub fn new(document: Document, container: HtmlElement) -> Self {
        let animate_supported = Reflect::has(&container, &"animate".into()).unwrap_or(false);
        Self {
            document,
            container,
            spans: Vec::new(),
            animations: HashMap::new(),
            next_id: 1,
            animate_supported,
        }
    }

    fn span(&self, unit: usize) -> Result<&HtmlElement, SurfaceError> {
        self.spans.get(unit).ok_or(SurfaceError::UnitOutOfRange {
            index: unit,
            len: self.spans.len(),
        })
    }
}

impl Surface for DomSurface {
    fn supports_animation(&self) -> bool {
        self.animate_supported
    }

    fn reset(&mut self) -> Result<(), SurfaceError> {
        for (_, animation) in self.animations.drain() {
            animation.cancel();
        }
        self.spans.clear();
        self.container.set_inner_html("");
        Ok(())
    }

    fn build(&mut self, layout: &Layout, config: &AnimationConfig) -> Result<(), SurfaceError> {
        set_style(&self.container, "font-size", &format!("{}px", config.font_size))?;
        set_style(&self.container, "color", &config.color.to_css())?;
        set_style(&self.container, "white-space", "pre-wrap")?;
        set_style(&self.container, "line-height", "1.15")?;

        let mut spans = Vec::with_capacity(layout.len());
        for item in &layout.items {
            let node = match *item {
                LayoutItem::Unit(index) => {
                    let glyph = layout.units[index].glyph.to_string();
                    let span = self
                        .document
                        .create_element("span")
                        .map_err(|_| backend("Failed to create span"))?
                        .dyn_into::<HtmlElement>()
                        .map_err(|_| backend("Failed to cast span to HtmlElement"))?;
                    span.set_class_name("char");
                    span.set_attribute("data-final", &glyph)
                        .map_err(|_| backend("Failed to set data-final"))?;
                    span.set_text_content(Some(&glyph));
                    set_style(&span, "display", "inline-block")?;
                    set_style(&span, "opacity", "0")?;
                    spans.push(span.clone());
                    span.unchecked_into::<web_sys::Node>()
                }
                LayoutItem::LineBreak => self
                    .document
                    .create_element("br")
                    .map_err(|_| backend("Failed to create line break"))?
                    .unchecked_into::<web_sys::Node>(),
            };
            self.container
                .append_child(&node)
                .map_err(|_| backend("Failed to append unit"))?;
        }

        self.spans = spans;
        Ok(())
    }

    fn play(
        &mut self,
        unit: usize,
        effect: &KeyframeEffect,
        _now_ms: f64,
    ) -> Result<AnimationId, SurfaceError> {
        if !self.animate_supported {
            return Err(SurfaceError::AnimationUnsupported);
        }
        let span = self.span(unit)?;
        let rejected = |reason: JsValue| SurfaceError::AnimationRejected {
            unit,
            reason: format!("{reason:?}"),
        };

        let animate = Reflect::get(span, &"animate".into())
            .map_err(rejected)?
            .dyn_into::<Function>()
            .map_err(rejected)?;
        let (keyframes, options) = effect_arguments(effect).map_err(rejected)?;
        let animation = animate
            .call2(span, &keyframes, &options)
            .map_err(rejected)?
            .dyn_into::<Animation>()
            .map_err(rejected)?;

        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.animations.insert(id, animation);
        Ok(id)
    }

    fn poll(&mut self, id: AnimationId, _now_ms: f64) -> AnimationPoll {
        match self.animations.get(&id).map(Animation::play_state) {
            Some(AnimationPlayState::Finished) => AnimationPoll::Finished,
            Some(AnimationPlayState::Idle) | None => AnimationPoll::Cancelled,
            Some(_) => AnimationPoll::Running,
        }
    }

    fn cancel(&mut self, id: AnimationId) {
        if let Some(animation) = self.animations.remove(&id) {
            animation.cancel();
        }
    }

    fn set_glyph(&mut self, unit: usize, glyph: char) -> Result<(), SurfaceError> {
        self.span(unit)?.set_text_content(Some(&glyph.to_string()));
        Ok(())
    }

    fn show(&mut self, unit: usize) -> Result<(), SurfaceError> {
        set_style(self.span(unit)?, "opacity", "1")
    }
}

/// Element ids of the page controls.
#[derive(Clone, Debug)]
pub struct ControlIds {
    pub text: String,
    pub style: String,
    pub font_size: String,
    pub color: String,
    pub duration: String,
    pub stagger: String,
    pub button: String,
    pub surface: String,
    pub message: String,
}

impl Default for ControlIds {
    fn default() -> Self {
        Self {
            text: "text-input".into(),
            style: "animation-style".into(),
            font_size: "font-size".into(),
            color: "text-color".into(),
            duration: "duration".into(),
            stagger: "stagger".into(),
            button: "animate-button".into(),
            surface: "animation-canvas".into(),
            message: "message-box".into(),
        }
    }
}

struct Controls {
    text: HtmlTextAreaElement,
    style: HtmlSelectElement,
    font_size: HtmlInputElement,
    color: HtmlInputElement,
    duration: HtmlInputElement,
    stagger: HtmlInputElement,
    button: HtmlButtonElement,
    message: Option<HtmlElement>,
}

fn lookup<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element #{id} not found")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element #{id} has an unexpected type")))
}

impl Controls {
    fn find(document: &Document, ids: &ControlIds) -> Result<Self, JsValue> {
        Ok(Self {
            text: lookup(document, &ids.text)?,
            style: lookup(document, &ids.style)?,
            font_size: lookup(document, &ids.font_size)?,
            color: lookup(document, &ids.color)?,
            duration: lookup(document, &ids.duration)?,
            stagger: lookup(document, &ids.stagger)?,
            button: lookup(document, &ids.button)?,
            message: lookup(document, &ids.message).ok(),
        })
    }

    fn settings(&self) -> AnimationSettings {
        AnimationSettings {
            style: Some(self.style.value()),
            font_size: Some(NumberInput::Text(self.font_size.value())),
            color: Some(self.color.value()),
            duration: Some(NumberInput::Text(self.duration.value())),
            stagger: Some(NumberInput::Text(self.stagger.value())),
        }
    }
}

struct AppState {
    animator: Animator<DomSurface>,
    controls: Controls,
    frame_loop_active: bool,
}

impl AppState {
    fn request_run(&mut self, trigger: Trigger, now_ms: f64) {
        let text = self.controls.text.value();
        let settings = self.controls.settings();
        self.animator.start(&text, &settings, trigger, now_ms);
        self.sync_controls(now_ms);
    }

    // Returns whether another frame is needed.
    fn on_frame(&mut self, now_ms: f64) -> bool {
        self.animator.tick(now_ms);
        self.sync_controls(now_ms);
        self.animator.is_running() || self.animator.status(now_ms).is_some()
    }

    fn sync_controls(&self, now_ms: f64) {
        let enabled = self.animator.trigger_enabled();
        self.controls.button.set_disabled(!enabled);
        set_control_style(
            &self.controls.button,
            "pointer-events",
            if enabled { "" } else { "none" },
        );

        if let Some(message) = &self.controls.message {
            match self.animator.status_message(now_ms) {
                Some(text) => {
                    message.set_text_content(Some(text));
                    set_control_style(message, "display", "block");
                }
                None => {
                    set_control_style(message, "display", "none");
                }
            }
        }
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn request_animation_frame(callback: &Closure<dyn FnMut(f64)>) {
    let requested = web_sys::window()
        .ok_or_else(|| JsValue::from_str("No window available"))
        .and_then(|w| w.request_animation_frame(callback.as_ref().unchecked_ref()));
    if let Err(err) = requested {
        error!("requestAnimationFrame failed: {:?}", err);
    }
}

/// Kinetic typography page controller.
///
/// Binds the page controls, runs the animator on the frame loop and mirrors
/// its trigger state and status notices back onto the page.
#[wasm_bindgen]
pub struct TypographyApp {
    state: Rc<RefCell<AppState>>,
    frame: FrameCallback,
}

impl TypographyApp {
    /// Bind to the controls named by `ids`.
    pub fn mount(ids: &ControlIds) -> Result<TypographyApp, JsValue> {
        console_error_panic_hook::set_once();
        init_console_logging(LevelFilter::Info);

        let window = web_sys::window().ok_or("No window available")?;
        let document = window.document().ok_or("No document available")?;
        let controls = Controls::find(&document, ids)?;
        let surface = DomSurface::from_element_id(&ids.surface)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        if let Some(message) = &controls.message {
            set_control_style(message, "display", "none");
        }

        let state = Rc::new(RefCell::new(AppState {
            animator: Animator::new(surface),
            controls,
            frame_loop_active: false,
        }));
        let app = TypographyApp {
            state,
            frame: Rc::new(RefCell::new(None)),
        };
        app.install_frame_callback();
        app.bind_events()?;

        let startup_text = app.state.borrow().controls.text.value();
        if !startup_text.trim().is_empty() {
            app.request(Trigger::Startup);
        }
        Ok(app)
    }

    // The callback lives as long as the app and is reused for every run.
    fn install_frame_callback(&self) {
        let state = self.state.clone();
        let frame = self.frame.clone();
        *self.frame.borrow_mut() = Some(Closure::new(move |now: f64| {
            let again = state.borrow_mut().on_frame(now);
            if again {
                if let Some(callback) = frame.borrow().as_ref() {
                    request_animation_frame(callback);
                }
            } else {
                state.borrow_mut().frame_loop_active = false;
            }
        }));
    }

    fn handle(&self) -> AppHandle {
        AppHandle {
            state: self.state.clone(),
            frame: self.frame.clone(),
        }
    }

    fn request(&self, trigger: Trigger) {
        self.handle().request(trigger);
    }

    fn bind_events(&self) -> Result<(), JsValue> {
        let (button, text) = {
            let state = self.state.borrow();
            (state.controls.button.clone(), state.controls.text.clone())
        };

        {
            let handle = self.handle();
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
                handle.request(Trigger::Button);
            });
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let handle = self.handle();
            let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                if is_run_shortcut(&event.key(), event.ctrl_key(), event.meta_key()) {
                    handle.request(Trigger::Shortcut);
                }
            });
            text.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[wasm_bindgen]
impl TypographyApp {
    /// Start a run from script, as the button would.
    pub fn animate(&self) {
        self.request(Trigger::Api);
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.state.borrow().animator.is_running()
    }
}

#[derive(Clone)]
struct AppHandle {
    state: Rc<RefCell<AppState>>,
    frame: FrameCallback,
}

impl AppHandle {
    fn request(&self, trigger: Trigger) {
        let now = performance_now();
        let start_loop = {
            let mut state = self.state.borrow_mut();
            state.request_run(trigger, now);
            let start = !state.frame_loop_active;
            state.frame_loop_active = true;
            start
        };
        if start_loop {
            if let Some(callback) = self.frame.borrow().as_ref() {
                request_animation_frame(callback);
            }
        }
    }
}

/// Mount the app on the default control ids.
#[wasm_bindgen(js_name = startApp)]
pub fn start_app() -> Result<TypographyApp, JsValue> {
    TypographyApp::mount(&ControlIds::default())
}
