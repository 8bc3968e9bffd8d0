//! DOM rendering
//!
//! [`Renderable`] types own exactly one element. [`DomStage`] implements the
//! simulation's [`Stage`] on top of them.

use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Element, Event, HtmlElement};

use crate::config::UiConfig;
use crate::sim::{Facing, FishId, OverlayContent, Stage, Viewport};

mod private {
    pub trait Sealed {}
}

/// A component owning exactly one element.
///
/// Sealed: only [`FishSprite`] and [`ClockDisplay`] exist.
pub trait Renderable: private::Sealed {
    fn elem(&self) -> &HtmlElement;

    /// Append the element to `parent` (moves it if already attached)
    fn render(&self, parent: &Element) -> Result<&Self, JsValue>
    where
        Self: Sized,
    {
        parent.append_child(self.elem())?;
        Ok(self)
    }

    /// Subscribe to an element event. `once` listeners free themselves
    /// after the first call; the others live as long as the page.
    fn add_event_listener(
        &self,
        event: &str,
        mut callback: Box<dyn FnMut(Event)>,
        once: bool,
    ) -> Result<&Self, JsValue>
    where
        Self: Sized,
    {
        if once {
            let options = AddEventListenerOptions::new();
            options.set_once(true);
            let handler = Closure::once_into_js(move |e: Event| callback(e));
            self.elem()
                .add_event_listener_with_callback_and_add_event_listener_options(
                    event,
                    handler.unchecked_ref(),
                    &options,
                )?;
        } else {
            let closure = Closure::wrap(callback);
            self.elem()
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(self)
    }
}

/// Create a `div` carrying `classes`
fn build(document: &Document, classes: &[String]) -> Result<HtmlElement, JsValue> {
    let elem: HtmlElement = document.create_element("div")?.dyn_into()?;
    let list = elem.class_list();
    for class in classes {
        list.add_1(class)?;
    }
    Ok(elem)
}

/// Clickable fish element
pub struct FishSprite {
    elem: HtmlElement,
}

impl private::Sealed for FishSprite {}

impl Renderable for FishSprite {
    fn elem(&self) -> &HtmlElement {
        &self.elem
    }
}

impl FishSprite {
    pub fn new(document: &Document, id: &FishId, classes: &[String]) -> Result<Self, JsValue> {
        let elem = build(document, classes)?;
        elem.set_id(id.as_str());
        Ok(Self { elem })
    }

    /// Rendered width; forces layout so the next style change transitions
    pub fn width(&self) -> f32 {
        self.elem.client_width() as f32
    }

    pub fn place(&self, start: Vec2, duration_ms: f64) -> Result<(), JsValue> {
        let style = self.elem.style();
        style.set_property("transition-timing-function", "ease-in-out")?;
        style.set_property("left", &format!("{}px", start.x))?;
        style.set_property("top", &format!("{}px", start.y))?;
        style.set_property("transition-duration", &format!("{}ms", duration_ms))?;
        Ok(())
    }

    pub fn offset(&self, offset: Vec2, facing: Facing) -> Result<(), JsValue> {
        let style = self.elem.style();
        style.set_property("margin-left", &format!("{}px", offset.x))?;
        style.set_property("margin-top", &format!("{}px", offset.y))?;
        style.set_property("transform", &format!("scale({}, 1)", facing.scale_x()))?;
        Ok(())
    }

    pub fn detach(&self) {
        self.elem.remove();
    }
}

/// Countdown text element
pub struct ClockDisplay {
    elem: HtmlElement,
}

impl private::Sealed for ClockDisplay {}

impl Renderable for ClockDisplay {
    fn elem(&self) -> &HtmlElement {
        &self.elem
    }
}

impl ClockDisplay {
    pub fn new(document: &Document, classes: &[String]) -> Result<Self, JsValue> {
        Ok(Self {
            elem: build(document, classes)?,
        })
    }

    pub fn set_text(&self, text: &str) {
        self.elem.set_inner_text(text);
    }
}

/// Called with the id of a clicked fish
pub type CatchHandler = Rc<dyn Fn(FishId)>;

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))
}

fn html_element(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    element(document, id)?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)
}

/// Browser implementation of the simulation stage
pub struct DomStage {
    document: Document,
    fish_parent: Element,
    timer_parent: Element,
    score: Element,
    holder: HtmlElement,
    holder_content: Element,
    clock: ClockDisplay,
    sprites: HashMap<FishId, FishSprite>,
    on_catch: Option<CatchHandler>,
}

impl DomStage {
    /// Bind to the page elements named in `ui`
    pub fn new(
        document: Document,
        ui: &UiConfig,
        clock_classes: &[String],
    ) -> Result<Self, JsValue> {
        Ok(Self {
            fish_parent: element(&document, &ui.fish_parent)?,
            timer_parent: element(&document, &ui.timer_parent)?,
            score: element(&document, &ui.score)?,
            holder: html_element(&document, &ui.holder)?,
            holder_content: element(&document, &ui.holder_content)?,
            clock: ClockDisplay::new(&document, clock_classes)?,
            sprites: HashMap::new(),
            on_catch: None,
            document,
        })
    }

    pub fn set_catch_handler(&mut self, handler: CatchHandler) {
        self.on_catch = Some(handler);
    }

    fn try_spawn(&mut self, id: &FishId, classes: &[String]) -> Result<f32, JsValue> {
        let sprite = FishSprite::new(&self.document, id, classes)?;
        sprite.render(&self.fish_parent)?;

        self.arm(id, &sprite)?;

        let width = sprite.width();
        self.sprites.insert(id.clone(), sprite);
        Ok(width)
    }

    /// One-shot click listener reporting `id` to the catch handler
    fn arm(&self, id: &FishId, sprite: &FishSprite) -> Result<(), JsValue> {
        if let Some(handler) = self.on_catch.clone() {
            let fish_id = id.clone();
            sprite.add_event_listener(
                "click",
                Box::new(move |_e: Event| handler(fish_id.clone())),
                true,
            )?;
        }
        Ok(())
    }

    fn set_holder_z(&self, z: &str) {
        if let Err(e) = self.holder.style().set_property("z-index", z) {
            log::warn!("Failed to update overlay: {:?}", e);
        }
    }

    fn try_game_over(&self, message: &str, restart_href: &str) -> Result<(), JsValue> {
        self.holder_content.set_inner_html("");

        let text = self.document.create_element("p")?;
        text.set_class_name("holder-text");
        text.set_text_content(Some(message));
        self.holder_content.append_child(&text)?;

        let link = self.document.create_element("a")?;
        link.set_attribute("href", restart_href)?;
        link.set_class_name("btn");
        let label = self.document.create_element("span")?;
        label.set_text_content(Some("Restart"));
        link.append_child(&label)?;
        self.holder_content.append_child(&link)?;
        Ok(())
    }
}

impl Stage for DomStage {
    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::default();
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64());
        let height = window.inner_height().ok().and_then(|v| v.as_f64());
        match (width, height) {
            (Some(w), Some(h)) => Viewport::new(w as f32, h as f32),
            _ => Viewport::default(),
        }
    }

    fn spawn_sprite(&mut self, id: &FishId, classes: &[String]) -> f32 {
        self.try_spawn(id, classes).unwrap_or_else(|e| {
            log::error!("Failed to spawn {}: {:?}", id, e);
            0.0
        })
    }

    fn place_sprite(&mut self, id: &FishId, start: Vec2, duration_ms: f64) {
        if let Some(sprite) = self.sprites.get(id) {
            if let Err(e) = sprite.place(start, duration_ms) {
                log::warn!("Failed to place {}: {:?}", id, e);
            }
        }
    }

    fn offset_sprite(&mut self, id: &FishId, offset: Vec2, facing: Facing) {
        if let Some(sprite) = self.sprites.get(id) {
            if let Err(e) = sprite.offset(offset, facing) {
                log::warn!("Failed to move {}: {:?}", id, e);
            }
        }
    }

    fn arm_sprite(&mut self, id: &FishId) {
        if let Some(sprite) = self.sprites.get(id) {
            if let Err(e) = self.arm(id, sprite) {
                log::warn!("Failed to re-arm {}: {:?}", id, e);
            }
        }
    }

    fn remove_sprite(&mut self, id: &FishId) {
        if let Some(sprite) = self.sprites.remove(id) {
            sprite.detach();
        }
    }

    fn show_clock(&mut self, text: &str) {
        self.clock.set_text(text);
        if let Err(e) = self.clock.render(&self.timer_parent) {
            log::warn!("Failed to render clock: {:?}", e);
        }
    }

    fn show_score(&mut self, text: &str) {
        self.score.set_text_content(Some(text));
    }

    fn show_overlay(&mut self, content: OverlayContent) {
        self.set_holder_z("2");
        if let OverlayContent::GameOver { message, restart_href } = content {
            if let Err(e) = self.try_game_over(&message, &restart_href) {
                log::error!("Failed to build game over overlay: {:?}", e);
            }
        }
    }

    fn hide_overlay(&mut self) {
        self.set_holder_z("-1");
    }
}
