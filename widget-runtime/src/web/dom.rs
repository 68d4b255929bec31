//! DOM Surface
//!
//! [`Surface`] implementation on top of `web-sys`. DOM failures are logged and
//! swallowed so nothing throws back into the host page.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, Event, HtmlElement, MessageEvent, Window};

use super::styles::{BASE_CSS, CHAT_ICON, CLOSE_ICON, STYLE_ELEMENT_ID};
use super::{dispatch, HOST_HOOK_GLOBAL};
use crate::config::WidgetConfig;
use crate::surface::{
    ClickTarget, FrameSpec, Glyph, LauncherContent, Node, PageEvent, Subscription, Surface,
    TaskId, Viewport, BADGE_ID, LAUNCHER_ID, PANEL_ID,
};
use crate::widget::WidgetEvent;

/// Browser-backed surface
pub struct DomSurface {
    window: Window,
    document: Document,
    launcher: Option<Element>,
    launcher_body: Option<Element>,
    badge: Option<Element>,
    panel: Option<Element>,
    /// Tasks not yet fired or cancelled
    live_tasks: Rc<RefCell<HashSet<TaskId>>>,
    next_task: u64,
}

impl DomSurface {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            launcher: None,
            launcher_body: None,
            badge: None,
            panel: None,
            live_tasks: Rc::new(RefCell::new(HashSet::new())),
            next_task: 0,
        })
    }

    fn element(&self, node: Node) -> Option<Element> {
        match node {
            Node::Launcher => self.launcher.clone(),
            Node::Badge => self.badge.clone(),
            Node::Panel => self.panel.clone(),
            Node::Body => self.document.body().map(Into::into),
            Node::Root => self.document.document_element(),
        }
    }

    fn append_to_body(&self, element: &Element) {
        match self.document.body() {
            Some(body) => log_err(body.append_child(element), "append to body"),
            None => tracing::warn!("Document has no body, cannot append #{}", element.id()),
        }
    }

    fn append_to_head(&self, element: &Element) {
        match self.document.head() {
            Some(head) => log_err(head.append_child(element), "append to head"),
            None => self.append_to_body(element),
        }
    }

    fn install_base_styles(&self) {
        if self.document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
            return;
        }
        if let Some(style) = self.create("style") {
            style.set_id(STYLE_ELEMENT_ID);
            style.set_text_content(Some(BASE_CSS));
            self.append_to_head(&style);
        }
    }

    fn create(&self, tag: &str) -> Option<Element> {
        match self.document.create_element(tag) {
            Ok(element) => Some(element),
            Err(e) => {
                tracing::warn!("Could not create <{}>: {:?}", tag, e);
                None
            }
        }
    }
}

impl Surface for DomSurface {
    fn viewport(&self) -> Viewport {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Viewport::new(width, height)
    }

    fn mount_launcher(&mut self) {
        if self.launcher.is_some() {
            return;
        }
        self.install_base_styles();

        let (Some(button), Some(body), Some(badge)) =
            (self.create("button"), self.create("span"), self.create("span"))
        else {
            return;
        };

        button.set_id(LAUNCHER_ID);
        log_err(button.set_attribute("type", "button"), "launcher type");
        log_err(button.set_attribute("aria-label", "Open chat"), "launcher label");
        body.set_class_name("chat-widget-launcher-body");
        badge.set_id(BADGE_ID);
        log_err(badge.set_attribute("aria-live", "polite"), "badge aria-live");

        log_err(button.append_child(&body), "launcher body");
        log_err(button.append_child(&badge), "launcher badge");
        self.append_to_body(&button);

        self.launcher = Some(button);
        self.launcher_body = Some(body);
        self.badge = Some(badge);
    }

    fn set_launcher_content(&mut self, content: &LauncherContent) {
        let (Some(button), Some(body)) = (&self.launcher, &self.launcher_body) else {
            return;
        };

        let aria = match content {
            LauncherContent::Icon(Glyph::Chat) => {
                body.set_inner_html(CHAT_ICON);
                "Open chat"
            }
            LauncherContent::Icon(Glyph::Close) => {
                body.set_inner_html(CLOSE_ICON);
                "Close chat"
            }
            LauncherContent::Label(label) => {
                body.set_text_content(Some(label));
                "Open chat"
            }
        };
        log_err(button.set_attribute("aria-label", aria), "launcher label");
    }

    fn create_panel(&mut self, frame: &FrameSpec) {
        if self.panel.is_some() {
            tracing::warn!("Chat panel already exists, not creating another");
            return;
        }
        let Some(iframe) = self.create("iframe") else {
            return;
        };

        iframe.set_id(PANEL_ID);
        log_err(iframe.set_attribute("title", "Chat"), "panel title");
        log_err(iframe.set_attribute("sandbox", frame.sandbox), "panel sandbox");
        log_err(iframe.set_attribute("allow", frame.allow), "panel allow");

        let on_load = Closure::wrap(Box::new(move |_: Event| {
            dispatch(WidgetEvent::FrameLoaded);
        }) as Box<dyn FnMut(Event)>);
        log_err(
            iframe.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref()),
            "panel load listener",
        );
        on_load.forget();

        log_err(iframe.set_attribute("src", &frame.src), "panel src");
        self.append_to_body(&iframe);
        self.panel = Some(iframe);
    }

    fn add_class(&mut self, node: Node, class: &str) {
        if let Some(element) = self.element(node) {
            log_err(element.class_list().add_1(class), "add class");
        }
    }

    fn remove_class(&mut self, node: Node, class: &str) {
        if let Some(element) = self.element(node) {
            log_err(element.class_list().remove_1(class), "remove class");
        }
    }

    fn set_style(&mut self, node: Node, property: &str, value: Option<&str>) {
        let Some(element) = self.element(node) else {
            return;
        };
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };

        let style = html.style();
        match value {
            Some(value) => log_err(style.set_property(property, value), "set style"),
            None => log_err(style.remove_property(property), "remove style"),
        }
    }

    fn set_text(&mut self, node: Node, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn inject_stylesheet(&mut self, name: &str, href: &str) {
        let Some(link) = self.create("link") else {
            return;
        };
        log_err(link.set_attribute("rel", "stylesheet"), "stylesheet rel");
        log_err(link.set_attribute("href", href), "stylesheet href");
        log_err(link.set_attribute("data-chat-widget", name), "stylesheet name");
        self.append_to_head(&link);
    }

    fn inject_script(&mut self, name: &str, src: &str) {
        let Some(script) = self.create("script") else {
            return;
        };

        let script_name = name.to_string();
        let on_load = Closure::once_into_js(move || {
            dispatch(WidgetEvent::ScriptLoaded { name: script_name });
        });
        log_err(
            script.add_event_listener_with_callback("load", on_load.unchecked_ref()),
            "script load listener",
        );

        log_err(script.set_attribute("data-chat-widget", name), "script name");
        log_err(script.set_attribute("src", src), "script src");
        self.append_to_body(&script);
    }

    fn invoke_host_hook(&mut self, config: &WidgetConfig) -> bool {
        let Ok(host) = js_sys::Reflect::get(&self.window, &JsValue::from_str(HOST_HOOK_GLOBAL))
        else {
            return false;
        };
        if !host.is_object() {
            return false;
        }
        let Some(init) = js_sys::Reflect::get(&host, &JsValue::from_str("init"))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        else {
            return false;
        };

        let argument = serde_json::to_string(config)
            .ok()
            .and_then(|json| js_sys::JSON::parse(&json).ok())
            .unwrap_or(JsValue::NULL);
        if let Err(e) = init.call1(&host, &argument) {
            tracing::warn!("{}.init threw: {:?}", HOST_HOOK_GLOBAL, e);
        }
        true
    }

    fn element_exists(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn bind_click(&mut self, target: &ClickTarget) {
        let (element, is_host_element) = match target {
            ClickTarget::Launcher => (self.launcher.clone(), false),
            ClickTarget::Element(id) => (self.document.get_element_by_id(id), true),
        };
        let Some(element) = element else {
            tracing::warn!("Click target {:?} not found", target);
            return;
        };

        let on_click = Closure::wrap(Box::new(move |event: Event| {
            if is_host_element {
                event.prevent_default();
            }
            dispatch(WidgetEvent::Toggle);
        }) as Box<dyn FnMut(Event)>);
        log_err(
            element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()),
            "click listener",
        );
        on_click.forget();
    }

    fn schedule(&mut self, delay_ms: u32, event: WidgetEvent) -> TaskId {
        self.next_task += 1;
        let task = TaskId(self.next_task);
        self.live_tasks.borrow_mut().insert(task);

        let live = Rc::clone(&self.live_tasks);
        gloo_timers::callback::Timeout::new(delay_ms, move || {
            if live.borrow_mut().remove(&task) {
                dispatch(event);
            }
        })
        .forget();

        task
    }

    fn cancel(&mut self, task: TaskId) {
        self.live_tasks.borrow_mut().remove(&task);
    }

    fn request_animation_frame(&mut self, event: WidgetEvent) {
        let callback = Closure::once_into_js(move |_: f64| dispatch(event));
        log_err(
            self.window
                .request_animation_frame(callback.unchecked_ref()),
            "animation frame",
        );
    }

    fn once_transition_end(&mut self, node: Node, event: WidgetEvent) {
        let Some(element) = self.element(node) else {
            return;
        };

        let callback = Closure::once_into_js(move |_: Event| dispatch(event));
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        log_err(
            element.add_event_listener_with_callback_and_add_event_listener_options(
                "transitionend",
                callback.unchecked_ref(),
                &options,
            ),
            "transitionend listener",
        );
    }

    fn subscribe(&mut self, source: PageEvent) -> Subscription {
        let window = self.window.clone();

        let (event_type, listener): (&'static str, JsValue) = match source {
            PageEvent::Resize => {
                let closure = Closure::wrap(Box::new(move |_: Event| {
                    dispatch(WidgetEvent::Resize);
                }) as Box<dyn FnMut(Event)>);
                ("resize", closure.into_js_value())
            }
            PageEvent::OrientationChange => {
                let closure = Closure::wrap(Box::new(move |_: Event| {
                    dispatch(WidgetEvent::OrientationChange);
                }) as Box<dyn FnMut(Event)>);
                ("orientationchange", closure.into_js_value())
            }
            PageEvent::Message => {
                let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
                    if let Some(data) = message_text(&event.data()) {
                        dispatch(WidgetEvent::Message {
                            data,
                            origin: event.origin(),
                        });
                    }
                }) as Box<dyn FnMut(MessageEvent)>);
                ("message", closure.into_js_value())
            }
        };

        if let Err(e) = window.add_event_listener_with_callback(event_type, listener.unchecked_ref())
        {
            tracing::warn!("Could not listen to {}: {:?}", event_type, e);
            return Subscription::detached();
        }

        Subscription::new(move || {
            log_err(
                window.remove_event_listener_with_callback(event_type, listener.unchecked_ref()),
                "remove listener",
            );
        })
    }
}

/// Posted payloads may be JSON strings or structured-cloned objects
fn message_text(data: &JsValue) -> Option<String> {
    if let Some(text) = data.as_string() {
        return Some(text);
    }
    js_sys::JSON::stringify(data).ok()?.as_string()
}

fn log_err<T>(result: Result<T, JsValue>, what: &str) {
    if let Err(e) = result {
        tracing::warn!("DOM call failed ({}): {:?}", what, e);
    }
}
