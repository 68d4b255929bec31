//! In-memory surface for unit tests.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use crate::config::WidgetConfig;
use crate::surface::{
    ClickTarget, FrameSpec, LauncherContent, Node, PageEvent, Subscription, Surface, TaskId,
    Viewport,
};
use crate::widget::{Widget, WidgetEvent};

/// Records every call and keeps a virtual clock for timers
pub struct RecordingSurface {
    pub viewport: Viewport,
    pub launcher_mounts: usize,
    pub launcher_content: Option<LauncherContent>,
    pub frames: Vec<FrameSpec>,
    pub stylesheets: Vec<(String, String)>,
    pub scripts: Vec<(String, String)>,
    pub host_hook_present: bool,
    pub host_hook_calls: usize,
    /// Ids of host-page elements that "exist"
    pub elements: BTreeSet<String>,
    pub click_bindings: Vec<ClickTarget>,
    pub animation_frames: Vec<WidgetEvent>,
    pub transition_waits: Vec<(Node, WidgetEvent)>,
    classes: HashMap<Node, BTreeSet<String>>,
    styles: HashMap<Node, BTreeMap<String, String>>,
    texts: HashMap<Node, String>,
    timers: BTreeMap<TaskId, (u64, WidgetEvent)>,
    now: u64,
    next_task: u64,
    subscriptions: Rc<Cell<usize>>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::with_viewport(Viewport::new(1280.0, 800.0))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            launcher_mounts: 0,
            launcher_content: None,
            frames: Vec::new(),
            stylesheets: Vec::new(),
            scripts: Vec::new(),
            host_hook_present: true,
            host_hook_calls: 0,
            elements: BTreeSet::new(),
            click_bindings: Vec::new(),
            animation_frames: Vec::new(),
            transition_waits: Vec::new(),
            classes: HashMap::new(),
            styles: HashMap::new(),
            texts: HashMap::new(),
            timers: BTreeMap::new(),
            now: 0,
            next_task: 0,
            subscriptions: Rc::new(Cell::new(0)),
        }
    }

    pub fn has_class(&self, node: Node, class: &str) -> bool {
        self.classes
            .get(&node)
            .map(|set| set.contains(class))
            .unwrap_or(false)
    }

    pub fn style(&self, node: Node, property: &str) -> Option<&str> {
        self.styles
            .get(&node)
            .and_then(|map| map.get(property))
            .map(String::as_str)
    }

    pub fn text(&self, node: Node) -> Option<&str> {
        self.texts.get(&node).map(String::as_str)
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.get()
    }

    pub fn pending_timers(&self) -> Vec<WidgetEvent> {
        self.timers.values().map(|(_, event)| event.clone()).collect()
    }

    /// Move the clock forward and take the events that came due, in due order
    pub fn advance(&mut self, ms: u32) -> Vec<WidgetEvent> {
        self.now += u64::from(ms);
        let mut due: Vec<(u64, TaskId)> = self
            .timers
            .iter()
            .filter(|(_, (at, _))| *at <= self.now)
            .map(|(task, (at, _))| (*at, *task))
            .collect();
        due.sort();
        due.into_iter()
            .filter_map(|(_, task)| self.timers.remove(&task).map(|(_, event)| event))
            .collect()
    }
}

/// Run the widget's clock for `ms`, one millisecond at a time
pub fn run_for(widget: &mut Widget<RecordingSurface>, ms: u32) {
    for _ in 0..ms {
        let due = widget.surface_mut().advance(1);
        for event in due {
            widget.handle(event);
        }
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn mount_launcher(&mut self) {
        self.launcher_mounts += 1;
    }

    fn set_launcher_content(&mut self, content: &LauncherContent) {
        self.launcher_content = Some(content.clone());
    }

    fn create_panel(&mut self, frame: &FrameSpec) {
        self.frames.push(frame.clone());
    }

    fn add_class(&mut self, node: Node, class: &str) {
        self.classes.entry(node).or_default().insert(class.to_string());
    }

    fn remove_class(&mut self, node: Node, class: &str) {
        if let Some(set) = self.classes.get_mut(&node) {
            set.remove(class);
        }
    }

    fn set_style(&mut self, node: Node, property: &str, value: Option<&str>) {
        let map = self.styles.entry(node).or_default();
        match value {
            Some(value) => {
                map.insert(property.to_string(), value.to_string());
            }
            None => {
                map.remove(property);
            }
        }
    }

    fn set_text(&mut self, node: Node, text: &str) {
        self.texts.insert(node, text.to_string());
    }

    fn inject_stylesheet(&mut self, name: &str, href: &str) {
        self.stylesheets.push((name.to_string(), href.to_string()));
    }

    fn inject_script(&mut self, name: &str, src: &str) {
        self.scripts.push((name.to_string(), src.to_string()));
    }

    fn invoke_host_hook(&mut self, _config: &WidgetConfig) -> bool {
        if self.host_hook_present {
            self.host_hook_calls += 1;
        }
        self.host_hook_present
    }

    fn element_exists(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    fn bind_click(&mut self, target: &ClickTarget) {
        self.click_bindings.push(target.clone());
    }

    fn schedule(&mut self, delay_ms: u32, event: WidgetEvent) -> TaskId {
        self.next_task += 1;
        let task = TaskId(self.next_task);
        self.timers
            .insert(task, (self.now + u64::from(delay_ms), event));
        task
    }

    fn cancel(&mut self, task: TaskId) {
        self.timers.remove(&task);
    }

    fn request_animation_frame(&mut self, event: WidgetEvent) {
        self.animation_frames.push(event);
    }

    fn once_transition_end(&mut self, node: Node, event: WidgetEvent) {
        self.transition_waits.push((node, event));
    }

    fn subscribe(&mut self, _source: PageEvent) -> Subscription {
        let counter = Rc::clone(&self.subscriptions);
        counter.set(counter.get() + 1);
        Subscription::new(move || counter.set(counter.get() - 1))
    }
}
