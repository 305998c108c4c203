//! Driver seam: the browser-automation capability this crate consumes.
//!
//! The crate never launches or connects to a browser. A [`WebDriver`]
//! implementation is injected by the caller, and every higher layer
//! (waits, pages, fields, interaction recipes) speaks to it through this
//! trait pair:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  WebDriver / WebElement (traits, injected)               │
//! ├──────────────────────────────────────────────────────────┤
//! │  real WebDriver client        MockDriver (unit testing)  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Input-action operations (double click, pointer moves, drag and drop)
//! are optional capabilities: their default implementations return
//! [`PaginaError::NotSupported`], and callers check the result instead
//! of attempting and catching.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::locator::Locator;
use crate::result::{PaginaError, PaginaResult};

/// Keystroke codepoints from the WebDriver private-use area, for
/// sending control keys through [`WebElement::send_keys`].
pub mod keys {
    /// NULL key
    pub const NULL: char = '\u{e000}';
    /// Cancel key
    pub const CANCEL: char = '\u{e001}';
    /// Help key
    pub const HELP: char = '\u{e002}';
    /// Backspace key
    pub const BACKSPACE: char = '\u{e003}';
    /// Tab key
    pub const TAB: char = '\u{e004}';
    /// Clear key
    pub const CLEAR: char = '\u{e005}';
    /// Return key
    pub const RETURN: char = '\u{e006}';
    /// Enter key
    pub const ENTER: char = '\u{e007}';
    /// Shift key
    pub const SHIFT: char = '\u{e008}';
    /// Control key
    pub const CONTROL: char = '\u{e009}';
    /// Alt key
    pub const ALT: char = '\u{e00a}';
    /// Escape key
    pub const ESCAPE: char = '\u{e00c}';
    /// Space key
    pub const SPACE: char = '\u{e00d}';
    /// Page Up key
    pub const PAGE_UP: char = '\u{e00e}';
    /// Page Down key
    pub const PAGE_DOWN: char = '\u{e00f}';
    /// End key
    pub const END: char = '\u{e010}';
    /// Home key
    pub const HOME: char = '\u{e011}';
    /// Left arrow key
    pub const LEFT: char = '\u{e012}';
    /// Up arrow key
    pub const UP: char = '\u{e013}';
    /// Right arrow key
    pub const RIGHT: char = '\u{e014}';
    /// Down arrow key
    pub const DOWN: char = '\u{e015}';
    /// Insert key
    pub const INSERT: char = '\u{e016}';
    /// Delete key
    pub const DELETE: char = '\u{e017}';
}

/// Live element handle returned by a [`WebDriver`] lookup
pub trait WebElement: Clone + std::fmt::Debug {
    /// Click the element
    ///
    /// # Errors
    ///
    /// Driver-level failures, including `StaleElement` when the handle is
    /// no longer attached.
    fn click(&self) -> PaginaResult<()>;

    /// Clear the element's text content
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn clear(&self) -> PaginaResult<()>;

    /// Send keystrokes to the element
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn send_keys(&self, text: &str) -> PaginaResult<()>;

    /// Visible text content
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn text(&self) -> PaginaResult<String>;

    /// Attribute value, `None` when the attribute is absent
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn attribute(&self, name: &str) -> PaginaResult<Option<String>>;

    /// Lowercase tag name
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn tag_name(&self) -> PaginaResult<String>;

    /// Whether the element is rendered visible
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn is_displayed(&self) -> PaginaResult<bool>;

    /// Whether the element is enabled for interaction
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn is_enabled(&self) -> PaginaResult<bool>;

    /// Whether the element is selected (checkboxes, radios, options)
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn is_selected(&self) -> PaginaResult<bool>;

    /// Find descendant elements matching a locator
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn find_elements(&self, locator: &Locator) -> PaginaResult<Vec<Self>>
    where
        Self: Sized;
}

/// Browser-automation capability consumed by pages and waits.
///
/// Required methods cover element lookup, navigation, script execution,
/// implicit-wait control and window/frame/alert state. The input-action
/// methods are optional; backends without them inherit defaults that
/// report `NotSupported`.
pub trait WebDriver {
    /// Live element handle type
    type Element: WebElement;

    /// Find the first element matching a canonical locator
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when nothing matches.
    fn find_element(&self, locator: &Locator) -> PaginaResult<Self::Element>;

    /// Find every element matching a canonical locator (empty when none)
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn find_elements(&self, locator: &Locator) -> PaginaResult<Vec<Self::Element>>;

    /// Navigate to a URL
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn goto(&self, url: &str) -> PaginaResult<()>;

    /// Current page title
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn title(&self) -> PaginaResult<String>;

    /// Execute JavaScript in the page, returning its JSON result
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn execute_script(&self, script: &str) -> PaginaResult<Value>;

    /// Set the driver-global implicit wait
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn implicitly_wait(&self, timeout: Duration) -> PaginaResult<()>;

    /// Handles of all open windows
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn window_handles(&self) -> PaginaResult<Vec<String>>;

    /// Switch the driver context into a frame element
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn switch_to_frame(&self, frame: &Self::Element) -> PaginaResult<()>;

    /// Text of the currently open alert
    ///
    /// # Errors
    ///
    /// `NoAlert` when no alert is open.
    fn alert_text(&self) -> PaginaResult<String>;

    /// Element that currently has input focus
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn active_element(&self) -> PaginaResult<Self::Element>;

    /// End the session
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    fn quit(&self) -> PaginaResult<()>;

    /// Double-click an element (optional capability)
    ///
    /// # Errors
    ///
    /// `NotSupported` unless the backend overrides it.
    fn double_click(&self, element: &Self::Element) -> PaginaResult<()> {
        let _ = element;
        Err(PaginaError::NotSupported {
            operation: "double_click".to_string(),
        })
    }

    /// Move the pointer over an element, optionally offset from its
    /// top-left corner (optional capability)
    ///
    /// # Errors
    ///
    /// `NotSupported` unless the backend overrides it.
    fn move_to_element(
        &self,
        element: &Self::Element,
        offset: Option<(i64, i64)>,
    ) -> PaginaResult<()> {
        let _ = (element, offset);
        Err(PaginaError::NotSupported {
            operation: "move_to_element".to_string(),
        })
    }

    /// Drag one element onto another (optional capability)
    ///
    /// # Errors
    ///
    /// `NotSupported` unless the backend overrides it.
    fn drag_and_drop(
        &self,
        source: &Self::Element,
        target: &Self::Element,
    ) -> PaginaResult<()> {
        let _ = (source, target);
        Err(PaginaError::NotSupported {
            operation: "drag_and_drop".to_string(),
        })
    }

    /// Scroll an element into the viewport (optional capability)
    ///
    /// # Errors
    ///
    /// `NotSupported` unless the backend overrides it.
    fn scroll_into_view(&self, element: &Self::Element) -> PaginaResult<()> {
        let _ = element;
        Err(PaginaError::NotSupported {
            operation: "scroll_into_view".to_string(),
        })
    }
}

// ============================================================================
// Mock implementations for unit testing
// ============================================================================

#[derive(Debug)]
struct MockElementState {
    tag: String,
    text: String,
    attributes: HashMap<String, String>,
    displayed: bool,
    enabled: bool,
    selected: bool,
    stale: bool,
    toggle_on_click: bool,
    clicks: u32,
    clears: u32,
    keys_sent: Vec<String>,
    children: Vec<(Locator, MockElement)>,
}

impl Default for MockElementState {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            text: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            enabled: true,
            selected: false,
            stale: false,
            toggle_on_click: false,
            clicks: 0,
            clears: 0,
            keys_sent: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Scriptable element handle for unit testing.
///
/// Handles are shared: clones observe the same state, so a test can keep
/// one handle for assertions while the code under test works on another.
#[derive(Debug, Clone, Default)]
pub struct MockElement {
    state: Arc<Mutex<MockElementState>>,
}

impl MockElement {
    /// Create a visible, enabled element with the given tag name
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        let element = Self::default();
        element.lock().tag = tag.into();
        element
    }

    fn lock(&self) -> MutexGuard<'_, MockElementState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn guard_stale(&self) -> PaginaResult<MutexGuard<'_, MockElementState>> {
        let state = self.lock();
        if state.stale {
            return Err(PaginaError::StaleElement {
                message: format!("<{}> is no longer attached", state.tag),
            });
        }
        Ok(state)
    }

    /// Set the visible text, builder style
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.lock().text = text.into();
        self
    }

    /// Set an attribute, builder style
    #[must_use]
    pub fn with_attribute(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.lock().attributes.insert(name.into(), value.into());
        self
    }

    /// Set visibility, builder style
    #[must_use]
    pub fn with_displayed(self, displayed: bool) -> Self {
        self.lock().displayed = displayed;
        self
    }

    /// Set enabled state, builder style
    #[must_use]
    pub fn with_enabled(self, enabled: bool) -> Self {
        self.lock().enabled = enabled;
        self
    }

    /// Set selected state, builder style
    #[must_use]
    pub fn with_selected(self, selected: bool) -> Self {
        self.lock().selected = selected;
        self
    }

    /// Make clicks flip the selected state (checkbox/radio behavior),
    /// builder style
    #[must_use]
    pub fn with_toggle_on_click(self) -> Self {
        self.lock().toggle_on_click = true;
        self
    }

    /// Register a descendant reachable via `find_elements`, builder style
    #[must_use]
    pub fn with_child(self, locator: Locator, child: Self) -> Self {
        self.lock().children.push((locator, child));
        self
    }

    /// Change visibility after construction
    pub fn set_displayed(&self, displayed: bool) {
        self.lock().displayed = displayed;
    }

    /// Change enabled state after construction
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    /// Change selected state after construction
    pub fn set_selected(&self, selected: bool) {
        self.lock().selected = selected;
    }

    /// Change the visible text after construction
    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().text = text.into();
    }

    /// Set an attribute after construction
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.lock().attributes.insert(name.into(), value.into());
    }

    /// Detach the element; every later interaction reports `StaleElement`
    pub fn mark_stale(&self) {
        self.lock().stale = true;
    }

    /// Number of clicks received
    #[must_use]
    pub fn click_count(&self) -> u32 {
        self.lock().clicks
    }

    /// Number of clears received
    #[must_use]
    pub fn clear_count(&self) -> u32 {
        self.lock().clears
    }

    /// Every keystroke batch received, oldest first
    #[must_use]
    pub fn keys_sent(&self) -> Vec<String> {
        self.lock().keys_sent.clone()
    }
}

impl WebElement for MockElement {
    fn click(&self) -> PaginaResult<()> {
        let mut state = self.guard_stale()?;
        state.clicks += 1;
        if state.toggle_on_click {
            state.selected = !state.selected;
        }
        Ok(())
    }

    fn clear(&self) -> PaginaResult<()> {
        let mut state = self.guard_stale()?;
        state.clears += 1;
        state.attributes.insert("value".to_string(), String::new());
        Ok(())
    }

    fn send_keys(&self, text: &str) -> PaginaResult<()> {
        let mut state = self.guard_stale()?;
        state.keys_sent.push(text.to_string());
        let value = state.attributes.entry("value".to_string()).or_default();
        value.push_str(text);
        Ok(())
    }

    fn text(&self) -> PaginaResult<String> {
        Ok(self.guard_stale()?.text.clone())
    }

    fn attribute(&self, name: &str) -> PaginaResult<Option<String>> {
        Ok(self.guard_stale()?.attributes.get(name).cloned())
    }

    fn tag_name(&self) -> PaginaResult<String> {
        Ok(self.guard_stale()?.tag.clone())
    }

    fn is_displayed(&self) -> PaginaResult<bool> {
        Ok(self.guard_stale()?.displayed)
    }

    fn is_enabled(&self) -> PaginaResult<bool> {
        Ok(self.guard_stale()?.enabled)
    }

    fn is_selected(&self) -> PaginaResult<bool> {
        Ok(self.guard_stale()?.selected)
    }

    fn find_elements(&self, locator: &Locator) -> PaginaResult<Vec<Self>> {
        let state = self.guard_stale()?;
        Ok(state
            .children
            .iter()
            .filter(|(registered, _)| registered == locator)
            .map(|(_, child)| child.clone())
            .collect())
    }
}

#[derive(Debug, Default)]
struct MockDriverState {
    title: String,
    visited: Vec<String>,
    implicit_wait: Option<Duration>,
    window_handles: Vec<String>,
    alert: Option<String>,
    active: Option<MockElement>,
    elements: Vec<(Locator, MockElement)>,
    scripts: Vec<String>,
    script_result: Value,
    actions_supported: bool,
    call_history: Vec<String>,
}

/// Scriptable in-memory driver for unit testing.
///
/// Elements are registered against the exact locator the code under test
/// will resolve to. Every trait call is recorded in a call history for
/// `was_called`-style assertions, and handles are shared so tests can
/// mutate page state while a wait polls from the main thread.
#[derive(Debug, Clone)]
pub struct MockDriver {
    state: Arc<Mutex<MockDriverState>>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Create an empty mock with input actions enabled
    #[must_use]
    pub fn new() -> Self {
        let state = MockDriverState {
            actions_supported: true,
            ..MockDriverState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockDriverState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, call: impl Into<String>) {
        self.lock().call_history.push(call.into());
    }

    /// Register an element reachable through the given locator
    pub fn register(&self, locator: Locator, element: MockElement) {
        self.lock().elements.push((locator, element));
    }

    /// Remove every element registered for the given locator
    pub fn remove(&self, locator: &Locator) {
        self.lock().elements.retain(|(registered, _)| registered != locator);
    }

    /// Set the page title
    pub fn set_title(&self, title: impl Into<String>) {
        self.lock().title = title.into();
    }

    /// Open an alert with the given text
    pub fn set_alert(&self, text: impl Into<String>) {
        self.lock().alert = Some(text.into());
    }

    /// Dismiss the alert
    pub fn clear_alert(&self) {
        self.lock().alert = None;
    }

    /// Replace the open window handle set
    pub fn set_window_handles(&self, handles: Vec<String>) {
        self.lock().window_handles = handles;
    }

    /// Set the focused element returned by `active_element`
    pub fn set_active_element(&self, element: MockElement) {
        self.lock().active = Some(element);
    }

    /// Set the JSON value every `execute_script` call returns
    pub fn set_script_result(&self, result: Value) {
        self.lock().script_result = result;
    }

    /// Make the optional input-action capabilities report `NotSupported`
    pub fn disable_actions(&self) {
        self.lock().actions_supported = false;
    }

    /// Every recorded call, oldest first
    #[must_use]
    pub fn call_history(&self) -> Vec<String> {
        self.lock().call_history.clone()
    }

    /// Check whether a call with the given prefix was recorded
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.lock()
            .call_history
            .iter()
            .any(|call| call.starts_with(method))
    }

    /// Every script passed to `execute_script`, oldest first
    #[must_use]
    pub fn executed_scripts(&self) -> Vec<String> {
        self.lock().scripts.clone()
    }

    /// URLs navigated to, oldest first
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }

    /// Last implicit wait set on the driver
    #[must_use]
    pub fn implicit_wait(&self) -> Option<Duration> {
        self.lock().implicit_wait
    }

    fn actions_guard(&self, operation: &str) -> PaginaResult<()> {
        if self.lock().actions_supported {
            Ok(())
        } else {
            Err(PaginaError::NotSupported {
                operation: operation.to_string(),
            })
        }
    }
}

impl WebDriver for MockDriver {
    type Element = MockElement;

    fn find_element(&self, locator: &Locator) -> PaginaResult<Self::Element> {
        self.record(format!("find_element:{locator}"));
        self.lock()
            .elements
            .iter()
            .find(|(registered, _)| registered == locator)
            .map(|(_, element)| element.clone())
            .ok_or_else(|| PaginaError::NoSuchElement {
                locator: locator.to_string(),
            })
    }

    fn find_elements(&self, locator: &Locator) -> PaginaResult<Vec<Self::Element>> {
        self.record(format!("find_elements:{locator}"));
        Ok(self
            .lock()
            .elements
            .iter()
            .filter(|(registered, _)| registered == locator)
            .map(|(_, element)| element.clone())
            .collect())
    }

    fn goto(&self, url: &str) -> PaginaResult<()> {
        self.record(format!("goto:{url}"));
        self.lock().visited.push(url.to_string());
        Ok(())
    }

    fn title(&self) -> PaginaResult<String> {
        self.record("title");
        Ok(self.lock().title.clone())
    }

    fn execute_script(&self, script: &str) -> PaginaResult<Value> {
        self.record("execute_script");
        let mut state = self.lock();
        state.scripts.push(script.to_string());
        Ok(state.script_result.clone())
    }

    fn implicitly_wait(&self, timeout: Duration) -> PaginaResult<()> {
        self.record(format!("implicitly_wait:{}ms", timeout.as_millis()));
        self.lock().implicit_wait = Some(timeout);
        Ok(())
    }

    fn window_handles(&self) -> PaginaResult<Vec<String>> {
        self.record("window_handles");
        Ok(self.lock().window_handles.clone())
    }

    fn switch_to_frame(&self, frame: &Self::Element) -> PaginaResult<()> {
        let tag = frame.tag_name()?;
        self.record(format!("switch_to_frame:{tag}"));
        Ok(())
    }

    fn alert_text(&self) -> PaginaResult<String> {
        self.record("alert_text");
        self.lock().alert.clone().ok_or(PaginaError::NoAlert)
    }

    fn active_element(&self) -> PaginaResult<Self::Element> {
        self.record("active_element");
        self.lock()
            .active
            .clone()
            .ok_or_else(|| PaginaError::Driver {
                message: "no active element set".to_string(),
            })
    }

    fn quit(&self) -> PaginaResult<()> {
        self.record("quit");
        Ok(())
    }

    fn double_click(&self, element: &Self::Element) -> PaginaResult<()> {
        self.actions_guard("double_click")?;
        self.record("double_click");
        element.click()?;
        element.click()
    }

    fn move_to_element(
        &self,
        element: &Self::Element,
        offset: Option<(i64, i64)>,
    ) -> PaginaResult<()> {
        self.actions_guard("move_to_element")?;
        let tag = element.tag_name()?;
        match offset {
            Some((x, y)) => self.record(format!("move_to_element:{tag}:{x},{y}")),
            None => self.record(format!("move_to_element:{tag}")),
        }
        Ok(())
    }

    fn drag_and_drop(
        &self,
        source: &Self::Element,
        target: &Self::Element,
    ) -> PaginaResult<()> {
        self.actions_guard("drag_and_drop")?;
        let from = source.tag_name()?;
        let to = target.tag_name()?;
        self.record(format!("drag_and_drop:{from}->{to}"));
        Ok(())
    }

    fn scroll_into_view(&self, element: &Self::Element) -> PaginaResult<()> {
        self.actions_guard("scroll_into_view")?;
        let tag = element.tag_name()?;
        self.record(format!("scroll_into_view:{tag}"));
        Ok(())
    }
}
