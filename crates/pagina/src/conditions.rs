//! Named wait conditions.
//!
//! Each factory builds an opaque [`Condition`] that the wait engine
//! polls against the live driver. A check yields `Ok(Some(value))` when
//! the condition holds (the value is what the wait call returns),
//! `Ok(None)` when it does not hold yet, and `Err` for failures. A
//! `NoSuchElement` error is left to propagate: the engine treats it as
//! "not yet" while polling truthy-ward and as immediate success when
//! polling falsy-ward. Staleness is handled per condition, matching the
//! locator-based conditions' tolerance for elements that are replaced
//! mid-poll.

use crate::driver::{WebDriver, WebElement};
use crate::locator::Locator;
use crate::result::{PaginaError, PaginaResult};

/// Opaque predicate polled by the wait engine.
pub trait Condition<D: WebDriver> {
    /// Value produced when the condition holds
    type Output;

    /// Evaluate once against the live driver
    ///
    /// # Errors
    ///
    /// Driver-level failures; `NoSuchElement` is interpreted by the
    /// engine rather than the condition.
    fn check(&self, driver: &D) -> PaginaResult<Option<Self::Output>>;

    /// Description used in timeout errors
    fn description(&self) -> String;
}

/// A function-based condition
pub struct FnCondition<F> {
    func: F,
    description: String,
}

impl<F> std::fmt::Debug for FnCondition<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<F> FnCondition<F> {
    /// Create a new function condition
    pub fn new(func: F, description: impl Into<String>) -> Self {
        Self {
            func,
            description: description.into(),
        }
    }
}

impl<D, T, F> Condition<D> for FnCondition<F>
where
    D: WebDriver,
    F: Fn(&D) -> PaginaResult<Option<T>>,
{
    type Output = T;

    fn check(&self, driver: &D) -> PaginaResult<Option<T>> {
        (self.func)(driver)
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

fn element_if_visible<E: WebElement>(element: &E) -> PaginaResult<Option<E>> {
    match element.is_displayed() {
        Ok(true) => Ok(Some(element.clone())),
        Ok(false) => Ok(None),
        Err(PaginaError::StaleElement { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Condition: the page title equals `title` exactly
pub fn title_is<D: WebDriver>(title: impl Into<String>) -> impl Condition<D, Output = bool> {
    let title = title.into();
    let description = format!("title to be {title:?}");
    FnCondition::new(
        move |driver: &D| Ok((driver.title()? == title).then_some(true)),
        description,
    )
}

/// Condition: the page title contains `fragment`
pub fn title_contains<D: WebDriver>(
    fragment: impl Into<String>,
) -> impl Condition<D, Output = bool> {
    let fragment = fragment.into();
    let description = format!("title to contain {fragment:?}");
    FnCondition::new(
        move |driver: &D| Ok(driver.title()?.contains(&fragment).then_some(true)),
        description,
    )
}

/// Condition: an element matching the locator is attached to the DOM
pub fn presence_of_element_located<D: WebDriver>(
    locator: Locator,
) -> impl Condition<D, Output = D::Element> {
    let description = format!("presence of element located by {locator}");
    FnCondition::new(
        move |driver: &D| driver.find_element(&locator).map(Some),
        description,
    )
}

/// Condition: an element matching the locator is attached and displayed
pub fn visibility_of_element_located<D: WebDriver>(
    locator: Locator,
) -> impl Condition<D, Output = D::Element> {
    let description = format!("visibility of element located by {locator}");
    FnCondition::new(
        move |driver: &D| {
            let element = driver.find_element(&locator)?;
            element_if_visible(&element)
        },
        description,
    )
}

/// Condition: a known element is displayed
pub fn visibility_of<D: WebDriver>(element: D::Element) -> impl Condition<D, Output = D::Element> {
    FnCondition::new(
        move |_driver: &D| element_if_visible(&element),
        "visibility of element",
    )
}

/// Condition: at least one element matches the locator; yields them all
pub fn presence_of_all_elements_located<D: WebDriver>(
    locator: Locator,
) -> impl Condition<D, Output = Vec<D::Element>> {
    let description = format!("presence of all elements located by {locator}");
    FnCondition::new(
        move |driver: &D| {
            let elements = driver.find_elements(&locator)?;
            Ok(if elements.is_empty() {
                None
            } else {
                Some(elements)
            })
        },
        description,
    )
}

/// Condition: at least one element matching the locator is displayed;
/// yields the displayed subset
pub fn visibility_of_any_elements_located<D: WebDriver>(
    locator: Locator,
) -> impl Condition<D, Output = Vec<D::Element>> {
    let description = format!("visibility of any elements located by {locator}");
    FnCondition::new(
        move |driver: &D| {
            let mut visible = Vec::new();
            for element in driver.find_elements(&locator)? {
                match element.is_displayed() {
                    Ok(true) => visible.push(element),
                    Ok(false) | Err(PaginaError::StaleElement { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(if visible.is_empty() {
                None
            } else {
                Some(visible)
            })
        },
        description,
    )
}

/// Condition: the located element's visible text contains `text`
pub fn text_to_be_present_in_element<D: WebDriver>(
    locator: Locator,
    text: impl Into<String>,
) -> impl Condition<D, Output = bool> {
    let text = text.into();
    let description = format!("text {text:?} in element located by {locator}");
    FnCondition::new(
        move |driver: &D| {
            let element = driver.find_element(&locator)?;
            match element.text() {
                Ok(content) => Ok(content.contains(&text).then_some(true)),
                Err(PaginaError::StaleElement { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        },
        description,
    )
}

/// Condition: the located element's `value` attribute contains `text`
pub fn text_to_be_present_in_element_value<D: WebDriver>(
    locator: Locator,
    text: impl Into<String>,
) -> impl Condition<D, Output = bool> {
    let text = text.into();
    let description = format!("text {text:?} in value of element located by {locator}");
    FnCondition::new(
        move |driver: &D| {
            let element = driver.find_element(&locator)?;
            match element.attribute("value") {
                Ok(Some(value)) => Ok(value.contains(&text).then_some(true)),
                Ok(None) => Ok(None),
                Err(PaginaError::StaleElement { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        },
        description,
    )
}

/// Condition: the located frame exists; switches the driver into it
pub fn frame_to_be_available_and_switch_to_it<D: WebDriver>(
    locator: Locator,
) -> impl Condition<D, Output = bool> {
    let description = format!("frame located by {locator} to be available");
    FnCondition::new(
        move |driver: &D| {
            let frame = driver.find_element(&locator)?;
            match driver.switch_to_frame(&frame) {
                Ok(()) => Ok(Some(true)),
                Err(PaginaError::StaleElement { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        },
        description,
    )
}

/// Condition: no element matches the locator, or the match is hidden
pub fn invisibility_of_element_located<D: WebDriver>(
    locator: Locator,
) -> impl Condition<D, Output = bool> {
    let description = format!("invisibility of element located by {locator}");
    FnCondition::new(
        move |driver: &D| match driver.find_element(&locator) {
            Ok(element) => match element.is_displayed() {
                Ok(displayed) => Ok((!displayed).then_some(true)),
                Err(PaginaError::StaleElement { .. }) => Ok(Some(true)),
                Err(e) => Err(e),
            },
            Err(PaginaError::NoSuchElement { .. }) => Ok(Some(true)),
            Err(e) => Err(e),
        },
        description,
    )
}

/// Condition: the located element is displayed and enabled
pub fn element_to_be_clickable<D: WebDriver>(
    locator: Locator,
) -> impl Condition<D, Output = D::Element> {
    let description = format!("element located by {locator} to be clickable");
    FnCondition::new(
        move |driver: &D| {
            let element = driver.find_element(&locator)?;
            let Some(element) = element_if_visible(&element)? else {
                return Ok(None);
            };
            if element.is_enabled()? {
                Ok(Some(element))
            } else {
                Ok(None)
            }
        },
        description,
    )
}

/// Condition: a known element has been detached from the DOM
pub fn staleness_of<D: WebDriver>(element: D::Element) -> impl Condition<D, Output = bool> {
    FnCondition::new(
        move |_driver: &D| match element.is_enabled() {
            Ok(_) => Ok(None),
            Err(PaginaError::StaleElement { .. }) => Ok(Some(true)),
            Err(e) => Err(e),
        },
        "staleness of element",
    )
}

/// Condition: a known element is selected
pub fn element_to_be_selected<D: WebDriver>(
    element: D::Element,
) -> impl Condition<D, Output = bool> {
    FnCondition::new(
        move |_driver: &D| Ok(element.is_selected()?.then_some(true)),
        "element to be selected",
    )
}

/// Condition: the located element is selected
pub fn element_located_to_be_selected<D: WebDriver>(
    locator: Locator,
) -> impl Condition<D, Output = bool> {
    let description = format!("element located by {locator} to be selected");
    FnCondition::new(
        move |driver: &D| {
            let element = driver.find_element(&locator)?;
            match element.is_selected() {
                Ok(selected) => Ok(selected.then_some(true)),
                Err(PaginaError::StaleElement { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        },
        description,
    )
}

/// Condition: a known element's selection state equals `selected`
pub fn element_selection_state_to_be<D: WebDriver>(
    element: D::Element,
    selected: bool,
) -> impl Condition<D, Output = bool> {
    let description = format!("element selection state to be {selected}");
    FnCondition::new(
        move |_driver: &D| Ok((element.is_selected()? == selected).then_some(true)),
        description,
    )
}

/// Condition: the located element's selection state equals `selected`
pub fn element_located_selection_state_to_be<D: WebDriver>(
    locator: Locator,
    selected: bool,
) -> impl Condition<D, Output = bool> {
    let description =
        format!("element located by {locator} selection state to be {selected}");
    FnCondition::new(
        move |driver: &D| {
            let element = driver.find_element(&locator)?;
            match element.is_selected() {
                Ok(state) => Ok((state == selected).then_some(true)),
                Err(PaginaError::StaleElement { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        },
        description,
    )
}

/// Condition: exactly `count` windows are open
pub fn number_of_windows_to_be<D: WebDriver>(count: usize) -> impl Condition<D, Output = bool> {
    let description = format!("number of windows to be {count}");
    FnCondition::new(
        move |driver: &D| Ok((driver.window_handles()?.len() == count).then_some(true)),
        description,
    )
}

/// Condition: more windows are open than in the snapshot taken before
/// the triggering action
pub fn new_window_is_opened<D: WebDriver>(
    current_handles: Vec<String>,
) -> impl Condition<D, Output = bool> {
    FnCondition::new(
        move |driver: &D| {
            Ok((driver.window_handles()?.len() > current_handles.len()).then_some(true))
        },
        "a new window to be opened",
    )
}

/// Condition: an alert is open; yields its text
pub fn alert_is_present<D: WebDriver>() -> impl Condition<D, Output = String> {
    FnCondition::new(
        move |driver: &D| match driver.alert_text() {
            Ok(text) => Ok(Some(text)),
            Err(PaginaError::NoAlert) => Ok(None),
            Err(e) => Err(e),
        },
        "alert to be present",
    )
}
