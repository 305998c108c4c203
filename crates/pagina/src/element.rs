//! Bound element descriptors.
//!
//! An [`ElementSpec`] pairs a locator with an element kind; reading or
//! writing through it runs the kind's wait-and-interact recipe against
//! a wait engine:
//!
//! | kind          | read                                   | write                          |
//! |---------------|----------------------------------------|--------------------------------|
//! | `Element`     | immediate lookup, no wait              | unsupported                    |
//! | `TextBox`     | wait visible, `value` attribute        | wait visible, clear, type      |
//! | `Button`      | wait clickable, the element            | unsupported                    |
//! | `RadioButton` | wait clickable, selection state        | truthy: wait + click; falsy: nothing |
//! | `Checkbox`    | wait clickable, selection state        | wait + click only on change    |
//! | `Selector`    | wait clickable, [`Select`] helper      | unsupported, use the helper    |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::driver::{WebDriver, WebElement};
use crate::locator::{keywords_to_locator, Keywords, Locator};
use crate::result::{PaginaError, PaginaResult};
use crate::select::Select;
use crate::wait::Wait;

// =============================================================================
// ELEMENT KINDS
// =============================================================================

/// Interaction recipe attached to a located element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Raw element access without waiting
    Element,
    /// Single-line text input
    TextBox,
    /// Clickable button
    Button,
    /// One choice in a radio group
    RadioButton,
    /// Toggleable checkbox
    Checkbox,
    /// `<select>` drop-down
    Selector,
}

impl ElementKind {
    /// Canonical string form of the kind
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::TextBox => "text_box",
            Self::Button => "button",
            Self::RadioButton => "radio_button",
            Self::Checkbox => "checkbox",
            Self::Selector => "selector",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// VALUES
// =============================================================================

/// What a descriptor read yields, depending on its kind
#[derive(Debug, Clone)]
pub enum ElementValue<E> {
    /// The located element itself
    Element(E),
    /// Contents of a text box's `value` attribute
    Text(String),
    /// Selection state of a radio button or checkbox
    Selected(bool),
    /// Drop-down helper for a `<select>`
    Selection(Select<E>),
}

impl<E> ElementValue<E> {
    /// The element, when the read yielded one
    #[must_use]
    pub const fn element(&self) -> Option<&E> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The text, when the read yielded text
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The selection state, when the read yielded one
    #[must_use]
    pub const fn selected(&self) -> Option<bool> {
        match self {
            Self::Selected(selected) => Some(*selected),
            _ => None,
        }
    }

    /// The drop-down helper, when the read yielded one
    #[must_use]
    pub const fn selection(&self) -> Option<&Select<E>> {
        match self {
            Self::Selection(select) => Some(select),
            _ => None,
        }
    }

    /// Short description of what the value holds
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Element(_) => "an element",
            Self::Text(_) => "text",
            Self::Selected(_) => "a selection state",
            Self::Selection(_) => "a selection helper",
        }
    }
}

/// Value accepted by a descriptor write: text for text boxes, a state
/// for radio buttons and checkboxes. Numbers convert to their text
/// form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetValue {
    /// Text to type
    Text(String),
    /// Desired selection state
    State(bool),
}

impl SetValue {
    fn into_text(self) -> PaginaResult<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::State(state) => Err(PaginaError::InvalidArguments {
                message: format!("expected text to type, got boolean {state}"),
            }),
        }
    }

    fn into_state(self) -> PaginaResult<bool> {
        match self {
            Self::State(state) => Ok(state),
            Self::Text(text) => Err(PaginaError::InvalidArguments {
                message: format!("expected a boolean state, got text {text:?}"),
            }),
        }
    }
}

impl From<&str> for SetValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for SetValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for SetValue {
    fn from(state: bool) -> Self {
        Self::State(state)
    }
}

impl From<i32> for SetValue {
    fn from(number: i32) -> Self {
        Self::Text(number.to_string())
    }
}

impl From<i64> for SetValue {
    fn from(number: i64) -> Self {
        Self::Text(number.to_string())
    }
}

impl From<u64> for SetValue {
    fn from(number: u64) -> Self {
        Self::Text(number.to_string())
    }
}

impl From<f64> for SetValue {
    fn from(number: f64) -> Self {
        Self::Text(number.to_string())
    }
}

// =============================================================================
// DESCRIPTORS
// =============================================================================

fn value_locator(input_type: &str, value: &str) -> Locator {
    Locator::xpath(format!(
        ".//input[@type='{input_type}' and @value='{value}']"
    ))
}

/// A bound element descriptor: an element kind plus the locator it
/// acts through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    kind: ElementKind,
    locator: Locator,
}

impl ElementSpec {
    /// Create a descriptor from a kind and locator
    #[must_use]
    pub const fn new(kind: ElementKind, locator: Locator) -> Self {
        Self { kind, locator }
    }

    /// Raw element descriptor
    #[must_use]
    pub const fn element(locator: Locator) -> Self {
        Self::new(ElementKind::Element, locator)
    }

    /// Text-box descriptor
    #[must_use]
    pub const fn text_box(locator: Locator) -> Self {
        Self::new(ElementKind::TextBox, locator)
    }

    /// Button descriptor
    #[must_use]
    pub const fn button(locator: Locator) -> Self {
        Self::new(ElementKind::Button, locator)
    }

    /// Radio-button descriptor
    #[must_use]
    pub const fn radio_button(locator: Locator) -> Self {
        Self::new(ElementKind::RadioButton, locator)
    }

    /// Checkbox descriptor
    #[must_use]
    pub const fn checkbox(locator: Locator) -> Self {
        Self::new(ElementKind::Checkbox, locator)
    }

    /// Drop-down descriptor
    #[must_use]
    pub const fn selector(locator: Locator) -> Self {
        Self::new(ElementKind::Selector, locator)
    }

    /// Text-box descriptor matching on the input's `value` attribute
    #[must_use]
    pub fn text_box_with_value(value: &str) -> Self {
        Self::new(ElementKind::TextBox, value_locator("text", value))
    }

    /// Radio-button descriptor matching on the input's `value`
    /// attribute
    #[must_use]
    pub fn radio_button_with_value(value: &str) -> Self {
        Self::new(ElementKind::RadioButton, value_locator("radio", value))
    }

    /// Checkbox descriptor matching on the input's `value` attribute
    #[must_use]
    pub fn checkbox_with_value(value: &str) -> Self {
        Self::new(ElementKind::Checkbox, value_locator("checkbox", value))
    }

    /// Build a descriptor of the given kind from a keyword bag.
    ///
    /// A `value` keyword synthesizes an XPath locator on the matching
    /// input's `value` attribute and takes precedence over any locator
    /// keyword in the same bag; otherwise the bag must hold exactly one
    /// shorthand locator keyword.
    ///
    /// # Errors
    ///
    /// `InvalidArguments` when `value` is given for a kind without
    /// value matching, or when the bag does not reduce to one locator.
    pub fn from_keywords(kind: ElementKind, mut keywords: Keywords) -> PaginaResult<Self> {
        if let Some(value) = keywords.remove("value") {
            let text = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                other => {
                    return Err(PaginaError::InvalidArguments {
                        message: format!(
                            "descriptor keyword `value` expects a string or number, got {other}"
                        ),
                    });
                }
            };
            let input_type = match kind {
                ElementKind::TextBox => "text",
                ElementKind::RadioButton => "radio",
                ElementKind::Checkbox => "checkbox",
                other => {
                    return Err(PaginaError::InvalidArguments {
                        message: format!(
                            "descriptor keyword `value` is not available for {other} descriptors"
                        ),
                    });
                }
            };
            return Ok(Self::new(kind, value_locator(input_type, &text)));
        }
        Ok(Self::new(kind, keywords_to_locator(&keywords)?))
    }

    /// The descriptor's kind
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The locator the descriptor acts through
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Read through the descriptor, running the kind's wait recipe.
    ///
    /// # Errors
    ///
    /// `NoSuchElement` for a plain element lookup that finds nothing;
    /// `Timeout` when a waited condition never holds; driver failures
    /// propagate.
    pub fn read<D: WebDriver>(&self, wait: &Wait<D>) -> PaginaResult<ElementValue<D::Element>> {
        match self.kind {
            ElementKind::Element => {
                let element = wait.driver().find_element(&self.locator)?;
                Ok(ElementValue::Element(element))
            }
            ElementKind::TextBox => {
                let element = wait
                    .until
                    .visibility_of_element_located(self.locator.clone())?;
                let value = element.attribute("value")?.unwrap_or_default();
                Ok(ElementValue::Text(value))
            }
            ElementKind::Button => {
                let element = wait.until.element_to_be_clickable(self.locator.clone())?;
                Ok(ElementValue::Element(element))
            }
            ElementKind::RadioButton | ElementKind::Checkbox => {
                let element = wait.until.element_to_be_clickable(self.locator.clone())?;
                Ok(ElementValue::Selected(element.is_selected()?))
            }
            ElementKind::Selector => {
                let element = wait.until.element_to_be_clickable(self.locator.clone())?;
                Ok(ElementValue::Selection(Select::new(element)?))
            }
        }
    }

    /// Write through the descriptor, running the kind's wait recipe.
    ///
    /// A falsy radio-button write is a no-op that touches neither the
    /// wait engine nor the driver.
    ///
    /// # Errors
    ///
    /// `Unsupported` for read-only kinds; `InvalidArguments` for a
    /// value of the wrong shape; `Timeout` when a waited condition
    /// never holds.
    pub fn write<D: WebDriver>(
        &self,
        wait: &Wait<D>,
        value: impl Into<SetValue>,
    ) -> PaginaResult<()> {
        match self.kind {
            ElementKind::Element => Err(PaginaError::Unsupported {
                message: "cannot write through a plain element descriptor".to_owned(),
            }),
            ElementKind::TextBox => {
                let text = value.into().into_text()?;
                let element = wait
                    .until
                    .visibility_of_element_located(self.locator.clone())?;
                element.clear()?;
                element.send_keys(&text)
            }
            ElementKind::Button => Err(PaginaError::Unsupported {
                message: "cannot write through a button descriptor".to_owned(),
            }),
            ElementKind::RadioButton => {
                if !value.into().into_state()? {
                    return Ok(());
                }
                let element = wait.until.element_to_be_clickable(self.locator.clone())?;
                element.click()
            }
            ElementKind::Checkbox => {
                let desired = value.into().into_state()?;
                let element = wait.until.element_to_be_clickable(self.locator.clone())?;
                if element.is_selected()? == desired {
                    return Ok(());
                }
                element.click()
            }
            ElementKind::Selector => Err(PaginaError::Unsupported {
                message: "cannot assign to a drop-down; read it and use the selection helper"
                    .to_owned(),
            }),
        }
    }
}

impl fmt::Display for ElementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.locator)
    }
}
