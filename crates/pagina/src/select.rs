//! Drop-down helper for `<select>` elements.
//!
//! [`Select`] wraps an already-located element and exposes option-level
//! reads and writes. Selecting is idempotent: an option that is already
//! in the requested state is left alone rather than clicked again.

use crate::driver::WebElement;
use crate::locator::Locator;
use crate::result::{PaginaError, PaginaResult};

/// Typed access to a `<select>` element and its options
#[derive(Debug, Clone)]
pub struct Select<E> {
    element: E,
    multiple: bool,
}

impl<E: WebElement> Select<E> {
    /// Wrap a located `<select>` element.
    ///
    /// Multi-select support is read from the element's `multiple`
    /// attribute (absent or `"false"` means single-select).
    ///
    /// # Errors
    ///
    /// `InvalidArguments` when the element is not a `<select>`.
    pub fn new(element: E) -> PaginaResult<Self> {
        let tag = element.tag_name()?;
        if !tag.eq_ignore_ascii_case("select") {
            return Err(PaginaError::InvalidArguments {
                message: format!("selection helper needs a <select> element, got <{tag}>"),
            });
        }
        let multiple = element
            .attribute("multiple")?
            .is_some_and(|value| value != "false");
        Ok(Self { element, multiple })
    }

    /// The wrapped `<select>` element
    #[must_use]
    pub const fn element(&self) -> &E {
        &self.element
    }

    /// Whether the drop-down allows multiple selections
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// All `<option>` elements under the drop-down
    ///
    /// # Errors
    ///
    /// Driver-level lookup failures.
    pub fn options(&self) -> PaginaResult<Vec<E>> {
        self.element.find_elements(&Locator::tag_name("option"))
    }

    /// All currently selected options
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    pub fn all_selected_options(&self) -> PaginaResult<Vec<E>> {
        let mut selected = Vec::new();
        for option in self.options()? {
            if option.is_selected()? {
                selected.push(option);
            }
        }
        Ok(selected)
    }

    /// The first currently selected option
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when nothing is selected.
    pub fn first_selected_option(&self) -> PaginaResult<E> {
        for option in self.options()? {
            if option.is_selected()? {
                return Ok(option);
            }
        }
        Err(PaginaError::NoSuchElement {
            locator: "selected option in drop-down".to_owned(),
        })
    }

    /// Select every option whose whitespace-normalized visible text
    /// equals `text` (first match only on a single-select).
    ///
    /// Normalization trims and collapses internal whitespace runs, so
    /// markup-indented option text still matches.
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when no option matches.
    pub fn select_by_visible_text(&self, text: &str) -> PaginaResult<()> {
        let wanted = normalize_space(text);
        let mut matched = false;
        for option in self.options()? {
            if normalize_space(&option.text()?) == wanted {
                matched = true;
                self.set_selected(&option)?;
                if !self.multiple {
                    return Ok(());
                }
            }
        }
        if matched {
            Ok(())
        } else {
            Err(PaginaError::NoSuchElement {
                locator: format!("option with visible text {text:?}"),
            })
        }
    }

    /// Select every option whose `value` attribute equals `value`
    /// (first match only on a single-select).
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when no option matches.
    pub fn select_by_value(&self, value: &str) -> PaginaResult<()> {
        let mut matched = false;
        for option in self.options()? {
            if option.attribute("value")?.as_deref() == Some(value) {
                matched = true;
                self.set_selected(&option)?;
                if !self.multiple {
                    return Ok(());
                }
            }
        }
        if matched {
            Ok(())
        } else {
            Err(PaginaError::NoSuchElement {
                locator: format!("option with value {value:?}"),
            })
        }
    }

    /// Select the option at the given zero-based position
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when the index is out of range.
    pub fn select_by_index(&self, index: usize) -> PaginaResult<()> {
        let options = self.options()?;
        let option = options
            .get(index)
            .ok_or_else(|| PaginaError::NoSuchElement {
                locator: format!("option at index {index}"),
            })?;
        self.set_selected(option)
    }

    /// Clear every selection on a multi-select drop-down
    ///
    /// # Errors
    ///
    /// `Unsupported` on a single-select.
    pub fn deselect_all(&self) -> PaginaResult<()> {
        if !self.multiple {
            return Err(PaginaError::Unsupported {
                message: "deselect_all requires a multi-select drop-down".to_owned(),
            });
        }
        for option in self.options()? {
            if option.is_selected()? {
                option.click()?;
            }
        }
        Ok(())
    }

    fn set_selected(&self, option: &E) -> PaginaResult<()> {
        if !option.is_selected()? {
            option.click()?;
        }
        Ok(())
    }
}

fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockElement;

    fn option(text: &str, value: &str) -> MockElement {
        MockElement::new("option")
            .with_text(text)
            .with_attribute("value", value)
            .with_toggle_on_click()
    }

    fn color_select() -> MockElement {
        MockElement::new("select")
            .with_child(Locator::tag_name("option"), option("Red", "red"))
            .with_child(Locator::tag_name("option"), option("Green", "green"))
            .with_child(Locator::tag_name("option"), option("Blue", "blue"))
    }

    #[test]
    fn test_rejects_non_select_tag() {
        let err = Select::new(MockElement::new("div")).unwrap_err();
        assert!(matches!(err, PaginaError::InvalidArguments { .. }));
        assert!(err.to_string().contains("<div>"));
    }

    #[test]
    fn test_detects_multiple_attribute() {
        let single = Select::new(color_select()).unwrap();
        assert!(!single.is_multiple());

        let multi = Select::new(color_select().with_attribute("multiple", "multiple")).unwrap();
        assert!(multi.is_multiple());

        let disabled = Select::new(color_select().with_attribute("multiple", "false")).unwrap();
        assert!(!disabled.is_multiple());
    }

    #[test]
    fn test_options_lists_children() {
        let select = Select::new(color_select()).unwrap();
        let options = select.options().unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].text().unwrap(), "Red");
    }

    #[test]
    fn test_select_by_visible_text() {
        let select = Select::new(color_select()).unwrap();
        select.select_by_visible_text("Green").unwrap();
        let chosen = select.first_selected_option().unwrap();
        assert_eq!(chosen.attribute("value").unwrap().unwrap(), "green");
    }

    #[test]
    fn test_select_is_idempotent() {
        let select = Select::new(color_select()).unwrap();
        select.select_by_visible_text("Blue").unwrap();
        select.select_by_visible_text("Blue").unwrap();
        let chosen = select.first_selected_option().unwrap();
        assert_eq!(chosen.click_count(), 1);
        assert!(chosen.is_selected().unwrap());
    }

    #[test]
    fn test_select_by_visible_text_trims_whitespace() {
        let select = Select::new(
            MockElement::new("select")
                .with_child(Locator::tag_name("option"), option("  Red  ", "red")),
        )
        .unwrap();
        select.select_by_visible_text("Red").unwrap();
        assert!(select.first_selected_option().is_ok());
    }

    #[test]
    fn test_select_by_visible_text_collapses_internal_whitespace() {
        let select = Select::new(MockElement::new("select").with_child(
            Locator::tag_name("option"),
            option("Dark\n        Red", "dark-red"),
        ))
        .unwrap();
        select.select_by_visible_text("Dark Red").unwrap();
        let chosen = select.first_selected_option().unwrap();
        assert_eq!(chosen.attribute("value").unwrap().unwrap(), "dark-red");
    }

    #[test]
    fn test_select_by_unknown_text_fails() {
        let select = Select::new(color_select()).unwrap();
        let err = select.select_by_visible_text("Mauve").unwrap_err();
        assert!(matches!(err, PaginaError::NoSuchElement { .. }));
        assert!(err.to_string().contains("Mauve"));
    }

    #[test]
    fn test_select_by_value() {
        let select = Select::new(color_select()).unwrap();
        select.select_by_value("blue").unwrap();
        let chosen = select.first_selected_option().unwrap();
        assert_eq!(chosen.text().unwrap(), "Blue");

        let err = select.select_by_value("mauve").unwrap_err();
        assert!(matches!(err, PaginaError::NoSuchElement { .. }));
    }

    #[test]
    fn test_select_by_index() {
        let select = Select::new(color_select()).unwrap();
        select.select_by_index(0).unwrap();
        assert_eq!(
            select.first_selected_option().unwrap().text().unwrap(),
            "Red"
        );

        let err = select.select_by_index(9).unwrap_err();
        assert!(err.to_string().contains("index 9"));
    }

    #[test]
    fn test_first_selected_option_requires_a_selection() {
        let select = Select::new(color_select()).unwrap();
        let err = select.first_selected_option().unwrap_err();
        assert!(matches!(err, PaginaError::NoSuchElement { .. }));
    }

    #[test]
    fn test_multi_select_accumulates() {
        let select =
            Select::new(color_select().with_attribute("multiple", "multiple")).unwrap();
        select.select_by_value("red").unwrap();
        select.select_by_value("blue").unwrap();
        let selected = select.all_selected_options().unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_deselect_all() {
        let select =
            Select::new(color_select().with_attribute("multiple", "multiple")).unwrap();
        select.select_by_value("red").unwrap();
        select.select_by_value("green").unwrap();
        select.deselect_all().unwrap();
        assert!(select.all_selected_options().unwrap().is_empty());

        let single = Select::new(color_select()).unwrap();
        let err = single.deselect_all().unwrap_err();
        assert!(matches!(err, PaginaError::Unsupported { .. }));
    }
}
