//! Canned interaction recipes.
//!
//! [`Interactions`] bundles the multi-step driver sequences that page
//! flows repeat: click a button by its text, type into whatever has
//! focus, hover, drag, scroll. Typing, dragging and scrolling recipes
//! wait for visibility through the bundled engine first; the click and
//! hover recipes find their target directly, and every `*_element`
//! variant acts on an already-located handle.

use std::sync::Arc;
use std::time::Duration;

use crate::driver::{keys, WebDriver, WebElement};
use crate::locator::{Locator, Target};
use crate::result::PaginaResult;
use crate::select::Select;
use crate::wait::Wait;

/// Interaction recipes over one driver handle
#[derive(Debug, Clone)]
pub struct Interactions<D> {
    driver: Arc<D>,
    wait: Wait<D>,
}

impl<D: WebDriver> Interactions<D> {
    /// Create a recipe set whose waits use the given timeout
    #[must_use]
    pub fn new(driver: Arc<D>, timeout: Duration) -> Self {
        Self {
            wait: Wait::new(Arc::clone(&driver), timeout),
            driver,
        }
    }

    /// The wait engine backing the locator-taking recipes
    #[must_use]
    pub const fn wait(&self) -> &Wait<D> {
        &self.wait
    }

    /// Click an SVG node addressed by a CSS selector.
    ///
    /// SVG nodes swallow native clicks in several browsers, so the
    /// click is dispatched as a synthetic SVG event instead.
    ///
    /// # Errors
    ///
    /// Driver-level script failures.
    pub fn click_svg_element(&self, css: &str) -> PaginaResult<()> {
        let script = format!(
            r#"var ev = document.createEvent("SVGEvents");
ev.initEvent("click",true,true);
var target = $("{css}").get(0);
target.dispatchEvent(ev);"#
        );
        self.driver.execute_script(&script)?;
        Ok(())
    }

    /// Click the first button whose text contains `text`
    ///
    /// # Errors
    ///
    /// Driver-level script failures.
    pub fn click_button_with_text(&self, text: &str) -> PaginaResult<()> {
        let script = format!(r#"return $('button:contains("{text}")').click()"#);
        self.driver.execute_script(&script)?;
        Ok(())
    }

    /// Click the link with the given link text
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when no link matches.
    pub fn click_link_with_text(&self, text: &str) -> PaginaResult<()> {
        self.driver.find_element(&Locator::link_text(text))?.click()
    }

    /// Type text plus a return key into whatever element has focus
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    pub fn type_in_active_element(&self, text: &str) -> PaginaResult<()> {
        let element = self.driver.active_element()?;
        element.send_keys(&format!("{text}{}", keys::RETURN))
    }

    /// Double-click the element matching the target (no wait)
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when nothing matches; `NotSupported` on backends
    /// without input actions.
    pub fn double_click(&self, target: impl Into<Target>) -> PaginaResult<()> {
        let element = self.driver.find_element(&target.into().resolve()?)?;
        self.double_click_element(&element)
    }

    /// Double-click an already-located element
    ///
    /// # Errors
    ///
    /// `NotSupported` on backends without input actions.
    pub fn double_click_element(&self, element: &D::Element) -> PaginaResult<()> {
        self.driver.double_click(element)
    }

    /// Hover over the element matching the target (no wait)
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when nothing matches; `NotSupported` on backends
    /// without input actions.
    pub fn hover(&self, target: impl Into<Target>) -> PaginaResult<()> {
        let element = self.driver.find_element(&target.into().resolve()?)?;
        self.hover_element(&element)
    }

    /// Hover offset in pixels from the target's top-left corner.
    ///
    /// A zero offset hovers over the element center.
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when nothing matches; `NotSupported` on backends
    /// without input actions.
    pub fn hover_with_offset(
        &self,
        target: impl Into<Target>,
        x_offset: i64,
        y_offset: i64,
    ) -> PaginaResult<()> {
        let element = self.driver.find_element(&target.into().resolve()?)?;
        let offset = (x_offset != 0 || y_offset != 0).then_some((x_offset, y_offset));
        self.driver.move_to_element(&element, offset)
    }

    /// Hover over an already-located element
    ///
    /// # Errors
    ///
    /// `NotSupported` on backends without input actions.
    pub fn hover_element(&self, element: &D::Element) -> PaginaResult<()> {
        self.driver.move_to_element(element, None)
    }

    /// Select a drop-down option by its visible text, waiting for the
    /// drop-down to appear first
    ///
    /// # Errors
    ///
    /// `Timeout` when the drop-down never appears; `NoSuchElement` when
    /// no option matches.
    pub fn select_from_drop_down(
        &self,
        option: &str,
        target: impl Into<Target>,
    ) -> PaginaResult<()> {
        let element = self.wait.until.visibility_of_element_located(target)?;
        Select::new(element)?.select_by_visible_text(option)
    }

    /// Type text plus a return key into the located element
    ///
    /// # Errors
    ///
    /// `Timeout` when the element never becomes visible.
    pub fn type_and_enter(&self, text: &str, target: impl Into<Target>) -> PaginaResult<()> {
        let element = self.wait.until.visibility_of_element_located(target)?;
        element.send_keys(&format!("{text}{}", keys::RETURN))
    }

    /// Send a return key to the located element
    ///
    /// # Errors
    ///
    /// `Timeout` when the element never becomes visible.
    pub fn send_return(&self, target: impl Into<Target>) -> PaginaResult<()> {
        let element = self.wait.until.visibility_of_element_located(target)?;
        element.send_keys(&keys::RETURN.to_string())
    }

    /// Send a tab key to the located element
    ///
    /// # Errors
    ///
    /// `Timeout` when the element never becomes visible.
    pub fn send_tab(&self, target: impl Into<Target>) -> PaginaResult<()> {
        let element = self.wait.until.visibility_of_element_located(target)?;
        element.send_keys(&keys::TAB.to_string())
    }

    /// Drag the source element onto the destination, waiting for both
    /// to be visible
    ///
    /// # Errors
    ///
    /// `Timeout` when either never becomes visible; `NotSupported` on
    /// backends without input actions.
    pub fn drag_and_drop(
        &self,
        source: impl Into<Target>,
        dest: impl Into<Target>,
    ) -> PaginaResult<()> {
        let source = self.wait.until.visibility_of_element_located(source)?;
        let dest = self.wait.until.visibility_of_element_located(dest)?;
        self.drag_and_drop_element(&source, &dest)
    }

    /// Drag one already-located element onto another
    ///
    /// # Errors
    ///
    /// `NotSupported` on backends without input actions.
    pub fn drag_and_drop_element(
        &self,
        source: &D::Element,
        dest: &D::Element,
    ) -> PaginaResult<()> {
        self.driver.drag_and_drop(source, dest)
    }

    /// Scroll the located element into the viewport, waiting for it to
    /// be visible
    ///
    /// # Errors
    ///
    /// `Timeout` when the element never becomes visible; `NotSupported`
    /// on backends without scrolling.
    pub fn scroll_into_view(&self, target: impl Into<Target>) -> PaginaResult<()> {
        let element = self.wait.until.visibility_of_element_located(target)?;
        self.scroll_element_into_view(&element)
    }

    /// Scroll an already-located element into the viewport
    ///
    /// # Errors
    ///
    /// `NotSupported` on backends without scrolling.
    pub fn scroll_element_into_view(&self, element: &D::Element) -> PaginaResult<()> {
        self.driver.scroll_into_view(element)
    }

    /// Click through jQuery on the first element matching a CSS
    /// selector
    ///
    /// # Errors
    ///
    /// Driver-level script failures.
    pub fn jquery_click(&self, css: &str) -> PaginaResult<()> {
        self.driver.execute_script(&format!("$('{css}').click()"))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::locator::{Keywords, Locator};
    use crate::result::PaginaError;

    fn interactions(driver: &Arc<MockDriver>) -> Interactions<MockDriver> {
        Interactions::new(Arc::clone(driver), Duration::from_millis(40))
    }

    #[test]
    fn test_click_svg_element_dispatches_svg_event() {
        let driver = Arc::new(MockDriver::new());
        interactions(&driver).click_svg_element("#chart > g").unwrap();
        let scripts = driver.executed_scripts();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("SVGEvents"));
        assert!(scripts[0].contains("#chart > g"));
    }

    #[test]
    fn test_click_button_with_text_uses_contains_selector() {
        let driver = Arc::new(MockDriver::new());
        interactions(&driver).click_button_with_text("Save").unwrap();
        assert!(driver.executed_scripts()[0].contains(r#"button:contains("Save")"#));
    }

    #[test]
    fn test_click_link_with_text() {
        let driver = Arc::new(MockDriver::new());
        let link = MockElement::new("a").with_text("Sign out");
        driver.register(Locator::link_text("Sign out"), link.clone());
        interactions(&driver).click_link_with_text("Sign out").unwrap();
        assert_eq!(link.click_count(), 1);
    }

    #[test]
    fn test_type_in_active_element_appends_return() {
        let driver = Arc::new(MockDriver::new());
        let input = MockElement::new("input");
        driver.set_active_element(input.clone());
        interactions(&driver).type_in_active_element("hello").unwrap();
        assert_eq!(input.keys_sent(), vec![format!("hello{}", keys::RETURN)]);
    }

    #[test]
    fn test_double_click() {
        let driver = Arc::new(MockDriver::new());
        let element = MockElement::new("td");
        driver.register(Locator::css(".cell"), element.clone());
        interactions(&driver)
            .double_click(Keywords::new().arg("css", ".cell"))
            .unwrap();
        assert_eq!(element.click_count(), 2);
    }

    #[test]
    fn test_double_click_without_input_actions() {
        let driver = Arc::new(MockDriver::new());
        driver.disable_actions();
        driver.register(Locator::css(".cell"), MockElement::new("td"));
        let err = interactions(&driver)
            .double_click(Locator::css(".cell"))
            .unwrap_err();
        assert!(matches!(err, PaginaError::NotSupported { .. }));
    }

    #[test]
    fn test_hover_records_pointer_move() {
        let driver = Arc::new(MockDriver::new());
        driver.register(Locator::id("menu"), MockElement::new("nav"));
        interactions(&driver).hover(Locator::id("menu")).unwrap();
        assert!(driver.was_called("move_to_element:nav"));
    }

    #[test]
    fn test_hover_with_offset() {
        let driver = Arc::new(MockDriver::new());
        driver.register(Locator::id("menu"), MockElement::new("nav"));
        let interact = interactions(&driver);

        interact.hover_with_offset(Locator::id("menu"), 12, 4).unwrap();
        assert!(driver.was_called("move_to_element:nav:12,4"));

        // zero offset falls back to a plain pointer move
        interact.hover_with_offset(Locator::id("menu"), 0, 0).unwrap();
        assert!(driver.was_called("move_to_element:nav"));
    }

    #[test]
    fn test_select_from_drop_down() {
        let driver = Arc::new(MockDriver::new());
        driver.register(
            Locator::id("color"),
            MockElement::new("select").with_child(
                Locator::tag_name("option"),
                MockElement::new("option")
                    .with_text("Green")
                    .with_toggle_on_click(),
            ),
        );
        interactions(&driver)
            .select_from_drop_down("Green", Locator::id("color"))
            .unwrap();
        let select =
            Select::new(driver.find_element(&Locator::id("color")).unwrap()).unwrap();
        assert!(select.first_selected_option().is_ok());
    }

    #[test]
    fn test_type_and_enter_waits_for_visibility() {
        let driver = Arc::new(MockDriver::new());
        let input = MockElement::new("input");
        driver.register(Locator::name("q"), input.clone());
        interactions(&driver)
            .type_and_enter("weather", Keywords::new().arg("name", "q"))
            .unwrap();
        assert_eq!(input.keys_sent(), vec![format!("weather{}", keys::RETURN)]);

        input.set_displayed(false);
        let err = interactions(&driver)
            .type_and_enter("again", Locator::name("q"))
            .unwrap_err();
        assert!(matches!(err, PaginaError::Timeout { .. }));
    }

    #[test]
    fn test_send_return_and_tab() {
        let driver = Arc::new(MockDriver::new());
        let input = MockElement::new("input");
        driver.register(Locator::name("q"), input.clone());
        let interact = interactions(&driver);
        interact.send_return(Locator::name("q")).unwrap();
        interact.send_tab(Locator::name("q")).unwrap();
        assert_eq!(
            input.keys_sent(),
            vec![keys::RETURN.to_string(), keys::TAB.to_string()]
        );
    }

    #[test]
    fn test_drag_and_drop_waits_then_drags() {
        let driver = Arc::new(MockDriver::new());
        driver.register(Locator::id("card"), MockElement::new("div"));
        driver.register(Locator::id("lane"), MockElement::new("section"));
        interactions(&driver)
            .drag_and_drop(Locator::id("card"), Locator::id("lane"))
            .unwrap();
        assert!(driver.was_called("drag_and_drop:div->section"));
    }

    #[test]
    fn test_scroll_into_view() {
        let driver = Arc::new(MockDriver::new());
        driver.register(Locator::id("footer"), MockElement::new("footer"));
        interactions(&driver)
            .scroll_into_view(Locator::id("footer"))
            .unwrap();
        assert!(driver.was_called("scroll_into_view:footer"));
    }

    #[test]
    fn test_jquery_click() {
        let driver = Arc::new(MockDriver::new());
        interactions(&driver).jquery_click("#menu").unwrap();
        assert_eq!(driver.executed_scripts(), vec!["$('#menu').click()".to_owned()]);
    }
}
