//! Explicit-wait engine.
//!
//! A [`Wait`] is bound to one driver handle and one set of default
//! options (timeout, poll interval). Its two fluent namespaces poll a
//! named condition until it becomes truthy (`until`) or falsy
//! (`until_not`), blocking the calling thread between polls:
//!
//! ```
//! use pagina::{MockDriver, Wait};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let driver = Arc::new(MockDriver::new());
//! driver.set_title("Home");
//!
//! let wait = Wait::new(Arc::clone(&driver), Duration::from_millis(200));
//! assert!(wait.until.title_is("Home").is_ok());
//! assert!(wait.until_not.title_is("Checkout").is_ok());
//! ```
//!
//! Per-call overrides come in two equivalent shapes: typed builder
//! methods (`wait.until.timeout(..).message(..).title_is(..)`), or the
//! keyword bag carried alongside a shorthand locator
//! (`Keywords::new().arg("css", "#go").arg("timeout", 5)`), where the
//! recognized option keys are `timeout` and `poll_frequency` in seconds
//! plus `message`.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::conditions::{self, Condition};
use crate::driver::WebDriver;
use crate::locator::{Keywords, Target};
use crate::result::{PaginaError, PaginaResult};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for explicit waits (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options governing one wait call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Message annotating a timeout failure (empty when not set)
    pub message: String,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            message: String::new(),
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the timeout-failure message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Fold leftover locator keywords into these options.
    ///
    /// Recognized keys: `timeout` (seconds, number), `poll_frequency`
    /// (seconds, number), `message` (string).
    ///
    /// # Errors
    ///
    /// `InvalidArguments` for an unrecognized key or a value of the
    /// wrong type.
    pub fn apply_keywords(mut self, keywords: Keywords) -> PaginaResult<Self> {
        for (key, value) in keywords {
            match key.as_str() {
                "timeout" => self.timeout_ms = seconds_to_ms(&key, &value)?,
                "poll_frequency" => self.poll_interval_ms = seconds_to_ms(&key, &value)?,
                "message" => {
                    self.message = value
                        .as_str()
                        .map(str::to_owned)
                        .ok_or_else(|| PaginaError::InvalidArguments {
                            message: format!("wait option `message` expects a string, got {value}"),
                        })?;
                }
                other => {
                    return Err(PaginaError::InvalidArguments {
                        message: format!(
                            "unsupported wait option `{other}`; expected timeout, poll_frequency or message"
                        ),
                    });
                }
            }
        }
        Ok(self)
    }
}

fn seconds_to_ms(key: &str, value: &serde_json::Value) -> PaginaResult<u64> {
    let seconds = value
        .as_f64()
        .filter(|secs| *secs >= 0.0)
        .ok_or_else(|| PaginaError::InvalidArguments {
            message: format!(
                "wait option `{key}` expects a non-negative number of seconds, got {value}"
            ),
        })?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok((seconds * 1000.0) as u64)
}

// =============================================================================
// POLL LOOPS
// =============================================================================

fn poll_until<D, C>(driver: &D, condition: &C, options: &WaitOptions) -> PaginaResult<C::Output>
where
    D: WebDriver,
    C: Condition<D>,
{
    let timeout = options.timeout();
    let poll_interval = options.poll_interval();
    let start = Instant::now();
    loop {
        match condition.check(driver) {
            Ok(Some(value)) => {
                trace!(
                    "Condition met after {}ms: {}",
                    start.elapsed().as_millis(),
                    condition.description()
                );
                return Ok(value);
            }
            Ok(None) | Err(PaginaError::NoSuchElement { .. }) => {}
            Err(e) => return Err(e),
        }
        if start.elapsed() >= timeout {
            break;
        }
        std::thread::sleep(poll_interval);
    }
    debug!(
        "Wait timed out after {}ms: {}",
        options.timeout_ms,
        condition.description()
    );
    Err(PaginaError::Timeout {
        ms: options.timeout_ms,
        condition: condition.description(),
        message: options.message.clone(),
    })
}

fn poll_until_not<D, C>(driver: &D, condition: &C, options: &WaitOptions) -> PaginaResult<()>
where
    D: WebDriver,
    C: Condition<D>,
{
    let timeout = options.timeout();
    let poll_interval = options.poll_interval();
    let start = Instant::now();
    loop {
        match condition.check(driver) {
            Ok(None) | Err(PaginaError::NoSuchElement { .. }) => {
                trace!(
                    "Condition cleared after {}ms: {}",
                    start.elapsed().as_millis(),
                    condition.description()
                );
                return Ok(());
            }
            Ok(Some(_)) => {}
            Err(e) => return Err(e),
        }
        if start.elapsed() >= timeout {
            break;
        }
        std::thread::sleep(poll_interval);
    }
    debug!(
        "Wait timed out after {}ms: {} still holds",
        options.timeout_ms,
        condition.description()
    );
    Err(PaginaError::Timeout {
        ms: options.timeout_ms,
        condition: format!("{} to clear", condition.description()),
        message: options.message.clone(),
    })
}

// =============================================================================
// WAIT ENGINE
// =============================================================================

/// Wait engine bound to a driver handle and default options.
///
/// Created once per page; the `until` and `until_not` namespaces share
/// the engine's driver and defaults.
#[derive(Debug, Clone)]
pub struct Wait<D> {
    driver: Arc<D>,
    options: WaitOptions,
    /// Poll a condition until it becomes truthy
    pub until: WaitUntil<D>,
    /// Poll a condition until it becomes falsy
    pub until_not: WaitUntilNot<D>,
}

impl<D: WebDriver> Wait<D> {
    /// Create an engine with the given default timeout
    #[must_use]
    pub fn new(driver: Arc<D>, timeout: Duration) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let options = WaitOptions::new().with_timeout(timeout.as_millis() as u64);
        Self::with_options(driver, options)
    }

    /// Create an engine with explicit default options
    #[must_use]
    pub fn with_options(driver: Arc<D>, options: WaitOptions) -> Self {
        Self {
            until: WaitUntil {
                driver: Arc::clone(&driver),
                options: options.clone(),
            },
            until_not: WaitUntilNot {
                driver: Arc::clone(&driver),
                options: options.clone(),
            },
            driver,
            options,
        }
    }

    /// The underlying driver handle
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Default timeout for waits run through this engine
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.options.timeout()
    }

    /// Default options for waits run through this engine
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Set the driver-global implicit wait, defaulting to this engine's
    /// timeout when `None` is given.
    ///
    /// Implicit waiting is the driver's own fallback strategy and is
    /// independent of the explicit condition polling above.
    ///
    /// # Errors
    ///
    /// Driver-level failures.
    pub fn implicit(&self, timeout: Option<Duration>) -> PaginaResult<()> {
        self.driver
            .implicitly_wait(timeout.unwrap_or_else(|| self.options.timeout()))
    }
}

macro_rules! override_methods {
    () => {
        /// Override the timeout for calls made through the returned handle
        #[must_use]
        pub fn timeout(&self, timeout: Duration) -> Self {
            #[allow(clippy::cast_possible_truncation)]
            let options = self
                .options
                .clone()
                .with_timeout(timeout.as_millis() as u64);
            Self {
                driver: Arc::clone(&self.driver),
                options,
            }
        }

        /// Override the poll interval for calls made through the returned
        /// handle
        #[must_use]
        pub fn poll_interval(&self, interval: Duration) -> Self {
            #[allow(clippy::cast_possible_truncation)]
            let options = self
                .options
                .clone()
                .with_poll_interval(interval.as_millis() as u64);
            Self {
                driver: Arc::clone(&self.driver),
                options,
            }
        }

        /// Set the message carried by a timeout failure
        #[must_use]
        pub fn message(&self, message: impl Into<String>) -> Self {
            Self {
                driver: Arc::clone(&self.driver),
                options: self.options.clone().with_message(message),
            }
        }

        fn call_options(&self, keywords: Keywords) -> PaginaResult<WaitOptions> {
            self.options.clone().apply_keywords(keywords)
        }
    };
}

/// Truthy-ward fluent namespace: one method per named condition.
///
/// Locator-consuming methods accept anything convertible to
/// [`Target`]; leftover keywords in a bag become per-call wait options.
#[derive(Debug, Clone)]
pub struct WaitUntil<D> {
    driver: Arc<D>,
    options: WaitOptions,
}

impl<D: WebDriver> WaitUntil<D> {
    override_methods!();

    /// Poll an arbitrary condition until it yields a value
    ///
    /// # Errors
    ///
    /// `Timeout` when the condition never yields within the timeout;
    /// condition failures other than `NoSuchElement` propagate.
    pub fn condition<C: Condition<D>>(&self, condition: C) -> PaginaResult<C::Output> {
        poll_until(self.driver.as_ref(), &condition, &self.options)
    }

    /// Wait for the page title to equal `title`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; driver failures propagate.
    pub fn title_is(&self, title: impl Into<String>) -> PaginaResult<bool> {
        self.condition(conditions::title_is(title))
    }

    /// Wait for the page title to contain `fragment`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; driver failures propagate.
    pub fn title_contains(&self, fragment: impl Into<String>) -> PaginaResult<bool> {
        self.condition(conditions::title_contains(fragment))
    }

    /// Wait for an element matching the target to be attached, yielding
    /// it
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn presence_of_element_located(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<D::Element> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::presence_of_element_located(locator),
            &options,
        )
    }

    /// Wait for an element matching the target to be displayed, yielding
    /// it
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn visibility_of_element_located(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<D::Element> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::visibility_of_element_located(locator),
            &options,
        )
    }

    /// Wait for a known element to be displayed, yielding it
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; driver failures propagate.
    pub fn visibility_of(&self, element: &D::Element) -> PaginaResult<D::Element> {
        self.condition(conditions::visibility_of(element.clone()))
    }

    /// Wait for every element matching the target, yielding the matches
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn presence_of_all_elements_located(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<Vec<D::Element>> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::presence_of_all_elements_located(locator),
            &options,
        )
    }

    /// Wait for at least one displayed element matching the target,
    /// yielding the displayed subset
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn visibility_of_any_elements_located(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<Vec<D::Element>> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::visibility_of_any_elements_located(locator),
            &options,
        )
    }

    /// Wait for the located element's text to contain `text`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn text_to_be_present_in_element(
        &self,
        target: impl Into<Target>,
        text: impl Into<String>,
    ) -> PaginaResult<bool> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::text_to_be_present_in_element(locator, text),
            &options,
        )
    }

    /// Wait for the located element's `value` attribute to contain
    /// `text`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn text_to_be_present_in_element_value(
        &self,
        target: impl Into<Target>,
        text: impl Into<String>,
    ) -> PaginaResult<bool> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::text_to_be_present_in_element_value(locator, text),
            &options,
        )
    }

    /// Wait for the located frame and switch the driver into it
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn frame_to_be_available_and_switch_to_it(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<bool> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::frame_to_be_available_and_switch_to_it(locator),
            &options,
        )
    }

    /// Wait for no displayed element to match the target
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn invisibility_of_element_located(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<bool> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::invisibility_of_element_located(locator),
            &options,
        )
    }

    /// Wait for the located element to be displayed and enabled,
    /// yielding it
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn element_to_be_clickable(&self, target: impl Into<Target>) -> PaginaResult<D::Element> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::element_to_be_clickable(locator),
            &options,
        )
    }

    /// Wait for a known element to be detached from the DOM
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; driver failures propagate.
    pub fn staleness_of(&self, element: &D::Element) -> PaginaResult<bool> {
        self.condition(conditions::staleness_of(element.clone()))
    }

    /// Wait for a known element to be selected
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; driver failures propagate.
    pub fn element_to_be_selected(&self, element: &D::Element) -> PaginaResult<bool> {
        self.condition(conditions::element_to_be_selected(element.clone()))
    }

    /// Wait for the located element to be selected
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn element_located_to_be_selected(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<bool> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::element_located_to_be_selected(locator),
            &options,
        )
    }

    /// Wait for a known element's selection state to equal `selected`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; driver failures propagate.
    pub fn element_selection_state_to_be(
        &self,
        element: &D::Element,
        selected: bool,
    ) -> PaginaResult<bool> {
        self.condition(conditions::element_selection_state_to_be(
            element.clone(),
            selected,
        ))
    }

    /// Wait for the located element's selection state to equal
    /// `selected`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target or wait
    /// option.
    pub fn element_located_selection_state_to_be(
        &self,
        target: impl Into<Target>,
        selected: bool,
    ) -> PaginaResult<bool> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until(
            self.driver.as_ref(),
            &conditions::element_located_selection_state_to_be(locator, selected),
            &options,
        )
    }

    /// Wait for exactly `count` windows to be open
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; driver failures propagate.
    pub fn number_of_windows_to_be(&self, count: usize) -> PaginaResult<bool> {
        self.condition(conditions::number_of_windows_to_be(count))
    }

    /// Wait for a window beyond the snapshot to open
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; driver failures propagate.
    pub fn new_window_is_opened(&self, current_handles: Vec<String>) -> PaginaResult<bool> {
        self.condition(conditions::new_window_is_opened(current_handles))
    }

    /// Wait for an alert to open, yielding its text
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; driver failures propagate.
    pub fn alert_is_present(&self) -> PaginaResult<String> {
        self.condition(conditions::alert_is_present())
    }
}

/// Falsy-ward fluent namespace, mirroring [`WaitUntil`] method for
/// method: each call polls until its condition stops holding (a lookup
/// that finds nothing counts as stopped).
#[derive(Debug, Clone)]
pub struct WaitUntilNot<D> {
    driver: Arc<D>,
    options: WaitOptions,
}

impl<D: WebDriver> WaitUntilNot<D> {
    override_methods!();

    /// Poll an arbitrary condition until it stops yielding a value
    ///
    /// # Errors
    ///
    /// `Timeout` when the condition still holds at expiry.
    pub fn condition<C: Condition<D>>(&self, condition: C) -> PaginaResult<()> {
        poll_until_not(self.driver.as_ref(), &condition, &self.options)
    }

    /// Wait for the title to differ from `title`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry.
    pub fn title_is(&self, title: impl Into<String>) -> PaginaResult<()> {
        self.condition(conditions::title_is(title))
    }

    /// Wait for the title to no longer contain `fragment`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry.
    pub fn title_contains(&self, fragment: impl Into<String>) -> PaginaResult<()> {
        self.condition(conditions::title_contains(fragment))
    }

    /// Wait for no element to match the target
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn presence_of_element_located(&self, target: impl Into<Target>) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::presence_of_element_located(locator),
            &options,
        )
    }

    /// Wait for the located element to stop being displayed
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn visibility_of_element_located(&self, target: impl Into<Target>) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::visibility_of_element_located(locator),
            &options,
        )
    }

    /// Wait for a known element to stop being displayed
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry.
    pub fn visibility_of(&self, element: &D::Element) -> PaginaResult<()> {
        self.condition(conditions::visibility_of(element.clone()))
    }

    /// Wait for no element at all to match the target
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn presence_of_all_elements_located(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::presence_of_all_elements_located(locator),
            &options,
        )
    }

    /// Wait for no displayed element to match the target
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn visibility_of_any_elements_located(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::visibility_of_any_elements_located(locator),
            &options,
        )
    }

    /// Wait for the located element's text to stop containing `text`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn text_to_be_present_in_element(
        &self,
        target: impl Into<Target>,
        text: impl Into<String>,
    ) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::text_to_be_present_in_element(locator, text),
            &options,
        )
    }

    /// Wait for the located element's `value` attribute to stop
    /// containing `text`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn text_to_be_present_in_element_value(
        &self,
        target: impl Into<Target>,
        text: impl Into<String>,
    ) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::text_to_be_present_in_element_value(locator, text),
            &options,
        )
    }

    /// Wait for the located frame to stop being available
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn frame_to_be_available_and_switch_to_it(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::frame_to_be_available_and_switch_to_it(locator),
            &options,
        )
    }

    /// Wait for a displayed element to match the target
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn invisibility_of_element_located(
        &self,
        target: impl Into<Target>,
    ) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::invisibility_of_element_located(locator),
            &options,
        )
    }

    /// Wait for the located element to stop being clickable
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn element_to_be_clickable(&self, target: impl Into<Target>) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::element_to_be_clickable(locator),
            &options,
        )
    }

    /// Wait for a known element to remain attached (staleness to not
    /// hold)
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry.
    pub fn staleness_of(&self, element: &D::Element) -> PaginaResult<()> {
        self.condition(conditions::staleness_of(element.clone()))
    }

    /// Wait for a known element to stop being selected
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry.
    pub fn element_to_be_selected(&self, element: &D::Element) -> PaginaResult<()> {
        self.condition(conditions::element_to_be_selected(element.clone()))
    }

    /// Wait for the located element to stop being selected
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn element_located_to_be_selected(&self, target: impl Into<Target>) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::element_located_to_be_selected(locator),
            &options,
        )
    }

    /// Wait for a known element's selection state to differ from
    /// `selected`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry.
    pub fn element_selection_state_to_be(
        &self,
        element: &D::Element,
        selected: bool,
    ) -> PaginaResult<()> {
        self.condition(conditions::element_selection_state_to_be(
            element.clone(),
            selected,
        ))
    }

    /// Wait for the located element's selection state to differ from
    /// `selected`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry; `InvalidArguments` for a bad target.
    pub fn element_located_selection_state_to_be(
        &self,
        target: impl Into<Target>,
        selected: bool,
    ) -> PaginaResult<()> {
        let (locator, rest) = target.into().resolve_with_passthru()?;
        let options = self.call_options(rest)?;
        poll_until_not(
            self.driver.as_ref(),
            &conditions::element_located_selection_state_to_be(locator, selected),
            &options,
        )
    }

    /// Wait for the open window count to differ from `count`
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry.
    pub fn number_of_windows_to_be(&self, count: usize) -> PaginaResult<()> {
        self.condition(conditions::number_of_windows_to_be(count))
    }

    /// Wait for the window count to fall back to the snapshot size
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry.
    pub fn new_window_is_opened(&self, current_handles: Vec<String>) -> PaginaResult<()> {
        self.condition(conditions::new_window_is_opened(current_handles))
    }

    /// Wait for the open alert to be dismissed
    ///
    /// # Errors
    ///
    /// `Timeout` on expiry.
    pub fn alert_is_present(&self) -> PaginaResult<()> {
        self.condition(conditions::alert_is_present())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement, WebElement};
    use crate::locator::Locator;

    fn fast_wait(driver: &Arc<MockDriver>, timeout_ms: u64) -> Wait<MockDriver> {
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_poll_interval(5);
        Wait::with_options(Arc::clone(driver), options)
    }

    mod options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let options = WaitOptions::default();
            assert_eq!(options.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(options.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
            assert!(options.message.is_empty());
        }

        #[test]
        fn test_builders() {
            let options = WaitOptions::new()
                .with_timeout(2_000)
                .with_poll_interval(100)
                .with_message("too slow");
            assert_eq!(options.timeout(), Duration::from_secs(2));
            assert_eq!(options.poll_interval(), Duration::from_millis(100));
            assert_eq!(options.message, "too slow");
        }

        #[test]
        fn test_apply_keywords_timeout_seconds() {
            let options = WaitOptions::new()
                .apply_keywords(Keywords::new().arg("timeout", 5))
                .unwrap();
            assert_eq!(options.timeout_ms, 5_000);

            let fractional = WaitOptions::new()
                .apply_keywords(Keywords::new().arg("timeout", 0.25))
                .unwrap();
            assert_eq!(fractional.timeout_ms, 250);
        }

        #[test]
        fn test_apply_keywords_poll_frequency_and_message() {
            let options = WaitOptions::new()
                .apply_keywords(
                    Keywords::new()
                        .arg("poll_frequency", 0.05)
                        .arg("message", "login button never appeared"),
                )
                .unwrap();
            assert_eq!(options.poll_interval_ms, 50);
            assert_eq!(options.message, "login button never appeared");
        }

        #[test]
        fn test_apply_keywords_rejects_unknown_key() {
            let err = WaitOptions::new()
                .apply_keywords(Keywords::new().arg("retries", 3))
                .unwrap_err();
            assert!(err.to_string().contains("retries"));
        }

        #[test]
        fn test_apply_keywords_rejects_bad_types() {
            let err = WaitOptions::new()
                .apply_keywords(Keywords::new().arg("timeout", "soon"))
                .unwrap_err();
            assert!(matches!(err, PaginaError::InvalidArguments { .. }));

            let err = WaitOptions::new()
                .apply_keywords(Keywords::new().arg("timeout", -1))
                .unwrap_err();
            assert!(matches!(err, PaginaError::InvalidArguments { .. }));
        }
    }

    mod until_tests {
        use super::*;

        #[test]
        fn test_immediate_success_returns_value() {
            let driver = Arc::new(MockDriver::new());
            driver.register(Locator::id("go"), MockElement::new("button"));
            let wait = fast_wait(&driver, 200);
            let element = wait
                .until
                .presence_of_element_located(Locator::id("go"))
                .unwrap();
            assert_eq!(element.tag_name().unwrap(), "button");
        }

        #[test]
        fn test_timeout_uses_engine_default_and_empty_message() {
            let driver = Arc::new(MockDriver::new());
            driver.set_title("Loading...");
            let wait = fast_wait(&driver, 40);
            let err = wait.until.title_is("Dashboard").unwrap_err();
            match err {
                PaginaError::Timeout {
                    ms,
                    ref message,
                    ref condition,
                } => {
                    assert_eq!(ms, 40);
                    assert!(message.is_empty());
                    assert!(condition.contains("Dashboard"));
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[test]
        fn test_builder_overrides_timeout_and_message() {
            let driver = Arc::new(MockDriver::new());
            let wait = fast_wait(&driver, 5_000);
            let err = wait
                .until
                .timeout(Duration::from_millis(25))
                .message("login button never appeared")
                .element_to_be_clickable(Locator::id("login"))
                .unwrap_err();
            match err {
                PaginaError::Timeout { ms, ref message, .. } => {
                    assert_eq!(ms, 25);
                    assert_eq!(message, "login button never appeared");
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[test]
        fn test_keyword_overrides_through_locator_bag() {
            let driver = Arc::new(MockDriver::new());
            let wait = fast_wait(&driver, 5_000);
            let bag = Keywords::new()
                .arg("css", "#login")
                .arg("timeout", 0.03)
                .arg("message", "m");
            let err = wait.until.visibility_of_element_located(bag).unwrap_err();
            match err {
                PaginaError::Timeout { ms, ref message, .. } => {
                    assert_eq!(ms, 30);
                    assert_eq!(message, "m");
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[test]
        fn test_unknown_keyword_fails_before_polling() {
            let driver = Arc::new(MockDriver::new());
            let wait = fast_wait(&driver, 5_000);
            let bag = Keywords::new().arg("css", "#go").arg("retries", 2);
            let start = Instant::now();
            let err = wait.until.presence_of_element_located(bag).unwrap_err();
            assert!(matches!(err, PaginaError::InvalidArguments { .. }));
            assert!(start.elapsed() < Duration::from_millis(500));
        }

        #[test]
        fn test_polls_until_thread_makes_element_visible() {
            let driver = Arc::new(MockDriver::new());
            let element = MockElement::new("div").with_displayed(false);
            driver.register(Locator::id("banner"), element.clone());

            let handle = std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(30));
                element.set_displayed(true);
            });

            let wait = fast_wait(&driver, 500);
            let found = wait
                .until
                .visibility_of_element_located(Locator::id("banner"))
                .unwrap();
            assert!(found.is_displayed().unwrap());
            handle.join().unwrap();
        }

        #[test]
        fn test_missing_element_is_retried_not_fatal() {
            let driver = Arc::new(MockDriver::new());
            let registrar = Arc::clone(&driver);
            let handle = std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(30));
                registrar.register(Locator::id("late"), MockElement::new("p"));
            });

            let wait = fast_wait(&driver, 500);
            let element = wait
                .until
                .presence_of_element_located(Locator::id("late"))
                .unwrap();
            assert_eq!(element.tag_name().unwrap(), "p");
            handle.join().unwrap();
        }

        #[test]
        fn test_zero_timeout_still_checks_once() {
            let driver = Arc::new(MockDriver::new());
            driver.set_title("Home");
            let wait = fast_wait(&driver, 0);
            assert!(wait.until.title_is("Home").unwrap());
        }

        #[test]
        fn test_alert_wait_returns_text() {
            let driver = Arc::new(MockDriver::new());
            driver.set_alert("Session expired");
            let wait = fast_wait(&driver, 200);
            assert_eq!(wait.until.alert_is_present().unwrap(), "Session expired");
        }

        #[test]
        fn test_timeout_display_carries_message() {
            let driver = Arc::new(MockDriver::new());
            let wait = fast_wait(&driver, 20);
            // an unregistered spinner is already invisible
            assert!(wait
                .until
                .invisibility_of_element_located(Keywords::new().arg("id", "spinner"))
                .is_ok());

            driver.register(Locator::id("spinner"), MockElement::new("div"));
            let err = wait
                .until
                .message("spinner never went away")
                .invisibility_of_element_located(Keywords::new().arg("id", "spinner"))
                .unwrap_err();
            assert!(err.to_string().contains("spinner never went away"));
        }
    }

    mod until_not_tests {
        use super::*;

        #[test]
        fn test_immediate_success_when_already_falsy() {
            let driver = Arc::new(MockDriver::new());
            driver.set_title("Home");
            let wait = fast_wait(&driver, 200);
            assert!(wait.until_not.title_is("Checkout").is_ok());
        }

        #[test]
        fn test_missing_element_counts_as_cleared() {
            let driver = Arc::new(MockDriver::new());
            let wait = fast_wait(&driver, 5_000);
            let start = Instant::now();
            wait.until_not
                .presence_of_element_located(Locator::id("ghost"))
                .unwrap();
            assert!(start.elapsed() < Duration::from_millis(500));
        }

        #[test]
        fn test_times_out_while_condition_holds() {
            let driver = Arc::new(MockDriver::new());
            driver.set_title("Home");
            let wait = fast_wait(&driver, 40);
            let err = wait
                .until_not
                .message("still on the home page")
                .title_is("Home")
                .unwrap_err();
            match err {
                PaginaError::Timeout { ms, ref message, .. } => {
                    assert_eq!(ms, 40);
                    assert_eq!(message, "still on the home page");
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[test]
        fn test_polls_until_thread_hides_element() {
            let driver = Arc::new(MockDriver::new());
            let element = MockElement::new("div");
            driver.register(Locator::id("toast"), element.clone());

            let handle = std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(30));
                element.set_displayed(false);
            });

            let wait = fast_wait(&driver, 500);
            wait.until_not
                .visibility_of_element_located(Locator::id("toast"))
                .unwrap();
            handle.join().unwrap();
        }

        #[test]
        fn test_shares_translation_path_with_until() {
            let driver = Arc::new(MockDriver::new());
            let wait = fast_wait(&driver, 200);
            let bad = Keywords::new().arg("id", "a").arg("css", "b");
            let err_until = wait
                .until
                .presence_of_element_located(bad.clone())
                .unwrap_err();
            let err_until_not = wait
                .until_not
                .presence_of_element_located(bad)
                .unwrap_err();
            assert_eq!(err_until.to_string(), err_until_not.to_string());
        }

        #[test]
        fn test_selection_clears_when_thread_deselects() {
            let driver = Arc::new(MockDriver::new());
            let element = MockElement::new("input").with_selected(true);
            driver.register(Locator::id("opt-in"), element.clone());

            let handle = std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(30));
                element.set_selected(false);
            });

            let wait = fast_wait(&driver, 500);
            wait.until_not
                .element_located_to_be_selected(Locator::id("opt-in"))
                .unwrap();
            handle.join().unwrap();
        }
    }

    mod implicit_tests {
        use super::*;

        #[test]
        fn test_implicit_defaults_to_engine_timeout() {
            let driver = Arc::new(MockDriver::new());
            let wait = fast_wait(&driver, 7_000);
            wait.implicit(None).unwrap();
            assert_eq!(driver.implicit_wait(), Some(Duration::from_secs(7)));
        }

        #[test]
        fn test_implicit_accepts_override() {
            let driver = Arc::new(MockDriver::new());
            let wait = fast_wait(&driver, 7_000);
            wait.implicit(Some(Duration::from_secs(3))).unwrap();
            assert_eq!(driver.implicit_wait(), Some(Duration::from_secs(3)));
        }
    }
}
