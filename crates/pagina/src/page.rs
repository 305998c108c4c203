//! Page objects over a driver handle.
//!
//! A [`Page`] bundles everything one page of the application needs: the
//! driver, a wait engine and interaction recipes sharing the page
//! timeout, the resolved page URL, and a set of named element
//! descriptors declared up front through [`PageBuilder`]:
//!
//! ```
//! use pagina::{ElementSpec, Locator, MockDriver, MockElement, PageBuilder};
//! use std::sync::Arc;
//!
//! let driver = Arc::new(MockDriver::new());
//! driver.register(Locator::id("user"), MockElement::new("input"));
//!
//! let page = PageBuilder::new("/login")
//!     .base_url("https://example.test/app/")
//!     .field("username", ElementSpec::text_box(Locator::id("user")))
//!     .build(Arc::clone(&driver))
//!     .unwrap();
//!
//! page.open().unwrap();
//! page.set("username", "alice").unwrap();
//! assert_eq!(page.text("username").unwrap(), "alice");
//! ```

use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::driver::WebDriver;
use crate::element::{ElementSpec, ElementValue, SetValue};
use crate::interact::Interactions;
use crate::locator::Target;
use crate::result::{PaginaError, PaginaResult};
use crate::select::Select;
use crate::wait::{Wait, DEFAULT_WAIT_TIMEOUT_MS};

/// Default page timeout, shared by the page's wait engine and recipes
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS);

// =============================================================================
// URL TEMPLATING
// =============================================================================

fn render_template(template: &str, args: &[(String, String)]) -> PaginaResult<String> {
    let placeholder =
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| PaginaError::InvalidArguments {
            message: format!("URL placeholder pattern: {e}"),
        })?;
    let mut missing: Option<String> = None;
    let rendered = placeholder.replace_all(template, |caps: &regex::Captures<'_>| {
        let key = &caps[1];
        match args.iter().find(|(name, _)| name == key) {
            Some((_, value)) => value.clone(),
            None => {
                if missing.is_none() {
                    missing = Some(key.to_owned());
                }
                String::new()
            }
        }
    });
    if let Some(key) = missing {
        return Err(PaginaError::InvalidArguments {
            message: format!("URL template needs an argument for `{{{key}}}`"),
        });
    }
    Ok(rendered.into_owned())
}

fn build_url(
    template: &str,
    base: Option<&str>,
    args: &[(String, String)],
) -> PaginaResult<String> {
    let path = render_template(template, args)?;
    match base {
        Some(base) if !base.is_empty() => {
            let joined = Url::parse(base)
                .and_then(|parsed| parsed.join(&path))
                .map_err(|e| PaginaError::InvalidArguments {
                    message: format!("cannot join base URL {base:?} with {path:?}: {e}"),
                })?;
            Ok(joined.into())
        }
        _ => Ok(path),
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Declarative page description: URL template, timeout, and named
/// element descriptors. `build` binds it to a driver.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    url_template: String,
    base_url: Option<String>,
    url_override: Option<String>,
    url_args: Vec<(String, String)>,
    timeout: Duration,
    fields: Vec<(String, ElementSpec)>,
}

impl PageBuilder {
    /// Start a page description from its URL template.
    ///
    /// The template may carry `{name}` placeholders filled by
    /// [`url_arg`](Self::url_arg) at build time.
    #[must_use]
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            base_url: None,
            url_override: None,
            url_args: Vec::new(),
            timeout: DEFAULT_PAGE_TIMEOUT,
            fields: Vec::new(),
        }
    }

    /// Base URL the rendered template is joined onto
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Fill one `{name}` placeholder in the URL template.
    ///
    /// Arguments without a matching placeholder are ignored.
    #[must_use]
    pub fn url_arg(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.url_args.push((name.into(), value.to_string()));
        self
    }

    /// Use this exact URL, skipping template rendering and the base join
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url_override = Some(url.into());
        self
    }

    /// Timeout shared by the page's wait engine and recipes
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register a named element descriptor, replacing any earlier
    /// descriptor with the same name
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: ElementSpec) -> Self {
        let name = name.into();
        if let Some(entry) = self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            entry.1 = spec;
        } else {
            self.fields.push((name, spec));
        }
        self
    }

    /// Bind the description to a driver, resolving the page URL.
    ///
    /// # Errors
    ///
    /// `InvalidArguments` when the URL template cannot be resolved.
    pub fn build<D: WebDriver>(self, driver: Arc<D>) -> PaginaResult<Page<D>> {
        let url = match self.url_override {
            Some(url) => url,
            None => build_url(&self.url_template, self.base_url.as_deref(), &self.url_args)?,
        };
        Ok(Page {
            wait: Wait::new(Arc::clone(&driver), self.timeout),
            interact: Interactions::new(Arc::clone(&driver), self.timeout),
            driver,
            timeout: self.timeout,
            url,
            fields: self.fields,
        })
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// One page of the application, bound to a driver
#[derive(Debug, Clone)]
pub struct Page<D> {
    driver: Arc<D>,
    wait: Wait<D>,
    interact: Interactions<D>,
    timeout: Duration,
    url: String,
    fields: Vec<(String, ElementSpec)>,
}

impl<D: WebDriver> Page<D> {
    /// The underlying driver, for calls the page surface does not cover
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Wait engine using the page timeout
    #[must_use]
    pub const fn wait(&self) -> &Wait<D> {
        &self.wait
    }

    /// Interaction recipes using the page timeout
    #[must_use]
    pub const fn interact(&self) -> &Interactions<D> {
        &self.interact
    }

    /// The page timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The resolved page URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Navigate the driver to this page
    ///
    /// # Errors
    ///
    /// Driver-level navigation failures.
    pub fn open(&self) -> PaginaResult<()> {
        debug!("Opening page: {}", self.url);
        self.driver.goto(&self.url)
    }

    /// Find the first element matching the target, without waiting
    ///
    /// # Errors
    ///
    /// `NoSuchElement` when nothing matches; `InvalidArguments` for a
    /// bad target.
    pub fn find_element(&self, target: impl Into<Target>) -> PaginaResult<D::Element> {
        self.driver.find_element(&target.into().resolve()?)
    }

    /// Find every element matching the target, without waiting
    ///
    /// # Errors
    ///
    /// `InvalidArguments` for a bad target; driver failures propagate.
    pub fn find_elements(&self, target: impl Into<Target>) -> PaginaResult<Vec<D::Element>> {
        self.driver.find_elements(&target.into().resolve()?)
    }

    /// Look up a declared field's descriptor
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ElementSpec> {
        self.fields
            .iter()
            .find(|(field, _)| field.as_str() == name)
            .map(|(_, spec)| spec)
    }

    /// Names of every declared field, in declaration order
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Read a declared field through its descriptor
    ///
    /// # Errors
    ///
    /// `UnknownField` for an undeclared name; descriptor read failures
    /// propagate.
    pub fn get(&self, name: &str) -> PaginaResult<ElementValue<D::Element>> {
        self.spec(name)?.read(&self.wait)
    }

    /// Write a declared field through its descriptor
    ///
    /// # Errors
    ///
    /// `UnknownField` for an undeclared name; descriptor write failures
    /// propagate.
    pub fn set(&self, name: &str, value: impl Into<SetValue>) -> PaginaResult<()> {
        self.spec(name)?.write(&self.wait, value)
    }

    /// Read a field that yields an element
    ///
    /// # Errors
    ///
    /// `InvalidArguments` when the field yields something else.
    pub fn element(&self, name: &str) -> PaginaResult<D::Element> {
        match self.get(name)? {
            ElementValue::Element(element) => Ok(element),
            other => Err(field_mismatch(name, "an element", &other)),
        }
    }

    /// Read a field that yields text
    ///
    /// # Errors
    ///
    /// `InvalidArguments` when the field yields something else.
    pub fn text(&self, name: &str) -> PaginaResult<String> {
        match self.get(name)? {
            ElementValue::Text(text) => Ok(text),
            other => Err(field_mismatch(name, "text", &other)),
        }
    }

    /// Read a field that yields a selection state
    ///
    /// # Errors
    ///
    /// `InvalidArguments` when the field yields something else.
    pub fn selected(&self, name: &str) -> PaginaResult<bool> {
        match self.get(name)? {
            ElementValue::Selected(selected) => Ok(selected),
            other => Err(field_mismatch(name, "a selection state", &other)),
        }
    }

    /// Read a field that yields a drop-down helper
    ///
    /// # Errors
    ///
    /// `InvalidArguments` when the field yields something else.
    pub fn selection(&self, name: &str) -> PaginaResult<Select<D::Element>> {
        match self.get(name)? {
            ElementValue::Selection(select) => Ok(select),
            other => Err(field_mismatch(name, "a selection helper", &other)),
        }
    }

    fn spec(&self, name: &str) -> PaginaResult<&ElementSpec> {
        self.field(name).ok_or_else(|| PaginaError::UnknownField {
            name: name.to_owned(),
        })
    }
}

fn field_mismatch<E>(name: &str, wanted: &str, got: &ElementValue<E>) -> PaginaError {
    PaginaError::InvalidArguments {
        message: format!("page field `{name}` yields {}, not {wanted}", got.describe()),
    }
}
