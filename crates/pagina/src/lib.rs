//! Pagina: Page-Object Convenience Layer for WebDriver-Style Browsers
//!
//! Pagina (Spanish: "page") wraps any WebDriver-style backend with the
//! three pieces page automation repeats everywhere: shorthand locator
//! translation, condition polling with explicit waits, and per-kind
//! element descriptors that bundle the right wait with the right
//! interaction.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    Page / PageBuilder                     │
//! │        named fields: ElementSpec { kind, locator }        │
//! ├───────────────┬──────────────────┬────────────────────────┤
//! │ Wait          │ Interactions     │ Select                 │
//! │ until /       │ canned driver    │ drop-down helper       │
//! │ until_not     │ sequences        │                        │
//! ├───────────────┴──────────────────┴────────────────────────┤
//! │      WebDriver / WebElement traits  (+ MockDriver)        │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pagina::{ElementSpec, Locator, MockDriver, MockElement, PageBuilder, WebElement};
//! use std::sync::Arc;
//!
//! let driver = Arc::new(MockDriver::new());
//! driver.register(Locator::id("user"), MockElement::new("input"));
//! driver.register(
//!     Locator::id("remember"),
//!     MockElement::new("input").with_toggle_on_click(),
//! );
//! driver.register(Locator::id("go"), MockElement::new("button"));
//! driver.set_title("Dashboard");
//!
//! let page = PageBuilder::new("login")
//!     .base_url("https://app.example.test/")
//!     .field("username", ElementSpec::text_box(Locator::id("user")))
//!     .field("remember", ElementSpec::checkbox(Locator::id("remember")))
//!     .field("submit", ElementSpec::button(Locator::id("go")))
//!     .build(Arc::clone(&driver))?;
//!
//! page.open()?;
//! page.set("username", "alice")?;
//! page.set("remember", true)?;
//! page.element("submit")?.click()?;
//! page.wait().until.title_is("Dashboard")?;
//! # Ok::<(), pagina::PaginaError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Named conditions the wait engine polls
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod conditions;

/// Backend traits and the in-memory mock driver
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod driver;

/// Bound element descriptors
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod element;

/// Canned interaction recipes
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod interact;

/// Locator strategies, shorthand keywords, and translation
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod locator;

/// Page objects and their builder
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod page;

/// Error taxonomy and result alias
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod result;

/// Drop-down helper
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod select;

/// Explicit-wait engine with until / until_not namespaces
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
pub mod wait;

pub use conditions::{Condition, FnCondition};
pub use driver::{keys, MockDriver, MockElement, WebDriver, WebElement};
pub use element::{ElementKind, ElementSpec, ElementValue, SetValue};
pub use interact::Interactions;
pub use locator::{
    keywords_to_locator, shorthand_strategy, translate, translate_with_passthru, Keywords,
    Locator, Strategy, Target, SHORTHAND_MAPPING,
};
pub use page::{Page, PageBuilder, DEFAULT_PAGE_TIMEOUT};
pub use result::{PaginaError, PaginaResult};
pub use select::Select;
pub use wait::{
    Wait, WaitOptions, WaitUntil, WaitUntilNot, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::conditions::*;
    pub use super::driver::*;
    pub use super::element::*;
    pub use super::interact::*;
    pub use super::locator::*;
    pub use super::page::*;
    pub use super::result::*;
    pub use super::select::*;
    pub use super::wait::*;
}
