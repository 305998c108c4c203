//! Locator normalization for element selection.
//!
//! Callers name an element either with an explicit canonical [`Locator`]
//! (a strategy/value pair) or with exactly one shorthand keyword in a
//! [`Keywords`] bag (`css`, `id`, `xpath`, ...). The translate functions
//! normalize both shapes into the canonical form, and the passthrough
//! variant additionally returns the keywords left over after the locator
//! key is consumed, so callers can carry per-call options (timeouts,
//! messages) in the same bag.
//!
//! ```
//! use pagina::{translate, Keywords, Locator, Strategy};
//!
//! let bag = Keywords::new().arg("css", "button.primary");
//! let locator = translate(None, bag).unwrap();
//! assert_eq!(locator, Locator::css("button.primary"));
//! assert_eq!(locator.strategy, Strategy::CssSelector);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::result::{PaginaError, PaginaResult};

/// Shorthand keyword table: keyword form to lookup strategy.
///
/// Fixed; `link`/`link_text`, `partial_link`/`partial_link_text`,
/// `tag`/`tag_name`, `class_`/`class_name` and `css`/`css_selector` are
/// aliases for the same strategy.
pub const SHORTHAND_MAPPING: [(&str, Strategy); 13] = [
    ("id", Strategy::Id),
    ("xpath", Strategy::XPath),
    ("link", Strategy::LinkText),
    ("link_text", Strategy::LinkText),
    ("partial_link", Strategy::PartialLinkText),
    ("partial_link_text", Strategy::PartialLinkText),
    ("name", Strategy::Name),
    ("tag", Strategy::TagName),
    ("tag_name", Strategy::TagName),
    ("class_", Strategy::ClassName),
    ("class_name", Strategy::ClassName),
    ("css", Strategy::CssSelector),
    ("css_selector", Strategy::CssSelector),
];

/// Element lookup strategies understood by WebDriver-style backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Match on the `id` attribute
    Id,
    /// Match an XPath expression
    #[serde(rename = "xpath")]
    XPath,
    /// Match an anchor by its exact link text
    LinkText,
    /// Match an anchor by a link text substring
    PartialLinkText,
    /// Match on the `name` attribute
    Name,
    /// Match on the tag name
    TagName,
    /// Match on a single class name
    ClassName,
    /// Match a CSS selector
    CssSelector,
}

impl Strategy {
    /// Canonical string form of the strategy
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::XPath => "xpath",
            Self::LinkText => "link-text",
            Self::PartialLinkText => "partial-link-text",
            Self::Name => "name",
            Self::TagName => "tag-name",
            Self::ClassName => "class-name",
            Self::CssSelector => "css-selector",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up the strategy for a shorthand keyword, if the keyword is
/// recognized.
#[must_use]
pub fn shorthand_strategy(key: &str) -> Option<Strategy> {
    SHORTHAND_MAPPING
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, strategy)| *strategy)
}

fn shorthand_key_list() -> String {
    SHORTHAND_MAPPING
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Canonical element locator: a strategy plus its string value.
///
/// Immutable and equality-comparable; produced either directly by the
/// caller or derived from exactly one shorthand keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// Lookup strategy
    pub strategy: Strategy,
    /// Strategy-specific value (selector text, attribute value, ...)
    pub value: String,
}

impl Locator {
    /// Create a locator from a strategy and value
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Locator matching on the `id` attribute
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// Locator matching an XPath expression
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// Locator matching an anchor by exact link text
    #[must_use]
    pub fn link_text(value: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, value)
    }

    /// Locator matching an anchor by a link text substring
    #[must_use]
    pub fn partial_link_text(value: impl Into<String>) -> Self {
        Self::new(Strategy::PartialLinkText, value)
    }

    /// Locator matching on the `name` attribute
    #[must_use]
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Strategy::Name, value)
    }

    /// Locator matching on the tag name
    #[must_use]
    pub fn tag_name(value: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, value)
    }

    /// Locator matching on a single class name
    #[must_use]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, value)
    }

    /// Locator matching a CSS selector
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::CssSelector, value)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

impl From<(Strategy, &str)> for Locator {
    fn from((strategy, value): (Strategy, &str)) -> Self {
        Self::new(strategy, value)
    }
}

impl From<(Strategy, String)> for Locator {
    fn from((strategy, value): (Strategy, String)) -> Self {
        Self::new(strategy, value)
    }
}

/// Ordered keyword-argument bag for the loosely-typed call shapes.
///
/// Keys are unique; inserting an existing key replaces its value in
/// place. Values are JSON so that one bag can carry a shorthand locator
/// key alongside per-call options such as `timeout` or `message`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keywords {
    entries: Vec<(String, Value)>,
}

impl Keywords {
    /// Create an empty bag
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add (or replace) a keyword, builder style
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add (or replace) a keyword in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Remove a keyword, returning its value if present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(name, _)| name == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Value for a keyword, if present
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Whether a keyword is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of keywords in the bag
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl IntoIterator for Keywords {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// How a caller names an element: an explicit canonical locator, or a
/// keyword bag carrying exactly one shorthand key.
///
/// Locator-consuming operations take `impl Into<Target>`, so both shapes
/// work at every call site:
///
/// ```
/// use pagina::{Keywords, Locator, Target};
///
/// let explicit: Target = Locator::id("login").into();
/// let shorthand: Target = Keywords::new().arg("id", "login").into();
/// assert_eq!(
///     explicit.resolve().unwrap(),
///     shorthand.resolve().unwrap(),
/// );
/// ```
#[derive(Debug, Clone)]
pub enum Target {
    /// Already-canonical locator
    Locator(Locator),
    /// Keyword bag to translate
    Keywords(Keywords),
}

impl Target {
    /// Normalize to a canonical locator (strict form: every keyword in a
    /// bag must be locator-relevant).
    ///
    /// # Errors
    ///
    /// `InvalidArguments` per the translation rules of [`translate`].
    pub fn resolve(self) -> PaginaResult<Locator> {
        match self {
            Self::Locator(locator) => translate(Some(locator), Keywords::new()),
            Self::Keywords(keywords) => translate(None, keywords),
        }
    }

    /// Normalize to a canonical locator plus the leftover keywords
    /// (passthrough form).
    ///
    /// # Errors
    ///
    /// `InvalidArguments` per the rules of [`translate_with_passthru`].
    pub fn resolve_with_passthru(self) -> PaginaResult<(Locator, Keywords)> {
        match self {
            Self::Locator(locator) => translate_with_passthru(Some(locator), Keywords::new()),
            Self::Keywords(keywords) => translate_with_passthru(None, keywords),
        }
    }
}

impl From<Locator> for Target {
    fn from(locator: Locator) -> Self {
        Self::Locator(locator)
    }
}

impl From<Keywords> for Target {
    fn from(keywords: Keywords) -> Self {
        Self::Keywords(keywords)
    }
}

impl From<(Strategy, &str)> for Target {
    fn from(pair: (Strategy, &str)) -> Self {
        Self::Locator(pair.into())
    }
}

/// Translate a bag holding exactly one shorthand keyword into a
/// canonical locator.
///
/// # Errors
///
/// `InvalidArguments` when the bag is empty, holds more than one
/// keyword, holds an unrecognized keyword, or the keyword's value is not
/// a string.
pub fn keywords_to_locator(keywords: &Keywords) -> PaginaResult<Locator> {
    if keywords.is_empty() {
        return Err(PaginaError::InvalidArguments {
            message: format!(
                "a shorthand keyword is required; supported keys: {}",
                shorthand_key_list()
            ),
        });
    }
    if keywords.len() > 1 {
        return Err(PaginaError::InvalidArguments {
            message: format!(
                "only one locator keyword is supported at a time, got: {}",
                keywords.keys().collect::<Vec<_>>().join(", ")
            ),
        });
    }
    let Some((key, value)) = keywords.iter().next() else {
        return Err(PaginaError::InvalidArguments {
            message: "a shorthand keyword is required".to_string(),
        });
    };
    let Some(strategy) = shorthand_strategy(key) else {
        return Err(PaginaError::InvalidArguments {
            message: format!(
                "unrecognized locator keyword `{key}`; supported keys: {}",
                shorthand_key_list()
            ),
        });
    };
    shorthand_value(key, value).map(|text| Locator::new(strategy, text))
}

fn shorthand_value(key: &str, value: &Value) -> PaginaResult<String> {
    value.as_str().map(str::to_owned).ok_or_else(|| {
        PaginaError::InvalidArguments {
            message: format!("locator keyword `{key}` expects a string value, got {value}"),
        }
    })
}

/// Translate the strict call shape: an explicit locator, or a bag with
/// exactly one shorthand keyword, never both and never neither.
///
/// # Errors
///
/// `InvalidArguments` when both a locator and keywords are supplied,
/// when neither is supplied, or when the bag fails
/// [`keywords_to_locator`].
pub fn translate(locator: Option<Locator>, keywords: Keywords) -> PaginaResult<Locator> {
    match (locator, keywords.is_empty()) {
        (Some(_), false) => Err(PaginaError::InvalidArguments {
            message: "supply either a locator or a shorthand keyword, not both".to_string(),
        }),
        (Some(locator), true) => Ok(locator),
        (None, true) => Err(PaginaError::InvalidArguments {
            message: format!(
                "a locator or exactly one shorthand keyword is required; supported keys: {}",
                shorthand_key_list()
            ),
        }),
        (None, false) => keywords_to_locator(&keywords),
    }
}

/// Translate the passthrough call shape: an explicit locator or exactly
/// one recognized shorthand keyword, plus arbitrary extra keywords that
/// are handed back untouched for the caller to interpret.
///
/// # Errors
///
/// `InvalidArguments` when a locator is supplied together with a
/// recognized shorthand keyword, when neither is supplied, or when more
/// than one recognized shorthand keyword is present.
pub fn translate_with_passthru(
    locator: Option<Locator>,
    mut keywords: Keywords,
) -> PaginaResult<(Locator, Keywords)> {
    let recognized: Vec<String> = keywords
        .keys()
        .filter(|key| shorthand_strategy(key).is_some())
        .map(str::to_owned)
        .collect();

    if let Some(locator) = locator {
        if recognized.is_empty() {
            return Ok((locator, keywords));
        }
        return Err(PaginaError::InvalidArguments {
            message: format!(
                "supply either a locator or a shorthand keyword, not both (got `{}`)",
                recognized.join("`, `")
            ),
        });
    }
    match recognized.as_slice() {
        [] => Err(PaginaError::InvalidArguments {
            message: format!(
                "a locator or exactly one shorthand keyword is required; supported keys: {}",
                shorthand_key_list()
            ),
        }),
        [key] => {
            let Some(strategy) = shorthand_strategy(key) else {
                return Err(PaginaError::InvalidArguments {
                    message: format!("unrecognized locator keyword `{key}`"),
                });
            };
            let value = keywords.remove(key).unwrap_or(Value::Null);
            let text = shorthand_value(key, &value)?;
            Ok((Locator::new(strategy, text), keywords))
        }
        _ => Err(PaginaError::InvalidArguments {
            message: format!(
                "only one locator keyword is supported at a time, got: {}",
                recognized.join(", ")
            ),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod strategy_tests {
        use super::*;

        #[test]
        fn test_strategy_string_forms() {
            assert_eq!(Strategy::Id.as_str(), "id");
            assert_eq!(Strategy::XPath.as_str(), "xpath");
            assert_eq!(Strategy::LinkText.as_str(), "link-text");
            assert_eq!(Strategy::PartialLinkText.as_str(), "partial-link-text");
            assert_eq!(Strategy::Name.as_str(), "name");
            assert_eq!(Strategy::TagName.as_str(), "tag-name");
            assert_eq!(Strategy::ClassName.as_str(), "class-name");
            assert_eq!(Strategy::CssSelector.as_str(), "css-selector");
        }

        #[test]
        fn test_strategy_serde_matches_string_form() {
            for (_, strategy) in SHORTHAND_MAPPING {
                let json = serde_json::to_string(&strategy).unwrap();
                assert_eq!(json, format!("{:?}", strategy.as_str()));
            }
        }

        #[test]
        fn test_strategy_deserialize() {
            let strategy: Strategy = serde_json::from_str("\"css-selector\"").unwrap();
            assert_eq!(strategy, Strategy::CssSelector);
            let strategy: Strategy = serde_json::from_str("\"xpath\"").unwrap();
            assert_eq!(strategy, Strategy::XPath);
        }
    }

    mod shorthand_tests {
        use super::*;

        #[test]
        fn test_every_shorthand_key_resolves() {
            for (key, strategy) in SHORTHAND_MAPPING {
                assert_eq!(shorthand_strategy(key), Some(strategy));
            }
        }

        #[test]
        fn test_alias_pairs_share_strategy() {
            assert_eq!(shorthand_strategy("link"), shorthand_strategy("link_text"));
            assert_eq!(
                shorthand_strategy("partial_link"),
                shorthand_strategy("partial_link_text")
            );
            assert_eq!(shorthand_strategy("tag"), shorthand_strategy("tag_name"));
            assert_eq!(
                shorthand_strategy("class_"),
                shorthand_strategy("class_name")
            );
            assert_eq!(shorthand_strategy("css"), shorthand_strategy("css_selector"));
        }

        #[test]
        fn test_unknown_key_is_none() {
            assert_eq!(shorthand_strategy("data_testid"), None);
            assert_eq!(shorthand_strategy("ID"), None);
            assert_eq!(shorthand_strategy(""), None);
        }
    }

    mod keywords_tests {
        use super::*;

        #[test]
        fn test_arg_builder_preserves_order() {
            let bag = Keywords::new().arg("css", "a").arg("timeout", 5);
            let keys: Vec<_> = bag.keys().collect();
            assert_eq!(keys, vec!["css", "timeout"]);
            assert_eq!(bag.len(), 2);
        }

        #[test]
        fn test_insert_replaces_in_place() {
            let mut bag = Keywords::new().arg("id", "first").arg("timeout", 5);
            bag.insert("id", "second");
            assert_eq!(bag.len(), 2);
            assert_eq!(bag.get("id"), Some(&Value::from("second")));
            assert_eq!(bag.keys().next(), Some("id"));
        }

        #[test]
        fn test_remove_returns_value() {
            let mut bag = Keywords::new().arg("css", "a").arg("message", "m");
            assert_eq!(bag.remove("css"), Some(Value::from("a")));
            assert_eq!(bag.remove("css"), None);
            assert_eq!(bag.len(), 1);
            assert!(bag.contains_key("message"));
        }
    }

    mod translate_tests {
        use super::*;

        #[test]
        fn test_locator_passes_through_unchanged() {
            let locator = Locator::css("button.primary");
            let result = translate(Some(locator.clone()), Keywords::new()).unwrap();
            assert_eq!(result, locator);
        }

        #[test]
        fn test_single_shorthand_translates() {
            let bag = Keywords::new().arg("css", "button.primary");
            let result = translate(None, bag).unwrap();
            assert_eq!(result, Locator::new(Strategy::CssSelector, "button.primary"));
        }

        #[test]
        fn test_every_shorthand_key_translates() {
            for (key, strategy) in SHORTHAND_MAPPING {
                let bag = Keywords::new().arg(key, "target");
                let result = translate(None, bag).unwrap();
                assert_eq!(result, Locator::new(strategy, "target"));
            }
        }

        #[test]
        fn test_no_arguments_errors() {
            let err = translate(None, Keywords::new()).unwrap_err();
            assert!(matches!(err, PaginaError::InvalidArguments { .. }));
        }

        #[test]
        fn test_two_shorthands_error() {
            let bag = Keywords::new().arg("id", "a").arg("css", "b");
            let err = translate(None, bag).unwrap_err();
            assert!(matches!(err, PaginaError::InvalidArguments { .. }));
        }

        #[test]
        fn test_unrecognized_keyword_errors() {
            let bag = Keywords::new().arg("data_testid", "score");
            let err = translate(None, bag).unwrap_err();
            let text = err.to_string();
            assert!(text.contains("data_testid"));
            assert!(text.contains("css_selector"));
        }

        #[test]
        fn test_locator_plus_shorthand_errors() {
            let bag = Keywords::new().arg("id", "x");
            let err = translate(Some(Locator::css("a")), bag).unwrap_err();
            assert!(matches!(err, PaginaError::InvalidArguments { .. }));
        }

        #[test]
        fn test_non_string_value_errors() {
            let bag = Keywords::new().arg("id", 42);
            let err = translate(None, bag).unwrap_err();
            assert!(err.to_string().contains("expects a string value"));
        }
    }

    mod passthru_tests {
        use super::*;

        #[test]
        fn test_remainder_is_returned_untouched() {
            let bag = Keywords::new().arg("css", "a").arg("timeout", 5);
            let (locator, rest) = translate_with_passthru(None, bag).unwrap();
            assert_eq!(locator, Locator::new(Strategy::CssSelector, "a"));
            assert_eq!(rest.len(), 1);
            assert_eq!(rest.get("timeout"), Some(&Value::from(5)));
        }

        #[test]
        fn test_explicit_locator_keeps_all_keywords() {
            let bag = Keywords::new().arg("timeout", 5).arg("message", "slow");
            let (locator, rest) =
                translate_with_passthru(Some(Locator::id("login")), bag).unwrap();
            assert_eq!(locator, Locator::id("login"));
            assert_eq!(rest.len(), 2);
        }

        #[test]
        fn test_locator_plus_recognized_key_errors() {
            let bag = Keywords::new().arg("css", "a").arg("timeout", 5);
            let err = translate_with_passthru(Some(Locator::id("login")), bag).unwrap_err();
            assert!(matches!(err, PaginaError::InvalidArguments { .. }));
        }

        #[test]
        fn test_only_unrecognized_keys_errors() {
            let bag = Keywords::new().arg("timeout", 5);
            let err = translate_with_passthru(None, bag).unwrap_err();
            assert!(matches!(err, PaginaError::InvalidArguments { .. }));
        }

        #[test]
        fn test_two_recognized_keys_error() {
            let bag = Keywords::new()
                .arg("css", "a")
                .arg("xpath", "//b")
                .arg("timeout", 5);
            let err = translate_with_passthru(None, bag).unwrap_err();
            assert!(err.to_string().contains("one locator keyword"));
        }
    }

    mod target_tests {
        use super::*;

        #[test]
        fn test_target_from_locator() {
            let target = Target::from(Locator::name("q"));
            assert_eq!(target.resolve().unwrap(), Locator::name("q"));
        }

        #[test]
        fn test_target_from_keywords() {
            let target = Target::from(Keywords::new().arg("link", "Sign in"));
            assert_eq!(
                target.resolve().unwrap(),
                Locator::new(Strategy::LinkText, "Sign in")
            );
        }

        #[test]
        fn test_target_from_strategy_pair() {
            let target = Target::from((Strategy::TagName, "select"));
            assert_eq!(target.resolve().unwrap(), Locator::tag_name("select"));
        }

        #[test]
        fn test_target_passthru_resolution() {
            let target = Target::from(Keywords::new().arg("id", "go").arg("message", "m"));
            let (locator, rest) = target.resolve_with_passthru().unwrap();
            assert_eq!(locator, Locator::id("go"));
            assert_eq!(rest.get("message"), Some(&Value::from("m")));
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        // `Strategy` by itself would clash with the locator enum
        fn shorthand_key() -> impl proptest::strategy::Strategy<Value = &'static str> {
            prop::sample::select(
                SHORTHAND_MAPPING
                    .iter()
                    .map(|(key, _)| *key)
                    .collect::<Vec<_>>(),
            )
        }

        proptest! {
            /// Shorthand and canonical forms resolve to the same locator.
            #[test]
            fn prop_shorthand_round_trip(
                key in shorthand_key(),
                value in "[a-zA-Z0-9 _.#/-]{0,40}",
            ) {
                let strategy = shorthand_strategy(key).unwrap();
                let via_keyword =
                    translate(None, Keywords::new().arg(key, value.as_str())).unwrap();
                prop_assert_eq!(&via_keyword, &Locator::new(strategy, value.as_str()));

                let via_locator = translate(Some(via_keyword.clone()), Keywords::new()).unwrap();
                prop_assert_eq!(via_locator, via_keyword);
            }

            /// Passthrough returns leftover keywords exactly as supplied.
            #[test]
            fn prop_passthru_preserves_remainder(
                key in shorthand_key(),
                value in "[a-zA-Z0-9 _.#/-]{1,20}",
                timeout in 0u64..3600,
            ) {
                let bag = Keywords::new()
                    .arg(key, value.as_str())
                    .arg("timeout", timeout);
                let (locator, rest) = translate_with_passthru(None, bag).unwrap();
                prop_assert_eq!(locator.value, value);
                prop_assert_eq!(rest.len(), 1);
                prop_assert_eq!(rest.get("timeout"), Some(&Value::from(timeout)));
            }
        }
    }
}
