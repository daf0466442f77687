//! List-query and text-filter translation.
//!
//! # Purpose
//! Normalizes the generic pagination envelope and text-match predicates carried
//! by list requests into the values the storage layer evaluates.
//!
//! # Key invariants
//! - A missing [`ListQuery`] translates to `(0, 0, false)`: no offset, no limit,
//!   no ascending order.
//! - Text methods outside the eight known codes translate to
//!   [`TextComparison::Invalid`] (numeric value `-1`), never to `Equals`.
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;

/// Pagination envelope of a list request.
///
/// A `limit` of zero means the caller did not bound the result size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ListQuery {
    pub offset: u64,
    pub limit: u32,
    pub asc: bool,
}

/// Translate an optional list query into `(offset, limit, ascending)`.
///
/// ```
/// use orgplane_object::{ListQuery, list_query_to_query};
///
/// assert_eq!(list_query_to_query(None), (0, 0, false));
/// let query = ListQuery { offset: 10, limit: 5, asc: true };
/// assert_eq!(list_query_to_query(Some(&query)), (10, 5, true));
/// ```
pub fn list_query_to_query(query: Option<&ListQuery>) -> (u64, u64, bool) {
    match query {
        Some(query) => (query.offset, u64::from(query.limit), query.asc),
        None => (0, 0, false),
    }
}

/// Text matching method as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TextQueryMethod {
    #[serde(rename = "TEXT_QUERY_METHOD_EQUALS")]
    Equals = 0,
    #[serde(rename = "TEXT_QUERY_METHOD_EQUALS_IGNORE_CASE")]
    EqualsIgnoreCase = 1,
    #[serde(rename = "TEXT_QUERY_METHOD_STARTS_WITH")]
    StartsWith = 2,
    #[serde(rename = "TEXT_QUERY_METHOD_STARTS_WITH_IGNORE_CASE")]
    StartsWithIgnoreCase = 3,
    #[serde(rename = "TEXT_QUERY_METHOD_CONTAINS")]
    Contains = 4,
    #[serde(rename = "TEXT_QUERY_METHOD_CONTAINS_IGNORE_CASE")]
    ContainsIgnoreCase = 5,
    #[serde(rename = "TEXT_QUERY_METHOD_ENDS_WITH")]
    EndsWith = 6,
    #[serde(rename = "TEXT_QUERY_METHOD_ENDS_WITH_IGNORE_CASE")]
    EndsWithIgnoreCase = 7,
}

impl TextQueryMethod {
    /// Decode a raw wire code, returning `None` for unknown values.
    pub fn from_code(code: i32) -> Option<Self> {
        let method = match code {
            0 => Self::Equals,
            1 => Self::EqualsIgnoreCase,
            2 => Self::StartsWith,
            3 => Self::StartsWithIgnoreCase,
            4 => Self::Contains,
            5 => Self::ContainsIgnoreCase,
            6 => Self::EndsWith,
            7 => Self::EndsWithIgnoreCase,
            _ => return None,
        };
        Some(method)
    }

    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Comparison kind evaluated by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TextComparison {
    Equals = 0,
    EqualsIgnoreCase = 1,
    StartsWith = 2,
    StartsWithIgnoreCase = 3,
    Contains = 4,
    ContainsIgnoreCase = 5,
    EndsWith = 6,
    EndsWithIgnoreCase = 7,
    /// Produced for any method the translator does not recognize.
    Invalid = -1,
}

impl TextComparison {
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Evaluate the comparison with `value` as the stored text and `pattern`
    /// as the text supplied by the caller.
    ///
    /// `Invalid` matches nothing.
    ///
    /// ```
    /// use orgplane_object::TextComparison;
    ///
    /// assert!(TextComparison::ContainsIgnoreCase.matches("Acme Corp", "ME CO"));
    /// assert!(!TextComparison::Contains.matches("Acme Corp", "ME CO"));
    /// assert!(!TextComparison::Invalid.matches("x", "x"));
    /// ```
    pub fn matches(self, value: &str, pattern: &str) -> bool {
        match self {
            Self::Equals => value == pattern,
            Self::StartsWith => value.starts_with(pattern),
            Self::Contains => value.contains(pattern),
            Self::EndsWith => value.ends_with(pattern),
            Self::EqualsIgnoreCase => lower(value) == lower(pattern),
            Self::StartsWithIgnoreCase => lower(value).starts_with(&*lower(pattern)),
            Self::ContainsIgnoreCase => lower(value).contains(&*lower(pattern)),
            Self::EndsWithIgnoreCase => lower(value).ends_with(&*lower(pattern)),
            Self::Invalid => false,
        }
    }
}

fn lower(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_uppercase) {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

impl From<TextQueryMethod> for TextComparison {
    fn from(method: TextQueryMethod) -> Self {
        match method {
            TextQueryMethod::Equals => Self::Equals,
            TextQueryMethod::EqualsIgnoreCase => Self::EqualsIgnoreCase,
            TextQueryMethod::StartsWith => Self::StartsWith,
            TextQueryMethod::StartsWithIgnoreCase => Self::StartsWithIgnoreCase,
            TextQueryMethod::Contains => Self::Contains,
            TextQueryMethod::ContainsIgnoreCase => Self::ContainsIgnoreCase,
            TextQueryMethod::EndsWith => Self::EndsWith,
            TextQueryMethod::EndsWithIgnoreCase => Self::EndsWithIgnoreCase,
        }
    }
}

/// Translate a raw wire method code into a comparison kind.
///
/// Unknown codes yield [`TextComparison::Invalid`].
pub fn text_method_to_query(method: i32) -> TextComparison {
    TextQueryMethod::from_code(method)
        .map(TextComparison::from)
        .unwrap_or(TextComparison::Invalid)
}

/// Text method field of a request: either the symbolic name or the raw code.
///
/// Names outside the known set are kept as [`TextMethod::Unknown`] so they
/// translate to [`TextComparison::Invalid`] instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TextMethod {
    Named(TextQueryMethod),
    Code(i32),
    Unknown(String),
}

impl Default for TextMethod {
    fn default() -> Self {
        Self::Named(TextQueryMethod::Equals)
    }
}

impl TextMethod {
    pub fn comparison(&self) -> TextComparison {
        match self {
            Self::Named(method) => (*method).into(),
            Self::Code(code) => text_method_to_query(*code),
            Self::Unknown(_) => TextComparison::Invalid,
        }
    }
}

/// A text predicate: compare a column against `value` using `method`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TextFilter {
    pub value: String,
    #[serde(default)]
    pub method: TextMethod,
}

impl TextFilter {
    pub fn new(value: impl Into<String>, method: TextQueryMethod) -> Self {
        Self {
            value: value.into(),
            method: TextMethod::Named(method),
        }
    }

    pub fn comparison(&self) -> TextComparison {
        self.method.comparison()
    }

    /// Returns false for invalid methods; callers that need to reject those
    /// should check [`TextComparison::is_valid`] first.
    pub fn matches(&self, value: &str) -> bool {
        self.comparison().matches(value, &self.value)
    }
}
