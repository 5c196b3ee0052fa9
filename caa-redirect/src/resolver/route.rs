//! Image file grammar
//!
//! The last path segment of `/release/{mbid}/{file}` names the wanted image:
//! - `front`, `back`, or a numeric image id
//! - optionally followed by `-250` or `-500` for a thumbnail
//! - optionally followed by `.{ext}` (defaults to `jpg`)
//!
//! Patterns are tried in a fixed order and the first match wins.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::catalog::Role;

/// Extension used when the request names none
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Which image of a release is wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Role(Role),
    Id(i64),
}

/// Requested size variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Size {
    #[default]
    Original,
    Thumb250,
    Thumb500,
}

impl Size {
    /// Filename suffix for this variant
    pub fn suffix(&self) -> &'static str {
        match self {
            Size::Original => "",
            Size::Thumb250 => "_thumb250",
            Size::Thumb500 => "_thumb500",
        }
    }

    fn from_digits(digits: &str) -> Option<Self> {
        match digits {
            "250" => Some(Size::Thumb250),
            "500" => Some(Size::Thumb500),
            _ => None,
        }
    }
}

/// A parsed image request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub selector: Selector,
    pub size: Size,
    pub extension: String,
}

impl ImageRequest {
    /// Original-size jpg for a selector
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            size: Size::Original,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// Reasons a file segment is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("unrecognized image selector '{0}'")]
    UnknownSelector(String),

    #[error("unsupported size '{0}' (expected 250 or 500)")]
    UnsupportedSize(String),

    #[error("invalid image id '{0}'")]
    InvalidImageId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pattern {
    RoleWithSize,
    Role,
    IdWithSize,
    Id,
}

static PATTERNS: LazyLock<Vec<(Pattern, Regex)>> = LazyLock::new(|| {
    [
        (
            Pattern::RoleWithSize,
            r"^(?P<role>front|back)-(?P<size>\d+)(?:\.(?P<ext>[A-Za-z0-9]+))?$",
        ),
        (
            Pattern::Role,
            r"^(?P<role>front|back)(?:\.(?P<ext>[A-Za-z0-9]+))?$",
        ),
        (
            Pattern::IdWithSize,
            r"^(?P<id>\d+)-(?P<size>\d+)(?:\.(?P<ext>[A-Za-z0-9]+))?$",
        ),
        (Pattern::Id, r"^(?P<id>\d+)(?:\.(?P<ext>[A-Za-z0-9]+))?$"),
    ]
    .into_iter()
    .map(|(pattern, re)| (pattern, Regex::new(re).unwrap()))
    .collect()
});

/// Parse the file segment of an image request
pub fn parse(segment: &str) -> Result<ImageRequest, RouteError> {
    PATTERNS
        .iter()
        .find_map(|(pattern, re)| re.captures(segment).map(|caps| build(*pattern, &caps)))
        .unwrap_or_else(|| Err(RouteError::UnknownSelector(segment.to_string())))
}

fn build(pattern: Pattern, caps: &Captures<'_>) -> Result<ImageRequest, RouteError> {
    let selector = match pattern {
        Pattern::RoleWithSize | Pattern::Role => match &caps["role"] {
            "front" => Selector::Role(Role::Front),
            _ => Selector::Role(Role::Back),
        },
        Pattern::IdWithSize | Pattern::Id => {
            let raw = &caps["id"];
            match raw.parse::<i64>() {
                Ok(id) if id > 0 => Selector::Id(id),
                _ => return Err(RouteError::InvalidImageId(raw.to_string())),
            }
        }
    };

    let size = match caps.name("size") {
        Some(m) => Size::from_digits(m.as_str())
            .ok_or_else(|| RouteError::UnsupportedSize(m.as_str().to_string()))?,
        None => Size::Original,
    };

    let extension = caps
        .name("ext")
        .map_or(DEFAULT_EXTENSION, |m| m.as_str());

    Ok(ImageRequest::new(selector)
        .with_size(size)
        .with_extension(extension))
}
