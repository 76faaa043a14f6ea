//! Body tag construction and placeholder matching
//!
//! A layout's content reserves a slot for its inner content, marked by a
//! body tag such as `{{ body }}`. This module builds the literal tag string
//! from configurable delimiters and compiles the whitespace-tolerant pattern
//! used to locate and replace that tag inside content.

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Default opening/closing delimiters for the body tag
pub const DEFAULT_DELIMS: (&str, &str) = ("{{", "}}");

/// Default tag name
pub const DEFAULT_TAG: &str = "body";

/// Separator between delimiter and tag name in the literal tag
const LITERAL_SEP: &str = " ";

/// Separator fragment used when building the matching pattern, so that
/// `{{body}}`, `{{ body }}`, and `{{  body  }}` all match
const PATTERN_SEP: &str = r"\s*";

/// Errors that can occur while building a body tag pattern
#[derive(Debug, Error)]
pub enum TagError {
    /// Both delimiter sides resolved to empty strings
    #[error("empty delimiters: the body tag pattern would match anywhere")]
    EmptyDelimiters,

    /// The assembled pattern failed to compile
    #[error("invalid body tag pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Matching flags for the body tag pattern
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MatchFlags {
    /// Replace every occurrence rather than only the first
    #[serde(default = "default_all")]
    pub all: bool,

    /// Match the tag name case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,
}

impl Default for MatchFlags {
    fn default() -> Self {
        Self {
            all: true,
            case_insensitive: false,
        }
    }
}

fn default_all() -> bool {
    true
}

/// Options recognized by the resolution engine
///
/// Every field is optional. Unset fields fall through to the engine's
/// instance options and from there to the library defaults, so the
/// precedence per call is: call override, then instance, then default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StackOptions {
    /// Opening/closing delimiter pair, default `("{{", "}}")`
    pub delims: Option<(String, String)>,

    /// Tag name between the delimiters, default `"body"`
    pub tag: Option<String>,

    /// Separator between delimiter and tag name. Defaults to a single space
    /// in the literal tag and to a whitespace-tolerant fragment in the
    /// matching pattern. When set, the value is spliced into the pattern
    /// verbatim.
    pub sep: Option<String>,

    /// Matching flags for the body tag pattern
    pub flags: Option<MatchFlags>,

    /// Caller-supplied data merged into the context before any layout data
    pub locals: Option<Map<String, Value>>,
}

impl StackOptions {
    /// Create options with every field unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter pair
    pub fn with_delims(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.delims = Some((open.into(), close.into()));
        self
    }

    /// Set the tag name
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the separator
    pub fn with_sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = Some(sep.into());
        self
    }

    /// Set the matching flags
    pub fn with_flags(mut self, flags: MatchFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Set the caller-supplied locals
    pub fn with_locals(mut self, locals: Map<String, Value>) -> Self {
        self.locals = Some(locals);
        self
    }

    /// Overlay `over` on top of `self`, field-wise: fields set in `over`
    /// win, unset fields keep this value
    pub fn layered(&self, over: &StackOptions) -> StackOptions {
        StackOptions {
            delims: over.delims.clone().or_else(|| self.delims.clone()),
            tag: over.tag.clone().or_else(|| self.tag.clone()),
            sep: over.sep.clone().or_else(|| self.sep.clone()),
            flags: over.flags.or(self.flags),
            locals: over.locals.clone().or_else(|| self.locals.clone()),
        }
    }
}

/// Options with the library-default tier applied
struct ResolvedTag {
    delims: (String, String),
    tag: String,
    sep: Option<String>,
    flags: MatchFlags,
}

impl ResolvedTag {
    fn from_options(options: &StackOptions) -> Self {
        let delims = options
            .delims
            .clone()
            .unwrap_or_else(|| (DEFAULT_DELIMS.0.to_string(), DEFAULT_DELIMS.1.to_string()));
        Self {
            delims,
            tag: options.tag.clone().unwrap_or_else(|| DEFAULT_TAG.to_string()),
            sep: options.sep.clone(),
            flags: options.flags.unwrap_or_default(),
        }
    }
}

/// Build the literal body tag from the given options
///
/// The tag is `open + sep + name + sep + close`, e.g. `{{ body }}` with the
/// defaults. Pure string construction; an all-empty result is handled by the
/// engine's prebaked fallback tag.
pub fn make_tag(options: &StackOptions) -> String {
    let resolved = ResolvedTag::from_options(options);
    let sep = resolved.sep.as_deref().unwrap_or(LITERAL_SEP);
    format!(
        "{}{}{}{}{}",
        resolved.delims.0, sep, resolved.tag, sep, resolved.delims.1
    )
}

/// Compile the matching pattern for the body tag
///
/// Delimiters and the tag name are matched literally (every pattern
/// metacharacter escaped); the separator defaults to `\s*` so any amount of
/// whitespace between delimiter and tag name matches. Fails when both
/// delimiter sides resolve empty, since the resulting pattern would match
/// everywhere.
pub fn make_pattern(options: &StackOptions) -> Result<TagPattern, TagError> {
    let resolved = ResolvedTag::from_options(options);
    if resolved.delims.0.is_empty() && resolved.delims.1.is_empty() {
        return Err(TagError::EmptyDelimiters);
    }

    let sep = resolved.sep.as_deref().unwrap_or(PATTERN_SEP);
    let mut source = String::new();
    if resolved.flags.case_insensitive {
        source.push_str("(?i)");
    }
    source.push_str(&regex::escape(&resolved.delims.0));
    source.push_str(sep);
    source.push_str(&regex::escape(&resolved.tag));
    source.push_str(sep);
    source.push_str(&regex::escape(&resolved.delims.1));

    let regex = Regex::new(&source)?;
    Ok(TagPattern {
        regex,
        all: resolved.flags.all,
    })
}

/// A compiled body tag matcher
#[derive(Debug, Clone)]
pub struct TagPattern {
    regex: Regex,
    all: bool,
}

impl TagPattern {
    /// Whether `content` contains the body tag
    pub fn is_match(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }

    /// Replace body tag occurrences in `content` with `replacement`
    ///
    /// The replacement is inserted literally. Every occurrence is replaced
    /// unless the pattern was built with `all: false`, in which case only
    /// the first is. Content without the tag passes through unchanged.
    pub fn replace(&self, content: &str, replacement: &str) -> String {
        let replacement = regex::NoExpand(replacement);
        if self.all {
            self.regex.replace_all(content, replacement).into_owned()
        } else {
            self.regex.replace(content, replacement).into_owned()
        }
    }

    /// The underlying regular expression, for callers that need to locate
    /// the tag themselves
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }
}
