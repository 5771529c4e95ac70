//! Compiled extraction rules: the patterns and thresholds every detector reads.

use std::sync::LazyLock;

use regex::Regex;

use crate::classify::BOOKMARK_MARKER;
use crate::config::ExtractionSettings;
use crate::error::Error;

/// `http`/`https` followed by URL characters or percent-escapes.
const URL_PATTERN: &str = r"https?://(?:[A-Za-z0-9$\-_@.&+!*(),/:;=?~'\[\]]|%[0-9A-Fa-f]{2})+";

/// Literal URLs typed as plain text.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| return Regex::new(URL_PATTERN).expect("valid regex"));

/// Default rules, compiled once.
static DEFAULT_RULES: LazyLock<Rules> =
    LazyLock::new(|| return Rules::new(&ExtractionSettings::default()).expect("default settings compile"));

/// Settings compiled into the form detectors use.
#[derive(Debug, Clone)]
pub struct Rules {
    /// Characters kept on each side of an anchor.
    pub context_radius: usize,
    /// `label<TAB>prefix ... BKM_...`, capturing label and marker.
    convention: Regex,
    /// Phrases that mark a convention reference as a valid partial match.
    pub partial_match_phrases: Vec<String>,
}

impl Rules {
    /// Compile extraction settings.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigInvalid` for an empty convention prefix and
    /// `Error::InvalidPattern` if the convention pattern does not compile.
    pub fn new(settings: &ExtractionSettings) -> Result<Self, Error> {
        let prefix = settings.convention_prefix.trim();
        if prefix.is_empty() {
            return Err(Error::ConfigInvalid {
                key: "extraction.convention_prefix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let pattern = convention_pattern(prefix);
        let convention = Regex::new(&pattern)
            .map_err(|e| return Error::InvalidPattern { pattern: pattern.clone(), reason: e.to_string() })?;

        return Ok(Self {
            context_radius: settings.context_radius,
            convention,
            partial_match_phrases: settings.partial_match_phrases.clone(),
        });
    }

    /// The tab-separated convention pattern. Group 1 is the label, group 2 the marker.
    pub fn convention(&self) -> &Regex {
        return &self.convention;
    }

    /// The literal-URL pattern.
    pub fn url(&self) -> &'static Regex {
        return &URL_REGEX;
    }
}

impl Default for Rules {
    /// Rules for the default settings.
    ///
    /// # Panics
    ///
    /// Panics if the built-in defaults fail to compile (compile-time invariant).
    fn default() -> Self {
        return DEFAULT_RULES.clone();
    }
}

/// Build the convention regex for a prefix phrase.
fn convention_pattern(prefix: &str) -> String {
    let prefix = regex::escape(prefix);
    let marker = regex::escape(BOOKMARK_MARKER);
    return format!(r"([^\t\n]*)\t[ ]*({prefix}[^\t\n]*?{marker}[^\t\n]*)");
}
