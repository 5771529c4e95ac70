//! Project configuration from `.docxlinks.toml`.

use std::path::Path;

use serde::Deserialize;

use crate::classify::DEFAULT_PARTIAL_MATCH_PHRASES;
use crate::context::DEFAULT_RADIUS;
use crate::error::Error;

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = ".docxlinks.toml";

/// Label phrase that introduces a tab-separated internal cross-reference.
pub const DEFAULT_CONVENTION_PREFIX: &str = "Dokumentum belső hivatkozás";

/// Project configuration loaded from `.docxlinks.toml`.
/// Include/exclude patterns are path prefixes applied to documents found by a
/// directory scan.
#[derive(Debug, Default)]
pub struct Config {
    /// Prefixes that exclude a document even when included.
    exclude: Vec<String>,
    /// Knobs for the extraction pass.
    pub extraction: ExtractionSettings,
    /// Prefixes a document must match to be scanned; empty means everything.
    include: Vec<String>,
}

/// Extraction settings, the `[extraction]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionSettings {
    /// Characters kept on each side of an anchor in the context column.
    pub context_radius: usize,
    /// Phrase that must open the marker of a convention reference.
    pub convention_prefix: String,
    /// Phrases that mark a convention reference as a valid partial match.
    pub partial_match_phrases: Vec<String>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        return Self {
            context_radius: DEFAULT_RADIUS,
            convention_prefix: DEFAULT_CONVENTION_PREFIX.to_string(),
            partial_match_phrases: DEFAULT_PARTIAL_MATCH_PHRASES.iter().map(|p| return (*p).to_string()).collect(),
        };
    }
}

/// Raw TOML structure for `.docxlinks.toml`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DocxlinksTomlConfig {
    /// Exclude prefixes.
    #[serde(default)]
    exclude: Vec<String>,
    /// The `[extraction]` table.
    #[serde(default)]
    extraction: ExtractionSettings,
    /// Include prefixes.
    #[serde(default)]
    include: Vec<String>,
}

impl Config {
    /// Load config from `.docxlinks.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DocxlinksTomlConfig = toml::from_str(content)?;
        return Ok(Self { exclude: raw.exclude, extraction: raw.extraction, include: raw.include });
    }

    /// Check whether a document path (relative to the scan root) should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}
