//! Registry configuration
//!
//! A `MockConfig` is handed to [`ModelRegistry::with_config`](crate::ModelRegistry::with_config)
//! and applies to every class loaded into that registry. It can be built in
//! code or parsed from TOML text; reading the text from disk is left to the
//! caller.

use mockrecord_core::{DuplicateIdPolicy, Error, IdentityKeyMode, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a model registry.
///
/// # Example
///
/// ```toml
/// # "stringified" (default): 1 and "1" share an index key
/// # "typed": the id's type is part of the key
/// identity_keys = "stringified"
///
/// # "overwrite" (default) or "reject"
/// duplicate_ids = "overwrite"
///
/// strict_attributes = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConfig {
    /// How record ids are turned into index keys
    #[serde(default)]
    pub identity_keys: IdentityKeyMode,
    /// What a save does when another live record holds the same key
    #[serde(default)]
    pub duplicate_ids: DuplicateIdPolicy,
    /// Reject attribute names the class does not declare
    #[serde(default = "default_strict_attributes")]
    pub strict_attributes: bool,
}

fn default_strict_attributes() -> bool {
    true
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            identity_keys: IdentityKeyMode::default(),
            duplicate_ids: DuplicateIdPolicy::default(),
            strict_attributes: default_strict_attributes(),
        }
    }
}

impl MockConfig {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid TOML or names an
    /// unknown mode.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse mock config: {}", e)))
    }

    /// Serialize this config to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize mock config: {}", e)))
    }

    /// Returns the default config content with comments.
    pub fn default_toml() -> &'static str {
        r#"# mockrecord configuration
#
# Identity keys: "stringified" (default) or "typed"
#   "stringified" = ids are keyed by their string form; 1 and "1" collide
#   "typed"       = the id's type is part of the key
identity_keys = "stringified"

# Duplicate ids: "overwrite" (default) or "reject"
#   "overwrite" = the newer record takes over the index entry
#   "reject"    = saving the second record fails
duplicate_ids = "overwrite"

# Fail on attribute names the mocked class does not declare
strict_attributes = true
"#
    }
}
