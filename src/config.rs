//! Rule group configuration.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::converter::ClassifyOptions;
use crate::{Error, Result};

const SURGE_RULES_BASE: &str =
    "https://raw.githubusercontent.com/Loyalsoldier/surge-rules/release/ruleset";

/// Groups shipped in the built-in table, in processing order.
const DEFAULT_GROUPS: [&str; 7] = [
    "PRIVATE", "CNCIDR", "DIRECT", "REJECT", "PROXY", "GOOGLE", "APPLE",
];

/// A named rule group assembled from one or more source lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleGroup {
    /// Group name, also the output file stem
    pub name: String,
    /// Source URLs, fetched in order
    #[serde(default)]
    pub urls: Vec<String>,
}

impl RuleGroup {
    /// Create a new RuleGroup.
    pub fn new<I, S>(name: impl Into<String>, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }
}

/// Immutable table of rule groups handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupConfig {
    /// Groups in processing order
    pub groups: Vec<RuleGroup>,
    /// Strip trailing modifiers from typed rule values
    #[serde(default)]
    pub strip_modifiers: bool,
}

impl GroupConfig {
    /// Create a configuration from a list of groups.
    pub fn new(groups: Vec<RuleGroup>) -> Result<Self> {
        let config = Self {
            groups,
            strip_modifiers: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML group table.
    ///
    /// ```yaml
    /// strip-modifiers: false
    /// groups:
    ///   - name: REJECT
    ///     urls:
    ///       - https://example.com/reject.txt
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML group table from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Builder-style toggle for modifier stripping.
    pub fn with_strip_modifiers(mut self, strip: bool) -> Self {
        self.strip_modifiers = strip;
        self
    }

    /// Classification options derived from this configuration.
    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            strip_modifiers: self.strip_modifiers,
        }
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&RuleGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Iterate groups in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleGroup> {
        self.groups.iter()
    }

    /// Number of configured groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the table has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for group in &self.groups {
            let name = group.name.as_str();
            if name.is_empty()
                || name == "."
                || name == ".."
                || name.contains('/')
                || name.contains('\\')
            {
                return Err(Error::Config(format!("invalid group name: {:?}", name)));
            }
            if !seen.insert(name) {
                return Err(Error::Config(format!("duplicate group name: {}", name)));
            }
        }
        Ok(())
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        let groups = DEFAULT_GROUPS
            .iter()
            .map(|name| {
                let url = format!("{}/{}.txt", SURGE_RULES_BASE, name.to_lowercase());
                RuleGroup::new(*name, [url])
            })
            .collect();
        Self {
            groups,
            strip_modifiers: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let config = GroupConfig::default();
        let names: Vec<&str> = config.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            ["PRIVATE", "CNCIDR", "DIRECT", "REJECT", "PROXY", "GOOGLE", "APPLE"]
        );
        assert_eq!(
            config.group("CNCIDR").unwrap().urls,
            vec!["https://raw.githubusercontent.com/Loyalsoldier/surge-rules/release/ruleset/cncidr.txt"]
        );
        assert!(!config.strip_modifiers);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
strip-modifiers: true
groups:
  - name: STREAMING
    urls:
      - https://example.com/a.txt
      - https://example.com/b.txt
  - name: EMPTY
"#;
        let config = GroupConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.len(), 2);
        assert!(config.strip_modifiers);
        assert!(config.classify_options().strip_modifiers);
        assert_eq!(config.groups[0].urls.len(), 2);
        assert!(config.group("EMPTY").unwrap().urls.is_empty());
    }

    #[test]
    fn test_invalid_group_names() {
        for name in ["", ".", "..", "a/b", "a\\b"] {
            let result = GroupConfig::new(vec![RuleGroup::new(name, ["https://x"])]);
            assert!(matches!(result, Err(Error::Config(_))), "{:?}", name);
        }
    }

    #[test]
    fn test_duplicate_group_names() {
        let yaml = r#"
groups:
  - name: A
  - name: A
"#;
        assert!(matches!(GroupConfig::from_yaml(yaml), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(GroupConfig::from_yaml("groups: 3"), Err(Error::Yaml(_))));
    }
}
