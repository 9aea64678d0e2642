//! Connector sets extracted from configuration documents

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

/// Key of the connector collection in a configuration document
pub const DEFAULT_COLLECTION_KEY: &str = "mcpServers";

/// Name the switcher registers itself under in every mode
pub const DEFAULT_RESERVED_NAME: &str = "mcp-mode-switcher";

/// How connectors are found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorRules {
    /// Object key holding `connector name -> connector config`
    pub collection_key: String,
    /// Connector that is present in every mode and never distinguishes one
    pub reserved_name: String,
}

impl Default for ConnectorRules {
    fn default() -> Self {
        Self {
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            reserved_name: DEFAULT_RESERVED_NAME.to_string(),
        }
    }
}

impl ConnectorRules {
    /// Whether the document has a connector collection at all
    #[must_use]
    pub fn has_collection(&self, document: &Value) -> bool {
        document
            .get(&self.collection_key)
            .is_some_and(Value::is_object)
    }

    /// All connector names in document order, reserved name included
    #[must_use]
    pub fn all_names(&self, document: &Value) -> Vec<String> {
        document
            .get(&self.collection_key)
            .and_then(Value::as_object)
            .map(|servers| servers.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Connector names in document order, reserved name excluded
    #[must_use]
    pub fn distinguishing_names(&self, document: &Value) -> Vec<String> {
        self.all_names(document)
            .into_iter()
            .filter(|name| *name != self.reserved_name)
            .collect()
    }

    /// The set used to compare documents
    #[must_use]
    pub fn connector_set(&self, document: &Value) -> ConnectorSet {
        ConnectorSet(self.distinguishing_names(document).into_iter().collect())
    }

    /// Description synthesized for a mode that has none
    #[must_use]
    pub fn describe(&self, document: &Value) -> String {
        let names = self.distinguishing_names(document);
        if names.is_empty() {
            "No connectors".to_string()
        } else {
            format!("Connectors: {}", names.join(", "))
        }
    }
}

/// Unordered set of connector names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorSet(BTreeSet<String>);

impl ConnectorSet {
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Names in `self` that `other` lacks, sorted
    #[must_use]
    pub fn missing_from(&self, other: &ConnectorSet) -> Vec<String> {
        self.0.difference(&other.0).cloned().collect()
    }
}

impl fmt::Display for ConnectorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{}", names.join(", "))
    }
}

impl<S: Into<String>> FromIterator<S> for ConnectorSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_ignores_order_and_reserved_name() {
        let rules = ConnectorRules::default();
        let a = json!({"mcpServers": {"github": {}, "mcp-mode-switcher": {}, "notion": {}}});
        let b = json!({"theme": "dark", "mcpServers": {"notion": {"command": "x"}, "github": {}}});

        assert_eq!(rules.connector_set(&a), rules.connector_set(&b));
        assert!(!rules.connector_set(&a).contains("mcp-mode-switcher"));
    }

    #[test]
    fn test_missing_collection_is_empty_set() {
        let rules = ConnectorRules::default();
        let doc = json!({"globalShortcut": ""});

        assert!(!rules.has_collection(&doc));
        assert!(rules.connector_set(&doc).is_empty());
        assert!(rules.all_names(&doc).is_empty());
    }

    #[test]
    fn test_describe() {
        let rules = ConnectorRules::default();
        assert_eq!(
            rules.describe(&json!({"mcpServers": {"github": {}, "mcp-mode-switcher": {}, "slack": {}}})),
            "Connectors: github, slack"
        );
        assert_eq!(
            rules.describe(&json!({"mcpServers": {"mcp-mode-switcher": {}}})),
            "No connectors"
        );
    }

    #[test]
    fn test_missing_from() {
        let live: ConnectorSet = ["a", "b"].into_iter().collect();
        let target: ConnectorSet = ["b", "c"].into_iter().collect();

        assert_eq!(target.missing_from(&live), vec!["c".to_string()]);
        assert_eq!(live.missing_from(&target), vec!["a".to_string()]);
        assert_eq!(live.to_string(), "a, b");
    }
}
