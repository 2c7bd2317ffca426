use serde::Deserialize;

/// Tunables of the template engine.
///
/// Every field has a default, so hosts may deserialize a partial JSON object.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Supertype whose first type argument is the element type of an iterable.
    pub iterable_type: String,
    /// Fallback supertype when the iterable binding cannot be computed.
    pub collection_type: String,
    /// Candidate names for `${index}`, in preference order.
    pub index_names: Vec<String>,
    /// Upper bound on supertype walks, guards against cyclic project models.
    pub max_hierarchy_depth: usize,
    pub naming: NamingConfig,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            iterable_type: "java.lang.Iterable".to_string(),
            collection_type: "java.util.Collection".to_string(),
            index_names: ["i", "j", "k", "l", "m", "n"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_hierarchy_depth: 32,
            naming: NamingConfig::default(),
        }
    }
}

/// Code style for suggested local variable names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub local_prefixes: Vec<String>,
    pub local_suffixes: Vec<String>,
    /// Append a counter to suggestions that collide with a Java keyword.
    pub avoid_keywords: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            local_prefixes: Vec::new(),
            local_suffixes: Vec::new(),
            avoid_keywords: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: TemplateConfig =
            serde_json::from_str(r#"{ "index_names": ["idx"], "naming": { "local_prefixes": ["l"] } }"#)
                .unwrap();
        assert_eq!(config.index_names, vec!["idx".to_string()]);
        assert_eq!(config.iterable_type, "java.lang.Iterable");
        assert_eq!(config.naming.local_prefixes, vec!["l".to_string()]);
        assert!(config.naming.avoid_keywords);
    }
}
