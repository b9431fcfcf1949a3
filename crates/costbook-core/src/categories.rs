//! Spending category registry
//!
//! The registry is the ordered set of categories every cost must belong to and
//! every monthly report must enumerate. It is built from configuration and
//! handed to whoever needs it; there is no process-wide category list.

use crate::error::{Error, Result};

/// Categories used when no configuration overrides them
pub const DEFAULT_CATEGORIES: &[&str] = &["food", "health", "housing", "sports", "education"];

/// Ordered, duplicate-free set of lower-case category names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    names: Vec<String>,
}

impl CategoryRegistry {
    /// Build a registry, normalizing names to trimmed lower-case
    ///
    /// Order is preserved. Empty lists, blank names and duplicates
    /// (after normalization) are rejected.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            if name.is_empty() {
                return Err(Error::Config("category names must not be blank".to_string()));
            }
            if normalized.contains(&name) {
                return Err(Error::Config(format!("duplicate category: {}", name)));
            }
            normalized.push(name);
        }

        if normalized.is_empty() {
            return Err(Error::Config(
                "at least one category is required".to_string(),
            ));
        }

        Ok(Self { names: normalized })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True when `categories` lists exactly this registry, in order
    pub fn matches<'a, I>(&self, categories: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.iter().eq(categories)
    }

    /// Normalize user input and return the registry's spelling if it is a member
    pub fn normalize(&self, input: &str) -> Option<&str> {
        let wanted = input.to_lowercase();
        self.iter().find(|n| *n == wanted)
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            names: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for CategoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let registry = CategoryRegistry::default();
        let names: Vec<&str> = registry.iter().collect();
        assert_eq!(names, vec!["food", "health", "housing", "sports", "education"]);
    }

    #[test]
    fn test_new_normalizes_and_keeps_order() {
        let registry = CategoryRegistry::new([" Travel", "GIFTS", "food"]).unwrap();
        let names: Vec<&str> = registry.iter().collect();
        assert_eq!(names, vec!["travel", "gifts", "food"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = CategoryRegistry::new(["food", "Food"]).unwrap_err();
        assert!(err.to_string().contains("duplicate category"));
    }

    #[test]
    fn test_new_rejects_empty_and_blank() {
        assert!(CategoryRegistry::new(Vec::<String>::new()).is_err());
        assert!(CategoryRegistry::new(["food", "  "]).is_err());
    }

    #[test]
    fn test_normalize() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.normalize("SPORTS"), Some("sports"));
        assert_eq!(registry.normalize("sports"), Some("sports"));
        // Surrounding whitespace is not silently accepted
        assert_eq!(registry.normalize(" food "), None);
        assert_eq!(registry.normalize("travel"), None);
    }

    #[test]
    fn test_matches_requires_same_order() {
        let registry = CategoryRegistry::new(["food", "travel"]).unwrap();
        assert!(registry.matches(["food", "travel"]));
        assert!(!registry.matches(["travel", "food"]));
        assert!(!registry.matches(["food"]));
        assert!(!registry.matches(["food", "travel", "gifts"]));
    }
}
