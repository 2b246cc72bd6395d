//! # Category Types
//!
//! The platform returns a category tree whose names are either a plain string
//! or a list of per-locale values.

use serde::{Deserialize, Serialize};

/// One translation of a display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedValue {
    pub locale: String,
    pub value: String,
}

/// A display name that may carry several translations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedName {
    Plain(String),
    Localized(Vec<LocalizedValue>),
}

impl LocalizedName {
    /// Resolve the name for a language tag such as `en-US`.
    ///
    /// Matches the full locale first, then the primary subtag (`en`), then
    /// falls back to the first non-empty translation.
    pub fn resolve(&self, lang: &str) -> &str {
        match self {
            LocalizedName::Plain(name) => name,
            LocalizedName::Localized(values) => {
                let primary = lang.split(['-', '_']).next().unwrap_or(lang);
                values
                    .iter()
                    .find(|v| v.locale.eq_ignore_ascii_case(lang))
                    .or_else(|| {
                        values.iter().find(|v| {
                            v.locale
                                .split(['-', '_'])
                                .next()
                                .is_some_and(|p| p.eq_ignore_ascii_case(primary))
                        })
                    })
                    .or_else(|| values.iter().find(|v| !v.value.is_empty()))
                    .map(|v| v.value.as_str())
                    .unwrap_or("")
            }
        }
    }
}

impl Default for LocalizedName {
    fn default() -> Self {
        LocalizedName::Plain(String::new())
    }
}

impl From<&str> for LocalizedName {
    fn from(name: &str) -> Self {
        LocalizedName::Plain(name.to_string())
    }
}

/// A node in the category tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: LocalizedName,
    /// Number of products, when the platform reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<LocalizedName>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            product_count: None,
            children: Vec::new(),
        }
    }

    /// Builder: add a child category
    pub fn with_child(mut self, child: Category) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search of this subtree
    pub fn find(&self, id: &str) -> Option<&Category> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// Find a category anywhere in a forest
pub fn find_category<'a>(roots: &'a [Category], id: &str) -> Option<&'a Category> {
    roots.iter().find_map(|c| c.find(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localized() -> LocalizedName {
        LocalizedName::Localized(vec![
            LocalizedValue {
                locale: "ru-RU".into(),
                value: "Игры".into(),
            },
            LocalizedValue {
                locale: "en-US".into(),
                value: "Games".into(),
            },
        ])
    }

    #[test]
    fn test_resolve_exact_locale() {
        assert_eq!(localized().resolve("en-US"), "Games");
        assert_eq!(localized().resolve("ru-RU"), "Игры");
    }

    #[test]
    fn test_resolve_primary_subtag() {
        assert_eq!(localized().resolve("en"), "Games");
        assert_eq!(localized().resolve("en_GB"), "Games");
    }

    #[test]
    fn test_resolve_fallback_first() {
        assert_eq!(localized().resolve("de-DE"), "Игры");
        assert_eq!(LocalizedName::from("Software").resolve("de-DE"), "Software");
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let plain: LocalizedName = serde_json::from_str(r#""Keys""#).unwrap();
        assert_eq!(plain, LocalizedName::Plain("Keys".into()));

        let multi: LocalizedName =
            serde_json::from_str(r#"[{"locale":"en-US","value":"Keys"}]"#).unwrap();
        assert_eq!(multi.resolve("en-US"), "Keys");
    }

    #[test]
    fn test_find_nested() {
        let tree = vec![
            Category::new("1", "Games").with_child(Category::new("11", "Steam")),
            Category::new("2", "Software"),
        ];
        assert_eq!(find_category(&tree, "11").map(|c| c.id.as_str()), Some("11"));
        assert!(find_category(&tree, "99").is_none());
    }
}
