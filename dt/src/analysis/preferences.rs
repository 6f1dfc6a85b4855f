//! User preference extraction from free-text replies

use tracing::debug;

/// Extracts (category, value) preference pairs from user input
///
/// The session manager stores whatever comes back, overwriting any prior
/// value per category. Implementations must be pure: same input, same
/// output.
pub trait PreferenceExtractor: Send + Sync {
    fn extract(&self, input: &str) -> Vec<(String, String)>;
}

/// Fixed-table keyword matcher
///
/// Case-insensitive substring match of the input against a table of
/// known literal values per category. Within a category the last
/// matching keyword wins; categories are independent, so one reply can
/// set several at once.
pub struct KeywordPreferenceExtractor {
    table: Vec<(&'static str, Vec<&'static str>)>,
}

impl KeywordPreferenceExtractor {
    pub fn new() -> Self {
        Self {
            table: vec![
                ("python版本", vec!["python3.8", "python3.9", "python3.10", "python3.11"]),
                ("代码风格", vec!["pep8", "black", "flake8"]),
                ("测试框架", vec!["pytest", "unittest", "nose"]),
                ("包管理", vec!["pip", "poetry", "conda"]),
            ],
        }
    }
}

impl Default for KeywordPreferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceExtractor for KeywordPreferenceExtractor {
    fn extract(&self, input: &str) -> Vec<(String, String)> {
        let lowered = input.to_lowercase();
        let mut found = Vec::new();

        for (category, keywords) in &self.table {
            let mut matched = None;
            for keyword in keywords {
                if lowered.contains(&keyword.to_lowercase()) {
                    debug!(%category, %keyword, "KeywordPreferenceExtractor: matched");
                    matched = Some(*keyword);
                }
            }
            if let Some(value) = matched {
                found.push((category.to_string(), value.to_string()));
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_test_framework() {
        let extractor = KeywordPreferenceExtractor::new();
        let prefs = extractor.extract("I'd like to use pytest for testing");

        assert_eq!(prefs, vec![("测试框架".to_string(), "pytest".to_string())]);
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        let extractor = KeywordPreferenceExtractor::new();
        let prefs = extractor.extract("Please format with Black");

        assert_eq!(prefs, vec![("代码风格".to_string(), "black".to_string())]);
    }

    #[test]
    fn test_last_match_per_category_wins() {
        let extractor = KeywordPreferenceExtractor::new();
        let prefs = extractor.extract("not pytest, use unittest instead");

        // Both keywords appear; the later table entry overwrites
        assert_eq!(prefs, vec![("测试框架".to_string(), "unittest".to_string())]);
    }

    #[test]
    fn test_multiple_categories_in_one_reply() {
        let extractor = KeywordPreferenceExtractor::new();
        let prefs = extractor.extract("python3.11 with poetry please");

        assert_eq!(prefs.len(), 2);
        assert!(prefs.contains(&("python版本".to_string(), "python3.11".to_string())));
        assert!(prefs.contains(&("包管理".to_string(), "poetry".to_string())));
    }

    #[test]
    fn test_no_match_returns_empty() {
        let extractor = KeywordPreferenceExtractor::new();
        assert!(extractor.extract("just build it").is_empty());
    }
}
