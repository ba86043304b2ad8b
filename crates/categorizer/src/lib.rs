//! Rule-based topical categorization of videos.
//!
//! Pure and synchronous: no I/O, no shared state. A [`RuleTable`] is built from the
//! built-in defaults plus optional caller overrides, then applied to one video with
//! [`score_video`] or to many with [`categorize_batch`].

pub mod batch;
pub mod engine;
pub mod keywords;
pub mod rules;

pub use batch::{categorize_batch, format_duration, summarize, CategorySummary, VideoRecord};
pub use engine::{score_video, CategorizationResult, VideoMetadata, UNCATEGORIZED};
pub use keywords::extract_keywords;
pub use rules::{default_rules, merge_overrides, parse_overrides, CategoryRule, RuleTable};

/// A categorizer holding its own rule table.
#[derive(Debug, Clone)]
pub struct VideoCategorizer {
    rules: RuleTable,
}

impl Default for VideoCategorizer {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl VideoCategorizer {
    /// Defaults with `overrides` merged on top (whole-entry replace).
    pub fn with_overrides(overrides: &RuleTable) -> Self {
        Self {
            rules: merge_overrides(&default_rules(), overrides),
        }
    }

    /// Defaults with overrides parsed leniently from caller JSON. `None` keeps the defaults.
    pub fn from_custom_rules(custom_rules: Option<&serde_json::Value>) -> Self {
        match custom_rules {
            Some(value) => Self::with_overrides(&parse_overrides(value)),
            None => Self::default(),
        }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Append keywords to a category and set its weight, creating the category if needed.
    pub fn add_rule(&mut self, category: &str, keywords: &[&str], weight: f64) {
        if !self.rules.contains(category) {
            self.rules.insert(category, CategoryRule::default());
        }
        if let Some(rule) = self.rules.get_mut(category) {
            rule.keywords.extend(keywords.iter().map(|k| k.to_string()));
            rule.weight = weight;
        }
    }

    pub fn categorize(&self, meta: &VideoMetadata) -> CategorizationResult {
        score_video(meta, &self.rules)
    }

    pub fn categorize_batch(&self, videos: &[VideoRecord]) -> Vec<VideoRecord> {
        categorize_batch(videos, &self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_rule_creates_missing_category() {
        let mut categorizer = VideoCategorizer::default();
        categorizer.add_rule("Cooking", &["recipe"], 2.0);

        let rule = categorizer.rules().get("Cooking").unwrap();
        assert_eq!(rule.keywords, vec!["recipe"]);
        assert!(rule.channel_patterns.is_empty());
        assert_eq!(rule.weight, 2.0);

        let result = categorizer.categorize(&VideoMetadata::new("Easy recipe", ""));
        assert_eq!(result.category, "Cooking");
        assert_eq!(result.confidence, 0.67);
    }

    #[test]
    fn add_rule_extends_existing_category() {
        let mut categorizer = VideoCategorizer::default();
        categorizer.add_rule("Tech", &["rust"], 1.5);

        let tech = categorizer.rules().get("Tech").unwrap();
        assert_eq!(tech.keywords.len(), 8);
        assert_eq!(tech.keywords.last().map(String::as_str), Some("rust"));
        assert_eq!(tech.channel_patterns.len(), 4);
        assert_eq!(tech.weight, 1.5);
    }

    #[test]
    fn custom_rules_replace_defaults() {
        let custom = json!({"Education": {"keywords": ["lecture"]}});
        let categorizer = VideoCategorizer::from_custom_rules(Some(&custom));

        let result = categorizer.categorize(&VideoMetadata::new("Python tutorial", ""));
        assert_eq!(result.scores["Education"], 0.0);
        assert_eq!(result.category, "Tech");
    }

    #[test]
    fn no_custom_rules_uses_defaults() {
        let categorizer = VideoCategorizer::from_custom_rules(None);
        assert_eq!(categorizer.rules(), &default_rules());
    }
}
