/// Single-video scoring.
///
/// Every category in the rule table is scored independently:
/// - each keyword found in the lowercase haystack (`title channel description`) adds `weight`
/// - each channel pattern found in the lowercase channel name adds `weight * 1.5`
/// - `Short` gains 1.0 for videos under 10 minutes, `Long` gains 1.0 for videos over an hour
///
/// The highest score wins, with ties going to the category that comes first in the table.
/// Confidence is `min(max_score / 3.0, 1.0)` rounded to two decimals.
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rules::RuleTable;

/// Category reported when no rule produced a positive score.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A channel match counts this many times a keyword match of the same category.
pub const CHANNEL_MATCH_MULTIPLIER: f64 = 1.5;

/// Score at which confidence saturates at 1.0.
pub const CONFIDENCE_SATURATION: f64 = 3.0;

pub const SHORT_CATEGORY: &str = "Short";
pub const LONG_CATEGORY: &str = "Long";
/// `Short` applies strictly below this many seconds.
pub const SHORT_MAX_SECONDS: u64 = 600;
/// `Long` applies strictly above this many seconds.
pub const LONG_MIN_SECONDS: u64 = 3600;
const DURATION_BONUS: f64 = 1.0;

/// Metadata needed to categorize one video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetadata {
    pub title: String,
    pub channel: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_seconds: u64,
    /// Carried for callers; tags do not contribute to the score.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl VideoMetadata {
    pub fn new(title: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            channel: channel.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_duration(mut self, duration_seconds: u64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Lowercase `title channel description` used for keyword search.
    fn haystack(&self) -> String {
        format!("{} {} {}", self.title, self.channel, self.description).to_lowercase()
    }
}

/// Outcome of scoring one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategorizationResult {
    /// Winning category, or `Uncategorized`.
    pub category: String,
    /// Normalized strength of the winning score, in [0, 1].
    pub confidence: f64,
    /// Raw score of every category in the rule table, in table order.
    pub scores: IndexMap<String, f64>,
}

impl CategorizationResult {
    pub fn is_categorized(&self) -> bool {
        self.category != UNCATEGORIZED
    }
}

/// Score one video against a rule table.
pub fn score_video(meta: &VideoMetadata, rules: &RuleTable) -> CategorizationResult {
    let haystack = meta.haystack();
    let channel = meta.channel.to_lowercase();

    let mut scores: IndexMap<String, f64> = IndexMap::with_capacity(rules.len());
    for (name, rule) in rules.iter() {
        let mut score = 0.0;

        for keyword in &rule.keywords {
            if haystack.contains(&keyword.to_lowercase()) {
                score += rule.weight;
            }
        }

        for pattern in &rule.channel_patterns {
            if channel.contains(&pattern.to_lowercase()) {
                score += rule.weight * CHANNEL_MATCH_MULTIPLIER;
            }
        }

        score += duration_bonus(name, meta.duration_seconds);
        scores.insert(name.to_string(), score);
    }

    // First strict maximum in table order wins.
    let mut best: Option<(&String, f64)> = None;
    for (name, &score) in &scores {
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((name, score));
        }
    }
    let best = best.map(|(name, score)| (name.clone(), score));

    match best {
        Some((name, max_score)) if max_score > 0.0 => CategorizationResult {
            category: name,
            confidence: round2((max_score / CONFIDENCE_SATURATION).min(1.0)),
            scores,
        },
        _ => CategorizationResult {
            category: UNCATEGORIZED.to_string(),
            confidence: 0.0,
            scores,
        },
    }
}

fn duration_bonus(category: &str, duration_seconds: u64) -> f64 {
    match category {
        SHORT_CATEGORY if duration_seconds < SHORT_MAX_SECONDS => DURATION_BONUS,
        LONG_CATEGORY if duration_seconds > LONG_MIN_SECONDS => DURATION_BONUS,
        _ => 0.0,
    }
}

/// Round to two decimals using the exact decimal expansion of the value, so that
/// e.g. 0.375 rounds to 0.38 and 0.285 (stored as 0.28499..) rounds to 0.28.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{default_rules, merge_overrides, CategoryRule};

    fn single_rule_table(name: &str, rule: CategoryRule) -> RuleTable {
        let mut table = RuleTable::new();
        table.insert(name, rule);
        table
    }

    #[test]
    fn empty_metadata_is_uncategorized() {
        let result = score_video(&VideoMetadata::default(), &default_rules());
        assert_eq!(result.category, UNCATEGORIZED);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.scores.len(), 5);
        assert!(result.scores.values().all(|&s| s == 0.0));
        assert!(!result.is_categorized());
    }

    #[test]
    fn empty_rule_table_is_uncategorized() {
        let meta = VideoMetadata::new("Python tutorial", "Fireship");
        let result = score_video(&meta, &RuleTable::new());
        assert_eq!(result.category, UNCATEGORIZED);
        assert_eq!(result.confidence, 0.0);
        assert!(result.scores.is_empty());
    }

    #[test]
    fn python_tutorial_scores_education_and_tech() {
        let meta = VideoMetadata::new("Python Tutorial for Beginners", "freeCodeCamp");
        let result = score_video(&meta, &default_rules());

        assert_eq!(result.scores["Education"], 1.0);
        assert_eq!(result.scores["Tech"], 1.0);
        // tie goes to the category listed first
        assert_eq!(result.category, "Education");
        assert_eq!(result.confidence, 0.33);
    }

    #[test]
    fn channel_match_weighs_one_and_a_half_keywords() {
        let rules = single_rule_table("Cooking", CategoryRule::new(&["souffle"], &["babish"], 2.0));
        let meta = VideoMetadata::new("Weeknight pasta", "Binging with Babish");
        let result = score_video(&meta, &rules);
        assert_eq!(result.scores["Cooking"], 3.0);
        assert_eq!(result.category, "Cooking");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn channel_pattern_ignores_title_text() {
        let rules = single_rule_table("Cooking", CategoryRule::new(&[], &["babish"], 1.0));
        let meta = VideoMetadata::new("babish reacts", "Some Channel");
        let result = score_video(&meta, &rules);
        assert_eq!(result.scores["Cooking"], 0.0);
        assert_eq!(result.category, UNCATEGORIZED);
    }

    #[test]
    fn keyword_and_channel_matches_accumulate() {
        let meta = VideoMetadata::new("JavaScript coding in 100 seconds", "Fireship")
            .with_description("software development");
        let result = score_video(&meta, &default_rules());
        // javascript, coding, software, development + fireship channel
        assert_eq!(result.scores["Tech"], 4.0 + 1.5);
        assert_eq!(result.category, "Tech");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn keyword_matches_inside_larger_words() {
        let meta = VideoMetadata::new("Biotechnology explained", "");
        let result = score_video(&meta, &default_rules());
        // "tech" inside "biotechnology", "explained" for Education
        assert_eq!(result.scores["Tech"], 1.0);
        assert_eq!(result.scores["Education"], 1.0);
    }

    #[test]
    fn keyword_case_is_ignored() {
        let rules = single_rule_table("Tech", CategoryRule::new(&["RUST"], &["Jon"], 1.0));
        let meta = VideoMetadata::new("Crust of Rust", "Jon Gjengset");
        let result = score_video(&meta, &rules);
        assert_eq!(result.scores["Tech"], 2.5);
    }

    #[test]
    fn weighted_category_outranks_on_equal_matches() {
        let meta = VideoMetadata::new("Conference talk: funny bugs", "");
        let result = score_video(&meta, &default_rules());
        assert_eq!(result.scores["Conference"], 2.4);
        assert_eq!(result.scores["Entertainment"], 0.8);
        assert_eq!(result.category, "Conference");
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn short_category_wins_on_duration_alone() {
        let mut overrides = RuleTable::new();
        overrides.insert("Short", CategoryRule::default());
        let rules = merge_overrides(&default_rules(), &overrides);

        let meta = VideoMetadata::new("Untitled", "Nobody").with_duration(60);
        let result = score_video(&meta, &rules);
        assert_eq!(result.category, "Short");
        assert_eq!(result.scores["Short"], 1.0);
        assert_eq!(result.confidence, 0.33);
    }

    #[test]
    fn duration_bonus_boundaries() {
        assert_eq!(duration_bonus(SHORT_CATEGORY, 599), 1.0);
        assert_eq!(duration_bonus(SHORT_CATEGORY, 600), 0.0);
        assert_eq!(duration_bonus(LONG_CATEGORY, 3600), 0.0);
        assert_eq!(duration_bonus(LONG_CATEGORY, 3601), 1.0);
        assert_eq!(duration_bonus("Education", 0), 0.0);
    }

    #[test]
    fn long_category_needs_long_video() {
        let rules = single_rule_table("Long", CategoryRule::default());
        let short = score_video(&VideoMetadata::new("a", "b").with_duration(120), &rules);
        assert_eq!(short.category, UNCATEGORIZED);

        let long = score_video(&VideoMetadata::new("a", "b").with_duration(7200), &rules);
        assert_eq!(long.category, "Long");
    }

    #[test]
    fn tags_do_not_affect_score() {
        let meta = VideoMetadata::new("Untitled", "Nobody")
            .with_tags(vec!["python".to_string(), "tutorial".to_string()]);
        let result = score_video(&meta, &default_rules());
        assert_eq!(result.category, UNCATEGORIZED);
    }

    #[test]
    fn scoring_is_deterministic() {
        let meta = VideoMetadata::new("Learn python programming", "Traversy Media")
            .with_description("A course on coding");
        let rules = default_rules();
        let first = score_video(&meta, &rules);
        let second = score_video(&meta, &rules);
        assert_eq!(first, second);
        let order: Vec<&String> = first.scores.keys().collect();
        let expected: Vec<&str> = rules.names().collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn confidence_stays_in_unit_range() {
        let rules = default_rules();
        let samples = [
            VideoMetadata::new("", ""),
            VideoMetadata::new("tutorial", ""),
            VideoMetadata::new("how to learn a course lesson guide explained tutorial", "Khan Academy"),
            VideoMetadata::new("funny comedy gaming vlog", "markiplier"),
        ];
        for meta in &samples {
            let result = score_video(meta, &rules);
            let max = result.scores.values().cloned().fold(0.0, f64::max);
            assert!((0.0..=1.0).contains(&result.confidence));
            assert_eq!(result.confidence, round2((max / 3.0).min(1.0)));
        }
    }

    #[test]
    fn round2_follows_exact_decimal_value() {
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(0.9), 0.9);
    }
}
