/// Rule table for video categorization.
///
/// A `RuleTable` maps a category name to the signals that vote for it: keywords searched
/// anywhere in the video text, channel-name substrings, and a category-level weight.
/// Iteration order is insertion order. Scoring walks the table in that order, so it is
/// also the tie-break order when two categories reach the same score.
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Weight applied when a rule does not specify a usable one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Signals and weight for a single category.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct CategoryRule {
    /// Substrings matched (case-insensitively) against title + channel + description.
    pub keywords: Vec<String>,
    /// Substrings matched (case-insensitively) against the channel name only.
    #[serde(rename = "channels")]
    pub channel_patterns: Vec<String>,
    /// Multiplier applied to every match in this category.
    pub weight: f64,
}

impl CategoryRule {
    pub fn new(keywords: &[&str], channel_patterns: &[&str], weight: f64) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            channel_patterns: channel_patterns.iter().map(|c| c.to_string()).collect(),
            weight,
        }
    }
}

impl Default for CategoryRule {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            channel_patterns: Vec::new(),
            weight: DEFAULT_WEIGHT,
        }
    }
}

/// Ordered mapping from category name to its rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct RuleTable {
    rules: IndexMap<String, CategoryRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a category. A replaced category keeps its original position.
    pub fn insert(&mut self, category: impl Into<String>, rule: CategoryRule) -> Option<CategoryRule> {
        self.rules.insert(category.into(), rule)
    }

    pub fn get(&self, category: &str) -> Option<&CategoryRule> {
        self.rules.get(category)
    }

    pub fn get_mut(&mut self, category: &str) -> Option<&mut CategoryRule> {
        self.rules.get_mut(category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.rules.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl FromIterator<(String, CategoryRule)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (String, CategoryRule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// The built-in rule set.
///
/// Returns a freshly built table on every call, so callers may mutate their copy freely.
pub fn default_rules() -> RuleTable {
    let mut rules = RuleTable::new();
    rules.insert(
        "Education",
        CategoryRule::new(
            &["tutorial", "how to", "learn", "course", "lesson", "guide", "explained"],
            &["khan academy", "coursera", "udemy", "edx"],
            1.0,
        ),
    );
    rules.insert(
        "Tech",
        CategoryRule::new(
            &["programming", "coding", "software", "tech", "development", "javascript", "python"],
            &["tech lead", "fireship", "traversy media", "the coding train"],
            1.0,
        ),
    );
    rules.insert(
        "Entertainment",
        CategoryRule::new(
            &["funny", "comedy", "gaming", "vlog", "entertainment", "reaction"],
            &["pewdiepie", "markiplier", "jacksepticeye"],
            0.8,
        ),
    );
    rules.insert(
        "Productivity",
        CategoryRule::new(
            &["productivity", "business", "entrepreneur", "success", "self improvement"],
            &["thomas frank", "matt d'avella"],
            0.9,
        ),
    );
    rules.insert(
        "Conference",
        CategoryRule::new(
            &["conference", "talk", "presentation", "keynote", "summit"],
            &["google developers", "microsoft developer"],
            1.2,
        ),
    );
    rules
}

/// Merge caller overrides into a base table.
///
/// Whole-entry replace, not a field merge: a category present in `overrides` takes the
/// override's rule exactly as given, even if that leaves it with fewer keywords than the
/// base entry. Categories only in `base` are kept; categories only in `overrides` are
/// appended in the overrides' order.
pub fn merge_overrides(base: &RuleTable, overrides: &RuleTable) -> RuleTable {
    let mut merged = base.clone();
    for (name, rule) in overrides.iter() {
        merged.insert(name, rule.clone());
    }
    merged
}

/// Build a rule table from caller-supplied JSON, tolerating malformed input.
///
/// Expected shape: `{"Category": {"keywords": [..], "channels": [..], "weight": n}}`.
/// `channel_patterns` is accepted as an alias for `channels`. Field-level defaults:
/// - a missing or non-list `keywords`/`channels` becomes an empty list
/// - non-string or empty list items are dropped
/// - a missing, non-numeric, non-finite or non-positive `weight` becomes 1.0
/// - an entry that is not an object becomes an empty rule with weight 1.0
///
/// A top-level value that is not an object yields an empty table.
pub fn parse_overrides(value: &Value) -> RuleTable {
    let Some(entries) = value.as_object() else {
        if !value.is_null() {
            warn!("custom rules are not a JSON object, ignoring");
        }
        return RuleTable::new();
    };

    entries
        .iter()
        .map(|(name, entry)| (name.clone(), parse_rule(name, entry)))
        .collect()
}

fn parse_rule(name: &str, entry: &Value) -> CategoryRule {
    let Some(fields) = entry.as_object() else {
        warn!(category = name, "custom rule is not an object, using defaults");
        return CategoryRule::default();
    };

    let keywords = string_list(fields.get("keywords"));
    let channel_patterns = string_list(fields.get("channels").or_else(|| fields.get("channel_patterns")));
    let weight = match fields.get("weight").and_then(Value::as_f64) {
        Some(w) if w.is_finite() && w > 0.0 => w,
        Some(w) => {
            warn!(category = name, weight = w, "custom rule weight out of range, using 1.0");
            DEFAULT_WEIGHT
        }
        None => DEFAULT_WEIGHT,
    };

    CategoryRule {
        keywords,
        channel_patterns,
        weight,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Human-readable descriptions of every category the service knows about, including the
/// duration-based `Short` and `Long` categories that callers enable through overrides.
pub const CATEGORY_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Education", "Tutorials, courses, how-to videos"),
    ("Tech", "Programming, software reviews, tech news"),
    ("Entertainment", "Gaming, comedy, vlogs"),
    ("Productivity", "Business, self-improvement, life hacks"),
    ("Conference", "Talks, presentations, lectures"),
    ("Short", "Videos under 10 minutes"),
    ("Long", "Videos over 1 hour"),
];
