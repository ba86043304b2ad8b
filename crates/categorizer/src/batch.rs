/// Batch categorization over open-ended video records.
///
/// A record is any JSON object. Only `title`, `channel`, `description`, `duration` and
/// `tags` are read; every other field passes through untouched.
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::engine::{round2, score_video, CategorizationResult, VideoMetadata};
use crate::rules::RuleTable;

/// A video as exchanged with callers: an arbitrary JSON object.
pub type VideoRecord = Map<String, Value>;

impl VideoMetadata {
    /// Read scoring inputs from a record, defaulting anything absent or mistyped.
    ///
    /// Duration is read from `duration`, falling back to `duration_seconds`.
    pub fn from_record(record: &VideoRecord) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let duration_seconds = record
            .get("duration")
            .and_then(Value::as_u64)
            .or_else(|| record.get("duration_seconds").and_then(Value::as_u64))
            .unwrap_or(0);
        let tags = record
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title: text("title"),
            channel: text("channel"),
            description: text("description"),
            duration_seconds,
            tags,
        }
    }
}

/// Categorize every record independently, preserving input order.
///
/// Each output record is the input record with `category`, `confidence` and `scores`
/// added; existing fields with those names are overwritten.
pub fn categorize_batch(videos: &[VideoRecord], rules: &RuleTable) -> Vec<VideoRecord> {
    let categorized: Vec<VideoRecord> = videos
        .iter()
        .map(|video| {
            let result = score_video(&VideoMetadata::from_record(video), rules);
            merge_result(video.clone(), result)
        })
        .collect();
    debug!(videos = categorized.len(), "batch categorized");
    categorized
}

fn merge_result(mut record: VideoRecord, result: CategorizationResult) -> VideoRecord {
    record.insert("category".to_string(), Value::String(result.category));
    record.insert("confidence".to_string(), Value::from(result.confidence));
    let scores: Map<String, Value> = result
        .scores
        .into_iter()
        .map(|(name, score)| (name, Value::from(score)))
        .collect();
    record.insert("scores".to_string(), Value::Object(scores));
    record
}

/// Aggregate view of one category across a categorized batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategorySummary {
    pub count: usize,
    /// Mean confidence of the category's videos, rounded to two decimals.
    pub confidence: f64,
}

/// Count videos and average confidence per category, in order of first appearance.
///
/// Records without a `category` string are skipped.
pub fn summarize(categorized: &[VideoRecord]) -> IndexMap<String, CategorySummary> {
    let mut totals: IndexMap<String, (usize, f64)> = IndexMap::new();
    for record in categorized {
        let Some(category) = record.get("category").and_then(Value::as_str) else {
            continue;
        };
        let confidence = record
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let entry = totals.entry(category.to_string()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += confidence;
    }

    totals
        .into_iter()
        .map(|(category, (count, confidence_sum))| {
            let summary = CategorySummary {
                count,
                confidence: round2(confidence_sum / count as f64),
            };
            (category, summary)
        })
        .collect()
}

/// Format seconds as `1h 23m 45s`, `4m 5s` or `9s`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::default_rules;
    use serde_json::json;

    fn record(value: Value) -> VideoRecord {
        value.as_object().cloned().expect("test record is an object")
    }

    #[test]
    fn metadata_from_record_defaults() {
        let meta = VideoMetadata::from_record(&record(json!({
            "title": "Keynote",
            "channel": 7,
            "duration": -5,
            "tags": ["a", 1, "b"]
        })));
        assert_eq!(meta.title, "Keynote");
        assert_eq!(meta.channel, "");
        assert_eq!(meta.description, "");
        assert_eq!(meta.duration_seconds, 0);
        assert_eq!(meta.tags, vec!["a", "b"]);
    }

    #[test]
    fn metadata_duration_fallback_key() {
        let meta = VideoMetadata::from_record(&record(json!({
            "title": "x", "channel": "y", "duration_seconds": 90
        })));
        assert_eq!(meta.duration_seconds, 90);
    }

    #[test]
    fn batch_preserves_order_and_matches_single_scoring() {
        let rules = default_rules();
        let videos = vec![
            record(json!({"id": "1", "title": "Python Tutorial for Beginners", "channel": "freeCodeCamp"})),
            record(json!({"id": "2", "title": "Funny cat compilation", "channel": "PewDiePie"})),
            record(json!({"id": "3", "title": "", "channel": ""})),
        ];

        let results = categorize_batch(&videos, &rules);
        assert_eq!(results.len(), 3);

        for (input, output) in videos.iter().zip(&results) {
            assert_eq!(input["id"], output["id"]);
            let expected = score_video(&VideoMetadata::from_record(input), &rules);
            assert_eq!(output["category"], json!(expected.category));
            assert_eq!(output["confidence"], json!(expected.confidence));
            assert_eq!(output["scores"], serde_json::to_value(&expected.scores).unwrap());
        }
        assert_eq!(results[1]["category"], json!("Entertainment"));
        assert_eq!(results[2]["category"], json!("Uncategorized"));
    }

    #[test]
    fn batch_overwrites_existing_result_fields() {
        let videos = vec![record(json!({
            "title": "Keynote",
            "channel": "",
            "category": "Stale",
            "confidence": 0.99,
            "note": "kept"
        }))];
        let results = categorize_batch(&videos, &default_rules());
        assert_eq!(results[0]["category"], json!("Conference"));
        assert_eq!(results[0]["confidence"], json!(0.4));
        assert_eq!(results[0]["note"], json!("kept"));
    }

    #[test]
    fn empty_batch() {
        assert!(categorize_batch(&[], &default_rules()).is_empty());
    }

    #[test]
    fn summarize_counts_and_averages() {
        let categorized = vec![
            record(json!({"category": "Tech", "confidence": 0.33})),
            record(json!({"category": "Education", "confidence": 1.0})),
            record(json!({"category": "Tech", "confidence": 0.67})),
            record(json!({"title": "no category"})),
        ];
        let summary = summarize(&categorized);
        let names: Vec<&String> = summary.keys().collect();
        assert_eq!(names, vec!["Tech", "Education"]);
        assert_eq!(summary["Tech"], CategorySummary { count: 2, confidence: 0.5 });
        assert_eq!(summary["Education"], CategorySummary { count: 1, confidence: 1.0 });
    }

    #[test]
    fn format_duration_variants() {
        assert_eq!(format_duration(5025), "1h 23m 45s");
        assert_eq!(format_duration(245), "4m 5s");
        assert_eq!(format_duration(9), "9s");
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(3600), "1h 0m 0s");
    }
}
