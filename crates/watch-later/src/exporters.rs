/// Notion export and calendar scheduling.
///
/// Neither integration talks to its service yet: once the credential check passes they
/// return canned results marked `stub_implementation`. The time-slot table and
/// [`suggest_viewing_schedule`] are real and shared with the `schedule_viewing` tool.
use chrono::{Duration, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Properties a created Notion database would carry.
pub const NOTION_PROPERTIES: &[&str] = &[
    "Title",
    "Channel",
    "Duration",
    "Category",
    "Priority",
    "Status",
    "Notes",
    "Watch Date",
];

const STUB_VIDEOS_EXPORTED: usize = 224;
const MAX_STUB_EVENTS: usize = 3;
const MAX_SESSION_MINUTES: u32 = 90;
const FALLBACK_SLOT: &str = "weekend-afternoon";
const UNKNOWN_CATEGORY_PRIORITY: f64 = 0.5;

/// A recurring part of the week and the content it suits.
#[derive(Debug, Clone, Copy)]
pub struct TimeSlot {
    pub name: &'static str,
    pub description: &'static str,
    pub best_for: &'static [&'static str],
    pub energy_level: &'static str,
    /// Minutes of focused viewing the slot supports.
    pub focus_duration: u32,
}

pub static TIME_SLOTS: [TimeSlot; 5] = [
    TimeSlot {
        name: "weekday-morning",
        description: "Weekday mornings (7-9 AM)",
        best_for: &["Short", "News", "Productivity"],
        energy_level: "high",
        focus_duration: 30,
    },
    TimeSlot {
        name: "weekday-evening",
        description: "Weekday evenings (6-9 PM)",
        best_for: &["Education", "Tech", "Conference"],
        energy_level: "medium",
        focus_duration: 60,
    },
    TimeSlot {
        name: "weekend-morning",
        description: "Weekend mornings (9-12 PM)",
        best_for: &["Education", "Long", "Conference"],
        energy_level: "high",
        focus_duration: 120,
    },
    TimeSlot {
        name: "weekend-afternoon",
        description: "Weekend afternoons (2-5 PM)",
        best_for: &["Entertainment", "Tech", "Creative"],
        energy_level: "medium",
        focus_duration: 90,
    },
    TimeSlot {
        name: "weekend-evening",
        description: "Weekend evenings (7-10 PM)",
        best_for: &["Entertainment", "Documentary", "Relaxing"],
        energy_level: "low",
        focus_duration: 120,
    },
];

pub fn time_slot(name: &str) -> Option<&'static TimeSlot> {
    TIME_SLOTS.iter().find(|slot| slot.name == name)
}

/// Serializable view of a [`TimeSlot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeSlotInfo {
    pub name: String,
    pub description: String,
    pub best_for: Vec<String>,
    pub energy_level: String,
    pub focus_duration: u32,
}

impl From<&TimeSlot> for TimeSlotInfo {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            name: slot.name.to_string(),
            description: slot.description.to_string(),
            best_for: slot.best_for.iter().map(|c| c.to_string()).collect(),
            energy_level: slot.energy_level.to_string(),
            focus_duration: slot.focus_duration,
        }
    }
}

/// Details of the named slots, skipping names that are not in the table.
pub fn describe_slots(names: &[String]) -> Vec<TimeSlotInfo> {
    names
        .iter()
        .filter_map(|name| time_slot(name))
        .map(TimeSlotInfo::from)
        .collect()
}

/// The first slot suited to `category`, or the weekend afternoon when none is.
pub fn best_slot_for(category: &str) -> &'static TimeSlot {
    TIME_SLOTS
        .iter()
        .find(|slot| slot.best_for.contains(&category))
        .or_else(|| time_slot(FALLBACK_SLOT))
        .unwrap_or(&TIME_SLOTS[3])
}

/// Relative importance of a category when splitting viewing time.
pub fn category_priority(category: &str) -> f64 {
    match category {
        "Education" => 1.0,
        "Tech" => 0.9,
        "Productivity" => 0.8,
        "Conference" => 0.7,
        "Entertainment" => 0.5,
        "Short" => 0.3,
        _ => UNKNOWN_CATEGORY_PRIORITY,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScheduledBlock {
    pub category: String,
    /// Minutes allocated to the category.
    pub time_allocated: u32,
    pub recommended_slot: String,
    pub slot_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ViewingSchedule {
    pub total_time: u32,
    pub scheduled_time: u32,
    pub remaining_time: u32,
    pub schedule: Vec<ScheduledBlock>,
}

/// Split `available_minutes` across `categories` in proportion to their priority.
///
/// Categories are visited highest priority first (stable for equal priorities); each
/// allocation is truncated to whole minutes and capped by the time still remaining.
pub fn suggest_viewing_schedule(available_minutes: u32, categories: &[String]) -> ViewingSchedule {
    let total_priority: f64 = categories.iter().map(|c| category_priority(c)).sum();

    let mut ordered: Vec<&String> = categories.iter().collect();
    ordered.sort_by(|a, b| category_priority(b).total_cmp(&category_priority(a)));

    let mut remaining = available_minutes;
    let mut schedule = Vec::new();
    for category in ordered {
        if remaining == 0 {
            break;
        }
        let share = category_priority(category) / total_priority * f64::from(available_minutes);
        let allocated = (share as u32).min(remaining);
        let slot = best_slot_for(category);

        schedule.push(ScheduledBlock {
            category: category.clone(),
            time_allocated: allocated,
            recommended_slot: slot.name.to_string(),
            slot_description: slot.description.to_string(),
        });
        remaining -= allocated;
    }

    ViewingSchedule {
        total_time: available_minutes,
        scheduled_time: available_minutes - remaining,
        remaining_time: remaining,
        schedule,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalendarEvent {
    pub title: String,
    /// Local start time, `YYYY-MM-DDTHH:MM:SS`.
    pub start: String,
    /// Session length in minutes.
    pub duration: u32,
    pub videos: u32,
    pub calendar_id: String,
}

/// Placeholder sessions: one per category for the first three categories, on consecutive
/// days after `today` at 19:00.
pub fn stub_calendar_events(categories: &[String], duration_limit: u32, today: NaiveDate) -> Vec<CalendarEvent> {
    categories
        .iter()
        .take(MAX_STUB_EVENTS)
        .enumerate()
        .map(|(i, category)| {
            let day = today + Duration::days(i as i64 + 1);
            CalendarEvent {
                title: format!("{category} Videos Session"),
                start: format!("{}T19:00:00", day.format("%Y-%m-%d")),
                duration: duration_limit.min(MAX_SESSION_MINUTES),
                videos: 6 + 2 * i as u32,
                calendar_id: "primary".to_string(),
            }
        })
        .collect()
}

/// Total event time formatted as hours with one decimal, e.g. "4.5 hours".
pub fn total_time_scheduled(events: &[CalendarEvent]) -> String {
    let minutes: u32 = events.iter().map(|e| e.duration).sum();
    format!("{:.1} hours", f64::from(minutes) / 60.0)
}

/// URL the stubbed Notion export reports for `database_name`.
pub fn stub_notion_url(database_name: &str) -> String {
    format!("https://notion.so/{}-abc123", database_name.to_lowercase().replace(' ', "-"))
}

pub fn stub_videos_exported() -> usize {
    STUB_VIDEOS_EXPORTED
}
