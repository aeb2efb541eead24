use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{AppointmentStatus, Completion, GoalProgress, Priority, SessionReflection};

// ============================================================================
// Drafts
// ============================================================================
//
// Form drafts are validated before any remote call; a validation failure
// never reaches the network (it surfaces inline and the draft stays put).

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCheckIn {
    #[validate(length(min = 1, max = 200, message = "how are you feeling today?"))]
    pub mood: String,

    #[validate(length(min = 1, max = 200, message = "what are you focusing on?"))]
    pub focus: String,

    #[validate(range(min = 0, max = 10))]
    pub energy: Option<u8>,

    #[validate(range(min = 0, max = 10))]
    pub stress: Option<u8>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl NewCheckIn {
    /// Where an untouched 0..=10 slider renders.
    pub const MID_SCALE: u8 = 5;
}

impl Default for NewCheckIn {
    /// Starts at the scale midpoints so the sliders submit exactly what
    /// they display.
    fn default() -> Self {
        Self {
            mood: String::new(),
            focus: String::new(),
            energy: Some(Self::MID_SCALE),
            stress: Some(Self::MID_SCALE),
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewAppointment {
    /// Calendar date, `YYYY-MM-DD`.
    #[validate(length(min = 1, message = "please select a date"))]
    pub date: String,

    /// Wall-clock time, `HH:MM`.
    #[validate(length(min = 1, message = "please select a time"))]
    pub time: String,

    #[validate(length(max = 2000))]
    pub notes: String,
}

impl NewAppointment {
    /// The entered local wall-clock moment, as UTC.
    pub fn moment_utc(&self) -> Option<DateTime<Utc>> {
        let naive = NaiveDateTime::parse_from_str(
            &format!("{}T{}:00", self.date, self.time),
            "%Y-%m-%dT%H:%M:%S",
        )
        .ok()?;
        let local = Local.from_local_datetime(&naive).earliest()?;
        Some(local.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewTopic {
    #[validate(length(min = 1, max = 200, message = "what's on your mind?"))]
    pub title: String,

    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewGoal {
    #[validate(length(min = 1, max = 200, message = "give the goal a title"))]
    pub title: String,

    #[validate(range(min = 1, max = 10_000, message = "target must be a positive step count"))]
    pub target_progress: i32,
}

impl Default for NewGoal {
    fn default() -> Self {
        Self {
            title: String::new(),
            target_progress: crate::models::Goal::DEFAULT_TARGET,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewJournalEntry {
    #[validate(length(min = 1, max = 20_000, message = "write something first"))]
    pub content: String,

    #[validate(length(max = 500))]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "reflection_has_content"))]
pub struct ReflectionDraft {
    #[validate(length(max = 5000))]
    pub feeling: String,

    #[validate(length(max = 5000))]
    pub takeaways: String,

    #[validate(length(max = 5000))]
    pub topics_discussed: String,

    #[validate(length(max = 5000))]
    pub progress: String,
}

fn reflection_has_content(draft: &ReflectionDraft) -> Result<(), ValidationError> {
    let all_blank = [
        &draft.feeling,
        &draft.takeaways,
        &draft.topics_discussed,
        &draft.progress,
    ]
    .iter()
    .all(|field| field.trim().is_empty());
    if all_blank {
        return Err(ValidationError::new("empty_reflection"));
    }
    Ok(())
}

impl ReflectionDraft {
    pub fn from_reflection(reflection: &SessionReflection) -> Self {
        Self {
            feeling: reflection.feeling.clone(),
            takeaways: reflection.takeaways.clone(),
            topics_discussed: reflection.topics_discussed.clone(),
            progress: reflection.progress.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileDraft {
    #[validate(length(min = 1, max = 100, message = "display name cannot be empty"))]
    pub display_name: String,

    #[validate(length(max = 200))]
    pub therapist_name: String,

    #[validate(url(message = "avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

// ============================================================================
// Patches
// ============================================================================
//
// Partial-update payloads; unset fields are omitted from the wire entirely.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl AppointmentPatch {
    /// The one-way `scheduled → completed` transition.
    pub fn mark_completed() -> Self {
        Self {
            status: Some(AppointmentStatus::Completed),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<Completion>,
}

impl TopicPatch {
    pub fn set_completed(flag: Completion) -> Self {
        Self {
            is_completed: Some(flag),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_progress: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<Completion>,
}

impl GoalPatch {
    /// Progress and its derived completion always travel together.
    pub fn from_progress(progress: GoalProgress) -> Self {
        Self {
            title: None,
            current_progress: Some(progress.current_progress),
            is_completed: Some(progress.is_completed),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReflectionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feeling: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub takeaways: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics_discussed: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

impl From<&ReflectionDraft> for ReflectionPatch {
    fn from(draft: &ReflectionDraft) -> Self {
        Self {
            feeling: Some(draft.feeling.clone()),
            takeaways: Some(draft.takeaways.clone()),
            topics_discussed: Some(draft.topics_discussed.clone()),
            progress: Some(draft.progress.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub therapist_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_check_in_fields_fail_validation() {
        let draft = NewCheckIn {
            mood: String::new(),
            focus: "breathing".into(),
            ..NewCheckIn::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn check_in_scales_are_bounded() {
        let draft = NewCheckIn {
            mood: "calm".into(),
            focus: "work".into(),
            energy: Some(11),
            ..NewCheckIn::default()
        };
        assert!(draft.validate().is_err());

        let draft = NewCheckIn {
            mood: "calm".into(),
            focus: "work".into(),
            energy: Some(10),
            stress: Some(0),
            ..NewCheckIn::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn default_check_in_scales_match_the_rendered_midpoint() {
        let draft = NewCheckIn::default();
        assert_eq!(draft.energy, Some(NewCheckIn::MID_SCALE));
        assert_eq!(draft.stress, Some(NewCheckIn::MID_SCALE));
    }

    #[test]
    fn goal_target_must_be_positive() {
        let draft = NewGoal {
            title: "boundaries".into(),
            target_progress: 0,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn appointment_needs_both_date_and_time() {
        let draft = NewAppointment {
            date: "2024-06-01".into(),
            time: String::new(),
            notes: String::new(),
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn appointment_moment_parses_the_entered_wall_time() {
        let draft = NewAppointment {
            date: "2024-06-01".into(),
            time: "14:30".into(),
            notes: String::new(),
        };
        assert!(draft.validate().is_ok());
        assert!(draft.moment_utc().is_some());

        let bad = NewAppointment {
            date: "junk".into(),
            time: "14:30".into(),
            notes: String::new(),
        };
        assert!(bad.moment_utc().is_none());
    }

    #[test]
    fn fully_blank_reflection_is_rejected() {
        assert!(ReflectionDraft::default().validate().is_err());

        let draft = ReflectionDraft {
            feeling: "lighter than last week".into(),
            ..ReflectionDraft::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn patches_omit_unset_fields() {
        let patch = AppointmentPatch::mark_completed();
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "completed" }));

        let patch = TopicPatch::set_completed(Completion(true));
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "is_completed": true }));
    }

    #[test]
    fn progress_patch_carries_the_derived_flag() {
        let patch = GoalPatch::from_progress(GoalProgress {
            current_progress: 100,
            is_completed: Completion(true),
        });
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "current_progress": 100, "is_completed": true })
        );
    }
}
