use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sync::views;
use sync::{Entity, Immutable, UserId};
use uuid::Uuid;

use crate::api::{AppointmentPatch, GoalPatch, ProfilePatch, ReflectionPatch, TopicPatch};

/// Priority of a discussion topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Status of a therapy appointment.
///
/// Starts at `Scheduled`; the UI only ever moves it forward to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// Completion flag with a forgiving storage representation.
///
/// Older revisions of the data wrote this as a literal boolean, as `0`/`1`
/// integers, and as `"0"`/`"1"` strings. All of those deserialize; we always
/// serialize back as a plain boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion(pub bool);

impl Completion {
    pub fn is_set(self) -> bool {
        self.0
    }

    pub fn flipped(self) -> Self {
        Self(!self.0)
    }
}

impl From<bool> for Completion {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl Serialize for Completion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.0)
    }
}

impl<'de> Deserialize<'de> for Completion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagVisitor;

        impl serde::de::Visitor<'_> for FlagVisitor {
            type Value = Completion;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a boolean, 0/1 integer, or \"0\"/\"1\" string")
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Completion(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Completion(v > 0))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Completion(v > 0))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                match v {
                    "1" | "true" => Ok(Completion(true)),
                    "0" | "false" | "" => Ok(Completion(false)),
                    other => Err(E::invalid_value(serde::de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}

/// A therapy session appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: UserId,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn schedule(owner: UserId, date: DateTime<Utc>, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            date,
            status: AppointmentStatus::Scheduled,
            notes,
        }
    }

    /// Appointments still waiting to happen; everything else is "past".
    pub fn is_upcoming(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

impl Entity for Appointment {
    type Patch = AppointmentPatch;
    const TABLE: &'static str = "appointments";
    const ORDER_COLUMN: &'static str = "date";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }
}

/// Pre/post-session reflection.
///
/// `appointment_id` is a weak back-reference: deleting the appointment does
/// not remove the reflection. `None` marks an ad-hoc reflection written
/// outside any session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReflection {
    pub id: Uuid,
    pub user_id: UserId,
    pub appointment_id: Option<Uuid>,
    pub feeling: String,
    pub takeaways: String,
    pub topics_discussed: String,
    pub progress: String,
    pub created_at: DateTime<Utc>,
}

impl SessionReflection {
    pub fn new(owner: UserId, appointment_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            appointment_id,
            feeling: String::new(),
            takeaways: String::new(),
            topics_discussed: String::new(),
            progress: String::new(),
            created_at: Utc::now(),
        }
    }
}

impl Entity for SessionReflection {
    type Patch = ReflectionPatch;
    const TABLE: &'static str = "session_reflections";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }
}

/// One mood check-in per user and calendar day.
///
/// Uniqueness is enforced by upserting on `(user_id, date)`; the record is
/// never partially patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCheckIn {
    pub id: Uuid,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub mood: String,
    pub focus: String,
    pub energy: Option<u8>,
    pub stress: Option<u8>,
    pub notes: Option<String>,
}

impl DailyCheckIn {
    pub const CONFLICT_COLUMNS: &'static [&'static str] = &["user_id", "date"];

    pub fn for_day(owner: UserId, date: NaiveDate, mood: String, focus: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            date,
            mood,
            focus,
            energy: None,
            stress: None,
            notes: None,
        }
    }
}

impl Entity for DailyCheckIn {
    type Patch = Immutable;
    const TABLE: &'static str = "daily_checkins";
    const ORDER_COLUMN: &'static str = "date";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }
}

/// Something to bring up in the next session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub priority: Priority,
    pub is_completed: Completion,
    pub created_at: DateTime<Utc>,
}

impl Topic {
    pub fn new(owner: UserId, title: String, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title,
            priority,
            is_completed: Completion(false),
            created_at: Utc::now(),
        }
    }
}

impl Entity for Topic {
    type Patch = TopicPatch;
    const TABLE: &'static str = "topics";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }
}

/// Clamped progress produced by stepping a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalProgress {
    pub current_progress: i32,
    pub is_completed: Completion,
}

/// A therapy goal with step-counted progress.
///
/// `current_progress` always stays inside `[0, target_progress]`, and
/// `is_completed` is derived from reaching the target; it is stored
/// redundantly but never set on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub target_progress: i32,
    pub current_progress: i32,
    pub is_completed: Completion,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub const DEFAULT_TARGET: i32 = 100;

    pub fn new(owner: UserId, title: String, target_progress: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title,
            target_progress: target_progress.max(1),
            current_progress: 0,
            is_completed: Completion(false),
            created_at: Utc::now(),
        }
    }

    /// Progress after moving by `delta`, clamped into the valid range.
    pub fn stepped(&self, delta: i32) -> GoalProgress {
        let current = (self.current_progress + delta).clamp(0, self.target_progress);
        GoalProgress {
            current_progress: current,
            is_completed: Completion(current >= self.target_progress),
        }
    }

    /// Whether applying `next` completes a goal that was not completed yet.
    pub fn newly_achieved(&self, next: GoalProgress) -> bool {
        !self.is_completed.is_set() && next.is_completed.is_set()
    }

    pub fn percent(&self) -> Option<f64> {
        views::progress_percent(self.current_progress, self.target_progress)
    }
}

impl Entity for Goal {
    type Patch = GoalPatch;
    const TABLE: &'static str = "goals";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }
}

/// Free-form journal entry; create and delete only, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub content: String,
    pub prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(owner: UserId, content: String, prompt: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            content,
            prompt,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive substring search over the entry text and the
    /// prompt it answered.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.content.to_lowercase().contains(&needle)
            || self
                .prompt
                .as_ref()
                .is_some_and(|prompt| prompt.to_lowercase().contains(&needle))
    }
}

impl Entity for JournalEntry {
    type Patch = Immutable;
    const TABLE: &'static str = "journal_entries";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }
}

/// Per-user profile, created lazily on first profile view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: UserId,
    pub display_name: String,
    pub therapist_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub const CONFLICT_COLUMNS: &'static [&'static str] = &["user_id"];

    pub fn new(owner: UserId, display_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            display_name,
            therapist_name: None,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }
}

impl Entity for UserProfile {
    type Patch = ProfilePatch;
    const TABLE: &'static str = "user_profiles";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync::views::split_by_flag;

    fn owner() -> UserId {
        UserId::from("user-1")
    }

    #[test]
    fn completion_deserializes_every_observed_representation() {
        for (raw, expected) in [
            ("true", true),
            ("false", false),
            ("1", true),
            ("0", false),
            ("\"1\"", true),
            ("\"0\"", false),
            ("\"true\"", true),
        ] {
            let flag: Completion = serde_json::from_str(raw).unwrap();
            assert_eq!(flag.is_set(), expected, "raw {raw}");
        }
    }

    #[test]
    fn completion_always_serializes_as_bool() {
        assert_eq!(serde_json::to_string(&Completion(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&Completion(false)).unwrap(), "false");
    }

    #[test]
    fn goal_steps_clamp_and_derive_completion() {
        let mut goal = Goal::new(owner(), "boundaries".into(), 100);

        for _ in 0..3 {
            let next = goal.stepped(30);
            goal.current_progress = next.current_progress;
            goal.is_completed = next.is_completed;
        }
        assert_eq!(goal.current_progress, 90);
        assert!(!goal.is_completed.is_set());

        let next = goal.stepped(30);
        assert!(goal.newly_achieved(next));
        goal.current_progress = next.current_progress;
        goal.is_completed = next.is_completed;
        assert_eq!(goal.current_progress, 100);
        assert!(goal.is_completed.is_set());
    }

    #[test]
    fn goal_never_steps_below_zero() {
        let goal = Goal::new(owner(), "g".into(), 10);
        let next = goal.stepped(-5);
        assert_eq!(next.current_progress, 0);
        assert!(!next.is_completed.is_set());
    }

    #[test]
    fn goal_target_is_at_least_one() {
        let goal = Goal::new(owner(), "g".into(), 0);
        assert_eq!(goal.target_progress, 1);
        assert!(goal.percent().is_some());
    }

    #[test]
    fn completing_an_appointment_moves_it_to_past() {
        let mut appointment =
            Appointment::schedule(owner(), Utc::now(), Some("focus topics".into()));
        let before = appointment.clone();
        assert!(appointment.is_upcoming());

        appointment.status = AppointmentStatus::Completed;
        assert!(!appointment.is_upcoming());

        // Nothing but the status changed.
        assert_eq!(appointment.id, before.id);
        assert_eq!(appointment.date, before.date);
        assert_eq!(appointment.notes, before.notes);
    }

    #[test]
    fn topics_partition_by_completion() {
        let mut done = Topic::new(owner(), "done".into(), Priority::Low);
        done.is_completed = Completion(true);
        let open = Topic::new(owner(), "open".into(), Priority::High);
        let topics = vec![open.clone(), done.clone()];

        let (active, completed) = split_by_flag(&topics, |t| t.is_completed.is_set());
        assert_eq!(active, vec![&open]);
        assert_eq!(completed, vec![&done]);
    }

    #[test]
    fn journal_search_covers_content_and_prompt() {
        let entry = JournalEntry::new(
            owner(),
            "slept better after the walk".into(),
            Some("What restored your energy today?".into()),
        );

        assert!(entry.matches(""));
        assert!(entry.matches("SLEPT"));
        assert!(entry.matches("restored your energy"));
        assert!(!entry.matches("boundaries"));

        let promptless = JournalEntry::new(owner(), "free writing".into(), None);
        assert!(promptless.matches("free"));
        assert!(!promptless.matches("energy"));
    }

    #[test]
    fn priority_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let status: AppointmentStatus = serde_json::from_str("\"scheduled\"").unwrap();
        assert_eq!(status, AppointmentStatus::Scheduled);
    }
}
