//! Multi-step store flows that go beyond plain list/create/delete.
//!
//! These sit between the generic driver and the pages: the daily check-in
//! upsert, the canonical-reflection save, lazy profile creation, and the
//! profile's summary counts.

use sync::{Entity, EntityStore, Query, StoreError, UserId};
use uuid::Uuid;

use crate::api::ReflectionPatch;
use crate::models::{
    Appointment, DailyCheckIn, Goal, SessionReflection, Topic, UserProfile,
};

/// Save today's check-in; a second submission on the same calendar day
/// updates the existing row instead of duplicating it.
pub async fn submit_daily_check_in<S: EntityStore>(
    store: &S,
    check_in: &DailyCheckIn,
) -> Result<DailyCheckIn, StoreError> {
    store
        .upsert(check_in, DailyCheckIn::CONFLICT_COLUMNS)
        .await
}

/// Save a reflection.
///
/// Appointment-linked reflections are canonical per appointment: look up the
/// existing row by `appointment_id` and update it, otherwise create. Ad-hoc
/// reflections have no conflict key and accumulate, one row per save.
pub async fn save_reflection<S: EntityStore>(
    store: &S,
    reflection: &SessionReflection,
) -> Result<SessionReflection, StoreError> {
    let Some(appointment_id) = reflection.appointment_id else {
        return store.create(reflection).await;
    };

    let existing: Vec<SessionReflection> = store
        .list(
            &Query::owned_by(reflection.owner())
                .and_eq("appointment_id", appointment_id)
                .limit(1),
        )
        .await?;

    match existing.first() {
        Some(canonical) => {
            let patch = ReflectionPatch {
                feeling: Some(reflection.feeling.clone()),
                takeaways: Some(reflection.takeaways.clone()),
                topics_discussed: Some(reflection.topics_discussed.clone()),
                progress: Some(reflection.progress.clone()),
            };
            store.update::<SessionReflection>(canonical.id, &patch).await
        }
        None => store.create(reflection).await,
    }
}

/// The appointment a linked reflection belongs to, for rendering the
/// session's date, status, and notes next to the form.
pub async fn find_appointment<S: EntityStore>(
    store: &S,
    owner: &UserId,
    appointment_id: Uuid,
) -> Result<Option<Appointment>, StoreError> {
    let rows: Vec<Appointment> = store
        .list(&Query::owned_by(owner).and_eq("id", appointment_id).limit(1))
        .await?;
    Ok(rows.into_iter().next())
}

/// The canonical reflection for an appointment, if one was written.
pub async fn find_reflection<S: EntityStore>(
    store: &S,
    owner: &UserId,
    appointment_id: Uuid,
) -> Result<Option<SessionReflection>, StoreError> {
    let rows: Vec<SessionReflection> = store
        .list(
            &Query::owned_by(owner)
                .and_eq("appointment_id", appointment_id)
                .limit(1),
        )
        .await?;
    Ok(rows.into_iter().next())
}

/// Fetch the user's profile, creating it on first view.
///
/// The default display name is the local part of the email, as the original
/// profile screen seeded it.
pub async fn ensure_profile<S: EntityStore>(
    store: &S,
    owner: &UserId,
    email: Option<&str>,
) -> Result<UserProfile, StoreError> {
    let existing: Vec<UserProfile> = store.list(&Query::owned_by(owner).limit(1)).await?;
    if let Some(profile) = existing.into_iter().next() {
        return Ok(profile);
    }

    let display_name = email
        .and_then(|address| address.split('@').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("User")
        .to_owned();
    store
        .create(&UserProfile::new(owner.clone(), display_name))
        .await
}

/// "Your journey in numbers" on the profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JourneyStats {
    pub sessions_completed: u64,
    pub topics_discussed: u64,
    pub goals_achieved: u64,
    pub check_ins_logged: u64,
}

pub async fn journey_stats<S: EntityStore>(
    store: &S,
    owner: &UserId,
) -> Result<JourneyStats, StoreError> {
    let sessions_completed = store
        .count::<Appointment>(&Query::owned_by(owner).and_eq("status", "completed"))
        .await?;
    let topics_discussed = store
        .count::<Topic>(&Query::owned_by(owner).and_eq("is_completed", true))
        .await?;
    let goals_achieved = store
        .count::<Goal>(&Query::owned_by(owner).and_eq("is_completed", true))
        .await?;
    let check_ins_logged = store
        .count::<DailyCheckIn>(&Query::owned_by(owner))
        .await?;

    Ok(JourneyStats {
        sessions_completed,
        topics_discussed,
        goals_achieved,
        check_ins_logged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, Completion, Priority};
    use chrono::{NaiveDate, Utc};
    use sync::memory::MemoryStore;
    use uuid::Uuid;

    fn owner() -> UserId {
        UserId::from("user-1")
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn second_check_in_on_the_same_day_replaces_the_first() {
        let store = MemoryStore::new();
        let first = DailyCheckIn::for_day(owner(), day(), "anxious".into(), "work".into());
        submit_daily_check_in(&store, &first).await.unwrap();

        let mut second = DailyCheckIn::for_day(owner(), day(), "calmer".into(), "rest".into());
        second.notes = Some("afternoon walk helped".into());
        let saved = submit_daily_check_in(&store, &second).await.unwrap();

        // Still one row for the day, with the first submission's identity.
        assert_eq!(store.table_len::<DailyCheckIn>(), 1);
        assert_eq!(saved.id, first.id);
        assert_eq!(saved.mood, "calmer");
        assert_eq!(saved.notes.as_deref(), Some("afternoon walk helped"));
    }

    #[tokio::test]
    async fn check_ins_on_different_days_both_persist() {
        let store = MemoryStore::new();
        let monday = DailyCheckIn::for_day(owner(), day(), "ok".into(), "sleep".into());
        let tuesday = DailyCheckIn::for_day(
            owner(),
            day().succ_opt().unwrap(),
            "better".into(),
            "sleep".into(),
        );
        submit_daily_check_in(&store, &monday).await.unwrap();
        submit_daily_check_in(&store, &tuesday).await.unwrap();

        assert_eq!(store.table_len::<DailyCheckIn>(), 2);
    }

    #[tokio::test]
    async fn appointment_reflection_stays_canonical() {
        let store = MemoryStore::new();
        let appointment_id = Uuid::new_v4();

        let mut first = SessionReflection::new(owner(), Some(appointment_id));
        first.feeling = "nervous going in".into();
        save_reflection(&store, &first).await.unwrap();

        let mut revised = SessionReflection::new(owner(), Some(appointment_id));
        revised.feeling = "relieved afterwards".into();
        revised.takeaways = "name the feeling sooner".into();
        let saved = save_reflection(&store, &revised).await.unwrap();

        assert_eq!(store.table_len::<SessionReflection>(), 1);
        assert_eq!(saved.id, first.id);
        assert_eq!(saved.feeling, "relieved afterwards");

        let found = find_reflection(&store, &owner(), appointment_id)
            .await
            .unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn find_appointment_is_scoped_to_the_owner() {
        let store = MemoryStore::new();
        let mine = crate::models::Appointment::schedule(owner(), Utc::now(), Some("billing".into()));
        store.create(&mine).await.unwrap();
        let theirs =
            crate::models::Appointment::schedule(UserId::from("user-2"), Utc::now(), None);
        store.create(&theirs).await.unwrap();

        let found = find_appointment(&store, &owner(), mine.id).await.unwrap();
        assert_eq!(found, Some(mine));

        // Another user's appointment is invisible even with its id in hand.
        let hidden = find_appointment(&store, &owner(), theirs.id).await.unwrap();
        assert_eq!(hidden, None);
    }

    #[tokio::test]
    async fn ad_hoc_reflections_accumulate() {
        let store = MemoryStore::new();
        for feeling in ["monday", "wednesday"] {
            let mut reflection = SessionReflection::new(owner(), None);
            reflection.feeling = feeling.into();
            save_reflection(&store, &reflection).await.unwrap();
        }
        assert_eq!(store.table_len::<SessionReflection>(), 2);
    }

    #[tokio::test]
    async fn ensure_profile_creates_once_and_seeds_from_email() {
        let store = MemoryStore::new();
        let profile = ensure_profile(&store, &owner(), Some("sam@example.com"))
            .await
            .unwrap();
        assert_eq!(profile.display_name, "sam");

        let again = ensure_profile(&store, &owner(), Some("sam@example.com"))
            .await
            .unwrap();
        assert_eq!(again.id, profile.id);
        assert_eq!(store.table_len::<UserProfile>(), 1);
    }

    #[tokio::test]
    async fn ensure_profile_without_email_uses_a_fallback_name() {
        let store = MemoryStore::new();
        let profile = ensure_profile(&store, &owner(), None).await.unwrap();
        assert_eq!(profile.display_name, "User");
    }

    #[tokio::test]
    async fn journey_stats_count_only_finished_work() {
        let store = MemoryStore::new();

        let mut done = crate::models::Appointment::schedule(owner(), Utc::now(), None);
        done.status = AppointmentStatus::Completed;
        store.create(&done).await.unwrap();
        store
            .create(&crate::models::Appointment::schedule(owner(), Utc::now(), None))
            .await
            .unwrap();

        let mut topic = Topic::new(owner(), "sleep".into(), Priority::Medium);
        topic.is_completed = Completion(true);
        store.create(&topic).await.unwrap();
        store
            .create(&Topic::new(owner(), "open".into(), Priority::Low))
            .await
            .unwrap();

        store
            .create(&Goal::new(owner(), "in progress".into(), 10))
            .await
            .unwrap();

        let check_in = DailyCheckIn::for_day(owner(), day(), "ok".into(), "rest".into());
        store.create(&check_in).await.unwrap();

        let stats = journey_stats(&store, &owner()).await.unwrap();
        assert_eq!(
            stats,
            JourneyStats {
                sessions_completed: 1,
                topics_discussed: 1,
                goals_achieved: 0,
                check_ins_logged: 1,
            }
        );
    }
}
