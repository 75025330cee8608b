//! Pure sub-score calculators
//!
//! Every function here returns a value in [0, 100] and depends only on its
//! arguments. Wall-clock time enters through the `today` parameter.

use chrono::Weekday;

use crate::domains::volunteers::{AvailabilitySchedule, AvailabilityStatus};

/// Location score used when either side has no coordinate
pub const NEUTRAL_LOCATION_SCORE: f64 = 50.0;

/// Candidates below this skill score are dropped when the request lists skills
pub const MIN_SKILL_SCORE: f64 = 30.0;

pub const BUSY_SCORE: f64 = 20.0;
pub const OFF_SCHEDULE_SCORE: f64 = 50.0;

/// Completed tasks beyond this count stop adding experience
pub const EXPERIENCE_TASK_CAP: f64 = 20.0;

const MAX_RATING: f64 = 5.0;

/// Share of required skills the volunteer covers.
///
/// A required skill counts as covered when it contains, or is contained in,
/// any volunteer skill, ignoring case. A volunteer tagged "First Aid" covers a
/// required "aid", and one tagged "Aid" also covers a required "AI".
pub fn skill_score(volunteer_skills: &[String], required_skills: &[String]) -> f64 {
    if required_skills.is_empty() {
        return 100.0;
    }

    let volunteer_skills: Vec<String> = volunteer_skills.iter().map(|s| s.to_lowercase()).collect();

    let matched = required_skills
        .iter()
        .map(|skill| skill.to_lowercase())
        .filter(|required| {
            volunteer_skills
                .iter()
                .any(|have| have.contains(required.as_str()) || required.contains(have.as_str()))
        })
        .count();

    matched as f64 / required_skills.len() as f64 * 100.0
}

/// Linear falloff: 100 at the request's location, 0 at the radius edge and beyond.
///
/// Non-finite inputs score 0.
pub fn location_score(distance_km: f64, max_radius_km: f64) -> f64 {
    if !distance_km.is_finite()
        || !max_radius_km.is_finite()
        || max_radius_km <= 0.0
        || distance_km > max_radius_km
    {
        return 0.0;
    }
    ((max_radius_km - distance_km.max(0.0)) / max_radius_km * 100.0).clamp(0.0, 100.0)
}

pub fn availability_score(
    status: AvailabilityStatus,
    schedule: &AvailabilitySchedule,
    today: Weekday,
) -> f64 {
    match status {
        AvailabilityStatus::Offline => 0.0,
        AvailabilityStatus::Busy => BUSY_SCORE,
        AvailabilityStatus::Available if schedule.covers(today) => 100.0,
        AvailabilityStatus::Available => OFF_SCHEDULE_SCORE,
    }
}

/// Half from rating, half from completed tasks (capped at twenty tasks).
pub fn experience_score(rating: f64, tasks_completed: i32) -> f64 {
    let rating_part = rating.clamp(0.0, MAX_RATING) / MAX_RATING * 50.0;
    let task_part = (tasks_completed.max(0) as f64 / EXPERIENCE_TASK_CAP * 50.0).min(50.0);
    rating_part + task_part
}
