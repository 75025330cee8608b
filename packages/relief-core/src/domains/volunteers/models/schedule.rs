use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Unknown weekday code: {0:?}")]
    UnknownWeekday(String),
}

/// Days of the week a volunteer has said they can help.
///
/// An empty schedule means the volunteer set no constraint, so every day counts
/// as available. Stored as a `TEXT[]` of lowercase three-letter codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct AvailabilitySchedule {
    // bit n = Weekday with num_days_from_monday() == n
    days: u8,
}

impl AvailabilitySchedule {
    /// No constraint: available every day.
    pub const fn unconstrained() -> Self {
        Self { days: 0 }
    }

    pub fn from_days<I: IntoIterator<Item = Weekday>>(days: I) -> Self {
        let mut schedule = Self::unconstrained();
        for day in days {
            schedule.days |= bit(day);
        }
        schedule
    }

    /// Parse weekday codes such as `"mon"`, `"Tue"` or `"wednesday"`.
    pub fn parse<I, S>(codes: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut days = Vec::new();
        for code in codes {
            days.push(parse_weekday(code.as_ref())?);
        }
        Ok(Self::from_days(days))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.days == 0
    }

    /// Whether the volunteer can be counted on for `day`.
    pub fn covers(&self, day: Weekday) -> bool {
        self.is_unconstrained() || self.days & bit(day) != 0
    }

    /// Listed days in Monday-first order. Empty for an unconstrained schedule.
    pub fn days(&self) -> Vec<Weekday> {
        ALL_DAYS
            .iter()
            .copied()
            .filter(|day| self.days & bit(*day) != 0)
            .collect()
    }

    /// Storage form, e.g. `["mon", "fri"]`.
    pub fn codes(&self) -> Vec<String> {
        self.days().into_iter().map(|day| code(day).to_string()).collect()
    }
}

impl TryFrom<Vec<String>> for AvailabilitySchedule {
    type Error = ScheduleError;

    fn try_from(codes: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(codes)
    }
}

impl From<AvailabilitySchedule> for Vec<String> {
    fn from(schedule: AvailabilitySchedule) -> Self {
        schedule.codes()
    }
}

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn bit(day: Weekday) -> u8 {
    1 << day.num_days_from_monday()
}

fn code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

fn parse_weekday(raw: &str) -> Result<Weekday, ScheduleError> {
    let normalized = raw.trim().to_lowercase();
    let day = match normalized.as_str() {
        "mon" | "monday" => Weekday::Mon,
        "tue" | "tues" | "tuesday" => Weekday::Tue,
        "wed" | "wednesday" => Weekday::Wed,
        "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        "sun" | "sunday" => Weekday::Sun,
        _ => return Err(ScheduleError::UnknownWeekday(raw.to_string())),
    };
    Ok(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_schedule_covers_every_day() {
        let schedule = AvailabilitySchedule::unconstrained();
        assert!(ALL_DAYS.iter().all(|day| schedule.covers(*day)));
        assert!(schedule.codes().is_empty());
    }

    #[test]
    fn listed_days_only() {
        let schedule = AvailabilitySchedule::from_days([Weekday::Sat, Weekday::Sun]);
        assert!(schedule.covers(Weekday::Sat));
        assert!(schedule.covers(Weekday::Sun));
        assert!(!schedule.covers(Weekday::Wed));
    }

    #[test]
    fn parses_mixed_case_and_long_names() {
        let schedule = AvailabilitySchedule::parse(["Mon", "WEDNESDAY", " fri "]).unwrap();
        assert_eq!(
            schedule.days(),
            vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]
        );
        assert_eq!(schedule.codes(), vec!["mon", "wed", "fri"]);
    }

    #[test]
    fn duplicate_codes_collapse() {
        let schedule = AvailabilitySchedule::parse(["tue", "Tuesday", "tue"]).unwrap();
        assert_eq!(schedule.days(), vec![Weekday::Tue]);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = AvailabilitySchedule::parse(["mon", "someday"]).unwrap_err();
        assert_eq!(err, ScheduleError::UnknownWeekday("someday".to_string()));
    }

    #[test]
    fn serde_uses_codes() {
        let schedule = AvailabilitySchedule::from_days([Weekday::Sun, Weekday::Mon]);
        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(json, r#"["mon","sun"]"#);

        let back: AvailabilitySchedule = serde_json::from_str(r#"["sun","mon"]"#).unwrap();
        assert_eq!(back, schedule);

        assert!(serde_json::from_str::<AvailabilitySchedule>(r#"["funday"]"#).is_err());
    }
}
