use std::sync::Arc;

use chrono::Weekday;
use serde::Serialize;
use tracing::{debug, trace};

use super::utils::{
    availability_score, experience_score, location_score, skill_score, RadiusPolicy, Weights,
    MIN_SKILL_SCORE, NEUTRAL_LOCATION_SCORE,
};
use crate::common::{distance_km, VolunteerId};
use crate::domains::requests::HelpRequest;
use crate::domains::volunteers::Volunteer;
use crate::kernel::BaseClock;

/// Default number of candidates shown per request on dashboards
pub const DEFAULT_TOP_N: usize = 10;

/// Default threshold for [`MatchingEngine::is_good_match`]
pub const DEFAULT_GOOD_MATCH_SCORE: u8 = 60;

/// Rounded sub-scores behind a composite, kept for explainability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub skill: u8,
    pub location: u8,
    pub availability: u8,
    pub experience: u8,
}

/// One ranked candidate for a request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub volunteer: Volunteer,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

impl MatchResult {
    pub fn volunteer_id(&self) -> VolunteerId {
        self.volunteer.id
    }
}

/// Why a candidate was left out of the ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exclusion {
    NotVerified,
    OutOfRange { distance_km: f64, max_radius_km: f64 },
    InsufficientSkills { skill_score: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingConfig {
    pub radius: RadiusPolicy,
    pub weights: Weights,
    pub min_skill_score: f64,
    pub neutral_location_score: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            radius: RadiusPolicy::default(),
            weights: Weights::default(),
            min_skill_score: MIN_SKILL_SCORE,
            neutral_location_score: NEUTRAL_LOCATION_SCORE,
        }
    }
}

/// Ranks volunteers against a help request.
///
/// Scoring is a pure function of the volunteer, the request and the weekday.
/// The clock is read once per call so every candidate in a ranking is scored
/// against the same day.
pub struct MatchingEngine {
    config: MatchingConfig,
    clock: Arc<dyn BaseClock>,
}

impl MatchingEngine {
    pub fn new(config: MatchingConfig, clock: Arc<dyn BaseClock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score every eligible candidate and sort best first.
    ///
    /// The sort is stable: candidates with equal composite scores keep their
    /// input order.
    pub fn match_volunteers(&self, candidates: &[Volunteer], request: &HelpRequest) -> Vec<MatchResult> {
        self.match_volunteers_on(candidates, request, self.clock.today())
    }

    /// [`match_volunteers`](Self::match_volunteers) with an explicit weekday.
    pub fn match_volunteers_on(
        &self,
        candidates: &[Volunteer],
        request: &HelpRequest,
        today: Weekday,
    ) -> Vec<MatchResult> {
        let mut ranked: Vec<MatchResult> = candidates
            .iter()
            .filter_map(|volunteer| match self.evaluate(volunteer, request, today) {
                Ok(result) => Some(result),
                Err(reason) => {
                    trace!(
                        request_id = %request.id,
                        volunteer_id = %volunteer.id,
                        ?reason,
                        "Candidate excluded"
                    );
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            request_id = %request.id,
            candidates = candidates.len(),
            matched = ranked.len(),
            "Ranked volunteers for request"
        );

        ranked
    }

    /// Best `limit` candidates. No upper bound on `limit`.
    pub fn top_matches(
        &self,
        candidates: &[Volunteer],
        request: &HelpRequest,
        limit: usize,
    ) -> Vec<MatchResult> {
        let mut ranked = self.match_volunteers(candidates, request);
        ranked.truncate(limit);
        ranked
    }

    /// True when the volunteer survives matching with at least `min_score`.
    pub fn is_good_match(&self, volunteer: &Volunteer, request: &HelpRequest, min_score: u8) -> bool {
        self.evaluate(volunteer, request, self.clock.today())
            .map(|result| result.score >= min_score)
            .unwrap_or(false)
    }

    /// Score one candidate, or report why it is not eligible.
    ///
    /// Checks run in order and stop at the first exclusion: verification,
    /// distance, skills.
    pub fn evaluate(
        &self,
        volunteer: &Volunteer,
        request: &HelpRequest,
        today: Weekday,
    ) -> Result<MatchResult, Exclusion> {
        if !volunteer.is_verified() {
            return Err(Exclusion::NotVerified);
        }

        let max_radius_km = self.config.radius.max_radius_for(request.urgency);

        let location = match (volunteer.coordinate(), request.coordinate()) {
            (Some(here), Some(there)) => {
                let distance_km = distance_km(here, there);
                if distance_km > max_radius_km {
                    return Err(Exclusion::OutOfRange {
                        distance_km,
                        max_radius_km,
                    });
                }
                location_score(distance_km, max_radius_km)
            }
            _ => self.config.neutral_location_score,
        };

        let skill = skill_score(&volunteer.skills, &request.skills_needed);
        if !request.skills_needed.is_empty() && skill < self.config.min_skill_score {
            return Err(Exclusion::InsufficientSkills { skill_score: skill });
        }

        let availability = availability_score(
            volunteer.availability_status,
            &volunteer.availability_schedule,
            today,
        );
        let experience = experience_score(volunteer.rating, volunteer.tasks_completed);

        let composite = self
            .config
            .weights
            .combine(skill, location, availability, experience);

        Ok(MatchResult {
            volunteer: volunteer.clone(),
            score: to_score(composite),
            breakdown: ScoreBreakdown {
                skill: to_score(skill),
                location: to_score(location),
                availability: to_score(availability),
                experience: to_score(experience),
            },
        })
    }
}

/// Round half away from zero into the 0..=100 score range.
fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
