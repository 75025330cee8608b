use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::info;

use crate::common::{RequestId, VolunteerId};
use crate::domains::matching::MatchResult;
use crate::domains::requests::HelpRequest;
use crate::domains::volunteers::Volunteer;
use crate::kernel::ServerDeps;

/// Ranked candidates for one open request
#[derive(Debug, Clone, Serialize)]
pub struct RequestMatches {
    pub request: HelpRequest,
    pub matches: Vec<MatchResult>,
}

/// Top `limit` candidates for a single request.
pub async fn find_matches_for_request(
    request_id: RequestId,
    limit: usize,
    deps: &ServerDeps,
) -> Result<RequestMatches> {
    let request = HelpRequest::find_by_id(request_id, &deps.db_pool)
        .await?
        .ok_or_else(|| anyhow!("Request not found: {}", request_id))?;

    let pool = Volunteer::find_verified(&deps.db_pool).await?;
    let matches = deps.matching.top_matches(&pool, &request, limit);

    info!(
        request_id = %request.id,
        pool = pool.len(),
        matched = matches.len(),
        "Matched volunteers for request"
    );

    Ok(RequestMatches { request, matches })
}

/// Top `limit` candidates for every open request, newest request first.
///
/// The volunteer pool is loaded once and shared across requests.
pub async fn match_open_requests(limit: usize, deps: &ServerDeps) -> Result<Vec<RequestMatches>> {
    let requests = HelpRequest::find_open(&deps.db_pool).await?;
    let pool = Volunteer::find_verified(&deps.db_pool).await?;

    info!(
        requests = requests.len(),
        pool = pool.len(),
        "Matching open requests"
    );

    Ok(requests
        .into_iter()
        .map(|request| {
            let matches = deps.matching.top_matches(&pool, &request, limit);
            RequestMatches { request, matches }
        })
        .collect())
}

/// Whether a volunteer clears the configured good-match score for a request.
pub async fn check_match(
    request_id: RequestId,
    volunteer_id: VolunteerId,
    deps: &ServerDeps,
) -> Result<bool> {
    let request = HelpRequest::find_by_id(request_id, &deps.db_pool)
        .await?
        .ok_or_else(|| anyhow!("Request not found: {}", request_id))?;
    let volunteer = Volunteer::find_by_id(volunteer_id, &deps.db_pool)
        .await?
        .ok_or_else(|| anyhow!("Volunteer not found: {}", volunteer_id))?;

    Ok(deps
        .matching
        .is_good_match(&volunteer, &request, deps.good_match_score))
}
