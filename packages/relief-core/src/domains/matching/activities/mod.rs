//! Matching activities - load snapshots from the database and rank them
//!
//! The engine itself never touches storage. These functions read the verified
//! pool and the request(s), then hand plain values to `MatchingEngine`.

mod find_matches;

pub use find_matches::{check_match, find_matches_for_request, match_open_requests, RequestMatches};
