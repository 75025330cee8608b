//! Integration tests for the Postgres-backed assignment ledger.
//!
//! These start a Postgres container and are ignored by default:
//! `cargo test -- --ignored`

mod common;

use std::collections::HashSet;

use crate::common::{create_request, create_verified_volunteer, north_of_kochi, TestHarness};
use futures::future::join_all;
use relief_core::common::{AssignmentId, RequestId, VolunteerId};
use relief_core::domains::assignments::activities::{
    accept_request, assign_volunteers, update_assignment_status,
};
use relief_core::domains::assignments::{
    AssignmentOrigin, AssignmentStatus, LedgerError, TransitionPolicy,
};
use relief_core::domains::requests::{HelpRequest, Urgency};
use test_context::test_context;

async fn assigned_count(ctx: &TestHarness, request_id: RequestId) -> i32 {
    HelpRequest::find_by_id(request_id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap()
        .volunteers_assigned
}

// =============================================================================
// Creation and the assigned counter
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn sequential_creations_count_two(ctx: &TestHarness) {
    let deps = ctx.deps();
    let request = create_request(&ctx.db_pool, "Sandbag the riverbank", &[], Urgency::High, 2)
        .await
        .unwrap();
    let volunteer = create_verified_volunteer(&ctx.db_pool, "Anu", &[], north_of_kochi(1.0))
        .await
        .unwrap();

    let outcomes = assign_volunteers(request.id, &[volunteer.id, volunteer.id], &deps).await;

    let ids: HashSet<AssignmentId> = outcomes
        .iter()
        .map(|o| o.assignment.as_ref().unwrap().id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(assigned_count(ctx, request.id).await, 2);

    let stored = deps.ledger.assignments_for_request(request.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|a| a.status == AssignmentStatus::Pending));
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn concurrent_creations_are_all_counted(ctx: &TestHarness) {
    const TRIALS: usize = 20;
    const VOLUNTEERS: usize = 6;

    let deps = ctx.deps();
    let mut volunteers = Vec::new();
    for i in 0..VOLUNTEERS {
        let volunteer =
            create_verified_volunteer(&ctx.db_pool, &format!("v{i}"), &[], north_of_kochi(0.5))
                .await
                .unwrap();
        volunteers.push(volunteer.id);
    }

    for trial in 0..TRIALS {
        let request = create_request(&ctx.db_pool, "Shelter shift", &[], Urgency::Medium, 6)
            .await
            .unwrap();

        let results = join_all(volunteers.iter().map(|&volunteer_id| {
            let ledger = deps.ledger.clone();
            let request_id = request.id;
            tokio::spawn(async move {
                ledger
                    .create_assignment(request_id, volunteer_id, AssignmentOrigin::Requester)
                    .await
            })
        }))
        .await;

        assert!(results.into_iter().all(|r| r.unwrap().is_ok()), "trial {trial}");
        assert_eq!(
            assigned_count(ctx, request.id).await,
            VOLUNTEERS as i32,
            "trial {trial}"
        );
    }
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn unknown_volunteer_rolls_back_the_increment(ctx: &TestHarness) {
    let deps = ctx.deps();
    let request = create_request(&ctx.db_pool, "Water delivery", &[], Urgency::Low, 1)
        .await
        .unwrap();

    let err = deps
        .ledger
        .create_assignment(request.id, VolunteerId::new(), AssignmentOrigin::Requester)
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::VolunteerNotFound(_)));
    assert_eq!(assigned_count(ctx, request.id).await, 0);
    assert!(deps
        .ledger
        .assignments_for_request(request.id)
        .await
        .unwrap()
        .is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn unknown_request_is_reported(ctx: &TestHarness) {
    let deps = ctx.deps();
    let volunteer = create_verified_volunteer(&ctx.db_pool, "Bala", &[], north_of_kochi(1.0))
        .await
        .unwrap();

    let err = deps
        .ledger
        .create_assignment(RequestId::new(), volunteer.id, AssignmentOrigin::Requester)
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::RequestNotFound(_)));
}

// =============================================================================
// Status transitions
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn self_accept_then_complete(ctx: &TestHarness) {
    let deps = ctx.deps();
    let request = create_request(&ctx.db_pool, "Cook meals", &[], Urgency::Medium, 1)
        .await
        .unwrap();
    let volunteer = create_verified_volunteer(&ctx.db_pool, "Kiran", &[], north_of_kochi(2.0))
        .await
        .unwrap();

    let accepted = accept_request(request.id, volunteer.id, &deps).await.unwrap();
    assert_eq!(accepted.status, AssignmentStatus::Accepted);
    assert!(accepted.accepted_at.is_some());

    update_assignment_status(accepted.id, AssignmentStatus::InProgress, &deps)
        .await
        .unwrap();
    let done = update_assignment_status(accepted.id, AssignmentStatus::Completed, &deps)
        .await
        .unwrap();

    assert_eq!(done.status, AssignmentStatus::Completed);
    assert!(done.started_at.is_some());
    assert!(done.completed_at.is_some());

    let active = deps.ledger.active_assignments().await.unwrap();
    assert!(active.iter().all(|a| a.id != done.id));

    let mine = deps.ledger.assignments_for_volunteer(volunteer.id).await.unwrap();
    assert_eq!(mine.len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn strict_policy_rejects_skipping_ahead(ctx: &TestHarness) {
    let deps = ctx.deps_with_policy(TransitionPolicy::Strict);
    let request = create_request(&ctx.db_pool, "Clean-up crew", &[], Urgency::Low, 1)
        .await
        .unwrap();
    let volunteer = create_verified_volunteer(&ctx.db_pool, "Joseph", &[], north_of_kochi(3.0))
        .await
        .unwrap();

    let outcomes = assign_volunteers(request.id, &[volunteer.id], &deps).await;
    let pending = outcomes[0].assignment.clone().unwrap();

    let err = deps
        .ledger
        .update_assignment_status(pending.id, AssignmentStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransition { .. }));

    let stored = deps.ledger.find(pending.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AssignmentStatus::Pending);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn permissive_policy_and_cancellation_keep_the_count(ctx: &TestHarness) {
    let deps = ctx.deps_with_policy(TransitionPolicy::Permissive);
    let request = create_request(&ctx.db_pool, "Medical camp", &[], Urgency::High, 1)
        .await
        .unwrap();
    let volunteer = create_verified_volunteer(&ctx.db_pool, "Meera", &[], north_of_kochi(1.0))
        .await
        .unwrap();

    let outcomes = assign_volunteers(request.id, &[volunteer.id], &deps).await;
    let id = outcomes[0].assignment.as_ref().unwrap().id;

    let done = deps
        .ledger
        .update_assignment_status(id, AssignmentStatus::Completed)
        .await
        .unwrap();
    assert!(done.completed_at.is_some());

    deps.ledger
        .update_assignment_status(id, AssignmentStatus::Cancelled)
        .await
        .unwrap();

    assert_eq!(assigned_count(ctx, request.id).await, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn missing_assignment_is_not_found(ctx: &TestHarness) {
    let deps = ctx.deps();
    let err = deps
        .ledger
        .update_assignment_status(AssignmentId::new(), AssignmentStatus::Accepted)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
