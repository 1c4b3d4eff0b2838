//! Ledger integration tests
//!
//! Every test runs against its own in-memory SQLite ledger with a manual
//! clock, so they need no external services.
//!
//! Run with: cargo test -p integration-tests --test ledger_tests

use std::collections::HashSet;

use chrono::Duration;
use futures::future::join_all;

use integration_tests::{
    test_config, test_settings, unique_id, vouch, vouch_via, MemoryRoleManager, RecordingNotifier,
    TestLedger, RESTRICTED_ROLE, TRUSTED_ROLE,
};
use vouch_core::{Clock, GateRole, RoleTransition, SuspicionReason, VouchRecord};
use vouch_service::dto::{GateStatus, SkipReason};
use vouch_service::{
    EligibilityPolicy, ServiceContext, SubmitterProfile, SuspiciousDetector, TrustGateService,
    TrustService, VouchService,
};

fn mean(records: &[VouchRecord]) -> f64 {
    let sum: i64 = records.iter().map(|r| i64::from(r.rating.get())).sum();
    sum as f64 / records.len() as f64
}

// ============================================================================
// Ledger Tests
// ============================================================================

#[tokio::test]
async fn test_twelve_records_paginate_in_pages_of_five() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let user = unique_id();
    ledger.seed(user, &[4; 12]).await.unwrap();

    let service = ledger.vouches();
    let sizes: Vec<usize> = join_all((0..4).map(|page| service.list(ledger.guild, user, page)))
        .await
        .into_iter()
        .map(|listing| listing.unwrap().records.len())
        .collect();
    assert_eq!(sizes, vec![5, 5, 2, 0]);

    let beyond = service.list(ledger.guild, user, 3).await.unwrap();
    assert_eq!(beyond.cursor.total(), 12);
    assert_eq!(beyond.cursor.total_pages(), 3);
    assert!(!beyond.cursor.is_in_range());
}

#[tokio::test]
async fn test_pages_cover_every_record_exactly_once() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let user = unique_id();
    ledger.seed(user, &[5, 4, 3, 5, 4, 3, 5, 4, 3, 5, 4]).await.unwrap();

    let service = ledger.vouches();
    let mut seen = Vec::new();
    let mut cursor = service.list(ledger.guild, user, 0).await.unwrap().cursor;
    loop {
        let listing = service.list(ledger.guild, user, cursor.page()).await.unwrap();
        seen.extend(listing.records.iter().map(|r| r.id));
        match listing.cursor.next() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    let exported: Vec<_> = service
        .export(ledger.guild, user)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();

    assert_eq!(seen.len(), 11);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 11);
    // Pages walk the same newest-first order as the export
    assert_eq!(seen, exported);
}

#[tokio::test]
async fn test_recorded_vouches_never_change() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let user = unique_id();

    let first = ledger
        .vouches()
        .submit(vouch(ledger.guild, unique_id(), user, 3))
        .await
        .unwrap();
    ledger.clock.advance(Duration::days(2));
    ledger.seed(user, &[5, 5, 1]).await.unwrap();

    let again = ledger.vouches().get(ledger.guild, first.id).await.unwrap();
    assert_eq!(again, first);
    assert_eq!(ledger.vouches().export(ledger.guild, user).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_concurrent_submissions_are_all_recorded() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let user = unique_id();
    let service = ledger.vouches();

    let results = join_all(
        (0..20).map(|i| service.submit(vouch(ledger.guild, unique_id(), user, 1 + i % 5))),
    )
    .await;

    let ids: HashSet<_> = results.into_iter().map(|r| r.unwrap().id).collect();
    assert_eq!(ids.len(), 20);

    let stats = TrustService::new(&ledger.ctx).stats(ledger.guild, user).await.unwrap();
    assert_eq!(stats.total, 20);
    assert!((stats.avg_rating.unwrap() - 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_guilds_do_not_share_vouches() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let other_guild = unique_id();
    let user = unique_id();

    ledger.seed(user, &[5, 5]).await.unwrap();
    ledger
        .vouches()
        .submit(vouch(other_guild, unique_id(), user, 1))
        .await
        .unwrap();

    let trust = TrustService::new(&ledger.ctx);
    assert_eq!(trust.stats(ledger.guild, user).await.unwrap().total, 2);
    assert_eq!(trust.stats(other_guild, user).await.unwrap().total, 1);
    assert_eq!(trust.guild_stats(other_guild).await.unwrap().total, 1);
}

// ============================================================================
// Statistics Tests
// ============================================================================

#[tokio::test]
async fn test_stats_agree_with_the_records() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let user = unique_id();
    let middleman = unique_id();
    let voucher = unique_id();
    let service = ledger.vouches();

    ledger.seed(user, &[5, 2, 4]).await.unwrap();
    service
        .submit(vouch_via(ledger.guild, voucher, user, middleman, 3))
        .await
        .unwrap();
    ledger.clock.advance(Duration::hours(1));
    // Repeat inside the window, flagged
    service
        .submit(vouch_via(ledger.guild, voucher, user, middleman, 5))
        .await
        .unwrap();

    let records = service.export(ledger.guild, user).await.unwrap();
    let stats = TrustService::new(&ledger.ctx).stats(ledger.guild, user).await.unwrap();

    assert_eq!(stats.total, records.len() as i64);
    assert!((stats.avg_rating.unwrap() - mean(&records)).abs() < 1e-9);
    assert_eq!(
        stats.suspicious_count,
        records.iter().filter(|r| r.suspicious).count() as i64
    );
    assert_eq!(stats.suspicious_count, 1);
    assert_eq!(stats.middleman_count, 2);
    assert!((stats.middleman_avg.unwrap() - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_user_without_vouches_has_empty_stats() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let stats = TrustService::new(&ledger.ctx)
        .stats(ledger.guild, unique_id())
        .await
        .unwrap();

    assert!(stats.is_empty());
    assert_eq!(stats.avg_rating, None);
    assert_eq!(stats.middleman_avg, None);
}

#[tokio::test]
async fn test_leaderboard_and_top_middlemen() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let (busy, steady, quiet) = (unique_id(), unique_id(), unique_id());
    let middleman = unique_id();

    ledger.seed(busy, &[3, 3, 3]).await.unwrap();
    ledger.seed(steady, &[5, 5]).await.unwrap();
    ledger.seed(quiet, &[4]).await.unwrap();
    ledger
        .vouches()
        .submit(vouch_via(ledger.guild, unique_id(), quiet, middleman, 5))
        .await
        .unwrap();

    let trust = TrustService::new(&ledger.ctx);
    let board = trust.leaderboard(ledger.guild).await.unwrap();
    let order: Vec<_> = board.iter().map(|row| row.user_id).collect();
    // steady and quiet tie on count; the higher average ranks first
    assert_eq!(order, vec![busy, steady, quiet]);

    let top = trust.leaderboard_with_limit(ledger.guild, 1).await.unwrap();
    assert_eq!(top.len(), 1);

    let middlemen = trust.top_middlemen(ledger.guild).await.unwrap();
    assert_eq!(middlemen.len(), 1);
    assert_eq!(middlemen[0].user_id, middleman);
    assert_eq!(middlemen[0].vouch_count, 1);
}

// ============================================================================
// Suspicion Tests
// ============================================================================

#[tokio::test]
async fn test_repeat_vouch_window() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let (voucher, vouched) = (unique_id(), unique_id());
    let service = ledger.vouches();

    assert!(!service.submit(vouch(ledger.guild, voucher, vouched, 5)).await.unwrap().suspicious);

    ledger.clock.advance(Duration::days(8));
    assert!(!service.submit(vouch(ledger.guild, voucher, vouched, 5)).await.unwrap().suspicious);

    ledger.clock.advance(Duration::days(7));
    // Exactly on the window edge still counts
    assert!(service.submit(vouch(ledger.guild, voucher, vouched, 5)).await.unwrap().suspicious);
}

#[tokio::test]
async fn test_mutual_vouching_is_flagged() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let (alice, bob) = (unique_id(), unique_id());
    let service = ledger.vouches();

    service.submit(vouch(ledger.guild, alice, bob, 5)).await.unwrap();
    ledger.clock.advance(Duration::days(3));

    let verdict = SuspiciousDetector::new(&ledger.ctx)
        .evaluate(ledger.guild, bob, alice)
        .await
        .unwrap();
    assert_eq!(verdict.reasons, vec![SuspicionReason::MutualLoop]);

    let back = service.submit(vouch(ledger.guild, bob, alice, 5)).await.unwrap();
    assert!(back.suspicious);

    ledger.clock.advance(Duration::days(15));
    assert!(
        !SuspiciousDetector::new(&ledger.ctx)
            .is_suspicious(ledger.guild, bob, alice)
            .await
            .unwrap()
    );
}

// ============================================================================
// Trust Gate Tests
// ============================================================================

#[tokio::test]
async fn test_five_perfect_vouches_grant_trusted() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    let user = unique_id();
    ledger.seed(user, &[5, 5, 5, 5, 5]).await.unwrap();

    let stats = TrustService::new(&ledger.ctx).stats(ledger.guild, user).await.unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.avg_rating, Some(5.0));
    assert_eq!(stats.suspicious_count, 0);

    let gate = TrustGateService::new(&ledger.ctx);
    let report = gate.evaluate(&roles, ledger.guild, user).await.unwrap();

    let trusted = report.outcome(GateRole::Trusted).unwrap();
    assert_eq!(trusted.transition, RoleTransition::Grant);
    assert_eq!(trusted.status, GateStatus::Applied);
    assert!(roles.holds(user, TRUSTED_ROLE));
    assert!(!roles.holds(user, RESTRICTED_ROLE));

    let changes = roles.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].reason, "Trust gate: trusted (high avg rating)");

    // Unchanged inputs: second run changes nothing
    let again = gate.evaluate(&roles, ledger.guild, user).await.unwrap();
    assert!(again.is_noop());
    assert_eq!(roles.changes().len(), 1);
}

#[tokio::test]
async fn test_falling_average_revokes_trusted() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    let user = unique_id();
    let gate = TrustGateService::new(&ledger.ctx);

    ledger.seed(user, &[5, 5, 5, 5, 5]).await.unwrap();
    gate.evaluate(&roles, ledger.guild, user).await.unwrap();
    assert!(roles.holds(user, TRUSTED_ROLE));

    ledger.seed(user, &[1]).await.unwrap();
    let report = gate.evaluate(&roles, ledger.guild, user).await.unwrap();

    assert_eq!(
        report.outcome(GateRole::Trusted).unwrap().transition,
        RoleTransition::Revoke
    );
    assert!(!roles.holds(user, TRUSTED_ROLE));
    assert_eq!(
        roles.changes().last().unwrap().reason,
        "Trust gate: remove trusted (no longer meets criteria)"
    );
}

#[tokio::test]
async fn test_restricted_threshold_is_inclusive() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    let user = unique_id();
    ledger.seed(user, &[2, 3, 2, 3, 2, 3]).await.unwrap();

    let report = TrustGateService::new(&ledger.ctx)
        .evaluate(&roles, ledger.guild, user)
        .await
        .unwrap();

    // Restricted is reconciled before trusted
    assert_eq!(report.outcomes[0].role, GateRole::Restricted);
    assert_eq!(report.outcomes[0].status, GateStatus::Applied);
    assert_eq!(report.outcomes[1].status, GateStatus::Unchanged);
    assert!(roles.holds(user, RESTRICTED_ROLE));
}

#[tokio::test]
async fn test_below_minimum_count_changes_nothing() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    let user = unique_id();
    ledger.seed(user, &[5, 5, 5, 5]).await.unwrap();

    let report = TrustGateService::new(&ledger.ctx)
        .evaluate(&roles, ledger.guild, user)
        .await
        .unwrap();

    assert!(report.is_noop());
    assert!(roles.changes().is_empty());
}

#[tokio::test]
async fn test_missing_privilege_skips_then_converges() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    let user = unique_id();
    ledger.seed(user, &[5, 5, 5, 5, 5]).await.unwrap();
    let gate = TrustGateService::new(&ledger.ctx);

    roles.set_privileged(false);
    let report = gate.evaluate(&roles, ledger.guild, user).await.unwrap();
    assert_eq!(
        report.outcome(GateRole::Trusted).unwrap().status,
        GateStatus::Skipped(SkipReason::MissingManageRoles)
    );
    assert!(!roles.holds(user, TRUSTED_ROLE));

    roles.set_privileged(true);
    let report = gate.evaluate(&roles, ledger.guild, user).await.unwrap();
    assert_eq!(report.applied().count(), 1);
    assert!(roles.holds(user, TRUSTED_ROLE));
}

#[tokio::test]
async fn test_role_above_acting_identity_is_skipped() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    roles.add_role(TRUSTED_ROLE, "Trusted Trader", 50);
    let user = unique_id();
    ledger.seed(user, &[5, 5, 5, 5, 5]).await.unwrap();

    let report = TrustGateService::new(&ledger.ctx)
        .evaluate(&roles, ledger.guild, user)
        .await
        .unwrap();

    assert_eq!(
        report.outcome(GateRole::Trusted).unwrap().status,
        GateStatus::Skipped(SkipReason::Hierarchy)
    );
    assert!(roles.changes().is_empty());
}

#[tokio::test]
async fn test_deleted_role_is_skipped() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    roles.remove_role(TRUSTED_ROLE);
    let user = unique_id();
    ledger.seed(user, &[5, 5, 5, 5, 5]).await.unwrap();

    let report = TrustGateService::new(&ledger.ctx)
        .evaluate(&roles, ledger.guild, user)
        .await
        .unwrap();

    assert_eq!(
        report.outcome(GateRole::Trusted).unwrap().status,
        GateStatus::Skipped(SkipReason::RoleNotFound)
    );
}

#[tokio::test]
async fn test_gate_disabled_without_configured_roles() {
    let settings = vouch_service::LedgerSettings {
        trusted_role: None,
        restricted_role: None,
        ..test_settings()
    };
    let ledger = TestLedger::start_with(settings, None).await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    let user = unique_id();
    ledger.seed(user, &[5, 5, 5, 5, 5]).await.unwrap();

    let report = TrustGateService::new(&ledger.ctx)
        .evaluate(&roles, ledger.guild, user)
        .await
        .unwrap();
    assert!(report.outcomes.is_empty());
}

// ============================================================================
// Submission Flow Tests
// ============================================================================

#[tokio::test]
async fn test_submit_and_reconcile_grants_on_fifth_vouch() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    let user = unique_id();
    ledger.seed(user, &[5, 5, 5, 5]).await.unwrap();

    let outcome = ledger
        .vouches()
        .submit_and_reconcile(&roles, vouch(ledger.guild, unique_id(), user, 5))
        .await
        .unwrap();

    assert!(!outcome.verdict.is_suspicious());
    assert_eq!(outcome.record.vouched_user_id, user);
    assert_eq!(outcome.gate.applied().count(), 1);
    assert!(roles.holds(user, TRUSTED_ROLE));
}

#[tokio::test]
async fn test_platform_outage_does_not_fail_submission() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    let user = unique_id();
    ledger.seed(user, &[5, 5, 5, 5]).await.unwrap();

    roles.set_unreachable(true);
    let outcome = ledger
        .vouches()
        .submit_and_reconcile(&roles, vouch(ledger.guild, unique_id(), user, 5))
        .await
        .unwrap();

    assert_eq!(outcome.gate.skipped().count(), 2);
    assert!(outcome
        .gate
        .outcomes
        .iter()
        .all(|o| matches!(o.status, GateStatus::Skipped(SkipReason::Platform(_)))));
    assert_eq!(ledger.vouches().export(ledger.guild, user).await.unwrap().len(), 5);

    // The next evaluation converges once the platform is back
    roles.set_unreachable(false);
    TrustGateService::new(&ledger.ctx)
        .evaluate(&roles, ledger.guild, user)
        .await
        .unwrap();
    assert!(roles.holds(user, TRUSTED_ROLE));
}

#[tokio::test]
async fn test_invalid_submission_is_not_recorded() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let roles = MemoryRoleManager::new(ledger.guild);
    let user = unique_id();

    let err = ledger
        .vouches()
        .submit_and_reconcile(&roles, vouch(ledger.guild, unique_id(), user, 0))
        .await
        .unwrap_err();

    assert!(err.is_user_error());
    assert!(!err.is_storage_failure());
    assert!(ledger.vouches().export(ledger.guild, user).await.unwrap().is_empty());
    assert!(roles.changes().is_empty());
}

#[tokio::test]
async fn test_receipt_is_delivered() {
    let notifier = RecordingNotifier::new();
    let ledger = TestLedger::start_with(test_settings(), Some(notifier.clone()))
        .await
        .expect("Failed to start ledger");

    let record = ledger
        .vouches()
        .submit(vouch(ledger.guild, unique_id(), unique_id(), 4))
        .await
        .unwrap();

    assert_eq!(notifier.delivered(), vec![record]);
}

#[tokio::test]
async fn test_undeliverable_receipt_is_swallowed() {
    let notifier = RecordingNotifier::failing();
    let ledger = TestLedger::start_with(test_settings(), Some(notifier.clone()))
        .await
        .expect("Failed to start ledger");
    let user = unique_id();

    let record = ledger
        .vouches()
        .submit(vouch(ledger.guild, unique_id(), user, 4))
        .await
        .unwrap();

    assert!(notifier.delivered().is_empty());
    assert_eq!(ledger.vouches().get(ledger.guild, record.id).await.unwrap(), record);
}

// ============================================================================
// Eligibility & Wiring Tests
// ============================================================================

#[tokio::test]
async fn test_eligibility_uses_the_ledger_clock() {
    let ledger = TestLedger::start().await.expect("Failed to start ledger");
    let now = ledger.ctx.clock().now();
    let policy = ledger.ctx.settings().eligibility;

    let newcomer = SubmitterProfile {
        user_id: unique_id(),
        account_created_at: Some(now - Duration::days(400)),
        joined_at: Some(now - Duration::hours(2)),
    };
    assert!(policy.check(&newcomer, now).is_err());

    ledger.clock.advance(Duration::hours(4));
    let later = ledger.ctx.clock().now();
    assert_eq!(policy.check(&newcomer, later), Ok(()));
    assert_eq!(policy, EligibilityPolicy::default());
}

#[tokio::test]
async fn test_context_from_environment_config() {
    let mut config = test_config().expect("Failed to load config");
    config.trust_gate.trusted_role_id = 0;
    config.trust_gate.restricted_role_id = 0;

    let ctx = ServiceContext::connect(&config).await.expect("Failed to connect");
    assert_eq!(ctx.settings().trusted_role, None);

    let guild = unique_id();
    let record = VouchService::new(&ctx)
        .submit(vouch(guild, unique_id(), unique_id(), 5))
        .await
        .unwrap();
    assert_eq!(record.guild_id, guild);
    assert_eq!(
        ctx.settings().thresholds.trusted_min_vouches,
        config.trust_gate.trusted_min_vouches
    );
}
