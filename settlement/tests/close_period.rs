//! End-to-end close-period scenarios against the in-memory store
//!
//! Covers the worked examples for both split policies, no-op and
//! re-close behavior, zero-balance periods and the concurrent-close race.

use chrono::NaiveDate;
use expense_ledger::{
    Couple, CoupleStore, Expense, ExpenseStore, MemoryStore, PartnerDirectory, PartnerId,
    SplitPolicy,
};
use rust_decimal::Decimal;
use settlement::{CloseOutcome, Config, DateRange, SettlementEngine};
use std::sync::Arc;

fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
}

fn august() -> DateRange {
    DateRange::month(2026, 8).unwrap()
}

struct TestEnv {
    engine: SettlementEngine,
    store: Arc<MemoryStore>,
    couple: Couple,
}

impl TestEnv {
    async fn new(split: SplitPolicy) -> Self {
        trace_init();
        let couple = Couple::new(
            PartnerId::new("5511999990001"),
            PartnerId::new("5511999990002"),
            split,
        )
        .unwrap();

        let store = Arc::new(MemoryStore::new());
        store.put_couple(&couple).await.unwrap();
        store.put_partner(&couple.partner_1, "Ana").await.unwrap();
        store.put_partner(&couple.partner_2, "Bruno").await.unwrap();

        let engine = SettlementEngine::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Config::default(),
        );

        Self {
            engine,
            store,
            couple,
        }
    }

    async fn spend(&self, payer: &PartnerId, cents: i64, day: u32) -> Expense {
        let expense = Expense::new(self.couple.id, payer.clone(), money(cents), date(day));
        self.store.insert_expense(&expense).await.unwrap();
        expense
    }
}

#[tokio::test]
async fn equal_split_lower_spender_pays_half_the_difference() {
    let env = TestEnv::new(SplitPolicy::Equal).await;

    // Ana spent 300, Bruno spent 100
    env.spend(&env.couple.partner_1, 30000, 5).await;
    env.spend(&env.couple.partner_2, 10000, 20).await;

    let outcome = env.engine.close_period(env.couple.id, august()).await.unwrap();
    let result = outcome.result().expect("period should close");

    assert_eq!(result.total_general, money(40000));
    assert_eq!(result.total_partner_1, money(30000));
    assert_eq!(result.total_partner_2, money(10000));
    assert_eq!(result.transfer_amount, money(10000));
    // Lower spender pays, higher spender receives
    assert_eq!(result.payer_name.as_deref(), Some("Bruno"));
    assert_eq!(result.receiver_name.as_deref(), Some("Ana"));
    assert_eq!(result.split_type, "EQUAL");
    assert_eq!(result.period_reference, "01/08/2026 to 31/08/2026");

    // Settlement row persisted with resolved partner ids
    let id = result.settlement_id.expect("non-zero transfer persists a row");
    let settlement = env.store.get_settlement(&id).await.unwrap();
    assert_eq!(settlement.amount_settled, money(10000));
    assert_eq!(settlement.paid_by, env.couple.partner_2);
    assert_eq!(settlement.received_by, env.couple.partner_1);
}

#[tokio::test]
async fn proportional_split_reimburses_the_overspender() {
    let env = TestEnv::new(SplitPolicy::Proportional {
        partner_1_share: Decimal::new(70, 0),
    })
    .await;

    // Total 1000, Ana (70% target = 700) spent 800
    env.spend(&env.couple.partner_1, 80000, 3).await;
    env.spend(&env.couple.partner_2, 20000, 4).await;

    let outcome = env.engine.close_period(env.couple.id, august()).await.unwrap();
    let result = outcome.result().unwrap();

    assert_eq!(result.transfer_amount, money(10000));
    assert_eq!(result.payer_name.as_deref(), Some("Bruno"));
    assert_eq!(result.receiver_name.as_deref(), Some("Ana"));
    assert_eq!(result.split_type, "PROPORTIONAL");
}

#[tokio::test]
async fn empty_period_is_a_noop() {
    let env = TestEnv::new(SplitPolicy::Equal).await;

    let outcome = env.engine.close_period(env.couple.id, august()).await.unwrap();
    assert!(outcome.is_noop());
    assert_eq!(env.store.settlement_count(), 0);
}

#[tokio::test]
async fn reclosing_a_closed_range_is_a_noop() {
    let env = TestEnv::new(SplitPolicy::Equal).await;
    env.spend(&env.couple.partner_1, 30000, 5).await;
    env.spend(&env.couple.partner_2, 10000, 20).await;

    let first = env.engine.close_period(env.couple.id, august()).await.unwrap();
    assert!(!first.is_noop());

    // Same range again
    let second = env.engine.close_period(env.couple.id, august()).await.unwrap();
    assert!(second.is_noop());

    // Overlapping range
    let overlap = DateRange::new(date(10), date(31)).unwrap();
    let third = env.engine.close_period(env.couple.id, overlap).await.unwrap();
    assert!(third.is_noop());

    assert_eq!(env.store.settlement_count(), 1);
}

#[tokio::test]
async fn balanced_period_reports_totals_but_writes_nothing() {
    let env = TestEnv::new(SplitPolicy::Equal).await;
    let e1 = env.spend(&env.couple.partner_1, 20000, 5).await;
    let e2 = env.spend(&env.couple.partner_2, 20000, 6).await;

    let outcome = env.engine.close_period(env.couple.id, august()).await.unwrap();
    let result = outcome.result().expect("balanced close still reports totals");

    assert_eq!(result.transfer_amount, Decimal::ZERO);
    assert_eq!(result.total_general, money(40000));
    assert!(result.settlement_id.is_none());
    assert!(result.payer_name.is_none());
    assert!(result.receiver_name.is_none());

    // No settlement row, expenses untouched
    assert_eq!(env.store.settlement_count(), 0);
    for id in [e1.id, e2.id] {
        assert!(env.store.get_expense(&id).await.unwrap().is_unsettled());
    }
}

#[tokio::test]
async fn only_expenses_inside_the_range_are_consumed() {
    let env = TestEnv::new(SplitPolicy::Equal).await;
    let inside = env.spend(&env.couple.partner_1, 30000, 15).await;
    let outside = Expense::new(
        env.couple.id,
        env.couple.partner_1.clone(),
        money(50000),
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
    );
    env.store.insert_expense(&outside).await.unwrap();

    let outcome = env.engine.close_period(env.couple.id, august()).await.unwrap();
    let result = outcome.result().unwrap();
    assert_eq!(result.total_general, money(30000));

    assert!(!env.store.get_expense(&inside.id).await.unwrap().is_unsettled());
    assert!(env.store.get_expense(&outside.id).await.unwrap().is_unsettled());
}

#[tokio::test]
async fn dashboard_json_shape() {
    let env = TestEnv::new(SplitPolicy::Equal).await;
    env.spend(&env.couple.partner_1, 30000, 5).await;
    env.spend(&env.couple.partner_2, 10000, 20).await;

    let outcome = env.engine.close_period(env.couple.id, august()).await.unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["status"], "closed");
    assert_eq!(json["transfer_amount"], "100.00");
    assert_eq!(json["total_general"], "400.00");
    assert_eq!(json["payer_name"], "Bruno");
    assert_eq!(json["split_type"], "EQUAL");
}

/// Two concurrent closes over the same range: exactly one settles, the other
/// sees nothing left (or loses the claim); expenses are never linked twice.
#[tokio::test]
async fn concurrent_closes_never_double_count() {
    for _ in 0..20 {
        let env = TestEnv::new(SplitPolicy::Equal).await;
        let e1 = env.spend(&env.couple.partner_1, 30000, 5).await;
        let e2 = env.spend(&env.couple.partner_2, 10000, 20).await;

        let engine = Arc::new(env.engine);
        let couple_id = env.couple.id;

        let a = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.close_period(couple_id, august()).await })
        };
        let b = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.close_period(couple_id, august()).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];

        let mut closed = 0;
        for result in results {
            match result {
                Ok(CloseOutcome::Closed(r)) => {
                    assert!(r.settlement_id.is_some());
                    closed += 1;
                }
                Ok(CloseOutcome::NothingToClose) => {}
                // A lost claim must surface as an inconsistency, not success
                Err(settlement::Error::Inconsistency(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(closed, 1, "exactly one close must win");

        // One settlement row; each expense linked to it exactly once
        assert_eq!(env.store.settlement_count(), 1);
        let link_1 = env.store.get_expense(&e1.id).await.unwrap().settlement_id;
        let link_2 = env.store.get_expense(&e2.id).await.unwrap().settlement_id;
        assert!(link_1.is_some());
        assert_eq!(link_1, link_2);
    }
}
