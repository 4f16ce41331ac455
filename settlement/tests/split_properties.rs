//! Property-based tests for split-policy invariants
//!
//! - Conservation: per-partner totals always sum to the overall total
//! - Equal split: transfer is exactly half the difference and equalizes
//!   both sides after the notional transfer
//! - Proportional split: after the transfer, partner 1 sits exactly on
//!   their configured share of total spend

use expense_ledger::SplitPolicy;
use proptest::prelude::*;
use rust_decimal::Decimal;
use settlement::split::{compute_transfer, Side};

/// Cent-precision amounts up to 1,000,000.00
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0u64..=100_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Whole-percent shares in [0, 100]
fn share_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=100u32).prop_map(|pct| Decimal::new(pct as i64, 0))
}

proptest! {
    #[test]
    fn totals_are_conserved(t1 in amount_strategy(), t2 in amount_strategy()) {
        // Decimal sums are exact: no float drift for either policy input
        let total = t1 + t2;
        prop_assert_eq!(total - t2, t1);
        prop_assert_eq!(total - t1, t2);
    }

    #[test]
    fn equal_transfer_is_half_the_difference(
        t1 in amount_strategy(),
        t2 in amount_strategy(),
    ) {
        let transfer = compute_transfer(t1, t2, &SplitPolicy::Equal);

        prop_assert_eq!(transfer.amount, (t1 - t2).abs() / Decimal::TWO);
        prop_assert!(transfer.amount >= Decimal::ZERO);
    }

    #[test]
    fn equal_transfer_equalizes_both_sides(
        t1 in amount_strategy(),
        t2 in amount_strategy(),
    ) {
        let transfer = compute_transfer(t1, t2, &SplitPolicy::Equal);

        match transfer.payer {
            Some(Side::Partner1) => {
                // Partner 1 spent less and pays up
                prop_assert!(t1 < t2);
                prop_assert_eq!(t1 + transfer.amount, t2 - transfer.amount);
            }
            Some(Side::Partner2) => {
                prop_assert!(t2 < t1);
                prop_assert_eq!(t2 + transfer.amount, t1 - transfer.amount);
            }
            None => {
                prop_assert_eq!(t1, t2);
                prop_assert_eq!(transfer.amount, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn proportional_transfer_lands_partner_1_on_target(
        t1 in amount_strategy(),
        t2 in amount_strategy(),
        share in share_strategy(),
    ) {
        let policy = SplitPolicy::Proportional { partner_1_share: share };
        let transfer = compute_transfer(t1, t2, &policy);

        let target_1 = (t1 + t2) * share / Decimal::ONE_HUNDRED;
        let effective_1 = match transfer.payer {
            // Partner 2 reimburses partner 1's overspend
            Some(Side::Partner2) => t1 - transfer.amount,
            // Partner 1 pays their shortfall
            Some(Side::Partner1) => t1 + transfer.amount,
            None => t1,
        };

        prop_assert_eq!(effective_1, target_1);
    }

    #[test]
    fn transfer_never_exceeds_total_spend(
        t1 in amount_strategy(),
        t2 in amount_strategy(),
        share in share_strategy(),
    ) {
        let total = t1 + t2;

        let equal = compute_transfer(t1, t2, &SplitPolicy::Equal);
        prop_assert!(equal.amount <= total);

        let prop = compute_transfer(t1, t2, &SplitPolicy::Proportional {
            partner_1_share: share,
        });
        prop_assert!(prop.amount <= total);
    }

    #[test]
    fn zero_amount_means_no_direction(
        t1 in amount_strategy(),
        t2 in amount_strategy(),
        share in share_strategy(),
    ) {
        for policy in [
            SplitPolicy::Equal,
            SplitPolicy::Proportional { partner_1_share: share },
        ] {
            let transfer = compute_transfer(t1, t2, &policy);
            prop_assert_eq!(transfer.amount.is_zero(), transfer.payer.is_none());
        }
    }
}
