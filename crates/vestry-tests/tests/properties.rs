//! Property tests over whole protocols.
//!
//! - liquidate then redeem at once restores the unlock curve
//! - escrow, liquid supply and asset schedules stay in step
//! - clawback at the start returns the whole grant

use num_bigint::BigUint;
use proptest::prelude::*;
use vestry_core::traits::AssetLedger;
use vestry_core::types::Timestamp;
use vestry_liquid::LiquidAssetStore;
use vestry_tests::helpers::*;

const START: Timestamp = 1_000_000;

fn schedule() -> impl Strategy<Value = (Vec<u64>, u64)> {
    (prop::collection::vec(1u64..1_000_000_000, 1..8), 1u64..10_000)
}

fn spec(amounts: &[u64], length: u64) -> Vec<(u64, u64)> {
    amounts.iter().map(|&a| (length, a)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn round_trip_restores_unlock_curve(
        (amounts, length) in schedule(),
        offset_permille in 1u64..1_000,
        fraction in 1u64..=100,
    ) {
        let total: u64 = amounts.iter().sum();
        let (funder, holder) = (addr(9), addr(1));
        let mut h = harness(funder, total);
        grant(&mut h, funder, holder, START, &spec(&amounts, length), &[]);
        let before = h.vesting().locked_account(&holder).unwrap();

        let span = length * amounts.len() as u64;
        let now = START + (span * offset_permille / 1_000).max(1);
        let locked = before.locked_only(now).amount_of(ASSET);
        prop_assume!(locked > BigUint::from(0u32));
        let amount = (&locked * fraction / 100u32).max(BigUint::from(1u32));

        let asset = h.liquidate(&holder, &holder, ASSET, &amount, now).unwrap();
        h.redeem(&holder, &holder, &asset.base_id, &amount, now).unwrap();

        let after = h.vesting().locked_account(&holder).unwrap();
        prop_assert_eq!(&after.original_total, &before.original_total);
        prop_assert_eq!(after.end_time().unwrap(), before.end_time().unwrap());
        for k in 0..=amounts.len() as u64 {
            let t = START + k * length;
            prop_assert_eq!(after.unlocked_only(t), before.unlocked_only(t));
        }
        prop_assert_eq!(after.locked_only(now), before.locked_only(now));
        prop_assert!(h.assets().get(&asset.base_id).is_none());
    }

    #[test]
    fn escrow_matches_liquid_supply(
        (amounts, length) in schedule(),
        liquidate_pct in 1u64..=100,
        redeem_pct in 0u64..=100,
        redeem_delay in 0u64..20_000,
    ) {
        let total: u64 = amounts.iter().sum();
        let (funder, holder, buyer) = (addr(9), addr(1), addr(2));
        let mut h = harness(funder, total);
        grant(&mut h, funder, holder, START, &spec(&amounts, length), &[]);

        let now = START + 1;
        let locked = h.vesting().locked_account(&holder).unwrap().locked_only(now).amount_of(ASSET);
        prop_assume!(locked > BigUint::from(0u32));
        let liquidated = (&locked * liquidate_pct / 100u32).max(BigUint::from(1u32));
        let asset = h.liquidate(&holder, &buyer, ASSET, &liquidated, now).unwrap();

        let redeemed = &liquidated * redeem_pct / 100u32;
        if redeemed > BigUint::from(0u32) {
            h.redeem(&buyer, &buyer, &asset.base_id, &redeemed, now + redeem_delay).unwrap();
        }

        let outstanding = &liquidated - &redeemed;
        let ledger = h.vesting().ledger();
        prop_assert_eq!(ledger.balance(&h.params().escrow, ASSET), outstanding.clone());
        prop_assert_eq!(ledger.supply_of(&asset.base_id), outstanding.clone());
        let represented = h.assets().get(&asset.base_id).map(|a| a.total()).unwrap_or_default();
        prop_assert_eq!(represented, outstanding);

        let held = ledger.balance(&holder, ASSET) + ledger.balance(&buyer, ASSET)
            + ledger.balance(&h.params().escrow, ASSET);
        prop_assert_eq!(held, BigUint::from(total));
    }

    #[test]
    fn clawback_at_start_returns_original_total(
        (amounts, length) in schedule(),
        unlock_length in 0u64..50_000,
    ) {
        let total: u64 = amounts.iter().sum();
        let (funder, holder) = (addr(9), addr(1));
        let mut h = harness(funder, total);
        grant(&mut h, funder, holder, START, &[(unlock_length, total)], &spec(&amounts, length));

        let amount = h.vesting_mut().clawback(&funder, &holder, None, START).unwrap();
        prop_assert_eq!(amount, coins(total));
        prop_assert_eq!(h.vesting().ledger().balance(&funder, ASSET), BigUint::from(total));
        let account = h.vesting().locked_account(&holder).unwrap();
        prop_assert!(account.original_total.is_zero());
        prop_assert!(account.locked_only(START + unlock_length + 1).is_zero());
    }
}
