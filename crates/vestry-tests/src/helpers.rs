//! Shared fixtures for scenario and property tests.

use num_bigint::BigUint;
use vestry_core::amount::Amount;
use vestry_core::ledger::{MemoryAssetLedger, MemoryDelegationLedger};
use vestry_core::period::Period;
use vestry_core::traits::AssetLedger;
use vestry_core::types::{Address, Timestamp};
use vestry_liquid::{LiquidVesting, MemoryLiquidAssetStore, Params};
use vestry_vesting::grant::Grant;
use vestry_vesting::keeper::VestingKeeper;
use vestry_vesting::store::MemoryAccountStore;

/// Asset every fixture is denominated in.
pub const ASSET: &str = "aISLM";

pub type Harness =
    LiquidVesting<MemoryAccountStore, MemoryAssetLedger, MemoryDelegationLedger, MemoryLiquidAssetStore>;

/// Install a test-writer subscriber filtered by `RUST_LOG` (default `warn`).
/// Set `VESTRY_LOG_FORMAT=json` for JSON lines. Safe to call from every test.
pub fn init_logging() {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var("VESTRY_LOG_FORMAT").is_ok_and(|f| f == "json");
    // Fails harmlessly once an earlier test has installed a subscriber.
    let _ = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_test_writer())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_test_writer())
            .try_init()
    };
}

/// Address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address([seed; 20])
}

pub fn coins(v: u64) -> Amount {
    Amount::coin(ASSET, v)
}

pub fn big(v: u64) -> BigUint {
    BigUint::from(v)
}

/// Periods from `(length, amount)` pairs.
pub fn periods(spec: &[(u64, u64)]) -> Vec<Period> {
    spec.iter().map(|&(l, a)| Period::new(l, coins(a))).collect()
}

/// A harness with `funder` holding `balance` and a minimum liquidation of 1.
pub fn harness(funder: Address, balance: u64) -> Harness {
    init_logging();
    let mut ledger = MemoryAssetLedger::new();
    ledger.mint(&funder, &coins(balance)).unwrap();
    let vesting = VestingKeeper::new(
        MemoryAccountStore::new(),
        ledger,
        MemoryDelegationLedger::new(ASSET),
    );
    let params = Params {
        minimum_liquidation_amount: big(1),
        ..Params::default()
    };
    LiquidVesting::new(vesting, MemoryLiquidAssetStore::new(), params).unwrap()
}

/// Grant `target` an account unlocking along `unlock`, owned immediately
/// unless `ownership` is given.
pub fn grant(
    h: &mut Harness,
    funder: Address,
    target: Address,
    start: Timestamp,
    unlock: &[(u64, u64)],
    ownership: &[(u64, u64)],
) {
    let grant = Grant::new(funder, start, periods(unlock), periods(ownership));
    h.vesting_mut()
        .create_locked_account(target, grant, false, start)
        .unwrap();
}
