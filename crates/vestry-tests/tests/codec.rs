//! Persisted state survives the binary codec and JSON unchanged.

use num_bigint::BigUint;
use vestry_core::amount::Amount;
use vestry_core::codec;
use vestry_core::constants::DAY_SECONDS;
use vestry_core::period::Period;
use vestry_core::types::Timestamp;
use vestry_liquid::{GenesisState, LiquidAsset};
use vestry_tests::helpers::*;
use vestry_vesting::account::{Account, LockedAccount};

const START: Timestamp = 1_700_000_000;

/// Amounts past `u64::MAX` must survive too.
fn huge() -> LiquidAsset {
    let amount: BigUint = "123456789012345678901234567890".parse().unwrap();
    LiquidAsset::new(12, ASSET, START, vec![Period::new(DAY_SECONDS, Amount::coin(ASSET, amount))]).unwrap()
}

fn traded_state() -> (LockedAccount, LiquidAsset) {
    let (funder, holder, buyer) = (addr(9), addr(1), addr(2));
    let mut h = harness(funder, 1_000_000);
    grant(&mut h, funder, holder, START, &[(DAY_SECONDS, 250_000); 4], &[]);
    let asset = h
        .liquidate(&holder, &buyer, ASSET, &big(333_333), START + DAY_SECONDS / 7)
        .unwrap();
    (h.vesting().locked_account(&holder).unwrap(), asset)
}

#[test]
fn locked_account_binary_round_trip() {
    let (account, _) = traded_state();
    let bytes = codec::encode(&account).unwrap();
    let decoded: LockedAccount = codec::decode(&bytes).unwrap();
    assert_eq!(decoded, account);

    let wrapped = Account::from(account);
    let decoded: Account = codec::decode(&codec::encode(&wrapped).unwrap()).unwrap();
    assert_eq!(decoded, wrapped);
}

#[test]
fn liquid_asset_binary_round_trip() {
    let (_, asset) = traded_state();
    let decoded: LiquidAsset = codec::decode(&codec::encode(&asset).unwrap()).unwrap();
    assert_eq!(decoded, asset);

    let big_asset = huge();
    let decoded: LiquidAsset = codec::decode(&codec::encode(&big_asset).unwrap()).unwrap();
    assert_eq!(decoded.total(), big_asset.total());
}

#[test]
fn amounts_are_decimal_strings_in_json() {
    let json = serde_json::to_string(&huge()).unwrap();
    assert!(json.contains("\"123456789012345678901234567890\""));
    let decoded: LiquidAsset = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, huge());
}

#[test]
fn genesis_json_round_trip() {
    let (_, asset) = traded_state();
    let state = GenesisState {
        asset_counter: 13,
        assets: vec![asset, huge()],
        ..GenesisState::default()
    };
    let json = state.to_json().unwrap();
    assert_eq!(GenesisState::from_json(&json).unwrap(), state);
}

#[test]
fn truncated_bytes_rejected() {
    let (account, _) = traded_state();
    let bytes = codec::encode(&account).unwrap();
    assert!(codec::decode::<LockedAccount>(&bytes[..bytes.len() - 1]).is_err());
}
