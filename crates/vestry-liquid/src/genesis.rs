//! Genesis import and export of the liquid asset registry.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use vestry_core::error::LiquidError;

use crate::asset::LiquidAsset;
use crate::params::Params;
use crate::store::LiquidAssetStore;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GenesisState {
    pub params: Params,
    /// Number the next liquid asset will take.
    pub asset_counter: u64,
    pub assets: Vec<LiquidAsset>,
}

impl GenesisState {
    /// Check params, every asset, that ids are unique, and that every id is
    /// below the counter.
    pub fn validate(&self) -> Result<(), LiquidError> {
        self.params.validate()?;
        let mut seen = BTreeSet::new();
        for asset in &self.assets {
            asset.validate()?;
            let id = asset
                .id()
                .ok_or_else(|| LiquidError::InvalidGenesis(format!("bad liquid id {}", asset.base_id)))?;
            if !seen.insert(id) {
                return Err(LiquidError::InvalidGenesis(format!(
                    "duplicate liquid asset {}",
                    asset.base_id
                )));
            }
            if id >= self.asset_counter {
                return Err(LiquidError::InvalidGenesis(format!(
                    "{} is not below counter {}",
                    asset.base_id, self.asset_counter
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, LiquidError> {
        let state: Self =
            serde_json::from_str(json).map_err(|e| LiquidError::InvalidGenesis(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, LiquidError> {
        serde_json::to_string_pretty(self).map_err(|e| LiquidError::InvalidGenesis(e.to_string()))
    }
}

/// Load `state` into `store` and return its params. Nothing is written when
/// the state is invalid.
pub fn init_genesis<A: LiquidAssetStore>(store: &mut A, state: &GenesisState) -> Result<Params, LiquidError> {
    state.validate()?;
    store.set_counter(state.asset_counter);
    for asset in &state.assets {
        store.put(asset.clone());
    }
    Ok(state.params.clone())
}

pub fn export_genesis<A: LiquidAssetStore>(store: &A, params: &Params) -> GenesisState {
    GenesisState {
        params: params.clone(),
        asset_counter: store.counter(),
        assets: store.all(),
    }
}
