//! Account storage interface and in-memory implementation.
//!
//! The store only keeps records; it performs no validation. Protocols read a
//! snapshot, compute the updated account, and write it back with
//! [`AccountStore::put`] once every precondition has been checked.

use std::collections::BTreeMap;

use vestry_core::types::Address;

use crate::account::Account;

/// Account records keyed by address.
///
/// Must offer read-your-writes within one protocol invocation.
pub trait AccountStore {
    /// Look up an account. Returns `None` if it was never created.
    fn get(&self, address: &Address) -> Option<Account>;

    /// Insert or overwrite the record at `account.address()`.
    fn put(&mut self, account: Account);
}

/// In-memory account store for testing.
#[derive(Clone, Debug, Default)]
pub struct MemoryAccountStore {
    accounts: BTreeMap<Address, Account>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All stored accounts in address order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}

impl AccountStore for MemoryAccountStore {
    fn get(&self, address: &Address) -> Option<Account> {
        self.accounts.get(address).cloned()
    }

    fn put(&mut self, account: Account) {
        self.accounts.insert(account.address(), account);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::BaseAccount;
    use crate::account::LockedAccount;
    use vestry_core::amount::Amount;
    use vestry_core::period::Period;

    #[test]
    fn new_store_is_empty() {
        let store = MemoryAccountStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(&Address([1; 20])), None);
    }

    #[test]
    fn put_overwrites_by_address() {
        let mut store = MemoryAccountStore::new();
        let addr = Address([1; 20]);
        store.put(BaseAccount::new(addr).into());
        let locked = LockedAccount::new(
            addr,
            Address([2; 20]),
            0,
            vec![Period::new(10, Amount::coin("aISLM", 5u64))],
            vec![Period::new(0, Amount::coin("aISLM", 5u64))],
        )
        .unwrap();
        store.put(locked.clone().into());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&addr), Some(Account::Locked(locked)));
    }
}
