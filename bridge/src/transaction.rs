//! Write-buffering storage transactions.
//!
//! `ibc_packet_receive` has to return `Ok` with an error acknowledgement when
//! processing fails, so the host will not roll back for us. Receive logic runs
//! against a [`StorageTransaction`] instead; its writes reach contract storage
//! only when the whole packet succeeded.

use std::collections::BTreeMap;
use std::ops::Bound;

use cosmwasm_std::{Order, Record, Storage};

/// Storage view that records writes in memory on top of a read-only base.
pub struct StorageTransaction<'a> {
    base: &'a dyn Storage,
    /// `None` marks a removal
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

/// Writes collected by a finished transaction.
pub struct PendingWrites(BTreeMap<Vec<u8>, Option<Vec<u8>>>);

impl<'a> StorageTransaction<'a> {
    pub fn new(base: &'a dyn Storage) -> Self {
        StorageTransaction {
            base,
            writes: BTreeMap::new(),
        }
    }

    pub fn into_writes(self) -> PendingWrites {
        PendingWrites(self.writes)
    }
}

impl PendingWrites {
    pub fn commit(self, storage: &mut dyn Storage) {
        for (key, value) in self.0 {
            match value {
                Some(value) => storage.set(&key, &value),
                None => storage.remove(&key),
            }
        }
    }
}

impl Storage for StorageTransaction<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(value) => value.clone(),
            None => self.base.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Box::new(std::iter::empty());
            }
        }

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.base.range(start, end, Order::Ascending).collect();

        let lower = start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_vec()));
        let upper = end.map_or(Bound::Unbounded, |e| Bound::Excluded(e.to_vec()));
        for (key, value) in self.writes.range((lower, upper)) {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        let records: Vec<Record> = merged.into_iter().collect();
        match order {
            Order::Ascending => Box::new(records.into_iter()),
            Order::Descending => Box::new(records.into_iter().rev()),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }
}

/// Run `action` against a transaction over `storage`, committing its writes
/// only if it returns `Ok`.
pub fn transactional<T, E>(
    storage: &mut dyn Storage,
    action: impl FnOnce(&mut dyn Storage) -> Result<T, E>,
) -> Result<T, E> {
    let mut tx = StorageTransaction::new(&*storage);
    let result = action(&mut tx);
    let writes = tx.into_writes();
    if result.is_ok() {
        writes.commit(storage);
    }
    result
}
