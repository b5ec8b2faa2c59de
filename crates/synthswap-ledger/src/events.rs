//! Append-only event log.

use chrono::{DateTime, Utc};
use synthswap_types::{EventRecord, LedgerEvent, TxId};

/// Every event emitted by a committed transaction, in commit order.
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the events of one committed transaction.
    pub fn append(
        &mut self,
        tx_id: TxId,
        emitted_at: DateTime<Utc>,
        events: impl IntoIterator<Item = LedgerEvent>,
    ) {
        for event in events {
            let sequence = self.records.len() as u64;
            self.records.push(EventRecord {
                sequence,
                tx_id,
                emitted_at,
                event,
            });
        }
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with `sequence >= from`.
    #[must_use]
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from).map_or(self.records.len(), |s| s.min(self.records.len()));
        &self.records[start..]
    }

    /// Records emitted by one transaction.
    pub fn for_tx(&self, tx_id: TxId) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().filter(move |r| r.tx_id == tx_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthswap_types::Address;

    fn deposit(amount: u64) -> LedgerEvent {
        LedgerEvent::VaultFundsDeposited {
            authority: Address([1u8; 32]),
            amount,
        }
    }

    #[test]
    fn sequences_are_contiguous_across_transactions() {
        let mut log = EventLog::new();
        let a = TxId::new();
        let b = TxId::new();
        log.append(a, Utc::now(), [deposit(1), deposit(2)]);
        log.append(b, Utc::now(), [deposit(3)]);
        let seqs: Vec<u64> = log.records().iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(log.for_tx(a).count(), 2);
        assert_eq!(log.since(2).len(), 1);
        assert!(log.since(99).is_empty());
    }
}
