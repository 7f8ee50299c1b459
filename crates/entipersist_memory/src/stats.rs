//! Operation counters for the memory persister.

use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters.
///
/// Counters only grow; [`MemoryPersister::destroy`](crate::MemoryPersister)
/// does not reset them.
#[derive(Debug, Default)]
pub struct MemoryStats {
    reads: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
}

impl MemoryStats {
    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_writes(&self, count: u64) {
        self.writes.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_deletes(&self, count: u64) {
        self.deletes.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of the counters.
    pub fn snapshot(&self) -> MemoryStatsSnapshot {
        MemoryStatsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`MemoryStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStatsSnapshot {
    /// Read operations (`count`, `exists_by`, `find_all`, `find_by`).
    pub reads: u64,
    /// Records inserted or updated.
    pub writes: u64,
    /// Records removed.
    pub deletes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = MemoryStats::default();
        stats.record_read();
        stats.record_writes(3);
        stats.record_deletes(2);
        stats.record_writes(1);

        assert_eq!(
            stats.snapshot(),
            MemoryStatsSnapshot {
                reads: 1,
                writes: 4,
                deletes: 2,
            }
        );
    }
}
