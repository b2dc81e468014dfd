use crate::category::Category;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing upload activity.
#[derive(Default)]
pub struct DocumentMetrics {
    documents_processed: AtomicU64,
    uploads_rejected: AtomicU64,
    per_category: [AtomicU64; Category::ALL.len()],
}

impl DocumentMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document that was classified and filed under `category`.
    pub fn record_document(&self, category: Category) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.per_category[category.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Record an upload turned away before processing (missing file or wrong type).
    pub fn record_rejected(&self) {
        self.uploads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            uploads_rejected: self.uploads_rejected.load(Ordering::Relaxed),
            per_category: Category::ALL
                .iter()
                .map(|category| {
                    (
                        *category,
                        self.per_category[category.index()].load(Ordering::Relaxed),
                    )
                })
                .collect(),
        }
    }
}

/// Immutable view of upload counters used for reporting.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Documents classified and filed since startup.
    pub documents_processed: u64,
    /// Uploads ignored because no PDF was supplied.
    pub uploads_rejected: u64,
    /// Filed documents per category, in category order.
    pub per_category: Vec<(Category, u64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_documents_per_category() {
        let metrics = DocumentMetrics::new();
        metrics.record_document(Category::Finance);
        metrics.record_document(Category::Finance);
        metrics.record_document(Category::Legal);
        metrics.record_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_processed, 3);
        assert_eq!(snapshot.uploads_rejected, 1);
        assert_eq!(snapshot.per_category[0], (Category::Finance, 2));
        assert_eq!(snapshot.per_category[1], (Category::Legal, 1));
        assert_eq!(snapshot.per_category[2], (Category::Hr, 0));
    }

    #[test]
    fn snapshot_starts_empty() {
        let snapshot = DocumentMetrics::new().snapshot();
        assert_eq!(snapshot.documents_processed, 0);
        assert_eq!(snapshot.per_category.len(), Category::ALL.len());
        assert!(snapshot.per_category.iter().all(|(_, count)| *count == 0));
    }
}
