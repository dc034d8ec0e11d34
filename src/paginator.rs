use crate::core::{CardRecord, PageProgress};

/// Cursor over the current result set, handing out fixed-size pages.
///
/// Invariant: `cursor <= results.len()`. A fresh paginator behaves as if
/// reset with an empty result set.
#[derive(Debug, Clone, Default)]
pub struct ResultPaginator {
    results: Vec<CardRecord>,
    cursor: usize,
}

impl ResultPaginator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the result set and rewind
    pub fn reset(&mut self, results: Vec<CardRecord>) {
        self.results = results;
        self.cursor = 0;
    }

    /// Next `page_size` cards, advancing the cursor. Empty once exhausted
    /// (or when `page_size` is 0, which leaves the cursor alone).
    pub fn next_page(&mut self, page_size: usize) -> Vec<CardRecord> {
        let end = self.cursor.saturating_add(page_size).min(self.results.len());
        let page = self.results[self.cursor..end].to_vec();
        self.cursor = end;

        tracing::debug!(
            "Emitted page of {} cards ({}/{})",
            page.len(),
            self.cursor,
            self.results.len()
        );
        page
    }

    pub fn has_more(&self) -> bool {
        self.cursor < self.results.len()
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    pub fn displayed_count(&self) -> usize {
        self.cursor
    }

    /// Cards already handed out, in order
    pub fn displayed(&self) -> &[CardRecord] {
        &self.results[..self.cursor]
    }

    pub fn results(&self) -> &[CardRecord] {
        &self.results
    }

    pub fn progress(&self) -> PageProgress {
        PageProgress {
            displayed: self.displayed_count(),
            total: self.total_count(),
            has_more: self.has_more(),
        }
    }
}
