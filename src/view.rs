//! Pagination and search-mode projection over the record set.

use crate::types::{PageInfo, Record, RecordId};

/// Derived view state: which subset of records is active and which page of
/// it is visible.
///
/// Invariants, re-established after every mutation and transition:
/// `total_pages == max(1, ceil(active_len / page_size))` and
/// `1 <= current_page <= total_pages`. The active source is the search
/// subset while a search is active, the full record set otherwise.
#[derive(Debug)]
pub struct ViewState {
    /// Transient search subset. `Some` is search mode.
    filtered: Option<Vec<Record>>,
    current_page: usize,
    total_pages: usize,
    page_size: usize,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filtered: None,
            current_page: 1,
            total_pages: 1,
            // A zero page size would make every page empty and the page
            // count undefined; clamp rather than panic.
            page_size: page_size.max(1),
        }
    }

    pub fn is_search_active(&self) -> bool {
        self.filtered.is_some()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The active source: the search subset while searching, else `full`.
    pub fn active<'a>(&'a self, full: &'a [Record]) -> &'a [Record] {
        match &self.filtered {
            Some(filtered) => filtered,
            None => full,
        }
    }

    /// Enter search mode over a non-empty match set. Resets to page 1.
    pub fn enter_search(&mut self, matches: Vec<Record>) {
        self.filtered = Some(matches);
        self.current_page = 1;
        self.refresh(0);
    }

    /// Leave search mode and discard the subset. Resets to page 1.
    pub fn exit_search(&mut self, full_len: usize) {
        self.filtered = None;
        self.current_page = 1;
        self.refresh(full_len);
    }

    /// Recompute page bounds against the active source after the underlying
    /// set changed size. `full_len` is only consulted outside search mode.
    pub fn refresh(&mut self, full_len: usize) {
        let active_len = match &self.filtered {
            Some(filtered) => filtered.len(),
            None => full_len,
        };
        self.total_pages = active_len.div_ceil(self.page_size).max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    /// Set the current page, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages);
    }

    /// The current page of the active source. Empty when the source is.
    pub fn page_slice<'a>(&'a self, full: &'a [Record]) -> &'a [Record] {
        let active = self.active(full);
        let start = (self.current_page - 1) * self.page_size;
        if start >= active.len() {
            return &[];
        }
        let end = (start + self.page_size).min(active.len());
        &active[start..end]
    }

    /// Counters for the table header and pagination controls.
    pub fn info(&self, full: &[Record]) -> PageInfo {
        PageInfo {
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_rows: self.active(full).len(),
            visible_rows: self.page_slice(full).len(),
            search_active: self.is_search_active(),
        }
    }

    /// Drop one record from the search subset, if searching. Returns
    /// whether the subset held it.
    pub(crate) fn remove_filtered(&mut self, id: RecordId) -> bool {
        let Some(filtered) = &mut self.filtered else {
            return false;
        };
        let Some(pos) = filtered.iter().position(|r| r.id == id) else {
            return false;
        };
        filtered.remove(pos);
        true
    }
}
