use std::ops::Range;

use dashboard_logging::dash_debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Page/page-size/offset state used to slice a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    pub page: usize,
    pub per_page: usize,
    pub offset: usize,
    pub total_items: usize,
}

impl PaginationWindow {
    /// First page of an empty view. A zero page size falls back to one.
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            offset: 0,
            total_items: 0,
        }
    }

    /// Moves to `page`. Page 0 is the same as page 1, and pages past the end
    /// clamp to the last page so that `offset <= total_items`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1).min(self.page_count());
        self.offset = offset_for(self.page, self.per_page);
    }

    pub fn set_page_size(&mut self, page: usize, per_page: usize) -> Result<(), PaginationError> {
        if per_page == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        self.per_page = per_page;
        self.set_page(page);
        Ok(())
    }

    /// Updates the item count, re-clamping the current page.
    pub fn set_total(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.set_page(self.page);
    }

    /// Page that would show the current first item under `per_page`.
    pub fn page_keeping_first_item(&self, per_page: usize) -> usize {
        self.offset / per_page.max(1) + 1
    }

    /// Number of pages; an empty view still has one (empty) page.
    pub fn page_count(&self) -> usize {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    /// Index range of the current page, clamped to `total_items`.
    pub fn range(&self) -> Range<usize> {
        let end = (self.offset + self.per_page).min(self.total_items);
        self.offset.min(end)..end
    }
}

/// Start offset of a 1-based page; page 0 is treated as page 1.
pub fn offset_for(page: usize, per_page: usize) -> usize {
    if page > 0 {
        (page - 1) * per_page
    } else {
        0
    }
}

/// `view[start..end)` clamped to the view's length.
pub fn slice<T>(view: &[T], start: usize, end: usize) -> &[T] {
    let end = end.min(view.len());
    let start = start.min(end);
    &view[start..end]
}

/// Outcome of checking whether a page is backed by loaded results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadDecision {
    /// Everything the page needs is loaded, or the server has nothing more.
    Satisfied,
    /// An append is already on its way.
    InFlight,
    /// Fetch `size` more results starting at `offset`.
    Fetch { offset: usize, size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAppend {
    pub seq: u64,
    pub offset: usize,
}

/// Tracks the single in-flight append for server-paged domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncrementalLoader {
    pending: Option<PendingAppend>,
}

impl IncrementalLoader {
    /// Decides whether showing `page` of `window` needs more results.
    ///
    /// `loaded` is the number of results held locally and `server_total` the
    /// number the server reported for the current query.
    pub fn ensure_loaded(
        &self,
        window: &PaginationWindow,
        page: usize,
        loaded: usize,
        server_total: usize,
    ) -> LoadDecision {
        let needed_end = (offset_for(page, window.per_page) + window.per_page).min(server_total);
        if needed_end <= loaded || loaded >= server_total {
            return LoadDecision::Satisfied;
        }
        if self.pending.is_some() {
            return LoadDecision::InFlight;
        }
        let size = (needed_end - loaded).max(window.per_page);
        dash_debug!("append needed offset={loaded} size={size} page={page}");
        LoadDecision::Fetch {
            offset: loaded,
            size,
        }
    }

    pub fn mark_pending(&mut self, seq: u64, offset: usize) {
        self.pending = Some(PendingAppend { seq, offset });
    }

    pub fn pending(&self) -> Option<PendingAppend> {
        self.pending
    }

    /// Claims the pending append if `seq` is the one in flight.
    pub fn complete(&mut self, seq: u64) -> Option<PendingAppend> {
        match self.pending {
            Some(pending) if pending.seq == seq => self.pending.take(),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.pending = None;
    }
}
