/// Height of one layout grid row in pixels. Both the template span and the
/// grid gap are converted with this factor before fitting.
pub const GRID_ROW_HEIGHT_PX: f64 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    pub paginated: bool,
    pub rows_per_page: usize,
    pub total_content_height: f64,
}

/// Decides whether `row_count` rows of `unit_height`, separated by
/// `gap_height`, overflow `available_height`, and how many fit on one page.
pub fn fit(unit_height: f64, gap_height: f64, row_count: usize, available_height: f64) -> Fit {
    let gaps = row_count.saturating_sub(1) as f64;
    let total_content_height = unit_height * row_count as f64 + gap_height * gaps;
    let pitch = unit_height + gap_height;

    let usable = pitch > 0.0
        && pitch.is_finite()
        && available_height.is_finite()
        && total_content_height.is_finite();
    if !usable {
        return Fit {
            paginated: false,
            rows_per_page: 0,
            total_content_height,
        };
    }

    let rows_per_page = (available_height.max(0.0) / pitch).floor() as usize;
    Fit {
        paginated: total_content_height > available_height,
        rows_per_page,
        total_content_height,
    }
}

/// Same as [`fit`], with heights given in grid rows.
pub fn fit_grid_rows(unit_rows: i64, gap_rows: i64, row_count: usize, available_height: f64) -> Fit {
    fit(
        unit_rows as f64 * GRID_ROW_HEIGHT_PX,
        gap_rows as f64 * GRID_ROW_HEIGHT_PX,
        row_count,
        available_height,
    )
}

pub fn page_count(row_count: usize, rows_per_page: usize) -> usize {
    if rows_per_page == 0 {
        return 0;
    }
    row_count.div_ceil(rows_per_page)
}

/// The rows of `page` (1-based) when paginated, every row otherwise.
pub fn slice<T>(clones: &[T], page: usize, rows_per_page: usize, paginated: bool) -> &[T] {
    if !paginated {
        return clones;
    }
    let start = page
        .saturating_sub(1)
        .saturating_mul(rows_per_page)
        .min(clones.len());
    let end = page.saturating_mul(rows_per_page).min(clones.len());
    &clones[start..end]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    per_page: Option<usize>,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PageState {
    pub fn new(per_page: Option<usize>) -> Self {
        Self {
            current_page: 1,
            per_page,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Moves to `page`, clamped to `[1, page_count]`. Returns whether the page changed.
    pub fn set_page(&mut self, page: usize, page_count: usize) -> bool {
        let clamped = page.clamp(1, page_count.max(1));
        if clamped == self.current_page {
            return false;
        }
        self.current_page = clamped;
        true
    }

    /// Resets to page 1 when the configured page size changed upstream.
    pub fn sync_per_page(&mut self, per_page: Option<usize>) -> bool {
        if per_page == self.per_page {
            return false;
        }
        self.per_page = per_page;
        self.current_page = 1;
        true
    }

    /// Pulls the current page back inside range after the row count shrank.
    pub fn clamp_to(&mut self, page_count: usize) {
        self.current_page = self.current_page.clamp(1, page_count.max(1));
    }
}
