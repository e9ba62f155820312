use serde_json::{json, Value};

use crate::state::action::{self, ActionCallback, ActionExecutor};
use crate::state::binding::BindingSet;
use crate::state::config::{ListConfig, StateStore, CHILD_AUTOCOMPLETE};
use crate::state::data_model::ShapeTracker;
use crate::state::element::ElementDescriptor;
use crate::state::evaluator::ExpressionEvaluator;
use crate::state::expander::{self, ClonedRow, CloneError, ExpandOutcome, Patcher};
use crate::state::pagination::{self, Fit, PageState};

pub const DEFAULT_LIST_HEIGHT_PX: f64 = 400.0;

/// The first child of the list's canvas is the row template.
pub fn template_of(canvas: &ElementDescriptor) -> Result<&ElementDescriptor, CloneError> {
    canvas.children.first().ok_or(CloneError::MissingTemplate)
}

/// Output of one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedList {
    pub rows: Vec<ClonedRow>,
    pub fit: Fit,
    pub rows_per_page: usize,
    pub current_page: usize,
    pub page_count: usize,
    pub total_rows: usize,
    /// Set when this pass reused the previous rows because expansion failed.
    pub fallback: Option<CloneError>,
}

impl RenderedList {
    /// True when there is no data and the host should show its placeholder.
    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }

    pub fn paginated(&self) -> bool {
        self.fit.paginated
    }
}

/// State owned by one list widget instance across render passes.
#[derive(Clone, Debug, Default)]
pub struct ListWidgetState {
    page: PageState,
    shape: ShapeTracker,
    previous: Option<Vec<ClonedRow>>,
}

impl ListWidgetState {
    pub fn new(config: &ListConfig) -> Self {
        let shape = match config.published_shape() {
            Some(shape) if !shape.is_empty() => ShapeTracker::with_published(shape),
            _ => ShapeTracker::new(),
        };
        Self {
            page: PageState::new(config.pagination_per_page),
            shape,
            previous: None,
        }
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    /// Reacts to a configuration change: resets the page when the configured
    /// page size moved, and returns the `childAutoComplete` payload when the
    /// first row's field set changed.
    pub fn observe(&mut self, config: &ListConfig) -> Option<Value> {
        self.page.sync_per_page(config.pagination_per_page);
        self.shape
            .observe(&config.items)
            .map(|shape| json!({ "currentItem": shape }))
    }

    /// [`Self::observe`], publishing the new shape to `store`. Returns whether
    /// anything was published.
    pub fn sync_config<S: StateStore + ?Sized>(&mut self, config: &ListConfig, store: &mut S) -> bool {
        match self.observe(config) {
            Some(payload) => {
                store.update_widget_property(CHILD_AUTOCOMPLETE, payload);
                true
            }
            None => false,
        }
    }

    /// Rebuilds every row from the template, then fits and slices the
    /// current page. `available_height` is in pixels.
    pub fn render(
        &mut self,
        config: &ListConfig,
        canvas: &ElementDescriptor,
        evaluator: &dyn ExpressionEvaluator,
        available_height: f64,
    ) -> Result<RenderedList, CloneError> {
        let items = config.items();
        let row_count = items.len();

        let attempt = if row_count == 0 {
            Ok(Vec::new())
        } else {
            template_of(canvas).and_then(|template| {
                let bindings = if config.dynamic_binding_path_list.is_empty() {
                    BindingSet::new()
                } else {
                    evaluator
                        .evaluate(&config.dynamic_binding_path_list, template, &items)
                        .unwrap_or_else(|err| {
                            log::warn!("failed to evaluate bindings of {}: {err}", config.widget_name);
                            BindingSet::new()
                        })
                };
                let patcher = Patcher::new(template, &bindings, config.render_mode)
                    .grid_gap(config.grid_gap)
                    .background_color(Some(config.item_background_color.as_str()))
                    .action(config.on_list_item_click.as_deref());
                expander::expand_rows(template, row_count, &patcher)
            })
        };

        let outcome = expander::with_fallback(attempt, self.previous.as_deref())?;
        let fallback = outcome.error().cloned();
        if let ExpandOutcome::Fresh(rows) = &outcome {
            self.previous = Some(rows.clone());
        }
        let rows = outcome.into_rows();

        let unit_rows = rows
            .first()
            .map(|row| row.element.span.row_span())
            .unwrap_or(0);
        let fit = pagination::fit_grid_rows(
            unit_rows,
            config.grid_gap.max(0),
            rows.len(),
            available_height,
        );
        // A viewport shorter than one row still pages through rows one at a time.
        let rows_per_page = if fit.paginated {
            fit.rows_per_page.max(1)
        } else {
            rows.len()
        };
        let page_count = if fit.paginated {
            pagination::page_count(rows.len(), rows_per_page)
        } else {
            1
        };
        self.page.clamp_to(page_count);

        let current_page = self.page.current_page();
        let mut visible =
            pagination::slice(&rows, current_page, rows_per_page, fit.paginated).to_vec();
        expander::restack(&mut visible);

        log::trace!(
            "{}: {} rows, page {current_page}/{page_count}, {} visible",
            config.widget_name,
            rows.len(),
            visible.len()
        );

        Ok(RenderedList {
            rows: visible,
            fit,
            rows_per_page,
            current_page,
            page_count,
            total_rows: rows.len(),
            fallback,
        })
    }

    /// Handles a page-change click. Out-of-range requests are clamped.
    pub fn set_page(&mut self, page: usize, page_count: usize) -> bool {
        self.page.set_page(page, page_count)
    }

    /// Runs the configured click action for `row_index` with that row as context.
    pub fn on_item_click(
        &self,
        config: &ListConfig,
        row_index: usize,
        executor: &dyn ActionExecutor,
        callback: Option<ActionCallback>,
    ) -> bool {
        action::dispatch_click(
            executor,
            config.on_list_item_click.as_deref(),
            row_index,
            &config.items(),
            callback,
        )
    }
}

/// Height the list may fill, taken from the canvas's own row span.
pub fn available_height(canvas: &ElementDescriptor) -> f64 {
    let rows = canvas.span.row_span();
    if rows > 0 {
        rows as f64 * pagination::GRID_ROW_HEIGHT_PX
    } else {
        DEFAULT_LIST_HEIGHT_PX
    }
}
