/// The `DataGrid` facade.
///
/// Owns the source rows and every piece of grid state: the query, the
/// derived view, the selection and one viewport (pagination or infinite
/// scroll, fixed at construction by [`GridMode`]). User intents go in as
/// method calls; events and snapshots come out through subscribed
/// [`GridObserver`]s.
///
/// Query intents always reflow the same way: recompute the derived view,
/// bump the generation, reset the viewport to its first position, then
/// notify. Intents that name an unknown column, or one lacking the needed
/// capability, are ignored and return `false`.

use crate::column::{ColumnSet, FilterOption};
use crate::config::{GridConfig, GridMode};
use crate::error::{FetchError, GridError};
use crate::events::{GridEvent, GridObserver, GridSnapshot, SelectionSummary};
use crate::infinite::{FetchOutcome, FetchTicket, FetchedPage, InfiniteScroll};
use crate::pagination::Pagination;
use crate::query::{next_sort, Filter, FilterOperator, FilterSet, Query, RowIndices, SearchSpec, SortSpec};
use crate::selection::Selection;
use crate::value::{CellValue, Record};
use std::hash::Hash;

/// Maps a row and its position in the source collection to its identity.
pub type RowIdFn<R, Id> = Box<dyn Fn(&R, usize) -> Id>;

#[derive(Debug, Clone)]
enum Viewport {
    Paged(Pagination),
    Infinite(InfiniteScroll),
}

pub struct DataGrid<R, Id: Eq + Hash = usize> {
    rows: Vec<R>,
    columns: ColumnSet,
    row_id: RowIdFn<R, Id>,
    page_size_options: Vec<usize>,
    query: Query,
    view: RowIndices,
    viewport: Viewport,
    selection: Selection<Id>,
    generation: u64,
    observers: Vec<Box<dyn GridObserver<Id>>>,
}

impl<R: Record + 'static> DataGrid<R, usize> {
    /// A grid whose row identity is the row's position in the source
    /// collection. Positions are stable across sorting, filtering and
    /// paging, but not across [`replace_rows`](Self::replace_rows): a
    /// selection made before a replacement points at whatever rows now
    /// occupy those positions.
    pub fn with_positional_ids(rows: Vec<R>, columns: ColumnSet, config: GridConfig) -> Result<Self, GridError> {
        DataGrid::new(rows, columns, config, |_, index| index)
    }
}

impl<R: Record, Id: Eq + Hash + Clone> DataGrid<R, Id> {
    pub fn new<F>(rows: Vec<R>, columns: ColumnSet, config: GridConfig, row_id: F) -> Result<Self, GridError>
    where
        F: Fn(&R, usize) -> Id + 'static,
    {
        config.validate()?;
        let viewport = match config.mode {
            GridMode::Pagination => Viewport::Paged(Pagination::new(config.page_size)?),
            GridMode::Infinite => Viewport::Infinite(InfiniteScroll::new(config.initial_window, config.batch_size)?),
        };

        let mut grid = DataGrid {
            rows,
            columns,
            row_id: Box::new(row_id),
            page_size_options: config.page_size_options,
            query: Query::new(),
            view: RowIndices::new(),
            viewport,
            selection: Selection::new(),
            generation: 0,
            observers: Vec::new(),
        };
        grid.refresh();
        log::debug!(
            "created {} grid with {} rows and {} columns",
            config.mode,
            grid.rows.len(),
            grid.columns.len()
        );
        Ok(grid)
    }

    pub fn subscribe<O: GridObserver<Id> + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    // Accessors

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn mode(&self) -> GridMode {
        match self.viewport {
            Viewport::Paged(_) => GridMode::Pagination,
            Viewport::Infinite(_) => GridMode::Infinite,
        }
    }

    /// Bumped on every reflow.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Source positions of every row matching the query, in display order.
    pub fn matched_indices(&self) -> &[usize] {
        &self.view
    }

    pub fn matched_len(&self) -> usize {
        self.view.len()
    }

    /// Source positions of the rows on the current page (or in the loaded
    /// window), in display order.
    pub fn visible_indices(&self) -> &[usize] {
        match &self.viewport {
            Viewport::Paged(pages) => pages.slice(&self.view),
            Viewport::Infinite(scroll) => scroll.slice(&self.view),
        }
    }

    pub fn visible_rows(&self) -> Vec<&R> {
        self.visible_indices().iter().map(|&i| &self.rows[i]).collect()
    }

    pub fn visible_ids(&self) -> Vec<Id> {
        self.visible_indices()
            .iter()
            .map(|&i| (self.row_id)(&self.rows[i], i))
            .collect()
    }

    /// Identity of the row at `index` in the source collection.
    pub fn row_id(&self, index: usize) -> Option<Id> {
        self.rows.get(index).map(|row| (self.row_id)(row, index))
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        match &self.viewport {
            Viewport::Paged(pages) => Some(pages),
            Viewport::Infinite(_) => None,
        }
    }

    pub fn scroll(&self) -> Option<&InfiniteScroll> {
        match &self.viewport {
            Viewport::Infinite(scroll) => Some(scroll),
            Viewport::Paged(_) => None,
        }
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn selection(&self) -> &Selection<Id> {
        &self.selection
    }

    pub fn is_selected(&self, id: &Id) -> bool {
        self.selection.contains(id)
    }

    pub fn is_all_visible_selected(&self) -> bool {
        self.selection.is_all_selected(&self.visible_ids())
    }

    pub fn is_indeterminate(&self) -> bool {
        self.selection.is_indeterminate(&self.visible_ids())
    }

    /// Distinct values of a filterable column across the source rows.
    pub fn filter_options(&self, column: &str) -> Vec<FilterOption> {
        if !self.columns.is_filterable(column) {
            return Vec::new();
        }
        self.columns.filter_options(&self.rows, column)
    }

    pub fn snapshot(&self) -> GridSnapshot<Id> {
        let rows = self.visible_indices().to_vec();
        let ids: Vec<Id> = rows.iter().map(|&i| (self.row_id)(&self.rows[i], i)).collect();
        let (visible, visible_selected) = self.selection.count_visible(&ids);

        GridSnapshot {
            generation: self.generation,
            query: self.query.clone(),
            matched: self.view.len(),
            rows,
            ids,
            pagination: self.pagination().map(Pagination::state),
            scroll: self.scroll().map(InfiniteScroll::state),
            selection: SelectionSummary {
                selected: self.selection.len(),
                visible_selected,
                all_visible_selected: visible > 0 && visible == visible_selected,
                indeterminate: visible_selected > 0 && visible_selected < visible,
            },
        }
    }

    // Query intents

    /// Advances `column` through ascending -> descending -> unsorted.
    pub fn toggle_sort(&mut self, column: &str) -> bool {
        if !self.columns.is_sortable(column) {
            log::debug!("ignoring sort on non-sortable column '{}'", column);
            return false;
        }
        self.set_sort(next_sort(self.query.sort(), column))
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> bool {
        if let Some(spec) = &sort {
            if !self.columns.is_sortable(&spec.column) {
                log::debug!("ignoring sort on non-sortable column '{}'", spec.column);
                return false;
            }
        }
        let event = GridEvent::Sort { sort: sort.clone() };
        self.change_query(self.query.clone().with_sort(sort), event)
    }

    /// Sets the filter on `column`, replacing any previous one. An empty
    /// value clears the column's filter instead.
    pub fn set_filter(&mut self, column: &str, value: impl Into<CellValue>, operator: FilterOperator) -> bool {
        if !self.columns.is_filterable(column) {
            log::debug!("ignoring filter on non-filterable column '{}'", column);
            return false;
        }
        let value = value.into();
        let query = if value.is_empty() {
            self.query.clone().without_filter(column)
        } else {
            self.query.clone().with_filter(Filter::new(column, value, operator))
        };
        let event = GridEvent::Filter {
            filters: query.filters().to_vec(),
        };
        self.change_query(query, event)
    }

    pub fn clear_filter(&mut self, column: &str) -> bool {
        let query = self.query.clone().without_filter(column);
        let event = GridEvent::Filter {
            filters: query.filters().to_vec(),
        };
        self.change_query(query, event)
    }

    pub fn clear_filters(&mut self) -> bool {
        let query = self.query.clone().with_filters(FilterSet::new());
        self.change_query(query, GridEvent::Filter { filters: Vec::new() })
    }

    /// Searches every searchable column.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let columns = self.columns.searchable_keys();
        self.search(term.into(), columns)
    }

    /// Searches the given columns. Columns that are unknown or not
    /// searchable are dropped; if none remain the intent is ignored.
    pub fn set_search_in<I, S>(&mut self, term: impl Into<String>, columns: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requested: Vec<String> = columns.into_iter().map(Into::into).collect();
        let (columns, ignored): (Vec<String>, Vec<String>) =
            requested.into_iter().partition(|c| self.columns.is_searchable(c));
        if !ignored.is_empty() {
            log::debug!("ignoring non-searchable columns in search: {:?}", ignored);
            if columns.is_empty() {
                return false;
            }
        }
        self.search(term.into(), columns)
    }

    fn search(&mut self, term: String, columns: Vec<String>) -> bool {
        let event = GridEvent::Search {
            term: term.clone(),
            columns: columns.clone(),
        };
        let query = self.query.clone().with_search(SearchSpec::new(term, columns));
        self.change_query(query, event)
    }

    /// Installs a new source collection. Selection is kept as is.
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        log::debug!("replacing {} rows with {}", self.rows.len(), rows.len());
        let previous_page = self.current_page();
        self.rows = rows;
        self.refresh();
        self.announce_page_reset(previous_page);
        self.publish();
    }

    fn change_query(&mut self, query: Query, event: GridEvent<Id>) -> bool {
        if query == self.query {
            return false;
        }
        let previous_page = self.current_page();
        self.query = query;
        self.refresh();
        self.emit(event);
        self.announce_page_reset(previous_page);
        self.publish();
        true
    }

    fn refresh(&mut self) {
        self.view = self.query.apply(&self.rows);
        self.generation += 1;
        let matched = self.view.len();
        match &mut self.viewport {
            Viewport::Paged(pages) => pages.reset(matched),
            Viewport::Infinite(scroll) => scroll.reset(matched),
        }
        log::debug!(
            "generation {}: {} of {} rows match",
            self.generation,
            matched,
            self.rows.len()
        );
    }

    fn current_page(&self) -> Option<usize> {
        self.pagination().map(Pagination::page)
    }

    fn announce_page_reset(&mut self, previous_page: Option<usize>) {
        if let Some(page) = self.current_page() {
            if previous_page != Some(page) {
                self.emit(GridEvent::PageChange { page });
            }
        }
    }

    // Pagination intents

    pub fn set_page(&mut self, page: usize) -> bool {
        self.move_page(|pages| pages.set_page(page))
    }

    pub fn next_page(&mut self) -> bool {
        self.move_page(Pagination::next)
    }

    pub fn previous_page(&mut self) -> bool {
        self.move_page(Pagination::previous)
    }

    fn move_page(&mut self, step: impl FnOnce(&mut Pagination) -> bool) -> bool {
        let page = match &mut self.viewport {
            Viewport::Paged(pages) => {
                if !step(pages) {
                    return false;
                }
                pages.page()
            }
            Viewport::Infinite(_) => {
                log::debug!("ignoring page change in infinite mode");
                return false;
            }
        };
        self.emit(GridEvent::PageChange { page });
        self.publish();
        true
    }

    /// Changes the page size and returns to page 1. Ignored in infinite
    /// mode.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<bool, GridError> {
        match &mut self.viewport {
            Viewport::Paged(pages) => {
                if pages.page_size() == page_size {
                    return Ok(false);
                }
                pages.set_page_size(page_size)?;
            }
            Viewport::Infinite(_) => {
                log::debug!("ignoring page size change in infinite mode");
                return Ok(false);
            }
        }
        self.emit(GridEvent::PageSizeChange { page_size });
        self.publish();
        Ok(true)
    }

    // Infinite scroll intents

    /// Proximity signal from the render surface. Starts a fetch when the
    /// scroll controller is idle and more rows match.
    pub fn near_end(&mut self) -> Option<FetchTicket> {
        let ticket = match &mut self.viewport {
            Viewport::Infinite(scroll) => scroll.near_end()?,
            Viewport::Paged(_) => return None,
        };
        self.emit(GridEvent::FetchNextPage { ticket });
        self.publish();
        Some(ticket)
    }

    /// Completes a fetch started by [`near_end`](Self::near_end). The rows
    /// already live in the grid, so success just widens the window by up to
    /// one batch.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<(), FetchError>) -> FetchOutcome {
        let matched = self.view.len();
        let outcome = match &mut self.viewport {
            Viewport::Infinite(scroll) => {
                let result = result.map(|()| FetchedPage {
                    received: ticket.limit().min(matched.saturating_sub(ticket.offset())),
                    total: matched,
                });
                scroll.complete(ticket, result)
            }
            Viewport::Paged(_) => {
                log::debug!("ignoring fetch completion in pagination mode");
                return FetchOutcome::Stale;
            }
        };
        if outcome != FetchOutcome::Stale {
            self.publish();
        }
        outcome
    }

    /// `near_end` followed by a successful completion.
    pub fn load_more(&mut self) -> Option<FetchOutcome> {
        let ticket = self.near_end()?;
        Some(self.complete_fetch(ticket, Ok(())))
    }

    // Selection intents

    pub fn select(&mut self, id: Id) -> bool {
        let changed = self.selection.select(id);
        self.selection_changed(changed)
    }

    pub fn deselect(&mut self, id: &Id) -> bool {
        let changed = self.selection.deselect(id);
        self.selection_changed(changed)
    }

    /// Flips one identity. Returns its new state.
    pub fn toggle(&mut self, id: Id) -> bool {
        let selected = self.selection.toggle(id);
        self.selection_changed(true);
        selected
    }

    pub fn select_all_visible(&mut self) -> bool {
        let visible = self.visible_ids();
        let changed = self.selection.select_all(&visible);
        self.selection_changed(changed)
    }

    pub fn deselect_all_visible(&mut self) -> bool {
        let visible = self.visible_ids();
        let changed = self.selection.deselect_all(&visible);
        self.selection_changed(changed)
    }

    /// Header checkbox: deselects the visible rows when all of them are
    /// selected, selects them otherwise.
    pub fn toggle_all_visible(&mut self) -> bool {
        if self.is_all_visible_selected() {
            self.deselect_all_visible()
        } else {
            self.select_all_visible()
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        self.selection_changed(changed)
    }

    fn selection_changed(&mut self, changed: bool) -> bool {
        if changed {
            let selected = self.selection.ids().clone();
            self.emit(GridEvent::SelectionChange { selected });
            self.publish();
        }
        changed
    }

    // Notification

    fn emit(&mut self, event: GridEvent<Id>) {
        for observer in self.observers.iter_mut() {
            observer.on_event(&event);
        }
    }

    fn publish(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in self.observers.iter_mut() {
            observer.on_snapshot(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDef;
    use crate::events::EventLog;
    use crate::infinite::ScrollPhase;
    use crate::value::{row, Row};

    const DEPARTMENTS: [&str; 3] = ["Engineering", "Sales", "HR"];

    fn staff(count: usize) -> Vec<Row> {
        (0..count)
            .map(|i| {
                row([
                    ("id", CellValue::from(i as i64 + 1)),
                    ("name", CellValue::from(format!("Person {:02}", i))),
                    ("department", CellValue::from(DEPARTMENTS[i % 3])),
                    ("salary", CellValue::from(40_000 + ((i * 37) % 50) as i64 * 1_000)),
                ])
            })
            .collect()
    }

    fn columns() -> ColumnSet {
        ColumnSet::new(vec![
            ColumnDef::new("id", "ID").sortable(),
            ColumnDef::new("name", "Name").sortable().searchable(),
            ColumnDef::new("department", "Department").filterable(),
            ColumnDef::new("salary", "Salary").sortable(),
        ])
        .unwrap()
    }

    fn grid(count: usize, config: GridConfig) -> DataGrid<Row, i64> {
        DataGrid::new(staff(count), columns(), config, |row: &Row, _| {
            row.value("id").as_i64().unwrap_or_default()
        })
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let grid = grid(30, GridConfig::paginated(10));
        assert_eq!(grid.mode(), GridMode::Pagination);
        assert_eq!(grid.matched_len(), 30);
        assert_eq!(grid.visible_indices(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(grid.pagination().unwrap().total_pages(), 3);
        assert!(grid.scroll().is_none());
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn test_empty_rows_both_modes() {
        let mut paged = grid(0, GridConfig::paginated(10));
        assert!(paged.visible_indices().is_empty());
        let pages = paged.pagination().unwrap();
        assert_eq!(pages.total_pages(), 0);
        assert_eq!(pages.page(), 1);
        assert_eq!(pages.item_range(), None);
        assert!(!paged.next_page());
        paged.select_all_visible();
        assert!(paged.selection().is_empty());
        assert!(!paged.snapshot().selection.all_visible_selected);
        assert!(!paged.snapshot().selection.indeterminate);

        let mut infinite = grid(0, GridConfig::infinite(10, 10));
        assert!(infinite.visible_indices().is_empty());
        assert!(!infinite.scroll().unwrap().has_next_page());
        assert_eq!(infinite.scroll().unwrap().phase(), ScrollPhase::Exhausted);
        assert_eq!(infinite.near_end(), None);
        assert_eq!(infinite.load_more(), None);
        assert!(!infinite.snapshot().selection.all_visible_selected);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GridConfig {
            page_size: 0,
            ..GridConfig::default()
        };
        let result = DataGrid::with_positional_ids(staff(3), columns(), config);
        assert!(matches!(result, Err(GridError::InvalidPageSize)));
    }

    #[test]
    fn test_toggle_sort_cycle_emits_events() {
        let mut grid = grid(5, GridConfig::default());
        let log = EventLog::shared();
        grid.subscribe(log.clone());

        assert!(grid.toggle_sort("salary"));
        assert!(grid.toggle_sort("salary"));
        assert!(grid.toggle_sort("salary"));

        let log = log.borrow();
        assert_eq!(
            log.events,
            vec![
                GridEvent::Sort {
                    sort: Some(SortSpec::ascending("salary"))
                },
                GridEvent::Sort {
                    sort: Some(SortSpec::descending("salary"))
                },
                GridEvent::Sort { sort: None },
            ]
        );
        assert_eq!(log.snapshots, 3);
        assert!(grid.query().sort().is_none());
        assert_eq!(grid.visible_indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_incapable_columns_ignored() {
        let mut grid = grid(5, GridConfig::default());
        let log = EventLog::shared();
        grid.subscribe(log.clone());

        assert!(!grid.toggle_sort("department"));
        assert!(!grid.toggle_sort("missing"));
        assert!(!grid.set_filter("salary", 1, FilterOperator::GreaterThan));
        assert!(!grid.set_search_in("x", ["salary"]));

        assert!(log.borrow().events.is_empty());
        assert_eq!(log.borrow().snapshots, 0);
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn test_filter_resets_page() {
        let mut grid = grid(30, GridConfig::paginated(5));
        let log = EventLog::shared();
        grid.subscribe(log.clone());

        assert!(grid.set_page(4));
        assert!(grid.set_filter("department", "Sales", FilterOperator::Equals));
        assert_eq!(grid.matched_len(), 10);
        assert_eq!(grid.pagination().unwrap().page(), 1);
        assert_eq!(grid.pagination().unwrap().total_pages(), 2);

        let log = log.borrow();
        let events = &log.events;
        assert_eq!(events[0], GridEvent::PageChange { page: 4 });
        assert!(matches!(&events[1], GridEvent::Filter { filters } if filters.len() == 1));
        assert_eq!(events[2], GridEvent::PageChange { page: 1 });
    }

    #[test]
    fn test_empty_filter_value_clears() {
        let mut grid = grid(9, GridConfig::default());
        grid.set_filter("department", "HR", FilterOperator::Equals);
        assert_eq!(grid.matched_len(), 3);

        assert!(grid.set_filter("department", "", FilterOperator::Equals));
        assert_eq!(grid.matched_len(), 9);
        assert!(grid.query().filters().is_empty());

        // Clearing an absent filter changes nothing.
        assert!(!grid.clear_filter("department"));
    }

    #[test]
    fn test_search_uses_searchable_columns() {
        let mut grid = grid(30, GridConfig::default());
        assert!(grid.set_search("person 1"));
        assert_eq!(grid.matched_len(), 10);
        assert_eq!(grid.query().search().columns, vec!["name".to_string()]);

        assert!(grid.set_search_in("person 2", ["name", "salary"]));
        assert_eq!(grid.query().search().columns, vec!["name".to_string()]);
        assert_eq!(grid.matched_len(), 10);

        assert!(grid.set_search(""));
        assert_eq!(grid.matched_len(), 30);
    }

    #[test]
    fn test_unchanged_query_is_noop() {
        let mut grid = grid(5, GridConfig::default());
        assert!(grid.set_sort(Some(SortSpec::ascending("name"))));
        let generation = grid.generation();
        assert!(!grid.set_sort(Some(SortSpec::ascending("name"))));
        assert_eq!(grid.generation(), generation);
    }

    #[test]
    fn test_set_page_size() {
        let mut grid = grid(30, GridConfig::paginated(10));
        grid.set_page(3);
        assert!(grid.set_page_size(25).unwrap());
        assert_eq!(grid.pagination().unwrap().page(), 1);
        assert_eq!(grid.visible_indices().len(), 25);
        assert!(!grid.set_page_size(25).unwrap());
        assert!(matches!(grid.set_page_size(0), Err(GridError::InvalidPageSize)));
        assert_eq!(grid.page_size_options(), &[10, 25, 50, 100]);
    }

    #[test]
    fn test_sticky_selection_across_filters() {
        let mut grid = grid(9, GridConfig::default());
        assert!(grid.select(2));
        grid.set_filter("department", "Engineering", FilterOperator::Equals);

        // id 2 is a Sales row and is now hidden.
        assert!(!grid.visible_ids().contains(&2));
        assert!(grid.is_selected(&2));
        let summary = grid.snapshot().selection;
        assert_eq!(summary.selected, 1);
        assert_eq!(summary.visible_selected, 0);

        grid.clear_filters();
        assert!(grid.visible_ids().contains(&2));
        assert!(grid.is_indeterminate());
    }

    #[test]
    fn test_select_all_visible_only_current_page() {
        let mut grid = grid(30, GridConfig::paginated(10));
        grid.select(30);
        assert!(grid.select_all_visible());
        assert_eq!(grid.selection().len(), 11);
        assert!(grid.is_all_visible_selected());

        grid.next_page();
        assert!(!grid.is_all_visible_selected());
        assert!(!grid.is_indeterminate());

        grid.previous_page();
        assert!(grid.toggle_all_visible());
        assert_eq!(grid.selection().len(), 1);
        assert!(grid.is_selected(&30));

        assert!(grid.clear_selection());
        assert!(!grid.clear_selection());
    }

    #[test]
    fn test_toggle_reports_state_and_event() {
        let mut grid = grid(3, GridConfig::default());
        let log = EventLog::shared();
        grid.subscribe(log.clone());

        assert!(grid.toggle(1));
        assert!(!grid.toggle(1));
        assert!(!grid.deselect(&1));

        let log = log.borrow();
        let events = &log.events;
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], GridEvent::SelectionChange { selected } if selected.contains(&1)));
        assert!(matches!(&events[1], GridEvent::SelectionChange { selected } if selected.is_empty()));
    }

    #[test]
    fn test_infinite_local_window() {
        let mut grid = grid(25, GridConfig::infinite(10, 10));
        assert_eq!(grid.mode(), GridMode::Infinite);
        assert_eq!(grid.visible_indices().len(), 10);

        let ticket = grid.near_end().unwrap();
        assert_eq!(grid.near_end(), None);
        assert!(grid.scroll().unwrap().is_fetching());

        let outcome = grid.complete_fetch(ticket, Ok(()));
        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                loaded: 20,
                phase: ScrollPhase::Idle
            }
        );

        assert!(matches!(grid.load_more(), Some(FetchOutcome::Applied { loaded: 25, phase: ScrollPhase::Exhausted })));
        assert_eq!(grid.visible_indices().len(), 25);
        assert_eq!(grid.load_more(), None);
    }

    #[test]
    fn test_infinite_query_change_makes_fetch_stale() {
        let mut grid = grid(30, GridConfig::infinite(5, 5));
        let ticket = grid.near_end().unwrap();

        grid.set_filter("department", "HR", FilterOperator::Equals);
        assert_eq!(grid.complete_fetch(ticket, Ok(())), FetchOutcome::Stale);
        assert_eq!(grid.visible_indices().len(), 5);
        assert_eq!(grid.scroll().unwrap().phase(), ScrollPhase::Idle);
    }

    #[test]
    fn test_infinite_fetch_failure_returns_idle() {
        let mut grid = grid(30, GridConfig::infinite(5, 5));
        let ticket = grid.near_end().unwrap();
        let outcome = grid.complete_fetch(ticket, Err(FetchError::Unavailable));
        assert_eq!(outcome, FetchOutcome::Failed(FetchError::Unavailable));
        assert_eq!(grid.visible_indices().len(), 5);
        assert!(grid.near_end().is_some());
    }

    #[test]
    fn test_mode_specific_intents_ignored() {
        let mut paged = grid(30, GridConfig::default());
        assert_eq!(paged.near_end(), None);

        let mut infinite = grid(30, GridConfig::infinite(5, 5));
        assert!(!infinite.set_page(2));
        assert!(!infinite.next_page());
        assert!(!infinite.set_page_size(10).unwrap());
    }

    #[test]
    fn test_replace_rows_keeps_selection() {
        let mut grid = grid(5, GridConfig::default());
        grid.select(3);
        grid.replace_rows(staff(2));
        assert_eq!(grid.matched_len(), 2);
        assert!(grid.is_selected(&3));
        assert_eq!(grid.snapshot().selection.visible_selected, 0);
    }

    #[test]
    fn test_positional_ids() {
        let mut grid = DataGrid::with_positional_ids(staff(6), columns(), GridConfig::default()).unwrap();
        grid.set_sort(Some(SortSpec::descending("id")));
        assert_eq!(grid.visible_ids(), vec![5, 4, 3, 2, 1, 0]);
        assert_eq!(grid.row_id(2), Some(2));
        assert_eq!(grid.row_id(6), None);
    }

    #[test]
    fn test_snapshot_contents() {
        let mut grid = grid(12, GridConfig::paginated(5));
        let log = EventLog::shared();
        grid.subscribe(log.clone());
        grid.set_page(3);

        let log = log.borrow();
        let snapshot = log.latest.as_ref().unwrap();
        assert_eq!(snapshot.rows, vec![10, 11]);
        assert_eq!(snapshot.ids, vec![11, 12]);
        assert_eq!(snapshot.matched, 12);
        assert_eq!(snapshot.pagination.unwrap().page, 3);
        assert!(snapshot.scroll.is_none());

        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["pagination"]["totalPages"], 3);
        assert!(json.get("scroll").is_none());
    }

    #[test]
    fn test_filter_options_only_for_filterable() {
        let grid = grid(9, GridConfig::default());
        let labels: Vec<String> = grid
            .filter_options("department")
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["Engineering", "HR", "Sales"]);
        assert!(grid.filter_options("name").is_empty());
    }
}
