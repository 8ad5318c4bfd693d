/// LiveGrid - Tabular Data Engine for Grid Widgets
///
/// Turns an in-memory collection of records into a sorted, filtered,
/// searched, paginated or infinitely scrolled, selectable view. Derived views
/// are index mappings into the caller's rows; nothing is copied.
///
/// The pieces compose bottom-up:
/// - `query`: pure filter -> search -> sort over row positions
/// - `pagination` / `infinite`: the two ways of windowing the derived view
/// - `selection`: identity-keyed selection that survives reflows
/// - `grid`: the `DataGrid` facade that owns all of it and notifies observers

pub mod value;
pub mod column;
pub mod query;
pub mod selection;
pub mod pagination;
pub mod infinite;
pub mod events;
pub mod config;
pub mod error;
pub mod grid;

pub use value::{row, CellValue, Record, Row};
pub use column::{Align, ColumnDef, ColumnSet, ColumnWidth, FilterOption};
pub use query::{
    apply_filters, apply_search, apply_sort, next_sort, Filter, FilterOperator, FilterSet, Query, RowIndices,
    SearchSpec, SortDirection, SortSpec,
};
pub use selection::Selection;
pub use pagination::{Pagination, PaginationState};
pub use infinite::{
    FetchOutcome, FetchTicket, FetchedPage, InfiniteScroll, Page, PageRequest, PageSource, ScrollPhase, ScrollState,
    SlicePageSource,
};
pub use events::{EventLog, GridEvent, GridObserver, GridSnapshot, SelectionSummary};
pub use config::{GridConfig, GridMode};
pub use error::{FetchError, GridError};
pub use grid::{DataGrid, RowIdFn};

// Generated demo data - only when demo feature is enabled
#[cfg(feature = "demo")]
pub mod demo;
