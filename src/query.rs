/// LiveGrid Query Engine
///
/// Pure functions that turn a source collection into an ordered selection of
/// row positions: filter, then search, then sort. Like a filter or sorted
/// view over a table, the result is an index mapping (`view -> source`)
/// rather than a copy of the rows.
///
/// The composition order is fixed. A filter and a search may both reference
/// the same column, so filter -> search -> sort is part of the contract.

use crate::value::{CellValue, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;

/// Positions into a source slice, in presentation order.
pub type RowIndices = Vec<usize>;

/// Every position of `rows`, in source order.
pub fn all_indices<R>(rows: &[R]) -> RowIndices {
    (0..rows.len()).collect()
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// The single active sort of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        SortSpec {
            column: column.into(),
            direction,
        }
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Ascending)
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Descending)
    }
}

/// The sort that results from clicking `column` while `current` is active.
///
/// Same column: ascending -> descending -> no sort. A different column
/// always starts ascending.
///
/// ```
/// use livegrid::{next_sort, SortSpec};
///
/// let first = next_sort(None, "salary");
/// assert_eq!(first, Some(SortSpec::ascending("salary")));
/// let second = next_sort(first.as_ref(), "salary");
/// assert_eq!(second, Some(SortSpec::descending("salary")));
/// assert_eq!(next_sort(second.as_ref(), "salary"), None);
/// assert_eq!(next_sort(second.as_ref(), "name"), Some(SortSpec::ascending("name")));
/// ```
pub fn next_sort(current: Option<&SortSpec>, column: &str) -> Option<SortSpec> {
    match current {
        Some(spec) if spec.column == column => match spec.direction {
            SortDirection::Ascending => Some(SortSpec::descending(column)),
            SortDirection::Descending => None,
        },
        _ => Some(SortSpec::ascending(column)),
    }
}

/// Filter comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Exact equality after coercion to the filter value's type
    Equals,
    /// Case-insensitive substring
    #[default]
    Contains,
    /// Case-insensitive prefix
    StartsWith,
    /// Case-insensitive suffix
    EndsWith,
    /// Numeric (or instant) `cell > value`
    GreaterThan,
    /// Numeric (or instant) `cell < value`
    LessThan,
}

impl FilterOperator {
    /// Evaluates `cell <op> target`. Never panics; mismatched types are `false`.
    pub fn evaluate(self, cell: &CellValue, target: &CellValue) -> bool {
        match self {
            FilterOperator::Contains => cell.to_folded().contains(&target.to_folded()),
            FilterOperator::StartsWith => cell.to_folded().starts_with(&target.to_folded()),
            FilterOperator::EndsWith => cell.to_folded().ends_with(&target.to_folded()),
            FilterOperator::Equals => values_equal(cell, target),
            FilterOperator::GreaterThan => compare_ordered(cell, target) == Some(Ordering::Greater),
            FilterOperator::LessThan => compare_ordered(cell, target) == Some(Ordering::Less),
        }
    }
}

fn values_equal(cell: &CellValue, target: &CellValue) -> bool {
    match target {
        CellValue::Null => cell.is_null(),
        CellValue::Int(_) | CellValue::Float(_) => match (cell.as_number(), target.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        CellValue::Bool(expected) => match cell {
            CellValue::Bool(actual) => actual == expected,
            CellValue::Text(s) => s.trim().eq_ignore_ascii_case(if *expected { "true" } else { "false" }),
            _ => false,
        },
        CellValue::Date(_) | CellValue::Timestamp(_) => {
            matches!((cell.coerce_instant(), target.as_instant()), (Some(a), Some(b)) if a == b)
        }
        CellValue::Text(expected) => !cell.is_null() && cell.to_text() == expected.as_str(),
        CellValue::Json(expected) => matches!(cell, CellValue::Json(actual) if actual == expected),
    }
}

fn compare_ordered(cell: &CellValue, target: &CellValue) -> Option<Ordering> {
    if cell.is_temporal() || target.is_temporal() {
        return Some(cell.coerce_instant()?.cmp(&target.coerce_instant()?));
    }
    cell.as_number()?.partial_cmp(&target.as_number()?)
}

/// One active column filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub value: CellValue,
    #[serde(default)]
    pub operator: FilterOperator,
}

impl Filter {
    pub fn new(column: impl Into<String>, value: impl Into<CellValue>, operator: FilterOperator) -> Self {
        Filter {
            column: column.into(),
            value: value.into(),
            operator,
        }
    }

    pub fn equals(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(column, value, FilterOperator::Equals)
    }

    pub fn contains(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(column, value, FilterOperator::Contains)
    }

    pub fn matches<R: Record>(&self, row: &R) -> bool {
        self.operator.evaluate(&row.value(&self.column), &self.value)
    }
}

/// At most one filter per column, in the order columns were first filtered.
///
/// Updates are functional: `with` and `without` return a new set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        FilterSet::default()
    }

    /// Adds `filter`, replacing any filter already on the same column.
    pub fn with(mut self, filter: Filter) -> Self {
        match self.filters.iter().position(|f| f.column == filter.column) {
            Some(i) => self.filters[i] = filter,
            None => self.filters.push(filter),
        }
        self
    }

    pub fn without(mut self, column: &str) -> Self {
        self.filters.retain(|f| f.column != column);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.column == column)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    pub fn to_vec(&self) -> Vec<Filter> {
        self.filters.clone()
    }

    pub fn matches<R: Record>(&self, row: &R) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        iter.into_iter().fold(FilterSet::new(), FilterSet::with)
    }
}

/// A search term applied across a set of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    pub term: String,
    pub columns: Vec<String>,
}

impl SearchSpec {
    pub fn new(term: impl Into<String>, columns: Vec<String>) -> Self {
        SearchSpec {
            term: term.into(),
            columns,
        }
    }

    /// Search only narrows results when there is both a term and at least
    /// one column to look in.
    pub fn is_active(&self) -> bool {
        !self.term.is_empty() && !self.columns.is_empty()
    }
}

/// Retains the positions whose rows satisfy every filter.
pub fn apply_filters<R: Record>(rows: &[R], mut indices: RowIndices, filters: &FilterSet) -> RowIndices {
    if filters.is_empty() {
        return indices;
    }
    indices.retain(|&i| rows.get(i).map(|row| filters.matches(row)).unwrap_or(false));
    log::trace!("filters kept {} rows", indices.len());
    indices
}

/// Retains the positions where the search term occurs, case-insensitively,
/// in at least one of the search columns.
pub fn apply_search<R: Record>(rows: &[R], mut indices: RowIndices, search: &SearchSpec) -> RowIndices {
    if !search.is_active() {
        return indices;
    }
    let needle = search.term.to_lowercase();
    indices.retain(|&i| {
        rows.get(i)
            .map(|row| {
                search
                    .columns
                    .iter()
                    .any(|col| row.value(col).to_folded().contains(&needle))
            })
            .unwrap_or(false)
    });
    log::trace!("search '{}' kept {} rows", search.term, indices.len());
    indices
}

/// Stable, type-aware ordering of `indices` by the sort column.
///
/// Without a sort the input order is returned untouched. Rows with equal
/// keys keep their relative input order in both directions; nulls and
/// missing values always sort last.
pub fn apply_sort<R: Record>(rows: &[R], indices: RowIndices, sort: Option<&SortSpec>) -> RowIndices {
    let Some(spec) = sort else {
        return indices;
    };

    let cells: Vec<Cow<'_, CellValue>> = indices
        .iter()
        .map(|&i| match rows.get(i) {
            Some(row) => row.value(&spec.column),
            None => Cow::Owned(CellValue::Null),
        })
        .collect();

    let class = SortClass::detect(cells.iter().map(|c| c.as_ref()));
    let mut keyed: Vec<(Option<SortKey>, usize)> = cells
        .iter()
        .zip(indices)
        .map(|(cell, index)| (SortKey::new(cell, class), index))
        .collect();

    // slice::sort_by is stable
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref(), spec.direction));
    keyed.into_iter().map(|(_, index)| index).collect()
}

/// Sorts plain values ascending with the same comparator as [`apply_sort`].
pub(crate) fn sort_values(values: &mut [CellValue]) {
    let class = SortClass::detect(values.iter());
    let mut keyed: Vec<(Option<SortKey>, CellValue)> = values
        .iter()
        .map(|v| (SortKey::new(v, class), v.clone()))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref(), SortDirection::Ascending));
    for (slot, (_, value)) in values.iter_mut().zip(keyed) {
        *slot = value;
    }
}

/// How a sort column compares. A column is numeric (or temporal) only when
/// every non-null value is; any mix falls back to string comparison for the
/// whole column, which keeps the ordering total. NaN floats count as null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortClass {
    Numeric,
    Temporal,
    Text,
}

impl SortClass {
    fn of(value: &CellValue) -> SortClass {
        if value.is_numeric() && value.as_number().is_some() {
            SortClass::Numeric
        } else if value.is_temporal() {
            SortClass::Temporal
        } else {
            SortClass::Text
        }
    }

    fn detect<'a>(values: impl Iterator<Item = &'a CellValue>) -> SortClass {
        let mut class = None;
        for value in values.filter(|v| !is_sort_null(v)) {
            let this = SortClass::of(value);
            match class {
                None => class = Some(this),
                Some(prev) if prev != this => return SortClass::Text,
                Some(_) => {}
            }
        }
        class.unwrap_or(SortClass::Text)
    }
}

fn is_sort_null(value: &CellValue) -> bool {
    match value {
        CellValue::Null => true,
        CellValue::Float(n) => n.is_nan(),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Instant(DateTime<Utc>),
    Text(String),
}

impl SortKey {
    fn new(value: &CellValue, class: SortClass) -> Option<SortKey> {
        if is_sort_null(value) {
            return None;
        }
        match class {
            SortClass::Numeric => value.as_number().map(SortKey::Number),
            SortClass::Temporal => value.as_instant().map(SortKey::Instant),
            SortClass::Text => Some(SortKey::Text(value.to_folded())),
        }
    }

    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Instant(a), SortKey::Instant(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            // keys of one column always share a class
            _ => Ordering::Equal,
        }
    }
}

fn compare_keys(a: Option<&SortKey>, b: Option<&SortKey>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => direction.apply(a.compare(b)),
    }
}

/// The complete query state of a grid: one optional sort, a filter set and a
/// search. Immutable; every change produces a new `Query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    sort: Option<SortSpec>,
    filters: FilterSet,
    search: SearchSpec,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn search(&self) -> &SearchSpec {
        &self.search
    }

    pub fn with_sort(self, sort: Option<SortSpec>) -> Self {
        Query { sort, ..self }
    }

    pub fn with_filter(self, filter: Filter) -> Self {
        Query {
            filters: self.filters.with(filter),
            ..self
        }
    }

    pub fn without_filter(self, column: &str) -> Self {
        Query {
            filters: self.filters.without(column),
            ..self
        }
    }

    pub fn with_filters(self, filters: FilterSet) -> Self {
        Query { filters, ..self }
    }

    pub fn with_search(self, search: SearchSpec) -> Self {
        Query { search, ..self }
    }

    /// Runs filter -> search -> sort over `rows`.
    ///
    /// ```
    /// use livegrid::{row, CellValue, Filter, Query, SortSpec};
    ///
    /// let rows = vec![
    ///     row([("name", CellValue::from("b")), ("n", CellValue::from(2))]),
    ///     row([("name", CellValue::from("a")), ("n", CellValue::from(3))]),
    ///     row([("name", CellValue::from("c")), ("n", CellValue::from(1))]),
    /// ];
    /// let query = Query::new()
    ///     .with_filter(Filter::new("n", 1, livegrid::FilterOperator::GreaterThan))
    ///     .with_sort(Some(SortSpec::ascending("name")));
    ///
    /// assert_eq!(query.apply(&rows), vec![1, 0]);
    /// ```
    pub fn apply<R: Record>(&self, rows: &[R]) -> RowIndices {
        let indices = apply_filters(rows, all_indices(rows), &self.filters);
        let indices = apply_search(rows, indices, &self.search);
        apply_sort(rows, indices, self.sort.as_ref())
    }

    /// Like [`apply`](Self::apply), resolving positions to row references.
    pub fn select<'a, R: Record>(&self, rows: &'a [R]) -> Vec<&'a R> {
        self.apply(rows).into_iter().map(|i| &rows[i]).collect()
    }
}
