/// LiveGrid Column Model
///
/// A `ColumnSet` is the static, ordered description of the fields a grid
/// shows and which query capabilities each field has. It is supplied once per
/// grid and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use livegrid::{ColumnDef, ColumnSet};
///
/// let columns = ColumnSet::new(vec![
///     ColumnDef::new("id", "ID").sortable(),
///     ColumnDef::new("name", "Name").sortable().searchable().filterable(),
/// ]).unwrap();
///
/// assert_eq!(columns.len(), 2);
/// assert!(columns.is_searchable("name"));
/// assert!(!columns.is_filterable("id"));
/// assert_eq!(columns.searchable_keys(), vec!["name".to_string()]);
/// ```

use crate::error::GridError;
use crate::query::sort_values;
use crate::value::{CellValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Horizontal alignment of a column's cells. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Column width hint. Presentation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnWidth {
    Pixels(u32),
    Css(String),
}

/// Declarative description of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ColumnWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default)]
    pub align: Align,
}

impl ColumnDef {
    /// A display-only column with no query capabilities.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        ColumnDef {
            key: key.into(),
            title: title.into(),
            sortable: false,
            filterable: false,
            searchable: false,
            width: None,
            min_width: None,
            align: Align::Left,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn width(mut self, width: ColumnWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub fn min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// One entry of a filter picker: a distinct value present in a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: CellValue,
}

/// Ordered, key-unique set of column descriptors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColumnSet {
    columns: Vec<ColumnDef>,
}

impl ColumnSet {
    /// Creates a column set, rejecting duplicate keys.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, GridError> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|prev| prev.key == col.key) {
                return Err(GridError::DuplicateColumn(col.key.clone()));
            }
        }
        Ok(ColumnSet { columns })
    }

    /// Parses a JSON array of column descriptors.
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let columns: Vec<ColumnDef> = serde_json::from_str(json)?;
        Self::new(columns)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter()
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn is_sortable(&self, key: &str) -> bool {
        self.get(key).map(|c| c.sortable).unwrap_or(false)
    }

    pub fn is_filterable(&self, key: &str) -> bool {
        self.get(key).map(|c| c.filterable).unwrap_or(false)
    }

    pub fn is_searchable(&self, key: &str) -> bool {
        self.get(key).map(|c| c.searchable).unwrap_or(false)
    }

    /// Keys of all searchable columns, in column order.
    pub fn searchable_keys(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.searchable)
            .map(|c| c.key.clone())
            .collect()
    }

    pub fn filterable_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.filterable)
    }

    /// Distinct non-empty values of `key` across `rows`, sorted ascending
    /// with the same comparator the query engine sorts with.
    pub fn filter_options<R: Record>(&self, rows: &[R], key: &str) -> Vec<FilterOption> {
        if self.get(key).is_none() {
            return Vec::new();
        }

        // distinct by display form, first occurrence wins
        let mut seen: HashSet<String> = HashSet::new();
        let mut values: Vec<CellValue> = Vec::new();
        for row in rows {
            let value = row.value(key);
            if value.is_empty() || !seen.insert(value.to_string()) {
                continue;
            }
            values.push(value.into_owned());
        }
        sort_values(&mut values);

        values
            .into_iter()
            .map(|value| FilterOption {
                label: value.to_string(),
                value,
            })
            .collect()
    }
}
