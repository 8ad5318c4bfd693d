/// Grid configuration
///
/// Chooses between paged and streaming presentation and sizes each. Loaded
/// from JSON or built with `Default` and struct update syntax.
///
/// ```
/// use livegrid::{GridConfig, GridMode};
///
/// let config = GridConfig::from_json(r#"{"mode": "infinite", "batchSize": 20}"#).unwrap();
/// assert_eq!(config.mode, GridMode::Infinite);
/// assert_eq!(config.batch_size, 20);
/// assert_eq!(config.initial_window, 50);
/// ```

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    #[default]
    Pagination,
    Infinite,
}

impl FromStr for GridMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pagination" | "paged" | "pages" => Ok(GridMode::Pagination),
            "infinite" | "scroll" | "stream" => Ok(GridMode::Infinite),
            other => Err(GridError::InvalidConfig(format!("unknown grid mode '{}'", other))),
        }
    }
}

impl fmt::Display for GridMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridMode::Pagination => write!(f, "pagination"),
            GridMode::Infinite => write!(f, "infinite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub mode: GridMode,
    /// Rows per page in pagination mode
    pub page_size: usize,
    /// Choices offered by a page-size picker
    pub page_size_options: Vec<usize>,
    /// Rows shown before the first fetch in infinite mode
    pub initial_window: usize,
    /// Rows requested per fetch in infinite mode
    pub batch_size: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            mode: GridMode::Pagination,
            page_size: 25,
            page_size_options: vec![10, 25, 50, 100],
            initial_window: 50,
            batch_size: 50,
        }
    }
}

impl GridConfig {
    pub fn paginated(page_size: usize) -> Self {
        GridConfig {
            page_size,
            ..GridConfig::default()
        }
    }

    pub fn infinite(initial_window: usize, batch_size: usize) -> Self {
        GridConfig {
            mode: GridMode::Infinite,
            initial_window,
            batch_size,
            ..GridConfig::default()
        }
    }

    /// Parses and validates a JSON object. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        if self.batch_size == 0 {
            return Err(GridError::InvalidBatchSize);
        }
        if self.page_size_options.contains(&0) {
            return Err(GridError::InvalidConfig("page size options must be positive".into()));
        }
        Ok(())
    }
}
