/// LiveGrid Demo
///
/// Renders a generated employee dataset as a text table, then walks through
/// a few grid intents: sorting, filtering, searching and selection.

use livegrid::demo::{employee_columns, employees};
use livegrid::{Align, CellValue, ColumnSet, DataGrid, FilterOperator, GridConfig, GridError, GridMode, Record, Row};

const CELL_WIDTH: usize = 14;

fn render(grid: &DataGrid<Row, i64>, columns: &ColumnSet) {
    let header: Vec<String> = columns.iter().map(|c| fit(&c.title, CELL_WIDTH, c.align)).collect();
    println!("{}", header.join(" | "));
    println!("{}", "-".repeat(header.len() * (CELL_WIDTH + 3)));

    for row in grid.visible_rows() {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| fit(&format_cell(&c.key, &row.value(&c.key)), CELL_WIDTH, c.align))
            .collect();
        println!("{}", cells.join(" | "));
    }

    if let Some(pages) = grid.pagination() {
        match pages.item_range() {
            Some((first, last)) => println!(
                "\nShowing {}-{} of {} (page {} of {})\n",
                first,
                last,
                pages.total(),
                pages.page(),
                pages.total_pages()
            ),
            None => println!("\nNo results\n"),
        }
    }
    if let Some(scroll) = grid.scroll() {
        println!("\nLoaded {} of {} rows ({:?})\n", scroll.loaded_count(), scroll.total(), scroll.phase());
    }
}

fn format_cell(key: &str, value: &CellValue) -> String {
    match (key, value) {
        ("salary", v) => v.as_i64().map(|n| format!("${}", n)).unwrap_or_default(),
        ("isActive", CellValue::Bool(true)) => "Active".to_string(),
        ("isActive", CellValue::Bool(false)) => "Inactive".to_string(),
        (_, v) => v.to_string(),
    }
}

fn fit(text: &str, width: usize, align: Align) -> String {
    let clipped: String = text.chars().take(width).collect();
    match align {
        Align::Left => format!("{:<width$}", clipped, width = width),
        Align::Center => format!("{:^width$}", clipped, width = width),
        Align::Right => format!("{:>width$}", clipped, width = width),
    }
}

fn main() -> Result<(), GridError> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Read dataset size and presentation from environment or use defaults
    let count: usize = std::env::var("LIVEGRID_ROWS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000);
    let mode: GridMode = match std::env::var("LIVEGRID_MODE") {
        Ok(v) => v.parse()?,
        Err(_) => GridMode::Pagination,
    };
    let page_size: usize = std::env::var("LIVEGRID_PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let config = GridConfig {
        mode,
        page_size,
        initial_window: page_size,
        batch_size: page_size,
        ..GridConfig::default()
    };
    config.validate()?;

    log::info!("generating {} employees ({} mode)", count, mode);
    let columns = employee_columns()?;
    let mut grid = DataGrid::new(employees(count, 42), columns.clone(), config, |row: &Row, _| {
        row.value("id").as_i64().unwrap_or_default()
    })?;

    println!("=== LiveGrid Demo ===\n");
    render(&grid, &columns);

    println!("Sorted by salary, highest first:");
    grid.toggle_sort("salary");
    grid.toggle_sort("salary");
    render(&grid, &columns);

    println!("Engineering only, searching \"smith\":");
    grid.set_filter("department", "Engineering", FilterOperator::Equals);
    grid.set_search("smith");
    render(&grid, &columns);

    grid.select_all_visible();
    log::info!("selected {} visible employees", grid.selection().len());

    println!("Filter cleared, search cleared:");
    grid.clear_filters();
    grid.set_search("");
    if grid.mode() == GridMode::Infinite {
        grid.load_more();
    } else {
        grid.next_page();
    }
    render(&grid, &columns);

    let snapshot = grid.snapshot();
    log::info!(
        "{} selected, {} of them on screen",
        snapshot.selection.selected,
        snapshot.selection.visible_selected
    );

    Ok(())
}
