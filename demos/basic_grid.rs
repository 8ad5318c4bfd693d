/// Basic Grid Example
///
/// This example demonstrates:
/// - Describing columns and their capabilities
/// - Sorting, filtering and searching through the grid facade
/// - Paging through the result and selecting rows
/// - Observing events and snapshots

use livegrid::{
    row, CellValue, ColumnDef, ColumnSet, DataGrid, EventLog, FilterOperator, GridConfig, GridEvent, Record, Row,
};

fn main() {
    println!("=== LiveGrid Basic Grid Example ===\n");

    // 1. Describe the columns
    println!("1. Creating column set...");
    let columns = ColumnSet::new(vec![
        ColumnDef::new("id", "ID").sortable(),
        ColumnDef::new("name", "Name").sortable().searchable(),
        ColumnDef::new("team", "Team").sortable().filterable(),
        ColumnDef::new("score", "Score").sortable(),
    ])
    .unwrap();
    println!("   {} columns, searchable: {:?}\n", columns.len(), columns.searchable_keys());

    // 2. Some rows
    println!("2. Creating rows...");
    let names = ["Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Heidi"];
    let teams = ["Red", "Blue"];
    let rows: Vec<Row> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            row([
                ("id", CellValue::from(i as i64 + 1)),
                ("name", CellValue::from(*name)),
                ("team", CellValue::from(teams[i % 2])),
                ("score", CellValue::from(((i * 13) % 7) as i64 * 10)),
            ])
        })
        .collect();
    println!("   Created {} rows\n", rows.len());

    // 3. Build a paged grid keyed by the "id" field
    println!("3. Creating grid (page size 3)...");
    let mut grid = DataGrid::new(rows, columns, GridConfig::paginated(3), |row: &Row, _| {
        row.value("id").as_i64().unwrap_or_default()
    })
    .unwrap();
    let log = EventLog::shared();
    grid.subscribe(log.clone());
    print_page(&grid);

    // 4. Sort by score, highest first
    println!("4. Sorting by score (two clicks)...");
    grid.toggle_sort("score");
    grid.toggle_sort("score");
    print_page(&grid);

    // 5. Filter to one team
    println!("5. Filtering team = Blue...");
    grid.set_filter("team", "Blue", FilterOperator::Equals);
    print_page(&grid);

    // 6. Search
    println!("6. Searching \"a\"...");
    grid.set_search("a");
    print_page(&grid);

    // 7. Selection survives clearing the filter
    println!("7. Selecting all visible, then clearing filters...");
    grid.select_all_visible();
    grid.clear_filters();
    grid.set_search("");
    let summary = grid.snapshot().selection;
    println!(
        "   {} selected, {} on this page, indeterminate: {}\n",
        summary.selected, summary.visible_selected, summary.indeterminate
    );

    // 8. Paging
    println!("8. Walking pages...");
    while grid.next_page() {
        print_page(&grid);
    }

    // 9. Events
    println!("9. Events received:");
    for event in &log.borrow().events {
        match event {
            GridEvent::SelectionChange { selected } => println!("   selectionChange ({} ids)", selected.len()),
            other => println!("   {}", serde_json::to_string(other).unwrap()),
        }
    }

    println!("\n=== Example Complete ===");
}

fn print_page(grid: &DataGrid<Row, i64>) {
    for row in grid.visible_rows() {
        println!(
            "   #{:<2} {:<8} {:<5} {}",
            row.value("id"),
            row.value("name"),
            row.value("team"),
            row.value("score")
        );
    }
    if let Some(pages) = grid.pagination() {
        println!(
            "   page {} of {} ({} matching)\n",
            pages.page(),
            pages.total_pages(),
            grid.matched_len()
        );
    }
}
