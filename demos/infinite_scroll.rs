/// Infinite Scroll Example
///
/// This example demonstrates:
/// - Streaming rows from an asynchronous page source
/// - The Idle / Fetching / Exhausted cycle of the scroll controller
/// - Discarding a fetch that completes after the query changed
/// - The same cycle driven through the grid facade

use livegrid::{
    row, CellValue, ColumnDef, ColumnSet, DataGrid, FetchOutcome, FetchedPage, FilterOperator, GridConfig, InfiniteScroll,
    PageSource, Row, SlicePageSource,
};

fn items(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            row([
                ("id", CellValue::from(i as i64)),
                ("kind", CellValue::from(if i % 3 == 0 { "fizz" } else { "plain" })),
            ])
        })
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== LiveGrid Infinite Scroll Example ===\n");

    // 1. Controller plus an in-memory page source
    println!("1. Streaming 95 rows in batches of 20...");
    let mut source = SlicePageSource::new(items(95));
    let mut scroll = InfiniteScroll::new(0, 20).unwrap();
    scroll.reset(source.len());

    let mut loaded: Vec<Row> = Vec::new();
    while let Some(outcome) = scroll.fetch_next(&mut source, &mut loaded).await {
        println!("   {:?}", outcome);
    }
    println!("   {} rows loaded, phase {:?}\n", loaded.len(), scroll.phase());

    // 2. Repeated proximity signals while a fetch is outstanding
    println!("2. Proximity signals during a fetch...");
    scroll.reset(source.len());
    let ticket = scroll.near_end().unwrap();
    println!("   first signal: {:?}", ticket);
    println!("   second signal: {:?}", scroll.near_end());

    // 3. The query changes before the fetch completes
    println!("\n3. Query changes mid-fetch...");
    let page = source.fetch(ticket.request()).await.unwrap();
    scroll.reset(40);
    let outcome = scroll.complete(
        ticket,
        Ok(FetchedPage {
            received: page.rows.len(),
            total: page.total,
        }),
    );
    println!("   late completion: {:?}", outcome);
    println!("   loaded count untouched: {}\n", scroll.loaded_count());

    // 4. Same cycle through the grid facade
    println!("4. Grid in infinite mode (window 10, batch 10)...");
    let columns = ColumnSet::new(vec![
        ColumnDef::new("id", "ID").sortable(),
        ColumnDef::new("kind", "Kind").filterable(),
    ])
    .unwrap();
    let mut grid = DataGrid::with_positional_ids(items(95), columns, GridConfig::infinite(10, 10)).unwrap();
    grid.set_filter("kind", "fizz", FilterOperator::Equals);
    println!("   {} fizz rows match, {} visible", grid.matched_len(), grid.visible_indices().len());

    while let Some(outcome) = grid.load_more() {
        if let FetchOutcome::Applied { loaded, phase } = outcome {
            println!("   loaded {} ({:?})", loaded, phase);
        }
    }

    println!("\n=== Example Complete ===");
}
