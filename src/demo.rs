/// Generated employee dataset used by the demo binary.
///
/// Rows are produced by a seeded `StdRng`, so a given `(count, seed)` pair
/// always yields the same data.

use crate::column::{Align, ColumnDef, ColumnSet, ColumnWidth};
use crate::error::GridError;
use crate::value::{row, CellValue, Row};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const FIRST_NAMES: [&str; 10] = [
    "John", "Jane", "Michael", "Sarah", "David", "Emily", "Chris", "Lisa", "Robert", "Maria",
];

pub const LAST_NAMES: [&str; 10] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez", "Martinez",
];

pub const DEPARTMENTS: [&str; 8] = [
    "Engineering", "Marketing", "Sales", "HR", "Finance", "Operations", "Design", "Support",
];

pub const CITIES: [&str; 8] = [
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio", "San Diego",
];

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

/// `count` employees with ids `1..=count`.
pub fn employees(count: usize, seed: u64) -> Vec<Row> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|index| {
            let join_date = NaiveDate::from_ymd_opt(
                rng.random_range(2020..2024),
                rng.random_range(1..=12),
                rng.random_range(1..=28),
            );
            row([
                ("id", CellValue::from(index as i64 + 1)),
                ("firstName", CellValue::from(pick(&mut rng, &FIRST_NAMES))),
                ("lastName", CellValue::from(pick(&mut rng, &LAST_NAMES))),
                ("email", CellValue::from(format!("user{}@example.com", index + 1))),
                ("department", CellValue::from(pick(&mut rng, &DEPARTMENTS))),
                ("salary", CellValue::from(rng.random_range(40_000..140_000i64))),
                ("city", CellValue::from(pick(&mut rng, &CITIES))),
                ("joinDate", CellValue::from(join_date)),
                ("isActive", CellValue::from(rng.random_bool(0.9))),
            ])
        })
        .collect()
}

pub fn employee_columns() -> Result<ColumnSet, GridError> {
    ColumnSet::new(vec![
        ColumnDef::new("id", "ID")
            .sortable()
            .width(ColumnWidth::Pixels(80))
            .align(Align::Center),
        ColumnDef::new("firstName", "First Name")
            .sortable()
            .searchable()
            .filterable()
            .width(ColumnWidth::Pixels(120)),
        ColumnDef::new("lastName", "Last Name")
            .sortable()
            .searchable()
            .filterable()
            .width(ColumnWidth::Pixels(120)),
        ColumnDef::new("email", "Email")
            .sortable()
            .searchable()
            .width(ColumnWidth::Pixels(200)),
        ColumnDef::new("department", "Department")
            .sortable()
            .filterable()
            .width(ColumnWidth::Pixels(120)),
        ColumnDef::new("salary", "Salary")
            .sortable()
            .width(ColumnWidth::Pixels(120))
            .align(Align::Right),
        ColumnDef::new("city", "City")
            .sortable()
            .filterable()
            .width(ColumnWidth::Pixels(120)),
        ColumnDef::new("joinDate", "Join Date")
            .sortable()
            .width(ColumnWidth::Pixels(120)),
        ColumnDef::new("isActive", "Status")
            .sortable()
            .filterable()
            .width(ColumnWidth::Pixels(100))
            .align(Align::Center),
    ])
}
