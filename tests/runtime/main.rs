mod implementation;

use settle_cell::{CellOptions, SettlementCell};

pub fn resolved_cell(value: u32) -> SettlementCell<u32, String> {
    let cell = SettlementCell::with_options(CellOptions::new());
    cell.resolve(value);
    cell
}

pub fn rejected_cell(error: &str) -> SettlementCell<u32, String> {
    let cell = SettlementCell::with_options(CellOptions::new().suppress_unhandled_diagnostics(true));
    cell.reject(error.to_string());
    cell
}
