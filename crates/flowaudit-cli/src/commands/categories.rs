//! `flowaudit categories` subcommand implementation.

use comfy_table::{Table, presets::UTF8_FULL};
use flowaudit_risk::RiskCategory;

/// Print every category and the sections it can emit.
pub fn run() {
    println!("{}", categories_table());
}

fn categories_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Category", "Section", "Title"]);

    for category in RiskCategory::ALL {
        for section in category.sections() {
            let id = serde_json::to_value(section)
                .ok()
                .and_then(|v| v.as_str().map(str::to_owned))
                .unwrap_or_default();
            table.add_row(vec![category.as_str().to_string(), id, section.title().to_string()]);
        }
    }
    table
}
