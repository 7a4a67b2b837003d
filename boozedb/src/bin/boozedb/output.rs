use anyhow::Result;
use boozedb::{Bottle, BottleListResponse, BottleResponse, BoozeDbMeta};
use clap::ValueEnum;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

use crate::theme::Tone;

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    pub fn success(&self, message: &str) {
        self.status(Tone::Success, message);
    }

    pub fn warning(&self, message: &str) {
        self.status(Tone::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.status(Tone::Info, message);
    }

    /// Errors always reach stderr, even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", Tone::Error.paint(message));
    }

    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", Tone::Detail.paint(message));
        }
    }

    // Status lines go to stderr in JSON mode so stdout stays parseable.
    fn status(&self, tone: Tone, message: &str) {
        if self.options.quiet {
            return;
        }
        if self.options.output_format == OutputFormat::Json {
            eprintln!("{}", tone.paint(message));
        } else {
            println!("{}", tone.paint(message));
        }
    }
}

fn themed_table(options: &GlobalOptions) -> Table {
    let mut table = Table::new();
    if options.no_color {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    }
    table
}

fn set_header(table: &mut Table, headers: &[&str], options: &GlobalOptions) {
    let cells: Vec<Cell> = headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect();
    table.set_header(cells);
}

const BOTTLE_HEADERS: [&str; 8] = ["ID", "Name", "Category", "Sub-category", "Price", "Proof", "Size (ml)", "Age"];

fn bottle_row(bottle: &Bottle) -> Vec<Cell> {
    vec![
        Cell::new(&bottle.id),
        Cell::new(&bottle.name),
        Cell::new(&bottle.category),
        Cell::new(&bottle.sub_category),
        Cell::new(format!("{:.2}", bottle.price)),
        Cell::new(bottle.proof),
        Cell::new(bottle.size),
        Cell::new(bottle.age.map(|age| age.to_string()).unwrap_or_else(|| "-".to_string())),
    ]
}

impl TableDisplay for BottleResponse {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        set_header(&mut table, &BOTTLE_HEADERS, options);
        table.add_row(bottle_row(&self.bottle));
        table
    }

    fn to_compact(&self) -> String {
        format!("{} {} ({})", self.bottle.id, self.bottle.name, self.links.self_href)
    }
}

impl TableDisplay for BottleListResponse {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        if self.results.is_empty() {
            table.add_row(vec![Cell::new("No bottles found")]);
            return table;
        }
        set_header(&mut table, &BOTTLE_HEADERS, options);
        for bottle in &self.results {
            table.add_row(bottle_row(bottle));
        }
        table
    }

    fn to_compact(&self) -> String {
        let ids: Vec<&str> = self.results.iter().map(|b| b.id.as_str()).collect();
        format!("Count: {} [{}]", self.links.result_size, ids.join(", "))
    }
}

impl TableDisplay for BoozeDbMeta {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        if self.categories.is_empty() {
            table.add_row(vec![Cell::new("No categories found")]);
            return table;
        }
        set_header(&mut table, &["Category", "Sub-categories"], options);
        for (category, sub_categories) in self.categories.iter() {
            table.add_row(vec![Cell::new(category), Cell::new(sub_categories.join(", "))]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let names: Vec<&str> = self.categories.iter().map(|(name, _)| name.as_str()).collect();
        format!("Categories: {}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boozedb::BottleListLinks;

    fn page() -> BottleListResponse {
        BottleListResponse {
            links: BottleListLinks {
                self_href: "http://localhost:8080/bottles".to_string(),
                result_size: 1,
            },
            results: vec![Bottle {
                id: "r1".to_string(),
                name: "Dark Harbor".to_string(),
                category: "Rum".to_string(),
                sub_category: "Dark".to_string(),
                price: 31.5,
                proof: 80.0,
                size: 750.0,
                age: Some(5),
            }],
        }
    }

    #[test]
    fn test_output_manager_json() {
        let options = GlobalOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        };
        let manager = OutputManager::new(options);
        assert!(manager.display(&page()).is_ok());
    }

    #[test]
    fn test_output_manager_quiet() {
        let options = GlobalOptions {
            quiet: true,
            ..Default::default()
        };
        let manager = OutputManager::new(options);
        assert!(manager.display(&page()).is_ok());
    }

    #[test]
    fn test_compact_list_output() {
        assert_eq!(page().to_compact(), "Count: 1 [r1]");
    }

    #[test]
    fn test_table_renders_price_with_cents() {
        let options = GlobalOptions {
            no_color: true,
            ..Default::default()
        };
        let rendered = page().to_table(&options).to_string();
        assert!(rendered.contains("31.50"));
        assert!(rendered.contains("Dark Harbor"));
    }
}
