use anyhow::Result;
use clap::Args;
use comfy_table::{Attribute, Cell, Table};

use bugwatch_search::{FieldSchema, ParsedQuery, Parser, stringify_query};

use super::caret_line;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Inspect Filters",
        commands: &[
            "bugwatch-search parse 'is:unresolved level:error last_seen:>7d crash'",
            "bugwatch-search --output json parse 'count:>=10 sort:users:asc'",
        ],
    },
    ExampleGroup {
        title: "Validation",
        commands: &[
            "bugwatch-search parse 'is:closed users:>=5'            # errors are listed, valid filters kept",
            "bugwatch-search parse --strict 'level:bogus'          # non-zero exit on any error",
        ],
    },
];

#[derive(Args)]
pub struct ParseArgs {
    /// Query to parse
    pub query: String,

    /// Exit with an error if any token was rejected
    #[arg(long)]
    pub strict: bool,
}

impl TableDisplay for ParsedQuery {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Part", "Value"]);
        let filters = if self.filters.is_empty() {
            "(none)".to_string()
        } else {
            serde_json::to_string_pretty(&self.filters).unwrap_or_default()
        };
        let sort = self
            .sort
            .as_ref()
            .map_or_else(|| "(default)".to_string(), |s| format!("{} {}", s.field, s.direction.as_str()));

        table.add_row(vec![Cell::new("Filters").add_attribute(Attribute::Bold), Cell::new(filters)]);
        table.add_row(vec![Cell::new("Sort").add_attribute(Attribute::Bold), Cell::new(sort)]);
        table.add_row(vec![
            Cell::new("Free text").add_attribute(Attribute::Bold),
            Cell::new(&self.free_text),
        ]);
        table.add_row(vec![
            Cell::new("Errors").add_attribute(Attribute::Bold),
            Cell::new(self.errors.len()),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        format!("{} [{} error(s)]", stringify_query(self), self.errors.len())
    }
}

pub fn handle_parse(args: ParseArgs, output: &OutputManager) -> Result<()> {
    let parsed = Parser::new(FieldSchema::global()).parse(&args.query);
    output.display(&parsed)?;

    if output.is_table() {
        if parsed.has_errors() {
            output.heading("Errors");
            for error in &parsed.errors {
                output.warning(&error.message);
                output.indented(&args.query, false);
                output.indented(&caret_line(&args.query, error.start_index, error.end_index), true);
            }
        } else {
            output.success("No errors");
        }
    }

    if args.strict {
        parsed.ensure_valid()?;
    }
    Ok(())
}
