use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use bugwatch_search::{FieldSchema, Parser, stringify_query};

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Canonical Form",
    commands: &[
        "bugwatch-search normalize 'crash LEVEL:Error is:unresolved'   # is:unresolved level:error crash",
        "bugwatch-search --output compact normalize 'severity:fatal sort:users'",
    ],
}];

#[derive(Args)]
pub struct NormalizeArgs {
    /// Query to rewrite in canonical form
    pub query: String,
}

#[derive(Serialize)]
struct Normalized {
    query: String,
    normalized: String,
    /// Tokens dropped because they did not validate
    rejected: usize,
}

impl TableDisplay for Normalized {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Input", "Canonical"]);
        table.add_row(vec![Cell::new(&self.query), Cell::new(&self.normalized)]);
        table
    }

    fn to_compact(&self) -> String {
        self.normalized.clone()
    }
}

pub fn handle_normalize(args: NormalizeArgs, output: &OutputManager) -> Result<()> {
    let parsed = Parser::new(FieldSchema::global()).parse(&args.query);
    let normalized = Normalized {
        normalized: stringify_query(&parsed),
        rejected: parsed.errors.len(),
        query: args.query,
    };
    output.display(&normalized)?;

    if output.is_table() && normalized.rejected > 0 {
        output.warning(&format!(
            "{} invalid token(s) left out; run 'bugwatch-search parse' for details",
            normalized.rejected
        ));
    }
    Ok(())
}
