use anyhow::Result;
use clap::Args;
use comfy_table::{Attribute, Cell, Table};

use bugwatch_search::{FieldSchema, Pagination, Parser, SearchRequest};

use crate::context::SearchContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputFormat, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Request Body",
    commands: &[
        "bugwatch-search request 'is:unresolved sort:last_seen'",
        "bugwatch-search request 'level:fatal' --page 3 --per-page 20",
        "bugwatch-search --output compact request 'crash' | curl -d @- ...",
    ],
}];

#[derive(Args)]
pub struct RequestArgs {
    /// Query to convert
    pub query: String,

    /// Page number (starts at 1)
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size (1-100; defaults to [search] per_page or 50)
    #[arg(long)]
    pub per_page: Option<u32>,
}

impl TableDisplay for SearchRequest {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Request Body"]);
        let body = serde_json::to_string_pretty(self).unwrap_or_default();
        table.add_row(vec![Cell::new(body).add_attribute(Attribute::Bold)]);
        table
    }

    fn to_compact(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

pub fn handle_request(args: RequestArgs, ctx: &SearchContext, output: &OutputManager) -> Result<()> {
    let parsed = Parser::new(FieldSchema::global()).parse(&args.query);
    let pagination = Pagination::from_options(args.page, args.per_page.or(ctx.per_page()));
    let request = SearchRequest::from_parsed(&parsed, pagination);

    if output.options.output_format == OutputFormat::Compact {
        output.raw(&request.to_compact());
    } else {
        output.display(&request)?;
    }

    if output.is_table() {
        for error in &parsed.errors {
            output.warning(&format!("Left out: {error}"));
        }
    }
    Ok(())
}
