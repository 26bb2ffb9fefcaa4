use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use bugwatch_search::{FieldSchema, Suggestion, SuggestionContext, SuggestionEngine};

use crate::context::SearchContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};
use crate::theme::suggestion_color;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Autocomplete",
        commands: &[
            "bugwatch-search suggest ''                    # saved searches, history, quick start",
            "bugwatch-search suggest 'level:'              # values with facet counts",
            "bugwatch-search suggest 'is:unresolved las'   # field names",
        ],
    },
    ExampleGroup {
        title: "Cursor Position",
        commands: &["bugwatch-search suggest 'count: level:error' --cursor 6"],
    },
];

#[derive(Args)]
pub struct SuggestArgs {
    /// Query as typed so far
    pub query: String,

    /// Cursor byte offset (defaults to the end of the query)
    #[arg(long)]
    pub cursor: Option<usize>,
}

#[derive(Serialize)]
#[serde(transparent)]
struct SuggestionList(Vec<Suggestion>);

impl TableDisplay for SuggestionList {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["#", "Type", "Label", "Insert", "Category", "Count", "Score"]);
        for (index, suggestion) in self.0.iter().enumerate() {
            let kind = format!("{:?}", suggestion.kind).to_lowercase();
            let kind_cell = if options.no_color {
                Cell::new(kind)
            } else {
                Cell::new(kind).fg(suggestion_color(suggestion.kind))
            };
            table.add_row(vec![
                Cell::new(index + 1),
                kind_cell,
                Cell::new(&suggestion.label),
                Cell::new(&suggestion.value),
                Cell::new(suggestion.category.as_deref().unwrap_or("")),
                Cell::new(suggestion.count.map(|c| c.to_string()).unwrap_or_default()),
                Cell::new(format!("{:.2}", suggestion.score)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|s| s.value.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn handle_suggest(args: SuggestArgs, ctx: &SearchContext, output: &OutputManager) -> Result<()> {
    let context = match args.cursor {
        Some(cursor) => SuggestionContext::new(&args.query, cursor),
        None => SuggestionContext::at_end(&args.query),
    };
    let saved = ctx.saved_searches();
    output.verbose(&format!(
        "{} history entr(ies), {} saved search(es), facets {}",
        ctx.history().len(),
        saved.len(),
        if ctx.facets().is_some() { "loaded" } else { "absent" }
    ));

    let suggestions =
        SuggestionEngine::new(FieldSchema::global()).suggest(context, ctx.history(), &saved, ctx.facets());

    if output.is_table() {
        output.key_value("Word under cursor", context.current_word());
        if suggestions.is_empty() {
            output.info("No suggestions");
            return Ok(());
        }
    }
    output.display(&SuggestionList(suggestions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugwatch_search::get_suggestions;

    #[test]
    fn test_compact_lists_insert_values() {
        let list = SuggestionList(get_suggestions(SuggestionContext::at_end("sort:u"), &[], &[], None));
        assert_eq!(list.to_compact(), "sort:users");
    }
}
