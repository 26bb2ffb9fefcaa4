use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use bugwatch_search::{FieldSchema, Token, Tokenizer};

use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};
use crate::theme::token_color;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Token Stream",
    commands: &[
        "bugwatch-search tokens 'is:unresolved level:error crash'",
        "bugwatch-search tokens '-severity:info \"null pointer\"'   # aliases and phrases",
        "bugwatch-search --output json tokens 'count:>=10'",
    ],
}];

#[derive(Args)]
pub struct TokensArgs {
    /// Query to tokenize
    pub query: String,
}

#[derive(Serialize)]
#[serde(transparent)]
struct TokenStream(Vec<Token>);

impl TableDisplay for TokenStream {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["#", "Type", "Field", "Op", "Value", "Span", "Raw"]);
        for (index, token) in self.0.iter().enumerate() {
            let kind = format!("{:?}", token.kind).to_lowercase();
            let kind_cell = if options.no_color {
                Cell::new(kind)
            } else {
                Cell::new(kind).fg(token_color(token.kind))
            };
            let field = match (&token.field, token.negated) {
                (Some(field), true) => format!("-{field}"),
                (Some(field), false) => field.clone(),
                (None, _) => String::new(),
            };
            table.add_row(vec![
                Cell::new(index + 1),
                kind_cell,
                Cell::new(field),
                Cell::new(token.operator.map_or("", |op| op.as_str())),
                Cell::new(&token.value),
                Cell::new(format!("{}..{}", token.start_index, token.end_index)),
                Cell::new(&token.raw),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|token| format!("{:?}[{}..{}]", token.kind, token.start_index, token.end_index).to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn handle_tokens(args: TokensArgs, output: &OutputManager) -> Result<()> {
    let tokens = Tokenizer::new(FieldSchema::global()).tokenize(&args.query);
    log::debug!("{} token(s) in {:?}", tokens.len(), args.query);

    if output.is_table() && tokens.is_empty() {
        output.info("Query is empty");
        return Ok(());
    }
    output.display(&TokenStream(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugwatch_search::tokenize;

    #[test]
    fn test_compact_lists_kinds_and_spans() {
        let stream = TokenStream(tokenize("level:error foo OR bar"));
        assert_eq!(stream.to_compact(), "field[0..11] text[12..15] operator[16..18] text[19..22]");
    }

    #[test]
    fn test_table_shows_negation_and_canonical_field() {
        let stream = TokenStream(tokenize("-severity:info"));
        let options = GlobalOptions {
            no_color: true,
            ..Default::default()
        };
        let rendered = stream.to_table(&options).to_string();
        assert!(rendered.contains("-level"));
        assert!(rendered.contains("-severity:info"));
    }
}
