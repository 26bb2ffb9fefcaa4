mod commands;
mod context;
mod examples;
mod output;
mod theme;

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, Style},
    },
};
use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};

use commands::{
    fields::handle_fields,
    normalize::{NormalizeArgs, handle_normalize},
    parse::{ParseArgs, handle_parse},
    request::{RequestArgs, handle_request},
    suggest::{SuggestArgs, handle_suggest},
    tokens::{TokensArgs, handle_tokens},
};
use context::SearchContext;
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("BUGWATCH_SEARCH_CONFIG", "Path to search.toml (same as --config)"),
    ("RUST_LOG", "Library log filter, e.g. bugwatch_search=debug"),
];

#[derive(Parser)]
#[command(name = "bugwatch-search")]
#[command(author = "Bugwatch Team")]
#[command(version = "0.1.0")]
#[command(
    about = "Inspect and debug Bugwatch issue search queries",
    long_about = r#"Developer tool for the Bugwatch issue search query language:

• See how a query tokenizes and where each token sits
• Check the filter payload and errors a query produces
• Preview autocomplete suggestions at any cursor position
• Print the exact request body sent to the search API

Commands:
  tokens     Show the token stream of a query
  parse      Show filters, sort, free text and errors
  normalize  Print the canonical form of a query
  suggest    Show autocomplete suggestions
  request    Print the search API request body
  fields     List the filterable fields
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (defaults to the nearest .bugwatch/search.toml)
    #[arg(long, global = true, env = "BUGWATCH_SEARCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse arguments with themed help; clap prints help, version and usage errors itself.
    fn parse_with_styles() -> Self {
        let matches = build_cli_command().get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

fn build_cli_command() -> Command {
    let use_color = ShouldColorize::from_env().should_colorize();
    let mut command = Cli::command()
        .styles(help_styles())
        .color(if use_color { ColorChoice::Auto } else { ColorChoice::Never })
        .after_long_help(render_top_level_appendix(use_color));
    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            *subcommand = subcommand.clone().after_long_help(render_examples(example.groups, use_color));
        }
    }
    command
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let mut lines = vec![stylize("Examples:", THEME.highlight, true, use_color)];
    for group in groups {
        lines.push(format!("  {}", stylize(group.title, THEME.primary, true, use_color)));
        lines.extend(
            group
                .commands
                .iter()
                .map(|command| stylize(&format!("    {} {command}", ICONS.arrow), THEME.secondary, false, use_color)),
        );
    }
    lines.join("\n") + "\n"
}

fn render_top_level_appendix(use_color: bool) -> String {
    let mut buffer = stylize("Environment Variables:", THEME.highlight, true, use_color);
    for (key, description) in ENVIRONMENT_VARIABLES {
        let _ = write!(
            buffer,
            "\n  {}  {}",
            stylize(key, THEME.key, true, use_color),
            stylize(description, THEME.value, false, use_color)
        );
    }
    let _ = write!(
        buffer,
        "\n\n{} Quote the query so the shell passes it as one argument: bugwatch-search parse 'is:unresolved crash'\n",
        stylize("Tip:", THEME.highlight, true, use_color)
    );
    buffer
}

fn stylize(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    match (use_color, bold) {
        (false, _) => text.to_string(),
        (true, false) => text.color(color).to_string(),
        (true, true) => text.color(color).bold().to_string(),
    }
}

fn help_styles() -> Styles {
    let style = |color: ThemeColor| Style::new().fg_color(Some(ClapColor::Ansi(ansi_color(color))));
    Styles::styled()
        .usage(style(THEME.primary).bold())
        .header(style(THEME.highlight).bold())
        .literal(style(THEME.secondary))
        .placeholder(style(THEME.muted))
        .valid(style(THEME.success))
        .invalid(style(THEME.warning))
        .error(style(THEME.error).bold())
}

/// The theme only uses the basic palette; anything else renders as white.
fn ansi_color(color: ThemeColor) -> AnsiColor {
    match color {
        ThemeColor::Red => AnsiColor::Red,
        ThemeColor::Green => AnsiColor::Green,
        ThemeColor::Yellow => AnsiColor::Yellow,
        ThemeColor::Blue => AnsiColor::Blue,
        ThemeColor::Magenta => AnsiColor::Magenta,
        ThemeColor::Cyan => AnsiColor::Cyan,
        ThemeColor::BrightBlack => AnsiColor::BrightBlack,
        ThemeColor::BrightBlue => AnsiColor::BrightBlue,
        ThemeColor::BrightCyan => AnsiColor::BrightCyan,
        _ => AnsiColor::White,
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the token stream of a query with byte spans
    Tokens(TokensArgs),

    /// Parse a query into filters, sort, free text and errors
    Parse(ParseArgs),

    /// Print the canonical form of a query
    Normalize(NormalizeArgs),

    /// Show autocomplete suggestions for a cursor position
    Suggest(SuggestArgs),

    /// Print the JSON body sent to the issue search API
    Request(RequestArgs),

    /// List the filterable fields, their operators and aliases
    Fields,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse_with_styles();
    if let Err(err) = execute(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let global_options = GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    let output = OutputManager::new(global_options);

    match cli.command {
        Commands::Tokens(args) => handle_tokens(args, &output)?,
        Commands::Parse(args) => handle_parse(args, &output)?,
        Commands::Normalize(args) => handle_normalize(args, &output)?,
        Commands::Suggest(args) => {
            let ctx = SearchContext::load(cli.config.as_deref())?;
            report_config(&ctx, &output);
            handle_suggest(args, &ctx, &output)?;
        }
        Commands::Request(args) => {
            let ctx = SearchContext::load(cli.config.as_deref())?;
            report_config(&ctx, &output);
            handle_request(args, &ctx, &output)?;
        }
        Commands::Fields => handle_fields(&output)?,
    }

    Ok(())
}

fn report_config(ctx: &SearchContext, output: &OutputManager) {
    match &ctx.config_path {
        Some(path) => output.verbose(&format!("Using config {}", path.display())),
        None => output.verbose("No search.toml found; using empty history and saved searches"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn appendix_lists_environment_variables() {
        let appendix = render_top_level_appendix(false);
        assert!(appendix.starts_with("Environment Variables:\n  BUGWATCH_SEARCH_CONFIG  "));
        assert!(appendix.contains("\n  RUST_LOG  "));
        assert!(appendix.ends_with("'is:unresolved crash'\n"));
    }

    #[test]
    fn every_subcommand_gets_examples() {
        let command = build_cli_command();
        for example in command_examples() {
            let subcommand = command.find_subcommand(example.name).expect("subcommand exists");
            let help = subcommand.get_after_long_help().expect("examples attached").to_string();
            assert!(help.contains("Examples:"));
        }
    }
}
