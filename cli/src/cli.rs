use chatmark_common::CliConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Render chat markdown to a sanitized HTML fragment.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatmark", version)]
pub struct Cli {
    #[command(flatten)]
    pub config_overrides: CliConfigOverrides,

    /// Treat the input as JSON Lines, one chat message object per line, and
    /// emit one `{"id": ..., "html": ...}` object per line.
    #[arg(long = "jsonl", default_value_t = false)]
    pub jsonl: bool,

    /// Keep single newlines as soft breaks instead of rendering `<br>`.
    #[arg(long = "no-breaks", default_value_t = false)]
    pub no_breaks: bool,

    /// Disable GitHub-flavored extensions (tables, strikethrough, task
    /// lists, bare-URL autolinks).
    #[arg(long = "no-gfm", default_value_t = false)]
    pub no_gfm: bool,

    /// Write output to FILE instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long = "print-config", default_value_t = false)]
    pub print_config: bool,

    /// Log debug output to stderr (overridden by `RUST_LOG`).
    #[arg(long = "debug", default_value_t = false)]
    pub debug: bool,

    /// Markdown file to render. Reads stdin when omitted or `-`.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}
