mod cli;

use std::io::IsTerminal;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chatmark_core::ChatMessage;
use chatmark_core::Config;
use chatmark_core::ConfigOverrides;
use chatmark_core::MarkdownRenderer;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use cli::Cli;

pub fn run_main(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        config_overrides,
        jsonl,
        no_breaks,
        no_gfm,
        output,
        print_config,
        debug,
        input,
    } = cli;

    init_tracing(debug);

    let cli_kv_overrides = config_overrides
        .parse_overrides()
        .map_err(anyhow::Error::msg)?;
    let overrides = ConfigOverrides {
        breaks: no_breaks.then_some(false),
        gfm: no_gfm.then_some(false),
    };
    let config =
        Config::load_with_cli_overrides(cli_kv_overrides, overrides).context("load config")?;

    if print_config {
        let toml = config.to_toml_string().context("serialize config")?;
        return write_output(output.as_deref(), &toml);
    }

    let source = read_input(input.as_deref())?;
    let renderer = MarkdownRenderer::new(config.render);
    let rendered = if jsonl {
        render_jsonl(&renderer, &source)?
    } else {
        renderer.render(&source)
    };

    write_output(output.as_deref(), &rendered)
}

fn init_tracing(debug: bool) {
    let default_level = if debug {
        "chatmark_core=debug,chatmark_cli=debug"
    } else {
        "warn"
    };

    let _ = tracing_subscriber::fmt()
        // Fall back to `default_level` if `RUST_LOG` is unset or invalid.
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("read input from {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read input from stdin")?;
            Ok(buf)
        }
    }
}

/// Renders each non-blank line of `source` as a JSON chat message.
fn render_jsonl(renderer: &MarkdownRenderer, source: &str) -> anyhow::Result<String> {
    let mut out = String::new();
    let mut count = 0usize;
    for (idx, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let message: ChatMessage = serde_json::from_str(line)
            .with_context(|| format!("parse chat message on line {}", idx + 1))?;
        let rendered = renderer.render_message(&message);
        out.push_str(&serde_json::to_string(&rendered)?);
        out.push('\n');
        count += 1;
    }
    debug!(count, "rendered chat messages");
    Ok(out)
}

fn write_output(output: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("write output to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|()| stdout.flush())
                .context("write output to stdout")
        }
    }
}
