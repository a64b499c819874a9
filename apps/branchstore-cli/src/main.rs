use std::borrow::Cow;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use branchstore_kernel::FileRegistry;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod command;
mod render;
mod session;
mod settings;

use render::{Format, Renderer};
use session::{Reply, Session};

#[derive(Parser)]
#[command(
    name = "branchstore",
    version,
    about = "Line-oriented shell over an in-memory branching version store"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// YAML file with registry settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    script: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = settings::load(cli.config.as_deref())?;
    let registry = FileRegistry::with_config(config)?;
    let mut session = Session::new(registry);
    tracing::debug!(config = ?session.registry().config(), "registry ready");
    let mut renderer = Renderer::new(cli.format, std::io::stdout().lock(), std::io::stderr());

    match &cli.script {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            run(BufReader::new(file), &mut session, &mut renderer)?;
        }
        None => run(std::io::stdin().lock(), &mut session, &mut renderer)?,
    }

    tracing::debug!(
        files = session.registry().len(),
        clock = %session.registry().clock(),
        "end of input"
    );
    Ok(())
}

/// Execute every line of `input` until end of input.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the session.
fn run<R, W, E>(
    mut input: R,
    session: &mut Session,
    renderer: &mut Renderer<W, E>,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut buf = Vec::new();
    let mut lineno = 0usize;
    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("reading input line {}", lineno + 1))?;
        if read == 0 {
            break;
        }
        lineno += 1;

        let decoded = String::from_utf8_lossy(&buf);
        if matches!(decoded, Cow::Owned(_)) {
            tracing::debug!(line = lineno, "replaced invalid UTF-8 in input line");
        }
        let line = decoded.trim_end_matches(['\n', '\r']);
        let reply = match command::parse_line(line) {
            Ok(None) => continue,
            Ok(Some(cmd)) => session.execute(cmd),
            Err(e) => {
                tracing::debug!(line = lineno, error = %e, "rejected input line");
                Reply::from(e)
            }
        };
        renderer.render(&reply)?;
    }
    renderer.flush()?;
    Ok(())
}
