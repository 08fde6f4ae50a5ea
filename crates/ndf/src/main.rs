mod json;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use ndf_errors::Renderer;
use ndf_path::Path;
use ndf_session::Session;
use ndf_writer::{DirtySet, FileProfile, WriterOptions};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Inspect and edit NDF files without disturbing their formatting")]
struct Cli {
    /// TOML file with layout rules for regenerated text.
    #[arg(long, global = true)]
    profile: Option<Utf8PathBuf>,
    /// Spaces per nesting level of regenerated text.
    #[arg(long, global = true, default_value_t = 2)]
    indent: usize,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report declarations that failed to parse.
    Check { path: Utf8PathBuf },
    /// Print declarations as JSON.
    Dump {
        path: Utf8PathBuf,
        /// Only the declaration with this name.
        #[arg(long)]
        decl: Option<String>,
    },
    /// Print the value at a path; `[*]` matches every index.
    Get { path: Utf8PathBuf, decl: String, value_path: String },
    /// Replace the value at a path with NDF text.
    Set {
        path: Utf8PathBuf,
        decl: String,
        value_path: String,
        value: String,
        /// Write here instead of back to `path`.
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },
    /// Verify that the file is reproduced exactly, both replayed and rebuilt.
    Roundtrip { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "ndf=info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = writer_options(&cli)?;

    match cli.command {
        Command::Check { path } => {
            let session = open(&path, options)?;
            let renderer = Renderer::styled();
            for diagnostic in session.diagnostics() {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), session.text()));
            }
            if !session.diagnostics().is_empty() {
                bail!("{} declaration(s) in `{path}` failed to parse", session.diagnostics().len());
            }
            tracing::info!(declarations = session.file().len(), "`{path}` is well formed");
            Ok(())
        }
        Command::Dump { path, decl } => {
            let session = open(&path, options)?;
            let dump = match decl {
                Some(name) => json::declaration(session.declaration(&name)?),
                None => session.file().declarations.iter().map(json::declaration).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&dump)?);
            Ok(())
        }
        Command::Get { path, decl, value_path } => {
            let session = open(&path, options)?;
            let value_path = Path::parse(&value_path)?;
            for concrete in session.expand(&decl, &value_path)? {
                let value = session.get(&decl, &concrete)?;
                let text = ndf_writer::write_value(value, session.tokens(), session.options());
                println!("{concrete} = {text}");
            }
            Ok(())
        }
        Command::Set { path, decl, value_path, value, out } => {
            let mut session = open(&path, options)?;
            let value_path = Path::parse(&value_path)?;
            let value = ndf_parse::parse_value(&value)
                .map_err(|diagnostic| anyhow::anyhow!("invalid value `{value}`: {}", diagnostic.message()))?;

            let targets = session.expand(&decl, &value_path)?;
            if targets.is_empty() {
                bail!("`{value_path}` matches nothing in `{decl}`");
            }
            for target in &targets {
                session.set(&decl, target, value.clone())?;
            }
            tracing::info!(count = targets.len(), "updated `{decl}`");

            match out {
                Some(out) => session.save_as(out)?,
                None => session.save()?,
            }
            Ok(())
        }
        Command::Roundtrip { path } => {
            let session = open(&path, options)?;
            let replayed = session.render();
            let all = (0..session.file().len()).collect::<DirtySet>();
            let rebuilt =
                ndf_writer::write(session.file(), session.tokens(), &all, session.options());

            for (label, text) in [("replayed", &replayed), ("rebuilt", &rebuilt)] {
                if let Some(offset) = first_difference(session.text(), text) {
                    bail!("{label} text of `{path}` differs from the source at byte {offset}");
                }
            }
            tracing::info!(bytes = replayed.len(), "`{path}` round-trips");
            Ok(())
        }
    }
}

fn writer_options(cli: &Cli) -> anyhow::Result<WriterOptions> {
    let profile = match &cli.profile {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read `{path}`"))?;
            let profile: FileProfile = toml::from_str(&text)
                .with_context(|| format!("invalid profile `{path}`"))?;
            Some(profile)
        }
        None => None,
    };
    Ok(WriterOptions { indent: cli.indent, profile })
}

/// Loads `path`, keeping the detected profile unless one was given.
fn open(path: &Utf8Path, options: WriterOptions) -> anyhow::Result<Session> {
    let session = Session::load(path).with_context(|| format!("failed to open `{path}`"))?;
    let profile = options.profile.or_else(|| session.options().profile.clone());
    Ok(session.with_options(WriterOptions { profile, ..options }))
}

fn first_difference(expected: &str, actual: &str) -> Option<usize> {
    let common = expected.bytes().zip(actual.bytes()).take_while(|(a, b)| a == b).count();
    (common != expected.len() || common != actual.len()).then_some(common)
}
