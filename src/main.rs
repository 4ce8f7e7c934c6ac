use blockpress::components::ComponentStore;
use blockpress::config::{self, SiteConfig};
use blockpress::generate::{self, DirSink};
use blockpress::notion::NotionClient;
use blockpress::output::{self, ProjectSummary};
use blockpress::source::{self, ContentSource, SnapshotSource};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockpress")]
#[command(about = "Render a database of block-structured pages into static HTML")]
#[command(long_about = "\
Render a database of block-structured pages into static HTML

Every database row with a slug becomes one document. The slug \"home\" or
\"index\" becomes index.html; rows without a slug are skipped.

Project structure:

  site/
  ├── config.toml          # Site config (optional, merged over stock defaults)
  ├── components/          # Named HTML fragments for COMPONENT:<name> paragraphs
  │   └── footer.html
  └── assets/              # Copied verbatim to the output root

Credentials are read from the environment:
  NOTION_API_KEY       integration token
  NOTION_DATABASE_ID   database to publish (or source.database_id)

Run 'blockpress gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project directory (config.toml, components/, assets/)
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Read content from a JSON snapshot instead of the remote API
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Log progress at info level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: list → fetch → render → write
    Build,
    /// List pages and their output documents without fetching content
    Check,
    /// Capture every page and its content into a JSON snapshot
    Snapshot {
        /// Snapshot file to write
        file: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let open = || -> Result<(SiteConfig, Box<dyn ContentSource>), Box<dyn std::error::Error>> {
        let site_config = config::load_config(&cli.project)?;
        init_thread_pool(&site_config.processing);
        let source = open_source(cli.snapshot.as_deref(), &site_config.source)?;
        Ok((site_config, source))
    };

    match &cli.command {
        Command::Build => {
            let (site_config, source) = open()?;
            let components = ComponentStore::load_dir(&cli.project.join("components"))?;
            println!("==> Building {}", cli.output.display());
            std::fs::create_dir_all(&cli.output)?;
            let mut sink = DirSink::new(&cli.output);
            let report =
                generate::build(source.as_ref(), &components, &mut sink, &site_config)?;
            let copied = generate::copy_assets(&cli.project.join("assets"), &cli.output)?;
            output::print_build_output(&report, copied);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.project.display());
            let (_, source) = open()?;
            let pages = source.list_pages()?;
            let components = ComponentStore::load_dir(&cli.project.join("components"))?;
            let project = ProjectSummary {
                has_config_file: cli.project.join("config.toml").exists(),
                has_assets: cli.project.join("assets").is_dir(),
                components: components.names().map(str::to_string).collect(),
            };
            output::print_check_output(&pages, &project);
            println!("==> Configuration is valid");
        }
        Command::Snapshot { file } => {
            let (site_config, source) = open()?;
            let snapshot =
                source::capture_snapshot(source.as_ref(), site_config.source.parallel_fetch)?;
            snapshot.save(file)?;
            output::print_snapshot_output(&snapshot, file);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Snapshot file when given, otherwise the remote API.
fn open_source(
    snapshot: Option<&Path>,
    config: &config::SourceConfig,
) -> Result<Box<dyn ContentSource>, source::SourceError> {
    match snapshot {
        Some(path) => Ok(Box::new(SnapshotSource::load(
            path,
            config.page_size as usize,
        )?)),
        None => Ok(Box::new(NotionClient::from_config(config)?)),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
