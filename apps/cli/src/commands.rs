//! CLI command definitions, routing, and tracing setup.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use fluentsitemap_core::{ControllerSet, SitemapConfigurator, SitemapNode, XmlOptions};
use fluentsitemap_routing::{AppRoot, HostContext, RequestContext, RouteTable};
use fluentsitemap_shared::{AppConfig, CONFIG_FILE_NAME, NodeConfig, init_config, load_config_from};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// FluentSitemap: build sitemaps.org documents from routes and controllers.
#[derive(Parser)]
#[command(
    name = "fluentsitemap",
    version,
    about = "Build a sitemaps.org XML document from a site manifest.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Site manifest to read.
    #[arg(long, default_value = CONFIG_FILE_NAME, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scan the configured controllers and write the sitemap.
    Generate {
        /// Output path; `~/` is relative to the site root. Defaults to `output.path`.
        #[arg(short, long)]
        out: Option<String>,

        /// Print the document instead of saving it.
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a starter manifest.
    Init,
    /// Show the resolved manifest.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "fluentsitemap=info",
        1 => "fluentsitemap=debug",
        _ => "fluentsitemap=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate { out, stdout } => cmd_generate(&cli.config, out.as_deref(), stdout),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&cli.config),
            ConfigAction::Show => cmd_config_show(&cli.config),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(config_path: &Path, out: Option<&str>, stdout: bool) -> Result<()> {
    let config = load_config_from(config_path)?;
    let host = build_host(&config, config_path)?;

    let mut sitemap = SitemapConfigurator::new(host).with_options(XmlOptions {
        indent: config.output.indent,
    });

    let registry = ControllerSet::from(config.controllers.clone());
    sitemap
        .from_registry(&registry)
        .wrap_err("failed to resolve controller actions")?;

    for entry in &config.nodes {
        let node = literal_node(sitemap.host(), entry);
        sitemap
            .add(node)
            .wrap_err_with(|| format!("invalid node {}", entry.location))?;
    }

    info!(
        nodes = sitemap.len(),
        controllers = config.controllers.len(),
        "sitemap assembled"
    );

    if stdout {
        let mut handle = std::io::stdout().lock();
        sitemap.export().write_xml(&mut handle)?;
        writeln!(handle)?;
        return Ok(());
    }

    let target = sitemap.save(out.unwrap_or(&config.output.path))?;

    println!();
    println!("  Sitemap written!");
    println!("  Nodes:  {}", sitemap.len());
    println!("  Path:   {}", target.display());
    println!();

    Ok(())
}

fn cmd_config_init(config_path: &Path) -> Result<()> {
    let path = init_config(config_path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: &Path) -> Result<()> {
    let config: AppConfig = load_config_from(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Host wiring
// ---------------------------------------------------------------------------

/// Router, path resolver and request context for the manifest's site.
///
/// A relative `root_dir` is taken from the manifest's own directory.
fn build_host(config: &AppConfig, config_path: &Path) -> Result<HostContext> {
    let request = RequestContext::parse(&config.site.base_url)?;

    let known = config
        .controllers
        .iter()
        .map(|c| c.logical_name().to_string());
    let routes = RouteTable::from_config(&config.routes)?.with_known_controllers(known);

    let root = Path::new(&config.site.root_dir);
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        config_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(root)
    };

    let paths = AppRoot::new(root);
    debug!(
        base_url = request.base_url(),
        root = %paths.root().display(),
        routes = routes.routes().len(),
        "host ready"
    );
    Ok(HostContext::new(request, routes, paths))
}

/// A manifest node; app-relative locations get the site base prefixed.
fn literal_node(host: &HostContext, entry: &NodeConfig) -> SitemapNode {
    let mut node = SitemapNode::at(host.request().absolute(&entry.location));
    node.with_last_modified(entry.lastmod)
        .with_change_frequency(entry.changefreq)
        .with_priority(entry.priority);
    node
}
