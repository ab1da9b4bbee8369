use clap::{Parser, Subcommand};
use docdex::pipeline::{self, Step};
use docdex::{config, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docdex")]
#[command(about = "Build helper for markdown documentation sites")]
#[command(long_about = "\
Build helper for markdown documentation sites

Regenerates the pages a docs site derives from its content: tag pages,
section indexes, the sidebar and a combined page with every doc.

Content structure:

  docs/
  ├── docdex.toml                 # Build config (optional)
  ├── .vuepress/
  │   ├── config.json             # Site config; themeConfig.sidebar is rewritten
  │   └── override.styl           # $accentColor line is rewritten
  ├── snippets/                   # Section folder
  │   ├── README.md               # Generated index page
  │   └── git.md                  # Frontmatter: tags, cover, description
  ├── tags/                       # Generated: one page per configured tag
  └── all/README.md               # Generated: every section on one page

Steps run in order: tags → sections → sidebar → all-docs → theme.
A failing step is reported and the rest still run; the exit status is
non-zero if any step failed. Set CI to skip the local_only folders.

Run 'docdex gen-config' to generate a documented docdex.toml.")]
#[command(version)]
struct Cli {
    /// Content root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every step: tags → sections → sidebar → all-docs → theme
    Build,
    /// Write tag pages and the tag directory
    Tags,
    /// Write section index pages
    Sections,
    /// Rewrite the sidebar in the site config
    Sidebar,
    /// Write the combined "All Docs" page
    AllDocs,
    /// Apply the accent color to the stylesheet, icons and manifest
    Theme,
    /// Scan content and report malformed frontmatter and undefined tags
    Check,
    /// Print a stock docdex.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ci = std::env::var_os("CI").is_some();

    let steps = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::Check => {
            let config = config::load_config(&cli.root)?;
            println!("==> Checking {}", cli.root.display());
            let report = pipeline::check(&cli.root, &config)?;
            output::print_check_report(&report);
            if !report.is_clean() {
                return Err("content has problems".into());
            }
            println!("==> Content is valid");
            return Ok(());
        }
        Command::Build => None,
        Command::Tags => Some(Step::Tags),
        Command::Sections => Some(Step::Sections),
        Command::Sidebar => Some(Step::Sidebar),
        Command::AllDocs => Some(Step::AllDocs),
        Command::Theme => Some(Step::Theme),
    };

    let config = config::load_config(&cli.root)?;
    println!("==> Building {}", cli.root.display());
    let report = match steps {
        Some(step) => pipeline::run_steps(&cli.root, &config, ci, &[step]),
        None => pipeline::run(&cli.root, &config, ci),
    };
    output::print_build_report(&report);

    let failed = report.failures().count();
    if failed > 0 {
        return Err(format!("{failed} step(s) failed").into());
    }
    println!("==> Build complete");
    Ok(())
}
