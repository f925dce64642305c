use clap::{Parser, Subcommand};
use cstitch_tools::docs::RecordType;
use cstitch_tools::floss::FlossFormat;
use cstitch_tools::release::SystemTools;
use cstitch_tools::{config, docs, floss, icons, output, release};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "cstitch-tools")]
#[command(about = "Build and release tooling for the Cstitch pattern editor")]
#[command(long_about = "\
Build and release tooling for the Cstitch pattern editor

All paths are relative to the project root (--root, default: current
directory). Defaults can be overridden in <root>/tools.toml.

Project layout:

  <root>/
  ├── tools.toml                 # Optional overrides (see gen-config)
  ├── main.cpp                   # setProgramVersion(\"X.Y.Z.B\") → release version
  ├── iconResources.qrc          # Qt resources; icons/*.png references
  ├── dmc.xml                    # kxstitch floss table
  ├── doc/
  │   ├── docData.xml            # Help pages: title, intro, mainBody, outro
  │   ├── html_template.html     # @@title, @@css, @@body (see gen-template)
  │   └── web/README_linux       # Shipped with Linux releases
  └── versions/                  # Release archives land here

Run 'cstitch-tools gen-config' to generate a documented tools.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate HTML documentation from the XML page data
    Docs {
        /// Only generate one layout: multi or singleWeb
        #[arg(long)]
        layout: Option<RecordType>,
    },
    /// Zip the icons referenced by the Qt resource file
    Icons,
    /// Convert the floss XML table to C++ source lines
    Floss {
        /// Output format
        #[arg(long, value_enum, default_value_t = FlossFormat::Cpp)]
        format: FlossFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build a release archive for a compiled binary
    Package {
        /// Binary to package, relative to the root; a name ending in "exe" is packaged for Windows
        binary: PathBuf,
    },
    /// Validate tools.toml and the documentation inputs without writing
    Check,
    /// Print a stock tools.toml with all options documented
    GenConfig,
    /// Print a stock HTML template for the documentation
    GenTemplate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Docs { layout } => {
            let config = config::load_config(&cli.root)?;
            let report = docs::generate(&cli.root, &config.docs, layout)?;
            output::print_docs_output(&report, &cli.root);
        }
        Command::Icons => {
            let config = config::load_config(&cli.root)?;
            let result = icons::archive_icons(&cli.root, &config.icons)?;
            output::print_icons_output(&result, &cli.root);
        }
        Command::Floss {
            format,
            output: destination,
        } => {
            let config = config::load_config(&cli.root)?;
            let flosses = floss::load_floss_table(&cli.root.join(&config.floss.source))?;
            let rendered = floss::render(&flosses, format, &config.floss.list_name)?;
            let summary = output::format_floss_summary(flosses.len(), destination.as_deref());
            match &destination {
                Some(path) => {
                    std::fs::write(path, rendered)?;
                    summary.iter().for_each(|line| println!("{}", line));
                }
                None => {
                    print!("{}", rendered);
                    // Keep stdout parseable when it carries JSON.
                    if format == FlossFormat::Json {
                        summary.iter().for_each(|line| eprintln!("{}", line));
                    } else {
                        summary.iter().for_each(|line| println!("{}", line));
                    }
                }
            }
        }
        Command::Package { binary } => {
            let config = config::load_config(&cli.root)?;
            let package = release::package(&cli.root, &config.release, &binary, &SystemTools)?;
            output::print_package_output(&package, &cli.root);
        }
        Command::Check => {
            println!("==> Checking {}", cli.root.display());
            let config = config::load_config(&cli.root)?;
            let check = docs::check(&cli.root, &config.docs)?;
            output::print_check_output(&check);
            println!("==> Inputs are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenTemplate => {
            print!("{}", docs::template::stock_template());
        }
    }

    Ok(())
}
