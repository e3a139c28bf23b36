//! Flowgen - Application generator for microfluidic control software
//!
//! Main CLI entry point for generating applications and inspecting device
//! data files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flowgen::alias::AliasTable;
use flowgen::app::{AppGenerator, AppSpec};
use flowgen::codegen::join_ints;
use flowgen::config::FlowgenConfig;
use flowgen::datafile::DeviceData;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "flowgen")]
#[command(version)]
#[command(about = "Generate control applications from a template and a device data file", long_about = None)]
struct Cli {
    /// Configuration file (default: flowgen.toml in this or a parent directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect instructions, parameter groups and dense maps of a data file
    Inspect {
        /// Device data file
        data: PathBuf,
    },

    /// Generate an application from the template set
    Make {
        /// Prefix of the application (e.g. "Chip" -> ChipDriver.java)
        app: String,

        /// Chip image (default: <APP>.png)
        #[arg(requires = "data")]
        image: Option<PathBuf>,

        /// Device data file (default: <APP>.dat)
        data: Option<PathBuf>,

        /// Prefix of the template set
        #[arg(long)]
        template: Option<String>,

        /// Directory holding the template files
        #[arg(long)]
        templates_dir: Option<PathBuf>,

        /// Directory generated files are written to
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Generate and validate everything without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the generated instruction shortcuts for a data file
    Shortcuts {
        /// Device data file
        data: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { data } => cmd_inspect(&data),
        Commands::Make {
            app,
            image,
            data,
            template,
            templates_dir,
            out_dir,
            dry_run,
        } => {
            let mut config = config;
            if let Some(prefix) = template {
                println!("using template {}", prefix);
                config.template.prefix = prefix;
            }
            if let Some(dir) = templates_dir {
                config.template.dir = dir;
            }
            if let Some(dir) = out_dir {
                config.output.dir = dir;
            }

            let mut target = AppSpec::new(app);
            if let (Some(image), Some(data)) = (image, data) {
                target = target.with_inputs(image, data);
            }
            cmd_make(config, &target, dry_run)
        }
        Commands::Shortcuts { data, output } => cmd_shortcuts(config, &data, output.as_deref()),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<FlowgenConfig> {
    match path {
        Some(path) => FlowgenConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => FlowgenConfig::load_from_cwd().context("Failed to load flowgen.toml"),
    }
}

fn cmd_make(config: FlowgenConfig, target: &AppSpec, dry_run: bool) -> Result<()> {
    println!(
        "make {} ({}, {}) from template {}",
        target.app_prefix,
        target.image.display(),
        target.data.display(),
        config.template.prefix
    );

    let generator = AppGenerator::new(config);
    let staged = generator
        .stage(target)
        .context("Generation aborted, no files written")?;

    let aliases = staged.aliases();
    println!(
        "{} instructions, {} parameter groups",
        aliases.instructions.len(),
        aliases.groups.len()
    );
    for diagnostic in staged.diagnostics() {
        println!("warning: {}", diagnostic);
    }

    if dry_run {
        for file in staged.files() {
            println!(
                "would write {} ({} bytes)",
                file.path.display(),
                file.contents.len()
            );
        }
        return Ok(());
    }

    let written = staged.commit().context("Failed to write output")?;
    for path in &written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_shortcuts(config: FlowgenConfig, data: &Path, output: Option<&Path>) -> Result<()> {
    let device = DeviceData::load(data).context("Failed to read data file")?;
    let table = AliasTable::from_names(&device.instruction_names);
    let code = AppGenerator::new(config).shortcuts(&table);

    match output {
        Some(path) => {
            fs::write(path, &code).context("Failed to write output")?;
            println!("Wrote {} bytes to {}", code.len(), path.display());
        }
        None => println!("{}", code),
    }
    Ok(())
}

fn cmd_inspect(data: &Path) -> Result<()> {
    let device = DeviceData::load(data).context("Failed to read data file")?;
    let table = AliasTable::from_names(&device.instruction_names);

    println!(
        "Image {}x{}, {} control lines, {} instructions",
        device.image_width, device.image_height, device.control_lines, device.instruction_count
    );
    println!(
        "Pumps region: {}",
        if device.instruction_pumps.is_some() {
            "present"
        } else {
            "synthesized"
        }
    );

    println!("\nInstructions ({}):", table.instructions.len());
    for instruction in &table.instructions {
        println!("  {:>4}  {}", instruction.index, instruction.name);
    }

    println!("\nParameter groups ({}):", table.groups.len());
    for alias in &table.groups {
        println!(
            "  {}  dims {:?}  strides {:?}  entries {}",
            alias.group.base_name,
            alias.map.shape(),
            alias.map.strides(),
            alias.group.entries.len()
        );
        println!("    map {{{}}}", join_ints(alias.map.cells().iter().copied()));
    }

    if !table.diagnostics.is_empty() {
        println!("\nDiagnostics ({}):", table.diagnostics.len());
        for diagnostic in &table.diagnostics {
            println!("  warning: {}", diagnostic);
        }
    }

    Ok(())
}
