//! Modelpack CLI - package notebook model code for deployment.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use modelpack_core::{build_package, sanitize_package_name, Capability};

#[derive(Parser)]
#[command(name = "modelpack")]
#[command(about = "Package notebook model code into a deployable source package")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a source package from a notebook
    Pack {
        /// Path to the notebook (.ipynb file)
        notebook: PathBuf,

        /// Package name (sanitized to lowercase and hyphens)
        #[arg(long)]
        name: String,

        /// Package description
        #[arg(long, default_value = "")]
        description: String,

        /// Operations the packaged model must support
        #[arg(long, value_enum, default_value = "predict")]
        capability: CapabilityArg,

        /// Output directory for the package tree
        #[arg(long, default_value = "build")]
        build_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CapabilityArg {
    /// Prediction only
    Predict,
    /// Training only
    Train,
    /// Both training and prediction
    PredictTrain,
}

impl From<CapabilityArg> for Capability {
    fn from(arg: CapabilityArg) -> Self {
        match arg {
            CapabilityArg::Predict => Capability::Predict,
            CapabilityArg::Train => Capability::Train,
            CapabilityArg::PredictTrain => Capability::PredictAndTrain,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Pack {
            notebook,
            name,
            description,
            capability,
            build_dir,
        } => {
            let package_name = sanitize_package_name(&name);
            if package_name.is_empty() {
                anyhow::bail!("package name `{name}` contains no usable characters");
            }
            let package_dir = build_package(
                &notebook,
                capability.into(),
                &package_name,
                &description,
                &build_dir,
            )?;
            println!("Built package at {}", package_dir.display());
        }
    }

    Ok(())
}
