//! lensgen CLI entrypoint
//! Parses command-line arguments, loads operation models and prints the lens template context.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use lensgen_core::{BindingEngine, BindingSet, CollisionPolicy, Config, OperationModel, RenderContext};
use tokio::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lensgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Derive lens declarations and imports from resolved operation models
    Bindings {
        /// Path or URL to an operation model (YAML or JSON)
        ///
        /// Repeat to process several operation groups; each group is computed
        /// independently and the results are merged.
        /// Example: --operations pets.yaml --operations https://example.com/users.json
        #[arg(long = "operations", required = true)]
        operations: Vec<String>,
        /// Configuration file (YAML, or TOML with a .toml extension)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Import providing the body auto-conversion (overrides the config)
        #[arg(long)]
        lens_spec_import: Option<String>,
        /// last-wins, first-wins or strict (overrides the config)
        #[arg(long)]
        collision_policy: Option<CollisionPolicy>,
        /// Write the context here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Exit with an error if any warning was produced
        #[arg(long)]
        deny_warnings: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Bindings {
            operations,
            config,
            lens_spec_import,
            collision_policy,
            output,
            deny_warnings,
        } => {
            let mut config = Config::load(config.as_deref())
                .await
                .context("Failed to load configuration")?;
            if let Some(import) = lens_spec_import {
                config.lens_spec_import = import;
            }
            if let Some(policy) = collision_policy {
                config.collision_policy = policy;
            }
            tracing::debug!(?config, "Resolved configuration");

            let models = OperationModel::load_all(&operations)
                .await
                .context("Failed to load operation models")?;

            let engine = BindingEngine::new(config);
            let bindings = compute_groups(&engine, &operations, &models)?;

            tracing::info!(
                declarations = bindings.declarations.len(),
                imports = bindings.imports.len(),
                warnings = bindings.warnings.len(),
                "Derived lens bindings"
            );

            let rendered = RenderContext::from(&bindings).to_pretty_string()?;
            match output {
                Some(path) => {
                    fs::write(&path, rendered + "\n")
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Wrote lens context to {}", path.display());
                }
                None => println!("{}", rendered),
            }

            if deny_warnings && bindings.has_warnings() {
                anyhow::bail!(
                    "{} warning(s) produced and --deny-warnings is set",
                    bindings.warnings.len()
                );
            }
        }
    }
    Ok(())
}

/// Compute each group on its own and merge the results in command-line order
fn compute_groups(
    engine: &BindingEngine,
    locations: &[String],
    models: &[OperationModel],
) -> anyhow::Result<BindingSet> {
    let policy = engine.config().collision_policy;
    let mut merged: Option<BindingSet> = None;

    for (location, model) in locations.iter().zip(models) {
        let group = engine
            .compute_bindings(&model.operations)
            .with_context(|| format!("Failed to derive bindings for {}", location))?;
        tracing::debug!(
            location = location.as_str(),
            declarations = group.declarations.len(),
            "Computed operation group"
        );
        merged = Some(match merged {
            None => group,
            Some(acc) => acc
                .merge(group, policy)
                .with_context(|| format!("Failed to merge bindings for {}", location))?,
        });
    }

    Ok(merged.unwrap_or_default())
}
