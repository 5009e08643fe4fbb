use std::sync::Arc;

use clap::Parser;

use caskpkg::models::{PackageManifest, RunConfig};
use caskpkg::utils::command::{CommandRunner, DryRunRunner, SystemCommandRunner};
use caskpkg::{AppResult, PkgArtifact};

mod cli;

use cli::{Cli, Commands};

fn load_config(cli: &Cli) -> RunConfig {
    let mut config = cli
        .config
        .clone()
        .or_else(RunConfig::default_path)
        .map(|path| RunConfig::load(&path))
        .unwrap_or_default();

    if cli.verbose {
        config.verbose = true;
    }
    if let Some(secs) = cli.timeout {
        config.command_timeout_secs = secs;
    }
    config
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = load_config(&cli);
    let manifest = PackageManifest::from_file(cli.command.manifest())?;

    let has_work = match cli.command {
        Commands::Install { .. } => !manifest.install.is_empty(),
        Commands::Uninstall { .. } => !manifest.uninstall.is_empty(),
    };

    let runner: Arc<dyn CommandRunner> = if cli.dry_run {
        Arc::new(DryRunRunner)
    } else {
        let runner = SystemCommandRunner::new(&config);
        if has_work && !runner.pre_authenticate().await {
            log::warn!("sudo pre-authentication failed; elevated commands may prompt again");
        }
        Arc::new(runner)
    };

    let artifact = PkgArtifact::new(manifest.context(), runner, config);
    match cli.command {
        Commands::Install { .. } => {
            artifact.install(&manifest.install).await?;
            log::info!("{} was successfully installed", artifact.package().token);
        }
        Commands::Uninstall { .. } => {
            artifact.uninstall(&manifest.uninstall).await?;
            log::info!("{} was successfully uninstalled", artifact.package().token);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
