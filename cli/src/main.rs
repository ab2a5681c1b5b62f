//! CLI entrypoint for switchyard
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use switchyard_application::{
    DispatchInput, KnowledgeBase, NoProgress, Switchyard, TraceLogger,
};
use switchyard_domain::{ConfigIssue, ObservationLimit};
use switchyard_infrastructure::{
    ConfigLoader, DirectoryKnowledgeBase, FileConfig, FileManifestSource, FileOutputFormat,
    HttpDecisionConfig, HttpDecisionService, JsonlTraceLogger, ManifestWatcher, default_registry,
};
use switchyard_presentation::{
    ChatRepl, Cli, Command, ConsoleFormatter, OutputConfig, OutputFormat, ProgressReporter,
    ReplConfig,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        for line in ConfigLoader::config_sources() {
            println!("{}", line);
        }
        println!();
        println!("{}", config.to_toml().context("Failed to render configuration")?);
        return Ok(());
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let output_config = output_config(&config);
    if !output_config.color {
        colored::control::set_override(false);
    }

    info!("Starting switchyard");

    // === Dependency Injection ===
    let files = FileManifestSource::new(&config.manifests.tools, &config.manifests.agents);
    let switchyard = Arc::new(build_switchyard(&config, files.clone())?);

    match command {
        Command::Check => run_check(&config, &switchyard).await,
        Command::Agents => {
            switchyard.reload().await?;
            println!("{}", ConsoleFormatter::format_agents(&switchyard.agent_info()));
            Ok(())
        }
        Command::Tools => {
            switchyard.reload().await?;
            println!(
                "{}",
                ConsoleFormatter::format_tools(&switchyard.available_tools())
            );
            Ok(())
        }
        Command::Ask {
            message,
            detailed,
            output,
        } => {
            switchyard.reload().await?;
            let format = output.unwrap_or(output_config.format);
            run_ask(&switchyard, &message, detailed, format, !cli.quiet).await
        }
        Command::Chat { watch } => {
            let loaded = switchyard.reload().await?;
            info!(agents = loaded, "Agents ready");

            let token = CancellationToken::new();
            let watcher = if watch || config.reload.watch {
                let watcher = ManifestWatcher::new(files, config.reload.poll_interval());
                Some(watcher.spawn(Arc::clone(&switchyard), token.clone()).await)
            } else {
                None
            };

            let mut repl = ChatRepl::new(Arc::clone(&switchyard))
                .with_config(repl_config(&config))
                .with_progress(config.repl.show_progress && !cli.quiet);
            let outcome = repl.run().await;

            token.cancel();
            if let Some(handle) = watcher {
                let _ = handle.await;
            }
            outcome.context("Chat session failed")
        }
    }
}

fn build_switchyard(config: &FileConfig, files: FileManifestSource) -> Result<Switchyard> {
    let (params, mut issues) = config.dispatch_params();
    let (rules, rule_issues) = config.routing_rules();
    issues.extend(rule_issues);
    for issue in &issues {
        warn!(code = ?issue.code, "{}", issue.message);
    }

    let knowledge: Option<Arc<dyn KnowledgeBase>> = config
        .knowledge
        .directory
        .as_ref()
        .map(|dir| Arc::new(DirectoryKnowledgeBase::new(dir)) as Arc<dyn KnowledgeBase>);

    let decision = HttpDecisionService::new(HttpDecisionConfig::from(&config.decision))
        .map_err(|e| anyhow!("Failed to create decision service: {}", e))?;
    info!(url = %decision.url(), "Decision service configured");

    let mut builder = Switchyard::builder(Arc::new(decision), Arc::new(files))
        .with_registry(default_registry(knowledge))
        .with_dispatch_params(params)
        .with_rules(rules)
        .with_reload_params(config.reload.to_params());

    if let Some(path) = &config.logging.trace_file
        && let Some(logger) = JsonlTraceLogger::new(path)
    {
        info!(path = %logger.path().display(), "Execution trace enabled");
        builder = builder.with_trace_logger(Arc::new(logger) as Arc<dyn TraceLogger>);
    }

    Ok(builder.build())
}

async fn run_check(config: &FileConfig, switchyard: &Switchyard) -> Result<()> {
    let mut issues = config.validate();
    match switchyard.check().await {
        Ok(manifest_issues) => issues.extend(manifest_issues),
        Err(e) => {
            println!("{}", ConsoleFormatter::format_issues(&issues));
            bail!("Manifests could not be loaded: {}", e);
        }
    }

    print!("{}", ConsoleFormatter::format_issues(&issues));
    if ConfigIssue::has_errors(&issues) {
        bail!("Configuration check failed");
    }
    Ok(())
}

async fn run_ask(
    switchyard: &Switchyard,
    message: &str,
    detailed: bool,
    format: OutputFormat,
    show_progress: bool,
) -> Result<()> {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let limit = if detailed {
        ObservationLimit::Unbounded
    } else {
        switchyard.params().simple_observation_limit
    };
    let input = DispatchInput::new(message)
        .with_limit(limit)
        .with_cancellation(token);

    let result = if show_progress && format == OutputFormat::Text {
        switchyard.dispatch_with(input, &ProgressReporter::new()).await
    } else {
        switchyard.dispatch_with(input, &NoProgress).await
    };

    let output = match (format, detailed) {
        (OutputFormat::Json, _) => ConsoleFormatter::format_json(&result),
        (OutputFormat::Text, true) => ConsoleFormatter::format_detailed(&result),
        (OutputFormat::Text, false) => ConsoleFormatter::format(&result),
    };
    println!("{}", output);
    Ok(())
}

fn output_config(config: &FileConfig) -> OutputConfig {
    OutputConfig {
        format: match config.output.format.unwrap_or_default() {
            FileOutputFormat::Text => OutputFormat::Text,
            FileOutputFormat::Json => OutputFormat::Json,
        },
        color: config.output.color,
    }
}

fn repl_config(config: &FileConfig) -> ReplConfig {
    ReplConfig {
        show_progress: config.repl.show_progress,
        history_file: config.repl.history_file.as_ref().map(PathBuf::from),
    }
}
