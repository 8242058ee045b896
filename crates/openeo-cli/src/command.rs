//! Command handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use openeo_actinia::ActiniaService;
use openeo_actinia::reqwest::ReqwestClient;
use openeo_runtime::{ErrorResponse, GraphCompiler, ProcessRegistry};
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::TRACING_TARGET_COMMAND;
use crate::config::{Cli, Command};

/// Runs the command selected on the command line.
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let service = if cli.needs_backend() {
        let client = ReqwestClient::new(cli.actinia.clone())
            .context("failed to create actinia client")?;
        Some(client.into_service())
    } else {
        None
    };

    let registry = build_registry(cli, service.as_ref()).await?;

    match &cli.command {
        Command::Processes => {
            let descriptions: Vec<_> = registry.describe_all().collect();
            print_json(&descriptions)
        }
        Command::Compile { path, submit } => {
            let config = cli.compiler.to_compiler_config()?;
            let compiler = GraphCompiler::with_config(Arc::new(registry), config);
            let service = service.filter(|_| *submit);
            compile(&compiler, path, service.as_ref()).await
        }
    }
}

/// Builds the process registry, importing backend modules when requested.
async fn build_registry(
    cli: &Cli,
    service: Option<&ActiniaService>,
) -> anyhow::Result<ProcessRegistry> {
    let mut registry = ProcessRegistry::builtin();

    if cli.compiler.discover
        && let Some(service) = service
    {
        let registered = service
            .discover_into(&mut registry)
            .await
            .context("failed to discover backend modules")?;

        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            registered,
            total = registry.len(),
            "Registered backend modules"
        );
    }

    Ok(registry)
}

/// Compiles the graph at `path` and prints or submits the chain.
async fn compile(
    compiler: &GraphCompiler,
    path: &Path,
    service: Option<&ActiniaService>,
) -> anyhow::Result<()> {
    let graph = read_graph(path).await?;

    let compiled = match compiler.compile_value(&graph) {
        Ok(compiled) => compiled,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET_COMMAND,
                code = %error.kind(),
                status_code = error.status_code(),
                "Process graph rejected"
            );
            print_json(&ErrorResponse::from(&error))?;
            bail!(error);
        }
    };

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        location = compiled.location(),
        steps = compiled.commands().len(),
        outputs = ?compiled.output_ids(),
        "Process graph compiled"
    );

    let Some(service) = service else {
        return print_json(&compiled.into_chain());
    };

    let response = service
        .submit_compiled(&compiled)
        .await
        .context("failed to submit process chain")?;
    print_json(&response.body)?;

    if !response.is_success() {
        bail!("actinia rejected the process chain with status {}", response.status_code);
    }
    Ok(())
}

/// Reads a JSON process graph from a file, or from stdin for `-`.
async fn read_graph(path: &Path) -> anyhow::Result<Value> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("failed to read process graph from stdin")?;
        text
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read process graph from {}", path.display()))?
    };

    serde_json::from_str(&text).context("process graph is not valid JSON")
}

/// Prints a value as pretty JSON to stdout.
fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
