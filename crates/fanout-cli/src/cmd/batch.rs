use crate::output;
use anyhow::bail;
use fanout_core::{ActionResult, Engine, OutcomeStatus, Registry};
use std::path::PathBuf;

/// Execute every configured action in declaration order and print the
/// results. Individual call failures are reported in the outcomes; only a
/// pod resolution failure makes the run exit non-zero.
pub fn run(config: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let registry = super::load_registry(config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let engine = super::connect_engine().await?;
        execute_all(&registry, &engine, json).await
    })
}

/// Run every action against a pre-built engine. Returns `Err` only when at
/// least one action aborted on a pod resolution failure; actions whose
/// outcomes failed still count as complete.
async fn execute_all(registry: &Registry, engine: &Engine, json: bool) -> anyhow::Result<()> {
    let mut results: Vec<ActionResult> = Vec::new();
    let mut aborted: Vec<(String, String)> = Vec::new();
    for action in registry.actions() {
        match engine.execute(action).await {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::error!(action = %action.name, error = %e, "action aborted");
                aborted.push((action.name.clone(), e.to_string()));
            }
        }
    }

    if json {
        output::print_json(&results)?;
    } else {
        print_results(&results);
    }

    if !aborted.is_empty() {
        for (action, reason) in &aborted {
            eprintln!("action {action} aborted: {reason}");
        }
        bail!(
            "{} of {} actions aborted",
            aborted.len(),
            registry.actions().len()
        );
    }
    Ok(())
}

fn print_results(results: &[ActionResult]) {
    for result in results {
        println!(
            "\naction {}: {} succeeded, {} failed",
            result.action, result.succeeded, result.failed
        );
        let rows = result
            .outcomes
            .iter()
            .map(|o| {
                vec![
                    o.pod.clone(),
                    o.request.clone(),
                    match o.status {
                        OutcomeStatus::Succeeded => "succeeded".to_string(),
                        OutcomeStatus::Failed => "failed".to_string(),
                    },
                    o.attempts.to_string(),
                    o.status_code.map(|c| c.to_string()).unwrap_or_default(),
                    format!("{}ms", o.elapsed_ms),
                ]
            })
            .collect();
        output::print_table(
            &["POD", "REQUEST", "STATUS", "ATTEMPTS", "CODE", "ELAPSED"],
            rows,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
