//! Command handlers for `tables` and `compute`.

use std::path::Path;

use routecalc_amap::AmapClient;
use routecalc_batch::{
    run_pipeline, BatchError, BatchSettings, FieldKind, RunRequest, RunState, RunSummary, TableHost,
};
use routecalc_core::RoutingStrategy;
use tokio_util::sync::CancellationToken;

use crate::workbook::Workbook;
use crate::ComputeArgs;

pub(crate) async fn run_list_tables(path: &Path) -> anyhow::Result<()> {
    let workbook = Workbook::open(path)?;
    let tables = workbook.list_tables().await?;
    if tables.is_empty() {
        println!("no tables in {}", path.display());
        return Ok(());
    }

    for table in tables {
        println!("{} ({})", table.id, table.name);
        for kind in [FieldKind::Location, FieldKind::Number] {
            let fields = workbook.fields_of_kind(&table.id, kind).await?;
            let listed: Vec<String> = fields
                .iter()
                .map(|f| format!("{} ({})", f.id, f.name))
                .collect();
            let listed = if listed.is_empty() {
                "-".to_string()
            } else {
                listed.join(", ")
            };
            println!("  {kind:<8} {listed}");
        }
    }
    Ok(())
}

pub(crate) fn build_run_request(args: &ComputeArgs) -> RunRequest {
    RunRequest {
        table_id: args.table.clone(),
        origin_field: args.origin_field.clone(),
        destination_field: args.destination_field.clone(),
        mode: args.mode,
        strategy: args.strategy.as_deref().and_then(RoutingStrategy::new),
        distance_field: args.distance_field.clone(),
        duration_field: args.duration_field.clone(),
    }
}

/// Runs the pipeline over one workbook table. Ctrl-C stops the run after the
/// record in flight; results of the unfinished batch are not written.
///
/// # Errors
///
/// Returns an error if configuration, the workbook, or the client cannot be
/// loaded, or if the run fails at run level (invalid request, failed write).
/// Per-record failures are reported in the summary, not propagated. A failed
/// write still prints the summary of the batches written before it.
pub(crate) async fn run_compute(args: ComputeArgs) -> anyhow::Result<()> {
    let config = routecalc_core::load_app_config_with_key(args.api_key.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    let workbook = Workbook::open(&args.workbook)?;
    let client = AmapClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build AMap client: {e}"))?;

    let mut settings = BatchSettings::from_config(&config);
    if let Some(batch_size) = args.batch_size {
        settings.batch_size = usize::from(batch_size);
    }

    let token = CancellationToken::new();
    let stop = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("stop requested; finishing the current record");
            stop.cancel();
        }
    });

    let request = build_run_request(&args);
    match run_pipeline(&workbook, &client, settings, request, token).await {
        Ok(summary) => report(&summary, args.json),
        Err(err) => {
            if let BatchError::Flush { summary, .. } = &err {
                report(summary, args.json)?;
            }
            Err(err.into())
        }
    }
}

fn report(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
    print_summary(summary);
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    match summary.state {
        RunState::Completed => println!("Run completed."),
        RunState::Stopped => println!("Run stopped by user; some results were not written."),
        RunState::Aborted => println!("Run aborted by a failed write; earlier batches were saved."),
    }
    println!("  {summary}");
    println!(
        "  fetched {} records, wrote {} batches",
        summary.fetched, summary.batches_written
    );
    if !summary.failures.is_empty() {
        println!("  failed records:");
        for failure in &summary.failures {
            println!("    {}: {}", failure.record_id, failure.message);
        }
    }
}
