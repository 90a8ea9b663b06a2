//! End-to-end batch run.
//!
//! `Idle -> Fetching -> ProcessingBatch -> Flushing -> (ProcessingBatch | Done | Stopped)`
//!
//! Records are processed one at a time; the run's cancellation token is polled
//! before each page fetch, before each record and before each batch write.
//! Every run takes its own token, so a stopped run never leaks into the next.

use std::time::Instant;

use futures::TryStreamExt;
use routecalc_amap::{AmapClient, DistanceCalculator, DistanceSource};
use routecalc_core::{AppConfig, LocationValue};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use crate::error::BatchError;
use crate::pacing::Pacer;
use crate::pager::RecordPager;
use crate::request::RunRequest;
use crate::summary::{RecordOutcome, RunState, RunSummary, SkipReason};
use crate::table::{Record, RecordUpdate, TableHost};

/// Tunables for one run.
#[derive(Debug, Clone, Copy)]
pub struct BatchSettings {
    pub page_size: usize,
    pub batch_size: usize,
    pub pacer: Pacer,
}

impl BatchSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            batch_size: config.batch_size,
            pacer: Pacer::from_config(config),
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            page_size: 200,
            batch_size: 10,
            pacer: Pacer::new(50, 100),
        }
    }
}

pub struct BatchOrchestrator<'a, H: TableHost + ?Sized, S: DistanceSource + ?Sized> {
    host: &'a H,
    source: &'a S,
    settings: BatchSettings,
}

impl<'a, H: TableHost + ?Sized, S: DistanceSource + ?Sized> BatchOrchestrator<'a, H, S> {
    pub fn new(host: &'a H, source: &'a S, settings: BatchSettings) -> Self {
        Self {
            host,
            source,
            settings,
        }
    }

    /// Runs the whole pipeline for `request`, stopping cooperatively once
    /// `token` is cancelled.
    ///
    /// Cancellation is not an error: the returned summary is marked
    /// [`RunState::Stopped`].
    ///
    /// # Errors
    ///
    /// - [`BatchError::InvalidRequest`] / [`BatchError::Table`] when the
    ///   request does not fit the table.
    /// - [`BatchError::PaginationLimit`] or [`BatchError::Table`] while paging.
    /// - [`BatchError::Flush`] when a batched write fails; the run stops there
    ///   and the error carries the summary up to that point.
    pub async fn run(
        &self,
        request: RunRequest,
        token: CancellationToken,
    ) -> Result<RunSummary, BatchError> {
        let started = Instant::now();
        let mut summary = RunSummary::start();
        tracing::debug!(table = %request.table_id, mode = %request.mode, "state: idle -> fetching");

        let request = request.validate(self.host).await?;

        let pager = RecordPager::new(
            self.host,
            &request.table_id,
            self.settings.page_size,
            &token,
        );
        let records: Vec<Record> = match pager.records().try_collect().await {
            Ok(records) => records,
            Err(BatchError::Cancelled) => {
                tracing::debug!("state: fetching -> stopped");
                return Ok(Self::finish(summary, RunState::Stopped, started));
            }
            Err(e) => return Err(e),
        };
        summary.fetched = records.len();
        tracing::info!(
            table = %request.table_id,
            records = records.len(),
            mode = %request.mode,
            "fetched records"
        );

        let batch_size = self.settings.batch_size.max(1);
        let batch_count = records.len().div_ceil(batch_size);

        for (index, chunk) in records.chunks(batch_size).enumerate() {
            let batch = index + 1;
            tracing::debug!(batch, batch_count, records = chunk.len(), "state: processing batch");

            let mut updates: Vec<RecordUpdate> = Vec::new();
            for record in chunk {
                if token.is_cancelled() {
                    break;
                }
                match self.process_record(record, &request).await {
                    RecordOutcome::Updated(update) => updates.push(update),
                    RecordOutcome::Skipped(reason) => {
                        tracing::debug!(record_id = %record.id, %reason, "record skipped");
                        summary.skipped += 1;
                    }
                    RecordOutcome::Failed(message) => {
                        tracing::warn!(record_id = %record.id, error = %message, "record failed");
                        summary.record_failure(&record.id, message);
                    }
                }
            }

            if token.is_cancelled() {
                summary.discarded_updates = updates.len();
                tracing::debug!(batch, discarded = updates.len(), "state: processing batch -> stopped");
                return Ok(Self::finish(summary, RunState::Stopped, started));
            }

            if !updates.is_empty() {
                tracing::debug!(batch, updates = updates.len(), "state: flushing");
                if let Err(source) = self
                    .host
                    .write_record_fields(&request.table_id, &updates)
                    .await
                {
                    tracing::error!(batch, error = %source, "batch write failed");
                    summary.discarded_updates = updates.len();
                    let summary = Self::finish(summary, RunState::Aborted, started);
                    return Err(BatchError::Flush {
                        batch,
                        source,
                        summary: Box::new(summary),
                    });
                }
                summary.updated += updates.len();
                summary.batches_written += 1;
                tracing::info!(batch, updated = updates.len(), "batch written");
            }

            if batch < batch_count {
                self.settings.pacer.between_batches().await;
            }
        }

        tracing::debug!("state: done");
        Ok(Self::finish(summary, RunState::Completed, started))
    }

    async fn process_record(&self, record: &Record, request: &RunRequest) -> RecordOutcome {
        let origin = record
            .fields
            .get(&request.origin_field)
            .and_then(LocationValue::from_cell);
        let destination = record
            .fields
            .get(&request.destination_field)
            .and_then(LocationValue::from_cell);
        let (Some(origin), Some(destination)) = (origin, destination) else {
            return RecordOutcome::Skipped(SkipReason::InvalidInput);
        };
        if !origin.is_usable() || !destination.is_usable() {
            return RecordOutcome::Skipped(SkipReason::InvalidInput);
        }

        let result = self
            .source
            .compute(
                &origin,
                &destination,
                request.mode,
                request.strategy.as_ref(),
            )
            .await;
        self.settings.pacer.after_call().await;

        let result = match result {
            Ok(result) => result,
            Err(e) if e.is_invalid_input() => {
                return RecordOutcome::Skipped(SkipReason::InvalidInput)
            }
            Err(e) => return RecordOutcome::Failed(e.to_string()),
        };

        let mut fields = Map::new();
        if let (Some(field), Some(km)) = (&request.distance_field, result.distance_km) {
            fields.insert(field.clone(), Value::from(km));
        }
        if let (Some(field), Some(minutes)) = (&request.duration_field, result.duration_min) {
            fields.insert(field.clone(), Value::from(minutes));
        }
        if fields.is_empty() {
            return RecordOutcome::Skipped(SkipReason::NoUsableResult);
        }

        RecordOutcome::Updated(RecordUpdate {
            record_id: record.id.clone(),
            fields,
        })
    }

    fn finish(summary: RunSummary, state: RunState, started: Instant) -> RunSummary {
        let mut summary = summary;
        summary.state = state;
        summary.elapsed = started.elapsed();
        tracing::info!(
            state = ?summary.state,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            discarded = summary.discarded_updates,
            elapsed_ms = u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
            "run finished"
        );
        if summary.failed > 0 {
            tracing::warn!(
                failed = summary.failed,
                attempted = summary.attempted(),
                "some records failed"
            );
        }
        summary
    }
}

/// Runs one pipeline against AMap with a fresh calculator, so the city-code
/// cache lives exactly as long as the run.
///
/// # Errors
///
/// Same as [`BatchOrchestrator::run`].
pub async fn run_pipeline<H: TableHost + ?Sized>(
    host: &H,
    client: &AmapClient,
    settings: BatchSettings,
    request: RunRequest,
    token: CancellationToken,
) -> Result<RunSummary, BatchError> {
    let calculator = DistanceCalculator::new(client);
    BatchOrchestrator::new(host, &calculator, settings)
        .run(request, token)
        .await
}
