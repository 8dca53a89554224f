use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::Error;
use crate::model::{SessionRecord, StatusTally};
use crate::notion::NotionClient;
use crate::progress::ProgressReporter;
use crate::scanner;
use crate::sync::{self, SessionStore};

pub struct SyncEngine {
    config: AppConfig,
}

#[derive(Debug)]
pub struct RunResult {
    pub scan_duration: Duration,
    pub fetch_duration: Duration,
    pub sync_duration: Duration,
    pub sessions_found: usize,
    pub remote_entries: usize,
    pub entries_created: usize,
    pub entries_updated: usize,
    pub tally: StatusTally,
}

impl SyncEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Walk the session tree and classify every session, without touching
    /// the remote database.
    pub fn scan_records(&self) -> Result<Vec<SessionRecord>, Error> {
        let records = scanner::scan_sessions(
            Path::new(&self.config.root_dir),
            &self.config.exclude_animals,
        )?;
        Ok(records)
    }

    /// Run the full pipeline against the configured Notion database:
    /// 1. Scan the root directory and classify every session
    /// 2. Fetch all remote entries and index them by identity
    /// 3. Create or update one entry per scanned session
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<RunResult, Error> {
        let store = NotionClient::new(&self.config.notion_api_key, &self.config.database_id)?;
        self.run_with_store(&store, reporter)
    }

    /// Same pipeline as `run`, against any store implementation.
    pub fn run_with_store<S: SessionStore>(
        &self,
        store: &S,
        reporter: &dyn ProgressReporter,
    ) -> Result<RunResult, Error> {
        // Phase 1: scan
        info!("Scanning sessions under {}...", self.config.root_dir);
        reporter.on_scan_start();
        let scan_start = Instant::now();
        let records = self.scan_records()?;
        let scan_duration = scan_start.elapsed();
        let tally = StatusTally::count(&records);
        reporter.on_scan_complete(records.len(), scan_duration.as_secs_f64());
        debug!(
            "Scan completed in {:.2}s, {} sessions found",
            scan_duration.as_secs_f64(),
            records.len(),
        );

        // Phase 2: fetch remote entries
        info!("Fetching remote entries...");
        reporter.on_fetch_start();
        let fetch_start = Instant::now();
        let entries = store.fetch_entries()?;
        let fetch_duration = fetch_start.elapsed();
        let remote_entries = entries.len();
        reporter.on_fetch_complete(remote_entries, fetch_duration.as_secs_f64());
        debug!(
            "Fetch completed in {:.2}s, {} remote entries",
            fetch_duration.as_secs_f64(),
            remote_entries,
        );

        let index = sync::build_identity_index(entries);

        // Phase 3: upsert one entry per session
        info!("Synchronizing {} sessions...", records.len());
        reporter.on_sync_start(records.len());
        let sync_start = Instant::now();
        let outcome = sync::sync_records(store, &index, &records, |done, total| {
            reporter.on_sync_progress(done, total);
        })?;
        let sync_duration = sync_start.elapsed();
        reporter.on_sync_complete(outcome.created, outcome.updated, sync_duration.as_secs_f64());
        debug!(
            "Sync completed in {:.2}s, {} created, {} updated",
            sync_duration.as_secs_f64(),
            outcome.created,
            outcome.updated,
        );

        Ok(RunResult {
            scan_duration,
            fetch_duration,
            sync_duration,
            sessions_found: records.len(),
            remote_entries,
            entries_created: outcome.created,
            entries_updated: outcome.updated,
            tally,
        })
    }
}
