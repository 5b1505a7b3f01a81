//! Dashboard session
//!
//! Wires the dashboard state to its collaborators: importers, the dataset
//! store and the settings file. Collaborator failures never roll back the
//! in-memory state; persistence problems are kept as warnings.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dv_core::events::events::{
    DatasetAdded, DatasetRemoved, LayoutReconciled, SelectionChanged, SettingsChanged,
    VisualizationAdded, VisualizationRemoved, VisualizationUpdated,
};
use dv_core::events::Event;
use dv_core::{
    AppSettings, ChartKind, Dashboard, DashboardError, Dataset, DatasetId, EventBus,
    PersistedState, RemovedDataset, VisualizationConfig, VisualizationId,
};
use dv_data::{DataError, DatasetImporter, DatasetStore, ImportError, MockDataSource, RawFile};
use dv_views::{RenderFrame, Viewport};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Errors returned by session operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("An import is already in progress")]
    ImportInProgress,

    #[error("Import ticket does not belong to the pending import")]
    StaleImport,

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

/// Non-fatal problems reported alongside successful operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionWarning {
    #[error("Persistence failed: {0}")]
    Persistence(String),
}

/// Proof that an import was started; completes it at most once
///
/// Dropping a ticket without completing it abandons the import and clears
/// the loading flag.
#[derive(Debug)]
pub struct ImportTicket {
    id: u64,
    pending: Arc<Mutex<Option<u64>>>,
}

impl Drop for ImportTicket {
    fn drop(&mut self) {
        let mut pending = self.pending.lock();
        if *pending == Some(self.id) {
            *pending = None;
        }
    }
}

/// Outcome of a batch import
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Datasets registered, in batch order
    pub imported: Vec<DatasetId>,
    /// Default visualizations created for them
    pub visualizations: Vec<VisualizationId>,
    pub failures: Vec<ImportError>,
}

/// A running dashboard with its collaborators
pub struct Session {
    dashboard: Dashboard,
    viewport: Viewport,
    store: Arc<dyn DatasetStore>,
    importer: Arc<dyn DatasetImporter>,
    settings_path: PathBuf,
    dark_mode: bool,
    pending_import: Arc<Mutex<Option<u64>>>,
    dirty: Arc<AtomicBool>,
    warnings: Vec<SessionWarning>,
}

impl Session {
    pub fn new(
        store: Arc<dyn DatasetStore>,
        importer: Arc<dyn DatasetImporter>,
        settings_path: impl Into<PathBuf>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let dirty = Arc::new(AtomicBool::new(false));

        mark_dirty_on::<DatasetAdded>(&event_bus, &dirty);
        mark_dirty_on::<DatasetRemoved>(&event_bus, &dirty);
        mark_dirty_on::<VisualizationAdded>(&event_bus, &dirty);
        mark_dirty_on::<VisualizationRemoved>(&event_bus, &dirty);
        mark_dirty_on::<VisualizationUpdated>(&event_bus, &dirty);
        mark_dirty_on::<LayoutReconciled>(&event_bus, &dirty);
        mark_dirty_on::<SelectionChanged>(&event_bus, &dirty);
        mark_dirty_on::<SettingsChanged>(&event_bus, &dirty);

        let viewport = Viewport::new();
        viewport.watch(&event_bus);

        Self {
            dashboard: Dashboard::new(event_bus),
            viewport,
            store,
            importer,
            settings_path: settings_path.into(),
            dark_mode: AppSettings::default().dark_mode,
            pending_import: Arc::new(Mutex::new(None)),
            dirty,
            warnings: Vec::new(),
        }
    }

    /// Load datasets from the store and settings from disk
    ///
    /// Either source failing leaves its part empty and records a warning.
    pub fn restore(&mut self) {
        let datasets = match self.store.list_all() {
            Ok(datasets) => datasets,
            Err(e) => {
                self.warn_persistence(format!("Could not load stored datasets: {e}"));
                Vec::new()
            }
        };

        let state = match PersistedState::load(&self.settings_path) {
            Ok(state) => state,
            Err(e) => {
                self.warn_persistence(format!("{e:#}"));
                PersistedState::default()
            }
        };

        let loaded_visualizations = state.visualizations.len();
        let loaded_selection = state.settings.selected_dataset.clone();

        self.dark_mode = state.settings.dark_mode;
        self.dashboard
            .restore(datasets, state.visualizations, state.settings.selected_dataset);
        self.viewport.cache().clear();

        // Rewrite the settings file if restoring dropped or redirected anything
        let changed = self.dashboard.visualizations().len() != loaded_visualizations
            || self.dashboard.selected_id() != loaded_selection.as_deref();
        self.dirty.store(changed, Ordering::SeqCst);

        info!(
            "Restored {} datasets and {} visualizations",
            self.dashboard.datasets().len(),
            self.dashboard.visualizations().len()
        );
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn is_loading(&self) -> bool {
        self.pending_import.lock().is_some()
    }

    pub fn warnings(&self) -> &[SessionWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<SessionWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Mark an import as in flight
    pub fn begin_import(&mut self) -> Result<ImportTicket, SessionError> {
        let mut pending = self.pending_import.lock();
        if pending.is_some() {
            return Err(SessionError::ImportInProgress);
        }

        let id = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        *pending = Some(id);
        Ok(ImportTicket {
            id,
            pending: self.pending_import.clone(),
        })
    }

    /// Commit the results of an import batch
    ///
    /// Each success is registered, persisted and gets a default bar chart.
    /// The selection moves to the last success. Failures are reported per file.
    pub fn complete_import(
        &mut self,
        ticket: ImportTicket,
        results: Vec<(String, Result<Dataset, DataError>)>,
    ) -> Result<ImportReport, SessionError> {
        if *self.pending_import.lock() != Some(ticket.id) {
            return Err(SessionError::StaleImport);
        }
        drop(ticket);

        let mut report = ImportReport::default();
        for (file, result) in results {
            match result {
                Ok(dataset) => {
                    let id = dataset.id().to_string();
                    if !self.dashboard.add_dataset(dataset) {
                        let failure = ImportError::new(file, DataError::DuplicateDataset(id));
                        error!("{}", failure);
                        report.failures.push(failure);
                        continue;
                    }
                    self.persist_dataset(&id);

                    let viz = self.dashboard.add_visualization(&id)?;
                    report.visualizations.push(viz.id);
                    report.imported.push(id);
                }
                Err(source) => {
                    let failure = ImportError::new(file, source);
                    error!("{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        if let Some(last) = report.imported.last() {
            self.dashboard.select_dataset(Some(last));
        }

        info!(
            "Import finished: {} imported, {} failed",
            report.imported.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Import in-memory files concurrently and commit them in batch order
    pub async fn import_files(&mut self, files: Vec<RawFile>) -> Result<ImportReport, SessionError> {
        let ticket = self.begin_import()?;

        let jobs = files
            .into_iter()
            .map(|file| {
                let name = file.name.clone();
                let importer = self.importer.clone();
                let handle = tokio::spawn(async move { importer.import(file).await });
                (name, handle)
            })
            .collect();

        let results = collect(jobs).await;
        self.complete_import(ticket, results)
    }

    /// Read and import files from disk
    pub async fn import_paths(&mut self, paths: &[PathBuf]) -> Result<ImportReport, SessionError> {
        let ticket = self.begin_import()?;

        let jobs = paths
            .iter()
            .map(|path| {
                let name = path.display().to_string();
                let path = path.clone();
                let importer = self.importer.clone();
                let handle = tokio::spawn(async move {
                    let file = RawFile::read(&path).await?;
                    importer.import(file).await
                });
                (name, handle)
            })
            .collect();

        let results = collect(jobs).await;
        self.complete_import(ticket, results)
    }

    /// Load the demo dataset and add a monthly sales line chart over it
    ///
    /// The dataset is registered once; every call adds another chart.
    pub async fn load_mock(&mut self) -> Result<VisualizationConfig, SessionError> {
        let dataset = MockDataSource::new().load().await;
        let id = dataset.id().to_string();

        if self.dashboard.add_dataset(dataset) {
            self.persist_dataset(&id);
        }

        let viz = self.dashboard.add_visualization_with(&id, ChartKind::Line)?;
        self.dashboard.select_dataset(Some(&id));
        Ok(viz)
    }

    /// Delete a dataset and its visualizations, then drop it from the store
    pub fn delete_dataset(&mut self, id: &str) -> Option<RemovedDataset> {
        let removed = self.dashboard.remove_dataset(id)?;

        if let Err(e) = self.store.delete(id) {
            self.warn_persistence(format!("Could not delete dataset {id}: {e}"));
        }
        Some(removed)
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dashboard.event_bus().publish(SettingsChanged);
        self.dark_mode
    }

    /// Frames for every visualization, in dashboard order
    pub fn render_frames(&self) -> Vec<RenderFrame> {
        self.viewport.frames(&self.dashboard)
    }

    /// Write settings and visualizations if anything changed since the last save
    pub fn persist_if_dirty(&mut self) -> bool {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return false;
        }

        let state = PersistedState {
            settings: AppSettings {
                dark_mode: self.dark_mode,
                selected_dataset: self.dashboard.selected_id().map(str::to_string),
            },
            visualizations: self.dashboard.visualizations().to_vec(),
        };

        match state.save(&self.settings_path) {
            Ok(()) => {
                debug!("Saved settings to {}", self.settings_path.display());
                true
            }
            Err(e) => {
                self.warn_persistence(format!("{e:#}"));
                false
            }
        }
    }

    fn persist_dataset(&mut self, id: &str) {
        let Some(dataset) = self.dashboard.dataset(id).cloned() else {
            return;
        };
        if let Err(e) = self.store.save(&dataset) {
            self.warn_persistence(format!("Could not save dataset {id}: {e}"));
        }
    }

    fn warn_persistence(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(SessionWarning::Persistence(message));
    }
}

fn mark_dirty_on<E: Event>(event_bus: &EventBus, dirty: &Arc<AtomicBool>) {
    let dirty = dirty.clone();
    event_bus.on::<E, _>(move |_| dirty.store(true, Ordering::SeqCst));
}

async fn collect(
    jobs: Vec<(String, JoinHandle<Result<Dataset, DataError>>)>,
) -> Vec<(String, Result<Dataset, DataError>)> {
    let mut results = Vec::with_capacity(jobs.len());
    for (name, handle) in jobs {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(DataError::from(e)),
        };
        results.push((name, result));
    }
    results
}
