//! Main Board struct tying all components together.

use crate::error::{BoardError, Result};
use crate::io::{self, serialize};
use crate::progress::{ChunkControl, ProgressEvent, ProgressHub, ProgressStage};
use crate::records::{HandoffIndex, RecordStore};
use crate::types::{
    ChannelSelection, EditDraft, ImportSummary, PageInfo, Record, RecordId, SearchOutcome,
    SharedFields, UpsertStats,
};
use crate::upsert::{UpsertEngine, UpsertRequest};
use crate::view::ViewState;
use crossbeam_channel::Receiver;
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::info;

/// Board configuration. All values are fixed defaults, not runtime-negotiated.
#[derive(Clone, Debug)]
pub struct BoardConfig {
    /// Keys processed per upsert chunk.
    pub upsert_batch_size: usize,

    /// Data rows parsed per import chunk.
    pub import_batch_size: usize,

    /// Upserts with more requested keys than this report progress.
    pub large_batch_threshold: usize,

    /// Imports with more data rows than this report progress.
    pub large_import_threshold: usize,

    /// Page size for the table view.
    pub rows_per_page: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            upsert_batch_size: 100,
            import_batch_size: 200,
            large_batch_threshold: 50,
            large_import_threshold: 1000,
            rows_per_page: 100,
        }
    }
}

/// Store, index and view, guarded as one unit so the index can never be
/// observed out of step with the store.
struct BoardState {
    store: RecordStore,
    index: HandoffIndex,
    view: ViewState,
}

/// The routing-configuration board.
///
/// The single state manager all mutation goes through: it owns the record
/// store, the handoff index, the view state and the channel selection, and
/// re-establishes the store/index and pagination invariants after every
/// operation.
///
/// Multi-step mutations (upsert, import) plan against a read snapshot and
/// commit in one swap under the write lock, so a failure or abort midway
/// leaves nothing partially applied.
pub struct Board {
    config: BoardConfig,

    state: RwLock<BoardState>,

    /// The user's channel multi-select; independent of the record set.
    channels: RwLock<ChannelSelection>,

    progress: ProgressHub,

    /// Next record id to assign.
    next_id: AtomicU64,

    /// Cooperative abort flag, consulted at chunk boundaries.
    abort: AtomicBool,

    /// Serializes multi-step mutations so plan and commit see the same
    /// state even on a multi-threaded host.
    write_lock: Mutex<()>,
}

impl Board {
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Self {
        let view = ViewState::new(config.rows_per_page);
        Self {
            config,
            state: RwLock::new(BoardState {
                store: RecordStore::new(),
                index: HandoffIndex::new(),
                view,
            }),
            channels: RwLock::new(ChannelSelection::new()),
            progress: ProgressHub::new(),
            next_id: AtomicU64::new(1),
            abort: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    fn alloc_id(&self) -> RecordId {
        RecordId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    // --- Record Access ---

    /// All records in store order.
    pub fn records(&self) -> Vec<Record> {
        self.state.read().store.records().to_vec()
    }

    pub fn record_count(&self) -> usize {
        self.state.read().store.len()
    }

    /// Records sharing a handoff value, via the index.
    pub fn lookup(&self, handoff_value: &str) -> Vec<Record> {
        self.state.read().index.lookup(handoff_value).to_vec()
    }

    /// Channels a handoff value is already configured for (the existence
    /// check shown while typing a key).
    pub fn existing_channels(&self, handoff_value: &str) -> Vec<String> {
        self.state
            .read()
            .index
            .lookup(handoff_value)
            .iter()
            .map(|r| r.channel_id.clone())
            .collect()
    }

    /// Prefill data for an existing key: the shared fields of its first
    /// record plus all of its channels. `None` if the key is absent.
    pub fn load_existing(&self, handoff_value: &str) -> Option<(SharedFields, Vec<String>)> {
        let state = self.state.read();
        let group = state.index.lookup(handoff_value);
        let first = group.first()?;
        let fields = EditDraft::from_record(first).fields;
        let channels = group.iter().map(|r| r.channel_id.clone()).collect();
        Some((fields, channels))
    }

    // --- Channel Selection ---

    pub fn select_channel(&self, channel: &str) {
        self.channels.write().add(channel);
    }

    pub fn deselect_channel(&self, channel: &str) -> bool {
        self.channels.write().remove(channel)
    }

    /// Toggle a channel; returns whether it is selected afterwards.
    pub fn toggle_channel(&self, channel: &str) -> bool {
        self.channels.write().toggle(channel)
    }

    /// The select-all button: clears when every known channel is already
    /// selected, selects all otherwise. Returns whether all are selected
    /// afterwards.
    pub fn toggle_all_channels(&self) -> bool {
        let mut channels = self.channels.write();
        if channels.all_selected() {
            channels.clear();
            false
        } else {
            channels.select_all();
            true
        }
    }

    pub fn clear_channels(&self) {
        self.channels.write().clear();
    }

    pub fn selected_channels(&self) -> Vec<String> {
        self.channels.read().as_slice().to_vec()
    }

    // --- Upsert ---

    /// Upsert using the board's current channel selection.
    pub fn upsert(&self, keys: &[String], fields: SharedFields) -> Result<UpsertStats> {
        let channels = self.selected_channels();
        self.upsert_with(UpsertRequest {
            keys: keys.to_vec(),
            channels,
            fields,
        })
    }

    /// Upsert with an explicit request. Validation failures and aborts
    /// leave the store and index untouched.
    pub fn upsert_with(&self, request: UpsertRequest) -> Result<UpsertStats> {
        let _guard = self.write_lock.lock();
        self.abort.store(false, Ordering::Relaxed);

        let large = request.keys.len() > self.config.large_batch_threshold;
        let ctrl = ChunkControl::new(&self.progress, &self.abort, ProgressStage::Upsert, large);
        let engine = UpsertEngine::new(self.config.upsert_batch_size, ctrl);

        let outcome = {
            let state = self.state.read();
            engine.execute(&state.store, &state.index, &request, || self.alloc_id())?
        };

        let mut state = self.state.write();
        state.store.replace_all(outcome.records);
        for (key, group) in outcome.groups {
            state.index.put(key, group);
        }
        let len = state.store.len();
        state.view.refresh(len);

        info!(
            new = outcome.stats.new_keys.len(),
            updated = outcome.stats.updated_keys.len(),
            duplicates = outcome.stats.duplicate_keys.len(),
            written = outcome.stats.records_written,
            "upsert applied"
        );
        Ok(outcome.stats)
    }

    // --- Row Actions ---

    /// Delete the row at `index` into the currently active source (search
    /// results while searching). Resolves to the record's identity before
    /// touching anything, so positions shifted by earlier deletions cannot
    /// remove the wrong row.
    pub fn delete_row(&self, index: usize) -> Result<Record> {
        let _guard = self.write_lock.lock();
        self.remove_active_row(index)
    }

    /// Remove the row at `index` and hand back its contents for re-entry
    /// through the form and upsert path (the edit flow).
    pub fn take_for_edit(&self, index: usize) -> Result<EditDraft> {
        let _guard = self.write_lock.lock();
        let record = self.remove_active_row(index)?;
        Ok(EditDraft::from_record(&record))
    }

    fn remove_active_row(&self, index: usize) -> Result<Record> {
        let mut state = self.state.write();
        let record = {
            let active = state.view.active(state.store.records());
            active
                .get(index)
                .cloned()
                .ok_or(BoardError::RowOutOfRange {
                    index,
                    len: active.len(),
                })?
        };

        // A searched row may already have been superseded in the store;
        // dropping it from the subset is then all that is left to do.
        state.store.remove_by_id(record.id);
        state.index.remove_record(&record.handoff_value, record.id);
        state.view.remove_filtered(record.id);
        let len = state.store.len();
        state.view.refresh(len);
        Ok(record)
    }

    /// Remove every record, leaving search mode.
    pub fn clear_all(&self) {
        let _guard = self.write_lock.lock();
        let mut state = self.state.write();
        state.store.replace_all(Vec::new());
        state.index.clear();
        state.view.exit_search(0);
        info!("all records cleared");
    }

    // --- Search & Pagination ---

    /// Case-insensitive substring search over handoff values. A hit enters
    /// search mode on page 1; a miss changes nothing and reports
    /// [`SearchOutcome::NotFound`].
    pub fn search(&self, query: &str) -> SearchOutcome {
        let needle = query.to_lowercase();
        let mut state = self.state.write();
        let matches: Vec<Record> = state
            .store
            .iter()
            .filter(|r| r.handoff_value.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        if matches.is_empty() {
            return SearchOutcome::NotFound;
        }
        let count = matches.len();
        state.view.enter_search(matches);
        SearchOutcome::Found(count)
    }

    /// Leave search mode and show the full set from page 1.
    pub fn clear_search(&self) {
        let mut state = self.state.write();
        let len = state.store.len();
        state.view.exit_search(len);
    }

    pub fn is_search_active(&self) -> bool {
        self.state.read().view.is_search_active()
    }

    /// Jump to a page, clamped into the valid range.
    pub fn set_page(&self, page: usize) {
        self.state.write().view.set_page(page);
    }

    pub fn next_page(&self) {
        let mut state = self.state.write();
        let page = state.view.current_page();
        state.view.set_page(page + 1);
    }

    pub fn prev_page(&self) {
        let mut state = self.state.write();
        let page = state.view.current_page();
        state.view.set_page(page.saturating_sub(1));
    }

    /// The current page of the active source.
    pub fn page(&self) -> Vec<Record> {
        let state = self.state.read();
        state.view.page_slice(state.store.records()).to_vec()
    }

    pub fn page_info(&self) -> PageInfo {
        let state = self.state.read();
        state.view.info(state.store.records())
    }

    // --- Import / Export ---

    /// Parse delimited text and replace the whole record set. The new
    /// store and index are built off to the side and swapped in only on
    /// success; on any failure the previous content stays intact.
    pub fn import_text(&self, text: &str) -> Result<ImportSummary> {
        let _guard = self.write_lock.lock();
        self.abort.store(false, Ordering::Relaxed);

        let data_rows = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count()
            .saturating_sub(1);
        let large = data_rows > self.config.large_import_threshold;
        let ctrl = ChunkControl::new(&self.progress, &self.abort, ProgressStage::Import, large);

        let parsed = io::parse(text, self.config.import_batch_size, &ctrl, || {
            self.alloc_id()
        })?;

        let mut index = HandoffIndex::new();
        index.rebuild(&parsed.records);
        let summary = ImportSummary {
            records_imported: parsed.records.len(),
            rows_skipped: parsed.rows_skipped,
            options: parsed.options,
        };

        let mut state = self.state.write();
        let len = parsed.records.len();
        state.store.replace_all(parsed.records);
        state.index = index;
        // The old search subset refers to replaced data.
        state.view.exit_search(len);

        info!(
            records = summary.records_imported,
            skipped = summary.rows_skipped,
            "import applied"
        );
        Ok(summary)
    }

    pub fn import_path(&self, path: impl AsRef<Path>) -> Result<ImportSummary> {
        let text = std::fs::read_to_string(path)?;
        self.import_text(&text)
    }

    /// Serialize the full record set, ignoring search and pagination
    /// state. An empty store is a user-facing error.
    pub fn export_text(&self) -> Result<String> {
        let state = self.state.read();
        if state.store.is_empty() {
            return Err(BoardError::NoRecords);
        }
        Ok(serialize(state.store.records()))
    }

    pub fn export_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = self.export_text()?;
        std::fs::write(path, text)?;
        Ok(())
    }

    // --- Progress & Abort ---

    /// Subscribe to progress events with a bounded buffer. Slow or dropped
    /// subscribers are pruned rather than allowed to block operations.
    pub fn subscribe_progress(&self, buffer: usize) -> Receiver<ProgressEvent> {
        self.progress.subscribe(buffer)
    }

    /// Request that the running (or next) chunked operation stop at its
    /// next chunk boundary with [`BoardError::Aborted`], leaving the
    /// record set untouched. Cleared when an operation starts.
    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
