//! The deduplicating upsert engine.
//!
//! Reconciles a batch of requested handoff keys against the existing record
//! set: every existing record for a requested key is superseded wholesale,
//! and each unique key expands into one record per selected channel. The
//! engine only computes; the board applies the outcome to the store, the
//! index and the view in a single swap.

use crate::error::{BoardError, Result};
use crate::progress::ChunkControl;
use crate::records::{HandoffIndex, RecordStore};
use crate::reports;
use crate::types::{Record, RecordId, RecordStatus, SharedFields, UpsertStats};
use std::collections::HashSet;
use tracing::debug;

/// A batch upsert request.
#[derive(Clone, Debug)]
pub struct UpsertRequest {
    /// Requested handoff keys, possibly with duplicates.
    pub keys: Vec<String>,
    /// Selected channels, in selection order. Duplicates are ignored.
    pub channels: Vec<String>,
    /// Field values shared by every generated record.
    pub fields: SharedFields,
}

/// What the engine computed. Applied by the board as one atomic step.
#[derive(Debug)]
pub(crate) struct UpsertOutcome {
    /// Full new store content: surviving records first, then the generated
    /// records in key-processing order.
    pub records: Vec<Record>,
    /// Fresh index group per processed key, in key-processing order.
    pub groups: Vec<(String, Vec<Record>)>,
    pub stats: UpsertStats,
}

pub(crate) struct UpsertEngine<'a> {
    batch_size: usize,
    ctrl: ChunkControl<'a>,
}

impl<'a> UpsertEngine<'a> {
    pub fn new(batch_size: usize, ctrl: ChunkControl<'a>) -> Self {
        Self {
            batch_size: batch_size.max(1),
            ctrl,
        }
    }

    /// Run the full algorithm against a snapshot of the store and index.
    ///
    /// Fails without computing anything when validation rejects the request
    /// or the abort flag is raised between chunks; the caller commits
    /// nothing in either case.
    pub fn execute(
        &self,
        store: &RecordStore,
        index: &HandoffIndex,
        request: &UpsertRequest,
        mut alloc: impl FnMut() -> RecordId,
    ) -> Result<UpsertOutcome> {
        let channels = validate(request)?;
        let fields = normalize(&request.fields);

        // Dedup, preserving first-occurrence order; every extra occurrence
        // is reported back as a duplicate.
        let mut seen = HashSet::new();
        let mut unique: Vec<&str> = Vec::new();
        let mut duplicate_keys = Vec::new();
        for key in request.keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
            if seen.insert(key) {
                unique.push(key);
            } else {
                duplicate_keys.push(key.to_string());
            }
        }

        debug!(
            keys = unique.len(),
            duplicates = duplicate_keys.len(),
            channels = channels.len(),
            "planning upsert"
        );

        let total = unique.len();
        let mut new_keys = Vec::new();
        let mut updated_keys = Vec::new();
        let mut superseded: HashSet<RecordId> = HashSet::new();
        let mut groups: Vec<(String, Vec<Record>)> = Vec::with_capacity(total);
        let mut records_written = 0;

        let mut processed = 0;
        for chunk in unique.chunks(self.batch_size) {
            if self.ctrl.aborted() {
                return Err(BoardError::Aborted);
            }
            self.ctrl.emit(processed, total);

            for &key in chunk {
                let existing = index.lookup(key);
                let status = if existing.is_empty() {
                    new_keys.push(key.to_string());
                    RecordStatus::New
                } else {
                    updated_keys.push(key.to_string());
                    superseded.extend(existing.iter().map(|r| r.id));
                    RecordStatus::Edited
                };

                let group: Vec<Record> = channels
                    .iter()
                    .map(|&channel| make_record(alloc(), key, channel, &fields, status))
                    .collect();
                records_written += group.len();
                groups.push((key.to_string(), group));
            }
            processed += chunk.len();
        }
        self.ctrl.emit(total, total);

        // Survivors keep their store order; generated records follow in
        // key-processing order.
        let mut records: Vec<Record> = store
            .iter()
            .filter(|r| !superseded.contains(&r.id))
            .cloned()
            .collect();
        records.extend(groups.iter().flat_map(|(_, group)| group.iter().cloned()));

        Ok(UpsertOutcome {
            records,
            groups,
            stats: UpsertStats {
                new_keys,
                updated_keys,
                duplicate_keys,
                records_written,
            },
        })
    }
}

/// Check the request before any work; returns the deduplicated channel
/// list in selection order.
fn validate(request: &UpsertRequest) -> Result<Vec<&str>> {
    // Whitespace-only keys are as empty as none at all (and `all` on an
    // empty list is true).
    if request.keys.iter().all(|k| k.trim().is_empty()) {
        return Err(BoardError::EmptyKeyList);
    }
    let mut channels: Vec<&str> = Vec::with_capacity(request.channels.len());
    for channel in &request.channels {
        if !channels.contains(&channel.as_str()) {
            channels.push(channel);
        }
    }
    if channels.is_empty() {
        return Err(BoardError::NoChannels);
    }
    let fields = &request.fields;
    if fields.campaign_id.trim().is_empty() {
        return Err(BoardError::MissingField("campaign id"));
    }
    if fields.wavy_user.trim().is_empty() {
        return Err(BoardError::MissingField("wavy user"));
    }
    if fields.report_campaign.trim().is_empty() {
        return Err(BoardError::MissingField("report campaign"));
    }
    Ok(channels)
}

/// Apply the blank-field fallbacks: form-level defaults for virtual CC and
/// weight, then the report tables for code and product before the
/// catch-all defaults.
fn normalize(fields: &SharedFields) -> SharedFields {
    let mut fields = fields.clone();
    if fields.virtual_cc.trim().is_empty() {
        fields.virtual_cc = "ventas".to_string();
    }
    if fields.weight.trim().is_empty() {
        fields.weight = "100".to_string();
    }
    if fields.report_campaign_code.trim().is_empty() {
        fields.report_campaign_code = reports::code_for_campaign(&fields.report_campaign)
            .unwrap_or("SIN-COD")
            .to_string();
    }
    if fields.report_product.trim().is_empty() {
        fields.report_product = reports::product_for_code(&fields.report_campaign_code)
            .unwrap_or("Sin categorizar")
            .to_string();
    }
    fields
}

fn make_record(
    id: RecordId,
    handoff_value: &str,
    channel: &str,
    fields: &SharedFields,
    status: RecordStatus,
) -> Record {
    Record {
        id,
        handoff_value: handoff_value.to_string(),
        channel_id: channel.to_string(),
        virtual_cc: fields.virtual_cc.clone(),
        campaign_id: fields.campaign_id.clone(),
        wavy_user: fields.wavy_user.clone(),
        report_campaign: fields.report_campaign.clone(),
        report_product: fields.report_product.clone(),
        report_campaign_code: fields.report_campaign_code.clone(),
        weight: fields.weight.clone(),
        status,
    }
}
