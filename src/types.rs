//! Core types for the board.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unique identifier for a record (assigned by the board).
///
/// Row actions resolve through this id rather than a table position, so a
/// deletion that shifts later positions cannot strand a pending action.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provenance tag for a record. Display-only: no logic branches on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Imported from a base file.
    Original,
    /// Created by an upsert for a key with no prior records.
    New,
    /// Created by an upsert that superseded prior records for the key.
    Edited,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordStatus::Original => "Original",
            RecordStatus::New => "Nuevo",
            RecordStatus::Edited => "Editado",
        };
        write!(f, "{label}")
    }
}

/// The fixed channel vocabulary.
pub const KNOWN_CHANNELS: [&str; 4] = ["SMS", "WHATSAPP", "FACEBOOK", "INSTAGRAM"];

/// One channel-specific routing configuration row.
///
/// `(handoff_value, channel_id)` is the true uniqueness key; the handoff
/// value alone is shared by every per-channel row of one configuration.
/// Records are never edited in place: an edit removes the old rows and
/// inserts fresh ones through the upsert path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Internal identity (assigned by the board).
    pub id: RecordId,
    /// Business key shared by the per-channel rows of one configuration.
    pub handoff_value: String,
    /// Channel this row routes to.
    pub channel_id: String,
    pub virtual_cc: String,
    pub campaign_id: String,
    pub wavy_user: String,
    pub report_campaign: String,
    pub report_product: String,
    pub report_campaign_code: String,
    pub weight: String,
    /// Provenance tag.
    pub status: RecordStatus,
}

/// Field values shared by every record generated from one form entry.
///
/// Blank optional fields are defaulted by the upsert engine: virtual CC to
/// `"ventas"`, weight to `"100"`, and the report code/product through the
/// report tables before falling back to `"SIN-COD"` / `"Sin categorizar"`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedFields {
    pub virtual_cc: String,
    pub campaign_id: String,
    pub wavy_user: String,
    pub report_campaign: String,
    pub report_product: String,
    pub report_campaign_code: String,
    pub weight: String,
}

/// Aggregate statistics for a completed upsert.
///
/// Key lists keep first-occurrence order; `duplicate_keys` holds one entry
/// per extra occurrence removed by deduplication.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UpsertStats {
    pub new_keys: Vec<String>,
    pub updated_keys: Vec<String>,
    pub duplicate_keys: Vec<String>,
    /// Total records written (unique keys x selected channels).
    pub records_written: usize,
}

impl UpsertStats {
    /// Unique handoff keys processed (new + updated).
    pub fn unique_keys_processed(&self) -> usize {
        self.new_keys.len() + self.updated_keys.len()
    }
}

/// Distinct field values observed during an import, for host form selectors.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FieldOptions {
    pub campaigns: BTreeSet<String>,
    pub wavy_users: BTreeSet<String>,
    pub report_campaigns: BTreeSet<String>,
    pub report_codes: BTreeSet<String>,
    pub report_products: BTreeSet<String>,
}

impl FieldOptions {
    pub(crate) fn observe(&mut self, record: &Record) {
        let mut add = |set: &mut BTreeSet<String>, value: &str| {
            if !value.is_empty() {
                set.insert(value.to_string());
            }
        };
        add(&mut self.campaigns, &record.campaign_id);
        add(&mut self.wavy_users, &record.wavy_user);
        add(&mut self.report_campaigns, &record.report_campaign);
        add(&mut self.report_codes, &record.report_campaign_code);
        add(&mut self.report_products, &record.report_product);
    }
}

/// Result of a completed import.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub records_imported: usize,
    /// Data rows skipped for having fewer fields than the header.
    pub rows_skipped: usize,
    pub options: FieldOptions,
}

/// Counters for the table header and pagination controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    /// Rows in the active source (search results while searching).
    pub total_rows: usize,
    /// Rows on the current page.
    pub visible_rows: usize,
    pub search_active: bool,
}

/// Result of a table search. A miss is a normal negative result, not an
/// error; the view state is untouched on `NotFound`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Search mode entered with this many matching rows.
    Found(usize),
    NotFound,
}

/// A row removed for editing: its contents, handed back for re-entry
/// through the upsert path.
#[derive(Clone, Debug, PartialEq)]
pub struct EditDraft {
    pub handoff_value: String,
    pub channel_id: String,
    pub fields: SharedFields,
}

impl EditDraft {
    pub(crate) fn from_record(record: &Record) -> Self {
        Self {
            handoff_value: record.handoff_value.clone(),
            channel_id: record.channel_id.clone(),
            fields: SharedFields {
                virtual_cc: record.virtual_cc.clone(),
                campaign_id: record.campaign_id.clone(),
                wavy_user: record.wavy_user.clone(),
                report_campaign: record.report_campaign.clone(),
                report_product: record.report_product.clone(),
                report_campaign_code: record.report_campaign_code.clone(),
                weight: record.weight.clone(),
            },
        }
    }
}

/// The user's current channel multi-select: duplicate-free, insertion-ordered.
///
/// Independent lifecycle from the record set; cleared on form reset.
#[derive(Clone, Debug, Default)]
pub struct ChannelSelection {
    channels: Vec<String>,
}

impl ChannelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel unless already selected.
    pub fn add(&mut self, channel: &str) {
        if !self.channels.iter().any(|c| c == channel) {
            self.channels.push(channel.to_string());
        }
    }

    /// Remove a channel if selected. Returns whether it was present.
    pub fn remove(&mut self, channel: &str) -> bool {
        match self.channels.iter().position(|c| c == channel) {
            Some(pos) => {
                self.channels.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Toggle a channel. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, channel: &str) -> bool {
        if self.remove(channel) {
            false
        } else {
            self.add(channel);
            true
        }
    }

    /// Select every known channel.
    pub fn select_all(&mut self) {
        self.channels.clear();
        self.channels
            .extend(KNOWN_CHANNELS.iter().map(|c| c.to_string()));
    }

    pub fn all_selected(&self) -> bool {
        self.channels.len() == KNOWN_CHANNELS.len()
    }

    pub fn clear(&mut self) {
        self.channels.clear();
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.channels.iter().any(|c| c == channel)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Split raw multi-line key input into trimmed, non-empty keys.
///
/// Commas and newlines both separate entries (the bulk-entry mode of the
/// form accepts either).
pub fn parse_key_list(input: &str) -> Vec<String> {
    input
        .split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
