//! Delimited-text export.

use super::EXPORT_HEADER;
use crate::types::Record;

/// Serialize records as `;`-delimited text: the fixed header, then one
/// line per record in the order given. Newline-joined, no trailing
/// newline. Ignores search and pagination state by construction: the
/// caller hands in the full store.
pub(crate) fn serialize(records: &[Record]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(EXPORT_HEADER.to_string());
    for record in records {
        lines.push(format!(
            "{};{};{};{};{};{};{};{};{}",
            record.handoff_value,
            record.channel_id,
            record.virtual_cc,
            record.campaign_id,
            record.wavy_user,
            record.report_campaign,
            record.report_product,
            record.report_campaign_code,
            record.weight,
        ));
    }
    lines.join("\n")
}
