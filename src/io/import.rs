//! Delimited-text import.

use crate::error::{BoardError, Result};
use crate::progress::ChunkControl;
use crate::types::{FieldOptions, Record, RecordId, RecordStatus};
use tracing::{debug, warn};

/// Choose `,` only when the header holds strictly more commas than
/// semicolons; `;` otherwise, including when neither appears.
pub(crate) fn detect_delimiter(header: &str) -> char {
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if commas > semicolons {
        ','
    } else {
        ';'
    }
}

/// Column positions of the known fields, resolved by header name.
/// Unknown headers are ignored; a missing known field defaults to empty.
#[derive(Debug, Default)]
struct ColumnMap {
    handoff_value: Option<usize>,
    channel_id: Option<usize>,
    virtual_cc: Option<usize>,
    campaign_id: Option<usize>,
    wavy_user: Option<usize>,
    report_campaign: Option<usize>,
    report_product: Option<usize>,
    report_campaign_code: Option<usize>,
    weight: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &[&str]) -> Self {
        let mut map = Self::default();
        for (pos, header) in headers.iter().enumerate() {
            let slot = match header.trim() {
                "HandoffValue" => &mut map.handoff_value,
                "ChannelId" => &mut map.channel_id,
                "VirtualCC" => &mut map.virtual_cc,
                "CampaignId" => &mut map.campaign_id,
                "WavyUser" => &mut map.wavy_user,
                "Reporte_Campana" => &mut map.report_campaign,
                "Reporte_Producto" => &mut map.report_product,
                "Reporte_Cod_Campana" => &mut map.report_campaign_code,
                "Peso" => &mut map.weight,
                _ => continue,
            };
            // First occurrence wins for a repeated header.
            if slot.is_none() {
                *slot = Some(pos);
            }
        }
        map
    }
}

/// Everything a successful parse produced; the board swaps it in whole.
#[derive(Debug)]
pub(crate) struct ParsedImport {
    pub records: Vec<Record>,
    pub rows_skipped: usize,
    pub options: FieldOptions,
}

/// Parse delimited text into records, tagged `Original`.
///
/// Rows with fewer fields than the header are skipped; blank lines are
/// ignored; a leading byte-order mark is stripped. Fewer than two usable
/// lines is a structural failure. The caller mutates nothing until this
/// returns `Ok`.
pub(crate) fn parse(
    text: &str,
    batch_size: usize,
    ctrl: &ChunkControl<'_>,
    mut alloc: impl FnMut() -> RecordId,
) -> Result<ParsedImport> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(BoardError::EmptyImport);
    }

    let delimiter = detect_delimiter(lines[0]);
    let headers: Vec<&str> = lines[0].split(delimiter).collect();
    let columns = ColumnMap::from_headers(&headers);
    let data = &lines[1..];
    let total = data.len();

    debug!(rows = total, %delimiter, "parsing import");

    let mut records = Vec::with_capacity(total);
    let mut rows_skipped = 0;
    let mut options = FieldOptions::default();

    let mut processed = 0;
    for chunk in data.chunks(batch_size.max(1)) {
        if ctrl.aborted() {
            return Err(BoardError::Aborted);
        }
        ctrl.emit(processed, total);

        for line in chunk {
            let values: Vec<&str> = line.split(delimiter).collect();
            if values.len() < headers.len() {
                rows_skipped += 1;
                continue;
            }
            let field = |slot: Option<usize>| -> String {
                slot.and_then(|pos| values.get(pos))
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default()
            };
            let record = Record {
                id: alloc(),
                handoff_value: field(columns.handoff_value),
                channel_id: field(columns.channel_id),
                virtual_cc: field(columns.virtual_cc),
                campaign_id: field(columns.campaign_id),
                wavy_user: field(columns.wavy_user),
                report_campaign: field(columns.report_campaign),
                report_product: field(columns.report_product),
                report_campaign_code: field(columns.report_campaign_code),
                weight: field(columns.weight),
                status: RecordStatus::Original,
            };
            options.observe(&record);
            records.push(record);
        }
        processed += chunk.len();
    }
    ctrl.emit(total, total);

    if rows_skipped > 0 {
        warn!(rows_skipped, "import skipped short rows");
    }

    Ok(ParsedImport {
        records,
        rows_skipped,
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{ProgressHub, ProgressStage};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    fn parse_text(text: &str) -> Result<ParsedImport> {
        let hub = ProgressHub::new();
        let abort = AtomicBool::new(false);
        let ctrl = ChunkControl::new(&hub, &abort, ProgressStage::Import, false);
        let next = AtomicU64::new(1);
        parse(text, 200, &ctrl, || {
            RecordId(next.fetch_add(1, Ordering::SeqCst))
        })
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c"), ';');
        assert_eq!(detect_delimiter("a,b,c"), ',');
        // Strictly more commas required to switch.
        assert_eq!(detect_delimiter("a,b;c,d;e;f"), ';');
        assert_eq!(detect_delimiter("plain"), ';');
    }

    #[test]
    fn test_semicolon_import() {
        let text = "HandoffValue;ChannelId;CampaignId\nH1;SMS;C1\nH2;WHATSAPP;C2";
        let parsed = parse_text(text).unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.rows_skipped, 0);
        let first = &parsed.records[0];
        assert_eq!(first.handoff_value, "H1");
        assert_eq!(first.channel_id, "SMS");
        assert_eq!(first.campaign_id, "C1");
        assert_eq!(first.status, RecordStatus::Original);
        // Unmapped known fields default to empty.
        assert_eq!(first.weight, "");
    }

    #[test]
    fn test_comma_import() {
        let text = "HandoffValue,ChannelId\nX,Y";
        let parsed = parse_text(text).unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].handoff_value, "X");
        assert_eq!(parsed.records[0].channel_id, "Y");
    }

    #[test]
    fn test_bom_stripped() {
        let text = "\u{feff}HandoffValue;ChannelId\nH1;SMS";
        let parsed = parse_text(text).unwrap();
        assert_eq!(parsed.records[0].handoff_value, "H1");
    }

    #[test]
    fn test_short_rows_skipped_import_continues() {
        let text = "HandoffValue;ChannelId;CampaignId\nH1;SMS\nH2;SMS;C2\nH3";
        let parsed = parse_text(text).unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].handoff_value, "H2");
        assert_eq!(parsed.rows_skipped, 2);
    }

    #[test]
    fn test_extra_fields_tolerated() {
        let text = "HandoffValue;ChannelId\nH1;SMS;surplus;fields";
        let parsed = parse_text(text).unwrap();
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn test_unknown_headers_ignored() {
        let text = "Mystery;HandoffValue;ChannelId;Extra\nm;H1;SMS;x";
        let parsed = parse_text(text).unwrap();

        let record = &parsed.records[0];
        assert_eq!(record.handoff_value, "H1");
        assert_eq!(record.channel_id, "SMS");
    }

    #[test]
    fn test_blank_lines_ignored() {
        let text = "HandoffValue;ChannelId\n\nH1;SMS\n   \nH2;SMS\n";
        let parsed = parse_text(text).unwrap();
        assert_eq!(parsed.records.len(), 2);
    }

    #[test]
    fn test_header_only_is_structural_failure() {
        assert!(matches!(
            parse_text("HandoffValue;ChannelId").unwrap_err(),
            BoardError::EmptyImport
        ));
        assert!(matches!(
            parse_text("").unwrap_err(),
            BoardError::EmptyImport
        ));
    }

    #[test]
    fn test_field_options_collected() {
        let text = "HandoffValue;ChannelId;CampaignId;WavyUser\nH1;SMS;C1;W1\nH2;SMS;C1;W2";
        let parsed = parse_text(text).unwrap();

        assert_eq!(parsed.options.campaigns.len(), 1);
        assert!(parsed.options.campaigns.contains("C1"));
        assert_eq!(parsed.options.wavy_users.len(), 2);
    }

    #[test]
    fn test_values_trimmed() {
        let text = "HandoffValue;ChannelId\n  H1  ;  SMS  ";
        let parsed = parse_text(text).unwrap();
        assert_eq!(parsed.records[0].handoff_value, "H1");
        assert_eq!(parsed.records[0].channel_id, "SMS");
    }
}
