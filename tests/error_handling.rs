//! Error-path tests: every failure must leave the board unchanged.

use switchboard::{Board, BoardError, SharedFields, UpsertRequest};

fn fields() -> SharedFields {
    SharedFields {
        campaign_id: "C1".into(),
        wavy_user: "W1".into(),
        report_campaign: "Portabilidad".into(),
        ..Default::default()
    }
}

fn seeded_board() -> Board {
    let board = Board::new();
    board.select_channel("SMS");
    board
        .upsert(&["SEED".to_string()], fields())
        .unwrap();
    board
}

#[test]
fn test_empty_key_list_rejected_without_mutation() {
    let board = seeded_board();
    let before = board.record_count();

    let err = board.upsert(&[], fields()).unwrap_err();
    assert!(matches!(err, BoardError::EmptyKeyList));
    assert_eq!(board.record_count(), before);
}

#[test]
fn test_empty_channel_set_rejected_without_mutation() {
    let board = seeded_board();
    let before = board.record_count();

    let err = board
        .upsert_with(UpsertRequest {
            keys: vec!["H1".into()],
            channels: vec![],
            fields: fields(),
        })
        .unwrap_err();
    assert!(matches!(err, BoardError::NoChannels));
    assert_eq!(board.record_count(), before);
    assert!(board.lookup("H1").is_empty());
}

#[test]
fn test_missing_required_field_names_the_field() {
    let board = seeded_board();
    let before = board.record_count();

    let mut bad = fields();
    bad.wavy_user = String::new();
    let err = board.upsert(&["H1".to_string()], bad).unwrap_err();

    assert!(matches!(err, BoardError::MissingField("wavy user")));
    assert!(err.to_string().contains("wavy user"));
    assert_eq!(board.record_count(), before);
}

#[test]
fn test_structural_import_failure_keeps_old_content() {
    let board = seeded_board();

    let err = board.import_text("HandoffValue;ChannelId").unwrap_err();
    assert!(matches!(err, BoardError::EmptyImport));

    // Old content must survive a failed import wholesale.
    assert_eq!(board.record_count(), 1);
    assert_eq!(board.lookup("SEED").len(), 1);
}

#[test]
fn test_unreadable_path_is_io_error() {
    let board = seeded_board();
    let err = board
        .import_path("/nonexistent/intents.csv")
        .unwrap_err();
    assert!(matches!(err, BoardError::Io(_)));
    assert_eq!(board.record_count(), 1);
}

#[test]
fn test_export_of_empty_board_is_an_error() {
    let board = Board::new();
    let err = board.export_text().unwrap_err();
    assert!(matches!(err, BoardError::NoRecords));
}

#[test]
fn test_row_action_out_of_range() {
    let board = seeded_board();

    let err = board.delete_row(7).unwrap_err();
    assert!(matches!(
        err,
        BoardError::RowOutOfRange { index: 7, len: 1 }
    ));
    assert_eq!(board.record_count(), 1);

    let err = board.take_for_edit(1).unwrap_err();
    assert!(matches!(err, BoardError::RowOutOfRange { .. }));
    assert_eq!(board.record_count(), 1);
}

#[test]
fn test_bad_rows_do_not_abort_import() {
    let board = Board::new();
    let summary = board
        .import_text("HandoffValue;ChannelId;CampaignId\nshort;row\nH1;SMS;C1")
        .unwrap();

    // One bad row is skipped, the rest of the file lands.
    assert_eq!(summary.records_imported, 1);
    assert_eq!(summary.rows_skipped, 1);
    assert_eq!(board.record_count(), 1);
}
