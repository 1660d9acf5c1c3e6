//! # Switchboard
//!
//! An in-memory workbench for bulk-editing handoff routing configurations:
//! records mapping a handoff value to per-channel campaign routing, with
//! deduplicating upsert, delimited-text import/export, search and
//! pagination.
//!
//! ## Core Concepts
//!
//! - **Records**: one row per (handoff value, channel) pair; edits replace
//!   rows wholesale, never mutate them in place
//! - **Index**: derived handoff-value groups, kept in lockstep with the
//!   store for constant-time existence checks
//! - **Board**: the single state manager every mutation goes through
//! - **View**: pagination over the full set or a transient search subset
//!
//! ## Example
//!
//! ```ignore
//! use switchboard::{Board, SharedFields};
//!
//! let board = Board::new();
//! board.select_channel("SMS");
//! board.select_channel("WHATSAPP");
//!
//! let stats = board.upsert(&["H1".into()], SharedFields {
//!     campaign_id: "C1".into(),
//!     wavy_user: "W1".into(),
//!     report_campaign: "Portabilidad".into(),
//!     ..Default::default()
//! })?;
//! assert_eq!(stats.records_written, 2);
//!
//! let csv = board.export_text()?;
//! ```

pub mod board;
pub mod error;
pub mod io;
pub mod progress;
pub mod records;
pub mod reports;
pub mod types;
pub mod upsert;
pub mod view;

// Re-exports
pub use board::{Board, BoardConfig};
pub use error::{BoardError, Result};
pub use io::EXPORT_HEADER;
pub use progress::{ProgressEvent, ProgressHub, ProgressStage};
pub use records::{HandoffIndex, RecordStore};
pub use types::*;
pub use upsert::UpsertRequest;
pub use view::ViewState;
