//! Delimited-text import/export adapters.
//!
//! Import maps columns by header name with an auto-detected delimiter;
//! export is a fixed-header, order-preserving projection of the store.

mod export;
mod import;

pub(crate) use export::serialize;
pub(crate) use import::{parse, ParsedImport};

/// Fixed export header. Import recognizes these same column names (plus
/// nothing else: unknown headers are ignored).
pub const EXPORT_HEADER: &str = "HandoffValue;ChannelId;VirtualCC;CampaignId;WavyUser;Reporte_Campana;Reporte_Producto;Reporte_Cod_Campana;Peso";
