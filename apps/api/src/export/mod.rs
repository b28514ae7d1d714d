//! Preview projection and paginated PDF export of the aggregate record.

pub mod font_metrics;
pub mod handlers;
pub mod layout;
pub mod pdf;
pub mod preview;

use anyhow::Result;
use tracing::info;

use crate::models::portfolio::AggregateRecord;
use layout::PageConfig;

/// Renders, paginates and serializes `record` into PDF bytes.
pub fn export_pdf(record: &AggregateRecord, config: &PageConfig) -> Result<Vec<u8>> {
    let doc = preview::render(record);
    let pages = layout::paginate(&doc, config);
    let bytes = pdf::serialize_to_pdf(&pages, config)?;
    info!(
        sections = doc.sections.len(),
        pages = pages.len(),
        bytes = bytes.len(),
        "Portfolio exported"
    );
    Ok(bytes)
}
