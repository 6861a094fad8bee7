//! Streaming CSV export of a link's clicks.

use chrono::Utc;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

use crate::application::services::analytics_service::find_owned_by_code;
use crate::domain::entities::{Click, ClickCursor};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use serde_json::json;

/// Clicks fetched per database round trip while exporting.
pub const EXPORT_BATCH_SIZE: i64 = 500;

/// Column titles of the export.
pub const CSV_HEADER: [&str; 6] = [
    "ID",
    "URL ID",
    "IP Address",
    "Referrer",
    "User Agent",
    "Created At",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Chunks of CSV text, produced lazily. Consumed once.
pub type CsvStream = BoxStream<'static, Result<Vec<u8>, AppError>>;

/// A ready-to-send export: suggested file name plus the body stream.
pub struct CsvExport {
    pub filename: String,
    pub body: CsvStream,
}

/// Service for exporting a link's clicks as CSV.
pub struct ExportService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl ExportService {
    pub fn new(links: Arc<dyn LinkRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Starts an export of every click of the link behind `code`, newest first.
    ///
    /// Ownership is checked before the stream is built; rows are only read
    /// while the stream is polled, [`EXPORT_BATCH_SIZE`] at a time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or belongs to
    /// another user.
    pub async fn export_csv(&self, user_id: i64, code: &str) -> Result<CsvExport, AppError> {
        let link = find_owned_by_code(self.links.as_ref(), user_id, code).await?;

        tracing::info!(user_id, link_id = link.id, "Starting CSV export");

        Ok(CsvExport {
            filename: format!("analytics_{}_{}.csv", link.short_code, Utc::now().timestamp()),
            body: click_stream(Arc::clone(&self.clicks), link.id),
        })
    }
}

enum Phase {
    Header,
    Rows(Option<ClickCursor>),
    Done,
}

struct ExportCursor {
    clicks: Arc<dyn ClickRepository>,
    link_id: i64,
    phase: Phase,
}

fn click_stream(clicks: Arc<dyn ClickRepository>, link_id: i64) -> CsvStream {
    let start = ExportCursor {
        clicks,
        link_id,
        phase: Phase::Header,
    };

    stream::unfold(start, |mut cursor| async move {
        match cursor.phase {
            Phase::Header => {
                cursor.phase = Phase::Rows(None);
                Some((encode_header(), cursor))
            }
            Phase::Rows(after) => {
                let batch = cursor
                    .clicks
                    .batch_after(cursor.link_id, after, EXPORT_BATCH_SIZE)
                    .await;

                match batch {
                    Ok(batch) if batch.is_empty() => None,
                    Ok(batch) => {
                        cursor.phase = if (batch.len() as i64) < EXPORT_BATCH_SIZE {
                            Phase::Done
                        } else {
                            Phase::Rows(batch.last().map(Click::cursor))
                        };
                        Some((encode_rows(&batch), cursor))
                    }
                    Err(e) => {
                        tracing::error!(link_id = cursor.link_id, error = %e, "CSV export aborted");
                        cursor.phase = Phase::Done;
                        Some((Err(e), cursor))
                    }
                }
            }
            Phase::Done => None,
        }
    })
    .boxed()
}

fn csv_error(e: impl std::fmt::Display) -> AppError {
    tracing::error!(error = %e, "CSV encoding failed");
    AppError::internal("Failed to encode CSV", json!({}))
}

fn encode_header() -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    writer.into_inner().map_err(csv_error)
}

fn encode_rows(clicks: &[Click]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::with_capacity(clicks.len() * 128));

    for click in clicks {
        writer
            .write_record([
                click.id.to_string(),
                click.link_id.to_string(),
                click.ip_address.clone(),
                click.referrer.clone(),
                click.user_agent.clone(),
                click.created_at.format(TIMESTAMP_FORMAT).to_string(),
            ])
            .map_err(csv_error)?;
    }

    writer.into_inner().map_err(csv_error)
}
