//! Geometry extraction endpoints
//!
//! Uploads arrive as multipart form data. Spreadsheets are parsed
//! straight from the buffered upload; SEG-Y files are staged to a
//! scoped temp file because the reader walks the trace stream from
//! disk. Staged files are deleted on every exit path, including parse
//! failure.

use std::io::Write;

use axum::extract::Multipart;
use axum::Json;
use masw_common::models::GeometryPoint;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{segy, spreadsheet, ExtractError};

/// POST /extract/excel
///
/// Multipart field `excel_file`: an xlsx workbook with a station
/// coordinate sheet. Returns the receiver geometry.
pub async fn extract_excel(mut multipart: Multipart) -> ApiResult<Json<Vec<GeometryPoint>>> {
    let workbook = read_file_field(&mut multipart, "excel_file").await?;
    let points = run_extraction(move || spreadsheet::extract_geometry(&workbook)).await?;

    info!("Extracted {} stations from workbook", points.len());
    Ok(Json(points))
}

/// POST /extract/excel/sheets
///
/// Multipart field `excel_file`. Returns every sheet name, unfiltered.
pub async fn extract_excel_sheets(mut multipart: Multipart) -> ApiResult<Json<Vec<String>>> {
    let workbook = read_file_field(&mut multipart, "excel_file").await?;
    let sheets = run_extraction(move || spreadsheet::list_sheet_names(&workbook)).await?;

    Ok(Json(sheets))
}

/// POST /extract/sgy
///
/// Multipart field `sgy_file`: a SEG-Y record. Returns one point per
/// trace, derived from the trace headers.
pub async fn extract_sgy(mut multipart: Multipart) -> ApiResult<Json<Vec<GeometryPoint>>> {
    let upload = read_file_field(&mut multipart, "sgy_file").await?;
    let points = run_extraction(move || {
        let mut staged = NamedTempFile::new()?;
        staged.write_all(&upload)?;
        segy::extract_geometry(staged.path())
    })
    .await?;

    info!("Extracted {} receiver positions from SEG-Y upload", points.len());
    Ok(Json(points))
}

/// Pull the named file field out of the multipart stream, fully
/// buffered.
async fn read_file_field(multipart: &mut Multipart, want: &str) -> ApiResult<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some(want) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(ApiError::BadRequest(format!("missing file field {want:?}")))
}

/// Parsing is synchronous and bounded by file size; run it off the
/// async worker.
async fn run_extraction<T, F>(parse: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, ExtractError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))?
        .map_err(ApiError::from)
}
