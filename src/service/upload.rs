// Primitives for reading the uploaded export out of a multipart form.

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use log::debug;
use snafu::prelude::*;

use crate::service::*;

/// The name of the form field that carries the export.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Returns the first `file` field of the form. All the other fields are skipped.
pub async fn read_file_field(mut payload: Multipart, limit: usize) -> ServiceResult<UploadedFile> {
    let mut found: Option<UploadedFile> = None;
    while let Some(item) = payload.next().await {
        let mut field = item.context(ReadingMultipartSnafu {})?;
        let disposition = field.content_disposition();
        let name = disposition.get_name().map(|s| s.to_string());
        let filename = disposition.get_filename().map(|s| s.to_string());

        if found.is_some() || name.as_deref() != Some(FILE_FIELD) {
            debug!("read_file_field: skipping field {:?}", name);
            drain(&mut field).await?;
            continue;
        }

        let content = read_limited(&mut field, limit).await?;
        debug!(
            "read_file_field: filename: {:?} size: {}",
            filename,
            content.len()
        );
        found = Some(UploadedFile {
            filename: filename.unwrap_or_default(),
            content,
        });
    }

    let file = found.context(MissingFileSnafu {})?;
    ensure!(!file.filename.is_empty(), EmptyFilenameSnafu {});
    Ok(file)
}

async fn read_limited(field: &mut Field, limit: usize) -> ServiceResult<Vec<u8>> {
    let mut content: Vec<u8> = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.context(ReadingMultipartSnafu {})?;
        ensure!(
            content.len() + chunk.len() <= limit,
            UploadTooLargeSnafu { limit }
        );
        content.extend_from_slice(&chunk);
    }
    Ok(content)
}

async fn drain(field: &mut Field) -> ServiceResult<()> {
    while let Some(chunk) = field.next().await {
        chunk.context(ReadingMultipartSnafu {})?;
    }
    Ok(())
}
