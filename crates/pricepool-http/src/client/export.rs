use super::ClientError;
use crate::common::framing::encode_frame;
use pricepool::PricingResult;
use serde::{Deserialize, Serialize};
use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

/// A server result annotated with the client-observed round-trip time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedResult {
    #[serde(flatten)]
    pub result: PricingResult,
    pub round_trip_ms: f64,
}

/// Writes `results` to `path` as newline-delimited JSON.
///
/// The data is written to a temporary sibling first and renamed into place,
/// so `path` either holds the complete export or is left untouched.
///
/// # Errors
///
/// Returns [`ClientError::Json`] if a result cannot be encoded and
/// [`ClientError::Io`] if the file cannot be written. The temporary file is
/// removed in both cases.
pub async fn export_ndjson(path: &Path, results: &[TimedResult]) -> Result<(), ClientError> {
    let frame = encode_frame(results)?;
    let tmp = temp_sibling(path);

    if let Err(e) = write_then_rename(&tmp, path, &frame).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    Ok(())
}

async fn write_then_rename(tmp: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    tokio::fs::write(tmp, contents).await?;
    tokio::fs::rename(tmp, path).await
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("export"), OsString::from);
    name.push(".tmp");
    path.with_file_name(name)
}
