//! CSV ingestion.
//!
//! The operator hands over a CSV; it is uploaded to the blob bucket
//! under a timestamped key, and the processing API is then told to parse
//! that object into startup rows. The API is never called for an object
//! that failed to upload.

use crate::api::CsvProcessor;
use crate::blob::BlobStore;
use crate::error::{Result, VentraError};
use crate::resource::Severity;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Only the declared type counts; the file's bytes are never sniffed.
pub fn is_csv(declared_type: &str) -> bool {
    declared_type == CSV_CONTENT_TYPE
}

/// Declared type for a local file, from its extension.
pub fn declared_type_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".csv") {
        CSV_CONTENT_TYPE
    } else {
        "application/octet-stream"
    }
}

/// Object key for an upload: upload instant in unix millis, an
/// underscore, then the bare file name.
pub fn object_key(now_millis: i64, file_name: &str) -> String {
    let bare = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    format!("{now_millis}_{bare}")
}

pub fn success_message(inserted: u64) -> (Severity, String) {
    (
        Severity::Success,
        format!("Success! {inserted} startups imported."),
    )
}

/// Validates, uploads, then triggers processing. Returns how many rows
/// the processor inserted.
pub async fn upload_and_process<B, P>(
    blob: &B,
    processor: &P,
    file_name: &str,
    declared_type: &str,
    bytes: Vec<u8>,
    now_millis: i64,
) -> Result<u64>
where
    B: BlobStore,
    P: CsvProcessor,
{
    if !is_csv(declared_type) {
        return Err(VentraError::InvalidInput(
            "Please select a valid CSV file.".to_string(),
        ));
    }
    let key = object_key(now_millis, file_name);
    blob.upload(&key, bytes, CSV_CONTENT_TYPE).await?;
    processor.process_csv(&key).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeBlob {
        uploads: Mutex<Vec<String>>,
        fail: bool,
    }

    impl BlobStore for FakeBlob {
        async fn upload(&self, key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<()> {
            if self.fail {
                return Err(VentraError::Blob("Bucket not found".to_string()));
            }
            self.uploads.lock().unwrap().push(key.to_string());
            Ok(())
        }
    }

    struct FakeProcessor {
        processed: Mutex<Vec<String>>,
    }

    impl CsvProcessor for FakeProcessor {
        async fn process_csv(&self, path: &str) -> Result<u64> {
            self.processed.lock().unwrap().push(path.to_string());
            Ok(12)
        }
    }

    #[test]
    fn test_declared_type_for() {
        assert_eq!(declared_type_for("leads.csv"), "text/csv");
        assert_eq!(declared_type_for("LEADS.CSV"), "text/csv");
        assert_eq!(declared_type_for("leads.xlsx"), "application/octet-stream");
    }

    #[test]
    fn test_object_key_strips_directories() {
        assert_eq!(
            object_key(1714560000000, "/home/op/exports/leads.csv"),
            "1714560000000_leads.csv"
        );
        assert_eq!(object_key(1, "leads.csv"), "1_leads.csv");
    }

    #[tokio::test]
    async fn test_rejects_non_csv_before_upload() {
        let blob = FakeBlob {
            uploads: Mutex::new(Vec::new()),
            fail: false,
        };
        let processor = FakeProcessor {
            processed: Mutex::new(Vec::new()),
        };
        let err = upload_and_process(
            &blob,
            &processor,
            "leads.xlsx",
            "application/vnd.ms-excel",
            vec![1, 2, 3],
            1714560000000,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Please select a valid CSV file.");
        assert!(blob.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_skips_processing() {
        let blob = FakeBlob {
            uploads: Mutex::new(Vec::new()),
            fail: true,
        };
        let processor = FakeProcessor {
            processed: Mutex::new(Vec::new()),
        };
        let err = upload_and_process(
            &blob,
            &processor,
            "leads.csv",
            "text/csv",
            vec![1, 2, 3],
            1714560000000,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Bucket not found");
        assert!(processor.processed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_ingest_uses_timestamped_key() {
        let blob = FakeBlob {
            uploads: Mutex::new(Vec::new()),
            fail: false,
        };
        let processor = FakeProcessor {
            processed: Mutex::new(Vec::new()),
        };
        let inserted = upload_and_process(
            &blob,
            &processor,
            "leads.csv",
            "text/csv",
            b"name,email\n".to_vec(),
            1714560000000,
        )
        .await
        .unwrap();
        assert_eq!(inserted, 12);
        assert_eq!(
            *blob.uploads.lock().unwrap(),
            vec!["1714560000000_leads.csv"]
        );
        // Processing receives the same key the upload used
        assert_eq!(
            *processor.processed.lock().unwrap(),
            vec!["1714560000000_leads.csv"]
        );
    }
}
