use std::sync::Arc;

use blobvault_client::{BlobPipeline, PipelineError};
use blobvault_core::{CryptError, PasswordCipher};
use blobvault_storage::{BlobId, BlobStatus, InMemoryBlobStore, StorageError};

fn pipeline() -> BlobPipeline {
    BlobPipeline::new(Arc::new(InMemoryBlobStore::new()), PasswordCipher::default())
}

#[tokio::test]
async fn test_encrypted_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secret.bin");
    let original: Vec<u8> = (1..=10).collect();
    tokio::fs::write(&path, &original).await.unwrap();

    let pipeline = pipeline();
    let uploaded = pipeline.upload_file(&path, Some("secret")).await.unwrap();

    assert_eq!(uploaded.file_name, "secret.bin");
    assert!(uploaded.encrypted);
    assert_eq!(uploaded.status, BlobStatus::NewlyCreated);

    let downloaded = pipeline
        .download_file(&uploaded.blob_id, Some("secret"))
        .await
        .unwrap();
    assert_eq!(downloaded, original);
}

#[tokio::test]
async fn test_plain_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readme.txt");
    tokio::fs::write(&path, b"public").await.unwrap();

    let pipeline = pipeline();
    let uploaded = pipeline.upload_file(&path, None).await.unwrap();
    assert!(!uploaded.encrypted);
    assert_eq!(uploaded.size, 6);

    let downloaded = pipeline.download_file(&uploaded.blob_id, None).await.unwrap();
    assert_eq!(downloaded, b"public");
}

#[tokio::test]
async fn test_fabricated_id_not_found() {
    let id = BlobId::parse("thisBlobWasNeverUploaded").unwrap();
    let err = pipeline().download_file(&id, Some("secret")).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, PipelineError::Storage(StorageError::NotFound(_))));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_wrong_password_fails_decryption() {
    let pipeline = pipeline();
    let uploaded = pipeline
        .upload_bytes("x", b"payload".to_vec(), Some("right"))
        .await
        .unwrap();

    let err = pipeline
        .download_file(&uploaded.blob_id, Some("wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Crypt(CryptError::Decryption)));
}

#[tokio::test]
async fn test_decrypting_plain_upload_is_malformed() {
    let pipeline = pipeline();
    let uploaded = pipeline
        .upload_bytes("short", b"too short".to_vec(), None)
        .await
        .unwrap();

    let err = pipeline
        .download_file(&uploaded.blob_id, Some("pw"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Crypt(CryptError::MalformedBlob { .. })
    ));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = pipeline()
        .upload_file(&dir.path().join("absent"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
}

#[tokio::test]
async fn test_upload_result_serializes() {
    let uploaded = pipeline()
        .upload_bytes("doc.pdf", vec![0; 4], None)
        .await
        .unwrap();

    let json = serde_json::to_value(&uploaded).unwrap();
    assert_eq!(json["file_name"], "doc.pdf");
    assert_eq!(json["status"], "newly_created");
    assert_eq!(json["blob_id"], uploaded.blob_id.as_str());
    assert_eq!(json["blob_url"], format!("memory:{}", uploaded.blob_id));
}
