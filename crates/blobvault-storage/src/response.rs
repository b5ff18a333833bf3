//! Publisher response parsing
//!
//! `PUT /v1/blobs` answers with exactly one of two shapes:
//!
//! ```json
//! { "newlyCreated": { "blobObject": { "id": "0x..", "blobId": "..", "storage": { "endEpoch": 42 } } } }
//! { "alreadyCertified": { "blobId": "..", "endEpoch": 42, "event": { "txDigest": ".." } } }
//! ```

use serde::Deserialize;

use crate::error::{StorageError, StorageResult};
use crate::mirrors::Mirror;
use crate::traits::{BlobId, BlobStatus, StoredBlob};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublisherResponse {
    pub newly_created: Option<NewlyCreated>,
    pub already_certified: Option<AlreadyCertified>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewlyCreated {
    pub blob_object: BlobObject,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BlobObject {
    pub id: String,
    pub blob_id: String,
    pub storage: Option<StorageInfo>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub end_epoch: Option<Epoch>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AlreadyCertified {
    pub blob_id: String,
    pub end_epoch: Option<Epoch>,
    pub event: Option<CertifiedEvent>,
    /// Some publishers reference the blob object instead of the event
    pub object: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CertifiedEvent {
    pub tx_digest: String,
}

/// Epochs arrive as numbers from Walrus, as strings from some proxies
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Epoch {
    Number(u64),
    Text(String),
}

impl Epoch {
    fn value(&self) -> Option<u64> {
        match self {
            Epoch::Number(n) => Some(*n),
            Epoch::Text(s) => s.parse().ok(),
        }
    }
}

impl PublisherResponse {
    /// Collapse both response shapes into one record
    ///
    /// `mirror` is the endpoint that accepted the upload; the blob URL points
    /// at its download side.
    pub fn into_stored(self, mirror: &Mirror) -> StorageResult<StoredBlob> {
        if let Some(created) = self.newly_created {
            let object = created.blob_object;
            let blob_id = BlobId::parse(object.blob_id)?;
            return Ok(StoredBlob {
                blob_url: mirror.download_url(blob_id.as_str()),
                blob_id,
                status: BlobStatus::NewlyCreated,
                end_epoch: object
                    .storage
                    .and_then(|s| s.end_epoch)
                    .and_then(|e| e.value()),
                sui_ref: object.id,
                mirror: mirror.name().to_string(),
            });
        }

        if let Some(certified) = self.already_certified {
            let sui_ref = certified
                .event
                .map(|e| e.tx_digest)
                .or(certified.object)
                .unwrap_or_default();
            let blob_id = BlobId::parse(certified.blob_id)?;
            return Ok(StoredBlob {
                blob_url: mirror.download_url(blob_id.as_str()),
                blob_id,
                status: BlobStatus::AlreadyCertified,
                end_epoch: certified.end_epoch.and_then(|e| e.value()),
                sui_ref,
                mirror: mirror.name().to_string(),
            });
        }

        Err(StorageError::MalformedResponse(
            "neither newlyCreated nor alreadyCertified present".into(),
        ))
    }
}

/// Parse a publisher response body
pub fn parse_publisher_response(body: &[u8], mirror: &Mirror) -> StorageResult<StoredBlob> {
    let response: PublisherResponse = serde_json::from_slice(body)
        .map_err(|e| StorageError::MalformedResponse(e.to_string()))?;
    response.into_stored(mirror)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOB_ID: &str = "M4hsZGQ1oCktdzegB6HnI6Mi28S2nqOPHxK-W7_4BUk";

    fn mirror() -> Mirror {
        Mirror::walrus(
            "walrus.space",
            Some("https://publisher.walrus-testnet.walrus.space"),
            "https://aggregator.walrus-testnet.walrus.space",
        )
        .unwrap()
    }

    #[test]
    fn test_newly_created() {
        let body = format!(
            r#"{{
                "newlyCreated": {{
                    "blobObject": {{
                        "id": "0xe91eee8c5b6f35b9a250cfc29e30f0d9e5463a21fd8d1ddb0fc22d44db4eac50",
                        "registeredEpoch": 34,
                        "blobId": "{BLOB_ID}",
                        "size": 17,
                        "storage": {{ "startEpoch": 34, "endEpoch": 35, "storageSize": 66034000 }},
                        "deletable": false
                    }},
                    "cost": 132300
                }}
            }}"#
        );

        let stored = parse_publisher_response(body.as_bytes(), &mirror()).unwrap();
        assert_eq!(stored.blob_id.as_str(), BLOB_ID);
        assert_eq!(stored.status, BlobStatus::NewlyCreated);
        assert_eq!(stored.end_epoch, Some(35));
        assert!(stored.sui_ref.starts_with("0xe91e"));
        assert_eq!(stored.mirror, "walrus.space");
        assert_eq!(
            stored.blob_url,
            format!("https://aggregator.walrus-testnet.walrus.space/v1/blobs/{BLOB_ID}")
        );
    }

    #[test]
    fn test_already_certified() {
        let body = format!(
            r#"{{
                "alreadyCertified": {{
                    "blobId": "{BLOB_ID}",
                    "event": {{ "txDigest": "4XQHFa9S324wTzYHF3vsBSwpUZuLpmwTHYMFv9nsttSs", "eventSeq": "0" }},
                    "endEpoch": "35"
                }}
            }}"#
        );

        let stored = parse_publisher_response(body.as_bytes(), &mirror()).unwrap();
        assert_eq!(stored.status, BlobStatus::AlreadyCertified);
        assert_eq!(stored.end_epoch, Some(35));
        assert_eq!(stored.sui_ref, "4XQHFa9S324wTzYHF3vsBSwpUZuLpmwTHYMFv9nsttSs");
        assert!(stored.blob_url.ends_with(&format!("/v1/blobs/{BLOB_ID}")));
    }

    #[test]
    fn test_already_certified_by_object() {
        let body = format!(
            r#"{{ "alreadyCertified": {{ "blobId": "{BLOB_ID}", "object": "0xabc", "endEpoch": 7 }} }}"#
        );

        let stored = parse_publisher_response(body.as_bytes(), &mirror()).unwrap();
        assert_eq!(stored.sui_ref, "0xabc");
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let result = parse_publisher_response(br#"{ "markedInvalid": {} }"#, &mirror());
        assert!(matches!(result, Err(StorageError::MalformedResponse(_))));

        let result = parse_publisher_response(b"not json", &mirror());
        assert!(matches!(result, Err(StorageError::MalformedResponse(_))));
    }

    #[test]
    fn test_bad_blob_id_in_response_rejected() {
        let body = br#"{ "alreadyCertified": { "blobId": "../../x", "endEpoch": 1 } }"#;
        let result = parse_publisher_response(body, &mirror());
        assert!(matches!(result, Err(StorageError::InvalidBlobId(_))));
    }
}
