use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use sha2::Sha256;
use url::Url;
use uuid::Uuid;

use crate::{
    config::{BlobConfig, BlobCredentials, StorageConnectionString},
    error::{AppError, Result},
    models::ImageUpload,
};

type HmacSha256 = Hmac<Sha256>;

const AZURE_STORAGE_VERSION: &str = "2021-08-06";

/// Object storage for product images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the image under a fresh key and returns its public URL.
    async fn upload(&self, image: &ImageUpload) -> Result<String>;
}

/// `<uuid>_<original name>`, unique per call while keeping the file name
/// readable in the container listing.
pub fn blob_key(original_name: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), original_name)
}

fn object_url(base: &str, container: &str, key: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| AppError::Upload(format!("invalid blob endpoint '{}': {}", base, e)))?;

    url.path_segments_mut()
        .map_err(|_| AppError::Upload(format!("blob endpoint '{}' cannot hold a path", base)))?
        .pop_if_empty()
        .push(container)
        .push(key);

    Ok(url)
}

pub fn public_url(account_name: &str, container: &str, key: &str) -> Result<String> {
    let base = format!("https://{}.blob.core.windows.net", account_name);
    Ok(object_url(&base, container, key)?.to_string())
}

fn string_to_sign(
    content_length: usize,
    content_type: &str,
    date: &str,
    canonical_resource: &str,
) -> String {
    let length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };

    // VERB, Content-Encoding, Content-Language, Content-Length, Content-MD5,
    // Content-Type, Date, If-Modified-Since, If-Match, If-None-Match,
    // If-Unmodified-Since, Range, then the x-ms-* headers in sorted order.
    format!(
        "PUT\n\n\n{}\n\n{}\n\n\n\n\n\n\nx-ms-blob-type:BlockBlob\nx-ms-date:{}\nx-ms-version:{}\n{}",
        length, content_type, date, AZURE_STORAGE_VERSION, canonical_resource
    )
}

fn sign(account_key: &str, string_to_sign: &str) -> Result<String> {
    let key = STANDARD
        .decode(account_key)
        .map_err(|e| AppError::Upload(format!("account key is not valid base64: {}", e)))?;

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| AppError::Upload(format!("invalid account key: {}", e)))?;
    mac.update(string_to_sign.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Azure Blob Storage uploader using the `Put Blob` REST operation.
pub struct AzureBlobStore {
    config: BlobConfig,
    client: reqwest::Client,
}

impl AzureBlobStore {
    pub fn new(config: BlobConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn put_blob(&self, key: &str, image: &ImageUpload) -> Result<()> {
        let connection = StorageConnectionString::parse(&self.config.connection_string)
            .map_err(|e| AppError::Upload(e.to_string()))?;

        let mut url = object_url(&connection.blob_endpoint, &self.config.container_name, key)?;
        let content_type = image.resolved_content_type();
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        let authorization = match &connection.credentials {
            BlobCredentials::SharedKey {
                account_name,
                account_key,
            } => {
                let resource = format!("/{}{}", account_name, url.path());
                let signature = sign(
                    account_key,
                    &string_to_sign(image.bytes.len(), content_type, &date, &resource),
                )?;
                Some(format!("SharedKey {}:{}", account_name, signature))
            }
            BlobCredentials::SharedAccessSignature(sas) => {
                url.set_query(Some(sas));
                None
            }
        };

        let mut request = self
            .client
            .put(url)
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-date", &date)
            .header("x-ms-version", AZURE_STORAGE_VERSION)
            .header(CONTENT_TYPE, content_type)
            .body(image.bytes.clone());

        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("request to blob storage failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_code = response
                .headers()
                .get("x-ms-error-code")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Blob storage rejected upload ({}): {}", error_code, body);
            return Err(AppError::Upload(format!(
                "blob storage answered {} ({})",
                status, error_code
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn upload(&self, image: &ImageUpload) -> Result<String> {
        let key = blob_key(&image.file_name);

        self.put_blob(&key, image).await?;

        tracing::info!(
            "Uploaded {} bytes to container {} as {}",
            image.bytes.len(),
            self.config.container_name,
            key
        );

        public_url(&self.config.account_name, &self.config.container_name, &key)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        body::Bytes,
        extract::State,
        http::{HeaderMap, StatusCode, Uri},
        response::{IntoResponse, Response},
        routing::put,
    };

    use super::*;

    const TEST_ACCOUNT_KEY: &str = "c2VjcmV0LWFjY291bnQta2V5LWZvci10ZXN0cw==";

    // -- Local blob endpoint --------------------------------------------------

    struct RecordedPut {
        path: String,
        query: Option<String>,
        headers: HeaderMap,
        body: Vec<u8>,
    }

    #[derive(Clone)]
    struct FakeBlobService {
        status: StatusCode,
        requests: Arc<Mutex<Vec<RecordedPut>>>,
    }

    async fn record_put(
        State(service): State<FakeBlobService>,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        service.requests.lock().unwrap().push(RecordedPut {
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body: body.to_vec(),
        });

        if service.status.is_success() {
            service.status.into_response()
        } else {
            (
                service.status,
                [("x-ms-error-code", "AuthorizationFailure")],
            )
                .into_response()
        }
    }

    async fn start_blob_service(status: StatusCode) -> (String, Arc<Mutex<Vec<RecordedPut>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/{*path}", put(record_put))
            .with_state(FakeBlobService {
                status,
                requests: Arc::clone(&requests),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), requests)
    }

    fn shared_key_store(endpoint: &str) -> AzureBlobStore {
        AzureBlobStore::new(BlobConfig {
            connection_string: format!(
                "AccountName=lojafotos;AccountKey={};BlobEndpoint={}",
                TEST_ACCOUNT_KEY, endpoint
            ),
            container_name: "produtos".to_string(),
            account_name: "lojafotos".to_string(),
        })
    }

    fn caneca() -> ImageUpload {
        ImageUpload {
            file_name: "caneca.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a],
        }
    }

    fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn rejected_put_is_upload_failure() {
        let (endpoint, requests) = start_blob_service(StatusCode::FORBIDDEN).await;
        let store = shared_key_store(&endpoint);
        let image = caneca();

        let err = store.upload(&image).await.unwrap_err();

        match &err {
            AppError::Upload(msg) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("AuthorizationFailure"));
            }
            other => panic!("expected upload error, got {:?}", other),
        }

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];

        let key = request
            .path
            .strip_prefix("/produtos/")
            .expect("blob path should be under the container");
        let (id, name) = key.split_once('_').unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(name, "caneca.png");

        assert_eq!(header(&request.headers, "x-ms-blob-type"), Some("BlockBlob"));
        assert_eq!(
            header(&request.headers, "x-ms-version"),
            Some(AZURE_STORAGE_VERSION)
        );
        assert_eq!(header(&request.headers, "content-type"), Some("image/png"));
        assert_eq!(request.query, None);
        assert_eq!(request.body, image.bytes);

        let date = header(&request.headers, "x-ms-date").unwrap();
        let resource = format!("/lojafotos{}", request.path);
        let expected = sign(
            TEST_ACCOUNT_KEY,
            &string_to_sign(image.bytes.len(), "image/png", date, &resource),
        )
        .unwrap();
        assert_eq!(
            header(&request.headers, "authorization"),
            Some(format!("SharedKey lojafotos:{}", expected).as_str())
        );
    }

    #[tokio::test]
    async fn accepted_put_returns_public_url() {
        let (endpoint, requests) = start_blob_service(StatusCode::CREATED).await;
        let store = shared_key_store(&endpoint);

        let url = store.upload(&caneca()).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let key = requests[0].path.rsplit('/').next().unwrap();

        assert_eq!(
            url,
            format!("https://lojafotos.blob.core.windows.net/produtos/{}", key)
        );
        assert!(key.ends_with("_caneca.png"));
    }

    #[tokio::test]
    async fn sas_credentials_go_in_the_query() {
        let (endpoint, requests) = start_blob_service(StatusCode::CREATED).await;
        let store = AzureBlobStore::new(BlobConfig {
            connection_string: format!(
                "BlobEndpoint={};SharedAccessSignature=sv=2022-11-02&sig=abc%3D",
                endpoint
            ),
            container_name: "produtos".to_string(),
            account_name: "lojafotos".to_string(),
        });

        let url = store.upload(&caneca()).await.unwrap();

        let requests = requests.lock().unwrap();
        let request = &requests[0];
        assert!(request.path.starts_with("/produtos/"));
        assert_eq!(request.query.as_deref(), Some("sv=2022-11-02&sig=abc%3D"));
        assert_eq!(header(&request.headers, "authorization"), None);
        assert!(!url.contains("sig="));
    }

    #[test]
    fn key_is_uuid_then_file_name() {
        let key = blob_key("caneca azul.png");
        let (id, name) = key.split_once('_').unwrap();

        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(name, "caneca azul.png");
        assert_ne!(blob_key("caneca azul.png"), key);
    }

    #[test]
    fn public_url_uses_account_and_container() {
        let url = public_url("lojafotos", "produtos", "abc_caneca.png").unwrap();
        assert_eq!(
            url,
            "https://lojafotos.blob.core.windows.net/produtos/abc_caneca.png"
        );
    }

    #[test]
    fn public_url_encodes_key() {
        let url = public_url("lojafotos", "produtos", "abc_foto da caneca.png").unwrap();
        assert_eq!(
            url,
            "https://lojafotos.blob.core.windows.net/produtos/abc_foto%20da%20caneca.png"
        );
    }

    #[test]
    fn object_url_keeps_endpoint_path() {
        let url = object_url(
            "http://127.0.0.1:10000/devstoreaccount1",
            "produtos",
            "abc_caneca.png",
        )
        .unwrap();
        assert_eq!(url.path(), "/devstoreaccount1/produtos/abc_caneca.png");
    }

    #[test]
    fn shared_key_signature() {
        let sts = string_to_sign(
            4,
            "image/png",
            "Fri, 16 Oct 2026 12:00:00 GMT",
            "/lojafotos/produtos/abc_caneca.png",
        );

        assert!(sts.starts_with("PUT\n\n\n4\n\nimage/png\n"));

        let signature = sign(TEST_ACCOUNT_KEY, &sts).unwrap();
        assert_eq!(signature, "GFUPCMiC5b70zQnQdZfQdIKNNZVuYtN7AImmVdxv4E4=");
    }

    #[test]
    fn invalid_account_key_is_an_upload_error() {
        let err = sign("not base64!", "PUT").unwrap_err();
        assert!(matches!(err, AppError::Upload(_)));
    }

    #[tokio::test]
    async fn malformed_connection_string_fails_upload() {
        let store = AzureBlobStore::new(BlobConfig {
            connection_string: String::new(),
            container_name: "produtos".to_string(),
            account_name: "lojafotos".to_string(),
        });

        let image = ImageUpload {
            file_name: "caneca.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        };

        let err = store.upload(&image).await.unwrap_err();
        assert!(matches!(err, AppError::Upload(_)));
    }
}
