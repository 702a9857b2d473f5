#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, header};

use product_catalog::{
    AppError, AppState, Result,
    database::ProductStore,
    models::{ImageUpload, NewProduct, Product},
    services::{
        BlobStore,
        blob_service::{blob_key, public_url},
    },
};

// -- In-memory database -----------------------------------------------------

#[derive(Default)]
pub struct MemoryProductStore {
    pub rows: Mutex<Vec<Product>>,
    pub insert_calls: Mutex<Vec<NewProduct>>,
    pub insert_error: Option<(String, String)>,
    pub list_fails: bool,
}

impl MemoryProductStore {
    pub fn with_rows(rows: Vec<Product>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn failing_insert(code: &str, message: &str) -> Self {
        Self {
            insert_error: Some((code.to_string(), message.to_string())),
            ..Self::default()
        }
    }

    pub fn failing_list() -> Self {
        Self {
            list_fails: true,
            ..Self::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn insert_count(&self) -> usize {
        self.insert_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn insert(&self, product: &NewProduct) -> Result<()> {
        self.insert_calls.lock().unwrap().push(product.clone());

        if let Some((code, message)) = &self.insert_error {
            return Err(AppError::Database {
                code: code.clone(),
                message: message.clone(),
            });
        }

        self.rows.lock().unwrap().push(product.clone().into());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Product>> {
        if self.list_fails {
            return Err(AppError::Unexpected("connection refused".to_string()));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn check_health(&self) -> Result<()> {
        if self.list_fails {
            return Err(AppError::Unexpected("connection refused".to_string()));
        }
        Ok(())
    }
}

// -- In-memory blob store ---------------------------------------------------

#[derive(Default)]
pub struct MemoryBlobStore {
    pub uploaded: Mutex<Vec<String>>,
    pub fails: bool,
}

impl MemoryBlobStore {
    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::default()
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploaded.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, image: &ImageUpload) -> Result<String> {
        if self.fails {
            return Err(AppError::Upload("AuthorizationFailure".to_string()));
        }

        let key = blob_key(&image.file_name);
        self.uploaded.lock().unwrap().push(key.clone());
        public_url("lojafotos", "produtos", &key)
    }
}

// -- Helpers ------------------------------------------------------------------

pub fn state(store: &Arc<MemoryProductStore>, blobs: &Arc<MemoryBlobStore>) -> AppState {
    AppState {
        products: Arc::clone(store) as Arc<dyn ProductStore>,
        blobs: Arc::clone(blobs) as Arc<dyn BlobStore>,
    }
}

pub fn png(name: &str) -> ImageUpload {
    ImageUpload {
        file_name: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

const BOUNDARY: &str = "catalogo-test-boundary";

/// Builds a `multipart/form-data` POST to `/products`.
pub fn product_form_request(
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/products")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
