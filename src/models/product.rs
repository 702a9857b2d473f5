use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stored catalog entry. Decoded by column name, so the column order of the
/// `produtos` table does not matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    #[sqlx(rename = "nome")]
    pub name: String,
    #[sqlx(rename = "descricao")]
    pub description: String,
    #[sqlx(rename = "preco")]
    pub price: Decimal,
    #[sqlx(rename = "imagem_url")]
    pub image_url: Option<String>,
}

/// Row about to be inserted, after any image upload has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Validated form fields, before the image is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

impl ProductDraft {
    pub fn into_new_product(self, image_url: Option<String>) -> NewProduct {
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            image_url,
        }
    }
}

impl From<NewProduct> for Product {
    fn from(product: NewProduct) -> Self {
        Product {
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
        }
    }
}

/// Image file received from the form.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Content type sent to the blob store, falling back to the extension.
    pub fn resolved_content_type(&self) -> &str {
        if let Some(ct) = self.content_type.as_deref().filter(|ct| !ct.is_empty()) {
            return ct;
        }

        match self.extension().as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        }
    }

    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}
