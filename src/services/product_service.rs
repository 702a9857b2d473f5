use crate::{
    database::ProductStore,
    models::{ImageUpload, Notices, Product, ProductDraft},
    services::blob_service::BlobStore,
};

pub const SAVE_FAILED: &str = "Falha ao salvar o produto.";

/// Stores the image (when given) and then the product row.
///
/// An upload failure stops before the insert. A failed insert after a
/// successful upload leaves the blob in the container. Every failure is
/// reported through `notices`.
pub async fn save(
    store: &dyn ProductStore,
    blobs: &dyn BlobStore,
    draft: ProductDraft,
    image: Option<&ImageUpload>,
    notices: &mut Notices,
) -> bool {
    let image_url = match image {
        Some(image) => match blobs.upload(image).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!("Image upload for '{}' failed: {}", draft.name, e);
                notices.error(e.user_message());
                notices.error(SAVE_FAILED);
                return false;
            }
        },
        None => None,
    };

    let product = draft.into_new_product(image_url);

    match store.insert(&product).await {
        Ok(()) => {
            tracing::info!("Product '{}' saved", product.name);
            true
        }
        Err(e) => {
            if product.image_url.is_some() {
                tracing::warn!(
                    "Insert failed after upload, blob left behind: {:?}",
                    product.image_url
                );
            }
            tracing::error!("Insert of product '{}' failed: {}", product.name, e);
            notices.error(e.user_message());
            notices.error(SAVE_FAILED);
            false
        }
    }
}

/// Every stored product, or an empty list plus an error notice when the
/// query fails.
pub async fn list_all(store: &dyn ProductStore, notices: &mut Notices) -> Vec<Product> {
    match store.list_all().await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!("Listing products failed: {}", e);
            notices.error(format!("Erro ao listar produtos. {}", e.user_message()));
            Vec::new()
        }
    }
}
