use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    response::Html,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ImageUpload, Notices, ProductForm, client_file_name},
    services::product_service,
    views::{self, Listing, PageView},
};

pub const SAVE_SUCCEEDED: &str = "Produto salvo com sucesso!";
pub const LIST_LOADED: &str = "Lista de produtos carregada!";

pub async fn index() -> Result<Html<String>> {
    Ok(Html(views::render(&PageView::default())?))
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::Unexpected(format!("não foi possível ler o formulário: {}", err))
}

/// Reads the product form fields; unknown fields are ignored.
pub async fn collect_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "name" => form.name = field.text().await.map_err(multipart_error)?,
            "description" => form.description = field.text().await.map_err(multipart_error)?,
            "price" => form.price = field.text().await.map_err(multipart_error)?,
            "image" => {
                let file_name = client_file_name(field.file_name().unwrap_or_default()).to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();

                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn load_listing(state: &AppState) -> Listing {
    let mut notices = Notices::new();
    let products = product_service::list_all(state.products.as_ref(), &mut notices).await;
    Listing::new(&products, notices)
}

pub async fn save_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>> {
    let mut view = PageView::default();

    match collect_form(multipart).await.and_then(ProductForm::validate) {
        Ok((draft, image)) => {
            let saved = product_service::save(
                state.products.as_ref(),
                state.blobs.as_ref(),
                draft,
                Some(&image),
                &mut view.form_notices,
            )
            .await;

            if saved {
                view.form_notices.success(SAVE_SUCCEEDED);
                view.listing = Some(load_listing(&state).await);
                view.listing_after_save = true;
            }
        }
        Err(e) if e.is_validation() => {
            tracing::warn!("Product form rejected: {}", e);
            view.form_notices.warning(e.user_message());
        }
        Err(e) => {
            tracing::error!("Product form could not be read: {}", e);
            view.form_notices.error(e.user_message());
        }
    }

    Ok(Html(views::render(&view)?))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Html<String>> {
    let mut listing = load_listing(&state).await;
    listing.notices.info(LIST_LOADED);

    let view = PageView {
        listing: Some(listing),
        ..PageView::default()
    };

    Ok(Html(views::render(&view)?))
}
