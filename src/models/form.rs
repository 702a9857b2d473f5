use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{
    error::{AppError, Result},
    models::{ImageUpload, ProductDraft},
};

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub const MISSING_FIELDS_WARNING: &str = "Por favor, preencha todos os campos obrigatórios!";
pub const MISSING_IMAGE_WARNING: &str = "Por favor, selecione uma imagem para o produto!";
pub const INVALID_PRICE_WARNING: &str = "Por favor, informe um preço válido!";
pub const INVALID_IMAGE_WARNING: &str = "Por favor, envie uma imagem JPG, JPEG ou PNG!";

/// Raw values submitted by the product form.
#[derive(Debug, Default, Clone)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Presence checks run before anything touches the network.
    pub fn validate(self) -> Result<(ProductDraft, ImageUpload)> {
        let name = self.name.trim();
        let description = self.description.trim();

        if name.is_empty() || description.is_empty() {
            return Err(AppError::Validation(MISSING_FIELDS_WARNING.to_string()));
        }

        let image = self
            .image
            .filter(|image| !image.file_name.is_empty() && !image.bytes.is_empty())
            .ok_or_else(|| AppError::Validation(MISSING_IMAGE_WARNING.to_string()))?;

        let price = parse_price(&self.price)?;

        match image.extension() {
            Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => return Err(AppError::Validation(INVALID_IMAGE_WARNING.to_string())),
        }

        Ok((
            ProductDraft {
                name: name.to_string(),
                description: description.to_string(),
                price,
            },
            image,
        ))
    }
}

/// Parses a non-negative price, accepting `,` as the decimal separator and
/// rounding to cents.
pub fn parse_price(raw: &str) -> Result<Decimal> {
    let normalized = raw.trim().replace(',', ".");

    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let price = Decimal::from_str(&normalized)
        .map_err(|_| AppError::Validation(INVALID_PRICE_WARNING.to_string()))?;

    if price.is_zero() {
        return Ok(Decimal::ZERO);
    }

    if price.is_sign_negative() {
        return Err(AppError::Validation(INVALID_PRICE_WARNING.to_string()));
    }

    Ok(price.round_dp(2))
}

/// Drops any directory part a browser sent along with the file name, e.g.
/// `C:\fakepath\foto.png`.
pub fn client_file_name(raw: &str) -> &str {
    raw.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(raw)
        .trim()
}
