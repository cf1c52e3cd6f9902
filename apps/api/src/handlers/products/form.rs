use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use catalog_application::AssetUpload;
use catalog_core::{AppError, AppResult};
use catalog_domain::ProductInput;

/// Product form fields and optional image read from a multipart body.
#[derive(Debug, Default)]
pub(super) struct ProductForm {
    pub(super) input: ProductInput,
    pub(super) image: Option<AssetUpload>,
}

pub(super) async fn read_product_form(mut multipart: Multipart) -> AppResult<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let original_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty part when no file is picked.
                if original_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                form.image = Some(AssetUpload {
                    original_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "name" => form.input.name = Some(field.text().await.map_err(multipart_error)?),
            "description" => {
                form.input.description = Some(field.text().await.map_err(multipart_error)?);
            }
            "price" => form.input.price = Some(field.text().await.map_err(multipart_error)?),
            "quantity" => {
                form.input.quantity = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(error: MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart body: {}", error.body_text()))
}
