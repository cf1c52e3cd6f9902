use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use catalog_core::AppError;
use catalog_domain::ProductId;

use crate::dto::{MessageResponse, ProductListQueryParams, ProductListResponse, ProductResponse};
use crate::error::ApiResult;
use crate::middleware::CurrentPrincipal;
use crate::state::AppState;

mod form;

use form::read_product_form;

pub async fn list_products_handler(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(params): Query<ProductListQueryParams>,
) -> ApiResult<Json<ProductListResponse>> {
    let listing = state
        .product_service
        .list_products(&principal, params.into_request()?)
        .await?;

    Ok(Json(ProductListResponse::from(listing)))
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let form = read_product_form(multipart).await?;
    let product = state
        .product_service
        .create_product(form.input, form.image)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::new(
            StatusCode::CREATED.as_u16(),
            "Product created successfully",
            &product,
        )),
    ))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<ProductResponse>> {
    let product_id = parse_product_id(product_id.as_str())?;
    let form = read_product_form(multipart).await?;
    let product = state
        .product_service
        .update_product(product_id, form.input, form.image)
        .await?;

    Ok(Json(ProductResponse::new(
        StatusCode::OK.as_u16(),
        "Product updated successfully",
        &product,
    )))
}

pub async fn update_product_status_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ProductResponse>> {
    let product_id = parse_product_id(product_id.as_str())?;
    let product = state
        .product_service
        .toggle_product_status(product_id)
        .await?;

    Ok(Json(ProductResponse::new(
        StatusCode::OK.as_u16(),
        "Product status updated successfully",
        &product,
    )))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let product_id = parse_product_id(product_id.as_str())?;
    state.product_service.delete_product(product_id).await?;

    Ok(Json(MessageResponse::ok("Product deleted successfully")))
}

fn parse_product_id(raw: &str) -> Result<ProductId, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|value| *value > 0)
        .map(ProductId::new)
        .ok_or_else(|| AppError::Validation("Product ID must be a number".to_owned()))
}
