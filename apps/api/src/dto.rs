mod common;
mod products;

pub use common::{HealthDependencyStatus, HealthResponse, MessageResponse};
pub use products::{ProductListQueryParams, ProductListResponse, ProductResponse};
