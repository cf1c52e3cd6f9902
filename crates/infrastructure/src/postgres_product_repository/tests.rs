use catalog_application::{NewProduct, ProductListQuery, ProductRepository, SoftDeleteOutcome};
use catalog_domain::{ProductFields, ProductId, ProductStatus};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::{PostgresProductRepository, like_pattern};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres product tests: {error}");
    }

    Some(pool)
}

fn new_product(name: &str, status: ProductStatus) -> NewProduct {
    NewProduct {
        fields: ProductFields {
            name: name.to_owned(),
            description: "Integration fixture".to_owned(),
            price: 19.999,
            quantity: 3,
        },
        status,
        image_url: None,
    }
}

#[test]
fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("oak"), "%oak%");
    assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
}

#[tokio::test]
async fn create_list_and_soft_delete_round_trip() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresProductRepository::new(pool);
    let marker = format!("fixture-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0));

    let active = repository
        .create_product(new_product(&format!("{marker} Active"), ProductStatus::Active))
        .await;
    let inactive = repository
        .create_product(new_product(&format!("{marker} Inactive"), ProductStatus::Inactive))
        .await;
    let (Ok(active), Ok(inactive)) = (active, inactive) else {
        panic!("failed to insert fixtures");
    };
    assert_eq!(active.fields().price, 20.0);
    assert_eq!(active.image_url(), None);

    let page = repository
        .list_products(ProductListQuery {
            search: Some(marker.to_uppercase()),
            status: Some(ProductStatus::Inactive),
            limit: 15,
            offset: 0,
        })
        .await;
    let Ok(page) = page else {
        panic!("failed to list products");
    };
    assert_eq!(page.total, 1);
    assert_eq!(
        page.products.first().map(|product| product.id()),
        Some(inactive.id())
    );

    let first = repository.soft_delete_product(active.id()).await;
    let second = repository.soft_delete_product(active.id()).await;
    let missing = repository.soft_delete_product(ProductId::new(i64::MAX)).await;
    assert_eq!(first.ok(), Some(SoftDeleteOutcome::Deleted));
    assert_eq!(second.ok(), Some(SoftDeleteOutcome::AlreadyDeleted));
    assert_eq!(missing.ok(), Some(SoftDeleteOutcome::NotFound));

    let hidden = repository.find_product(active.id()).await;
    assert!(matches!(hidden, Ok(None)));
    assert!(repository.save_product(&active).await.is_err());
}
