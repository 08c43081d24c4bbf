//! Integration tests for the catalog domain
//!
//! These run the Postgres repositories against a real database started with
//! testcontainers, so the joins, cascades and foreign keys are exercised.

use domain_catalog::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

struct Repos {
    products: PgProductRepository,
    cities: PgCityRepository,
    categories: PgCategoryRepository,
}

fn repos(db: &TestDatabase) -> Repos {
    Repos {
        products: PgProductRepository::new(db.connection()),
        cities: PgCityRepository::new(db.connection()),
        categories: PgCategoryRepository::new(db.connection()),
    }
}

async fn city(repos: &Repos, name: &str) -> City {
    repos
        .cities
        .create(NewCity {
            name: name.to_string(),
            country: "Brasil".to_string(),
        })
        .await
        .unwrap()
}

async fn category(repos: &Repos, qualification: &str) -> Category {
    repos
        .categories
        .create(NewCategory {
            qualification: qualification.to_string(),
            description: "Categoria de teste".to_string(),
            image_url: "https://img.example.com/cat.jpg".to_string(),
        })
        .await
        .unwrap()
}

fn payload(builder: &TestDataBuilder, suffix: &str, city_id: i64, category_id: i64) -> NewProduct {
    NewProduct {
        name: builder.name("product", suffix),
        description: NewDescription {
            title: "Descrição".to_string(),
            text: "Texto longo".to_string(),
        },
        available: true,
        rating: builder.score(10.0, 1),
        stars: builder.score(5.0, 2),
        location: Some(NewLocation {
            address: "Rua das Flores, 10".to_string(),
        }),
        images: vec![
            NewImage {
                title: "Fachada".to_string(),
                url: "https://img.example.com/1.jpg".to_string(),
            },
            NewImage {
                title: "Quarto".to_string(),
                url: "https://img.example.com/2.jpg".to_string(),
            },
        ],
        characteristics: vec![NewCharacteristic {
            name: "Piscina".to_string(),
            icon: None,
        }],
        city_id,
        category_id,
        details: Some(NewDetails {
            house_rules: "Sem festas".to_string(),
            cancellation_policy: "Gratuito até 24h antes".to_string(),
            health_and_safety: "Detector de fumaça".to_string(),
        }),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_create_and_get_product_with_children() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let c = city(&repos, &builder.name("city", "main")).await;
    let k = category(&repos, &builder.name("category", "main")).await;

    let created = repos
        .products
        .create(payload(&builder, "main", c.id, k.id))
        .await
        .unwrap();

    assert_eq!(created.city, c);
    assert_eq!(created.category, k);
    assert_eq!(created.images.len(), 2);
    assert_eq!(created.images[0].title, "Fachada");
    assert!(created.details.is_some());

    let fetched = assert_some(
        repos.products.get_by_id(created.id).await.unwrap(),
        "created product",
    );
    assert_eq!(fetched, created);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_get_missing_product_is_none() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let builder = TestDataBuilder::from_test_name("missing");

    let result = repos.products.get_by_id(builder.missing_id()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_filters() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let builder = TestDataBuilder::from_test_name("filters");

    let rio = city(&repos, "Rio de Janeiro").await;
    let recife = city(&repos, "Recife").await;
    let hotels = category(&repos, "Hotéis").await;
    let hostels = category(&repos, "Hostels").await;

    let a = repos
        .products
        .create(payload(&builder, "a", rio.id, hotels.id))
        .await
        .unwrap();
    let b = repos
        .products
        .create(payload(&builder, "b", recife.id, hostels.id))
        .await
        .unwrap();
    let c = repos
        .products
        .create(payload(&builder, "c", rio.id, hostels.id))
        .await
        .unwrap();

    let ids = |products: Vec<Product>| products.into_iter().map(|p| p.id).collect::<Vec<_>>();

    let all = repos.products.list(ProductFilter::All).await.unwrap();
    assert_eq!(ids(all), vec![a.id, b.id, c.id]);

    let by_city = repos
        .products
        .list(ProductFilter::CityId(rio.id))
        .await
        .unwrap();
    assert_same_ids(&ids(by_city), &[a.id, c.id], "by city id");

    let by_name = repos
        .products
        .list(ProductFilter::CityName("Recife".to_string()))
        .await
        .unwrap();
    assert_same_ids(&ids(by_name), &[b.id], "by city name");

    let by_category = repos
        .products
        .list(ProductFilter::CategoryId(hostels.id))
        .await
        .unwrap();
    assert_same_ids(&ids(by_category), &[b.id, c.id], "by category id");

    let wrong_case = repos
        .products
        .list(ProductFilter::CategoryQualification("hotéis".to_string()))
        .await
        .unwrap();
    assert!(wrong_case.is_empty(), "qualification match is case-sensitive");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_replaces_children() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let builder = TestDataBuilder::from_test_name("update");

    let c = city(&repos, &builder.name("city", "u")).await;
    let k = category(&repos, &builder.name("category", "u")).await;
    let created = repos
        .products
        .create(payload(&builder, "before", c.id, k.id))
        .await
        .unwrap();

    let mut replacement = payload(&builder, "after", c.id, k.id);
    replacement.images.truncate(1);
    replacement.details = None;

    let updated = repos
        .products
        .update(created.id, replacement)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, builder.name("product", "after"));
    assert_eq!(updated.images.len(), 1);
    assert!(updated.details.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_create_with_unknown_category_is_bad_request() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let builder = TestDataBuilder::from_test_name("unknown_category");

    let c = city(&repos, &builder.name("city", "x")).await;
    let result = repos
        .products
        .create(payload(&builder, "x", c.id, builder.missing_id()))
        .await;

    assert!(
        matches!(result, Err(CatalogError::BadRequest(_))),
        "Expected BadRequest, got {:?}",
        result
    );
    assert!(repos.products.list(ProductFilter::All).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_delete_referenced_city_conflicts_until_product_is_gone() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let builder = TestDataBuilder::from_test_name("delete_city");

    let c = city(&repos, &builder.name("city", "d")).await;
    let k = category(&repos, &builder.name("category", "d")).await;
    let product = repos
        .products
        .create(payload(&builder, "d", c.id, k.id))
        .await
        .unwrap();

    let result = repos.cities.delete(c.id).await;
    assert!(matches!(result, Err(CatalogError::Conflict(_))));

    assert!(repos.products.delete(product.id).await.unwrap());
    assert!(repos.cities.delete(c.id).await.unwrap());
    assert!(!repos.cities.delete(c.id).await.unwrap());
}
