//! HTTP layer. Each resource gets its own router, mounted by [`router`]
//! under its Portuguese collection name.

pub mod categories;
pub mod cities;
pub mod products;

use axum::Router;
use axum_helpers::JwtAuth;

use crate::repository::{CategoryRepository, CityRepository, ProductRepository};
use crate::service::{CategoryService, CityService, ProductService};

pub use categories::CategoriesApiDoc;
pub use cities::CitiesApiDoc;
pub use products::ProductsApiDoc;

pub const PRODUCTS_PATH: &str = "/produtos";
pub const CITIES_PATH: &str = "/cidades";
pub const CATEGORIES_PATH: &str = "/categorias";

/// The whole catalog API.
///
/// The city and category repositories are shared between their own services
/// and the product service, which uses them to check references.
pub fn router<P, C, K>(products: P, cities: C, categories: K, auth: JwtAuth) -> Router
where
    P: ProductRepository + 'static,
    C: CityRepository + Clone + 'static,
    K: CategoryRepository + Clone + 'static,
{
    let product_service = ProductService::new(products, cities.clone(), categories.clone());

    Router::new()
        .nest(
            PRODUCTS_PATH,
            products::router(product_service, auth.clone()),
        )
        .nest(
            CITIES_PATH,
            cities::router(CityService::new(cities), auth.clone()),
        )
        .nest(
            CATEGORIES_PATH,
            categories::router(CategoryService::new(categories), auth),
        )
}
