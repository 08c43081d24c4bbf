use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    IdPath, JwtAuth, JwtClaims, RequiredQuery, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestQueryResponse, BadRequestResponse,
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{
    CategoryQuery, Characteristic, CityNameQuery, Description, Details, Image, Location,
    NewCharacteristic, NewDescription, NewDetails, NewImage, NewLocation, NewProduct, Product,
};
use crate::repository::{CategoryRepository, CityRepository, ProductRepository};
use crate::service::ProductService;

pub const TAG: &str = "produtos";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_product,
        create_product,
        update_product,
        delete_product,
        list_by_city_id,
        list_by_city_name,
        list_by_category_id,
        list_by_category_qualification,
    ),
    components(
        schemas(
            Product, Description, Details, Location, Image, Characteristic,
            NewProduct, NewDescription, NewDetails, NewLocation, NewImage, NewCharacteristic
        ),
        responses(
            NotFoundResponse,
            BadRequestIdResponse,
            BadRequestQueryResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Travel products"))
)]
pub struct ProductsApiDoc;

type SharedService<P, C, K> = Arc<ProductService<P, C, K>>;

/// Product routes. Reads are public, writes need a bearer token.
pub fn router<P, C, K>(service: ProductService<P, C, K>, auth: JwtAuth) -> Router
where
    P: ProductRepository + 'static,
    C: CityRepository + 'static,
    K: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    let protected = Router::new()
        .route("/", post(create_product))
        .route("/{id}", put(update_product).delete(delete_product))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
        .route("/por_cidade/{id}", get(list_by_city_id))
        .route("/cidade", get(list_by_city_name))
        .route("/por_categoria/{id}", get(list_by_category_id))
        .route("/categoria", get(list_by_category_qualification))
        .merge(protected)
        .with_state(shared_service)
}

/// List every product
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P, C, K>(
    State(service): State<SharedService<P, C, K>>,
) -> CatalogResult<Json<Vec<Product>>>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    Ok(Json(service.get_all().await?))
}

/// Fetch one product with its city, category and children
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P, C, K>(
    State(service): State<SharedService<P, C, K>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Product>>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    Ok(Json(service.get_by_id(id).await?))
}

/// Create a product in an existing city and category
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = NewProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P, C, K>(
    State(service): State<SharedService<P, C, K>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<NewProduct>,
) -> CatalogResult<impl IntoResponse>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    let product = service.add(input).await?;

    tracing::info!(
        target: "audit",
        action = "product.create",
        user = %claims.sub,
        product_id = product.id,
        city_id = product.city.id,
        category_id = product.category.id,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product, children included
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "Product id")),
    request_body = NewProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product replaced", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P, C, K>(
    State(service): State<SharedService<P, C, K>>,
    Extension(claims): Extension<JwtClaims>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<NewProduct>,
) -> CatalogResult<Json<Product>>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    let product = service.update(id, input).await?;

    tracing::info!(
        target: "audit",
        action = "product.update",
        user = %claims.sub,
        product_id = id,
        "Product replaced"
    );

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P, C, K>(
    State(service): State<SharedService<P, C, K>>,
    Extension(claims): Extension<JwtClaims>,
    IdPath(id): IdPath,
) -> CatalogResult<StatusCode>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    service.delete(id).await?;

    tracing::info!(
        target: "audit",
        action = "product.delete",
        user = %claims.sub,
        product_id = id,
        "Product deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Products located in the city with this id
#[utoipa::path(
    get,
    path = "/por_cidade/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "City id")),
    responses(
        (status = 200, description = "Products in the city, possibly empty", body = Vec<Product>),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_city_id<P, C, K>(
    State(service): State<SharedService<P, C, K>>,
    IdPath(city_id): IdPath,
) -> CatalogResult<Json<Vec<Product>>>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    Ok(Json(service.get_all_products_by_city_id(city_id).await?))
}

/// Products located in a city with exactly this name
#[utoipa::path(
    get,
    path = "/cidade",
    tag = TAG,
    params(CityNameQuery),
    responses(
        (status = 200, description = "Products in the city, possibly empty", body = Vec<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_city_name<P, C, K>(
    State(service): State<SharedService<P, C, K>>,
    RequiredQuery(query): RequiredQuery<CityNameQuery>,
) -> CatalogResult<Json<Vec<Product>>>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    Ok(Json(
        service
            .get_all_products_by_city_name(&query.city_name)
            .await?,
    ))
}

/// Products in the category with this id
#[utoipa::path(
    get,
    path = "/por_categoria/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Products in the category, possibly empty", body = Vec<Product>),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_category_id<P, C, K>(
    State(service): State<SharedService<P, C, K>>,
    IdPath(category_id): IdPath,
) -> CatalogResult<Json<Vec<Product>>>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    Ok(Json(
        service.get_all_products_by_category_id(category_id).await?,
    ))
}

/// Products whose category qualification matches exactly
#[utoipa::path(
    get,
    path = "/categoria",
    tag = TAG,
    params(CategoryQuery),
    responses(
        (status = 200, description = "Products in the category, possibly empty", body = Vec<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_category_qualification<P, C, K>(
    State(service): State<SharedService<P, C, K>>,
    RequiredQuery(query): RequiredQuery<CategoryQuery>,
) -> CatalogResult<Json<Vec<Product>>>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    Ok(Json(
        service
            .get_all_products_by_category_qualification(&query.qualification)
            .await?,
    ))
}
