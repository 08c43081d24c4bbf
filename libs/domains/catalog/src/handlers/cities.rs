use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    IdPath, JwtAuth, JwtClaims, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{City, NewCity};
use crate::repository::CityRepository;
use crate::service::CityService;

pub const TAG: &str = "cidades";

#[derive(OpenApi)]
#[openapi(
    paths(list_cities, get_city, create_city, update_city, delete_city),
    components(
        schemas(City, NewCity),
        responses(
            NotFoundResponse,
            BadRequestIdResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Cities products are located in"))
)]
pub struct CitiesApiDoc;

pub fn router<R: CityRepository + 'static>(service: CityService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let protected = Router::new()
        .route("/", post(create_city))
        .route("/{id}", put(update_city).delete(delete_city))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .route("/", get(list_cities))
        .route("/{id}", get(get_city))
        .merge(protected)
        .with_state(shared_service)
}

#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All cities", body = Vec<City>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_cities<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
) -> CatalogResult<Json<Vec<City>>> {
    Ok(Json(service.list().await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "City id")),
    responses(
        (status = 200, description = "City found", body = City),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_city<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<City>> {
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = NewCity,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "City created", body = City),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_city<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<NewCity>,
) -> CatalogResult<impl IntoResponse> {
    let city = service.create(input).await?;

    tracing::info!(
        target: "audit",
        action = "city.create",
        user = %claims.sub,
        city_id = city.id,
        "City created"
    );

    Ok((StatusCode::CREATED, Json(city)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "City id")),
    request_body = NewCity,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "City replaced", body = City),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_city<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<NewCity>,
) -> CatalogResult<Json<City>> {
    Ok(Json(service.update(id, input).await?))
}

/// Delete a city no product points at
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "City id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "City deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_city<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    IdPath(id): IdPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;

    tracing::info!(
        target: "audit",
        action = "city.delete",
        user = %claims.sub,
        city_id = id,
        "City deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
