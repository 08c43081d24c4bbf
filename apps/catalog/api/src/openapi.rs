use domain_catalog::handlers::{
    CATEGORIES_PATH, CITIES_PATH, CategoriesApiDoc, CitiesApiDoc, PRODUCTS_PATH, ProductsApiDoc,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `bearer_auth` scheme referenced by the write endpoints.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Travel catalog: products, the cities they are in and their categories"
    ),
    modifiers(&BearerAuth),
    nest(
        (path = PRODUCTS_PATH, api = ProductsApiDoc),
        (path = CITIES_PATH, api = CitiesApiDoc),
        (path = CATEGORIES_PATH, api = CategoriesApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/produtos",
            "/produtos/{id}",
            "/produtos/por_cidade/{id}",
            "/produtos/cidade",
            "/produtos/por_categoria/{id}",
            "/produtos/categoria",
            "/cidades",
            "/categorias/{id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }
    }

    #[test]
    fn test_document_declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
