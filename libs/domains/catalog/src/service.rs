use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, City, NewCategory, NewCity, NewProduct, Product, ProductFilter};
use crate::repository::{CategoryRepository, CityRepository, ProductRepository};

/// Product use cases.
///
/// Holds the city and category repositories as well so a product is only
/// written once both of its references are known to exist.
pub struct ProductService<P, C, K>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    products: Arc<P>,
    cities: Arc<C>,
    categories: Arc<K>,
}

impl<P, C, K> Clone for ProductService<P, C, K>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            cities: Arc::clone(&self.cities),
            categories: Arc::clone(&self.categories),
        }
    }
}

impl<P, C, K> ProductService<P, C, K>
where
    P: ProductRepository,
    C: CityRepository,
    K: CategoryRepository,
{
    pub fn new(products: P, cities: C, categories: K) -> Self {
        Self {
            products: Arc::new(products),
            cities: Arc::new(cities),
            categories: Arc::new(categories),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> CatalogResult<Vec<Product>> {
        self.products.list(ProductFilter::All).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> CatalogResult<Product> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::not_found("Product", id))
    }

    /// Validate and store a new product
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add(&self, input: NewProduct) -> CatalogResult<Product> {
        input.validate()?;
        self.ensure_references(&input).await?;
        self.products.create(input).await
    }

    /// Replace a product and all of its owned children.
    ///
    /// A missing product wins over bad references: 404 before 400.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: NewProduct) -> CatalogResult<Product> {
        input.validate()?;
        if self.products.get_by_id(id).await?.is_none() {
            return Err(CatalogError::not_found("Product", id));
        }
        self.ensure_references(&input).await?;
        self.products
            .update(id, input)
            .await?
            .ok_or(CatalogError::not_found("Product", id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        if !self.products.delete(id).await? {
            return Err(CatalogError::not_found("Product", id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_all_products_by_city_id(&self, city_id: i64) -> CatalogResult<Vec<Product>> {
        self.products.list(ProductFilter::CityId(city_id)).await
    }

    #[instrument(skip(self))]
    pub async fn get_all_products_by_city_name(&self, name: &str) -> CatalogResult<Vec<Product>> {
        self.products
            .list(ProductFilter::CityName(name.to_string()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_all_products_by_category_id(
        &self,
        category_id: i64,
    ) -> CatalogResult<Vec<Product>> {
        self.products
            .list(ProductFilter::CategoryId(category_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_all_products_by_category_qualification(
        &self,
        qualification: &str,
    ) -> CatalogResult<Vec<Product>> {
        self.products
            .list(ProductFilter::CategoryQualification(
                qualification.to_string(),
            ))
            .await
    }

    async fn ensure_references(&self, input: &NewProduct) -> CatalogResult<()> {
        if self.cities.get_by_id(input.city_id).await?.is_none() {
            return Err(CatalogError::BadRequest(format!(
                "City with id {} does not exist",
                input.city_id
            )));
        }
        if self.categories.get_by_id(input.category_id).await?.is_none() {
            return Err(CatalogError::BadRequest(format!(
                "Category with id {} does not exist",
                input.category_id
            )));
        }
        Ok(())
    }
}

/// City use cases
#[derive(Clone)]
pub struct CityService<R: CityRepository> {
    repository: Arc<R>,
}

impl<R: CityRepository> CityService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> CatalogResult<Vec<City>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> CatalogResult<City> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::not_found("City", id))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewCity) -> CatalogResult<City> {
        input.validate()?;
        self.repository.create(input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: NewCity) -> CatalogResult<City> {
        input.validate()?;
        self.repository
            .update(id, input)
            .await?
            .ok_or(CatalogError::not_found("City", id))
    }

    /// Fails with `Conflict` while any product is located in the city
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::not_found("City", id));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> CatalogResult<Vec<Category>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> CatalogResult<Category> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::not_found("Category", id))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewCategory) -> CatalogResult<Category> {
        input.validate()?;
        self.repository.create(input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: NewCategory) -> CatalogResult<Category> {
        input.validate()?;
        self.repository
            .update(id, input)
            .await?
            .ok_or(CatalogError::not_found("Category", id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::not_found("Category", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Description, NewDescription};
    use crate::repository::{MockCategoryRepository, MockCityRepository, MockProductRepository};
    use mockall::predicate::eq;

    fn city(id: i64) -> City {
        City {
            id,
            name: "Salvador".into(),
            country: "Brasil".into(),
        }
    }

    fn category(id: i64) -> Category {
        Category {
            id,
            qualification: "Pousadas".into(),
            description: String::new(),
            image_url: String::new(),
        }
    }

    fn product(id: i64) -> Product {
        Product {
            id,
            name: "Pousada do Pelourinho".into(),
            description: Description {
                id: 1,
                title: "Centro histórico".into(),
                text: String::new(),
            },
            available: true,
            rating: 9.1,
            stars: 3.0,
            location: None,
            images: vec![],
            characteristics: vec![],
            city: city(1),
            category: category(2),
            details: None,
        }
    }

    fn new_product() -> NewProduct {
        NewProduct {
            name: "Pousada do Pelourinho".into(),
            description: NewDescription {
                title: "Centro histórico".into(),
                text: String::new(),
            },
            available: true,
            rating: 9.1,
            stars: 3.0,
            location: None,
            images: vec![],
            characteristics: vec![],
            city_id: 1,
            category_id: 2,
            details: None,
        }
    }

    #[tokio::test]
    async fn test_get_all_returns_every_stored_product() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .with(eq(ProductFilter::All))
            .times(1)
            .returning(|_| Ok(vec![product(1), product(2)]));

        let service = ProductService::new(
            products,
            MockCityRepository::new(),
            MockCategoryRepository::new(),
        );

        let all = service.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let mut products = MockProductRepository::new();
        products
            .expect_get_by_id()
            .with(eq(7))
            .returning(|_| Ok(None));

        let service = ProductService::new(
            products,
            MockCityRepository::new(),
            MockCategoryRepository::new(),
        );

        let err = service.get_by_id(7).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound {
                entity: "Product",
                id: 7
            }
        ));
    }

    #[tokio::test]
    async fn test_add_checks_references_then_creates() {
        let mut cities = MockCityRepository::new();
        cities
            .expect_get_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(city(id))));
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_get_by_id()
            .with(eq(2))
            .returning(|id| Ok(Some(category(id))));
        let mut products = MockProductRepository::new();
        products
            .expect_create()
            .times(1)
            .returning(|_| Ok(product(10)));

        let service = ProductService::new(products, cities, categories);

        let created = service.add(new_product()).await.unwrap();
        assert_eq!(created.id, 10);
    }

    #[tokio::test]
    async fn test_add_with_unknown_city_never_writes() {
        let mut cities = MockCityRepository::new();
        cities.expect_get_by_id().returning(|_| Ok(None));
        let mut products = MockProductRepository::new();
        products.expect_create().never();

        let service = ProductService::new(products, cities, MockCategoryRepository::new());

        let err = service.add(new_product()).await.unwrap_err();
        assert!(matches!(err, CatalogError::BadRequest(msg) if msg.contains("City with id 1")));
    }

    #[tokio::test]
    async fn test_update_with_unknown_city_never_writes() {
        let mut products = MockProductRepository::new();
        products
            .expect_get_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(product(id))));
        products.expect_update().never();
        let mut cities = MockCityRepository::new();
        cities
            .expect_get_by_id()
            .with(eq(1))
            .returning(|_| Ok(None));

        let service = ProductService::new(products, cities, MockCategoryRepository::new());

        let err = service.update(5, new_product()).await.unwrap_err();
        assert!(matches!(err, CatalogError::BadRequest(msg) if msg.contains("City with id 1")));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found_before_reference_checks() {
        let mut products = MockProductRepository::new();
        products.expect_get_by_id().returning(|_| Ok(None));
        products.expect_update().never();
        let mut cities = MockCityRepository::new();
        cities.expect_get_by_id().never();

        let service = ProductService::new(products, cities, MockCategoryRepository::new());

        let mut input = new_product();
        input.city_id = 404;
        let err = service.update(9, input).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound {
                entity: "Product",
                id: 9
            }
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_existing_product() {
        let mut products = MockProductRepository::new();
        products
            .expect_get_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(product(id))));
        products
            .expect_update()
            .withf(|id, input| *id == 1 && input.name == "Pousada do Pelourinho")
            .times(1)
            .returning(|id, _| Ok(Some(product(id))));
        let mut cities = MockCityRepository::new();
        cities.expect_get_by_id().returning(|id| Ok(Some(city(id))));
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_get_by_id()
            .returning(|id| Ok(Some(category(id))));

        let service = ProductService::new(products, cities, categories);

        let updated = service.update(1, new_product()).await.unwrap();
        assert_eq!(updated.id, 1);
    }

    #[tokio::test]
    async fn test_add_with_unknown_category_is_bad_request() {
        let mut cities = MockCityRepository::new();
        cities.expect_get_by_id().returning(|id| Ok(Some(city(id))));
        let mut categories = MockCategoryRepository::new();
        categories.expect_get_by_id().returning(|_| Ok(None));

        let service = ProductService::new(MockProductRepository::new(), cities, categories);

        let err = service.add(new_product()).await.unwrap_err();
        assert!(matches!(err, CatalogError::BadRequest(msg) if msg.contains("Category")));
    }

    #[tokio::test]
    async fn test_add_invalid_payload_is_rejected_before_lookups() {
        let mut input = new_product();
        input.stars = 6.0;

        let service = ProductService::new(
            MockProductRepository::new(),
            MockCityRepository::new(),
            MockCategoryRepository::new(),
        );

        let err = service.add(input).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_filters_map_to_repository_filters() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .with(eq(ProductFilter::CityName("Salvador".into())))
            .times(1)
            .returning(|_| Ok(vec![product(1)]));
        products
            .expect_list()
            .with(eq(ProductFilter::CategoryId(2)))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(
            products,
            MockCityRepository::new(),
            MockCategoryRepository::new(),
        );

        let by_name = service
            .get_all_products_by_city_name("Salvador")
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);

        let by_category = service.get_all_products_by_category_id(2).await.unwrap();
        assert!(by_category.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_city_is_not_found() {
        let mut repo = MockCityRepository::new();
        repo.expect_delete().with(eq(3)).returning(|_| Ok(false));

        let service = CityService::new(repo);
        assert!(matches!(
            service.delete(3).await,
            Err(CatalogError::NotFound { entity: "City", .. })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_category_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_update().returning(|_, _| Ok(None));

        let service = CategoryService::new(repo);
        let input = NewCategory {
            qualification: "Resorts".into(),
            description: String::new(),
            image_url: String::new(),
        };
        assert!(service.update(5, input).await.is_err());
    }
}
