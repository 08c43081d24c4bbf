use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, Characteristic, City, Description, Details, Image, Location, NewCategory, NewCity,
    NewProduct, Product, ProductFilter,
};

/// Persistence for cities
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityRepository: Send + Sync {
    async fn list(&self) -> CatalogResult<Vec<City>>;

    async fn get_by_id(&self, id: i64) -> CatalogResult<Option<City>>;

    async fn create(&self, input: NewCity) -> CatalogResult<City>;

    /// Replace a city, `None` when it does not exist
    async fn update(&self, id: i64, input: NewCity) -> CatalogResult<Option<City>>;

    /// `Ok(false)` when the city does not exist, `Conflict` while products
    /// still reference it
    async fn delete(&self, id: i64) -> CatalogResult<bool>;
}

/// Persistence for categories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> CatalogResult<Vec<Category>>;

    async fn get_by_id(&self, id: i64) -> CatalogResult<Option<Category>>;

    async fn create(&self, input: NewCategory) -> CatalogResult<Category>;

    async fn update(&self, id: i64, input: NewCategory) -> CatalogResult<Option<Category>>;

    async fn delete(&self, id: i64) -> CatalogResult<bool>;
}

/// Persistence for products and their owned children.
///
/// Implementations store the product and every child atomically and return
/// the product with city and category resolved.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products matching `filter`, ordered by id
    async fn list(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>>;

    async fn get_by_id(&self, id: i64) -> CatalogResult<Option<Product>>;

    async fn create(&self, input: NewProduct) -> CatalogResult<Product>;

    /// Replace the product and all of its children, `None` when absent
    async fn update(&self, id: i64, input: NewProduct) -> CatalogResult<Option<Product>>;

    async fn delete(&self, id: i64) -> CatalogResult<bool>;
}

/// Product as stored: references by id, children inline.
#[derive(Debug, Clone)]
struct ProductRecord {
    id: i64,
    name: String,
    description: Description,
    available: bool,
    rating: f32,
    stars: f32,
    location: Option<Location>,
    images: Vec<Image>,
    characteristics: Vec<Characteristic>,
    city_id: i64,
    category_id: i64,
    details: Option<Details>,
}

#[derive(Debug, Default)]
struct Store {
    cities: BTreeMap<i64, City>,
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, ProductRecord>,
    /// One id sequence per table, like BIGSERIAL
    sequences: BTreeMap<&'static str, i64>,
}

impl Store {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let last = self.sequences.entry(table).or_insert(0);
        *last += 1;
        *last
    }

    fn record(&mut self, id: i64, input: NewProduct) -> ProductRecord {
        let description = Description {
            id: self.next_id("descricoes"),
            title: input.description.title,
            text: input.description.text,
        };
        let location = input.location.map(|l| Location {
            id: self.next_id("localizacoes"),
            address: l.address,
        });
        let details = input.details.map(|d| Details {
            id: self.next_id("detalhes"),
            house_rules: d.house_rules,
            cancellation_policy: d.cancellation_policy,
            health_and_safety: d.health_and_safety,
        });
        let images = input
            .images
            .into_iter()
            .map(|i| Image {
                id: self.next_id("imagens"),
                title: i.title,
                url: i.url,
            })
            .collect();
        let characteristics = input
            .characteristics
            .into_iter()
            .map(|c| Characteristic {
                id: self.next_id("caracteristicas"),
                name: c.name,
                icon: c.icon,
            })
            .collect();

        ProductRecord {
            id,
            name: input.name,
            description,
            available: input.available,
            rating: input.rating,
            stars: input.stars,
            location,
            images,
            characteristics,
            city_id: input.city_id,
            category_id: input.category_id,
            details,
        }
    }

    /// Mirrors the foreign keys on `produtos`.
    fn check_references(&self, input: &NewProduct) -> CatalogResult<()> {
        if !self.cities.contains_key(&input.city_id) {
            return Err(CatalogError::BadRequest(format!(
                "City with id {} does not exist",
                input.city_id
            )));
        }
        if !self.categories.contains_key(&input.category_id) {
            return Err(CatalogError::BadRequest(format!(
                "Category with id {} does not exist",
                input.category_id
            )));
        }
        Ok(())
    }

    fn resolve(&self, record: &ProductRecord) -> CatalogResult<Product> {
        let city = self.cities.get(&record.city_id).cloned().ok_or_else(|| {
            CatalogError::Internal(format!("Product {} has a dangling city", record.id))
        })?;
        let category = self
            .categories
            .get(&record.category_id)
            .cloned()
            .ok_or_else(|| {
                CatalogError::Internal(format!("Product {} has a dangling category", record.id))
            })?;

        Ok(Product {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            available: record.available,
            rating: record.rating,
            stars: record.stars,
            location: record.location.clone(),
            images: record.images.clone(),
            characteristics: record.characteristics.clone(),
            city,
            category,
            details: record.details.clone(),
        })
    }
}

/// In-memory catalog shared by all three repository traits (for development
/// and testing). Clones share the same store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    store: Arc<RwLock<Store>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CityRepository for InMemoryCatalog {
    async fn list(&self) -> CatalogResult<Vec<City>> {
        let store = self.store.read().await;
        Ok(store.cities.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> CatalogResult<Option<City>> {
        let store = self.store.read().await;
        Ok(store.cities.get(&id).cloned())
    }

    async fn create(&self, input: NewCity) -> CatalogResult<City> {
        let mut store = self.store.write().await;
        let city = City {
            id: store.next_id("cidades"),
            name: input.name,
            country: input.country,
        };
        store.cities.insert(city.id, city.clone());

        tracing::info!(city_id = city.id, "Created city");
        Ok(city)
    }

    async fn update(&self, id: i64, input: NewCity) -> CatalogResult<Option<City>> {
        let mut store = self.store.write().await;
        let Some(city) = store.cities.get_mut(&id) else {
            return Ok(None);
        };

        city.name = input.name;
        city.country = input.country;
        Ok(Some(city.clone()))
    }

    async fn delete(&self, id: i64) -> CatalogResult<bool> {
        let mut store = self.store.write().await;
        if store.products.values().any(|p| p.city_id == id) {
            return Err(CatalogError::Conflict(format!(
                "City with id {id} is still referenced by products"
            )));
        }

        Ok(store.cities.remove(&id).is_some())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn list(&self) -> CatalogResult<Vec<Category>> {
        let store = self.store.read().await;
        Ok(store.categories.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> CatalogResult<Option<Category>> {
        let store = self.store.read().await;
        Ok(store.categories.get(&id).cloned())
    }

    async fn create(&self, input: NewCategory) -> CatalogResult<Category> {
        let mut store = self.store.write().await;
        let category = Category {
            id: store.next_id("categorias"),
            qualification: input.qualification,
            description: input.description,
            image_url: input.image_url,
        };
        store.categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn update(&self, id: i64, input: NewCategory) -> CatalogResult<Option<Category>> {
        let mut store = self.store.write().await;
        let Some(category) = store.categories.get_mut(&id) else {
            return Ok(None);
        };

        category.qualification = input.qualification;
        category.description = input.description;
        category.image_url = input.image_url;
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: i64) -> CatalogResult<bool> {
        let mut store = self.store.write().await;
        if store.products.values().any(|p| p.category_id == id) {
            return Err(CatalogError::Conflict(format!(
                "Category with id {id} is still referenced by products"
            )));
        }

        Ok(store.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn list(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        let store = self.store.read().await;

        let mut products = Vec::new();
        for record in store.products.values() {
            let product = store.resolve(record)?;
            if filter.matches(&product) {
                products.push(product);
            }
        }

        Ok(products)
    }

    async fn get_by_id(&self, id: i64) -> CatalogResult<Option<Product>> {
        let store = self.store.read().await;
        store
            .products
            .get(&id)
            .map(|record| store.resolve(record))
            .transpose()
    }

    async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let mut store = self.store.write().await;
        store.check_references(&input)?;

        let id = store.next_id("produtos");
        let record = store.record(id, input);
        let product = store.resolve(&record)?;
        store.products.insert(id, record);

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: i64, input: NewProduct) -> CatalogResult<Option<Product>> {
        let mut store = self.store.write().await;
        if !store.products.contains_key(&id) {
            return Ok(None);
        }
        store.check_references(&input)?;

        let record = store.record(id, input);
        let product = store.resolve(&record)?;
        store.products.insert(id, record);

        tracing::info!(product_id = id, "Replaced product");
        Ok(Some(product))
    }

    async fn delete(&self, id: i64) -> CatalogResult<bool> {
        let mut store = self.store.write().await;
        Ok(store.products.remove(&id).is_some())
    }
}
