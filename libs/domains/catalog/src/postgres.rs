use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use std::collections::HashMap;

use crate::{
    entity::{category, characteristic, city, description, details, image, location, product},
    error::{CatalogError, CatalogResult},
    models::{
        Category, Characteristic, City, Description, Details, Image, Location, NewCategory, NewCity,
        NewProduct, Product, ProductFilter,
    },
    repository::{CategoryRepository, CityRepository, ProductRepository},
};

fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// Deleting a city or category that a product still points at trips the
/// RESTRICT constraint on `produtos`.
fn delete_error(entity: &str, id: i64, err: DbErr) -> CatalogError {
    if is_foreign_key_violation(&err) {
        CatalogError::Conflict(format!(
            "{entity} with id {id} is still referenced by products"
        ))
    } else {
        err.into()
    }
}

/// A product write that lost a race with a city/category delete.
fn write_error(err: DbErr) -> CatalogError {
    if is_foreign_key_violation(&err) {
        CatalogError::BadRequest("Referenced city or category does not exist".to_string())
    } else {
        err.into()
    }
}

#[derive(Clone)]
pub struct PgCityRepository {
    base: BaseRepository<city::Entity>,
}

impl PgCityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl CityRepository for PgCityRepository {
    async fn list(&self) -> CatalogResult<Vec<City>> {
        let models = city::Entity::find()
            .order_by_asc(city::Column::Id)
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i64) -> CatalogResult<Option<City>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(Into::into))
    }

    async fn create(&self, input: NewCity) -> CatalogResult<City> {
        let model = self
            .base
            .insert(city::ActiveModel {
                name: Set(input.name),
                country: Set(input.country),
                ..Default::default()
            })
            .await?;

        tracing::info!(city_id = model.id, "Created city");
        Ok(model.into())
    }

    async fn update(&self, id: i64, input: NewCity) -> CatalogResult<Option<City>> {
        if self.base.find_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let model = self
            .base
            .update(city::ActiveModel {
                id: Set(id),
                name: Set(input.name),
                country: Set(input.country),
            })
            .await?;

        Ok(Some(model.into()))
    }

    async fn delete(&self, id: i64) -> CatalogResult<bool> {
        let rows = self
            .base
            .delete_by_id(id)
            .await
            .map_err(|e| delete_error("City", id, e))?;

        Ok(rows > 0)
    }
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    base: BaseRepository<category::Entity>,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i64) -> CatalogResult<Option<Category>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(Into::into))
    }

    async fn create(&self, input: NewCategory) -> CatalogResult<Category> {
        let model = self
            .base
            .insert(category::ActiveModel {
                qualification: Set(input.qualification),
                description: Set(input.description),
                image_url: Set(input.image_url),
                ..Default::default()
            })
            .await?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn update(&self, id: i64, input: NewCategory) -> CatalogResult<Option<Category>> {
        if self.base.find_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let model = self
            .base
            .update(category::ActiveModel {
                id: Set(id),
                qualification: Set(input.qualification),
                description: Set(input.description),
                image_url: Set(input.image_url),
            })
            .await?;

        Ok(Some(model.into()))
    }

    async fn delete(&self, id: i64) -> CatalogResult<bool> {
        let rows = self
            .base
            .delete_by_id(id)
            .await
            .map_err(|e| delete_error("Category", id, e))?;

        Ok(rows > 0)
    }
}

/// Products with their children spread over six tables.
///
/// Reads load product rows first and then batch the children with one
/// `IN (...)` query per table.
#[derive(Clone)]
pub struct PgProductRepository {
    base: BaseRepository<product::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn group_by_product<M, T>(rows: Vec<M>, product_id: impl Fn(&M) -> i64) -> HashMap<i64, Vec<T>>
where
    T: From<M>,
{
    let mut grouped: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(product_id(&row)).or_default().push(row.into());
    }
    grouped
}

async fn assemble<C: ConnectionTrait>(
    db: &C,
    rows: Vec<product::Model>,
) -> CatalogResult<Vec<Product>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|p| p.id).collect();
    let city_ids: Vec<i64> = rows.iter().map(|p| p.city_id).collect();
    let category_ids: Vec<i64> = rows.iter().map(|p| p.category_id).collect();

    let cities: HashMap<i64, City> = city::Entity::find()
        .filter(city::Column::Id.is_in(city_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.into()))
        .collect();
    let categories: HashMap<i64, Category> = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.into()))
        .collect();

    let mut descriptions: HashMap<i64, Description> = description::Entity::find()
        .filter(description::Column::ProductId.is_in(ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.product_id, m.into()))
        .collect();
    let mut all_details: HashMap<i64, Details> = details::Entity::find()
        .filter(details::Column::ProductId.is_in(ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.product_id, m.into()))
        .collect();
    let mut locations: HashMap<i64, Location> = location::Entity::find()
        .filter(location::Column::ProductId.is_in(ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.product_id, m.into()))
        .collect();

    let image_rows = image::Entity::find()
        .filter(image::Column::ProductId.is_in(ids.clone()))
        .order_by_asc(image::Column::Id)
        .all(db)
        .await?;
    let mut images: HashMap<i64, Vec<Image>> = group_by_product(image_rows, |m| m.product_id);

    let characteristic_rows = characteristic::Entity::find()
        .filter(characteristic::Column::ProductId.is_in(ids))
        .order_by_asc(characteristic::Column::Id)
        .all(db)
        .await?;
    let mut characteristics: HashMap<i64, Vec<Characteristic>> =
        group_by_product(characteristic_rows, |m| m.product_id);

    let mut products = Vec::with_capacity(rows.len());
    for row in rows {
        let missing = |what: &str| {
            CatalogError::Internal(format!("Product {} is missing its {what}", row.id))
        };

        products.push(Product {
            id: row.id,
            name: row.name.clone(),
            description: descriptions
                .remove(&row.id)
                .ok_or_else(|| missing("description"))?,
            available: row.available,
            rating: row.rating,
            stars: row.stars,
            location: locations.remove(&row.id),
            images: images.remove(&row.id).unwrap_or_default(),
            characteristics: characteristics.remove(&row.id).unwrap_or_default(),
            city: cities
                .get(&row.city_id)
                .cloned()
                .ok_or_else(|| missing("city"))?,
            category: categories
                .get(&row.category_id)
                .cloned()
                .ok_or_else(|| missing("category"))?,
            details: all_details.remove(&row.id),
        });
    }

    Ok(products)
}

/// Rejects a payload whose city or category does not exist.
async fn check_references<C: ConnectionTrait>(db: &C, input: &NewProduct) -> CatalogResult<()> {
    if city::Entity::find_by_id(input.city_id).one(db).await?.is_none() {
        return Err(CatalogError::BadRequest(format!(
            "City with id {} does not exist",
            input.city_id
        )));
    }
    if category::Entity::find_by_id(input.category_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(CatalogError::BadRequest(format!(
            "Category with id {} does not exist",
            input.category_id
        )));
    }
    Ok(())
}

/// Inserts the owned rows of a product. Callers run this inside the
/// transaction that wrote the product row.
async fn insert_children<C: ConnectionTrait>(
    db: &C,
    product_id: i64,
    input: NewProduct,
) -> CatalogResult<()> {
    description::ActiveModel {
        title: Set(input.description.title),
        text: Set(input.description.text),
        product_id: Set(product_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    if let Some(d) = input.details {
        details::ActiveModel {
            house_rules: Set(d.house_rules),
            cancellation_policy: Set(d.cancellation_policy),
            health_and_safety: Set(d.health_and_safety),
            product_id: Set(product_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    if let Some(l) = input.location {
        location::ActiveModel {
            address: Set(l.address),
            product_id: Set(product_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    for i in input.images {
        image::ActiveModel {
            title: Set(i.title),
            url: Set(i.url),
            product_id: Set(product_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    for c in input.characteristics {
        characteristic::ActiveModel {
            name: Set(c.name),
            icon: Set(c.icon),
            product_id: Set(product_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

async fn delete_children<C: ConnectionTrait>(db: &C, product_id: i64) -> CatalogResult<()> {
    description::Entity::delete_many()
        .filter(description::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    details::Entity::delete_many()
        .filter(details::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    location::Entity::delete_many()
        .filter(location::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    image::Entity::delete_many()
        .filter(image::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    characteristic::Entity::delete_many()
        .filter(characteristic::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    Ok(())
}

async fn load_one<C: ConnectionTrait>(db: &C, row: product::Model) -> CatalogResult<Product> {
    let id = row.id;
    assemble(db, vec![row])
        .await?
        .pop()
        .ok_or_else(|| CatalogError::Internal(format!("Product {id} vanished while loading")))
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        let mut query = product::Entity::find();

        query = match filter {
            ProductFilter::All => query,
            ProductFilter::CityId(id) => query.filter(product::Column::CityId.eq(id)),
            ProductFilter::CategoryId(id) => query.filter(product::Column::CategoryId.eq(id)),
            ProductFilter::CityName(name) => query
                .inner_join(city::Entity)
                .filter(city::Column::Name.eq(name)),
            ProductFilter::CategoryQualification(qualification) => query
                .inner_join(category::Entity)
                .filter(category::Column::Qualification.eq(qualification)),
        };

        let rows = query
            .order_by_asc(product::Column::Id)
            .all(self.base.db())
            .await?;

        assemble(self.base.db(), rows).await
    }

    async fn get_by_id(&self, id: i64) -> CatalogResult<Option<Product>> {
        match self.base.find_by_id(id).await? {
            Some(row) => Ok(Some(load_one(self.base.db(), row).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let txn = self.base.db().begin().await?;
        check_references(&txn, &input).await?;

        let row = product::ActiveModel {
            name: Set(input.name.clone()),
            available: Set(input.available),
            rating: Set(input.rating),
            stars: Set(input.stars),
            city_id: Set(input.city_id),
            category_id: Set(input.category_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(write_error)?;

        insert_children(&txn, row.id, input).await?;
        let product = load_one(&txn, row).await?;
        txn.commit().await?;

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: i64, input: NewProduct) -> CatalogResult<Option<Product>> {
        let txn = self.base.db().begin().await?;
        if product::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(None);
        }
        check_references(&txn, &input).await?;

        let row = product::ActiveModel {
            id: Set(id),
            name: Set(input.name.clone()),
            available: Set(input.available),
            rating: Set(input.rating),
            stars: Set(input.stars),
            city_id: Set(input.city_id),
            category_id: Set(input.category_id),
        }
        .update(&txn)
        .await
        .map_err(write_error)?;

        delete_children(&txn, id).await?;
        insert_children(&txn, id, input).await?;
        let product = load_one(&txn, row).await?;
        txn.commit().await?;

        tracing::info!(product_id = id, "Replaced product");
        Ok(Some(product))
    }

    async fn delete(&self, id: i64) -> CatalogResult<bool> {
        // Children go with the row through ON DELETE CASCADE.
        let rows = self.base.delete_by_id(id).await?;
        Ok(rows > 0)
    }
}
