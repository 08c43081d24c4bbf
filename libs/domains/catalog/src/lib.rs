//! Catalog Domain
//!
//! Travel products (hotels, hostels, inns) with the city they are located in,
//! the category they belong to, and the description, details, location,
//! images and characteristics they own.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /produtos, /cidades, /categorias
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, reference checks, filters
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Traits + in-memory and Postgres implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← SeaORM models over the Portuguese schema
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_catalog::{handlers, InMemoryCatalog};
//!
//! let catalog = InMemoryCatalog::new();
//! let config = JwtConfig::new("a-development-secret-of-32-chars!!").unwrap();
//! let auth = JwtAuth::new(&config);
//!
//! let router = handlers::router(catalog.clone(), catalog.clone(), catalog, auth);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use models::{
    Category, Characteristic, City, Description, Details, Image, Location, NewCategory,
    NewCharacteristic, NewCity, NewDescription, NewDetails, NewImage, NewLocation, NewProduct,
    Product, ProductFilter,
};
pub use postgres::{PgCategoryRepository, PgCityRepository, PgProductRepository};
pub use repository::{CategoryRepository, CityRepository, InMemoryCatalog, ProductRepository};
pub use service::{CategoryService, CityService, ProductService};
