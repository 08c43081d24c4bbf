//! SeaORM entities for the catalog tables.
//!
//! Column names follow the database schema; field names are the domain's.

pub mod category;
pub mod characteristic;
pub mod city;
pub mod description;
pub mod details;
pub mod image;
pub mod location;
pub mod product;
