use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A city products can be located in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub country: String,
}

/// Grouping for products, e.g. "Hotéis" or "Hostels"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    /// Display label, also used for filtering by name
    pub qualification: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Image {
    pub id: i64,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Description {
    pub id: i64,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Details {
    pub id: i64,
    pub house_rules: String,
    pub cancellation_policy: String,
    pub health_and_safety: String,
}

/// An amenity such as "Wi-fi"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Characteristic {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: i64,
    pub address: String,
}

/// A bookable catalog item.
///
/// Description, details, location, images and characteristics belong to the
/// product and are removed with it. City and category are shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Description,
    pub available: bool,
    /// Guest rating, 0 to 10
    pub rating: f32,
    /// Star classification, 0 to 5
    pub stars: f32,
    pub location: Option<Location>,
    pub images: Vec<Image>,
    pub characteristics: Vec<Characteristic>,
    pub city: City,
    pub category: Category,
    pub details: Option<Details>,
}

// ---------------------------------------------------------------------------
// Write payloads. PUT replaces the whole resource, so create and update share
// one payload type per resource.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewCity {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100))]
    pub qualification: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewImage {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewDescription {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewDetails {
    #[validate(length(max = 5000))]
    pub house_rules: String,
    #[validate(length(max = 5000))]
    pub cancellation_policy: String,
    #[validate(length(max = 5000))]
    pub health_and_safety: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewCharacteristic {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewLocation {
    #[validate(length(min = 1, max = 300))]
    pub address: String,
}

/// Payload for creating or replacing a product.
///
/// City and category are referenced by id and must already exist.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(nested)]
    pub description: NewDescription,
    #[serde(default = "default_available")]
    pub available: bool,
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: f32,
    #[validate(range(min = 0.0, max = 5.0))]
    pub stars: f32,
    #[validate(nested)]
    pub location: Option<NewLocation>,
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<NewImage>,
    #[serde(default)]
    #[validate(nested)]
    pub characteristics: Vec<NewCharacteristic>,
    pub city_id: i64,
    pub category_id: i64,
    #[validate(nested)]
    pub details: Option<NewDetails>,
}

fn default_available() -> bool {
    true
}

/// Which products a listing returns.
///
/// Name matches are exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    All,
    CityId(i64),
    CityName(String),
    CategoryId(i64),
    CategoryQualification(String),
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::All => true,
            ProductFilter::CityId(id) => product.city.id == *id,
            ProductFilter::CityName(name) => product.city.name == *name,
            ProductFilter::CategoryId(id) => product.category.id == *id,
            ProductFilter::CategoryQualification(q) => product.category.qualification == *q,
        }
    }
}

/// `GET /produtos/cidade?nomeCidade=...`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityNameQuery {
    /// Exact city name
    #[serde(rename = "nomeCidade")]
    pub city_name: String,
}

/// `GET /produtos/categoria?categoria=...`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// Exact category qualification
    #[serde(rename = "categoria")]
    pub qualification: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(city: (i64, &str), category: (i64, &str)) -> Product {
        Product {
            id: 1,
            name: "Hotel Copacabana".into(),
            description: Description {
                id: 1,
                title: "Beira-mar".into(),
                text: String::new(),
            },
            available: true,
            rating: 8.5,
            stars: 4.0,
            location: None,
            images: vec![],
            characteristics: vec![],
            city: City {
                id: city.0,
                name: city.1.into(),
                country: "Brasil".into(),
            },
            category: Category {
                id: category.0,
                qualification: category.1.into(),
                description: String::new(),
                image_url: String::new(),
            },
            details: None,
        }
    }

    fn valid_payload() -> NewProduct {
        NewProduct {
            name: "Hotel".into(),
            description: NewDescription {
                title: "Descrição".into(),
                text: "Texto".into(),
            },
            available: true,
            rating: 9.0,
            stars: 5.0,
            location: Some(NewLocation {
                address: "Rua teste, 123".into(),
            }),
            images: vec![NewImage {
                title: "Fachada".into(),
                url: "https://img.example.com/1.jpg".into(),
            }],
            characteristics: vec![NewCharacteristic {
                name: "Wi-fi".into(),
                icon: None,
            }],
            city_id: 1,
            category_id: 1,
            details: None,
        }
    }

    #[test]
    fn test_filter_by_city() {
        let p = product((1, "Rio de Janeiro"), (1, "Hotéis"));
        assert!(ProductFilter::CityId(1).matches(&p));
        assert!(!ProductFilter::CityId(2).matches(&p));
        assert!(ProductFilter::CityName("Rio de Janeiro".into()).matches(&p));
        assert!(!ProductFilter::CityName("rio de janeiro".into()).matches(&p));
    }

    #[test]
    fn test_filter_by_category_is_case_sensitive() {
        let p = product((1, "Rio de Janeiro"), (3, "Hotéis"));
        assert!(ProductFilter::CategoryId(3).matches(&p));
        assert!(ProductFilter::CategoryQualification("Hotéis".into()).matches(&p));
        assert!(!ProductFilter::CategoryQualification("hotéis".into()).matches(&p));
        assert!(ProductFilter::All.matches(&p));
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(valid_payload().validate().is_ok());
    }

    #[test]
    fn test_rating_out_of_range_fails() {
        let mut payload = valid_payload();
        payload.rating = 11.0;
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("rating"));
    }

    #[test]
    fn test_nested_image_url_is_validated() {
        let mut payload = valid_payload();
        payload.images[0].url = "not a url".into();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_empty_description_title_fails() {
        let mut payload = valid_payload();
        payload.description.title.clear();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_available_defaults_to_true() {
        let json = serde_json::json!({
            "name": "Pousada",
            "description": {"title": "t", "text": ""},
            "rating": 7.0,
            "stars": 3.0,
            "city_id": 1,
            "category_id": 2
        });
        let payload: NewProduct = serde_json::from_value(json).unwrap();
        assert!(payload.available);
        assert!(payload.images.is_empty());
        assert!(payload.location.is_none());
    }
}
