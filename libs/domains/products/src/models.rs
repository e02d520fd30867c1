use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum::{Display, EnumString};
use validator::{Validate, ValidationError};

use crate::error::{ProductError, ProductResult};

/// Highest seller rating accepted on insert or update
pub const MAX_SELLER_RATING: f64 = 10.0;

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

// NaN compares false against any bound, so it must be rejected explicitly.
fn validate_seller_rating(rating: f64) -> Result<(), ValidationError> {
    if rating.is_finite() && rating <= MAX_SELLER_RATING {
        Ok(())
    } else {
        Err(invalid(
            "seller_rating",
            format!("seller_rating must be a number no greater than {MAX_SELLER_RATING}"),
        ))
    }
}

fn validate_rate(rate: f64) -> Result<(), ValidationError> {
    if rate.is_finite() {
        Ok(())
    } else {
        Err(invalid("rate", "rate must be a finite number".to_string()))
    }
}

/// A single customer review, embedded in the product document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Review {
    pub fn new(reviewer: impl Into<String>, rating: f64) -> Self {
        Self {
            reviewer: Some(reviewer.into()),
            rating: Some(rating),
        }
    }
}

/// Seller details, embedded in the product document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct Seller {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_location: Option<String>,
    #[validate(custom(function = "validate_seller_rating"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_rating: Option<f64>,
}

/// Product entity - represents a product stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    /// Reviews in the order they were supplied
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<Seller>,
    /// Defaults to the creation time; documents missing it read back as "now"
    #[serde(rename = "expiryDate", default = "DateTime::now")]
    pub expiry_date: DateTime,
}

/// DTO for creating a new product
///
/// `name` is optional here only so a payload without one can be represented
/// and rejected by validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,
    #[validate(custom(function = "validate_rate"))]
    pub rate: Option<f64>,
    pub dimension: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[validate(nested)]
    pub seller: Option<Seller>,
    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<ChronoDateTime<Utc>>,
}

impl CreateProduct {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }
}

/// Patch applied by the update operations; every `Some` field is overwritten
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_rate"))]
    pub rate: Option<f64>,
    pub dimension: Option<String>,
    pub reviews: Option<Vec<Review>>,
    #[validate(nested)]
    pub seller: Option<Seller>,
    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<ChronoDateTime<Utc>>,
}

impl UpdateProduct {
    /// Patch that only sets `rate`
    pub fn rate(rate: f64) -> Self {
        Self {
            rate: Some(rate),
            ..Default::default()
        }
    }

    /// True when the patch would not change any field
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.rate.is_none()
            && self.dimension.is_none()
            && self.reviews.is_none()
            && self.seller.is_none()
            && self.expiry_date.is_none()
    }

    /// Build the `{ "$set": { ... } }` update document
    ///
    /// An empty patch is rejected; MongoDB refuses an empty `$set`.
    pub fn to_update_document(&self) -> ProductResult<Document> {
        if self.is_empty() {
            return Err(ProductError::Validation(
                "patch must set at least one field".to_string(),
            ));
        }

        let mut set = Document::new();

        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
        }
        if let Some(rate) = self.rate {
            set.insert("rate", rate);
        }
        if let Some(dimension) = &self.dimension {
            set.insert("dimension", dimension.as_str());
        }
        if let Some(reviews) = &self.reviews {
            set.insert("reviews", bson::to_bson(reviews)?);
        }
        if let Some(seller) = &self.seller {
            set.insert("seller", bson::to_bson(seller)?);
        }
        if let Some(expiry) = self.expiry_date {
            set.insert("expiryDate", to_bson_datetime(expiry));
        }

        Ok(doc! { "$set": set })
    }
}

/// Field-equality constraints selecting products; an empty filter matches all
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub rate: Option<f64>,
    pub dimension: Option<String>,
    /// Matches products with at least one review by this reviewer
    pub reviewer: Option<String>,
    pub seller_name: Option<String>,
    pub seller_location: Option<String>,
}

impl ProductFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Build a MongoDB filter document
    pub fn to_document(&self) -> Document {
        let mut doc = doc! {};

        if let Some(name) = &self.name {
            doc.insert("name", name.as_str());
        }
        if let Some(rate) = self.rate {
            doc.insert("rate", rate);
        }
        if let Some(dimension) = &self.dimension {
            doc.insert("dimension", dimension.as_str());
        }
        if let Some(reviewer) = &self.reviewer {
            doc.insert("reviews.reviewer", reviewer.as_str());
        }
        if let Some(seller_name) = &self.seller_name {
            doc.insert("seller.seller_name", seller_name.as_str());
        }
        if let Some(seller_location) = &self.seller_location {
            doc.insert("seller.seller_location", seller_location.as_str());
        }

        doc
    }
}

/// Which version of the document find-one-and-update hands back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ReturnVersion {
    /// The document as it was before the patch
    #[default]
    Original,
    /// The document after the patch was applied
    Updated,
}

impl From<ReturnVersion> for mongodb::options::ReturnDocument {
    fn from(version: ReturnVersion) -> Self {
        match version {
            ReturnVersion::Original => mongodb::options::ReturnDocument::Before,
            ReturnVersion::Updated => mongodb::options::ReturnDocument::After,
        }
    }
}

/// Whether a filtered write touched anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Applied,
    NoMatch,
}

/// Counters reported by update operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateSummary {
    pub fn outcome(&self) -> Outcome {
        if self.matched_count == 0 {
            Outcome::NoMatch
        } else {
            Outcome::Applied
        }
    }
}

impl From<mongodb::results::UpdateResult> for UpdateSummary {
    fn from(result: mongodb::results::UpdateResult) -> Self {
        Self {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        }
    }
}

/// Counter reported by delete operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub deleted_count: u64,
}

impl DeleteSummary {
    pub fn outcome(&self) -> Outcome {
        if self.deleted_count == 0 {
            Outcome::NoMatch
        } else {
            Outcome::Applied
        }
    }
}

impl From<mongodb::results::DeleteResult> for DeleteSummary {
    fn from(result: mongodb::results::DeleteResult) -> Self {
        Self {
            deleted_count: result.deleted_count,
        }
    }
}

fn to_bson_datetime(value: ChronoDateTime<Utc>) -> DateTime {
    DateTime::from_millis(value.timestamp_millis())
}

impl Product {
    /// Create a new product from a CreateProduct DTO
    ///
    /// Validates the input, assigns a fresh ObjectId and defaults
    /// `expiry_date` to now.
    pub fn new(input: CreateProduct) -> ProductResult<Self> {
        input.validate()?;

        let name = input
            .name
            .ok_or_else(|| ProductError::Validation("name is required".to_string()))?;

        Ok(Self {
            id: ObjectId::new(),
            name,
            rate: input.rate,
            dimension: input.dimension,
            reviews: input.reviews,
            seller: input.seller,
            expiry_date: input
                .expiry_date
                .map(to_bson_datetime)
                .unwrap_or_else(DateTime::now),
        })
    }

    /// Render as relaxed extended JSON (`$oid`, ISO-8601 `$date`) for console output
    pub fn to_relaxed_json(&self) -> ProductResult<serde_json::Value> {
        Ok(bson::to_bson(self)?.into_relaxed_extjson())
    }
}
