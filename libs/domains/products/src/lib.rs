//! Products Domain
//!
//! Create, find, update and delete operations on a single `products` collection
//! in MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Input validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs, filters, summaries
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::mongodb::{connect, MongoConfig};
//! use domain_products::{MongoProductRepository, ProductFilter, ProductService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = connect(&MongoConfig::new("mongodb://localhost:27017/shoppingcart")).await?;
//!
//! let repository = MongoProductRepository::from_connection(&connection);
//! let service = ProductService::new(repository);
//!
//! let keyboards = service.find_products(ProductFilter::by_name("Keyboard")).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use models::{
    CreateProduct, DeleteSummary, Outcome, Product, ProductFilter, Review, ReturnVersion, Seller,
    UpdateProduct, UpdateSummary, MAX_SELLER_RATING,
};
pub use self::mongodb::{MongoProductRepository, PRODUCTS_COLLECTION};
#[cfg(any(test, feature = "mock"))]
pub use repository::MockProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
