use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, DeleteSummary, Product, ProductFilter, ReturnVersion, UpdateProduct,
    UpdateSummary,
};

/// Repository trait for Product persistence
///
/// Every method is a single round trip. "Nothing matched" is reported through
/// the return value (`None`, empty `Vec`, zero counts), never as an error.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product and return it as stored
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Patch the first product matching `filter`, returning the chosen version
    async fn find_one_and_update(
        &self,
        filter: ProductFilter,
        patch: UpdateProduct,
        version: ReturnVersion,
    ) -> ProductResult<Option<Product>>;

    /// All products matching `filter`, in insertion order
    async fn find_many(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;

    /// Patch the first product matching `filter`
    async fn update_one(
        &self,
        filter: ProductFilter,
        patch: UpdateProduct,
    ) -> ProductResult<UpdateSummary>;

    /// Patch every product matching `filter`
    async fn update_many(
        &self,
        filter: ProductFilter,
        patch: UpdateProduct,
    ) -> ProductResult<UpdateSummary>;

    /// Remove the first product matching `filter`
    async fn delete_one(&self, filter: ProductFilter) -> ProductResult<DeleteSummary>;

    /// Count products matching `filter`
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64>;
}
