//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use database::mongodb::MongoConnection;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions, Collection, Database};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, DeleteSummary, Product, ProductFilter, ReturnVersion, UpdateProduct,
    UpdateSummary,
};
use crate::repository::ProductRepository;

/// Collection holding product documents
pub const PRODUCTS_COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Create a new MongoProductRepository
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    /// Create a repository on the database held by an open connection
    pub fn from_connection(connection: &MongoConnection) -> Self {
        Self::new(connection.database())
    }

    /// Create a new MongoProductRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = ?input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input)?;

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, patch))]
    async fn find_one_and_update(
        &self,
        filter: ProductFilter,
        patch: UpdateProduct,
        version: ReturnVersion,
    ) -> ProductResult<Option<Product>> {
        let update = patch.to_update_document()?;

        let product = self
            .collection
            .find_one_and_update(filter.to_document(), update)
            .return_document(version.into())
            .await?;

        match &product {
            Some(product) => tracing::info!(product_id = %product.id, "Product updated"),
            None => tracing::debug!("No product matched"),
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_many(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();

        let cursor = self
            .collection
            .find(filter.to_document())
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        tracing::debug!(count = products.len(), "Products found");
        Ok(products)
    }

    #[instrument(skip(self, patch))]
    async fn update_one(
        &self,
        filter: ProductFilter,
        patch: UpdateProduct,
    ) -> ProductResult<UpdateSummary> {
        let update = patch.to_update_document()?;
        let result = self
            .collection
            .update_one(filter.to_document(), update)
            .await?;

        let summary = UpdateSummary::from(result);
        tracing::info!(
            matched = summary.matched_count,
            modified = summary.modified_count,
            "update_one finished"
        );
        Ok(summary)
    }

    #[instrument(skip(self, patch))]
    async fn update_many(
        &self,
        filter: ProductFilter,
        patch: UpdateProduct,
    ) -> ProductResult<UpdateSummary> {
        let update = patch.to_update_document()?;
        let result = self
            .collection
            .update_many(filter.to_document(), update)
            .await?;

        let summary = UpdateSummary::from(result);
        tracing::info!(
            matched = summary.matched_count,
            modified = summary.modified_count,
            "update_many finished"
        );
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, filter: ProductFilter) -> ProductResult<DeleteSummary> {
        let result = self.collection.delete_one(filter.to_document()).await?;

        let summary = DeleteSummary::from(result);
        tracing::info!(deleted = summary.deleted_count, "delete_one finished");
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ProductFilter) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(filter.to_document())
            .await?;
        Ok(count)
    }
}
