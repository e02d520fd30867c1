//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, DeleteSummary, Product, ProductFilter, ReturnVersion, UpdateProduct,
    UpdateSummary,
};
use crate::repository::ProductRepository;

/// Product service providing validated access to the repository
///
/// Inputs are validated before any repository call, so a rejected payload
/// never reaches the database.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    fn validate_patch(patch: &UpdateProduct) -> ProductResult<()> {
        if patch.is_empty() {
            return Err(ProductError::Validation(
                "patch must set at least one field".to_string(),
            ));
        }
        patch.validate()?;
        Ok(())
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = ?input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;
        self.repository.create(input).await
    }

    /// Patch the first match and return the version selected by `version`
    #[instrument(skip(self, patch))]
    pub async fn find_one_and_update(
        &self,
        filter: ProductFilter,
        patch: UpdateProduct,
        version: ReturnVersion,
    ) -> ProductResult<Option<Product>> {
        Self::validate_patch(&patch)?;
        self.repository
            .find_one_and_update(filter, patch, version)
            .await
    }

    /// List products matching a filter
    #[instrument(skip(self))]
    pub async fn find_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        self.repository.find_many(filter).await
    }

    /// Patch the first matching product
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        filter: ProductFilter,
        patch: UpdateProduct,
    ) -> ProductResult<UpdateSummary> {
        Self::validate_patch(&patch)?;
        self.repository.update_one(filter, patch).await
    }

    /// Patch every matching product
    #[instrument(skip(self, patch))]
    pub async fn update_products(
        &self,
        filter: ProductFilter,
        patch: UpdateProduct,
    ) -> ProductResult<UpdateSummary> {
        Self::validate_patch(&patch)?;
        self.repository.update_many(filter, patch).await
    }

    /// Delete the first matching product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, filter: ProductFilter) -> ProductResult<DeleteSummary> {
        self.repository.delete_one(filter).await
    }

    /// Count products matching a filter
    #[instrument(skip(self))]
    pub async fn count_products(&self, filter: ProductFilter) -> ProductResult<u64> {
        self.repository.count(filter).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Seller;
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;

    fn keyboard() -> Product {
        Product::new(CreateProduct::named("Keyboard").with_rate(50.0)).unwrap()
    }

    #[tokio::test]
    async fn test_create_product_passes_valid_input_through() {
        let mut mock_repo = MockProductRepository::new();
        let input = CreateProduct::named("Keyboard").with_rate(50.0);

        mock_repo
            .expect_create()
            .with(eq(input.clone()))
            .times(1)
            .returning(|input| Product::new(input));

        let service = ProductService::new(mock_repo);
        let product = service.create_product(input).await.unwrap();

        assert_eq!(product.name, "Keyboard");
        assert_eq!(product.rate, Some(50.0));
    }

    #[tokio::test]
    async fn test_create_product_without_name_never_reaches_repository() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let input = CreateProduct {
            rate: Some(10.0),
            ..Default::default()
        };
        let result = service.create_product(input).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_product_rejects_seller_rating_above_ten() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let input = CreateProduct {
            seller: Some(Seller {
                seller_rating: Some(11.0),
                ..Default::default()
            }),
            ..CreateProduct::named("Monitor")
        };
        let err = service.create_product(input).await.unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("seller_rating"));
    }

    #[tokio::test]
    async fn test_create_product_rejects_nan_seller_rating() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let input = CreateProduct {
            seller: Some(Seller {
                seller_rating: Some(f64::NAN),
                ..Default::default()
            }),
            ..CreateProduct::named("Monitor")
        };
        let err = service.create_product(input).await.unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("seller_rating"));
    }

    #[tokio::test]
    async fn test_update_product_rejects_nan_rate() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_update_one().never();

        let service = ProductService::new(mock_repo);
        let result = service
            .update_product(ProductFilter::by_name("Monitor"), UpdateProduct::rate(f64::NAN))
            .await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_find_one_and_update_forwards_return_version() {
        let mut mock_repo = MockProductRepository::new();
        let filter = ProductFilter::by_name("Keyboard");

        mock_repo
            .expect_find_one_and_update()
            .with(
                eq(filter.clone()),
                eq(UpdateProduct::rate(89.99)),
                eq(ReturnVersion::Updated),
            )
            .returning(|_, patch, _| {
                let mut product = keyboard();
                product.rate = patch.rate;
                Ok(Some(product))
            });

        let service = ProductService::new(mock_repo);
        let updated = service
            .find_one_and_update(filter, UpdateProduct::rate(89.99), ReturnVersion::Updated)
            .await
            .unwrap();

        assert_eq!(updated.and_then(|p| p.rate), Some(89.99));
    }

    #[tokio::test]
    async fn test_find_one_and_update_no_match_is_none() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_one_and_update()
            .returning(|_, _, _| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service
            .find_one_and_update(
                ProductFilter::by_name("Missing"),
                UpdateProduct::rate(1.0),
                ReturnVersion::Original,
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_product_rejects_empty_patch() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_update_one().never();

        let service = ProductService::new(mock_repo);
        let result = service
            .update_product(ProductFilter::by_name("Keyboard"), UpdateProduct::default())
            .await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_product_zero_matches_is_not_an_error() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_update_one()
            .returning(|_, _| Ok(UpdateSummary::default()));

        let service = ProductService::new(mock_repo);
        let summary = service
            .update_product(ProductFilter::by_name("Nothing"), UpdateProduct::rate(99.0))
            .await
            .unwrap();

        assert_eq!(summary.matched_count, 0);
        assert_eq!(summary.modified_count, 0);
    }

    #[tokio::test]
    async fn test_update_products_uses_update_many() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_update_one().never();
        mock_repo.expect_update_many().times(1).returning(|_, _| {
            Ok(UpdateSummary {
                matched_count: 3,
                modified_count: 2,
            })
        });

        let service = ProductService::new(mock_repo);
        let summary = service
            .update_products(ProductFilter::default(), UpdateProduct::rate(5.0))
            .await
            .unwrap();

        assert_eq!(summary.matched_count, 3);
    }

    #[tokio::test]
    async fn test_database_errors_propagate() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_delete_one()
            .returning(|_| Err(ProductError::Database("connection refused".to_string())));

        let service = ProductService::new(mock_repo);
        let result = service
            .delete_product(ProductFilter::by_name("Keyboard"))
            .await;

        assert!(matches!(result, Err(ProductError::Database(_))));
    }

    #[tokio::test]
    async fn test_find_products_empty() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_many().returning(|_| Ok(vec![]));

        let service = ProductService::new(mock_repo);
        let products = service
            .find_products(ProductFilter::by_name("Nothing"))
            .await
            .unwrap();

        assert!(products.is_empty());
    }
}
