//! The steps behind each command
//!
//! `create_product` and `run_scenario` propagate every failure. The
//! find/update/delete helpers log and swallow database errors, reporting
//! them as [`StepOutcome::Failed`] instead.

use std::io::Write;

use domain_products::{
    Outcome, Product, ProductError, ProductFilter, ProductRepository, ProductService,
    ReturnVersion, UpdateProduct,
};
use eyre::{bail, Result, WrapErr};
use serde::Serialize;
use tracing::{error, info};

use crate::samples;

/// How a swallowing helper step ended
#[derive(Debug)]
pub enum StepOutcome {
    Completed,
    /// The call succeeded but the filter selected nothing
    NoMatch,
    Failed(ProductError),
}

impl From<Outcome> for StepOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Applied => StepOutcome::Completed,
            Outcome::NoMatch => StepOutcome::NoMatch,
        }
    }
}

/// Pretty relaxed extended JSON for a product
pub fn render(product: &Product) -> Result<String> {
    let json = product
        .to_relaxed_json()
        .wrap_err("Failed to render product")?;
    Ok(serde_json::to_string_pretty(&json)?)
}

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(value)?)?;
    Ok(())
}

/// Insert the vertical mouse sample, then set its rate by name
///
/// Prints the product as inserted, before the rate change.
pub async fn create_product<R: ProductRepository>(
    service: &ProductService<R>,
    out: &mut impl Write,
) -> Result<Product> {
    let created = service
        .create_product(samples::vertical_mouse())
        .await
        .wrap_err("Failed to create product")?;

    service
        .find_one_and_update(
            ProductFilter::by_name(&created.name),
            UpdateProduct::rate(samples::VERTICAL_MOUSE_UPDATED_RATE),
            ReturnVersion::Updated,
        )
        .await
        .wrap_err("Failed to update product rate")?;

    writeln!(out, "{}", render(&created)?)?;
    Ok(created)
}

pub async fn find_products<R: ProductRepository>(
    service: &ProductService<R>,
    name: &str,
    out: &mut impl Write,
) -> Result<StepOutcome> {
    match service.find_products(ProductFilter::by_name(name)).await {
        Ok(products) => {
            for product in &products {
                writeln!(out, "{}", render(product)?)?;
            }
            writeln!(out, "Total Products Found: {}", products.len())?;

            if products.is_empty() {
                Ok(StepOutcome::NoMatch)
            } else {
                Ok(StepOutcome::Completed)
            }
        }
        Err(e) => {
            error!(error = %e, "Error finding products");
            Ok(StepOutcome::Failed(e))
        }
    }
}

pub async fn update_product<R: ProductRepository>(
    service: &ProductService<R>,
    name: &str,
    rate: f64,
    out: &mut impl Write,
) -> Result<StepOutcome> {
    match service
        .update_product(ProductFilter::by_name(name), UpdateProduct::rate(rate))
        .await
    {
        Ok(summary) => {
            print_json(out, &summary)?;
            Ok(summary.outcome().into())
        }
        Err(e) => {
            error!(error = %e, "Error updating product");
            Ok(StepOutcome::Failed(e))
        }
    }
}

pub async fn delete_product<R: ProductRepository>(
    service: &ProductService<R>,
    name: &str,
    out: &mut impl Write,
) -> Result<StepOutcome> {
    match service.delete_product(ProductFilter::by_name(name)).await {
        Ok(summary) => {
            print_json(out, &summary)?;
            Ok(summary.outcome().into())
        }
        Err(e) => {
            error!(error = %e, "Error deleting product");
            Ok(StepOutcome::Failed(e))
        }
    }
}

/// Insert, update, read, delete and re-read the keyboard sample
pub async fn run_scenario<R: ProductRepository>(
    service: &ProductService<R>,
    out: &mut impl Write,
) -> Result<()> {
    let keyboard = ProductFilter::by_name(samples::KEYBOARD);

    let created = service
        .create_product(samples::keyboard())
        .await
        .wrap_err("Failed to create keyboard")?;
    writeln!(out, "{}", render(&created)?)?;

    let updated = service
        .update_product(keyboard.clone(), UpdateProduct::rate(99.0))
        .await
        .wrap_err("Failed to update keyboard")?;
    print_json(out, &updated)?;
    if updated.matched_count != 1 || updated.modified_count != 1 {
        bail!(
            "Expected exactly one keyboard to change, got matched={} modified={}",
            updated.matched_count,
            updated.modified_count
        );
    }

    let found = service
        .find_products(keyboard.clone())
        .await
        .wrap_err("Failed to find keyboard")?;
    for product in &found {
        writeln!(out, "{}", render(product)?)?;
    }
    writeln!(out, "Total Products Found: {}", found.len())?;

    let deleted = service
        .delete_product(keyboard.clone())
        .await
        .wrap_err("Failed to delete keyboard")?;
    print_json(out, &deleted)?;

    let remaining = service
        .find_products(keyboard)
        .await
        .wrap_err("Failed to re-read keyboards")?;
    writeln!(out, "Total Products Found: {}", remaining.len())?;

    info!(remaining = remaining.len(), "Scenario finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_products::{
        CreateProduct, DeleteSummary, MockProductRepository, UpdateSummary,
    };
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn stored(input: CreateProduct) -> Product {
        Product::new(input).unwrap()
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[tokio::test]
    async fn test_create_product_inserts_then_updates_rate() {
        let mut repo = MockProductRepository::new();
        let mut seq = Sequence::new();

        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|input| Ok(stored(input)));
        repo.expect_find_one_and_update()
            .with(
                eq(ProductFilter::by_name(samples::VERTICAL_MOUSE)),
                eq(UpdateProduct::rate(89.99)),
                eq(ReturnVersion::Updated),
            )
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(None));

        let service = ProductService::new(repo);
        let mut buffer = Vec::new();
        let created = create_product(&service, &mut buffer).await.unwrap();

        assert_eq!(created.rate, Some(99.5));
        assert!(output(buffer).contains(samples::VERTICAL_MOUSE));
    }

    #[tokio::test]
    async fn test_create_product_failure_propagates() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .returning(|_| Err(ProductError::Database("server selection timeout".into())));
        repo.expect_find_one_and_update().never();

        let service = ProductService::new(repo);
        let result = create_product(&service, &mut Vec::new()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_find_products_prints_total() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_many()
            .returning(|_| Ok(vec![stored(samples::keyboard())]));

        let service = ProductService::new(repo);
        let mut buffer = Vec::new();
        let outcome = find_products(&service, samples::KEYBOARD, &mut buffer)
            .await
            .unwrap();

        assert!(matches!(outcome, StepOutcome::Completed));
        assert!(output(buffer).contains("Total Products Found: 1"));
    }

    #[tokio::test]
    async fn test_find_products_empty_is_no_match() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_many().returning(|_| Ok(vec![]));

        let service = ProductService::new(repo);
        let mut buffer = Vec::new();
        let outcome = find_products(&service, "Nothing", &mut buffer)
            .await
            .unwrap();

        assert!(matches!(outcome, StepOutcome::NoMatch));
        assert!(output(buffer).contains("Total Products Found: 0"));
    }

    #[tokio::test]
    async fn test_find_products_error_is_swallowed() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_many()
            .returning(|_| Err(ProductError::Database("connection refused".into())));

        let service = ProductService::new(repo);
        let outcome = find_products(&service, samples::KEYBOARD, &mut Vec::new())
            .await
            .unwrap();

        assert!(matches!(outcome, StepOutcome::Failed(ProductError::Database(_))));
    }

    #[tokio::test]
    async fn test_update_product_prints_summary() {
        let mut repo = MockProductRepository::new();
        repo.expect_update_one()
            .with(eq(ProductFilter::by_name(samples::KEYBOARD)), eq(UpdateProduct::rate(99.0)))
            .returning(|_, _| {
                Ok(UpdateSummary {
                    matched_count: 1,
                    modified_count: 1,
                })
            });

        let service = ProductService::new(repo);
        let mut buffer = Vec::new();
        let outcome = update_product(&service, samples::KEYBOARD, 99.0, &mut buffer)
            .await
            .unwrap();

        assert!(matches!(outcome, StepOutcome::Completed));
        assert_eq!(
            output(buffer).trim(),
            r#"{"matchedCount":1,"modifiedCount":1}"#
        );
    }

    #[tokio::test]
    async fn test_update_product_zero_matches() {
        let mut repo = MockProductRepository::new();
        repo.expect_update_one()
            .returning(|_, _| Ok(UpdateSummary::default()));

        let service = ProductService::new(repo);
        let outcome = update_product(&service, "Nothing", 1.0, &mut Vec::new())
            .await
            .unwrap();

        assert!(matches!(outcome, StepOutcome::NoMatch));
    }

    #[tokio::test]
    async fn test_update_product_error_is_swallowed() {
        let mut repo = MockProductRepository::new();
        repo.expect_update_one()
            .returning(|_, _| Err(ProductError::Database("write concern timeout".into())));

        let service = ProductService::new(repo);
        let mut buffer = Vec::new();
        let outcome = update_product(&service, samples::KEYBOARD, 99.0, &mut buffer)
            .await
            .unwrap();

        assert!(matches!(outcome, StepOutcome::Failed(ProductError::Database(_))));
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_delete_product_outcomes() {
        let mut repo = MockProductRepository::new();
        let mut seq = Sequence::new();
        repo.expect_delete_one()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(DeleteSummary { deleted_count: 1 }));
        repo.expect_delete_one()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(DeleteSummary { deleted_count: 0 }));

        let service = ProductService::new(repo);
        let mut buffer = Vec::new();

        let first = delete_product(&service, samples::KEYBOARD, &mut buffer)
            .await
            .unwrap();
        let second = delete_product(&service, samples::KEYBOARD, &mut buffer)
            .await
            .unwrap();

        assert!(matches!(first, StepOutcome::Completed));
        assert!(matches!(second, StepOutcome::NoMatch));
        assert!(output(buffer).contains(r#"{"deletedCount":1}"#));
    }

    #[tokio::test]
    async fn test_run_scenario_sequence() {
        let mut repo = MockProductRepository::new();
        let mut seq = Sequence::new();
        let keyboard = ProductFilter::by_name(samples::KEYBOARD);

        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|input| Ok(stored(input)));
        repo.expect_update_one()
            .with(eq(keyboard.clone()), eq(UpdateProduct::rate(99.0)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(UpdateSummary {
                    matched_count: 1,
                    modified_count: 1,
                })
            });
        repo.expect_find_many()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                let mut product = stored(samples::keyboard());
                product.rate = Some(99.0);
                Ok(vec![product])
            });
        repo.expect_delete_one()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(DeleteSummary { deleted_count: 1 }));
        repo.expect_find_many()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(repo);
        let mut buffer = Vec::new();
        run_scenario(&service, &mut buffer).await.unwrap();

        let printed = output(buffer);
        assert!(printed.contains(r#"{"matchedCount":1,"modifiedCount":1}"#));
        assert!(printed.contains(r#"{"deletedCount":1}"#));
        assert!(printed.trim_end().ends_with("Total Products Found: 0"));
    }

    #[tokio::test]
    async fn test_run_scenario_stops_at_first_failure() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().returning(|input| Ok(stored(input)));
        repo.expect_update_one()
            .returning(|_, _| Err(ProductError::Database("not primary".into())));
        repo.expect_find_many().never();
        repo.expect_delete_one().never();

        let service = ProductService::new(repo);
        let result = run_scenario(&service, &mut Vec::new()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_scenario_fails_when_update_changes_nothing() {
        let mut repo = MockProductRepository::new();
        let mut seq = Sequence::new();

        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|input| Ok(stored(input)));
        repo.expect_update_one()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(UpdateSummary {
                    matched_count: 1,
                    modified_count: 0,
                })
            });
        repo.expect_find_many().never();
        repo.expect_delete_one().never();

        let service = ProductService::new(repo);
        let err = run_scenario(&service, &mut Vec::new()).await.unwrap_err();

        assert!(err.to_string().contains("matched=1 modified=0"));
    }
}
