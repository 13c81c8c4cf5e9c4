use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::cart::stock::{InventoryService, StockCheck};
use crate::domain::cart::use_cases::check_stock::{CheckStockParams, CheckStockUseCase};
use crate::domain::logger::Logger;
use crate::domain::shared::value_objects::normalize_external_id;

/// Advisory stock gate. Fails open: an unreadable inventory never blocks the cart.
pub struct CheckStockUseCaseImpl {
    pub inventory: Arc<dyn InventoryService>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl CheckStockUseCase for CheckStockUseCaseImpl {
    async fn execute(&self, params: CheckStockParams) -> StockCheck {
        let Some(external_id) = normalize_external_id(params.external_id) else {
            return StockCheck::Unchecked;
        };

        self.logger.debug(&format!(
            "Checking stock for {}: requested {}",
            external_id, params.requested
        ));

        match self.inventory.available_quantity(&external_id).await {
            Ok(available) => {
                let check = StockCheck::compare(available, params.requested);
                self.logger.debug(&format!(
                    "Stock for {}: available {}, {}",
                    external_id, available, check
                ));
                check
            }
            Err(reason) => {
                self.logger.warn(&format!(
                    "Stock check for {} failed ({}), allowing",
                    external_id, reason
                ));
                StockCheck::CheckFailed { reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::stock::StockError;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Inventory {}

        #[async_trait]
        impl InventoryService for Inventory {
            async fn available_quantity(&self, external_id: &str) -> Result<f64, StockError>;
        }
    }

    mock! {
        pub Log {}

        impl Logger for Log {
            fn info(&self, message: &str);
            fn warn(&self, message: &str);
            fn error(&self, message: &str);
            fn debug(&self, message: &str);
        }
    }

    fn mock_logger() -> Arc<dyn Logger> {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_warn().returning(|_| ());
        logger.expect_error().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        Arc::new(logger)
    }

    fn gate(inventory: MockInventory) -> CheckStockUseCaseImpl {
        CheckStockUseCaseImpl {
            inventory: Arc::new(inventory),
            logger: mock_logger(),
        }
    }

    #[tokio::test]
    async fn should_skip_remote_when_no_external_id() {
        let mut inventory = MockInventory::new();
        inventory.expect_available_quantity().never();

        let result = gate(inventory)
            .execute(CheckStockParams {
                external_id: None,
                requested: 10_000,
            })
            .await;

        assert_eq!(result, StockCheck::Unchecked);
        assert!(result.allows());
    }

    #[tokio::test]
    async fn should_skip_remote_when_external_id_blank() {
        let mut inventory = MockInventory::new();
        inventory.expect_available_quantity().never();

        let result = gate(inventory)
            .execute(CheckStockParams {
                external_id: Some("  ".to_string()),
                requested: 1,
            })
            .await;

        assert_eq!(result, StockCheck::Unchecked);
    }

    #[tokio::test]
    async fn should_report_sufficient_when_stock_equals_request() {
        let mut inventory = MockInventory::new();
        inventory
            .expect_available_quantity()
            .with(eq("ext-1"))
            .times(1)
            .returning(|_| Ok(3.0));

        let result = gate(inventory)
            .execute(CheckStockParams {
                external_id: Some("ext-1".to_string()),
                requested: 3,
            })
            .await;

        assert_eq!(
            result,
            StockCheck::Sufficient {
                available: 3.0,
                requested: 3
            }
        );
    }

    #[tokio::test]
    async fn should_report_insufficient_when_stock_below_request() {
        let mut inventory = MockInventory::new();
        inventory.expect_available_quantity().returning(|_| Ok(2.0));

        let result = gate(inventory)
            .execute(CheckStockParams {
                external_id: Some("ext-1".to_string()),
                requested: 3,
            })
            .await;

        assert!(!result.allows());
    }

    #[tokio::test]
    async fn should_fail_open_on_transport_error() {
        let mut inventory = MockInventory::new();
        inventory
            .expect_available_quantity()
            .returning(|_| Err(StockError::Transport));

        let result = gate(inventory)
            .execute(CheckStockParams {
                external_id: Some("ext-1".to_string()),
                requested: 1,
            })
            .await;

        assert_eq!(
            result,
            StockCheck::CheckFailed {
                reason: StockError::Transport
            }
        );
        assert!(result.allows());
    }

    #[tokio::test]
    async fn should_fail_open_on_server_error_status() {
        let mut inventory = MockInventory::new();
        inventory
            .expect_available_quantity()
            .returning(|_| Err(StockError::Status(500)));

        let result = gate(inventory)
            .execute(CheckStockParams {
                external_id: Some("ext-1".to_string()),
                requested: 1,
            })
            .await;

        assert!(result.allows());
    }

    #[tokio::test]
    async fn should_query_on_every_call() {
        let mut inventory = MockInventory::new();
        inventory
            .expect_available_quantity()
            .times(2)
            .returning(|_| Ok(5.0));
        let gate = gate(inventory);

        for _ in 0..2 {
            gate.execute(CheckStockParams {
                external_id: Some("ext-1".to_string()),
                requested: 1,
            })
            .await;
        }
    }
}
