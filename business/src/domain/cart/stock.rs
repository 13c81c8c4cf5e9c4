use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StockError {
    #[error("stock.transport")]
    Transport,
    #[error("stock.status.{0}")]
    Status(u16),
    #[error("stock.decode")]
    Decode,
    #[error("stock.not_found")]
    NotFound,
}

/// Read-only port onto the external inventory system.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn available_quantity(&self, external_id: &str) -> Result<f64, StockError>;
}

/// Outcome of a single stock check.
///
/// Only `Insufficient` blocks; everything else lets the cart proceed.
#[derive(Debug, Clone, PartialEq)]
pub enum StockCheck {
    /// The product has no external inventory id.
    Unchecked,
    Sufficient { available: f64, requested: u32 },
    Insufficient { available: f64, requested: u32 },
    /// The inventory could not be read.
    CheckFailed { reason: StockError },
}

impl StockCheck {
    pub fn allows(&self) -> bool {
        !matches!(self, StockCheck::Insufficient { .. })
    }

    pub fn compare(available: f64, requested: u32) -> Self {
        if available >= f64::from(requested) {
            StockCheck::Sufficient {
                available,
                requested,
            }
        } else {
            StockCheck::Insufficient {
                available,
                requested,
            }
        }
    }
}

impl std::fmt::Display for StockCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockCheck::Unchecked => write!(f, "unchecked"),
            StockCheck::Sufficient { .. } => write!(f, "sufficient"),
            StockCheck::Insufficient { .. } => write!(f, "insufficient"),
            StockCheck::CheckFailed { .. } => write!(f, "check_failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compare_inclusively() {
        assert!(matches!(StockCheck::compare(3.0, 3), StockCheck::Sufficient { .. }));
        assert!(matches!(StockCheck::compare(2.0, 3), StockCheck::Insufficient { .. }));
    }

    #[test]
    fn should_allow_everything_except_insufficient() {
        assert!(StockCheck::Unchecked.allows());
        assert!(StockCheck::compare(10.0, 1).allows());
        assert!(
            StockCheck::CheckFailed {
                reason: StockError::Transport
            }
            .allows()
        );
        assert!(!StockCheck::compare(0.0, 1).allows());
    }

    #[test]
    fn should_block_fractional_stock_below_request() {
        assert!(!StockCheck::compare(1.5, 2).allows());
    }
}
