use async_trait::async_trait;

use crate::domain::cart::stock::StockCheck;

pub struct CheckStockParams {
    pub external_id: Option<String>,
    /// Total quantity the cart would hold after the change, not the delta.
    pub requested: u32,
}

#[async_trait]
pub trait CheckStockUseCase: Send + Sync {
    async fn execute(&self, params: CheckStockParams) -> StockCheck;
}
