use poem_openapi::Object;

use business::application::cart::item_controller::CartItemController;
use business::domain::cart::errors::CartError;
use business::domain::cart::model::{CartLineItem, ProductSnapshot, parse_price};

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    /// Catalog product identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit price as a decimal string, e.g. "5.50"
    pub price: String,
    /// Identifier in the Contifico inventory; absent means untracked stock
    #[oai(skip_serializing_if_is_none)]
    pub contifico_external_id: Option<String>,
}

impl AddCartItemRequest {
    pub fn into_snapshot(self) -> Result<ProductSnapshot, CartError> {
        let price = parse_price(&self.price)?;
        ProductSnapshot::new(&self.id, self.name, price, self.contifico_external_id)
    }
}

#[derive(Debug, Clone, Object)]
pub struct SetQuantityRequest {
    /// New quantity; anything below 1 removes the line
    pub quantity: i64,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    /// price × quantity
    pub line_total: String,
    #[oai(skip_serializing_if_is_none)]
    pub contifico_external_id: Option<String>,
}

impl From<&CartLineItem> for CartLineResponse {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price.to_string(),
            quantity: item.quantity,
            line_total: item.line_total().to_string(),
            contifico_external_id: item.contifico_external_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub total_items: u64,
    pub total_price: String,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct StockAdvisoryResponse {
    pub id: String,
    pub available: f64,
    pub requested: u32,
    pub message: String,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub id: String,
    /// idle, checking or blocked
    pub state: String,
    pub is_checking: bool,
    pub is_out_of_stock: bool,
    pub quantity: u32,
    #[oai(skip_serializing_if_is_none)]
    pub advisory: Option<String>,
}

impl From<&CartItemController> for AvailabilityResponse {
    fn from(controller: &CartItemController) -> Self {
        let state = controller.state();
        Self {
            id: controller.product().id.to_string(),
            state: state.to_string(),
            is_checking: controller.is_checking(),
            is_out_of_stock: controller.is_out_of_stock(),
            quantity: controller.quantity(),
            advisory: controller.advisory(),
        }
    }
}
