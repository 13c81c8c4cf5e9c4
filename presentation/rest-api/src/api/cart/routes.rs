use std::sync::Arc;

use poem_openapi::{OpenApi, param::Path, payload::Json};

use business::application::cart::item_controller::{AddOutcome, DecreaseOutcome};
use business::application::cart::store::CartStore;
use business::domain::cart::model::{CartLineItem, ProductSnapshot};
use business::domain::shared::value_objects::ProductId;

use crate::api::cart::controllers::ControllerRegistry;
use crate::api::cart::dto::{
    AddCartItemRequest, AvailabilityResponse, CartLineResponse, CartResponse, SetQuantityRequest,
    StockAdvisoryResponse,
};
use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::tags::ApiTags;

pub struct CartApi {
    controllers: Arc<ControllerRegistry>,
}

impl CartApi {
    pub fn new(controllers: Arc<ControllerRegistry>) -> Self {
        Self { controllers }
    }

    fn store(&self) -> &CartStore {
        self.controllers.store()
    }

    fn line(&self, id: &ProductId) -> Option<CartLineResponse> {
        self.store().get(id).map(|item| CartLineResponse::from(&item))
    }
}

fn not_in_cart() -> Json<ErrorResponse> {
    ErrorResponse::json("NotFound", "cart.not_in_cart")
}

/// Session cart API
///
/// Line items, totals, and stock-checked add/increase/decrease per product.
#[OpenApi]
impl CartApi {
    /// Get the cart
    ///
    /// Returns every line in insertion order with item and price totals.
    #[oai(path = "/cart", method = "get", tag = "ApiTags::Cart")]
    async fn get_cart(&self) -> Json<CartResponse> {
        let store = self.store();
        Json(CartResponse {
            items: store.items().iter().map(CartLineResponse::from).collect(),
            total_items: store.total_items(),
            total_price: store.total_price().to_string(),
        })
    }

    /// Add one unit of a product
    ///
    /// Checks stock for the resulting quantity first. Products without a
    /// Contifico id, or whose stock cannot be read, are always added.
    #[oai(path = "/cart/items", method = "post", tag = "ApiTags::Cart")]
    async fn add_item(&self, body: Json<AddCartItemRequest>) -> AddCartItemResponse {
        let product = match body.0.into_snapshot() {
            Ok(product) => product,
            Err(err) => {
                let (_status, json) = err.into_error_response();
                return AddCartItemResponse::BadRequest(json);
            }
        };
        let id = product.id.clone();
        let controller = self.controllers.controller_for(product.clone()).await;

        match controller.increase().await {
            AddOutcome::Added { quantity, .. } => {
                let line = self
                    .line(&id)
                    .unwrap_or_else(|| fallback_line(&product, quantity));
                AddCartItemResponse::Ok(Json(line))
            }
            AddOutcome::OutOfStock {
                available,
                requested,
            } => AddCartItemResponse::OutOfStock(Json(StockAdvisoryResponse {
                id: id.to_string(),
                available,
                requested,
                message: controller.advisory().unwrap_or_default(),
            })),
            AddOutcome::Ignored => AddCartItemResponse::Busy(ErrorResponse::json(
                "Busy",
                "cart.check_in_progress",
            )),
        }
    }

    /// Remove one unit of a product
    ///
    /// Never checks stock. Clears an out-of-stock block for the product.
    #[oai(path = "/cart/items/:id/decrease", method = "post", tag = "ApiTags::Cart")]
    async fn decrease_item(&self, id: Path<String>) -> ChangeLineResponse {
        let Some(id) = ProductId::parse(&id.0) else {
            return ChangeLineResponse::NotFound(not_in_cart());
        };
        let Some(controller) = self.controllers.known(&id, false).await else {
            return ChangeLineResponse::NotFound(not_in_cart());
        };

        match controller.decrease() {
            DecreaseOutcome::Decreased { .. } => match self.line(&id) {
                Some(line) => ChangeLineResponse::Ok(Json(line)),
                None => ChangeLineResponse::Removed,
            },
            DecreaseOutcome::Removed => ChangeLineResponse::Removed,
            DecreaseOutcome::NotInCart => ChangeLineResponse::NotFound(not_in_cart()),
        }
    }

    /// Set a line's quantity
    ///
    /// A quantity below 1 removes the line.
    #[oai(path = "/cart/items/:id", method = "put", tag = "ApiTags::Cart")]
    async fn set_quantity(
        &self,
        id: Path<String>,
        body: Json<SetQuantityRequest>,
    ) -> ChangeLineResponse {
        let Some(id) = ProductId::parse(&id.0) else {
            return ChangeLineResponse::NotFound(not_in_cart());
        };
        if self.store().get(&id).is_none() {
            return ChangeLineResponse::NotFound(not_in_cart());
        }

        self.store().set_quantity(&id, body.0.quantity);

        match self.line(&id) {
            Some(line) => ChangeLineResponse::Ok(Json(line)),
            None => ChangeLineResponse::Removed,
        }
    }

    /// Remove a line
    ///
    /// Removing a product that is not in the cart is a no-op.
    #[oai(path = "/cart/items/:id", method = "delete", tag = "ApiTags::Cart")]
    async fn remove_item(&self, id: Path<String>) -> NoContentResponse {
        if let Some(id) = ProductId::parse(&id.0) {
            match self.controllers.existing(&id) {
                Some(controller) => {
                    controller.remove();
                    self.controllers.evict_if_idle(&id);
                }
                None => {
                    self.store().remove_item(&id);
                }
            }
        }
        NoContentResponse::NoContent
    }

    /// Empty the cart
    #[oai(path = "/cart", method = "delete", tag = "ApiTags::Cart")]
    async fn clear_cart(&self) -> NoContentResponse {
        self.store().clear();
        self.controllers.evict_idle();
        NoContentResponse::NoContent
    }

    /// Product availability
    ///
    /// Controller view for a product seen in this session: whether a check is
    /// in flight, whether it is blocked as out of stock, and any advisory.
    #[oai(
        path = "/cart/items/:id/availability",
        method = "get",
        tag = "ApiTags::Cart"
    )]
    async fn availability(&self, id: Path<String>) -> AvailabilityResult {
        let Some(id) = ProductId::parse(&id.0) else {
            return AvailabilityResult::NotFound(not_in_cart());
        };
        match self.controllers.known(&id, true).await {
            Some(controller) => {
                AvailabilityResult::Ok(Json(AvailabilityResponse::from(controller.as_ref())))
            }
            None => AvailabilityResult::NotFound(not_in_cart()),
        }
    }
}

/// Line built from the request when the cart changed under us before the read.
fn fallback_line(product: &ProductSnapshot, quantity: u32) -> CartLineResponse {
    let line = CartLineItem::from_repository(
        product.id.clone(),
        product.contifico_external_id.clone(),
        product.name.clone(),
        product.price.clone(),
        quantity,
    );
    CartLineResponse::from(&line)
}

#[derive(poem_openapi::ApiResponse)]
pub enum AddCartItemResponse {
    #[oai(status = 200)]
    Ok(Json<CartLineResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 409)]
    OutOfStock(Json<StockAdvisoryResponse>),
    #[oai(status = 429)]
    Busy(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum ChangeLineResponse {
    #[oai(status = 200)]
    Ok(Json<CartLineResponse>),
    /// The line was removed
    #[oai(status = 204)]
    Removed,
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum NoContentResponse {
    #[oai(status = 204)]
    NoContent,
}

#[derive(poem_openapi::ApiResponse)]
pub enum AvailabilityResult {
    #[oai(status = 200)]
    Ok(Json<AvailabilityResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
}
