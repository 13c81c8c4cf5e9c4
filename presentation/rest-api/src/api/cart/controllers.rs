use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use business::application::cart::item_controller::{
    CartItemController, ControllerOptions, ControllerState,
};
use business::application::cart::store::CartStore;
use business::domain::cart::model::ProductSnapshot;
use business::domain::cart::use_cases::check_stock::CheckStockUseCase;
use business::domain::logger::Logger;
use business::domain::shared::value_objects::ProductId;

/// One controller per product, created on first use and kept for the session.
pub struct ControllerRegistry {
    store: Arc<CartStore>,
    stock_gate: Arc<dyn CheckStockUseCase>,
    options: ControllerOptions,
    logger: Arc<dyn Logger>,
    controllers: Mutex<HashMap<ProductId, Arc<CartItemController>>>,
}

impl ControllerRegistry {
    pub fn new(
        store: Arc<CartStore>,
        stock_gate: Arc<dyn CheckStockUseCase>,
        options: ControllerOptions,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            store,
            stock_gate,
            options,
            logger,
            controllers: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<CartStore> {
        &self.store
    }

    /// Returns the product's controller, mounting it when it is new.
    pub async fn controller_for(&self, product: ProductSnapshot) -> Arc<CartItemController> {
        let (controller, created) = self.register(product);
        if created {
            controller.mount().await;
        }
        controller
    }

    /// Controller for a product already known to the session: registered, or
    /// present in the cart. With `mount` unset a controller created here skips
    /// the eager stock check, so local-only operations never wait on inventory.
    pub async fn known(&self, id: &ProductId, mount: bool) -> Option<Arc<CartItemController>> {
        if let Some(existing) = self.existing(id) {
            return Some(existing);
        }
        let line = self.store.get(id)?;
        if mount {
            return Some(self.controller_for(line.snapshot()).await);
        }
        Some(self.register(line.snapshot()).0)
    }

    pub fn existing(&self, id: &ProductId) -> Option<Arc<CartItemController>> {
        self.lock().get(id).cloned()
    }

    /// Drops the product's controller once it is idle and out of the cart.
    pub fn evict_if_idle(&self, id: &ProductId) -> bool {
        let mut controllers = self.lock();
        let idle = controllers
            .get(id)
            .is_some_and(|controller| self.is_disposable(controller));
        if idle {
            controllers.remove(id);
        }
        idle
    }

    /// Drops every controller that is idle and out of the cart.
    pub fn evict_idle(&self) {
        self.lock()
            .retain(|_, controller| !self.is_disposable(controller));
    }

    fn is_disposable(&self, controller: &CartItemController) -> bool {
        controller.state() == ControllerState::Idle && controller.quantity() == 0
    }

    fn register(&self, product: ProductSnapshot) -> (Arc<CartItemController>, bool) {
        let mut controllers = self.lock();
        if let Some(existing) = controllers.get(&product.id) {
            return (existing.clone(), false);
        }
        let controller = Arc::new(CartItemController::new(
            self.store.clone(),
            self.stock_gate.clone(),
            product.clone(),
            self.options,
            self.logger.clone(),
        ));
        controllers.insert(product.id, controller.clone());
        (controller, true)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ProductId, Arc<CartItemController>>> {
        self.controllers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
