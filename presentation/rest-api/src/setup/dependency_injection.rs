use std::sync::Arc;

use logger::TracingLogger;
use persistence::cart::repository::JsonFileCartRepository;

use contifico::client::ContificoClient;
use contifico::inventory::ContificoInventory;

use business::application::cart::check_stock::CheckStockUseCaseImpl;
use business::application::cart::store::CartStore;

use crate::api::cart::controllers::ControllerRegistry;
use crate::config::app_config::AppConfig;

pub struct DependencyContainer {
    pub health_api: crate::api::health::routes::Api,
    pub cart_api: crate::api::cart::routes::CartApi,
}

impl DependencyContainer {
    pub fn new(config: &AppConfig) -> Self {
        let logger = Arc::new(TracingLogger);
        let health_api = crate::api::health::routes::Api::new();

        // Infrastructure adapters
        let cart_repository = Arc::new(JsonFileCartRepository::new(&config.storage.dir));
        let contifico_client = ContificoClient::new(
            config.inventory.base_url.clone(),
            config.inventory.api_key.clone(),
            config.inventory.timeout,
        );
        let inventory = Arc::new(ContificoInventory::new(contifico_client));

        // Cart services
        let store = Arc::new(CartStore::hydrate(cart_repository, logger.clone()));
        let stock_gate = Arc::new(CheckStockUseCaseImpl {
            inventory,
            logger: logger.clone(),
        });

        let controllers = Arc::new(ControllerRegistry::new(
            store,
            stock_gate,
            config.cart.controller,
            logger,
        ));
        let cart_api = crate::api::cart::routes::CartApi::new(controllers);

        Self {
            health_api,
            cart_api,
        }
    }
}
