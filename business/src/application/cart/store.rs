use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;

use crate::domain::cart::model::{CartLineItem, CartState, ProductSnapshot};
use crate::domain::cart::repository::CartRepository;
use crate::domain::logger::Logger;
use crate::domain::shared::value_objects::ProductId;

/// Session cart. One instance is built at the application root and shared.
///
/// Mutations are applied and persisted under the same lock, so storage always
/// receives snapshots in mutation order. Storage failures are logged and never
/// surface to callers: the in-memory cart stays authoritative.
pub struct CartStore {
    state: Mutex<CartState>,
    repository: Arc<dyn CartRepository>,
    logger: Arc<dyn Logger>,
}

impl CartStore {
    /// Loads the persisted cart once. Unreadable storage starts an empty cart.
    pub fn hydrate(repository: Arc<dyn CartRepository>, logger: Arc<dyn Logger>) -> Self {
        let state = match repository.load() {
            Ok(items) => {
                let state = CartState::from_persisted(items);
                logger.info(&format!(
                    "Cart hydrated with {} line(s)",
                    state.items().len()
                ));
                state
            }
            Err(err) => {
                logger.error(&format!("Could not restore cart, starting empty: {}", err));
                CartState::new()
            }
        };

        Self {
            state: Mutex::new(state),
            repository,
            logger,
        }
    }

    pub fn add_item(&self, product: ProductSnapshot) -> u32 {
        let mut state = self.lock();
        let id = product.id.clone();
        let quantity = state.add_item(product);
        self.logger
            .debug(&format!("Cart add {}: quantity {}", id, quantity));
        self.persist(&state);
        quantity
    }

    pub fn remove_item(&self, id: &ProductId) -> bool {
        let mut state = self.lock();
        let removed = state.remove_item(id);
        if removed {
            self.logger.debug(&format!("Cart remove {}", id));
            self.persist(&state);
        }
        removed
    }

    pub fn set_quantity(&self, id: &ProductId, quantity: i64) -> bool {
        let mut state = self.lock();
        let changed = state.set_quantity(id, quantity);
        if changed {
            self.logger
                .debug(&format!("Cart set {}: quantity {}", id, quantity));
            self.persist(&state);
        }
        changed
    }

    pub fn clear(&self) -> bool {
        let mut state = self.lock();
        let cleared = state.clear();
        if cleared {
            self.logger.info("Cart cleared");
            self.persist(&state);
        }
        cleared
    }

    pub fn items(&self) -> Vec<CartLineItem> {
        self.lock().items().to_vec()
    }

    pub fn get(&self, id: &ProductId) -> Option<CartLineItem> {
        self.lock().get(id).cloned()
    }

    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.lock().quantity_of(id)
    }

    pub fn total_items(&self) -> u64 {
        self.lock().total_items()
    }

    pub fn total_price(&self) -> BigDecimal {
        self.lock().total_price()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        // A panic while holding the lock cannot leave CartState half-mutated:
        // every operation is a single Vec edit.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, state: &CartState) {
        if let Err(err) = self.repository.save(state.items()) {
            self.logger
                .error(&format!("Could not persist cart: {}", err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::model::parse_price;
    use crate::domain::errors::RepositoryError;
    use mockall::mock;

    mock! {
        pub CartRepo {}

        impl CartRepository for CartRepo {
            fn load(&self) -> Result<Vec<CartLineItem>, RepositoryError>;
            fn save(&self, items: &[CartLineItem]) -> Result<(), RepositoryError>;
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

    /// Storage fake that keeps the last saved snapshot.
    #[derive(Default)]
    struct MemoryRepo {
        saved: Mutex<Vec<CartLineItem>>,
        saves: Mutex<usize>,
    }

    impl CartRepository for MemoryRepo {
        fn load(&self) -> Result<Vec<CartLineItem>, RepositoryError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        fn save(&self, items: &[CartLineItem]) -> Result<(), RepositoryError> {
            *self.saved.lock().unwrap() = items.to_vec();
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn queso() -> ProductSnapshot {
        ProductSnapshot::new(
            "p1",
            "Queso".to_string(),
            parse_price("5.50").unwrap(),
            Some("ext-1".to_string()),
        )
        .unwrap()
    }

    fn pid(id: &str) -> ProductId {
        ProductId::parse(id).unwrap()
    }

    #[test]
    fn should_start_empty_when_storage_is_corrupt() {
        let mut repo = MockCartRepo::new();
        repo.expect_load().returning(|| Err(RepositoryError::Parse));

        let store = CartStore::hydrate(Arc::new(repo), mock_logger());

        assert!(store.is_empty());
    }

    #[test]
    fn should_log_error_when_storage_is_corrupt() {
        let mut repo = MockCartRepo::new();
        repo.expect_load().returning(|| Err(RepositoryError::Parse));
        let mut logger = MockLog::new();
        logger.expect_error().times(1).returning(|_| ());

        let store = CartStore::hydrate(Arc::new(repo), Arc::new(logger));

        assert_eq!(store.total_items(), 0);
    }

    #[test]
    fn should_persist_full_snapshot_after_each_mutation() {
        let repo = Arc::new(MemoryRepo::default());
        let store = CartStore::hydrate(repo.clone(), mock_logger());

        store.add_item(queso());
        store.add_item(queso());
        store.set_quantity(&pid("p1"), 3);

        assert_eq!(*repo.saves.lock().unwrap(), 3);
        let saved = repo.saved.lock().unwrap().clone();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].quantity, 3);
    }

    #[test]
    fn should_not_persist_noop_mutations() {
        let repo = Arc::new(MemoryRepo::default());
        let store = CartStore::hydrate(repo.clone(), mock_logger());

        store.remove_item(&pid("ghost"));
        store.set_quantity(&pid("ghost"), 2);
        store.clear();

        assert_eq!(*repo.saves.lock().unwrap(), 0);
    }

    #[test]
    fn should_restore_identical_cart_after_reload() {
        let repo = Arc::new(MemoryRepo::default());
        let store = CartStore::hydrate(repo.clone(), mock_logger());
        store.add_item(queso());
        store.add_item(
            ProductSnapshot::new("p2", "Cafe".to_string(), parse_price("8").unwrap(), None)
                .unwrap(),
        );
        store.set_quantity(&pid("p2"), 4);
        let before = store.items();

        let reloaded = CartStore::hydrate(repo, mock_logger());

        assert_eq!(reloaded.items(), before);
        assert_eq!(reloaded.total_price(), parse_price("37.50").unwrap());
    }

    #[test]
    fn should_keep_mutation_when_save_fails() {
        let mut repo = MockCartRepo::new();
        repo.expect_load().returning(|| Ok(vec![]));
        repo.expect_save()
            .times(1)
            .returning(|_| Err(RepositoryError::Write));

        let store = CartStore::hydrate(Arc::new(repo), mock_logger());
        store.add_item(queso());

        assert_eq!(store.quantity_of(&pid("p1")), 1);
    }

    #[test]
    fn should_follow_quantity_scenario() {
        let store = CartStore::hydrate(Arc::new(MemoryRepo::default()), mock_logger());

        store.add_item(queso());
        assert_eq!(store.total_items(), 1);
        assert_eq!(store.total_price(), parse_price("5.50").unwrap());

        store.add_item(queso());
        assert_eq!(store.total_items(), 2);
        assert_eq!(store.items().len(), 1);

        store.set_quantity(&pid("p1"), 3);
        assert_eq!(store.total_price(), parse_price("16.50").unwrap());

        store.set_quantity(&pid("p1"), 0);
        assert_eq!(store.total_items(), 0);
        assert!(store.get(&pid("p1")).is_none());
    }

    #[test]
    fn should_persist_empty_cart_on_clear() {
        let repo = Arc::new(MemoryRepo::default());
        let store = CartStore::hydrate(repo.clone(), mock_logger());
        store.add_item(queso());

        assert!(store.clear());

        assert!(repo.saved.lock().unwrap().is_empty());
        assert_eq!(*repo.saves.lock().unwrap(), 2);
    }
}
