use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::application::cart::store::CartStore;
use crate::domain::cart::model::ProductSnapshot;
use crate::domain::cart::stock::StockCheck;
use crate::domain::cart::use_cases::check_stock::{CheckStockParams, CheckStockUseCase};
use crate::domain::logger::Logger;

pub const DEFAULT_ADVISORY_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Run a stock check as soon as the controller is mounted.
    pub check_on_mount: bool,
    /// How long an out-of-stock advisory stays visible.
    pub advisory_ttl: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            check_on_mount: false,
            advisory_ttl: DEFAULT_ADVISORY_TTL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Checking,
    Blocked,
}

impl std::fmt::Display for ControllerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerState::Idle => write!(f, "idle"),
            ControllerState::Checking => write!(f, "checking"),
            ControllerState::Blocked => write!(f, "blocked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added { quantity: u32, check: StockCheck },
    OutOfStock { available: f64, requested: u32 },
    /// A check for this product was already in flight.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecreaseOutcome {
    Decreased { quantity: u32 },
    Removed,
    NotInCart,
}

#[derive(Debug, Clone)]
struct Advisory {
    message: String,
    dismiss_at: Instant,
}

#[derive(Debug)]
struct Inner {
    state: ControllerState,
    advisory: Option<Advisory>,
}

/// Per-product coordinator between the cart and the stock gate.
///
/// `Idle -> Checking` on add/increase; the check resolves to `Idle` (cart
/// mutated) or `Blocked` (cart untouched, advisory raised). While `Checking`,
/// further adds are rejected with [`AddOutcome::Ignored`]. A decrease never
/// checks stock and always leaves `Blocked`.
pub struct CartItemController {
    store: Arc<CartStore>,
    stock_gate: Arc<dyn CheckStockUseCase>,
    product: ProductSnapshot,
    options: ControllerOptions,
    logger: Arc<dyn Logger>,
    inner: Mutex<Inner>,
}

impl CartItemController {
    pub fn new(
        store: Arc<CartStore>,
        stock_gate: Arc<dyn CheckStockUseCase>,
        product: ProductSnapshot,
        options: ControllerOptions,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            store,
            stock_gate,
            product,
            options,
            logger,
            inner: Mutex::new(Inner {
                state: ControllerState::Idle,
                advisory: None,
            }),
        }
    }

    pub fn product(&self) -> &ProductSnapshot {
        &self.product
    }

    /// Eager availability check. No-op unless `check_on_mount` is set.
    pub async fn mount(&self) -> Option<StockCheck> {
        if !self.options.check_on_mount {
            return None;
        }
        self.refresh_availability().await
    }

    /// Checks whether one more unit could be added, without touching the cart.
    /// Returns `None` when a check is already in flight.
    pub async fn refresh_availability(&self) -> Option<StockCheck> {
        let (requested, mut guard) = self.begin_check()?;
        let check = self.check(requested).await;

        let next = if check.allows() {
            ControllerState::Idle
        } else {
            ControllerState::Blocked
        };
        guard.finish(next, None);
        Some(check)
    }

    pub async fn add(&self) -> AddOutcome {
        self.increase().await
    }

    pub async fn increase(&self) -> AddOutcome {
        let Some((requested, mut guard)) = self.begin_check() else {
            self.logger.debug(&format!(
                "Ignoring add for {}: check in flight",
                self.product.id
            ));
            return AddOutcome::Ignored;
        };

        let check = self.check(requested).await;

        match check {
            StockCheck::Insufficient {
                available,
                requested,
            } => {
                self.logger.info(&format!(
                    "Out of stock for {}: requested {}, available {}",
                    self.product.id, requested, available
                ));
                let advisory = Advisory {
                    message: format!(
                        "Only {} unit(s) of {} available",
                        available, self.product.name
                    ),
                    dismiss_at: Instant::now() + self.options.advisory_ttl,
                };
                guard.finish(ControllerState::Blocked, Some(advisory));
                AddOutcome::OutOfStock {
                    available,
                    requested,
                }
            }
            check => {
                let quantity = self.store.add_item(self.product.clone());
                guard.finish(ControllerState::Idle, None);
                AddOutcome::Added { quantity, check }
            }
        }
    }

    pub fn decrease(&self) -> DecreaseOutcome {
        let current = self.store.quantity_of(&self.product.id);
        let outcome = match current {
            0 => DecreaseOutcome::NotInCart,
            1 => {
                self.store.remove_item(&self.product.id);
                DecreaseOutcome::Removed
            }
            _ => {
                let quantity = current - 1;
                self.store
                    .set_quantity(&self.product.id, i64::from(quantity));
                DecreaseOutcome::Decreased { quantity }
            }
        };
        self.unblock();
        outcome
    }

    pub fn remove(&self) -> bool {
        let removed = self.store.remove_item(&self.product.id);
        self.unblock();
        removed
    }

    pub fn state(&self) -> ControllerState {
        self.lock().state
    }

    pub fn is_checking(&self) -> bool {
        self.state() == ControllerState::Checking
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.state() == ControllerState::Blocked
    }

    pub fn quantity(&self) -> u32 {
        self.store.quantity_of(&self.product.id)
    }

    /// The current advisory, dropped once its deadline has passed.
    pub fn advisory(&self) -> Option<String> {
        let mut inner = self.lock();
        if inner
            .advisory
            .as_ref()
            .is_some_and(|advisory| Instant::now() >= advisory.dismiss_at)
        {
            inner.advisory = None;
        }
        inner.advisory.as_ref().map(|advisory| advisory.message.clone())
    }

    fn begin_check(&self) -> Option<(u32, CheckGuard<'_>)> {
        let mut inner = self.lock();
        if inner.state == ControllerState::Checking {
            return None;
        }
        inner.state = ControllerState::Checking;
        let requested = self.quantity().saturating_add(1);
        Some((
            requested,
            CheckGuard {
                inner: &self.inner,
                finished: false,
            },
        ))
    }

    async fn check(&self, requested: u32) -> StockCheck {
        self.stock_gate
            .execute(CheckStockParams {
                external_id: self.product.contifico_external_id.clone(),
                requested,
            })
            .await
    }

    fn unblock(&self) {
        let mut inner = self.lock();
        if inner.state == ControllerState::Blocked {
            inner.state = ControllerState::Idle;
        }
        inner.advisory = None;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock_inner(&self.inner)
    }
}

fn lock_inner(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Leaves `Checking` even if the in-flight check future is dropped.
struct CheckGuard<'a> {
    inner: &'a Mutex<Inner>,
    finished: bool,
}

impl CheckGuard<'_> {
    fn finish(&mut self, state: ControllerState, advisory: Option<Advisory>) {
        let mut inner = lock_inner(self.inner);
        inner.state = state;
        if advisory.is_some() {
            inner.advisory = advisory;
        }
        self.finished = true;
    }
}

impl Drop for CheckGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut inner = lock_inner(self.inner);
            if inner.state == ControllerState::Checking {
                inner.state = ControllerState::Idle;
            }
        }
    }
}
