use crate::domain::errors::RepositoryError;

use super::model::CartLineItem;

/// Client-local storage of a single cart document.
///
/// `save` always receives the full snapshot; a missing document loads as an
/// empty cart.
pub trait CartRepository: Send + Sync {
    fn load(&self) -> Result<Vec<CartLineItem>, RepositoryError>;
    fn save(&self, items: &[CartLineItem]) -> Result<(), RepositoryError>;
}
