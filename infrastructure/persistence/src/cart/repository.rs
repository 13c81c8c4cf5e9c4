use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use business::domain::cart::model::CartLineItem;
use business::domain::cart::repository::CartRepository;
use business::domain::errors::RepositoryError;

use super::entity::CartLineItemEntity;

/// Fixed key of the cart document inside the storage directory.
pub const CART_STORAGE_KEY: &str = "cart";

pub struct JsonFileCartRepository {
    path: PathBuf,
}

impl JsonFileCartRepository {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", CART_STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartRepository for JsonFileCartRepository {
    fn load(&self) -> Result<Vec<CartLineItem>, RepositoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(_) => return Err(RepositoryError::Read),
        };
        if raw.trim().is_empty() {
            return Ok(vec![]);
        }

        let entities: Vec<CartLineItemEntity> =
            serde_json::from_str(&raw).map_err(|_| RepositoryError::Parse)?;

        entities
            .into_iter()
            .map(CartLineItemEntity::into_domain)
            .collect()
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|_| RepositoryError::Write)?;
        }

        let entities: Vec<CartLineItemEntity> =
            items.iter().map(CartLineItemEntity::from_domain).collect();
        let json = serde_json::to_vec(&entities).map_err(|_| RepositoryError::Write)?;

        // Write-then-rename: readers never observe a half-written document.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|_| RepositoryError::Write)?;
        fs::rename(&staging, &self.path).map_err(|_| RepositoryError::Write)
    }
}
