/// Validation errors raised while building cart values from catalog data.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CartError {
    #[error("cart.id_empty")]
    IdEmpty,
    #[error("cart.name_empty")]
    NameEmpty,
    #[error("cart.negative_price")]
    NegativePrice,
    #[error("cart.invalid_price")]
    InvalidPrice,
}
