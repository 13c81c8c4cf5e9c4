use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::cart::errors::CartError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for CartError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let message = match self {
            CartError::IdEmpty => "cart.id_empty",
            CartError::NameEmpty => "cart.name_empty",
            CartError::NegativePrice => "cart.negative_price",
            CartError::InvalidPrice => "cart.invalid_price",
        };

        (
            StatusCode::BAD_REQUEST,
            ErrorResponse::json("ValidationError", message),
        )
    }
}
