use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use business::domain::cart::model::CartLineItem;
use business::domain::errors::RepositoryError;
use business::domain::shared::value_objects::{ProductId, normalize_external_id};

/// Stored shape of one cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItemEntity {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "price_to_string", deserialize_with = "price_from_json")]
    pub price: BigDecimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contifico_external_id: Option<String>,
}

impl CartLineItemEntity {
    pub fn from_domain(item: &CartLineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price.clone(),
            quantity: item.quantity,
            contifico_external_id: item.contifico_external_id.clone(),
        }
    }

    pub fn into_domain(self) -> Result<CartLineItem, RepositoryError> {
        let id = ProductId::parse(&self.id).ok_or(RepositoryError::Parse)?;
        if self.price < BigDecimal::zero() {
            return Err(RepositoryError::Parse);
        }

        Ok(CartLineItem::from_repository(
            id,
            normalize_external_id(self.contifico_external_id),
            self.name,
            self.price,
            self.quantity,
        ))
    }
}

fn price_to_string<S>(price: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&price.to_string())
}

/// Accepts `"5.50"` as well as `5.5`; numbers go through their shortest
/// decimal form so binary float noise never reaches the cart.
fn price_from_json<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        serde_json::Value::Number(number) => number.to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected price, found {}",
                other
            )));
        }
    };
    BigDecimal::from_str(raw.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_read_numeric_and_string_prices() {
        let json = r#"[
            {"id":"p1","name":"Queso","price":5.5,"quantity":2},
            {"id":"p2","name":"Cafe","price":"8.00","quantity":1,"contificoExternalId":"ext-2"}
        ]"#;

        let entities: Vec<CartLineItemEntity> = serde_json::from_str(json).unwrap();

        assert_eq!(entities[0].price, BigDecimal::from_str("5.50").unwrap());
        assert_eq!(entities[1].price, BigDecimal::from_str("8").unwrap());
        assert_eq!(entities[1].contifico_external_id.as_deref(), Some("ext-2"));
    }

    #[test]
    fn should_keep_short_decimal_for_float_price() {
        let entity: CartLineItemEntity =
            serde_json::from_str(r#"{"id":"p1","name":"Pan","price":0.1,"quantity":1}"#).unwrap();

        assert_eq!(entity.price, BigDecimal::from_str("0.1").unwrap());
    }

    #[test]
    fn should_omit_absent_external_id_when_writing() {
        let entity = CartLineItemEntity {
            id: "p1".to_string(),
            name: "Queso".to_string(),
            price: BigDecimal::from_str("5.50").unwrap(),
            quantity: 1,
            contifico_external_id: None,
        };

        let json = serde_json::to_string(&entity).unwrap();

        assert!(!json.contains("contificoExternalId"));
        assert!(json.contains(r#""price":"5.50""#));
    }

    #[test]
    fn should_reject_blank_id_when_converting() {
        let entity = CartLineItemEntity {
            id: " ".to_string(),
            name: "Queso".to_string(),
            price: BigDecimal::zero(),
            quantity: 1,
            contifico_external_id: None,
        };

        assert!(matches!(entity.into_domain(), Err(RepositoryError::Parse)));
    }

    #[test]
    fn should_reject_negative_price_when_converting() {
        let entity = CartLineItemEntity {
            id: "p1".to_string(),
            name: "Queso".to_string(),
            price: BigDecimal::from_str("-1").unwrap(),
            quantity: 1,
            contifico_external_id: None,
        };

        assert!(matches!(entity.into_domain(), Err(RepositoryError::Parse)));
    }
}
