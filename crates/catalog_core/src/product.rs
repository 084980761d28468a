use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Composite item-store key: partition key `tenant_id`, sort key
/// `producto_id`. Never derived from client input; the tenant half always
/// comes from the authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductKey {
    pub tenant_id: String,
    pub producto_id: String,
}

/// Full product record as written to the item store.
///
/// `precio` is kept as a decimal string so the store never sees a binary
/// float, and `created_at` is set once at creation and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductItem {
    pub tenant_id: String,
    pub producto_id: String,
    pub nombre: String,
    pub categoria: String,
    pub descripcion: String,
    pub precio: String,
    pub created_at: String,
}

impl ProductItem {
    pub fn key(&self) -> ProductKey {
        ProductKey {
            tenant_id: self.tenant_id.clone(),
            producto_id: self.producto_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Generates a fresh product id: `PROD-` plus the first 8 hex characters of
/// a random UUID. Immutable once assigned.
pub fn new_product_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("PROD-{}", &hex[..8])
}

/// Validated creation payload; `precio` has already been normalized to its
/// decimal string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProductRequest {
    pub nombre: String,
    pub categoria: String,
    pub descripcion: String,
    pub precio: String,
}

#[derive(Deserialize)]
struct RawCreateProductRequest {
    nombre: String,
    categoria: String,
    descripcion: String,
    precio: Value,
}

pub fn parse_create_request(body: &Value) -> Result<CreateProductRequest, ValidationError> {
    let raw: RawCreateProductRequest = serde_json::from_value(body.clone())
        .map_err(|error| ValidationError::new(format!("Malformed product payload: {error}")))?;
    let precio = normalize_price(&raw.precio)?;

    Ok(CreateProductRequest {
        nombre: raw.nombre,
        categoria: raw.categoria,
        descripcion: raw.descripcion,
        precio,
    })
}

/// Accepts a JSON number or a decimal string and returns the decimal string
/// that will be stored. Numbers keep their JSON textual representation, so
/// `9.99` becomes `"9.99"` rather than a rounded binary float.
pub fn normalize_price(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.parse::<f64>().is_err() {
                return Err(ValidationError::new(format!(
                    "precio must be a number or a decimal string, got '{text}'"
                )));
            }
            Ok(trimmed.to_string())
        }
        _ => Err(ValidationError::new(
            "precio must be a number or a decimal string",
        )),
    }
}

/// Builds the validated partial-update set for an update request.
///
/// Only the attributes of the product record itself may be touched; unknown
/// keys are rejected rather than becoming stored attribute names, and the
/// composite key fields are not updatable at all.
pub fn update_set(body: &Value) -> Result<BTreeMap<String, String>, ValidationError> {
    let Some(fields) = body.as_object() else {
        return Err(ValidationError::new("Update payload must be a JSON object"));
    };

    let mut changes = BTreeMap::new();
    for (name, value) in fields {
        match name.as_str() {
            "nombre" | "categoria" | "descripcion" => {
                let Some(text) = value.as_str() else {
                    return Err(ValidationError::new(format!(
                        "Field '{name}' must be a string"
                    )));
                };
                changes.insert(name.clone(), text.to_string());
            }
            "precio" => {
                changes.insert(name.clone(), normalize_price(value)?);
            }
            _ => {
                return Err(ValidationError::new(format!(
                    "Unknown product field '{name}'"
                )));
            }
        }
    }

    if changes.is_empty() {
        return Err(ValidationError::new(
            "Update payload must supply at least one field",
        ));
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn product_ids_follow_the_prod_hex_pattern() {
        for _ in 0..32 {
            let id = new_product_id();
            let suffix = id.strip_prefix("PROD-").expect("id should carry prefix");
            assert_eq!(suffix.len(), 8);
            assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn create_request_normalizes_numeric_price() {
        let body = json!({
            "nombre": "Cafetera",
            "categoria": "hogar",
            "descripcion": "Cafetera italiana 6 tazas",
            "precio": 9.99
        });

        let request = parse_create_request(&body).expect("payload should validate");
        assert_eq!(request.precio, "9.99");
        assert_eq!(request.nombre, "Cafetera");
    }

    #[test]
    fn create_request_preserves_string_price_verbatim() {
        let body = json!({
            "nombre": "Cafetera",
            "categoria": "hogar",
            "descripcion": "Cafetera italiana 6 tazas",
            "precio": "12.50"
        });

        let request = parse_create_request(&body).expect("payload should validate");
        assert_eq!(request.precio, "12.50");
    }

    #[test]
    fn create_request_requires_every_product_field() {
        let body = json!({
            "nombre": "Cafetera",
            "categoria": "hogar",
            "precio": 9.99
        });

        let error = parse_create_request(&body).expect_err("payload should fail");
        assert!(error.message().starts_with("Malformed product payload"));
    }

    #[test]
    fn create_request_ignores_extra_keys() {
        let body = json!({
            "nombre": "Cafetera",
            "categoria": "hogar",
            "descripcion": "Cafetera italiana 6 tazas",
            "precio": "15",
            "warehouse_hint": "ignored"
        });

        let request = parse_create_request(&body).expect("payload should validate");
        assert_eq!(request.precio, "15");
    }

    #[test]
    fn normalize_price_rejects_non_decimal_values() {
        assert!(normalize_price(&json!(true)).is_err());
        assert!(normalize_price(&json!("gratis")).is_err());
        assert!(normalize_price(&json!(null)).is_err());
    }

    #[test]
    fn normalize_price_keeps_integer_representation() {
        assert_eq!(normalize_price(&json!(10)).expect("int should pass"), "10");
    }

    #[test]
    fn update_set_accepts_allow_listed_fields() {
        let body = json!({"nombre": "Tetera", "precio": 9.99});

        let changes = update_set(&body).expect("update should validate");
        assert_eq!(changes.get("nombre").map(String::as_str), Some("Tetera"));
        assert_eq!(changes.get("precio").map(String::as_str), Some("9.99"));
    }

    #[test]
    fn update_set_rejects_unknown_field_names() {
        let body = json!({"nombre": "Tetera", "sku": "X-99"});

        let error = update_set(&body).expect_err("unknown field should fail");
        assert_eq!(error.message(), "Unknown product field 'sku'");
    }

    #[test]
    fn update_set_rejects_key_attributes() {
        let error = update_set(&json!({"producto_id": "PROD-00000000"}))
            .expect_err("key attribute should fail");
        assert_eq!(error.message(), "Unknown product field 'producto_id'");
    }

    #[test]
    fn update_set_rejects_wrongly_typed_fields() {
        let error = update_set(&json!({"nombre": 5})).expect_err("typed field should fail");
        assert_eq!(error.message(), "Field 'nombre' must be a string");
    }

    #[test]
    fn update_set_rejects_empty_payloads() {
        assert!(update_set(&json!({})).is_err());
        assert!(update_set(&json!("nombre")).is_err());
    }
}
