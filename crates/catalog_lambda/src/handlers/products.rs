use catalog_core::identity::Identity;
use catalog_core::product::{new_product_id, parse_create_request, update_set, ProductItem, ProductKey};
use catalog_core::response::{error, ok, ApiGatewayResponse};
use serde_json::{json, Value};

use crate::adapters::product_store::ProductStore;
use crate::adapters::token_validator::TokenValidator;
use crate::handlers::access_gate::validate_admin_access;
use crate::handlers::request::{path_id, request_body};

/// Creates a product under the authenticated tenant.
///
/// The tenant half of the composite key always comes from the validated
/// identity, and the product id and creation timestamp are assigned here,
/// never by the client.
pub fn handle_create_product(
    event: &Value,
    validator: &dyn TokenValidator,
    store: &dyn ProductStore,
) -> ApiGatewayResponse {
    let identity = match validate_admin_access(event, validator) {
        Ok(identity) => identity,
        Err(denial) => return denial,
    };

    let Some(tenant_id) = tenant_claim(&identity) else {
        return error("Token missing tenant information", 400);
    };

    let body = match request_body(event) {
        Ok(value) => value,
        Err(message) => return error(&message, 400),
    };

    let request = match parse_create_request(&body) {
        Ok(value) => value,
        Err(validation) => return error(validation.message(), 400),
    };

    let producto_id = new_product_id();
    let item = ProductItem {
        tenant_id,
        producto_id: producto_id.clone(),
        nombre: request.nombre,
        categoria: request.categoria,
        descripcion: request.descripcion,
        precio: request.precio,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    if let Err(store_error) = store.put_product(&item) {
        log_store_error("create_product", &item.key(), &store_error);
        return error(&store_error, 500);
    }

    ok(json!({"message": "Producto creado", "id": producto_id}), 201)
}

/// Applies a validated partial update to an existing product.
///
/// Updates only touch non-key attributes; the composite key named by the
/// path and tenant claim is never rewritten.
pub fn handle_update_product(
    event: &Value,
    validator: &dyn TokenValidator,
    store: &dyn ProductStore,
) -> ApiGatewayResponse {
    let identity = match validate_admin_access(event, validator) {
        Ok(identity) => identity,
        Err(denial) => return denial,
    };

    let Some(tenant_id) = tenant_claim(&identity) else {
        return error("Token missing tenant information", 400);
    };

    let Some(producto_id) = path_id(event) else {
        return error("Missing product id in path", 400);
    };

    let body = match request_body(event) {
        Ok(value) => value,
        Err(message) => return error(&message, 400),
    };

    let changes = match update_set(&body) {
        Ok(value) => value,
        Err(validation) => return error(validation.message(), 400),
    };

    let key = ProductKey {
        tenant_id,
        producto_id,
    };

    if let Err(store_error) = store.apply_update(&key, &changes) {
        log_store_error("update_product", &key, &store_error);
        return error(&store_error, 500);
    }

    ok(json!({"message": "Producto actualizado"}), 200)
}

/// Removes a product by its composite key.
///
/// Deleting a key that does not exist still succeeds; delete is idempotent.
pub fn handle_delete_product(
    event: &Value,
    validator: &dyn TokenValidator,
    store: &dyn ProductStore,
) -> ApiGatewayResponse {
    let identity = match validate_admin_access(event, validator) {
        Ok(identity) => identity,
        Err(denial) => return denial,
    };

    let Some(tenant_id) = tenant_claim(&identity) else {
        return error("Token missing tenant information", 400);
    };

    let Some(producto_id) = path_id(event) else {
        return error("Missing product id in path", 400);
    };

    let key = ProductKey {
        tenant_id,
        producto_id,
    };

    if let Err(store_error) = store.delete_product(&key) {
        log_store_error("delete_product", &key, &store_error);
        return error(&store_error, 500);
    }

    ok(json!({"message": "Producto eliminado"}), 200)
}

fn tenant_claim(identity: &Identity) -> Option<String> {
    identity
        .tenant
        .as_deref()
        .map(str::trim)
        .filter(|tenant| !tenant.is_empty())
        .map(|tenant| tenant.to_string())
}

fn log_store_error(handler: &str, key: &ProductKey, error: &str) {
    eprintln!(
        "{}",
        json!({
            "component": handler,
            "level": "error",
            "event": "store_operation_failed",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": {
                "tenant_id": key.tenant_id,
                "producto_id": key.producto_id,
                "error": error,
            },
        })
    );
}
