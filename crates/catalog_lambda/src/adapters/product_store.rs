use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use catalog_core::product::{ProductItem, ProductKey};

/// Keyed persistence seam for product records.
///
/// Implementations must keep `delete_product` idempotent: removing an
/// absent key is success, not an error.
pub trait ProductStore {
    fn put_product(&self, item: &ProductItem) -> Result<(), String>;
    fn apply_update(
        &self,
        key: &ProductKey,
        changes: &BTreeMap<String, String>,
    ) -> Result<(), String>;
    fn delete_product(&self, key: &ProductKey) -> Result<(), String>;
}

/// DynamoDB-backed product store addressed by the composite
/// `(tenant_id, producto_id)` key.
pub struct DynamoProductStore {
    pub table_name: String,
    pub dynamodb_client: aws_sdk_dynamodb::Client,
}

impl ProductStore for DynamoProductStore {
    fn put_product(&self, item: &ProductItem) -> Result<(), String> {
        let attributes = item_attributes(item);
        let client = self.dynamodb_client.clone();
        let table_name = self.table_name.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table_name)
                    .set_item(Some(attributes))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to write product item: {error}"))
            })
        })
    }

    fn apply_update(
        &self,
        key: &ProductKey,
        changes: &BTreeMap<String, String>,
    ) -> Result<(), String> {
        let (expression, names, values) = update_expression_parts(changes);
        let client = self.dynamodb_client.clone();
        let table_name = self.table_name.clone();
        let key = key.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .update_item()
                    .table_name(table_name)
                    .key("tenant_id", AttributeValue::S(key.tenant_id))
                    .key("producto_id", AttributeValue::S(key.producto_id))
                    .update_expression(expression)
                    .set_expression_attribute_names(Some(names))
                    .set_expression_attribute_values(Some(values))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to update product item: {error}"))
            })
        })
    }

    fn delete_product(&self, key: &ProductKey) -> Result<(), String> {
        let client = self.dynamodb_client.clone();
        let table_name = self.table_name.clone();
        let key = key.clone();

        // DeleteItem succeeds for absent keys, which keeps delete idempotent.
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .delete_item()
                    .table_name(table_name)
                    .key("tenant_id", AttributeValue::S(key.tenant_id))
                    .key("producto_id", AttributeValue::S(key.producto_id))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to delete product item: {error}"))
            })
        })
    }
}

fn item_attributes(item: &ProductItem) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("tenant_id".to_string(), AttributeValue::S(item.tenant_id.clone())),
        ("producto_id".to_string(), AttributeValue::S(item.producto_id.clone())),
        ("nombre".to_string(), AttributeValue::S(item.nombre.clone())),
        ("categoria".to_string(), AttributeValue::S(item.categoria.clone())),
        ("descripcion".to_string(), AttributeValue::S(item.descripcion.clone())),
        ("precio".to_string(), AttributeValue::S(item.precio.clone())),
        ("created_at".to_string(), AttributeValue::S(item.created_at.clone())),
    ])
}

/// Builds a `SET` update expression with one clause per supplied field,
/// with placeholder name/value maps keyed by the field name.
fn update_expression_parts(
    changes: &BTreeMap<String, String>,
) -> (
    String,
    HashMap<String, String>,
    HashMap<String, AttributeValue>,
) {
    let mut clauses = Vec::with_capacity(changes.len());
    let mut names = HashMap::with_capacity(changes.len());
    let mut values = HashMap::with_capacity(changes.len());

    for (field, value) in changes {
        clauses.push(format!("#{field} = :{field}"));
        names.insert(format!("#{field}"), field.clone());
        values.insert(format!(":{field}"), AttributeValue::S(value.clone()));
    }

    (format!("SET {}", clauses.join(", ")), names, values)
}
