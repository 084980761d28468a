use catalog_core::response::ApiGatewayResponse;
use catalog_lambda::adapters::product_store::DynamoProductStore;
use catalog_lambda::adapters::token_validator::LambdaTokenValidator;
use catalog_lambda::handlers::products::handle_delete_product;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let table_name = std::env::var("PRODUCTOS_TABLE")
        .map_err(|_| Error::from("PRODUCTOS_TABLE must be configured"))?;
    let auth_function_name = std::env::var("AUTH_LAMBDA_NAME")
        .unwrap_or_else(|_| "auth-microservice-dev-validateToken".to_string());

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let validator = LambdaTokenValidator {
        lambda_client: aws_sdk_lambda::Client::new(&config),
        function_name: auth_function_name,
    };
    let store = DynamoProductStore {
        table_name,
        dynamodb_client: aws_sdk_dynamodb::Client::new(&config),
    };

    Ok(handle_delete_product(&event.payload, &validator, &store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
