//! DynamoDB-backed table store

use crate::config::DynamoConfig;
use crate::convert::{from_attributes, to_attribute, to_attributes};
use crate::error::{DynamoError, Result};
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType as KeyRole, ProvisionedThroughput,
    ScalarAttributeType, TableStatus as RemoteStatus,
};
use aws_sdk_dynamodb::Client;
use schoolbase_core::{Item, KeyType, TableSpec, Value};
use schoolbase_db::{Error as StoreError, TableStatus, TableStore};
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

/// Table store talking to DynamoDB or DynamoDB Local.
///
/// Owns a current-thread runtime; every trait call blocks until the
/// request completes.
pub struct DynamoStore {
    client: Client,
    runtime: Runtime,
}

impl std::fmt::Debug for DynamoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoStore").finish_non_exhaustive()
    }
}

impl DynamoStore {
    /// Build a client from configuration. No request is sent yet.
    pub fn connect(config: &DynamoConfig) -> Result<Self> {
        if config.endpoint.as_deref().is_some_and(str::is_empty) {
            return Err(DynamoError::invalid_config("endpoint must not be empty"));
        }
        if config.region.is_empty() {
            return Err(DynamoError::invalid_config("region must not be empty"));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let client = runtime.block_on(Self::build_client(config));
        Ok(Self { client, runtime })
    }

    async fn build_client(config: &DynamoConfig) -> Client {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "schoolbase",
        );
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        // Endpoint override (DynamoDB Local, LocalStack)
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some(timeout_ms) = config.timeout_ms {
            let timeout_config = TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(timeout_ms))
                .build();
            loader = loader.timeout_config(timeout_config);
        }

        Client::new(&loader.load().await)
    }

    fn block_on<T>(
        &self,
        fut: impl Future<Output = schoolbase_db::Result<T>>,
    ) -> schoolbase_db::Result<T> {
        self.runtime.block_on(fut)
    }
}

fn scalar_type(key_type: KeyType) -> ScalarAttributeType {
    match key_type {
        KeyType::String => ScalarAttributeType::S,
        KeyType::Number => ScalarAttributeType::N,
    }
}

fn table_status(status: Option<&RemoteStatus>) -> TableStatus {
    match status {
        Some(RemoteStatus::Active) | Some(RemoteStatus::Updating) => TableStatus::Active,
        Some(RemoteStatus::Deleting) => TableStatus::Deleting,
        _ => TableStatus::Creating,
    }
}

fn sdk_failure(op: &str, err: impl std::error::Error) -> StoreError {
    DynamoError::dynamodb(format!("{} failed: {}", op, DisplayErrorContext(err))).into()
}

fn build_failure(err: impl std::fmt::Display) -> StoreError {
    DynamoError::Build(err.to_string()).into()
}

impl TableStore for DynamoStore {
    fn list_tables(&self) -> schoolbase_db::Result<Vec<String>> {
        self.block_on(async {
            let mut names = Vec::new();
            let mut start_name = None;

            loop {
                let response = self
                    .client
                    .list_tables()
                    .set_exclusive_start_table_name(start_name.take())
                    .send()
                    .await
                    .map_err(|e| sdk_failure("ListTables", e))?;

                names.extend(response.table_names().iter().cloned());

                match response.last_evaluated_table_name() {
                    Some(name) => start_name = Some(name.to_string()),
                    None => break,
                }
            }

            debug!(count = names.len(), "listed tables");
            Ok::<_, StoreError>(names)
        })
    }

    fn create_table(&self, spec: &TableSpec) -> schoolbase_db::Result<()> {
        let key_schema = KeySchemaElement::builder()
            .attribute_name(&spec.key)
            .key_type(KeyRole::Hash)
            .build()
            .map_err(build_failure)?;
        let attribute = AttributeDefinition::builder()
            .attribute_name(&spec.key)
            .attribute_type(scalar_type(spec.key_type))
            .build()
            .map_err(build_failure)?;
        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(spec.throughput.read)
            .write_capacity_units(spec.throughput.write)
            .build()
            .map_err(build_failure)?;

        self.block_on(async {
            let result = self
                .client
                .create_table()
                .table_name(&spec.name)
                .key_schema(key_schema)
                .attribute_definitions(attribute)
                .provisioned_throughput(throughput)
                .send()
                .await;

            match result {
                Ok(_) => {
                    debug!(table = %spec.name, "CreateTable accepted");
                    Ok(())
                }
                Err(e)
                    if e.as_service_error()
                        .is_some_and(|se| se.is_resource_in_use_exception()) =>
                {
                    Err(StoreError::TableExists(spec.name.clone()))
                }
                Err(e) => Err(sdk_failure("CreateTable", e)),
            }
        })
    }

    fn describe_table(&self, name: &str) -> schoolbase_db::Result<Option<TableStatus>> {
        self.block_on(async {
            let result = self.client.describe_table().table_name(name).send().await;
            match result {
                Ok(output) => Ok(output
                    .table()
                    .map(|table| table_status(table.table_status()))),
                Err(e)
                    if e.as_service_error()
                        .is_some_and(|se| se.is_resource_not_found_exception()) =>
                {
                    Ok(None)
                }
                Err(e) => Err(sdk_failure("DescribeTable", e)),
            }
        })
    }

    fn delete_table(&self, name: &str) -> schoolbase_db::Result<()> {
        self.block_on(async {
            let result = self.client.delete_table().table_name(name).send().await;
            match result {
                Ok(_) => Ok(()),
                Err(e)
                    if e.as_service_error()
                        .is_some_and(|se| se.is_resource_not_found_exception()) =>
                {
                    Err(StoreError::TableNotFound(name.to_string()))
                }
                Err(e) => Err(sdk_failure("DeleteTable", e)),
            }
        })
    }

    fn put_item(&self, table: &str, item: &Item) -> schoolbase_db::Result<()> {
        let attributes = to_attributes(item)?;
        self.block_on(async {
            let result = self
                .client
                .put_item()
                .table_name(table)
                .set_item(Some(attributes))
                .send()
                .await;
            match result {
                Ok(_) => Ok(()),
                Err(e)
                    if e.as_service_error()
                        .is_some_and(|se| se.is_resource_not_found_exception()) =>
                {
                    Err(StoreError::TableNotFound(table.to_string()))
                }
                Err(e) => Err(sdk_failure("PutItem", e)),
            }
        })
    }

    fn get_item(
        &self,
        table: &str,
        key_name: &str,
        key: &Value,
    ) -> schoolbase_db::Result<Option<Item>> {
        let key = to_attribute(key)?;
        self.block_on(async {
            let response = self
                .client
                .get_item()
                .table_name(table)
                .key(key_name, key)
                .consistent_read(true)
                .send()
                .await
                .map_err(|e| sdk_failure("GetItem", e))?;

            response
                .item()
                .map(from_attributes)
                .transpose()
                .map_err(StoreError::from)
        })
    }

    fn scan(&self, table: &str) -> schoolbase_db::Result<Vec<Item>> {
        self.block_on(async {
            let mut items = Vec::new();
            let mut last_evaluated_key = None;

            loop {
                let mut request = self.client.scan().table_name(table);

                if let Some(key) = last_evaluated_key.take() {
                    request = request.set_exclusive_start_key(Some(key));
                }

                let response = request.send().await.map_err(|e| sdk_failure("Scan", e))?;

                for item in response.items() {
                    items.push(from_attributes(item)?);
                }

                match response.last_evaluated_key() {
                    Some(key) if !key.is_empty() => {
                        last_evaluated_key = Some(key.clone());
                    }
                    _ => break,
                }
            }

            debug!(table, count = items.len(), "scanned table");
            Ok::<_, StoreError>(items)
        })
    }
}
