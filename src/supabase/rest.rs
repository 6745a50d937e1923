//! `/rest/v1` endpoints

use async_trait::async_trait;
use serde_json::Value;

use super::{error_from_response, SupabaseClient};
use crate::db::{single_row_error, DataStore, Filter, Select};
use crate::error::BackendError;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

fn filter_param(filter: &Filter) -> (String, String) {
    (filter.column.clone(), format!("eq.{}", filter.value_text()))
}

impl SupabaseClient {
    fn table_url(&self, table: &str) -> String {
        self.endpoint(&format!("/rest/v1/{}", table))
    }
}

#[async_trait]
impl DataStore for SupabaseClient {
    async fn select(&self, query: &Select) -> Result<Vec<Value>, BackendError> {
        let mut params = vec![("select".to_string(), query.columns.replace(' ', ""))];
        params.extend(query.filters.iter().map(filter_param));
        if let Some(order) = &query.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }

        let mut request = self
            .http
            .get(self.table_url(&query.table))
            .headers(self.auth_headers())
            .query(&params);
        if query.single {
            request = request.header("Accept", SINGLE_OBJECT);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        match response.json::<Value>().await? {
            Value::Array(rows) if !query.single => Ok(rows),
            Value::Array(rows) => Err(single_row_error(rows.len())),
            row @ Value::Object(_) => Ok(vec![row]),
            other => Err(BackendError::new(format!("Unexpected response body: {}", other))),
        }
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), BackendError> {
        let response = self
            .http
            .post(self.table_url(table))
            .headers(self.auth_headers())
            .header("Prefer", "return=minimal")
            .json(&Value::Array(rows))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    async fn update(&self, table: &str, values: Value, filter: &Filter) -> Result<(), BackendError> {
        let response = self
            .http
            .patch(self.table_url(table))
            .headers(self.auth_headers())
            .header("Prefer", "return=minimal")
            .query(&[filter_param(filter)])
            .json(&values)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), BackendError> {
        let response = self
            .http
            .delete(self.table_url(table))
            .headers(self.auth_headers())
            .query(&[filter_param(filter)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}
