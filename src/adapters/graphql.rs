use crate::domain::model::QueryResult;
use crate::domain::ports::LaunchSource;
use crate::utils::error::{LaunchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://spacex-production.up.railway.app/";

pub const LAUNCHES_QUERY: &str = r#"query getLaunches {
  launches {
    id
    mission_id
    mission_name
    launch_date_local
    launch_site {
      site_name
    }
    rocket {
      rocket_name
    }
    details
  }
}"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<QueryResult>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// Fetches every launch with a single POST. No retries.
#[derive(Debug, Clone)]
pub struct GraphQlLaunchSource {
    client: Client,
    endpoint: String,
}

impl GraphQlLaunchSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LaunchSource for GraphQlLaunchSource {
    async fn fetch_launches(&self) -> Result<QueryResult> {
        tracing::debug!("Sending launches query to: {}", self.endpoint);

        let request = GraphQlRequest {
            query: LAUNCHES_QUERY,
            operation_name: "getLaunches",
        };
        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        tracing::debug!("GraphQL response status: {}", status);

        if !status.is_success() {
            return Err(LaunchError::HttpStatusError {
                status: status.as_u16(),
                endpoint: self.endpoint.clone(),
            });
        }

        let body: GraphQlResponse = response.json().await?;

        // Apollo 預設的 errorPolicy：有錯誤就視為失敗
        if !body.errors.is_empty() {
            let message = body
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(LaunchError::GraphQlError { message });
        }

        let data = body.data.ok_or_else(|| LaunchError::GraphQlError {
            message: "response contained no data".to_string(),
        })?;

        tracing::debug!("Received {} launches", data.launches.len());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn launches_body() -> serde_json::Value {
        serde_json::json!({
            "data": {
                "launches": [
                    {
                        "id": "5eb87d46ffd86e000604b388",
                        "mission_id": ["EE86F74"],
                        "mission_name": "CRS-20",
                        "launch_date_local": "2020-03-06T23:50:00-05:00",
                        "launch_site": { "site_name": "CCAFS SLC 40" },
                        "rocket": { "rocket_name": "Falcon 9" },
                        "details": null
                    },
                    {
                        "id": "5eb87cd9ffd86e000604b32a",
                        "mission_id": [],
                        "mission_name": "FalconSat",
                        "launch_date_local": "2006-03-25T10:30:00+12:00",
                        "launch_site": { "site_name": "Kwajalein Atoll" },
                        "rocket": { "rocket_name": "Falcon 1" },
                        "details": "Engine failure at 33 seconds and loss of vehicle"
                    }
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_launches_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/")
                .body_contains("getLaunches")
                .body_contains("launch_date_local");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(launches_body());
        });

        let source = GraphQlLaunchSource::new(server.url("/"));
        let result = source.fetch_launches().await.unwrap();

        api_mock.assert();
        assert_eq!(result.launches.len(), 2);
        assert_eq!(result.launches[0].mission_name(), "CRS-20");
        assert_eq!(result.launches[1].site_name(), "Kwajalein Atoll");
    }

    #[tokio::test]
    async fn test_fetch_launches_http_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(502);
        });

        let source = GraphQlLaunchSource::new(server.url("/"));
        let err = source.fetch_launches().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, LaunchError::HttpStatusError { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_fetch_launches_graphql_errors() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "data": null,
                    "errors": [{ "message": "Cannot query field \"launches\"" }]
                }));
        });

        let source = GraphQlLaunchSource::new(server.url("/"));
        let err = source.fetch_launches().await.unwrap_err();

        api_mock.assert();
        match err {
            LaunchError::GraphQlError { message } => assert!(message.contains("launches")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_launches_missing_data() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({}));
        });

        let source = GraphQlLaunchSource::new(server.url("/"));
        assert!(matches!(
            source.fetch_launches().await,
            Err(LaunchError::GraphQlError { .. })
        ));
    }
}
