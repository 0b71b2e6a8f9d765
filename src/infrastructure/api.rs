//! GraphQL client for the remote build-config service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::infrastructure::traits::{ConfigApi, ConfigResponse};
use crate::infrastructure::ApiError;

const BUILD_CONFIG_QUERY: &str = r#"query ValidateConfig ($config: String!) {
  buildConfig(configYaml: $config) {
    valid,
    errors { message },
    sourceYaml,
    outputYaml
  }
}"#;

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Variables<'a>,
}

#[derive(Serialize)]
struct Variables<'a> {
    config: &'a str,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<Message>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    build_config: BuildConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildConfig {
    valid: bool,
    #[serde(default)]
    errors: Vec<Message>,
    source_yaml: Option<String>,
    output_yaml: Option<String>,
}

#[derive(Deserialize)]
struct Message {
    message: String,
}

/// Blocking HTTP client for `{host}/{endpoint}`.
#[derive(Debug)]
pub struct GraphqlConfigApi {
    url: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl GraphqlConfigApi {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            url: settings.graphql_url(),
            token: settings.token.clone(),
            client,
        })
    }
}

impl ConfigApi for GraphqlConfigApi {
    fn build_config(&self, config_yaml: &str) -> Result<ConfigResponse, ApiError> {
        debug!("build_config: url={}", self.url);
        let body = GraphqlRequest {
            query: BUILD_CONFIG_QUERY,
            variables: Variables {
                config: config_yaml,
            },
        };

        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().map_err(|source| ApiError::Request {
            url: self.url.clone(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let parsed: GraphqlResponse = response.json().map_err(|source| ApiError::Decode {
            url: self.url.clone(),
            source,
        })?;
        into_config_response(parsed)
    }
}

fn into_config_response(parsed: GraphqlResponse) -> Result<ConfigResponse, ApiError> {
    match parsed.data {
        Some(data) => {
            let build = data.build_config;
            Ok(ConfigResponse {
                valid: build.valid,
                source_yaml: build.source_yaml,
                output_yaml: build.output_yaml,
                errors: build.errors.into_iter().map(|m| m.message).collect(),
            })
        }
        None if !parsed.errors.is_empty() => Err(ApiError::Graphql(
            parsed.errors.into_iter().map(|m| m.message).collect(),
        )),
        None => Err(ApiError::NoData),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_invalid_build_config_when_decoding_then_collects_messages() {
        let raw = r#"{"data":{"buildConfig":{"valid":false,"errors":[{"message":"jobs: required"}],"sourceYaml":"x: 1","outputYaml":null}}}"#;
        let parsed: GraphqlResponse = serde_json::from_str(raw).unwrap();
        let response = into_config_response(parsed).unwrap();

        assert!(!response.valid);
        assert_eq!(response.errors, vec!["jobs: required".to_string()]);
        assert_eq!(response.source_yaml.as_deref(), Some("x: 1"));
        assert_eq!(response.output_yaml, None);
    }

    #[test]
    fn given_graphql_errors_without_data_when_decoding_then_err() {
        let raw = r#"{"data":null,"errors":[{"message":"unauthorized"},{"message":"try again"}]}"#;
        let parsed: GraphqlResponse = serde_json::from_str(raw).unwrap();

        let err = into_config_response(parsed).unwrap_err();
        assert!(matches!(&err, ApiError::Graphql(messages) if messages.len() == 2));
        assert_eq!(err.to_string(), "unauthorized; try again");
    }

    #[test]
    fn given_empty_response_when_decoding_then_no_data() {
        let parsed: GraphqlResponse = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(matches!(
            into_config_response(parsed),
            Err(ApiError::NoData)
        ));
    }

    #[test]
    fn given_settings_when_building_client_then_uses_configured_url() {
        let settings = Settings {
            host: "https://ci.example.com".into(),
            timeout_secs: 5,
            ..Settings::default()
        };

        let api = GraphqlConfigApi::new(&settings).unwrap();

        assert_eq!(api.url, settings.graphql_url());
    }

    #[test]
    fn given_request_body_when_encoding_then_carries_config_variable() {
        let body = GraphqlRequest {
            query: BUILD_CONFIG_QUERY,
            variables: Variables { config: "a: 1" },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["variables"]["config"], "a: 1");
        assert!(json["query"].as_str().unwrap().contains("buildConfig"));
    }
}
