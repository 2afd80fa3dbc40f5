//! Fusion REST API client
//!
//! Maps the engine's scopes onto the nested collection URLs of the API:
//!
//! ```text
//! /api/1.1/regions/{region}
//!         /availability-zones/{zone}
//!         /network-interface-groups/{group}
//!         /storage-endpoints/{endpoint}
//!         /arrays/{array}/network-interfaces/{interface}
//! /api/1.1/operations/{id}
//! ```

use crate::config::ClientConfig;
use crate::error::{HttpError, Result};
use async_trait::async_trait;
use fusionflow_cloud::{
    ApiError, ApiResult, CreateRequest, FusionApi, NetworkInterface, Operation, Patch,
    RemoteResource, ResourceKey, ResourceKind, Scope, is_name_reserved_code,
};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const API_VERSION: &str = "1.1";

/// REST implementation of [`FusionApi`]
pub struct FusionClient {
    client: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl FusionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            HttpError::InvalidConfig(format!("invalid API host '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HttpError::InvalidConfig(format!(
                "API host '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(["api", API_VERSION])
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> ApiResult<reqwest::Response> {
        debug!(%method, %url, "Sending request");

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status = %response.status(), "Received response");
        Ok(response)
    }

    /// Submit a mutating request and decode the operation handle
    async fn mutate(
        &self,
        method: Method,
        url: Url,
        body: serde_json::Value,
        name: &str,
    ) -> ApiResult<Operation> {
        let response = self.send(method, url, Some(&body)).await?;
        if response.status().is_success() {
            return decode(response).await;
        }

        match rejection(response).await {
            ApiError::Rejected { status, code, .. }
                if status == StatusCode::CONFLICT.as_u16()
                    || code.as_deref().is_some_and(is_name_reserved_code) =>
            {
                Err(ApiError::NameReserved(name.to_string()))
            }
            other => Err(other),
        }
    }
}

#[async_trait]
impl FusionApi for FusionClient {
    async fn create(&self, parent: &Scope, request: &CreateRequest) -> ApiResult<Operation> {
        let url = self.url(&collection_path(request.kind(), parent)?)?;
        let body = encode(request)?;
        self.mutate(Method::POST, url, body, request.name()).await
    }

    async fn update(&self, target: &ResourceKey, patch: &Patch) -> ApiResult<Operation> {
        let url = self.url(&resource_path(target)?)?;
        let body = encode(patch)?;
        self.mutate(Method::PATCH, url, body, &target.name).await
    }

    async fn get(&self, key: &ResourceKey) -> ApiResult<Option<RemoteResource>> {
        let url = self.url(&resource_path(key)?)?;
        let response = self.send(Method::GET, url, None).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => decode(response).await.map(Some),
            _ => Err(rejection(response).await),
        }
    }

    async fn list_network_interfaces(&self, array: &Scope) -> ApiResult<Vec<NetworkInterface>> {
        let url = self.url(&collection_path(ResourceKind::NetworkInterface, array)?)?;
        let response = self.send(Method::GET, url, None).await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let list: NetworkInterfaceList = decode(response).await?;
        Ok(list.items)
    }

    async fn get_operation(&self, id: &str) -> ApiResult<Operation> {
        let url = self.url(&["operations", id])?;
        let response = self.send(Method::GET, url, None).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(format!("operation {}", id))),
            status if status.is_success() => decode(response).await,
            _ => Err(rejection(response).await),
        }
    }
}

/// Path segments of the collection holding resources of `kind` under `parent`
fn collection_path(kind: ResourceKind, parent: &Scope) -> ApiResult<Vec<&str>> {
    let segments = match (kind, parent) {
        (ResourceKind::Region, Scope::Global) => vec!["regions"],
        (ResourceKind::AvailabilityZone, Scope::Region { region }) => {
            vec!["regions", region.as_str(), "availability-zones"]
        }
        (
            ResourceKind::NetworkInterfaceGroup
            | ResourceKind::StorageEndpoint
            | ResourceKind::Array,
            Scope::AvailabilityZone {
                region,
                availability_zone,
            },
        ) => vec![
            "regions",
            region.as_str(),
            "availability-zones",
            availability_zone.as_str(),
            match kind {
                ResourceKind::NetworkInterfaceGroup => "network-interface-groups",
                ResourceKind::StorageEndpoint => "storage-endpoints",
                _ => "arrays",
            },
        ],
        (
            ResourceKind::NetworkInterface,
            Scope::Array {
                region,
                availability_zone,
                array,
            },
        ) => vec![
            "regions",
            region.as_str(),
            "availability-zones",
            availability_zone.as_str(),
            "arrays",
            array.as_str(),
            "network-interfaces",
        ],
        _ => {
            return Err(ApiError::Unaddressable {
                kind,
                scope: parent.clone(),
            });
        }
    };
    Ok(segments)
}

fn resource_path(key: &ResourceKey) -> ApiResult<Vec<&str>> {
    let mut segments = collection_path(key.kind, &key.parent)?;
    segments.push(&key.name);
    Ok(segments)
}

fn encode<T: serde::Serialize>(body: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::InvalidResponse(format!("could not encode request: {}", e)))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    response
        .json()
        .await
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Turn a non-success response into an [`ApiError`]
async fn rejection(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody::Wrapped { error }) | Ok(ErrorBody::Bare(error)) => error,
        Err(_) => ErrorDetail::default(),
    };

    let message = detail
        .message
        .or_else(|| (!text.is_empty()).then(|| text.clone()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("no message").to_string());

    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound(message);
    }
    ApiError::Rejected {
        status: status.as_u16(),
        code: detail.pure_code,
        message,
    }
}

// ============ API Types ============

/// Collection body; `items` is omitted when the array has no interfaces
#[derive(Debug, Deserialize)]
struct NetworkInterfaceList {
    #[serde(default)]
    items: Vec<NetworkInterface>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Wrapped { error: ErrorDetail },
    Bare(ErrorDetail),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    pure_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
