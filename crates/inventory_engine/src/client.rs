use std::time::Duration;

use futures_util::StreamExt;
use inventory_core::{Category, NewProduct, Product, ProductId};
use inventory_logging::{log_debug, log_trace};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the backend; `/produits` etc. are resolved against it.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Backend operations used by the inventory view.
#[async_trait::async_trait]
pub trait InventoryApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Name search; matching rules belong to the server.
    async fn search(&self, nom: &str) -> Result<Vec<Product>, ApiError>;

    async fn add_product(&self, product: &NewProduct) -> Result<(), ApiError>;

    /// Asks the server to apply `quantite += delta`.
    async fn apply_delta(&self, id: ProductId, delta: i64) -> Result<(), ApiError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeltaBody {
    delta: i64,
}

#[derive(Debug, Clone)]
pub struct ReqwestInventoryApi {
    client: reqwest::Client,
    base_url: Url,
    max_bytes: u64,
}

impl ReqwestInventoryApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let body = self.send(Method::GET, url, None).await?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<(), ApiError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(FailureKind::Encode, err.to_string()))?;
        self.send(method, url, Some(payload)).await.map(|_| ())
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        payload: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ApiError> {
        log_debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        if !status.is_success() {
            // The status alone decides the failure; the body only adds a message.
            let server_message = match self.read_body(response).await {
                Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes)
                    .ok()
                    .and_then(|body| body.error),
                Err(err) => {
                    log_debug!("error body dropped: {}", err);
                    None
                }
            };
            return Err(ApiError::new(
                FailureKind::HttpStatus {
                    status: status.as_u16(),
                    server_message,
                },
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        log_trace!("status={} body_len={}", status, bytes.len());
        Ok(bytes)
    }

    /// Reads the body chunk by chunk, giving up as soon as it passes `max_bytes`.
    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    fn too_large(&self, actual: u64) -> ApiError {
        ApiError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl InventoryApi for ReqwestInventoryApi {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint("categories")?;
        self.get_json(url).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint("produits")?;
        self.get_json(url).await
    }

    async fn search(&self, nom: &str) -> Result<Vec<Product>, ApiError> {
        let mut url = self.endpoint("recherche")?;
        url.query_pairs_mut().append_pair("nom", nom);
        self.get_json(url).await
    }

    async fn add_product(&self, product: &NewProduct) -> Result<(), ApiError> {
        let url = self.endpoint("produits")?;
        self.send_json(Method::POST, url, product).await
    }

    async fn apply_delta(&self, id: ProductId, delta: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("produits/{id}"))?;
        self.send_json(Method::PUT, url, &DeltaBody { delta }).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("produits/{id}"))?;
        self.send(Method::DELETE, url, None).await.map(|_| ())
    }
}

/// Parses the backend root, forcing a trailing slash so relative joins keep
/// any path prefix (`http://host/api` + `produits` = `http://host/api/produits`).
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url =
        Url::parse(raw).map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("{raw} cannot be used as a base url"),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
