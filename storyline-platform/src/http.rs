//! HTTP storefront client.
//!
//! Maps the engine's storefront operations onto the platform's admin
//! REST endpoints. The assignment update is a full replace (`PUT` with
//! the complete product id list); the flag update is one bulk `POST`.
//! Non-success responses surface the error body's `message` field when
//! the platform provides one.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use storyline_core::{ActivationStatus, ExternalId, Product, ProductId, Template, TemplateId};
use storyline_sync::{ClientError, StorefrontClient, StoryFlag};

use crate::config::PlatformConfig;
use crate::error::PlatformError;

/// Storefront client over the platform's admin API.
pub struct HttpStorefront {
    config: PlatformConfig,
    client: Client,
}

impl HttpStorefront {
    pub fn new(config: PlatformConfig) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .user_agent("storyline")
            .build()
            .map_err(PlatformError::Build)?;
        Ok(Self { config, client })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.config.token)
            .header("X-Storefront-Shop", &self.config.shop)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = self.authed(builder).send().await.map_err(transport)?;
        check_status(response).await
    }
}

#[async_trait]
impl StorefrontClient for HttpStorefront {
    async fn assign_products(
        &self,
        template_id: &TemplateId,
        product_ids: &[ProductId],
    ) -> Result<Template, ClientError> {
        let url = self.config.endpoint(&format!("story-templates/{template_id}"));
        tracing::debug!(template = %template_id, products = product_ids.len(), "replacing template assignment");
        let response = self
            .send(self.client.put(&url).json(&AssignProductsBody { product_ids }))
            .await?;
        let body: AssignProductsResponse = response.json().await.map_err(decode)?;
        Ok(body.template.into())
    }

    async fn set_story_flags(&self, entries: &[StoryFlag]) -> Result<(), ClientError> {
        if entries.is_empty() {
            // The platform treats an empty batch as a no-op; skip the
            // round-trip.
            return Ok(());
        }
        let url = self.config.endpoint("themes/update-metafields");
        tracing::debug!(entries = entries.len(), "updating story flags");
        let body = FlagBatchBody {
            products: entries
                .iter()
                .map(|entry| FlagDto {
                    id: entry.external_id.0,
                    story: entry.story,
                })
                .collect(),
        };
        let response = self.send(self.client.post(&url).json(&body)).await?;
        let body: FlagBatchResponse = response.json().await.map_err(decode)?;
        if !body.success {
            return Err(ClientError::Protocol(
                "platform reported an unsuccessful flag update".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<Template>, ClientError> {
        let url = self.config.endpoint("story-templates");
        let response = self.send(self.client.get(&url)).await?;
        let body: Vec<TemplateDto> = response.json().await.map_err(decode)?;
        Ok(body.into_iter().map(Template::from).collect())
    }

    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.config.endpoint("products");
        let response = self.send(self.client.get(&url)).await?;
        let body: Vec<ProductDto> = response.json().await.map_err(decode)?;
        body.into_iter().map(Product::try_from).collect()
    }

    async fn list_activation(&self) -> Result<HashMap<ExternalId, ActivationStatus>, ClientError> {
        let url = self.config.endpoint("platform-products");
        let response = self.send(self.client.get(&url)).await?;
        let body: PlatformProductList = response.json().await.map_err(decode)?;
        let mut activation = HashMap::new();
        for dto in body.products {
            match external_id_from_gid(&dto.id) {
                Some(id) => {
                    activation.insert(id, ActivationStatus::from_platform(&dto.status));
                }
                None => tracing::warn!(id = %dto.id, "unparseable platform product id"),
            }
        }
        Ok(activation)
    }
}

fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn decode(err: reqwest::Error) -> ClientError {
    ClientError::Protocol(err.to_string())
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message.unwrap_or_else(|| default_reason(status)),
        Err(_) => default_reason(status),
    };
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

fn default_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

/// Platform product ids arrive as gids (`gid://platform/Product/123`);
/// the numeric tail is the external id.
fn external_id_from_gid(id: &str) -> Option<ExternalId> {
    id.rsplit('/')
        .next()
        .and_then(|tail| tail.parse().ok())
        .map(ExternalId)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssignProductsBody<'a> {
    product_ids: &'a [ProductId],
}

#[derive(Debug, Deserialize)]
struct AssignProductsResponse {
    template: TemplateDto,
}

#[derive(Debug, Deserialize)]
struct TemplateDto {
    id: TemplateId,
    name: String,
    #[serde(default)]
    product_ids: Vec<ProductId>,
}

impl From<TemplateDto> for Template {
    fn from(dto: TemplateDto) -> Self {
        Template {
            id: dto.id,
            name: dto.name,
            baseline_product_ids: dto.product_ids,
        }
    }
}

#[derive(Debug, Serialize)]
struct FlagBatchBody {
    products: Vec<FlagDto>,
}

#[derive(Debug, Serialize)]
struct FlagDto {
    id: u64,
    story: bool,
}

#[derive(Debug, Deserialize)]
struct FlagBatchResponse {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct ProductDto {
    id: ProductId,
    source_id: SourceId,
    name: String,
    #[serde(default)]
    story_url: Option<String>,
}

/// The catalog serves `source_id` as a number or a numeric string
/// depending on the backing store; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SourceId {
    Number(u64),
    Text(String),
}

impl SourceId {
    fn into_external(self) -> Result<ExternalId, ClientError> {
        match self {
            SourceId::Number(n) => Ok(ExternalId(n)),
            SourceId::Text(s) => s
                .parse()
                .map(ExternalId)
                .map_err(|_| ClientError::Protocol(format!("non-numeric source id {s:?}"))),
        }
    }
}

impl TryFrom<ProductDto> for Product {
    type Error = ClientError;

    fn try_from(dto: ProductDto) -> Result<Self, Self::Error> {
        Ok(Product {
            id: dto.id,
            external_id: dto.source_id.into_external()?,
            name: dto.name,
            story_url: dto.story_url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PlatformProductList {
    #[serde(default)]
    products: Vec<PlatformProductDto>,
}

#[derive(Debug, Deserialize)]
struct PlatformProductDto {
    id: String,
    status: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_body_is_a_plain_id_list() {
        let ids = vec![ProductId::from("p1"), ProductId::from("p2")];
        let json = serde_json::to_string(&AssignProductsBody { product_ids: &ids })
            .expect("serialize");
        assert_eq!(json, r#"{"product_ids":["p1","p2"]}"#);
    }

    #[test]
    fn flag_batch_body_uses_external_numeric_ids() {
        let body = FlagBatchBody {
            products: vec![
                FlagDto {
                    id: 101,
                    story: true,
                },
                FlagDto {
                    id: 102,
                    story: false,
                },
            ],
        };
        let json = serde_json::to_string(&body).expect("serialize");
        assert_eq!(
            json,
            r#"{"products":[{"id":101,"story":true},{"id":102,"story":false}]}"#
        );
    }

    #[test]
    fn template_dto_tolerates_missing_product_ids() {
        let dto: TemplateDto =
            serde_json::from_str(r#"{"id":"t-1","name":"Spring"}"#).expect("deserialize");
        let template = Template::from(dto);
        assert!(template.baseline_product_ids.is_empty());

        let dto: TemplateDto = serde_json::from_str(
            r#"{"id":"t-2","name":"Clearance","product_ids":["p1"]}"#,
        )
        .expect("deserialize");
        assert_eq!(
            Template::from(dto).baseline_product_ids,
            vec![ProductId::from("p1")]
        );
    }

    #[test]
    fn product_dto_accepts_numeric_and_string_source_ids() {
        let dto: ProductDto = serde_json::from_str(
            r#"{"id":"p1","source_id":101,"name":"Socks"}"#,
        )
        .expect("deserialize");
        assert_eq!(Product::try_from(dto).expect("convert").external_id, ExternalId(101));

        let dto: ProductDto = serde_json::from_str(
            r#"{"id":"p2","source_id":"102","name":"Hat","story_url":"https://x.example/s"}"#,
        )
        .expect("deserialize");
        let product = Product::try_from(dto).expect("convert");
        assert_eq!(product.external_id, ExternalId(102));
        assert_eq!(product.story_url.as_deref(), Some("https://x.example/s"));
    }

    #[test]
    fn non_numeric_source_id_is_a_protocol_error() {
        let dto: ProductDto = serde_json::from_str(
            r#"{"id":"p3","source_id":"not-a-number","name":"Mug"}"#,
        )
        .expect("deserialize");
        assert!(matches!(
            Product::try_from(dto),
            Err(ClientError::Protocol(_))
        ));
    }

    #[test]
    fn external_id_parses_from_gid_or_bare_number() {
        assert_eq!(
            external_id_from_gid("gid://platform/Product/123"),
            Some(ExternalId(123))
        );
        assert_eq!(external_id_from_gid("456"), Some(ExternalId(456)));
        assert_eq!(external_id_from_gid("gid://platform/Product/abc"), None);
    }

    #[test]
    fn error_body_message_is_optional() {
        let body: ErrorBody = serde_json::from_str(r#"{}"#).expect("deserialize");
        assert!(body.message.is_none());
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"Failed to update metafields"}"#)
                .expect("deserialize");
        assert_eq!(body.message.as_deref(), Some("Failed to update metafields"));
    }

    #[test]
    fn flag_batch_response_defaults_to_unsuccessful() {
        let body: FlagBatchResponse = serde_json::from_str(r#"{}"#).expect("deserialize");
        assert!(!body.success);
        let body: FlagBatchResponse =
            serde_json::from_str(r#"{"success":true}"#).expect("deserialize");
        assert!(body.success);
    }
}
