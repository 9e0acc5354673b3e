use crate::{
    config::Config,
    constants,
    error::{AppError, Result},
    models::{Descriptor, StorageProtocol},
};
use std::time::Duration;

/// Resolves storage-protocol-tagged locations and content-addressed URIs to
/// off-chain JSON descriptors. Descriptors are cosmetic, so every failure
/// here degrades to `None` after a debug log.
pub struct MetadataResolver {
    client: reqwest::Client,
    ipfs_gateway: String,
    arweave_gateway: String,
}

impl MetadataResolver {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(config.metadata_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Metadata HTTP client init failed: {}", e)))?;

        Ok(Self {
            client,
            ipfs_gateway: config.ipfs_gateway_url.clone(),
            arweave_gateway: config.arweave_gateway_url.clone(),
        })
    }

    /// Gateway URL for a protocol-tagged location. A `None` protocol hosts
    /// nothing, so no URL exists.
    pub fn location_url(&self, location: &str, protocol: StorageProtocol) -> Option<String> {
        match protocol {
            StorageProtocol::Ipfs => Some(format!("{}{}", self.ipfs_gateway, location)),
            StorageProtocol::Arweave => Some(format!("{}{}", self.arweave_gateway, location)),
            StorageProtocol::None => None,
        }
    }

    pub async fn resolve(&self, location: &str, protocol: StorageProtocol) -> Option<Descriptor> {
        let url = self.location_url(location, protocol)?;
        self.fetch_descriptor(&url).await
    }

    /// Resolves a raw URI (`ipfs://`, `ar://`, or plain http) the same way.
    pub async fn resolve_uri(&self, uri: &str) -> Option<Descriptor> {
        let url = self.normalize_uri(uri)?;
        self.fetch_descriptor(&url).await
    }

    /// Rewrites content-addressed schemes to gateway URLs; anything else
    /// passes through unchanged.
    pub fn normalize_uri(&self, uri: &str) -> Option<String> {
        if uri.is_empty() {
            return None;
        }
        if let Some(rest) = uri.strip_prefix(constants::IPFS_URI_SCHEME) {
            return Some(format!("{}{}", self.ipfs_gateway, rest));
        }
        if let Some(rest) = uri.strip_prefix(constants::ARWEAVE_URI_SCHEME) {
            return Some(format!("{}{}", self.arweave_gateway, rest));
        }
        Some(uri.to_string())
    }

    /// Artwork URL from a descriptor's `image`, falling back to
    /// `image_url`, gateway-rewritten.
    pub fn image_url_of(&self, descriptor: &Descriptor) -> Option<String> {
        let raw = descriptor
            .image
            .as_deref()
            .or(descriptor.image_url.as_deref())?;
        self.normalize_uri(raw)
    }

    async fn fetch_descriptor(&self, url: &str) -> Option<Descriptor> {
        match self.fetch_json(url).await {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                tracing::debug!("Descriptor fetch failed for {}: {}", url, e);
                None
            }
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Descriptor> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Gateway request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalAPI(format!(
                "Gateway returned {}",
                response.status()
            )));
        }

        response
            .json::<Descriptor>()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Descriptor decode failed: {}", e)))
    }
}
