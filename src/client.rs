use crate::{
    api_error::ErrorBody,
    eligibility::models::{EligibilityResult, RootResponse},
};
use alloy::primitives::Address;
use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use tracing::info;

/// HTTP client for a running eligibility service.
#[derive(Debug, Clone)]
pub struct EligibilityClient {
    client: Client,
    base_url: String,
}

impl EligibilityClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn check(&self, account: Address) -> Result<EligibilityResult> {
        info!("Checking eligibility for {}", account);
        let response = self
            .client
            .get(format!("{}/eligibility", self.base_url))
            .query(&[("address", alloy::hex::encode_prefixed(account))])
            .send()
            .await
            .context("Failed to send eligibility request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .json::<ErrorBody>()
                .await
                .with_context(|| {
                    format!("Eligibility check failed ({status}) with an unreadable body")
                })?;
            return Err(anyhow!("Eligibility check failed ({status}): {}", body.error));
        }

        response
            .json::<EligibilityResult>()
            .await
            .context("Failed to deserialize eligibility response")
    }

    pub async fn root(&self) -> Result<RootResponse> {
        self.client
            .get(format!("{}/root", self.base_url))
            .send()
            .await
            .context("Failed to send root request")?
            .error_for_status()
            .context("Root request failed")?
            .json::<RootResponse>()
            .await
            .context("Failed to deserialize root response")
    }
}
