use std::time::Duration;

use tokio::task::JoinHandle;

use crate::configs::Gateway;
use crate::errors::ControlError;

/// Heating-enable switch on the gateway.
#[derive(Clone)]
pub struct HeatingControl {
    http: reqwest::Client,
    base_url: String,
}

impl HeatingControl {
    pub fn new(gateway: &Gateway) -> Result<Self, ControlError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: gateway.http_url(),
        })
    }

    pub fn endpoint(&self, enable: bool) -> String {
        format!("{}/heating-{}", self.base_url, enable)
    }

    /// Sends the request and waits for it. The response body is ignored.
    pub async fn set_heating(&self, enable: bool) -> Result<(), ControlError> {
        let url = self.endpoint(enable);
        tracing::debug!("{}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::warn!("Gateway answered {} to {}", response.status(), url);
        }

        Ok(())
    }

    /// Fire and forget.
    pub fn toggle(&self, enable: bool) -> JoinHandle<()> {
        let control = self.clone();

        tokio::spawn(async move {
            if let Err(e) = control.set_heating(enable).await {
                tracing::warn!("Failed to set heating to {}: {}", enable, e);
            }
        })
    }
}
