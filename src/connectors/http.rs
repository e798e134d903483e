use async_trait::async_trait;
use reqwest::Client;
use crate::config::HttpConfig;
use crate::connectors::UpstreamClient;
use crate::error::{Error, Result};

pub struct HttpConnector {
    client: Client,
}

impl HttpConnector {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(HttpConnector { client })
    }
}

#[async_trait]
impl UpstreamClient for HttpConnector {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        // query values may carry credentials; only the bare url is logged
        tracing::debug!(url, params = query.len(), "GET upstream");

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(url, bytes = bytes.len(), "upstream responded");
        Ok(bytes.to_vec())
    }
}
