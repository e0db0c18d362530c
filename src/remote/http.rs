use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::{xml, Element, LibraryRemote};
use crate::config::ClientConfig;
use crate::error::{LibraryError, LibraryResult};

/// 基于 reqwest 的媒体服务器客户端
#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpRemote {
    pub fn new(config: &ClientConfig) -> LibraryResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        // 保证以 `/` 结尾，拼接时保留地址中的路径前缀
        let mut base_url = config.url()?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// 将请求路径（可带查询串）拼接到服务器地址上
    pub fn url_for(&self, path: &str) -> LibraryResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl LibraryRemote for HttpRemote {
    async fn query(&self, path: &str) -> LibraryResult<Vec<Element>> {
        let url = self.url_for(path)?;
        tracing::debug!("GET {}", path);

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/xml");
        if let Some(ref token) = self.token {
            request = request.header("X-Plex-Token", token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(LibraryError::Transport(format!(
                "{} returned HTTP {}",
                path,
                response.status()
            )));
        }

        let body = response.text().await?;
        xml::parse_container(&body)
    }
}
