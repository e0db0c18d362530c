// 客户端配置
//
// 配置来源：
// - 环境变量（PLEX_URL / PLEX_TOKEN / PLEX_CONTAINER_SIZE / PLEX_TIMEOUT_SECS）
// - JSON 配置文件

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use url::Url;

use crate::error::{LibraryError, LibraryResult};

/// 默认分页大小（每次请求的条目数）
pub const DEFAULT_CONTAINER_SIZE: usize = 50;

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 媒体服务器客户端配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// 服务器地址，例如 `http://127.0.0.1:32400`
    pub base_url: String,

    /// 访问令牌，随每个请求以 `X-Plex-Token` 头发送
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// 分页大小，对应 `X-Plex-Container-Size`
    #[serde(default = "default_container_size")]
    pub container_size: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_container_size() -> usize {
    DEFAULT_CONTAINER_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:32400".to_string(),
            token: None,
            container_size: DEFAULT_CONTAINER_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// 从环境变量读取配置，未设置的字段使用默认值
    pub fn from_env() -> LibraryResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PLEX_URL") {
            config.base_url = url;
        }
        config.token = std::env::var("PLEX_TOKEN").ok().filter(|t| !t.is_empty());

        if let Ok(size) = std::env::var("PLEX_CONTAINER_SIZE") {
            config.container_size = size
                .parse()
                .map_err(|_| LibraryError::Config(format!("invalid PLEX_CONTAINER_SIZE: {}", size)))?;
        }
        if let Ok(secs) = std::env::var("PLEX_TIMEOUT_SECS") {
            config.timeout_secs = secs
                .parse()
                .map_err(|_| LibraryError::Config(format!("invalid PLEX_TIMEOUT_SECS: {}", secs)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载配置
    ///
    /// # 行为
    /// - 文件不存在：使用默认配置
    /// - 文件损坏：返回 `LibraryError::Config`
    pub async fn load(path: impl AsRef<Path>) -> LibraryResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).await?;
        let config: ClientConfig = serde_json::from_str(&content)
            .map_err(|e| LibraryError::Config(format!("corrupted config {:?}: {}", path, e)))?;
        config.validate()?;

        tracing::info!("Loaded client config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.container_size == 0 {
            return Err(LibraryError::Config("container_size must be positive".to_string()));
        }
        self.url()?;
        Ok(())
    }

    /// 解析后的服务器地址
    pub fn url(&self) -> LibraryResult<Url> {
        Ok(Url::parse(&self.base_url)?)
    }
}
