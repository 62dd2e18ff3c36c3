use std::{env, fmt};

use interface::{ExchangeError, ProxyConfig};

use crate::futures::FuturesClientBuilder;

pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";
pub const BASE_URL_VAR: &str = "BINANCE_BASE_URL";
pub const PROXY_HOST_VAR: &str = "BINANCE_PROXY_HOST";
pub const PROXY_PORT_VAR: &str = "BINANCE_PROXY_PORT";
pub const PROXY_USERNAME_VAR: &str = "BINANCE_PROXY_USERNAME";
pub const PROXY_PASSWORD_VAR: &str = "BINANCE_PROXY_PASSWORD";
pub const SHOW_LIMIT_USAGE_VAR: &str = "BINANCE_SHOW_LIMIT_USAGE";
pub const RECV_WINDOW_VAR: &str = "BINANCE_RECV_WINDOW";

/// 환경변수에서 읽은 클라이언트 설정. 값이 없으면 공개 API만 쓰는 기본 설정이 된다.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: Option<String>,
    pub proxy: Option<ProxyConfig>,
    pub show_limit_usage: bool,
    pub recv_window: Option<u64>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy)
            .field("show_limit_usage", &self.show_limit_usage)
            .field("recv_window", &self.recv_window)
            .finish()
    }
}

impl ClientConfig {
    /// 프로세스 환경변수에서 읽는다. `.env` 로딩은 호출하는 쪽 책임이다.
    pub fn from_env() -> Result<Self, ExchangeError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExchangeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 빈 문자열은 설정되지 않은 것으로 본다
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let proxy = match var(PROXY_HOST_VAR) {
            Some(host) => {
                let port = var(PROXY_PORT_VAR)
                    .ok_or_else(|| {
                        ExchangeError::Config(format!("{PROXY_PORT_VAR} is required with {PROXY_HOST_VAR}"))
                    })?
                    .parse::<u16>()
                    .map_err(|e| ExchangeError::Config(format!("{PROXY_PORT_VAR}: {e}")))?;
                let proxy = ProxyConfig::new(host, port);
                match (var(PROXY_USERNAME_VAR), var(PROXY_PASSWORD_VAR)) {
                    (Some(username), Some(password)) => Some(proxy.with_auth(username, password)),
                    (None, None) => Some(proxy),
                    _ => {
                        return Err(ExchangeError::Config(format!(
                            "{PROXY_USERNAME_VAR} and {PROXY_PASSWORD_VAR} must be set together"
                        )))
                    }
                }
            }
            None => None,
        };

        let show_limit_usage = match var(SHOW_LIMIT_USAGE_VAR) {
            Some(v) => parse_flag(&v)
                .ok_or_else(|| ExchangeError::Config(format!("{SHOW_LIMIT_USAGE_VAR}: invalid flag {v:?}")))?,
            None => false,
        };

        let recv_window = var(RECV_WINDOW_VAR)
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|e| ExchangeError::Config(format!("{RECV_WINDOW_VAR}: {e}")))
            })
            .transpose()?;

        Ok(Self {
            api_key: var(API_KEY_VAR),
            api_secret: var(API_SECRET_VAR),
            base_url: var(BASE_URL_VAR),
            proxy,
            show_limit_usage,
            recv_window,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }

    /// Builder carrying every configured value.
    pub fn builder(&self) -> FuturesClientBuilder {
        let mut builder = FuturesClientBuilder::new().show_limit_usage(self.show_limit_usage);

        builder = match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => builder.credentials(key.as_str(), secret.as_str()),
            (Some(key), None) => builder.api_key(key.as_str()),
            _ => builder,
        };
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.as_str());
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.clone());
        }
        if let Some(recv_window) = self.recv_window {
            builder = builder.recv_window(recv_window);
        }
        builder
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
