use async_trait::async_trait;
use interface::{ConnectorError, HttpMethod, ProxyConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 전송 직전의 완성된 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// 원본 응답. 헤더 이름은 소문자다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// 요청 한 번을 실제로 보내는 전송 계층. 재시도하지 않는다.
///
/// 구현체는 여러 태스크에서 동시에 호출될 수 있어야 한다.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ConnectorError>;
}

/// reqwest 기반 전송 계층. 커넥션 풀은 reqwest가 관리한다.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(proxy: Option<&ProxyConfig>) -> Result<Self, ConnectorError> {
        let mut builder = reqwest::Client::builder();

        match proxy {
            Some(proxy_config) => {
                let mut proxy = reqwest::Proxy::all(proxy_config.url())
                    .map_err(|e| ConnectorError::new(format!("invalid proxy: {e}")))?;
                if let Some(auth) = &proxy_config.auth {
                    proxy = proxy.basic_auth(&auth.username, &auth.password);
                }
                builder = builder.proxy(proxy);
            }
            // only an explicitly configured proxy is used, never the environment's
            None => builder = builder.no_proxy(),
        }

        let http = builder
            .build()
            .map_err(|e| ConnectorError::new(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn to_header_map(headers: &[(String, String)]) -> Result<HeaderMap, ConnectorError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ConnectorError::new(format!("invalid header name {name}: {e}")))?;
        // Header values are never echoed: the API key lives here.
        let value = HeaderValue::from_str(value)
            .map_err(|_| ConnectorError::new(format!("invalid value for header {name}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ConnectorError> {
        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &request.url)
            .headers(to_header_map(&request.headers)?);

        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
