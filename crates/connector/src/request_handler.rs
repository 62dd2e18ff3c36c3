use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use interface::{
    ConnectorError, ExchangeError, HttpMethod, ParameterSet, ProxyConfig, Response, SecurityType,
    ValidationError,
};
use reqwest::header::HeaderValue;
use tracing::{debug, trace};

use crate::checker::{check_finite_values, check_reserved_parameters};
use crate::query;
use crate::response::handle_response;
use crate::signer::Credentials;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";
pub const DEFAULT_RECV_WINDOW: u64 = 5_000;

/// 서명 요청에서 커넥터가 직접 채우는 파라미터
const SIGNATURE_PARAM: &str = "signature";

/// 현재 시각 (epoch 밀리초)
pub fn get_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// 호출 한 번에 대한 요청 명세. 디스패치 후 버려진다.
#[derive(Debug, Clone)]
pub struct RequestSpec<'a> {
    pub product_url: &'a str,
    pub path: &'a str,
    pub method: HttpMethod,
    pub params: ParameterSet,
    pub security: SecurityType,
}

/// 요청 서명 및 전송. 불변 설정만 들고 있으므로 하나의 핸들러를 여러 태스크가 공유한다.
#[derive(Clone)]
pub struct RequestHandler {
    transport: Arc<dyn HttpTransport>,
    credentials: Option<Credentials>,
    recv_window: u64,
}

impl fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("credentials", &self.credentials)
            .field("recv_window", &self.recv_window)
            .finish_non_exhaustive()
    }
}

impl RequestHandler {
    /// reqwest 커넥션 풀 위의 핸들러. `proxy`가 있으면 그쪽으로 보낸다.
    pub fn new(
        credentials: Option<Credentials>,
        proxy: Option<&ProxyConfig>,
    ) -> Result<Self, ConnectorError> {
        let transport = ReqwestTransport::new(proxy)?;
        Ok(Self::with_transport(Arc::new(transport), credentials))
    }

    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            transport,
            credentials,
            recv_window: DEFAULT_RECV_WINDOW,
        }
    }

    /// recvWindow가 없는 서명 요청에 넣을 기본값
    #[must_use]
    pub fn with_recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = recv_window;
        self
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn recv_window(&self) -> u64 {
        self.recv_window
    }

    /// 인증 없는 요청 (시세 등)
    pub async fn send_public_request(
        &self,
        product_url: &str,
        path: &str,
        params: ParameterSet,
        method: HttpMethod,
        show_limit_usage: bool,
    ) -> Result<Response, ExchangeError> {
        self.dispatch(
            RequestSpec {
                product_url,
                path,
                method,
                params,
                security: SecurityType::Public,
            },
            show_limit_usage,
        )
        .await
    }

    /// API 키 헤더만 붙이고 서명하지 않는 요청 (listenKey 관리 등)
    pub async fn send_api_key_request(
        &self,
        product_url: &str,
        path: &str,
        params: ParameterSet,
        method: HttpMethod,
        show_limit_usage: bool,
    ) -> Result<Response, ExchangeError> {
        self.dispatch(
            RequestSpec {
                product_url,
                path,
                method,
                params,
                security: SecurityType::ApiKey,
            },
            show_limit_usage,
        )
        .await
    }

    /// timestamp/recvWindow를 주입하고 서명한 요청
    pub async fn send_signed_request(
        &self,
        product_url: &str,
        path: &str,
        params: ParameterSet,
        method: HttpMethod,
        show_limit_usage: bool,
    ) -> Result<Response, ExchangeError> {
        self.dispatch(
            RequestSpec {
                product_url,
                path,
                method,
                params,
                security: SecurityType::Signed,
            },
            show_limit_usage,
        )
        .await
    }

    async fn dispatch(
        &self,
        spec: RequestSpec<'_>,
        show_limit_usage: bool,
    ) -> Result<Response, ExchangeError> {
        // timestamp는 전송 직전에 찍는다
        let request = self.prepare(spec, get_timestamp())?;
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "response received");
        handle_response(response, show_limit_usage)
    }

    /// `spec`으로 실제 전송할 요청을 만든다. 네트워크에 닿지 않으며,
    /// `timestamp`는 서명 요청에만 쓰인다.
    pub fn prepare(
        &self,
        spec: RequestSpec<'_>,
        timestamp: i64,
    ) -> Result<HttpRequest, ValidationError> {
        let credentials = self.require_credentials(spec.security)?;
        let mut params = spec.params;
        check_finite_values(&params)?;
        if spec.security == SecurityType::Signed {
            check_reserved_parameters(&params, &[SIGNATURE_PARAM])?;
        }

        let query = match (spec.security, credentials) {
            (SecurityType::Signed, Some(credentials)) => {
                params.insert("timestamp", timestamp);
                params.insert_if_absent("recvWindow", self.recv_window);
                let payload = query::encode(&params);
                let signature = credentials.sign(&payload);
                query::append_signature(&payload, &signature)
            }
            _ => query::encode(&params),
        };

        let mut url = format!("{}{}", spec.product_url, spec.path);
        debug!(
            method = %spec.method,
            url = %url,
            security = ?spec.security,
            "dispatching request"
        );
        trace!(query = %query, "canonical query");

        let body = if spec.method.uses_body() {
            (!query.is_empty()).then_some(query)
        } else {
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }
            None
        };

        let headers = match credentials {
            Some(credentials) => vec![(API_KEY_HEADER.to_string(), credentials.api_key().to_string())],
            None => Vec::new(),
        };

        Ok(HttpRequest {
            method: spec.method,
            url,
            headers,
            body,
        })
    }

    /// `security`에 필요한 인증 정보. 공개 요청이면 `None`
    fn require_credentials(
        &self,
        security: SecurityType,
    ) -> Result<Option<&Credentials>, ValidationError> {
        if !security.needs_api_key() {
            return Ok(None);
        }

        let credentials = self
            .credentials
            .as_ref()
            .filter(|c| c.has_api_key())
            .ok_or(ValidationError::MissingCredentials("API key"))?;

        // 헤더로 보낼 수 없는 키는 전송 계층까지 가기 전에 거른다
        if HeaderValue::from_str(credentials.api_key()).is_err() {
            return Err(ValidationError::InvalidCredentials("API key"));
        }

        if security == SecurityType::Signed && !credentials.has_secret_key() {
            return Err(ValidationError::MissingCredentials("secret key"));
        }

        Ok(Some(credentials))
    }
}
