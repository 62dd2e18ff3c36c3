//! 선물(USDⓈ-M / COIN-M) 공통 엔드포인트 파사드.
//!
//! 파사드는 경로와 파라미터 계약만 알고, 실제 서명/전송은 `RequestHandler`에 맡긴다.
//! 상품군별 차이는 `ProductConfig`와 `Rule` 목록으로 표현한다.

pub mod account;
pub mod market;
pub mod portfolio_margin;
pub mod user_data;

use std::sync::Arc;

use connector::{Credentials, HttpTransport, RequestHandler};
use interface::{
    ExchangeError, HttpMethod, ParameterSet, ProductConfig, ProductLine, ProxyConfig, Response,
};

pub use account::Account;
pub use market::Market;
pub use portfolio_margin::PortfolioMargin;
pub use user_data::UserData;

/// Common surface of every futures client.
pub trait FuturesClient {
    type Account<'a>
    where
        Self: 'a;

    fn market(&self) -> Market<'_>;
    fn account(&self) -> Self::Account<'_>;
    fn user_data(&self) -> UserData<'_>;

    /// Portfolio margin endpoints, when the product line offers them.
    fn portfolio_margin(&self) -> Option<PortfolioMargin<'_>> {
        None
    }
}

/// 파사드들이 공유하는 불변 설정: 핸들러, 상품 정보, limit usage 표시 여부.
#[derive(Debug, Clone)]
pub struct FuturesContext {
    handler: RequestHandler,
    product: ProductConfig,
    show_limit_usage: bool,
}

impl FuturesContext {
    pub fn new(handler: RequestHandler, product: ProductConfig, show_limit_usage: bool) -> Self {
        Self {
            handler,
            product,
            show_limit_usage,
        }
    }

    pub fn product(&self) -> &ProductConfig {
        &self.product
    }

    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    pub fn show_limit_usage(&self) -> bool {
        self.show_limit_usage
    }

    pub(crate) async fn public(
        &self,
        path: &str,
        params: ParameterSet,
        method: HttpMethod,
    ) -> Result<Response, ExchangeError> {
        self.handler
            .send_public_request(
                self.product.product_url(),
                path,
                params,
                method,
                self.show_limit_usage,
            )
            .await
    }

    pub(crate) async fn api_key(
        &self,
        path: &str,
        params: ParameterSet,
        method: HttpMethod,
    ) -> Result<Response, ExchangeError> {
        self.handler
            .send_api_key_request(
                self.product.product_url(),
                path,
                params,
                method,
                self.show_limit_usage,
            )
            .await
    }

    pub(crate) async fn signed(
        &self,
        path: &str,
        params: ParameterSet,
        method: HttpMethod,
    ) -> Result<Response, ExchangeError> {
        self.handler
            .send_signed_request(
                self.product.product_url(),
                path,
                params,
                method,
                self.show_limit_usage,
            )
            .await
    }
}

/// 선물 클라이언트 생성기. 설정은 `build` 시점에 고정된다.
#[derive(Default)]
pub struct FuturesClientBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    proxy: Option<ProxyConfig>,
    show_limit_usage: bool,
    recv_window: Option<u64>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl FuturesClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn credentials(mut self, api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(api_key, secret_key));
        self
    }

    /// API key only, for market and user-data-stream endpoints.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(api_key, ""));
        self
    }

    #[must_use]
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    #[must_use]
    pub fn show_limit_usage(mut self, show: bool) -> Self {
        self.show_limit_usage = show;
        self
    }

    #[must_use]
    pub fn recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = Some(recv_window);
        self
    }

    /// Replaces the reqwest transport; the proxy setting is then ignored.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub(crate) fn build_context(self, line: ProductLine) -> Result<FuturesContext, ExchangeError> {
        let product = match self.base_url {
            Some(base_url) => ProductConfig::new(line, base_url),
            None => ProductConfig::production(line),
        };

        let handler = match self.transport {
            Some(transport) => RequestHandler::with_transport(transport, self.credentials),
            // 잘못된 프록시 등 생성 시점 실패는 설정 오류다
            None => RequestHandler::new(self.credentials, self.proxy.as_ref())
                .map_err(|e| ExchangeError::Config(e.message))?,
        };
        let handler = match self.recv_window {
            Some(recv_window) => handler.with_recv_window(recv_window),
            None => handler,
        };

        Ok(FuturesContext::new(handler, product, self.show_limit_usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_proxy_is_config_error() {
        let err = FuturesClientBuilder::new()
            .proxy(ProxyConfig::new("bad host", 3128))
            .build_context(ProductLine::UsdMarginedFutures)
            .unwrap_err();

        assert!(matches!(err, ExchangeError::Config(_)), "got {err:?}");
        assert!(err.is_pre_flight());
    }

    #[test]
    fn test_valid_proxy_builds() {
        let ctx = FuturesClientBuilder::new()
            .proxy(ProxyConfig::new("127.0.0.1", 3128).with_auth("owl", "pw"))
            .build_context(ProductLine::CoinMarginedFutures)
            .unwrap();
        assert_eq!(ctx.product().product_url(), "https://dapi.binance.com/dapi");
    }
}
