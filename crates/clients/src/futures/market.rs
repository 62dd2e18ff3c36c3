use connector::{validate, ParamType, Rule};
use interface::{ExchangeError, HttpMethod, ParameterSet, Response};

use super::FuturesContext;

const PING: &str = "/v1/ping";
const TIME: &str = "/v1/time";
const EXCHANGE_INFO: &str = "/v1/exchangeInfo";
const DEPTH: &str = "/v1/depth";
const TRADES: &str = "/v1/trades";
const HISTORICAL_TRADES: &str = "/v1/historicalTrades";
const AGG_TRADES: &str = "/v1/aggTrades";
const KLINES: &str = "/v1/klines";
const MARK_PRICE: &str = "/v1/premiumIndex";
const FUNDING_RATE: &str = "/v1/fundingRate";
const TICKER_24H: &str = "/v1/ticker/24hr";
const TICKER_PRICE: &str = "/v1/ticker/price";
const BOOK_TICKER: &str = "/v1/ticker/bookTicker";
const OPEN_INTEREST: &str = "/v1/openInterest";

pub(crate) const KLINE_INTERVALS: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

const SYMBOL: Rule = Rule::Required("symbol", ParamType::String);

const DEPTH_RULES: &[Rule] = &[
    SYMBOL,
    Rule::Allowed("limit", &["5", "10", "20", "50", "100", "500", "1000"]),
];
const TRADES_RULES: &[Rule] = &[SYMBOL, Rule::Range("limit", 1.0, 1000.0)];
const KLINES_RULES: &[Rule] = &[
    SYMBOL,
    Rule::Required("interval", ParamType::String),
    Rule::Allowed("interval", KLINE_INTERVALS),
    Rule::Range("limit", 1.0, 1500.0),
];

/// 시세 엔드포인트. `historical_trades`만 API 키가 필요하다.
#[derive(Debug, Clone, Copy)]
pub struct Market<'a> {
    ctx: &'a FuturesContext,
}

impl<'a> Market<'a> {
    pub fn new(ctx: &'a FuturesContext) -> Self {
        Self { ctx }
    }

    pub async fn ping(&self) -> Result<Response, ExchangeError> {
        self.ctx.public(PING, ParameterSet::new(), HttpMethod::Get).await
    }

    pub async fn time(&self) -> Result<Response, ExchangeError> {
        self.ctx.public(TIME, ParameterSet::new(), HttpMethod::Get).await
    }

    pub async fn exchange_info(&self) -> Result<Response, ExchangeError> {
        self.ctx
            .public(EXCHANGE_INFO, ParameterSet::new(), HttpMethod::Get)
            .await
    }

    /// symbol -- mandatory, limit -- optional (5/10/20/50/100/500/1000)
    pub async fn depth(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, DEPTH_RULES)?;
        self.ctx.public(DEPTH, params, HttpMethod::Get).await
    }

    pub async fn trades(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, TRADES_RULES)?;
        self.ctx.public(TRADES, params, HttpMethod::Get).await
    }

    /// Older trades; authenticated by API key only.
    pub async fn historical_trades(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, TRADES_RULES)?;
        self.ctx
            .api_key(HISTORICAL_TRADES, params, HttpMethod::Get)
            .await
    }

    pub async fn agg_trades(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, TRADES_RULES)?;
        self.ctx.public(AGG_TRADES, params, HttpMethod::Get).await
    }

    pub async fn klines(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, KLINES_RULES)?;
        self.ctx.public(KLINES, params, HttpMethod::Get).await
    }

    pub async fn mark_price(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        self.ctx.public(MARK_PRICE, params, HttpMethod::Get).await
    }

    pub async fn funding_rate(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        self.ctx.public(FUNDING_RATE, params, HttpMethod::Get).await
    }

    pub async fn ticker_24h(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        self.ctx.public(TICKER_24H, params, HttpMethod::Get).await
    }

    pub async fn ticker_symbol(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        self.ctx.public(TICKER_PRICE, params, HttpMethod::Get).await
    }

    pub async fn book_ticker(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        self.ctx.public(BOOK_TICKER, params, HttpMethod::Get).await
    }

    pub async fn open_interest(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, &[SYMBOL])?;
        self.ctx.public(OPEN_INTEREST, params, HttpMethod::Get).await
    }
}

#[cfg(test)]
mod tests {
    use interface::{ProductConfig, ProductLine, ValidationError};

    use super::*;
    use crate::futures::testing::RecordingTransport;
    use crate::futures::FuturesClientBuilder;

    fn context(transport: std::sync::Arc<RecordingTransport>) -> FuturesContext {
        FuturesClientBuilder::new()
            .base_url("http://127.0.0.1:9")
            .transport(transport)
            .build_context(ProductLine::UsdMarginedFutures)
            .unwrap()
    }

    #[tokio::test]
    async fn test_depth_url() {
        let transport = RecordingTransport::new();
        let ctx = context(transport.clone());

        Market::new(&ctx)
            .depth(ParameterSet::new().with("symbol", "BTCUSDT").with("limit", 5))
            .await
            .unwrap();

        let request = transport.last();
        assert_eq!(request.url, "http://127.0.0.1:9/fapi/v1/depth?symbol=BTCUSDT&limit=5");
        assert!(request.headers.is_empty());
    }

    #[tokio::test]
    async fn test_depth_rejects_unsupported_limit() {
        let transport = RecordingTransport::new();
        let ctx = context(transport.clone());

        let err = Market::new(&ctx)
            .depth(ParameterSet::new().with("symbol", "BTCUSDT").with("limit", 7))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExchangeError::Validation(ValidationError::InvalidParameterValue { .. })
        ));
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_klines_requires_valid_interval() {
        let transport = RecordingTransport::new();
        let ctx = context(transport.clone());
        let market = Market::new(&ctx);

        let missing = market
            .klines(ParameterSet::new().with("symbol", "BTCUSDT"))
            .await
            .unwrap_err();
        assert!(missing.is_pre_flight());

        market
            .klines(ParameterSet::new().with("symbol", "BTCUSDT").with("interval", "1h"))
            .await
            .unwrap();
        assert_eq!(transport.count(), 1);
    }

    #[tokio::test]
    async fn test_historical_trades_needs_api_key() {
        let transport = RecordingTransport::new();
        let ctx = context(transport.clone());
        let err = Market::new(&ctx)
            .historical_trades(ParameterSet::new().with("symbol", "BTCUSDT"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Validation(ValidationError::MissingCredentials(_))
        ));

        let keyed = FuturesClientBuilder::new()
            .api_key("market-key")
            .transport(transport.clone())
            .build_context(ProductLine::UsdMarginedFutures)
            .unwrap();
        Market::new(&keyed)
            .historical_trades(ParameterSet::new().with("symbol", "BTCUSDT"))
            .await
            .unwrap();
        assert_eq!(transport.last().header("X-MBX-APIKEY"), Some("market-key"));
        assert_eq!(
            keyed.product(),
            &ProductConfig::production(ProductLine::UsdMarginedFutures)
        );
    }
}
