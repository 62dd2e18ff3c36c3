//! 선물 계정/주문 엔드포인트. 모두 서명 요청이다.
//!
//! `all_orders`, `account_trade_list`는 상품군마다 필수 파라미터가 달라서
//! 여기서는 검증하지 않고 UM/CM 계정 타입이 좁혀서 다시 노출한다.

use connector::{validate, ParamType, Rule};
use interface::{ExchangeError, HttpMethod, ParameterSet, Response};

use super::FuturesContext;

const ORDER: &str = "/v1/order";
const ALL_OPEN_ORDERS: &str = "/v1/allOpenOrders";
const OPEN_ORDER: &str = "/v1/openOrder";
const OPEN_ORDERS: &str = "/v1/openOrders";
const ALL_ORDERS: &str = "/v1/allOrders";
const LEVERAGE: &str = "/v1/leverage";
const MARGIN_TYPE: &str = "/v1/marginType";
const POSITION_SIDE: &str = "/v1/positionSide/dual";
const USER_TRADES: &str = "/v1/userTrades";
const INCOME: &str = "/v1/income";
const LEVERAGE_BRACKET: &str = "/v1/leverageBracket";
const COMMISSION_RATE: &str = "/v1/commissionRate";

pub(crate) const SYMBOL: Rule = Rule::Required("symbol", ParamType::String);
const ORDER_ID: Rule = Rule::OneOf(&["orderId", "origClientOrderId"]);
const SIDE: Rule = Rule::Allowed("side", &["BUY", "SELL"]);

const NEW_ORDER_RULES: &[Rule] = &[
    SYMBOL,
    Rule::Required("side", ParamType::String),
    SIDE,
    Rule::Required("type", ParamType::String),
    Rule::Allowed(
        "type",
        &[
            "LIMIT",
            "MARKET",
            "STOP",
            "STOP_MARKET",
            "TAKE_PROFIT",
            "TAKE_PROFIT_MARKET",
            "TRAILING_STOP_MARKET",
        ],
    ),
    Rule::Allowed("positionSide", &["BOTH", "LONG", "SHORT"]),
    Rule::Allowed("timeInForce", &["GTC", "IOC", "FOK", "GTX"]),
];
const MODIFY_ORDER_RULES: &[Rule] = &[
    SYMBOL,
    ORDER_ID,
    Rule::Required("side", ParamType::String),
    SIDE,
    Rule::Required("quantity", ParamType::Decimal),
    Rule::Required("price", ParamType::Decimal),
];
const ORDER_LOOKUP_RULES: &[Rule] = &[SYMBOL, ORDER_ID];
const LEVERAGE_RULES: &[Rule] = &[
    SYMBOL,
    Rule::Required("leverage", ParamType::Integer),
    Rule::Range("leverage", 1.0, 125.0),
];
const MARGIN_TYPE_RULES: &[Rule] = &[
    SYMBOL,
    Rule::NonEmpty("marginType"),
    Rule::Allowed("marginType", &["ISOLATED", "CROSSED"]),
];
const POSITION_MODE_RULES: &[Rule] = &[
    Rule::NonEmpty("dualSidePosition"),
    Rule::Allowed("dualSidePosition", &["true", "false"]),
];

#[derive(Debug, Clone, Copy)]
pub struct Account<'a> {
    ctx: &'a FuturesContext,
}

impl<'a> Account<'a> {
    pub fn new(ctx: &'a FuturesContext) -> Self {
        Self { ctx }
    }

    /// symbol, side, type -- mandatory
    pub async fn new_order(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, NEW_ORDER_RULES)?;
        self.ctx.signed(ORDER, params, HttpMethod::Post).await
    }

    pub async fn modify_order(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, MODIFY_ORDER_RULES)?;
        self.ctx.signed(ORDER, params, HttpMethod::Put).await
    }

    /// symbol -- mandatory, orderId 또는 origClientOrderId 중 하나 필수
    pub async fn cancel_order(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, ORDER_LOOKUP_RULES)?;
        self.ctx.signed(ORDER, params, HttpMethod::Delete).await
    }

    pub async fn cancel_all_open_orders(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        validate(&params, &[SYMBOL])?;
        self.ctx
            .signed(ALL_OPEN_ORDERS, params, HttpMethod::Delete)
            .await
    }

    pub async fn query_order(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, ORDER_LOOKUP_RULES)?;
        self.ctx.signed(ORDER, params, HttpMethod::Get).await
    }

    pub async fn query_current_open_order(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        validate(&params, ORDER_LOOKUP_RULES)?;
        self.ctx.signed(OPEN_ORDER, params, HttpMethod::Get).await
    }

    /// symbol 없이 호출하면 모든 심볼의 미체결 주문을 돌려준다.
    pub async fn current_all_open_orders(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        self.ctx.signed(OPEN_ORDERS, params, HttpMethod::Get).await
    }

    pub async fn all_orders(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        self.ctx.signed(ALL_ORDERS, params, HttpMethod::Get).await
    }

    pub async fn change_initial_leverage(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        validate(&params, LEVERAGE_RULES)?;
        self.ctx.signed(LEVERAGE, params, HttpMethod::Post).await
    }

    pub async fn change_margin_type(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, MARGIN_TYPE_RULES)?;
        self.ctx.signed(MARGIN_TYPE, params, HttpMethod::Post).await
    }

    /// dualSidePosition -- "true": hedge mode, "false": one-way mode
    pub async fn change_position_mode(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        validate(&params, POSITION_MODE_RULES)?;
        self.ctx.signed(POSITION_SIDE, params, HttpMethod::Post).await
    }

    pub async fn get_current_position_mode(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        self.ctx.signed(POSITION_SIDE, params, HttpMethod::Get).await
    }

    pub async fn account_trade_list(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        self.ctx.signed(USER_TRADES, params, HttpMethod::Get).await
    }

    pub async fn get_income_history(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        self.ctx.signed(INCOME, params, HttpMethod::Get).await
    }

    pub async fn get_leverage_bracket(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        self.ctx
            .signed(LEVERAGE_BRACKET, params, HttpMethod::Get)
            .await
    }

    pub async fn user_commission_rate(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        validate(&params, &[SYMBOL])?;
        self.ctx.signed(COMMISSION_RATE, params, HttpMethod::Get).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use interface::{ProductLine, ValidationError};

    use super::*;
    use crate::futures::testing::RecordingTransport;
    use crate::futures::FuturesClientBuilder;

    fn context(transport: Arc<RecordingTransport>) -> FuturesContext {
        FuturesClientBuilder::new()
            .base_url("http://127.0.0.1:9")
            .credentials("account-key", "account-secret")
            .transport(transport)
            .build_context(ProductLine::UsdMarginedFutures)
            .unwrap()
    }

    #[tokio::test]
    async fn test_new_order_goes_in_body() {
        let transport = RecordingTransport::new();
        let ctx = context(transport.clone());

        Account::new(&ctx)
            .new_order(
                ParameterSet::new()
                    .with("symbol", "BTCUSDT")
                    .with("side", "BUY")
                    .with("type", "MARKET")
                    .with("quantity", 0.001),
            )
            .await
            .unwrap();

        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://127.0.0.1:9/fapi/v1/order");
        let body = request.body.unwrap();
        assert!(body.starts_with("symbol=BTCUSDT&side=BUY&type=MARKET&quantity=0.001&timestamp="));
        assert!(body.contains("&signature="));
        assert!(!body.contains("account-secret"));
    }

    #[tokio::test]
    async fn test_new_order_rejects_unknown_side() {
        let transport = RecordingTransport::new();
        let ctx = context(transport.clone());

        let err = Account::new(&ctx)
            .new_order(
                ParameterSet::new()
                    .with("symbol", "BTCUSDT")
                    .with("side", "HOLD")
                    .with("type", "MARKET"),
            )
            .await
            .unwrap_err();

        assert!(err.is_pre_flight());
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_order_needs_an_order_id() {
        let transport = RecordingTransport::new();
        let ctx = context(transport.clone());
        let account = Account::new(&ctx);

        let err = account
            .cancel_order(ParameterSet::new().with("symbol", "BTCUSDT"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Validation(ValidationError::MissingOneOf { .. })
        ));

        account
            .cancel_order(
                ParameterSet::new()
                    .with("symbol", "BTCUSDT")
                    .with("origClientOrderId", "owl-1"),
            )
            .await
            .unwrap();
        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Delete);
        assert!(request
            .url
            .starts_with("http://127.0.0.1:9/fapi/v1/order?symbol=BTCUSDT&origClientOrderId=owl-1&timestamp="));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_leverage_must_be_integer_in_range() {
        let transport = RecordingTransport::new();
        let ctx = context(transport.clone());
        let account = Account::new(&ctx);

        let as_float = account
            .change_initial_leverage(ParameterSet::new().with("symbol", "BTCUSDT").with("leverage", 10.0))
            .await
            .unwrap_err();
        assert!(matches!(
            as_float,
            ExchangeError::Validation(ValidationError::WrongParameterType { .. })
        ));

        let too_high = account
            .change_initial_leverage(ParameterSet::new().with("symbol", "BTCUSDT").with("leverage", 200))
            .await
            .unwrap_err();
        assert!(too_high.is_pre_flight());

        account
            .change_initial_leverage(ParameterSet::new().with("symbol", "BTCUSDT").with("leverage", 20))
            .await
            .unwrap();
        assert_eq!(transport.count(), 1);
    }

    #[tokio::test]
    async fn test_position_mode_accepts_bool() {
        let transport = RecordingTransport::new();
        let ctx = context(transport.clone());

        Account::new(&ctx)
            .change_position_mode(ParameterSet::new().with("dualSidePosition", true))
            .await
            .unwrap();

        let body = transport.last().body.unwrap();
        assert!(body.starts_with("dualSidePosition=true&timestamp="));
    }

    #[tokio::test]
    async fn test_signed_call_without_secret_never_dispatches() {
        let transport = RecordingTransport::new();
        let ctx = FuturesClientBuilder::new()
            .api_key("only-key")
            .transport(transport.clone())
            .build_context(ProductLine::UsdMarginedFutures)
            .unwrap();

        let err = Account::new(&ctx)
            .current_all_open_orders(ParameterSet::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExchangeError::Validation(ValidationError::MissingCredentials(_))
        ));
        assert_eq!(transport.count(), 0);
    }
}
