//! USDⓈ-M 선물 클라이언트 (`/fapi`).

use std::ops::Deref;

use connector::{validate, ParamType, Rule};
use interface::{ExchangeError, HttpMethod, ParameterSet, ProductLine, Response};

use crate::futures::account::SYMBOL;
use crate::futures::{
    Account, FuturesClient, FuturesClientBuilder, FuturesContext, Market, UserData,
};

const MULTI_ASSETS_MARGIN: &str = "/v1/multiAssetsMargin";
const BALANCE: &str = "/v2/balance";
const ACCOUNT_INFO: &str = "/v2/account";
const POSITION_RISK: &str = "/v2/positionRisk";
const API_TRADING_STATUS: &str = "/v1/apiTradingStatus";
const DOWNLOAD_ID: &str = "/v1/income/asyn";
const DOWNLOAD_LINK: &str = "/v1/income/asyn/id";

const MULTI_ASSETS_RULES: &[Rule] = &[
    Rule::NonEmpty("multiAssetsMargin"),
    Rule::Allowed("multiAssetsMargin", &["true", "false"]),
];
const DOWNLOAD_ID_RULES: &[Rule] = &[
    Rule::Required("startTime", ParamType::Integer),
    Rule::Required("endTime", ParamType::Integer),
];

#[derive(Debug, Clone)]
pub struct UmFuturesClient {
    ctx: FuturesContext,
}

impl UmFuturesClient {
    /// Public endpoints only, against production.
    pub fn new() -> Result<Self, ExchangeError> {
        Self::from_builder(Self::builder())
    }

    pub fn with_credentials(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, ExchangeError> {
        Self::from_builder(Self::builder().credentials(api_key, secret_key))
    }

    pub fn builder() -> FuturesClientBuilder {
        FuturesClientBuilder::new()
    }

    pub fn from_builder(builder: FuturesClientBuilder) -> Result<Self, ExchangeError> {
        Ok(Self {
            ctx: builder.build_context(ProductLine::UsdMarginedFutures)?,
        })
    }

    pub fn context(&self) -> &FuturesContext {
        &self.ctx
    }
}

impl FuturesClient for UmFuturesClient {
    type Account<'a> = UmAccount<'a>;

    fn market(&self) -> Market<'_> {
        Market::new(&self.ctx)
    }

    fn account(&self) -> UmAccount<'_> {
        UmAccount::new(&self.ctx)
    }

    fn user_data(&self) -> UserData<'_> {
        UserData::new(&self.ctx)
    }
}

/// USDⓈ-M 계정 엔드포인트. 공통 엔드포인트는 `Deref`로 [`Account`]에 위임한다.
#[derive(Debug, Clone, Copy)]
pub struct UmAccount<'a> {
    ctx: &'a FuturesContext,
    common: Account<'a>,
}

impl<'a> Deref for UmAccount<'a> {
    type Target = Account<'a>;

    fn deref(&self) -> &Self::Target {
        &self.common
    }
}

impl<'a> UmAccount<'a> {
    pub fn new(ctx: &'a FuturesContext) -> Self {
        Self {
            ctx,
            common: Account::new(ctx),
        }
    }

    /// symbol -- mandatory
    pub async fn all_orders(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, &[SYMBOL])?;
        self.common.all_orders(params).await
    }

    /// symbol -- mandatory
    pub async fn account_trade_list(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, &[SYMBOL])?;
        self.common.account_trade_list(params).await
    }

    /// multiAssetsMargin -- "true": multi-assets mode, "false": single-asset mode
    pub async fn change_multi_assets_mode(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        validate(&params, MULTI_ASSETS_RULES)?;
        self.ctx
            .signed(MULTI_ASSETS_MARGIN, params, HttpMethod::Post)
            .await
    }

    pub async fn get_current_multi_assets_mode(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        self.ctx
            .signed(MULTI_ASSETS_MARGIN, params, HttpMethod::Get)
            .await
    }

    pub async fn futures_account_balance(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        self.ctx.signed(BALANCE, params, HttpMethod::Get).await
    }

    pub async fn account_information(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        self.ctx.signed(ACCOUNT_INFO, params, HttpMethod::Get).await
    }

    pub async fn position_information(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        self.ctx.signed(POSITION_RISK, params, HttpMethod::Get).await
    }

    pub async fn quantitative_rules_indicators(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        self.ctx
            .signed(API_TRADING_STATUS, params, HttpMethod::Get)
            .await
    }

    /// startTime, endTime -- mandatory (ms)
    pub async fn get_download_id(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, DOWNLOAD_ID_RULES)?;
        self.ctx.signed(DOWNLOAD_ID, params, HttpMethod::Get).await
    }

    /// downloadId -- mandatory
    pub async fn get_download_link(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, &[Rule::NonEmpty("downloadId")])?;
        self.ctx.signed(DOWNLOAD_LINK, params, HttpMethod::Get).await
    }
}

#[cfg(test)]
mod tests {
    use interface::ValidationError;

    use super::*;
    use crate::futures::testing::RecordingTransport;

    fn client(transport: std::sync::Arc<RecordingTransport>) -> UmFuturesClient {
        let builder = UmFuturesClient::builder()
            .base_url("http://127.0.0.1:9")
            .credentials("um-key", "um-secret")
            .show_limit_usage(true)
            .transport(transport);
        UmFuturesClient::from_builder(builder).unwrap()
    }

    #[test]
    fn test_default_client_targets_production() {
        let client = UmFuturesClient::new().unwrap();
        assert_eq!(
            client.context().product().product_url(),
            "https://fapi.binance.com/fapi"
        );
        assert!(client.portfolio_margin().is_none());
    }

    #[tokio::test]
    async fn test_all_orders_requires_symbol() {
        let transport = RecordingTransport::new();
        let client = client(transport.clone());

        let err = client
            .account()
            .all_orders(ParameterSet::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Validation(ValidationError::MissingParameter { .. })
        ));
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_v2_balance_and_limit_usage() {
        let transport = RecordingTransport::new();
        let client = client(transport.clone());

        let response = client
            .account()
            .futures_account_balance(ParameterSet::new())
            .await
            .unwrap();

        assert!(transport
            .last()
            .url
            .starts_with("http://127.0.0.1:9/fapi/v2/balance?timestamp="));
        assert_eq!(response.limit_usage.unwrap().used_weight_1m(), Some(1));
    }

    #[tokio::test]
    async fn test_common_endpoints_reachable_through_deref() {
        let transport = RecordingTransport::new();
        let client = client(transport.clone());

        client
            .account()
            .user_commission_rate(ParameterSet::new().with("symbol", "ETHUSDT"))
            .await
            .unwrap();
        assert!(transport.last().url.contains("/fapi/v1/commissionRate?symbol=ETHUSDT&"));
    }

    #[tokio::test]
    async fn test_download_id_needs_time_window() {
        let transport = RecordingTransport::new();
        let client = client(transport.clone());
        let account = client.account();

        assert!(account
            .get_download_id(ParameterSet::new().with("startTime", 1_700_000_000_000_i64))
            .await
            .unwrap_err()
            .is_pre_flight());

        account
            .get_download_id(
                ParameterSet::new()
                    .with("startTime", 1_700_000_000_000_i64)
                    .with("endTime", 1_700_086_400_000_i64),
            )
            .await
            .unwrap();
        assert_eq!(transport.count(), 1);
    }
}
