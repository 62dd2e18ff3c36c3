//! COIN-M 선물 클라이언트 (`/dapi`). 포트폴리오 마진 엔드포인트도 여기서 제공한다.

use std::ops::Deref;

use connector::{validate, Rule};
use interface::{ExchangeError, HttpMethod, ParameterSet, ProductLine, Response};

use crate::futures::{
    Account, FuturesClient, FuturesClientBuilder, FuturesContext, Market, PortfolioMargin,
    UserData,
};

const BALANCE: &str = "/v1/balance";
const ACCOUNT_INFO: &str = "/v1/account";
const POSITION_RISK: &str = "/v1/positionRisk";

const SYMBOL_OR_PAIR: Rule = Rule::OneOf(&["symbol", "pair"]);

#[derive(Debug, Clone)]
pub struct CmFuturesClient {
    ctx: FuturesContext,
}

impl CmFuturesClient {
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
            ctx: builder.build_context(ProductLine::CoinMarginedFutures)?,
        })
    }

    pub fn context(&self) -> &FuturesContext {
        &self.ctx
    }
}

impl FuturesClient for CmFuturesClient {
    type Account<'a> = CmAccount<'a>;

    fn market(&self) -> Market<'_> {
        Market::new(&self.ctx)
    }

    fn account(&self) -> CmAccount<'_> {
        CmAccount::new(&self.ctx)
    }

    fn user_data(&self) -> UserData<'_> {
        UserData::new(&self.ctx)
    }

    fn portfolio_margin(&self) -> Option<PortfolioMargin<'_>> {
        Some(PortfolioMargin::new(&self.ctx))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmAccount<'a> {
    ctx: &'a FuturesContext,
    common: Account<'a>,
}

impl<'a> Deref for CmAccount<'a> {
    type Target = Account<'a>;

    fn deref(&self) -> &Self::Target {
        &self.common
    }
}

impl<'a> CmAccount<'a> {
    pub fn new(ctx: &'a FuturesContext) -> Self {
        Self {
            ctx,
            common: Account::new(ctx),
        }
    }

    /// symbol 또는 pair 중 하나 필수
    pub async fn all_orders(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, &[SYMBOL_OR_PAIR])?;
        self.common.all_orders(params).await
    }

    /// symbol 또는 pair 중 하나 필수
    pub async fn account_trade_list(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        validate(&params, &[SYMBOL_OR_PAIR])?;
        self.common.account_trade_list(params).await
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
}
