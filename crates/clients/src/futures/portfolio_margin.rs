use connector::{validate, ParamType, Rule};
use interface::{ExchangeError, HttpMethod, ParameterSet, Response};

use super::FuturesContext;

const PM_EXCHANGE_INFO: &str = "/v1/pmExchangeInfo";
const PM_ACCOUNT_INFO: &str = "/v1/pmAccountInfo";

/// Portfolio margin endpoints served under the COIN-M product path.
#[derive(Debug, Clone, Copy)]
pub struct PortfolioMargin<'a> {
    ctx: &'a FuturesContext,
}

impl<'a> PortfolioMargin<'a> {
    pub fn new(ctx: &'a FuturesContext) -> Self {
        Self { ctx }
    }

    pub async fn portfolio_margin_exchange_info(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        self.ctx
            .signed(PM_EXCHANGE_INFO, params, HttpMethod::Get)
            .await
    }

    /// asset -- mandatory
    pub async fn portfolio_margin_account_info(
        &self,
        params: ParameterSet,
    ) -> Result<Response, ExchangeError> {
        validate(&params, &[Rule::Required("asset", ParamType::String)])?;
        self.ctx
            .signed(PM_ACCOUNT_INFO, params, HttpMethod::Get)
            .await
    }
}
