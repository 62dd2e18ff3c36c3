use connector::{validate, Rule};
use interface::{ExchangeError, HttpMethod, ParameterSet, Response};

use super::FuturesContext;

const LISTEN_KEY: &str = "/v1/listenKey";
const LISTEN_KEY_RULES: &[Rule] = &[Rule::NonEmpty("listenKey")];

/// User data stream listen key 관리. API 키만 필요하고 서명하지 않는다.
///
/// 키는 60분 뒤 만료되므로 스트림을 유지하려면 주기적으로 `extend_listen_key`를 호출해야 한다.
#[derive(Debug, Clone, Copy)]
pub struct UserData<'a> {
    ctx: &'a FuturesContext,
}

impl<'a> UserData<'a> {
    pub fn new(ctx: &'a FuturesContext) -> Self {
        Self { ctx }
    }

    pub async fn create_listen_key(&self) -> Result<Response, ExchangeError> {
        self.ctx
            .api_key(LISTEN_KEY, ParameterSet::new(), HttpMethod::Post)
            .await
    }

    /// listenKey -- optional, the account's active key is used when absent
    pub async fn extend_listen_key(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        check_listen_key(&params)?;
        self.ctx.api_key(LISTEN_KEY, params, HttpMethod::Put).await
    }

    pub async fn close_listen_key(&self, params: ParameterSet) -> Result<Response, ExchangeError> {
        check_listen_key(&params)?;
        self.ctx.api_key(LISTEN_KEY, params, HttpMethod::Delete).await
    }
}

fn check_listen_key(params: &ParameterSet) -> Result<(), ExchangeError> {
    if params.contains_key("listenKey") {
        validate(params, LISTEN_KEY_RULES)?;
    }
    Ok(())
}
