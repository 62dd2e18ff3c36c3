use clients::futures::{Account, Market, UserData};
use clients::{logger, ClientConfig, CmFuturesClient, FuturesClient, UmFuturesClient};
use color_eyre::eyre;
use interface::{ExchangeError, ParameterSet, Response};
use structopt::StructOpt;
use tracing::{error, info};

#[derive(Debug, StructOpt)]
#[structopt(name = "owl", about = "바이낸스 선물 REST 클라이언트")]
struct Opt {
    /// COIN-M(/dapi) 선물 사용. 기본은 USDⓈ-M(/fapi)
    #[structopt(long)]
    coin_margined: bool,

    #[structopt(long, default_value = "logs")]
    log_dir: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// 서버 연결 확인
    Ping,
    /// 서버 시간 조회
    Time,
    /// 호가 조회
    Depth {
        symbol: String,
        #[structopt(long)]
        limit: Option<u32>,
    },
    /// 선물 지갑 잔고 (서명 필요)
    Balance,
    /// 미체결 주문 조회 (서명 필요)
    OpenOrders {
        #[structopt(long)]
        symbol: Option<String>,
    },
    /// user data stream listen key 발급 (API 키 필요)
    ListenKey,
}

enum Client {
    Um(UmFuturesClient),
    Cm(CmFuturesClient),
}

impl Client {
    fn market(&self) -> Market<'_> {
        match self {
            Self::Um(c) => c.market(),
            Self::Cm(c) => c.market(),
        }
    }

    fn account(&self) -> Account<'_> {
        match self {
            Self::Um(c) => *c.account(),
            Self::Cm(c) => *c.account(),
        }
    }

    fn user_data(&self) -> UserData<'_> {
        match self {
            Self::Um(c) => c.user_data(),
            Self::Cm(c) => c.user_data(),
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();

    let opt = Opt::from_args();
    let _guards = logger::init_tracing(&opt.log_dir)?;

    let config = ClientConfig::from_env()?;
    info!(
        coin_margined = opt.coin_margined,
        credentials = config.has_credentials(),
        "owl 시작"
    );

    let client = if opt.coin_margined {
        Client::Cm(CmFuturesClient::from_builder(config.builder())?)
    } else {
        Client::Um(UmFuturesClient::from_builder(config.builder())?)
    };

    match run(&client, opt.cmd).await {
        Ok(response) => {
            println!("{}", response.to_json());
            Ok(())
        }
        Err(e) => {
            error!(pre_flight = e.is_pre_flight(), code = ?e.error_code(), "request failed: {e}");
            Err(eyre::eyre!(e))
        }
    }
}

async fn run(client: &Client, cmd: Command) -> Result<Response, ExchangeError> {
    match cmd {
        Command::Ping => client.market().ping().await,
        Command::Time => client.market().time().await,
        Command::Depth { symbol, limit } => {
            let mut params = ParameterSet::new().with("symbol", symbol);
            if let Some(limit) = limit {
                params.insert("limit", limit);
            }
            client.market().depth(params).await
        }
        Command::Balance => {
            let params = ParameterSet::new();
            match client {
                Client::Um(c) => c.account().futures_account_balance(params).await,
                Client::Cm(c) => c.account().futures_account_balance(params).await,
            }
        }
        Command::OpenOrders { symbol } => {
            let params = symbol
                .map(|s| ParameterSet::new().with("symbol", s))
                .unwrap_or_default();
            client.account().current_all_open_orders(params).await
        }
        Command::ListenKey => client.user_data().create_listen_key().await,
    }
}
