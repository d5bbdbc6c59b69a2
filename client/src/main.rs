// Command-line front end for the DaemaCoin client

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use shared::{abbreviate, format_coins, User};

use dmc_client::app::auth::{self, XquareLoginForm};
use dmc_client::app::kiosk::Kiosk;
use dmc_client::app::transfer::{Key, TransferFlow};
use dmc_client::core::service::ApiService;
use dmc_client::debug::{self, LogConfig};
use dmc_client::services::session::Tokens;
use dmc_client::sync::{BalancePoller, LeaderboardFeed, PaginatedList, UserDirectory, WalletHistoryFeed};
use dmc_client::{ApiClient, ClientConfig, SessionContext, SessionEvent};

#[derive(Parser)]
#[command(name = "dmc")]
#[command(about = "DaemaCoin client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Access token of an existing session
    #[arg(long, global = true, env = "DMC_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the coin leaderboard
    Leaderboard {
        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },

    /// List users, optionally filtered by GitHub id (requires --token)
    Users {
        /// Case-insensitive GitHub id filter
        #[arg(short, long)]
        search: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },

    /// Show coin history (requires --token)
    History {
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },

    /// Coins mined today across the service (requires --token)
    TodayMined,

    /// XQUARE login, first sign-in step
    Login {
        #[arg(short, long)]
        account: String,

        #[arg(short, long, env = "DMC_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Complete registration with the GitHub OAuth code
    Register {
        /// XQUARE id printed by `login`
        #[arg(short, long)]
        xquare_id: String,

        /// `code` query parameter of the GitHub callback
        #[arg(short, long)]
        code: String,
    },

    /// Send coins to a user (requires --token)
    Transfer {
        /// Recipient GitHub id
        #[arg(long)]
        to: String,

        #[arg(short, long)]
        amount: String,
    },

    /// Print the balance as it is polled (requires --token)
    WatchBalance {
        /// Stop after this many seconds
        #[arg(short, long, default_value = "30")]
        seconds: u64,
    },

    /// List the products of a festival store
    KioskProducts {
        #[arg(short, long)]
        store: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config.log_level = "dmc_client=debug,dmc=debug,info".to_string();
    }
    let _log_guard = debug::init_logger(&log_config)?;

    let config = ClientConfig::from_env()?;
    let session = Arc::new(SessionContext::new());
    let api = Arc::new(ApiClient::new(&config, session.clone())?);
    if log_config.is_debug_enabled() {
        tracing::debug!(?config, "Configuration loaded");
    }
    tracing::debug!(base_url = %api.base_url(), "Client ready");

    if let Some(token) = cli.token.as_deref() {
        resume(api.as_ref(), &session, token).await?;
    }

    match cli.command {
        Commands::Leaderboard { pages } => {
            let list = PaginatedList::new(LeaderboardFeed::new(api.clone()).with_session(session.clone()));
            list.reset(config.leaderboard_limit).await;
            for _ in 1..pages {
                if list.load_more().await.is_none() {
                    break;
                }
            }
            let state = list.snapshot();
            if let Some(error) = state.error() {
                eprintln!("warning: {}", error);
            }
            if state.is_fallback() {
                println!("(placeholder ranking)");
            }
            for entry in state.items() {
                println!("{:>4}. {:<24} {:>12} DMC", entry.rank, entry.github_id, format_coins(entry.total_coins));
            }
        }

        Commands::Users { search, pages } => {
            require_session(&session)?;
            let list = PaginatedList::new(UserDirectory::new(api.clone()));
            list.reset(config.users_page_size).await;
            for _ in 1..pages {
                if list.load_more().await.is_none() {
                    break;
                }
            }
            let users = match search.as_deref() {
                Some(query) => list.filter_by_github_id(query),
                None => list.snapshot().items().to_vec(),
            };
            for user in users {
                println!("{:<10} {:<24} commits: {}", abbreviate(&user.id, 4, 4), user.github_id, user.total_commits);
            }
            if let Some(error) = list.snapshot().error() {
                eprintln!("warning: {}", error);
            }
        }

        Commands::History { pages } => {
            require_session(&session)?;
            let list = PaginatedList::new(WalletHistoryFeed::new(api.clone()));
            list.reset(WalletHistoryFeed::PAGE_LIMIT).await;
            for _ in 1..pages {
                if list.load_more().await.is_none() {
                    break;
                }
            }
            let state = list.snapshot();
            for item in state.items() {
                let kind = item.kind.as_ref().map(|k| format!("{:?}", k)).unwrap_or_default();
                println!("{:<25} {:<10} {:>10} {}", item.created_at, kind, format_coins(item.amount), item.description);
            }
            if let Some(error) = state.error() {
                eprintln!("warning: {}", error);
            }
        }

        Commands::TodayMined => {
            require_session(&session)?;
            let today = api.get_today_mined().await?;
            println!("{} DMC mined today", format_coins(today.total));
        }

        Commands::Login { account, password } => {
            let xquare_id = auth::login_with_xquare(
                api.as_ref(),
                &session,
                XquareLoginForm { account_id: account, password },
            )
            .await?;
            println!("XQUARE id: {}", xquare_id);
            println!("Authorize on GitHub, then run `dmc register --xquare-id {} --code <code>`:", xquare_id);
            println!("{}", config.github_authorize_url());
        }

        Commands::Register { xquare_id, code } => {
            session.begin_registration(xquare_id);
            let user = auth::register_with_github(api.as_ref(), &session, &code).await?;
            println!("Signed in as {} ({})", user.github_username, user.id);
            if let Some(token) = session.bearer_token() {
                println!("DMC_ACCESS_TOKEN={}", token);
            }
        }

        Commands::Transfer { to, amount } => {
            require_session(&session)?;
            let recipient = find_user(api.clone(), &config, &to).await?;
            let balance = api.get_wallet_info().await?.balance;

            let mut flow = TransferFlow::new();
            flow.select_recipient(recipient);
            flow.send_all(None);
            for c in amount.trim().chars() {
                match c {
                    '.' => flow.press(Key::Dot),
                    d if d.is_ascii_digit() => flow.press(Key::Digit(d as u8 - b'0')),
                    other => bail!("Invalid amount character {:?}", other),
                }
            }
            flow.proceed(balance)?;
            let response = flow.submit(api.as_ref()).await?;
            println!("{}", response.message.as_deref().unwrap_or("Transfer complete"));
            if let Some(balance) = response.balance {
                println!("Balance: {} DMC", format_coins(balance));
            }
        }

        Commands::WatchBalance { seconds } => {
            require_session(&session)?;
            let poller = BalancePoller::new(api.clone(), session.clone(), config.poll_interval);
            poller.supervise();
            watch_balance(&session, config.poll_interval, Duration::from_secs(seconds)).await;
        }

        Commands::KioskProducts { store } => {
            let mut kiosk = Kiosk::new(store);
            for product in kiosk.load_products(api.as_ref()).await? {
                println!("{:>6} {:<30} {:>8} DMC", product.id, product.name, product.price);
            }
        }
    }

    Ok(())
}

/// Sign in with an existing access token.
async fn resume(api: &ApiClient, session: &SessionContext, token: &str) -> anyhow::Result<()> {
    let tokens = Tokens { access_token: token.to_string(), refresh_token: String::new() };
    session.establish(tokens, placeholder_user());
    let generation = session.generation();
    auth::refresh_profile(api, session)
        .await
        .context("Access token rejected")?;
    if let Some(profile) = session.profile() {
        session.update_user(generation, |user| {
            user.id = profile.id.clone();
            user.github_id = profile.github_id.clone();
            user.github_username = profile.github_id.clone();
            user.avatar = profile.github_image_url.clone();
        });
    }
    Ok(())
}

fn placeholder_user() -> User {
    User {
        id: String::new(),
        xquare_id: String::new(),
        github_id: String::new(),
        github_username: String::new(),
        avatar: auth::DEFAULT_AVATAR.to_string(),
        name: String::new(),
        email: String::new(),
        total_coins: 0.0,
        created_at: String::new(),
        last_mining_at: None,
    }
}

fn require_session(session: &SessionContext) -> anyhow::Result<()> {
    if !session.is_authenticated() {
        bail!("This command needs --token (or DMC_ACCESS_TOKEN)");
    }
    Ok(())
}

/// Page through the directory until `github_id` shows up.
async fn find_user(
    api: Arc<ApiClient>,
    config: &ClientConfig,
    github_id: &str,
) -> anyhow::Result<shared::DirectoryUser> {
    let list = PaginatedList::new(UserDirectory::new(api));
    list.reset(config.users_page_size).await;
    loop {
        let state = list.snapshot();
        if let Some(user) = state.items().iter().find(|u| u.github_id.eq_ignore_ascii_case(github_id)) {
            return Ok(user.clone());
        }
        if let Some(error) = state.error() {
            bail!("Failed to load users: {}", error);
        }
        if list.load_more().await.is_none() {
            break;
        }
    }
    bail!("No user with GitHub id {}", github_id)
}

async fn watch_balance(session: &SessionContext, every: Duration, total: Duration) {
    let events = session.events();
    let deadline = tokio::time::sleep(total);
    tokio::pin!(deadline);
    let mut ticker = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = events.recv() => match event {
                Ok(SessionEvent::Expired { status }) => {
                    println!("Session expired (HTTP {})", status);
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            },
            _ = ticker.tick() => {
                if let Some(wallet) = session.wallet() {
                    println!("{} DMC", format_coins(wallet.balance));
                }
            }
        }
    }
}
