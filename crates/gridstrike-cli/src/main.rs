//! Command-line client for the gridstrike on-chain game.

mod prompt;
mod session;

use crate::prompt::{Entry, MoveSource};
use crate::session::Session;
use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use gridstrike_core::board::Board;
use gridstrike_core::config::{DEFAULT_ENDPOINT, DEFAULT_FEE_BUDGET, DEFAULT_FEE_UNIT_PRICE};
use gridstrike_core::game::{GRID_SIZE, GameModule, PlayerAction};
use gridstrike_core::{Address, Identity, SponsoredSubmitter, SubmitterConfig};
use gridstrike_keys::Ed25519Identity;
use gridstrike_net::{AuthScheme, DEFAULT_WAIT_TIMEOUT, LedgerClient, RpcAuth};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gridstrike",
    about = "Play the gridstrike grid game on chain",
    long_about = "Every action is a transaction whose gas is paid by the sponsor key \
                  (SECRET_KEY) and whose sender is the player key (SECOND_SECRET_KEY).\n\
                  Values are read from flags, the environment or a .env file."
)]
struct Cli {
    #[command(flatten)]
    net: NetArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct NetArgs {
    /// Ledger JSON-RPC endpoint
    #[arg(long, env = "RPC_URL", default_value = DEFAULT_ENDPOINT)]
    rpc_url: String,

    /// Authorization scheme for the endpoint (Basic or Bearer)
    #[arg(long, env = "RPC_AUTH_TYPE", requires = "rpc_auth_token")]
    rpc_auth_type: Option<AuthScheme>,

    #[arg(long, env = "RPC_AUTH_TOKEN", hide_env_values = true)]
    rpc_auth_token: Option<String>,

    /// Game object id
    #[arg(long, env = "GAME_OBJECT")]
    game: Option<Address>,
}

#[derive(Args)]
struct KeyArgs {
    /// Sponsor private key, pays gas for every transaction
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    sponsor_key: String,

    /// Player private key, sender of game actions
    #[arg(long, env = "SECOND_SECRET_KEY", hide_env_values = true)]
    player_key: String,

    /// Package that publishes the `game` module
    #[arg(long, env = "NFT_PACKAGE_ID")]
    package: Address,

    #[arg(long, env = "FEE_UNIT_PRICE", default_value_t = DEFAULT_FEE_UNIT_PRICE)]
    fee_unit_price: u64,

    #[arg(long, env = "FEE_BUDGET", default_value_t = DEFAULT_FEE_BUDGET)]
    fee_budget: u64,

    /// Seconds to wait for a submitted transaction to execute
    #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT.as_secs())]
    wait_timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version of the gridstrike libraries.
    Version,
    /// Print the sponsor and player addresses
    Address {
        #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
        sponsor_key: String,
        #[arg(long, env = "SECOND_SECRET_KEY", hide_env_values = true)]
        player_key: String,
    },
    /// Create a game (requires the game master capability)
    MakeGame {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, env = "GAME_MASTER_CAP")]
        master_cap: Address,
        #[arg(long, default_value_t = GRID_SIZE)]
        grid_size: u8,
    },
    /// Join the game and print the assigned team
    Join {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, env = "PLAYER_NAME", default_value = "Player1")]
        name: String,
    },
    /// Join, then read moves from the prompt until `q` or end of input
    Play {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, env = "PLAYER_NAME", default_value = "Player1")]
        name: String,
    },
    /// Leave the game
    Leave {
        #[command(flatten)]
        keys: KeyArgs,
    },
    /// Remove a player from the game (requires the game master capability)
    Kick {
        #[command(flatten)]
        keys: KeyArgs,
        #[arg(long, env = "GAME_MASTER_CAP")]
        master_cap: Address,
        /// Address of the player to remove
        player: Address,
    },
    /// Render the board continuously
    Watch {
        /// Refresh interval in milliseconds
        #[arg(long, default_value_t = 200)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("gridstrike {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Address {
            sponsor_key,
            player_key,
        } => {
            let sponsor = load_identity(&sponsor_key, "SECRET_KEY")?;
            let player = load_identity(&player_key, "SECOND_SECRET_KEY")?;
            println!("sponsor: {}", sponsor.address());
            println!("player:  {}", player.address());
        }
        Commands::MakeGame {
            keys,
            master_cap,
            grid_size,
        } => {
            let mut session = connect(&cli.net, &keys)?;
            let response = session.make_game(master_cap, grid_size).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Join { keys, name } => {
            let mut session = connect(&cli.net, &keys)?;
            match session.join(&name).await? {
                Some(team) => println!("You are on team {team}!"),
                None => println!("Joined; no team was reported."),
            }
        }
        Commands::Play { keys, name } => {
            let mut session = connect(&cli.net, &keys)?;
            cmd_play(&mut session, &name).await?;
        }
        Commands::Leave { keys } => {
            let mut session = connect(&cli.net, &keys)?;
            session.leave().await?;
            println!("Left the game.");
        }
        Commands::Kick {
            keys,
            master_cap,
            player,
        } => {
            let mut session = connect(&cli.net, &keys)?;
            session.kick_player(master_cap, player).await?;
            println!("Kicked {player}");
        }
        Commands::Watch { interval_ms } => {
            cmd_watch(&cli.net, Duration::from_millis(interval_ms)).await?;
        }
    }

    Ok(())
}

fn load_identity(encoded: &str, name: &str) -> anyhow::Result<Ed25519Identity> {
    Ed25519Identity::from_encoded(encoded).with_context(|| format!("{name} is not a valid key"))
}

fn ledger_client(net: &NetArgs, config: &SubmitterConfig) -> anyhow::Result<LedgerClient> {
    let client = LedgerClient::from_config(config);
    Ok(match (net.rpc_auth_type, &net.rpc_auth_token) {
        (Some(scheme), Some(token)) => client.with_auth(RpcAuth {
            scheme,
            token: token.clone(),
        }),
        (None, _) => client,
        (Some(_), None) => return Err(anyhow!("RPC_AUTH_TYPE is set without RPC_AUTH_TOKEN")),
    })
}

fn connect(net: &NetArgs, keys: &KeyArgs) -> anyhow::Result<Session> {
    let config = SubmitterConfig::new(net.rpc_url.clone())
        .with_fee_unit_price(keys.fee_unit_price)
        .with_fee_budget(keys.fee_budget);
    let client = ledger_client(net, &config)?;

    let session = Session::new(
        SponsoredSubmitter::new(client, config),
        load_identity(&keys.sponsor_key, "SECRET_KEY")?,
        load_identity(&keys.player_key, "SECOND_SECRET_KEY")?,
        GameModule::new(keys.package),
        net.game,
        Duration::from_secs(keys.wait_timeout),
    );
    debug!(
        sponsor = %session.sponsor_address(),
        player = %session.player_address(),
        "session ready"
    );
    Ok(session)
}

// ──────────────────────────────────── play ───────────────────────────────────

async fn cmd_play(session: &mut Session, name: &str) -> anyhow::Result<()> {
    match session.join(name).await {
        Ok(Some(team)) => println!("You are on team {team}!"),
        Ok(None) => println!("Joined the game."),
        Err(e) => {
            println!("Join failed: {e:#}");
            println!("This is most likely because the player is already in the game.");
        }
    }

    let keys: Vec<&str> = PlayerAction::ALL.iter().map(|a| a.key()).collect();
    println!("Moves: {} (q to quit)", keys.join(" "));

    let mut source = MoveSource::stdin();
    while let Some(line) = source.next_line().await? {
        let action = match Entry::parse(&line) {
            Entry::Move(action) => action,
            Entry::Quit => break,
            Entry::Blank => continue,
            Entry::Unknown(input) => {
                println!("Unknown move `{input}`; expected one of {}", keys.join(" "));
                continue;
            }
        };
        if let Err(e) = session.play(action).await {
            warn!(error = %format!("{e:#}"), %action, "move failed");
            println!("Move failed: {e:#}");
        }
    }
    Ok(())
}

// ──────────────────────────────────── watch ──────────────────────────────────

async fn cmd_watch(net: &NetArgs, interval: Duration) -> anyhow::Result<()> {
    let game = net
        .game
        .context("no game object configured (set GAME_OBJECT or pass --game)")?;
    let client = ledger_client(net, &SubmitterConfig::new(net.rpc_url.clone()))?;

    loop {
        match client.get_object(game).await {
            Ok(data) => match data.get("content").map(Board::from_content) {
                Some(Ok(board)) => println!("{board}"),
                Some(Err(e)) => warn!(error = %e, "cannot render board"),
                None => warn!("game object has no content"),
            },
            Err(e) => warn!(error = %e, "cannot read game object"),
        }
        tokio::time::sleep(interval).await;
    }
}
