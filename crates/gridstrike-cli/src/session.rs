//! One player's connection to a game: keys, submitter and call builder.

use anyhow::{Context, bail};
use gridstrike_core::events::{execution_error, joined_team};
use gridstrike_core::game::{GameModule, PlayerAction};
use gridstrike_core::{Address, Identity, IntentBuilder, SponsoredSubmitter};
use gridstrike_keys::Ed25519Identity;
use gridstrike_net::LedgerClient;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

pub struct Session {
    submitter: SponsoredSubmitter<LedgerClient>,
    sponsor: Ed25519Identity,
    player: Ed25519Identity,
    module: GameModule,
    game: Option<Address>,
    builder: IntentBuilder,
    wait_timeout: Duration,
}

/// Which identity sends the transaction. Gas is always paid by the sponsor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sender {
    Sponsor,
    Player,
}

impl Session {
    pub fn new(
        submitter: SponsoredSubmitter<LedgerClient>,
        sponsor: Ed25519Identity,
        player: Ed25519Identity,
        module: GameModule,
        game: Option<Address>,
        wait_timeout: Duration,
    ) -> Self {
        Self {
            submitter,
            sponsor,
            player,
            module,
            game,
            builder: IntentBuilder::new(),
            wait_timeout,
        }
    }

    pub fn sponsor_address(&self) -> Address {
        self.sponsor.address()
    }

    pub fn player_address(&self) -> Address {
        self.player.address()
    }

    fn game(&self) -> anyhow::Result<Address> {
        self.game
            .context("no game object configured (set GAME_OBJECT or pass --game)")
    }

    /// Creates a game owned by the sponsor's master capability.
    pub async fn make_game(&mut self, master_cap: Address, grid_size: u8) -> anyhow::Result<Value> {
        self.module.make_game(&mut self.builder, master_cap, grid_size);
        self.execute(Sender::Sponsor).await
    }

    pub async fn kick_player(&mut self, master_cap: Address, player: Address) -> anyhow::Result<()> {
        let game = self.game()?;
        self.module
            .kick_player(&mut self.builder, master_cap, game, player);
        self.execute(Sender::Sponsor).await?;
        Ok(())
    }

    /// Joins and returns the assigned team, when the join event reports one.
    pub async fn join(&mut self, player_name: &str) -> anyhow::Result<Option<String>> {
        let game = self.game()?;
        self.module.join_game(&mut self.builder, game, player_name);
        let response = self.execute(Sender::Player).await?;
        Ok(joined_team(&response))
    }

    pub async fn play(&mut self, action: PlayerAction) -> anyhow::Result<()> {
        let game = self.game()?;
        self.module.play_game(&mut self.builder, game, action);
        self.execute(Sender::Player).await?;
        Ok(())
    }

    pub async fn leave(&mut self) -> anyhow::Result<()> {
        let game = self.game()?;
        self.module.leave_game(&mut self.builder, game);
        self.execute(Sender::Player).await?;
        Ok(())
    }

    /// Submits whatever the builder holds, then waits for the effects.
    async fn execute(&mut self, sender: Sender) -> anyhow::Result<Value> {
        let intent = self.builder.finish()?;
        let result = match sender {
            Sender::Sponsor => {
                self.submitter
                    .submit(intent, &self.sponsor, &self.sponsor)
                    .await
            }
            Sender::Player => {
                self.submitter
                    .submit(intent, &self.sponsor, &self.player)
                    .await
            }
        }
        .context("transaction submission failed")?;
        println!("Transaction submitted: {}", result.digest);

        let response = self
            .submitter
            .ledger()
            .wait_for_transaction(&result.digest, self.wait_timeout)
            .await
            .with_context(|| format!("waiting for {}", result.digest))?;

        if let Some(error) = execution_error(&response) {
            bail!("transaction {} failed: {error}", result.digest);
        }
        info!(digest = %result.digest, "transaction executed");
        Ok(response)
    }
}
