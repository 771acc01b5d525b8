//! Entry functions of the on-chain `game` module.

use crate::address::Address;
use crate::intent::{Arg, IntentBuilder, PureArg};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Side length of the board created by `make_game`.
pub const GRID_SIZE: u8 = 7;

/// The ledger's shared randomness object.
pub const RANDOM_OBJECT: Address = Address::from_low_byte(0x8);

const MODULE: &str = "game";

/// A move or a shot in one of four directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    ShootLeft,
    ShootRight,
    ShootUp,
    ShootDown,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 8] = [
        PlayerAction::MoveLeft,
        PlayerAction::MoveRight,
        PlayerAction::MoveUp,
        PlayerAction::MoveDown,
        PlayerAction::ShootLeft,
        PlayerAction::ShootRight,
        PlayerAction::ShootUp,
        PlayerAction::ShootDown,
    ];

    /// The choice code `play_game` expects.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Keyboard shorthand.
    pub fn key(self) -> &'static str {
        match self {
            PlayerAction::MoveLeft => "l",
            PlayerAction::MoveRight => "r",
            PlayerAction::MoveUp => "u",
            PlayerAction::MoveDown => "d",
            PlayerAction::ShootLeft => "sl",
            PlayerAction::ShootRight => "sr",
            PlayerAction::ShootUp => "su",
            PlayerAction::ShootDown => "sd",
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown action `{0}`")]
pub struct UnknownAction(pub String);

impl FromStr for PlayerAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        PlayerAction::ALL
            .into_iter()
            .find(|action| action.key() == key)
            .ok_or_else(|| UnknownAction(key.to_string()))
    }
}

/// Marshals game calls into an [`IntentBuilder`].
///
/// Pure arguments are encoded with fixed widths, so the published module's
/// entry functions must take, in order:
///
/// ```text
/// make_game   (&mut master cap, grid_size: u64, &Random)
/// kick_player (&mut master cap, &mut game, player: address)
/// join_game   (&mut game, name: String)
/// leave_game  (&mut game)
/// play_game   (&mut game, choice: u8, &Random)
/// ```
///
/// A different width makes the node reject the call when it checks argument
/// types.
#[derive(Debug, Clone, Copy)]
pub struct GameModule {
    package: Address,
}

impl GameModule {
    pub fn new(package: Address) -> Self {
        Self { package }
    }

    pub fn make_game(&self, builder: &mut IntentBuilder, master_cap: Address, grid_size: u8) {
        builder.move_call(
            self.package,
            MODULE,
            "make_game",
            vec![
                Arg::object(master_cap),
                Arg::Pure(PureArg::U64(u64::from(grid_size))),
                Arg::read_only(RANDOM_OBJECT),
            ],
        );
    }

    pub fn kick_player(
        &self,
        builder: &mut IntentBuilder,
        master_cap: Address,
        game: Address,
        player: Address,
    ) {
        builder.move_call(
            self.package,
            MODULE,
            "kick_player",
            vec![
                Arg::object(master_cap),
                Arg::object(game),
                Arg::Pure(PureArg::Address(player)),
            ],
        );
    }

    pub fn join_game(&self, builder: &mut IntentBuilder, game: Address, player_name: &str) {
        builder.move_call(
            self.package,
            MODULE,
            "join_game",
            vec![
                Arg::object(game),
                Arg::Pure(PureArg::String(player_name.to_string())),
            ],
        );
    }

    pub fn leave_game(&self, builder: &mut IntentBuilder, game: Address) {
        builder.move_call(self.package, MODULE, "leave_game", vec![Arg::object(game)]);
    }

    pub fn play_game(&self, builder: &mut IntentBuilder, game: Address, action: PlayerAction) {
        builder.move_call(
            self.package,
            MODULE,
            "play_game",
            vec![
                Arg::object(game),
                Arg::Pure(PureArg::U8(action.code())),
                Arg::read_only(RANDOM_OBJECT),
            ],
        );
    }
}
