//! Canonical transaction encoding.
//!
//! Only the subset the game needs is modelled: programmable transactions made
//! of Move calls with pure and object inputs. Variant order in every enum
//! matches the ledger's BCS layout, so unused variants that precede used ones
//! are kept.

use crate::address::{Address, ObjectRef};
use crate::error::{Error, Result};
use crate::intent::{Arg, MoveCall};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How an object referenced by a call is owned, as reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectOwnership {
    /// Address-owned or immutable: passed by exact version.
    Owned(ObjectRef),
    /// Shared: passed by id and the version it became shared at.
    Shared { initial_shared_version: u64 },
}

/// An object input as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject {
        id: Address,
        initial_shared_version: u64,
        mutable: bool,
    },
}

/// One transaction input: BCS bytes of a pure value, or an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    Pure(Vec<u8>),
    Object(ObjectArg),
}

/// A command argument, referring to the gas coin or an input by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
}

/// Type arguments are never produced by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {}

/// `package::module::function(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub package: Address,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

/// A step of a programmable transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
}

/// Inputs and the commands that consume them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl ProgrammableTransaction {
    /// Lays out `calls` as inputs and commands.
    ///
    /// Pure arguments each get their own input; an object referenced more than
    /// once shares one input, and is mutable if any reference asks for it.
    pub fn from_calls(
        calls: &[MoveCall],
        objects: &HashMap<Address, ObjectOwnership>,
    ) -> Result<Self> {
        let mut inputs: Vec<CallArg> = Vec::new();
        let mut object_slots: HashMap<Address, usize> = HashMap::new();
        let mut commands = Vec::with_capacity(calls.len());

        for call in calls {
            let mut arguments = Vec::with_capacity(call.arguments.len());
            for arg in &call.arguments {
                let slot = match arg {
                    Arg::Pure(value) => {
                        inputs.push(CallArg::Pure(value.to_bcs()?));
                        inputs.len() - 1
                    }
                    Arg::Object(input) => {
                        if let Some(&slot) = object_slots.get(&input.id) {
                            if let CallArg::Object(ObjectArg::SharedObject { mutable, .. }) =
                                &mut inputs[slot]
                            {
                                *mutable |= input.mutable;
                            }
                            slot
                        } else {
                            let ownership = objects.get(&input.id).ok_or_else(|| {
                                Error::InvalidIntent(format!("object {} was not resolved", input.id))
                            })?;
                            let object_arg = match *ownership {
                                ObjectOwnership::Owned(object_ref) => {
                                    ObjectArg::ImmOrOwnedObject(object_ref)
                                }
                                ObjectOwnership::Shared {
                                    initial_shared_version,
                                } => ObjectArg::SharedObject {
                                    id: input.id,
                                    initial_shared_version,
                                    mutable: input.mutable,
                                },
                            };
                            inputs.push(CallArg::Object(object_arg));
                            object_slots.insert(input.id, inputs.len() - 1);
                            inputs.len() - 1
                        }
                    }
                };
                let index = u16::try_from(slot)
                    .map_err(|_| Error::InvalidIntent("too many inputs".to_string()))?;
                arguments.push(Argument::Input(index));
            }
            commands.push(Command::MoveCall(Box::new(ProgrammableMoveCall {
                package: call.package,
                module: call.module.clone(),
                function: call.function.clone(),
                type_arguments: Vec::new(),
                arguments,
            })));
        }

        Ok(Self { inputs, commands })
    }
}

/// The transaction body without sender or gas: what gets signed is decided
/// later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

impl TransactionKind {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bcs::from_bytes(bytes)
            .map_err(|e| Error::InvalidIntent(format!("kind bytes do not decode: {e}")))
    }
}

/// Coins paying for the transaction and the account that owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: Address,
    pub price: u64,
    pub budget: u64,
}

/// Epoch after which the transaction is rejected. Always `None` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExpiration {
    None,
    Epoch(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: Address,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

/// The signed transaction body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bcs::from_bytes(bytes)
            .map_err(|e| Error::InvalidIntent(format!("transaction bytes do not decode: {e}")))
    }

    pub fn sender(&self) -> Address {
        let TransactionData::V1(data) = self;
        data.sender
    }

    pub fn gas_data(&self) -> &GasData {
        let TransactionData::V1(data) = self;
        &data.gas_data
    }

    pub fn kind(&self) -> &TransactionKind {
        let TransactionData::V1(data) = self;
        &data.kind
    }
}

/// A transaction being addressed for signing.
///
/// Starts from kind bytes alone; sender and gas owner must both be set before
/// [`TransactionEnvelope::to_bytes`] succeeds.
#[derive(Debug, Clone)]
pub struct TransactionEnvelope {
    kind: TransactionKind,
    sender: Option<Address>,
    gas_owner: Option<Address>,
    gas_price: u64,
    gas_budget: u64,
    gas_payment: Vec<ObjectRef>,
}

impl TransactionEnvelope {
    /// Fails with `InvalidIntent` when `kind_bytes` do not decode.
    pub fn from_kind(kind_bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            kind: TransactionKind::from_bytes(kind_bytes)?,
            sender: None,
            gas_owner: None,
            gas_price: 0,
            gas_budget: 0,
            gas_payment: Vec::new(),
        })
    }

    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_gas_owner(mut self, owner: Address) -> Self {
        self.gas_owner = Some(owner);
        self
    }

    pub fn with_gas_price(mut self, price: u64) -> Self {
        self.gas_price = price;
        self
    }

    pub fn with_gas_budget(mut self, budget: u64) -> Self {
        self.gas_budget = budget;
        self
    }

    pub fn with_gas_payment(mut self, payment: Vec<ObjectRef>) -> Self {
        self.gas_payment = payment;
        self
    }

    pub fn to_data(&self) -> Result<TransactionData> {
        let sender = self
            .sender
            .ok_or_else(|| Error::InvalidIntent("envelope has no sender".to_string()))?;
        let owner = self
            .gas_owner
            .ok_or_else(|| Error::InvalidIntent("envelope has no gas owner".to_string()))?;
        Ok(TransactionData::V1(TransactionDataV1 {
            kind: self.kind.clone(),
            sender,
            gas_data: GasData {
                payment: self.gas_payment.clone(),
                owner,
                price: self.gas_price,
                budget: self.gas_budget,
            },
            expiration: TransactionExpiration::None,
        }))
    }

    /// Canonical bytes that every signer signs.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(&self.to_data()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::ObjectDigest;
    use crate::intent::{IntentBuilder, PureArg};

    fn game_id() -> Address {
        Address::from_low_byte(0x61)
    }

    fn shared_game() -> HashMap<Address, ObjectOwnership> {
        let mut objects = HashMap::new();
        objects.insert(
            game_id(),
            ObjectOwnership::Shared {
                initial_shared_version: 3,
            },
        );
        objects.insert(
            Address::from_low_byte(8),
            ObjectOwnership::Shared {
                initial_shared_version: 1,
            },
        );
        objects
    }

    fn play_calls() -> Vec<MoveCall> {
        let mut builder = IntentBuilder::new();
        builder.move_call(
            Address::from_low_byte(2),
            "game",
            "play_game",
            vec![
                Arg::object(game_id()),
                Arg::Pure(PureArg::U8(2)),
                Arg::read_only(Address::from_low_byte(8)),
            ],
        );
        builder.finish().expect("intent").calls().to_vec()
    }

    #[test]
    fn repeated_objects_share_one_input() {
        let mut calls = play_calls();
        calls.extend(play_calls());
        let ptb = ProgrammableTransaction::from_calls(&calls, &shared_game()).expect("ptb");

        // game, choice, random, choice
        assert_eq!(ptb.inputs.len(), 4);
        let Command::MoveCall(second) = &ptb.commands[1];
        assert_eq!(
            second.arguments,
            vec![Argument::Input(0), Argument::Input(3), Argument::Input(2)]
        );
        assert_eq!(
            ptb.inputs[2],
            CallArg::Object(ObjectArg::SharedObject {
                id: Address::from_low_byte(8),
                initial_shared_version: 1,
                mutable: false,
            })
        );
    }

    #[test]
    fn unresolved_object_is_rejected() {
        let err = ProgrammableTransaction::from_calls(&play_calls(), &HashMap::new())
            .expect_err("unresolved");
        assert!(matches!(err, Error::InvalidIntent(_)));
    }

    #[test]
    fn envelope_carries_sender_and_gas_owner() {
        let ptb = ProgrammableTransaction::from_calls(&play_calls(), &shared_game()).expect("ptb");
        let kind = TransactionKind::ProgrammableTransaction(ptb);
        let kind_bytes = kind.to_bytes().expect("kind");

        let coin = ObjectRef::new(Address::from_low_byte(0xc0), 5, ObjectDigest::new([1; 32]));
        let bytes = TransactionEnvelope::from_kind(&kind_bytes)
            .expect("envelope")
            .with_sender(Address::from_low_byte(0xbb))
            .with_gas_owner(Address::from_low_byte(0xaa))
            .with_gas_price(1000)
            .with_gas_budget(10_000_000)
            .with_gas_payment(vec![coin])
            .to_bytes()
            .expect("bytes");

        let data = TransactionData::from_bytes(&bytes).expect("decode");
        assert_eq!(data.sender(), Address::from_low_byte(0xbb));
        assert_eq!(data.gas_data().owner, Address::from_low_byte(0xaa));
        assert_eq!(data.gas_data().price, 1000);
        assert_eq!(data.gas_data().budget, 10_000_000);
        assert_eq!(data.gas_data().payment, vec![coin]);
        assert_eq!(data.kind(), &kind);
    }

    #[test]
    fn envelope_without_sender_does_not_encode() {
        let ptb = ProgrammableTransaction::from_calls(&play_calls(), &shared_game()).expect("ptb");
        let kind_bytes = TransactionKind::ProgrammableTransaction(ptb)
            .to_bytes()
            .expect("kind");
        let envelope = TransactionEnvelope::from_kind(&kind_bytes)
            .expect("envelope")
            .with_gas_owner(Address::from_low_byte(0xaa));
        assert!(matches!(envelope.to_bytes(), Err(Error::InvalidIntent(_))));
    }

    #[test]
    fn garbage_kind_bytes_are_invalid() {
        assert!(matches!(
            TransactionEnvelope::from_kind(&[0xff, 0x00]),
            Err(Error::InvalidIntent(_))
        ));
    }
}
