//! Call descriptors and the builder that collects them into an intent.

use crate::address::Address;
use crate::error::{Error, Result};

/// A pure (non-object) argument, encoded with BCS when the kind is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PureArg {
    Bool(bool),
    U8(u8),
    U64(u64),
    Address(Address),
    String(String),
}

impl PureArg {
    pub fn to_bcs(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            PureArg::Bool(v) => bcs::to_bytes(v)?,
            PureArg::U8(v) => bcs::to_bytes(v)?,
            PureArg::U64(v) => bcs::to_bytes(v)?,
            PureArg::Address(v) => bcs::to_bytes(v)?,
            PureArg::String(v) => bcs::to_bytes(v)?,
        };
        Ok(bytes)
    }
}

/// An on-chain object passed to a call.
///
/// Whether the object is owned or shared is discovered when the kind is built;
/// `mutable` only matters for shared objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInput {
    pub id: Address,
    pub mutable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Pure(PureArg),
    Object(ObjectInput),
}

impl Arg {
    pub fn object(id: Address) -> Self {
        Arg::Object(ObjectInput { id, mutable: true })
    }

    pub fn read_only(id: Address) -> Self {
        Arg::Object(ObjectInput { id, mutable: false })
    }
}

/// One entry-function call: `package::module::function(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCall {
    pub package: Address,
    pub module: String,
    pub function: String,
    pub arguments: Vec<Arg>,
}

impl MoveCall {
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

/// An ordered, non-empty call list describing one state transition.
///
/// Consumed by value on submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    calls: Vec<MoveCall>,
}

impl TransactionIntent {
    pub fn new(calls: Vec<MoveCall>) -> Result<Self> {
        if calls.is_empty() {
            return Err(Error::InvalidIntent("call list is empty".to_string()));
        }
        Ok(Self { calls })
    }

    pub fn calls(&self) -> &[MoveCall] {
        &self.calls
    }
}

/// Accumulates calls for the next intent.
///
/// [`IntentBuilder::finish`] moves the collected calls out, so the builder is
/// clear and ready for the next action as soon as an intent exists.
#[derive(Debug, Default)]
pub struct IntentBuilder {
    calls: Vec<MoveCall>,
}

impl IntentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_call(
        &mut self,
        package: Address,
        module: &str,
        function: &str,
        arguments: Vec<Arg>,
    ) -> &mut Self {
        self.calls.push(MoveCall {
            package,
            module: module.to_string(),
            function: function.to_string(),
            arguments,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn finish(&mut self) -> Result<TransactionIntent> {
        TransactionIntent::new(std::mem::take(&mut self.calls))
    }
}
