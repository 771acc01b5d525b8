//! [`Ledger`] over JSON-RPC.

use crate::client::LedgerClient;
use crate::error::RpcError;
use crate::objects::{self, CoinPage, GasSelection};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use gridstrike_core::tx::{ObjectOwnership, ProgrammableTransaction, TransactionKind};
use gridstrike_core::{Address, Arg, Ledger, MoveCall, ObjectRef, Signature};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::debug;

const GAS_COIN_TYPE: &str = "0x2::sui::SUI";

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    digest: String,
}

impl LedgerClient {
    async fn resolve_objects(
        &self,
        calls: &[MoveCall],
    ) -> Result<HashMap<Address, ObjectOwnership>, RpcError> {
        let mut resolved = HashMap::new();
        let inputs = calls
            .iter()
            .flat_map(|call| call.arguments.iter())
            .filter_map(|arg| match arg {
                Arg::Object(input) => Some(input.id),
                Arg::Pure(_) => None,
            });
        for id in inputs {
            if resolved.contains_key(&id) {
                continue;
            }
            let data = self.get_object(id).await?;
            let ownership = objects::ownership(&data)?;
            debug!(object = %id, ?ownership, "resolved object input");
            resolved.insert(id, ownership);
        }
        Ok(resolved)
    }

    async fn select_gas(&self, owner: Address, budget: u64) -> Result<Vec<ObjectRef>, RpcError> {
        let mut selection = GasSelection::default();
        let mut cursor: Option<String> = None;
        loop {
            let page: CoinPage = self
                .call(
                    "suix_getCoins",
                    json!([owner.to_string(), GAS_COIN_TYPE, cursor, Value::Null]),
                )
                .await?;
            if selection.extend(&page.data, budget)? || !page.has_next_page {
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        if !selection.is_covered(budget) {
            return Err(RpcError::InsufficientGas {
                owner: owner.to_string(),
                budget,
                available: selection.total,
            });
        }
        debug!(owner = %owner, coins = selection.coins.len(), total = selection.total, "selected gas");
        Ok(selection.coins)
    }
}

impl Ledger for LedgerClient {
    async fn build_kind(&self, calls: &[MoveCall]) -> gridstrike_core::Result<Vec<u8>> {
        let objects = self.resolve_objects(calls).await?;
        let ptb = ProgrammableTransaction::from_calls(calls, &objects)?;
        TransactionKind::ProgrammableTransaction(ptb).to_bytes()
    }

    async fn gas_payment(
        &self,
        owner: Address,
        budget: u64,
    ) -> gridstrike_core::Result<Vec<ObjectRef>> {
        Ok(self.select_gas(owner, budget).await?)
    }

    async fn submit_signed(
        &self,
        tx_bytes: &[u8],
        signatures: &[Signature],
    ) -> gridstrike_core::Result<String> {
        let encoded: Vec<String> = signatures
            .iter()
            .map(|sig| BASE64.encode(sig.as_bytes()))
            .collect();
        let response: ExecuteResponse = self
            .call(
                "sui_executeTransactionBlock",
                json!([BASE64.encode(tx_bytes), encoded, Value::Null, "WaitForEffectsCert"]),
            )
            .await?;
        Ok(response.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_node::TestNode;
    use gridstrike_core::game::{GameModule, PlayerAction, RANDOM_OBJECT};
    use gridstrike_core::tx::{CallArg, ObjectArg, TransactionData};
    use gridstrike_core::{Identity, IntentBuilder, SponsoredSubmitter, SubmitterConfig};

    struct FixedIdentity {
        address: Address,
        tag: u8,
    }

    impl Identity for FixedIdentity {
        fn address(&self) -> Address {
            self.address
        }

        async fn sign(&self, _tx_bytes: &[u8]) -> gridstrike_core::Result<Signature> {
            Ok(Signature::new(vec![self.tag; 8]))
        }
    }

    fn digest_b58(byte: u8) -> String {
        bs58::encode([byte; 32]).into_string()
    }

    fn coin(id: u8, balance: u64) -> Value {
        json!({
            "coinObjectId": Address::from_low_byte(id).to_string(),
            "version": "1",
            "digest": digest_b58(id),
            "balance": balance.to_string()
        })
    }

    fn shared_object(id: &Value, initial_shared_version: u64) -> Value {
        json!({
            "data": {
                "objectId": id,
                "version": "9",
                "digest": digest_b58(9),
                "owner": { "Shared": { "initial_shared_version": initial_shared_version } }
            }
        })
    }

    #[tokio::test]
    async fn sponsored_move_reaches_node_sponsor_first() {
        let random = RANDOM_OBJECT.to_string();
        let node = TestNode::start(move |method, params| match method {
            "sui_getObject" if params[0] == random.as_str() => Ok(shared_object(&params[0], 1)),
            "sui_getObject" => Ok(shared_object(&params[0], 3)),
            "suix_getCoins" => Ok(json!({
                "data": [coin(0xc1, 20_000_000)],
                "nextCursor": null,
                "hasNextPage": false
            })),
            "sui_executeTransactionBlock" => Ok(json!({ "digest": "Dg1" })),
            other => Err((-32601, format!("unexpected {other}"))),
        })
        .await;

        let sponsor = FixedIdentity {
            address: Address::from_low_byte(0xaa),
            tag: 0x51,
        };
        let player = FixedIdentity {
            address: Address::from_low_byte(0xbb),
            tag: 0x52,
        };
        let game = Address::from_low_byte(0x61);
        let mut builder = IntentBuilder::new();
        GameModule::new(Address::from_low_byte(0x99)).play_game(
            &mut builder,
            game,
            PlayerAction::MoveUp,
        );

        let submitter = SponsoredSubmitter::new(
            node.client(),
            SubmitterConfig::new(node.endpoint.clone()),
        );
        let result = submitter
            .submit(builder.finish().expect("intent"), &sponsor, &player)
            .await
            .expect("submit");
        assert_eq!(result.digest, "Dg1");
        assert_eq!(node.params("sui_getObject").len(), 2);

        let executed = node.params("sui_executeTransactionBlock");
        assert_eq!(executed.len(), 1);
        let params = &executed[0];
        assert_eq!(
            params[1],
            json!([BASE64.encode([0x51; 8]), BASE64.encode([0x52; 8])])
        );
        assert_eq!(params[3], "WaitForEffectsCert");

        let tx_bytes = BASE64
            .decode(params[0].as_str().expect("tx bytes"))
            .expect("base64");
        let data = TransactionData::from_bytes(&tx_bytes).expect("decode");
        assert_eq!(data.sender(), player.address);
        assert_eq!(data.gas_data().owner, sponsor.address);
        assert_eq!(data.gas_data().budget, 10_000_000);
        assert_eq!(
            data.gas_data()
                .payment
                .iter()
                .map(|c| c.object_id)
                .collect::<Vec<_>>(),
            vec![Address::from_low_byte(0xc1)]
        );
        let TransactionKind::ProgrammableTransaction(ptb) = data.kind();
        assert_eq!(
            ptb.inputs,
            vec![
                CallArg::Object(ObjectArg::SharedObject {
                    id: game,
                    initial_shared_version: 3,
                    mutable: true,
                }),
                CallArg::Pure(vec![2]),
                CallArg::Object(ObjectArg::SharedObject {
                    id: RANDOM_OBJECT,
                    initial_shared_version: 1,
                    mutable: false,
                }),
            ]
        );
    }

    #[tokio::test]
    async fn gas_selection_follows_cursor() {
        let node = TestNode::start(|method, params| match (method, params[2].as_str()) {
            ("suix_getCoins", None) => Ok(json!({
                "data": [coin(0xc1, 4_000_000)],
                "nextCursor": "page-2",
                "hasNextPage": true
            })),
            ("suix_getCoins", Some("page-2")) => Ok(json!({
                "data": [coin(0xc2, 8_000_000), coin(0xc3, 8_000_000)],
                "nextCursor": null,
                "hasNextPage": false
            })),
            _ => Err((-32601, "unexpected request".to_string())),
        })
        .await;

        let owner = Address::from_low_byte(0xaa);
        let client = node.client();
        let payment = client.gas_payment(owner, 10_000_000).await.expect("gas");
        assert_eq!(
            payment.iter().map(|c| c.object_id).collect::<Vec<_>>(),
            vec![Address::from_low_byte(0xc1), Address::from_low_byte(0xc2)]
        );

        let requests = node.params("suix_getCoins");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0][0], owner.to_string().as_str());
        assert_eq!(requests[0][1], GAS_COIN_TYPE);
        assert_eq!(requests[1][2], "page-2");
    }

    #[tokio::test]
    async fn gas_shortfall_names_owner_and_total() {
        let node = TestNode::start(|_, _| {
            Ok(json!({ "data": [coin(0xc1, 5)], "nextCursor": null, "hasNextPage": false }))
        })
        .await;

        let client = node.client();
        match client.select_gas(Address::from_low_byte(0xaa), 10).await {
            Err(RpcError::InsufficientGas {
                budget, available, ..
            }) => {
                assert_eq!(budget, 10);
                assert_eq!(available, 5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
