#![allow(dead_code)]

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use playground_account::{AccountReader, ReaderError};
use hyper::{
    header::HeaderValue,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server,
};
use jsonrpsee::{core::RpcResult, server::ServerBuilder, types::ErrorObject};
use playground_primitives::{
    constants::rpc_error_codes::VALIDATION, TransactionInclusion, UserOperation,
    UserOperationGasEstimation, UserOperationHash, UserOperationReceipt,
};
use playground_rpc::BundlerApiServer;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

pub fn estimation() -> UserOperationGasEstimation {
    UserOperationGasEstimation {
        pre_verification_gas: 45_000.into(),
        verification_gas_limit: 120_000.into(),
        call_gas_limit: 33_100.into(),
    }
}

pub fn transaction_hash() -> H256 {
    H256::repeat_byte(0x42)
}

/// Bundler accepting signed user operations and including each one after a number of receipt
/// queries
#[derive(Clone, Debug, Default)]
pub struct DummyBundler {
    pub sent: Arc<Mutex<Vec<(UserOperation, Address, u64)>>>,
    pub queries: Arc<Mutex<HashMap<UserOperationHash, u32>>>,
    pub pending_queries: u32,
}

#[async_trait]
impl BundlerApiServer for DummyBundler {
    async fn send_user_operation(
        &self,
        user_operation: UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> RpcResult<UserOperationHash> {
        if user_operation.signature.is_empty() {
            return Err(ErrorObject::owned(
                VALIDATION,
                "AA23 reverted: invalid signature",
                None::<()>,
            ));
        }
        let hash = user_operation.hash(&entry_point, chain_id);
        self.queries.lock().unwrap().insert(hash, 0);
        self.sent.lock().unwrap().push((user_operation, entry_point, chain_id));
        Ok(hash)
    }

    async fn estimate_user_operation_gas(
        &self,
        _user_operation: UserOperation,
        _entry_point: Address,
        _chain_id: u64,
    ) -> RpcResult<UserOperationGasEstimation> {
        Ok(estimation())
    }

    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
        _chain_id: u64,
    ) -> RpcResult<Option<UserOperationReceipt>> {
        let mut queries = self.queries.lock().unwrap();
        let Some(count) = queries.get_mut(&user_operation_hash) else {
            return Ok(None);
        };
        *count += 1;
        if *count <= self.pending_queries {
            return Ok(None);
        }
        Ok(Some(UserOperationReceipt {
            user_operation_hash,
            success: true,
            receipt: Some(TransactionInclusion {
                transaction_hash: Some(transaction_hash()),
                ..Default::default()
            }),
            ..Default::default()
        }))
    }
}

/// Starts the bundler on a free local port and returns its url
pub async fn start_bundler(bundler: DummyBundler) -> String {
    let server = ServerBuilder::default().build("127.0.0.1:0").await.unwrap();
    let address = server.local_addr().unwrap();
    let handle = server.start(bundler.into_rpc());
    tokio::spawn(handle.stopped());
    format!("http://{address}")
}

/// Request as seen by the paymaster
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub method: String,
    pub params: Value,
    pub authorization: Option<String>,
    pub app_id: Option<String>,
}

pub type Calls = Arc<Mutex<Vec<RecordedCall>>>;

/// Starts a paymaster recording every request (headers included)
///
/// `replies` maps method names to the `result` or `error` member of the response, unknown
/// methods are answered with a `null` result.
pub async fn start_paymaster(replies: HashMap<&'static str, Value>) -> (String, Calls) {
    let calls: Calls = Default::default();
    let replies = Arc::new(replies);

    let recorded = calls.clone();
    let make_service = make_service_fn(move |_| {
        let calls = recorded.clone();
        let replies = replies.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let calls = calls.clone();
                let replies = replies.clone();
                async move {
                    let header = |name: &str| {
                        req.headers().get(name).and_then(|v| v.to_str().ok()).map(String::from)
                    };
                    let authorization = header("authorization");
                    let app_id = header("x-app-id");

                    let body = hyper::body::to_bytes(req.into_body()).await.unwrap_or_default();
                    let request: Value = serde_json::from_slice(&body).unwrap_or_default();
                    let method = request["method"].as_str().unwrap_or_default().to_string();

                    let mut response =
                        replies.get(method.as_str()).cloned().unwrap_or(json!({ "result": null }));
                    response["jsonrpc"] = json!("2.0");
                    response["id"] = request["id"].clone();

                    calls.lock().unwrap().push(RecordedCall {
                        method,
                        params: request["params"].clone(),
                        authorization,
                        app_id,
                    });
                    let mut reply = Response::new(Body::from(response.to_string()));
                    reply
                        .headers_mut()
                        .insert("content-type", HeaderValue::from_static("application/json"));
                    Ok::<_, Infallible>(reply)
                }
            }))
        }
    });

    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_service);
    let url = format!("http://{}", server.local_addr());
    tokio::spawn(server);
    (url, calls)
}

/// Deployed account with a fixed address
#[derive(Debug)]
pub struct DeployedAccount(pub Address);

#[async_trait]
impl AccountReader for DeployedAccount {
    async fn account_address(&self, _owner: Address, _salt: U256) -> Result<Address, ReaderError> {
        Ok(self.0)
    }

    async fn is_deployed(&self, _account: Address) -> Result<bool, ReaderError> {
        Ok(true)
    }

    async fn nonce(&self, _account: Address) -> Result<U256, ReaderError> {
        Ok(U256::one())
    }

    async fn fees(&self) -> Result<(U256, U256), ReaderError> {
        Ok((U256::from(3_000_000_000u64), U256::from(1_500_000_000u64)))
    }
}
