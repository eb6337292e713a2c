use crate::{error::paymaster_error, paymaster_api::PaymasterApiClient};
use async_trait::async_trait;
use ethers::types::Address;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use playground_account::{PaymasterClient, PaymasterError};
use playground_primitives::{
    constants::{paymaster::APP_ID_HEADER, rpc_error_codes::USER_OPERATION_HASH},
    PaymasterSponsorship, PendingUserOperation, UserCredit, UserOperation, UserOperationHash,
};
use std::{fmt, sync::Arc};
use tracing::{debug, trace};

/// Source of the bearer token presented to the paymaster
///
/// The token is requested again for every call, so sources may refresh it.
#[async_trait]
pub trait TokenSource: Send + Sync + fmt::Debug {
    async fn token(&self) -> Result<String, PaymasterError>;
}

/// Token configured at startup
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String, PaymasterError> {
        if self.0.is_empty() {
            return Err(PaymasterError::Credentials { inner: "empty paymaster token".into() });
        }
        Ok(self.0.clone())
    }
}

fn credentials(err: impl fmt::Display) -> PaymasterError {
    PaymasterError::Credentials { inner: err.to_string() }
}

/// Paymaster reached over HTTP JSON-RPC
#[derive(Clone, Debug)]
pub struct HttpPaymasterClient {
    url: String,
    app_id: String,
    tokens: Arc<dyn TokenSource>,
}

impl HttpPaymasterClient {
    pub fn new(
        url: impl Into<String>,
        app_id: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self { url: url.into(), app_id: app_id.into(), tokens }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn headers(&self, token: &str) -> Result<HeaderMap, PaymasterError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(credentials)?,
        );
        headers.insert(
            HeaderName::from_bytes(APP_ID_HEADER.as_bytes()).map_err(credentials)?,
            HeaderValue::from_str(&self.app_id).map_err(credentials)?,
        );
        Ok(headers)
    }

    /// Client carrying the current credentials
    async fn client(&self) -> Result<HttpClient, PaymasterError> {
        let token = self.tokens.token().await?;
        HttpClientBuilder::default()
            .set_headers(self.headers(&token)?)
            .build(&self.url)
            .map_err(|err| PaymasterError::Transport { inner: err.to_string() })
    }
}

#[async_trait]
impl PaymasterClient for HttpPaymasterClient {
    async fn sponsor_user_operation(
        &self,
        uo: &UserOperation,
        entry_point: Address,
        chain_id: u64,
    ) -> Result<PaymasterSponsorship, PaymasterError> {
        trace!("Requesting sponsorship of {uo:?} from {}", self.url);
        let client = self.client().await?;
        PaymasterApiClient::sponsor_user_operation(&client, uo.clone(), entry_point, chain_id)
            .await
            .map_err(paymaster_error)
    }

    async fn get_user_credit(
        &self,
        address: Address,
        chain_id: u64,
    ) -> Result<Option<UserCredit>, PaymasterError> {
        let client = self.client().await?;
        PaymasterApiClient::get_user_credit(&client, address, chain_id)
            .await
            .map_err(paymaster_error)
    }

    async fn list_pending_user_operations(
        &self,
        address: Address,
    ) -> Result<Vec<PendingUserOperation>, PaymasterError> {
        let client = self.client().await?;
        PaymasterApiClient::list_pending_user_operations(&client, address)
            .await
            .map_err(paymaster_error)
    }

    async fn reject_user_operation(
        &self,
        uo_hash: &UserOperationHash,
    ) -> Result<(), PaymasterError> {
        let client = self.client().await?;
        let rejected = PaymasterApiClient::reject_user_operation(&client, *uo_hash)
            .await
            .map_err(paymaster_error)?;
        if !rejected {
            debug!("Paymaster does not know user operation {uo_hash}");
            return Err(PaymasterError::Rpc {
                code: USER_OPERATION_HASH,
                message: format!("user operation {uo_hash} is not pending"),
            });
        }
        Ok(())
    }
}
