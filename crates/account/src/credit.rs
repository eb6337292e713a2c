use crate::session::AccountSession;
use playground_primitives::{parse_hex_quantity, GasCredit};
use tracing::{debug, warn};

/// Prepaid gas credit of the session's account, `None` when it can not be read
pub async fn read_gas_credit(session: &AccountSession) -> Option<GasCredit> {
    let Some(paymaster) = session.paymaster() else {
        debug!("No paymaster, skipping gas credit");
        return None;
    };

    match paymaster.get_user_credit(session.account_address(), session.chain_id()).await {
        Ok(Some(credit)) => match parse_hex_quantity(&credit.balance) {
            Some(balance) => Some(GasCredit::new(balance)),
            None => {
                warn!("Paymaster returned malformed credit balance {:?}", credit.balance);
                None
            }
        },
        Ok(None) => {
            debug!("No gas credit for {:?}", session.account_address());
            None
        }
        Err(err) => {
            warn!("Failed to read gas credit: {err}");
            None
        }
    }
}
