//! Transfer requests to call payloads

use crate::error::PlaygroundError;
use playground_contracts::erc20_transfer;
use playground_primitives::{
    constants::transfer::{BATCH_COPIES, NATIVE_DECIMALS},
    to_smallest_unit, CallPayload, ChainSpec, TransferRequest,
};

/// Payloads executing the transfer on `chain`
///
/// A batched request yields the same payload [BATCH_COPIES] times.
pub fn build(
    request: &TransferRequest,
    chain: &ChainSpec,
) -> Result<Vec<CallPayload>, PlaygroundError> {
    let payload = build_call(request, chain)?;
    if request.batch {
        Ok(vec![payload; BATCH_COPIES])
    } else {
        Ok(vec![payload])
    }
}

/// One payload per request, in order (the `batch` flag of the requests is ignored)
pub fn build_batch(
    requests: &[TransferRequest],
    chain: &ChainSpec,
) -> Result<Vec<CallPayload>, PlaygroundError> {
    requests.iter().map(|request| build_call(request, chain)).collect()
}

fn build_call(
    request: &TransferRequest,
    chain: &ChainSpec,
) -> Result<CallPayload, PlaygroundError> {
    if request.is_native() {
        let value = to_smallest_unit(&request.amount, NATIVE_DECIMALS)?;
        return Ok(CallPayload::native(request.recipient, value));
    }

    let token = chain.find_token(&request.token).ok_or(PlaygroundError::UnknownToken {
        token: request.token,
        chain_id: chain.id(),
    })?;
    let amount = to_smallest_unit(&request.amount, token.decimals)?;
    Ok(CallPayload::call(token.address, erc20_transfer(request.recipient, amount)))
}
