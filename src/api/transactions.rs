use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use super::AppState;
use crate::{
    error::{AppError, Result},
    models::{FrameActionPayload, TransactionCall},
    services::onchain::parse_address,
};

/// POST /approve
pub async fn approve(State(state): State<AppState>) -> Result<Json<TransactionCall>> {
    let call = state.transactions.approve()?;
    tracing::debug!(
        "Approve call on {} for spender {:?}",
        call.chain_id,
        state.transactions.contracts().bonding_curve_address
    );
    Ok(Json(call))
}

/// POST /buy-n-burn-all/{subject}
pub async fn buy_and_burn_all(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    body: Bytes,
) -> Result<Json<TransactionCall>> {
    let payload = FrameActionPayload::from_body(&body)?;
    let subject = parse_address(&subject)?;
    let caller = payload
        .connected_address()
        .ok_or_else(|| AppError::BadRequest("Connect a wallet to reward fans".to_string()))?;
    let caller = parse_address(caller)?;

    let call = state.transactions.burn_all(subject, caller).await?;
    Ok(Json(call))
}

/// POST /buy-n-burn-selected/{subject}
pub async fn buy_and_burn_selected(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    body: Bytes,
) -> Result<Json<TransactionCall>> {
    let payload = FrameActionPayload::from_body(&body)?;
    let subject = parse_address(&subject)?;

    let call = state
        .transactions
        .burn_selected(subject, payload.input_text())?;
    Ok(Json(call))
}
