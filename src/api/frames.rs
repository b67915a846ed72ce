use axum::{
    body::Bytes,
    extract::{Path, State},
};

use super::AppState;
use crate::{
    error::Result,
    models::{FrameActionPayload, FrameScreen},
};

/// GET|POST /
pub async fn home(State(state): State<AppState>) -> FrameScreen {
    state.flow.home()
}

/// POST /search-user-channel
pub async fn search_user_channel(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<FrameScreen> {
    let payload = FrameActionPayload::from_body(&body)?;
    state.flow.search(&payload).await
}

/// POST /check-moxie-amount/{symbol}
pub async fn check_moxie_amount(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    body: Bytes,
) -> Result<FrameScreen> {
    let payload = FrameActionPayload::from_body(&body)?;
    state.flow.check_amount(&symbol, &payload).await
}

/// POST /share-amount/{symbol}
pub async fn share_amount(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    body: Bytes,
) -> Result<FrameScreen> {
    let payload = FrameActionPayload::from_body(&body)?;
    state.flow.share_amount(&symbol, &payload).await
}

/// GET|POST /share-by-user/{symbol}/{burned}
pub async fn share_by_user(
    State(state): State<AppState>,
    Path((symbol, burned)): Path<(String, String)>,
) -> Result<FrameScreen> {
    state.flow.share_by_user(&symbol, &burned).await
}
