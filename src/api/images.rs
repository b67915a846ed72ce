use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::{
    error::Result,
    models::TokenQuery,
    services::{card_renderer, frame_flow::resolve_fan_token},
};

pub struct SvgImage(String);

impl IntoResponse for SvgImage {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, "image/svg+xml")], self.0).into_response()
    }
}

pub async fn home() -> SvgImage {
    SvgImage(card_renderer::home_card().render())
}

pub async fn search_result(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<SvgImage> {
    let query: TokenQuery = symbol.parse()?;
    let token = resolve_fan_token(state.directory.as_ref(), &query.symbol()).await?;
    let avatar = state.profile_images.profile_image(&query).await;
    Ok(SvgImage(card_renderer::token_card(&token, avatar).render()))
}

pub async fn moxie_amount(Path((balance, usd)): Path<(String, String)>) -> SvgImage {
    SvgImage(card_renderer::amount_card(&balance, &usd).render())
}

pub async fn share(
    State(state): State<AppState>,
    Path((symbol, burned)): Path<(String, String)>,
) -> Result<SvgImage> {
    let query: TokenQuery = symbol.parse()?;
    let token = resolve_fan_token(state.directory.as_ref(), &query.symbol()).await?;
    Ok(SvgImage(card_renderer::burned_card(&token, &burned).render()))
}

pub async fn waiting() -> SvgImage {
    SvgImage(card_renderer::waiting_card().render())
}
