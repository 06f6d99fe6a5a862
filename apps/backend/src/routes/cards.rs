//! Card catalog endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/cards/catalog
pub async fn catalog(State(state): State<AppState>) -> Result<Json<Catalog>> {
    let cards = state.cards.fetch_all().await?;
    Ok(Json(Catalog::from_cards(&cards)))
}
