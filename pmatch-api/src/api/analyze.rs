//! Photo analysis endpoint
//!
//! `POST /api/analyze-face` takes a multipart upload (field `file`), runs it through the
//! vision port and the scoring engine, and answers with the chosen character record.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use pmatch_common::{classify, CharacterRecord};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{ApiError, ApiResult, AppState};

/// Multipart field carrying the image
const IMAGE_FIELD: &str = "file";

/// Pull the image bytes out of the upload, skipping unrelated fields
async fn read_image_field(multipart: &mut Multipart) -> ApiResult<Bytes> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            let data = field.bytes().await?;
            if data.is_empty() {
                return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
            }
            return Ok(data);
        }
    }
    Err(ApiError::BadRequest(format!("Missing multipart field '{}'", IMAGE_FIELD)))
}

/// POST /api/analyze-face
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn analyze_face(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<CharacterRecord>> {
    let image = read_image_field(&mut multipart).await?;
    info!(image_bytes = image.len(), analyzer = state.analyzer.name(), "Analyzing upload");

    let signals = match state.analyzer.analyze(&image).await {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Image analysis failed: {}", e);
            *state.last_error.write().await = Some(e.to_string());
            return Err(e.into());
        }
    };

    // Thread-local RNG is created after the last await and dropped before returning
    let classification = {
        let mut rng = rand::thread_rng();
        classify(&signals, &state.catalog, &mut rng)
    };

    info!(
        archetype = %classification.archetype,
        character = classification.character.id,
        "Character selected"
    );

    Ok(Json(*classification.character))
}

pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/api/analyze-face", post(analyze_face))
}
