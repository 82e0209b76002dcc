use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{debug, warn};

use super::AppState;
use crate::error::{Error, Result};
use crate::models::{AnalyzeResponse, ImagePayload};

/// Multipart field carrying the product photo.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /analyze-product`
///
/// Always answers 200 with JSON. Upload problems are reported the same way as
/// pipeline failures, as `{"error": ...}`.
pub async fn analyze_product_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Json<AnalyzeResponse> {
    let image = match multipart {
        Ok(mut multipart) => read_image(&mut multipart).await,
        Err(rejection) => Err(Error::Upload(rejection.body_text())),
    };

    match image {
        Ok(image) => Json(state.pipeline.analyze_product(image).await),
        Err(e) => {
            warn!(error = %e, "Rejected upload");
            Json(AnalyzeResponse::failed(e))
        }
    }
}

async fn read_image(multipart: &mut Multipart) -> Result<ImagePayload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Upload(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        debug!(
            file_name = ?field.file_name(),
            content_type = ?field.content_type(),
            "Reading uploaded image"
        );

        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Upload(e.body_text()))?;
        return Ok(ImagePayload::from(bytes.to_vec()));
    }

    Err(Error::Upload(format!("missing `{}` field", UPLOAD_FIELD)))
}
