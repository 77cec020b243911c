use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use utoipa::{OpenApi, ToSchema};

use patina_core::InspectionResult;

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct InspectRequest {
    /// Image file of the part. Content type must begin with `image/`.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Optional hint: burner_tube, grate, flavorizer_bar, etc.
    pub part_type: Option<String>,
}

#[utoipa::path(
    post,
    path = "/inspect",
    tag = "inspect",
    request_body(content_type = "multipart/form-data", content = InspectRequest),
    responses(
        (status = 200, description = "Inspection verdict", body = InspectionResult),
        (status = 400, description = "Missing, empty, or non-image file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "Upstream inspection failure", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn inspect(State(state): State<AppState>, mut multipart: Multipart) -> impl IntoResponse {
    let mut file: Option<(Option<String>, Bytes)> = None;
    let mut part_type: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Multipart read error: {}", e);
                return (
                    e.status(),
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart data: {}", e.body_text()),
                    }),
                )
                    .into_response();
            }
        };

        match field.name() {
            Some("file") => {
                let content_type = field.content_type().map(str::to_string);
                let data = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!("Field read error: {}", e);
                        return (
                            e.status(),
                            Json(ErrorResponse {
                                error: format!("Failed to read file data: {}", e.body_text()),
                            }),
                        )
                            .into_response();
                    }
                };
                file = Some((content_type, data));
            }
            Some("part_type") => {
                part_type = field
                    .text()
                    .await
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());
            }
            _ => {}
        }
    }

    let Some((content_type, data)) = file else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No file provided".to_string(),
            }),
        )
            .into_response();
    };

    // Reject non-images and empty uploads before any decoding work.
    if !content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("image/"))
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "file must be an image".to_string(),
            }),
        )
            .into_response();
    }

    if data.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "empty file".to_string(),
            }),
        )
            .into_response();
    }

    match patina_core::inspect(
        &data,
        part_type.as_deref(),
        &state.settings,
        state.provider.as_ref(),
    )
    .await
    {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            // The distinction between decode, provider, and parse failures
            // stays in the logs; callers see one upstream-failure class.
            tracing::error!(error = %e, "inspection failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "upstream inspection failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(OpenApi)]
#[openapi(paths(inspect), components(schemas(InspectRequest)))]
pub struct ApiDoc;
