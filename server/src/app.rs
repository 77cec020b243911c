//! Router assembly, shared between `main` and the endpoint tests.

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use utoipa_swagger_ui::SwaggerUi;

use crate::{api, auth, AppState};

/// Build the application router: open health endpoint, token-protected
/// inspect endpoint, Swagger UI, permissive CORS.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/inspect", post(api::inspect::inspect))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .route("/healthz", get(api::health::healthz))
        .merge(protected)
        .merge(swagger_ui)
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppContext;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use patina_core::{DemoProvider, InspectionResult, Settings, VisionProvider};
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    fn jpeg_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(16, 16, Rgb([160u8, 90, 40])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
        buf.into_inner()
    }

    fn multipart_body(file: Option<(&str, &[u8])>, part_type: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((content_type, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"part.jpg\"\r\nContent-Type: {}\r\n\r\n",
                    BOUNDARY, content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(part_type) = part_type {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"part_type\"\r\n\r\n{}\r\n",
                    BOUNDARY, part_type
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn inspect_request(body: Vec<u8>, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/inspect")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn demo_state(settings: Settings) -> AppState {
        let canned = json!({
            "classification": "deep_corrosion_replace",
            "confidence": 0.91,
            "rationale": "pitting visible"
        })
        .as_object()
        .unwrap()
        .clone();
        let provider: Box<dyn VisionProvider> =
            Box::new(DemoProvider::with_payload(settings.openai_model.clone(), canned));
        Arc::new(AppContext { settings, provider })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = router(demo_state(Settings::default()));
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_inspect_happy_path() {
        let app = router(demo_state(Settings::default()));
        let jpeg = jpeg_bytes();
        let body = multipart_body(Some(("image/jpeg", &jpeg)), Some("flavorizer_bar"));

        let response = app.oneshot(inspect_request(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let result: InspectionResult = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(result.classification, "deep_corrosion_replace");
        assert!(!result.needs_review);
        assert!(result.model_version.ends_with("-demo"));
    }

    #[tokio::test]
    async fn test_inspect_rejects_missing_file() {
        let app = router(demo_state(Settings::default()));
        let body = multipart_body(None, Some("grate"));

        let response = app.oneshot(inspect_request(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_inspect_rejects_empty_file() {
        let app = router(demo_state(Settings::default()));
        let body = multipart_body(Some(("image/jpeg", b"")), None);

        let response = app.oneshot(inspect_request(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "empty file");
    }

    #[tokio::test]
    async fn test_inspect_rejects_non_image_content_type() {
        let app = router(demo_state(Settings::default()));
        let body = multipart_body(Some(("text/plain", b"hello")), None);

        let response = app.oneshot(inspect_request(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "file must be an image");
    }

    #[tokio::test]
    async fn test_inspect_undecodable_image_is_upstream_failure() {
        // Content type says image, bytes are garbage: passes the HTTP-layer
        // checks and fails in the normalizer, reported as one 502 class.
        let app = router(demo_state(Settings::default()));
        let body = multipart_body(Some(("image/jpeg", b"not really a jpeg")), None);

        let response = app.oneshot(inspect_request(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "upstream inspection failed");
    }

    #[tokio::test]
    async fn test_inspect_unconfigured_provider_is_upstream_failure() {
        let settings = Settings::default();
        let provider = patina_core::provider_from_settings(&settings);
        let state = Arc::new(AppContext { settings, provider });
        let app = router(state);

        let jpeg = jpeg_bytes();
        let body = multipart_body(Some(("image/jpeg", &jpeg)), None);

        let response = app.oneshot(inspect_request(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_auth_missing_header() {
        let settings = Settings {
            api_token: Some("secret".to_string()),
            ..Settings::default()
        };
        let app = router(demo_state(settings));
        let jpeg = jpeg_bytes();
        let body = multipart_body(Some(("image/jpeg", &jpeg)), None);

        let response = app.oneshot(inspect_request(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_wrong_token() {
        let settings = Settings {
            api_token: Some("secret".to_string()),
            ..Settings::default()
        };
        let app = router(demo_state(settings));
        let jpeg = jpeg_bytes();
        let body = multipart_body(Some(("image/jpeg", &jpeg)), None);

        let response = app
            .oneshot(inspect_request(body, Some("wrong")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_auth_valid_token() {
        let settings = Settings {
            api_token: Some("secret".to_string()),
            ..Settings::default()
        };
        let app = router(demo_state(settings));
        let jpeg = jpeg_bytes();
        let body = multipart_body(Some(("image/jpeg", &jpeg)), None);

        let response = app
            .oneshot(inspect_request(body, Some("secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_healthz_skips_auth() {
        let settings = Settings {
            api_token: Some("secret".to_string()),
            ..Settings::default()
        };
        let app = router(demo_state(settings));
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
