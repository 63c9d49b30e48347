use std::path::PathBuf;

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;
use shared::models::VideoUploadUrlRequest;

use crate::error::GatewayError;
use crate::storage::s3_service::S3Service;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    let index = PathBuf::from(&frontend_dir).join("index.html");

    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        GatewayError::InvalidRequest(err.to_string()).into()
    }))
    .service(web::resource("/health").route(web::get().to(health)))
    .service(web::resource("/api/uploads/video-url").route(web::post().to(create_video_upload_url)))
    .service(
        Files::new("/", frontend_dir)
            .index_file("index.html")
            .default_handler(fn_service(move |req: ServiceRequest| {
                let index = index.clone();
                async move {
                    // Client-side routes resolve to the SPA shell.
                    let (req, _) = req.into_parts();
                    let file = NamedFile::open_async(&index).await?;
                    let res = file.into_response(&req);
                    Ok::<_, actix_web::Error>(ServiceResponse::new(req, res))
                }
            })),
    );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn create_video_upload_url(
    s3: web::Data<S3Service>,
    body: web::Json<VideoUploadUrlRequest>,
) -> Result<HttpResponse, GatewayError> {
    let request = body.into_inner();
    info!(
        "Upload URL requested for candidate {} ({})",
        request.candidate_id, request.content_type
    );
    let grant = s3
        .presign_video_put(request.candidate_id, request.content_type.trim())
        .await?;
    Ok(HttpResponse::Ok().json(grant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::s3_service::test_support::offline_service;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use shared::models::VideoUploadUrlResponse;

    fn frontend_fixture() -> String {
        let dir = std::env::temp_dir().join(format!("portal-gateway-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<html>portal</html>").unwrap();
        dir.to_string_lossy().into_owned()
    }

    macro_rules! gateway {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(offline_service()))
                    .configure(|cfg| configure_routes(cfg, frontend_fixture())),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = gateway!();
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[actix_web::test]
    async fn issues_upload_grant_for_video() {
        let app = gateway!();
        let req = test::TestRequest::post()
            .uri("/api/uploads/video-url")
            .set_json(json!({ "candidate_id": 42, "content_type": "video/webm" }))
            .to_request();
        let grant: VideoUploadUrlResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(grant.object_key, "video/candidate_42.mp4");
        assert!(grant.object_url.ends_with("/video/candidate_42.mp4"));
        assert!(grant.upload_url.contains("X-Amz-Signature="));
    }

    #[actix_web::test]
    async fn rejects_non_video_content() {
        let app = gateway!();
        let req = test::TestRequest::post()
            .uri("/api/uploads/video-url")
            .set_json(json!({ "candidate_id": 42, "content_type": "application/pdf" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unsupported video type: application/pdf");
    }

    #[actix_web::test]
    async fn malformed_body_is_a_json_bad_request() {
        let app = gateway!();
        let req = test::TestRequest::post()
            .uri("/api/uploads/video-url")
            .set_json(json!({ "content_type": "video/mp4" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
    }

    #[actix_web::test]
    async fn unknown_paths_fall_back_to_the_app_shell() {
        let app = gateway!();
        let req = test::TestRequest::get().uri("/hr-dashboard/candidate/3").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        assert_eq!(body, "<html>portal</html>");
    }
}
