use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use shared::files::VIDEO_MIME_TYPES;
use shared::models::{CandidateId, VideoUploadUrlResponse};
use shared::urls::join_url;
use shared::video::video_object_key;

use crate::config::StorageConfig;

#[derive(Clone)]
pub struct S3Service {
    client: Client,
    bucket_name: String,
    public_base_url: String,
    upload_ttl: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum S3ServiceError {
    #[error("Unsupported video type: {0}")]
    InvalidFormat(String),
    #[error("Candidate id is required")]
    InvalidCandidate,
    #[error("Failed to presign upload: {0}")]
    Presign(String),
}

impl S3Service {
    pub fn new(
        client: Client,
        bucket_name: String,
        public_base_url: String,
        upload_ttl: Duration,
    ) -> Self {
        Self {
            client,
            bucket_name,
            public_base_url,
            upload_ttl,
        }
    }

    /// Builds the client from the ambient AWS config, pointed at the
    /// configured S3-compatible endpoint.
    pub async fn connect(storage: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(storage.region.clone()));
        if let (Some(key_id), Some(secret)) = (&storage.access_key_id, &storage.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id.clone(),
                secret.clone(),
                None,
                None,
                "gateway-config",
            ));
        }
        let sdk_config = loader.load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(storage.force_path_style);
        if let Some(endpoint) = &storage.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(
            Client::from_conf(builder.build()),
            storage.bucket.clone(),
            storage.public_base_url.clone(),
            Duration::from_secs(storage.upload_ttl_secs),
        )
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn validate_video_type(content_type: &str) -> Result<(), S3ServiceError> {
        if VIDEO_MIME_TYPES.contains(&content_type) {
            Ok(())
        } else {
            Err(S3ServiceError::InvalidFormat(content_type.to_string()))
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }

    /// Signs a PUT for `video/candidate_{id}.mp4`. The content type is only
    /// checked here, not signed, so the browser may send octet-stream.
    pub async fn presign_video_put(
        &self,
        candidate_id: CandidateId,
        content_type: &str,
    ) -> Result<VideoUploadUrlResponse, S3ServiceError> {
        if candidate_id.0 == 0 {
            return Err(S3ServiceError::InvalidCandidate);
        }
        S3Service::validate_video_type(content_type)?;

        let object_key = video_object_key(candidate_id);
        let presigning = PresigningConfig::expires_in(self.upload_ttl)
            .map_err(|e| S3ServiceError::Presign(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&object_key)
            .presigned(presigning)
            .await
            .map_err(|e| S3ServiceError::Presign(e.to_string()))?;

        log::info!(
            "Issued upload URL for {} (valid {}s)",
            object_key,
            self.upload_ttl.as_secs()
        );

        Ok(VideoUploadUrlResponse {
            object_url: self.object_url(&object_key),
            upload_url: request.uri().to_string(),
            object_key,
            expires_in_secs: self.upload_ttl.as_secs(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Presigning is local, so a static-credential client never touches
    /// the network.
    pub fn offline_service() -> S3Service {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("ap-mumbai-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "SECRETTEST", None, None, "test"))
            .endpoint_url("https://ns.compat.objectstorage.ap-mumbai-1.oraclecloud.com")
            .force_path_style(true)
            .build();
        S3Service::new(
            Client::from_conf(config),
            "facerec-uploads".into(),
            "https://objectstorage.ap-mumbai-1.oraclecloud.com/n/ns/b/facerec-uploads/o".into(),
            Duration::from_secs(600),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::offline_service;
    use super::*;

    #[actix_web::test]
    async fn presigned_put_targets_the_candidate_video_key() {
        let service = offline_service();
        let grant = service
            .presign_video_put(CandidateId(17), "video/mp4")
            .await
            .unwrap();

        assert_eq!(grant.object_key, "video/candidate_17.mp4");
        assert_eq!(grant.expires_in_secs, 600);
        assert!(grant
            .upload_url
            .starts_with("https://ns.compat.objectstorage.ap-mumbai-1.oraclecloud.com/facerec-uploads/video/candidate_17.mp4?"));
        assert!(grant.upload_url.contains("X-Amz-Signature="));
        assert!(grant.upload_url.contains("X-Amz-Expires=600"));
        assert_eq!(
            grant.object_url,
            "https://objectstorage.ap-mumbai-1.oraclecloud.com/n/ns/b/facerec-uploads/o/video/candidate_17.mp4"
        );
    }

    #[actix_web::test]
    async fn rejects_unlisted_types_and_empty_ids() {
        let service = offline_service();
        assert!(matches!(
            service.presign_video_put(CandidateId(1), "text/plain").await,
            Err(S3ServiceError::InvalidFormat(_))
        ));
        assert!(matches!(
            service.presign_video_put(CandidateId(0), "video/mp4").await,
            Err(S3ServiceError::InvalidCandidate)
        ));
    }
}
