//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! S3 compatible object store holding published tiles

use crate::core::config::CorsCfg;
use crate::core::{ApplicationCfg, Config};
use rusoto_core::{Client, HttpClient, Region};
use rusoto_credential::StaticProvider;
use rusoto_s3::{CORSConfiguration, CORSRule, PutBucketCorsRequest, PutObjectRequest, S3Client, S3};
use std::io;

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone)]
pub struct S3Bucket {
    client: S3Client,
    endpoint: String,
    bucket_name: String,
    key_prefix: Option<String>,
}

impl S3Bucket {
    pub fn new(
        endpoint: &str,
        bucket_name: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
        key_prefix: Option<String>,
    ) -> Result<S3Bucket, String> {
        let region_object = Region::Custom {
            name: region.to_string(),
            endpoint: endpoint.to_string(),
        };
        let http_client =
            HttpClient::new().map_err(|e| format!("Could not create http client: {}", e))?;
        let client = S3Client::new_with_client(
            Client::new_with(
                StaticProvider::new(access_key.to_string(), secret_key.to_string(), None, None),
                http_client,
            ),
            region_object,
        );
        Ok(S3Bucket {
            client,
            endpoint: endpoint.to_string(),
            bucket_name: bucket_name.to_string(),
            key_prefix,
        })
    }

    pub fn info(&self) -> String {
        format!("Bucket s3: {}/{}", self.endpoint, self.bucket_name)
    }

    /// Object key of a relative path, always `/` separated
    pub fn key(&self, path: &str) -> String {
        let path = path.replace('\\', "/");
        match self.key_prefix {
            Some(ref prefix) => format!("{}{}", prefix, path),
            None => path,
        }
    }

    pub async fn put(&self, path: &str, obj: Vec<u8>, content_type: &str) -> Result<(), io::Error> {
        let request = PutObjectRequest {
            bucket: self.bucket_name.to_owned(),
            key: self.key(path),
            body: Some(obj.into()),
            content_type: Some(content_type.to_string()),
            ..Default::default()
        };
        match self.client.put_object(request).await {
            Ok(_) => Ok(()),
            Err(err) => Err(io::Error::new(io::ErrorKind::Other, err.to_string())),
        }
    }

    /// Replace the CORS configuration of the bucket
    pub async fn apply_cors(&self, cors: &CorsCfg) -> Result<(), String> {
        let request = PutBucketCorsRequest {
            bucket: self.bucket_name.to_owned(),
            cors_configuration: CORSConfiguration {
                cors_rules: vec![cors_rule(cors)],
            },
            ..Default::default()
        };
        self.client
            .put_bucket_cors(request)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

pub(crate) fn cors_rule(cors: &CorsCfg) -> CORSRule {
    CORSRule {
        allowed_headers: Some(cors.allowed_headers.clone()),
        allowed_methods: cors.allowed_methods.clone(),
        allowed_origins: cors.allowed_origins.clone(),
        expose_headers: Some(cors.expose_headers.clone()),
        max_age_seconds: Some(cors.max_age_seconds),
        ..Default::default()
    }
}

impl<'a> Config<'a, ApplicationCfg> for S3Bucket {
    fn from_config(config: &ApplicationCfg) -> Result<Self, String> {
        let cfg = config
            .bucket
            .as_ref()
            .ok_or("Missing configuration section [bucket]".to_string())?;
        S3Bucket::new(
            &cfg.endpoint,
            &cfg.bucket,
            &cfg.access_key,
            &cfg.secret_key,
            &cfg.region,
            cfg.key_prefix.clone(),
        )
    }
    fn gen_config() -> String {
        let toml = r#"
#[bucket]
#endpoint = "https://ACCOUNT_ID.r2.cloudflarestorage.com"
#bucket = "tiles"
#access_key = "{{ env.S3_ACCESS_KEY | default(value='') }}"
#secret_key = "{{ env.S3_SECRET_KEY | default(value='') }}"
#region = "auto"
#key_prefix = "static_tiles/"

#[upload]
#workers = 32

#[cors]
#allowed_origins = ["*"]
#allowed_methods = ["GET", "HEAD"]
#allowed_headers = ["*"]
#expose_headers = ["ETag"]
#max_age_seconds = 3000
"#;
        toml.to_string()
    }
}
