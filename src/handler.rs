use crate::catalog;
use crate::config::{DesiredTags, TAGS_ENV_VAR};
use crate::error::{ConfigError, ReconcileError};
use crate::reconcile;
use crate::tagging::TaggingApi;
use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, Instrument};

/// What the function returns to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

/// One invocation against an already-read `TAGS_JSON` value.
///
/// Configuration problems become a 400 response before any API call. Every
/// other completion is a 200, including runs where some or all resources
/// failed to tag. Only a discovery failure is returned as an error.
pub async fn invoke<A: TaggingApi + ?Sized>(
    api: &A,
    raw_tags: Option<&str>,
) -> Result<Response, ReconcileError> {
    let desired = match DesiredTags::parse(raw_tags) {
        Ok(tags) => tags,
        Err(ConfigError::Missing) => {
            error!("FATAL: TAGS_JSON environment variable must be set.");
            return Ok(Response::new(
                400,
                "TAGS_JSON environment variable must be set.",
            ));
        }
        Err(e) => {
            error!("FATAL: Failed to parse TAGS_JSON: {e}");
            return Ok(Response::new(400, format!("Failed to parse TAGS_JSON: {e}")));
        }
    };

    let filters = catalog::resource_type_filters();
    let summary = reconcile::run(api, &desired, &filters).await?;

    if summary.processed() == 0 {
        return Ok(Response::new(200, "No resources needed tagging."));
    }

    Ok(Response::new(
        200,
        format!(
            "Tagging process complete. Success: {}, Failed: {}.",
            summary.success_count, summary.failure_count
        ),
    ))
}

/// Lambda entry point. The event payload carries nothing this function uses.
pub async fn function_handler<A: TaggingApi + ?Sized>(
    event: LambdaEvent<Value>,
    api: &A,
) -> Result<Response, Error> {
    let span = tracing::info_span!("invocation", request_id = %event.context.request_id);
    let raw_tags = std::env::var(TAGS_ENV_VAR).ok();

    invoke(api, raw_tags.as_deref())
        .instrument(span)
        .await
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::tagging::{FailureDetail, ResourceDescriptor, ResourcePage};
    use async_trait::async_trait;
    use lambda_runtime::Context;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves one untagged resource and accepts every tag call.
    #[derive(Default)]
    struct SingleResource {
        tag_calls: AtomicUsize,
    }

    #[async_trait]
    impl TaggingApi for SingleResource {
        async fn get_resources_page(
            &self,
            _resource_type_filters: &[String],
            _pagination_token: Option<String>,
        ) -> Result<ResourcePage, ApiError> {
            Ok(ResourcePage {
                resources: vec![ResourceDescriptor::new(
                    "arn:aws:s3:::logs",
                    Vec::<(String, String)>::new(),
                )],
                next_token: None,
            })
        }

        async fn tag_resource(
            &self,
            _arn: &str,
            _tags: &DesiredTags,
        ) -> Result<Option<FailureDetail>, ApiError> {
            self.tag_calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[tokio::test]
    async fn handler_reads_tags_from_environment() {
        std::env::set_var(TAGS_ENV_VAR, r#"{"env": "prod"}"#);
        let api = SingleResource::default();

        let event = LambdaEvent::new(serde_json::json!({}), Context::default());
        let response = function_handler(event, &api).await.unwrap();

        std::env::remove_var(TAGS_ENV_VAR);
        assert_eq!(
            response,
            Response::new(200, "Tagging process complete. Success: 1, Failed: 0.")
        );
        assert_eq!(api.tag_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn response_uses_lambda_field_names() {
        let json = serde_json::to_value(Response::new(400, "bad")).unwrap();
        assert_eq!(json, serde_json::json!({"statusCode": 400, "body": "bad"}));
    }
}
