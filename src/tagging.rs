use crate::config::DesiredTags;
use crate::error::ApiError;
use async_trait::async_trait;
use aws_sdk_resourcegroupstagging::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_resourcegroupstagging::operation::get_resources::GetResourcesOutput;
use aws_sdk_resourcegroupstagging::operation::tag_resources::TagResourcesOutput;
use aws_sdk_resourcegroupstagging::Client as TaggingClient;
use std::collections::HashMap;

/// Page size requested from `GetResources`.
pub const RESOURCES_PER_PAGE: i32 = 100;

/// A resource as reported by discovery, with its tags at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub arn: String,
    pub tags: HashMap<String, String>,
}

impl ResourceDescriptor {
    pub fn new<I, K, V>(arn: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            arn: arn.into(),
            tags: tags.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// One page of discovery results.
#[derive(Debug, Clone, Default)]
pub struct ResourcePage {
    pub resources: Vec<ResourceDescriptor>,
    /// Set when another page follows.
    pub next_token: Option<String>,
}

/// Per-resource rejection returned by a call that otherwise succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

/// The two tagging API operations the reconciler depends on.
#[async_trait]
pub trait TaggingApi: Send + Sync {
    async fn get_resources_page(
        &self,
        resource_type_filters: &[String],
        pagination_token: Option<String>,
    ) -> Result<ResourcePage, ApiError>;

    /// Tags one resource. `Ok(Some(_))` means the call went through but the
    /// provider declined this resource.
    async fn tag_resource(
        &self,
        arn: &str,
        tags: &DesiredTags,
    ) -> Result<Option<FailureDetail>, ApiError>;
}

fn api_error<E, R>(err: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    ApiError::new(code, DisplayErrorContext(&err).to_string())
}

fn page_from(output: &GetResourcesOutput) -> ResourcePage {
    let resources = output
        .resource_tag_mapping_list()
        .iter()
        .filter_map(|mapping| match mapping.resource_arn() {
            Some(arn) => Some(ResourceDescriptor::new(
                arn,
                mapping.tags().iter().map(|tag| (tag.key(), tag.value())),
            )),
            None => {
                tracing::warn!("skipping resource mapping without an ARN");
                None
            }
        })
        .collect();

    // The API marks the last page with an empty token rather than none.
    let next_token = output
        .pagination_token()
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    ResourcePage {
        resources,
        next_token,
    }
}

fn failure_for(output: &TagResourcesOutput, arn: &str) -> Option<FailureDetail> {
    output
        .failed_resources_map()
        .and_then(|failures| failures.get(arn))
        .map(|info| FailureDetail {
            error_code: info.error_code().map(|code| code.as_str().to_string()),
            error_message: info.error_message().map(str::to_string),
        })
}

#[async_trait]
impl TaggingApi for TaggingClient {
    async fn get_resources_page(
        &self,
        resource_type_filters: &[String],
        pagination_token: Option<String>,
    ) -> Result<ResourcePage, ApiError> {
        let resp = self
            .get_resources()
            .resources_per_page(RESOURCES_PER_PAGE)
            .set_resource_type_filters(Some(resource_type_filters.to_vec()))
            .set_pagination_token(pagination_token)
            .send()
            .await
            .map_err(api_error)?;

        Ok(page_from(&resp))
    }

    async fn tag_resource(
        &self,
        arn: &str,
        tags: &DesiredTags,
    ) -> Result<Option<FailureDetail>, ApiError> {
        let resp = self
            .tag_resources()
            .resource_arn_list(arn)
            .set_tags(Some(tags.to_hash_map()))
            .send()
            .await
            .map_err(api_error)?;

        Ok(failure_for(&resp, arn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_resourcegroupstagging::types::{ErrorCode, FailureInfo, ResourceTagMapping, Tag};

    fn mapping(arn: Option<&str>, tags: &[(&str, &str)]) -> ResourceTagMapping {
        let mut builder = ResourceTagMapping::builder().set_resource_arn(arn.map(str::to_string));
        for (key, value) in tags {
            builder = builder.tags(Tag::builder().key(*key).value(*value).build().unwrap());
        }
        builder.build()
    }

    #[test]
    fn page_keeps_arn_and_tags() {
        let output = GetResourcesOutput::builder()
            .resource_tag_mapping_list(mapping(Some("arn:a"), &[("env", "prod"), ("team", "core")]))
            .pagination_token("next-page")
            .build();

        let page = page_from(&output);

        assert_eq!(
            page.resources,
            vec![ResourceDescriptor::new("arn:a", [("env", "prod"), ("team", "core")])]
        );
        assert_eq!(page.next_token.as_deref(), Some("next-page"));
    }

    #[test]
    fn empty_or_missing_token_ends_discovery() {
        let empty = GetResourcesOutput::builder().pagination_token("").build();
        assert_eq!(page_from(&empty).next_token, None);

        let missing = GetResourcesOutput::builder().build();
        assert_eq!(page_from(&missing).next_token, None);
        assert!(page_from(&missing).resources.is_empty());
    }

    #[test]
    fn mapping_without_arn_is_skipped() {
        let output = GetResourcesOutput::builder()
            .resource_tag_mapping_list(mapping(None, &[("env", "prod")]))
            .resource_tag_mapping_list(mapping(Some("arn:b"), &[]))
            .build();

        let arns: Vec<String> = page_from(&output)
            .resources
            .into_iter()
            .map(|r| r.arn)
            .collect();
        assert_eq!(arns, vec!["arn:b"]);
    }

    #[test]
    fn failure_map_is_matched_on_this_arn() {
        let info = FailureInfo::builder()
            .status_code(400)
            .error_code(ErrorCode::InvalidParameterException)
            .error_message("tag limit exceeded")
            .build();
        let output = TagResourcesOutput::builder()
            .failed_resources_map("arn:other", info.clone())
            .build();
        assert_eq!(failure_for(&output, "arn:mine"), None);

        let output = TagResourcesOutput::builder()
            .failed_resources_map("arn:mine", info)
            .build();
        assert_eq!(
            failure_for(&output, "arn:mine"),
            Some(FailureDetail {
                error_code: Some("InvalidParameterException".into()),
                error_message: Some("tag limit exceeded".into()),
            })
        );
    }

    #[test]
    fn clean_tag_response_is_success() {
        let output = TagResourcesOutput::builder().build();
        assert_eq!(failure_for(&output, "arn:mine"), None);
    }
}
