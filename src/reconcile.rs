//! Discovery, selection and per-resource tagging.
//!
//! A run is strictly sequential: pages are fetched one at a time, filtered as
//! they arrive, and the selected resources are tagged in discovery order.
//! Tagging failures are recorded per resource and never stop the loop.

use crate::config::DesiredTags;
use crate::error::{ApiError, ReconcileError};
use crate::tagging::{FailureDetail, ResourceDescriptor, TaggingApi};
use std::collections::HashSet;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Success,
    Failure {
        code: Option<String>,
        message: String,
    },
}

impl TagOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TagOutcome::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOutcome {
    pub arn: String,
    pub outcome: TagOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub success_count: usize,
    pub failure_count: usize,
    pub outcomes: Vec<ResourceOutcome>,
}

impl Summary {
    fn from_outcomes(outcomes: Vec<ResourceOutcome>) -> Self {
        let success_count = outcomes.iter().filter(|o| o.outcome.is_success()).count();
        Self {
            success_count,
            failure_count: outcomes.len() - success_count,
            outcomes,
        }
    }

    pub fn processed(&self) -> usize {
        self.success_count + self.failure_count
    }
}

/// True when `resource` disagrees with `desired` on at least one key.
pub fn needs_tagging(desired: &DesiredTags, resource: &ResourceDescriptor) -> bool {
    !desired.missing_from(&resource.tags).is_empty()
}

/// ARNs needing tags, in discovery order. ARNs already in `seen` are skipped,
/// so feeding every page through the same set lists each resource once.
pub fn select<'a, I>(
    desired: &DesiredTags,
    resources: I,
    seen: &mut HashSet<String>,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a ResourceDescriptor>,
{
    resources
        .into_iter()
        .filter(|resource| needs_tagging(desired, resource))
        .filter(|resource| seen.insert(resource.arn.clone()))
        .map(|resource| {
            tracing::debug!(arn = %resource.arn, "resource is missing tags");
            resource.arn.clone()
        })
        .collect()
}

/// Walks every discovery page and returns the ARNs that need tagging.
pub async fn discover<A: TaggingApi + ?Sized>(
    api: &A,
    desired: &DesiredTags,
    resource_type_filters: &[String],
) -> Result<Vec<String>, ReconcileError> {
    let mut selected = Vec::new();
    let mut seen = HashSet::new();
    let mut token = None;
    let mut discovered = 0usize;

    loop {
        let page = api
            .get_resources_page(resource_type_filters, token)
            .await
            .map_err(ReconcileError::Discovery)?;
        discovered += page.resources.len();

        selected.extend(select(desired, &page.resources, &mut seen));

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    info!(discovered, selected = selected.len(), "Resource discovery finished");
    Ok(selected)
}

fn outcome_for(arn: &str, result: Result<Option<FailureDetail>, ApiError>) -> TagOutcome {
    match result {
        Ok(None) => TagOutcome::Success,
        Ok(Some(detail)) => {
            error!(
                arn,
                error_code = ?detail.error_code,
                error_message = ?detail.error_message,
                "❌ API reported failure for {arn}. ErrorCode: {}, ErrorMessage: {}",
                detail.error_code.as_deref().unwrap_or("None"),
                detail.error_message.as_deref().unwrap_or("None"),
            );
            TagOutcome::Failure {
                code: detail.error_code,
                message: detail.error_message.unwrap_or_default(),
            }
        }
        Err(e) => {
            error!(arn, error_code = ?e.code, "❌ Exception while tagging {arn}: {e}");
            TagOutcome::Failure {
                code: e.code,
                message: e.message,
            }
        }
    }
}

/// Tags each ARN on its own, in order, collecting one outcome per ARN.
pub async fn apply_tags<A: TaggingApi + ?Sized>(
    api: &A,
    desired: &DesiredTags,
    arns: &[String],
) -> Summary {
    let mut outcomes = Vec::with_capacity(arns.len());
    for arn in arns {
        info!("Attempting to tag resource: {arn}");
        let result = api.tag_resource(arn, desired).await;
        outcomes.push(ResourceOutcome {
            arn: arn.clone(),
            outcome: outcome_for(arn, result),
        });
    }
    Summary::from_outcomes(outcomes)
}

/// Full reconciliation: discover, select, tag. Only discovery errors escape.
pub async fn run<A: TaggingApi + ?Sized>(
    api: &A,
    desired: &DesiredTags,
    resource_type_filters: &[String],
) -> Result<Summary, ReconcileError> {
    info!("Searching for resources missing tags: {desired}");

    let arns = discover(api, desired, resource_type_filters).await?;
    if arns.is_empty() {
        info!("✅ All taggable resources already have the correct tags: {desired}. No action needed.");
        return Ok(Summary::default());
    }

    info!(
        "Found {} resources to tag. Applying tags individually...",
        arns.len()
    );
    let summary = apply_tags(api, desired, &arns).await;

    info!("--- Tagging Summary ---");
    info!("Successfully tagged: {} resources", summary.success_count);
    info!("Failed to tag: {} resources", summary.failure_count);
    Ok(summary)
}
