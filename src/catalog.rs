//! Resource-type selectors sent as `ResourceTypeFilters` on discovery.

pub const COMPUTE: &[&str] = &[
    "ec2:*",
    "ec2:vpc",
    "ec2:subnet",
    "ec2:instance",
    "ec2:network-interface",
    "ec2:security-group",
    "ec2:volume",
    "ec2:snapshot",
    "autoscaling:*",
    "lambda:*",
    "eks:*",
    "ecs:*",
];

pub const CONTAINERS: &[&str] = &["ecr:repository", "eks:cluster"];

pub const STORAGE: &[&str] = &["s3:*"];

pub const DATABASE: &[&str] = &["rds:*", "dynamodb:*", "elasticache:*", "redshift:*"];

pub const NETWORKING: &[&str] = &[
    "elasticloadbalancing:*",
    "apigateway:*",
    "route53:*",
    "cloudfront:*",
];

pub const ANALYTICS: &[&str] = &["kinesis:*", "glue:*"];

pub const SECURITY: &[&str] = &["kms:*", "secretsmanager:*", "acm:*"];

pub const INTEGRATION: &[&str] = &["sns:*", "sqs:*", "events:*"];

pub const MONITORING: &[&str] = &["cloudwatch:*", "logs:*"];

const CATEGORIES: &[&[&str]] = &[
    COMPUTE,
    CONTAINERS,
    STORAGE,
    DATABASE,
    NETWORKING,
    ANALYTICS,
    SECURITY,
    INTEGRATION,
    MONITORING,
];

/// Every selector in category order.
pub fn resource_type_filters() -> Vec<String> {
    CATEGORIES
        .iter()
        .flat_map(|category| category.iter())
        .map(|selector| selector.to_string())
        .collect()
}
