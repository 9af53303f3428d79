//! Declarative rule table
//!
//! Each [`Rule`] pairs a trigger with the statement templates it contributes.
//! The table is walked top to bottom: base rules first, then one block per
//! active conditional trigger. Rules never inspect each other, so overlapping
//! grants are emitted as-is.

use crate::types::{Feature, FeatureToggles, IdentityContext};

/// Condition under which a rule contributes its statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Part of the base table
    Always,
    /// A feature toggle is switched on
    Feature(Feature),
    /// The identity names a KMS key
    KmsKeyPresent,
}

impl Trigger {
    pub fn is_active(self, identity: &IdentityContext, toggles: &FeatureToggles) -> bool {
        match self {
            Self::Always => true,
            Self::Feature(feature) => toggles.is_enabled(feature),
            Self::KmsKeyPresent => identity.has_kms_key(),
        }
    }
}

/// Unrendered statement: actions plus resource pattern templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTemplate {
    pub action: &'static [&'static str],
    pub resource: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub trigger: Trigger,
    pub statements: &'static [StatementTemplate],
}

const fn stmt(
    action: &'static [&'static str],
    resource: &'static [&'static str],
) -> StatementTemplate {
    StatementTemplate { action, resource }
}

const ANY: &[&str] = &["*"];
const STACK: &[&str] = &["arn:aws:cloudformation:${Region}:${Account}:stack/${ServiceName}-${Stage}/*"];
const DEPLOYMENT_BUCKET: &[&str] = &["arn:aws:s3:::${ServiceName}*${DeploymentBucket}*"];
const FUNCTIONS: &[&str] = &["arn:aws:lambda:${Region}:${Account}:function:${ServiceName}-${Stage}-*"];
const EXECUTION_ROLE: &[&str] =
    &["arn:aws:iam::*:role/${ServiceName}-${Stage}-${Region}-${ExecutionRole}"];
const LOGS: &[&str] = &["arn:aws:logs:${Region}:${Account}:*"];
const API_GATEWAY_VERBS: &[&str] = &[
    "apigateway:GET",
    "apigateway:POST",
    "apigateway:PUT",
    "apigateway:DELETE",
];

const BASE_STATEMENTS: &[StatementTemplate] = &[
    stmt(
        &[
            "cloudformation:List*",
            "cloudformation:Get*",
            "cloudformation:ValidateTemplate",
        ],
        ANY,
    ),
    stmt(
        &[
            "cloudformation:CreateStack",
            "cloudformation:CreateUploadBucket",
            "cloudformation:DeleteStack",
            "cloudformation:Describe*",
            "cloudformation:UpdateStack",
        ],
        STACK,
    ),
    stmt(
        &["lambda:Get*", "lambda:List*", "lambda:CreateFunction"],
        ANY,
    ),
    stmt(
        &[
            "s3:GetBucketLocation",
            "s3:CreateBucket",
            "s3:DeleteBucket",
            "s3:ListBucket",
            "s3:ListBucketVersions",
            "s3:PutAccelerateConfiguration",
            "s3:GetEncryptionConfiguration",
            "s3:PutEncryptionConfiguration",
        ],
        DEPLOYMENT_BUCKET,
    ),
    stmt(
        &["s3:PutObject", "s3:GetObject", "s3:DeleteObject"],
        DEPLOYMENT_BUCKET,
    ),
    stmt(
        &[
            "lambda:AddPermission",
            "lambda:CreateAlias",
            "lambda:DeleteFunction",
            "lambda:InvokeFunction",
            "lambda:PublishVersion",
            "lambda:RemovePermission",
            "lambda:Update*",
        ],
        FUNCTIONS,
    ),
    stmt(
        &[
            "apigateway:GET",
            "apigateway:POST",
            "apigateway:PUT",
            "apigateway:DELETE",
            "apigateway:PATCH",
        ],
        &[
            "arn:aws:apigateway:*::/restapis*",
            "arn:aws:apigateway:*::/apikeys*",
            "arn:aws:apigateway:*::/usageplans*",
        ],
    ),
    stmt(&["iam:PassRole"], EXECUTION_ROLE),
    stmt(
        &[
            "iam:GetRole",
            "iam:GetRolePolicy",
            "iam:GetPolicy",
            "iam:CreateRole",
            "iam:PutRolePolicy",
            "iam:DeleteRolePolicy",
            "iam:DetachRolePolicy",
            "iam:AttachRolePolicy",
            "iam:DeleteRole",
        ],
        EXECUTION_ROLE,
    ),
    stmt(&["cloudwatch:GetMetricStatistics"], ANY),
    stmt(
        &[
            "logs:CreateLogGroup",
            "logs:CreateLogStream",
            "logs:DeleteLogGroup",
        ],
        LOGS,
    ),
    stmt(&["logs:PutLogEvents"], LOGS),
    stmt(
        &[
            "logs:DescribeLogStreams",
            "logs:DescribeLogGroups",
            "logs:FilterLogEvents",
        ],
        ANY,
    ),
    stmt(
        &["events:Put*", "events:Remove*", "events:Delete*"],
        &["arn:aws:events:*:*:rule/${ServiceName}-${Stage}-${Region}"],
    ),
    stmt(
        &["events:DescribeRule"],
        &["arn:aws:events:${Region}:*:rule/${ServiceName}-${Stage}-*"],
    ),
];

/// The complete rule table in evaluation order
pub const RULES: &[Rule] = &[
    Rule {
        trigger: Trigger::Always,
        statements: BASE_STATEMENTS,
    },
    // Table names are unknown at synthesis time
    Rule {
        trigger: Trigger::Feature(Feature::KeyValueStore),
        statements: &[stmt(&["dynamodb:*"], &["arn:aws:dynamodb:*:*:table/*"])],
    },
    Rule {
        trigger: Trigger::KmsKeyPresent,
        statements: &[
            stmt(
                &[
                    "kms:Decrypt",
                    "kms:Encrypt",
                    "kms:DescribeKey",
                    "kms:ReEncrypt*",
                ],
                &["arn:aws:kms:${Region}:${Account}:key/${KmsKeyId}"],
            ),
            stmt(&["kms:ListKeys", "kms:ListAliases"], ANY),
        ],
    },
    Rule {
        trigger: Trigger::Feature(Feature::EventStream),
        statements: &[stmt(
            &["kinesis:*"],
            &["arn:aws:kinesis:*:*:stream/${ServiceName}-${Stage}-${Region}"],
        )],
    },
    Rule {
        trigger: Trigger::Feature(Feature::Queue),
        statements: &[stmt(
            &["sqs:*"],
            &["arn:aws:sqs:*:*:${ServiceName}-${Stage}-${Region}"],
        )],
    },
    // Needed to attach the managed VPC execution policy to the function role
    Rule {
        trigger: Trigger::Feature(Feature::PrivateNetwork),
        statements: &[stmt(
            &[
                "iam:GetRole",
                "iam:GetRolePolicy",
                "iam:GetPolicy",
                "iam:GetPolicyVersion",
            ],
            &["arn:aws:iam::aws:policy/service-role/AWSLambdaVPCAccessExecutionRole"],
        )],
    },
    Rule {
        trigger: Trigger::Feature(Feature::ApiGateway),
        statements: &[stmt(API_GATEWAY_VERBS, &["arn:aws:apigateway:*::/restapis*"])],
    },
    Rule {
        trigger: Trigger::Feature(Feature::ObjectStore),
        statements: &[stmt(&["s3:CreateBucket"], &["arn:aws:s3:::*"])],
    },
];

/// Number of statements every document starts with
pub fn base_statement_count() -> usize {
    RULES
        .iter()
        .filter(|rule| rule.trigger == Trigger::Always)
        .map(|rule| rule.statements.len())
        .sum()
}
