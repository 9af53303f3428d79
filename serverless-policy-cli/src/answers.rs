//! Answers file: pre-filled responses to the interactive prompts

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serverless_policy_synthesis::{DeploymentConventions, FeatureToggles};

/// Contents of an answers file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Answers {
    pub project: Option<String>,
    pub stage: Option<String>,
    pub region: Option<String>,
    pub kms_key: Option<String>,
    pub aws_account_id: Option<String>,
    pub features: Option<FeatureAnswers>,
    pub conventions: Option<DeploymentConventions>,
}

/// `[features]` table. Absent keys mean the feature is not used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureAnswers {
    pub dynamodb: bool,
    pub kinesis: bool,
    pub apigateway: bool,
    pub sqs: bool,
    pub s3: bool,
    pub vpc: bool,
}

impl From<FeatureAnswers> for FeatureToggles {
    fn from(answers: FeatureAnswers) -> Self {
        Self {
            uses_key_value_store: answers.dynamodb,
            uses_event_stream: answers.kinesis,
            uses_api_gateway: answers.apigateway,
            uses_queue: answers.sqs,
            uses_object_store: answers.s3,
            uses_private_network: answers.vpc,
        }
    }
}

impl Answers {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read answers file {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid answers file {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
