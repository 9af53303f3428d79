//! Settings resolution
//!
//! Precedence, lowest first: built-in defaults, answers file, environment and
//! flags, then interactive answers for whatever is still unset.

use anyhow::Result;
use log::info;
use serverless_policy_synthesis::{
    DeploymentConventions, FeatureToggles, IdentityContext, WILDCARD,
};

use crate::answers::Answers;
use crate::cli::Args;
use crate::error::UsageError;
use crate::prompt::Prompter;

/// Everything needed for one synthesis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub identity: IdentityContext,
    pub toggles: FeatureToggles,
    pub conventions: DeploymentConventions,
}

impl Settings {
    /// Log the collected settings
    pub fn log_summary(&self) {
        info!("app name {}", self.identity.service_name);
        info!("app stage {}", self.identity.stage);
        info!("app region {}", self.identity.region);
        info!("KMS key {}", self.identity.kms_key_id);
        info!("AWS Account Id {}", self.identity.account_id);
        info!("features {:?}", self.toggles.enabled());
    }
}

struct Resolver<'p> {
    prompter: Option<&'p mut dyn Prompter>,
}

impl Resolver<'_> {
    fn text(&mut self, provided: Option<String>, message: &str, default: &str) -> Result<String> {
        match (provided, self.prompter.as_deref_mut()) {
            (Some(value), _) => Ok(value),
            (None, Some(prompter)) => prompter.input(message, default),
            (None, None) => Ok(default.to_string()),
        }
    }

    fn flag(&mut self, provided: Option<bool>, message: &str) -> Result<bool> {
        match (provided, self.prompter.as_deref_mut()) {
            (Some(value), _) => Ok(value),
            (None, Some(prompter)) => prompter.confirm(message),
            (None, None) => Ok(false),
        }
    }
}

/// Combine flags, answers file and prompts into [`Settings`].
///
/// `prompter` is `None` for non-interactive runs, in which case a project name
/// must come from a flag, the environment or the answers file.
pub fn resolve_settings(
    args: &Args,
    answers: Answers,
    prompter: Option<&mut dyn Prompter>,
    default_project: Option<String>,
) -> Result<Settings> {
    let interactive = prompter.is_some();
    let mut resolver = Resolver { prompter };

    let project = args.project.clone().or(answers.project);
    let project = match (project, interactive) {
        (Some(project), _) => project,
        (None, true) => resolver.text(
            None,
            "Your Serverless service name",
            default_project.as_deref().unwrap_or_default(),
        )?,
        (None, false) => {
            return Err(UsageError::new(
                "a project name is required: pass --project, set SLS_POLICY_PROJECT or use an answers file",
            )
            .into())
        }
    };

    let stage = resolver.text(
        args.stage.clone().or(answers.stage),
        "You can specify a specific stage, if you like:",
        WILDCARD,
    )?;
    let region = resolver.text(
        args.region.clone().or(answers.region),
        "You can specify a specific region, if you like:",
        WILDCARD,
    )?;
    let kms_key = resolver.text(
        args.kms_key.clone().or(answers.kms_key),
        "You can specify a single KMS key to grant encrypt/decrypt access to",
        "",
    )?;
    let account_id = resolver.text(
        args.aws_account_id.clone().or(answers.aws_account_id),
        "You can specify which aws account id to restrict access to",
        WILDCARD,
    )?;

    // A [features] table answers every question; absent keys are false
    let file_toggles = answers.features.map(FeatureToggles::from);
    let answered = |flag: bool, from_file: fn(&FeatureToggles) -> bool| -> Option<bool> {
        if flag {
            Some(true)
        } else {
            file_toggles.as_ref().map(from_file)
        }
    };

    let toggles = FeatureToggles {
        uses_key_value_store: resolver.flag(
            answered(args.dynamodb, |t| t.uses_key_value_store),
            "Does your service rely on DynamoDB?",
        )?,
        uses_event_stream: resolver.flag(
            answered(args.kinesis, |t| t.uses_event_stream),
            "Does your service rely on kinesis?",
        )?,
        uses_api_gateway: resolver.flag(
            answered(args.apigateway, |t| t.uses_api_gateway),
            "Does your service rely on API Gateway?",
        )?,
        uses_queue: resolver.flag(
            answered(args.sqs, |t| t.uses_queue),
            "Does your service rely on SQS?",
        )?,
        uses_object_store: resolver.flag(
            answered(args.s3, |t| t.uses_object_store),
            "Is your service going to be using S3 buckets?",
        )?,
        uses_private_network: resolver.flag(
            answered(args.vpc, |t| t.uses_private_network),
            "Will your function run inside a VPC?",
        )?,
    };

    let mut conventions = answers.conventions.unwrap_or_default();
    if let Some(marker) = &args.deployment_bucket_marker {
        conventions.deployment_bucket_marker = marker.clone();
    }
    if let Some(suffix) = &args.execution_role_suffix {
        conventions.execution_role_suffix = suffix.clone();
    }

    let identity = IdentityContext::new(project)
        .with_stage(stage)
        .with_region(region)
        .with_kms_key_id(kms_key)
        .with_account_id(account_id);

    Ok(Settings {
        identity,
        toggles,
        conventions,
    })
}
