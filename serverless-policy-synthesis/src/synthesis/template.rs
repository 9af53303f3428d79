//! Resource pattern templating
//!
//! Templates are ARN-like strings with `${Name}` placeholders. Substitution is
//! purely textual: values are inserted verbatim, never escaped or validated,
//! so a `*` stage or region stays a wildcard in the rendered pattern.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::types::IdentityContext;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z]+)\}").expect("placeholder pattern is valid"));

/// Naming fragments of the resources the deployment tool creates for itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeploymentConventions {
    /// Substring present in every deployment bucket name
    pub deployment_bucket_marker: String,
    /// Suffix of the generated execution role name
    pub execution_role_suffix: String,
}

impl Default for DeploymentConventions {
    fn default() -> Self {
        Self {
            deployment_bucket_marker: "serverlessdeploy".to_string(),
            execution_role_suffix: "lambdaRole".to_string(),
        }
    }
}

/// Named values available to templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFields<'a> {
    identity: &'a IdentityContext,
    conventions: &'a DeploymentConventions,
}

impl<'a> TemplateFields<'a> {
    pub fn new(identity: &'a IdentityContext, conventions: &'a DeploymentConventions) -> Self {
        Self {
            identity,
            conventions,
        }
    }

    /// Look up a placeholder by name
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let value = match name {
            "ServiceName" => &self.identity.service_name,
            "Stage" => &self.identity.stage,
            "Region" => &self.identity.region,
            "Account" => &self.identity.account_id,
            "KmsKeyId" => &self.identity.kms_key_id,
            "DeploymentBucket" => &self.conventions.deployment_bucket_marker,
            "ExecutionRole" => &self.conventions.execution_role_suffix,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Substitute every known `${Name}` placeholder in `template`.
///
/// Unknown placeholders are left untouched.
pub fn render_template(template: &str, fields: &TemplateFields<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match fields.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => {
                log::debug!("render_template: unknown placeholder {}", &caps[0]);
                caps[0].to_string()
            }
        })
        .into_owned()
}
