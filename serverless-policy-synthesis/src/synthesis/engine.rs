//! Policy synthesis engine
//!
//! Walks the rule table and renders every active rule against the identity
//! context. The engine holds no state besides its deployment conventions, so
//! one instance may be shared across threads and reused for any number of
//! calls.

use log::debug;

use super::rules::{Rule, StatementTemplate, RULES};
use super::template::{render_template, DeploymentConventions, TemplateFields};
use crate::error::SynthesisResult;
use crate::types::{FeatureToggles, IdentityContext, PolicyDocument, Statement};

/// Converts identity parameters and feature toggles into a policy document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Synthesizer {
    conventions: DeploymentConventions,
}

impl Synthesizer {
    /// Create a synthesizer using the Serverless Framework naming conventions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conventions(conventions: DeploymentConventions) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> &DeploymentConventions {
        &self.conventions
    }

    /// Build the policy document.
    ///
    /// Total over its inputs: identity fields are used verbatim and nothing is
    /// validated. Base statements come first, followed by one block per active
    /// conditional rule in table order.
    pub fn synthesize(&self, identity: &IdentityContext, toggles: &FeatureToggles) -> PolicyDocument {
        let fields = TemplateFields::new(identity, &self.conventions);
        let mut policy = PolicyDocument::new();

        for rule in active_rules(identity, toggles) {
            debug!(
                "synthesize: applying {:?} rule ({} statements)",
                rule.trigger,
                rule.statements.len()
            );
            for template in rule.statements {
                policy.add_statement(render_statement(template, &fields));
            }
        }

        debug!(
            "synthesize: {} statements for service '{}'",
            policy.statement.len(),
            identity.service_name
        );
        policy
    }

    /// Validate `identity` and then build the policy document.
    ///
    /// No statement is generated when validation fails.
    pub fn try_synthesize(
        &self,
        identity: &IdentityContext,
        toggles: &FeatureToggles,
    ) -> SynthesisResult<PolicyDocument> {
        identity.validate()?;
        Ok(self.synthesize(identity, toggles))
    }
}

fn active_rules<'t>(
    identity: &'t IdentityContext,
    toggles: &'t FeatureToggles,
) -> impl Iterator<Item = &'static Rule> + 't {
    RULES
        .iter()
        .filter(move |rule| rule.trigger.is_active(identity, toggles))
}

fn render_statement(template: &StatementTemplate, fields: &TemplateFields<'_>) -> Statement {
    Statement::allow(
        template.action.iter().map(|action| (*action).to_string()).collect(),
        template
            .resource
            .iter()
            .map(|resource| render_template(resource, fields))
            .collect(),
    )
}

/// Build the policy document with the default conventions
pub fn synthesize(identity: &IdentityContext, toggles: &FeatureToggles) -> PolicyDocument {
    Synthesizer::new().synthesize(identity, toggles)
}

/// Validated variant of [`synthesize`]
pub fn try_synthesize(
    identity: &IdentityContext,
    toggles: &FeatureToggles,
) -> SynthesisResult<PolicyDocument> {
    Synthesizer::new().try_synthesize(identity, toggles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthesisError;
    use crate::synthesis::rules::base_statement_count;
    use crate::types::{Effect, Feature};

    fn orders_identity() -> IdentityContext {
        IdentityContext::new("orders")
            .with_stage("prod")
            .with_region("eu-west-1")
            .with_account_id("222")
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn find_by_action<'p>(policy: &'p PolicyDocument, action: &str) -> Vec<&'p Statement> {
        policy
            .statement
            .iter()
            .filter(|statement| statement.action.iter().any(|a| a == action))
            .collect()
    }

    #[test]
    fn test_no_toggles_emits_base_table_only() {
        let policy = synthesize(&orders_identity(), &FeatureToggles::default());
        assert_eq!(policy.version, "2012-10-17");
        assert_eq!(policy.statement.len(), base_statement_count());
        assert!(policy
            .statement
            .iter()
            .all(|statement| statement.effect == Effect::Allow));
    }

    #[test]
    fn test_base_table_is_scoped_to_identity() {
        let policy = synthesize(&orders_identity(), &FeatureToggles::default());
        let statements = &policy.statement;

        assert_eq!(statements[0].resource, strings(&["*"]));
        assert_eq!(
            statements[1].resource,
            strings(&["arn:aws:cloudformation:eu-west-1:222:stack/orders-prod/*"])
        );
        assert_eq!(
            statements[3].resource,
            strings(&["arn:aws:s3:::orders*serverlessdeploy*"])
        );
        assert_eq!(statements[3].resource, statements[4].resource);
        assert_eq!(
            statements[5].resource,
            strings(&["arn:aws:lambda:eu-west-1:222:function:orders-prod-*"])
        );
        assert_eq!(
            statements[7].resource,
            strings(&["arn:aws:iam::*:role/orders-prod-eu-west-1-lambdaRole"])
        );
        assert_eq!(statements[7].resource, statements[8].resource);
        assert_eq!(
            statements[10].resource,
            strings(&["arn:aws:logs:eu-west-1:222:*"])
        );
        assert_eq!(
            statements[13].resource,
            strings(&["arn:aws:events:*:*:rule/orders-prod-eu-west-1"])
        );
        assert_eq!(
            statements[14].resource,
            strings(&["arn:aws:events:eu-west-1:*:rule/orders-prod-*"])
        );
    }

    #[test]
    fn test_base_gateway_grant_covers_three_resource_types() {
        let policy = synthesize(&orders_identity(), &FeatureToggles::default());
        let gateway = find_by_action(&policy, "apigateway:PATCH");
        assert_eq!(gateway.len(), 1);
        assert_eq!(
            gateway[0].resource,
            strings(&[
                "arn:aws:apigateway:*::/restapis*",
                "arn:aws:apigateway:*::/apikeys*",
                "arn:aws:apigateway:*::/usageplans*",
            ])
        );
    }

    #[test]
    fn test_key_value_store_end_to_end() {
        let toggles = FeatureToggles::default().enable(Feature::KeyValueStore);
        let policy = synthesize(&orders_identity(), &toggles);

        assert_eq!(policy.statement.len(), base_statement_count() + 1);
        let last = policy.statement.last().expect("should have statements");
        assert_eq!(last.action, strings(&["dynamodb:*"]));
        assert_eq!(last.resource, strings(&["arn:aws:dynamodb:*:*:table/*"]));
    }

    #[test]
    fn test_kms_key_adds_scoped_and_listing_statements() {
        let identity = IdentityContext::new("svc")
            .with_region("us-east-1")
            .with_account_id("111")
            .with_kms_key_id("abc");
        let policy = synthesize(&identity, &FeatureToggles::default());

        assert_eq!(policy.statement.len(), base_statement_count() + 2);
        let scoped = &policy.statement[base_statement_count()];
        assert_eq!(scoped.resource, strings(&["arn:aws:kms:us-east-1:111:key/abc"]));
        assert!(scoped.action.contains(&"kms:Decrypt".to_string()));
        assert!(scoped.action.contains(&"kms:Encrypt".to_string()));

        let listing = &policy.statement[base_statement_count() + 1];
        assert_eq!(listing.action, strings(&["kms:ListKeys", "kms:ListAliases"]));
        assert_eq!(listing.resource, strings(&["*"]));
    }

    #[test]
    fn test_stream_and_queue_use_service_name() {
        let toggles = FeatureToggles::default()
            .enable(Feature::EventStream)
            .enable(Feature::Queue);
        let policy = synthesize(&orders_identity(), &toggles);

        let stream = find_by_action(&policy, "kinesis:*");
        assert_eq!(
            stream[0].resource,
            strings(&["arn:aws:kinesis:*:*:stream/orders-prod-eu-west-1"])
        );
        let queue = find_by_action(&policy, "sqs:*");
        assert_eq!(
            queue[0].resource,
            strings(&["arn:aws:sqs:*:*:orders-prod-eu-west-1"])
        );
    }

    #[test]
    fn test_private_network_resource_is_not_parameterized() {
        let toggles = FeatureToggles::default().enable(Feature::PrivateNetwork);
        let policy = synthesize(&orders_identity(), &toggles);
        let last = policy.statement.last().expect("should have statements");
        assert_eq!(
            last.action,
            strings(&[
                "iam:GetRole",
                "iam:GetRolePolicy",
                "iam:GetPolicy",
                "iam:GetPolicyVersion",
            ])
        );
        assert_eq!(
            last.resource,
            strings(&["arn:aws:iam::aws:policy/service-role/AWSLambdaVPCAccessExecutionRole"])
        );
    }

    #[test]
    fn test_api_gateway_and_object_store_are_independent() {
        let identity = orders_identity();
        let base = base_statement_count();
        let gateway_only = synthesize(&identity, &FeatureToggles::default().enable(Feature::ApiGateway));
        let bucket_only = synthesize(&identity, &FeatureToggles::default().enable(Feature::ObjectStore));
        let both = synthesize(
            &identity,
            &FeatureToggles::default()
                .enable(Feature::ApiGateway)
                .enable(Feature::ObjectStore),
        );

        let bucket_creation = Statement::allow(
            strings(&["s3:CreateBucket"]),
            strings(&["arn:aws:s3:::*"]),
        );
        let gateway_grant = Statement::allow(
            strings(&["apigateway:GET", "apigateway:POST", "apigateway:PUT", "apigateway:DELETE"]),
            strings(&["arn:aws:apigateway:*::/restapis*"]),
        );

        assert_eq!(gateway_only.statement.len(), base + 1);
        assert_eq!(gateway_only.statement[base], gateway_grant);
        assert!(!gateway_only.statement.contains(&bucket_creation));

        assert_eq!(bucket_only.statement.len(), base + 1);
        assert_eq!(bucket_only.statement[base], bucket_creation);
        assert!(!bucket_only.statement.contains(&gateway_grant));

        assert_eq!(both.statement.len(), base + 2);
        assert_eq!(both.statement[base..], [gateway_grant, bucket_creation]);
    }

    #[test]
    fn test_all_blocks_append_in_table_order() {
        let mut toggles = FeatureToggles::default();
        for feature in Feature::ALL {
            toggles = toggles.enable(feature);
        }
        let identity = orders_identity().with_kms_key_id("abc");
        let policy = synthesize(&identity, &toggles);

        let appended: Vec<&str> = policy.statement[base_statement_count()..]
            .iter()
            .map(|statement| statement.action[0].as_str())
            .collect();
        assert_eq!(
            appended,
            vec![
                "dynamodb:*",
                "kms:Decrypt",
                "kms:ListKeys",
                "kinesis:*",
                "sqs:*",
                "iam:GetRole",
                "apigateway:GET",
                "s3:CreateBucket",
            ]
        );
    }

    #[test]
    fn test_overlapping_grants_are_not_deduplicated() {
        let toggles = FeatureToggles::default()
            .enable(Feature::ApiGateway)
            .enable(Feature::ObjectStore);
        let policy = synthesize(&orders_identity(), &toggles);
        assert_eq!(find_by_action(&policy, "apigateway:GET").len(), 2);
        assert_eq!(find_by_action(&policy, "s3:CreateBucket").len(), 2);
    }

    #[test]
    fn test_custom_conventions() {
        let synthesizer = Synthesizer::with_conventions(DeploymentConventions {
            deployment_bucket_marker: "deploybucket".to_string(),
            execution_role_suffix: "executionRole".to_string(),
        });
        let policy = synthesizer.synthesize(&orders_identity(), &FeatureToggles::default());
        assert_eq!(
            policy.statement[3].resource,
            strings(&["arn:aws:s3:::orders*deploybucket*"])
        );
        assert_eq!(
            policy.statement[7].resource,
            strings(&["arn:aws:iam::*:role/orders-prod-eu-west-1-executionRole"])
        );
    }

    #[test]
    fn test_synthesize_accepts_empty_service_name() {
        let policy = synthesize(&IdentityContext::new(""), &FeatureToggles::default());
        assert_eq!(policy.statement.len(), base_statement_count());
        assert_eq!(
            policy.statement[1].resource,
            strings(&["arn:aws:cloudformation:*:*:stack/-*/*"])
        );
    }

    #[test]
    fn test_try_synthesize_rejects_empty_service_name() {
        let result = try_synthesize(&IdentityContext::new(""), &FeatureToggles::default());
        assert!(matches!(
            result,
            Err(SynthesisError::InvalidIdentityContext {
                field: "service_name",
                ..
            })
        ));
    }

    #[test]
    fn test_try_synthesize_matches_synthesize_for_valid_input() {
        let toggles = FeatureToggles::default().enable(Feature::Queue);
        let validated = try_synthesize(&orders_identity(), &toggles).expect("should be valid");
        assert_eq!(validated, synthesize(&orders_identity(), &toggles));
    }
}
