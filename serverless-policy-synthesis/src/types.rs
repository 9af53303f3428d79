//! Input and output data model for policy synthesis

use serde::{Deserialize, Serialize};

use crate::error::{SynthesisError, SynthesisResult};

/// IAM policy language version written into every document
pub const POLICY_VERSION: &str = "2012-10-17";

/// Value that stands for "match anything" in stage, region and account fields
pub const WILDCARD: &str = "*";

/// Deployment-identifying parameters used to narrow resource patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityContext {
    pub service_name: String,
    pub stage: String,
    pub region: String,
    pub account_id: String,
    /// Empty means no key-scoped grants are requested
    pub kms_key_id: String,
}

impl IdentityContext {
    /// Create a context for `service_name` targeting every stage, region and
    /// account, with no KMS key.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            stage: WILDCARD.to_string(),
            region: WILDCARD.to_string(),
            account_id: WILDCARD.to_string(),
            kms_key_id: String::new(),
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    pub fn with_kms_key_id(mut self, kms_key_id: impl Into<String>) -> Self {
        self.kms_key_id = kms_key_id.into();
        self
    }

    /// Whether key-scoped KMS grants were requested
    pub fn has_kms_key(&self) -> bool {
        !self.kms_key_id.is_empty()
    }

    /// Reject contexts that would produce a meaningless document.
    ///
    /// The service name must contain something other than whitespace, and no
    /// field may contain control characters. Wildcards and any other text are
    /// accepted as-is; this is not an AWS naming validator.
    pub fn validate(&self) -> SynthesisResult<()> {
        if self.service_name.trim().is_empty() {
            return Err(SynthesisError::invalid_identity(
                "service_name",
                "must not be empty",
            ));
        }

        let fields = [
            ("service_name", &self.service_name),
            ("stage", &self.stage),
            ("region", &self.region),
            ("account_id", &self.account_id),
            ("kms_key_id", &self.kms_key_id),
        ];
        for (field, value) in fields {
            if value.chars().any(char::is_control) {
                return Err(SynthesisError::invalid_identity(
                    field,
                    "must not contain control characters",
                ));
            }
        }

        Ok(())
    }
}

/// Optional capabilities of the deployed service.
///
/// Absent keys deserialize as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    pub uses_key_value_store: bool,
    pub uses_event_stream: bool,
    pub uses_api_gateway: bool,
    pub uses_queue: bool,
    pub uses_object_store: bool,
    pub uses_private_network: bool,
}

impl FeatureToggles {
    /// Read a single toggle
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::KeyValueStore => self.uses_key_value_store,
            Feature::EventStream => self.uses_event_stream,
            Feature::ApiGateway => self.uses_api_gateway,
            Feature::Queue => self.uses_queue,
            Feature::ObjectStore => self.uses_object_store,
            Feature::PrivateNetwork => self.uses_private_network,
        }
    }

    /// Return a copy with `feature` switched on
    pub fn enable(mut self, feature: Feature) -> Self {
        match feature {
            Feature::KeyValueStore => self.uses_key_value_store = true,
            Feature::EventStream => self.uses_event_stream = true,
            Feature::ApiGateway => self.uses_api_gateway = true,
            Feature::Queue => self.uses_queue = true,
            Feature::ObjectStore => self.uses_object_store = true,
            Feature::PrivateNetwork => self.uses_private_network = true,
        }
        self
    }

    /// Features currently switched on, in declaration order
    pub fn enabled(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|feature| self.is_enabled(*feature))
            .collect()
    }
}

/// Names of the individual toggles in [`FeatureToggles`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// DynamoDB tables
    KeyValueStore,
    /// Kinesis streams
    EventStream,
    /// API Gateway REST APIs
    ApiGateway,
    /// SQS queues
    Queue,
    /// S3 buckets beyond the deployment bucket
    ObjectStore,
    /// Functions running inside a VPC
    PrivateNetwork,
}

impl Feature {
    /// All features in declaration order
    pub const ALL: [Feature; 6] = [
        Feature::KeyValueStore,
        Feature::EventStream,
        Feature::ApiGateway,
        Feature::Queue,
        Feature::ObjectStore,
        Feature::PrivateNetwork,
    ];
}

/// Statement effect. Synthesis only ever emits `Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// A single grant: effect, actions and the resource patterns they apply to.
///
/// Serialized field order is `Effect`, `Action`, `Resource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,
    pub action: Vec<String>,
    pub resource: Vec<String>,
}

impl Statement {
    /// Create an `Allow` statement
    pub fn allow(action: Vec<String>, resource: Vec<String>) -> Self {
        Self {
            effect: Effect::Allow,
            action,
            resource,
        }
    }
}

/// Ordered collection of statements produced by one synthesis call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Create an empty document with the standard version marker
    pub fn new() -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: Vec::new(),
        }
    }

    pub fn add_statement(&mut self, statement: Statement) {
        self.statement.push(statement);
    }

    /// Render as JSON indented with two spaces
    pub fn to_json_pretty(&self) -> SynthesisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::new()
    }
}
