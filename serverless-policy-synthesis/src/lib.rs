//! This crate provides the core logic of Serverless Policy:
//! - Identity context and feature toggle model
//! - Resource pattern templating
//! - The declarative rule table and policy synthesis
//! - Output file naming
//!
//! Synthesis is pure: the same inputs always produce the same document, and
//! no I/O happens here. Prompting and writing live in the CLI crate.

mod error;
mod naming;
mod synthesis;
mod types;

pub use error::{SynthesisError, SynthesisResult};
pub use naming::{
    escape_filename_value, policy_file_name, policy_file_stem, POLICY_FILE_SUFFIX, STAR_TOKEN,
};
pub use synthesis::{
    base_statement_count, render_template, synthesize, try_synthesize, DeploymentConventions,
    Rule, StatementTemplate, Synthesizer, TemplateFields, Trigger, RULES,
};
pub use types::{
    Effect, Feature, FeatureToggles, IdentityContext, PolicyDocument, Statement, POLICY_VERSION,
    WILDCARD,
};
