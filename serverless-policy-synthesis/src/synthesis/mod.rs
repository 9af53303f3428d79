//! Policy synthesis (deterministic JSON generation)

pub mod engine;
pub mod rules;
pub mod template;

pub use engine::{synthesize, try_synthesize, Synthesizer};
pub use rules::{base_statement_count, Rule, StatementTemplate, Trigger, RULES};
pub use template::{render_template, DeploymentConventions, TemplateFields};
