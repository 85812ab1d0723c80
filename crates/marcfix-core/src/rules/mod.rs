//! Built-in fix rules and the chain that runs them.

mod identical_fields;

pub use identical_fields::IdenticalFields;

use async_trait::async_trait;
use tracing::debug;

use crate::Result;
use crate::record::{Record, ValidationReport, ValidatorReport};
use crate::traits::Validator;

/// A single validation rule.
pub trait FixRule: Send + Sync {
    /// Name shown in reports.
    fn name(&self) -> &str;

    /// Check the record. When `fix` is true the rule may change it.
    fn apply(&self, record: &mut Record, fix: bool) -> Result<ValidatorReport>;
}

/// Runs a list of rules in order.
pub struct ValidatorChain {
    rules: Vec<Box<dyn FixRule>>,
    fix: bool,
}

impl ValidatorChain {
    /// An empty chain. Rules only change records when `fix` is true.
    pub fn new(fix: bool) -> Self {
        Self {
            rules: Vec::new(),
            fix,
        }
    }

    /// A chain with the built-in rules.
    pub fn with_default_rules(fix: bool) -> Self {
        Self::new(fix).with_rule(IdenticalFields)
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: impl FixRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Names of the configured rules, in order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run the chain synchronously.
    pub fn run(&self, record: &mut Record) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            let rule_report = rule.apply(record, self.fix)?;
            debug!(rule = rule.name(), findings = rule_report.findings.len(), "rule applied");
            report.push(rule_report);
        }
        Ok(report)
    }
}

#[async_trait]
impl Validator for ValidatorChain {
    async fn validate(&self, record: &mut Record) -> Result<ValidationReport> {
        self.run(record)
    }
}
