use admission_core::PolicyContext;

use crate::builtins::{EnforceQuota, MaxDuration};
use crate::rule::Rule;

/// An ordered, immutable sequence of [`Rule`]s. Evaluation short-circuits on
/// the first failing rule, so rule order is part of the contract: it
/// determines which reason a denied request reports.
pub struct PolicyEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl PolicyEngine {
    /// Start building an engine with no rules.
    #[must_use]
    pub fn builder() -> PolicyEngineBuilder {
        PolicyEngineBuilder { rules: Vec::new() }
    }

    /// The default engine composition: `EnforceQuota` then `MaxDuration(3600)`.
    #[must_use]
    pub fn default_engine() -> Self {
        Self::builder()
            .rule(EnforceQuota)
            .rule(MaxDuration::new(3600))
            .build()
    }

    /// Evaluate every rule in declared order. Returns the first failing
    /// rule's reason, or `Ok(())` if every rule passed.
    pub fn evaluate(&self, ctx: &PolicyContext) -> Result<(), String> {
        for rule in &self.rules {
            rule.evaluate(ctx)?;
        }
        Ok(())
    }
}

/// Builder producing an immutable [`PolicyEngine`].
pub struct PolicyEngineBuilder {
    rules: Vec<Box<dyn Rule>>,
}

impl PolicyEngineBuilder {
    #[must_use]
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    #[must_use]
    pub fn build(self) -> PolicyEngine {
        PolicyEngine { rules: self.rules }
    }
}

#[cfg(test)]
mod tests {
    use admission_core::OrgId;

    use super::*;

    fn ctx(org_id: &str, users: u32, duration: u32) -> PolicyContext {
        PolicyContext {
            org_id: OrgId::new(org_id),
            users,
            duration,
        }
    }

    #[test]
    fn default_engine_allows_valid_request() {
        let engine = PolicyEngine::default_engine();
        assert!(engine.evaluate(&ctx("pro", 10, 600)).is_ok());
    }

    #[test]
    fn default_engine_denies_quota_before_duration() {
        // Both rules would fail here; quota runs first in the default
        // composition, so its reason wins.
        let engine = PolicyEngine::default_engine();
        let err = engine.evaluate(&ctx("free-tier", 2000, 7200)).unwrap_err();
        assert_eq!(err, "organization quota exceeded");
    }

    #[test]
    fn default_engine_denies_duration_alone() {
        let engine = PolicyEngine::default_engine();
        let err = engine.evaluate(&ctx("pro", 10, 7200)).unwrap_err();
        assert_eq!(err, "duration limit exceeded");
    }

    #[test]
    fn order_determines_reported_reason() {
        // Swap the declared order: MaxDuration first should now win.
        let engine = PolicyEngine::builder()
            .rule(MaxDuration::new(3600))
            .rule(EnforceQuota)
            .build();
        let err = engine.evaluate(&ctx("free-tier", 2000, 7200)).unwrap_err();
        assert_eq!(err, "duration limit exceeded");
    }

    #[test]
    fn empty_engine_allows_everything() {
        let engine = PolicyEngine::builder().build();
        assert!(engine.evaluate(&ctx("free-tier", 1_000_000, 1_000_000)).is_ok());
    }
}
