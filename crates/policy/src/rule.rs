use admission_core::PolicyContext;

/// A pure function from [`PolicyContext`] to success or a denial reason.
///
/// Object-safe so an [`crate::engine::PolicyEngine`] can hold
/// `Vec<Box<dyn Rule>>` built once at startup and never mutated afterwards.
pub trait Rule: Send + Sync {
    /// Evaluate the rule. `Err` carries the human-readable denial reason.
    fn evaluate(&self, ctx: &PolicyContext) -> Result<(), String>;

    /// A short name for diagnostics (not returned to callers).
    fn name(&self) -> &'static str;
}
