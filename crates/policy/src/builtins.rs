use admission_core::PolicyContext;

use crate::rule::Rule;

/// Denies requests whose `duration` exceeds `max_seconds`.
pub struct MaxDuration {
    max_seconds: u32,
}

impl MaxDuration {
    #[must_use]
    pub fn new(max_seconds: u32) -> Self {
        Self { max_seconds }
    }
}

impl Rule for MaxDuration {
    fn evaluate(&self, ctx: &PolicyContext) -> Result<(), String> {
        if ctx.duration > self.max_seconds {
            return Err("duration limit exceeded".to_owned());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "max_duration"
    }
}

/// Per-org user ceiling from a fixed table. Unknown orgs pass.
///
/// The table is a hard-coded constant, isolated behind [`quota_for`] so a
/// future config-driven replacement only has to change this one function.
pub struct EnforceQuota;

/// Return the user ceiling for `org_id`, or `None` if the org has no quota
/// (in which case the rule always passes).
#[must_use]
pub fn quota_for(org_id: &str) -> Option<u64> {
    match org_id {
        "free-tier" => Some(1_000),
        "pro" => Some(50_000),
        _ => None,
    }
}

impl Rule for EnforceQuota {
    fn evaluate(&self, ctx: &PolicyContext) -> Result<(), String> {
        if let Some(limit) = quota_for(ctx.org_id.as_str()) {
            if u64::from(ctx.users) > limit {
                return Err("organization quota exceeded".to_owned());
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "enforce_quota"
    }
}
