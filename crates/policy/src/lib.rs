pub mod builtins;
pub mod engine;
pub mod rule;

pub use builtins::{quota_for, EnforceQuota, MaxDuration};
pub use engine::{PolicyEngine, PolicyEngineBuilder};
pub use rule::Rule;
