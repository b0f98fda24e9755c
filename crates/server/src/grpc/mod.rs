mod interceptor;
mod service;

pub use interceptor::trace_interceptor;
pub use service::{pb, AdmissionGrpcService};
