pub mod error;
pub mod request;
pub mod types;

pub use error::AdmissionError;
pub use request::{ExecutionRequest, ExecutionResponse, PolicyContext};
pub use types::{OrgId, RequestId};
