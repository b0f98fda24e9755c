pub mod config;
pub mod grpc;
pub mod handler;
pub mod http;
pub mod observability;
pub mod state_factory;
pub mod tls;

pub use handler::AdmissionHandler;
