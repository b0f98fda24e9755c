use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tonic::transport::Server;
use tracing::info;

use admission_audit::AuditSink;
use admission_policy::PolicyEngine;
use admission_server::config::AdmissionConfig;
use admission_server::grpc::pb::admission_service_server::AdmissionServiceServer;
use admission_server::grpc::{trace_interceptor, AdmissionGrpcService};
use admission_server::observability::{init_logging, Metrics};
use admission_server::{state_factory, tls as tls_config, AdmissionHandler};

/// Admission control gRPC service.
#[derive(Parser, Debug)]
#[command(name = "admission-server", about = "Execution admission control service")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "admission.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let cli = Cli::parse();

    let config: AdmissionConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        info!(path = %cli.config, "config file not found, using defaults");
        toml::from_str("")?
    };
    config.validate()?;

    let metrics = Metrics::install();

    let store = state_factory::create_state(&config.store).await?;

    let admission_handler = Arc::new(AdmissionHandler::new(
        store,
        admission_shed::Shedder::new(config.shed.max_inflight),
        PolicyEngine::default_engine(),
        AuditSink::spawn().0,
        config.rate_limit.rate_limit,
        Duration::from_secs(config.rate_limit.rate_window_seconds),
    ));

    let grpc_service = AdmissionServiceServer::with_interceptor(
        AdmissionGrpcService::new(Arc::clone(&admission_handler)),
        trace_interceptor,
    );

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<AdmissionServiceServer<AdmissionGrpcService>>()
        .await;
    // The empty service name denotes overall server health (grpc.health.v1
    // convention); report it SERVING alongside the named service.
    health_reporter.set_service_status("", tonic_health::ServingStatus::Serving).await;

    let grpc_addr: std::net::SocketAddr =
        format!("{}:{}", config.server.host, config.server.grpc_port).parse()?;
    let tls = tls_config::load_server_tls(&config.tls)?;

    let mut builder = Server::builder();
    if let Some(tls) = tls {
        builder = builder.tls_config(tls)?;
    }
    let grpc_future = builder
        .add_service(health_service)
        .add_service(grpc_service)
        .serve_with_shutdown(grpc_addr, shutdown_signal());

    info!(address = %grpc_addr, "admission-server gRPC listening");

    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;
    info!(address = %http_addr, "admission-server health endpoint listening");
    let http_future = axum::serve(http_listener, admission_server::http::health_router())
        .with_graceful_shutdown(shutdown_signal());

    let metrics_addr = format!("{}:{}", config.server.host, config.server.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr).await?;
    info!(address = %metrics_addr, "admission-server metrics endpoint listening");
    let metrics_future = axum::serve(metrics_listener, admission_server::http::metrics_router(metrics))
        .with_graceful_shutdown(shutdown_signal());

    tokio::select! {
        result = grpc_future => {
            if let Err(e) = result {
                tracing::error!(error = %e, "gRPC server error");
                return Err(e.into());
            }
        }
        result = http_future => {
            if let Err(e) = result {
                tracing::error!(error = %e, "http server error");
                return Err(e.into());
            }
        }
        result = metrics_future => {
            if let Err(e) = result {
                tracing::error!(error = %e, "metrics server error");
                return Err(e.into());
            }
        }
    }

    info!("admission-server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful
/// shutdown of both listeners. In-flight calls are bounded by the
/// handler's own two-second deadline, so a short grace period suffices.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
