//! Server lifecycle management helpers.
//!
//! This module encapsulates the heavy lifting kept out of `main.rs`:
//! building shared application state, registering shapes, wiring the HTTP
//! server, and coordinating graceful shutdown.

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use log::{error, info};
use rowcast_api::{routes, ShapeRegistry};
use rowcast_commons::{EngineSettings, EventSink, LogEventSink};
use rowcast_engine::PlanCache;
use rowcast_server::config::ServerConfig;
use rowcast_server::{demo, middleware};
use std::sync::Arc;
use std::time::Duration;

/// Aggregated application components shared across the HTTP workers.
pub struct ApplicationComponents {
    pub registry: Arc<ShapeRegistry>,
    pub plan_cache: Arc<PlanCache>,
    pub events: Arc<dyn EventSink>,
    pub engine_settings: EngineSettings,
}

/// Build the shared state and register the available shapes.
pub async fn bootstrap(config: &ServerConfig) -> Result<ApplicationComponents> {
    let registry = Arc::new(ShapeRegistry::new());
    let plan_cache = Arc::new(PlanCache::new());
    let events: Arc<dyn EventSink> = Arc::new(LogEventSink);

    // Development seed: a sample document-metadata stream. Real deployments
    // register their shapes against query-backed cursor sources here.
    let descriptor = demo::documents_descriptor()?;
    registry.register("documents", descriptor, Arc::new(demo::documents_source()));
    info!("Registered shapes: {}", registry.names().join(", "));

    info!(
        "Engine settings: row_batch_event_interval={} command_timeout={}s strict_schema={} array_element_fallback_to_string={}",
        config.engine.row_batch_event_interval,
        config.engine.command_timeout,
        config.engine.strict_schema,
        config.engine.array_element_fallback_to_string
    );

    Ok(ApplicationComponents {
        registry,
        plan_cache,
        events,
        engine_settings: config.engine.clone(),
    })
}

/// Start the HTTP server and manage graceful shutdown.
pub async fn run(config: &ServerConfig, components: ApplicationComponents) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);
    info!("Endpoints: GET /v1/api/streams/{{shape}}, GET /health");

    let registry = components.registry.clone();
    let plan_cache = components.plan_cache.clone();
    let events = components.events.clone();
    let engine_settings = components.engine_settings.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors())
            .app_data(web::Data::new(registry.clone()))
            .app_data(web::Data::new(plan_cache.clone()))
            .app_data(web::Data::new(engine_settings.clone()))
            .app_data(web::Data::new(events.clone()))
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .keep_alive(Duration::from_secs(config.performance.keepalive_timeout))
    .client_request_timeout(Duration::from_secs(config.performance.request_head_timeout))
    .workers(if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    })
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            if let Err(e) = result {
                error!("Server task failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
            // stop(true) lets in-flight streams drain before workers exit.
            server_handle.stop(true).await;
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
