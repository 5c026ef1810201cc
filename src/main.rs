use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use rental_tracker::config::EnvironmentConfig;
use rental_tracker::routes::create_router;
use rental_tracker::services::filters::{AlertFilter, EquipmentFilter, RentalFilter};
use rental_tracker::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🏗️ Rental Tracker - Gateway de alquiler de maquinaria");
    info!("====================================================");
    info!("🔗 Backend de alquileres: {}", config.rental_api_url);
    info!("📊 Fuente del resumen: {:?}", config.summary_source);

    let app_state = AppState::from_config(config.clone())?;
    let app = create_router(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📊 Dashboard:");
    info!("   GET  /dashboard/summary - Resumen de equipos, alquileres y alertas");
    info!("   GET  /dashboard/equipment-types - Estadísticas por tipo de equipo");
    info!("🚜 Equipos:");
    info!("   GET  /equipment - Listar equipos ({})", EquipmentFilter::FIELDS.join(", "));
    info!("   POST /equipment - Crear equipo");
    info!("   GET  /equipment/:id - Obtener equipo");
    info!("   PUT  /equipment/:id - Actualizar equipo");
    info!("🏢 Obras y operadores:");
    info!("   GET  /sites, /operators - Listar (search)");
    info!("   POST /sites, /operators - Crear");
    info!("   GET  /sites/:id, /operators/:id - Obtener");
    info!("   PUT  /sites/:id, /operators/:id - Actualizar");
    info!("📋 Alquileres:");
    info!("   GET  /rentals - Listar alquileres ({})", RentalFilter::FIELDS.join(", "));
    info!("   POST /rentals - Crear alquiler");
    info!("   GET  /rentals/due-soon - Alquileres que vencen pronto");
    info!("   GET  /rentals/overdue - Alquileres vencidos con recargo");
    info!("   GET  /rentals/:id - Obtener alquiler");
    info!("   PUT  /rentals/:id - Actualizar alquiler");
    info!("   POST /rentals/:id/checkin - Devolución del equipo");
    info!("   POST /rentals/:id/extend - Extender alquiler");
    info!("⏱️ Registros de uso:");
    info!("   GET  /usage-logs/rental/:id - Registros de un alquiler");
    info!("   GET  /usage-logs/equipment/:id - Registros de un equipo");
    info!("   POST /usage-logs - Registrar uso diario");
    info!("🚨 Alertas:");
    info!("   GET  /alerts - Listar alertas ({})", AlertFilter::FIELDS.join(", "));
    info!("   POST /alerts/:id/resolve - Resolver alerta");
    info!("   POST /alerts/detect - Detectar retrasos, ralentí y baja utilización");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
