// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use receipts::{
    config::{AppState, Settings},
    startup::build_router,
};

#[tokio::main]
async fn main() {
    // RUST_LOG sobrescreve o filtro padrão
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env().expect("Configuração inválida.");
    let app_state = AppState::new(settings)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if app_state.settings.seed_reference_data {
        if let Err(e) = app_state.seed_service.seed_reference_data(&app_state.db_pool).await {
            tracing::error!("🔥 Falha ao popular os catálogos de referência: {}", e);
        }
    }

    let addr = app_state.settings.bind_addr.clone();
    let app = build_router(app_state);

    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
