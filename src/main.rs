//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use cafe_floor::{
    build_router,
    config::{AppState, Config},
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env().expect("Configuração inválida.");
    let bind_addr = config.bind_addr;

    let app_state = AppState::new(config)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Varredura de reservas em task própria, desacoplada das requisições
    tokio::spawn(app_state.reservation_scheduler().run());

    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", bind_addr);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Erro no servidor Axum");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao escutar o sinal de desligamento: {}", e);
    }
    tracing::info!("🛑 Desligando o servidor...");
}
