//! Hiroba chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 4000 --notify-rejections
//! ```

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use hiroba_server::{
    config::ServerConfig,
    infrastructure::{
        archive::JsonFileMessageArchive, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::Server,
    usecase::{GetRoomDetailUseCase, GetRoomHistoryUseCase, GetRoomsUseCase, SessionCoordinator},
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(
        &[env!("CARGO_PKG_NAME"), "hiroba-shared", "tower_http"],
        &config.log_level,
        config.log_format,
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize dependencies in order:
    // 1. Archive / Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Message archive (JSON file) and room registry
    let archive = Arc::new(JsonFileMessageArchive::open(&config.data_file).await?);
    tracing::info!("Message history file: {}", archive.path().display());
    let clock = Arc::new(SystemClock);
    let repository = Arc::new(InMemoryRoomRepository::new(
        archive.clone(),
        clock.clone(),
        config.history_limit,
    ));

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. UseCases
    let session_coordinator = Arc::new(SessionCoordinator::new(
        repository.clone(),
        archive,
        message_pusher,
        clock,
        config.notify_rejections,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository.clone()));
    let get_room_history_usecase = Arc::new(GetRoomHistoryUseCase::new(repository));

    // 4. Server
    let server = Server::new(
        session_coordinator,
        get_rooms_usecase,
        get_room_detail_usecase,
        get_room_history_usecase,
    );
    server.run(&config.host, config.port).await
}
