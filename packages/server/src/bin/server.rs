//! Room-based command relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin ludo-relay-server
//! cargo run --bin ludo-relay-server -- --port 3000 --reap-empty-rooms
//! ```

use std::sync::Arc;

use clap::Parser;
use ludo_relay_server::{
    config::{Args, NetworkMode, RelayConfig},
    domain::RoomRegistry,
    infrastructure::id_generator::UuidConnectionIdGenerator,
    ui::Server,
    usecase::{Dispatcher, GetRoomDetailUseCase, GetRoomsUseCase},
};
use ludo_relay_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let mode = NetworkMode::detect();
    let config = match RelayConfig::from_args(args, mode) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(mode = ?config.mode, port = config.port, "Starting relay");

    // Initialize dependencies in order:
    // 1. Clock and registry
    // 2. UseCases
    // 3. Server

    // 1. Room registry (in-memory, process-wide)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = RoomRegistry::new(clock.clone()).into_shared();

    // 2. Create UseCases
    let dispatcher =
        Arc::new(Dispatcher::new(registry.clone()).with_room_reaping(config.reap_empty_rooms));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(registry));

    // 3. Create and run the server
    let server = Server::new(
        dispatcher,
        Arc::new(UuidConnectionIdGenerator),
        clock,
        get_rooms_usecase,
        get_room_detail_usecase,
    )
    .with_static_dir(config.static_dir);

    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
