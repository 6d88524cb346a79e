//! Server execution logic.

use std::{future::Future, io, path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use ludo_relay_shared::time::Clock;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    domain::ConnectionIdGenerator,
    usecase::{Dispatcher, GetRoomDetailUseCase, GetRoomsUseCase},
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, root_handler, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}

/// Relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(dispatcher, id_generator, clock, get_rooms, get_room_detail)
///     .with_static_dir(Some("/public".into()));
/// server.run("0.0.0.0".to_string(), 8081).await?;
/// ```
pub struct Server {
    /// Dispatcher（コマンド処理）
    dispatcher: Arc<Dispatcher>,
    /// 接続 ID の生成
    id_generator: Arc<dyn ConnectionIdGenerator>,
    clock: Arc<dyn Clock>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 未定義のパスで配信する静的ファイルのディレクトリ
    static_dir: Option<PathBuf>,
}

impl Server {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        id_generator: Arc<dyn ConnectionIdGenerator>,
        clock: Arc<dyn Clock>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    ) -> Self {
        Self {
            dispatcher,
            id_generator,
            clock,
            get_rooms_usecase,
            get_room_detail_usecase,
            static_dir: None,
        }
    }

    /// Serve files from `static_dir` for every path no route matches
    pub fn with_static_dir(mut self, static_dir: Option<PathBuf>) -> Self {
        self.static_dir = static_dir;
        self
    }

    /// Build the axum router with all endpoints
    pub fn router(self) -> Router {
        let static_files = self.static_dir.map(|dir| {
            tracing::info!("Serving static files from {}", dir.display());
            ServeDir::new(dir)
        });

        let app_state = Arc::new(AppState {
            dispatcher: self.dispatcher,
            id_generator: self.id_generator,
            clock: self.clock,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
            static_files: static_files.clone(),
        });

        let app = Router::new()
            // WebSocket エンドポイント（ルートでも接続を受け付ける）
            .route("/", get(root_handler))
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .with_state(app_state);

        let app = match static_files {
            Some(files) => app.fallback_service(files),
            None => app,
        };

        app.layer(TraceLayer::new_for_http())
    }

    /// Bind `host:port` and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound, or
    /// [`ServerError::Serve`] if the server fails while running.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Relay server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
