//! Shared application state handed to every handler.

use std::sync::Arc;

use ludo_relay_shared::time::Clock;
use tower_http::services::ServeDir;

use crate::{
    domain::ConnectionIdGenerator,
    usecase::{Dispatcher, GetRoomDetailUseCase, GetRoomsUseCase},
};

pub struct AppState {
    /// Dispatcher（コマンド処理と切断処理）
    pub dispatcher: Arc<Dispatcher>,
    /// 接続 ID の生成
    pub id_generator: Arc<dyn ConnectionIdGenerator>,
    /// 接続時刻の取得
    pub clock: Arc<dyn Clock>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 静的ファイルの配信（未設定なら None）
    pub static_files: Option<ServeDir>,
}
