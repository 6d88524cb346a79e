//! UseCase: ルーム詳細取得

use crate::domain::{RoomId, RoomSnapshot, SharedRoomRegistry};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    registry: SharedRoomRegistry,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: SharedRoomRegistry) -> Self {
        Self { registry }
    }

    /// 指定したルームのスナップショットを返す
    ///
    /// ルームを作成することはありません。
    pub async fn execute(&self, room_id: String) -> Result<RoomSnapshot, GetRoomDetailError> {
        let room_id = RoomId::try_from(room_id).map_err(|_| GetRoomDetailError::InvalidRoomId)?;
        let registry = self.registry.lock().await;
        registry
            .get(&room_id)
            .map(|room| room.snapshot())
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
