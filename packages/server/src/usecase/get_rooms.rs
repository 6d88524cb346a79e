//! UseCase: ルーム一覧取得

use crate::domain::{RoomSnapshot, SharedRoomRegistry};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: SharedRoomRegistry,
}

impl GetRoomsUseCase {
    pub fn new(registry: SharedRoomRegistry) -> Self {
        Self { registry }
    }

    /// 全ルームのスナップショットを ID 順で返す
    pub async fn execute(&self) -> Vec<RoomSnapshot> {
        let registry = self.registry.lock().await;
        registry.rooms().into_iter().map(|room| room.snapshot()).collect()
    }
}
