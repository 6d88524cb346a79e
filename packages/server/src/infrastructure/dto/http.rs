//! HTTP API response DTOs and their conversion from domain read models.

use ludo_relay_shared::time::timestamp_to_rfc3339;
use serde::Serialize;

use crate::domain::{MemberSnapshot, RoomSnapshot};

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// Member connection ids in join order
    pub members: Vec<String>,
    pub created_at: String,
}

/// Body of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDetailDto {
    pub connection_id: String,
    pub connected_at: String,
}

// ========================================
// Domain Read Model → DTO
// ========================================

impl From<RoomSnapshot> for RoomSummaryDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            id: snapshot.id.into_string(),
            members: snapshot
                .members
                .into_iter()
                .map(|m| m.id.into_string())
                .collect(),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

impl From<MemberSnapshot> for MemberDetailDto {
    fn from(member: MemberSnapshot) -> Self {
        Self {
            connection_id: member.id.into_string(),
            connected_at: timestamp_to_rfc3339(member.connected_at.value()),
        }
    }
}

impl From<RoomSnapshot> for RoomDetailDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            id: snapshot.id.into_string(),
            members: snapshot.members.into_iter().map(Into::into).collect(),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}
