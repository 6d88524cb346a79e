//! UUID based connection identity.

use uuid::Uuid;

use crate::domain::{ConnectionId, ConnectionIdGenerator};

/// Generates a random v4 UUID per connection
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConnectionIdGenerator;

impl ConnectionIdGenerator for UuidConnectionIdGenerator {
    fn generate(&self) -> ConnectionId {
        ConnectionId::new(Uuid::new_v4().to_string()).expect("UUID string should be non-empty")
    }
}
