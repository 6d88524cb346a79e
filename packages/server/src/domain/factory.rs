//! Identity generation seam.

use super::ConnectionId;

/// Supplies a globally unique identity for every new connection
pub trait ConnectionIdGenerator: Send + Sync {
    fn generate(&self) -> ConnectionId;
}
