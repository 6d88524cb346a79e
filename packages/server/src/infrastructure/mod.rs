//! Infrastructure layer: concrete implementations of the domain seams.

pub mod dto;
pub mod id_generator;
pub mod message_pusher;
