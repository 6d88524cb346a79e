//! UseCase layer: protocol handling and read-only room queries.

pub mod dispatcher;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, GetRoomDetailError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
