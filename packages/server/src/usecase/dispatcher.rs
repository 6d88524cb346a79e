//! UseCase: コマンドのディスパッチと切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - Dispatcher::handle_message() の応答（ACK / エラー文字列）とルームへの副作用
//! - Dispatcher::handle_disconnect() によるメンバー削除と quit 通知
//!
//! ### なぜこのテストが必要か
//! - 不正なフレームで状態が変わらないこと、join 以外ではルームが作成されないことを保証する
//! - 切断時に全てのルームからメンバーが取り除かれないと、以降のブロードキャストが失敗し続ける
//!
//! ### どのような状況を想定しているか
//! - 正常系：join / quit / update / message / privateMessage
//! - 異常系：CMD: 以外のメッセージ、形式エラー、未知のルーム、不正な引数
//! - エッジケース：メンバーでない接続の切断、ルームの自動削除

use crate::{
    domain::{Connection, Room, RoomId, SharedRoomRegistry},
    protocol::{
        self, CommandName, DecodeError, INVALID_COMMAND, INVALID_COMMAND_SYNTAX, INVALID_GAME,
        Operation, encode_ack,
    },
};

use super::error::DispatchError;

/// Per-message protocol handler shared by every connection.
///
/// Each call to [`Dispatcher::handle_message`] or
/// [`Dispatcher::handle_disconnect`] is one turn: the registry lock is held
/// from room resolution until the reply is queued, so turns never interleave.
pub struct Dispatcher {
    registry: SharedRoomRegistry,
    reap_empty_rooms: bool,
}

impl Dispatcher {
    pub fn new(registry: SharedRoomRegistry) -> Self {
        Self {
            registry,
            reap_empty_rooms: false,
        }
    }

    /// Remove rooms left without members after a quit or a disconnect
    pub fn with_room_reaping(mut self, enabled: bool) -> Self {
        self.reap_empty_rooms = enabled;
        self
    }

    /// Handle one inbound frame from `conn`.
    ///
    /// Recoverable problems (not a command, bad shape, unknown room) are
    /// answered with their literal reply and return `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] for malformed arguments, unknown command names
    /// and argument-count mismatches. No room is touched in that case. A
    /// command other than `join` for an unknown room is answered with
    /// `ERROR:Invalid Game` before its arguments are checked.
    pub async fn handle_message(
        &self,
        conn: &mut Connection,
        raw: &str,
    ) -> Result<(), DispatchError> {
        tracing::debug!(connection = %conn.id(), message = raw, "Received message");

        let command = match protocol::decode(raw) {
            Ok(command) => command,
            Err(DecodeError::NotACommand) => {
                reply(conn, INVALID_COMMAND);
                return Ok(());
            }
            Err(DecodeError::Syntax) => {
                reply(conn, INVALID_COMMAND_SYNTAX);
                return Ok(());
            }
            Err(DecodeError::BadArgs(e)) => return Err(DispatchError::BadArgs(e)),
            Err(DecodeError::UnknownCommand(name)) => {
                return Err(DispatchError::UnsupportedCommand(name));
            }
        };

        let Ok(room_id) = RoomId::try_from(command.room_id) else {
            reply(conn, INVALID_COMMAND_SYNTAX);
            return Ok(());
        };

        let mut registry = self.registry.lock().await;
        if command.name != CommandName::Join && registry.get(&room_id).is_none() {
            tracing::debug!(connection = %conn.id(), room = %room_id, "Command for unknown room");
            reply(conn, INVALID_GAME);
            return Ok(());
        }

        // A join is bound before its room is created so a rejected join leaves nothing behind.
        let operation = Operation::bind(command.name, command.args)?;
        let room = match registry.resolve(&room_id, operation.creates_room()) {
            Ok(room) => room,
            Err(e) => {
                tracing::debug!(connection = %conn.id(), error = %e, "Command for unknown room");
                reply(conn, INVALID_GAME);
                return Ok(());
            }
        };

        let quitting = matches!(operation, Operation::Quit);
        apply(room, conn, operation);

        if quitting && self.reap_empty_rooms {
            registry.reap_empty_rooms();
        }

        reply(conn, &encode_ack(&command.correlation_id));
        Ok(())
    }

    /// Remove `conn` from every room it belongs to.
    ///
    /// The room it last joined is quit first, then any other room still
    /// listing it. Each room it leaves broadcasts one `quit`. Never fails.
    /// Returns the number of rooms the connection was removed from.
    pub async fn handle_disconnect(&self, conn: &mut Connection) -> usize {
        let mut registry = self.registry.lock().await;
        let mut left = 0;

        if let Some(room_id) = conn.current_room().cloned()
            && let Some(room) = registry.get_mut(&room_id)
            && room.quit(conn)
        {
            left += 1;
        }

        for room in registry.rooms_mut() {
            if room.quit(conn) {
                left += 1;
            }
        }
        conn.clear_current_room();

        if self.reap_empty_rooms {
            registry.reap_empty_rooms();
        }

        tracing::debug!(connection = %conn.id(), rooms = left, "Disconnect cleanup complete");
        left
    }
}

fn apply(room: &mut Room, conn: &mut Connection, operation: Operation) {
    match operation {
        Operation::Join => {
            room.join(conn);
        }
        Operation::Quit => {
            room.quit(conn);
        }
        Operation::Update { info } => {
            room.update(conn, info);
        }
        Operation::Message { text } => {
            room.message(conn, text);
        }
        Operation::PrivateMessage { destination, text } => {
            if let Err(e) = room.private_message(conn, &destination, &text) {
                tracing::warn!(connection = %conn.id(), error = %e, "Failed to reply to private message");
            }
        }
    }
}

fn reply(conn: &Connection, frame: &str) {
    if let Err(e) = conn.send(frame) {
        tracing::warn!(connection = %conn.id(), error = %e, "Failed to send reply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::RoomRegistry,
        test_support::{connection, drain_texts, ids, registry, room_id},
    };

    fn dispatcher() -> (Dispatcher, SharedRoomRegistry) {
        let shared = registry().into_shared();
        (Dispatcher::new(shared.clone()), shared)
    }

    async fn member_ids(shared: &SharedRoomRegistry, id: &str) -> Vec<crate::domain::ConnectionId> {
        let registry = shared.lock().await;
        registry
            .get(&room_id(id))
            .map(|room| room.member_ids())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_join_unknown_room_creates_it_and_acks() {
        // テスト項目: 未知のルームへの join でルームが 1 つ作成され、メンバー数は 1 になる
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");

        // when (操作):
        let result = dispatcher
            .handle_message(&mut alice, "CMD:abc:room1:join:[]")
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(drain_texts(&mut alice_rx), vec!["ACK:abc"]);
        assert_eq!(shared.lock().await.len(), 1);
        assert_eq!(member_ids(&shared, "room1").await, ids(&["alice"]));
        assert_eq!(alice.current_room(), Some(&room_id("room1")));
    }

    #[tokio::test]
    async fn test_join_broadcasts_to_existing_members() {
        // テスト項目: join が既存メンバーに通知され、送信者には ACK のみが届く
        // given (前提条件):
        let (dispatcher, _shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");
        let (mut bob, mut bob_rx) = connection("bob");
        dispatcher
            .handle_message(&mut alice, "CMD:1:lobby:join:[]")
            .await
            .unwrap();
        drain_texts(&mut alice_rx);

        // when (操作):
        dispatcher
            .handle_message(&mut bob, "CMD:2:lobby:join:[]")
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(drain_texts(&mut alice_rx), vec![r#"CMD:join:["bob"]"#]);
        assert_eq!(drain_texts(&mut bob_rx), vec!["ACK:2"]);
    }

    #[tokio::test]
    async fn test_non_join_on_unknown_room_is_invalid_game() {
        // テスト項目: 未知のルームへの join 以外のコマンドは ERROR:Invalid Game になり、ルームは作成されない
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");

        for raw in [
            r#"CMD:1:ghost:update:[{"x":1}]"#,
            "CMD:2:ghost:quit:[]",
            r#"CMD:3:ghost:message:["hi"]"#,
            r#"CMD:4:ghost:privateMessage:["bob","hi"]"#,
        ] {
            // when (操作):
            let result = dispatcher.handle_message(&mut alice, raw).await;

            // then (期待する結果):
            assert!(result.is_ok());
            assert_eq!(drain_texts(&mut alice_rx), vec!["ERROR:Invalid Game"]);
        }
        assert!(shared.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_room_is_reported_before_argument_count() {
        // テスト項目: 未知のルームへの join 以外のコマンドは、引数の数が誤っていても ERROR:Invalid Game になる
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");

        // when (操作):
        let result = dispatcher
            .handle_message(&mut alice, "CMD:1:ghost:update:[]")
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(drain_texts(&mut alice_rx), vec!["ERROR:Invalid Game"]);
        assert!(shared.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_argument_count_mismatch_on_existing_room_is_fatal() {
        // テスト項目: 既存のルームへの引数の数が誤ったコマンドは致命的エラーとなり、メンバーは変わらない
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");
        dispatcher.handle_message(&mut alice, "CMD:1:g:join:[]").await.unwrap();
        drain_texts(&mut alice_rx);

        // when (操作):
        let result = dispatcher.handle_message(&mut alice, r#"CMD:2:g:quit:["x"]"#).await;

        // then (期待する結果):
        assert!(matches!(result, Err(DispatchError::ArgumentCount(_))));
        assert!(drain_texts(&mut alice_rx).is_empty());
        assert_eq!(member_ids(&shared, "g").await, ids(&["alice"]));
    }

    #[tokio::test]
    async fn test_message_without_prefix_is_invalid_command() {
        // テスト項目: CMD: で始まらないメッセージは Invalid command となり、状態は変わらない
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");

        // when (操作):
        let result = dispatcher.handle_message(&mut alice, "hello relay").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(drain_texts(&mut alice_rx), vec!["Invalid command"]);
        assert!(shared.lock().await.is_empty());
        assert!(alice.current_room().is_none());
    }

    #[tokio::test]
    async fn test_malformed_frame_is_invalid_command_syntax() {
        // テスト項目: 形式が不正なフレームは Invalid command syntax となる
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");

        // when (操作):
        let result = dispatcher.handle_message(&mut alice, "CMD:abc:room1:join").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(drain_texts(&mut alice_rx), vec!["Invalid command syntax"]);
        assert!(shared.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_args_is_fatal_without_side_effects() {
        // テスト項目: 引数の JSON が不正な場合は致命的エラーとなり、ルームも応答も作られない
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");

        // when (操作):
        let result = dispatcher
            .handle_message(&mut alice, "CMD:abc:room1:join:{oops")
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(DispatchError::BadArgs(_))));
        assert!(drain_texts(&mut alice_rx).is_empty());
        assert!(shared.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_is_fatal() {
        // テスト項目: 未知のコマンド名は UnsupportedCommand になる
        // given (前提条件):
        let (dispatcher, _shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");

        // when (操作):
        let result = dispatcher
            .handle_message(&mut alice, "CMD:abc:room1:teleport:[]")
            .await;

        // then (期待する結果):
        match result {
            Err(DispatchError::UnsupportedCommand(name)) => assert_eq!(name, "teleport"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(drain_texts(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_argument_count_mismatch_is_fatal_and_creates_nothing() {
        // テスト項目: 引数の数が合わない join は致命的エラーとなり、ルームは作成されない
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, _alice_rx) = connection("alice");

        // when (操作):
        let result = dispatcher
            .handle_message(&mut alice, r#"CMD:abc:room1:join:["extra"]"#)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(DispatchError::ArgumentCount(_))));
        assert!(shared.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_message_fan_out_and_ack() {
        // テスト項目: update / message が他のメンバーに配送され、送信者には ACK が返る
        // given (前提条件):
        let (dispatcher, _shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");
        let (mut bob, mut bob_rx) = connection("bob");
        dispatcher.handle_message(&mut alice, "CMD:1:g:join:[]").await.unwrap();
        dispatcher.handle_message(&mut bob, "CMD:2:g:join:[]").await.unwrap();
        drain_texts(&mut alice_rx);
        drain_texts(&mut bob_rx);

        // when (操作):
        dispatcher
            .handle_message(&mut alice, r#"CMD:3:g:update:[{"pos":[1,2]}]"#)
            .await
            .unwrap();
        dispatcher
            .handle_message(&mut alice, r#"CMD:4:g:message:["gg"]"#)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(drain_texts(&mut alice_rx), vec!["ACK:3", "ACK:4"]);
        assert_eq!(
            drain_texts(&mut bob_rx),
            vec![
                r#"CMD:update:["alice",{"pos":[1,2]}]"#,
                r#"CMD:message:["alice","gg"]"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_private_message_replies_wip_then_ack() {
        // テスト項目: privateMessage は送信者に WIP を返した後 ACK を返し、他のメンバーには何も届かない
        // given (前提条件):
        let (dispatcher, _shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");
        let (mut bob, mut bob_rx) = connection("bob");
        dispatcher.handle_message(&mut alice, "CMD:1:g:join:[]").await.unwrap();
        dispatcher.handle_message(&mut bob, "CMD:2:g:join:[]").await.unwrap();
        drain_texts(&mut alice_rx);
        drain_texts(&mut bob_rx);

        // when (操作):
        dispatcher
            .handle_message(&mut alice, r#"CMD:5:g:privateMessage:["bob","psst"]"#)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(drain_texts(&mut alice_rx), vec!["WIP", "ACK:5"]);
        assert!(drain_texts(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_quit_command_removes_member_and_acks() {
        // テスト項目: quit コマンドでメンバーが削除され、残りのメンバーに通知される
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");
        let (mut bob, mut bob_rx) = connection("bob");
        dispatcher.handle_message(&mut alice, "CMD:1:g:join:[]").await.unwrap();
        dispatcher.handle_message(&mut bob, "CMD:2:g:join:[]").await.unwrap();
        drain_texts(&mut alice_rx);
        drain_texts(&mut bob_rx);

        // when (操作):
        dispatcher.handle_message(&mut bob, "CMD:3:g:quit:[]").await.unwrap();

        // then (期待する結果):
        assert_eq!(drain_texts(&mut bob_rx), vec!["ACK:3"]);
        assert_eq!(drain_texts(&mut alice_rx), vec![r#"CMD:quit:["bob"]"#]);
        assert_eq!(member_ids(&shared, "g").await, ids(&["alice"]));
        assert!(bob.current_room().is_none());
        // 空になってもルームは残る（自動削除は無効）
        dispatcher.handle_message(&mut alice, "CMD:4:g:quit:[]").await.unwrap();
        assert_eq!(shared.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_removes_member_and_broadcasts_one_quit() {
        // テスト項目: 切断でメンバーが削除され、残りのメンバーに quit が 1 回だけ通知される
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut a, mut a_rx) = connection("a");
        let (mut b, _b_rx) = connection("b");
        let (mut c, mut c_rx) = connection("c");
        for conn in [&mut a, &mut b, &mut c] {
            dispatcher.handle_message(conn, "CMD:x:r:join:[]").await.unwrap();
        }
        drain_texts(&mut a_rx);
        drain_texts(&mut c_rx);

        // when (操作):
        let left = dispatcher.handle_disconnect(&mut b).await;

        // then (期待する結果):
        assert_eq!(left, 1);
        assert_eq!(member_ids(&shared, "r").await, ids(&["a", "c"]));
        assert_eq!(drain_texts(&mut a_rx), vec![r#"CMD:quit:["b"]"#]);
        assert_eq!(drain_texts(&mut c_rx), vec![r#"CMD:quit:["b"]"#]);
    }

    #[tokio::test]
    async fn test_disconnect_of_non_member_is_silent() {
        // テスト項目: どのルームにも属さない接続の切断は何もせず、エラーにもならない
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");
        let (mut stranger, _stranger_rx) = connection("stranger");
        dispatcher.handle_message(&mut alice, "CMD:1:r:join:[]").await.unwrap();
        drain_texts(&mut alice_rx);

        // when (操作):
        let left = dispatcher.handle_disconnect(&mut stranger).await;

        // then (期待する結果):
        assert_eq!(left, 0);
        assert!(drain_texts(&mut alice_rx).is_empty());
        assert_eq!(member_ids(&shared, "r").await, ids(&["alice"]));
    }

    #[tokio::test]
    async fn test_disconnect_leaves_every_joined_room() {
        // テスト項目: 複数のルームに参加していた接続は切断時に全てのルームから削除される
        // given (前提条件):
        let (dispatcher, shared) = dispatcher();
        let (mut alice, mut alice_rx) = connection("alice");
        let (mut bob, _bob_rx) = connection("bob");
        dispatcher.handle_message(&mut alice, "CMD:1:first:join:[]").await.unwrap();
        dispatcher.handle_message(&mut alice, "CMD:2:second:join:[]").await.unwrap();
        dispatcher.handle_message(&mut bob, "CMD:3:first:join:[]").await.unwrap();
        dispatcher.handle_message(&mut bob, "CMD:4:second:join:[]").await.unwrap();
        drain_texts(&mut alice_rx);

        // when (操作):
        let left = dispatcher.handle_disconnect(&mut bob).await;

        // then (期待する結果):
        assert_eq!(left, 2);
        assert_eq!(member_ids(&shared, "first").await, ids(&["alice"]));
        assert_eq!(member_ids(&shared, "second").await, ids(&["alice"]));
        assert_eq!(
            drain_texts(&mut alice_rx),
            vec![r#"CMD:quit:["bob"]"#, r#"CMD:quit:["bob"]"#]
        );
        assert!(bob.current_room().is_none());
    }

    #[tokio::test]
    async fn test_room_reaping_removes_empty_rooms() {
        // テスト項目: 自動削除が有効な場合、空になったルームは削除される
        // given (前提条件):
        let shared = RoomRegistry::new(std::sync::Arc::new(
            ludo_relay_shared::time::FixedClock::new(0),
        ))
        .into_shared();
        let dispatcher = Dispatcher::new(shared.clone()).with_room_reaping(true);
        let (mut alice, _alice_rx) = connection("alice");
        let (mut bob, _bob_rx) = connection("bob");
        dispatcher.handle_message(&mut alice, "CMD:1:solo:join:[]").await.unwrap();
        dispatcher.handle_message(&mut bob, "CMD:2:duo:join:[]").await.unwrap();

        // when (操作):
        dispatcher.handle_message(&mut alice, "CMD:3:solo:quit:[]").await.unwrap();
        dispatcher.handle_disconnect(&mut bob).await;

        // then (期待する結果):
        assert!(shared.lock().await.is_empty());
    }
}
