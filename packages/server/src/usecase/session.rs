//! Session Coordinator
//!
//! 接続ごとの状態機械（`Unbound` → `Joined`）を持ち、受け取ったコマンドを各ユースケースに振り分ける。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SessionCoordinator の connect / handle / disconnect
//! - 状態遷移（join 前の要求の拒否、別ルームへの join による暗黙の退出）
//! - 拒否時のエラー通知（`notify_rejections` が有効な場合のみ）
//!
//! ### なぜこのテストが必要か
//! - 拒否された要求が接続を切らず、他の参加者にも影響しないことを保証
//! - キックされた接続からの要求が一切処理されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：join → send → disconnect
//! - 異常系：join 前の send、キック後の要求、不正なフレーム
//! - エッジケース：同じルームへの再 join、別ルームへの join

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ClientCommand, ConnectionId, DisplayName, ErrorCode, MessageArchive, MessagePusher,
    PusherChannel, RoomName, RoomRepository, ServerEvent,
};

use super::{
    delete_message::DeleteMessageUseCase,
    edit_message::EditMessageUseCase,
    error::SessionError,
    join_room::JoinRoomUseCase,
    kick_member::KickMemberUseCase,
    leave_room::LeaveRoomUseCase,
    message_store::MessageStore,
    react_to_message::ToggleReactionUseCase,
    room_access::push,
    send_message::SendMessageUseCase,
    typing::TypingUseCase,
};

/// 接続とルームの結び付き
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room: RoomName,
    pub username: DisplayName,
}

impl Binding {
    pub fn new(room: RoomName, username: DisplayName) -> Self {
        Self { room, username }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unbound,
    Joined(Binding),
}

/// 1 接続分のセッション。WebSocket ハンドラが所有する
#[derive(Debug)]
pub struct Session {
    connection_id: ConnectionId,
    state: SessionState,
}

impl Session {
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn room(&self) -> Option<&RoomName> {
        match &self.state {
            SessionState::Joined(binding) => Some(&binding.room),
            SessionState::Unbound => None,
        }
    }
}

pub struct SessionCoordinator {
    message_pusher: Arc<dyn MessagePusher>,
    join_room: JoinRoomUseCase,
    leave_room: LeaveRoomUseCase,
    send_message: SendMessageUseCase,
    toggle_reaction: ToggleReactionUseCase,
    edit_message: EditMessageUseCase,
    delete_message: DeleteMessageUseCase,
    kick_member: KickMemberUseCase,
    typing: TypingUseCase,
    /// 拒否した要求を `error` イベントで要求者に知らせるか
    notify_rejections: bool,
}

impl SessionCoordinator {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        archive: Arc<dyn MessageArchive>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        notify_rejections: bool,
    ) -> Self {
        let message_store = Arc::new(MessageStore::new(archive));
        Self {
            join_room: JoinRoomUseCase::new(
                repository.clone(),
                message_store.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            leave_room: LeaveRoomUseCase::new(repository.clone(), message_pusher.clone()),
            send_message: SendMessageUseCase::new(
                repository.clone(),
                message_store.clone(),
                message_pusher.clone(),
                clock,
            ),
            toggle_reaction: ToggleReactionUseCase::new(
                repository.clone(),
                message_store.clone(),
                message_pusher.clone(),
            ),
            edit_message: EditMessageUseCase::new(
                repository.clone(),
                message_store.clone(),
                message_pusher.clone(),
            ),
            delete_message: DeleteMessageUseCase::new(
                repository.clone(),
                message_store,
                message_pusher.clone(),
            ),
            kick_member: KickMemberUseCase::new(repository.clone(), message_pusher.clone()),
            typing: TypingUseCase::new(repository, message_pusher.clone()),
            message_pusher,
            notify_rejections,
        }
    }

    /// 新しい接続を登録し、`Unbound` のセッションを返す
    pub async fn connect(&self, sender: PusherChannel) -> Session {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        tracing::info!("Connection '{}' opened", connection_id);
        Session {
            connection_id,
            state: SessionState::Unbound,
        }
    }

    /// コマンドを処理する
    ///
    /// 拒否された場合もエラーを返すだけで接続は維持される。
    pub async fn handle(
        &self,
        session: &mut Session,
        command: ClientCommand,
    ) -> Result<(), SessionError> {
        let kind = command.kind();
        let result = self.dispatch(session, command).await;
        if let Err(e) = &result {
            tracing::debug!(
                "Rejected '{}' from connection '{}': {}",
                kind,
                session.connection_id,
                e
            );
            if self.notify_rejections && *e != SessionError::ConnectionClosed {
                self.notify(session, e.code(), e.to_string()).await;
            }
        }
        result
    }

    /// 解釈できなかったフレームを拒否する
    pub async fn reject_malformed(&self, session: &Session, reason: &str) {
        tracing::debug!(
            "Malformed frame from connection '{}': {}",
            session.connection_id,
            reason
        );
        self.notify(session, ErrorCode::MalformedEvent, reason.to_string())
            .await;
    }

    /// 接続の終了処理。参加中のルームがあれば退出する
    pub async fn disconnect(&self, session: Session) {
        if let SessionState::Joined(binding) = &session.state {
            self.leave_room
                .execute(&session.connection_id, &binding.room)
                .await;
        }
        self.message_pusher
            .unregister_client(&session.connection_id)
            .await;
        tracing::info!("Connection '{}' closed", session.connection_id);
    }

    async fn notify(&self, session: &Session, code: ErrorCode, message: String) {
        push(
            self.message_pusher.as_ref(),
            &session.connection_id,
            ServerEvent::Error { code, message },
        )
        .await;
    }

    async fn dispatch(
        &self,
        session: &mut Session,
        command: ClientCommand,
    ) -> Result<(), SessionError> {
        let connection_id = session.connection_id;
        if !self.message_pusher.is_registered(&connection_id).await {
            return Err(SessionError::ConnectionClosed);
        }

        match command {
            ClientCommand::Join {
                username,
                room,
                email,
            } => {
                if let SessionState::Joined(previous) = &session.state {
                    if previous.room != room {
                        self.leave_room.execute(&connection_id, &previous.room).await;
                    }
                }
                let binding = self
                    .join_room
                    .execute(connection_id, username, room, email)
                    .await;
                session.state = SessionState::Joined(binding);
            }
            ClientCommand::Send { text } => {
                let room = joined_room(session)?;
                self.send_message.execute(&connection_id, room, text).await?;
            }
            ClientCommand::React { message_id, emoji } => {
                let room = joined_room(session)?;
                self.toggle_reaction
                    .execute(&connection_id, room, message_id, emoji)
                    .await?;
            }
            ClientCommand::Edit { message_id, text } => {
                let room = joined_room(session)?;
                self.edit_message
                    .execute(&connection_id, room, message_id, text)
                    .await?;
            }
            ClientCommand::Delete { message_id } => {
                let room = joined_room(session)?;
                self.delete_message
                    .execute(&connection_id, room, message_id)
                    .await?;
            }
            ClientCommand::Kick { target } => {
                let room = joined_room(session)?;
                self.kick_member
                    .execute(&connection_id, room, target)
                    .await?;
            }
            ClientCommand::Typing => {
                self.typing
                    .execute(&connection_id, joined_room(session)?, true)
                    .await?;
            }
            ClientCommand::StopTyping => {
                self.typing
                    .execute(&connection_id, joined_room(session)?, false)
                    .await?;
            }
        }
        Ok(())
    }
}

fn joined_room(session: &Session) -> Result<&RoomName, SessionError> {
    session.room().ok_or(SessionError::NotJoined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageText;
    use crate::usecase::test_support::{TestContext, drain, name, room, text, types};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn coordinator(ctx: &TestContext, notify_rejections: bool) -> SessionCoordinator {
        SessionCoordinator::new(
            ctx.repository.clone(),
            ctx.archive.clone(),
            ctx.pusher.clone(),
            ctx.clock.clone(),
            notify_rejections,
        )
    }

    async fn open(
        coordinator: &SessionCoordinator,
    ) -> (Session, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (coordinator.connect(tx).await, rx)
    }

    fn join(username: &str, room_name: &str) -> ClientCommand {
        ClientCommand::Join {
            username: name(username),
            room: room(room_name),
            email: None,
        }
    }

    fn send(body: &str) -> ClientCommand {
        ClientCommand::Send { text: text(body) }
    }

    #[tokio::test]
    async fn test_join_binds_session() {
        // テスト項目: join でセッションが Joined になる
        // given (前提条件):
        let ctx = TestContext::new();
        let coordinator = coordinator(&ctx, false);
        let (mut session, _rx) = open(&coordinator).await;
        assert_eq!(session.state(), &SessionState::Unbound);

        // when (操作):
        coordinator
            .handle(&mut session, join("alice", "general"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            session.state(),
            &SessionState::Joined(Binding::new(room("general"), name("alice")))
        );
    }

    #[tokio::test]
    async fn test_send_before_join_is_silently_rejected() {
        // テスト項目: join 前の send は拒否され、既定では何も通知されない
        // given (前提条件):
        let ctx = TestContext::new();
        let coordinator = coordinator(&ctx, false);
        let (mut session, mut rx) = open(&coordinator).await;

        // when (操作):
        let result = coordinator.handle(&mut session, send("hi")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::NotJoined));
        assert!(drain(&mut rx).is_empty());
        assert_eq!(session.state(), &SessionState::Unbound);
    }

    #[tokio::test]
    async fn test_rejection_is_reported_when_enabled() {
        // テスト項目: notify_rejections が有効なら要求者にだけ error が届く
        // given (前提条件):
        let ctx = TestContext::new();
        let coordinator = coordinator(&ctx, true);
        let (mut alice, mut alice_rx) = open(&coordinator).await;
        let (mut bob, mut bob_rx) = open(&coordinator).await;
        coordinator.handle(&mut alice, join("alice", "general")).await.unwrap();
        coordinator.handle(&mut bob, join("bob", "general")).await.unwrap();
        TestContext::settle(&mut [&mut alice_rx, &mut bob_rx]);

        // when (操作):
        let result = coordinator
            .handle(&mut bob, ClientCommand::Kick { target: name("alice") })
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::NotAdmin("kick")));
        let frames = drain(&mut bob_rx);
        assert_eq!(types(&frames), vec!["error"]);
        assert_eq!(frames[0]["code"], "forbidden");
        assert!(drain(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_malformed_frame_is_reported() {
        // テスト項目: 不正なフレームには malformedEvent が返る
        let ctx = TestContext::new();
        let coordinator = coordinator(&ctx, false);
        let (session, mut rx) = open(&coordinator).await;

        coordinator.reject_malformed(&session, "expected value").await;

        assert_eq!(
            drain(&mut rx),
            vec![json!({"type": "error", "code": "malformedEvent", "message": "expected value"})]
        );
    }

    #[tokio::test]
    async fn test_join_other_room_leaves_previous() {
        // テスト項目: 別のルームへの join は前のルームからの退出を伴う
        // given (前提条件):
        let ctx = TestContext::new();
        let coordinator = coordinator(&ctx, false);
        let (mut alice, _alice_rx) = open(&coordinator).await;
        let (mut bob, mut bob_rx) = open(&coordinator).await;
        coordinator.handle(&mut alice, join("alice", "general")).await.unwrap();
        coordinator.handle(&mut bob, join("bob", "general")).await.unwrap();
        drain(&mut bob_rx);

        // when (操作):
        coordinator.handle(&mut alice, join("alice", "random")).await.unwrap();

        // then (期待する結果):
        let frames = drain(&mut bob_rx);
        assert_eq!(frames[0]["text"], "alice left general");
        assert_eq!(
            frames[1],
            json!({"type": "membershipUpdate", "members": ["bob"], "admin": "bob"})
        );
        assert_eq!(alice.room(), Some(&room("random")));
        let random = ctx.repository.find_room(&room("random")).await.unwrap();
        assert_eq!(random.lock().await.admin(), Some(&alice.connection_id()));
    }

    #[tokio::test]
    async fn test_rejoin_same_room_updates_name_in_place() {
        // テスト項目: 同じルームへの再 join は表示名を更新し、参加順と管理者を保つ
        // given (前提条件):
        let ctx = TestContext::new();
        let coordinator = coordinator(&ctx, false);
        let (mut alice, _alice_rx) = open(&coordinator).await;
        let (mut bob, mut bob_rx) = open(&coordinator).await;
        coordinator.handle(&mut alice, join("alice", "general")).await.unwrap();
        coordinator.handle(&mut bob, join("bob", "general")).await.unwrap();
        drain(&mut bob_rx);

        // when (操作):
        coordinator.handle(&mut alice, join("alicia", "general")).await.unwrap();

        // then (期待する結果):
        let frames = drain(&mut bob_rx);
        assert_eq!(types(&frames), vec!["systemNotice", "membershipUpdate"]);
        assert_eq!(
            frames[1],
            json!({"type": "membershipUpdate", "members": ["alicia", "bob"], "admin": "alicia"})
        );
    }

    #[tokio::test]
    async fn test_kicked_connection_is_ignored() {
        // テスト項目: キックされた接続からの要求は処理されない
        // given (前提条件):
        let ctx = TestContext::new();
        let coordinator = coordinator(&ctx, true);
        let (mut alice, mut alice_rx) = open(&coordinator).await;
        let (mut bob, _bob_rx) = open(&coordinator).await;
        coordinator.handle(&mut alice, join("alice", "general")).await.unwrap();
        coordinator.handle(&mut bob, join("bob", "general")).await.unwrap();
        coordinator
            .handle(&mut alice, ClientCommand::Kick { target: name("bob") })
            .await
            .unwrap();
        drain(&mut alice_rx);

        // when (操作):
        let result = coordinator.handle(&mut bob, send("still here?")).await;
        let rejoin = coordinator.handle(&mut bob, join("bob", "general")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::ConnectionClosed));
        assert_eq!(rejoin, Err(SessionError::ConnectionClosed));
        assert!(drain(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_hands_over_admin() {
        // テスト項目: 管理者の切断で残りの参加者が管理者になる
        // given (前提条件):
        let ctx = TestContext::new();
        let coordinator = coordinator(&ctx, false);
        let (mut alice, _alice_rx) = open(&coordinator).await;
        let (mut bob, mut bob_rx) = open(&coordinator).await;
        coordinator.handle(&mut alice, join("alice", "general")).await.unwrap();
        coordinator.handle(&mut bob, join("bob", "general")).await.unwrap();
        drain(&mut bob_rx);
        let alice_id = alice.connection_id();

        // when (操作):
        coordinator.disconnect(alice).await;

        // then (期待する結果):
        let frames = drain(&mut bob_rx);
        assert_eq!(
            frames[1],
            json!({"type": "membershipUpdate", "members": ["bob"], "admin": "bob"})
        );
        assert!(!ctx.pusher.is_registered(&alice_id).await);
    }

    #[tokio::test]
    async fn test_message_lifecycle_through_coordinator() {
        // テスト項目: send → react → edit → delete が順番通りに全員へ届く
        // given (前提条件):
        let ctx = TestContext::new();
        let coordinator = coordinator(&ctx, false);
        let (mut alice, mut alice_rx) = open(&coordinator).await;
        let (mut bob, mut bob_rx) = open(&coordinator).await;
        coordinator.handle(&mut alice, join("alice", "general")).await.unwrap();
        coordinator.handle(&mut bob, join("bob", "general")).await.unwrap();
        TestContext::settle(&mut [&mut alice_rx, &mut bob_rx]);

        // when (操作):
        coordinator.handle(&mut alice, send("hi")).await.unwrap();
        let id = drain(&mut bob_rx)[0]["id"].as_str().unwrap().to_string();
        let message_id = crate::usecase::test_support::message_id(&id);
        coordinator
            .handle(
                &mut bob,
                ClientCommand::React {
                    message_id: message_id.clone(),
                    emoji: crate::domain::Emoji::new("🎉".to_string()).unwrap(),
                },
            )
            .await
            .unwrap();
        coordinator
            .handle(
                &mut alice,
                ClientCommand::Edit {
                    message_id: message_id.clone(),
                    text: MessageText::new("hi all".to_string()).unwrap(),
                },
            )
            .await
            .unwrap();
        coordinator
            .handle(&mut alice, ClientCommand::Delete { message_id })
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            types(&drain(&mut alice_rx)),
            vec!["newMessage", "reactionUpdate", "messageEdited", "messageDeleted"]
        );
        assert_eq!(
            types(&drain(&mut bob_rx)),
            vec!["reactionUpdate", "messageEdited", "messageDeleted"]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mutations_reach_everyone_in_acceptance_order() {
        // テスト項目: 複数の接続が同じルームへ同時に send / react しても、全員が同じ順序でイベントを受け取り、その順序が履歴と一致する
        // given (前提条件):
        const SENDERS: usize = 4;
        const ROUNDS: usize = 20;
        let emojis = ["👍", "🎉", "😂", "🔥"];
        let ctx = TestContext::new();
        let coordinator = Arc::new(coordinator(&ctx, false));
        let mut sessions = Vec::new();
        let mut receivers = Vec::new();
        for i in 0..SENDERS {
            let (mut session, rx) = open(&coordinator).await;
            coordinator
                .handle(&mut session, join(&format!("user{i}"), "general"))
                .await
                .unwrap();
            sessions.push(session);
            receivers.push(rx);
        }
        coordinator.handle(&mut sessions[0], send("seed")).await.unwrap();
        let seed = drain(&mut receivers[0])
            .into_iter()
            .rev()
            .find(|f| f["type"] == "newMessage")
            .and_then(|f| f["id"].as_str().map(str::to_string))
            .unwrap();
        let seed = crate::usecase::test_support::message_id(&seed);
        for rx in receivers.iter_mut() {
            drain(rx);
        }

        // when (操作):
        let tasks: Vec<_> = sessions
            .into_iter()
            .enumerate()
            .map(|(i, mut session)| {
                let coordinator = coordinator.clone();
                let seed = seed.clone();
                let emoji = crate::domain::Emoji::new(emojis[i].to_string()).unwrap();
                tokio::spawn(async move {
                    for j in 0..ROUNDS {
                        coordinator
                            .handle(&mut session, send(&format!("user{i}-{j}")))
                            .await
                            .unwrap();
                        coordinator
                            .handle(
                                &mut session,
                                ClientCommand::React {
                                    message_id: seed.clone(),
                                    emoji: emoji.clone(),
                                },
                            )
                            .await
                            .unwrap();
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        // then (期待する結果):
        let streams: Vec<Vec<serde_json::Value>> = receivers.iter_mut().map(drain).collect();
        assert_eq!(streams[0].len(), SENDERS * ROUNDS * 2);
        for stream in &streams[1..] {
            assert_eq!(stream, &streams[0]);
        }

        let broadcast_ids: Vec<String> = streams[0]
            .iter()
            .filter(|f| f["type"] == "newMessage")
            .map(|f| f["id"].as_str().unwrap().to_string())
            .collect();
        let handle = ctx.repository.find_room(&room("general")).await.unwrap();
        let room = handle.lock().await;
        let history_ids: Vec<String> = room
            .messages()
            .iter()
            .skip(1)
            .map(|m| m.id.as_str().to_string())
            .collect();
        assert_eq!(broadcast_ids, history_ids);

        let last_reactions = streams[0]
            .iter()
            .rev()
            .find(|f| f["type"] == "reactionUpdate")
            .map(|f| f["reactions"].clone())
            .unwrap();
        assert_eq!(last_reactions, json!({}));
        assert!(room.messages().iter().next().unwrap().reactions.is_empty());
    }
}
