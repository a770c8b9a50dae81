//! Test doubles for burger-client integration tests: a recording [`PlatformApi`], a recording
//! [`Responder`], handler fixtures and a tracing writer that captures log output.

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use burger_core::{
    BurgerError, Channel, ChannelKind, CommandArgs, CommandContext, CommandHandler, ErrorContext,
    ErrorHandler, Guild, Invocation, LiveCommand, Member, Permissions, PlatformApi, Responder,
    Result, User,
};
use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

pub const HOME_GUILD: u64 = 1000;

/// One recorded REST call.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    SetGuildCommands { guild_id: u64, names: Vec<String> },
    SetGlobalCommands { names: Vec<String> },
    FetchGuildCommands(u64),
    FetchGlobalCommands,
    SetDefaultPermissions {
        guild_id: Option<u64>,
        command_id: u64,
        permissions: Option<Permissions>,
    },
    SetDmPermission {
        guild_id: Option<u64>,
        command_id: u64,
        allowed: bool,
    },
}

impl PlatformCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            PlatformCall::FetchGuildCommands(_) | PlatformCall::FetchGlobalCommands
        )
    }
}

/// In-memory platform. Set calls replace the live lists the way Discord's bulk overwrite does.
#[derive(Default)]
pub struct MockPlatform {
    pub calls: Mutex<Vec<PlatformCall>>,
    pub guild_live: Mutex<Vec<LiveCommand>>,
    pub global_live: Mutex<Vec<LiveCommand>>,
    pub fail_guild_set: AtomicBool,
    pub fail_guild_fetch: AtomicBool,
    next_id: AtomicU64,
}

impl MockPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|c| c.is_mutation()).count()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls().iter().filter(|c| !c.is_mutation()).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_guild_live(&self, live: Vec<LiveCommand>) {
        *self.guild_live.lock().unwrap() = live;
    }

    pub fn set_global_live(&self, live: Vec<LiveCommand>) {
        *self.global_live.lock().unwrap() = live;
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn to_live(&self, value: &Value, track_dm: bool) -> LiveCommand {
        LiveCommand {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: value["name"].as_str().unwrap_or_default().to_string(),
            default_member_permissions: value["default_member_permissions"]
                .as_str()
                .and_then(|s| s.parse().ok())
                .map(Permissions::from_bits),
            dm_permission: if track_dm {
                Some(value["dm_permission"].as_bool().unwrap_or(true))
            } else {
                None
            },
        }
    }

    fn live_for(&self, guild_id: Option<u64>) -> &Mutex<Vec<LiveCommand>> {
        match guild_id {
            Some(_) => &self.guild_live,
            None => &self.global_live,
        }
    }
}

fn names(commands: &[Value]) -> Vec<String> {
    commands
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[async_trait]
impl PlatformApi for MockPlatform {
    async fn set_guild_commands(&self, guild_id: u64, commands: &[Value]) -> Result<usize> {
        self.record(PlatformCall::SetGuildCommands {
            guild_id,
            names: names(commands),
        });
        if self.fail_guild_set.load(Ordering::SeqCst) {
            return Err(BurgerError::Platform("Missing Access".to_string()));
        }
        let live = commands.iter().map(|c| self.to_live(c, false)).collect();
        self.set_guild_live(live);
        Ok(commands.len())
    }

    async fn set_global_commands(&self, commands: &[Value]) -> Result<usize> {
        self.record(PlatformCall::SetGlobalCommands {
            names: names(commands),
        });
        let live = commands.iter().map(|c| self.to_live(c, true)).collect();
        self.set_global_live(live);
        Ok(commands.len())
    }

    async fn fetch_guild_commands(&self, guild_id: u64) -> Result<Vec<LiveCommand>> {
        self.record(PlatformCall::FetchGuildCommands(guild_id));
        if self.fail_guild_fetch.load(Ordering::SeqCst) {
            return Err(BurgerError::Platform("Unknown Guild".to_string()));
        }
        Ok(self.guild_live.lock().unwrap().clone())
    }

    async fn fetch_global_commands(&self) -> Result<Vec<LiveCommand>> {
        self.record(PlatformCall::FetchGlobalCommands);
        Ok(self.global_live.lock().unwrap().clone())
    }

    async fn set_default_member_permissions(
        &self,
        guild_id: Option<u64>,
        command_id: u64,
        permissions: Option<Permissions>,
    ) -> Result<()> {
        self.record(PlatformCall::SetDefaultPermissions {
            guild_id,
            command_id,
            permissions,
        });
        let mut live = self.live_for(guild_id).lock().unwrap();
        if let Some(cmd) = live.iter_mut().find(|c| c.id == command_id) {
            cmd.default_member_permissions = permissions;
        }
        Ok(())
    }

    async fn set_dm_permission(
        &self,
        guild_id: Option<u64>,
        command_id: u64,
        allowed: bool,
    ) -> Result<()> {
        self.record(PlatformCall::SetDmPermission {
            guild_id,
            command_id,
            allowed,
        });
        let mut live = self.live_for(guild_id).lock().unwrap();
        if let Some(cmd) = live.iter_mut().find(|c| c.id == command_id) {
            cmd.dm_permission = Some(allowed);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Reply(String),
    Defer,
    Edit(String),
}

/// Records every response; tracks replied/deferred like a real interaction.
#[derive(Default)]
pub struct MockResponder {
    pub responses: Mutex<Vec<Response>>,
    replied: AtomicBool,
    deferred: AtomicBool,
}

impl MockResponder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn responses(&self) -> Vec<Response> {
        self.responses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn reply(&self, content: &str) -> Result<()> {
        self.responses
            .lock()
            .unwrap()
            .push(Response::Reply(content.to_string()));
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn defer(&self) -> Result<()> {
        self.responses.lock().unwrap().push(Response::Defer);
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn edit_reply(&self, content: &str) -> Result<()> {
        self.responses
            .lock()
            .unwrap()
            .push(Response::Edit(content.to_string()));
        Ok(())
    }

    fn replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    fn deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }
}

/// Replies with a fixed text and counts invocations.
pub struct ReplyHandler {
    pub text: String,
    pub calls: Arc<AtomicUsize>,
}

impl ReplyHandler {
    pub fn new(text: &str) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Arc::new(Self {
                text: text.to_string(),
                calls: calls.clone(),
            }),
            calls,
        )
    }
}

#[async_trait]
impl CommandHandler for ReplyHandler {
    async fn execute(&self, ctx: CommandContext) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ctx.reply(&self.text).await?;
        Ok(())
    }
}

/// What a handler saw in its [`CommandContext`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeenContext {
    pub invocation_id: u64,
    pub channel: Channel,
    pub args: CommandArgs,
    pub subcommand: Option<String>,
    pub guild: Option<Guild>,
    pub user: User,
    pub member: Option<Member>,
}

/// Records the context it was called with.
#[derive(Default)]
pub struct ContextRecorder {
    pub seen: Mutex<Option<SeenContext>>,
}

impl ContextRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen(&self) -> Option<SeenContext> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandHandler for ContextRecorder {
    async fn execute(&self, ctx: CommandContext) -> anyhow::Result<()> {
        *self.seen.lock().unwrap() = Some(SeenContext {
            invocation_id: ctx.invocation.id,
            channel: ctx.channel.clone(),
            args: ctx.args.clone(),
            subcommand: ctx.subcommand.clone(),
            guild: ctx.guild.clone(),
            user: ctx.user.clone(),
            member: ctx.member.clone(),
        });
        ctx.reply("recorded").await?;
        Ok(())
    }
}

/// Fails with `message`, optionally deferring first.
pub struct FailingHandler {
    pub message: String,
    pub defer_first: bool,
}

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn execute(&self, ctx: CommandContext) -> anyhow::Result<()> {
        if self.defer_first {
            ctx.responder.defer().await?;
        }
        anyhow::bail!("{}", self.message)
    }
}

/// Error handler that optionally answers the user itself.
pub struct RecordingErrorHandler {
    pub replies: bool,
    pub seen: Mutex<Vec<String>>,
}

#[async_trait]
impl ErrorHandler for RecordingErrorHandler {
    async fn on_error(&self, ctx: ErrorContext<'_>) -> bool {
        self.seen.lock().unwrap().push(ctx.error.to_string());
        if self.replies {
            let _ = ctx.responder.reply("Custom failure message").await;
        }
        self.replies
    }
}

pub fn user(id: u64) -> User {
    User {
        id,
        name: format!("user{}", id),
        global_name: None,
        bot: false,
    }
}

/// Invocation from a guild text channel by a member holding `permissions`.
pub fn guild_invocation(command: &str, permissions: Permissions) -> Invocation {
    Invocation {
        id: 1,
        command_name: command.to_string(),
        channel: Some(Channel {
            id: 10,
            kind: ChannelKind::GuildText,
        }),
        user: user(7),
        guild: Some(Guild {
            id: HOME_GUILD,
            name: Some("home".to_string()),
        }),
        member: Some(Member {
            guild_id: HOME_GUILD,
            user: user(7),
            nick: None,
            permissions,
        }),
        subcommand: None,
        args: CommandArgs::default(),
    }
}

/// Invocation from a direct message (no guild, no member).
pub fn dm_invocation(command: &str) -> Invocation {
    Invocation {
        id: 2,
        command_name: command.to_string(),
        channel: Some(Channel {
            id: 20,
            kind: ChannelKind::DirectMessage,
        }),
        user: user(7),
        guild: None,
        member: None,
        subcommand: None,
        args: CommandArgs::default(),
    }
}

/// Shared buffer that a tracing fmt subscriber writes into.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes this thread's tracing output into a [`LogCapture`] until the guard drops.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
