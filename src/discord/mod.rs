//! Presence-publishing transport.
//!
//! [`Transport`] is the narrow interface the presence loop publishes
//! through; [`ipc::DiscordIpc`] implements it over the Discord client's
//! local IPC socket.

use crate::{Res, types::Activity};

pub mod ipc;

/// Connect/publish/close lifecycle of a rich-presence transport.
///
/// Any error from `set_activity`/`clear_activity` means the connection is
/// unusable; the supervisor closes and reconnects. Implementations do not
/// reconnect on their own.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn connect(&mut self) -> Res<()>;
    async fn set_activity(&mut self, activity: &Activity) -> Res<()>;
    async fn clear_activity(&mut self) -> Res<()>;
    async fn close(&mut self);
}
