use std::{env, path::PathBuf, process};

use serde_json::{Value, json};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
};

use crate::{Res, types::Activity};

use super::Transport;

const OP_HANDSHAKE: u32 = 0;
const OP_FRAME: u32 = 1;
const OP_CLOSE: u32 = 2;

/// Rich-presence client over the Discord desktop app's unix IPC socket.
///
/// Frames are `(opcode: u32 le, length: u32 le, payload: json)`. The
/// handshake (op 0) carries the protocol version and the application's
/// client id; everything afterwards is op 1 command frames. Clearing the
/// presence is a `SET_ACTIVITY` with a null activity.
pub struct DiscordIpc {
    client_id: String,
    stream: Option<UnixStream>,
    nonce: u64,
}

impl DiscordIpc {
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            stream: None,
            nonce: 0,
        }
    }

    /// Candidate socket paths, in discovery order. The desktop client
    /// binds `discord-ipc-{0..9}` under the first writable temp root.
    fn socket_paths() -> Vec<PathBuf> {
        let mut roots = Vec::new();
        for var in ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"] {
            if let Ok(dir) = env::var(var) {
                roots.push(PathBuf::from(dir));
            }
        }
        roots.push(PathBuf::from("/tmp"));

        let mut paths = Vec::new();
        for root in roots {
            for i in 0..10 {
                paths.push(root.join(format!("discord-ipc-{}", i)));
            }
        }
        paths
    }

    async fn send(&mut self, opcode: u32, payload: &Value) -> Res<()> {
        let stream = self.stream.as_mut().ok_or("Transport is not connected")?;
        let body = serde_json::to_vec(payload)?;
        let mut frame = Vec::with_capacity(8 + body.len());
        frame.extend_from_slice(&opcode.to_le_bytes());
        frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
        frame.extend_from_slice(&body);
        stream.write_all(&frame).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Res<(u32, Value)> {
        let stream = self.stream.as_mut().ok_or("Transport is not connected")?;
        let mut header = [0u8; 8];
        stream.read_exact(&mut header).await?;
        let opcode = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let length = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        let mut body = vec![0u8; length as usize];
        stream.read_exact(&mut body).await?;
        let payload: Value = serde_json::from_slice(&body)?;
        Ok((opcode, payload))
    }

    /// Sends one command frame and validates the client's reply.
    async fn command(&mut self, cmd: &str, args: Value) -> Res<()> {
        self.nonce += 1;
        let payload = json!({
            "cmd": cmd,
            "args": args,
            "nonce": self.nonce.to_string(),
        });
        self.send(OP_FRAME, &payload).await?;

        let (opcode, reply) = self.recv().await?;
        if opcode == OP_CLOSE {
            return Err("Discord closed the IPC connection".into());
        }
        if reply.get("evt").and_then(Value::as_str) == Some("ERROR") {
            let message = reply["data"]["message"].as_str().unwrap_or("unknown error");
            return Err(format!("Discord rejected {}: {}", cmd, message).into());
        }
        Ok(())
    }
}

impl Transport for DiscordIpc {
    async fn connect(&mut self) -> Res<()> {
        let mut stream = None;
        for path in Self::socket_paths() {
            if let Ok(s) = UnixStream::connect(&path).await {
                stream = Some(s);
                break;
            }
        }
        self.stream = Some(stream.ok_or("No Discord IPC socket found")?);

        let handshake = json!({ "v": 1, "client_id": self.client_id });
        self.send(OP_HANDSHAKE, &handshake).await?;

        let (opcode, reply) = self.recv().await?;
        if opcode == OP_CLOSE {
            let message = reply["message"].as_str().unwrap_or("handshake rejected");
            self.stream = None;
            return Err(format!("Discord refused the handshake: {}", message).into());
        }
        Ok(())
    }

    async fn set_activity(&mut self, activity: &Activity) -> Res<()> {
        let args = json!({
            "pid": process::id(),
            "activity": activity,
        });
        self.command("SET_ACTIVITY", args).await
    }

    async fn clear_activity(&mut self) -> Res<()> {
        let args = json!({
            "pid": process::id(),
            "activity": Value::Null,
        });
        self.command("SET_ACTIVITY", args).await
    }

    async fn close(&mut self) {
        if self.stream.is_some() {
            // Best effort; the peer may already be gone.
            let _ = self.send(OP_CLOSE, &json!({})).await;
        }
        self.stream = None;
    }
}
