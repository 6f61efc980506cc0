//! X10 mouse reporting (`ESC [ ? 1000 h`) decoded into click events.

use crate::error::BarError;
use crate::utils::{debug_with_context, warn_with_context};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClickKind {
    MouseLeft,
    MouseMiddle,
    MouseRight,
    MouseUp,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    #[serde(rename = "type")]
    pub kind: ClickKind,
    /// 0-based terminal column.
    pub column: i64,
}

impl ClickEvent {
    pub fn new(kind: ClickKind, column: i64) -> Self {
        Self { kind, column }
    }
}

/// One chunk read from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Click(ClickEvent),
    /// Ctrl-C while the terminal is in raw mode.
    Interrupt,
}

const CTRL_C: u8 = 0x03;
const SEQUENCE_LEN: usize = 6;

/// Button byte -> event kind. Ctrl (0x10) and Alt (0x08) modified presses
/// map to the same kinds as plain ones.
pub fn click_kind(button: u8) -> Option<ClickKind> {
    match button {
        0x20 | 0x30 | 0x28 => Some(ClickKind::MouseLeft),
        0x21 | 0x31 | 0x29 => Some(ClickKind::MouseMiddle),
        0x22 | 0x32 | 0x2a => Some(ClickKind::MouseRight),
        0x23 | 0x33 | 0x2b => Some(ClickKind::MouseUp),
        0x60 => Some(ClickKind::ScrollUp),
        0x61 => Some(ClickKind::ScrollDown),
        _ => None,
    }
}

/// Decode `ESC [ M <button> <x> <y>`; the column byte is 1-based plus 0x20.
pub fn decode(chunk: &[u8]) -> Result<Decoded, BarError> {
    if chunk == [CTRL_C] {
        return Ok(Decoded::Interrupt);
    }
    if chunk.len() < SEQUENCE_LEN || chunk[0] != 0x1b || chunk[1] != b'[' || chunk[2] != b'M' {
        return Err(BarError::UnknownInput(hex_dump(chunk)));
    }
    let kind = click_kind(chunk[3]).ok_or_else(|| {
        BarError::UnknownInput(format!("button ${:x} #{} ({})", chunk[3], chunk[3], hex_dump(chunk)))
    })?;
    let column = chunk[4] as i64 - 0x21;
    Ok(Decoded::Click(ClickEvent::new(kind, column)))
}

/// Decode every sequence in one read. Terminals may deliver several reports
/// (press and release) in a single chunk; each full `ESC [ M` report is taken
/// in turn and whatever remains is decoded as one piece.
pub fn decode_all(chunk: &[u8]) -> Vec<Result<Decoded, BarError>> {
    let mut decoded = Vec::new();
    let mut rest = chunk;
    while !rest.is_empty() {
        if rest.len() >= SEQUENCE_LEN && rest.starts_with(b"\x1b[M") {
            decoded.push(decode(&rest[..SEQUENCE_LEN]));
            rest = &rest[SEQUENCE_LEN..];
        } else {
            decoded.push(decode(rest));
            break;
        }
    }
    decoded
}

pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read `reader` until EOF or Ctrl-C, forwarding decoded clicks. Undecodable
/// chunks are logged and dropped.
pub async fn read_events<R>(mut reader: R, events: mpsc::Sender<ClickEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 64];
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn_with_context("input", &format!("read failed: {}", e));
                break;
            }
        };
        for decoded in decode_all(&buf[..n]) {
            match decoded {
                Ok(Decoded::Click(event)) => {
                    if let Ok(json) = serde_json::to_string(&event) {
                        debug_with_context("input", &json);
                    }
                    if events.send(event).await.is_err() {
                        return;
                    }
                }
                Ok(Decoded::Interrupt) => return,
                Err(e) => warn_with_context("input", &e.to_string()),
            }
        }
    }
}
