//! Integration test common infrastructure.
//!
//! A scripted in-memory transport plus a small harness that owns an
//! engine and a manual clock.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use nanobot::config::Config;
use nanobot::engine::{Engine, TickOutcome};
use nanobot::error::TransportError;
use nanobot::transport::Transport;

/// Transport fed from a script. Outbound bytes are captured.
#[derive(Default)]
pub struct ScriptedTransport {
    pub connected: bool,
    inbound: VecDeque<Vec<u8>>,
    outbound: Vec<u8>,
    /// Bytes still accepted before `send` reports a busy link; unlimited
    /// when `None`.
    pub send_budget: Option<usize>,
}

impl ScriptedTransport {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    /// Queue one server line; the terminator is added.
    pub fn push_line(&mut self, line: &str) {
        self.inbound.push_back(format!("{line}\r\n").into_bytes());
    }

    /// Queue raw bytes as one read.
    pub fn push_raw(&mut self, bytes: &[u8]) {
        self.inbound.push_back(bytes.to_vec());
    }

    /// Lines written since the last call, terminators removed.
    pub fn take_sent(&mut self) -> Vec<String> {
        let text = String::from_utf8(std::mem::take(&mut self.outbound)).expect("utf-8 output");
        let mut lines: Vec<String> = text.split("\r\n").map(str::to_string).collect();
        let tail = lines.pop().unwrap_or_default();
        assert!(tail.is_empty(), "partial line in output: {tail:?}");
        lines
    }
}

impl Transport for ScriptedTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        if !self.connected {
            return Err(TransportError::Closed);
        }
        let Some(mut chunk) = self.inbound.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.inbound.push_front(chunk.split_off(n));
        }
        Ok(n)
    }

    fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        if !self.connected {
            return Err(TransportError::Closed);
        }
        let n = match &mut self.send_budget {
            Some(budget) => {
                let n = (*budget).min(bytes.len());
                *budget -= n;
                n
            }
            None => bytes.len(),
        };
        self.outbound.extend_from_slice(&bytes[..n]);
        Ok(n)
    }
}

/// Engine plus transport plus a clock that only moves when told to.
pub struct TestBot {
    pub engine: Engine,
    pub transport: ScriptedTransport,
    pub now: Instant,
}

pub const SERVER: &str = ":irc.test";
pub const ALICE: &str = ":alice!al@example.net";

pub fn config(extra: &str) -> Config {
    let toml = format!(
        "[server]\nhost = \"irc.test\"\n\n[client]\nchannels = \"#a,#b\"\n\n{extra}"
    );
    Config::load_str(&toml).expect("test config is valid")
}

impl TestBot {
    pub fn new(config: &Config) -> Self {
        let now = Instant::now();
        Self {
            engine: Engine::new(config, now),
            transport: ScriptedTransport::connected(),
            now,
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.engine.tick(self.now, &mut self.transport)
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Feed lines, tick once and return what was written.
    pub fn exchange(&mut self, lines: &[&str]) -> Vec<String> {
        for line in lines {
            self.transport.push_line(line);
        }
        let outcome = self.tick();
        assert!(
            matches!(outcome, TickOutcome::Continue),
            "unexpected outcome {outcome:?}"
        );
        self.transport.take_sent()
    }

    /// Connect, register and join `#a` and `#b`.
    pub fn registered(config: &Config) -> Self {
        let mut bot = Self::new(config);
        let sent = bot.exchange(&[]);
        assert_eq!(sent, ["NICK nanobot", "USER nanobot 8 * :Nano Bot"]);
        let sent = bot.exchange(&[
            ":irc.test 001 nanobot :Welcome",
            ":nanobot!nano@host JOIN #a",
            ":nanobot!nano@host JOIN #b",
        ]);
        assert_eq!(sent, ["JOIN #a", "JOIN #b"]);
        bot
    }

    /// Say `text` from alice in `target`.
    pub fn alice_says(&mut self, target: &str, text: &str) -> Vec<String> {
        let line = format!("{ALICE} PRIVMSG {target} :{text}");
        self.exchange(&[line.as_str()])
    }
}
