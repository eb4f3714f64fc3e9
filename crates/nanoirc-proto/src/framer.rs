//! Fixed-capacity line framer.
//!
//! Accumulates raw transport bytes into CRLF (or bare LF) terminated lines
//! inside a buffer whose size is fixed at build time. Lines longer than the
//! buffer are dropped and the framer resynchronizes on the next terminator,
//! so memory use is bounded no matter what the peer sends.
//!
//! # Example
//!
//! ```
//! use nanoirc_proto::framer::{Frame, LineFramer};
//!
//! let mut framer = LineFramer::<512>::new();
//! let mut input: &[u8] = b"PING :abc\r\nPRIVMSG #a :hi\r\n";
//! let mut lines = Vec::new();
//!
//! while !input.is_empty() {
//!     let (used, frame) = framer.push(input);
//!     input = &input[used..];
//!     if let Some(Frame::Line(_)) = frame {
//!         lines.push(framer.line().to_vec());
//!     }
//! }
//!
//! assert_eq!(lines, vec![b"PING :abc".to_vec(), b"PRIVMSG #a :hi".to_vec()]);
//! ```

use crate::error::{self, ProtocolError};

/// Default line capacity (RFC 1459 limit, terminator excluded).
pub const LINE_CAPACITY: usize = 512;

/// One framing event. Every `\n` in the input produces exactly one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
    /// A complete line of the given length is available via [`LineFramer::line`].
    Line(usize),
    /// The line exceeded the buffer capacity and was discarded.
    TooLong {
        /// Total bytes of the dropped line (terminator excluded).
        discarded: usize,
    },
}

/// Counters kept by the framer across lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FramerStats {
    /// Lines emitted.
    pub lines: u64,
    /// Lines dropped for exceeding capacity.
    pub overflows: u64,
    /// Bytes dropped while resynchronizing.
    pub discarded_bytes: u64,
}

/// Line framer over a fixed `N`-byte buffer.
///
/// The same buffer is reused for every line; no allocation happens after
/// construction. A `\r` is removed only when it directly precedes `\n`, so a
/// line of exactly `N` content bytes still fits.
#[derive(Debug)]
pub struct LineFramer<const N: usize = LINE_CAPACITY> {
    buf: [u8; N],
    len: usize,
    /// A `\r` was seen and not yet stored; it is dropped if `\n` follows.
    pending_cr: bool,
    /// Overflowed; dropping bytes until the next terminator.
    discarding: bool,
    discarded: usize,
    /// The buffer holds a completed line that must be cleared on next push.
    completed: bool,
    stats: FramerStats,
}

impl<const N: usize> Default for LineFramer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineFramer<N> {
    /// Create an empty framer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            pending_cr: false,
            discarding: false,
            discarded: 0,
            completed: false,
            stats: FramerStats {
                lines: 0,
                overflows: 0,
                discarded_bytes: 0,
            },
        }
    }

    /// Buffer capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes of the in-progress (or just completed) line.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.len
    }

    /// Framing counters.
    #[inline]
    pub fn stats(&self) -> FramerStats {
        self.stats
    }

    /// Consume input up to and including the next terminator.
    ///
    /// Returns the number of bytes consumed and the event produced, if any.
    /// After [`Frame::Line`], the line stays readable through [`line`](Self::line)
    /// until the next call to `push`.
    pub fn push(&mut self, input: &[u8]) -> (usize, Option<Frame>) {
        if self.completed {
            self.len = 0;
            self.completed = false;
        }

        for (i, &byte) in input.iter().enumerate() {
            if byte == b'\n' {
                self.pending_cr = false;
                let frame = if self.discarding {
                    let discarded = self.discarded;
                    self.discarding = false;
                    self.discarded = 0;
                    self.len = 0;
                    self.stats.overflows += 1;
                    Frame::TooLong { discarded }
                } else {
                    self.completed = true;
                    self.stats.lines += 1;
                    Frame::Line(self.len)
                };
                return (i + 1, Some(frame));
            }

            if self.pending_cr {
                self.pending_cr = false;
                self.store(b'\r');
            }

            if byte == b'\r' {
                self.pending_cr = true;
            } else {
                self.store(byte);
            }
        }

        (input.len(), None)
    }

    /// Feed a whole batch, invoking `on_line` for every framed line.
    ///
    /// Overflowed lines are reported as [`ProtocolError::LineTooLong`].
    pub fn feed<F>(&mut self, mut input: &[u8], mut on_line: F)
    where
        F: FnMut(error::Result<&[u8]>),
    {
        while !input.is_empty() {
            let (used, frame) = self.push(input);
            input = &input[used..];
            match frame {
                Some(Frame::Line(_)) => on_line(Ok(self.line())),
                Some(Frame::TooLong { discarded }) => on_line(Err(ProtocolError::LineTooLong {
                    discarded,
                    limit: N,
                })),
                None => {}
            }
        }
    }

    /// The most recently completed line, terminator excluded.
    #[inline]
    pub fn line(&self) -> &[u8] {
        if self.completed {
            &self.buf[..self.len]
        } else {
            &[]
        }
    }

    /// The most recently completed line as UTF-8.
    pub fn line_str(&self) -> error::Result<&str> {
        let line = self.line();
        std::str::from_utf8(line).map_err(|e| ProtocolError::InvalidUtf8 {
            byte_pos: e.valid_up_to(),
            command_hint: error::extract_command_hint(line),
        })
    }

    /// Drop any partial line and resynchronization state.
    pub fn reset(&mut self) {
        self.len = 0;
        self.pending_cr = false;
        self.discarding = false;
        self.discarded = 0;
        self.completed = false;
    }

    fn store(&mut self, byte: u8) {
        if self.discarding {
            self.discarded += 1;
            self.stats.discarded_bytes += 1;
            return;
        }
        if self.len == N {
            self.discarding = true;
            self.discarded = self.len + 1;
            self.stats.discarded_bytes += (self.len + 1) as u64;
            self.len = 0;
            return;
        }
        self.buf[self.len] = byte;
        self.len += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<const N: usize>(framer: &mut LineFramer<N>, input: &[u8]) -> Vec<Result<String, usize>> {
        let mut out = Vec::new();
        framer.feed(input, |res| match res {
            Ok(line) => out.push(Ok(String::from_utf8_lossy(line).into_owned())),
            Err(ProtocolError::LineTooLong { discarded, .. }) => out.push(Err(discarded)),
            Err(other) => panic!("unexpected error: {other}"),
        });
        out
    }

    #[test]
    fn test_crlf_and_bare_lf() {
        let mut framer = LineFramer::<64>::new();
        let lines = collect(&mut framer, b"PING :a\r\nPING :b\nPING :c\r\n");
        assert_eq!(
            lines,
            vec![
                Ok("PING :a".to_string()),
                Ok("PING :b".to_string()),
                Ok("PING :c".to_string())
            ]
        );
    }

    #[test]
    fn test_partial_line_across_pushes() {
        let mut framer = LineFramer::<64>::new();
        assert!(collect(&mut framer, b"PRIVMSG #a :hel").is_empty());
        assert_eq!(framer.buffered(), 15);
        let lines = collect(&mut framer, b"lo\r");
        assert!(lines.is_empty());
        let lines = collect(&mut framer, b"\n");
        assert_eq!(lines, vec![Ok("PRIVMSG #a :hello".to_string())]);
    }

    #[test]
    fn test_exact_capacity_fits() {
        let mut framer = LineFramer::<4>::new();
        let lines = collect(&mut framer, b"abcd\r\n");
        assert_eq!(lines, vec![Ok("abcd".to_string())]);
    }

    #[test]
    fn test_overflow_resyncs_on_next_terminator() {
        let mut framer = LineFramer::<4>::new();
        let lines = collect(&mut framer, b"abcdefgh\r\nok\r\n");
        assert_eq!(lines, vec![Err(8), Ok("ok".to_string())]);
        let stats = framer.stats();
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.overflows, 1);
        assert_eq!(stats.discarded_bytes, 8);
    }

    #[test]
    fn test_lone_cr_is_kept() {
        let mut framer = LineFramer::<16>::new();
        let lines = collect(&mut framer, b"a\rb\r\n");
        assert_eq!(lines, vec![Ok("a\rb".to_string())]);
    }

    #[test]
    fn test_empty_line_is_an_event() {
        let mut framer = LineFramer::<16>::new();
        let lines = collect(&mut framer, b"\r\n\n");
        assert_eq!(lines, vec![Ok(String::new()), Ok(String::new())]);
    }

    #[test]
    fn test_line_cleared_on_next_push() {
        let mut framer = LineFramer::<16>::new();
        let (used, frame) = framer.push(b"abc\nde");
        assert_eq!(used, 4);
        assert_eq!(frame, Some(Frame::Line(3)));
        assert_eq!(framer.line(), b"abc");
        let (used, frame) = framer.push(b"de");
        assert_eq!(used, 2);
        assert_eq!(frame, None);
        assert_eq!(framer.line(), b"");
        assert_eq!(framer.buffered(), 2);
    }

    #[test]
    fn test_reset_drops_partial() {
        let mut framer = LineFramer::<8>::new();
        let _ = framer.push(b"abcdefghij");
        framer.reset();
        let lines = collect(&mut framer, b"xy\n");
        assert_eq!(lines, vec![Ok("xy".to_string())]);
    }

    #[test]
    fn test_invalid_utf8_reports_hint() {
        let mut framer = LineFramer::<32>::new();
        let _ = framer.push(b"NOTICE me :\xff\n");
        match framer.line_str() {
            Err(ProtocolError::InvalidUtf8 {
                byte_pos,
                command_hint,
            }) => {
                assert_eq!(byte_pos, 11);
                assert_eq!(command_hint.as_deref(), Some("NOTICE"));
            }
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
    }
}
