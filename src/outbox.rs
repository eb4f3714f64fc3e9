//! Bounded outbound line queue.
//!
//! Lines are encoded when queued and written head-first. A line that has
//! been partly written is "in flight": it is never dropped or overtaken, so
//! the server always sees whole lines. When the queue is full the oldest
//! waiting line gives way to the new one.
//!
//! Flood control is a `governor` token bucket checked once per line before
//! its first byte goes out. Priority lines (PONG) skip it.

use std::cell::Cell;
use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use governor::clock::Clock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nanoirc_proto::Message;
use tracing::{debug, trace, warn};

use crate::config::FloodConfig;
use crate::error::{OutboxError, TransportError};
use crate::transport::Transport;

#[derive(Debug)]
struct Line {
    bytes: Vec<u8>,
    priority: bool,
}

impl Line {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes)
            .trim_end_matches(['\r', '\n'])
            .to_string()
    }
}

/// Limiter clock. Reads the time handed to the current flush, so pacing
/// follows the engine's clock rather than the wall clock.
#[derive(Debug, Clone)]
struct FlushClock(Rc<Cell<Instant>>);

impl Clock for FlushClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        self.0.get()
    }
}

type FloodLimiter = RateLimiter<NotKeyed, InMemoryState, FlushClock, NoOpMiddleware<Instant>>;

/// Queue counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutboxStats {
    /// Lines accepted into the queue.
    pub enqueued: u64,
    /// Lines fully written.
    pub sent: u64,
    /// Lines evicted by overflow.
    pub dropped: u64,
}

/// Outbound queue with a fixed line capacity.
pub struct Outbox {
    queue: VecDeque<Line>,
    capacity: usize,
    /// Bytes of the head line already written.
    written: usize,
    /// The head line has been let through flood control.
    head_admitted: bool,
    limiter: Option<FloodLimiter>,
    clock: FlushClock,
    stats: OutboxStats,
}

impl Outbox {
    pub fn new(capacity: usize, flood: Option<FloodConfig>, now: Instant) -> Self {
        let clock = FlushClock(Rc::new(Cell::new(now)));
        let limiter = flood.and_then(|flood| {
            let burst = NonZeroU32::new(flood.burst)?;
            let quota = Quota::with_period(flood.period())?.allow_burst(burst);
            Some(RateLimiter::direct_with_clock(quota, &clock))
        });

        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            written: 0,
            head_admitted: false,
            limiter,
            clock,
            stats: OutboxStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> OutboxStats {
        self.stats
    }

    /// Whether the head line is partly written.
    pub fn in_flight(&self) -> bool {
        self.written > 0
    }

    /// Queued lines without terminators, head first.
    pub fn pending(&self) -> Vec<String> {
        self.queue.iter().map(Line::text).collect()
    }

    /// Append a message to the tail.
    pub fn enqueue(&mut self, msg: &Message) -> Result<(), OutboxError> {
        let bytes = msg.encode()?.into_bytes();
        let dropped = self.make_room()?;
        self.queue.push_back(Line {
            bytes,
            priority: false,
        });
        self.accepted(dropped)
    }

    /// Put a message ahead of every ordinary waiting line, behind an
    /// in-flight line and earlier priority lines. Skips flood control.
    pub fn enqueue_priority(&mut self, msg: &Message) -> Result<(), OutboxError> {
        let bytes = msg.encode()?.into_bytes();
        let dropped = self.make_room()?;
        let at = self.priority_tail();
        self.queue.insert(
            at,
            Line {
                bytes,
                priority: true,
            },
        );
        self.accepted(dropped)
    }

    /// Write as much as the transport takes at `now`. Returns the number of
    /// lines completed.
    pub fn flush<T: Transport + ?Sized>(
        &mut self,
        now: Instant,
        transport: &mut T,
    ) -> Result<usize, TransportError> {
        if now > self.clock.0.get() {
            self.clock.0.set(now);
        }
        let mut completed = 0;

        while let Some(head) = self.queue.front() {
            if !self.head_admitted {
                if !head.priority {
                    if let Some(limiter) = &self.limiter {
                        if limiter.check().is_err() {
                            trace!("flood control holding output");
                            break;
                        }
                    }
                }
                self.head_admitted = true;
            }

            let n = transport.send(&head.bytes[self.written..])?;
            if n == 0 {
                break;
            }
            self.written += n;

            if self.written >= head.bytes.len() {
                self.queue.pop_front();
                self.written = 0;
                self.head_admitted = false;
                self.stats.sent += 1;
                completed += 1;
            }
        }

        Ok(completed)
    }

    /// Drop everything, including a partly written line.
    pub fn clear(&mut self) {
        if !self.queue.is_empty() {
            debug!(lines = self.queue.len(), "discarding outbound queue");
        }
        self.queue.clear();
        self.written = 0;
        self.head_admitted = false;
    }

    fn first_waiting(&self) -> usize {
        usize::from(self.in_flight())
    }

    /// Index just past the waiting priority lines.
    fn priority_tail(&self) -> usize {
        let start = self.first_waiting();
        start
            + self
                .queue
                .iter()
                .skip(start)
                .take_while(|line| line.priority)
                .count()
    }

    /// Evict the oldest waiting line if the queue is full.
    fn make_room(&mut self) -> Result<Option<Line>, OutboxError> {
        if self.queue.len() < self.capacity {
            return Ok(None);
        }
        let at = self.first_waiting();
        if at >= self.queue.len() {
            return Err(OutboxError::Full);
        }
        let dropped = self.queue.remove(at);
        if at == 0 {
            self.head_admitted = false;
        }
        Ok(dropped)
    }

    fn accepted(&mut self, dropped: Option<Line>) -> Result<(), OutboxError> {
        self.stats.enqueued += 1;
        match dropped {
            None => Ok(()),
            Some(line) => {
                self.stats.dropped += 1;
                let dropped = line.text();
                warn!(%dropped, "outbound queue overflow");
                Err(OutboxError::Overflow { dropped })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// Accepts at most `budget` bytes per flush.
    struct Trickle {
        budget: usize,
        wire: Vec<u8>,
    }

    impl Transport for Trickle {
        fn is_connected(&self) -> bool {
            true
        }

        fn recv(&mut self, _buf: &mut [u8]) -> Result<usize, TransportError> {
            Ok(0)
        }

        fn send(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
            let n = bytes.len().min(self.budget);
            self.budget -= n;
            self.wire.extend_from_slice(&bytes[..n]);
            Ok(n)
        }
    }

    fn wire(budget: usize) -> Trickle {
        Trickle {
            budget,
            wire: Vec::new(),
        }
    }

    fn msg(i: usize) -> Message {
        Message::privmsg("#a", format!("line {i}"))
    }

    #[test]
    fn fifo_order() {
        let mut outbox = Outbox::new(4, None, Instant::now());
        outbox.enqueue(&msg(1)).unwrap();
        outbox.enqueue(&msg(2)).unwrap();
        let mut t = wire(usize::MAX);
        assert_eq!(outbox.flush(Instant::now(), &mut t).unwrap(), 2);
        assert_eq!(t.wire, b"PRIVMSG #a :line 1\r\nPRIVMSG #a :line 2\r\n");
        assert!(outbox.is_empty());
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut outbox = Outbox::new(2, None, Instant::now());
        outbox.enqueue(&msg(1)).unwrap();
        outbox.enqueue(&msg(2)).unwrap();
        let err = outbox.enqueue(&msg(3)).unwrap_err();
        assert_eq!(
            err,
            OutboxError::Overflow {
                dropped: "PRIVMSG #a :line 1".into()
            }
        );
        assert_eq!(outbox.pending(), ["PRIVMSG #a :line 2", "PRIVMSG #a :line 3"]);
        assert_eq!(
            outbox.stats(),
            OutboxStats {
                enqueued: 3,
                sent: 0,
                dropped: 1
            }
        );
    }

    #[test]
    fn partial_write_is_never_dropped() {
        let mut outbox = Outbox::new(3, None, Instant::now());
        outbox.enqueue(&msg(1)).unwrap();
        outbox.enqueue(&msg(2)).unwrap();
        outbox.enqueue(&msg(3)).unwrap();

        let mut t = wire(5);
        assert_eq!(outbox.flush(Instant::now(), &mut t).unwrap(), 0);
        assert!(outbox.in_flight());

        // Full: line 2 is evicted, not the in-flight line 1.
        let err = outbox.enqueue(&msg(4)).unwrap_err();
        assert!(matches!(err, OutboxError::Overflow { dropped } if dropped.ends_with("line 2")));

        t.budget = usize::MAX;
        assert_eq!(outbox.flush(Instant::now(), &mut t).unwrap(), 3);
        assert_eq!(
            t.wire,
            b"PRIVMSG #a :line 1\r\nPRIVMSG #a :line 3\r\nPRIVMSG #a :line 4\r\n"
        );
    }

    #[test]
    fn priority_waits_behind_in_flight_line() {
        let mut outbox = Outbox::new(4, None, Instant::now());
        outbox.enqueue(&msg(1)).unwrap();
        outbox.enqueue(&msg(2)).unwrap();

        let mut t = wire(5);
        outbox.flush(Instant::now(), &mut t).unwrap();
        outbox.enqueue_priority(&Message::pong("tok")).unwrap();
        assert_eq!(
            outbox.pending(),
            ["PRIVMSG #a :line 1", "PONG :tok", "PRIVMSG #a :line 2"]
        );

        t.budget = usize::MAX;
        outbox.flush(Instant::now(), &mut t).unwrap();
        assert_eq!(
            t.wire,
            b"PRIVMSG #a :line 1\r\nPONG :tok\r\nPRIVMSG #a :line 2\r\n"
        );
    }

    #[test]
    fn full_when_only_in_flight_remains() {
        let mut outbox = Outbox::new(1, None, Instant::now());
        outbox.enqueue(&msg(1)).unwrap();
        let mut t = wire(3);
        outbox.flush(Instant::now(), &mut t).unwrap();
        assert_eq!(outbox.enqueue(&msg(2)), Err(OutboxError::Full));
        assert_eq!(outbox.len(), 1);
    }

    #[test]
    fn priority_goes_to_head() {
        let mut outbox = Outbox::new(4, None, Instant::now());
        outbox.enqueue(&msg(1)).unwrap();
        outbox.enqueue_priority(&Message::pong("abc123")).unwrap();
        assert_eq!(outbox.pending()[0], "PONG :abc123");
    }

    #[test]
    fn unsendable_message_is_refused() {
        let mut outbox = Outbox::new(4, None, Instant::now());
        let err = outbox
            .enqueue(&Message::privmsg("#a", "two\r\nlines"))
            .unwrap_err();
        assert!(matches!(err, OutboxError::Encode(_)));
        assert!(outbox.is_empty());
    }

    #[test]
    fn flood_control_holds_after_burst_but_not_priority() {
        let flood = FloodConfig {
            burst: 2,
            period_ms: 1_000,
        };
        let start = Instant::now();
        let mut outbox = Outbox::new(8, Some(flood), start);
        for i in 0..4 {
            outbox.enqueue(&msg(i)).unwrap();
        }
        let mut t = wire(usize::MAX);
        assert_eq!(outbox.flush(start, &mut t).unwrap(), 2);
        assert_eq!(outbox.len(), 2);

        outbox.enqueue_priority(&Message::pong("x")).unwrap();
        assert_eq!(outbox.flush(start, &mut t).unwrap(), 1);
        assert_eq!(outbox.pending(), ["PRIVMSG #a :line 2", "PRIVMSG #a :line 3"]);

        // Half a period later the bucket is still empty.
        assert_eq!(outbox.flush(start + Duration::from_millis(500), &mut t).unwrap(), 0);

        // One period refills one line.
        assert_eq!(outbox.flush(start + Duration::from_secs(1), &mut t).unwrap(), 1);
        assert_eq!(outbox.pending(), ["PRIVMSG #a :line 3"]);

        assert_eq!(outbox.flush(start + Duration::from_secs(2), &mut t).unwrap(), 1);
        assert!(outbox.is_empty());
    }

    #[test]
    fn priority_lines_keep_their_own_order() {
        let mut outbox = Outbox::new(8, None, Instant::now());
        outbox.enqueue(&msg(1)).unwrap();
        outbox.enqueue_priority(&Message::pong("first")).unwrap();
        outbox.enqueue_priority(&Message::pong("second")).unwrap();
        outbox.enqueue_priority(&Message::pong("third")).unwrap();
        assert_eq!(
            outbox.pending(),
            [
                "PONG :first",
                "PONG :second",
                "PONG :third",
                "PRIVMSG #a :line 1"
            ]
        );
    }

    #[test]
    fn priority_lines_queue_behind_in_flight_in_order() {
        let mut outbox = Outbox::new(8, None, Instant::now());
        outbox.enqueue(&msg(1)).unwrap();
        outbox.enqueue(&msg(2)).unwrap();
        let mut t = wire(5);
        outbox.flush(Instant::now(), &mut t).unwrap();
        assert!(outbox.in_flight());

        outbox.enqueue_priority(&Message::pong("a")).unwrap();
        outbox.enqueue_priority(&Message::pong("b")).unwrap();

        t.budget = usize::MAX;
        outbox.flush(Instant::now(), &mut t).unwrap();
        assert_eq!(
            t.wire,
            b"PRIVMSG #a :line 1\r\nPONG :a\r\nPONG :b\r\nPRIVMSG #a :line 2\r\n"
        );
    }

    #[test]
    fn clear_discards_in_flight() {
        let mut outbox = Outbox::new(2, None, Instant::now());
        outbox.enqueue(&msg(1)).unwrap();
        outbox.flush(Instant::now(), &mut wire(4)).unwrap();
        outbox.clear();
        assert!(outbox.is_empty());
        assert!(!outbox.in_flight());
    }
}
