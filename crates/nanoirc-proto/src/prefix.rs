//! IRC message prefix (source) handling.
//!
//! A prefix identifies the origin of a message: either a server name or a
//! user's `nick!user@host` mask.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

/// A borrowed, zero-copy view of a message prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrefixRef<'a> {
    /// Nickname (or server name when there is no user/host part)
    pub nick: Option<&'a str>,
    /// Username (ident)
    pub user: Option<&'a str>,
    /// Hostname
    pub host: Option<&'a str>,
    /// Original raw prefix string
    pub raw: &'a str,
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl<'a> PrefixRef<'a> {
    /// Split a prefix string into components without allocating.
    pub fn parse(s: &'a str) -> Self {
        let (before_host, host) = match s.split_once('@') {
            Some((before, host)) => (before, Some(host)),
            None => (s, None),
        };
        let (nick, user) = match before_host.split_once('!') {
            Some((nick, user)) => (non_empty(nick), non_empty(user)),
            None => (non_empty(before_host), None),
        };

        Self {
            nick,
            user,
            host,
            raw: s,
        }
    }

    /// Whether this prefix names a server rather than a user.
    ///
    /// A bare name containing a dot, with no `!` or `@`, is a server.
    pub fn is_server(&self) -> bool {
        self.user.is_none() && self.host.is_none() && self.raw.contains('.')
    }

    /// The nickname, unless this prefix is a server name.
    pub fn nickname(&self) -> Option<&'a str> {
        if self.is_server() {
            None
        } else {
            self.nick
        }
    }
}

/// Check that a string can be sent as a prefix (non-empty, no whitespace).
pub fn is_valid_prefix_str(s: &str) -> bool {
    !s.is_empty() && !s.contains([' ', '\r', '\n', '\0'])
}
