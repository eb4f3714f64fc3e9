//! IRC numeric replies the client reacts to.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

/// Server numeric reply code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 405 - Joined too many channels
    ERR_TOOMANYCHANNELS = 405,
    /// 422 - MOTD file is missing
    ERR_NOMOTD = 422,
    /// 431 - No nickname given
    ERR_NONICKNAMEGIVEN = 431,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,
    /// 436 - Nickname collision
    ERR_NICKCOLLISION = 436,
    /// 464 - Password incorrect
    ERR_PASSWDMISMATCH = 464,
    /// 465 - You are banned from this server
    ERR_YOUREBANNEDCREEP = 465,
    /// 471 - Cannot join channel (+l)
    ERR_CHANNELISFULL = 471,
    /// 473 - Cannot join channel (+i)
    ERR_INVITEONLYCHAN = 473,
    /// 474 - Cannot join channel (+b)
    ERR_BANNEDFROMCHAN = 474,
    /// 475 - Cannot join channel (+k)
    ERR_BADCHANNELKEY = 475,
}

impl Response {
    /// Numeric code.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a known numeric.
    pub fn from_code(code: u16) -> Option<Self> {
        use Response::*;
        Some(match code {
            1 => RPL_WELCOME,
            2 => RPL_YOURHOST,
            376 => RPL_ENDOFMOTD,
            403 => ERR_NOSUCHCHANNEL,
            405 => ERR_TOOMANYCHANNELS,
            422 => ERR_NOMOTD,
            431 => ERR_NONICKNAMEGIVEN,
            432 => ERR_ERRONEUSNICKNAME,
            433 => ERR_NICKNAMEINUSE,
            436 => ERR_NICKCOLLISION,
            464 => ERR_PASSWDMISMATCH,
            465 => ERR_YOUREBANNEDCREEP,
            471 => ERR_CHANNELISFULL,
            473 => ERR_INVITEONLYCHAN,
            474 => ERR_BANNEDFROMCHAN,
            475 => ERR_BADCHANNELKEY,
            _ => return None,
        })
    }

    /// Error numerics are 400-599.
    #[inline]
    pub fn is_error(self) -> bool {
        (400..600).contains(&self.code())
    }

    /// Numerics rejecting the nickname during registration.
    #[inline]
    pub fn is_nick_rejection(self) -> bool {
        matches!(
            self,
            Response::ERR_ERRONEUSNICKNAME
                | Response::ERR_NICKNAMEINUSE
                | Response::ERR_NICKCOLLISION
        )
    }

    /// Numerics refusing a JOIN; the channel is the second parameter.
    #[inline]
    pub fn is_join_failure(self) -> bool {
        matches!(
            self,
            Response::ERR_NOSUCHCHANNEL
                | Response::ERR_TOOMANYCHANNELS
                | Response::ERR_CHANNELISFULL
                | Response::ERR_INVITEONLYCHAN
                | Response::ERR_BANNEDFROMCHAN
                | Response::ERR_BADCHANNELKEY
        )
    }
}
