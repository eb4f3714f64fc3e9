//! End-to-end session scenarios: registration, commands, restart and
//! disconnects, driven through a scripted transport.

mod common;

use std::time::Duration;

use common::{ScriptedTransport, TestBot, config};
use nanobot::auth::AuthStatus;
use nanobot::engine::{DisconnectCause, TickOutcome};
use nanobot::error::TransportError;
use nanoirc_proto::{DisconnectReason, Phase};

fn authorized_bot() -> TestBot {
    let mut bot = TestBot::registered(&config(""));
    assert_eq!(bot.alice_says("#a", "!auth letmein"), ["PRIVMSG alice :authorized"]);
    bot
}

#[test]
fn joins_configured_channels_in_order() {
    let bot = TestBot::registered(&config(""));
    let session = bot.engine.session();
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.registration.joined_channels(), ["#a", "#b"]);
    assert_eq!(session.connections, 1);
}

#[test]
fn failed_join_still_reaches_ready() {
    let mut bot = TestBot::new(&config(""));
    bot.exchange(&[]);
    bot.exchange(&[
        ":irc.test 001 nanobot :Welcome",
        ":irc.test 473 nanobot #a :Cannot join channel (+i)",
        ":nanobot!nano@host JOIN #b",
    ]);
    let session = bot.engine.session();
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(session.registration.joined_channels(), ["#b"]);
}

#[test]
fn auth_then_restart_reconnects_with_fresh_session() {
    let mut bot = authorized_bot();

    bot.transport.push_line(":alice!al@example.net PRIVMSG #a :!restart");
    let outcome = bot.tick();
    assert!(matches!(outcome, TickOutcome::Reconnect), "{outcome:?}");
    assert_eq!(bot.transport.take_sent(), ["QUIT :restart requested by alice"]);

    let session = bot.engine.session();
    assert_eq!(session.phase(), Phase::Disconnected);
    assert_eq!(session.auth.status(), &AuthStatus::Unauthorized);
    assert!(bot.engine.outbox().is_empty());

    bot.transport = ScriptedTransport::connected();
    bot.engine.connecting();
    assert_eq!(bot.exchange(&[]), ["NICK nanobot", "USER nanobot 8 * :Nano Bot"]);
    assert_eq!(bot.engine.session().connections, 2);

    // Authorization did not survive the restart.
    bot.exchange(&[
        ":irc.test 001 nanobot :Welcome",
        ":nanobot!nano@host JOIN #a",
        ":nanobot!nano@host JOIN #b",
    ]);
    assert!(bot.alice_says("#a", "!say #a hi").is_empty());
}

#[test]
fn auth_is_idempotent() {
    let mut bot = authorized_bot();
    assert_eq!(bot.alice_says("#a", "!auth letmein"), ["PRIVMSG alice :authorized"]);
    assert_eq!(
        bot.engine.session().auth.status(),
        &AuthStatus::Authorized {
            identity: "alice!al@example.net".into()
        }
    );
    assert_eq!(bot.alice_says("#a", "!ping"), ["PRIVMSG #a :pong"]);
}

#[test]
fn wrong_password_is_silent() {
    let mut bot = TestBot::registered(&config(""));
    assert!(bot.alice_says("#a", "!auth letme").is_empty());
    assert_eq!(
        bot.alice_says("#a", "!auth"),
        ["PRIVMSG #a :usage: auth <password>"]
    );
    assert_eq!(bot.engine.session().auth.status(), &AuthStatus::Unauthorized);
}

#[test]
fn unauthorized_commands_are_ignored() {
    let mut bot = TestBot::registered(&config(""));
    assert!(bot.alice_says("#a", "!say #a hello").is_empty());
    assert!(bot.alice_says("#a", "!join #c").is_empty());
    assert!(bot.alice_says("nanobot", "!restart").is_empty());
    assert!(bot.engine.registry().get_command_stats().is_empty());
}

#[test]
fn other_identities_stay_unauthorized() {
    let mut bot = authorized_bot();
    let sent = bot.exchange(&[":mallory!m@evil.example PRIVMSG #a :!say #a pwned"]);
    assert!(sent.is_empty());
}

#[test]
fn denied_notice_is_sent_once_when_enabled() {
    let mut bot = TestBot::registered(&config("[auth]\nnotify_denied = true\n"));
    assert_eq!(bot.alice_says("#a", "!say #a hi"), ["NOTICE alice :permission denied"]);
    assert!(bot.alice_says("#a", "!say #a hi").is_empty());
}

#[test]
fn replies_follow_where_the_command_came_from() {
    let mut bot = authorized_bot();
    assert_eq!(bot.alice_says("#b", "!ping"), ["PRIVMSG #b :pong"]);
    assert_eq!(bot.alice_says("nanobot", "!ping"), ["PRIVMSG alice :pong"]);
}

#[test]
fn channel_commands_queue_their_messages() {
    let mut bot = authorized_bot();
    assert_eq!(bot.alice_says("#a", "!say #b hello there"), ["PRIVMSG #b :hello there"]);
    assert_eq!(bot.alice_says("#a", "!join #c"), ["JOIN #c"]);
    assert_eq!(bot.alice_says("#a", "!part #c bye"), ["PART #c :bye"]);
    assert_eq!(bot.alice_says("#a", "!nick nanobot2"), ["NICK nanobot2"]);
    assert_eq!(bot.alice_says("#a", "!join c"), ["PRIVMSG #a :c is not a channel"]);
    assert_eq!(bot.alice_says("#a", "!join"), ["PRIVMSG #a :usage: join <#channel>"]);
}

#[test]
fn commands_are_case_insensitive_and_counted() {
    let mut bot = authorized_bot();
    assert_eq!(bot.alice_says("#a", "!PING"), ["PRIVMSG #a :pong"]);
    bot.alice_says("#a", "!ping");
    let stats = bot.engine.registry().get_command_stats();
    assert_eq!(stats[0], ("ping", 2));
}

#[test]
fn status_reports_session_state() {
    let mut bot = authorized_bot();
    let sent = bot.alice_says("#a", "!status");
    assert_eq!(sent.len(), 1);
    assert!(
        sent[0].starts_with("PRIVMSG #a :phase=ready nick=nanobot channels=#a,#b queue=0/50"),
        "{}",
        sent[0]
    );
}

#[test]
fn help_lists_commands() {
    let mut bot = authorized_bot();
    let sent = bot.alice_says("#a", "!help");
    assert_eq!(
        sent,
        ["PRIVMSG #a :commands: auth help join logout nick part ping restart say status time uptime"]
    );
}

#[test]
fn logout_revokes_authorization() {
    let mut bot = authorized_bot();
    assert_eq!(bot.alice_says("#a", "!logout"), ["PRIVMSG alice :logged out"]);
    assert!(bot.alice_says("#a", "!ping").is_empty());
}

#[test]
fn commands_before_registration_are_ignored() {
    let mut bot = TestBot::new(&config(""));
    bot.exchange(&[]);
    let sent = bot.exchange(&[":alice!al@example.net PRIVMSG nanobot :!auth letmein"]);
    assert!(sent.is_empty());
}

#[test]
fn server_ping_is_answered() {
    let mut bot = TestBot::registered(&config(""));
    assert_eq!(bot.exchange(&["PING :tok123"]), ["PONG :tok123"]);
}

#[test]
fn idle_link_is_pinged_then_dropped() {
    let mut bot = TestBot::registered(&config(""));

    bot.advance(Duration::from_secs(120));
    assert_eq!(bot.exchange(&[]), ["PING :irc.test"]);

    bot.advance(Duration::from_secs(60));
    let outcome = bot.tick();
    assert!(
        matches!(
            outcome,
            TickOutcome::Disconnected(DisconnectCause::Protocol(DisconnectReason::KeepaliveTimeout))
        ),
        "{outcome:?}"
    );
    assert_eq!(bot.engine.session().phase(), Phase::Disconnected);
}

#[test]
fn server_error_ends_session() {
    let mut bot = TestBot::registered(&config(""));
    bot.transport.push_line("ERROR :Closing Link: nanobot (Ping timeout)");
    let outcome = bot.tick();
    match outcome {
        TickOutcome::Disconnected(DisconnectCause::Protocol(DisconnectReason::ServerError(text))) => {
            assert!(text.contains("Ping timeout"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(bot.engine.session().phase(), Phase::Disconnected);
    assert!(bot.engine.session().registration.joined_channels().is_empty());
}

#[test]
fn closed_transport_resets_session() {
    let mut bot = authorized_bot();
    bot.transport.connected = false;
    let outcome = bot.tick();
    assert!(
        matches!(
            outcome,
            TickOutcome::Disconnected(DisconnectCause::Transport(TransportError::Closed))
        ),
        "{outcome:?}"
    );
    let session = bot.engine.session();
    assert_eq!(session.phase(), Phase::Disconnected);
    assert_eq!(session.auth.status(), &AuthStatus::Unauthorized);

    // Nothing more to report until a new transport shows up.
    assert!(matches!(bot.tick(), TickOutcome::Continue));
}
