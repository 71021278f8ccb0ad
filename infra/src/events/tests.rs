//! Unit tests for the Redis Streams publisher

use redis::{ErrorKind, RedisError};

use acct_core::events::PublishError;

use super::redis_streams::{publish_error, xadd_command};

fn packed(cmd: &redis::Cmd) -> String {
    String::from_utf8_lossy(&cmd.get_packed_command()).into_owned()
}

#[test]
fn test_xadd_carries_key_and_payload_fields() {
    let cmd = xadd_command("user.created", b"user-1", br#"{"type":"user.created"}"#, 1000);
    let wire = packed(&cmd);

    assert!(wire.contains("XADD"));
    assert!(wire.contains("user.created"));
    assert!(wire.contains("MAXLEN"));
    assert!(wire.contains("1000"));
    assert!(wire.contains("user-1"));
    assert!(wire.contains(r#"{"type":"user.created"}"#));
}

#[test]
fn test_xadd_without_trim() {
    let cmd = xadd_command("user.created", b"k", b"p", 0);
    assert!(!packed(&cmd).contains("MAXLEN"));
}

#[test]
fn test_redis_errors_become_transport_errors() {
    let err = publish_error(RedisError::from((ErrorKind::IoError, "connection refused")));
    assert!(matches!(err, PublishError::Transport(_)));
}
