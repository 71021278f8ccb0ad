//! Integration tests against a live Redis instance.

use acct_core::events::EventPublisher;
use acct_infra::RedisStreamsPublisher;
use acct_shared::EventsConfig;

#[tokio::test]
#[ignore] // Requires actual Redis
async fn test_publish_appends_to_stream() {
    dotenvy::dotenv().ok();
    let config = EventsConfig {
        redis_url: std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        ..Default::default()
    };
    let publisher = RedisStreamsPublisher::connect(&config).await.unwrap();
    assert!(publisher.health_check().await.unwrap());

    let topic = format!("test.{}", uuid::Uuid::new_v4());
    publisher
        .publish(&topic, b"user-1", br#"{"type":"user.created"}"#)
        .await
        .unwrap();

    let client = redis::Client::open(config.redis_url.as_str()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let len: usize = redis::cmd("XLEN").arg(&topic).query_async(&mut conn).await.unwrap();
    assert_eq!(len, 1);
    let _: () = redis::cmd("DEL").arg(&topic).query_async(&mut conn).await.unwrap();
}
