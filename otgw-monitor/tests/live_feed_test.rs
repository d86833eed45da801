use otgw_monitor::app::App;
use otgw_monitor::services::{FeedEvent, LinkState};

mod common;
use common::mock_gateway::{next_event, settings_for, start_gateway, wait_for_clients};

#[tokio::test]
async fn test_frames_are_decoded_into_transcript() {
    let gateway = start_gateway().await;
    let mut app = App::new(settings_for(&gateway)).unwrap();
    let mut events = app.subscribe();

    app.start().await;
    next_event(&mut events, |event| *event == FeedEvent::Connected).await;
    wait_for_clients(&gateway, 1).await;
    assert_eq!(app.link_state(), LinkState::Connected);

    gateway.send_text("T10017000");
    let line = match next_event(&mut events, |event| matches!(event, FeedEvent::Line(_))).await {
        FeedEvent::Line(line) => line,
        other => panic!("unexpected event: {:?}", other),
    };

    assert!(line.ends_with(": 268529664 [msgType: 1 (WRITE_DATA); dataId: 1 (TSet); dataValue: 28672]"));
    assert_eq!(app.state().transcript.lock().await.latest(), Some(line.as_str()));

    app.shutdown().await;
}

#[tokio::test]
async fn test_invalid_frame_is_skipped() {
    let gateway = start_gateway().await;
    let mut app = App::new(settings_for(&gateway)).unwrap();
    let mut events = app.subscribe();

    app.start().await;
    wait_for_clients(&gateway, 1).await;

    gateway.send_text("Tnot-a-frame");
    gateway.send_text("B40192D80");

    let rejected = next_event(&mut events, |event| matches!(event, FeedEvent::Rejected { .. })).await;
    assert!(matches!(rejected, FeedEvent::Rejected { message, .. } if message == "Tnot-a-frame"));

    let line = next_event(&mut events, |event| matches!(event, FeedEvent::Line(_))).await;
    assert!(matches!(
        line,
        FeedEvent::Line(line) if line.ends_with("[msgType: 4 (READ_ACK); dataId: 25 (Tboiler); dataValue: 11648]")
    ));
    assert_eq!(app.state().transcript.lock().await.len(), 1);

    app.shutdown().await;
}

#[tokio::test]
async fn test_reconnects_after_gateway_closes() {
    let gateway = start_gateway().await;
    let mut app = App::new(settings_for(&gateway)).unwrap();
    let mut events = app.subscribe();

    app.start().await;
    wait_for_clients(&gateway, 1).await;
    next_event(&mut events, |event| *event == FeedEvent::Connected).await;

    gateway.disconnect_clients();

    next_event(&mut events, |event| *event == FeedEvent::Disconnected).await;
    let retry = next_event(&mut events, |event| matches!(event, FeedEvent::RetryScheduled(_))).await;
    assert_eq!(retry, FeedEvent::RetryScheduled(std::time::Duration::from_millis(100)));
    next_event(&mut events, |event| *event == FeedEvent::Connected).await;
    wait_for_clients(&gateway, 1).await;

    gateway.send_text("T00010000");
    let line = next_event(&mut events, |event| matches!(event, FeedEvent::Line(_))).await;
    assert!(matches!(line, FeedEvent::Line(line) if line.contains("[msgType: 0 (READ_DATA); dataId: 1 (TSet)")));

    app.shutdown().await;
    assert_eq!(app.link_state(), LinkState::Disconnected);
    wait_for_clients(&gateway, 0).await;
}

#[tokio::test]
async fn test_retries_while_gateway_is_down() {
    let gateway = start_gateway().await;
    let mut settings = (*settings_for(&gateway)).clone();
    // Nothing listens on the discard port
    settings.gateway.port = Some(9);

    let mut app = App::new(std::sync::Arc::new(settings)).unwrap();
    let mut events = app.subscribe();
    app.start().await;

    for _ in 0..2 {
        next_event(&mut events, |event| matches!(event, FeedEvent::RetryScheduled(_))).await;
    }
    assert_eq!(app.link_state(), LinkState::Disconnected);

    app.shutdown().await;
}
