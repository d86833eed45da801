use otgw_api::models::{FeedEntry, TimeSeriesPoint};
use otgw_monitor::app::App;
use otgw_monitor::errors::HistoryError;
use otgw_monitor::services::HistoryState;
use time::macros::datetime;

mod common;
use common::mock_gateway::{READ_TOKEN, settings_for, start_gateway};

fn entry(created_at: &str, temperature: Option<f64>, flame: Option<f64>) -> FeedEntry {
    FeedEntry {
        created_at: created_at.to_string(),
        entry_id: None,
        field1: temperature,
        field4: flame,
    }
}

#[tokio::test]
async fn test_history_updates_charts() {
    let gateway = start_gateway().await;
    gateway
        .set_feeds(vec![
            entry("2024-03-07T09:00:00Z", Some(47.5), Some(1.0)),
            entry("2024-03-07T09:00:15Z", None, Some(0.0)),
        ])
        .await;

    let app = App::new(settings_for(&gateway)).unwrap();
    let from = datetime!(2024-03-07 08:00 UTC);
    let to = datetime!(2024-03-07 10:00 UTC);

    let data = app.reload_history(from, to).await.unwrap();
    let at = datetime!(2024-03-07 09:00 UTC).unix_timestamp() * 1000;

    assert_eq!(data.temperature, [TimeSeriesPoint(at, Some(47.5)), TimeSeriesPoint(at + 15_000, None)]);
    {
        let charts = app.state().charts.lock().await;
        assert_eq!(charts.temperature.points(), data.temperature.as_slice());
        assert_eq!(charts.flame.points(), data.flame.as_slice());
        assert_eq!(charts.flame.summary().max, Some(1.0));
    }
    assert_eq!(
        *app.state().history.read().await,
        HistoryState::Ready { from, to, points: 2 }
    );

    let queries = gateway.history_queries().await;
    assert_eq!(
        queries,
        [format!("api_key={READ_TOKEN}&offset=0&start=2024-03-07%2008:00&end=2024-03-07%2010:00")]
    );
}

#[tokio::test]
async fn test_empty_history_clears_charts() {
    let gateway = start_gateway().await;
    gateway.push_feed(entry("2024-03-07T09:00:00Z", Some(50.0), Some(1.0))).await;

    let app = App::new(settings_for(&gateway)).unwrap();
    app.reload_recent(2).await.unwrap();
    assert_eq!(app.state().charts.lock().await.temperature.points().len(), 1);

    gateway.set_feeds(Vec::new()).await;
    let data = app.reload_recent(2).await.unwrap();

    assert!(data.is_empty());
    let charts = app.state().charts.lock().await;
    assert!(charts.temperature.points().is_empty());
    assert!(charts.flame.points().is_empty());
}

#[tokio::test]
async fn test_rejected_token_marks_history_failed() {
    let gateway = start_gateway().await;
    let mut settings = (*settings_for(&gateway)).clone();
    settings.history.read_token = "WRONGTOKEN000000".to_string();

    let app = App::new(std::sync::Arc::new(settings)).unwrap();
    let result = app.reload_recent(2).await;

    assert!(matches!(result, Err(HistoryError::Status { status: 400, ref body }) if body == "-1"));
    assert!(matches!(*app.state().history.read().await, HistoryState::Failed(_)));
}

#[tokio::test]
async fn test_unknown_channel() {
    let gateway = start_gateway().await;
    let mut settings = (*settings_for(&gateway)).clone();
    settings.history.channel_id = "42".to_string();

    let app = App::new(std::sync::Arc::new(settings)).unwrap();

    assert!(matches!(
        app.reload_recent(1).await,
        Err(HistoryError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_start_loads_recent_window() {
    let gateway = start_gateway().await;
    gateway.push_feed(entry("2024-03-07T09:00:00Z", Some(52.0), Some(1.0))).await;

    let mut app = App::new(settings_for(&gateway)).unwrap();
    app.start().await;

    assert!(matches!(*app.state().history.read().await, HistoryState::Ready { points: 1, .. }));
    assert_eq!(app.state().charts.lock().await.temperature.summary().last, Some(52.0));

    let queries = gateway.history_queries().await;
    assert_eq!(queries.len(), 1);
    assert!(queries[0].starts_with(&format!("api_key={READ_TOKEN}&offset=0&start=")));
    assert!(queries[0].contains("%20"));

    app.shutdown().await;
}
