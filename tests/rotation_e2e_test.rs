//! End-to-end tests: rotation loop against a real bound feed server

mod common;

use bannerwheel::models::Ad;
use bannerwheel::rotation::{
    BannerContainer, BannerRenderer, BannerSurface, CycleOutcome, FeedClient, RotationConfig,
    RotationEvent, RotationScheduler, SelectionSource, TransitionCoordinator,
};
use common::TestServer;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

fn rotation_config(server: &TestServer) -> RotationConfig {
    RotationConfig::new(server.url("/api/banner-ads"))
        .with_fade_delay(Duration::from_millis(10))
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_feed_returns_three_distinct_ads() {
    let server = TestServer::start(common::abcd_pool()).await;
    let client = FeedClient::new(&rotation_config(&server)).unwrap();

    let selection = client.fetch_selection().await.unwrap();

    assert_eq!(selection.len(), 3);
    let titles: HashSet<_> = selection.iter().map(|a| a.title.clone()).collect();
    assert_eq!(titles.len(), 3);
    for title in &titles {
        assert!(["A", "B", "C", "D"].contains(&title.as_str()));
    }

    server.stop().await;
}

#[tokio::test]
async fn test_feed_appearance_frequency() {
    const CALLS: usize = 1000;

    let server = TestServer::start(common::abcd_pool()).await;
    let http = reqwest::Client::new();
    let url = server.url("/api/banner-ads");
    let mut counts: HashMap<String, usize> = HashMap::new();

    for _ in 0..CALLS {
        let ads: Vec<Ad> = http.get(&url).send().await.unwrap().json().await.unwrap();
        assert_eq!(ads.len(), 3);
        for ad in ads {
            *counts.entry(ad.title).or_default() += 1;
        }
    }

    assert_eq!(counts.len(), 4);
    for (title, count) in &counts {
        // Appearance rate 0.75 ± 0.05
        assert!(
            (700..=800).contains(count),
            "{title} appeared {count} times"
        );
    }

    server.stop().await;
}

#[tokio::test]
async fn test_rotation_cycle_renders_feed_selection() {
    let server = TestServer::start(common::abcd_pool()).await;
    let config = rotation_config(&server);
    let client = Arc::new(FeedClient::new(&config).unwrap());

    let coordinator =
        TransitionCoordinator::new(BannerContainer::default(), client, BannerRenderer::default())
            .with_config(&config);

    let outcome = coordinator.run_cycle().await;
    assert_eq!(outcome, CycleOutcome::Rendered { count: 3 });

    let container = coordinator.container();
    let container = container.lock().await;
    assert_eq!(container.id(), "dynamic-banners");
    assert_eq!(container.children().len(), 3);
    assert!((container.opacity() - 1.0).abs() < f32::EPSILON);

    drop(container);
    server.stop().await;
}

#[tokio::test]
async fn test_rotation_survives_server_outage() {
    let server = TestServer::start(common::abcd_pool()).await;
    let config = rotation_config(&server);
    let client = Arc::new(FeedClient::new(&config).unwrap());

    let coordinator =
        TransitionCoordinator::new(BannerContainer::default(), client, BannerRenderer::default())
            .with_config(&config);

    assert!(matches!(
        coordinator.run_cycle().await,
        CycleOutcome::Rendered { .. }
    ));
    let before: Vec<String> = {
        let container = coordinator.container();
        let container = container.lock().await;
        container.titles().into_iter().map(str::to_string).collect()
    };

    server.stop().await;

    assert!(matches!(
        coordinator.run_cycle().await,
        CycleOutcome::Unchanged { .. }
    ));

    let container = coordinator.container();
    let container = container.lock().await;
    let after: Vec<String> = container.titles().into_iter().map(str::to_string).collect();
    assert_eq!(before, after);
    assert!((container.opacity() - 1.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_scheduler_drives_repeated_renders() {
    let server = TestServer::start(common::abcd_pool()).await;
    let config = rotation_config(&server).with_interval(Duration::from_millis(100));
    let client = Arc::new(FeedClient::new(&config).unwrap());

    let coordinator = Arc::new(
        TransitionCoordinator::new(BannerContainer::default(), client, BannerRenderer::default())
            .with_config(&config),
    );
    let mut events = coordinator.subscribe();
    let scheduler = RotationScheduler::new(Arc::clone(&coordinator));

    scheduler.start(config.interval()).await.unwrap();

    let mut rendered = 0;
    let wait = tokio::time::timeout(Duration::from_secs(10), async {
        while rendered < 3 {
            if let Ok(RotationEvent::CycleCompleted(CycleOutcome::Rendered { .. })) =
                events.recv().await
            {
                rendered += 1;
            }
        }
    })
    .await;

    assert!(wait.is_ok(), "expected three rendered cycles");
    assert!(scheduler.stop().await);
    assert!(coordinator.stats().rendered >= 3);

    server.stop().await;
}
