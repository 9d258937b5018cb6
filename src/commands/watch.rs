use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use bannerwheel::config::Config;
use bannerwheel::rotation::{
    BannerNode, BannerRenderer, BannerSurface, FeedClient, RotationEvent, RotationScheduler,
    TransitionCoordinator,
};

/// Configuration parameters for the rotation watcher
pub struct WatchParams {
    pub feed_url: Option<String>,
    pub interval_ms: Option<u64>,
    pub fade_delay_ms: Option<u64>,
    pub retries: Option<u32>,
    pub cycles: Option<u64>,
}

/// Banner surface that prints each render to stdout
#[derive(Debug, Default)]
struct TerminalSurface {
    opacity: f32,
    children: Vec<BannerNode>,
    renders: u64,
}

impl TerminalSurface {
    fn new() -> Self {
        Self {
            opacity: 1.0,
            ..Default::default()
        }
    }

    fn print(&self) {
        println!("Rotation #{}", self.renders);
        println!("{:-<40}", "");
        for node in &self.children {
            println!("  [{}] {}", node.background_color, node.text_lines().join(" | "));
            println!("        -> {}", node.button.label);
        }
        if self.children.is_empty() {
            println!("  (no banners)");
        }
        println!();
    }
}

impl BannerSurface for TerminalSurface {
    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
        tracing::trace!(opacity = self.opacity, "Container opacity changed");
    }

    fn children(&self) -> &[BannerNode] {
        &self.children
    }

    fn replace_children(&mut self, nodes: Vec<BannerNode>) {
        self.children = nodes;
        self.renders += 1;
        self.print();
    }
}

/// Run the rotation loop against a feed and print every render
pub async fn watch(config: Config, params: WatchParams) -> Result<()> {
    let WatchParams {
        feed_url,
        interval_ms,
        fade_delay_ms,
        retries,
        cycles,
    } = params;

    let mut rotation = config.rotation;
    if let Some(url) = feed_url {
        rotation.feed_url = url;
    }
    if let Some(ms) = interval_ms {
        rotation = rotation.with_interval(Duration::from_millis(ms));
    }
    if let Some(ms) = fade_delay_ms {
        rotation = rotation.with_fade_delay(Duration::from_millis(ms));
    }
    if let Some(retries) = retries {
        rotation = rotation.with_retry_count(retries);
    }
    rotation
        .validate()
        .context("Invalid rotation configuration")?;

    println!("Starting Banner Rotation");
    println!("========================");
    println!("  Feed: {}", rotation.feed_url);
    println!("  Interval: {}ms", rotation.interval_ms);
    println!("  Fade Delay: {}ms", rotation.fade_delay_ms);
    println!("  Fade Opacity: {}", rotation.fade_opacity);
    println!("  Retries: {}", rotation.retry_count);
    if let Some(cycles) = cycles {
        println!("  Cycles: {cycles}");
    }
    println!();

    let client = FeedClient::new(&rotation).context("Failed to create feed client")?;
    let coordinator = Arc::new(
        TransitionCoordinator::new(
            TerminalSurface::new(),
            Arc::new(client),
            BannerRenderer::default(),
        )
        .with_config(&rotation),
    );
    let mut events = coordinator.subscribe();
    let scheduler = RotationScheduler::new(Arc::clone(&coordinator));

    scheduler.start(rotation.interval()).await?;
    println!("Press Ctrl+C to stop.\n");

    let mut completed = 0u64;
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
                tracing::info!("Shutdown signal received");
                break;
            }
            event = events.recv() => match event {
                Ok(RotationEvent::CycleCompleted(outcome)) => {
                    tracing::debug!(outcome = outcome.as_str(), "Rotation cycle completed");
                    if !outcome.is_attempt() {
                        continue;
                    }
                    completed += 1;
                    if cycles.is_some_and(|max| completed >= max) {
                        break;
                    }
                }
                Ok(RotationEvent::StateChanged(_)) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Rotation event stream lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    scheduler.stop().await;

    let stats = coordinator.stats();
    println!("Rotation stopped.");
    println!(
        "  Rendered: {}  Unchanged: {}  Skipped: {}",
        stats.rendered, stats.unchanged, stats.skipped
    );
    Ok(())
}
