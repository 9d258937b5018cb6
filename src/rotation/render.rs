//! Banner rendering into a container surface
//!
//! A render replaces every child of the container with one [`BannerNode`]
//! per ad, in selection order. Click behavior is an explicit
//! [`ClickHandler`] captured by the renderer and attached to each node's
//! action button, so nodes have no dependency on anything global.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::metrics;
use crate::models::Ad;

/// Stagger between consecutive banner entrance animations
pub const ANIMATION_STAGGER: Duration = Duration::from_millis(200);

/// Callback invoked with the ad title when a banner button is activated
pub type ClickHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Handler that records the click for analytics and logs a placeholder
/// navigation to the ad's page
pub fn default_click_handler() -> ClickHandler {
    Arc::new(|title: &str| {
        tracing::info!(
            banner_title = %title,
            event_category = "advertisement",
            "Banner clicked"
        );
        metrics::record_banner_click(title);
        tracing::info!(banner_title = %title, "Navigating to banner page");
    })
}

// ============================================================================
// Nodes
// ============================================================================

/// Click action bound to one banner
#[derive(Clone)]
pub struct ClickAction {
    title: String,
    handler: ClickHandler,
}

impl ClickAction {
    /// Title forwarded to the handler
    pub fn target(&self) -> &str {
        &self.title
    }

    /// Run the handler
    pub fn invoke(&self) {
        (self.handler)(&self.title);
    }
}

// Actions are equal when they target the same ad; handler identity is not
// observable on the rendered surface.
impl PartialEq for ClickAction {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl fmt::Debug for ClickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickAction")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Call-to-action button of a banner
#[derive(Debug, Clone, PartialEq)]
pub struct ActionButton {
    pub label: String,
    pub action: ClickAction,
}

impl ActionButton {
    /// Simulate activating the button
    pub fn click(&self) {
        self.action.invoke();
    }
}

/// One rendered banner
#[derive(Debug, Clone, PartialEq)]
pub struct BannerNode {
    pub background_color: String,
    pub animation_delay: Duration,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub instructor: Option<String>,
    pub company: Option<String>,
    pub button: ActionButton,
}

impl BannerNode {
    /// Text lines in display order, skipping absent attribution lines
    pub fn text_lines(&self) -> Vec<&str> {
        let mut lines = vec![
            self.title.as_str(),
            self.subtitle.as_str(),
            self.description.as_str(),
        ];
        lines.extend(self.instructor.as_deref());
        lines.extend(self.company.as_deref());
        lines
    }
}

// ============================================================================
// Surfaces
// ============================================================================

/// Render target holding banner nodes and a visual opacity
pub trait BannerSurface: Send {
    /// Current opacity in `[0.0, 1.0]`
    fn opacity(&self) -> f32;

    /// Change the opacity
    fn set_opacity(&mut self, opacity: f32);

    /// Currently displayed banners
    fn children(&self) -> &[BannerNode];

    /// Drop every child and install `nodes` in their place
    fn replace_children(&mut self, nodes: Vec<BannerNode>);
}

/// In-memory banner container
#[derive(Debug, Clone, PartialEq)]
pub struct BannerContainer {
    id: String,
    opacity: f32,
    children: Vec<BannerNode>,
}

impl BannerContainer {
    /// Create an empty, fully opaque container
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            opacity: 1.0,
            children: Vec::new(),
        }
    }

    /// Element id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Titles of the displayed banners, in order
    pub fn titles(&self) -> Vec<&str> {
        self.children.iter().map(|n| n.title.as_str()).collect()
    }
}

impl Default for BannerContainer {
    fn default() -> Self {
        Self::new(crate::feed::BANNER_CONTAINER_ID)
    }
}

impl BannerSurface for BannerContainer {
    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn children(&self) -> &[BannerNode] {
        &self.children
    }

    fn replace_children(&mut self, nodes: Vec<BannerNode>) {
        self.children = nodes;
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Maps a selection to banner nodes
#[derive(Clone)]
pub struct BannerRenderer {
    on_click: ClickHandler,
}

impl BannerRenderer {
    /// Create a renderer that attaches `on_click` to every banner button
    pub fn new(on_click: ClickHandler) -> Self {
        Self { on_click }
    }

    /// Build the node for the ad at `index` in a selection
    pub fn build_node(&self, index: usize, ad: &Ad) -> BannerNode {
        BannerNode {
            background_color: ad.bg_color.clone(),
            animation_delay: ANIMATION_STAGGER * index as u32,
            title: ad.title.clone(),
            subtitle: ad.subtitle.clone(),
            description: ad.description.clone(),
            instructor: ad.instructor.clone(),
            company: ad.company.clone(),
            button: ActionButton {
                label: ad.button_text.clone(),
                action: ClickAction {
                    title: ad.title.clone(),
                    handler: Arc::clone(&self.on_click),
                },
            },
        }
    }

    /// Replace the container's content with one node per ad
    pub fn render<S: BannerSurface + ?Sized>(&self, container: &mut S, ads: &[Ad]) {
        let nodes = ads
            .iter()
            .enumerate()
            .map(|(index, ad)| self.build_node(index, ad))
            .collect();

        container.replace_children(nodes);
        tracing::debug!(count = ads.len(), "Rendered banners");
    }
}

impl Default for BannerRenderer {
    fn default() -> Self {
        Self::new(default_click_handler())
    }
}

impl fmt::Debug for BannerRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BannerRenderer").finish_non_exhaustive()
    }
}
