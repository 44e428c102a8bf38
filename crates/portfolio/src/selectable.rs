//! One interactive-object abstraction for holograms, rockets, planets, flags and buttons.
//!
//! Objects differ only in how they draw; hover emphasis, picking and click
//! resolution are shared.

use catalog::{Localized, Rgb};
use engine_core::Transform;
use glam::Vec2;
use hecs::World;
use renderer::{Camera, OverlayBuilder};

use crate::director::SceneEvent;
use crate::state::{ObjectId, ObjectKind};

/// Colours an object draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub body: Rgb,
    pub glow: Rgb,
    /// Planets with a ring decoration.
    pub ring: bool,
}

impl Appearance {
    pub fn new(body: Rgb, glow: Rgb) -> Self {
        Self { body, glow, ring: false }
    }
}

/// Hover/selection highlight applied on top of the base size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emphasis {
    pub scale: f32,
    /// Glow opacity.
    pub glow: f32,
}

/// Everything a draw callback gets for one object this frame.
pub struct DrawContext<'a> {
    /// Projected centre in pixels.
    pub center: Vec2,
    /// Projected base radius in pixels, before emphasis.
    pub radius: f32,
    pub emphasis: Emphasis,
    pub appearance: &'a Appearance,
    /// Seconds since start, for pulsing.
    pub time: f32,
    /// Roll around the view axis in radians.
    pub roll: f32,
}

impl DrawContext<'_> {
    pub fn scaled_radius(&self) -> f32 {
        self.radius * self.emphasis.scale
    }
}

pub type DrawFn = fn(&mut OverlayBuilder, &DrawContext);

/// Component: makes an entity hoverable and clickable.
pub struct Selectable {
    pub id: ObjectId,
    /// Hit radius in world units.
    pub radius: f32,
    pub appearance: Appearance,
    pub draw: DrawFn,
    /// Caption drawn under the object.
    pub label: Option<Localized>,
}

/// Highlight for an object given the current interaction state.
/// While warping, every hologram but the travel target collapses.
pub fn emphasis(kind: ObjectKind, hovered: bool, selected: bool, warping: bool) -> Emphasis {
    let glow = if selected {
        0.4
    } else if hovered {
        0.3
    } else {
        0.2
    };
    let scale = match kind {
        ObjectKind::Hologram if warping && !selected => 0.0,
        ObjectKind::Hologram if selected => 1.4,
        ObjectKind::Hologram if hovered => 1.08,
        ObjectKind::Rocket if selected => 1.3,
        ObjectKind::Rocket if hovered => 1.1,
        ObjectKind::Planet if selected => 1.2,
        ObjectKind::Planet if hovered => 1.1,
        ObjectKind::Flag | ObjectKind::BackButton if hovered => 1.15,
        _ => 1.0,
    };
    Emphasis { scale, glow }
}

/// A selectable projected into screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenHit {
    pub id: ObjectId,
    pub center: Vec2,
    pub radius: f32,
    pub depth: f32,
}

/// Project every visible selectable in `world` through `camera`.
pub fn screen_hits(world: &World, camera: &Camera, width: f32, height: f32) -> Vec<ScreenHit> {
    let mut hits = Vec::new();
    for (_, (transform, selectable)) in world.query::<(&Transform, &Selectable)>().iter() {
        let Some((center, depth)) = camera.world_to_screen(transform.position, width, height) else {
            continue;
        };
        let radius = camera.pixel_radius(selectable.radius * transform.uniform_scale(), depth, height);
        hits.push(ScreenHit {
            id: selectable.id.clone(),
            center,
            radius,
            depth,
        });
    }
    hits
}

/// The nearest object under `cursor`, if any.
pub fn pick(hits: &[ScreenHit], cursor: Vec2) -> Option<&ObjectId> {
    hits.iter()
        .filter(|hit| hit.center.distance(cursor) <= hit.radius)
        .min_by(|a, b| a.depth.total_cmp(&b.depth))
        .map(|hit| &hit.id)
}

/// Hover event to send when the pick under the cursor differs from the
/// director's hovered object. A rejected hover keeps them different, so it is
/// sent again on later frames until the director accepts it.
pub fn hover_change(pick: Option<&ObjectId>, hovered: Option<&ObjectId>) -> Option<SceneEvent> {
    (pick != hovered).then(|| SceneEvent::Hover(pick.cloned()))
}

/// What a click on `id` means: flags open the detail view, the back button
/// leaves the surface, a second click on the selection enters it.
pub fn resolve_click(id: ObjectId, selected: Option<&ObjectId>) -> SceneEvent {
    match id.kind {
        ObjectKind::Flag => SceneEvent::OpenDetail,
        ObjectKind::BackButton => SceneEvent::Back,
        _ if selected == Some(&id) => SceneEvent::Enter(id),
        _ => SceneEvent::Select(id),
    }
}
