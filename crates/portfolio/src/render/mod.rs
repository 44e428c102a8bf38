//! Frame rendering: backdrop, scene objects projected through the camera, then overlays.

pub mod objects;
mod overlay;

pub use overlay::{detail_hit, detail_layout, DetailHit};

use anyhow::Result;
use catalog::{t, Language, Localized, Planet, Rgb};
use engine_core::{Lifetime, Transform};
use glam::{EulerRot, Vec2, Vec3};
use hecs::World;
use renderer::{Camera, GlyphAtlas, OverlayBuilder};

use crate::director::SceneDirector;
use crate::scenes::{Astronaut, Dust};
use crate::selectable::{self, DrawContext, Selectable};
use crate::state::{ObjectKind, Phase, SceneMode};
use crate::Portfolio;

const SPACE_TOP: Rgb = Rgb::new(3, 5, 18);
const SPACE_BOTTOM: Rgb = Rgb::new(12, 16, 44);
const STARFIELD_COUNT: usize = 400;
const STARFIELD_RADIUS: f32 = 400.0;
const GROUND_MARKS: usize = 24;
const ASTRONAUT_RADIUS: f32 = 0.9;
const LABEL_SIZE: f32 = 14.0;
const HINT_SIZE: f32 = 12.0;
const LABEL_GAP: f32 = 6.0;

/// Faces with Hangul coverage on common systems, tried in order.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/nanum/NanumGothic.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\malgun.ttf",
];

/// Bitmap ASCII glyphs plus the first face that loads: the configured one,
/// then the system candidates.
pub fn glyph_atlas(font_path: Option<&str>) -> GlyphAtlas {
    let mut glyphs = GlyphAtlas::new();
    for path in font_path.into_iter().chain(SYSTEM_FONTS.iter().copied()) {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if font_path == Some(path) {
                    log::warn!("Font {}: {}", path, e);
                }
                continue;
            }
        };
        match glyphs.load_font(bytes) {
            Ok(()) => {
                log::info!("Text face: {}", path);
                return glyphs;
            }
            Err(e) => log::warn!("Font {} unusable: {:#}", path, e),
        }
    }
    log::info!("No Hangul face found; Korean text is shown in English");
    glyphs
}

/// `text` in `lang`, or English when the glyph atlas cannot draw it.
pub fn localized<'a>(glyphs: &GlyphAtlas, text: &'a Localized, lang: Language) -> &'a str {
    let s = text.get(lang);
    if glyphs.covers(s) {
        s
    } else {
        text.get(Language::En)
    }
}

/// Literal pair version of [`localized`].
pub fn tr<'a>(glyphs: &GlyphAtlas, lang: Language, ko: &'a str, en: &'a str) -> &'a str {
    let s = t(lang, ko, en);
    if glyphs.covers(s) {
        s
    } else {
        en
    }
}

pub fn run(state: &mut Portfolio) -> Result<()> {
    let (output, mut encoder) = match state.renderer.begin_frame() {
        Ok(frame) => frame,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            state.renderer.reconfigure();
            return Ok(());
        }
        Err(wgpu::SurfaceError::Timeout) => {
            log::warn!("Surface timeout, skipping frame");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let output_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let (sw, sh) = state.renderer.dimensions();
    let mut b = OverlayBuilder::new(sw as f32, sh as f32);
    let time = state.time.elapsed_seconds();

    match state.director.current_planet() {
        Some(planet) if state.director.mode() == SceneMode::Surface => {
            draw_surface_backdrop(&mut b, &state.camera, planet);
        }
        _ => draw_space_backdrop(&mut b, &state.camera),
    }
    let glyphs = &mut state.renderer.glyphs;
    draw_scene(&mut b, glyphs, &state.world, &state.camera, &state.director, time);
    overlay::build(&mut b, glyphs, &state.director, &state.camera);

    state
        .renderer
        .render_overlay(&mut encoder, &output_view, &b.vertices, &b.indices, Some(wgpu::Color::BLACK));
    state.renderer.end_frame(output, encoder);
    Ok(())
}

/// Deep-space gradient with a fixed starfield far enough away to only move with camera rotation.
fn draw_space_backdrop(b: &mut OverlayBuilder, camera: &Camera) {
    let size = b.screen_size();
    b.add_rect_gradient(0.0, 0.0, size.x, size.y, SPACE_TOP.to_rgba(1.0), SPACE_BOTTOM.to_rgba(1.0));

    let golden = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    for i in 0..STARFIELD_COUNT {
        // Fibonacci sphere: even coverage without randomness.
        let y = 1.0 - (i as f32 + 0.5) / STARFIELD_COUNT as f32 * 2.0;
        let r = (1.0 - y * y).sqrt();
        let theta = golden * i as f32;
        let dir = Vec3::new(theta.cos() * r, y, theta.sin() * r);
        let Some((p, _)) = camera.world_to_screen(camera.position + dir * STARFIELD_RADIUS, size.x, size.y) else {
            continue;
        };
        let twinkle = 0.4 + 0.4 * ((i * 7919) % 100) as f32 / 100.0;
        let radius = if i % 17 == 0 { 1.8 } else { 1.0 };
        b.add_disc(p, radius, [0.9, 0.93, 1.0, twinkle], [0.9, 0.93, 1.0, 0.0]);
    }
}

/// Sky above the horizon, ground below, and scattered surface marks tinted by the planet.
fn draw_surface_backdrop(b: &mut OverlayBuilder, camera: &Camera, planet: &Planet) {
    let size = b.screen_size();
    let env = &planet.environment;

    let forward = camera.forward();
    let flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or(-Vec3::Z);
    let horizon = camera
        .world_to_screen(camera.position + flat * (camera.far * 0.5), size.x, size.y)
        .map_or(size.y * 0.5, |(p, _)| p.y)
        .clamp(0.0, size.y);

    b.add_rect_gradient(0.0, 0.0, size.x, horizon, env.sky.to_rgba(1.0), env.fog.to_rgba(1.0));
    b.add_rect_gradient(
        0.0,
        horizon,
        size.x,
        size.y - horizon,
        env.fog.mix(env.ground, 0.6).to_rgba(1.0),
        env.ground.mix(Rgb::BLACK, 0.25).to_rgba(1.0),
    );

    let mark = if env.has_feature("craters") {
        env.ground.mix(Rgb::BLACK, 0.35)
    } else {
        env.particle.mix(env.ground, 0.5)
    };
    let golden = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    for i in 0..GROUND_MARKS {
        let radius = 3.0 + (i as f32).sqrt() * 3.5;
        let theta = golden * i as f32;
        let world = Vec3::new(theta.cos() * radius, 0.0, theta.sin() * radius);
        let Some((p, depth)) = camera.world_to_screen(world, size.x, size.y) else {
            continue;
        };
        let r = camera.pixel_radius(0.4 + (i % 3) as f32 * 0.25, depth, size.y);
        b.add_ring(p, 0.0, r, 0.35, mark.to_rgba(0.6));
    }
}

struct DrawItem<'a> {
    depth: f32,
    ctx: DrawContext<'a>,
    draw: selectable::DrawFn,
    label: Option<&'a Localized>,
    hovered: bool,
    selected: bool,
    kind: ObjectKind,
}

fn draw_scene(
    b: &mut OverlayBuilder,
    glyphs: &mut GlyphAtlas,
    world: &World,
    camera: &Camera,
    director: &SceneDirector,
    time: f32,
) {
    let size = b.screen_size();
    let warping = matches!(director.phase(), Phase::Warping { .. });

    let mut query = world.query::<(&Transform, &Selectable)>();
    let mut items: Vec<DrawItem> = Vec::new();
    for (_, (transform, sel)) in query.iter() {
        let Some((center, depth)) = camera.world_to_screen(transform.position, size.x, size.y) else {
            continue;
        };
        let hovered = director.hovered() == Some(&sel.id);
        let selected = director.selected() == Some(&sel.id);
        items.push(DrawItem {
            depth,
            ctx: DrawContext {
                center,
                radius: camera.pixel_radius(sel.radius * transform.uniform_scale(), depth, size.y),
                emphasis: selectable::emphasis(sel.id.kind, hovered, selected, warping),
                appearance: &sel.appearance,
                time,
                roll: transform.rotation.to_euler(EulerRot::YXZ).0,
            },
            draw: sel.draw,
            label: sel.label.as_ref(),
            hovered,
            selected,
            kind: sel.id.kind,
        });
    }
    // Painter's order: far to near.
    items.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    let lang = director.language();
    for item in &items {
        (item.draw)(b, &item.ctx);
        if item.ctx.emphasis.scale > 0.0 {
            draw_label(b, glyphs, item, lang);
        }
    }

    let accent = director
        .current_planet()
        .map_or(Rgb::WHITE, |p| p.environment.particle);
    for (_, (transform, astronaut)) in world.query::<(&Transform, &Astronaut)>().iter() {
        if let Some((p, depth)) = camera.world_to_screen(transform.position, size.x, size.y) {
            let r = camera.pixel_radius(ASTRONAUT_RADIUS, depth, size.y);
            objects::draw_astronaut(b, p - Vec2::new(0.0, r), r, astronaut.roll, accent);
        }
    }

    for (_, (transform, dust, lifetime)) in world.query::<(&Transform, &Dust, &Lifetime)>().iter() {
        if let Some((p, depth)) = camera.world_to_screen(transform.position, size.x, size.y) {
            let r = camera.pixel_radius(transform.uniform_scale(), depth, size.y);
            let alpha = lifetime.remaining.clamp(0.0, 1.0) * 0.6;
            b.add_disc(p, r, dust.color.to_rgba(alpha), dust.color.to_rgba(0.0));
        }
    }
}

/// Caption under an object; a selected hologram also says how to launch.
fn draw_label(b: &mut OverlayBuilder, glyphs: &mut GlyphAtlas, item: &DrawItem, lang: Language) {
    let Some(label) = item.label else {
        return;
    };
    let alpha = if item.hovered || item.selected { 1.0 } else { 0.7 };
    let mut at = item.ctx.center + Vec2::new(0.0, item.ctx.scaled_radius() + LABEL_GAP + LABEL_SIZE * 0.5);
    let text = localized(glyphs, label, lang);
    b.add_text_centered(glyphs, at, text, LABEL_SIZE, [1.0, 1.0, 1.0, alpha]);

    if item.selected && item.kind == ObjectKind::Hologram {
        at.y += LABEL_SIZE + 2.0;
        let hint = tr(glyphs, lang, "클릭하여 출발", "Click to launch");
        b.add_text_centered(glyphs, at, hint, HINT_SIZE, item.ctx.appearance.glow.to_rgba(0.9));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_font_path_keeps_the_bitmap_face() {
        let glyphs = glyph_atlas(Some("/nonexistent/starfolio/face.ttf"));
        assert!(glyphs.covers("Back to Ship"));
    }

    #[test]
    fn uncovered_text_falls_back_to_english() {
        let glyphs = GlyphAtlas::new();
        let name = Localized::new("화성", "Mars");
        assert_eq!(localized(&glyphs, &name, Language::Ko), "Mars");
        assert_eq!(localized(&glyphs, &name, Language::En), "Mars");
        assert_eq!(tr(&glyphs, Language::Ko, "우주선으로", "Back to Ship"), "Back to Ship");
        let ascii = Localized::new("Go", "Go!");
        assert_eq!(localized(&glyphs, &ascii, Language::Ko), "Go");
    }
}
