//! Draw callbacks for scene objects, in screen space around a projected centre.

use catalog::Rgb;
use glam::Vec2;
use renderer::OverlayBuilder;

use crate::layout::HOLOGRAM_SIZE;
use crate::selectable::DrawContext;

fn rotate(p: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    pivot + Vec2::from_angle(angle).rotate(p - pivot)
}

/// Axis-aligned box around `center`, rotated by `angle`.
fn add_box(b: &mut OverlayBuilder, center: Vec2, half: Vec2, angle: f32, pivot: Vec2, color: [f32; 4]) {
    let corners = [
        center + Vec2::new(-half.x, -half.y),
        center + Vec2::new(half.x, -half.y),
        center + Vec2::new(half.x, half.y),
        center + Vec2::new(-half.x, half.y),
    ]
    .map(|c| rotate(c, pivot, angle));
    b.add_quad(corners, [color; 4]);
}

/// Floating hologram screen: glowing frame, tinted glass, scanlines and a
/// miniature of its planet.
pub fn draw_hologram(b: &mut OverlayBuilder, ctx: &DrawContext) {
    let r = ctx.scaled_radius();
    if r < 1.0 {
        return;
    }
    let half = Vec2::new(r, r * HOLOGRAM_SIZE.1 / HOLOGRAM_SIZE.0);
    let top_left = ctx.center - half;
    let glow = ctx.appearance.glow;

    let border = r * 0.06;
    b.add_rect(
        top_left.x - border,
        top_left.y - border,
        half.x * 2.0 + border * 2.0,
        half.y * 2.0 + border * 2.0,
        glow.to_rgba(ctx.emphasis.glow),
    );
    b.add_rect_gradient(
        top_left.x,
        top_left.y,
        half.x * 2.0,
        half.y * 2.0,
        glow.mix(Rgb::BLACK, 0.7).to_rgba(0.55),
        glow.mix(Rgb::BLACK, 0.85).to_rgba(0.7),
    );

    let lines = 9;
    let scroll = (ctx.time * 0.5).fract();
    for i in 0..lines {
        let y = top_left.y + ((i as f32 + scroll) / lines as f32) * half.y * 2.0;
        b.add_rect(top_left.x, y, half.x * 2.0, 1.0, glow.to_rgba(0.08));
    }

    let planet_r = half.y * 0.55;
    b.add_disc(
        ctx.center,
        planet_r * 1.25,
        glow.to_rgba(ctx.emphasis.glow * 0.6),
        glow.to_rgba(0.0),
    );
    b.add_disc(
        ctx.center,
        planet_r,
        ctx.appearance.body.to_rgba(0.95),
        ctx.appearance.body.mix(Rgb::BLACK, 0.5).to_rgba(0.95),
    );
}

/// Launch capsule: glow, body, nose cone and a flickering exhaust.
pub fn draw_rocket(b: &mut OverlayBuilder, ctx: &DrawContext) {
    let r = ctx.scaled_radius();
    if r < 1.0 {
        return;
    }
    let c = ctx.center;
    let body = ctx.appearance.body;
    let glow = ctx.appearance.glow;

    b.add_disc(c, r * 1.4, glow.to_rgba(ctx.emphasis.glow), glow.to_rgba(0.0));

    let flicker = 0.8 + 0.2 * (ctx.time * 23.0).sin();
    let tail = c + Vec2::new(0.0, r * (1.2 + 0.5 * flicker));
    b.add_streak(
        c + Vec2::new(0.0, r * 0.7),
        tail,
        r * 0.35,
        [1.0, 0.75, 0.3, 0.9],
        [1.0, 0.3, 0.1, 0.0],
    );

    let half = Vec2::new(r * 0.28, r * 0.7);
    b.add_rect_gradient(
        c.x - half.x,
        c.y - half.y,
        half.x * 2.0,
        half.y * 2.0,
        body.mix(Rgb::WHITE, 0.25).to_rgba(1.0),
        body.mix(Rgb::BLACK, 0.35).to_rgba(1.0),
    );
    let nose = c - Vec2::new(0.0, half.y + r * 0.45);
    b.add_quad(
        [
            nose,
            nose,
            c + Vec2::new(half.x, -half.y),
            c + Vec2::new(-half.x, -half.y),
        ],
        [glow.to_rgba(1.0); 4],
    );
    b.add_disc(
        c - Vec2::new(0.0, half.y * 0.3),
        half.x * 0.55,
        [0.75, 0.9, 1.0, 1.0],
        [0.3, 0.45, 0.6, 1.0],
    );
}

/// Planet seen through the viewport, with atmosphere, a drifting band and an optional ring.
pub fn draw_planet(b: &mut OverlayBuilder, ctx: &DrawContext) {
    let r = ctx.scaled_radius();
    if r < 0.5 {
        return;
    }
    let c = ctx.center;
    let body = ctx.appearance.body;
    let glow = ctx.appearance.glow;

    b.add_disc(c, r * 1.3, glow.to_rgba(ctx.emphasis.glow), glow.to_rgba(0.0));
    if ctx.appearance.ring {
        b.add_ring(c, r * 1.35, r * 1.9, 0.3, body.mix(Rgb::WHITE, 0.3).to_rgba(0.5));
    }
    b.add_disc(c, r, body.mix(Rgb::WHITE, 0.15).to_rgba(1.0), body.mix(Rgb::BLACK, 0.55).to_rgba(1.0));

    // Band drifts with the spin and wraps across the disc.
    let drift = (ctx.roll / std::f32::consts::TAU).rem_euclid(1.0) * 2.0 - 1.0;
    let band_c = c + Vec2::new(drift * r * 0.5, r * 0.2);
    b.add_disc(band_c, r * 0.25, glow.to_rgba(0.25), glow.to_rgba(0.0));
}

/// Planted flag marking the project on the surface.
pub fn draw_flag(b: &mut OverlayBuilder, ctx: &DrawContext) {
    let r = ctx.scaled_radius();
    if r < 1.0 {
        return;
    }
    let base = ctx.center + Vec2::new(0.0, r);
    let top = ctx.center - Vec2::new(0.0, r);
    let pole_w = (r * 0.05).max(1.5);
    b.add_rect(base.x - pole_w * 0.5, top.y, pole_w, r * 2.0, [0.85, 0.85, 0.85, 1.0]);

    let wave = (ctx.time * 3.0).sin() * r * 0.08;
    let w = r * 1.1;
    let h = r * 0.65;
    let cloth = ctx.appearance.body;
    b.add_quad(
        [
            top,
            top + Vec2::new(w, wave),
            top + Vec2::new(w, h + wave),
            top + Vec2::new(0.0, h),
        ],
        [
            cloth.to_rgba(1.0),
            cloth.mix(Rgb::BLACK, 0.25).to_rgba(1.0),
            cloth.mix(Rgb::BLACK, 0.25).to_rgba(1.0),
            cloth.to_rgba(1.0),
        ],
    );
    b.add_disc(
        top + Vec2::new(w * 0.5, h * 0.5 + wave * 0.5),
        h * 0.3 * (1.0 + ctx.emphasis.glow * 0.5),
        ctx.appearance.glow.to_rgba(0.9),
        ctx.appearance.glow.to_rgba(0.4),
    );
}

/// Round "return to ship" button with a left arrow.
pub fn draw_back_button(b: &mut OverlayBuilder, ctx: &DrawContext) {
    let r = ctx.scaled_radius();
    if r < 1.0 {
        return;
    }
    let c = ctx.center;
    let pulse = 0.5 + 0.5 * (ctx.time * 2.0).sin();
    b.add_disc(
        c,
        r * (1.3 + 0.1 * pulse),
        ctx.appearance.glow.to_rgba(ctx.emphasis.glow),
        ctx.appearance.glow.to_rgba(0.0),
    );
    b.add_disc(
        c,
        r,
        ctx.appearance.body.to_rgba(0.95),
        ctx.appearance.body.mix(Rgb::BLACK, 0.4).to_rgba(0.95),
    );

    let white = [1.0, 1.0, 1.0, 1.0];
    let tip = c - Vec2::new(r * 0.5, 0.0);
    b.add_streak(tip, c + Vec2::new(r * 0.5, 0.0), r * 0.16, white, white);
    b.add_streak(tip, tip + Vec2::new(r * 0.35, -r * 0.35), r * 0.16, white, white);
    b.add_streak(tip, tip + Vec2::new(r * 0.35, r * 0.35), r * 0.16, white, white);
}

/// Astronaut in a white suit, rolled by `roll` around its centre.
pub fn draw_astronaut(b: &mut OverlayBuilder, center: Vec2, radius: f32, roll: f32, accent: Rgb) {
    if radius < 1.0 {
        return;
    }
    let suit = [0.93, 0.93, 0.95, 1.0];
    let shade = [0.7, 0.7, 0.75, 1.0];

    add_box(b, center + Vec2::new(0.0, radius * 0.15), Vec2::new(radius * 0.45, radius * 0.5), roll, center, suit);
    add_box(
        b,
        center + Vec2::new(0.0, radius * 0.1),
        Vec2::new(radius * 0.5, radius * 0.35),
        roll,
        center,
        shade,
    );
    for side in [-1.0, 1.0] {
        add_box(
            b,
            center + Vec2::new(side * radius * 0.2, radius * 0.85),
            Vec2::new(radius * 0.14, radius * 0.25),
            roll,
            center,
            suit,
        );
    }
    add_box(
        b,
        center + Vec2::new(0.0, radius * 0.15),
        Vec2::new(radius * 0.18, radius * 0.12),
        roll,
        center,
        accent.to_rgba(1.0),
    );

    let head = rotate(center - Vec2::new(0.0, radius * 0.55), center, roll);
    b.add_disc(head, radius * 0.4, suit, shade);
    let visor = rotate(center - Vec2::new(0.0, radius * 0.52), center, roll);
    b.add_disc(visor, radius * 0.26, [0.15, 0.25, 0.45, 1.0], [0.05, 0.08, 0.2, 1.0]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectable::{Appearance, Emphasis};

    fn ctx(appearance: &Appearance, scale: f32) -> DrawContext<'_> {
        DrawContext {
            center: Vec2::new(200.0, 150.0),
            radius: 40.0,
            emphasis: Emphasis { scale, glow: 0.2 },
            appearance,
            time: 1.25,
            roll: 0.3,
        }
    }

    #[test]
    fn every_draw_fn_emits_valid_geometry() {
        let mut appearance = Appearance::new(Rgb::new(200, 80, 20), Rgb::new(255, 200, 120));
        appearance.ring = true;
        let fns: [fn(&mut OverlayBuilder, &DrawContext); 5] =
            [draw_hologram, draw_rocket, draw_planet, draw_flag, draw_back_button];
        for draw in fns {
            let mut b = OverlayBuilder::new(400.0, 300.0);
            draw(&mut b, &ctx(&appearance, 1.0));
            assert!(!b.is_empty());
            assert!(b.indices.iter().all(|&i| (i as usize) < b.vertices.len()));
        }
    }

    #[test]
    fn collapsed_objects_draw_nothing() {
        let appearance = Appearance::new(Rgb::WHITE, Rgb::WHITE);
        let mut b = OverlayBuilder::new(400.0, 300.0);
        draw_hologram(&mut b, &ctx(&appearance, 0.0));
        assert!(b.is_empty());
    }

    #[test]
    fn rotation_keeps_distance_to_pivot() {
        let p = rotate(Vec2::new(10.0, 0.0), Vec2::ZERO, 1.0);
        assert!((p.length() - 10.0).abs() < 1e-4);
    }
}
