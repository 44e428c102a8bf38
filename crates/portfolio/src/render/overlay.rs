//! Full-screen overlays: warp streaks, TV shutoff/turn-on panels and the project detail card.

use catalog::{Language, LinkIcon, Project, ProjectLink, Rgb};
use glam::{Vec2, Vec3};
use renderer::{Camera, GlyphAtlas, OverlayBuilder};

use super::{localized, tr};
use crate::director::SceneDirector;
use crate::transitions::{OverlayKind, Panels, WarpJump};

const WARP_STAR: Rgb = Rgb::new(0xaa, 0xcc, 0xff);
const WARP_STAR_OPACITY: f32 = 0.9;
/// Streak length per unit of star speed, in world units.
const WARP_TRAIL: f32 = 0.04;

const CARD_BG_TOP: Rgb = Rgb::new(20, 24, 48);
const CARD_BG_BOTTOM: Rgb = Rgb::new(8, 10, 24);
const TAG_COLOR: Rgb = Rgb::new(0, 200, 220);
const FEATURED: Rgb = Rgb::new(255, 200, 70);

const CARD_PAD: f32 = 24.0;
const HEADER_H: f32 = 56.0;
const LINK_H: f32 = 36.0;
const PILL_H: f32 = 22.0;
const PILL_PAD: f32 = 10.0;

/// Text line heights in pixels.
const TITLE_TEXT: f32 = 26.0;
const BADGE_TEXT: f32 = 12.0;
const META_TEXT: f32 = 13.0;
const BODY_TEXT: f32 = 17.0;
const LONG_TEXT: f32 = 14.0;
const HEADING_TEXT: f32 = 14.0;
const PILL_TEXT: f32 = 12.0;
const LINK_TEXT: f32 = 14.0;

/// Overlays in z-order. The detail card goes last so it covers everything.
pub fn build(b: &mut OverlayBuilder, glyphs: &mut GlyphAtlas, director: &SceneDirector, camera: &Camera) {
    let transitions = director.transitions();
    if director.is_overlay_active(OverlayKind::Warp) {
        draw_warp(b, &transitions.warp, camera);
    }
    if let Some(panels) = transitions.shutoff.panels() {
        draw_panels(b, panels);
    }
    if let Some(panels) = transitions.turnon.panels() {
        draw_panels(b, panels);
    }
    if let Some(project) = director.detail() {
        let accent = director
            .current_planet()
            .map_or(TAG_COLOR, |p| p.environment.particle);
        draw_detail(b, glyphs, project, accent, director.language());
    }
}

/// Stars live in camera space, so they are projected without the view transform.
fn draw_warp(b: &mut OverlayBuilder, warp: &WarpJump, camera: &Camera) {
    let size = b.screen_size();
    let projection = camera.projection_matrix();
    let project = |p: Vec3| -> Option<Vec2> {
        if p.z >= -camera.near {
            return None;
        }
        let clip = projection * p.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y))
    };

    let p = warp.timeline().progress();
    b.add_rect(0.0, 0.0, size.x, size.y, [0.0, 0.02, 0.08, 0.35 * (1.0 - p).min(p * 4.0).min(1.0)]);

    let speed = warp.current_speed();
    let head = WARP_STAR.to_rgba(WARP_STAR_OPACITY);
    let tail = WARP_STAR.to_rgba(0.0);
    for star in warp.stars() {
        let trail = Vec3::Z * (star.velocity * speed * WARP_TRAIL).max(0.05);
        let (Some(a), Some(t)) = (project(star.position), project(star.position - trail)) else {
            continue;
        };
        let width = (1.5 + star.position.z * 0.005).clamp(0.75, 1.5);
        b.add_streak(a, t, width, head, tail);
    }
}

fn draw_panels(b: &mut OverlayBuilder, panels: Panels) {
    let size = b.screen_size();
    let black = [0.0, 0.0, 0.0, 1.0];
    if panels.backdrop > 0.0 {
        b.add_rect(0.0, 0.0, size.x, size.y, [1.0, 1.0, 1.0, panels.backdrop]);
    }
    b.add_rect(0.0, 0.0, size.x, size.y * panels.top, black);
    b.add_rect(0.0, size.y * (1.0 - panels.bottom), size.x, size.y * panels.bottom, black);
    b.add_rect(0.0, 0.0, size.x * panels.left, size.y, black);
    b.add_rect(size.x * (1.0 - panels.right), 0.0, size.x * panels.right, size.y, black);
}

/// Axis-aligned screen rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
}

/// Clickable parts of the detail card. Shared by drawing and hit-testing.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailLayout {
    pub card: Rect,
    pub close: Vec2,
    pub close_radius: f32,
    pub links: Vec<(Rect, ProjectLink)>,
}

/// What a click on the detail overlay lands on.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailHit {
    Link(String),
    Close,
    /// Inside the card but on nothing clickable.
    Card,
    Backdrop,
}

pub fn detail_layout(size: Vec2, project: &Project) -> DetailLayout {
    let w = (size.x * 0.85).min(760.0);
    let h = (size.y * 0.85).min(560.0);
    let card = Rect::new((size.x - w) * 0.5, (size.y - h) * 0.5, w, h);

    let links = project.all_links();
    let button_w = ((w - CARD_PAD * 2.0) / links.len().max(1) as f32 - 8.0).min(180.0);
    let by = card.y + h - CARD_PAD - LINK_H;
    let links = links
        .into_iter()
        .enumerate()
        .map(|(i, link)| {
            let bx = card.x + CARD_PAD + i as f32 * (button_w + 8.0);
            (Rect::new(bx, by, button_w, LINK_H), link)
        })
        .collect();

    DetailLayout {
        card,
        close: Vec2::new(card.x + w - HEADER_H * 0.5, card.y + HEADER_H * 0.5),
        close_radius: 14.0,
        links,
    }
}

/// Links and the close button first; the backdrop closes, the card body does not.
pub fn detail_hit(layout: &DetailLayout, cursor: Vec2) -> DetailHit {
    if layout.close.distance(cursor) <= layout.close_radius {
        return DetailHit::Close;
    }
    if let Some((_, link)) = layout.links.iter().find(|(rect, _)| rect.contains(cursor)) {
        return DetailHit::Link(link.url.clone());
    }
    if layout.card.contains(cursor) {
        DetailHit::Card
    } else {
        DetailHit::Backdrop
    }
}

/// Technology pills wrapped to `width`, relative to the top-left of the block.
fn pill_rects(glyphs: &mut GlyphAtlas, technologies: &[String], width: f32) -> Vec<Rect> {
    let (mut cx, mut cy) = (0.0, 0.0);
    technologies
        .iter()
        .map(|tech| {
            let pill_w = (glyphs.measure(tech, PILL_TEXT) + PILL_PAD * 2.0).min(width);
            if cx > 0.0 && cx + pill_w > width {
                cx = 0.0;
                cy += PILL_H + 8.0;
            }
            let rect = Rect::new(cx, cy, pill_w, PILL_H);
            cx += pill_w + 8.0;
            rect
        })
        .collect()
}

/// Text cursor for the card body: left edge, current top, wrap width and the
/// lowest line top allowed.
struct Pen {
    x: f32,
    y: f32,
    width: f32,
    limit: f32,
}

impl Pen {
    /// Wrapped paragraph; stops at `limit`. Returns false when cut short.
    fn paragraph(
        &mut self,
        b: &mut OverlayBuilder,
        glyphs: &mut GlyphAtlas,
        text: &str,
        size: f32,
        color: [f32; 4],
    ) -> bool {
        let line_h = size * 1.45;
        for line in glyphs.wrap(text, size, self.width) {
            if self.y + size > self.limit {
                return false;
            }
            b.add_text(glyphs, self.x, self.y, &line, size, color);
            self.y += line_h;
        }
        true
    }
}

/// Dimmed backdrop and a centred card: title header in the planet colour,
/// period and team, the descriptions, technology pills and one button per link.
fn draw_detail(b: &mut OverlayBuilder, glyphs: &mut GlyphAtlas, project: &Project, accent: Rgb, lang: Language) {
    let size = b.screen_size();
    let layout = detail_layout(size, project);
    let Rect { x, y, w, h } = layout.card;
    let white = [1.0, 1.0, 1.0, 1.0];
    let dark = [0.1, 0.1, 0.15, 1.0];

    b.add_rect(0.0, 0.0, size.x, size.y, [0.0, 0.0, 0.0, 0.6]);
    b.add_rect(x - 2.0, y - 2.0, w + 4.0, h + 4.0, accent.to_rgba(0.5));
    b.add_rect_gradient(x, y, w, h, CARD_BG_TOP.to_rgba(0.97), CARD_BG_BOTTOM.to_rgba(0.97));
    b.add_rect_gradient(x, y, w, HEADER_H, accent.to_rgba(0.9), accent.mix(CARD_BG_TOP, 0.6).to_rgba(0.9));

    let close = layout.close;
    b.add_disc(close, layout.close_radius, [0.9, 0.9, 0.95, 1.0], [0.6, 0.6, 0.7, 1.0]);
    b.add_streak(close - Vec2::splat(5.0), close + Vec2::splat(5.0), 2.5, dark, dark);
    b.add_streak(close + Vec2::new(-5.0, 5.0), close + Vec2::new(5.0, -5.0), 2.5, dark, dark);

    let mut title_right = close.x - layout.close_radius - 12.0;
    if project.featured {
        let badge = tr(glyphs, lang, "대표 프로젝트", "Featured");
        let badge_w = glyphs.measure(badge, BADGE_TEXT) + PILL_PAD * 2.0;
        let bx = title_right - badge_w;
        let by = y + (HEADER_H - PILL_H) * 0.5;
        b.add_rect(bx, by, badge_w, PILL_H, FEATURED.to_rgba(0.95));
        b.add_text(glyphs, bx + PILL_PAD, by + (PILL_H - BADGE_TEXT) * 0.5, badge, BADGE_TEXT, dark);
        title_right = bx - 12.0;
    }

    // Long titles shrink to the room left in the header.
    let title = localized(glyphs, &project.title, lang);
    let room = (title_right - x - CARD_PAD).max(1.0);
    let natural = glyphs.measure(title, TITLE_TEXT);
    let title_size = if natural > room { TITLE_TEXT * room / natural } else { TITLE_TEXT };
    b.add_text(glyphs, x + CARD_PAD, y + (HEADER_H - title_size) * 0.5, title, title_size, white);

    for (rect, link) in &layout.links {
        b.add_rect(rect.x, rect.y, rect.w, rect.h, link_color(link.icon).to_rgba(0.85));
        let label = localized(glyphs, &link.label, lang);
        b.add_text_centered(glyphs, rect.center(), label, LINK_TEXT, white);
    }

    let inner = w - CARD_PAD * 2.0;
    let links_top = layout.links.first().map_or(y + h - CARD_PAD, |(r, _)| r.y) - 16.0;
    let pills = pill_rects(glyphs, &project.technologies, inner);
    let body_limit = match pills.last() {
        Some(last) => {
            let block_top = links_top - (last.y + last.h);
            for (rect, tech) in pills.iter().zip(&project.technologies) {
                let (px, py) = (x + CARD_PAD + rect.x, block_top + rect.y);
                b.add_rect(px, py, rect.w, rect.h, TAG_COLOR.to_rgba(0.25));
                b.add_rect(px, py + rect.h - 2.0, rect.w, 2.0, TAG_COLOR.to_rgba(0.8));
                b.add_text(glyphs, px + PILL_PAD, py + (rect.h - PILL_TEXT) * 0.5, tech, PILL_TEXT, white);
            }
            let heading_y = block_top - 8.0 - HEADING_TEXT;
            let heading = tr(glyphs, lang, "사용 기술", "Technologies Used");
            b.add_text(glyphs, x + CARD_PAD, heading_y, heading, HEADING_TEXT, TAG_COLOR.to_rgba(1.0));
            heading_y - 12.0
        }
        None => links_top,
    };

    let mut pen = Pen {
        x: x + CARD_PAD,
        y: y + HEADER_H + 16.0,
        width: inner,
        limit: body_limit,
    };
    let meta = match &project.team_size {
        Some(team) => format!("{}  |  {}", project.period, team),
        None => project.period.clone(),
    };
    if !pen.paragraph(b, glyphs, &meta, META_TEXT, [0.65, 0.68, 0.78, 1.0]) {
        return;
    }
    pen.y += 6.0;
    let description = localized(glyphs, &project.description, lang);
    if !pen.paragraph(b, glyphs, description, BODY_TEXT, white) {
        return;
    }
    pen.y += 8.0;
    let long = localized(glyphs, &project.long_description, lang);
    pen.paragraph(b, glyphs, long, LONG_TEXT, [0.82, 0.84, 0.9, 1.0]);
}

fn link_color(icon: LinkIcon) -> Rgb {
    match icon {
        LinkIcon::Npm => Rgb::new(203, 56, 55),
        LinkIcon::Blog => Rgb::new(32, 201, 151),
        LinkIcon::Docs => Rgb::new(66, 133, 244),
        LinkIcon::Video => Rgb::new(255, 0, 0),
        LinkIcon::External => Rgb::new(120, 120, 140),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Catalog;

    #[test]
    fn black_panels_cover_the_screen() {
        let mut b = OverlayBuilder::new(800.0, 600.0);
        draw_panels(&mut b, Panels::BLACK);
        // White backdrop plus four panels.
        assert_eq!(b.indices.len(), 5 * 6);
        let top = &b.vertices[4..8];
        assert_eq!(top[2].position, [1.0, 0.0]);
    }

    fn draw(glyphs: &mut GlyphAtlas, project: &Project, lang: Language) -> OverlayBuilder {
        let mut b = OverlayBuilder::new(1280.0, 720.0);
        draw_detail(&mut b, glyphs, project, TAG_COLOR, lang);
        b
    }

    fn positions(b: &OverlayBuilder) -> Vec<[f32; 2]> {
        b.vertices.iter().map(|v| v.position).collect()
    }

    #[test]
    fn detail_text_follows_the_project() {
        let catalog = Catalog::builtin().unwrap();
        let project = catalog.find_project("3").unwrap();
        let mut glyphs = GlyphAtlas::new();
        let base = draw(&mut glyphs, project, Language::En);
        assert!(base.indices.iter().all(|&i| (i as usize) < base.vertices.len()));

        let mut retitled = project.clone();
        retitled.title.en = "Another Title".into();
        assert_ne!(positions(&draw(&mut glyphs, &retitled, Language::En)), positions(&base));

        let mut redescribed = project.clone();
        redescribed.description.en = "A different summary".into();
        assert_ne!(positions(&draw(&mut glyphs, &redescribed, Language::En)), positions(&base));

        let mut relabelled = project.clone();
        relabelled.links[0].label.en = "Docs".into();
        assert_ne!(positions(&draw(&mut glyphs, &relabelled, Language::En)), positions(&base));
    }

    #[test]
    fn korean_without_a_face_draws_english() {
        let catalog = Catalog::builtin().unwrap();
        let project = catalog.find_project("3").unwrap();
        let mut glyphs = GlyphAtlas::new();
        assert!(!glyphs.has_font());
        let ko = draw(&mut glyphs, project, Language::Ko);
        let en = draw(&mut glyphs, project, Language::En);
        assert_eq!(positions(&ko), positions(&en));
    }

    #[test]
    fn pills_wrap_inside_the_card() {
        let mut glyphs = GlyphAtlas::new();
        let techs: Vec<String> = ["TypeScript", "Next.js", "AWS (S3, CloudFront)", "Zustand", "Framer Motion"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let pills = pill_rects(&mut glyphs, &techs, 300.0);
        assert_eq!(pills.len(), techs.len());
        assert!(pills.iter().all(|r| r.x + r.w <= 300.0));
        assert!(pills.last().unwrap().y > 0.0);
        // Wider names get wider pills.
        assert!(pills[2].w > pills[1].w);
    }

    #[test]
    fn clicks_resolve_against_the_drawn_layout() {
        let catalog = Catalog::builtin().unwrap();
        let project = catalog.find_project("3").unwrap();
        let layout = detail_layout(Vec2::new(1280.0, 720.0), project);
        assert_eq!(layout.links.len(), 1);

        let (button, _) = &layout.links[0];
        assert_eq!(
            detail_hit(&layout, button.center()),
            DetailHit::Link("https://docs.s3cf.net".into())
        );
        assert_eq!(detail_hit(&layout, layout.close), DetailHit::Close);
        assert_eq!(detail_hit(&layout, layout.card.center()), DetailHit::Card);
        assert_eq!(detail_hit(&layout, Vec2::new(4.0, 4.0)), DetailHit::Backdrop);

        let mut glyphs = GlyphAtlas::new();
        let b = draw(&mut glyphs, project, Language::En);
        let button_corner = [
            button.x / 1280.0 * 2.0 - 1.0,
            1.0 - button.y / 720.0 * 2.0,
        ];
        assert!(positions(&b).iter().any(|p| (p[0] - button_corner[0]).abs() < 1e-5
            && (p[1] - button_corner[1]).abs() < 1e-5));
    }
}
