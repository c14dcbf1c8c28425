use super::*;

fn vertex(x: f32, y: f32, color: Vec4) -> ShadedVertex {
    ShadedVertex {
        position: Vec4::new(x, y, 0.5, 1.0),
        color,
    }
}

fn quad(x1: f32, y1: f32, color: Vec4) -> Vec<ShadedVertex> {
    vec![
        vertex(-1.0, -1.0, color),
        vertex(x1, -1.0, color),
        vertex(-1.0, y1, color),
        vertex(x1, y1, color),
    ]
}

fn draw(target: &mut RenderTarget, primitive: Primitive, verts: &[ShadedVertex], rule: RoundingRule) {
    for tri in assemble(primitive, verts).unwrap() {
        draw_triangle(target, &tri, rule);
    }
}

#[test]
fn strip_of_four_makes_two_triangles() {
    let v = quad(1.0, 1.0, Vec4::ZERO);
    let tris = assemble(Primitive::TriangleStrip, &v).unwrap();
    assert_eq!(tris.len(), 2);
    assert_eq!(tris[1][0], v[2]);
    assert_eq!(tris[1][1], v[1]);
    assert!(assemble(Primitive::Triangles, &v).is_err());
    assert!(assemble(Primitive::TriangleStrip, &v[..2]).is_err());
}

#[test]
fn single_pixel_quad_covers_only_the_origin() {
    let (w, h) = (400, 240);
    let mut t = RenderTarget::new(w, h);
    let x1 = -1.0 + 2.0 / w as f32;
    let y1 = -1.0 + 2.0 / h as f32;
    draw(
        &mut t,
        Primitive::TriangleStrip,
        &quad(x1, y1, Vec4::new(1.0, 0.0, 1.0, 1.0)),
        RoundingRule::default(),
    );

    assert_eq!(t.get(0, 0), Some([0xFF, 0x00, 0xFF, 0xFF]));
    for (x, y) in [(1, 0), (0, 1), (1, 1), (2, 2)] {
        assert_eq!(t.get(x, y), Some([0, 0, 0, 0]), "pixel ({x}, {y})");
    }
}

#[test]
fn full_screen_quad_covers_every_pixel() {
    let mut t = RenderTarget::new(16, 8);
    draw(
        &mut t,
        Primitive::TriangleStrip,
        &quad(1.0, 1.0, Vec4::splat(1.0)),
        RoundingRule::default(),
    );
    for y in 0..8 {
        for x in 0..16 {
            assert_eq!(t.get(x, y), Some([0xFF; 4]));
        }
    }
}

#[test]
fn flat_colors_quantize_with_the_target_rule() {
    let color = Vec4::new(0.5, 0.75, 0.0, 1.0);
    let mut nearest = RenderTarget::new(4, 4);
    draw(
        &mut nearest,
        Primitive::TriangleStrip,
        &quad(1.0, 1.0, color),
        RoundingRule::NearestTiesAway,
    );
    assert_eq!(nearest.get(3, 3), Some([0x80, 191, 0x00, 0xFF]));

    let mut truncated = RenderTarget::new(4, 4);
    draw(
        &mut truncated,
        Primitive::TriangleStrip,
        &quad(1.0, 1.0, color),
        RoundingRule::Truncate,
    );
    assert_eq!(truncated.get(3, 3), Some([0x7F, 191, 0x00, 0xFF]));
}

#[test]
fn colors_interpolate_across_the_triangle() {
    // Left edge black, right edge white; pixel centers sample 1/8, 3/8, ...
    let mut t = RenderTarget::new(4, 1);
    let black = Vec4::new(0.0, 0.0, 0.0, 1.0);
    let white = Vec4::splat(1.0);
    let verts = [
        vertex(-1.0, -1.0, black),
        vertex(1.0, -1.0, white),
        vertex(-1.0, 1.0, black),
        vertex(1.0, 1.0, white),
    ];
    draw(&mut t, Primitive::TriangleStrip, &verts, RoundingRule::default());
    let reds: Vec<u8> = (0..4).map(|x| t.get(x, 0).unwrap()[0]).collect();
    assert!(reds.windows(2).all(|w| w[0] < w[1]), "{reds:?}");
    assert!(reds[0] > 0 && reds[3] < 0xFF);
}

#[test]
fn degenerate_triangles_draw_nothing() {
    let mut t = RenderTarget::new(4, 4);
    let c = Vec4::splat(1.0);
    let tri = [vertex(-1.0, -1.0, c), vertex(0.0, 0.0, c), vertex(1.0, 1.0, c)];
    draw_triangle(&mut t, &tri, RoundingRule::default());
    assert_eq!(t, RenderTarget::new(4, 4));
}

#[test]
fn fill_and_bounds() {
    let mut t = RenderTarget::new(2, 2);
    t.fill([1, 2, 3, 4]);
    assert_eq!(t.get(1, 1), Some([1, 2, 3, 4]));
    assert_eq!(t.get(2, 0), None);
    assert_eq!((t.width(), t.height()), (2, 2));
}
