//! DriveDoc application icon generator.
//!
//! A procedural icon: an external drive whose face carries three coloured
//! spreadsheet rows, with a status LED in the corner. Rendered at any
//! resolution as RGBA pixel data for the window icon.

/// Generate the icon as egui `IconData`.
pub fn generate_icon(size: u32) -> egui::IconData {
    egui::IconData {
        rgba: render_icon(size),
        width: size,
        height: size,
    }
}

/// Render the icon into an RGBA pixel buffer (top-to-bottom row order).
pub fn render_icon(size: u32) -> Vec<u8> {
    let s = size as f32;
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    // ── Layout ──────────────────────────────────────────────────
    let (body_cx, body_cy) = (s * 0.5, s * 0.5);
    let (body_hw, body_hh) = (s * 0.40, s * 0.30);
    let body_radius = s * 0.08;

    // Rows sit on the upper part of the drive face.
    let rows: [(f32, [u8; 3]); 3] = [
        (0.32, [0x89, 0xb4, 0xfa]),
        (0.44, [0xa6, 0xe3, 0xa1]),
        (0.56, [0xf9, 0xe2, 0xaf]),
    ];
    let row_hh = s * 0.035;
    let (row_x0, row_x1) = (s * 0.20, s * 0.72);

    let (led_cx, led_cy) = (s * 0.76, s * 0.70);
    let led_radius = s * 0.045;

    // ── Per-pixel rendering ─────────────────────────────────────
    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            let body_d = rounded_rect_dist(px - body_cx, py - body_cy, body_hw, body_hh, body_radius);
            let alpha = smooth_edge(body_d, 0.0);
            if alpha <= 0.0 {
                continue;
            }

            // Body: slate, lighter toward the top.
            let grad = 1.0 - 0.25 * ((py - (body_cy - body_hh)) / (2.0 * body_hh)).clamp(0.0, 1.0);
            let mut c = [
                (0x58 as f32 * grad) as u8,
                (0x5b as f32 * grad) as u8,
                (0x70 as f32 * grad) as u8,
            ];

            // Rim.
            let rim = smooth_edge_inv(body_d, -s * 0.025);
            c = lerp_rgb(c, [0x30, 0x32, 0x44], rim);

            for &(row_y, color) in &rows {
                let cy = s * row_y;
                let d = rounded_rect_dist(
                    px - (row_x0 + row_x1) / 2.0,
                    py - cy,
                    (row_x1 - row_x0) / 2.0,
                    row_hh,
                    row_hh * 0.5,
                );
                c = lerp_rgb(c, color, smooth_edge(d, 0.0));
            }

            let led_d = ((px - led_cx).powi(2) + (py - led_cy).powi(2)).sqrt();
            c = lerp_rgb(c, [0xa6, 0xe3, 0xa1], smooth_edge(led_d, led_radius));

            let idx = ((y * size + x) * 4) as usize;
            pixels[idx] = c[0];
            pixels[idx + 1] = c[1];
            pixels[idx + 2] = c[2];
            pixels[idx + 3] = (alpha * 255.0).clamp(0.0, 255.0) as u8;
        }
    }

    pixels
}

// ── Helpers ─────────────────────────────────────────────────────

/// Signed distance from a point (relative to the centre) to a rounded
/// rectangle with half extents `hw`, `hh` and corner radius `r`.
fn rounded_rect_dist(dx: f32, dy: f32, hw: f32, hh: f32, r: f32) -> f32 {
    let qx = dx.abs() - (hw - r);
    let qy = dy.abs() - (hh - r);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    outside + inside - r
}

/// Smooth anti-aliased edge (1 → 0 as `dist` crosses `edge`).
fn smooth_edge(dist: f32, edge: f32) -> f32 {
    let d = dist - edge;
    if d < -1.0 {
        1.0
    } else if d > 1.0 {
        0.0
    } else {
        0.5 - d * 0.5
    }
}

/// Inverted smooth edge (0 → 1 as `dist` crosses `edge` going up).
fn smooth_edge_inv(dist: f32, edge: f32) -> f32 {
    1.0 - smooth_edge(dist, edge)
}

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| (x as f32 * (1.0 - t) + y as f32 * t).clamp(0.0, 255.0) as u8;
    [ch(a[0], b[0]), ch(a[1], b[1]), ch(a[2], b[2])]
}
