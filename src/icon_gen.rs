use crate::{
    densities::{default_densities, load_densities, Density},
    png::write_png,
    raster::{Canvas, Color},
};
use anyhow::{bail, ensure, Context, Result};
use std::path::{Path, PathBuf};

// Define Args struct for library compilation
#[derive(Debug, Default)]
pub struct Args {
    pub output: PathBuf,
    pub densities: Option<PathBuf>,
    pub png: Option<Vec<u32>>,
    pub square_only: bool,
    pub round_only: bool,
}

/// The two artwork variants written for every size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Square,
    Round,
}

impl Variant {
    pub fn round_mask(self) -> bool {
        self == Variant::Round
    }

    fn launcher_filename(self) -> &'static str {
        match self {
            Variant::Square => "ic_launcher.png",
            Variant::Round => "ic_launcher_round.png",
        }
    }

    fn custom_filename(self, size: u32) -> String {
        match self {
            Variant::Square => format!("{size}x{size}.png"),
            Variant::Round => format!("{size}x{size}_round.png"),
        }
    }
}

const BACKGROUND_TOP: [u8; 3] = [8, 16, 34];
const BACKGROUND_BOTTOM: [u8; 3] = [19, 42, 74];

const DIAL_RING: Color = Color::rgb(26, 56, 110);
const DIAL_RIM: Color = Color::rgb(47, 123, 255);
const DIAL_FACE: Color = Color::rgb(12, 18, 32);
const GLYPH: Color = Color::rgb(235, 242, 255);

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Render the launcher artwork at `size` x `size` pixels as RGBA8888.
///
/// Painting order is fixed: background, dial rings from the outside in,
/// the dumbbell bar, its two plates, then the optional circular mask.
pub fn render_icon(size: u32, round_mask: bool) -> Vec<u8> {
    let mut canvas = Canvas::new(size, size);
    let center = (size as f64 - 1.0) / 2.0;

    paint_background(&mut canvas, center, center);
    paint_dial(&mut canvas, size, center, center);
    paint_glyph(&mut canvas, size, center, center);
    if round_mask {
        apply_circular_mask(&mut canvas, size, center, center);
    }

    canvas.into_pixels()
}

/// Vertical gradient darkened by a radial vignette toward the corners.
fn paint_background(canvas: &mut Canvas, cx: f64, cy: f64) {
    let (width, height) = (canvas.width(), canvas.height());
    let max_distance = cx.hypot(cy);

    for y in 0..height {
        let t = if height > 1 {
            y as f64 / (height - 1) as f64
        } else {
            0.0
        };
        let base: [f64; 3] = std::array::from_fn(|i| {
            lerp(BACKGROUND_TOP[i] as f64, BACKGROUND_BOTTOM[i] as f64, t).round_ties_even()
        });

        for x in 0..width {
            let d = if max_distance > 0.0 {
                (x as f64 - cx).hypot(y as f64 - cy) / max_distance
            } else {
                0.0
            };
            let v = 1.0 - ((d - 0.15) / 0.85).clamp(0.0, 1.0) * 0.25;
            let channel = |i: usize| (base[i] * v) as u8;
            canvas.set_pixel(x, y, Color::rgb(channel(0), channel(1), channel(2)));
        }
    }
}

fn paint_dial(canvas: &mut Canvas, size: u32, cx: f64, cy: f64) {
    let dial_r = size as f64 * 0.34;
    canvas.fill_circle(cx, cy, dial_r * 1.12, DIAL_RING);
    canvas.fill_circle(cx, cy, dial_r * 1.02, DIAL_RIM);
    canvas.fill_circle(cx, cy, dial_r * 0.88, DIAL_FACE);
}

/// A horizontal bar flanked by two rounded plates.
fn paint_glyph(canvas: &mut Canvas, size: u32, cx: f64, cy: f64) {
    let s = size as f64;

    let bar_w = (s * 0.38) as i64;
    let bar_h = ((s * 0.06) as i64).max(2);
    let bar_x = (cx - bar_w as f64 / 2.0) as i64;
    let bar_y = (cy - bar_h as f64 / 2.0) as i64;
    canvas.fill_rounded_rect(bar_x, bar_y, bar_w, bar_h, bar_h / 2, GLYPH);

    let plate_w = ((s * 0.08) as i64).max(2);
    let plate_h = (s * 0.18) as i64;
    let gap = ((s * 0.02) as i64).max(2);
    let plate_y = (cy - plate_h as f64 / 2.0) as i64;
    // Corner radius is half the plate width; narrow plates (2-3px) get a
    // 1px radius rather than an oversized one spilling past the plate edge.
    let left_x = bar_x - plate_w - gap;
    let right_x = bar_x + bar_w + gap;
    canvas.fill_rounded_rect(left_x, plate_y, plate_w, plate_h, plate_w / 2, GLYPH);
    canvas.fill_rounded_rect(right_x, plate_y, plate_w, plate_h, plate_w / 2, GLYPH);
}

/// Make every pixel whose center lies outside the inscribed circle fully
/// transparent. Color channels are left untouched.
fn apply_circular_mask(canvas: &mut Canvas, size: u32, cx: f64, cy: f64) {
    let radius = size as f64 * 0.5 - 0.5;
    let r2 = radius * radius;

    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let dx = (x as f64 + 0.5) - cx;
            let dy = (y as f64 + 0.5) - cy;
            if dx * dx + dy * dy > r2 {
                canvas.set_alpha(x, y, 0);
            }
        }
    }
}

pub fn generate_icons(args: Args) -> Result<()> {
    let variants = selected_variants(&args)?;

    // Ensure the output directory exists
    std::fs::create_dir_all(&args.output).context("Can't create output directory")?;

    if let Some(sizes) = &args.png {
        generate_custom_sizes(sizes, &args.output, &variants)?;
    } else {
        let densities = match &args.densities {
            Some(path) => load_densities(path)?,
            None => default_densities()?,
        };
        generate_launcher_icons(&densities, &args.output, &variants)?;
    }

    println!("Generated launcher icons in: {}", args.output.display());
    Ok(())
}

fn selected_variants(args: &Args) -> Result<Vec<Variant>> {
    match (args.square_only, args.round_only) {
        (true, true) => bail!("--square-only and --round-only cannot be combined"),
        (true, false) => Ok(vec![Variant::Square]),
        (false, true) => Ok(vec![Variant::Round]),
        (false, false) => Ok(vec![Variant::Square, Variant::Round]),
    }
}

/// Write `ic_launcher.png` / `ic_launcher_round.png` into each density folder.
fn generate_launcher_icons(densities: &[Density], res_dir: &Path, variants: &[Variant]) -> Result<()> {
    println!("Generating Android launcher icons...");
    for density in densities {
        let mipmap_dir = res_dir.join(&density.folder);
        for &variant in variants {
            let output_path = mipmap_dir.join(variant.launcher_filename());
            write_icon(&output_path, density.size, variant)?;
            println!(
                "  ✓ Generated {}/{}",
                density.folder,
                variant.launcher_filename()
            );
        }
    }
    Ok(())
}

fn generate_custom_sizes(sizes: &[u32], out_dir: &Path, variants: &[Variant]) -> Result<()> {
    ensure!(
        sizes.iter().all(|&size| size > 0),
        "Icon size must be greater than zero"
    );

    println!("Generating custom PNG sizes...");
    for &size in sizes {
        for &variant in variants {
            let filename = variant.custom_filename(size);
            write_icon(&out_dir.join(&filename), size, variant)?;
            println!("  ✓ Generated {filename}");
        }
    }
    Ok(())
}

fn write_icon(path: &Path, size: u32, variant: Variant) -> Result<()> {
    log::debug!("Rendering {size}x{size} {variant:?} icon");
    let pixels = render_icon(size, variant.round_mask());
    write_png(path, size, size, &pixels)
        .with_context(|| format!("Failed to write PNG {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buf: &[u8], size: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * size + x) * 4) as usize;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    #[test]
    fn test_buffer_length() {
        for size in [1, 2, 3, 16, 48, 72] {
            assert_eq!(render_icon(size, false).len(), (size * size * 4) as usize);
            assert_eq!(render_icon(size, true).len(), (size * size * 4) as usize);
        }
        assert!(render_icon(0, true).is_empty());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(render_icon(96, true), render_icon(96, true));
        assert_eq!(render_icon(72, false), render_icon(72, false));
    }

    #[test]
    fn test_square_variant_is_opaque() {
        let buf = render_icon(48, false);
        assert!(buf.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_background_vignette_corners() {
        let buf = render_icon(48, false);
        // Top corners: gradient start (8, 16, 34) darkened to 75%.
        assert_eq!(pixel(&buf, 48, 0, 0), [6, 12, 25, 255]);
        assert_eq!(pixel(&buf, 48, 47, 0), [6, 12, 25, 255]);
        // Bottom corners: gradient end (19, 42, 74) darkened to 75%.
        assert_eq!(pixel(&buf, 48, 0, 47), [14, 31, 55, 255]);
    }

    #[test]
    fn test_dial_and_glyph_layers() {
        let buf = render_icon(48, false);
        // Bar crosses the center.
        assert_eq!(pixel(&buf, 48, 23, 23), [235, 242, 255, 255]);
        // Straight above the center: rim, then outer ring.
        assert_eq!(pixel(&buf, 48, 23, 7), [47, 123, 255, 255]);
        assert_eq!(pixel(&buf, 48, 23, 5), [26, 56, 110, 255]);
        // Between the bar and the rim the dial face shows through.
        assert_eq!(pixel(&buf, 48, 23, 12), [12, 18, 32, 255]);
    }

    #[test]
    fn test_round_mask() {
        let size = 48;
        let buf = render_icon(size, true);
        let center = (size as f64 - 1.0) / 2.0;
        let limit = size as f64 / 2.0 - 0.5;

        let mut opaque = 0;
        for y in 0..size {
            for x in 0..size {
                let dx = x as f64 + 0.5 - center;
                let dy = y as f64 + 0.5 - center;
                let alpha = pixel(&buf, size, x, y)[3];
                if dx * dx + dy * dy > limit * limit {
                    assert_eq!(alpha, 0, "({x}, {y}) should be masked");
                } else {
                    assert_eq!(alpha, 255, "({x}, {y}) should be opaque");
                    opaque += 1;
                }
            }
        }
        assert!(opaque > 0);
    }

    #[test]
    fn test_mask_only_touches_alpha() {
        let square = render_icon(72, false);
        let round = render_icon(72, true);
        for (a, b) in square.chunks(4).zip(round.chunks(4)) {
            assert_eq!(&a[..3], &b[..3]);
        }
    }

    #[test]
    fn test_plates_flank_the_bar() {
        let buf = render_icon(48, false);
        // Plates are 3px wide, 2px away from the bar on either side.
        assert_eq!(pixel(&buf, 48, 10, 23), [235, 242, 255, 255]);
        assert_eq!(pixel(&buf, 48, 35, 23), [235, 242, 255, 255]);
        assert_eq!(pixel(&buf, 48, 12, 23), [12, 18, 32, 255]);
        assert_eq!(pixel(&buf, 48, 13, 23), [12, 18, 32, 255]);
        // Plates are taller than the bar.
        assert_eq!(pixel(&buf, 48, 10, 20), [235, 242, 255, 255]);
        assert_eq!(pixel(&buf, 48, 23, 20), [12, 18, 32, 255]);
    }

    #[test]
    fn test_plate_corners_at_48() {
        let buf = render_icon(48, false);
        let glyph = [235, 242, 255, 255];

        // Left plate spans x 9..=11, y 19..=26 with a 1px corner radius:
        // only the four outermost corner pixels are cut away.
        for y in 19..=26 {
            for x in 9..=11 {
                let corner = (x == 9 || x == 11) && (y == 19 || y == 26);
                assert_eq!(pixel(&buf, 48, x, y) == glyph, !corner, "left plate ({x}, {y})");
            }
        }
        for y in 19..=26 {
            for x in 34..=36 {
                let corner = (x == 34 || x == 36) && (y == 19 || y == 26);
                assert_eq!(pixel(&buf, 48, x, y) == glyph, !corner, "right plate ({x}, {y})");
            }
        }

        // Cut corners show the dial underneath.
        assert_eq!(pixel(&buf, 48, 9, 19), [47, 123, 255, 255]);
        assert_eq!(pixel(&buf, 48, 11, 19), [12, 18, 32, 255]);
        assert_eq!(pixel(&buf, 48, 36, 26), [12, 18, 32, 255]);

        // Nothing above or below the plates.
        for x in (9..=11).chain(34..=36) {
            assert_ne!(pixel(&buf, 48, x, 18), glyph, "({x}, 18)");
            assert_ne!(pixel(&buf, 48, x, 27), glyph, "({x}, 27)");
        }
    }

    #[test]
    fn test_conflicting_variant_flags() {
        let args = Args {
            square_only: true,
            round_only: true,
            ..Default::default()
        };
        assert!(selected_variants(&args).is_err());
    }

    #[test]
    fn test_generate_launcher_icons_layout() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path().join("res");
        generate_icons(Args {
            output: res.clone(),
            ..Default::default()
        })
        .unwrap();

        for folder in ["mipmap-mdpi", "mipmap-hdpi", "mipmap-xhdpi", "mipmap-xxhdpi", "mipmap-xxxhdpi"] {
            assert!(res.join(folder).join("ic_launcher.png").is_file(), "{folder}");
            assert!(res.join(folder).join("ic_launcher_round.png").is_file(), "{folder}");
        }
    }

    #[test]
    fn test_custom_sizes_reject_zero() {
        let dir = tempfile::tempdir().unwrap();
        let result = generate_icons(Args {
            output: dir.path().to_path_buf(),
            png: Some(vec![16, 0]),
            square_only: true,
            ..Default::default()
        });
        assert!(result.is_err());
        assert!(!dir.path().join("16x16.png").exists());
    }
}
