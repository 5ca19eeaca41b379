// What you SEE now:
// • Two paper surfaces side by side. Press/drag/release the left mouse on one
//   to stamp it; the live footprint redraws while you drag.
// • Once both surfaces hold a stamp, the HUD shows similarity + MATCH / NO MATCH.
// • M cycles the capture mode of the surface under the cursor
//   (AUTO → CIRCLE → SQUARE → FREEHAND).
// • Up/Down change tolerance in 5 % steps (0–80 %). X clears both surfaces.
// • P exports both stamps as PNG plus a JSON report. ESC quits.

mod draw;

use draw::{Drawer, draw_crosshair, draw_frame, draw_text_5x7};
use minifb::Key;
use serde::Serialize;
use stamp_match::config::{DEFAULT_TOLERANCE, MAX_UI_TOLERANCE};
use stamp_match::{
    BufferStats, CompareConfig, ComparisonResult, ContactSample, Error, FrameBuffer, Mode, RasterBuffer,
    StampSurface, SurfaceConfig, compare, stats,
};
use std::time::Instant;

const SURFACE_SIZE: usize = 320; // each surface is square
const MARGIN: usize = 16;
const HUD_HEIGHT: usize = 40;
const DESK: u32 = 0x00_5A_5F_66; // background around the sheets
const PAPER: u32 = 0x00_FF_FF_FF;
const HUD_TEXT: u32 = 0x00_20_20_20;
const TOLERANCE_STEP: f32 = 5.0; // percent

/// Left edge of surface `i` in window pixels.
fn surface_origin(i: usize) -> (usize, usize) {
    (MARGIN + i * (SURFACE_SIZE + MARGIN), HUD_HEIGHT)
}

/// Which surface (if any) is under window position (mx, my), in its local coordinates.
fn hit_surface(mx: f32, my: f32) -> Option<(usize, f32, f32)> {
    (0..2).find_map(|i| {
        let (ox, oy) = surface_origin(i);
        let (lx, ly) = (mx - ox as f32, my - oy as f32);
        let inside = (0.0..SURFACE_SIZE as f32).contains(&lx) && (0.0..SURFACE_SIZE as f32).contains(&ly);
        inside.then_some((i, lx, ly))
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    modes: [Mode; 2],
    left: BufferStats,
    right: BufferStats,
    result: Option<ComparisonResult>,
}

/// Write `stamp_left.png`, `stamp_right.png` and `stamp_report.json` to the
/// working directory.
fn export(stamps: &[Option<RasterBuffer>; 2], modes: [Mode; 2], result: Option<ComparisonResult>) -> Result<(), Error> {
    let blank = RasterBuffer::new(SURFACE_SIZE as u32, SURFACE_SIZE as u32);
    let left = stamps[0].as_ref().unwrap_or(&blank);
    let right = stamps[1].as_ref().unwrap_or(&blank);
    left.save_png("stamp_left.png")?;
    right.save_png("stamp_right.png")?;

    let report = Report { modes, left: stats(left), right: stats(right), result };
    let json = serde_json::to_string_pretty(&report).map_err(|e| Error::ReportExport(e.to_string()))?;
    std::fs::write("stamp_report.json", json).map_err(|e| Error::ReportExport(format!("stamp_report.json: {e}")))?;
    log::info!("exported stamp_left.png, stamp_right.png, stamp_report.json");
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    /* --- Window + surfaces ---
       Visual: two blank sheets on a grey desk, HUD strip on top. */
    let win_w = 2 * SURFACE_SIZE + 3 * MARGIN;
    let win_h = HUD_HEIGHT + SURFACE_SIZE + MARGIN;
    let mut drawer = Drawer::new("Stamp Match", win_w, win_h)?;
    let mut screen = FrameBuffer::new(win_w, win_h, DESK);

    let surface_cfg = SurfaceConfig::default().with_size(SURFACE_SIZE as u32, SURFACE_SIZE as u32);
    let mut surfaces = [StampSurface::new(surface_cfg), StampSurface::new(surface_cfg)];
    let mut modes = [Mode::Auto, Mode::Auto];
    let mut stamps: [Option<RasterBuffer>; 2] = [None, None];
    let mut result: Option<ComparisonResult> = None;
    let mut tolerance_pct = DEFAULT_TOLERANCE * 100.0;

    /* --- Gesture tracking ---
       Visual: whichever sheet you pressed on keeps receiving the drag, even if
       the cursor wanders off it. */
    let mut active: Option<usize> = None;
    let mut last_pos: Option<(f32, f32)> = None;
    let started = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now_ms = started.elapsed().as_millis() as u64;
        let mouse = drawer.mouse_pos();
        let mut recompare = false;

        /* 1) Keys */
        if drawer.pressed_once(Key::M) {
            // visual: the mode label above the hovered sheet changes
            if let Some((i, _, _)) = mouse.and_then(|(mx, my)| hit_surface(mx, my)) {
                modes[i] = modes[i].next();
                log::info!("surface {i}: mode {}", modes[i]);
            }
        }
        if drawer.pressed_once(Key::X) {
            // visual: both sheets go blank, result disappears
            for s in &mut surfaces { s.clear(); }
            stamps = [None, None];
            result = None;
            active = None;
        }
        if drawer.pressed_once(Key::Up) {
            tolerance_pct = (tolerance_pct + TOLERANCE_STEP).min(MAX_UI_TOLERANCE * 100.0);
            recompare = true;
        }
        if drawer.pressed_once(Key::Down) {
            tolerance_pct = (tolerance_pct - TOLERANCE_STEP).max(0.0);
            recompare = true;
        }

        /* 2) Pointer → gesture events
           Visual: press stamps, drag grows the footprint, release finalizes. */
        match (drawer.left_mouse_down(), active) {
            (true, None) => {
                if let Some((i, lx, ly)) = mouse.and_then(|(mx, my)| hit_surface(mx, my)) {
                    surfaces[i].begin_gesture(modes[i], &[ContactSample::from_mouse(lx, ly, now_ms)]);
                    active = Some(i);
                    last_pos = mouse;
                }
            }
            (true, Some(i)) => {
                if let Some((mx, my)) = mouse.filter(|p| Some(*p) != last_pos) {
                    let (ox, oy) = surface_origin(i);
                    let sample = ContactSample::from_mouse(mx - ox as f32, my - oy as f32, now_ms);
                    surfaces[i].extend_gesture(&[sample]);
                    last_pos = mouse;
                }
            }
            (false, Some(i)) => {
                stamps[i] = Some(surfaces[i].end_gesture());
                active = None;
                recompare = true;
            }
            (false, None) => {}
        }

        /* 3) Compare once both sheets hold a stamp */
        if recompare {
            result = match &stamps {
                [Some(a), Some(b)] => {
                    let cfg = CompareConfig::from_percent(tolerance_pct);
                    let r = compare(a, b, cfg.tolerance);
                    log::info!(
                        "similarity {:.1}% at tolerance {:.0}% → {}",
                        r.similarity_percent,
                        tolerance_pct,
                        if r.is_match { "MATCH" } else { "NO MATCH" }
                    );
                    Some(r)
                }
                _ => None,
            };
        }

        if drawer.pressed_once(Key::P) {
            if let Err(e) = export(&stamps, modes, result) {
                log::error!("{e}");
            }
        }

        /* 4) Paint the frame: desk, sheets with their stamps, HUD, crosshair */
        screen.fill(DESK);
        for (i, surface) in surfaces.iter().enumerate() {
            let (ox, oy) = surface_origin(i);
            surface.preview().composite_onto(&mut screen, ox, oy, PAPER);
            draw_frame(&mut screen, ox as i32, oy as i32, SURFACE_SIZE as i32, SURFACE_SIZE as i32, 0x00_30_30_30);
            let label = format!("{} {}", if i == 0 { "L" } else { "R" }, modes[i]);
            draw_text_5x7(&mut screen, ox as i32, (HUD_HEIGHT - 12) as i32, &label, PAPER);
        }

        // HUD strip
        for p in &mut screen.pixels[..win_w * (HUD_HEIGHT - 16)] { *p = 0x00_EE_EE_EE; }
        let verdict = match result {
            Some(r) => format!(
                "SIM {:.1}% | {} | PX {:.1}/{}",
                r.similarity_percent,
                if r.is_match { "MATCH" } else { "NO MATCH" },
                r.matching_pixels,
                r.total_pixels
            ),
            None => String::from("STAMP BOTH SHEETS"),
        };
        let hud = format!("TOL {:.0}% | {} | M MODE  X CLEAR  P EXPORT", tolerance_pct, verdict);
        draw_text_5x7(&mut screen, 8, 8, &hud, HUD_TEXT);

        if let Some((mx, my)) = mouse {
            draw_crosshair(&mut screen, mx as i32, my as i32, 10, 0x00_E0_40_40); // visual: red + at cursor
        }

        /* 5) Present */
        drawer.present(&screen)?;
    }

    Ok(())
}
