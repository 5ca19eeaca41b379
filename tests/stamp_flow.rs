// End-to-end: stamp two surfaces the way the input layer would, then compare.

use stamp_match::{
    CompareConfig, ContactSample, GestureEvent, GestureKind, Mode, RasterBuffer, StampSurface, SurfaceConfig,
    compare, compare_with, has_content, stats,
};

fn surface() -> StampSurface {
    StampSurface::new(SurfaceConfig::default().with_size(120, 120))
}

/// Press, drag through `path`, release. Returns the finished stamp.
fn stamp(surface: &mut StampSurface, mode: Mode, path: &[(f32, f32)]) -> RasterBuffer {
    let mut events = Vec::new();
    for (i, &(x, y)) in path.iter().enumerate() {
        let kind = if i == 0 { GestureKind::Start } else { GestureKind::Move };
        events.push(GestureEvent::new(kind, vec![ContactSample::from_mouse(x, y, i as u64 * 16)]));
    }
    events.push(GestureEvent::new(GestureKind::End, vec![]));

    let mut out = None;
    for ev in &events {
        if let Some(buf) = surface.handle(mode, ev) {
            out = Some(buf);
        }
    }
    out.expect("end event returns a stamp")
}

const BLOB: [(f32, f32); 6] = [(40.0, 40.0), (80.0, 42.0), (85.0, 70.0), (60.0, 88.0), (38.0, 75.0), (60.0, 60.0)];

#[test]
fn same_gesture_on_both_surfaces_matches_exactly() {
    let a = stamp(&mut surface(), Mode::Auto, &BLOB);
    let b = stamp(&mut surface(), Mode::Auto, &BLOB);
    assert!(has_content(&a));

    let r = compare(&a, &b, 0.0);
    assert_eq!(r.similarity_percent, 100.0);
    assert!(r.is_match);
    assert_eq!(r.total_pixels, 120 * 120);
}

#[test]
fn shifted_stamp_loses_similarity_but_passes_generous_tolerance() {
    let a = stamp(&mut surface(), Mode::Auto, &BLOB);
    let shifted: Vec<(f32, f32)> = BLOB.iter().map(|&(x, y)| (x + 4.0, y + 3.0)).collect();
    let b = stamp(&mut surface(), Mode::Auto, &shifted);

    let strict = compare(&a, &b, 0.0);
    assert!(strict.similarity_percent < 100.0);
    assert!(!strict.is_match);
    // edge pixels only count half, the rest of the sheet is blank on both
    assert!(strict.similarity_percent > 90.0);
    assert!(compare(&a, &b, 0.3).is_match);
}

#[test]
fn multi_touch_event_feeds_the_hull() {
    let mut s = surface();
    let fingers = vec![
        ContactSample::from_touch(30.0, 30.0, None, 5),
        ContactSample::from_touch(90.0, 30.0, None, 5),
        ContactSample::from_touch(90.0, 90.0, Some(0.8), 5),
        ContactSample::from_touch(30.0, 90.0, None, 5),
    ];
    s.handle(Mode::Auto, &GestureEvent::new(GestureKind::Start, fingers));
    assert_eq!(s.sample_count(), 4);
    let buf = s.handle(Mode::Auto, &GestureEvent::new(GestureKind::End, vec![])).unwrap();

    let st = stats(&buf);
    assert!(st.non_transparent_pixels > 2000);
    assert_eq!(buf.pixel(60, 60).map(|p| p[3]), Some(255));
    assert_eq!(buf.pixel(5, 5).map(|p| p[3]), Some(0));
}

#[test]
fn circle_versus_square_depends_on_tolerance() {
    let circle = stamp(&mut surface(), Mode::Circle, &[(60.0, 60.0)]);
    let square = stamp(&mut surface(), Mode::Square, &[(60.0, 60.0)]);

    let r = compare(&circle, &square, 0.0);
    assert!(r.similarity_percent < 100.0);
    assert!(!r.is_match);
    assert!(compare(&circle, &square, 0.1).is_match);
}

#[test]
fn different_surface_sizes_never_match() {
    let mut big = StampSurface::new(SurfaceConfig::default().with_size(200, 200));
    let a = stamp(&mut surface(), Mode::Circle, &[(60.0, 60.0)]);
    let b = stamp(&mut big, Mode::Circle, &[(60.0, 60.0)]);
    let r = compare_with(&a, &b, &CompareConfig::with_tolerance(1.0));
    assert_eq!(r.similarity_percent, 0.0);
    assert!(!r.is_match);
    assert_eq!(r.total_pixels, 40_000);
}

#[test]
fn clear_then_end_gives_blank_stamp_of_configured_size() {
    let mut s = surface();
    s.begin_gesture(Mode::Freehand, &[ContactSample::from_mouse(10.0, 10.0, 0)]);
    s.extend_gesture(&[ContactSample::from_mouse(100.0, 100.0, 16)]);
    s.clear();
    let buf = s.end_gesture();
    assert_eq!((buf.width(), buf.height()), (120, 120));
    assert!(!has_content(&buf));
    assert!(compare(&buf, &RasterBuffer::new(120, 120), 0.0).is_match);
}

#[test]
fn exported_png_round_trips_through_the_image_crate() {
    let a = stamp(&mut surface(), Mode::Auto, &BLOB);
    let path = std::env::temp_dir().join(format!("stamp_match_{}.png", std::process::id()));
    a.save_png(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    let _ = std::fs::remove_file(&path);
    let back = RasterBuffer::from_rgba(decoded.width(), decoded.height(), decoded.into_raw()).unwrap();
    assert_eq!(back, a);
}
