//! Destination navigation end to end.

mod common;

use common::*;
use folio_viewer::{DestKind, Destination, PageData, ViewerError, Viewport};

fn xyz(page: u32, x: Option<f64>, y: Option<f64>, zoom: Option<f64>) -> Destination {
    Destination { page, kind: DestKind::Xyz { x, y, zoom } }
}

#[test]
fn xyz_inherits_x_from_the_triggering_context() {
    let mut viewer = viewer(&loaded_doc(10), 800.0, 600.0);

    // View position (50, 712) on page 0 inverts (identity CTM, y flip)
    // to document position (50, 80).
    viewer.viewport_mut().set_scroll(50.0, 712.0);

    assert!(viewer.navigate(&xyz(5, None, Some(300.0), Some(2.0)), Some(0)));
    assert_eq!(viewer.scale(), 2.0);

    // Resolved position (50, 300) flips to (50, 792 - 300) and scrolls at
    // scale 2: page 5 top is 5 * (1584 + 16) = 8000.
    assert_eq!(
        viewer.viewport().scroll_log.last(),
        Some(&(100.0, 8000.0 + 492.0 * 2.0))
    );
}

#[test]
fn navigating_to_an_unloaded_page_scrolls_twice() {
    let mut viewer = viewer(&stub_doc(10), 800.0, 600.0);
    let initial_scrolls = viewer.viewport().scroll_log.len();

    assert!(viewer.navigate(&xyz(5, Some(10.0), Some(700.0), None), None));

    // Phase one: approximate scroll to the page origin, and the target is
    // requested together with its prefetch window.
    assert_eq!(viewer.viewport().scroll_log.last(), Some(&(0.0, 5.0 * 808.0)));
    assert!(requested(&viewer).contains(&5));

    viewer
        .complete_load(5, Ok(loaded_frame(5)))
        .expect("fragment installs");

    // Phase two: exact scroll to (10, 792 - 700) once the page is in.
    let log = &viewer.viewport().scroll_log;
    assert_eq!(log.last(), Some(&(10.0, 5.0 * 808.0 + 92.0)));
    assert!(log.len() >= initial_scrolls + 2, "both phases must scroll");

    // The pending exact scroll is one-shot.
    let scrolls = viewer.viewport().scroll_log.len();
    viewer
        .complete_load(6, Ok(loaded_frame(6)))
        .expect("fragment installs");
    assert_eq!(viewer.viewport().scroll_log.len(), scrolls);
}

#[test]
fn fitr_corners_are_not_flipped() {
    let mut viewer = viewer(&loaded_doc(10), 800.0, 600.0);

    let dest = Destination {
        page: 2,
        kind: DestKind::FitR { left: 10.0, bottom: 700.0, right: 200.0, top: 30.0 },
    };
    assert!(viewer.navigate(&dest, None));

    // Scale is unchanged; the top-left corner lands directly.
    assert_eq!(viewer.scale(), 1.0);
    assert_eq!(viewer.viewport().scroll_log.last(), Some(&(10.0, 2.0 * 808.0 + 30.0)));
}

#[test]
fn fith_pins_x_and_flips_its_y() {
    let mut viewer = viewer(&loaded_doc(10), 800.0, 600.0);

    let dest = Destination { page: 1, kind: DestKind::FitH { y: Some(700.0) } };
    assert!(viewer.navigate(&dest, None));
    assert_eq!(viewer.viewport().scroll_log.last(), Some(&(0.0, 808.0 + 92.0)));
}

#[test]
fn unknown_target_page_declines() {
    let mut viewer = viewer(&loaded_doc(3), 800.0, 600.0);
    let scrolls = viewer.viewport().scroll_log.len();

    assert!(!viewer.navigate(&xyz(99, Some(0.0), Some(0.0), None), None));
    assert_eq!(viewer.viewport().scroll_log.len(), scrolls);
    assert_eq!(viewer.scale(), 1.0);
}

#[test]
fn malformed_detail_declines_and_wellformed_detail_navigates() {
    let mut viewer = viewer(&loaded_doc(10), 800.0, 600.0);

    assert!(!viewer.navigate_detail("[1,\"FitZ\"]", None));
    assert!(!viewer.navigate_detail("not json", None));
    assert!(viewer.navigate_detail("[4,\"XYZ\",null,300.0,2.0]", None));
    assert_eq!(viewer.scale(), 2.0);
}

#[test]
fn sparse_page_numbers_resolve_through_the_number_map() {
    let frames: Vec<_> = [10, 20, 30].iter().map(|&n| loaded_frame(n)).collect();
    let mut viewer = viewer(&frames, 800.0, 600.0);

    assert_eq!(viewer.page_index(20), Some(1));

    let dest = Destination { page: 20, kind: DestKind::Fit };
    assert!(viewer.navigate(&dest, None));
    assert_eq!(viewer.viewport().scroll_log.last(), Some(&(0.0, 808.0 + 792.0)));

    // Number 15 exists nowhere; default link behavior proceeds.
    let dest = Destination { page: 15, kind: DestKind::Fit };
    assert!(!viewer.navigate(&dest, None));
}

#[test]
fn degenerate_fetched_transform_is_surfaced_and_keeps_the_stub() {
    let mut viewer = viewer(&stub_doc(3), 800.0, 100.0);

    let mut broken = loaded_frame(0);
    broken.data = Some(PageData { ctm: [1.0, 2.0, 2.0, 4.0, 0.0, 0.0] });

    let err = viewer.complete_load(0, Ok(broken)).unwrap_err();
    assert!(matches!(err, ViewerError::Transform { index: 0, .. }));

    assert!(!viewer.page(0).expect("page exists").is_loaded());
    assert!(!viewer.is_loading(0));
}

#[test]
fn fragment_without_page_data_is_surfaced() {
    let mut viewer = viewer(&stub_doc(3), 800.0, 100.0);

    let err = viewer
        .complete_load(0, Ok(stub_frame(0)))
        .unwrap_err();
    assert!(matches!(err, ViewerError::StubFragment { index: 0 }));
    assert!(!viewer.is_loading(0));
}

#[test]
fn initial_scan_rejects_degenerate_preloaded_frames() {
    let mut frames = loaded_doc(2);
    frames[1].data = Some(PageData { ctm: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0] });

    let result = folio_viewer::Viewer::new(
        folio_viewer::ViewerConfig::default(),
        &frames,
        ScriptedViewport::new(800.0, 600.0),
        RecordingFetcher::default(),
        ManualTimer::default(),
    );
    assert!(matches!(result.unwrap_err(), ViewerError::Transform { index: 1, .. }));
}

#[test]
fn fit_destination_flips_through_the_page_height() {
    let mut viewer = viewer(&loaded_doc(4), 800.0, 600.0);

    let dest = Destination { page: 3, kind: DestKind::Fit };
    assert!(viewer.navigate(&dest, Some(0)));

    // Fit ignores context coordinates: the bottom-left origin goes through
    // the (identity) transform and the vertical flip, y' = 792 - 0.
    assert_eq!(viewer.viewport().scroll_log.last(), Some(&(0.0, 3.0 * 808.0 + 792.0)));
}
