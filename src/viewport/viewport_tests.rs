//! Tests for viewport geometry, zoom and navigation.

use super::*;
use crate::gesture::{Gesture, PinchDirection, PinchEventDetail, WheelDirection};
use crate::model::ViewportError;
use crate::zoom::ZoomBehavior;

// ===== Helpers =====

fn window() -> Size {
    Size::new(800.0, 600.0)
}

fn column(pages: &[(f64, f64)]) -> DocumentDimensions {
    let sizes: Vec<Size> = pages.iter().map(|(w, h)| Size::new(*w, *h)).collect();
    DocumentDimensions::single_column(&sizes)
}

fn empty() -> Viewport {
    Viewport::new(window(), ViewportOptions::default(), ZoomCoordinator::default())
}

/// A viewport with a document loaded and its load events drained.
fn loaded_with(window: Size, pages: &[(f64, f64)], zoom: ZoomCoordinator) -> Viewport {
    let mut viewport = Viewport::new(window, ViewportOptions::default(), zoom);
    viewport.set_document_dimensions(column(pages));
    viewport.take_events();
    viewport
}

fn loaded(pages: &[(f64, f64)]) -> Viewport {
    loaded_with(window(), pages, ZoomCoordinator::default())
}

/// Three 400x500 pages. Loads at zoom 1 in an 800x600 window.
fn three_pages() -> Viewport {
    loaded(&[(400.0, 500.0), (400.0, 500.0), (400.0, 500.0)])
}

/// Four 400x500 pages in two-up rows, loaded at zoom 1 in a 1000x600 window.
fn two_up() -> Viewport {
    let page = |x, y| Rect::new(x, y, 400.0, 500.0);
    let dimensions = DocumentDimensions {
        width: 800.0,
        height: 1000.0,
        layout_options: Some(LayoutOptions {
            two_up_view_enabled: true,
            ..LayoutOptions::default()
        }),
        page_dimensions: vec![
            page(0.0, 0.0),
            page(400.0, 0.0),
            page(0.0, 500.0),
            page(400.0, 500.0),
        ],
    };
    let mut viewport = Viewport::new(
        Size::new(1000.0, 600.0),
        ViewportOptions::default(),
        ZoomCoordinator::default(),
    );
    viewport.set_document_dimensions(dimensions);
    viewport.take_events();
    viewport
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn detail(x: f64, y: f64, start_scale_ratio: f64) -> PinchEventDetail {
    PinchEventDetail {
        center: Point::new(x, y),
        scale_ratio: Some(start_scale_ratio),
        start_scale_ratio: Some(start_scale_ratio),
        direction: Some(PinchDirection::from_scale_ratio(Some(start_scale_ratio))),
    }
}

// ===== Document load =====

#[test]
fn first_load_uses_default_zoom_when_page_fits() {
    let viewport = three_pages();

    assert_eq!(viewport.zoom(), 1.0);
    assert_eq!(viewport.position(), Point::ZERO);
    assert_eq!(viewport.content_size(), Size::new(400.0, 1500.0));
    assert_eq!(viewport.fitting_type(), FittingType::None);
}

#[test]
fn first_load_shrinks_to_fit_width_for_wide_pages() {
    let viewport = loaded(&[(1600.0, 1000.0)]);

    assert_close(viewport.zoom(), 0.5);
}

#[test]
fn reload_keeps_user_zoom() {
    let mut viewport = loaded(&[(1600.0, 1000.0)]);
    viewport.set_zoom(2.0);

    viewport.set_document_dimensions(column(&[(1600.0, 1000.0)]));

    assert_eq!(viewport.zoom(), 2.0);
}

#[test]
fn load_syncs_rotation_from_layout_options() {
    let mut dimensions = column(&[(400.0, 500.0)]);
    dimensions.layout_options = Some(LayoutOptions {
        default_page_orientation: 3,
        ..LayoutOptions::default()
    });
    let mut viewport = empty();

    viewport.set_document_dimensions(dimensions);

    assert_eq!(viewport.clockwise_rotations(), 3);
}

#[test]
fn hidden_frame_loads_at_zoom_zero_and_recovers_on_resize() {
    let mut viewport = loaded_with(
        Size::new(0.0, 0.0),
        &[(1600.0, 1000.0)],
        ZoomCoordinator::default(),
    );
    assert_eq!(viewport.zoom(), 0.0);
    assert_eq!(viewport.most_visible_page(), 0);

    viewport.resize(window());

    assert_close(viewport.zoom(), 0.5);
}

#[test]
fn empty_presets_fall_back_to_defaults() {
    let options = ViewportOptions {
        preset_zoom_factors: Vec::new(),
        ..ViewportOptions::default()
    };
    let viewport = Viewport::new(window(), options, ZoomCoordinator::default());

    assert_eq!(viewport.preset_zoom_factors(), &DEFAULT_PRESET_ZOOM_FACTORS[..]);
}

// ===== Zoom =====

#[test]
fn set_zoom_clamps_to_preset_range() {
    let mut viewport = three_pages();

    viewport.set_zoom(10.0);
    assert_eq!(viewport.zoom(), 5.0);

    viewport.set_zoom(0.01);
    assert_eq!(viewport.zoom(), 0.25);
}

#[test]
fn set_zoom_keeps_top_left_content_point() {
    let mut viewport = loaded(&[(400.0, 2000.0)]);
    viewport.set_position(Point::new(0.0, 500.0));

    viewport.set_zoom(2.0);

    assert_eq!(viewport.position(), Point::new(0.0, 1000.0));
    assert_eq!(viewport.content_size(), Size::new(800.0, 4000.0));
}

#[test]
fn set_zoom_clears_fitting_type() {
    let mut viewport = three_pages();
    viewport.fit_to_page();

    viewport.set_zoom(1.0);

    assert_eq!(viewport.fitting_type(), FittingType::None);
}

#[test]
fn zoom_in_and_out_step_through_presets() {
    let mut viewport = three_pages();

    viewport.zoom_in();
    assert_eq!(viewport.zoom(), 1.1);
    viewport.zoom_in();
    assert_eq!(viewport.zoom(), 1.25);
    viewport.zoom_out();
    viewport.zoom_out();
    assert_eq!(viewport.zoom(), 1.0);
    viewport.zoom_out();
    assert_eq!(viewport.zoom(), 0.9);
}

#[test]
fn zoom_in_from_between_presets_picks_next_preset() {
    let mut viewport = three_pages();
    viewport.set_zoom(1.05);

    viewport.zoom_in();

    assert_eq!(viewport.zoom(), 1.1);
}

#[test]
fn zoom_in_saturates_at_largest_preset() {
    let mut viewport = three_pages();
    viewport.set_zoom(5.0);

    viewport.zoom_in();
    assert_eq!(viewport.zoom(), 5.0);

    viewport.set_zoom(0.25);
    viewport.zoom_out();
    assert_eq!(viewport.zoom(), 0.25);
}

#[test]
fn zoom_mutation_queues_hooks_around_change() {
    let mut viewport = three_pages();

    viewport.set_zoom(2.0);
    let events = viewport.take_events();

    assert_eq!(events.len(), 3, "{events:?}");
    match (&events[0], &events[1], &events[2]) {
        (
            ViewportEvent::BeforeZoom(before),
            ViewportEvent::Changed(changed),
            ViewportEvent::AfterZoom(after),
        ) => {
            assert_eq!(before.zoom, 1.0);
            assert_eq!(changed.zoom, 2.0);
            assert_eq!(after.zoom, 2.0);
            assert!(after.user_initiated);
        }
        other => panic!("unexpected event order: {other:?}"),
    }
}

#[test]
fn zoom_without_document_only_queues_hooks() {
    let mut viewport = empty();

    viewport.set_zoom(2.0);
    let events = viewport.take_events();

    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], ViewportEvent::BeforeZoom(_)));
    assert!(matches!(events[1], ViewportEvent::AfterZoom(_)));
}

// ===== Fitting =====

#[test]
fn fit_to_width_without_scrollbars() {
    let mut viewport = loaded(&[(800.0, 500.0)]);

    viewport.fit_to_width();

    assert_close(viewport.zoom(), 1.0);
    assert_eq!(viewport.fitting_type(), FittingType::FitToWidth);
}

#[test]
fn fit_to_width_leaves_room_for_vertical_scrollbar() {
    let mut viewport = loaded(&[(400.0, 2000.0)]);

    viewport.fit_to_width();

    // (800 - 16) / 400
    assert_close(viewport.zoom(), 1.96);
}

#[test]
fn zero_size_document_fits_at_zoom_zero() {
    let mut viewport = loaded(&[(0.0, 0.0)]);

    for fitting_type in [
        FittingType::FitToWidth,
        FittingType::FitToPage,
        FittingType::FitToHeight,
    ] {
        viewport.set_fitting_type(fitting_type);

        assert_eq!(viewport.zoom(), 0.0, "{fitting_type:?}");
        assert_eq!(viewport.position(), Point::ZERO);
        for event in viewport.take_events() {
            if let ViewportEvent::AfterZoom(snapshot) = event {
                let message = crate::channel::ViewportMessage::from(&snapshot);
                let wire = serde_json::to_value(message).unwrap();
                assert_eq!(wire["zoom"], 0.0, "{fitting_type:?}");
            }
        }
    }
}

#[test]
fn zero_size_document_recovers_when_pages_grow() {
    let mut viewport = loaded(&[(0.0, 0.0)]);
    viewport.fit_to_width();

    viewport.set_document_dimensions(column(&[(400.0, 500.0)]));

    // (800 - 16) / 400
    assert_close(viewport.zoom(), 1.96);
    assert_eq!(viewport.position(), Point::ZERO);
}

#[test]
fn fit_to_page_fits_current_page_height() {
    let mut viewport = three_pages();

    viewport.fit_to_page();

    assert_close(viewport.zoom(), 1.2);
    assert_eq!(viewport.position(), Point::ZERO);
    assert_eq!(viewport.fitting_type(), FittingType::FitToPage);
}

#[test]
fn fit_to_height_scrolls_to_top_of_most_visible_page() {
    let mut viewport = three_pages();
    viewport.set_position(Point::new(0.0, 500.0));
    assert_eq!(viewport.most_visible_page(), 1);

    viewport.fit_to_height();

    assert_close(viewport.zoom(), 1.2);
    assert_close(viewport.position().y, 600.0);
}

#[test]
fn resize_reapplies_fitting_type() {
    let mut viewport = loaded(&[(400.0, 2000.0)]);
    viewport.fit_to_width();

    viewport.resize(Size::new(416.0, 600.0));

    assert_close(viewport.zoom(), 1.0);
    assert_eq!(viewport.fitting_type(), FittingType::FitToWidth);
}

#[test]
fn resize_is_not_user_initiated() {
    let mut viewport = loaded(&[(400.0, 2000.0)]);
    viewport.fit_to_width();
    viewport.take_events();

    viewport.resize(Size::new(416.0, 600.0));

    let after = viewport
        .take_events()
        .into_iter()
        .find_map(|event| match event {
            ViewportEvent::AfterZoom(snapshot) => Some(snapshot),
            _ => None,
        })
        .expect("resize re-fits inside a zoom mutation");
    assert!(!after.user_initiated);
}

#[test]
fn presentation_mode_resize_forces_fit_to_height() {
    let mut viewport = three_pages();
    viewport.set_presentation_mode(true);

    viewport.resize(window());

    assert_eq!(viewport.fitting_type(), FittingType::FitToHeight);
    assert_close(viewport.zoom(), 1.2);
    assert_eq!(viewport.position().y, 0.0);
}

#[test]
fn scrollbars_follow_zoomed_size() {
    let viewport = three_pages();

    assert_eq!(
        viewport.document_needs_scrollbars(1.0),
        Scrollbars {
            horizontal: false,
            vertical: true
        }
    );
    assert!(viewport.document_needs_scrollbars(2.5).horizontal);
}

// ===== Page lookup =====

#[test]
fn page_at_y_assigns_gaps_to_later_page() {
    let mut dimensions = column(&[(400.0, 100.0), (400.0, 100.0)]);
    dimensions.page_dimensions[1].y = 110.0;
    dimensions.height = 210.0;
    let mut viewport = empty();
    viewport.set_document_dimensions(dimensions);

    assert_eq!(viewport.page_at_y(50.0), 0);
    assert_eq!(viewport.page_at_y(105.0), 1);
    assert_eq!(viewport.page_at_y(5000.0), 1);
}

#[test]
fn most_visible_page_when_aligned_to_page() {
    let mut viewport = three_pages();

    viewport.set_position(Point::new(0.0, 500.0));

    assert_eq!(viewport.most_visible_page(), 1);
}

#[test]
fn most_visible_page_prefers_earlier_page_on_tie() {
    let mut viewport = loaded_with(
        Size::new(800.0, 500.0),
        &[(400.0, 500.0), (400.0, 500.0), (400.0, 500.0)],
        ZoomCoordinator::default(),
    );

    viewport.set_position(Point::new(0.0, 250.0));

    assert_eq!(viewport.most_visible_page(), 0);
}

#[test]
fn most_visible_page_without_document_is_zero() {
    let viewport = empty();

    assert_eq!(viewport.most_visible_page(), 0);
    assert!(viewport.snapshot().is_none());
}

#[test]
fn point_in_side_margin_is_outside_page() {
    let viewport = three_pages();

    assert!(!viewport.is_point_inside_page(Point::new(100.0, 10.0)));
    assert!(viewport.is_point_inside_page(Point::new(300.0, 10.0)));
    assert!(!viewport.is_point_inside_page(Point::new(700.0, 10.0)));
}

#[test]
fn page_screen_rect_excludes_shadow_and_centers_page() {
    let viewport = three_pages();

    assert_eq!(
        viewport.page_screen_rect(0),
        Rect::new(205.0, 3.0, 390.0, 490.0)
    );
    // Out of range resolves to the last page.
    assert_eq!(viewport.page_screen_rect(99).y, 1003.0);
}

#[test]
fn page_to_screen_flips_origin() {
    let viewport = three_pages();

    assert_eq!(
        viewport.convert_page_to_screen(0, Point::ZERO),
        Point::new(5.0, 493.0)
    );
}

#[test]
fn page_to_screen_honors_half_turn() {
    let mut viewport = three_pages();
    viewport.rotate_clockwise();
    viewport.rotate_clockwise();

    assert_eq!(
        viewport.convert_page_to_screen(0, Point::ZERO),
        Point::new(395.0, 3.0)
    );
}

// ===== Navigation =====

#[test]
fn go_to_page_leaves_room_for_toolbar() {
    let mut viewport = three_pages();

    viewport.go_to_page(1);

    assert_eq!(viewport.position(), Point::new(0.0, 444.0));
}

#[test]
fn go_to_page_in_paged_mode_has_no_toolbar_offset() {
    let mut viewport = three_pages();
    viewport.fit_to_page();

    viewport.go_to_page(1);

    assert_close(viewport.position().y, 600.0);
}

#[test]
fn go_to_page_clamps_page_index() {
    let mut viewport = three_pages();

    viewport.go_to_page(99);
    assert_eq!(viewport.position().y, 900.0);

    viewport.go_to_page(-5);
    assert_eq!(viewport.position().y, 0.0);
}

#[test]
fn go_to_page_and_xy_keeps_current_offset_for_missing_y() {
    let mut viewport = three_pages();
    viewport.set_position(Point::new(0.0, 120.0));

    viewport.go_to_page_and_xy(1, Some(0.0), None);

    assert_eq!(viewport.position().y, 620.0);
}

#[test]
fn navigate_to_destination_zooms_first() {
    let mut viewport = three_pages();

    viewport.handle_navigate_to_destination(1, Some(0.0), Some(0.0), Some(2.0));

    assert_eq!(viewport.zoom(), 2.0);
    assert_eq!(viewport.position().y, 1000.0 - DEFAULT_TOOLBAR_HEIGHT);
}

#[test]
fn navigate_to_destination_ignores_zero_zoom() {
    let mut viewport = three_pages();

    viewport.handle_navigate_to_destination(0, None, None, Some(0.0));

    assert_eq!(viewport.zoom(), 1.0);
}

#[test]
fn two_up_next_and_previous_move_by_rows() {
    let mut viewport = two_up();
    assert_eq!(viewport.most_visible_page(), 0);

    viewport.go_to_next_page();
    assert_eq!(viewport.most_visible_page(), 2);

    viewport.go_to_previous_page();
    assert_eq!(viewport.most_visible_page(), 0);
    assert_eq!(viewport.position().y, 0.0);
}

#[test]
fn wheel_gesture_turns_page() {
    let mut viewport = three_pages();

    viewport
        .dispatch_gesture(&Gesture::Wheel(WheelDirection::Down))
        .unwrap();

    assert_eq!(viewport.position().y, 444.0);
}

// ===== Scrolling =====

#[test]
fn scroll_by_queues_scrolled_then_changed() {
    let mut viewport = three_pages();

    viewport.scroll_by(Point::new(0.0, 100.0));
    let events = viewport.take_events();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0], ViewportEvent::Scrolled(Point::new(0.0, 100.0)));
    assert!(matches!(events[1], ViewportEvent::Changed(snapshot) if snapshot.position.y == 100.0));
}

#[test]
fn scroll_to_only_moves_given_axis() {
    let mut viewport = three_pages();
    viewport.set_position(Point::new(0.0, 300.0));

    viewport.scroll_to(PartialPoint {
        x: Some(5.0),
        y: None,
    });

    // Narrow content cannot scroll horizontally.
    assert_eq!(viewport.position(), Point::new(0.0, 300.0));
}

#[test]
fn scroll_past_end_clamps_without_event() {
    let mut viewport = three_pages();
    viewport.set_position(Point::new(0.0, 900.0));
    viewport.take_events();

    viewport.scroll_by(Point::new(0.0, 50.0));

    assert_eq!(viewport.position().y, 900.0);
    assert!(viewport.take_events().is_empty());
}

// ===== Pinch =====

#[test]
fn pinch_sequence_zooms_about_center() {
    let mut viewport = loaded(&[(400.0, 2000.0)]);

    viewport
        .pinch_zoom_start(&PinchEventDetail::at(Point::new(400.0, 300.0)))
        .unwrap();
    assert_eq!(viewport.pinch_phase(), PinchPhase::Start);

    viewport.pinch_zoom(&detail(400.0, 300.0, 2.0)).unwrap();
    assert_eq!(viewport.zoom(), 2.0);
    assert_eq!(viewport.pinch_phase(), PinchPhase::UpdateZoomIn);
    assert_eq!(viewport.pinch_center(), Some(Point::new(400.0, 300.0)));
    assert_eq!(viewport.pinch_pan_vector(), Some(Point::ZERO));
    assert_eq!(viewport.position(), Point::new(16.0, 300.0));

    viewport.pinch_zoom_end(&detail(400.0, 300.0, 2.0)).unwrap();
    assert_eq!(viewport.zoom(), 2.0);
    assert_eq!(viewport.pinch_phase(), PinchPhase::None);
    assert_eq!(viewport.pinch_center(), None);
    assert_eq!(viewport.pinch_pan_vector(), None);
    assert_eq!(viewport.position().y, 300.0);
}

#[test]
fn pinch_update_hooks_carry_phases() {
    let mut viewport = loaded(&[(400.0, 2000.0)]);
    viewport
        .pinch_zoom_start(&PinchEventDetail::at(Point::new(400.0, 300.0)))
        .unwrap();

    viewport.pinch_zoom(&detail(400.0, 300.0, 2.0)).unwrap();
    let events = viewport.take_events();

    let Some(ViewportEvent::BeforeZoom(before)) = events.first() else {
        panic!("expected BeforeZoom first: {events:?}");
    };
    assert_eq!(before.pinch_phase, PinchPhase::Start);
    let Some(ViewportEvent::AfterZoom(after)) = events.last() else {
        panic!("expected AfterZoom last: {events:?}");
    };
    assert_eq!(after.pinch_phase, PinchPhase::UpdateZoomIn);
    assert_eq!(after.pinch_center, Some(Point::new(400.0, 300.0)));
}

#[test]
fn pinch_out_sets_zoom_out_phase() {
    let mut viewport = three_pages();
    viewport
        .pinch_zoom_start(&PinchEventDetail::at(Point::new(400.0, 300.0)))
        .unwrap();

    viewport.pinch_zoom(&detail(400.0, 300.0, 0.5)).unwrap();

    assert_eq!(viewport.pinch_phase(), PinchPhase::UpdateZoomOut);
    assert_eq!(viewport.zoom(), 0.5);
}

#[test]
fn pinch_update_without_start_is_rejected() {
    let mut viewport = three_pages();

    let result = viewport.pinch_zoom(&detail(400.0, 300.0, 2.0));

    assert_eq!(
        result,
        Err(ViewportError::PinchNotActive {
            phase: PinchPhase::None
        })
    );
    assert_eq!(viewport.zoom(), 1.0);
    assert!(viewport.take_events().is_empty());
}

#[test]
fn pinch_end_without_start_is_rejected() {
    let mut viewport = three_pages();

    let result = viewport.pinch_zoom_end(&detail(400.0, 300.0, 1.0));

    assert!(matches!(result, Err(ViewportError::PinchNotActive { .. })));
}

#[test]
fn second_pinch_start_is_rejected() {
    let mut viewport = three_pages();
    let center = PinchEventDetail::at(Point::new(400.0, 300.0));
    viewport.pinch_zoom_start(&center).unwrap();

    let result = viewport.pinch_zoom_start(&center);

    assert_eq!(
        result,
        Err(ViewportError::PinchAlreadyActive {
            phase: PinchPhase::Start
        })
    );
}

#[test]
fn pinch_without_scale_leaves_zoom() {
    let mut viewport = three_pages();
    viewport
        .pinch_zoom_start(&PinchEventDetail::at(Point::new(400.0, 300.0)))
        .unwrap();

    viewport
        .pinch_zoom(&PinchEventDetail::at(Point::new(420.0, 300.0)))
        .unwrap();

    assert_eq!(viewport.zoom(), 1.0);
    assert_eq!(viewport.pinch_pan_vector(), Some(Point::new(-20.0, 0.0)));
}

#[test]
fn pinch_start_ignored_in_presentation_mode() {
    let mut viewport = three_pages();
    viewport.set_presentation_mode(true);

    viewport
        .pinch_zoom_start(&PinchEventDetail::at(Point::new(400.0, 300.0)))
        .unwrap();

    assert_eq!(viewport.pinch_phase(), PinchPhase::None);
}

// ===== Host zoom =====

#[test]
fn propagated_browser_zoom_rescales_position() {
    let mut viewport = loaded_with(
        window(),
        &[(400.0, 2000.0)],
        ZoomCoordinator::new(ZoomBehavior::PropagateParent, 1.0),
    );
    viewport.set_position(Point::new(0.0, 300.0));

    viewport.on_browser_zoom_change(2.0);

    assert_eq!(viewport.zoom(), 2.0);
    assert_eq!(viewport.internal_zoom(), 1.0);
    assert_eq!(viewport.position().y, 600.0);
}

#[test]
fn managed_zoom_requests_browser_zoom_once() {
    let mut viewport = loaded_with(
        window(),
        &[(400.0, 2000.0)],
        ZoomCoordinator::new(ZoomBehavior::Manage, 1.0),
    );

    viewport.set_zoom(2.0);
    let events = viewport.take_events();
    assert_eq!(events.last(), Some(&ViewportEvent::BrowserZoomRequested(2.0)));

    // Host echoes while the request is in flight.
    viewport.on_browser_zoom_change(1.5);
    assert_eq!(viewport.zoom(), 2.0);

    viewport.on_browser_zoom_applied(2.0);
    assert!(viewport
        .take_events()
        .iter()
        .all(|event| !matches!(event, ViewportEvent::BrowserZoomRequested(_))));
}

#[test]
fn managed_zoom_follows_host() {
    let mut viewport = loaded_with(
        window(),
        &[(400.0, 2000.0)],
        ZoomCoordinator::new(ZoomBehavior::Manage, 1.0),
    );

    viewport.on_browser_zoom_change(1.5);

    assert_eq!(viewport.zoom(), 1.5);
}

// ===== Rotation =====

#[test]
fn four_quarter_turns_restore_rotation() {
    let mut viewport = three_pages();

    for _ in 0..4 {
        viewport.rotate_clockwise();
    }
    assert_eq!(viewport.clockwise_rotations(), 0);

    assert_eq!(viewport.rotate_counterclockwise(), 3);
    assert_eq!(viewport.rotate_clockwise(), 0);
}

// ===== Keys =====

#[test]
fn page_down_scrolls_by_most_of_window() {
    let mut viewport = three_pages();

    assert!(viewport.handle_directional_key_event(&KeyEvent::new(Key::PageDown), false));

    assert_eq!(viewport.position().y, 600.0 * MIN_FRACTION_TO_STEP_WHEN_PAGING);
}

#[test]
fn page_down_in_paged_mode_jumps_to_next_page() {
    let mut viewport = three_pages();
    viewport.fit_to_page();

    viewport.handle_directional_key_event(&KeyEvent::new(Key::PageDown), false);

    assert_close(viewport.position().y, 600.0);
}

#[test]
fn shift_space_pages_up() {
    let mut viewport = three_pages();
    viewport.set_position(Point::new(0.0, 600.0));
    let event = KeyEvent {
        shift: true,
        ..KeyEvent::new(Key::Space)
    };

    viewport.handle_directional_key_event(&event, false);

    assert_eq!(viewport.position().y, 600.0 - 525.0);
}

#[test]
fn space_in_form_field_is_consumed_without_scrolling() {
    let mut viewport = three_pages();

    assert!(viewport.handle_directional_key_event(&KeyEvent::new(Key::Space), true));

    assert_eq!(viewport.position().y, 0.0);
}

#[test]
fn modified_page_keys_are_not_handled() {
    let mut viewport = three_pages();
    let event = KeyEvent {
        modifiers: true,
        ..KeyEvent::new(Key::PageUp)
    };

    assert!(!viewport.handle_directional_key_event(&event, false));
    assert!(!viewport.handle_directional_key_event(&KeyEvent::new(Key::Other), false));
}

#[test]
fn arrow_right_without_horizontal_scrollbar_turns_page() {
    let mut viewport = three_pages();

    viewport.handle_directional_key_event(&KeyEvent::new(Key::ArrowRight), false);

    assert_eq!(viewport.position().y, 444.0);
}

#[test]
fn arrow_down_scrolls_by_increment() {
    let mut viewport = three_pages();

    viewport.handle_directional_key_event(&KeyEvent::new(Key::ArrowDown), false);

    assert_eq!(viewport.position().y, SCROLL_INCREMENT);
}

#[test]
fn host_originated_arrow_does_not_scroll() {
    let mut viewport = three_pages();
    let event = KeyEvent {
        cross_frame: false,
        ..KeyEvent::new(Key::ArrowDown)
    };

    assert!(viewport.handle_directional_key_event(&event, false));

    assert_eq!(viewport.position().y, 0.0);
}

#[test]
fn key_event_deserializes_with_defaults() {
    let event: KeyEvent = serde_json::from_str(r#"{"key":"PageDown"}"#).unwrap();
    assert_eq!(event, KeyEvent::new(Key::PageDown));

    let unknown: KeyEvent = serde_json::from_str(r#"{"key":"F5","shift":true}"#).unwrap();
    assert_eq!(unknown.key, Key::Other);
}
