//! Integration tests for the annotation engine

use annotations_engine::events::{ElementState, InputEvent, Key, PhysicalPosition};
use annotations_engine::{
    build_display_list, CoordinateMapper, Drawing, DrawingPoint, DrawingStore, DrawingStyle,
    DrawingType, EngineConfig, EventResponse, InteractionState, LinearMapper, RenderCommand,
    SelectionController, Tool, UninitializedMapper, Viewport,
};
use serde_json::json;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Controller, host store and a clock that advances past the completion guard
struct Session {
    controller: SelectionController,
    store: Vec<Drawing>,
    mapper: LinearMapper,
    now: f64,
}

impl Session {
    fn new() -> Self {
        init_logging();
        Self {
            controller: SelectionController::new(EngineConfig::default()),
            store: Vec::new(),
            // 1 bar = 10px, 1 price unit = 4px, price 100 at y = 0
            mapper: LinearMapper::new((0.0, 100.0), (0.0, 100.0), 1000.0, 400.0),
            now: 1_000.0,
        }
    }

    fn tick(&mut self) -> f64 {
        self.now += 250.0;
        self.now
    }

    fn screen(&self, time: i64, price: f64) -> (f64, f64) {
        let p = self
            .mapper
            .to_screen(&DrawingPoint::new(time, price))
            .unwrap();
        (p.x, p.y)
    }

    fn down(&mut self, x: f64, y: f64) -> EventResponse {
        let now = self.tick();
        self.controller
            .pointer_down(&mut self.store, &self.mapper, x, y, now)
    }

    fn down_at(&mut self, time: i64, price: f64) -> EventResponse {
        let (x, y) = self.screen(time, price);
        self.down(x, y)
    }

    fn move_to(&mut self, x: f64, y: f64) -> EventResponse {
        self.controller
            .pointer_move(&mut self.store, &self.mapper, x, y)
    }

    fn frame(&mut self) -> EventResponse {
        self.controller
            .on_animation_frame(&mut self.store, &self.mapper)
    }

    fn up(&mut self) -> EventResponse {
        let now = self.tick();
        self.controller.pointer_up(&mut self.store, &self.mapper, now)
    }

    fn key(&mut self, key: Key) -> EventResponse {
        let now = self.tick();
        self.controller.key_down(&mut self.store, key, now)
    }

    fn click_at(&mut self, time: i64, price: f64) {
        self.down_at(time, price);
        self.up();
    }

    fn add(&mut self, drawing_type: DrawingType, points: &[(i64, f64)]) -> Drawing {
        let drawing = Drawing::new(
            drawing_type,
            points
                .iter()
                .map(|&(t, p)| DrawingPoint::new(t, p))
                .collect(),
            DrawingStyle::default(),
        );
        self.store.push(drawing.clone());
        drawing
    }
}

#[test]
fn test_each_tool_commits_after_its_arity() {
    for drawing_type in DrawingType::ALL {
        let mut s = Session::new();
        s.controller.set_tool(Tool::Draw(drawing_type));

        match drawing_type.required_clicks() {
            Some(clicks) => {
                for i in 0..clicks {
                    assert!(s.store.is_empty(), "{drawing_type} committed early");
                    s.click_at(10 + 10 * i as i64, 40.0 + 5.0 * i as f64);
                }
            }
            None => {
                s.down_at(10, 40.0);
                for i in 1..5 {
                    let (x, y) = s.screen(10 + i, 40.0 + i as f64);
                    s.move_to(x, y);
                }
                s.up();
            }
        }

        if drawing_type == DrawingType::Text {
            assert!(s.store.is_empty());
            assert!(s.controller.set_pending_text("Support"));
            s.key(Key::Enter);
        }

        assert_eq!(s.store.len(), 1, "{drawing_type}");
        let drawing = &s.store[0];
        assert_eq!(drawing.drawing_type, drawing_type);
        assert!(drawing.is_well_formed(), "{drawing_type}");
        assert_eq!(s.controller.tool(), Tool::Select, "{drawing_type}");
        assert_eq!(s.controller.state(), &InteractionState::Idle);
    }
}

#[test]
fn test_committed_drawings_use_preset_style() {
    let mut s = Session::new();
    s.controller.set_tool(Tool::Draw(DrawingType::BuyZone));
    s.click_at(10, 40.0);
    s.click_at(20, 60.0);

    let expected = s.controller.config().style_for(DrawingType::BuyZone);
    assert_eq!(s.store[0].style, expected);
    assert_eq!(
        s.store[0].points,
        vec![DrawingPoint::new(10, 40.0), DrawingPoint::new(20, 60.0)]
    );
}

#[test]
fn test_locked_tool_stays_active() {
    let mut s = Session::new();
    s.controller.set_locked(true);
    s.controller.set_tool(Tool::Draw(DrawingType::Trendline));

    for i in 0..3 {
        s.click_at(10 + i, 20.0);
        s.click_at(30 + i, 60.0);
    }

    assert_eq!(s.store.len(), 3);
    assert_eq!(s.controller.tool(), Tool::Draw(DrawingType::Trendline));
    assert!(matches!(
        s.controller.state(),
        InteractionState::Building(b) if b.points().is_empty()
    ));
}

#[test]
fn test_completion_guard_swallows_the_next_click() {
    let mut s = Session::new();
    s.controller.set_locked(true);
    s.controller.set_tool(Tool::Draw(DrawingType::Horizontal));

    let (x, y) = s.screen(10, 50.0);
    assert_eq!(
        s.controller.pointer_down(&mut s.store, &s.mapper, x, y, 5_000.0),
        EventResponse::Redraw
    );
    assert_eq!(s.store.len(), 1);

    // 50ms later: inside the 100ms guard
    assert_eq!(
        s.controller.pointer_down(&mut s.store, &s.mapper, x, y, 5_050.0),
        EventResponse::Ignored
    );
    assert_eq!(s.store.len(), 1);

    s.controller.pointer_down(&mut s.store, &s.mapper, x, y, 5_150.0);
    assert_eq!(s.store.len(), 2);
}

#[test]
fn test_switching_tools_discards_partial_construction() {
    let mut s = Session::new();
    s.controller.set_tool(Tool::Draw(DrawingType::ParallelChannel));
    s.click_at(10, 40.0);
    s.click_at(20, 50.0);

    s.controller.set_tool(Tool::Select);
    assert!(s.store.is_empty());

    s.controller.set_tool(Tool::Draw(DrawingType::ParallelChannel));
    s.click_at(30, 40.0);
    assert!(s.store.is_empty(), "old points must not be reused");
}

#[test]
fn test_preview_follows_pointer_without_touching_store() {
    let mut s = Session::new();
    s.controller.set_tool(Tool::Draw(DrawingType::Rectangle));
    s.click_at(10, 40.0);
    let (x, y) = s.screen(25, 70.0);
    assert_eq!(s.move_to(x, y), EventResponse::Redraw);

    let preview = s.controller.preview_drawing().unwrap();
    assert_eq!(
        preview.points,
        vec![DrawingPoint::new(10, 40.0), DrawingPoint::new(25, 70.0)]
    );
    assert!(s.store.is_empty());

    let commands = build_display_list(
        &s.store,
        &s.controller,
        &s.mapper,
        Viewport::new(1000.0, 400.0),
    );
    let dashed = commands.iter().any(|c| {
        matches!(c, RenderCommand::Polyline { stroke, closed: true, .. } if !stroke.dash.is_empty())
    });
    assert!(dashed, "preview is drawn with the preview dash pattern");
}

#[test]
fn test_handle_boundary_selects_drag_mode() {
    let mut s = Session::new();
    s.add(DrawingType::Trendline, &[(10, 50.0), (30, 50.0)]);
    // first endpoint at (100, 200)

    s.down(100.0, 207.9);
    assert!(matches!(
        s.controller.state(),
        InteractionState::DraggingControlPoint { index: 0, .. }
    ));
    s.up();

    s.down(100.0, 208.1);
    assert!(matches!(
        s.controller.state(),
        InteractionState::DraggingBody { .. }
    ));
    s.up();
}

#[test]
fn test_rectangle_corner_drag_scenario() {
    let mut s = Session::new();
    let rect = s.add(DrawingType::Rectangle, &[(0, 50.0), (10, 60.0)]);

    let (x, y) = s.screen(10, 50.0);
    s.down(x, y);
    assert!(matches!(
        s.controller.state(),
        InteractionState::DraggingControlPoint { index: 2, .. }
    ));

    let (x, y) = s.screen(15, 40.0);
    assert_eq!(s.move_to(x, y), EventResponse::RequestFrame);
    assert_eq!(s.frame(), EventResponse::Redraw);
    s.up();

    assert_eq!(
        s.store[0].points,
        vec![DrawingPoint::new(0, 40.0), DrawingPoint::new(15, 60.0)]
    );
    assert_eq!(s.store[0].id, rect.id);
    assert_eq!(s.controller.editing_target(), Some(&rect.id));
}

/// Grab the handle at `grab`, then deliver one frame per pointer position
fn drag_handle(s: &mut Session, grab: (i64, f64), path: &[(i64, f64)], index: usize) {
    s.down_at(grab.0, grab.1);
    assert!(
        matches!(
            s.controller.state(),
            InteractionState::DraggingControlPoint { index: i, .. } if *i == index
        ),
        "expected handle {index}, got {:?}",
        s.controller.state()
    );
    for &(time, price) in path {
        let (x, y) = s.screen(time, price);
        s.move_to(x, y);
        s.frame();
    }
    s.up();
}

fn assert_points(actual: &[DrawingPoint], expected: &[(i64, f64)]) {
    assert_eq!(actual.len(), expected.len());
    for (a, &(time, price)) in actual.iter().zip(expected) {
        assert_eq!(a.time, time, "{actual:?}");
        assert!((a.price - price).abs() < 1e-6, "{actual:?}");
    }
}

#[test]
fn test_rectangle_corner_crossing_keeps_opposite_edges_across_frames() {
    let mut s = Session::new();
    s.add(DrawingType::Rectangle, &[(0, 50.0), (10, 60.0)]);

    // bottom-right crosses the left edge, then keeps going
    drag_handle(&mut s, (10, 50.0), &[(-5, 50.0), (-6, 50.0)], 2);
    assert_points(&s.store[0].points, &[(-6, 50.0), (0, 60.0)]);
}

#[test]
fn test_rectangle_edge_drag_depends_only_on_last_position() {
    let mut s = Session::new();
    s.add(DrawingType::Rectangle, &[(0, 50.0), (10, 60.0)]);

    // right edge out past the left edge and back inside
    drag_handle(&mut s, (10, 55.0), &[(-5, 55.0), (3, 55.0)], 5);
    assert_points(&s.store[0].points, &[(0, 50.0), (3, 60.0)]);
}

#[test]
fn test_channel_width_handles_do_not_compound_across_frames() {
    let channel = [(10, 50.0), (30, 50.0), (10, 40.0)];

    // midpoint of line A, pointer wiggles then settles 5 above it
    let mut s = Session::new();
    s.add(DrawingType::ParallelChannel, &channel);
    drag_handle(&mut s, (20, 50.0), &[(20, 55.0), (21, 55.0), (20, 55.0)], 4);
    assert_points(&s.store[0].points, &[(10, 50.0), (30, 50.0), (10, 45.0)]);

    // midpoint of line B
    let mut s = Session::new();
    s.add(DrawingType::ParallelChannel, &channel);
    drag_handle(&mut s, (20, 40.0), &[(20, 35.0), (21, 30.0), (20, 30.0)], 5);
    assert_points(&s.store[0].points, &[(10, 50.0), (30, 50.0), (10, 30.0)]);
}

#[test]
fn test_channel_fourth_corner_drag_across_frames() {
    let mut s = Session::new();
    s.add(DrawingType::ParallelChannel, &[(10, 50.0), (30, 50.0), (10, 40.0)]);

    drag_handle(&mut s, (30, 40.0), &[(31, 38.0), (33, 36.0), (32, 35.0)], 3);
    assert_points(&s.store[0].points, &[(10, 50.0), (30, 50.0), (12, 35.0)]);
}

#[test]
fn test_zero_delta_body_drag_is_idempotent() {
    let mut s = Session::new();
    s.add(DrawingType::Rectangle, &[(0, 10.0), (50, 90.0)]);
    s.add(DrawingType::ParallelChannel, &[(60, 20.0), (90, 40.0), (60, 10.0)]);
    let before = s.store.clone();

    for (x, y) in [(250.0, 200.0), (660.0, 346.0)] {
        s.down(x, y);
        assert!(matches!(
            s.controller.state(),
            InteractionState::DraggingBody { .. }
        ));
        s.move_to(x, y);
        s.frame();
        s.up();
        assert_eq!(s.store, before);
    }
}

#[test]
fn test_body_drag_translates_from_snapshot() {
    let mut s = Session::new();
    s.add(DrawingType::Trendline, &[(10, 50.0), (30, 50.0)]);

    s.down(200.0, 200.0);
    // several frames; each applies the delta from the drag start
    for dx in [10.0, 30.0, 50.0] {
        s.move_to(200.0 + dx, 200.0 - 8.0);
        s.frame();
    }
    s.up();

    assert_eq!(
        s.store[0].points,
        vec![DrawingPoint::new(15, 52.0), DrawingPoint::new(35, 52.0)]
    );
}

#[test]
fn test_moves_are_coalesced_and_flushed_on_release() {
    let mut s = Session::new();
    s.add(DrawingType::Horizontal, &[(10, 50.0)]);

    s.down(500.0, 200.0);
    assert_eq!(s.move_to(500.0, 180.0), EventResponse::RequestFrame);
    assert_eq!(s.move_to(500.0, 160.0), EventResponse::Ignored);
    assert_eq!(s.move_to(500.0, 120.0), EventResponse::Ignored);

    // released before the frame fired: latest sample still lands
    assert_eq!(s.up(), EventResponse::Redraw);
    assert_eq!(s.store[0].points, vec![DrawingPoint::new(10, 70.0)]);
    assert_eq!(s.frame(), EventResponse::Ignored);
}

#[test]
fn test_release_outside_canvas_ends_drag() {
    let mut s = Session::new();
    let level = s.add(DrawingType::Vertical, &[(20, 50.0)]);

    s.down(200.0, 100.0);
    s.move_to(-40.0, 900.0);
    s.frame();
    // delivered by the window-level listener
    s.up();

    assert_eq!(
        s.controller.state(),
        &InteractionState::EditingSelected { id: level.id }
    );
    assert_eq!(s.store[0].points, vec![DrawingPoint::new(-4, 50.0)]);
    assert_eq!(s.move_to(10.0, 10.0), EventResponse::Ignored);
}

#[test]
fn test_delete_removes_exactly_one() {
    let mut s = Session::new();
    let a = s.add(DrawingType::Horizontal, &[(0, 25.0)]);
    let b = s.add(DrawingType::Horizontal, &[(0, 50.0)]);
    let c = s.add(DrawingType::Horizontal, &[(0, 75.0)]);

    // Delete without a selection does nothing
    assert_eq!(s.key(Key::Delete), EventResponse::Ignored);

    s.click_at(50, 50.0);
    assert_eq!(s.controller.editing_target(), Some(&b.id));
    assert_eq!(s.key(Key::Backspace), EventResponse::Redraw);

    assert_eq!(s.store, vec![a, c]);
    assert_eq!(s.controller.state(), &InteractionState::Idle);
}

#[test]
fn test_click_on_empty_space_deselects() {
    let mut s = Session::new();
    s.add(DrawingType::Horizontal, &[(0, 50.0)]);
    s.click_at(50, 50.0);
    assert!(s.controller.editing_target().is_some());

    s.click_at(50, 90.0);
    assert_eq!(s.controller.state(), &InteractionState::Idle);
}

#[test]
fn test_text_escape_and_blank_confirm_discard() {
    let mut s = Session::new();
    s.controller.set_tool(Tool::Draw(DrawingType::Text));

    s.click_at(10, 50.0);
    s.controller.set_pending_text("draft");
    assert_eq!(s.controller.pending_text(), Some("draft"));
    s.key(Key::Escape);
    assert!(s.store.is_empty());
    assert_eq!(s.controller.tool(), Tool::Draw(DrawingType::Text));

    s.click_at(10, 50.0);
    s.controller.set_pending_text("   ");
    s.key(Key::Enter);
    assert!(s.store.is_empty());

    s.click_at(10, 50.0);
    s.controller.set_pending_text("Breakout");
    // clicking elsewhere confirms
    s.click_at(40, 20.0);
    assert_eq!(s.store.len(), 1);
    assert_eq!(s.store[0].text.as_deref(), Some("Breakout"));
    assert_eq!(s.store[0].points, vec![DrawingPoint::new(10, 50.0)]);
}

#[test]
fn test_brush_single_tap_is_discarded() {
    let mut s = Session::new();
    s.controller.set_tool(Tool::Draw(DrawingType::Brush));
    s.down_at(10, 50.0);
    s.up();
    assert!(s.store.is_empty());
    assert_eq!(s.controller.tool(), Tool::Draw(DrawingType::Brush));
}

#[test]
fn test_brush_stroke_hits_and_moves_as_a_whole() {
    let mut s = Session::new();
    s.controller.set_tool(Tool::Draw(DrawingType::Brush));
    s.down_at(10, 50.0);
    for i in 1..=10 {
        let (x, y) = s.screen(10 + i, 50.0 + i as f64);
        s.move_to(x, y);
    }
    s.up();
    assert_eq!(s.store[0].points.len(), 11);

    let (x, y) = s.screen(15, 55.0);
    s.down(x + 6.0, y);
    assert!(matches!(
        s.controller.state(),
        InteractionState::DraggingBody { .. }
    ));
    s.up();
}

#[test]
fn test_uninitialized_mapper_is_inert() {
    init_logging();
    let mut controller = SelectionController::default();
    let mut store: Vec<Drawing> = vec![Drawing::new(
        DrawingType::Horizontal,
        vec![DrawingPoint::new(0, 50.0)],
        DrawingStyle::default(),
    )];
    let before = store.clone();

    let pressed = InputEvent::PointerInput {
        state: ElementState::Pressed,
        position: PhysicalPosition::new(10.0, 10.0),
        timestamp_ms: 0.0,
    };
    controller.handle_event(&mut store, &UninitializedMapper, pressed.clone());
    assert_eq!(controller.state(), &InteractionState::Idle);

    controller.set_tool(Tool::Draw(DrawingType::Trendline));
    controller.handle_event(&mut store, &UninitializedMapper, pressed.clone());
    controller.handle_event(&mut store, &UninitializedMapper, pressed);
    assert_eq!(store, before);

    let commands = build_display_list(
        &store,
        &controller,
        &UninitializedMapper,
        Viewport::new(100.0, 100.0),
    );
    assert!(commands.is_empty());
}

#[test]
fn test_host_side_delete_falls_back_to_idle() {
    let mut s = Session::new();
    s.add(DrawingType::Horizontal, &[(0, 50.0)]);
    s.click_at(50, 50.0);
    assert!(s.controller.editing_target().is_some());

    s.store.set_drawings(Vec::new());
    s.key(Key::Delete);
    assert_eq!(s.controller.state(), &InteractionState::Idle);
}

#[test]
fn test_double_click_opens_properties_and_fields_update() {
    let mut s = Session::new();
    let channel = s.add(
        DrawingType::ParallelChannel,
        &[(10, 60.0), (40, 70.0), (10, 40.0)],
    );
    let (x, y) = s.screen(25, 65.0);
    s.click_at(25, 65.0);
    s.controller
        .double_click(&mut s.store, &s.mapper, x, y);
    assert_eq!(s.controller.properties_target(), Some(&channel.id));

    s.controller
        .update_field(&mut s.store, &channel.id, "showMidline", &json!(true))
        .unwrap();
    s.controller
        .update_field(&mut s.store, &channel.id, "backgroundColor", &json!("#123456"))
        .unwrap();
    assert_eq!(s.store[0].style.show_midline, Some(true));
    assert!(s
        .controller
        .update_field(&mut s.store, &channel.id, "fontSize", &json!(12))
        .is_err());

    s.controller.close_properties();
    assert!(s.controller.properties_target().is_none());
    // double click does not change the drag state
    assert!(matches!(
        s.controller.state(),
        InteractionState::EditingSelected { .. }
    ));
}

#[test]
fn test_selected_drawing_shows_handles() {
    let mut s = Session::new();
    s.add(DrawingType::Rectangle, &[(10, 20.0), (40, 60.0)]);
    s.click_at(25, 40.0);

    let commands = build_display_list(
        &s.store,
        &s.controller,
        &s.mapper,
        Viewport::new(1000.0, 400.0),
    );
    let handles = commands
        .iter()
        .filter(|c| matches!(c, RenderCommand::Handle { .. }))
        .count();
    assert_eq!(handles, 8);
}

#[test]
fn test_clear_all() {
    let mut s = Session::new();
    s.add(DrawingType::Horizontal, &[(0, 50.0)]);
    s.add(DrawingType::Vertical, &[(5, 50.0)]);
    s.click_at(50, 50.0);

    s.controller.clear_all(&mut s.store);
    assert!(s.store.is_empty());
    assert_eq!(s.controller.state(), &InteractionState::Idle);
    assert_eq!(s.controller.tool(), Tool::Select);
}
