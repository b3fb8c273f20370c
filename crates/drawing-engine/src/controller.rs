//! Interaction state machine
//!
//! [`SelectionController`] owns the active tool and the current interaction
//! state. It never owns drawings: every handler borrows the host's
//! [`DrawingStore`] and a [`CoordinateMapper`] for the duration of the event.

use annotations_config::EngineConfig;
use annotations_shared::events::{ElementState, InputEvent, Key};
use annotations_shared::{
    Drawing, DrawingError, DrawingId, DrawingPoint, DrawingResult, DrawingType,
};
use nalgebra_glm as glm;
use serde_json::Value;

use crate::builder::{commit_drawing, BrushStroke, BuildStep, ShapeBuilder};
use crate::frame::FrameCoalescer;
use crate::geometry::ScreenPoint;
use crate::hit_test::{HitKind, HitTester};
use crate::mapper::CoordinateMapper;
use crate::properties::apply_field;
use crate::reshape::{reshape, translate};
use crate::store::{with_appended, with_replaced, without, DrawingStore};

/// Id carried by construction previews; never stored
pub const PREVIEW_ID: &str = "__preview__";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Draw(DrawingType),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    /// Collecting clicks for a fixed-arity tool
    Building(ShapeBuilder),
    /// Text anchor placed, waiting for the text overlay to confirm
    PendingText {
        anchor: DrawingPoint,
        buffer: String,
    },
    /// Brush button held
    Brushing(BrushStroke),
    EditingSelected {
        id: DrawingId,
    },
    DraggingBody {
        id: DrawingId,
        start: DrawingPoint,
        original: Vec<DrawingPoint>,
    },
    /// Every frame reshapes `original`, the points at grab time, so the
    /// result depends only on the latest pointer position
    DraggingControlPoint {
        id: DrawingId,
        index: usize,
        original: Vec<DrawingPoint>,
    },
}

/// What the host should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// State or drawings changed; repaint the overlay
    Redraw,
    /// A drag sample is pending; call
    /// [`SelectionController::on_animation_frame`] on the next frame
    RequestFrame,
    Ignored,
}

impl EventResponse {
    pub fn needs_redraw(&self) -> bool {
        matches!(self, EventResponse::Redraw)
    }
}

pub struct SelectionController {
    config: EngineConfig,
    hit_tester: HitTester,
    tool: Tool,
    locked: bool,
    state: InteractionState,
    /// Latest hover position in data space, for the construction preview
    preview_point: Option<DrawingPoint>,
    properties_target: Option<DrawingId>,
    last_commit_ms: Option<f64>,
    pending_move: FrameCoalescer<ScreenPoint>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SelectionController {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            hit_tester: HitTester::new(config.hit_test.clone()),
            locked: config.interaction.lock_tool,
            config,
            tool: Tool::Select,
            state: InteractionState::Idle,
            preview_point: None,
            properties_target: None,
            last_commit_ms: None,
            pending_move: FrameCoalescer::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hit_tester(&self) -> &HitTester {
        &self.hit_tester
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Keep the drawing tool active after each commit
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Switch tools. Any construction in progress is discarded without a
    /// partial commit and the selection is dropped.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            log::debug!("Tool changed: {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
        self.preview_point = None;
        self.properties_target = None;
        self.pending_move.cancel();
        self.state = Self::initial_state(tool);
    }

    fn initial_state(tool: Tool) -> InteractionState {
        match tool {
            Tool::Draw(drawing_type) => ShapeBuilder::new(drawing_type)
                .map(InteractionState::Building)
                .unwrap_or(InteractionState::Idle),
            Tool::Select => InteractionState::Idle,
        }
    }

    /// Id of the drawing currently selected or being dragged
    pub fn editing_target(&self) -> Option<&DrawingId> {
        match &self.state {
            InteractionState::EditingSelected { id }
            | InteractionState::DraggingBody { id, .. }
            | InteractionState::DraggingControlPoint { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Drawing shown in the properties overlay, if it is open
    pub fn properties_target(&self) -> Option<&DrawingId> {
        self.properties_target.as_ref()
    }

    pub fn close_properties(&mut self) {
        self.properties_target = None;
    }

    /// Text typed so far into the pending text overlay
    pub fn pending_text(&self) -> Option<&str> {
        match &self.state {
            InteractionState::PendingText { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// Non-final drawing for the construction in progress
    pub fn preview_drawing(&self) -> Option<Drawing> {
        let (drawing_type, points, text) = match &self.state {
            InteractionState::Building(builder) => (
                builder.drawing_type(),
                builder.preview_points(self.preview_point),
                None,
            ),
            InteractionState::Brushing(stroke) => {
                (DrawingType::Brush, stroke.points().to_vec(), None)
            }
            InteractionState::PendingText { anchor, buffer } => {
                (DrawingType::Text, vec![*anchor], Some(buffer.clone()))
            }
            _ => return None,
        };
        if points.is_empty() {
            return None;
        }
        Some(Drawing {
            id: DrawingId::from(PREVIEW_ID),
            drawing_type,
            points,
            style: self.config.style_for(drawing_type),
            text,
        })
    }

    /// Drop references to drawings the host removed behind our back
    pub fn reconcile(&mut self, store: &dyn DrawingStore) {
        if let Some(id) = self.editing_target() {
            if !store.contains(id) {
                log::debug!("Selected drawing {} disappeared from the store", id);
                self.pending_move.cancel();
                self.state = InteractionState::Idle;
            }
        }
        if let Some(id) = &self.properties_target {
            if !store.contains(id) {
                self.properties_target = None;
            }
        }
    }

    /// Dispatch a host input event
    pub fn handle_event(
        &mut self,
        store: &mut dyn DrawingStore,
        mapper: &dyn CoordinateMapper,
        event: InputEvent,
    ) -> EventResponse {
        match event {
            InputEvent::PointerInput {
                state: ElementState::Pressed,
                position,
                timestamp_ms,
            } => self.pointer_down(store, mapper, position.x, position.y, timestamp_ms),
            InputEvent::PointerInput {
                state: ElementState::Released,
                timestamp_ms,
                ..
            } => self.pointer_up(store, mapper, timestamp_ms),
            InputEvent::PointerMoved { position } => {
                self.pointer_move(store, mapper, position.x, position.y)
            }
            InputEvent::DoubleClick { position } => {
                self.double_click(store, mapper, position.x, position.y)
            }
            InputEvent::KeyDown { key, timestamp_ms } => self.key_down(store, key, timestamp_ms),
        }
    }

    fn within_completion_guard(&self, now_ms: f64) -> bool {
        self.last_commit_ms
            .map(|last| now_ms - last < self.config.interaction.completion_guard_ms)
            .unwrap_or(false)
    }

    pub fn pointer_down(
        &mut self,
        store: &mut dyn DrawingStore,
        mapper: &dyn CoordinateMapper,
        x: f64,
        y: f64,
        now_ms: f64,
    ) -> EventResponse {
        self.reconcile(store);
        if self.within_completion_guard(now_ms) {
            log::trace!("Ignoring pointer down inside the completion guard");
            return EventResponse::Ignored;
        }

        match self.tool {
            Tool::Draw(drawing_type) => self.construct(store, mapper, drawing_type, x, y, now_ms),
            Tool::Select => self.select(store, mapper, x, y),
        }
    }

    fn construct(
        &mut self,
        store: &mut dyn DrawingStore,
        mapper: &dyn CoordinateMapper,
        drawing_type: DrawingType,
        x: f64,
        y: f64,
        now_ms: f64,
    ) -> EventResponse {
        // Clicking away from an open text overlay confirms it
        if matches!(self.state, InteractionState::PendingText { .. }) {
            return self.confirm_text(store, now_ms);
        }

        let Some(point) = mapper.to_data(x, y) else {
            return EventResponse::Ignored;
        };

        if drawing_type == DrawingType::Brush {
            self.state = InteractionState::Brushing(BrushStroke::start(point));
            return EventResponse::Redraw;
        }

        let mut builder = match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::Building(builder) if builder.drawing_type() == drawing_type => {
                builder
            }
            _ => match ShapeBuilder::new(drawing_type) {
                Some(builder) => builder,
                None => return EventResponse::Ignored,
            },
        };

        match builder.push(point) {
            BuildStep::Pending { placed, required } => {
                log::trace!("{drawing_type}: {placed}/{required} points placed");
                self.state = InteractionState::Building(builder);
            }
            BuildStep::Complete(points) if drawing_type == DrawingType::Text => {
                self.state = InteractionState::PendingText {
                    anchor: points[0],
                    buffer: String::new(),
                };
            }
            BuildStep::Complete(points) => {
                self.commit(store, drawing_type, points, None, now_ms);
            }
        }
        EventResponse::Redraw
    }

    fn select(
        &mut self,
        store: &mut dyn DrawingStore,
        mapper: &dyn CoordinateMapper,
        x: f64,
        y: f64,
    ) -> EventResponse {
        let Some(target) = self
            .hit_tester
            .find_target(x, y, store.drawings(), mapper)
        else {
            if self.state != InteractionState::Idle {
                log::debug!("Selection cleared");
            }
            self.state = InteractionState::Idle;
            self.properties_target = None;
            return EventResponse::Redraw;
        };

        if self.properties_target.as_ref() != Some(&target.id) {
            self.properties_target = None;
        }
        self.pending_move.cancel();

        match target.kind {
            HitKind::ControlPoint(index) => {
                let Some(drawing) = store.find(&target.id) else {
                    self.state = InteractionState::EditingSelected { id: target.id };
                    return EventResponse::Redraw;
                };
                log::debug!("Dragging handle {} of {}", index, target.id);
                self.state = InteractionState::DraggingControlPoint {
                    original: drawing.points.clone(),
                    id: target.id,
                    index,
                };
            }
            HitKind::Body => {
                let (Some(start), Some(drawing)) = (mapper.to_data(x, y), store.find(&target.id))
                else {
                    self.state = InteractionState::EditingSelected { id: target.id };
                    return EventResponse::Redraw;
                };
                log::debug!("Dragging body of {}", target.id);
                self.state = InteractionState::DraggingBody {
                    original: drawing.points.clone(),
                    id: target.id,
                    start,
                };
            }
        }
        EventResponse::Redraw
    }

    fn commit(
        &mut self,
        store: &mut dyn DrawingStore,
        drawing_type: DrawingType,
        points: Vec<DrawingPoint>,
        text: Option<String>,
        now_ms: f64,
    ) {
        let drawing = commit_drawing(
            drawing_type,
            points,
            self.config.style_for(drawing_type),
            text,
        );
        let next = with_appended(store.drawings(), drawing);
        store.set_drawings(next);

        self.last_commit_ms = Some(now_ms);
        self.preview_point = None;
        if self.locked {
            self.state = Self::initial_state(self.tool);
        } else {
            self.tool = Tool::Select;
            self.state = InteractionState::Idle;
        }
    }

    pub fn pointer_move(
        &mut self,
        store: &mut dyn DrawingStore,
        mapper: &dyn CoordinateMapper,
        x: f64,
        y: f64,
    ) -> EventResponse {
        match self.state {
            InteractionState::Building(_) => {
                self.preview_point = mapper.to_data(x, y);
                EventResponse::Redraw
            }
            InteractionState::Brushing(ref mut stroke) => match mapper.to_data(x, y) {
                Some(point) => {
                    stroke.extend(point);
                    EventResponse::Redraw
                }
                None => EventResponse::Ignored,
            },
            InteractionState::DraggingBody { .. }
            | InteractionState::DraggingControlPoint { .. } => {
                self.reconcile(store);
                if self.editing_target().is_none() {
                    return EventResponse::Redraw;
                }
                if self.pending_move.schedule(glm::vec2(x, y)) {
                    EventResponse::RequestFrame
                } else {
                    log::trace!("Coalesced drag sample ({x}, {y})");
                    EventResponse::Ignored
                }
            }
            _ => EventResponse::Ignored,
        }
    }

    /// Apply the newest pending drag sample. Call once per animation frame
    /// after [`EventResponse::RequestFrame`].
    pub fn on_animation_frame(
        &mut self,
        store: &mut dyn DrawingStore,
        mapper: &dyn CoordinateMapper,
    ) -> EventResponse {
        match self.pending_move.take() {
            Some(pos) if self.apply_drag(store, mapper, &pos) => EventResponse::Redraw,
            _ => EventResponse::Ignored,
        }
    }

    /// Returns whether the store changed
    fn apply_drag(
        &mut self,
        store: &mut dyn DrawingStore,
        mapper: &dyn CoordinateMapper,
        pos: &ScreenPoint,
    ) -> bool {
        let Some(target) = mapper.to_data(pos.x, pos.y) else {
            return false;
        };
        let Some(drawing) = self.editing_target().and_then(|id| store.find(id)) else {
            return false;
        };

        let points = match &self.state {
            InteractionState::DraggingBody {
                start, original, ..
            } => translate(drawing.drawing_type, original, *start, target),
            InteractionState::DraggingControlPoint {
                index, original, ..
            } => reshape(&drawing.with_points(original.clone()), Some(*index), target),
            _ => return false,
        };
        if points == drawing.points {
            return false;
        }

        let updated = drawing.with_points(points);
        let next = with_replaced(store.drawings(), &updated);
        store.set_drawings(next);
        true
    }

    /// Release from either the canvas or the window-level listener
    pub fn pointer_up(
        &mut self,
        store: &mut dyn DrawingStore,
        mapper: &dyn CoordinateMapper,
        now_ms: f64,
    ) -> EventResponse {
        match std::mem::replace(&mut self.state, InteractionState::Idle) {
            drag @ (InteractionState::DraggingBody { .. }
            | InteractionState::DraggingControlPoint { .. }) => {
                self.state = drag;
                // The last sample lands before the drag is released
                if let Some(pos) = self.pending_move.take() {
                    self.apply_drag(store, mapper, &pos);
                }
                if let Some(id) = self.editing_target().cloned() {
                    self.state = InteractionState::EditingSelected { id };
                }
                self.reconcile(store);
                EventResponse::Redraw
            }
            InteractionState::Brushing(stroke) => {
                match stroke.finish() {
                    Some(points) => self.commit(store, DrawingType::Brush, points, None, now_ms),
                    None => {
                        log::trace!("Discarding single-point brush stroke");
                        self.state = Self::initial_state(self.tool);
                    }
                }
                EventResponse::Redraw
            }
            other => {
                self.state = other;
                EventResponse::Ignored
            }
        }
    }

    pub fn double_click(
        &mut self,
        store: &mut dyn DrawingStore,
        mapper: &dyn CoordinateMapper,
        x: f64,
        y: f64,
    ) -> EventResponse {
        self.reconcile(store);
        let InteractionState::EditingSelected { id } = &self.state else {
            return EventResponse::Ignored;
        };
        let hit = self.hit_tester.find_target(x, y, store.drawings(), mapper);
        if hit.map(|h| &h.id == id).unwrap_or(false) {
            log::debug!("Opening properties for {}", id);
            self.properties_target = Some(id.clone());
            return EventResponse::Redraw;
        }
        EventResponse::Ignored
    }

    pub fn key_down(
        &mut self,
        store: &mut dyn DrawingStore,
        key: Key,
        now_ms: f64,
    ) -> EventResponse {
        self.reconcile(store);
        match key {
            Key::Delete | Key::Backspace => self.delete_selected(store),
            Key::Enter => self.confirm_text(store, now_ms),
            Key::Escape => self.escape(),
            Key::Other => EventResponse::Ignored,
        }
    }

    fn delete_selected(&mut self, store: &mut dyn DrawingStore) -> EventResponse {
        let InteractionState::EditingSelected { id } = &self.state else {
            return EventResponse::Ignored;
        };
        let id = id.clone();
        let next = without(store.drawings(), &id);
        store.set_drawings(next);
        log::debug!("Deleted drawing {}", id);
        self.state = InteractionState::Idle;
        self.properties_target = None;
        EventResponse::Redraw
    }

    /// Cancels pending text or construction (keeping the tool) and drops
    /// the selection. Drags are left alone.
    fn escape(&mut self) -> EventResponse {
        match self.state {
            InteractionState::PendingText { .. } => self.cancel_text(),
            InteractionState::Building(ref mut builder) => {
                builder.reset();
                self.preview_point = None;
                EventResponse::Redraw
            }
            InteractionState::Brushing(_) => {
                self.state = Self::initial_state(self.tool);
                EventResponse::Redraw
            }
            InteractionState::EditingSelected { .. } => {
                self.state = InteractionState::Idle;
                self.properties_target = None;
                EventResponse::Redraw
            }
            _ => EventResponse::Ignored,
        }
    }

    /// Mirror the text overlay's contents. Returns `false` when no text is pending.
    pub fn set_pending_text(&mut self, text: &str) -> bool {
        match &mut self.state {
            InteractionState::PendingText { buffer, .. } => {
                *buffer = text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Commit the pending text. Blank text is discarded like a cancel.
    pub fn confirm_text(&mut self, store: &mut dyn DrawingStore, now_ms: f64) -> EventResponse {
        let InteractionState::PendingText { anchor, buffer } = &self.state else {
            return EventResponse::Ignored;
        };
        let (anchor, text) = (*anchor, buffer.clone());
        if text.trim().is_empty() {
            return self.cancel_text();
        }
        self.commit(store, DrawingType::Text, vec![anchor], Some(text), now_ms);
        EventResponse::Redraw
    }

    /// Close the text overlay without committing; the text tool stays active
    pub fn cancel_text(&mut self) -> EventResponse {
        if !matches!(self.state, InteractionState::PendingText { .. }) {
            return EventResponse::Ignored;
        }
        self.state = Self::initial_state(self.tool);
        EventResponse::Redraw
    }

    /// Remove every drawing and return to the select tool
    pub fn clear_all(&mut self, store: &mut dyn DrawingStore) -> EventResponse {
        log::debug!("Clearing {} drawings", store.drawings().len());
        store.set_drawings(Vec::new());
        self.tool = Tool::Select;
        self.state = InteractionState::Idle;
        self.preview_point = None;
        self.properties_target = None;
        self.pending_move.cancel();
        EventResponse::Redraw
    }

    /// Set one field of a stored drawing from the properties or text editor
    pub fn update_field(
        &mut self,
        store: &mut dyn DrawingStore,
        id: &DrawingId,
        key: &str,
        value: &Value,
    ) -> DrawingResult<()> {
        let drawing = store.find(id).ok_or_else(|| DrawingError::NotFound {
            id: id.to_string(),
        })?;
        let updated = apply_field(drawing, key, value)?;
        let next = with_replaced(store.drawings(), &updated);
        store.set_drawings(next);
        Ok(())
    }
}
