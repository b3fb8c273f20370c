//! Safe instance management for editor instances
//! Thread-local storage keyed by instance id instead of global mutable state

use std::cell::RefCell;
use std::collections::HashMap;

use annotations_engine::{
    build_display_list, CoordinateMapper, Drawing, DrawingResult, DrawingStore, EventResponse,
    SelectionController,
};
use js_sys::Function;
use uuid::Uuid;

use crate::canvas_renderer::CanvasRenderer;
use crate::controls::WindowListener;
use crate::frame_pacing::FramePacer;
use crate::host::{JsDrawingStore, JsMapper};

/// A single editor overlay with everything it needs between events
pub struct EditorInstance {
    pub controller: SelectionController,
    pub mapper: JsMapper,
    pub get_drawings: Function,
    pub set_drawings: Function,
    pub renderer: CanvasRenderer,
    pub pacer: FramePacer,
    pub release_listener: Option<WindowListener>,
}

impl EditorInstance {
    /// Run one controller step against a fresh snapshot of the host's
    /// drawings and repaint when the step asks for it
    pub fn dispatch<F>(&mut self, step: F) -> DrawingResult<EventResponse>
    where
        F: FnOnce(
            &mut SelectionController,
            &mut dyn DrawingStore,
            &dyn CoordinateMapper,
            f64,
        ) -> EventResponse,
    {
        let now = self.pacer.now();
        let mut store = JsDrawingStore::load(&self.get_drawings, &self.set_drawings)?;
        let response = step(&mut self.controller, &mut store, &self.mapper, now);
        if response.needs_redraw() {
            self.render_with(store.drawings());
        }
        Ok(response)
    }

    pub fn render(&self) -> DrawingResult<()> {
        let store = JsDrawingStore::load(&self.get_drawings, &self.set_drawings)?;
        self.render_with(&store.into_drawings());
        Ok(())
    }

    fn render_with(&self, drawings: &[Drawing]) {
        let commands = build_display_list(
            drawings,
            &self.controller,
            &self.mapper,
            self.renderer.viewport(),
        );
        if let Err(e) = self.renderer.draw(&commands) {
            log::error!("Canvas draw failed: {e:?}");
        }
    }
}

thread_local! {
    static EDITOR_INSTANCES: RefCell<HashMap<Uuid, EditorInstance>> = RefCell::new(HashMap::new());
}

/// Manages editor instances without global mutable state
pub struct InstanceManager;

impl InstanceManager {
    /// Register an instance and return its id
    pub fn create_instance(instance: EditorInstance) -> Uuid {
        let id = Uuid::new_v4();
        EDITOR_INSTANCES.with(|instances| {
            instances.borrow_mut().insert(id, instance);
        });
        log::debug!("Created editor instance {id}");
        id
    }

    /// Mutable access to an instance.
    ///
    /// Host callbacks run while an instance is borrowed, so a host that calls
    /// back into the editor synchronously (e.g. repainting from inside
    /// `setDrawings`) finds it busy and gets `None` rather than a panic.
    pub fn with_instance_mut<F, R>(id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut EditorInstance) -> R,
    {
        EDITOR_INSTANCES.with(|instances| match instances.try_borrow_mut() {
            Ok(mut instances) => instances.get_mut(id).map(f),
            Err(_) => {
                log::warn!("Editor instance {id} is busy; re-entrant call ignored");
                None
            }
        })
    }

    /// Remove an instance; its window listener and frame request go with it
    pub fn remove_instance(id: &Uuid) -> Option<EditorInstance> {
        EDITOR_INSTANCES.with(|instances| match instances.try_borrow_mut() {
            Ok(mut instances) => instances.remove(id),
            Err(_) => {
                log::warn!("Cannot remove editor instance {id} while it is in use");
                None
            }
        })
    }

    pub fn instance_count() -> usize {
        EDITOR_INSTANCES.with(|instances| instances.try_borrow().map(|i| i.len()).unwrap_or(0))
    }
}
