//! Interactive chart annotation engine
//!
//! Drawings live in data space (bar index and price). The engine projects
//! them through a host-supplied [`CoordinateMapper`], hit-tests pointer
//! input in screen space, reshapes or translates drawings in response to
//! drags, and builds a backend-agnostic display list for rendering.
//!
//! The host owns the drawing list. The engine only ever hands back complete
//! replacement lists through [`DrawingStore`].

pub mod builder;
pub mod controller;
pub mod frame;
pub mod geometry;
pub mod mapper;
pub mod properties;
pub mod render;
pub mod reshape;
pub mod shapes;
pub mod store;

pub use builder::{BrushStroke, BuildStep, ShapeBuilder};
pub use controller::{EventResponse, InteractionState, SelectionController, Tool};
pub use frame::FrameCoalescer;
pub use hit_test::{HitKind, HitTarget, HitTester};
pub use mapper::{CoordinateMapper, LinearMapper, UninitializedMapper};
pub use properties::{apply_field, PropertyKey};
pub use render::{build_display_list, RenderCommand, StrokeStyle, TextBaseline, Viewport};
pub use reshape::{price_range_readout, reshape, translate};
pub use shapes::{behavior_for, zone::PriceRangeReadout, ShapeBehavior};
pub use store::DrawingStore;

// Re-export the data model so hosts need a single dependency
pub use annotations_config::EngineConfig;
pub use annotations_shared::{
    events, Drawing, DrawingError, DrawingId, DrawingPoint, DrawingResult, DrawingStyle,
    DrawingType, LineStyle,
};
