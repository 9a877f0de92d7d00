//! ProjPicker map widget core.
//!
//! Turns drawing-layer edits into search queries, keeps the latest result set,
//! and turns a selected CRS into highlight rings on the map:
//! - [`layers`]: the drawing layer the user edits
//! - [`store`]: replace-only result store with a generation counter
//! - [`selector`]: CRS lookup, display fields and bbox rings
//! - [`renderer`]: highlight layer replacement and viewport fitting
//! - [`dispatcher`]: sequence-tagged queries over a pluggable transport
//! - [`widget`]: the trigger-driven state machine emitting [`Command`]s
//! - [`session`]: runs commands against a dispatcher, map and view
//! - [`config`]: widget configuration

pub mod config;
pub mod dispatcher;
pub mod layers;
pub mod renderer;
pub mod selector;
pub mod session;
pub mod store;
pub mod widget;

pub use config::WidgetConfig;
pub use dispatcher::{
    DispatchError, HttpTransport, PendingQuery, QueryDispatcher, QueryRequest, RequestSeq,
    Transport, TransportResponse,
};
pub use layers::{DrawingLayer, FeatureChange};
pub use renderer::{BboxLayer, BboxRenderer, MapSurface, MemoryMap};
pub use selector::{select, Selection};
pub use session::{PickerSession, PickerView, RecordingView};
pub use store::{ListEntry, ResultStore};
pub use widget::{Command, PickerWidget};
