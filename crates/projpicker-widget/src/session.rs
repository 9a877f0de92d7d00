//! Runs widget commands against a dispatcher, a map and a view.

use std::collections::VecDeque;

use tracing::{debug, warn};

use projpicker_common::{CrsDetails, CrsId, Extent, PickerError, PickerResult};
use projpicker_protocol::LogicalOperator;

use crate::dispatcher::{QueryDispatcher, Transport};
use crate::layers::FeatureChange;
use crate::renderer::{BboxRenderer, MapSurface};
use crate::store::ListEntry;
use crate::widget::{Command, PickerWidget};

/// The non-map UI: identifier list, detail panel and failure notices.
pub trait PickerView {
    fn show_list(&mut self, entries: &[ListEntry]);
    fn show_details(&mut self, details: &CrsDetails);
    fn clear_details(&mut self);
    fn report_failure(&mut self, kind: &'static str, message: &str);
}

/// A view that keeps what it was told to show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingView {
    pub list: Vec<ListEntry>,
    pub details: Option<CrsDetails>,
    pub failures: Vec<(String, String)>,
    pub list_refreshes: usize,
}

impl PickerView for RecordingView {
    fn show_list(&mut self, entries: &[ListEntry]) {
        self.list = entries.to_vec();
        self.list_refreshes += 1;
    }

    fn show_details(&mut self, details: &CrsDetails) {
        self.details = Some(details.clone());
    }

    fn clear_details(&mut self) {
        self.details = None;
    }

    fn report_failure(&mut self, kind: &'static str, message: &str) {
        self.failures.push((kind.to_string(), message.to_string()));
    }
}

/// One widget wired to its collaborators.
///
/// Queries are awaited one at a time, so a session on its own never sees
/// out-of-order responses. Front ends that keep several queries in flight
/// drive [`PickerWidget`] and [`QueryDispatcher`] directly.
pub struct PickerSession<T: Transport, M: MapSurface, V: PickerView> {
    widget: PickerWidget,
    dispatcher: QueryDispatcher<T>,
    renderer: BboxRenderer<M>,
    view: V,
}

impl<T: Transport, M: MapSurface, V: PickerView> PickerSession<T, M, V> {
    pub fn new(widget: PickerWidget, dispatcher: QueryDispatcher<T>, map: M, view: V) -> Self {
        Self {
            widget,
            dispatcher,
            renderer: BboxRenderer::new(map),
            view,
        }
    }

    pub async fn feature_changed(&mut self, change: FeatureChange) -> PickerResult<()> {
        let commands = self.widget.on_feature_changed(change)?;
        self.run(commands).await;
        Ok(())
    }

    pub async fn operator_changed(&mut self, operator: LogicalOperator) {
        let commands = self.widget.on_operator_changed(operator);
        self.run(commands).await;
    }

    /// Re-send the current drawing without changing anything.
    pub async fn refresh(&mut self) {
        let command = self.widget.issue_query();
        self.run(vec![command]).await;
    }

    pub async fn select(&mut self, id: &CrsId) -> PickerResult<()> {
        let commands = self.widget.on_crs_selected(id)?;
        self.run(commands).await;
        Ok(())
    }

    pub async fn select_entry(&mut self, entry: &ListEntry) -> PickerResult<()> {
        let commands = self.widget.on_entry_selected(entry)?;
        self.run(commands).await;
        Ok(())
    }

    /// Fit the viewport to everything drawn. Returns `None` with nothing drawn.
    pub fn fit_to_drawing(&mut self) -> Option<Extent> {
        let extent = self.widget.drawing().extent()?;
        self.renderer.surface_mut().fit_bounds(extent);
        Some(extent)
    }

    async fn run(&mut self, commands: Vec<Command>) {
        let mut queue: VecDeque<Command> = commands.into();
        while let Some(command) = queue.pop_front() {
            match command {
                Command::SendQuery(pending) => {
                    let outcome = self
                        .dispatcher
                        .dispatch(&pending)
                        .await
                        .map_err(PickerError::from);
                    queue.extend(self.widget.on_response(pending.seq, outcome));
                }
                Command::ShowList(entries) => self.view.show_list(&entries),
                Command::ClearSelection => {
                    self.view.clear_details();
                    self.renderer.clear();
                }
                Command::ShowDetails(details) => self.view.show_details(&details),
                Command::RenderBbox(rings) => {
                    if let Some(extent) = self.renderer.render(&rings) {
                        debug!(?extent, "Fitted map to selection");
                    }
                }
                Command::ReportFailure { kind, message } => {
                    warn!(kind, error = %message, "CRS query failed");
                    self.view.report_failure(kind, &message);
                }
            }
        }
    }

    pub fn widget(&self) -> &PickerWidget {
        &self.widget
    }

    pub fn renderer(&self) -> &BboxRenderer<M> {
        &self.renderer
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn dispatcher(&self) -> &QueryDispatcher<T> {
        &self.dispatcher
    }
}
