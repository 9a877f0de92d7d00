//! The widget state machine.
//!
//! Every trigger is a plain method that updates owned state and returns the
//! side effects to perform as [`Command`]s. Nothing here does I/O; the
//! [`crate::session::PickerSession`] executes the commands.

use tracing::debug;

use projpicker_common::{CrsDetails, CrsId, PickerError, PickerResult, Ring};
use projpicker_protocol::{serialize, DecodedResults, LogicalOperator, SerializationMode};

use crate::dispatcher::{PendingQuery, RequestSeq};
use crate::layers::{DrawingLayer, FeatureChange};
use crate::selector::{select, selection_for, Selection};
use crate::store::{ListEntry, ResultStore};

/// A side effect requested by the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Send a query and feed its outcome back through `on_response`.
    SendQuery(PendingQuery),
    /// Rebuild the identifier list.
    ShowList(Vec<ListEntry>),
    /// Drop the detail panel and the bbox highlight.
    ClearSelection,
    /// Fill the detail panel.
    ShowDetails(CrsDetails),
    /// Replace the bbox highlight and fit the map to it.
    RenderBbox(Vec<Ring>),
    /// Tell the user a query failed.
    ReportFailure { kind: &'static str, message: String },
}

/// Owned state of one map widget.
#[derive(Debug)]
pub struct PickerWidget {
    mode: SerializationMode,
    operator: LogicalOperator,
    drawing: DrawingLayer,
    store: ResultStore,
    selected: Option<Selection>,
    last_issued: RequestSeq,
    last_applied: Option<RequestSeq>,
}

impl PickerWidget {
    pub fn new(mode: SerializationMode, operator: LogicalOperator) -> Self {
        Self {
            mode,
            operator,
            drawing: DrawingLayer::new(),
            store: ResultStore::new(),
            selected: None,
            last_issued: RequestSeq::default(),
            last_applied: None,
        }
    }

    /// A feature was drawn, edited or deleted.
    ///
    /// An edit the drawing layer rejects issues no query.
    pub fn on_feature_changed(&mut self, change: FeatureChange) -> PickerResult<Vec<Command>> {
        self.drawing.apply(change)?;
        Ok(vec![self.issue_query()])
    }

    /// The operator control changed. Always re-queries, even if the value
    /// is the same as before.
    pub fn on_operator_changed(&mut self, operator: LogicalOperator) -> Vec<Command> {
        self.operator = operator;
        vec![self.issue_query()]
    }

    /// Build a query from the current drawing and operator.
    pub fn issue_query(&mut self) -> Command {
        self.last_issued = self.last_issued.next();
        let query = serialize(&self.drawing.to_collection(), self.operator, self.mode);
        debug!(
            seq = self.last_issued.0,
            features = self.drawing.len(),
            operator = %self.operator,
            mode = %self.mode,
            "Issuing query"
        );
        Command::SendQuery(PendingQuery {
            seq: self.last_issued,
            query,
        })
    }

    /// Apply the outcome of the query tagged `seq`.
    ///
    /// Only the most recently issued query may change state, and only once.
    /// Anything older or repeated is dropped without side effects.
    pub fn on_response(
        &mut self,
        seq: RequestSeq,
        outcome: PickerResult<DecodedResults>,
    ) -> Vec<Command> {
        if seq != self.last_issued || self.last_applied == Some(seq) {
            debug!(
                seq = seq.0,
                last_issued = self.last_issued.0,
                "Discarding stale response"
            );
            return Vec::new();
        }
        self.last_applied = Some(seq);

        match outcome {
            Ok(results) => {
                let generation = self.store.replace(results);
                debug!(seq = seq.0, generation, count = self.store.len(), "Result store replaced");

                let mut commands = Vec::with_capacity(2);
                if self.selected.take().is_some() {
                    commands.push(Command::ClearSelection);
                }
                commands.push(Command::ShowList(self.store.entries()));
                commands
            }
            Err(err) => vec![Command::ReportFailure {
                kind: err.kind(),
                message: err.to_string(),
            }],
        }
    }

    /// A CRS identifier was chosen.
    ///
    /// Identifiers not in the current store are rejected with
    /// [`PickerError::CrsNotFound`]; the previous selection is kept.
    pub fn on_crs_selected(&mut self, id: &CrsId) -> PickerResult<Vec<Command>> {
        let selection = select(&self.store, id)?;
        Ok(self.show(selection))
    }

    /// A row of the identifier list was clicked.
    ///
    /// A row left over from an earlier response clears the selection instead
    /// of resolving against the new store.
    pub fn on_entry_selected(&mut self, entry: &ListEntry) -> PickerResult<Vec<Command>> {
        match self.store.lookup_entry(entry) {
            Ok(record) => {
                let selection = selection_for(self.store.generation(), &entry.id, record);
                Ok(self.show(selection))
            }
            Err(PickerError::StaleSelection(id)) => {
                debug!(%id, generation = entry.generation, "Clearing stale selection");
                self.selected = None;
                Ok(vec![Command::ClearSelection])
            }
            Err(err) => Err(err),
        }
    }

    fn show(&mut self, selection: Selection) -> Vec<Command> {
        let commands = vec![
            Command::ShowDetails(selection.details.clone()),
            Command::RenderBbox(selection.rings.clone()),
        ];
        self.selected = Some(selection);
        commands
    }

    pub fn mode(&self) -> SerializationMode {
        self.mode
    }

    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    pub fn drawing(&self) -> &DrawingLayer {
        &self.drawing
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn selected(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    pub fn last_issued(&self) -> RequestSeq {
        self.last_issued
    }
}
