//! Interaction layer shared by the chart widgets
//!
//! Widgets report what happened in a frame as a [`ChartAction`] (no
//! callbacks needed). Callers that prefer observers register handlers on
//! [`ChartEvents`] and feed it the actions; handlers run synchronously in
//! registration order.

use demand_types::ComputedAggregate;
use egui::Pos2;

use crate::sunburst::{NodeId, SunburstNode};

/// Something under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartItem {
    /// Treemap sub-box, by aggregate index
    Aggregate(usize),
    /// Sunburst segment
    Node(NodeId),
}

/// A chosen hierarchy element
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub hierarchy_path: String,
    pub element_id: String,
    pub volume: f64,
    pub variance_percent: f64,
    /// Source aggregate; `None` for sunburst nodes that no aggregate ends at
    pub aggregate: Option<ComputedAggregate>,
}

impl Selection {
    pub fn from_aggregate(aggregate: &ComputedAggregate) -> Self {
        Self {
            hierarchy_path: aggregate.hierarchy_path.clone(),
            element_id: aggregate.element_id.clone(),
            volume: aggregate.volume_total,
            variance_percent: aggregate.variance_percent,
            aggregate: Some(aggregate.clone()),
        }
    }

    pub fn from_node(node: &SunburstNode, aggregates: &[ComputedAggregate]) -> Self {
        let aggregate = node.aggregate.and_then(|i| aggregates.get(i)).cloned();
        Self {
            hierarchy_path: node.path.clone(),
            element_id: demand_types::element_id_for(&node.path),
            volume: node.volume,
            variance_percent: node.variance_percent(),
            aggregate,
        }
    }
}

/// Hover state reported for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct HoverEvent {
    pub item: ChartItem,
    pub selection: Selection,
    /// Pointer position in screen coordinates
    pub pointer: Pos2,
}

/// What a chart widget observed this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartAction {
    pub hovered: Option<HoverEvent>,
    /// Set on click
    pub selected: Option<Selection>,
    /// The legend toggle was clicked
    pub legend_toggled: bool,
}

impl ChartAction {
    pub fn is_empty(&self) -> bool {
        self.hovered.is_none() && self.selected.is_none() && !self.legend_toggled
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Per-chart interaction state kept across frames
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub hovered: Option<ChartItem>,
    pub pointer: Option<Pos2>,
    pub legend_visible: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            hovered: None,
            pointer: None,
            legend_visible: true,
        }
    }
}

impl InteractionState {
    /// Record the hovered item; returns true when it changed
    pub fn set_hover(&mut self, item: Option<ChartItem>, pointer: Option<Pos2>) -> bool {
        let changed = self.hovered != item;
        self.hovered = item;
        self.pointer = if item.is_some() { pointer } else { None };
        changed
    }

    pub fn is_hovered(&self, item: ChartItem) -> bool {
        self.hovered == Some(item)
    }

    pub fn toggle_legend(&mut self) {
        self.legend_visible = !self.legend_visible;
    }

    pub fn clear(&mut self) {
        self.hovered = None;
        self.pointer = None;
    }
}

// =============================================================================
// OBSERVERS
// =============================================================================

type HoverHandler = Box<dyn FnMut(Option<&HoverEvent>)>;
type SelectHandler = Box<dyn FnMut(&Selection)>;
type LegendHandler = Box<dyn FnMut(bool)>;

/// Synchronous observer registry
#[derive(Default)]
pub struct ChartEvents {
    hover: Vec<HoverHandler>,
    select: Vec<SelectHandler>,
    legend: Vec<LegendHandler>,
    /// Last hovered item, so hover handlers fire on change only
    last_hover: Option<ChartItem>,
}

impl std::fmt::Debug for ChartEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartEvents")
            .field("hover", &self.hover.len())
            .field("select", &self.select.len())
            .field("legend", &self.legend.len())
            .finish_non_exhaustive()
    }
}

impl ChartEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with `Some` when the hovered item changes, `None` when the
    /// pointer leaves every item
    pub fn on_hover(&mut self, handler: impl FnMut(Option<&HoverEvent>) + 'static) {
        self.hover.push(Box::new(handler));
    }

    pub fn on_select(&mut self, handler: impl FnMut(&Selection) + 'static) {
        self.select.push(Box::new(handler));
    }

    /// Called with the new visibility
    pub fn on_legend_toggle(&mut self, handler: impl FnMut(bool) + 'static) {
        self.legend.push(Box::new(handler));
    }

    /// Route one frame's action to the registered handlers
    pub fn dispatch(&mut self, action: &ChartAction, legend_visible: bool) {
        let hovered = action.hovered.as_ref().map(|h| h.item);
        if hovered != self.last_hover {
            self.last_hover = hovered;
            for handler in &mut self.hover {
                handler(action.hovered.as_ref());
            }
        }
        if let Some(selection) = &action.selected {
            for handler in &mut self.select {
                handler(selection);
            }
        }
        if action.legend_toggled {
            for handler in &mut self.legend {
                handler(legend_visible);
            }
        }
    }
}
