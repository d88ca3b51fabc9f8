//! Interface to the Sobel 3x3 implementation under test
//!
//! The implementation is driven in one of two styles: building a graph
//! node that is verified and then executed, or a single immediate call.
//! Border modes cross this boundary in their raw encoding.

use crate::error::TestResult;
use std::fmt;
use visionct_core::Image;
use visionct_filter::{BorderMode, GradientPair, RawBorderMode};

/// An implementation of the Sobel 3x3 operator
pub trait Sobel3x3Target {
    /// Handle to a node in a graph that has not been executed yet
    type Node;

    /// Create and release a node with virtual-size inputs to check that
    /// node construction succeeds for `width` x `height` images.
    fn check_node_creation(&mut self, width: u32, height: u32) -> TestResult<()>;

    /// Add a Sobel 3x3 node reading `src` to a fresh graph.
    fn create_graph_node(&mut self, src: &Image) -> TestResult<Self::Node>;

    /// Set the node's border mode attribute.
    fn set_node_border(&mut self, node: &mut Self::Node, border: RawBorderMode) -> TestResult<()>;

    /// Verify the graph, execute it and return the node's outputs.
    fn verify_and_process(&mut self, node: Self::Node) -> TestResult<GradientPair>;

    /// Set the border mode used by immediate calls.
    fn set_immediate_border(&mut self, border: RawBorderMode) -> TestResult<()>;

    /// Run the operator on `src` in one call.
    fn process_immediate(&mut self, src: &Image) -> TestResult<GradientPair>;
}

/// How the implementation is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationStyle {
    /// Deferred execution through a graph
    Graph,
    /// Single immediate call
    Immediate,
}

impl InvocationStyle {
    pub const ALL: [InvocationStyle; 2] = [InvocationStyle::Graph, InvocationStyle::Immediate];
}

impl fmt::Display for InvocationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationStyle::Graph => write!(f, "graph"),
            InvocationStyle::Immediate => write!(f, "immediate"),
        }
    }
}

/// Run `target` on `src` under `border` in the given style.
pub fn run_target<T>(
    target: &mut T,
    style: InvocationStyle,
    src: &Image,
    border: BorderMode,
) -> TestResult<GradientPair>
where
    T: Sobel3x3Target + ?Sized,
{
    let raw = RawBorderMode::from(border);
    log::debug!(
        "running {style} sobel3x3 on {}x{} with {border}",
        src.width(),
        src.height()
    );
    match style {
        InvocationStyle::Graph => {
            let mut node = target.create_graph_node(src)?;
            target.set_node_border(&mut node, raw)?;
            target.verify_and_process(node)
        }
        InvocationStyle::Immediate => {
            target.set_immediate_border(raw)?;
            target.process_immediate(src)
        }
    }
}
