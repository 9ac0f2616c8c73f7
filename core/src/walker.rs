//! Depth-first traversal of syntax trees.
//!
//! A [`Listener`] is a fold over the tree: leaves produce an output through
//! [`Listener::terminal`], interior nodes receive the outputs of their
//! children (in source order) in [`Listener::exit`]. The first error stops
//! the traversal; no further hooks run after it.

use smallvec::SmallVec;
use thiserror::Error;

use crate::syntax::Node;

/// Outputs of a node's children, in source order.
pub type Outputs<T> = SmallVec<[T; 4]>;

/// Returned when walking with a walker stopped by an earlier error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tree walk was stopped by an earlier error")]
pub struct Halted;

pub trait Listener {
    type Output;
    type Error: From<Halted>;

    /// Called before the children of an interior node are visited.
    fn enter(&mut self, _node: &Node) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for leaf nodes.
    fn terminal(&mut self, node: &Node) -> Result<Self::Output, Self::Error>;

    /// Called after all children of an interior node were visited.
    fn exit(
        &mut self,
        node: &Node,
        children: Outputs<Self::Output>,
    ) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug, Default)]
pub struct Walker {
    stopped: bool,
}

impl Walker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits `root` and its descendants depth-first, left to right.
    ///
    /// Once a hook fails the walker is stopped: the error is returned, and
    /// every later call fails with [`Halted`] until [`Walker::reset`].
    pub fn walk<L: Listener>(&mut self, listener: &mut L, root: &Node) -> Result<L::Output, L::Error> {
        if self.stopped {
            return Err(Halted.into());
        }
        let result = self.visit(listener, root);
        if result.is_err() {
            self.stopped = true;
        }
        result
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn reset(&mut self) {
        self.stopped = false;
    }

    // Long operator chains build trees as deep as the chain is long, so this
    // must not recurse.
    fn visit<L: Listener>(&mut self, listener: &mut L, root: &Node) -> Result<L::Output, L::Error> {
        if root.kind.is_terminal() {
            return listener.terminal(root);
        }
        listener.enter(root)?;
        let mut frame = Frame::new(root);
        let mut parents: Vec<Frame<'_, L::Output>> = Vec::new();
        loop {
            let node = frame.node;
            if let Some(child) = node.children.get(frame.next) {
                frame.next += 1;
                if child.kind.is_terminal() {
                    frame.outputs.push(listener.terminal(child)?);
                } else {
                    listener.enter(child)?;
                    parents.push(core::mem::replace(&mut frame, Frame::new(child)));
                }
                continue;
            }
            let output = listener.exit(node, core::mem::take(&mut frame.outputs))?;
            match parents.pop() {
                Some(parent) => {
                    frame = parent;
                    frame.outputs.push(output);
                }
                None => return Ok(output),
            }
        }
    }
}

// An interior node whose children are being visited.
struct Frame<'n, T> {
    node: &'n Node,
    next: usize,
    outputs: Outputs<T>,
}

impl<'n, T> Frame<'n, T> {
    fn new(node: &'n Node) -> Self {
        Frame {
            node,
            next: 0,
            outputs: Outputs::new(),
        }
    }
}

/// The only child output, if there is exactly one.
pub fn into_unary<T>(outputs: Outputs<T>) -> Option<T> {
    let mut outputs = outputs.into_iter();
    match (outputs.next(), outputs.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// The two child outputs, if there are exactly two.
pub fn into_binary<T>(outputs: Outputs<T>) -> Option<(T, T)> {
    let mut outputs = outputs.into_iter();
    match (outputs.next(), outputs.next(), outputs.next()) {
        (Some(left), Some(right), None) => Some((left, right)),
        _ => None,
    }
}
