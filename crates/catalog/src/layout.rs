//! Tree layout: diagram coordinates for the index shape, plus viewport zoom.
//!
//! The root sits at `(origin_x, origin_y)`. A node at `(x, y)` drawn with
//! horizontal offset `dx` puts its left child at `(x - dx, y + dy)` and its
//! right child at `(x + dx, y + dy)`; the children then use `dx / spread`.
//! Every parent/child link becomes an [`Edge`] carrying the length and
//! rotation a renderer needs to draw it as a rotated line from the parent.
//!
//! Nodes are emitted in pre-order (node, left subtree, right subtree).

use crate::config::{
    LAYOUT_DX, LAYOUT_DY, LAYOUT_ORIGIN_X, LAYOUT_ORIGIN_Y, LAYOUT_SPREAD, ZOOM_INITIAL, ZOOM_MAX,
    ZOOM_MIN, ZOOM_STEP,
};
use crate::index::{AvlIndex, NodeRef, Position};

/// Geometry parameters for [`layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Root x coordinate.
    pub origin_x: f32,
    /// Root y coordinate.
    pub origin_y: f32,
    /// Horizontal offset from the root to its children.
    pub dx: f32,
    /// Vertical distance between levels.
    pub dy: f32,
    /// Divisor applied to `dx` at each level down.
    pub spread: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            origin_x: LAYOUT_ORIGIN_X,
            origin_y: LAYOUT_ORIGIN_Y,
            dx: LAYOUT_DX,
            dy: LAYOUT_DY,
            spread: LAYOUT_SPREAD,
        }
    }
}

/// A node with its diagram coordinates.
#[derive(Debug)]
pub struct PlacedNode<'a, R> {
    /// The stored record.
    pub record: &'a R,
    /// Insertion-sequence number.
    pub position: Position,
    /// Current balance factor.
    pub balance: i8,
    /// Distance from the root (root is 0).
    pub depth: u32,
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

/// A parent → child link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Parent position.
    pub parent: Position,
    /// Child position.
    pub child: Position,
    /// Start point (the parent).
    pub from: (f32, f32),
    /// End point (the child).
    pub to: (f32, f32),
}

impl Edge {
    /// Euclidean length of the link.
    pub fn length(&self) -> f32 {
        let (dx, dy) = self.delta();
        dx.hypot(dy)
    }

    /// Rotation of the link in degrees, measured from the positive x axis
    /// towards positive y (screen coordinates, y grows downwards).
    pub fn angle_degrees(&self) -> f32 {
        let (dx, dy) = self.delta();
        dy.atan2(dx).to_degrees()
    }

    fn delta(&self) -> (f32, f32) {
        (self.to.0 - self.from.0, self.to.1 - self.from.1)
    }
}

/// Placed nodes and edges for a whole tree.
#[derive(Debug)]
pub struct TreeLayout<'a, R> {
    /// Nodes in pre-order.
    pub nodes: Vec<PlacedNode<'a, R>>,
    /// One edge per non-root node.
    pub edges: Vec<Edge>,
}

impl<R> TreeLayout<'_, R> {
    /// Smallest rectangle containing every node, as `(min_x, min_y, max_x, max_y)`.
    ///
    /// `None` for an empty tree.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.nodes.first()?;
        let init = (first.x, first.y, first.x, first.y);
        Some(self.nodes.iter().fold(init, |(x0, y0, x1, y1), n| {
            (x0.min(n.x), y0.min(n.y), x1.max(n.x), y1.max(n.y))
        }))
    }
}

struct Pending<'a, R> {
    node: NodeRef<'a, R>,
    x: f32,
    y: f32,
    dx: f32,
    depth: u32,
}

/// Compute diagram coordinates for every node of `index`.
pub fn layout<'a, R>(index: &'a AvlIndex<R>, config: &LayoutConfig) -> TreeLayout<'a, R> {
    let mut nodes = Vec::with_capacity(index.len());
    let mut edges = Vec::with_capacity(index.len().saturating_sub(1));
    let mut stack: Vec<Pending<'a, R>> = Vec::with_capacity(usize::from(index.height()));

    if let Some(root) = index.root() {
        stack.push(Pending {
            node: root,
            x: config.origin_x,
            y: config.origin_y,
            dx: config.dx,
            depth: 0,
        });
    }

    while let Some(p) = stack.pop() {
        nodes.push(PlacedNode {
            record: p.node.record(),
            position: p.node.position(),
            balance: p.node.balance(),
            depth: p.depth,
            x: p.x,
            y: p.y,
        });

        let child_y = p.y + config.dy;
        let child_dx = p.dx / config.spread;
        let depth = p.depth.saturating_add(1);
        // Right is pushed first so the left subtree is emitted first.
        let children = [(p.node.right(), p.x + p.dx), (p.node.left(), p.x - p.dx)];
        for (child, child_x) in children {
            let Some(child) = child else { continue };
            edges.push(Edge {
                parent: p.node.position(),
                child: child.position(),
                from: (p.x, p.y),
                to: (child_x, child_y),
            });
            stack.push(Pending {
                node: child,
                x: child_x,
                y: child_y,
                dx: child_dx,
                depth,
            });
        }
    }

    TreeLayout { nodes, edges }
}

/// Zoom and pan state of the diagram view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f32,
    scroll_x: f32,
    scroll_y: f32,
}

impl Viewport {
    /// View at the initial scale, scrolled to the origin.
    pub fn new() -> Self {
        Viewport {
            scale: ZOOM_INITIAL,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Current scale factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current scroll offset `(x, y)`.
    pub fn scroll(&self) -> (f32, f32) {
        (self.scroll_x, self.scroll_y)
    }

    /// Apply one wheel notch: positive `delta` zooms in, anything else out.
    /// The scale is clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    pub fn zoom(&mut self, delta: f32) {
        self.scale = if delta > 0.0 {
            (self.scale + ZOOM_STEP).min(ZOOM_MAX)
        } else {
            (self.scale - ZOOM_STEP).max(ZOOM_MIN)
        };
    }

    /// Drag the content by `(dx, dy)`; the view scrolls the opposite way.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.scroll_x -= dx;
        self.scroll_y -= dy;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn unit() -> LayoutConfig {
        LayoutConfig {
            origin_x: 0.0,
            origin_y: 0.0,
            dx: 100.0,
            dy: 100.0,
            spread: 2.0,
        }
    }

    #[test]
    fn test_empty_tree_has_no_nodes() {
        let idx = AvlIndex::<&str>::new();
        let l = layout(&idx, &unit());
        assert!(l.nodes.is_empty());
        assert!(l.edges.is_empty());
        assert!(l.bounds().is_none());
    }

    #[test]
    fn test_three_nodes_placed_symmetrically() {
        let idx = AvlIndex::from_records(["A", "B", "C"]).unwrap();
        let l = layout(&idx, &unit());
        let placed: Vec<_> = l.nodes.iter().map(|n| (*n.record, n.x, n.y, n.depth)).collect();
        assert_eq!(
            placed,
            vec![("B", 0.0, 0.0, 0), ("A", -100.0, 100.0, 1), ("C", 100.0, 100.0, 1)]
        );
        assert_eq!(l.edges.len(), 2);
    }

    #[test]
    fn test_offset_shrinks_per_level() {
        let idx = AvlIndex::from_records(["D", "B", "F", "A"]).unwrap();
        let l = layout(&idx, &unit());
        let a = l.nodes.iter().find(|n| *n.record == "A").unwrap();
        // D at 0, B at -100, A at -100 - 50.
        assert!(close(a.x, -150.0));
        assert!(close(a.y, 200.0));
        assert_eq!(a.depth, 2);
    }

    #[test]
    fn test_edge_length_and_angle() {
        let idx = AvlIndex::from_records(["B", "A", "C"]).unwrap();
        let l = layout(&idx, &unit());
        let root = idx.root().unwrap().position();
        let to_left = l
            .edges
            .iter()
            .find(|e| e.parent == root && e.to.0 < 0.0)
            .unwrap();
        let to_right = l
            .edges
            .iter()
            .find(|e| e.parent == root && e.to.0 > 0.0)
            .unwrap();
        assert!(close(to_left.length(), 100.0 * 2f32.sqrt()));
        assert!(close(to_left.angle_degrees(), 135.0));
        assert!(close(to_right.angle_degrees(), 45.0));
    }

    #[test]
    fn test_default_config_matches_constants() {
        let c = LayoutConfig::default();
        assert_eq!(c.dx, 800.0);
        assert_eq!(c.dy, 1000.0);
        assert_eq!(c.origin_y, 20.0);
        assert_eq!(c.spread, 1.5);
    }

    #[test]
    fn test_bounds_cover_all_nodes() {
        let idx = AvlIndex::from_records(["B", "A", "C"]).unwrap();
        let (x0, y0, x1, y1) = layout(&idx, &unit()).bounds().unwrap();
        assert_eq!((x0, y0, x1, y1), (-100.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_zoom_clamps() {
        let mut v = Viewport::new();
        assert!(close(v.scale(), 0.75));
        for _ in 0..20 {
            v.zoom(1.0);
        }
        assert!(close(v.scale(), 2.0));
        for _ in 0..40 {
            v.zoom(-1.0);
        }
        assert!(close(v.scale(), 0.5));
    }

    #[test]
    fn test_drag_scrolls_opposite() {
        let mut v = Viewport::new();
        v.drag(10.0, -4.0);
        assert_eq!(v.scroll(), (-10.0, 4.0));
    }
}
