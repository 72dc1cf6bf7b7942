//! catalog tree: print the index shape and the diagram geometry.
//!
//! The shape is printed pre-order, one node per line, indented by depth and
//! tagged `L:`/`R:` for the side it hangs on.

use anyhow::Result;
use catalog::{layout, Book, BookIndex, LayoutConfig, NodeRef};
use colored::Colorize;

pub fn run(index: &BookIndex, dx: f32, dy: f32, shape_only: bool) -> Result<()> {
    if index.is_empty() {
        println!("{}", "Empty catalogue".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("{} nodes, height {}", index.len(), index.height()).bold()
    );
    print!("{}", render_shape(index));

    if !shape_only {
        let config = LayoutConfig {
            dx,
            dy,
            ..LayoutConfig::default()
        };
        println!();
        print!("{}", render_layout(index, &config));
    }
    Ok(())
}

/// Node coordinates then edge geometry, one per line.
pub(crate) fn render_layout(index: &BookIndex, config: &LayoutConfig) -> String {
    let tree = layout(index, config);
    let mut out = format!("{}\n", "nodes (pos: x, y)".bold());
    for n in &tree.nodes {
        out.push_str(&format!(
            "{:>4}: {:>10.1}, {:>8.1}  {}\n",
            n.position.get(),
            n.x,
            n.y,
            n.record.title
        ));
    }
    out.push_str(&format!("{}\n", "edges (parent -> child: length, angle)".bold()));
    for e in &tree.edges {
        out.push_str(&format!(
            "{:>4} -> {:<4}: {:>8.1}px, {:>6.1}deg\n",
            e.parent.get(),
            e.child.get(),
            e.length(),
            e.angle_degrees()
        ));
    }
    out
}

pub(crate) fn render_shape(index: &BookIndex) -> String {
    let mut out = String::new();
    let mut stack: Vec<(NodeRef<'_, Book>, usize, &str)> =
        index.root().map(|root| (root, 0, "")).into_iter().collect();

    while let Some((node, depth, side)) = stack.pop() {
        out.push_str(&format!(
            "{}{}{} (pos {}, bal {})\n",
            "    ".repeat(depth),
            side,
            node.record().title,
            node.position(),
            node.balance()
        ));
        let depth = depth.saturating_add(1);
        if let Some(right) = node.right() {
            stack.push((right, depth, "R: "));
        }
        if let Some(left) = node.left() {
            stack.push((left, depth, "L: "));
        }
    }
    out
}
