use crate::figma::{FigmaFile, FigmaNode};

/// Depth-first pre-order walk over the document's children.
///
/// The document node itself is not visited; its direct children are at
/// depth 0.
pub fn walk<F>(file: &FigmaFile, mut visit: F)
where
    F: FnMut(&FigmaNode, usize),
{
    for child in &file.document.children {
        walk_node(child, 0, &mut visit);
    }
}

fn walk_node<F>(node: &FigmaNode, depth: usize, visit: &mut F)
where
    F: FnMut(&FigmaNode, usize),
{
    visit(node, depth);
    for child in &node.children {
        walk_node(child, depth + 1, visit);
    }
}
