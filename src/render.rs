//! Numbered listing of an ordered sequence.

use std::fmt::Display;

/// One line per node, numbered from 1: `"1:\tfirst\n2:\tsecond\n"`.
pub fn render_numbered<N: Display>(order: &[N]) -> String {
    order
        .iter()
        .enumerate()
        .map(|(i, node)| format!("{}:\t{node}\n", i + 1))
        .collect()
}
