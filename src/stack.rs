//src/stack.rs

use crate::error::{KegError, Result};
use crate::types::RawLine;

/// The currently open ancestor lines, root at the bottom.
/// Depths strictly increase from bottom to top.
#[derive(Debug, Default)]
pub struct HierarchyStack {
    frames: Vec<RawLine>,
}

impl HierarchyStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: RawLine) {
        debug_assert!(
            self.frames.last().map_or(true, |top| top.depth < line.depth),
            "pushed depth {} onto depth {:?}",
            line.depth,
            self.frames.last().map(|top| top.depth)
        );
        self.frames.push(line);
    }

    pub fn pop(&mut self) -> Result<RawLine> {
        self.frames.pop().ok_or(KegError::EmptyStack)
    }

    pub fn top(&self) -> Result<&RawLine> {
        self.frames.last().ok_or(KegError::EmptyStack)
    }

    pub fn height(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pops every frame at `depth` or deeper, closing siblings and their
    /// descendants before a line at `depth` is handled.
    pub fn close_to(&mut self, depth: usize) -> Result<()> {
        while !self.is_empty() && depth <= self.top()?.depth {
            self.pop()?;
        }
        Ok(())
    }

    /// Open ancestors, nearest first.
    pub fn iter_from_top(&self) -> impl Iterator<Item = &RawLine> + '_ {
        self.frames.iter().rev()
    }

    /// Depths from bottom to top.
    pub fn depths(&self) -> Vec<usize> {
        self.frames.iter().map(|frame| frame.depth).collect()
    }
}
