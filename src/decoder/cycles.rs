use std::collections::HashSet;

use crate::{tags::IfdPointer, TiffError, TiffResult};

/// Guards the walk over the directory graph against revisiting a directory.
///
/// Two kinds of edges lead to a directory. The top-level chain follows `next` pointers; every
/// offset on it must be new, otherwise the chain loops. Sub-images hang below an image through
/// `SubIFD` pointers; a pointer back to any directory on the current descent path is a loop, and
/// the descent itself is bounded so a deep but acyclic nesting still terminates.
#[derive(Default, Debug)]
pub struct IfdCycles {
    chain: HashSet<IfdPointer>,
    path: Vec<IfdPointer>,
}

impl IfdCycles {
    pub fn new() -> Self {
        IfdCycles::default()
    }

    /// Record the next directory of the top-level chain.
    pub fn insert_chain(&mut self, ifd: IfdPointer) -> TiffResult<()> {
        if !self.chain.insert(ifd) {
            return Err(TiffError::CircularReference(ifd));
        }
        Ok(())
    }

    /// Descend into a directory. Must be paired with [`Self::leave`].
    pub fn enter(&mut self, ifd: IfdPointer, max_depth: usize) -> TiffResult<()> {
        if self.path.contains(&ifd) {
            return Err(TiffError::CircularReference(ifd));
        }
        if self.path.len() >= max_depth {
            return Err(TiffError::LimitsExceeded);
        }
        self.path.push(ifd);
        Ok(())
    }

    pub fn leave(&mut self) {
        self.path.pop();
    }

    /// Number of directories on the current descent path.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

#[test]
fn chain_cycles_are_detected() {
    let mut cycles = IfdCycles::new();

    cycles
        .insert_chain(IfdPointer(0x20))
        .expect("new offset is valid");
    cycles
        .insert_chain(IfdPointer(0x800))
        .expect("new offset is valid");

    match cycles.insert_chain(IfdPointer(0x20)) {
        Err(TiffError::CircularReference(IfdPointer(0x20))) => {}
        other => panic!("cycle must be detected, got {other:?}"),
    }
}

#[test]
fn reflective_cycle() {
    let mut cycles = IfdCycles::new();

    cycles.enter(IfdPointer(0x20), 8).expect("root is valid");
    cycles
        .enter(IfdPointer(0x20), 8)
        .expect_err("self-referential cycle must be detected");
}

#[test]
fn late_cycle() {
    let mut cycles = IfdCycles::new();

    for ifd in [0x20, 0x40, 0x60] {
        cycles.enter(IfdPointer(ifd), 8).expect("new descendant is valid");
    }

    cycles
        .enter(IfdPointer(0x20), 8)
        .expect_err("pointer to an ancestor must be detected");
}

#[test]
fn siblings_may_share_a_directory() {
    let mut cycles = IfdCycles::new();

    cycles.enter(IfdPointer(0x20), 8).unwrap();
    cycles.enter(IfdPointer(0x40), 8).unwrap();
    cycles.leave();
    cycles
        .enter(IfdPointer(0x40), 8)
        .expect("a directory that is not an ancestor is no cycle");
    assert_eq!(cycles.depth(), 2);
}

#[test]
fn depth_is_bounded() {
    let mut cycles = IfdCycles::new();

    for ifd in 0..4 {
        cycles.enter(IfdPointer(8 + ifd * 2), 4).unwrap();
    }

    match cycles.enter(IfdPointer(0x100), 4) {
        Err(TiffError::LimitsExceeded) => {}
        other => panic!("depth limit must apply, got {other:?}"),
    }
}
