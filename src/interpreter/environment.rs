use std::collections::{HashMap, HashSet};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, lexer::Pos, value::core::Primitive},
};

/// One scope frame: bindings, which of them are mutable, and the frame's
/// parent in the arena.
#[derive(Debug, Default)]
struct Frame {
    values:   HashMap<String, Primitive>,
    mutables: HashSet<String>,
    parent:   Option<usize>,
}

/// The environment: an arena of scope frames addressed by index.
///
/// Frames hold a name-to-value map, the set of names declared mutable, and
/// their parent's index; the global frame sits at index zero with no
/// parent. Closures keep the index of their defining frame, so "the
/// ancestor at depth d" is d integer hops with no shared-ownership cycles.
///
/// Both failure modes here are environment errors, never silent: assigning
/// to a name outside the mutable set fails, and reading or assigning an
/// undeclared name fails.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Index of the global frame.
    pub const GLOBAL: usize = 0;

    /// Creates an environment holding only the global frame.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![Frame::default()] }
    }

    /// Appends a fresh frame whose parent is `parent`, returning its index.
    pub fn push_frame(&mut self, parent: usize) -> usize {
        self.frames.push(Frame { parent: Some(parent),
                                 ..Frame::default() });
        self.frames.len() - 1
    }

    /// Declares `name` in `frame`, overwriting any previous binding there.
    ///
    /// Duplicate declarations in one scope are rejected statically by the
    /// resolver, so overwriting here only happens for the dynamic global
    /// frame across successive declarations.
    pub fn define(&mut self, frame: usize, name: &str, value: Primitive, mutable: bool) {
        let frame = &mut self.frames[frame];
        frame.values.insert(name.to_string(), value);
        if mutable {
            frame.mutables.insert(name.to_string());
        } else {
            frame.mutables.remove(name);
        }
    }

    /// Reads `name`, walking enclosing frames from `frame` outward.
    ///
    /// # Errors
    /// `UndefinedVariable` when no enclosing frame binds the name.
    pub fn get(&self, frame: usize, name: &str, pos: Pos) -> EvalResult<Primitive> {
        let mut current = Some(frame);
        while let Some(index) = current {
            if let Some(value) = self.frames[index].values.get(name) {
                return Ok(value.clone());
            }
            current = self.frames[index].parent;
        }
        Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                              pos })
    }

    /// Assigns to `name`, walking enclosing frames from `frame` outward.
    ///
    /// # Errors
    /// `AssignToImmutable` when the binding exists but was declared with
    /// `let`; `UndefinedVariable` when no enclosing frame binds the name.
    pub fn assign(&mut self,
                  frame: usize,
                  name: &str,
                  value: Primitive,
                  pos: Pos)
                  -> EvalResult<()> {
        let mut current = Some(frame);
        while let Some(index) = current {
            if self.frames[index].values.contains_key(name) {
                if !self.frames[index].mutables.contains(name) {
                    return Err(RuntimeError::AssignToImmutable { name: name.to_string(),
                                                                 pos });
                }
                self.frames[index].values.insert(name.to_string(), value);
                return Ok(());
            }
            current = self.frames[index].parent;
        }
        Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                              pos })
    }

    /// Reads `name` directly from the ancestor `depth` hops above `frame`.
    ///
    /// # Errors
    /// `UndefinedVariable` when the resolved frame lacks the name, which
    /// indicates a resolver/runtime mismatch rather than user error.
    pub fn get_at(&self, frame: usize, depth: usize, name: &str, pos: Pos)
                  -> EvalResult<Primitive> {
        let index = self.ancestor(frame, depth);
        self.frames[index]
            .values
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             pos })
    }

    /// Assigns to `name` directly in the ancestor `depth` hops above
    /// `frame`.
    ///
    /// # Errors
    /// Same rules as [`Environment::assign`], applied to the one frame.
    pub fn assign_at(&mut self,
                     frame: usize,
                     depth: usize,
                     name: &str,
                     value: Primitive,
                     pos: Pos)
                     -> EvalResult<()> {
        let index = self.ancestor(frame, depth);
        if !self.frames[index].values.contains_key(name) {
            return Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                                         pos });
        }
        if !self.frames[index].mutables.contains(name) {
            return Err(RuntimeError::AssignToImmutable { name: name.to_string(),
                                                         pos });
        }
        self.frames[index].values.insert(name.to_string(), value);
        Ok(())
    }

    /// The frame `depth` parent-hops above `frame`.
    fn ancestor(&self, frame: usize, depth: usize) -> usize {
        let mut index = frame;
        for _ in 0..depth {
            index = self.frames[index].parent.unwrap_or(Self::GLOBAL);
        }
        index
    }
}
