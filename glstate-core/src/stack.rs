/// Save/restore stack for graphics states
use log::trace;

use crate::error::TransformError;

/// A state that can be copied into an independent frame
pub trait GraphicsState: Sized {
    /// Produce a copy that shares no mutable data with `self`
    fn push(&self) -> Self;
}

/// Current state plus the frames saved by [`StateStack::push`]
#[derive(Debug, Clone)]
pub struct StateStack<S> {
    current: S,
    saved: Vec<S>,
}

impl<S: GraphicsState> StateStack<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> &S {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut S {
        &mut self.current
    }

    /// Number of saved frames
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Save the current state and continue with a copy of it
    pub fn push(&mut self) {
        let next = self.current.push();
        self.saved.push(std::mem::replace(&mut self.current, next));
        trace!("state stack depth {}", self.saved.len());
    }

    /// Restore the last saved state, returning the one being discarded
    pub fn pop(&mut self) -> Result<S, TransformError> {
        let restored = self.saved.pop().ok_or(TransformError::StackUnderflow)?;
        trace!("state stack depth {}", self.saved.len());
        Ok(std::mem::replace(&mut self.current, restored))
    }
}

impl<S: GraphicsState + Default> Default for StateStack<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
