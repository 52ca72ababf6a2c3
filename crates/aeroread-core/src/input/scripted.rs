use std::collections::VecDeque;

use super::{InputProvider, KeyCommand};

/// Replays a fixed command list, one per poll. Used by tests and demos.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    pending: VecDeque<KeyCommand>,
}

impl ScriptedInput {
    pub fn new(commands: impl IntoIterator<Item = KeyCommand>) -> Self {
        Self {
            pending: commands.into_iter().collect(),
        }
    }

    pub fn push(&mut self, command: KeyCommand) {
        self.pending.push_back(command);
    }

    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }
}

impl InputProvider for ScriptedInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<KeyCommand>, Self::Error> {
        Ok(self.pending.pop_front())
    }
}
