use crate::domain::model::State;
use crate::utils::error::Result;

/// Snapshot contract consumed by external state and undo managers.
pub trait StateObject: Sized {
    fn get_state(&self, short: bool) -> State;
    fn load_state(&mut self, state: State);
    fn from_state(state: State) -> Self;
}

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}
