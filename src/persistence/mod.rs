//! Persistence of the engine's identity and contact state.

pub mod savedata;

pub use savedata::{
    load_savedata, save_savedata, temp_path, write_atomic, PersistenceError, SaveOutcome,
};
