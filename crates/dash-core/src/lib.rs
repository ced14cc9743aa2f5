//! Dash Core Library
//!
//! Grid-based level model, versioned JSON level format and the fixed-step
//! runner simulation.
//!
//! The simulation is a pure function over an immutable [`GameState`]: every
//! [`world::step`] returns a fresh state or reports that the run ended.
//! [`Session`] wires the simulation, the editor and level storage together
//! the way a desktop shell would, minus any drawing.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod config;
pub mod edit;
pub mod editor;
pub mod files;
pub mod game;
pub mod game_loop;
pub mod generate;
pub mod input;
pub mod level;
pub mod session;
pub mod world;

pub use codec::{CodecError, FORMAT, VERSION, decode_level, encode_level, from_json, to_json};
pub use config::{ConfigError, GameConfig, StorageConfig};
pub use edit::{EditError, place_object, remove_object_at};
pub use editor::{EditorController, Tool};
pub use files::{FileError, LevelRepository, load_level, save_level};
pub use game::{GameState, PhysicsConfig, Player, SolidBlock, Spike};
pub use game_loop::{FIXED_DT, FixedStepLoop, TimingConfig};
pub use generate::{GeneratorConfig, generate_level};
pub use input::{InputState, JumpLatch};
pub use level::{LEVEL_HEIGHT_CELLS, LEVEL_LENGTH_CELLS, Level, LevelObject, ObjectKind};
pub use session::{Mode, Session, SessionError, SessionEvent};
pub use world::{Death, StepOutcome, step};
