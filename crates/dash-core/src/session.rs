//! Application shell without a window.
//!
//! Owns the current run, the editor and the beaten-level archive, and drives
//! the world through the fixed-step loop. A front end only has to forward
//! frame deltas, sampled input and editor clicks.

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::GameConfig;
use crate::editor::EditorController;
use crate::files::{FileError, LevelRepository};
use crate::game::GameState;
use crate::game_loop::FixedStepLoop;
use crate::generate::generate_level;
use crate::input::InputState;
use crate::level::Level;
use crate::world::{self, Death, StepOutcome};

/// Which half of the application is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Play,
    Editor,
}

/// Something the front end may want to show.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The run restarted from the beginning of the same level.
    Died { death: Death, frame: u64 },
    /// The level was archived and a new one generated.
    Completed { levels_beaten: u32, path: PathBuf },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    File(#[from] FileError),
}

#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    mode: Mode,
    state: GameState,
    editor: EditorController,
    rng: ChaCha8Rng,
    repository: LevelRepository,
    levels_beaten: u32,
    game_loop: FixedStepLoop,
}

impl Session {
    /// Creates a session in editor mode with a freshly generated level.
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let repository = LevelRepository::new(&config.storage.base_dir)?;

        let initial = generate_level(&mut rng, &config.generator);
        let state = GameState::from_level(Arc::new(initial.clone()), &config.physics);
        let game_loop = FixedStepLoop::new(config.timing.clone());

        tracing::info!(seed, levels_dir = %repository.levels_dir().display(), "Session created");

        Ok(Self {
            mode: Mode::Editor,
            state,
            editor: EditorController::new(initial),
            rng,
            repository,
            levels_beaten: 0,
            game_loop,
            config,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn editor(&self) -> &EditorController {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorController {
        &mut self.editor
    }

    pub fn repository(&self) -> &LevelRepository {
        &self.repository
    }

    pub fn levels_beaten(&self) -> u32 {
        self.levels_beaten
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn show_play(&mut self) {
        tracing::info!("Switching to play mode");
        self.mode = Mode::Play;
    }

    pub fn show_editor(&mut self) {
        tracing::info!("Switching to editor mode");
        self.mode = Mode::Editor;
    }

    /// Starts a fresh run of the level currently in the editor.
    pub fn play_editor_level(&mut self) {
        self.start_run(Arc::new(self.editor.level().clone()));
        self.show_play();
    }

    fn start_run(&mut self, level: Arc<Level>) {
        self.state = GameState::from_level(level, &self.config.physics);
        self.game_loop.reset();
    }

    /// Advances play by one host frame.
    ///
    /// The jump in `input` applies to the first fixed step only; later steps
    /// in the same frame see no input. Does nothing in editor mode.
    pub fn update(
        &mut self,
        frame_dt: f32,
        input: InputState,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        if self.mode == Mode::Editor {
            return Ok(Vec::new());
        }

        let dt = self.game_loop.fixed_dt();
        let state = &mut self.state;
        let mut input = input;
        let mut ended = None;

        self.game_loop.advance(frame_dt, |_| match world::step(state, input, dt) {
            StepOutcome::Running(next) => {
                *state = next;
                input = InputState::NONE;
                ControlFlow::Continue(())
            }
            outcome => {
                ended = Some(outcome);
                ControlFlow::Break(())
            }
        });

        let event = match ended {
            None | Some(StepOutcome::Running(_)) => return Ok(Vec::new()),
            Some(StepOutcome::Died(death)) => {
                let frame = self.state.frame;
                tracing::info!(?death, frame, "Player died, restarting level");
                self.start_run(self.state.level.clone());
                SessionEvent::Died { death, frame }
            }
            Some(StepOutcome::Completed) => self.complete_level()?,
        };
        Ok(vec![event])
    }

    /// Archives the finished level and moves on to a new one.
    fn complete_level(&mut self) -> Result<SessionEvent, SessionError> {
        let index = self.levels_beaten + 1;
        let saved = self.repository.save_beaten_level(&self.state.level, index);
        let path = match saved {
            Ok(path) => path,
            Err(e) => {
                // Keep the session playable: replay the same level.
                self.start_run(self.state.level.clone());
                return Err(e.into());
            }
        };
        self.levels_beaten = index;

        let next = generate_level(&mut self.rng, &self.config.generator);
        tracing::info!(
            levels_beaten = index,
            objects = next.objects.len(),
            "Level completed, starting next"
        );
        self.start_run(Arc::new(next));

        Ok(SessionEvent::Completed {
            levels_beaten: index,
            path,
        })
    }
}
