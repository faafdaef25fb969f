//! Audio-reactive interactive fluid simulation.
//!
//! A stable-fluids solver on a fixed square grid, with double-buffered
//! fields, a particle overlay, and a bloom compositor producing an RGBA8
//! frame at display resolution. The crate is framework-agnostic: hosts own
//! the window, pointer events, and audio capture, and drive an explicit
//! `step(); render();` loop through [`FluidSession`].
//!
//! ```no_run
//! use sim::{FluidSession, SimulationConfig};
//!
//! let mut session = FluidSession::new(SimulationConfig::default(), 800, 600)?;
//! session.add_velocity(400.0, 300.0, 5.0, -2.0);
//! session.step();
//! let frame = session.render(); // RGBA8, 800 * 600 * 4 bytes
//! # let _ = frame;
//! # Ok::<(), sim::SessionError>(())
//! ```

pub mod audio;
pub mod compositor;
pub mod config;
pub mod error;
pub mod field;
pub mod impulse;
pub mod kernel;
pub mod palette;
pub mod particles;
pub mod session;
pub mod solver;
pub mod store;

pub use audio::AudioFrame;
pub use config::{SimulationConfig, DT, MAX_PARTICLES, SIM_RESOLUTION};
pub use error::{FieldError, SessionError};
pub use field::{Field, FieldPair};
pub use palette::Palette;
pub use session::FluidSession;
pub use store::FieldStore;
