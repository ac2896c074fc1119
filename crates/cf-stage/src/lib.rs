//! # cf-stage - ClusterForge Stage System
//!
//! Defines the stages a resolved round is played back through.
//! Presentation layers (rendering, audio, UI) never see engine internals; they only see STAGES.
//!
//! ## Philosophy
//!
//! The engine computes a complete round up front. Everything after that is playback:
//! - Spin starts → Grid dealt → Cascades → Feature transitions → Round complete
//!
//! This crate defines those stages and the timing profiles used to place them on a
//! presentation timeline. Timestamps are data; nothing here waits or sleeps.

pub mod event;
pub mod stage;
pub mod timing;
pub mod trace;

pub use event::*;
pub use stage::*;
pub use timing::*;
pub use trace::*;
