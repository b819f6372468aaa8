//! Visual bookkeeping layered over the live set.
//!
//! These fields observe the board and never feed back into it. Fade advances
//! once per rendered frame; heat and trace advance once per generation.

mod fade;
mod heat;
mod trace;

pub use fade::FadeField;
pub use heat::{HeatField, HeatSettings};
pub use trace::TraceField;
