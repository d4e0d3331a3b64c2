pub mod corner_loop;
pub mod pline;

pub use corner_loop::{Loop, LoopSet, Winding};
pub use pline::Pline;
