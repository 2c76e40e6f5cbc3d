//! Stat computation shared by the cost model and combat.
//!
//! - [`bonus`]: layered bonus stacks (flat, increased, more, less)
//! - [`speed`]: effective speed and speed-scaled action cost

pub mod bonus;
pub mod speed;

pub use bonus::{Bonus, BonusStack};
pub use speed::{calculate_action_cost, effective_speed};
