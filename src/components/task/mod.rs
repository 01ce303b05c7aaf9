mod polar;
mod static_task;
mod view;

pub use polar::GlidePolar;
pub use static_task::{StaticTask, TaskPoint};
pub use view::{share_task, LegStats, SharedTask, TaskProgressView};
