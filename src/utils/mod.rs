pub mod logging;
pub mod task_slot;

pub use task_slot::TaskSlot;
