pub mod log_buffer;
pub mod task;

pub use log_buffer::LogBuffer;
pub use task::TaskGuard;
