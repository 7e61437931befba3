pub mod allocation;
pub mod due_dates;

pub use allocation::AmountAllocator;
pub use due_dates::DueDateScheduler;
