pub mod classrooms;
pub mod lots;
pub mod permits;
pub mod schedules;
