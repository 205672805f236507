pub mod dashboard;
pub mod inventory;
pub mod lifecycle;
pub mod scheduling;
