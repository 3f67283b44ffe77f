pub mod entities;
pub mod hit_event;
pub mod hit_worker;
pub mod repositories;
