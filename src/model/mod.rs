pub mod access;
pub mod candidate;
pub mod common;
pub mod election;
pub mod event;
pub mod results;
pub mod voter;
