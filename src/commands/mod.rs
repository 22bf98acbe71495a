pub mod health;
pub mod latest;
pub mod predict;
pub mod show;
