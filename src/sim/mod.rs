pub mod event;
pub mod history;
pub mod level;
pub mod save;
pub mod step;
pub mod world;
