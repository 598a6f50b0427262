pub mod date;
pub mod event;
pub mod group;
pub mod slot;
pub mod summary;
pub mod view;
