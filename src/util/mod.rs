pub mod event;

pub use event::{AutoEvent, ManualEvent};
