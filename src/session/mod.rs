pub mod clock;
pub mod controller;
pub mod input;
pub mod phrase;
pub mod state;
pub mod timer;
