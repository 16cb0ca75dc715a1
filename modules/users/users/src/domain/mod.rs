pub mod controller;
pub mod greeting;
pub mod ports;
pub mod state;
