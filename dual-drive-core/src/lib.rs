//! Core drivers and the control loop for a potentiometer-driven dual motor board on
//! no-std embedded platforms.
//!
//! For a runnable host simulation, see the `dual-drive-app/mock-mcu` binary.
#![no_std]

pub mod utils;
