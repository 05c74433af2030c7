//! Locating the base Python interpreter.

pub mod python_sys;
