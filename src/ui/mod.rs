//! UI module - reusable widgets for the panels rendered in main.rs

pub mod components;
