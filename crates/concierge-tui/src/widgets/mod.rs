//! Reusable widget helpers shared by screens.

pub mod text_input;
