pub mod bars;
pub mod content;
pub mod modals;
