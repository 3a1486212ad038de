pub mod error;
pub mod key;
pub mod table;

pub use error::CommandTableError;
pub use key::{Key, KeyChord, Modifiers};
pub use table::{CommandEntry, CommandTable};
