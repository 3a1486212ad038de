pub mod find;
pub mod input_buffer;
pub mod load;
pub mod mode;
pub mod tabs;
pub mod ui;

pub use find::{FindDirection, FindSettings, FindState};
pub use input_buffer::{InputBuffer, TextAction};
pub use load::LoadState;
pub use mode::{ArgumentKind, Mode, PostprocessPolicy};
pub use tabs::{TabArgError, TabId, TabKind, TabState, TabsManager};
pub use ui::UIState;
