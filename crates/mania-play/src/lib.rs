// Play session: clock, input sources, game loop, views and results

pub mod game_loop;
pub mod input;
pub mod result;
pub mod session;
pub mod timer;
pub mod view;

pub use game_loop::GameLoop;
pub use input::{AUTOPLAY_PRESS_MS, AutoplayInput, InputProvider, KeyEvent, ScriptedInput};
pub use result::PlayResult;
pub use session::PlaySession;
pub use timer::{FramePacer, ManualTimeProvider, SystemTimeProvider, TimeProvider};
pub use view::{HudView, LaneView, ObjectView};
