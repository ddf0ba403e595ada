mod action;
mod alert;
mod backend;
mod clock;
mod error;
mod event;
mod filing;
mod market;
mod message;
mod notifier;
mod preferences;
mod reference;
mod session;
mod slash_commands;
mod storage;
mod surface;
mod widget;

pub use action::*;
pub use alert::*;
pub use backend::*;
pub use clock::*;
pub use error::*;
pub use event::*;
pub use filing::*;
pub use market::*;
pub use message::*;
pub use notifier::*;
pub use preferences::*;
pub use reference::*;
pub use session::*;
pub use slash_commands::*;
pub use storage::*;
pub use surface::*;
pub use widget::*;
