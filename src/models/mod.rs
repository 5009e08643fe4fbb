pub mod directive;
pub mod events;
pub mod execution;
pub mod package;
pub mod settings;
pub mod uninstall;

pub use directive::*;
pub use events::*;
pub use execution::*;
pub use package::*;
pub use settings::*;
pub use uninstall::*;
