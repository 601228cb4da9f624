mod build;
mod bundle;
mod check_layout;
mod doctor;
mod eject;
mod init;
mod serve;

pub use build::build;
pub use bundle::{bundle, dockerfile};
pub use check_layout::check_layout;
pub use doctor::doctor;
pub use eject::eject;
pub use init::init_project;
pub use serve::serve;
