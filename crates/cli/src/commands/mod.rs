pub mod init;
pub mod run;

pub use init::init_command;
pub use run::run_command;
