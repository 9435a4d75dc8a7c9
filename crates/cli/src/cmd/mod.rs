mod run;
mod validate;

pub use run::cmd_run;
pub use validate::cmd_validate;
