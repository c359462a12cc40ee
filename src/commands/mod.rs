mod accept;
mod audit;
mod baselines;

pub use accept::run_accept_command;
pub use audit::run_audit_command;
pub use baselines::run_baselines_command;
