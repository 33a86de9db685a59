pub mod deployment_updater;
pub mod option_lister;

pub use deployment_updater::DeploymentUpdater;
pub use option_lister::{ListOption, OptionLister};
