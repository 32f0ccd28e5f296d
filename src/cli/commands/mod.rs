pub mod backup;
pub mod config;
pub mod entry;
pub mod report;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(entry::definitions())
        .chain(report::definitions())
        .chain(config::definitions())
        .chain(backup::definitions())
    {
        registry.register(entry);
    }
}
