pub mod list;
pub mod render;
pub mod run;
pub mod watch;

pub use list::handle_list_command;
pub use render::handle_render_command;
pub use run::{handle_run_command, RunOptions};
pub use watch::handle_watch_command;

use statuslite_core::{HostServices, StatusLiteConfig};
use std::path::Path;
use std::sync::Arc;

use crate::host::{ConfigPluginDirectory, ConsoleMessenger, StaticPermissions};

pub(crate) fn console_host(config: &StatusLiteConfig, out_dir: &Path, allow: bool) -> HostServices {
    console_host_with_messenger(config, Arc::new(ConsoleMessenger::new(out_dir)), allow)
}

pub(crate) fn console_host_with_messenger(
    config: &StatusLiteConfig,
    messenger: Arc<ConsoleMessenger>,
    allow: bool,
) -> HostServices {
    let permissions = if allow {
        StaticPermissions::allow_all()
    } else {
        StaticPermissions::deny_all()
    };

    HostServices::new(
        messenger,
        Arc::new(permissions),
        Arc::new(ConfigPluginDirectory::new(&config.host)),
    )
}
