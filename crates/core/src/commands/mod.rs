mod error;
mod patch;

pub use error::{CommandError, CommandResult};
pub use patch::{
    already_installed_message, docs_url, failed_message, installed_message, warning_message,
    PatchConfirmations, PatchStep, CONFIRMATION_TIMEOUT,
};

use crate::config::ConfigStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use welcometale_text::{format, Segment};

pub const RELOAD_COMMAND: &str = "welcometale";
pub const PATCH_COMMAND: &str = "welcometalepatch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandSender {
    Player(u128),
    Console,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Send this message back to the sender.
    Reply(Vec<Segment>),
    /// The sender confirmed the patch. The host installs it and reports back
    /// with one of the patch messages.
    InstallPatch,
}

pub struct Commands {
    config: Arc<ConfigStore>,
    confirmations: PatchConfirmations,
}

impl Commands {
    pub fn new(config: Arc<ConfigStore>) -> Commands {
        Commands {
            config,
            confirmations: PatchConfirmations::default(),
        }
    }

    pub fn execute(
        &mut self,
        name: &str,
        sender: CommandSender,
        now: Instant,
    ) -> CommandResult<CommandOutcome> {
        match name {
            RELOAD_COMMAND => self.reload().map(CommandOutcome::Reply),
            PATCH_COMMAND => Ok(self.patch(sender, now)),
            _ => Err(CommandError::UnknownCommand {
                name: name.to_owned(),
            }),
        }
    }

    pub fn reload(&self) -> CommandResult<Vec<Segment>> {
        let config = self.config.reload()?;
        Ok(format(&config.message_reloaded))
    }

    pub fn patch(&mut self, sender: CommandSender, now: Instant) -> CommandOutcome {
        match self.confirmations.request(sender, now) {
            PatchStep::Warn => CommandOutcome::Reply(format(&warning_message())),
            PatchStep::Confirmed => {
                info!("Leave message patch confirmed by {:?}", sender);
                CommandOutcome::InstallPatch
            }
        }
    }

    /// The configured message for a sender without permission.
    pub fn no_permission(&self) -> Vec<Segment> {
        format(&self.config.get().no_permission)
    }

    /// Formats `err` the way it is shown in chat.
    pub fn error_message(err: &CommandError) -> Vec<Segment> {
        format(&format!("§cERROR: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WelcomeConfig;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use welcometale_text::visible_text;

    fn commands_with(path: impl Into<PathBuf>, config: WelcomeConfig) -> Commands {
        Commands::new(Arc::new(ConfigStore::new(path, config)))
    }

    #[test]
    fn patch_needs_confirmation() {
        let mut commands = commands_with("unused.toml", WelcomeConfig::default());
        let now = Instant::now();
        let sender = CommandSender::Player(1);

        let first = commands.execute(PATCH_COMMAND, sender, now).unwrap();
        match first {
            CommandOutcome::Reply(message) => {
                assert!(visible_text(&message).starts_with("====="));
            }
            CommandOutcome::InstallPatch => panic!("patch installed without confirmation"),
        }
        assert_eq!(
            commands.execute(PATCH_COMMAND, sender, now).unwrap(),
            CommandOutcome::InstallPatch
        );
    }

    #[test]
    fn reload_replies_with_new_message() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Config.toml");
        fs::write(&path, "message_reloaded = \"&bReloaded!\"\n").unwrap();
        let mut commands = Commands::new(Arc::new(ConfigStore::open(&path).unwrap()));

        let outcome = commands
            .execute(RELOAD_COMMAND, CommandSender::Console, Instant::now())
            .unwrap();
        match outcome {
            CommandOutcome::Reply(message) => assert_eq!(visible_text(&message), "Reloaded!"),
            CommandOutcome::InstallPatch => panic!("unexpected outcome"),
        }
    }

    #[test]
    fn reload_error_is_reported() {
        // A directory can't be read as a config file.
        let dir = TempDir::new().unwrap();
        let mut commands = commands_with(dir.path(), WelcomeConfig::default());
        let err = commands
            .execute(RELOAD_COMMAND, CommandSender::Console, Instant::now())
            .unwrap_err();
        assert!(matches!(err, CommandError::Reload(_)));
        let text = visible_text(&Commands::error_message(&err));
        assert!(text.starts_with("ERROR: Failed to reload configuration"));
    }

    #[test]
    fn reload_syntax_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Config.toml");
        fs::write(&path, "leave_message = [").unwrap();
        let mut commands = commands_with(&path, WelcomeConfig::default());

        let err = commands
            .execute(RELOAD_COMMAND, CommandSender::Console, Instant::now())
            .unwrap_err();
        let text = visible_text(&Commands::error_message(&err));
        assert!(text.contains(&format!("{} is not valid TOML: ", path.display())));
    }

    #[test]
    fn unknown_command() {
        let mut commands = commands_with("unused.toml", WelcomeConfig::default());
        assert!(matches!(
            commands.execute("spawn", CommandSender::Console, Instant::now()),
            Err(CommandError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn no_permission_uses_config() {
        let commands = commands_with(
            "unused.toml",
            WelcomeConfig {
                no_permission: "&cnope".to_owned(),
                ..Default::default()
            },
        );
        assert_eq!(visible_text(&commands.no_permission()), "nope");
    }
}
