use super::CommandSender;
use crate::update::REPO_URL;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a first `/welcometalepatch` waits for its confirmation.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStep {
    /// First request, or the previous one expired. Show the warning.
    Warn,
    /// Second request inside the window. The host installs the patch.
    Confirmed,
}

/// Tracks who asked to install the leave message patch and when.
#[derive(Debug)]
pub struct PatchConfirmations {
    pending: HashMap<CommandSender, Instant>,
    timeout: Duration,
}

impl Default for PatchConfirmations {
    fn default() -> Self {
        PatchConfirmations::with_timeout(CONFIRMATION_TIMEOUT)
    }
}

impl PatchConfirmations {
    pub fn with_timeout(timeout: Duration) -> PatchConfirmations {
        PatchConfirmations {
            pending: HashMap::new(),
            timeout,
        }
    }

    pub fn request(&mut self, sender: CommandSender, now: Instant) -> PatchStep {
        let timeout = self.timeout;
        self.pending
            .retain(|_, first| now.saturating_duration_since(*first) < timeout);

        if self.pending.remove(&sender).is_some() {
            debug!("Patch confirmed by {:?}", sender);
            return PatchStep::Confirmed;
        }
        self.pending.insert(sender, now);
        PatchStep::Warn
    }

    pub fn is_pending(&self, sender: CommandSender, now: Instant) -> bool {
        self.pending
            .get(&sender)
            .is_some_and(|first| now.saturating_duration_since(*first) < self.timeout)
    }
}

pub fn docs_url() -> String {
    format!("{}/blob/main/leaveWorldMessagePatch.md", REPO_URL)
}

pub fn warning_message() -> String {
    [
        "§e==============================================",
        "§e§lWARNING",
        "§fYou are about to install an §eearlyplugin§f that modifies",
        "§fthe server's default behavior.",
        "",
        "§eWhat it does:",
        "§f• Disables the default \"player left world\" message",
        "§f• Uses the server's official earlyplugins system",
        "§f• Only affects the leave message broadcast",
        "",
        "§fFor detailed technical documentation, visit:",
        &format!("§b§n{}", docs_url()),
        "",
        "§cUse at your own risk!",
        "§fRun §e/welcometalepatch §fagain within §e10 minutes§f to confirm.",
        "§fA server restart will be required after installation.",
        "§e==============================================",
    ]
    .join("\n")
}

pub fn installed_message(path: &Path) -> String {
    [
        "§a==============================================",
        "§a§lPATCH INSTALLED!",
        "§fThe earlyplugin has been installed to:",
        "§a{path}",
        "",
        "§eServer restart required to apply changes.",
        "§fAfter restart, the default leave messages will be disabled.",
        "§a==============================================",
    ]
    .join("\n")
    .replace("{path}", &path.display().to_string())
}

pub fn already_installed_message(path: &Path) -> String {
    [
        "§e==============================================",
        "§e§lALREADY INSTALLED",
        "§fThe patch was previously installed at:",
        &format!("§7{}", path.display()),
        "",
        "§fIf you need to reinstall, delete the file first.",
        "§e==============================================",
    ]
    .join("\n")
}

pub fn failed_message(reason: &str) -> String {
    format!("§cERROR: Failed to install patch: {}", reason)
}
