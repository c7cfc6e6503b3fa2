use crate::config::WelcomeConfig;
use welcometale_text::{format, Segment};

pub const PLAYER_PLACEHOLDER: &str = "{player}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Broadcast when a player is ready.
    Join,
    /// Sent privately to the player who joined.
    Welcome,
    /// Broadcast when a player leaves.
    Leave,
}

impl MessageKind {
    pub const ALL: [MessageKind; 3] = [MessageKind::Join, MessageKind::Welcome, MessageKind::Leave];

    pub fn template(self, config: &WelcomeConfig) -> &str {
        match self {
            MessageKind::Join => config.join_message.as_str(),
            MessageKind::Welcome => config.welcome_player_message.as_str(),
            MessageKind::Leave => config.leave_message.as_str(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Join => "join",
            MessageKind::Welcome => "welcome",
            MessageKind::Leave => "leave",
        }
    }

    /// Renders this message for `player`, or `None` if the configured message
    /// is blank and nothing should be sent.
    pub fn render(self, config: &WelcomeConfig, player: &str) -> Option<Vec<Segment>> {
        render_template(self.template(config), player)
    }
}

pub fn substitute_player(template: &str, player: &str) -> String {
    template.replace(PLAYER_PLACEHOLDER, player)
}

pub fn render_template(template: &str, player: &str) -> Option<Vec<Segment>> {
    let message = substitute_player(template, player);
    if message.trim().is_empty() {
        return None;
    }
    Some(format(&message))
}
