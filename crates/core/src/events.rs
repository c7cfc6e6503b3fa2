use crate::config::ConfigStore;
use crate::messages::MessageKind;
use std::sync::Arc;
use tracing::debug;
use welcometale_text::Segment;

/// Where rendered messages go. Implemented by the host server.
pub trait ChatSink {
    /// Sends `message` to every online player.
    fn broadcast(&mut self, message: &[Segment]);

    /// Sends `message` to a single player.
    fn send_to(&mut self, player: &str, message: &[Segment]);
}

pub struct PlayerEvents {
    config: Arc<ConfigStore>,
}

impl PlayerEvents {
    pub fn new(config: Arc<ConfigStore>) -> PlayerEvents {
        PlayerEvents { config }
    }

    pub fn on_player_ready(&self, player: &str, sink: &mut impl ChatSink) {
        let config = self.config.get();
        if let Some(message) = MessageKind::Join.render(&config, player) {
            debug!("Broadcasting join message for {}", player);
            sink.broadcast(&message);
        }
        if let Some(message) = MessageKind::Welcome.render(&config, player) {
            sink.send_to(player, &message);
        }
    }

    /// Whether the host should still broadcast its own join line.
    pub fn on_player_add_to_world(&self) -> bool {
        !self.config.get().disable_default_join_message
    }

    pub fn on_player_leave(&self, player: &str, sink: &mut impl ChatSink) {
        let config = self.config.get();
        if let Some(message) = MessageKind::Leave.render(&config, player) {
            debug!("Broadcasting leave message for {}", player);
            sink.broadcast(&message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WelcomeConfig;
    use welcometale_text::visible_text;

    #[derive(Default)]
    struct RecordingSink {
        broadcasts: Vec<String>,
        private: Vec<(String, String)>,
    }

    impl ChatSink for RecordingSink {
        fn broadcast(&mut self, message: &[Segment]) {
            self.broadcasts.push(visible_text(message));
        }

        fn send_to(&mut self, player: &str, message: &[Segment]) {
            self.private.push((player.to_owned(), visible_text(message)));
        }
    }

    fn events(config: WelcomeConfig) -> PlayerEvents {
        PlayerEvents::new(Arc::new(ConfigStore::new("unused.toml", config)))
    }

    #[test]
    fn ready_sends_join_and_welcome() {
        let events = events(WelcomeConfig::default());
        let mut sink = RecordingSink::default();
        events.on_player_ready("Steve", &mut sink);

        assert_eq!(sink.broadcasts, vec![" > Steve joined"]);
        assert_eq!(
            sink.private,
            vec![(
                "Steve".to_owned(),
                "Welcome Steve to the server!".to_owned()
            )]
        );
    }

    #[test]
    fn blank_messages_are_not_sent() {
        let events = events(WelcomeConfig {
            join_message: " ".into(),
            welcome_player_message: "".into(),
            leave_message: "\n".into(),
            ..Default::default()
        });
        let mut sink = RecordingSink::default();
        events.on_player_ready("Steve", &mut sink);
        events.on_player_leave("Steve", &mut sink);
        assert!(sink.broadcasts.is_empty());
        assert!(sink.private.is_empty());
    }

    #[test]
    fn leave_is_broadcast() {
        let events = events(WelcomeConfig {
            leave_message: ["&cBye {player}", "&7see you"].join("\n").as_str().into(),
            ..Default::default()
        });
        let mut sink = RecordingSink::default();
        events.on_player_leave("Alex", &mut sink);
        assert_eq!(sink.broadcasts, vec!["Bye Alex\nsee you"]);
    }

    #[test]
    fn default_join_line() {
        assert!(!events(WelcomeConfig::default()).on_player_add_to_world());
        let events = events(WelcomeConfig {
            disable_default_join_message: false,
            ..Default::default()
        });
        assert!(events.on_player_add_to_world());
    }
}
