// Key binding configuration and remapping

use super::action::{default_bindings, Action, InputSource};
use std::collections::HashMap;

/// Maps input sources (keys) to game actions
#[derive(Debug, Clone)]
pub struct InputConfig {
    bindings: HashMap<InputSource, Action>,

    /// Reverse mapping (action -> all sources)
    action_to_sources: HashMap<Action, Vec<InputSource>>,
}

impl InputConfig {
    /// Configuration with no bindings at all
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
            action_to_sources: HashMap::new(),
        }
    }

    pub fn from_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::empty();
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Bind a source to an action, replacing whatever the source did before
    pub fn bind(&mut self, source: InputSource, action: Action) {
        self.unbind_source(source);
        self.bindings.insert(source, action);
        self.action_to_sources
            .entry(action)
            .or_default()
            .push(source);
    }

    pub fn unbind_source(&mut self, source: InputSource) {
        if let Some(action) = self.bindings.remove(&source) {
            if let Some(sources) = self.action_to_sources.get_mut(&action) {
                sources.retain(|s| *s != source);
                if sources.is_empty() {
                    self.action_to_sources.remove(&action);
                }
            }
        }
    }

    pub fn unbind_action(&mut self, action: Action) {
        if let Some(sources) = self.action_to_sources.remove(&action) {
            for source in sources {
                self.bindings.remove(&source);
            }
        }
    }

    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }

    pub fn get_sources(&self, action: Action) -> Vec<InputSource> {
        self.action_to_sources
            .get(&action)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_binding(&self, action: Action) -> bool {
        self.action_to_sources.contains_key(&action)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
        self.action_to_sources.clear();
    }

    pub fn reset_to_defaults(&mut self) {
        self.clear();
        for (source, action) in default_bindings() {
            self.bind(source, action);
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::from_bindings(default_bindings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_default_arrow_keys() {
        let config = InputConfig::default();
        assert_eq!(
            config.get_action(InputSource::key(KeyCode::ArrowLeft)),
            Some(Action::MoveLeft)
        );
        assert_eq!(
            config.get_action(InputSource::key(KeyCode::Tab)),
            Some(Action::SlowMotion)
        );
        assert_eq!(
            config.get_action(InputSource::key(KeyCode::Enter)),
            Some(Action::Restart)
        );
    }

    #[test]
    fn test_bind_alternate_source() {
        let mut config = InputConfig::default();
        config.bind(InputSource::key(KeyCode::KeyA), Action::MoveLeft);

        let sources = config.get_sources(Action::MoveLeft);
        assert_eq!(sources.len(), 2);
        assert!(sources.contains(&InputSource::key(KeyCode::ArrowLeft)));
        assert!(sources.contains(&InputSource::key(KeyCode::KeyA)));
    }

    #[test]
    fn test_rebind_source() {
        let mut config = InputConfig::empty();
        let source = InputSource::key(KeyCode::KeyR);

        config.bind(source, Action::MoveLeft);
        config.bind(source, Action::Restart);

        assert_eq!(config.get_action(source), Some(Action::Restart));
        assert!(!config.has_binding(Action::MoveLeft));
    }

    #[test]
    fn test_unbind_action() {
        let mut config = InputConfig::default();
        config.bind(InputSource::key(KeyCode::KeyA), Action::MoveLeft);
        config.unbind_action(Action::MoveLeft);

        assert_eq!(config.get_action(InputSource::key(KeyCode::KeyA)), None);
        assert_eq!(config.get_action(InputSource::key(KeyCode::ArrowLeft)), None);
    }

    #[test]
    fn test_unbind_source() {
        let mut config = InputConfig::default();
        config.unbind_source(InputSource::key(KeyCode::Escape));
        assert!(!config.has_binding(Action::Quit));
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut config = InputConfig::empty();
        config.bind(InputSource::key(KeyCode::KeyZ), Action::MoveLeft);
        config.reset_to_defaults();

        assert_eq!(config.get_action(InputSource::key(KeyCode::KeyZ)), None);
        assert!(config.has_binding(Action::MoveDown));
    }
}
