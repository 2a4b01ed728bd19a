//! Localization
//!
//! Message templates by key with positional `{0}`, `{1}` arguments.

use bevy_ecs::prelude::*;
use std::collections::HashMap;

/// Resource: message templates
#[derive(Resource, Debug, Clone, Default)]
pub struct Localizer {
    templates: HashMap<String, String>,
}

impl Localizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// English templates used by the core
    pub fn standard() -> Self {
        let mut localizer = Self::new();
        for (key, template) in [
            ("title.default", "{0} the {1}"),
            ("title.child.male", "Your son {0}"),
            ("title.child.female", "Your daughter {0}"),
            ("title.child.unassigned", "Your child {0}"),
            ("title.spouse.male", "Your husband {0}"),
            ("title.spouse.female", "Your wife {0}"),
            ("title.spouse.unassigned", "Your spouse {0}"),
            ("notify.death", "{0} has died."),
            ("phrase.greeting", "Hello, {1}!"),
            ("phrase.goodbye", "Farewell, {1}."),
            ("phrase.hurt", "Ouch! Why would you do that, {1}?"),
            ("moan.0", "Raagh..."),
            ("moan.1", "Ughh..."),
            ("moan.2", "Argh-gur..."),
        ] {
            localizer.insert(key, template);
        }
        localizer
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Format a template. Unknown keys come back verbatim so a missing
    /// translation is visible rather than silent.
    pub fn format(&self, key: &str, args: &[&str]) -> String {
        let Some(template) = self.templates.get(key) else {
            return key.to_string();
        };

        let mut out = template.clone();
        for (i, arg) in args.iter().enumerate() {
            out = out.replace(&format!("{{{}}}", i), arg);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let localizer = Localizer::standard();
        assert_eq!(localizer.format("title.default", &["Aldo", "Smith"]), "Aldo the Smith");
        assert_eq!(localizer.format("phrase.greeting", &["Aldo", "Steve"]), "Hello, Steve!");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let localizer = Localizer::new();
        assert_eq!(localizer.format("phrase.unknown", &["x"]), "phrase.unknown");
    }
}
