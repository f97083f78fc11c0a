use serde::{Deserialize, Serialize};

/// Icon keys used by templates and configured mandates. Unknown keys decode to `Bot`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconName {
    MapPin,
    Users,
    Newspaper,
    Cloud,
    ListChecks,
    Search,
    #[default]
    #[serde(other)]
    Bot,
}

/// Renderer descriptor handed to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconGlyph {
    pub component: &'static str,
    pub accessible_label: &'static str,
}

impl IconName {
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "map-pin" => Self::MapPin,
            "users" => Self::Users,
            "newspaper" => Self::Newspaper,
            "cloud" => Self::Cloud,
            "list-checks" => Self::ListChecks,
            "search" => Self::Search,
            _ => Self::Bot,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::MapPin => "map-pin",
            Self::Users => "users",
            Self::Newspaper => "newspaper",
            Self::Cloud => "cloud",
            Self::ListChecks => "list-checks",
            Self::Search => "search",
            Self::Bot => "bot",
        }
    }

    pub fn glyph(self) -> IconGlyph {
        let (component, accessible_label) = match self {
            Self::MapPin => ("MapPin", "Location"),
            Self::Users => ("Users", "Meeting"),
            Self::Newspaper => ("Newspaper", "News"),
            Self::Cloud => ("Cloud", "Weather"),
            Self::ListChecks => ("ListChecks", "Tasks"),
            Self::Search => ("Search", "Research"),
            Self::Bot => ("Bot", "Agent"),
        };
        IconGlyph {
            component,
            accessible_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IconName;

    #[test]
    fn unknown_keys_fall_back_to_bot() {
        assert_eq!(IconName::from_key("map-pin"), IconName::MapPin);
        assert_eq!(IconName::from_key("rocket"), IconName::Bot);
        let decoded: IconName = serde_json::from_str("\"sparkles\"").expect("decode");
        assert_eq!(decoded, IconName::Bot);
    }

    #[test]
    fn keys_round_trip_through_from_key() {
        for icon in [
            IconName::MapPin,
            IconName::Users,
            IconName::Newspaper,
            IconName::Cloud,
            IconName::ListChecks,
            IconName::Search,
            IconName::Bot,
        ] {
            assert_eq!(IconName::from_key(icon.key()), icon);
        }
        assert_eq!(IconName::ListChecks.glyph().component, "ListChecks");
    }
}
