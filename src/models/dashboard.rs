use serde::{Deserialize, Serialize};

/// Payload of `GET /api/v1/config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub theme_css: Option<String>,
    #[serde(default)]
    pub cards: Cards,
    #[serde(default)]
    pub silent_login: bool,
    #[serde(default)]
    pub helpdesk_url: Option<String>,
}

impl DashboardConfig {
    pub fn application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|app| app.id == id)
    }
}

/// A sidebar entry; `iframe` apps are embedded under `/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub iframe: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Application {
    pub fn href(&self) -> String {
        if self.iframe {
            format!("/{}", self.id)
        } else {
            self.url.clone().unwrap_or_default()
        }
    }

    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Which dashboard cards the backend has enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cards {
    pub ai: bool,
    pub docs: bool,
    pub drive: bool,
    pub calendar: bool,
    pub task: bool,
    pub meet: bool,
    pub ocs: bool,
    pub grist: bool,
    pub conversation: bool,
}

/// Payload of `GET /api/v1/auth/profile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_defaults() {
        let config: DashboardConfig = serde_json::from_value(json!({
            "applications": [
                {"id": "grist", "title": "Sheets", "url": "https://grist.example", "iframe": true},
                {"id": "mail", "url": "https://mail.example"}
            ],
            "cards": {"docs": true, "ai": true}
        }))
        .unwrap();

        assert!(config.cards.docs && config.cards.ai);
        assert!(!config.cards.meet);
        assert!(!config.silent_login);

        let grist = config.application("grist").unwrap();
        assert_eq!(grist.href(), "/grist");
        assert_eq!(grist.label(), "Sheets");
        assert!(grist.enabled);

        let mail = config.application("mail").unwrap();
        assert_eq!(mail.href(), "https://mail.example");
        assert_eq!(mail.label(), "mail");
        assert!(config.application("agenda").is_none());
    }
}
