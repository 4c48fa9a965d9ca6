use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
}

impl ClientStatus {
    pub fn label(self) -> &'static str {
        match self {
            ClientStatus::Active => "Active",
            ClientStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    /// Number of projects, as entered. Not kept in sync with the projects list.
    #[serde(default)]
    pub projects: u32,
    #[serde(default)]
    pub status: ClientStatus,
}

impl Client {
    /// Case-insensitive match against name, contact and email
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        [&self.name, &self.contact, &self.email]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    /// Initials of the client name, e.g. "ABC Corporation" -> "AC"
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client {
            id: 1,
            name: "ABC Corporation".into(),
            contact: "John Smith".into(),
            email: "john@abccorp.com".into(),
            phone: "(123) 456-7890".into(),
            projects: 3,
            status: ClientStatus::Active,
        }
    }

    #[test]
    fn search_is_case_insensitive() {
        let client = client();
        assert!(client.matches("abc"));
        assert!(client.matches("SMITH"));
        assert!(client.matches("abccorp.com"));
        assert!(client.matches("  "));
        assert!(!client.matches("xyz"));
    }

    #[test]
    fn initials_take_first_letters() {
        assert_eq!(client().initials(), "AC");
    }

    #[test]
    fn status_is_stored_lowercase() {
        let json = serde_json::to_value(client()).unwrap();
        assert_eq!(json["status"], "active");

        let mut stored = json;
        stored.as_object_mut().unwrap().remove("projects");
        stored["status"] = "inactive".into();
        let back: Client = serde_json::from_value(stored).unwrap();
        assert_eq!(back.status, ClientStatus::Inactive);
        assert_eq!(back.projects, 0);
    }
}
