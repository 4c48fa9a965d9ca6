use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Overdue,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::NotStarted,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Overdue,
    ];

    /// Progress a project starts with when created in this status
    pub fn progress(self) -> u8 {
        match self {
            ProjectStatus::Completed => 100,
            ProjectStatus::InProgress => 50,
            ProjectStatus::NotStarted | ProjectStatus::Overdue => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Overdue => "Overdue",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ProjectStatus::NotStarted => ProjectStatus::InProgress,
            ProjectStatus::InProgress => ProjectStatus::Completed,
            ProjectStatus::Completed => ProjectStatus::Overdue,
            ProjectStatus::Overdue => ProjectStatus::NotStarted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    /// Client name at the time the project was created
    pub client: String,
    pub deadline: NaiveDate,
    pub status: ProjectStatus,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_logged: Option<f64>,
}

impl Project {
    /// Build a new project; progress is fixed from the initial status.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        client: impl Into<String>,
        deadline: NaiveDate,
        status: ProjectStatus,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            client: client.into(),
            deadline,
            status,
            progress: status.progress(),
            hours_logged: None,
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hours_logged = Some(hours);
        self
    }

    pub fn hours(&self) -> f64 {
        self.hours_logged.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deadline() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn progress_follows_initial_status() {
        let cases = [
            (ProjectStatus::Completed, 100),
            (ProjectStatus::InProgress, 50),
            (ProjectStatus::NotStarted, 0),
            (ProjectStatus::Overdue, 0),
        ];
        for (status, progress) in cases {
            let project = Project::new(1, "Website", "ABC", deadline(), status);
            assert_eq!(project.progress, progress, "{status:?}");
        }
    }

    #[test]
    fn stored_shape_uses_camel_case_field_names() {
        let project = Project::new(5, "Website", "ABC", deadline(), ProjectStatus::InProgress)
            .with_hours(12.5);
        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["deadline"], "2025-06-01");
        assert_eq!(json["hoursLogged"], 12.5);
    }

    #[test]
    fn hours_are_optional() {
        let json = r#"{"id":1,"name":"Logo","client":"XYZ","deadline":"2025-06-01","status":"not-started","progress":0}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.hours_logged, None);
        assert_eq!(project.hours(), 0.0);

        let back = serde_json::to_value(&project).unwrap();
        assert!(back.get("hoursLogged").is_none());
    }
}
