use crate::domain::model::{Launch, LaunchEntry, LaunchSite, Rocket};
use std::sync::Arc;

pub fn entry(id: &str, year: i32) -> Arc<LaunchEntry> {
    let raw = format!("{}-06-01T12:00:00Z", year);
    Arc::new(LaunchEntry {
        launch: Launch {
            id: id.to_string(),
            mission_id: vec![],
            mission_name: Some(format!("Mission {}", id)),
            launch_date_local: raw,
            launch_site: Some(LaunchSite {
                site_name: Some("CCAFS SLC 40".to_string()),
            }),
            rocket: Some(Rocket {
                rocket_name: Some("Falcon 9".to_string()),
            }),
            details: None,
        },
        display_date: format!("June 1, {}", year),
        year,
    })
}

pub fn ids(launches: &[Arc<LaunchEntry>]) -> Vec<&str> {
    launches.iter().map(|entry| entry.id()).collect()
}
