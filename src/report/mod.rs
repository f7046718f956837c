//! Plain-text reports over members and activities.
//!
//! Mirrors the text the desktop result pane rendered: members grouped by
//! role label and activities grouped into the three status buckets.

use crate::models::{Activity, Member, Status};

/// Render the member report, grouped by role label.
///
/// Role sections come out in alphabetical order with role-less members
/// grouped last under "Unassigned"; every label gets a section so no
/// member is dropped.
pub fn member_report(members: &[Member]) -> String {
    let mut lines = vec!["=== Members ===".to_string()];

    if members.is_empty() {
        lines.push(String::new());
        lines.push("No members registered.".to_string());
        return lines.join("\n");
    }

    let mut by_role: std::collections::BTreeMap<&str, Vec<&str>> =
        std::collections::BTreeMap::new();
    let mut unassigned: Vec<&str> = Vec::new();

    for member in members {
        match member.role.as_deref() {
            Some(role) => by_role.entry(role).or_default().push(&member.name),
            None => unassigned.push(&member.name),
        }
    }

    for (role, names) in by_role {
        lines.push(String::new());
        lines.push(format!("{}:", role));
        for name in names {
            lines.push(format!("- {}", name));
        }
    }

    if !unassigned.is_empty() {
        lines.push(String::new());
        lines.push("Unassigned:".to_string());
        for name in unassigned {
            lines.push(format!("- {}", name));
        }
    }

    lines.join("\n")
}

/// Render the activity report, grouped into status buckets.
///
/// Every bucket is printed in To Do/Doing/Done order; an empty bucket gets
/// a placeholder line rather than disappearing.
pub fn activity_report(activities: &[Activity]) -> String {
    let mut lines = vec!["=== Activities ===".to_string()];

    if activities.is_empty() {
        lines.push(String::new());
        lines.push("No activities registered.".to_string());
        return lines.join("\n");
    }

    for bucket in Status::ALL {
        lines.push(String::new());
        lines.push(format!("-- {} --", bucket.label()));

        let mut any = false;
        for activity in activities.iter().filter(|a| a.status == bucket) {
            lines.push(format!("- {}", activity.title));
            lines.push(format!("  Responsible: {}", responsible_line(&activity.members)));
            any = true;
        }

        if !any {
            lines.push(format!("No activities in {}.", bucket.label()));
        }
    }

    lines.join("\n")
}

/// Render both reports as one document.
pub fn full_report(members: &[Member], activities: &[Activity]) -> String {
    format!("{}\n\n{}", member_report(members), activity_report(activities))
}

fn responsible_line(members: &[Member]) -> String {
    if members.is_empty() {
        return "no members assigned".to_string();
    }

    members
        .iter()
        .map(|m| match m.role.as_deref() {
            Some(role) => format!("{} ({})", m.name, role),
            None => m.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, role: Option<&str>) -> Member {
        Member {
            id: format!("id-{}", name),
            name: name.to_string(),
            role: role.map(|r| r.to_string()),
            registered_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn activity(title: &str, status: Status, members: Vec<Member>) -> Activity {
        Activity {
            id: format!("id-{}", title),
            token: format!("token-{}", title),
            title: title.to_string(),
            status,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            members,
        }
    }

    #[test]
    fn test_member_report_groups_by_role() {
        let members = vec![
            member("Beltrano", Some("Documenter")),
            member("Ciclano", Some("Manager")),
            member("Fulano", Some("Developer")),
            member("Visitante", None),
        ];

        let report = member_report(&members);

        assert!(report.starts_with("=== Members ==="));
        assert!(report.contains("Developer:\n- Fulano"));
        assert!(report.contains("Documenter:\n- Beltrano"));
        assert!(report.contains("Manager:\n- Ciclano"));
        assert!(report.contains("Unassigned:\n- Visitante"));
    }

    #[test]
    fn test_member_report_keeps_unconventional_roles() {
        let members = vec![member("Ana", Some("Designer"))];

        let report = member_report(&members);

        assert!(report.contains("Designer:\n- Ana"));
    }

    #[test]
    fn test_member_report_empty() {
        assert!(member_report(&[]).contains("No members registered."));
    }

    #[test]
    fn test_activity_report_buckets() {
        let activities = vec![
            activity(
                "Write report",
                Status::Todo,
                vec![member("Fulano", Some("Developer"))],
            ),
            activity("Review code", Status::Done, vec![]),
        ];

        let report = activity_report(&activities);

        assert!(report.contains("-- To Do --\n- Write report\n  Responsible: Fulano (Developer)"));
        assert!(report.contains("No activities in Doing."));
        assert!(report.contains("-- Done --\n- Review code\n  Responsible: no members assigned"));
    }

    #[test]
    fn test_activity_report_member_without_role() {
        let activities = vec![activity(
            "Plan sprint",
            Status::Doing,
            vec![member("Ana", None), member("Fulano", Some("Developer"))],
        )];

        let report = activity_report(&activities);

        assert!(report.contains("Responsible: Ana, Fulano (Developer)"));
    }

    #[test]
    fn test_activity_report_empty() {
        assert!(activity_report(&[]).contains("No activities registered."));
    }

    #[test]
    fn test_full_report_contains_both_sections() {
        let report = full_report(&[], &[]);

        assert!(report.contains("=== Members ==="));
        assert!(report.contains("=== Activities ==="));
    }
}
