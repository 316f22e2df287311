//! Handler for the `list` command.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use tabled::{Table, Tabled};

use super::context::CommandContext;
use super::output;
use crate::application::{list_clusters, ClusterSummary};
use crate::error::Result;

#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ACTIVE")]
    active: &'static str,
    #[tabled(rename = "STATUS")]
    status: &'static str,
    #[tabled(rename = "NODES")]
    nodes: String,
    #[tabled(rename = "CREATED")]
    created: String,
}

impl ClusterRow {
    fn new(summary: &ClusterSummary, now: DateTime<Utc>) -> Self {
        Self {
            name: summary.name.clone(),
            active: if summary.active { "*" } else { "" },
            status: summary.health.as_str(),
            nodes: format!("{}/{}", summary.running_nodes, summary.total_nodes),
            created: format_created(summary.created, now),
        }
    }
}

/// Execute the list command.
pub async fn execute(ctx: &CommandContext, timeout: Option<Duration>) -> Result<()> {
    let limit = timeout.unwrap_or(Duration::from_secs(ctx.settings.timeouts.list));
    let summaries = ctx
        .with_timeout(
            limit,
            "listing clusters",
            list_clusters(
                ctx.configs.as_ref(),
                ctx.runtime.as_ref(),
                &ctx.active_cluster,
            ),
        )
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "list",
            "clusters": summaries,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    if summaries.is_empty() {
        output::note("No clusters found");
        output::hint(&format!(
            "run {} to create one",
            output::highlight("hind start")
        ));
        return Ok(());
    }

    let now = Utc::now();
    let rows: Vec<ClusterRow> = summaries.iter().map(|s| ClusterRow::new(s, now)).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

/// Relative creation time such as `5 minutes ago`.
fn format_created(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = created else {
        return "-".to_string();
    };
    let elapsed = now.signed_duration_since(created);
    let (amount, unit) = if elapsed.num_days() > 0 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_hours() > 0 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() > 0 {
        (elapsed.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClusterHealth;
    use chrono::TimeZone;

    #[test]
    fn created_is_relative() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let ago = |secs: i64| Some(now - chrono::Duration::seconds(secs));

        assert_eq!(format_created(None, now), "-");
        assert_eq!(format_created(ago(20), now), "just now");
        assert_eq!(format_created(ago(60), now), "1 minute ago");
        assert_eq!(format_created(ago(3 * 3600 + 5), now), "3 hours ago");
        assert_eq!(format_created(ago(2 * 86_400), now), "2 days ago");
    }

    #[test]
    fn row_marks_active_cluster() {
        let summary = ClusterSummary {
            name: "demo".into(),
            active: true,
            health: ClusterHealth::Partial,
            running_nodes: 2,
            total_nodes: 4,
            created: None,
        };
        let row = ClusterRow::new(&summary, Utc::now());
        assert_eq!(row.active, "*");
        assert_eq!(row.status, "partial");
        assert_eq!(row.nodes, "2/4");
    }
}
