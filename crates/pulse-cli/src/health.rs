use anyhow::Context;
use pulse_client::{HealthReport, PulseClient};

/// Print the server's health report; fails when the server is not healthy.
pub(crate) async fn run_health(client: &PulseClient) -> anyhow::Result<()> {
    let report = client
        .health()
        .await
        .context("failed to reach server health endpoint")?;
    println!("{}", describe_health(&report));
    anyhow::ensure!(report.is_ok(), "server is {}", report.status);
    Ok(())
}

fn describe_health(report: &HealthReport) -> String {
    format!("server: {}, database: {}", report.status, report.database)
}
