// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Data commands for garmin-cli
// ABOUTME: Display activities, a single activity, or the profile; export an activity range to JSON

use chrono::NaiveDate;
use garmin_client::call_guard::describe_call;
use garmin_client::display::ResponseDisplay;
use garmin_client::exporters::DataExporter;

use crate::helpers::report::{ok, record_count, CliError};
use crate::helpers::session::{load_config, login};

fn displayed(success: bool, description: &str) -> Result<(), CliError> {
    if success {
        Ok(())
    } else {
        Err(CliError::check(format!("{description} returned an error")))
    }
}

/// Show activities between two dates
pub async fn activities(
    start: NaiveDate,
    end: NaiveDate,
    activity_type: Option<String>,
) -> Result<(), CliError> {
    let config = load_config()?;
    let session = login(&config).await?;
    let activity_type = activity_type.or_else(|| config.activity_type.clone());

    let description = describe_call("get_activities_by_date", &[&start, &end]);
    let result = session
        .get_activities_by_date(start, end, activity_type.as_deref())
        .await;
    let mut display = ResponseDisplay::stdout(&config.export_dir);
    let (success, _) = display.display_result(&description, result);
    displayed(success, &description)
}

/// Show one activity summary, or its details
pub async fn activity(activity_id: u64, details: bool) -> Result<(), CliError> {
    let config = load_config()?;
    let session = login(&config).await?;

    let (description, result) = if details {
        (
            describe_call("get_activity_details", &[&activity_id]),
            session.get_activity_details(activity_id).await,
        )
    } else {
        (
            describe_call("get_activity", &[&activity_id]),
            session.get_activity(activity_id).await,
        )
    };
    let mut display = ResponseDisplay::stdout(&config.export_dir);
    let (success, _) = display.display_result(&description, result);
    displayed(success, &description)
}

/// Show the logged-in user's profile
pub async fn profile() -> Result<(), CliError> {
    let config = load_config()?;
    let session = login(&config).await?;

    let description = describe_call("get_user_profile", &[]);
    let result = session.get_user_profile().await;
    let mut display = ResponseDisplay::stdout(&config.export_dir);
    let (success, _) = display.display_result(&description, result);
    displayed(success, &description)
}

/// Save activities between two dates as `{name}.json` in the export directory
pub async fn export(
    start: NaiveDate,
    end: NaiveDate,
    name: &str,
    compact: bool,
) -> Result<(), CliError> {
    let config = load_config()?;
    let session = login(&config).await?;

    let data = session
        .get_activities_by_date(start, end, config.activity_type.as_deref())
        .await?;
    let path = DataExporter::new(&config.export_dir).save_json(&data, name, !compact)?;

    ok(&format!(
        "Saved {} activities to {}",
        record_count(&data),
        path.display()
    ));
    Ok(())
}
