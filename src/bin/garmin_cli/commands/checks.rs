// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: End-to-end checks against a live Garmin Connect account
// ABOUTME: healthcheck, smoke, and live-check log in and validate real responses

use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::helpers::report::{ok, record_count, CliError};
use crate::helpers::session::{load_config, login, Session};

const SMOKE_RANGE: ((i32, u32, u32), (i32, u32, u32)) = ((2024, 1, 1), (2025, 1, 1));
const HEALTHCHECK_SINCE: (i32, u32, u32) = (2025, 2, 10);
const REQUIRED_DETAIL_KEYS: [&str; 2] = ["activityId", "activityName"];

fn date((year, month, day): (i32, u32, u32)) -> Result<NaiveDate, CliError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CliError::check(format!("invalid date {year}-{month}-{day}")))
}

/// Log in and confirm recent activity data is reachable
pub async fn healthcheck() -> Result<(), CliError> {
    println!("\n--- GARMIN CLIENT HEALTHCHECK ---\n");
    let config = load_config()?;

    println!("🔐 Authenticating...");
    let session = login(&config).await?;
    println!("✅ Login successful\n");

    println!("📡 Testing API access...");
    let today = config.today;
    let recent = session
        .get_activities_by_date(today - Duration::days(1), today, None)
        .await?;
    let since = date(HEALTHCHECK_SINCE)?;
    let ranged = session.get_activities_by_date(since, today, None).await?;

    if record_count(&ranged) == 0 {
        return Err(CliError::check(format!(
            "API test failed: no activities between {since} and {today}"
        )));
    }

    ok("API reachable");
    println!("🗓️ Activities since yesterday: {}", record_count(&recent));
    println!("📊 Activities returned: {}", record_count(&ranged));
    println!("\n🎉 Healthcheck passed\n");
    Ok(())
}

/// Fetch the smoke range and return the first activity's id
async fn first_activity_id(session: &Session) -> Result<u64, CliError> {
    let (start, end) = SMOKE_RANGE;
    let activities = session
        .get_activities_by_date(date(start)?, date(end)?, None)
        .await?;

    let Some(list) = activities.as_array() else {
        return Err(CliError::check("Activities response is not a list"));
    };
    let Some(first) = list.first() else {
        return Err(CliError::check("No activities returned"));
    };
    ok(&format!("Fetched {} activities", list.len()));

    let id = first
        .get("activityId")
        .and_then(Value::as_u64)
        .ok_or_else(|| CliError::check("Activity missing activityId"))?;
    ok("Activity list valid");
    Ok(id)
}

async fn activity_object(session: &Session, activity_id: u64) -> Result<Value, CliError> {
    let detail = session.get_activity(activity_id).await?;
    if !detail.is_object() {
        return Err(CliError::check("Activity detail is not an object"));
    }
    ok("Activity detail fetch works");
    Ok(detail)
}

/// Login, list, and single-activity fetch
pub async fn smoke() -> Result<(), CliError> {
    println!("\n=== SMOKE RUNNER ===\n");
    let config = load_config()?;
    let session = login(&config).await?;
    ok("Login works");

    let id = first_activity_id(&session).await?;
    activity_object(&session, id).await?;

    println!("\n🚀 SMOKE TEST PASSED\n");
    Ok(())
}

/// Smoke plus a structure check on the activity response
pub async fn live_check() -> Result<(), CliError> {
    println!("\n==== GARMIN LIVE CHECK ====\n");
    let config = load_config()?;
    let session = login(&config).await?;
    ok("Login works");

    let id = first_activity_id(&session).await?;
    let detail = activity_object(&session, id).await?;

    let missing: Vec<&str> = REQUIRED_DETAIL_KEYS
        .into_iter()
        .filter(|key| detail.get(key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(CliError::check(format!(
            "Missing keys in detail response: {missing:?}"
        )));
    }
    ok("Response structure looks valid");

    println!("\n🎉 ALL SYSTEMS GO: CLIENT IS WORKING CORRECTLY\n");
    Ok(())
}
