//! Dashboard commands: dashboard, seed, classify, config

use chrono::Utc;
use serde::Serialize;

use super::AppContext;
use crate::classify::RuleMatcher;
use crate::dashboard::{DashboardState, Greeting, GreetingPolicy};
use crate::display::{format_classification, format_dashboard};
use crate::error::{FluxoError, FluxoResult};
use crate::models::{Direction, Money};

#[derive(Serialize)]
struct DashboardReport<'a> {
    dashboard: &'a DashboardState,
    #[serde(skip_serializing_if = "Option::is_none")]
    greeting: Option<Greeting>,
    low_balance_alert: bool,
}

/// Print the dashboard for the signed-in user
pub fn handle_dashboard(ctx: &AppContext, json: bool) -> FluxoResult<()> {
    let provider = ctx.identity_provider();
    let session = ctx.open_session(&provider)?;
    let state = session
        .lock()
        .map_err(|e| FluxoError::Storage(format!("Failed to acquire dashboard session: {}", e)))?
        .state()?;

    let policy = GreetingPolicy::from(&ctx.settings);

    if json {
        let report = DashboardReport {
            dashboard: &state,
            greeting: state.greeting(&policy),
            low_balance_alert: state.low_balance_alert(&policy),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            format_dashboard(&state, &policy, &ctx.settings.currency_symbol)
        );
    }
    Ok(())
}

/// Load the demo statement for the signed-in user
pub fn handle_seed(ctx: &AppContext) -> FluxoResult<()> {
    let provider = ctx.identity_provider();
    let session = ctx.open_session(&provider)?;
    let session = session
        .lock()
        .map_err(|e| FluxoError::Storage(format!("Failed to acquire dashboard session: {}", e)))?;

    let report = session.seed(Utc::now())?;
    println!("{} lançamentos de demonstração carregados.", report.count());

    if let Some(balance) = session.state()?.balance() {
        println!(
            "Saldo Disponível: {}",
            balance.format_with_symbol(&ctx.settings.currency_symbol)
        );
    }
    Ok(())
}

/// Classify one descriptor with the built-in rules
pub fn handle_classify(descriptor: &str, direction: Direction) -> FluxoResult<()> {
    let classification = RuleMatcher::default().classify(descriptor, direction);
    print!("{}", format_classification(descriptor, &classification));
    Ok(())
}

/// Show paths and settings, optionally writing the settings file
pub fn handle_config(ctx: &AppContext, save: bool) -> FluxoResult<()> {
    if save {
        ctx.settings.save(&ctx.paths)?;
    }

    let s = &ctx.settings;
    let money = |m: Money| m.format_with_symbol(&s.currency_symbol);
    println!("Fluxo Configuration");
    println!("===================");
    println!("Base directory:  {}", ctx.paths.base_dir().display());
    println!("Data directory:  {}", ctx.paths.data_dir().display());
    println!("Settings file:   {}", ctx.paths.settings_file().display());
    println!("Audit log:       {}", ctx.paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  App namespace:     {}", s.app_id);
    println!("  Base offset:       {}", money(s.base_offset));
    println!("  UTC offset (min):  {}", s.utc_offset_minutes);
    println!("  Low balance:       {}", money(s.low_balance_threshold));
    println!("  Healthy balance:   {}", money(s.healthy_balance_threshold));
    println!("  Display name:      {}", s.display_name);
    Ok(())
}
