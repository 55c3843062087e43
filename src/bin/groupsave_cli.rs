use std::{env, process};

use chrono::NaiveDate;
use groupsave_core::{
    init_with_filter, ConfigManager, ContributionDraft, JsonPlanStore, PlanDraft, PlanManager,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigManager::from_env()?.load()?;
    init_with_filter(config.log_filter.as_deref());

    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| usage_exit());

    let store = JsonPlanStore::new(config.resolve_data_root())?;
    let manager = PlanManager::new(Box::new(store), config);

    match command.as_str() {
        "create" => {
            let name = args.next().unwrap_or_else(|| usage_exit());
            let months = args.next().unwrap_or_else(|| usage_exit());
            let months: u32 = months
                .parse()
                .map_err(|_| format!("invalid month count `{months}`"))?;
            let participants: Vec<String> = args.collect();
            let plan = manager.create_plan(&PlanDraft::new(name, participants, months))?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        "show" => {
            let code = args.next().unwrap_or_else(|| usage_exit());
            let overview = manager.get_overview(&code)?;
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        "contribute" => {
            let mut next = || args.next().unwrap_or_else(|| usage_exit());
            let code = next();
            let participant = next();
            let amount = next();
            let method = next();
            let date = next();
            let month = next();

            let amount: f64 = amount
                .parse()
                .map_err(|_| format!("invalid amount `{amount}`"))?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|_| format!("invalid date `{date}`, expected YYYY-MM-DD"))?;
            let month: u32 = month
                .parse()
                .map_err(|_| format!("invalid month `{month}`"))?;

            let draft = ContributionDraft::new(participant, amount, method, date, month);
            let plan = manager.add_contribution(&code, draft)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        "months" => {
            let code = args.next().unwrap_or_else(|| usage_exit());
            let view = manager.contributions_by_month(&code)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        "list" => {
            let codes = manager.list_codes()?;
            println!("{}", serde_json::to_string_pretty(&codes)?);
        }
        _ => usage_exit(),
    }

    Ok(())
}

fn usage_exit() -> ! {
    print_usage();
    process::exit(1);
}

fn print_usage() {
    eprintln!(
        "Usage: groupsave_cli <command>\n\
         Commands:\n  \
         create <name> <months> <participant>...\n  \
         show <code>\n  \
         contribute <code> <participant> <amount> <method> <YYYY-MM-DD> <month>\n  \
         months <code>\n  \
         list"
    );
}
