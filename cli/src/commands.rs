use crate::config::AppConfig;
use crate::render;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use client::billing::compute_renewal;
use client::dashboard::DashboardSummary;
use client::model::{BillingCycle, Category, IntervalUnit, SubscriptionDraft};
use client::validation::{DraftValidator, Validator};
use client::ApiClient;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "subtrack", version, about = "Track recurring subscriptions")]
pub struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(short, long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List subscriptions
    List {
        /// Include inactive subscriptions
        #[arg(long)]
        all: bool,
    },
    /// Show one subscription
    Show { id: u64 },
    /// Add a subscription
    Add(AddArgs),
    /// Change fields of a subscription
    Update {
        id: u64,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Delete a subscription
    Delete { id: u64 },
    /// Spending totals computed by the server
    Stats {
        #[arg(long)]
        all: bool,
    },
    /// Dashboard overview of active subscriptions
    Summary {
        /// How many of the most expensive subscriptions to list
        #[arg(long)]
        top: Option<usize>,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub cost: f64,
    /// First billing date, today when omitted
    #[arg(long)]
    pub start: Option<NaiveDate>,
    #[arg(long, default_value_t = BillingCycle::Monthly)]
    pub cycle: BillingCycle,
    /// Interval length for a custom cycle
    #[arg(long)]
    pub every: Option<u32>,
    #[arg(long)]
    pub unit: Option<IntervalUnit>,
    #[arg(long, default_value_t = Category::Streaming)]
    pub category: Category,
    #[arg(long)]
    pub custom_category: Option<String>,
    /// Last day of the free trial
    #[arg(long)]
    pub trial_until: Option<NaiveDate>,
    #[arg(long)]
    pub inactive: bool,
    #[arg(long)]
    pub notes: Option<String>,
    /// Validate and preview the renewal date without saving
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub cost: Option<f64>,
    #[arg(long)]
    pub start: Option<NaiveDate>,
    #[arg(long)]
    pub cycle: Option<BillingCycle>,
    #[arg(long)]
    pub every: Option<u32>,
    #[arg(long)]
    pub unit: Option<IntervalUnit>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub custom_category: Option<String>,
    #[arg(long, conflicts_with = "no_trial")]
    pub trial_until: Option<NaiveDate>,
    #[arg(long)]
    pub no_trial: bool,
    #[arg(long)]
    pub active: Option<bool>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl AddArgs {
    pub fn to_draft(&self, today: NaiveDate) -> Result<SubscriptionDraft> {
        let mut draft =
            SubscriptionDraft::new(&self.name, self.cost, self.start.unwrap_or(today));

        draft = match (self.cycle, self.unit, self.every) {
            (BillingCycle::Custom, Some(unit), Some(every)) => draft.custom_interval(unit, every),
            (BillingCycle::Custom, _, _) => bail!("A custom cycle needs both --every and --unit"),
            (cycle, None, None) => draft.billing_cycle(cycle),
            (_, _, _) => bail!("--every and --unit only apply to --cycle custom"),
        };

        draft = match &self.custom_category {
            Some(name) => draft.custom_category(name),
            None => draft.category(self.category),
        };
        if let Some(trial_end) = self.trial_until {
            draft = draft.free_trial_until(trial_end);
        }
        if self.inactive {
            draft = draft.active(false);
        }
        if let Some(notes) = &self.notes {
            draft = draft.notes(notes);
        }
        Ok(draft)
    }
}

impl UpdateArgs {
    pub fn to_draft(&self) -> Result<SubscriptionDraft> {
        let mut draft = SubscriptionDraft {
            service_name: self.name.clone(),
            cost: self.cost,
            start_date: self.start,
            is_active: self.active,
            notes: self.notes.clone(),
            ..SubscriptionDraft::default()
        };

        draft = match (self.cycle, self.unit, self.every) {
            (Some(BillingCycle::Custom) | None, Some(unit), Some(every)) => {
                draft.custom_interval(unit, every)
            }
            (Some(cycle), None, None) => draft.billing_cycle(cycle),
            (None, None, None) => draft,
            (_, _, _) => bail!("--every and --unit must be given together with a custom cycle"),
        };

        if let Some(name) = &self.custom_category {
            draft = draft.custom_category(name);
        } else if let Some(category) = self.category {
            draft = draft.category(category);
        }

        if let Some(trial_end) = self.trial_until {
            draft = draft.free_trial_until(trial_end);
        } else if self.no_trial {
            draft = draft.without_free_trial();
        }

        if draft.is_empty() {
            bail!("Nothing to update");
        }
        Ok(draft)
    }
}

fn read_password(given: &Option<String>) -> Result<String> {
    if let Some(password) = given {
        return Ok(password.clone());
    }
    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn run(command: Command, client: &ApiClient, config: &AppConfig) -> Result<()> {
    let currency = config.display().currency();
    let today = chrono::Local::now().date_naive();

    match command {
        Command::Login { username, password } => {
            let password = read_password(&password)?;
            client.auth().login(&username, &password).await?;
            println!("Logged in as {username}");
        }
        Command::Register {
            email,
            username,
            password,
        } => {
            let password = read_password(&password)?;
            let user = client.auth().register(&email, &username, &password).await?;
            println!("Registered {}. You can now log in.", render::user_line(&user));
        }
        Command::Logout => {
            client.auth().logout().await?;
            println!("Logged out");
        }
        Command::Whoami => {
            if !client.auth().is_authenticated().await {
                bail!("Not logged in");
            }
            let user = client.auth().me().await?;
            println!("{}", render::user_line(&user));
        }
        Command::List { all } => {
            let subscriptions = client.subscriptions().list(all).await?;
            print!("{}", render::subscription_table(&subscriptions, currency, today));
        }
        Command::Show { id } => {
            let subscription = client.subscriptions().get(id).await?;
            print!("{}", render::subscription_detail(&subscription, currency, today));
        }
        Command::Add(args) => {
            let draft = args.to_draft(today)?;
            if args.dry_run {
                DraftValidator::for_create().validate(&draft)?;
                let start = args.start.unwrap_or(today);
                match compute_renewal(start, args.cycle, args.unit, args.every, args.trial_until) {
                    Some(renewal) => println!("Draft is valid; first renewal on {renewal}"),
                    None => println!("Draft is valid"),
                }
                return Ok(());
            }
            let created = client.subscriptions().create(&draft).await?;
            println!(
                "Added {} (#{}), renews {}",
                created.service_name, created.id, created.renewal_date
            );
        }
        Command::Update { id, fields } => {
            let draft = fields.to_draft()?;
            let updated = client.subscriptions().update(id, &draft).await?;
            print!("{}", render::subscription_detail(&updated, currency, today));
        }
        Command::Delete { id } => {
            client.subscriptions().delete(id).await?;
            println!("Deleted subscription #{id}");
        }
        Command::Stats { all } => {
            let stats = client.subscriptions().stats(all).await?;
            print!("{}", render::stats_report(&stats, currency));
        }
        Command::Summary { top } => {
            let subscriptions = client.subscriptions().list(true).await?;
            let summary = DashboardSummary::from_subscriptions(
                &subscriptions,
                top.unwrap_or(config.display().top()),
            );
            print!("{}", render::summary_report(&summary, currency));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_arguments_parse() {
        let cli = assert_ok!(Cli::try_parse_from([
            "subtrack",
            "add",
            "--name",
            "Gym",
            "--cost",
            "40",
            "--cycle",
            "custom",
            "--every",
            "28",
            "--unit",
            "days",
            "--category",
            "Fitness",
            "--start",
            "2025-03-01",
        ]));
        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };

        let draft = assert_ok!(args.to_draft(date(2025, 1, 1)));
        assert_eq!(draft.billing_cycle, Some(BillingCycle::Custom));
        assert_eq!(draft.custom_interval_value, Some(Some(28)));
        assert_eq!(draft.category, Some(Category::Fitness));
        assert_eq!(draft.start_date, Some(date(2025, 3, 1)));
    }

    #[test]
    fn test_add_defaults_start_to_today() {
        let cli = assert_ok!(Cli::try_parse_from([
            "subtrack", "add", "--name", "Netflix", "--cost", "15.49"
        ]));
        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        let draft = assert_ok!(args.to_draft(date(2025, 6, 1)));
        assert_eq!(draft.start_date, Some(date(2025, 6, 1)));
        assert_eq!(draft.billing_cycle, Some(BillingCycle::Monthly));
    }

    #[test]
    fn test_custom_cycle_requires_interval_arguments() {
        let cli = assert_ok!(Cli::try_parse_from([
            "subtrack", "add", "--name", "Gym", "--cost", "40", "--cycle", "custom"
        ]));
        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        assert_err!(args.to_draft(date(2025, 6, 1)));
    }

    #[test]
    fn test_update_requires_a_field() {
        let cli = assert_ok!(Cli::try_parse_from(["subtrack", "update", "3"]));
        let Command::Update { fields, .. } = cli.command else {
            panic!("expected update command");
        };
        assert_err!(fields.to_draft());
    }

    #[test]
    fn test_update_switching_cycle_clears_interval() {
        let cli = assert_ok!(Cli::try_parse_from([
            "subtrack", "update", "3", "--cycle", "yearly", "--no-trial"
        ]));
        let Command::Update { id, fields } = cli.command else {
            panic!("expected update command");
        };
        assert_eq!(id, 3);

        let draft = assert_ok!(fields.to_draft());
        assert_eq!(draft.billing_cycle, Some(BillingCycle::Yearly));
        assert_eq!(draft.custom_interval_unit, Some(None));
        assert_eq!(draft.has_free_trial, Some(false));
        assert_eq!(draft.trial_end_date, Some(None));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert_err!(Cli::try_parse_from([
            "subtrack", "add", "--name", "X", "--cost", "1", "--category", "pets"
        ]));
    }
}
