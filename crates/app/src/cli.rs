use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::MoneyCents;

#[derive(Parser, Debug)]
#[command(name = "clipit")]
#[command(about = "Keep track of gift cards and vouchers")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Override the configured log level.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Coupon(Coupon),
    Category(Category),
    /// Balance and spending totals.
    Stats,
}

#[derive(Args, Debug)]
pub struct Coupon {
    #[command(subcommand)]
    pub command: CouponCommand,
}

#[derive(Subcommand, Debug)]
pub enum CouponCommand {
    Add(CouponAddArgs),
    List(CouponListArgs),
    Show(CouponId),
    /// Consume part of the balance.
    Use(CouponUseArgs),
    Edit(CouponEditArgs),
    Archive(CouponId),
    Unarchive(CouponId),
    Delete(CouponId),
    /// Accept a pending draft.
    Approve(CouponId),
    /// Discard a pending draft.
    Reject(CouponId),
    History(CouponId),
    /// Undo the latest change of a coupon.
    Undo(CouponId),
}

#[derive(Args, Debug)]
pub struct CouponId {
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct CouponAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, value_parser = parse_money)]
    pub value: MoneyCents,
    /// Expiration date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub expires: DateTime<Utc>,
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub code: Option<String>,
    /// Store as a draft waiting for approval.
    #[arg(long)]
    pub pending: bool,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ListState {
    #[default]
    Active,
    Archived,
    Pending,
}

#[derive(Args, Debug)]
pub struct CouponListArgs {
    #[arg(long, value_enum, default_value_t)]
    pub state: ListState,
}

#[derive(Args, Debug)]
pub struct CouponUseArgs {
    pub id: i64,
    #[arg(value_parser = parse_money)]
    pub amount: MoneyCents,
}

#[derive(Args, Debug)]
pub struct CouponEditArgs {
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    /// New current balance.
    #[arg(long, value_parser = parse_money)]
    pub value: Option<MoneyCents>,
    #[arg(long, value_parser = parse_date)]
    pub expires: Option<DateTime<Utc>>,
    #[arg(long, conflicts_with = "no_category")]
    pub category: Option<i64>,
    #[arg(long)]
    pub no_category: bool,
    #[arg(long, conflicts_with = "no_code")]
    pub code: Option<String>,
    #[arg(long)]
    pub no_code: bool,
}

#[derive(Args, Debug)]
pub struct Category {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    Add(CategoryAddArgs),
    List,
    Rename(CategoryRenameArgs),
    Delete(CategoryId),
}

#[derive(Args, Debug)]
pub struct CategoryAddArgs {
    pub name: String,
    #[arg(long, default_value = "#9E9E9E")]
    pub color: String,
    #[arg(long, default_value = "Label")]
    pub icon: String,
}

#[derive(Args, Debug)]
pub struct CategoryRenameArgs {
    pub id: i64,
    pub name: String,
}

#[derive(Args, Debug)]
pub struct CategoryId {
    pub id: i64,
}

fn parse_money(raw: &str) -> Result<MoneyCents, String> {
    raw.parse::<MoneyCents>().map_err(|err| err.to_string())
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dates_are_utc_midnight() {
        let parsed = parse_date("2027-02-28").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2027-02-28T00:00:00+00:00");
        assert!(parse_date("28/02/2027").is_err());
    }

    #[test]
    fn use_parses_amount() {
        let cli = Cli::try_parse_from(["clipit", "coupon", "use", "3", "12,50"]).unwrap();
        match cli.command {
            Command::Coupon(Coupon {
                command: CouponCommand::Use(args),
            }) => {
                assert_eq!(args.id, 3);
                assert_eq!(args.amount, MoneyCents::new(1250));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
