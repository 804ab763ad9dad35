use engine::{Coupon, Engine, NewCoupon};

use crate::{
    cli::{
        Category, CategoryCommand, Command, Coupon as CouponCmd, CouponCommand, CouponEditArgs,
        CouponId, ListState,
    },
    error::{AppError, Result},
};

pub async fn run(engine: &Engine, command: Command) -> Result<()> {
    match command {
        Command::Coupon(CouponCmd { command }) => coupon(engine, command).await,
        Command::Category(Category { command }) => category(engine, command).await,
        Command::Stats => stats(engine).await,
    }
}

async fn coupon(engine: &Engine, command: CouponCommand) -> Result<()> {
    match command {
        CouponCommand::Add(args) => {
            let mut new = NewCoupon::new(args.name, args.value, args.expires);
            new.category_id = args.category;
            new.redeem_code = args.code;
            new.is_pending = args.pending;
            let coupon = engine.insert(new).await?;
            println!("created coupon: {}", describe(&coupon));
        }
        CouponCommand::List(args) => {
            let coupons = match args.state {
                ListState::Active => engine.active_coupons().await?,
                ListState::Archived => engine.archived_coupons().await?,
                ListState::Pending => engine.pending_coupons().await?,
            };
            for coupon in &coupons {
                println!("{}", describe(coupon));
            }
        }
        CouponCommand::Show(CouponId { id }) => {
            println!("{}", describe(&require(engine, id).await?));
        }
        CouponCommand::Use(args) => {
            let coupon = require(engine, args.id).await?;
            let used = engine.use_coupon(&coupon, args.amount).await?;
            println!("{}", describe(&used));
        }
        CouponCommand::Edit(args) => {
            let coupon = require(engine, args.id).await?;
            let edited = apply_edit(coupon, args);
            engine.update(&edited).await?;
            println!("{}", describe(&edited));
        }
        CouponCommand::Archive(CouponId { id }) => {
            engine.archive(&require(engine, id).await?).await?;
            println!("archived coupon #{id}");
        }
        CouponCommand::Unarchive(CouponId { id }) => {
            engine.unarchive(&require(engine, id).await?).await?;
            println!("unarchived coupon #{id}");
        }
        CouponCommand::Delete(CouponId { id }) => {
            engine.delete(&require(engine, id).await?).await?;
            println!("deleted coupon #{id}");
        }
        CouponCommand::Approve(CouponId { id }) => {
            engine.approve(&require(engine, id).await?).await?;
            println!("approved coupon #{id}");
        }
        CouponCommand::Reject(CouponId { id }) => {
            engine.reject_pending(&require(engine, id).await?).await?;
            println!("rejected coupon #{id}");
        }
        CouponCommand::History(CouponId { id }) => {
            for entry in engine.history(id).await? {
                println!(
                    "{} {:<10} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.kind().as_str(),
                    entry.change_summary
                );
            }
        }
        CouponCommand::Undo(CouponId { id }) => match engine.undo_latest(id).await? {
            Some(entry) => println!(
                "undone {}: {}",
                entry.kind().as_str(),
                entry.change_summary
            ),
            None => println!("nothing to undo for coupon #{id}"),
        },
    }
    Ok(())
}

async fn category(engine: &Engine, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::Add(args) => {
            let category = engine
                .new_category(&args.name, &args.color, &args.icon)
                .await?;
            println!("created category: {} (#{})", category.name, category.id);
        }
        CategoryCommand::List => {
            for category in engine.categories().await? {
                println!(
                    "#{} {} {} {}",
                    category.id, category.name, category.color_hex, category.icon_name
                );
            }
        }
        CategoryCommand::Rename(args) => {
            engine.rename_category(args.id, &args.name).await?;
            println!("renamed category #{} to {}", args.id, args.name);
        }
        CategoryCommand::Delete(args) => {
            engine.delete_category(args.id).await?;
            println!("deleted category #{}", args.id);
        }
    }
    Ok(())
}

async fn stats(engine: &Engine) -> Result<()> {
    let dashboard = engine.dashboard().await?;
    println!("total balance: {}", dashboard.total_balance);
    println!("total spent:   {}", dashboard.total_spent);
    for spending in &dashboard.spending_by_category {
        println!("  {:<20} {}", spending.name, spending.total_spent);
    }
    Ok(())
}

async fn require(engine: &Engine, id: i64) -> Result<Coupon> {
    engine
        .coupon(id)
        .await?
        .ok_or(AppError::CouponNotFound(id))
}

fn apply_edit(mut coupon: Coupon, args: CouponEditArgs) -> Coupon {
    if let Some(name) = args.name {
        coupon.name = name;
    }
    if let Some(value) = args.value {
        coupon.current_value = value;
    }
    if let Some(expires) = args.expires {
        coupon.expiration_date = expires;
    }
    if args.no_category {
        coupon.category_id = None;
    } else if let Some(category) = args.category {
        coupon.category_id = Some(category);
    }
    if args.no_code {
        coupon.redeem_code = None;
    } else if let Some(code) = args.code {
        coupon.redeem_code = Some(code);
    }
    coupon
}

fn describe(coupon: &Coupon) -> String {
    let mut line = format!(
        "#{} {} {}/{} expires {} [{}]",
        coupon.id,
        coupon.name,
        coupon.current_value,
        coupon.initial_value,
        coupon.expiration_date.format("%Y-%m-%d"),
        coupon.state().as_str()
    );
    if let Some(code) = coupon.redeem_code() {
        line.push_str(&format!(" code={code}"));
    }
    line
}
