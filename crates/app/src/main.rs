use std::error::Error;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{
    ContainerFields, Engine, EngineError, ErrorKind, EssenceFields, Gender, SaleRequest, money,
};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;

mod render;
mod settings;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "esencias")]
#[command(about = "Inventory and sales ledger for an essential oils shop")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, default_value = settings::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Database connection string (also read from `DATABASE_URL`).
    /// Overrides the configured database.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage bulk essences.
    Essence(EssenceCommand),
    /// Manage bottles.
    Container(ContainerCommand),
    /// Every essence and container.
    Products,
    /// Sell ml of an essence, optionally bottled.
    Sell(SellArgs),
    /// Read the sale ledger.
    Sales(SalesCommand),
    /// Stock and sales summaries.
    Report(ReportCommand),
    /// Insert the sample essences that are not present yet.
    Seed,
}

#[derive(Args, Debug)]
struct EssenceCommand {
    #[command(subcommand)]
    command: EssenceAction,
}

#[derive(Subcommand, Debug)]
enum EssenceAction {
    Add(EssenceArgs),
    /// Replace every field of an existing essence.
    Update(EssenceArgs),
    Delete { id: String },
    Show { id: String },
    List,
    /// Match id, name or supplier, ignoring case and accents.
    Search { term: String },
}

#[derive(Args, Debug)]
struct EssenceArgs {
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long, value_parser = parse_decimal)]
    stock_ml: Decimal,
    /// Cost of the whole batch on hand.
    #[arg(long, value_parser = parse_decimal)]
    entry_cost: Decimal,
    /// Defaults to entry cost over stock.
    #[arg(long, value_parser = parse_decimal)]
    cost_per_ml: Option<Decimal>,
    #[arg(long, default_value = "")]
    supplier: String,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    expiry: NaiveDate,
    #[arg(long, value_parser = parse_gender, default_value = "unisex")]
    gender: Gender,
}

impl EssenceArgs {
    fn fields(&self) -> EssenceFields {
        EssenceFields {
            name: self.name.clone(),
            gender: self.gender,
            stock_ml: self.stock_ml,
            entry_cost: self.entry_cost,
            cost_per_ml: self
                .cost_per_ml
                .unwrap_or_else(|| money::cost_per_unit(self.entry_cost, self.stock_ml)),
            supplier: self.supplier.clone(),
            expiry_date: self.expiry,
        }
    }
}

#[derive(Args, Debug)]
struct ContainerCommand {
    #[command(subcommand)]
    command: ContainerAction,
}

#[derive(Subcommand, Debug)]
enum ContainerAction {
    Add(ContainerArgs),
    /// Replace every field of an existing container.
    Update(ContainerArgs),
    Delete { id: String },
    Show { id: String },
    List,
    /// Match id or name, ignoring case and accents.
    Search { term: String },
}

#[derive(Args, Debug)]
struct ContainerArgs {
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long, value_parser = parse_decimal)]
    unit_cost: Decimal,
    #[arg(long, value_parser = parse_decimal)]
    capacity_ml: Decimal,
    #[arg(long, allow_negative_numbers = true)]
    stock_units: i64,
}

impl ContainerArgs {
    fn fields(&self) -> ContainerFields {
        ContainerFields {
            name: self.name.clone(),
            unit_cost: self.unit_cost,
            capacity_ml: self.capacity_ml,
            stock_units: self.stock_units,
        }
    }
}

#[derive(Args, Debug)]
struct SellArgs {
    product_id: String,
    #[arg(long, value_parser = parse_decimal)]
    quantity_ml: Decimal,
    /// Total charged to the customer.
    #[arg(long, value_parser = parse_decimal)]
    price: Decimal,
    #[arg(long)]
    customer: Option<String>,
    /// Container id; one unit is taken from its stock.
    #[arg(long)]
    container: Option<String>,
    /// Defaults to `sales.overhead_cost` from the settings.
    #[arg(long, value_parser = parse_decimal)]
    overhead: Option<Decimal>,
}

#[derive(Args, Debug)]
struct SalesCommand {
    #[command(subcommand)]
    command: SalesAction,
}

#[derive(Subcommand, Debug)]
enum SalesAction {
    /// Sales oldest first, optionally for one product id.
    List {
        #[arg(long)]
        product: Option<String>,
    },
    Show { id: String },
    /// Sales newest first with product names and status.
    History,
    /// Product ids with sales but no essence.
    Orphans,
    /// Id the next sale will get.
    NextId,
}

#[derive(Args, Debug)]
struct ReportCommand {
    #[command(subcommand)]
    command: ReportAction,
}

#[derive(Subcommand, Debug)]
enum ReportAction {
    LowStock,
    Valuation,
    Stats,
    Gender,
}

#[derive(Serialize)]
struct LowStock {
    essences: Vec<engine::Essence>,
    containers: Vec<engine::Container>,
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    money::parse_amount(raw).map_err(|err| err.to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    engine::essences::parse_expiry_date(raw).map_err(|err| err.to_string())
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    Gender::try_from(raw).map_err(|err| err.to_string())
}

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Storage => 1,
        ErrorKind::Validation => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::AlreadyExists => 4,
        ErrorKind::InsufficientStock | ErrorKind::CapacityExceeded => 5,
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<(), BoxError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, BoxError> {
    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run(engine: &Engine, command: Command, json: bool) -> Result<(), BoxError> {
    match command {
        Command::Essence(EssenceCommand { command }) => match command {
            EssenceAction::Add(args) => {
                let essence = engine.add_essence(&args.id, args.fields()).await?;
                emit(json, &essence, render::essence)?;
            }
            EssenceAction::Update(args) => {
                let essence = engine.update_essence(&args.id, args.fields()).await?;
                emit(json, &essence, render::essence)?;
            }
            EssenceAction::Delete { id } => {
                engine.delete_essence(&id).await?;
                emit(json, &id, |id| format!("deleted essence {id}"))?;
            }
            EssenceAction::Show { id } => {
                let essence = engine
                    .essence(&id)
                    .await?
                    .ok_or(EngineError::EssenceNotFound(id))?;
                emit(json, &essence, render::essence)?;
            }
            EssenceAction::List => {
                let essences = engine.list_essences().await?;
                emit(json, &essences, |e| render::essences(e))?;
            }
            EssenceAction::Search { term } => {
                let essences = engine.search_essences(&term).await?;
                emit(json, &essences, |e| render::essences(e))?;
            }
        },
        Command::Container(ContainerCommand { command }) => match command {
            ContainerAction::Add(args) => {
                let container = engine.add_container(&args.id, args.fields()).await?;
                emit(json, &container, render::container)?;
            }
            ContainerAction::Update(args) => {
                let container = engine.update_container(&args.id, args.fields()).await?;
                emit(json, &container, render::container)?;
            }
            ContainerAction::Delete { id } => {
                engine.delete_container(&id).await?;
                emit(json, &id, |id| format!("deleted container {id}"))?;
            }
            ContainerAction::Show { id } => {
                let container = engine
                    .container(&id)
                    .await?
                    .ok_or(EngineError::ContainerNotFound(id))?;
                emit(json, &container, render::container)?;
            }
            ContainerAction::List => {
                let containers = engine.list_containers().await?;
                emit(json, &containers, |c| render::containers(c))?;
            }
            ContainerAction::Search { term } => {
                let containers = engine.search_containers(&term).await?;
                emit(json, &containers, |c| render::containers(c))?;
            }
        },
        Command::Products => {
            let products = engine.list_products().await?;
            emit(json, &products, |p| render::products(p))?;
        }
        Command::Sell(args) => {
            let mut request = SaleRequest::new(args.product_id, args.quantity_ml, args.price);
            request.customer = args.customer;
            request.container_id = args.container;
            request.overhead_cost = args.overhead;
            let sale = engine.sell_essence(request).await?;
            emit(json, &sale, render::sale)?;
        }
        Command::Sales(SalesCommand { command }) => match command {
            SalesAction::List { product } => {
                let sales = match product {
                    Some(product_id) => engine.list_sales_by_product(&product_id).await?,
                    None => engine.list_sales().await?,
                };
                emit(json, &sales, |s| render::sales(s))?;
            }
            SalesAction::Show { id } => {
                let sale = engine.sale(&id).await?;
                emit(json, &sale, render::sale)?;
            }
            SalesAction::History => {
                let rows = engine.sales_history().await?;
                emit(json, &rows, |r| render::history(r))?;
            }
            SalesAction::Orphans => {
                let orphans = engine.detect_orphans().await?;
                emit(json, &orphans, |o| render::orphans(o))?;
            }
            SalesAction::NextId => {
                let id = engine.next_sale_id().await?;
                emit(json, &id, String::clone)?;
            }
        },
        Command::Report(ReportCommand { command }) => match command {
            ReportAction::LowStock => {
                let low = LowStock {
                    essences: engine.low_stock_essences().await?,
                    containers: engine.low_stock_containers().await?,
                };
                emit(json, &low, |low| {
                    format!(
                        "{}\n{}",
                        render::essences(&low.essences),
                        render::containers(&low.containers)
                    )
                })?;
            }
            ReportAction::Valuation => {
                let valuation = engine.inventory_valuation().await?;
                emit(json, &valuation, render::valuation)?;
            }
            ReportAction::Stats => {
                let stats = engine.sales_statistics().await?;
                emit(json, &stats, render::statistics)?;
            }
            ReportAction::Gender => {
                let rows = engine.stats_by_gender().await?;
                emit(json, &rows, |r| render::gender_statistics(r))?;
            }
        },
        Command::Seed => {
            let inserted = engine.seed_sample_essences().await?;
            emit(json, &inserted, |n| format!("inserted {n} sample essences"))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match settings::Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("invalid settings: {err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "esencias={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let database_url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());
    tracing::debug!(%database_url, "opening database");
    let db = match connect_db(&database_url).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            eprintln!("cannot open database {database_url}: {err}");
            std::process::exit(1);
        }
    };

    let engine = match Engine::builder()
        .database(db)
        .known_product_names(settings.known_product_names())
        .default_overhead_cost(settings.sales.overhead_cost)
        .build()
        .await
    {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(exit_code(err.kind()));
        }
    };

    if let Err(err) = run(&engine, cli.command, cli.json).await {
        let code = err
            .downcast_ref::<EngineError>()
            .map_or(1, |err| exit_code(err.kind()));
        eprintln!("error: {err}");
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_distinct_exit_codes() {
        assert_eq!(exit_code(ErrorKind::Storage), 1);
        assert_eq!(exit_code(ErrorKind::Validation), 2);
        assert_eq!(exit_code(ErrorKind::NotFound), 3);
        assert_eq!(exit_code(ErrorKind::AlreadyExists), 4);
        assert_eq!(exit_code(ErrorKind::CapacityExceeded), 5);
    }

    #[test]
    fn cli_parses_a_bottled_sale() {
        let cli = Cli::try_parse_from([
            "esencias",
            "--json",
            "sell",
            "ESE001",
            "--quantity-ml",
            "20",
            "--price",
            "30,50",
            "--container",
            "F001",
        ])
        .unwrap();
        assert!(cli.json);
        let Command::Sell(args) = cli.command else {
            panic!("expected sell");
        };
        assert_eq!(args.price, Decimal::new(3050, 2));
        assert_eq!(args.container.as_deref(), Some("F001"));
        assert!(args.overhead.is_none());
    }

    #[test]
    fn essence_args_derive_cost_per_ml() {
        let cli = Cli::try_parse_from([
            "esencias",
            "essence",
            "add",
            "ESE001",
            "--name",
            "Lavanda Premium",
            "--stock-ml",
            "500",
            "--entry-cost",
            "125",
            "--expiry",
            "2025-12-31",
            "--gender",
            "femenino",
        ])
        .unwrap();
        let Command::Essence(EssenceCommand {
            command: EssenceAction::Add(args),
        }) = cli.command
        else {
            panic!("expected essence add");
        };
        let fields = args.fields();
        assert_eq!(fields.cost_per_ml, Decimal::new(25, 2));
        assert_eq!(fields.gender, Gender::Feminine);
    }
}
