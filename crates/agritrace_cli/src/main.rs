//! `agritrace` command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto the core role services.
//! - Print every result as JSON on stdout and every failure on stderr.

use agritrace_core::model::crop::CROP_TYPES;
use agritrace_core::model::stock::{QualityGrade, SourceFarmer, Warehouse};
use agritrace_core::{
    init_logging, open_db, Amount, BoundedWallet, CollectionKey, CoreConfig, CropDraft,
    CropRegistration,
    CropService, DemoWallet, InventoryDraft, InventoryService, LedgerPolicy, ProfileService,
    RecordId, RecordStore, Role, SaleRequest, SessionService, SqliteSlotStore, StockDraft,
    StockService, SystemClock, UnavailableWallet, WalletClient,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::error;
use serde_json::{json, Map, Value};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

type CliResult<T> = Result<T, Box<dyn Error>>;
type Store<'conn> = RecordStore<SqliteSlotStore<'conn>, SystemClock>;

#[derive(Parser)]
#[command(name = "agritrace", version, about = "Farm-to-shelf record keeping")]
struct Cli {
    /// SQLite database file (overrides AGRITRACE_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides AGRITRACE_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides AGRITRACE_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Wallet provider used for account lookup and ledger writes.
    #[arg(long, global = true, value_enum, default_value_t = WalletKind::Demo)]
    wallet: WalletKind,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum WalletKind {
    Demo,
    #[value(name = "none")]
    Unavailable,
}

#[derive(Subcommand)]
enum Command {
    /// Connect, inspect or clear the signed-in session.
    #[command(subcommand)]
    Session(SessionCommand),
    /// Grower crop records.
    #[command(subcommand)]
    Crops(CropCommand),
    /// Distributor warehouse stock.
    #[command(subcommand)]
    Stock(StockCommand),
    /// Retailer shelf inventory.
    #[command(subcommand)]
    Inventory(InventoryCommand),
    /// Dashboard aggregates for every role that keeps records.
    Summary,
    /// Health check.
    Ping,
}

#[derive(Subcommand)]
enum SessionCommand {
    Connect {
        #[arg(long)]
        role: Role,
    },
    Show,
    Logout,
}

#[derive(Subcommand)]
enum CropCommand {
    Add(CropAddArgs),
    List,
    Sell {
        id: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        distributor: String,
        #[arg(long)]
        account: String,
    },
    Bid {
        id: String,
        #[arg(long)]
        amount: f64,
    },
    UpdateLocation {
        id: String,
        location: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Args)]
struct CropAddArgs {
    #[arg(long)]
    name: String,
    #[arg(
        long = "type",
        default_value = "Other",
        value_parser = clap::builder::PossibleValuesParser::new(CROP_TYPES.iter().copied())
    )]
    crop_type: String,
    /// Kilograms, e.g. "120" or "120 kg".
    #[arg(long, default_value = "")]
    quantity: String,
    #[arg(long, default_value_t = 0.0)]
    price: f64,
    #[arg(long)]
    location: Option<String>,
    #[arg(long, default_value = "")]
    harvest_date: String,
    #[arg(long, default_value = "")]
    notes: String,
    /// How the ledger write gates the local record.
    #[arg(long, value_enum, default_value_t = LedgerMode::BestEffort)]
    ledger: LedgerMode,
}

#[derive(Clone, Copy, ValueEnum)]
enum LedgerMode {
    Required,
    BestEffort,
    Off,
}

#[derive(Subcommand)]
enum StockCommand {
    Add(StockAddArgs),
    List,
    Dispatch {
        id: String,
        #[arg(long)]
        quantity: f64,
        #[arg(long, default_value = "")]
        info: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Args)]
struct StockAddArgs {
    #[arg(long)]
    crop_name: String,
    #[arg(long, default_value = "")]
    crop_type: String,
    #[arg(long, default_value_t = 0.0)]
    in_hand: f64,
    #[arg(long, default_value_t = 0.0)]
    wasted: f64,
    #[arg(long, default_value_t = 0.0)]
    buying_price: f64,
    #[arg(long, default_value_t = 0.0)]
    selling_price: f64,
    #[arg(long, default_value_t = 0.0)]
    transport_cost: f64,
    #[arg(long, default_value = "")]
    warehouse: String,
    #[arg(long, default_value = "")]
    farmer: String,
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=5))]
    farmer_rating: u8,
    #[arg(long, value_enum, default_value_t = GradeArg::A)]
    grade: GradeArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum GradeArg {
    A,
    B,
    C,
}

impl From<GradeArg> for QualityGrade {
    fn from(value: GradeArg) -> Self {
        match value {
            GradeArg::A => QualityGrade::A,
            GradeArg::B => QualityGrade::B,
            GradeArg::C => QualityGrade::C,
        }
    }
}

#[derive(Subcommand)]
enum InventoryCommand {
    Add(InventoryAddArgs),
    List,
    Sell {
        id: String,
        #[arg(long)]
        quantity: f64,
    },
    Remove {
        id: String,
    },
}

#[derive(Args)]
struct InventoryAddArgs {
    #[arg(long)]
    product: String,
    #[arg(long = "type", default_value = "")]
    product_type: String,
    #[arg(long, default_value_t = 0.0)]
    quantity: f64,
    #[arg(long, default_value_t = 0.0)]
    purchase_price: f64,
    #[arg(long, default_value_t = 0.0)]
    selling_price: f64,
    #[arg(long, default_value = "")]
    supplier: String,
    #[arg(long, default_value = "")]
    expiry_date: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error error={}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<Value> {
    let config = resolve_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    if let Command::Ping = cli.command {
        return Ok(ping_json());
    }

    let conn = open_db(&config.db_path)?;
    let store = RecordStore::new(SqliteSlotStore::try_new(&conn)?);
    let wallet = build_wallet(cli.wallet, config.wallet_timeout);

    match cli.command {
        Command::Session(command) => run_session(&store, &wallet, command),
        Command::Crops(command) => run_crops(&store, &wallet, command),
        Command::Stock(command) => run_stock(&store, command),
        Command::Inventory(command) => run_inventory(&store, command),
        Command::Summary => run_summary(&store),
        Command::Ping => Ok(ping_json()),
    }
}

fn run_summary(store: &Store<'_>) -> CliResult<Value> {
    let mut summaries = Map::new();
    for role in Role::ALL {
        let summary = match role.collection() {
            Some(CollectionKey::FarmerCrops) => json!(CropService::new(store).summary()?),
            Some(CollectionKey::DistributorStock) => json!(StockService::new(store).summary()?),
            Some(CollectionKey::RetailerInventory) => {
                json!(InventoryService::new(store).summary()?)
            }
            None => continue,
        };
        summaries.insert(role.as_str().to_string(), summary);
    }
    Ok(Value::Object(summaries))
}

fn ping_json() -> Value {
    json!({
        "ping": agritrace_core::ping(),
        "version": agritrace_core::core_version(),
    })
}

fn resolve_config(cli: &Cli) -> CliResult<CoreConfig> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.set_log_level(level)?;
    }
    Ok(config)
}

fn build_wallet(kind: WalletKind, timeout: Duration) -> BoundedWallet {
    let inner: Arc<dyn WalletClient> = match kind {
        WalletKind::Demo => Arc::new(DemoWallet::new()),
        WalletKind::Unavailable => Arc::new(UnavailableWallet),
    };
    BoundedWallet::new(inner, timeout)
}

fn run_session(store: &Store<'_>, wallet: &BoundedWallet, command: SessionCommand) -> CliResult<Value> {
    let sessions = SessionService::new(store);
    match command {
        SessionCommand::Connect { role } => {
            let session = sessions.connect(role, wallet)?;
            let profile = ProfileService::new(store).account_profile(role)?;
            Ok(json!({
                "session": session,
                "profile": profile,
                "redirect": role.dashboard_path(),
            }))
        }
        SessionCommand::Show => match sessions.current()? {
            Some(session) => Ok(json!({
                "session": session,
                "redirect": session.role.dashboard_path(),
            })),
            None => Ok(json!({ "session": null, "redirect": "/" })),
        },
        SessionCommand::Logout => Ok(json!({ "loggedOut": sessions.logout()? })),
    }
}

fn run_crops(store: &Store<'_>, wallet: &BoundedWallet, command: CropCommand) -> CliResult<Value> {
    let crops = CropService::new(store);
    let listing = match command {
        CropCommand::Add(args) => {
            let ledger = args.ledger;
            let draft = CropDraft {
                name: args.name,
                crop_type: args.crop_type,
                harvest_date: args.harvest_date,
                quantity: args.quantity,
                expected_price_per_unit: Amount::new(args.price),
                grow_location: args.location,
                improvement_notes: args.notes,
            };
            return match ledger {
                LedgerMode::Off => Ok(json!({ "crop": crops.add(draft)? })),
                LedgerMode::Required => {
                    Ok(registration_json(crops.register(draft, wallet, LedgerPolicy::Required)?))
                }
                LedgerMode::BestEffort => Ok(registration_json(crops.register(
                    draft,
                    wallet,
                    LedgerPolicy::BestEffort,
                )?)),
            };
        }
        CropCommand::List => crops.list()?,
        CropCommand::Sell {
            id,
            price,
            distributor,
            account,
        } => crops.sell(
            &RecordId::new(id),
            SaleRequest {
                price_per_unit: Amount::new(price),
                distributor_name: distributor,
                distributor_account: account,
            },
        )?,
        CropCommand::Bid { id, amount } => crops.place_bid(&RecordId::new(id), Amount::new(amount))?,
        CropCommand::UpdateLocation { id, location } => {
            crops.update_location(&RecordId::new(id), &location)?
        }
        CropCommand::Remove { id } => crops.remove(&RecordId::new(id))?,
    };

    let rows = listing
        .iter()
        .map(|crop| {
            json!({
                "crop": crop,
                "adjustedPrice": agritrace_core::model::crop::format_price(crop.adjusted_price()),
                "locationMultiplier": crop.location_multiplier(),
            })
        })
        .collect::<Vec<_>>();
    Ok(json!({ "crops": rows, "summary": crops.summary()? }))
}

fn registration_json(registration: CropRegistration) -> Value {
    let ledger = match registration.ledger {
        Ok(receipt) => json!({ "status": "ok", "receipt": receipt }),
        Err(err) => json!({ "status": "error", "code": err.code(), "message": err.to_string() }),
    };
    json!({ "crop": registration.crop, "ledger": ledger })
}

fn run_stock(store: &Store<'_>, command: StockCommand) -> CliResult<Value> {
    let stock = StockService::new(store);
    let items = match command {
        StockCommand::Add(args) => {
            let draft = StockDraft {
                crop_name: args.crop_name,
                crop_type: args.crop_type,
                quantity_in_hand: Amount::new(args.in_hand),
                quantity_wasted: Amount::new(args.wasted),
                buying_price: Amount::new(args.buying_price),
                selling_price: Amount::new(args.selling_price),
                transportation_cost: Amount::new(args.transport_cost),
                warehouse: Warehouse {
                    location: args.warehouse,
                    ..Warehouse::default()
                },
                farmer: SourceFarmer {
                    name: args.farmer,
                    rating: args.farmer_rating,
                },
                quality_grade: args.grade.into(),
                ..StockDraft::default()
            };
            return Ok(json!({ "item": stock.receive(draft)? }));
        }
        StockCommand::List => stock.list()?,
        StockCommand::Dispatch { id, quantity, info } => {
            stock.dispatch(&RecordId::new(id), Amount::new(quantity), &info)?
        }
        StockCommand::Remove { id } => stock.remove(&RecordId::new(id))?,
    };
    Ok(json!({ "items": items, "summary": stock.summary()? }))
}

fn run_inventory(store: &Store<'_>, command: InventoryCommand) -> CliResult<Value> {
    let inventory = InventoryService::new(store);
    let items = match command {
        InventoryCommand::Add(args) => {
            let draft = InventoryDraft {
                product_name: args.product,
                product_type: args.product_type,
                quantity: Amount::new(args.quantity),
                sold_quantity: Amount::ZERO,
                purchase_price: Amount::new(args.purchase_price),
                selling_price: Amount::new(args.selling_price),
                supplier: args.supplier,
                expiry_date: args.expiry_date,
            };
            return Ok(json!({ "item": inventory.shelve(draft)? }));
        }
        InventoryCommand::List => inventory.list()?,
        InventoryCommand::Sell { id, quantity } => {
            inventory.record_sale(&RecordId::new(id), Amount::new(quantity))?
        }
        InventoryCommand::Remove { id } => inventory.remove(&RecordId::new(id))?,
    };
    Ok(json!({ "items": items, "summary": inventory.summary()? }))
}
