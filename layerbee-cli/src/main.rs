//! LayerBEE CLI
//!
//! Ask the tutor, track progress and use the print shop from a terminal.
//! State lives in a data directory as one JSON file per key.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use layerbee::config::LayerbeeConfig;
use layerbee::filter::{self, FieldKind, Verdict};
use layerbee::inference::EngineSlot;
use layerbee::observability::{init_tracing, LogFormat};
use layerbee::progress::ProgressTracker;
use layerbee::shop::{self, format_price, Cart, CustomerInfo, Product, Shop};
use layerbee::storage::{FileStore, KeyValueStore};
use layerbee::theme::ThemeManager;
use layerbee::tutor::{SessionReply, Tutor, TutorMode, TutorSession};

/// LayerBEE - 3D printing tutor for kids
#[derive(Parser, Debug)]
#[command(name = "layerbee")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding layerbee.json (default: current directory)
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    config_dir: PathBuf,

    /// Data directory, overriding dataDir from the config
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the tutor a question
    Ask {
        /// The question
        question: Vec<String>,
        /// Tutor mode
        #[arg(short, long)]
        mode: Option<String>,
        /// Page the question is asked from, e.g. /modules/troubleshoot
        #[arg(short, long)]
        page: Option<String>,
    },
    /// List tutor modes
    Mode,
    /// Learner progress
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },
    /// Browse the print shop
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// List submitted orders
    Orders {
        /// Only orders still waiting on a parent
        #[arg(long)]
        pending: bool,
    },
    /// Run text through the content filter
    Check {
        /// Which validator to use
        #[arg(value_enum)]
        kind: CheckKind,
        /// Text to check
        text: Vec<String>,
    },
    /// Light/dark theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
        /// Treat the system preference as dark
        #[arg(long, global = true)]
        prefers_dark: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ProgressAction {
    /// Print progress as JSON
    Show,
    /// Mark a module completed
    Complete {
        /// Module id: basics, workflow, troubleshoot, advanced or business
        module: String,
    },
    /// Count one finished print
    LogPrint,
    /// Save printer and slicer
    Setup {
        /// Printer model
        printer: String,
        /// Slicer name
        slicer: String,
    },
}

#[derive(Subcommand, Debug)]
enum ShopAction {
    /// List products
    List {
        /// Category id
        #[arg(short, long, default_value = shop::catalog::ALL_CATEGORY)]
        category: String,
    },
    /// List popular products
    Popular,
    /// List filament colors
    Colors,
}

#[derive(Subcommand, Debug)]
enum CartAction {
    /// Add a product
    Add {
        /// Product id
        product: String,
        /// Color name
        #[arg(short, long, default_value = "Gray")]
        color: String,
        /// Quantity
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove the line at INDEX (1-based)
    Remove {
        /// Line number
        index: usize,
    },
    /// Set the quantity of the line at INDEX (1-based)
    Qty {
        /// Line number
        index: usize,
        /// New quantity; zero removes the line
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Show the cart
    Show,
    /// Empty the cart
    Clear,
    /// Place an order
    Checkout {
        /// Your name
        #[arg(long)]
        name: String,
        /// Classroom or period for delivery
        #[arg(long)]
        contact: String,
        /// Note for the maker
        #[arg(long, default_value = "")]
        note: String,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch theme
    Toggle,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CheckKind {
    /// Chat message
    Chat,
    /// Name field
    Name,
    /// Free text field
    Message,
    /// Uploaded file name
    File,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(args.verbose, format);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = LayerbeeConfig::load_from_dir(&args.config_dir)?;
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data_dir));
    tracing::debug!(data_dir = %data_dir.display(), "Opening store");
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(data_dir)?);

    match args.command {
        Command::Ask {
            question,
            mode,
            page,
        } => ask(&config, store, &question.join(" "), mode, page).await,
        Command::Mode => {
            for mode in TutorMode::ALL {
                println!("{:<14}{}", mode.as_str(), mode.announcement());
            }
            Ok(())
        }
        Command::Progress { action } => progress(ProgressTracker::new(store), action),
        Command::Shop { action } => {
            browse(action);
            Ok(())
        }
        Command::Cart { action } => cart(&Shop::new(store), action),
        Command::Orders { pending } => {
            let shop = Shop::new(store);
            let orders = if pending {
                shop.pending_orders()?
            } else {
                shop.orders()?
            };
            println!("{}", serde_json::to_string_pretty(&orders)?);
            Ok(())
        }
        Command::Check { kind, text } => {
            check(kind, &text.join(" "));
            Ok(())
        }
        Command::Theme {
            action,
            prefers_dark,
        } => {
            let themes = ThemeManager::new(store);
            let theme = match action {
                ThemeAction::Show => themes.current(prefers_dark)?,
                ThemeAction::Toggle => themes.toggle(prefers_dark)?,
            };
            println!("{theme}");
            Ok(())
        }
    }
}

fn build_engine(config: &LayerbeeConfig) -> anyhow::Result<Arc<EngineSlot>> {
    let slot = Arc::new(EngineSlot::new());
    #[cfg(feature = "http")]
    {
        if config.engine.endpoint.is_some() {
            let engine = layerbee::inference::OpenAiCompatibleEngine::from_config(&config.engine)?;
            tracing::info!(url = engine.url(), model = %config.engine.model_id, "Engine ready");
            slot.install(Arc::new(engine));
        }
    }
    #[cfg(not(feature = "http"))]
    {
        if config.engine.endpoint.is_some() {
            tracing::warn!("Built without the http feature; ignoring engine.endpoint");
        }
    }
    Ok(slot)
}

async fn ask(
    config: &LayerbeeConfig,
    store: Arc<dyn KeyValueStore>,
    question: &str,
    mode: Option<String>,
    page: Option<String>,
) -> anyhow::Result<()> {
    let tracker = ProgressTracker::new(store);
    let tutor = Tutor::new(build_engine(config)?, Arc::new(tracker.clone()))
        .with_config(config.tutor.clone())
        .with_sampling(config.engine.temperature, config.engine.max_tokens);
    if let Some(page) = page {
        tutor.set_page(page);
    }
    if let Some(mode) = mode {
        if !tutor.set_mode(&mode) {
            anyhow::bail!("unknown mode '{mode}'");
        }
        println!("{}", Tutor::mode_announcement(tutor.mode()));
    }

    let session = TutorSession::new(Arc::new(tutor)).with_progress(tracker);
    match session.submit(question).await {
        SessionReply::Empty => anyhow::bail!("ask needs a question"),
        SessionReply::Blocked { message, .. } => println!("{message}"),
        SessionReply::Answer(response) => println!("{}", response.html),
    }
    Ok(())
}

fn progress(tracker: ProgressTracker, action: ProgressAction) -> anyhow::Result<()> {
    match action {
        ProgressAction::Show => {
            let progress = tracker.get()?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
            println!("{}% complete", progress.percent_complete());
        }
        ProgressAction::Complete { module } => {
            if tracker.mark_module_complete(&module)? {
                println!("Module '{module}' complete!");
            } else {
                println!("Module '{module}' was already complete");
            }
        }
        ProgressAction::LogPrint => {
            println!("Prints logged: {}", tracker.log_print()?);
        }
        ProgressAction::Setup { printer, slicer } => {
            tracker.save_setup(&printer, &slicer)?;
            println!("Saved setup: {printer} with {slicer}");
        }
    }
    Ok(())
}

fn print_product(product: &Product) {
    println!(
        "{} {:<18}{:>7}  {:<16}{:<8}{}",
        product.image,
        product.name,
        format_price(product.price_cents),
        product.id,
        product.print_time,
        product.difficulty
    );
}

fn browse(action: ShopAction) {
    match action {
        ShopAction::List { category } => {
            shop::products_by_category(&category)
                .into_iter()
                .for_each(print_product);
        }
        ShopAction::Popular => shop::popular_products().into_iter().for_each(print_product),
        ShopAction::Colors => {
            for color in shop::colors() {
                println!("{:<14}{}", color.name, color.upcharge_text());
            }
        }
    }
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for (i, item) in cart.items().iter().enumerate() {
        println!(
            "{:>2}. {} x{} ({}) {}",
            i + 1,
            item.name,
            item.quantity,
            item.color,
            format_price(item.total_cents())
        );
    }
    println!(
        "{} items, total {}",
        cart.item_count(),
        format_price(cart.total_cents())
    );
}

fn line_index(index: usize) -> anyhow::Result<usize> {
    index
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("line numbers start at 1"))
}

fn cart(shop: &Shop, action: CartAction) -> anyhow::Result<()> {
    match action {
        CartAction::Add {
            product,
            color,
            quantity,
        } => print_cart(&shop.add_to_cart(&product, &color, quantity)?),
        CartAction::Remove { index } => print_cart(&shop.remove_from_cart(line_index(index)?)?),
        CartAction::Qty { index, quantity } => {
            print_cart(&shop.set_quantity(line_index(index)?, quantity)?);
        }
        CartAction::Show => print_cart(&shop.cart()?),
        CartAction::Clear => {
            shop.clear_cart()?;
            println!("Cart cleared");
        }
        CartAction::Checkout {
            name,
            contact,
            note,
        } => {
            let customer = CustomerInfo {
                name,
                contact,
                note,
            };
            match shop.checkout(customer)? {
                Some(order) => println!(
                    "Order {} placed, total {}. Put the order id in the payment memo.",
                    order.id,
                    format_price(order.total_cents)
                ),
                None => println!("Your cart is empty"),
            }
        }
    }
    Ok(())
}

fn check(kind: CheckKind, text: &str) {
    let verdict = match kind {
        CheckKind::Chat => filter::validate_chat_message(text),
        CheckKind::Name => filter::validate_shop_input(text, FieldKind::Name),
        CheckKind::Message => filter::validate_shop_input(text, FieldKind::Message),
        CheckKind::File => filter::validate_file_name(text),
    };
    match verdict {
        Verdict::Allowed { sanitized } => println!("allowed: {sanitized}"),
        Verdict::Rejected { reason, redirect } => {
            println!("rejected: {reason}");
            if let Some(redirect) = redirect {
                println!("{redirect}");
            }
        }
    }
}
