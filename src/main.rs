use billflow::application::dashboard::BillingDashboard;
use billflow::application::orchestrator::PaymentOrchestrator;
use billflow::application::tracker::RequestTracker;
use billflow::config::{
    BackendConfig, CheckoutConfig, DEFAULT_MERCHANT_NAME, DEFAULT_THEME_COLOR, VerificationPolicy,
};
use billflow::domain::analytics::AnalyticsPeriod;
use billflow::domain::order::Customer;
use billflow::domain::payment::PaymentResult;
use billflow::domain::plan::Plan;
use billflow::domain::ports::SharedBackend;
use billflow::infrastructure::checkout::CheckoutAdapter;
use billflow::infrastructure::console::ConsoleCheckout;
use billflow::infrastructure::http::HttpBackend;
use billflow::infrastructure::in_memory::InMemoryBackend;
use billflow::interfaces::console::{render_analytics, render_history, render_plans};
use billflow::interfaces::csv::history_writer::HistoryWriter;
use billflow::telemetry;
use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the billing backend. Without it a seeded in-memory backend is used.
    #[arg(long, env = "BILLFLOW_API_URL", global = true)]
    api_url: Option<String>,

    /// Backend request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available plans
    Plans,

    /// Show recent payments
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// Show aggregate payment figures
    Analytics {
        /// day, week, month, year or all
        #[arg(long, default_value = "month")]
        period: AnalyticsPeriod,
    },

    /// Buy a plan through the checkout
    Subscribe {
        /// Plan id (see `plans`)
        plan: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        contact: Option<String>,

        /// Publishable checkout key. Checkout refuses to open without one.
        #[arg(long, env = "BILLFLOW_CHECKOUT_KEY", hide_env_values = true)]
        checkout_key: Option<String>,

        #[arg(long, env = "BILLFLOW_MERCHANT_NAME", default_value = DEFAULT_MERCHANT_NAME)]
        merchant_name: String,

        #[arg(long, env = "BILLFLOW_THEME_COLOR", default_value = DEFAULT_THEME_COLOR)]
        theme_color: String,

        /// Report a completed checkout as paid without asking the backend to verify it
        #[arg(long)]
        skip_verification: bool,

        /// Give up on an unanswered checkout after this many seconds
        #[arg(long)]
        checkout_timeout_secs: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let tracker = RequestTracker::new();

    match cli.command {
        Command::Plans => {
            print!("{}", render_plans(Plan::catalog()));
        }
        Command::History { limit, format } => {
            let backend = connect(cli.api_url.as_deref(), cli.timeout_secs)?;
            let dashboard = BillingDashboard::new(backend, tracker);
            let history = dashboard.load_payment_history(limit).await.into_diagnostic()?;
            match format {
                Format::Table => print!("{}", render_history(&history)),
                Format::Csv => {
                    let stdout = io::stdout();
                    let mut writer = HistoryWriter::new(stdout.lock());
                    writer.write_history(&history).into_diagnostic()?;
                }
            }
        }
        Command::Analytics { period } => {
            let backend = connect(cli.api_url.as_deref(), cli.timeout_secs)?;
            let dashboard = BillingDashboard::new(backend, tracker);
            let summary = dashboard.load_analytics(period).await.into_diagnostic()?;
            print!("{}", render_analytics(&summary));
        }
        Command::Subscribe {
            plan,
            name,
            email,
            contact,
            checkout_key,
            merchant_name,
            theme_color,
            skip_verification,
            checkout_timeout_secs,
        } => {
            let verification = if skip_verification {
                VerificationPolicy::Skip
            } else {
                VerificationPolicy::Required
            };
            let config = CheckoutConfig::default()
                .with_key(checkout_key)
                .with_merchant_name(merchant_name)
                .with_theme_color(theme_color)
                .with_verification(verification)
                .with_timeout(checkout_timeout_secs.map(Duration::from_secs));
            let adapter = CheckoutAdapter::start(Box::new(ConsoleCheckout::stdio()), config).await;
            let backend = connect(cli.api_url.as_deref(), cli.timeout_secs)?;
            let orchestrator = PaymentOrchestrator::new(backend, adapter, tracker);

            let mut customer = Customer::new(name, email);
            if let Some(contact) = contact {
                customer = customer.with_contact(contact);
            }

            match orchestrator.submit_by_id(&plan, customer).await.into_diagnostic()? {
                PaymentResult::Success { reference } => {
                    println!("Payment successful (reference {reference})");
                }
                PaymentResult::Cancelled => {
                    println!("Checkout cancelled; no payment was taken");
                }
                PaymentResult::Failure { reason } => {
                    return Err(miette!("Payment failed: {reason}"));
                }
            }
        }
    }

    Ok(())
}

/// The HTTP backend when a URL is configured, else the seeded demo backend.
fn connect(api_url: Option<&str>, timeout_secs: u64) -> Result<SharedBackend> {
    match api_url {
        Some(url) => {
            let config = BackendConfig::new(url).with_timeout(Duration::from_secs(timeout_secs));
            info!(%url, "using HTTP backend");
            Ok(Arc::new(HttpBackend::new(&config).into_diagnostic()?))
        }
        None => {
            warn!("no backend URL configured; using the in-memory demo backend");
            Ok(Arc::new(InMemoryBackend::seeded(chrono::Utc::now())))
        }
    }
}
