use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dental_core::{
    in_memory_store, recent_limit_from_env_value, CoreConfig, DentalServices, ProcedureLineItem,
    TreatmentPlanService,
};
use record_store::{Clock, FixedClock, Seed, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dental")]
#[command(about = "Dental practice records CLI")]
struct Cli {
    /// Seed file (YAML or JSON) to load into the in-memory store.
    /// Falls back to `DENTAL_SEED_FILE`.
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List or search patients
    Patients {
        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
    },
    /// List appointments
    Appointments {
        /// Only appointments starting today
        #[arg(long)]
        today: bool,
    },
    /// List treatments
    Treatments {
        /// Only the N most recent treatments
        #[arg(long, value_name = "N")]
        recent: Option<u32>,
    },
    /// List or search the procedure catalog
    Procedures {
        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
        /// Exact category
        #[arg(long)]
        category: Option<String>,
    },
    /// Compute treatment-plan totals from a file of line items
    Totals {
        /// YAML or JSON list of `{cost, insuranceCovered}` line items
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dental=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    if let Commands::Totals { file } = &command {
        let items = load_line_items(file)?;
        let totals = TreatmentPlanService::calculate_totals(&items);
        println!("Procedures:         {}", totals.procedure_count);
        println!("Total cost:         {:.2}", totals.total_cost);
        println!("Insurance covered:  {:.2}", totals.total_insurance_covered);
        println!("Patient portion:    {:.2}", totals.patient_portion);
        return Ok(());
    }

    let clock: Arc<dyn Clock> = match cli.date {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(SystemClock),
    };
    let seed_path = cli
        .seed
        .or_else(|| std::env::var("DENTAL_SEED_FILE").ok().map(PathBuf::from));
    let seed = match seed_path {
        Some(path) => Some(
            Seed::load(&path).with_context(|| format!("loading seed {}", path.display()))?,
        ),
        None => None,
    };

    let limit = recent_limit_from_env_value(std::env::var("DENTAL_RECENT_LIMIT").ok())?;
    let cfg = Arc::new(CoreConfig::new(limit, clock.clone())?);
    let store = in_memory_store(clock, seed)?;
    let services = DentalServices::new(Arc::new(store), cfg);

    match command {
        Commands::Patients { search } => {
            let patients = services
                .patients
                .search(search.as_deref().unwrap_or_default())
                .await?;
            if patients.is_empty() {
                println!("No patients found.");
            }
            for p in patients {
                println!(
                    "ID: {}, Name: {}, Phone: {}, Allergies: {}",
                    p.id,
                    p.name.unwrap_or_default(),
                    p.phone.unwrap_or_default(),
                    p.allergies.join(", ")
                );
            }
        }
        Commands::Appointments { today } => {
            let appointments = if today {
                services.appointments.get_todays_appointments().await?
            } else {
                services.appointments.get_all().await?
            };
            if appointments.is_empty() {
                println!("No appointments found.");
            }
            for a in appointments {
                println!(
                    "ID: {}, {} at {}, Patient: {}, Status: {}",
                    a.id,
                    a.appointment_type.unwrap_or_default(),
                    a.date_time.unwrap_or_default(),
                    a.patient_id.unwrap_or_default(),
                    a.status.unwrap_or_default()
                );
            }
        }
        Commands::Treatments { recent } => {
            let treatments = match recent {
                Some(n) => services.treatments.get_recent_treatments(Some(n)).await?,
                None => services.treatments.get_all().await?,
            };
            if treatments.is_empty() {
                println!("No treatments found.");
            }
            for t in treatments {
                println!(
                    "ID: {}, {} on {}, Tooth: {}, Cost: {:.2}",
                    t.id,
                    t.procedure.unwrap_or_default(),
                    t.date.unwrap_or_default(),
                    t.tooth.join(","),
                    t.cost.unwrap_or_default()
                );
            }
        }
        Commands::Procedures { search, category } => {
            let procedures = if search.is_none() && category.is_none() {
                services.procedures.get_procedure_library().await?
            } else {
                services
                    .procedures
                    .search_procedures(search.as_deref().unwrap_or_default(), category.as_deref())
                    .await?
            };
            if procedures.is_empty() {
                println!("No procedures found.");
            }
            for p in procedures {
                println!(
                    "ID: {}, {} [{}], Cost: {:.2}",
                    p.id,
                    p.name.unwrap_or_default(),
                    p.category.unwrap_or_default(),
                    p.cost.unwrap_or_default()
                );
            }
        }
        Commands::Totals { .. } => {}
    }

    Ok(())
}

fn load_line_items(path: &Path) -> anyhow::Result<Vec<ProcedureLineItem>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading line items from {}", path.display()))?;
    let items = parse_line_items(&text)?;
    tracing::debug!("loaded {} line items from {}", items.len(), path.display());
    Ok(items)
}

/// Parses a YAML (or JSON) list of line items, reporting the path of the first bad value.
fn parse_line_items(text: &str) -> anyhow::Result<Vec<ProcedureLineItem>> {
    let de = serde_yaml::Deserializer::from_str(text);
    serde_path_to_error::deserialize(de).map_err(|e| {
        let path = e.path().to_string();
        anyhow::anyhow!("line items schema mismatch at {path}: {}", e.into_inner())
    })
}
