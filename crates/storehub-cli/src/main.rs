use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;
use storehub_cli::seeder::{catalog, clients, legacy, users};
use storehub_db::{init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "storehub-cli")]
#[command(about = "StoreHub CLI - Administrative tools for StoreHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror the role and permission catalogs and write missing bundles
    SeedCatalog,
    /// Create a super administrator account
    CreateSuperadmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Import legacy custom-role assignments into user_roles
    ReconcileLegacyRoles {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Seed fake client accounts with customer records
    SeedClients {
        /// Number of clients to create
        #[arg(short = 'c', long, default_value = "50")]
        count: usize,

        /// Password shared by every seeded client
        #[arg(long, default_value = "password123")]
        password: String,
    },
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {context}: {err}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        fail("Configuration error", "DATABASE_URL must be set");
    };
    let pool = match init_db_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => fail("Failed to connect to database", e),
    };
    if let Err(e) = run_migrations(&pool).await {
        fail("Failed to run migrations", e);
    }

    match cli.command {
        Commands::SeedCatalog => handle_seed_catalog(&pool).await,
        Commands::CreateSuperadmin {
            name,
            email,
            password,
        } => handle_create_superadmin(&pool, name, email, password).await,
        Commands::ReconcileLegacyRoles { dry_run } => {
            handle_reconcile_legacy_roles(&pool, dry_run).await
        }
        Commands::SeedClients { count, password } => {
            handle_seed_clients(&pool, count, &password).await
        }
    }
}

async fn handle_seed_catalog(pool: &PgPool) {
    if let Err(e) = catalog::seed_catalog(pool).await {
        fail("Error seeding catalog", e);
    }
}

async fn handle_create_superadmin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let name = match name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Name")
            .interact_text()
            .unwrap_or_else(|e| fail("Failed to read name", e)),
    };

    let email: String = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .unwrap_or_else(|e| fail("Failed to read email", e)),
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| fail("Failed to read password", e)),
    };

    match users::create_super_admin(pool, &name, &email, &password).await {
        Ok(id) => {
            println!("\n✅ Super administrator created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", email.trim().to_lowercase());
        }
        Err(e) => fail("Error creating super administrator", e),
    }
}

async fn handle_reconcile_legacy_roles(pool: &PgPool, dry_run: bool) {
    match legacy::reconcile_legacy_roles(pool, dry_run).await {
        Ok(report) => {
            for (id, name) in &report.unknown {
                println!("   ⚠️  Row {id}: unknown role name {name:?}");
            }
            if dry_run {
                println!("\nℹ️  Dry run: nothing was written.");
            }
        }
        Err(e) => fail("Error reconciling legacy roles", e),
    }
}

async fn handle_seed_clients(pool: &PgPool, count: usize, password: &str) {
    match clients::seed_clients(pool, count, password).await {
        Ok(ids) => println!("✅ Created {} clients", ids.len()),
        Err(e) => fail("Error seeding clients", e),
    }
}
