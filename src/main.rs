use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mythic_profile::{
    count_profiles, count_users, get_events_for_entity, import_users, init_logging,
    load_users_csv, open_database, AstrologyProfile, Config, ProfileEngine, ProfileStatus,
    PROFILE_ENTITY,
};

#[derive(Parser)]
#[command(name = "mythic", version, about = "Numerology & astrology profiles")]
struct Cli {
    /// Database file (overrides MYTHIC_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Import users from CSV (user_id,name,birth_date,birth_time)
    Import {
        csv: PathBuf,
    },
    /// Compute (or recompute) a user's profile
    Compute {
        user_id: String,
        /// Print the stored profile as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the stored profile
    Show {
        user_id: String,
        #[arg(long)]
        json: bool,
    },
    /// List audit events for a user's profile
    Events {
        user_id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&Config::log_filter());
    let config = Config::load()?;

    let db_path = cli.db.unwrap_or(config.db_path);
    let conn = open_database(&db_path)?;

    match cli.command {
        Commands::Init => {
            println!("✓ Database initialized: {:?}", db_path);
            println!(
                "   {} users, {} profiles",
                count_users(&conn)?,
                count_profiles(&conn)?
            );
        }
        Commands::Import { csv } => {
            println!("📂 Loading users from {:?}...", csv);
            let users = load_users_csv(&csv)?;
            let count = import_users(&conn, &users)?;
            println!("✓ Imported {} users", count);
            println!("   Database now holds {} users", count_users(&conn)?);
        }
        Commands::Compute { user_id, json } => {
            let engine = ProfileEngine::new().with_actor("cli");
            let profile = engine.upsert_profile(&conn, &conn, &user_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("✓ Profile stored for {}", user_id);
                print_profile(&profile);
            }
        }
        Commands::Show { user_id, json } => {
            let engine = ProfileEngine::new();
            let status = engine.get_profile(&conn, &user_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                match status {
                    ProfileStatus::Computed(profile) => print_profile(&profile),
                    ProfileStatus::NotComputed => {
                        println!("∅ No profile computed yet for {}", user_id);
                        println!("   Run: mythic compute {}", user_id);
                    }
                }
            }
        }
        Commands::Events { user_id } => {
            let events = get_events_for_entity(&conn, PROFILE_ENTITY, &user_id)?;
            if events.is_empty() {
                println!("∅ No events for {}", user_id);
            }
            for event in events {
                println!(
                    "{}  {:<20} {}  by {}",
                    event.timestamp.to_rfc3339(),
                    event.event_type,
                    event.data,
                    event.actor
                );
            }
        }
    }

    Ok(())
}

fn print_profile(profile: &AstrologyProfile) {
    let or_dash = |n: Option<u32>| n.map_or_else(|| "-".to_string(), |n| n.to_string());

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "☉  Sun sign:      {} ({}, {}, ruled by {})",
        profile.sun_sign,
        profile.element.as_str(),
        profile.modality.as_str(),
        profile.ruling_planet
    );
    println!("🔢 Life Path:     {}", profile.life_path);
    println!("   Birthday:      {}", profile.birthday);
    println!("   Personal Year: {}", profile.personal_year);
    println!("   Destiny:       {}", or_dash(profile.destiny));
    println!("   Soul Urge:     {}", or_dash(profile.soul_urge));
    println!("   Personality:   {}", or_dash(profile.personality));
    println!("🍀 Lucky numbers: {:?}", profile.lucky_numbers);
    println!("   Lucky colors:  {}", profile.lucky_colors.join(", "));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "   Computed at {} (birth date {})",
        profile.full_data.calculated_at.to_rfc3339(),
        profile.full_data.birth_date
    );
}
