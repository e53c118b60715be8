use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./esencias.db?mode=rwc";
const USAGE: &str = "usage: migration [up|down|fresh|status]\n\
    DATABASE_URL selects the database (default sqlite:./esencias.db?mode=rwc)";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    if matches!(command.as_str(), "-h" | "--help" | "help") {
        println!("{USAGE}");
        return Ok(());
    }

    let db_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&db_url).await?;

    match command.as_str() {
        "up" => {
            migration::Migrator::up(&db, None).await?;
            println!("schema up to date on {db_url}");
        }
        "down" => {
            migration::Migrator::down(&db, Some(1)).await?;
            println!("last migration rolled back on {db_url}");
        }
        "fresh" => {
            migration::Migrator::fresh(&db).await?;
            println!("schema rebuilt from scratch on {db_url}");
        }
        "status" => migration::Migrator::status(&db).await?,
        other => {
            eprintln!("unknown command '{other}'\n{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
