use clap::{Parser, Subcommand};
use shortlink_dashboard::feedback::LogFeedback;
use shortlink_dashboard::format::{country_flag, country_name, referrer_label, referrer_platform};
use shortlink_dashboard::models::{CreateUrlRequest, CreateUserRequest, UpdateUrlRequest};
use shortlink_dashboard::{AppConfig, AppState, TimeWindow};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "shortlink", about = "Command-line client for the URL shortener API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and persist the session token
    Login {
        username: String,
        #[arg(long, env = "SHORTLINK_PASSWORD")]
        password: String,
    },
    /// Forget the persisted session
    Logout,
    /// Create an account
    Register {
        username: String,
        #[arg(long, env = "SHORTLINK_PASSWORD")]
        password: String,
    },
    /// Show the signed-in user
    Whoami,
    /// Show a user profile by id
    Profile { id: u64 },
    /// Shorten a URL, optionally with a custom code
    Shorten {
        full_url: String,
        #[arg(long, default_value = "")]
        code: String,
    },
    /// Change the target or code of an existing short URL
    Update {
        id: u64,
        full_url: String,
        code: String,
    },
    /// List your short URLs (or every URL with --all)
    Urls {
        #[arg(long)]
        all: bool,
    },
    /// Click analytics for a short URL
    Stats {
        short_url: String,
        #[arg(long, default_value = "all")]
        range: String,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let app = AppState::with_file_session(config, Arc::new(LogFeedback));

    let ok = match cli.command {
        Command::Login { username, password } => app.auth().login(&username, &password).await,
        Command::Logout => {
            let auth = app.auth();
            auth.logout().await;
            auth.error().is_none()
        }
        Command::Register { username, password } => app
            .users()
            .create_user(&CreateUserRequest { username, password })
            .await
            .is_some(),
        Command::Whoami => match app.users().current_user().await {
            Some(user) => {
                println!("{} (id {})", user.username, user.id);
                true
            }
            None => false,
        },
        Command::Profile { id } => {
            if !app.session.can_access_profile(id).await {
                eprintln!("profile {id} is not yours");
                return Ok(ExitCode::FAILURE);
            }
            match app.users().profile_by_id(id).await {
                Some(user) => {
                    println!("{} (id {})", user.username, user.id);
                    true
                }
                None => false,
            }
        }
        Command::Shorten { full_url, code } => {
            let request = CreateUrlRequest {
                full_url,
                short_url: code,
            };
            match app.urls().shorten_url(&request).await {
                Some(url) => {
                    println!("{}", app.config.full_short_url(&url.short_url));
                    true
                }
                None => false,
            }
        }
        Command::Update { id, full_url, code } => {
            let request = UpdateUrlRequest {
                id: Some(id),
                full_url,
                short_url: code,
            };
            app.urls().update_url(id, &request).await.is_some()
        }
        Command::Urls { all } => {
            let store = app.urls();
            let urls = if all {
                store.fetch_all_urls().await
            } else {
                store.current_user_urls().await
            };
            match urls {
                Some(urls) => {
                    for url in urls {
                        println!(
                            "{:>6}  {:<40}  {:>6} clicks  {}",
                            url.id,
                            app.config.full_short_url(&url.short_url),
                            url.click,
                            url.full_url
                        );
                    }
                    true
                }
                None => false,
            }
        }
        Command::Stats {
            short_url,
            range,
            json,
        } => {
            let view = app.stats_view();
            view.select_window(range);
            match view.load_stats(&short_url).await {
                Some(stats) => {
                    let summary = view.summary();
                    if json {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    } else {
                        let label = TimeWindow::lookup(&summary.window)
                            .map(|w| w.label)
                            .unwrap_or("All");
                        println!("{} -> {}", stats.short_url, stats.full_url);
                        println!("total clicks:     {}", stats.total_clicks);
                        println!("clicks today:     {}", summary.clicks_today);
                        println!("{label:<17} {}", summary.range_total);
                        println!("average per day:  {}", summary.average_per_day);
                        for day in &summary.filtered {
                            println!("  {}  {}", day.date, day.clicks);
                        }
                        for country in &stats.top_countries {
                            println!(
                                "  {} {:<24} {}",
                                country_flag(&country.country),
                                country_name(&country.country),
                                country.clicks
                            );
                        }
                        for referer in &stats.top_referers {
                            println!(
                                "  [{}] {:<24} {}",
                                referrer_platform(&referer.referer).icon(),
                                referrer_label(&referer.referer),
                                referer.clicks
                            );
                        }
                    }
                    true
                }
                None => {
                    if let Some(error) = view.error() {
                        eprintln!("{error}");
                    }
                    false
                }
            }
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
