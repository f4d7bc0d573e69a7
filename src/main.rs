use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use wapcon::config::Config;
use wapcon::docker::{Engine, ProcessRunner};
use wapcon::machine::{MYSQL_IMAGE, WORDPRESS_IMAGE};
use wapcon::pull::PullStatus;

const COMMANDS: &[&str] = &["status", "start", "stop", "images", "pull", "remove-images"];

#[derive(Debug, Parser)]
#[command(name = "wapcon", about = "Run a local WordPress + MySQL stack")]
struct Cli {
    /// Directory containing `.wapcon.yaml`.
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Container CLI to use instead of the configured one.
    #[arg(long, env = "WAPCON_DOCKER")]
    docker: Option<String>,

    /// Log every command and its output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load_or_default(&cli.config_dir)?;
    if let Some(docker) = cli.docker {
        config.docker = docker;
    }
    let engine = Engine::new(ProcessRunner, config.docker.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_menu()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = line.trim();
        if command.is_empty() || command == "exit" {
            println!("Bye");
            break;
        }
        if let Err(e) = dispatch(&engine, &config, command).await {
            eprintln!("error: {e:#}");
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "wapcon=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("WAPCON_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_menu() -> Result<()> {
    println!();
    println!("Commands:");
    println!("- exit");
    for command in COMMANDS {
        println!("- {command}");
    }
    print!("command: ");
    std::io::stdout().flush()?;
    Ok(())
}

async fn dispatch(engine: &Engine<ProcessRunner>, config: &Config, command: &str) -> Result<()> {
    let tags = config.image_tags();
    match command {
        "status" => {
            let status = engine.check_status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        "images" => {
            let status = engine.check_image_status(&tags).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        "start" => {
            let result = engine.start(&config.start_options()).await?;
            println!("{}: exit {:?}", wapcon::machine::DB_CONTAINER, result.db.exit_code);
            println!("{}: exit {:?}", wapcon::machine::WP_CONTAINER, result.wp.exit_code);
        }
        "stop" => {
            let result = engine.stop().await;
            for (name, outcome) in [
                (wapcon::machine::DB_CONTAINER, &result.db),
                (wapcon::machine::WP_CONTAINER, &result.wp),
            ] {
                match outcome {
                    Ok(r) => println!("{name}: exit {:?}", r.exit_code),
                    Err(e) => println!("{name}: {e}"),
                }
            }
        }
        "pull" => {
            let images = engine.check_image_status(&tags).await?;
            for (label, image, tag, present) in [
                ("WordPress", WORDPRESS_IMAGE, &tags.wordpress, images.wp),
                ("MySQL", MYSQL_IMAGE, &tags.mysql, images.db),
            ] {
                if present {
                    println!("{label} is ready.");
                    continue;
                }
                let mut report = |status: &PullStatus| {
                    println!(
                        "{label}: {}/{}",
                        status.completed_layers(),
                        status.total_layers()
                    );
                };
                let status = engine.pull_image(image, tag, Some(&mut report)).await?;
                if !status.complete {
                    eprintln!("{label}: pull did not finish (exit {:?})", status.exit_code);
                }
            }
        }
        "remove-images" => {
            let result = engine.remove_images(&tags).await?;
            print!("{}", result.stdout());
        }
        other => eprintln!("unknown command: {other}"),
    }
    Ok(())
}
