//! CLI entry point for desktoast
//!
//! A thin command-line front end over the library: post a notification
//! with optional icon, image, and action buttons, optionally waiting for
//! the user's interaction, or query the daemon's identity.

use anyhow::{bail, Result};
use clap::Parser;
use desktoast::{load_config, set_debug, Context, LoopSignal, Timeout, Urgency};
use std::path::{Path, PathBuf};

// Version constants from build script
const VERSION: &str = env!("CARGO_PKG_VERSION");
const COMMIT_HASH: &str = env!("GIT_COMMIT_HASH");
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");

/// Get detailed version information
fn print_version() {
    println!("desktoast {}", VERSION);
    println!("commit: {}", COMMIT_HASH);
    println!("built: {}", BUILD_TIMESTAMP);
}

/// Urgency forwarded to the daemon
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum UrgencyArg {
    Low,
    Normal,
    Critical,
}

impl From<UrgencyArg> for Urgency {
    fn from(value: UrgencyArg) -> Self {
        match value {
            UrgencyArg::Low => Urgency::Low,
            UrgencyArg::Normal => Urgency::Normal,
            UrgencyArg::Critical => Urgency::Critical,
        }
    }
}

/// Command-line arguments for desktoast
#[derive(Parser, Debug)]
#[command(
    name = "desktoast",
    about = "Desktop notifications with actions, images, and a blocking event loop",
    version = VERSION,
    long_about = "Post desktop notifications through the session notification service.

Subcommands:
  send         - Post a notification (optionally wait for a click or close)
  server-info  - Print the daemon's identity and capabilities

Defaults for app name, icon, expiry, and debug output can be placed in
~/.desktoast.json."
)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Parser, Debug)]
enum Commands {
    /// Post a notification
    Send(SendArgs),

    /// Print the notification daemon's identity and capabilities
    ServerInfo,
}

/// Arguments for the send command
#[derive(Parser, Debug)]
struct SendArgs {
    /// Notification summary (title)
    summary: String,

    /// Notification body text
    #[arg(default_value = "")]
    body: String,

    /// Themed icon name or icon file path
    #[arg(long)]
    icon: Option<String>,

    /// Image file to decode and attach
    #[arg(long)]
    image: Option<PathBuf>,

    /// Action button as ID=LABEL (can be repeated)
    #[arg(long = "button", value_name = "ID=LABEL")]
    buttons: Vec<String>,

    /// Expiry in milliseconds (0 = never, daemon default when omitted)
    #[arg(long)]
    timeout_ms: Option<u32>,

    /// Urgency hint
    #[arg(long, value_enum, default_value_t = UrgencyArg::Normal)]
    urgency: UrgencyArg,

    /// Application name reported to the daemon
    #[arg(long)]
    app_name: Option<String>,

    /// Block until the notification is clicked or closed
    #[arg(long)]
    wait: bool,

    /// Enable diagnostic output
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Check for --version or -V flag before parsing
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && (args[1] == "--version" || args[1] == "-V") {
        print_version();
        std::process::exit(0);
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Send(send_args) => send_command(send_args),
        Commands::ServerInfo => server_info_command(),
    }
}

/// Parse an ID=LABEL button specification
fn parse_button(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once('=') {
        Some((id, label)) if !id.is_empty() && !label.is_empty() => Ok((id, label)),
        _ => bail!("invalid button {:?}, expected ID=LABEL", spec),
    }
}

/// Handle the send command - post one notification
fn send_command(args: SendArgs) -> Result<()> {
    let config = load_config()?;
    set_debug(args.debug || config.debug);

    let app_name = args.app_name.unwrap_or(config.app_name);
    let mut context = Context::open(&app_name)?;

    let mut notification = match &args.image {
        Some(image) => context.create_with_image(&args.summary, &args.body, image)?,
        None => context.create(&args.summary, &args.body, None)?,
    };

    if let Some(icon) = args.icon.or(config.icon) {
        notification.set_icon(Path::new(&icon));
    }
    match args.timeout_ms.or(config.timeout_ms) {
        Some(0) => notification.set_timeout(Timeout::Never),
        Some(ms) => notification.set_timeout(Timeout::Milliseconds(ms)),
        None => notification.set_timeout(Timeout::Default),
    };
    notification.set_urgency(args.urgency.into());

    for spec in &args.buttons {
        let (id, label) = parse_button(spec)?;
        if !notification.button(id, label).is_applied() {
            eprintln!("Warning: button {:?} skipped", spec);
        }
    }

    if args.wait {
        notification.on_click(|event| {
            println!("clicked");
            event.signal.request_stop();
        });
        notification.on_close(|event| {
            println!("closed: {:?}", event.reason);
            event.signal.request_stop();
        });
    }

    let id = context.send(notification)?;
    println!("posted notification {}", id.value());

    if args.wait {
        context.run_until(&LoopSignal::new())?;
    }

    context.close();
    Ok(())
}

/// Handle the server-info command - query the daemon
fn server_info_command() -> Result<()> {
    let config = load_config()?;
    set_debug(config.debug);

    let mut context = Context::open(&config.app_name)?;
    let info = context.server_info()?;
    context.close();

    println!("name:         {}", info.name);
    println!("vendor:       {}", info.vendor);
    println!("version:      {}", info.version);
    println!("spec version: {}", info.spec_version);
    println!("capabilities: {}", info.capabilities.join(", "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args() {
        // Verify that Cli implements CommandFactory
        Cli::command().debug_assert();
    }

    #[test]
    fn test_send_minimal() {
        let cli = Cli::try_parse_from(["desktoast", "send", "Hello"]).unwrap();
        match cli.command {
            Commands::Send(args) => {
                assert_eq!(args.summary, "Hello");
                assert_eq!(args.body, "");
                assert!(!args.wait);
            }
            _ => panic!("Expected Send command"),
        }
    }

    #[test]
    fn test_send_with_options() {
        let cli = Cli::try_parse_from([
            "desktoast",
            "send",
            "Title",
            "Body",
            "--image",
            "/tmp/pic.png",
            "--button",
            "ok=OK",
            "--button",
            "no=Dismiss",
            "--timeout-ms",
            "2500",
            "--urgency",
            "critical",
            "--wait",
        ])
        .unwrap();

        match cli.command {
            Commands::Send(args) => {
                assert_eq!(args.image, Some(PathBuf::from("/tmp/pic.png")));
                assert_eq!(args.buttons, vec!["ok=OK", "no=Dismiss"]);
                assert_eq!(args.timeout_ms, Some(2500));
                assert_eq!(args.urgency, UrgencyArg::Critical);
                assert!(args.wait);
            }
            _ => panic!("Expected Send command"),
        }
    }

    #[test]
    fn test_server_info_command_parses() {
        let cli = Cli::try_parse_from(["desktoast", "server-info"]).unwrap();
        assert!(matches!(cli.command, Commands::ServerInfo));
    }

    #[test]
    fn test_parse_button() {
        assert_eq!(parse_button("ok=OK").unwrap(), ("ok", "OK"));
        assert_eq!(parse_button("a=b=c").unwrap(), ("a", "b=c"));
        assert!(parse_button("no-equals").is_err());
        assert!(parse_button("=Label").is_err());
        assert!(parse_button("id=").is_err());
    }
}
